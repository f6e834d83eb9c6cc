pub mod output;
pub mod plot;

/// Env-filtered tracing to stderr; `RUST_LOG=debug` surfaces per-step
/// sweep events.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
