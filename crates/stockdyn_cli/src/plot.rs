//! Chart rendering via plotters.

use anyhow::{bail, Result};
use plotters::prelude::*;
use std::path::Path;
use stockdyn_core::integrate::Trajectory;
use stockdyn_core::sweep::BifurcationRecord;

pub const SERIES_LABELS: [&str; 3] = ["Prey 1 (X1)", "Prey 2 (X2)", "Predator (Y)"];

const SERIES_COLORS: [RGBColor; 3] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
];

/// All three state components against time, with a legend.
pub fn time_series_png(
    path: &Path,
    title: &str,
    trajectory: &Trajectory,
    size: (u32, u32),
) -> Result<()> {
    if trajectory.dim() != 3 {
        bail!(
            "Time-series plot expects a three-component trajectory, got dimension {}.",
            trajectory.dim()
        );
    }
    if trajectory.is_empty() {
        bail!("Cannot plot an empty trajectory.");
    }

    let times = trajectory.times();
    let t_max = *times.last().expect("trajectory is non-empty");
    let (y_min, y_max) = value_bounds(
        (0..3).flat_map(|c| trajectory.component(c)),
    );

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(0.0..t_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time, t")
        .y_desc("Relative share price")
        .draw()?;

    for (c, label) in SERIES_LABELS.iter().enumerate() {
        let color = SERIES_COLORS[c];
        let series = trajectory.component(c);
        chart
            .draw_series(LineSeries::new(
                times.iter().copied().zip(series),
                &color,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Bifurcation diagram: one dot per record, plus an optional vertical
/// marker at the predicted Hopf point.
pub fn bifurcation_scatter_png(
    path: &Path,
    title: &str,
    records: &[BifurcationRecord],
    hopf_c2: Option<f64>,
    size: (u32, u32),
) -> Result<()> {
    if records.is_empty() {
        bail!("Cannot plot an empty bifurcation record set.");
    }

    let (x_min, x_max) = value_bounds(records.iter().map(|r| r.c2));
    let (y_min, y_max) = value_bounds(records.iter().map(|r| r.value));

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Conversion rate c2")
        .y_desc("Prey 1 share price (X1)")
        .draw()?;

    chart.draw_series(
        records
            .iter()
            .map(|r| Circle::new((r.c2, r.value), 2, BLACK.mix(0.6).filled())),
    )?;

    if let Some(c2) = hopf_c2 {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(c2, y_min), (c2, y_max)],
                RED.stroke_width(2),
            )))?
            .label(format!("Predicted Hopf point ({c2:.4})"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Min/max with a small margin so marks are not clipped at the border.
fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    let pad = ((max - min) * 0.05).max(1e-9);
    (min - pad, max + pad)
}
