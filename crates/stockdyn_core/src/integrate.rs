//! Fixed-step integration with dense sampling.
//!
//! The driver walks the system forward at a fixed step size and lands
//! exactly on each requested sample time with a shortened final step, so a
//! trajectory's samples are bit-reproducible for a given plan.

use crate::solvers::{Tsit5, RK4};
use crate::traits::{DynamicalSystem, Steppable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrateError {
    #[error("state became non-finite at t = {t}; the trajectory left the model's domain")]
    NonFiniteState { t: f64 },
    #[error("sample times must be non-empty, finite, ascending, and start at or after t0")]
    InvalidSamplePlan,
    #[error("step size dt must be positive and finite, got {dt}")]
    InvalidStepSize { dt: f64 },
    #[error("state data has {got} values where {expected} were expected")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Which fixed-step integrator to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    Rk4,
    Tsit5,
}

impl SolverKind {
    fn build(self, dim: usize) -> Stepper {
        match self {
            SolverKind::Rk4 => Stepper::Rk4(RK4::new(dim)),
            SolverKind::Tsit5 => Stepper::Tsit5(Tsit5::new(dim)),
        }
    }
}

enum Stepper {
    Rk4(RK4<f64>),
    Tsit5(Tsit5<f64>),
}

impl Stepper {
    fn step(
        &mut self,
        system: &impl DynamicalSystem<f64>,
        t: &mut f64,
        state: &mut [f64],
        dt: f64,
    ) {
        match self {
            Stepper::Rk4(s) => s.step(system, t, state, dt),
            Stepper::Tsit5(s) => s.step(system, t, state, dt),
        }
    }
}

/// An ordered sequence of (time, state) samples. States are stored
/// row-major, one row per sample time.
#[derive(Debug, Clone, Serialize)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<f64>,
    dim: usize,
}

impl Trajectory {
    /// Builds a trajectory from raw rows. `states` holds `times.len()`
    /// rows of `dim` values each.
    pub fn new(times: Vec<f64>, states: Vec<f64>, dim: usize) -> Result<Self, IntegrateError> {
        if dim == 0 || states.len() != times.len() * dim {
            return Err(IntegrateError::DimensionMismatch {
                expected: times.len() * dim,
                got: states.len(),
            });
        }
        Ok(Self { times, states, dim })
    }

    fn with_capacity(samples: usize, dim: usize) -> Self {
        Self {
            times: Vec::with_capacity(samples),
            states: Vec::with_capacity(samples * dim),
            dim,
        }
    }

    fn push(&mut self, t: f64, state: &[f64]) {
        self.times.push(t);
        self.states.extend_from_slice(state);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The state row recorded at sample index `i`.
    pub fn state_at(&self, i: usize) -> &[f64] {
        &self.states[i * self.dim..(i + 1) * self.dim]
    }

    pub fn final_state(&self) -> Option<&[f64]> {
        if self.is_empty() {
            None
        } else {
            Some(self.state_at(self.len() - 1))
        }
    }

    /// One state component across all samples.
    pub fn component(&self, c: usize) -> Vec<f64> {
        (0..self.len()).map(|i| self.state_at(i)[c]).collect()
    }
}

/// Integrates `system` from `(t0, initial_state)` and records the state at
/// each of `sample_times`.
///
/// Fails loudly if the state turns non-finite mid-run rather than returning
/// truncated output.
pub fn integrate(
    system: &impl DynamicalSystem<f64>,
    solver: SolverKind,
    initial_state: &[f64],
    t0: f64,
    sample_times: &[f64],
    dt: f64,
) -> Result<Trajectory, IntegrateError> {
    let dim = system.dimension();
    if initial_state.len() != dim {
        return Err(IntegrateError::DimensionMismatch {
            expected: dim,
            got: initial_state.len(),
        });
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(IntegrateError::InvalidStepSize { dt });
    }
    if sample_times.is_empty()
        || sample_times.iter().any(|v| !v.is_finite())
        || sample_times[0] < t0
        || sample_times.windows(2).any(|w| w[1] < w[0])
    {
        return Err(IntegrateError::InvalidSamplePlan);
    }

    let mut stepper = solver.build(dim);
    let mut t = t0;
    let mut state = initial_state.to_vec();
    let mut trajectory = Trajectory::with_capacity(sample_times.len(), dim);

    for &target in sample_times {
        while target - t > dt {
            stepper.step(system, &mut t, &mut state, dt);
            check_finite(t, &state)?;
        }
        let remainder = target - t;
        if remainder > 0.0 {
            stepper.step(system, &mut t, &mut state, remainder);
            check_finite(t, &state)?;
        }
        // Pin to the requested time so float drift cannot accumulate
        // across samples.
        t = target;
        trajectory.push(t, &state);
    }

    Ok(trajectory)
}

fn check_finite(t: f64, state: &[f64]) -> Result<(), IntegrateError> {
    if state.iter().any(|v| !v.is_finite()) {
        return Err(IntegrateError::NonFiniteState { t });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{integrate, IntegrateError, SolverKind, Trajectory};
    use crate::traits::{DynamicalSystem, Scalar};

    struct Decay;

    impl<T: Scalar> DynamicalSystem<T> for Decay {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
            out[0] = -x[0];
        }
    }

    /// dx = x^2 reaches a finite-time blow-up at t = 1 from x(0) = 1.
    struct BlowUp;

    impl DynamicalSystem<f64> for BlowUp {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, _t: f64, x: &[f64], out: &mut [f64]) {
            out[0] = x[0] * x[0];
        }
    }

    #[test]
    fn sampled_decay_matches_closed_form() {
        let samples = [0.0, 0.5, 1.0];
        let trajectory = integrate(&Decay, SolverKind::Tsit5, &[1.0], 0.0, &samples, 0.01)
            .expect("integration should succeed");
        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.state_at(0)[0], 1.0);
        for (i, &t) in samples.iter().enumerate() {
            assert!((trajectory.state_at(i)[0] - (-t).exp()).abs() < 1e-9);
        }
        assert_eq!(trajectory.times(), &samples);
    }

    #[test]
    fn component_extracts_one_series() {
        let trajectory = integrate(&Decay, SolverKind::Rk4, &[2.0], 0.0, &[0.0, 1.0], 0.01)
            .expect("integration should succeed");
        let series = trajectory.component(0);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], 2.0);
    }

    #[test]
    fn rejects_non_positive_step_size() {
        let err = integrate(&Decay, SolverKind::Rk4, &[1.0], 0.0, &[1.0], 0.0)
            .expect_err("zero dt must be rejected");
        assert!(matches!(err, IntegrateError::InvalidStepSize { .. }));
    }

    #[test]
    fn rejects_descending_sample_times() {
        let err = integrate(&Decay, SolverKind::Rk4, &[1.0], 0.0, &[2.0, 1.0], 0.1)
            .expect_err("descending samples must be rejected");
        assert!(matches!(err, IntegrateError::InvalidSamplePlan));
    }

    #[test]
    fn rejects_samples_before_start() {
        let err = integrate(&Decay, SolverKind::Rk4, &[1.0], 5.0, &[1.0], 0.1)
            .expect_err("samples before t0 must be rejected");
        assert!(matches!(err, IntegrateError::InvalidSamplePlan));
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let err = integrate(&Decay, SolverKind::Rk4, &[1.0, 2.0], 0.0, &[1.0], 0.1)
            .expect_err("dimension mismatch must be rejected");
        assert!(matches!(
            err,
            IntegrateError::DimensionMismatch {
                expected: 1,
                got: 2
            }
        ));
    }

    #[test]
    fn blow_up_surfaces_as_non_finite_error() {
        let err = integrate(&BlowUp, SolverKind::Rk4, &[1.0], 0.0, &[2.0], 0.1)
            .expect_err("blow-up must surface, not truncate");
        assert!(matches!(err, IntegrateError::NonFiniteState { .. }));
    }

    #[test]
    fn trajectory_constructor_validates_row_count() {
        assert!(Trajectory::new(vec![0.0, 1.0], vec![1.0, 2.0, 3.0, 4.0], 2).is_ok());
        assert!(Trajectory::new(vec![0.0, 1.0], vec![1.0, 2.0, 3.0], 2).is_err());
    }
}
