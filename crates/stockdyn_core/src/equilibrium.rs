use crate::autodiff::Dual;
use crate::traits::DynamicalSystem;
use anyhow::{anyhow, bail, Context, Result};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewtonSettings {
    pub max_steps: usize,
    pub damping: f64,
    pub tolerance: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            max_steps: 25,
            damping: 1.0,
            tolerance: 1e-9,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EquilibriumResult {
    pub state: Vec<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
    pub eigenvalues: Vec<Complex<f64>>,
}

/// Finds a fixed point of the flow by damped Newton iteration, with the
/// Jacobian computed exactly via Dual numbers, and reports the Jacobian
/// eigenvalues at the solution.
pub fn solve_equilibrium<S>(
    system: &S,
    initial_guess: &[f64],
    settings: NewtonSettings,
) -> Result<EquilibriumResult>
where
    S: DynamicalSystem<f64> + DynamicalSystem<Dual>,
{
    let dim = initial_guess.len();
    if dim == 0 {
        bail!("Initial guess must have positive dimension.");
    }
    if DynamicalSystem::<f64>::dimension(system) != dim {
        bail!(
            "Initial guess dimension mismatch. Expected {}, got {}.",
            DynamicalSystem::<f64>::dimension(system),
            dim
        );
    }
    if settings.max_steps == 0 {
        bail!("max_steps must be greater than zero.");
    }
    if settings.damping <= 0.0 {
        bail!("damping must be positive.");
    }
    if settings.tolerance <= 0.0 {
        bail!("tolerance must be positive.");
    }

    let mut state = initial_guess.to_vec();
    let mut residual = vec![0.0; dim];
    system.apply(0.0, &state, &mut residual);
    let mut residual_norm = l2_norm(&residual);
    let mut iterations = 0usize;

    loop {
        if residual_norm <= settings.tolerance {
            break;
        }
        if iterations >= settings.max_steps {
            bail!(
                "Newton solver failed to converge in {} steps (‖f(x)‖ = {}).",
                settings.max_steps,
                residual_norm
            );
        }

        let jacobian = jacobian_by_dual(system, &state);
        let delta = solve_linear_system(dim, &jacobian, &residual)
            .context("Failed to solve linear system during Newton iteration.")?;
        for i in 0..dim {
            state[i] -= settings.damping * delta[i];
        }

        iterations += 1;
        system.apply(0.0, &state, &mut residual);
        residual_norm = l2_norm(&residual);
    }

    let jacobian = jacobian_by_dual(system, &state);
    let eigenvalues = DMatrix::from_row_slice(dim, dim, &jacobian)
        .complex_eigenvalues()
        .iter()
        .copied()
        .collect();

    Ok(EquilibriumResult {
        state,
        residual_norm,
        iterations,
        eigenvalues,
    })
}

/// Largest real part across the eigenvalues: negative means the fixed
/// point is stable, a sign change under a parameter marks the Hopf point.
pub fn leading_real_part(eigenvalues: &[Complex<f64>]) -> f64 {
    eigenvalues
        .iter()
        .map(|e| e.re)
        .fold(f64::NEG_INFINITY, f64::max)
}

const BISECTION_TOLERANCE: f64 = 1e-6;

/// Locates the parameter value at which the equilibrium loses stability.
///
/// `build` produces the system at a given parameter value. The bracket
/// `[param_lo, param_hi]` must straddle a sign change of the leading real
/// part; bisection then narrows it, re-seeding each Newton solve from the
/// previously found equilibrium so the solver follows one branch.
pub fn hopf_crossing<S, F>(
    build: F,
    param_lo: f64,
    param_hi: f64,
    initial_guess: &[f64],
    settings: NewtonSettings,
) -> Result<f64>
where
    F: Fn(f64) -> S,
    S: DynamicalSystem<f64> + DynamicalSystem<Dual>,
{
    if !(param_lo.is_finite() && param_hi.is_finite() && param_lo < param_hi) {
        bail!("Bracket must satisfy lo < hi with finite endpoints.");
    }

    let lo_eq = solve_equilibrium(&build(param_lo), initial_guess, settings)
        .context("Failed to solve equilibrium at the lower bracket endpoint.")?;
    let hi_eq = solve_equilibrium(&build(param_hi), &lo_eq.state, settings)
        .context("Failed to solve equilibrium at the upper bracket endpoint.")?;

    let mut s_lo = leading_real_part(&lo_eq.eigenvalues);
    let s_hi = leading_real_part(&hi_eq.eigenvalues);
    if s_lo == 0.0 {
        return Ok(param_lo);
    }
    if s_hi == 0.0 {
        return Ok(param_hi);
    }
    if s_lo.signum() == s_hi.signum() {
        bail!(
            "Bracket does not straddle a stability change (Re λ = {:.3e} and {:.3e}).",
            s_lo,
            s_hi
        );
    }

    let mut lo = param_lo;
    let mut hi = param_hi;
    let mut guess = lo_eq.state;

    while hi - lo > BISECTION_TOLERANCE {
        let mid = 0.5 * (lo + hi);
        let eq = solve_equilibrium(&build(mid), &guess, settings)
            .with_context(|| format!("Failed to solve equilibrium at parameter {mid}."))?;
        let s_mid = leading_real_part(&eq.eigenvalues);
        debug!(mid, leading = s_mid, "bisection step");
        guess = eq.state;
        if s_mid == 0.0 {
            return Ok(mid);
        }
        if s_mid.signum() == s_lo.signum() {
            lo = mid;
            s_lo = s_mid;
        } else {
            hi = mid;
        }
    }

    Ok(0.5 * (lo + hi))
}

fn jacobian_by_dual<S: DynamicalSystem<Dual>>(system: &S, state: &[f64]) -> Vec<f64> {
    let dim = state.len();
    let mut jacobian = vec![0.0; dim * dim];
    let mut dual_state = vec![Dual::constant(0.0); dim];
    let mut dual_out = vec![Dual::constant(0.0); dim];

    for j in 0..dim {
        for i in 0..dim {
            dual_state[i] = Dual::new(state[i], if i == j { 1.0 } else { 0.0 });
        }
        system.apply(Dual::constant(0.0), &dual_state, &mut dual_out);
        for i in 0..dim {
            jacobian[i * dim + j] = dual_out[i].deriv;
        }
    }

    jacobian
}

fn solve_linear_system(dim: usize, jacobian: &[f64], residual: &[f64]) -> Result<Vec<f64>> {
    let matrix = DMatrix::from_row_slice(dim, dim, jacobian);
    let rhs = DVector::from_column_slice(residual);
    matrix
        .lu()
        .solve(&rhs)
        .map(|v| v.iter().cloned().collect())
        .ok_or_else(|| anyhow!("Jacobian is singular."))
}

fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}
