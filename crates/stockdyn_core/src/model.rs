//! The three-species market model.
//!
//! Two competing "prey" populations X1, X2 (relative share prices of two
//! rival companies) and one "predator" population Y (the market driver)
//! coupled through logistic growth, cross-competition, and ratio-dependent
//! predation with saturating functional responses.

use crate::traits::{DynamicalSystem, Scalar};
use serde::{Deserialize, Serialize};

/// Functional-response denominators below this are treated as a collapsed
/// population: the response evaluates to zero instead of dividing.
pub const RESPONSE_EPSILON: f64 = 1e-9;

/// Coefficients of the model. Immutable within one integration run; the
/// bifurcation sweep varies `c2` across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Intrinsic growth rates of the two prey.
    pub s1: f64,
    pub s2: f64,
    /// Carrying capacities.
    pub k1: f64,
    pub k2: f64,
    /// Cross-competition rates (losses of X1 to X2 and vice versa).
    pub m12: f64,
    pub m21: f64,
    /// Predation rates.
    pub v1: f64,
    pub v2: f64,
    /// Response interference by the rival prey.
    pub a1: f64,
    pub a2: f64,
    /// Response interference by the driver.
    pub b1: f64,
    pub b2: f64,
    /// Conversion efficiencies of predation into driver growth.
    pub c1: f64,
    pub c2: f64,
    /// Driver decay rate.
    pub mu: f64,
}

impl MarketParams {
    fn dataset2() -> Self {
        Self {
            s1: 0.04,
            s2: 0.05,
            k1: 5.0,
            k2: 10.0,
            m12: 0.01,
            m21: 0.02,
            v1: 0.03,
            v2: 0.03,
            a1: 0.1,
            a2: 0.3,
            b1: 0.02,
            b2: 3.0,
            c1: 0.1,
            c2: 0.23,
            mu: 0.02,
        }
    }

    /// Configuration that converges to a stable coexistence equilibrium.
    pub fn stable_market() -> Self {
        Self {
            b2: 1.5,
            c1: 0.15,
            c2: 0.2,
            ..Self::dataset2()
        }
    }

    /// Configuration past the Hopf point: sustained bounded oscillation.
    pub fn unstable_market() -> Self {
        Self::dataset2()
    }

    /// Base configuration for the conversion-rate sweep; `c2` is replaced
    /// per sweep step.
    pub fn sweep_baseline() -> Self {
        Self {
            c2: 0.22,
            ..Self::dataset2()
        }
    }

    /// Same coefficients with `c2` replaced.
    pub fn with_conversion_rate(self, c2: f64) -> Self {
        Self { c2, ..self }
    }
}

/// The saturating functional responses r1, r2 in [0, 1).
///
/// Each ratio is guarded: a denominator below [`RESPONSE_EPSILON`] means the
/// populations feeding it have collapsed, and the response is zero rather
/// than a division by a vanishing quantity.
pub fn functional_responses<T: Scalar>(params: &MarketParams, x: &[T]) -> (T, T) {
    let c = |v: f64| T::from_f64(v).unwrap();
    let eps = c(RESPONSE_EPSILON);
    let (x1, x2, y) = (x[0], x[1], x[2]);

    let denom1 = x1 + c(params.a2) * x2 + c(params.b2) * y;
    let r1 = if denom1 > eps { x1 / denom1 } else { T::zero() };

    let denom2 = x2 + c(params.a1) * x1 + c(params.b1) * y;
    let r2 = if denom2 > eps { x2 / denom2 } else { T::zero() };

    (r1, r2)
}

/// The model as a [`DynamicalSystem`], generic over the scalar type so the
/// same rate equations serve integration and Dual-number Jacobians.
#[derive(Debug, Clone, Copy)]
pub struct SharePriceModel {
    params: MarketParams,
}

impl SharePriceModel {
    pub fn new(params: MarketParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MarketParams {
        &self.params
    }
}

impl<T: Scalar> DynamicalSystem<T> for SharePriceModel {
    fn dimension(&self) -> usize {
        3
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let p = &self.params;
        let c = |v: f64| T::from_f64(v).unwrap();
        let one = T::one();
        let (x1, x2, y) = (x[0], x[1], x[2]);
        let (r1, r2) = functional_responses(p, x);

        out[0] = c(p.s1) * x1 * (one - x1 / c(p.k1)) - c(p.m12) * x1 * x2 - c(p.v1) * x1 * y * r1;
        out[1] = c(p.s2) * x2 * (one - x2 / c(p.k2)) - c(p.m21) * x1 * x2 - c(p.v2) * x2 * y * r2;
        out[2] = -(c(p.mu) * y) + c(p.c1) * c(p.v1) * x1 * y * r1 + c(p.c2) * c(p.v2) * x2 * y * r2;
    }
}

#[cfg(test)]
mod tests {
    use super::{functional_responses, MarketParams, SharePriceModel, RESPONSE_EPSILON};
    use crate::traits::DynamicalSystem;

    #[test]
    fn rate_equations_match_hand_computation() {
        let p = MarketParams::stable_market();
        let model = SharePriceModel::new(p);
        let x = [0.54_f64, 3.3, 0.75];
        let mut out = [0.0_f64; 3];
        model.apply(0.0, &x, &mut out);

        let r1 = x[0] / (x[0] + p.a2 * x[1] + p.b2 * x[2]);
        let r2 = x[1] / (x[1] + p.a1 * x[0] + p.b1 * x[2]);
        let dx1 = p.s1 * x[0] * (1.0 - x[0] / p.k1) - p.m12 * x[0] * x[1] - p.v1 * x[0] * x[2] * r1;
        let dx2 = p.s2 * x[1] * (1.0 - x[1] / p.k2) - p.m21 * x[0] * x[1] - p.v2 * x[1] * x[2] * r2;
        let dy = -(p.mu * x[2]) + p.c1 * p.v1 * x[0] * x[2] * r1 + p.c2 * p.v2 * x[1] * x[2] * r2;

        assert!((out[0] - dx1).abs() < 1e-12);
        assert!((out[1] - dx2).abs() < 1e-12);
        assert!((out[2] - dy).abs() < 1e-12);
    }

    #[test]
    fn unstable_dataset_shifts_only_named_coefficients() {
        let stable = MarketParams::stable_market();
        let unstable = MarketParams::unstable_market();
        assert_eq!(unstable.b2, 3.0);
        assert_eq!(unstable.c1, 0.1);
        assert_eq!(unstable.c2, 0.23);
        assert_eq!(stable.s1, unstable.s1);
        assert_eq!(stable.k2, unstable.k2);
        assert_eq!(stable.mu, unstable.mu);
    }

    #[test]
    fn collapsed_denominator_yields_zero_response() {
        let p = MarketParams::stable_market();
        // All denominators well below the guard threshold.
        let (r1, r2) = functional_responses(&p, &[1e-12_f64, 0.0, 0.0]);
        assert_eq!(r1, 0.0);
        assert_eq!(r2, 0.0);
        assert!((1e-12 + p.a2 * 0.0 + p.b2 * 0.0) < RESPONSE_EPSILON);
    }

    #[test]
    fn rates_stay_finite_at_the_origin() {
        let model = SharePriceModel::new(MarketParams::unstable_market());
        let mut out = [f64::NAN; 3];
        model.apply(0.0, &[0.0, 0.0, 0.0], &mut out);
        for v in out {
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn with_conversion_rate_replaces_only_c2() {
        let p = MarketParams::sweep_baseline().with_conversion_rate(0.231);
        assert_eq!(p.c2, 0.231);
        assert_eq!(p.b2, MarketParams::sweep_baseline().b2);
    }
}
