//! Core engine for the stockdyn market-dynamics study.
//!
//! A three-species competitive predation model (two rival share prices and
//! a market driver) and the machinery to map its regimes:
//! - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem`,
//!   `Steppable` (solvers).
//! - **Model**: the coupled rate equations with saturating functional
//!   responses.
//! - **Solvers / Integrate**: fixed-step RK4 and Tsit5 with dense sampling.
//! - **Classify / Sweep**: settled-window classification and the
//!   continuation sweep over the conversion rate c2.
//! - **Equilibrium / Autodiff**: Newton fixed points, Dual-number
//!   Jacobians, eigenvalue-based Hopf prediction.

pub mod autodiff;
pub mod classify;
pub mod equilibrium;
pub mod integrate;
pub mod model;
pub mod solvers;
pub mod sweep;
pub mod traits;
