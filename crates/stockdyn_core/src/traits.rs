use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// Numeric types a model can be evaluated over.
/// `f64` covers plain integration; the `Dual` scalar reuses the same model
/// definition for Jacobian computation.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A continuous-time dynamical system dy/dt = f(t, y).
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// t: current time
    /// x: current state
    /// out: buffer receiving dy/dt
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// A fixed-step time stepper.
pub trait Steppable<T: Scalar> {
    /// Advances `state` (and `t`) by one step of size `dt`.
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T);
}
