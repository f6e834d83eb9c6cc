use crate::traits::{DynamicalSystem, Scalar, Steppable};

/// Classic Runge-Kutta 4th order with preallocated stage buffers.
pub struct RK4<T: Scalar> {
    k: [Vec<T>; 4],
    tmp: Vec<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k: std::array::from_fn(|_| vec![T::zero(); dim]),
            tmp: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let half = T::from_f64(0.5).unwrap();
        let sixth = T::from_f64(1.0 / 6.0).unwrap();
        let two = T::from_f64(2.0).unwrap();
        let t0 = *t;

        system.apply(t0, state, &mut self.k[0]);

        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * half * self.k[0][i];
        }
        system.apply(t0 + dt * half, &self.tmp, &mut self.k[1]);

        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * half * self.k[1][i];
        }
        system.apply(t0 + dt * half, &self.tmp, &mut self.k[2]);

        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k[2][i];
        }
        system.apply(t0 + dt, &self.tmp, &mut self.k[3]);

        for i in 0..state.len() {
            state[i] = state[i]
                + dt * sixth
                    * (self.k[0][i] + two * self.k[1][i] + two * self.k[2][i] + self.k[3][i]);
        }

        *t = t0 + dt;
    }
}

// Tsitouras 5(4) tableau. Row s of A feeds stage s+1; B is the 5th-order
// update weight vector.
const TSIT5_C: [f64; 6] = [0.0, 0.161, 0.327, 0.9, 0.9800255409045097, 1.0];
const TSIT5_A: [[f64; 5]; 5] = [
    [0.161, 0.0, 0.0, 0.0, 0.0],
    [-0.008480655492356989, 0.335480655492357, 0.0, 0.0, 0.0],
    [2.898, -6.359447987781783, 4.361447987781783, 0.0, 0.0],
    [
        5.325864858437957,
        -11.748883564062828,
        7.495539342889693,
        -0.09249506636030195,
        0.0,
    ],
    [
        5.86145544294642,
        -12.92096931784711,
        8.159367898576159,
        -0.071584973281401,
        -0.02826857949054663,
    ],
];
const TSIT5_B: [f64; 6] = [
    0.09646076681806523,
    0.01,
    0.4798896504144996,
    1.379008574103742,
    -3.290069515436099,
    2.324710524099774,
];

/// Tsitouras 5th order, fixed step.
pub struct Tsit5<T: Scalar> {
    k: [Vec<T>; 6],
    tmp: Vec<T>,
}

impl<T: Scalar> Tsit5<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k: std::array::from_fn(|_| vec![T::zero(); dim]),
            tmp: vec![T::zero(); dim],
        }
    }

    /// tmp = state + dt * Σ coeffs[j] * k[j]
    fn stage_input(&mut self, state: &[T], dt: T, coeffs: &[f64]) {
        for i in 0..state.len() {
            let mut acc = T::zero();
            for (j, &a) in coeffs.iter().enumerate() {
                if a != 0.0 {
                    acc = acc + T::from_f64(a).unwrap() * self.k[j][i];
                }
            }
            self.tmp[i] = state[i] + dt * acc;
        }
    }
}

impl<T: Scalar> Steppable<T> for Tsit5<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let t0 = *t;

        system.apply(t0, state, &mut self.k[0]);
        for s in 1..6 {
            self.stage_input(state, dt, &TSIT5_A[s - 1][..s]);
            let ts = t0 + T::from_f64(TSIT5_C[s]).unwrap() * dt;
            system.apply(ts, &self.tmp, &mut self.k[s]);
        }

        for i in 0..state.len() {
            let mut acc = T::zero();
            for (j, &b) in TSIT5_B.iter().enumerate() {
                acc = acc + T::from_f64(b).unwrap() * self.k[j][i];
            }
            state[i] = state[i] + dt * acc;
        }

        *t = t0 + dt;
    }
}

#[cfg(test)]
mod tests {
    use super::{RK4, Tsit5};
    use crate::traits::{DynamicalSystem, Scalar, Steppable};

    struct Decay;

    impl<T: Scalar> DynamicalSystem<T> for Decay {
        fn dimension(&self) -> usize {
            1
        }

        fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
            out[0] = -x[0];
        }
    }

    fn run<S: Steppable<f64>>(mut stepper: S, dt: f64, steps: usize) -> f64 {
        let mut t = 0.0;
        let mut state = vec![1.0];
        for _ in 0..steps {
            stepper.step(&Decay, &mut t, &mut state, dt);
        }
        state[0]
    }

    #[test]
    fn rk4_matches_exponential_decay() {
        let result = run(RK4::new(1), 0.01, 100);
        assert!((result - (-1.0_f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn tsit5_matches_exponential_decay() {
        let result = run(Tsit5::new(1), 0.01, 100);
        assert!((result - (-1.0_f64).exp()).abs() < 1e-10);
    }

    #[test]
    fn stepper_advances_time() {
        let mut stepper = RK4::new(1);
        let mut t: f64 = 2.0;
        let mut state = vec![1.0];
        stepper.step(&Decay, &mut t, &mut state, 0.5);
        assert!((t - 2.5).abs() < 1e-15);
    }
}
