//! Forward-mode automatic differentiation.
//!
//! `Dual` carries a value together with one directional derivative, so
//! evaluating the model over `Dual` inputs yields one Jacobian column per
//! pass. Implementing `num_traits::Float` is boilerplate heavy, but it lets
//! `Dual` satisfy [`crate::traits::Scalar`] and flow through the same model
//! code as `f64`.

use num_traits::{Float, FromPrimitive, Num, NumCast, One, ToPrimitive, Zero};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

/// A dual number `value + deriv * ε` with `ε² = 0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dual {
    pub value: f64,
    pub deriv: f64,
}

impl Dual {
    pub fn new(value: f64, deriv: f64) -> Self {
        Self { value, deriv }
    }

    /// A dual number with zero derivative part.
    pub fn constant(value: f64) -> Self {
        Self::new(value, 0.0)
    }
}

impl Zero for Dual {
    fn zero() -> Self {
        Self::constant(0.0)
    }
    fn is_zero(&self) -> bool {
        self.value == 0.0 && self.deriv == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl Add for Dual {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.value, self.deriv + rhs.deriv)
    }
}

impl Sub for Dual {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.value, self.deriv - rhs.deriv)
    }
}

impl Mul for Dual {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.value * rhs.value,
            self.value * rhs.deriv + self.deriv * rhs.value,
        )
    }
}

impl Div for Dual {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(
            self.value / rhs.value,
            (self.deriv * rhs.value - self.value * rhs.deriv) / (rhs.value * rhs.value),
        )
    }
}

impl Neg for Dual {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.value, -self.deriv)
    }
}

impl Rem for Dual {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        // The derivative of rem is not meaningful here; keep the value part.
        Self::new(self.value % rhs.value, 0.0)
    }
}

impl AddAssign for Dual {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl SubAssign for Dual {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl MulAssign for Dual {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
impl DivAssign for Dual {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}
impl RemAssign for Dual {
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

impl Num for Dual {
    type FromStrRadixErr = ();
    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        f64::from_str_radix(str, radix)
            .map(Self::constant)
            .map_err(|_| ())
    }
}

impl ToPrimitive for Dual {
    fn to_i64(&self) -> Option<i64> {
        self.value.to_i64()
    }
    fn to_u64(&self) -> Option<u64> {
        self.value.to_u64()
    }
    fn to_f64(&self) -> Option<f64> {
        Some(self.value)
    }
}

impl FromPrimitive for Dual {
    fn from_i64(n: i64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_u64(n: u64) -> Option<Self> {
        Some(Self::constant(n as f64))
    }
    fn from_f64(n: f64) -> Option<Self> {
        Some(Self::constant(n))
    }
}

impl NumCast for Dual {
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        n.to_f64().map(Self::constant)
    }
}

impl Float for Dual {
    fn nan() -> Self {
        Self::constant(f64::NAN)
    }
    fn infinity() -> Self {
        Self::constant(f64::INFINITY)
    }
    fn neg_infinity() -> Self {
        Self::constant(f64::NEG_INFINITY)
    }
    fn neg_zero() -> Self {
        Self::new(-0.0, -0.0)
    }
    fn min_value() -> Self {
        Self::constant(f64::MIN)
    }
    fn min_positive_value() -> Self {
        Self::constant(f64::MIN_POSITIVE)
    }
    fn max_value() -> Self {
        Self::constant(f64::MAX)
    }
    fn is_nan(self) -> bool {
        self.value.is_nan()
    }
    fn is_infinite(self) -> bool {
        self.value.is_infinite()
    }
    fn is_finite(self) -> bool {
        self.value.is_finite()
    }
    fn is_normal(self) -> bool {
        self.value.is_normal()
    }
    fn classify(self) -> std::num::FpCategory {
        self.value.classify()
    }
    fn floor(self) -> Self {
        Self::constant(self.value.floor())
    }
    fn ceil(self) -> Self {
        Self::constant(self.value.ceil())
    }
    fn round(self) -> Self {
        Self::constant(self.value.round())
    }
    fn trunc(self) -> Self {
        Self::constant(self.value.trunc())
    }
    fn fract(self) -> Self {
        Self::new(self.value.fract(), self.deriv)
    }
    fn abs(self) -> Self {
        Self::new(
            self.value.abs(),
            if self.value >= 0.0 {
                self.deriv
            } else {
                -self.deriv
            },
        )
    }
    fn signum(self) -> Self {
        Self::constant(self.value.signum())
    }
    fn is_sign_positive(self) -> bool {
        self.value.is_sign_positive()
    }
    fn is_sign_negative(self) -> bool {
        self.value.is_sign_negative()
    }
    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }
    fn recip(self) -> Self {
        Self::one() / self
    }

    fn powi(self, n: i32) -> Self {
        Self::new(
            self.value.powi(n),
            <f64 as From<i32>>::from(n) * self.value.powi(n - 1) * self.deriv,
        )
    }

    fn powf(self, n: Self) -> Self {
        let value = self.value.powf(n.value);
        let deriv = value * (n.deriv * self.value.ln() + n.value * self.deriv / self.value);
        Self::new(value, deriv)
    }

    fn sqrt(self) -> Self {
        let root = self.value.sqrt();
        Self::new(root, self.deriv / (2.0 * root))
    }

    fn exp(self) -> Self {
        let e = self.value.exp();
        Self::new(e, e * self.deriv)
    }

    fn exp2(self) -> Self {
        unimplemented!()
    }
    fn ln(self) -> Self {
        Self::new(self.value.ln(), self.deriv / self.value)
    }
    fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }
    fn log2(self) -> Self {
        unimplemented!()
    }
    fn log10(self) -> Self {
        unimplemented!()
    }

    fn max(self, other: Self) -> Self {
        if self.value > other.value {
            self
        } else {
            other
        }
    }
    fn min(self, other: Self) -> Self {
        if self.value < other.value {
            self
        } else {
            other
        }
    }

    fn abs_sub(self, _other: Self) -> Self {
        unimplemented!()
    }

    fn cbrt(self) -> Self {
        unimplemented!()
    }
    fn hypot(self, _other: Self) -> Self {
        unimplemented!()
    }

    fn sin(self) -> Self {
        Self::new(self.value.sin(), self.deriv * self.value.cos())
    }
    fn cos(self) -> Self {
        Self::new(self.value.cos(), -self.deriv * self.value.sin())
    }
    fn tan(self) -> Self {
        let t = self.value.tan();
        Self::new(t, self.deriv * (1.0 + t * t))
    }
    fn asin(self) -> Self {
        unimplemented!()
    }
    fn acos(self) -> Self {
        unimplemented!()
    }
    fn atan(self) -> Self {
        unimplemented!()
    }
    fn atan2(self, _other: Self) -> Self {
        unimplemented!()
    }
    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }

    fn exp_m1(self) -> Self {
        unimplemented!()
    }
    fn ln_1p(self) -> Self {
        unimplemented!()
    }
    fn sinh(self) -> Self {
        unimplemented!()
    }
    fn cosh(self) -> Self {
        unimplemented!()
    }
    fn tanh(self) -> Self {
        unimplemented!()
    }
    fn asinh(self) -> Self {
        unimplemented!()
    }
    fn acosh(self) -> Self {
        unimplemented!()
    }
    fn atanh(self) -> Self {
        unimplemented!()
    }

    fn integer_decode(self) -> (u64, i16, i8) {
        self.value.integer_decode()
    }
}

#[cfg(test)]
mod tests {
    use super::Dual;

    #[test]
    fn product_rule() {
        let x = Dual::new(3.0, 1.0);
        let y = x * x;
        assert_eq!(y.value, 9.0);
        assert_eq!(y.deriv, 6.0);
    }

    #[test]
    fn quotient_rule() {
        // d/dx (1 / x) = -1 / x^2
        let x = Dual::new(2.0, 1.0);
        let y = Dual::constant(1.0) / x;
        assert_eq!(y.value, 0.5);
        assert_eq!(y.deriv, -0.25);
    }

    #[test]
    fn comparison_uses_the_value_part() {
        let a = Dual::new(1.0, 50.0);
        let b = Dual::new(2.0, -50.0);
        assert!(a < b);
    }
}
