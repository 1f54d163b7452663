//! Numeric tower.
//!
//! [`Number`] is a small dynamically-typed scalar covering the three
//! domains random variables live in: integers (lattice / discrete laws),
//! reals and complex numbers. Arithmetic promotes the same way the usual
//! numeric tower does:
//!
//! | lhs \ rhs | Int | Real | Complex |
//! |---|---|---|---|
//! | Int | Int (Real on overflow or inexact division) | Real | Complex |
//! | Real | Real | Real | Complex |
//! | Complex | Complex | Complex | Complex |
//!
//! Integer results are kept exact whenever possible so that discrete
//! supports keep their discretization step of 1.

use crate::error::{Error, Result};
use num_complex::Complex64;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A float that is expected to lie within `[0, 1]`.
pub type Probability = f64;

/// Returns `true` if `p` is a finite value within `[0, 1]`.
///
/// # Examples
/// ```
/// use hall::number::is_probability;
/// assert!(is_probability(0.0));
/// assert!(is_probability(1.0));
/// assert!(!is_probability(1.0 + 1e-9));
/// assert!(!is_probability(f64::NAN));
/// ```
pub fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

/// Integer, real or complex scalar.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Real(f64),
    Complex(Complex64),
}

impl Number {
    pub const ZERO: Number = Number::Int(0);
    pub const ONE: Number = Number::Int(1);

    /// Builds a complex number from its components.
    pub fn complex(re: f64, im: f64) -> Self {
        Number::Complex(Complex64::new(re, im))
    }

    /// Real part.
    pub fn re(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Real(x) => x,
            Number::Complex(z) => z.re,
        }
    }

    /// Imaginary part (zero for integers and reals).
    pub fn im(self) -> f64 {
        match self {
            Number::Complex(z) => z.im,
            _ => 0.0,
        }
    }

    pub fn is_int(self) -> bool {
        matches!(self, Number::Int(_))
    }

    pub fn is_complex(self) -> bool {
        matches!(self, Number::Complex(_))
    }

    /// `true` if the value is a whole number, whatever its representation.
    pub fn is_integral(self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Real(x) => x.is_finite() && x.fract() == 0.0,
            Number::Complex(z) => z.im == 0.0 && z.re.is_finite() && z.re.fract() == 0.0,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Real(x) => x.is_finite(),
            Number::Complex(z) => z.re.is_finite() && z.im.is_finite(),
        }
    }

    pub fn is_nan(self) -> bool {
        match self {
            Number::Int(_) => false,
            Number::Real(x) => x.is_nan(),
            Number::Complex(z) => z.re.is_nan() || z.im.is_nan(),
        }
    }

    pub fn is_zero(self) -> bool {
        self.re() == 0.0 && self.im() == 0.0
    }

    /// Widens to a complex value.
    pub fn to_complex(self) -> Complex64 {
        Complex64::new(self.re(), self.im())
    }

    /// Narrows to a real value.
    ///
    /// # Errors
    /// [`Error::Type`] if the value has a nonzero imaginary part.
    pub fn to_real(self) -> Result<f64> {
        if self.im() != 0.0 {
            return Err(Error::Type(format!("expected a real number, got {self}")));
        }
        Ok(self.re())
    }

    /// Narrows to an integer.
    ///
    /// # Errors
    /// [`Error::Type`] for complex values, [`Error::Domain`] for values that
    /// are not whole numbers or do not fit in an `i64`.
    pub fn to_integer(self) -> Result<i64> {
        if let Number::Int(n) = self {
            return Ok(n);
        }
        let x = self.to_real()?;
        if !self.is_integral() || x < i64::MIN as f64 || x > i64::MAX as f64 {
            return Err(Error::Domain(format!(
                "value must be an integral number, got {self}"
            )));
        }
        Ok(x as i64)
    }

    /// Absolute value (modulus for complex numbers).
    pub fn abs(self) -> Number {
        match self {
            Number::Int(n) => n.checked_abs().map_or(Number::Real((n as f64).abs()), Number::Int),
            Number::Real(x) => Number::Real(x.abs()),
            Number::Complex(z) => Number::Real(z.norm()),
        }
    }

    /// Principal square root; negative reals yield a complex result.
    pub fn sqrt(self) -> Number {
        match self {
            Number::Complex(z) => Number::Complex(z.sqrt()),
            other => {
                let x = other.re();
                if x < 0.0 {
                    Number::complex(0.0, (-x).sqrt())
                } else {
                    Number::Real(x.sqrt())
                }
            }
        }
    }

    /// `self` raised to `exp`.
    ///
    /// Non-negative integer powers of integers stay exact while they fit in
    /// an `i64`. A negative real base with a fractional exponent gives the
    /// principal complex value.
    pub fn pow(self, exp: Number) -> Number {
        match (self, exp) {
            (Number::Int(b), Number::Int(e)) if e >= 0 => u32::try_from(e)
                .ok()
                .and_then(|e| b.checked_pow(e))
                .map_or_else(|| Number::Real((b as f64).powf(e as f64)), Number::Int),
            (Number::Complex(_), _) | (_, Number::Complex(_)) => {
                Number::Complex(self.to_complex().powc(exp.to_complex()))
            }
            (_, Number::Int(e)) => match i32::try_from(e) {
                Ok(e) => Number::Real(self.re().powi(e)),
                Err(_) => Number::Real(self.re().powf(e as f64)),
            },
            _ => {
                let (b, e) = (self.re(), exp.re());
                if b < 0.0 && e.fract() != 0.0 {
                    Number::Complex(self.to_complex().powc(exp.to_complex()))
                } else {
                    Number::Real(b.powf(e))
                }
            }
        }
    }

    /// Componentwise maximum. Non-complex pairs compare directly.
    pub(crate) fn cmax(self, other: Number) -> Number {
        if !self.is_complex() && !other.is_complex() {
            return match self.partial_cmp(&other) {
                Some(Ordering::Less) => other,
                _ => self,
            };
        }
        Number::complex(self.re().max(other.re()), self.im().max(other.im()))
    }

    /// Componentwise minimum. Non-complex pairs compare directly.
    pub(crate) fn cmin(self, other: Number) -> Number {
        -((-self).cmax(-other))
    }

    fn binary(
        self,
        rhs: Number,
        int_op: fn(i64, i64) -> Option<i64>,
        real_op: fn(f64, f64) -> f64,
        complex_op: fn(Complex64, Complex64) -> Complex64,
    ) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match int_op(a, b) {
                Some(n) => Number::Int(n),
                None => Number::Real(real_op(a as f64, b as f64)),
            },
            (Number::Complex(_), _) | (_, Number::Complex(_)) => {
                Number::Complex(complex_op(self.to_complex(), rhs.to_complex()))
            }
            _ => Number::Real(real_op(self.re(), rhs.re())),
        }
    }
}

fn exact_div(a: i64, b: i64) -> Option<i64> {
    if b != 0 && a.checked_rem(b) == Some(0) {
        a.checked_div(b)
    } else {
        None
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        self.binary(rhs, i64::checked_add, |a, b| a + b, |a, b| a + b)
    }
}

impl Sub for Number {
    type Output = Number;

    fn sub(self, rhs: Number) -> Number {
        self.binary(rhs, i64::checked_sub, |a, b| a - b, |a, b| a - b)
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Number) -> Number {
        self.binary(rhs, i64::checked_mul, |a, b| a * b, |a, b| a * b)
    }
}

impl Div for Number {
    type Output = Number;

    /// Integer division stays exact when the quotient is whole; otherwise
    /// the result is real (`Int(1) / Int(0)` is `Real(inf)`).
    fn div(self, rhs: Number) -> Number {
        self.binary(rhs, exact_div, |a, b| a / b, |a, b| a / b)
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Int(n) => n.checked_neg().map_or(Number::Real(-(n as f64)), Number::Int),
            Number::Real(x) => Number::Real(-x),
            Number::Complex(z) => Number::Complex(-z),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (a, b) if a.is_complex() || b.is_complex() => a.to_complex() == b.to_complex(),
            (a, b) => a.re() == b.re(),
        }
    }
}

impl PartialOrd for Number {
    /// Complex values with a nonzero imaginary part are unordered.
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        match (*self, *other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (a, b) if a.im() != 0.0 || b.im() != 0.0 => {
                if a == b {
                    Some(Ordering::Equal)
                } else {
                    None
                }
            }
            (a, b) => a.re().partial_cmp(&b.re()),
        }
    }
}

impl Hash for Number {
    /// Equal values hash equally across representations (`Int(2)`,
    /// `Real(2.0)` and `2+0i` collide on purpose).
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (re, im) = (self.re(), self.im());
        if im == 0.0 && self.is_integral() && re >= i64::MIN as f64 && re <= i64::MAX as f64 {
            match self {
                Number::Int(n) => n.hash(state),
                _ => (re as i64).hash(state),
            }
        } else if im == 0.0 {
            re.to_bits().hash(state);
        } else {
            re.to_bits().hash(state);
            im.to_bits().hash(state);
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::ZERO
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Real(x) => match f.precision() {
                Some(p) => write!(f, "{x:.p$}"),
                None => write!(f, "{x}"),
            },
            Number::Complex(z) => match f.precision() {
                Some(p) => write!(f, "({:.p$}{:+.p$}i)", z.re, z.im),
                None => write!(f, "({}{:+}i)", z.re, z.im),
            },
        }
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Number {
            fn from(n: $t) -> Self {
                Number::Int(i64::from(n))
            }
        })*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Number::Real(n as f64), Number::Int)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Number::Real(n as f64), Number::Int)
    }
}

impl From<f32> for Number {
    fn from(x: f32) -> Self {
        Number::Real(f64::from(x))
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Real(x)
    }
}

impl From<Complex64> for Number {
    fn from(z: Complex64) -> Self {
        Number::Complex(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(n: Number) -> u64 {
        let mut h = DefaultHasher::new();
        n.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_int_arithmetic_stays_exact() {
        assert!(matches!(Number::Int(3) + Number::Int(4), Number::Int(7)));
        assert!(matches!(Number::Int(6) / Number::Int(3), Number::Int(2)));
        assert!(matches!(Number::Int(-6) * Number::Int(3), Number::Int(-18)));
    }

    #[test]
    fn test_inexact_division_promotes() {
        match Number::Int(1) / Number::Int(2) {
            Number::Real(x) => assert_eq!(x, 0.5),
            other => panic!("expected real, got {other:?}"),
        }
        match Number::Int(1) / Number::Int(0) {
            Number::Real(x) => assert!(x.is_infinite()),
            other => panic!("expected real, got {other:?}"),
        }
    }

    #[test]
    fn test_overflow_promotes() {
        let n = Number::Int(i64::MAX) + Number::Int(1);
        assert!(matches!(n, Number::Real(_)));
        assert!(matches!(-Number::Int(i64::MIN), Number::Real(_)));
    }

    #[test]
    fn test_complex_promotion() {
        let z = Number::Int(1) + Number::complex(0.0, 2.0);
        assert!(z.is_complex());
        assert_eq!(z.re(), 1.0);
        assert_eq!(z.im(), 2.0);
    }

    #[test]
    fn test_cross_representation_equality() {
        assert_eq!(Number::Int(2), Number::Real(2.0));
        assert_eq!(Number::Real(2.0), Number::complex(2.0, 0.0));
        assert_ne!(Number::Int(2), Number::complex(2.0, 1.0));
        assert_eq!(hash_of(Number::Int(2)), hash_of(Number::Real(2.0)));
        assert_eq!(hash_of(Number::Int(0)), hash_of(Number::Real(-0.0)));
    }

    #[test]
    fn test_ordering() {
        assert!(Number::Int(1) < Number::Real(1.5));
        assert!(Number::Real(f64::NEG_INFINITY) < Number::Int(i64::MIN));
        assert_eq!(Number::complex(1.0, 1.0).partial_cmp(&Number::Int(0)), None);
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(Number::Real(3.0).to_integer().unwrap(), 3);
        assert!(matches!(Number::Real(3.5).to_integer(), Err(Error::Domain(_))));
        assert!(matches!(Number::complex(1.0, 1.0).to_real(), Err(Error::Type(_))));
        assert_eq!(Number::complex(1.5, 0.0).to_real().unwrap(), 1.5);
    }

    #[test]
    fn test_sqrt_and_abs() {
        assert_eq!(Number::Int(4).sqrt(), Number::Real(2.0));
        assert_eq!(Number::Int(-4).sqrt(), Number::complex(0.0, 2.0));
        assert_eq!(Number::Int(-3).abs(), Number::Int(3));
        assert_eq!(Number::complex(3.0, 4.0).abs(), Number::Real(5.0));
    }

    #[test]
    fn test_pow() {
        assert_eq!(Number::Int(3).pow(Number::Int(4)), Number::Int(81));
        assert_eq!(Number::Int(2).pow(Number::Int(-1)), Number::Real(0.5));
        assert_eq!(Number::Real(1.5).pow(Number::Int(2)), Number::Real(2.25));
        assert_eq!(Number::Int(9).pow(Number::Real(0.5)), Number::Real(3.0));
        // overflow leaves the integers
        let big = Number::Int(10).pow(Number::Int(20));
        assert!(!big.is_int() && (big.re() / 1e20 - 1.0).abs() < 1e-12);
        let root = Number::Int(-4).pow(Number::Real(0.5));
        assert!(root.is_complex());
        assert!((root.im() - 2.0).abs() < 1e-12 && root.re().abs() < 1e-12);
    }

    #[test]
    fn test_componentwise_extrema() {
        let a = Number::complex(1.0, 5.0);
        let b = Number::complex(3.0, 2.0);
        assert_eq!(a.cmax(b), Number::complex(3.0, 5.0));
        assert_eq!(a.cmin(b), Number::complex(1.0, 2.0));
        assert!(matches!(Number::Int(2).cmax(Number::Int(7)), Number::Int(7)));
        assert!(matches!(Number::Int(2).cmin(Number::Int(7)), Number::Int(2)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::Int(3).to_string(), "3");
        assert_eq!(format!("{:.2}", Number::Real(0.5)), "0.50");
        assert_eq!(Number::complex(1.0, -2.0).to_string(), "(1-2i)");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn int_add_sub_inverse(a in -1_000_000_i64..1_000_000, b in -1_000_000_i64..1_000_000) {
            let x = Number::Int(a) + Number::Int(b) - Number::Int(b);
            prop_assert_eq!(x, Number::Int(a));
        }

        #[test]
        fn mixed_mul_matches_f64(a in -1000_i64..1000, b in -100.0_f64..100.0) {
            let x = Number::Int(a) * Number::Real(b);
            prop_assert!((x.re() - a as f64 * b).abs() < 1e-9);
        }

        #[test]
        fn cmax_dominates(a in -100.0_f64..100.0, b in -100.0_f64..100.0) {
            let m = Number::Real(a).cmax(Number::Real(b));
            prop_assert!(m.re() >= a && m.re() >= b);
        }
    }
}
