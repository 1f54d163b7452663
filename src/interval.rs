//! Closed intervals over [`Number`], used as distribution supports.
//!
//! An interval is `[a, b]` with `a.re <= b.re` and `a.im <= b.im`: the real
//! and imaginary axes are bounded independently, so a complex interval is
//! an axis-aligned rectangle. Endpoints may be infinite; they are never NaN.
//!
//! Scalar comparisons treat the interval as a (possibly degenerate) value:
//! `I < x` holds when the whole interval lies below `x` on either axis.

use crate::error::{Error, Result};
use crate::number::Number;
use std::fmt;

/// Closed interval `[a, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Hash)]
pub struct Interval {
    a: Number,
    b: Number,
}

// Endpoints are never NaN, so equality is reflexive.
impl Eq for Interval {}

impl Interval {
    /// Creates `[a, b]`, swapping the bounds if they are given in reverse.
    ///
    /// For complex endpoints the real parts and the imaginary parts are
    /// ordered independently.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if either bound is NaN.
    ///
    /// # Examples
    /// ```
    /// use hall::interval::Interval;
    /// use hall::number::Number;
    /// let i = Interval::new(3, -2).unwrap();
    /// assert_eq!(i.a(), Number::Int(-2));
    /// assert_eq!(i.b(), Number::Int(3));
    /// assert!(Interval::new(0.0, f64::NAN).is_err());
    /// ```
    pub fn new(a: impl Into<Number>, b: impl Into<Number>) -> Result<Self> {
        let (a, b) = (a.into(), b.into());
        if a.is_nan() || b.is_nan() {
            return Err(Error::InvalidParameters(format!(
                "interval bounds must not be NaN, got [{a}, {b}]"
            )));
        }
        Ok(Self::ordered(a, b))
    }

    /// `[a, b]` over the integers.
    pub fn integers(a: i64, b: i64) -> Self {
        Self::ordered(Number::Int(a), Number::Int(b))
    }

    /// `(-∞, +∞)` over the reals.
    pub fn real_line() -> Self {
        Self {
            a: Number::Real(f64::NEG_INFINITY),
            b: Number::Real(f64::INFINITY),
        }
    }

    /// The degenerate interval `[x, x]`.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if `x` is NaN.
    pub fn point(x: impl Into<Number>) -> Result<Self> {
        let x = x.into();
        Self::new(x, x)
    }

    fn ordered(a: Number, b: Number) -> Self {
        if a.is_complex() || b.is_complex() {
            let (re_lo, re_hi) = minmax(a.re(), b.re());
            let (im_lo, im_hi) = minmax(a.im(), b.im());
            return Self {
                a: Number::complex(re_lo, im_lo),
                b: Number::complex(re_hi, im_hi),
            };
        }
        if b < a {
            Self { a: b, b: a }
        } else {
            Self { a, b }
        }
    }

    /// Lower bound.
    pub fn a(&self) -> Number {
        self.a
    }

    /// Upper bound.
    pub fn b(&self) -> Number {
        self.b
    }

    pub fn is_complex(&self) -> bool {
        self.a.is_complex() || self.b.is_complex()
    }

    /// `true` if both endpoints are integers; such an interval only holds
    /// integral values.
    pub fn is_discrete(&self) -> bool {
        self.a.is_int() && self.b.is_int()
    }

    pub fn is_bounded(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }

    pub fn is_degenerate(&self) -> bool {
        self.a == self.b
    }

    /// `b - a`.
    pub fn size(&self) -> Number {
        self.b - self.a
    }

    /// Half the size.
    pub fn radius(&self) -> Number {
        self.size() / Number::Int(2)
    }

    /// Midpoint `(a + b) / 2`.
    pub fn mid(&self) -> Number {
        (self.a + self.b) / Number::Int(2)
    }

    /// Smallest step between two distinct values of the domain: `1` for
    /// integer intervals, machine epsilon otherwise (on both axes for
    /// complex intervals).
    pub fn d(&self) -> Number {
        if self.is_discrete() {
            Number::ONE
        } else if self.is_complex() {
            Number::complex(f64::EPSILON, f64::EPSILON)
        } else {
            Number::Real(f64::EPSILON)
        }
    }

    /// Membership. A discrete interval only contains whole numbers.
    ///
    /// # Examples
    /// ```
    /// use hall::interval::Interval;
    /// let i = Interval::new(0, 4).unwrap();
    /// assert!(i.contains(2));
    /// assert!(i.contains(4.0));
    /// assert!(!i.contains(2.5));
    /// assert!(!i.contains(5));
    /// ```
    pub fn contains(&self, x: impl Into<Number>) -> bool {
        let x = x.into();
        if x.is_nan() || (self.is_discrete() && !x.is_integral()) {
            return false;
        }
        self.a.re() <= x.re()
            && x.re() <= self.b.re()
            && self.a.im() <= x.im()
            && x.im() <= self.b.im()
    }

    /// `true` if `other` lies entirely within `self`.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.contains(other.a) && self.contains(other.b)
    }

    /// `I < x`: the interval lies below `x` on either axis.
    pub fn lt_scalar(&self, x: impl Into<Number>) -> bool {
        let x = x.into();
        self.b.re() < x.re() || self.b.im() < x.im()
    }

    /// `I > x`: the interval lies above `x` on either axis.
    pub fn gt_scalar(&self, x: impl Into<Number>) -> bool {
        let x = x.into();
        self.a.re() > x.re() || self.a.im() > x.im()
    }

    /// `I == x`: the interval is the single point `x`.
    pub fn eq_scalar(&self, x: impl Into<Number>) -> bool {
        self.is_degenerate() && self.a == x.into()
    }

    pub fn le_scalar(&self, x: impl Into<Number>) -> bool {
        let x = x.into();
        self.eq_scalar(x) || self.lt_scalar(x)
    }

    pub fn ge_scalar(&self, x: impl Into<Number>) -> bool {
        let x = x.into();
        self.eq_scalar(x) || self.gt_scalar(x)
    }

    /// Disjointness, tested per axis.
    ///
    /// The last clause compares the two lower imaginary bounds rather than
    /// `self.b.im` against `other.a.im`; supports of existing laws rely on
    /// that edge behavior for complex intervals.
    pub fn is_disjoint(&self, other: &Interval) -> bool {
        self.a.re() > other.b.re()
            || self.a.im() > other.b.im()
            || self.b.re() < other.a.re()
            || self.a.im() < other.a.im()
    }

    /// Overlap of two intervals, or `None` if they are disjoint.
    ///
    /// # Examples
    /// ```
    /// use hall::interval::Interval;
    /// let i = Interval::new(0, 5).unwrap();
    /// let j = Interval::new(3, 9).unwrap();
    /// assert_eq!(i.intersect(&j), Some(Interval::new(3, 5).unwrap()));
    /// assert_eq!(i.intersect(&Interval::new(6, 7).unwrap()), None);
    /// ```
    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        if self.is_disjoint(other) {
            return None;
        }
        Some(Self::ordered(self.a.cmax(other.a), self.b.cmin(other.b)))
    }

    /// Smallest interval covering both.
    ///
    /// # Errors
    /// [`Error::NotImplemented`] if the intervals are disjoint: the gap
    /// between them cannot be represented by a single interval.
    pub fn union(&self, other: &Interval) -> Result<Interval> {
        if self.is_disjoint(other) {
            return Err(Error::NotImplemented(format!(
                "union of disjoint intervals {self} and {other}"
            )));
        }
        Ok(Self::ordered(self.a.cmin(other.a), self.b.cmax(other.b)))
    }

    /// `[a + c, b + c]`.
    pub fn shift(&self, c: impl Into<Number>) -> Interval {
        let c = c.into();
        Self::ordered(self.a + c, self.b + c)
    }

    /// `[a·k, b·k]`, reordered when `k` is negative. Scaling by zero gives
    /// the point `[0, 0]` even for unbounded intervals.
    pub fn scale(&self, k: impl Into<Number>) -> Interval {
        let k = k.into();
        if k.is_zero() {
            let zero = if self.is_discrete() && k.is_int() {
                Number::ZERO
            } else {
                Number::Real(0.0)
            };
            return Self { a: zero, b: zero };
        }
        Self::ordered(self.a * k, self.b * k)
    }

    /// Endpoint-wise sum, the support of a sum of independent variables.
    pub fn add(&self, other: &Interval) -> Interval {
        Self::ordered(self.a + other.a, self.b + other.b)
    }

    // Endpoint-wise arithmetic pairs `a` with `other.a` and `b` with
    // `other.b`. It is not the hull of every pointwise result except on
    // monotone combinations such as non-negative products.

    /// `[a - a', b - b']`, reordered.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if an endpoint is indeterminate (`∞ - ∞`).
    pub fn sub(&self, other: &Interval) -> Result<Interval> {
        Self::new(self.a - other.a, self.b - other.b)
    }

    /// `[a·a', b·b']`, reordered.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if an endpoint is indeterminate (`0·∞`).
    pub fn mul(&self, other: &Interval) -> Result<Interval> {
        Self::new(self.a * other.a, self.b * other.b)
    }

    /// `[a / a', b / b']`, reordered.
    ///
    /// # Errors
    /// - [`Error::Domain`] if either endpoint of `other` is zero.
    /// - [`Error::InvalidParameters`] if an endpoint is indeterminate.
    ///
    /// # Examples
    /// ```
    /// use hall::interval::Interval;
    /// let i = Interval::new(2, 12).unwrap();
    /// let j = Interval::new(1, 4).unwrap();
    /// assert_eq!(i.div(&j).unwrap(), Interval::new(2, 3).unwrap());
    /// assert!(i.div(&Interval::new(0, 1).unwrap()).is_err());
    /// ```
    pub fn div(&self, other: &Interval) -> Result<Interval> {
        if other.a.is_zero() || other.b.is_zero() {
            return Err(Error::Domain(format!(
                "{self} divided by {other}, which has a zero endpoint"
            )));
        }
        Self::new(self.a / other.a, self.b / other.b)
    }

    /// `[a^a', b^b']`, reordered.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if an endpoint is indeterminate.
    pub fn pow(&self, other: &Interval) -> Result<Interval> {
        Self::new(self.a.pow(other.a), self.b.pow(other.b))
    }

    /// `[c - b, c - a]`.
    pub fn sub_from(&self, c: impl Into<Number>) -> Interval {
        let c = c.into();
        Self::ordered(c - self.b, c - self.a)
    }

    /// `[a / c, b / c]`, reordered when `c` is negative.
    ///
    /// # Errors
    /// [`Error::Domain`] if `c` is zero.
    pub fn div_scalar(&self, c: impl Into<Number>) -> Result<Interval> {
        let c = c.into();
        if c.is_zero() {
            return Err(Error::Domain(format!("{self} divided by zero")));
        }
        Self::new(self.a / c, self.b / c)
    }

    /// `[a^c, b^c]`, reordered.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if an endpoint is indeterminate.
    pub fn pow_scalar(&self, c: impl Into<Number>) -> Result<Interval> {
        let c = c.into();
        Self::new(self.a.pow(c), self.b.pow(c))
    }
}

impl std::ops::Neg for Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        Interval::ordered(-self.b, -self.a)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "[{:.p$}, {:.p$}]", self.a, self.b),
            None => write!(f, "[{}, {}]", self.a, self.b),
        }
    }
}

fn minmax(x: f64, y: f64) -> (f64, f64) {
    if y < x {
        (y, x)
    } else {
        (x, y)
    }
}
