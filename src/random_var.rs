//! Random variables and their affine algebra.
//!
//! A [`RandomVar`] is a shared handle to one [`Distribution`] plus an affine
//! transform `Y = (multiplier / divisor) · X + addend`. Every arithmetic
//! operation folds into the same three numbers; nothing is ever nested, and
//! the underlying distribution is never re-derived. Multiplier and divisor are
//! kept apart so that `X / 3 * 3` is exactly `X` on integer transforms.
//!
//! Comparisons do not evaluate anything: they build [`Event`]s whose
//! probability is computed when asked for.
//!
//! ```
//! use hall::distributions::Binomial;
//! use hall::random_var::RandomVar;
//! use hall::stats::{expect, prob, var};
//!
//! let x = RandomVar::new(Binomial::new(4, 0.5).unwrap());
//! let y = x.clone() * 2 + 1;
//! assert_eq!(expect(&y).re(), 5.0);
//! assert_eq!(var(&y).re(), 4.0);
//! assert!((prob(&x.equals(2)).unwrap() - 6.0 / 16.0).abs() < 1e-12);
//! ```

use crate::convolution::Convolution;
use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::event::{Event, EqualityEvent, IntervalEvent};
use crate::interval::Interval;
use crate::number::{is_probability, Number, Probability};
use num_complex::Complex64;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

/// Relative distance within which a transformed point is treated as lying
/// on the integer lattice of a discrete variable.
const LATTICE_SNAP: f64 = 1e-9;

/// Largest denominator tried when matching the lattices of two discrete
/// variables with real scales.
const MAX_STEP_DENOMINATOR: i64 = 64;

/// `Y = (multiplier / divisor) · X + addend` with `X` drawn from a shared
/// distribution.
#[derive(Debug, Clone)]
pub struct RandomVar {
    dist: Arc<dyn Distribution>,
    addend: Number,
    multiplier: Number,
    divisor: Number,
}

impl RandomVar {
    /// Wraps a distribution in the identity transform.
    pub fn new<D: Distribution + 'static>(dist: D) -> Self {
        Self::from_arc(Arc::new(dist))
    }

    /// Wraps an already shared distribution. Variables built from the same
    /// `Arc` are the same variable, not independent copies.
    pub fn from_arc(dist: Arc<dyn Distribution>) -> Self {
        Self {
            dist,
            addend: Number::ZERO,
            multiplier: Number::ONE,
            divisor: Number::ONE,
        }
    }

    pub fn distribution(&self) -> &Arc<dyn Distribution> {
        &self.dist
    }

    pub fn addend(&self) -> Number {
        self.addend
    }

    pub fn multiplier(&self) -> Number {
        self.multiplier
    }

    pub fn divisor(&self) -> Number {
        self.divisor
    }

    /// `multiplier / divisor`.
    pub fn scale(&self) -> Number {
        self.multiplier / self.divisor
    }

    /// `true` once a zero multiplier has collapsed the variable onto `addend`.
    pub fn is_constant(&self) -> bool {
        self.multiplier.is_zero()
    }

    /// `true` if both variables wrap the very same distribution value.
    pub fn shares_distribution(&self, other: &RandomVar) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.dist), Arc::as_ptr(&other.dist))
    }

    /// Structural identity: same distribution value, same transform.
    ///
    /// This is the only equality between random variables; `X == Y` in the
    /// probabilistic sense is the event built by [`equals_var`](Self::equals_var).
    pub fn is_identical(&self, other: &RandomVar) -> bool {
        self.shares_distribution(other)
            && self.addend == other.addend
            && self.scale() == other.scale()
    }

    // ------------------------------------------------------------------
    // Affine algebra (public through `+ - * / neg`)
    // ------------------------------------------------------------------

    fn offset(&self, c: Number) -> RandomVar {
        RandomVar {
            addend: self.addend + c,
            ..self.clone()
        }
    }

    fn scaled(&self, c: Number) -> RandomVar {
        RandomVar {
            addend: self.addend * c,
            multiplier: self.multiplier * c,
            ..self.clone()
        }
    }

    fn divided(&self, c: Number) -> Result<RandomVar> {
        if c.is_zero() {
            return Err(Error::Domain("random variable divided by zero".into()));
        }
        Ok(RandomVar {
            addend: self.addend / c,
            divisor: self.divisor * c,
            ..self.clone()
        })
    }

    /// Sum of two random variables.
    ///
    /// Transforms of the same distribution value fold into one affine
    /// transform. Otherwise the variables are independent and the result is
    /// their lazy [`Convolution`], built on the untransformed laws so that
    /// every discrete operand stays on the integers:
    ///
    /// - two discrete variables with scales `s₁ = k₁·h`, `s₂ = k₂·h` for
    ///   integers `k₁`, `k₂` become `h·(k₁X₁ + k₂X₂) + a₁ + a₂`;
    /// - a discrete `s·X + a₁` plus a continuous `Z + a₂` becomes
    ///   `s·(X + Z/s) + a₁ + a₂`.
    ///
    /// # Errors
    /// [`Error::NotImplemented`] for two discrete variables whose lattices
    /// have no common step (`X + √2·Y`).
    pub fn sum(&self, other: &RandomVar) -> Result<RandomVar> {
        if other.is_constant() {
            return Ok(self.offset(other.addend));
        }
        if self.is_constant() {
            return Ok(other.offset(self.addend));
        }
        if self.shares_distribution(other) {
            return Ok(RandomVar {
                addend: self.addend + other.addend,
                multiplier: self.multiplier * other.divisor + other.multiplier * self.divisor,
                divisor: self.divisor * other.divisor,
                dist: Arc::clone(&self.dist),
            });
        }

        let addend = self.addend + other.addend;
        match (self.is_discrete(), other.is_discrete()) {
            (true, true) => {
                let (k1, k2, num, den) = common_step(self, other).ok_or_else(|| {
                    Error::NotImplemented(format!(
                        "sum of discrete variables on incommensurate lattices (scales {} and {})",
                        self.scale(),
                        other.scale()
                    ))
                })?;
                let lhs = self.base().scaled(Number::Int(k1));
                let rhs = other.base().scaled(Number::Int(k2));
                let lattice = RandomVar::new(Convolution::new(Arc::new(lhs), Arc::new(rhs)));
                Ok(lattice.scaled(num).divided(den)?.offset(addend))
            }
            (true, false) => self.sum_with_continuous(other, addend),
            (false, true) => other.sum_with_continuous(self, addend),
            (false, false) => {
                let lhs: Arc<dyn Distribution> = Arc::new(self.clone());
                let rhs: Arc<dyn Distribution> = Arc::new(other.clone());
                Ok(RandomVar::new(Convolution::new(lhs, rhs)))
            }
        }
    }

    /// `s·(X + Z/s) + addend` for discrete `self = s·X + a₁` and continuous
    /// `other = Z + a₂`.
    fn sum_with_continuous(&self, other: &RandomVar, addend: Number) -> Result<RandomVar> {
        let centred = RandomVar {
            addend: Number::ZERO,
            ..other.clone()
        };
        let rhs = centred.scaled(self.divisor).divided(self.multiplier)?;
        let conv = RandomVar::new(Convolution::new(Arc::new(self.base()), Arc::new(rhs)));
        Ok(conv.scaled(self.multiplier).divided(self.divisor)?.offset(addend))
    }

    /// The underlying distribution under the identity transform.
    fn base(&self) -> RandomVar {
        RandomVar::from_arc(Arc::clone(&self.dist))
    }

    /// `self - other`, see [`sum`](Self::sum).
    pub fn difference(&self, other: &RandomVar) -> Result<RandomVar> {
        self.sum(&-other)
    }

    // ------------------------------------------------------------------
    // Comparisons
    // ------------------------------------------------------------------

    /// `Y <= c`.
    pub fn less_or_equal(&self, c: impl Into<Number>) -> Event {
        IntervalEvent::unchecked(self.clone(), None, Some(c.into()), false).into()
    }

    /// `Y < c`. For a discrete variable this is `Y <= c'` with `c'` the
    /// largest point of its lattice below `c` (`c - d` when `c` is on it).
    pub fn less_than(&self, c: impl Into<Number>) -> Event {
        let c = c.into();
        let bound = if self.is_discrete() { self.lattice_below(c) } else { c };
        self.less_or_equal(bound)
    }

    /// `Y > c`.
    pub fn greater_than(&self, c: impl Into<Number>) -> Event {
        IntervalEvent::unchecked(self.clone(), Some(c.into()), None, false).into()
    }

    /// `Y >= c`, i.e. `Y > c'` with `c'` as in [`less_than`](Self::less_than)
    /// for discrete variables.
    pub fn greater_or_equal(&self, c: impl Into<Number>) -> Event {
        let c = c.into();
        let bound = if self.is_discrete() { self.lattice_below(c) } else { c };
        self.greater_than(bound)
    }

    /// `Y == x`.
    pub fn equals(&self, x: impl Into<Number>) -> Event {
        EqualityEvent::new(self.clone(), x, false).into()
    }

    /// `Y != x`.
    pub fn not_equals(&self, x: impl Into<Number>) -> Event {
        EqualityEvent::new(self.clone(), x, true).into()
    }

    /// `Y == Z`, rewritten as `Y - Z == 0`.
    ///
    /// # Errors
    /// As [`difference`](Self::difference).
    pub fn equals_var(&self, other: &RandomVar) -> Result<Event> {
        Ok(self.difference(other)?.equals(0))
    }

    /// `Y != Z`, rewritten as `Y - Z != 0`.
    ///
    /// # Errors
    /// As [`difference`](Self::difference).
    pub fn not_equals_var(&self, other: &RandomVar) -> Result<Event> {
        Ok(self.difference(other)?.not_equals(0))
    }

    /// Lattice step of the transformed variable: the support's `d` scaled
    /// by `|multiplier / divisor|`.
    pub fn step(&self) -> Number {
        let d = if self.dist.is_discrete() {
            Number::ONE
        } else {
            self.dist.support().d()
        };
        d * self.scale().abs()
    }

    fn lattice_below(&self, c: Number) -> Number {
        if self.is_constant() {
            return if self.addend.re() < c.re() {
                self.addend
            } else {
                c - Number::ONE
            };
        }
        let t = match self.inverse(c).to_real() {
            Ok(t) if t.is_finite() => snap(t),
            _ => return c - self.step(),
        };
        let k = if self.scale().re() > 0.0 {
            t.ceil() - 1.0
        } else {
            t.floor() + 1.0
        };
        self.forward(lattice_number(k))
    }

    // ------------------------------------------------------------------
    // Transform helpers
    // ------------------------------------------------------------------

    fn forward(&self, x: Number) -> Number {
        x * self.multiplier / self.divisor + self.addend
    }

    fn inverse(&self, y: Number) -> Number {
        (y - self.addend) * self.divisor / self.multiplier
    }

    fn increasing(&self) -> bool {
        self.scale().re() > 0.0
    }
}

fn snap(t: f64) -> f64 {
    let r = t.round();
    if (t - r).abs() <= LATTICE_SNAP * r.abs().max(1.0) {
        r
    } else {
        t
    }
}

fn lattice_number(k: f64) -> Number {
    if k.abs() < i64::MAX as f64 {
        Number::Int(k as i64)
    } else {
        Number::Real(k)
    }
}

/// `(k₁, k₂, num, den)` with integer weights `kᵢ` such that each scale is
/// `kᵢ · num / den`, or `None` if the two lattices share no step.
fn common_step(x: &RandomVar, y: &RandomVar) -> Option<(i64, i64, Number, Number)> {
    let exact = match (x.multiplier, x.divisor, y.multiplier, y.divisor) {
        (Number::Int(m1), Number::Int(d1), Number::Int(m2), Number::Int(d2)) => {
            rational_step(m1, d1, m2, d2)
        }
        _ => None,
    };
    exact.or_else(|| real_step(x.scale().to_real().ok()?, y.scale().to_real().ok()?))
}

/// `m₁/d₁ = k₁·g/(d₁d₂)` and `m₂/d₂ = k₂·g/(d₁d₂)` with `g` the gcd of the
/// cross products.
fn rational_step(m1: i64, d1: i64, m2: i64, d2: i64) -> Option<(i64, i64, Number, Number)> {
    let (a, b) = (m1.checked_mul(d2)?, m2.checked_mul(d1)?);
    let g = i64::try_from(gcd(a.unsigned_abs(), b.unsigned_abs())).ok()?;
    let den = d1.checked_mul(d2)?;
    Some((a / g, b / g, Number::Int(g), Number::Int(den)))
}

/// Real scales share a step when their ratio is a fraction `k₁/q` with
/// `q <= MAX_STEP_DENOMINATOR`.
fn real_step(s1: f64, s2: f64) -> Option<(i64, i64, Number, Number)> {
    let r = s1 / s2;
    if !r.is_finite() || r == 0.0 {
        return None;
    }
    (1..=MAX_STEP_DENOMINATOR).find_map(|q| {
        let k = snap(r * q as f64);
        (k != 0.0 && k.fract() == 0.0 && k.abs() < (1u64 << 53) as f64)
            .then(|| (k as i64, q, Number::Real(s2 / q as f64), Number::ONE))
    })
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Distribution for RandomVar {
    fn is_discrete(&self) -> bool {
        self.dist.is_discrete()
    }

    /// The underlying support pushed through the transform.
    fn support(&self) -> Interval {
        self.dist.support().scale(self.scale()).shift(self.addend)
    }

    fn mean(&self) -> Number {
        self.forward(self.dist.mean())
    }

    fn variance(&self) -> Number {
        self.dist.variance() * self.multiplier * self.multiplier / (self.divisor * self.divisor)
    }

    fn density(&self, x: f64) -> Result<f64> {
        self.pdf(Number::Real(x))
    }

    fn cumulative(&self, x: f64) -> Result<f64> {
        self.cdf(Number::Real(x))
    }

    fn percent_point(&self, p: Probability) -> Result<Number> {
        self.ppf(p)
    }

    /// Membership in the transformed support. For discrete variables only
    /// the points of the transformed lattice are members.
    fn contains(&self, x: Number) -> bool {
        if self.is_constant() {
            return x == self.addend;
        }
        let t = self.inverse(x);
        if !self.is_discrete() {
            return self.dist.support().contains(t);
        }
        match t.to_real() {
            Ok(t) if t.is_finite() => {
                let k = snap(t);
                k.fract() == 0.0 && self.dist.support().contains(Number::Real(k))
            }
            _ => false,
        }
    }

    /// PMF or PDF at `x`.
    ///
    /// Discrete variables look up the mass of the lattice point `x` maps
    /// back to; points off the lattice have mass 0. Densities include the
    /// `1 / |scale|` change-of-variables factor.
    fn pdf(&self, x: Number) -> Result<f64> {
        if self.is_constant() {
            return Ok(if x == self.addend { 1.0 } else { 0.0 });
        }
        let t = self.inverse(x);
        if self.is_discrete() {
            let t = t.to_real()?;
            if t.is_nan() {
                return Err(Error::Domain("random variable evaluated at NaN".into()));
            }
            let k = snap(t);
            if !k.is_finite() || k.fract() != 0.0 {
                return Ok(0.0);
            }
            return self.dist.pdf(Number::Real(k));
        }
        let jacobian = self.scale().abs().re();
        Ok(self.dist.pdf(t)? / jacobian)
    }

    /// CDF at `x`.
    ///
    /// A discrete CDF is a step function, so the transformed point is
    /// snapped to the lattice and then floored. A negative scale reflects
    /// the law: `F_Y(y) = 1 - F_X(t⁻)` with `t` the inverse image of `y`.
    fn cdf(&self, x: Number) -> Result<f64> {
        if self.is_constant() {
            return Ok(if x.to_real()? >= self.addend.re() { 1.0 } else { 0.0 });
        }
        let t = self.inverse(x).to_real()?;
        if t.is_nan() {
            return Err(Error::Domain("random variable evaluated at NaN".into()));
        }
        match (self.is_discrete(), self.increasing()) {
            (true, true) => self.dist.cdf(Number::Real(snap(t).floor())),
            (true, false) => Ok(1.0 - self.dist.cdf(Number::Real(snap(t).ceil() - 1.0))?),
            (false, true) => self.dist.cdf(Number::Real(t)),
            (false, false) => Ok(1.0 - self.dist.cdf(Number::Real(t))?),
        }
    }

    /// Quantile: the underlying quantile (of `1 - p` under a negative scale)
    /// pushed through the transform.
    fn ppf(&self, p: Probability) -> Result<Number> {
        if !is_probability(p) {
            return Err(Error::Domain(format!("p = {p} is not a probability")));
        }
        if self.is_constant() {
            return Ok(self.addend);
        }
        let q = if self.increasing() { p } else { 1.0 - p };
        Ok(self.forward(self.dist.ppf(q)?))
    }
}

impl PartialEq for RandomVar {
    /// Same as [`RandomVar::is_identical`].
    fn eq(&self, other: &RandomVar) -> bool {
        self.is_identical(other)
    }
}

impl Eq for RandomVar {}

impl Hash for RandomVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.dist) as *const () as usize).hash(state);
        self.addend.hash(state);
        self.scale().hash(state);
    }
}

impl fmt::Display for RandomVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, d) = (self.multiplier, self.divisor);
        if self.is_constant() {
            return write!(f, "{}", self.addend);
        }
        match (m == Number::ONE, m == Number::Int(-1), d == Number::ONE) {
            (true, _, true) => write!(f, "X")?,
            (_, true, true) => write!(f, "-X")?,
            (_, _, true) => write!(f, "{m}X")?,
            (true, _, false) => write!(f, "X/{d}")?,
            _ => write!(f, "{m}X/{d}")?,
        }
        let a = self.addend;
        if a.is_zero() {
            Ok(())
        } else if !a.is_complex() && a.re() < 0.0 {
            write!(f, " - {}", -a)
        } else {
            write!(f, " + {a}")
        }
    }
}

// ----------------------------------------------------------------------
// Operator sugar
// ----------------------------------------------------------------------

macro_rules! scalar_ops {
    ($($t:ty),*) => {$(
        impl Add<$t> for RandomVar {
            type Output = RandomVar;
            fn add(self, c: $t) -> RandomVar {
                self.offset(c.into())
            }
        }

        impl Add<$t> for &RandomVar {
            type Output = RandomVar;
            fn add(self, c: $t) -> RandomVar {
                self.offset(c.into())
            }
        }

        impl Sub<$t> for RandomVar {
            type Output = RandomVar;
            fn sub(self, c: $t) -> RandomVar {
                self.offset(-Number::from(c))
            }
        }

        impl Sub<$t> for &RandomVar {
            type Output = RandomVar;
            fn sub(self, c: $t) -> RandomVar {
                self.offset(-Number::from(c))
            }
        }

        impl Mul<$t> for RandomVar {
            type Output = RandomVar;
            fn mul(self, c: $t) -> RandomVar {
                self.scaled(c.into())
            }
        }

        impl Mul<$t> for &RandomVar {
            type Output = RandomVar;
            fn mul(self, c: $t) -> RandomVar {
                self.scaled(c.into())
            }
        }

        impl Div<$t> for RandomVar {
            type Output = Result<RandomVar>;
            fn div(self, c: $t) -> Result<RandomVar> {
                self.divided(c.into())
            }
        }

        impl Div<$t> for &RandomVar {
            type Output = Result<RandomVar>;
            fn div(self, c: $t) -> Result<RandomVar> {
                self.divided(c.into())
            }
        }
    )*};
}

scalar_ops!(i64, f64, Number, Complex64);

macro_rules! scalar_lhs_ops {
    ($($t:ty),*) => {$(
        impl Add<RandomVar> for $t {
            type Output = RandomVar;
            fn add(self, x: RandomVar) -> RandomVar {
                x.offset(self.into())
            }
        }

        impl Sub<RandomVar> for $t {
            type Output = RandomVar;
            fn sub(self, x: RandomVar) -> RandomVar {
                (-x).offset(self.into())
            }
        }

        impl Mul<RandomVar> for $t {
            type Output = RandomVar;
            fn mul(self, x: RandomVar) -> RandomVar {
                x.scaled(self.into())
            }
        }
    )*};
}

scalar_lhs_ops!(i64, f64);

impl Neg for RandomVar {
    type Output = RandomVar;
    fn neg(self) -> RandomVar {
        self.scaled(Number::Int(-1))
    }
}

impl Neg for &RandomVar {
    type Output = RandomVar;
    fn neg(self) -> RandomVar {
        self.scaled(Number::Int(-1))
    }
}

impl Add<RandomVar> for RandomVar {
    type Output = Result<RandomVar>;
    fn add(self, other: RandomVar) -> Result<RandomVar> {
        self.sum(&other)
    }
}

impl Add<&RandomVar> for &RandomVar {
    type Output = Result<RandomVar>;
    fn add(self, other: &RandomVar) -> Result<RandomVar> {
        self.sum(other)
    }
}

impl Sub<RandomVar> for RandomVar {
    type Output = Result<RandomVar>;
    fn sub(self, other: RandomVar) -> Result<RandomVar> {
        self.difference(&other)
    }
}

impl Sub<&RandomVar> for &RandomVar {
    type Output = Result<RandomVar>;
    fn sub(self, other: &RandomVar) -> Result<RandomVar> {
        self.difference(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributions::{Bernoulli, Binomial, Normal, Uniform};
    use approx::assert_relative_eq;

    fn binomial(n: i64, p: f64) -> RandomVar {
        RandomVar::new(Binomial::new(n, p).unwrap())
    }

    fn normal(mu: f64, sigma: f64) -> RandomVar {
        RandomVar::new(Normal::new(mu, sigma).unwrap())
    }

    // --- affine algebra ---

    #[test]
    fn test_transforms_fold_into_one_triple() {
        let x = binomial(4, 0.5);
        let y = ((&x * 3 + 2).div(3).unwrap() - 1).neg();
        assert_eq!(y.multiplier(), Number::Int(-3));
        assert_eq!(y.divisor(), Number::Int(3));
        assert!(y.shares_distribution(&x));
        // -(X + 2/3 - 1)
        assert_relative_eq!(y.addend().re(), 1.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn test_division_round_trip_is_exact() {
        let x = binomial(10, 0.3);
        let y = (&x / 3).unwrap() * 3 + 0;
        assert_eq!(y.scale(), Number::ONE);
        assert_relative_eq!(y.mean().re(), x.mean().re(), epsilon = 1e-15);
    }

    #[test]
    fn test_div_by_zero() {
        let x = normal(0.0, 1.0);
        assert!(matches!(&x / 0.0, Err(Error::Domain(_))));
        assert!(matches!(x / 0, Err(Error::Domain(_))));
    }

    #[test]
    fn test_affine_moments() {
        let x = normal(1.0, 2.0);
        let y = 3.0 * x.clone() - 4.0;
        assert_relative_eq!(y.mean().re(), -1.0);
        assert_relative_eq!(y.variance().re(), 36.0);
        assert_relative_eq!(y.std_dev().re(), 6.0);

        let z = x.div(2).unwrap();
        assert_relative_eq!(z.variance().re(), 1.0);
    }

    #[test]
    fn test_integer_transform_keeps_exact_moments() {
        let u = RandomVar::new(Uniform::new(-5, 5).unwrap());
        let y = &u * 2 + 1;
        assert_eq!(y.mean(), Number::Int(1));
        assert_eq!(y.variance(), Number::Int(40));
    }

    #[test]
    fn test_left_hand_scalars() {
        let x = binomial(4, 0.5);
        assert_eq!((10 - x.clone()).mean().re(), 8.0);
        assert_eq!((1 + x.clone()).mean().re(), 3.0);
        assert_eq!((2 * x).mean().re(), 4.0);
    }

    // --- support ---

    #[test]
    fn test_transformed_support() {
        let x = binomial(4, 0.5);
        let y = &x * -2 + 1;
        assert_eq!(y.support(), Interval::new(-7, 1).unwrap());
        assert!(y.contains(Number::Int(-7)));
        assert!(y.contains(Number::Int(1)));
        assert!(y.contains(Number::Int(-1)));
        assert!(!y.contains(Number::Int(0)));
        assert!(!y.contains(Number::Int(3)));
    }

    #[test]
    fn test_support_endpoints_are_members() {
        let x = binomial(9, 0.2);
        let s = x.support();
        assert!(x.contains(s.a()));
        assert!(x.contains(s.b()));
        assert!(!x.contains(Number::Int(10)));
    }

    #[test]
    fn test_zero_multiplier_is_constant() {
        let x = normal(0.0, 1.0);
        let c = &x * 0 + 5;
        assert!(c.is_constant());
        assert_eq!(c.support(), Interval::point(5.0).unwrap());
        assert_eq!(c.mean().re(), 5.0);
        assert_eq!(c.variance().re(), 0.0);
        assert_eq!(c.cdf(Number::Real(4.9)).unwrap(), 0.0);
        assert_eq!(c.cdf(Number::Real(5.0)).unwrap(), 1.0);
        assert_eq!(c.ppf(0.3).unwrap(), Number::Int(5));
    }

    // --- evaluation ---

    #[test]
    fn test_pdf_follows_lattice() {
        let y = binomial(4, 0.5) * 2;
        assert_relative_eq!(y.pdf(Number::Int(4)).unwrap(), 6.0 / 16.0, epsilon = 1e-15);
        assert_eq!(y.pdf(Number::Int(3)).unwrap(), 0.0);
        assert_eq!(y.pdf(Number::Int(10)).unwrap(), 0.0);
        // rounding error in the inverse is absorbed
        let z = binomial(4, 0.5).div(3).unwrap();
        assert_relative_eq!(z.pdf(Number::Real(2.0 / 3.0)).unwrap(), 6.0 / 16.0, epsilon = 1e-15);
    }

    #[test]
    fn test_density_change_of_variables() {
        let y = normal(0.0, 1.0) * 2.0;
        let reference = Normal::new(0.0, 2.0).unwrap();
        for x in [-3.0, -0.5, 0.0, 1.2, 4.0] {
            assert_relative_eq!(
                y.pdf(Number::Real(x)).unwrap(),
                reference.pdf(Number::Real(x)).unwrap(),
                epsilon = 1e-14
            );
        }
    }

    #[test]
    fn test_cdf_floors_between_lattice_points() {
        let x = binomial(4, 0.5);
        assert_relative_eq!(x.cdf(Number::Real(1.5)).unwrap(), 5.0 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(x.cdf(Number::Real(1.0 - 1e-12)).unwrap(), 5.0 / 16.0, epsilon = 1e-12);
        assert_eq!(x.cdf(Number::Real(-0.5)).unwrap(), 0.0);
    }

    #[test]
    fn test_negative_scale_reflects_cdf() {
        let x = binomial(4, 0.5);
        let y = -x;
        // P[-X <= -3] = P[X >= 3] = 5/16
        assert_relative_eq!(y.cdf(Number::Int(-3)).unwrap(), 5.0 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(y.cdf(Number::Real(-2.5)).unwrap(), 5.0 / 16.0, epsilon = 1e-12);
        assert_eq!(y.cdf(Number::Int(0)).unwrap(), 1.0);
        assert_eq!(y.cdf(Number::Int(-5)).unwrap(), 0.0);

        let n = -normal(1.0, 1.0);
        assert_relative_eq!(n.cdf(Number::Real(-1.0)).unwrap(), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_ppf_transforms_forward() {
        let x = normal(0.0, 1.0) * 2.0 + 10.0;
        assert_relative_eq!(x.ppf(0.5).unwrap().re(), 10.0, epsilon = 1e-9);
        let b = binomial(4, 0.5) + 100;
        assert_eq!(b.ppf(0.5).unwrap(), Number::Int(102));
        assert!(matches!(b.ppf(2.0), Err(Error::Domain(_))));
    }

    #[test]
    fn test_complex_argument_is_type_error() {
        let x = normal(0.0, 1.0);
        assert!(matches!(x.cdf(Number::complex(0.0, 1.0)), Err(Error::Type(_))));
    }

    // --- comparisons ---

    #[test]
    fn test_discrete_strict_bounds_shift_by_step() {
        let x = binomial(4, 0.5);
        assert_relative_eq!(x.less_than(2).p().unwrap(), 5.0 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(x.greater_or_equal(2).p().unwrap(), 11.0 / 16.0, epsilon = 1e-12);
        // off-lattice constants use the lattice point below
        assert_relative_eq!(x.less_than(2.5).p().unwrap(), 11.0 / 16.0, epsilon = 1e-12);
        assert_eq!(x.less_than(0).p().unwrap(), 0.0);

        let y = &x * 2;
        assert_eq!(y.step(), Number::Int(2));
        assert_relative_eq!(y.less_than(4).p().unwrap(), 5.0 / 16.0, epsilon = 1e-12);
    }

    #[test]
    fn test_continuous_strict_equals_non_strict() {
        let x = normal(0.0, 1.0);
        assert_eq!(x.less_than(0.3).p().unwrap(), x.less_or_equal(0.3).p().unwrap());
        assert_eq!(x.greater_or_equal(0.3).p().unwrap(), x.greater_than(0.3).p().unwrap());
        assert_eq!(x.step(), Number::Real(f64::EPSILON));
    }

    #[test]
    fn test_equality_with_itself() {
        let x = normal(0.0, 1.0);
        assert_eq!(x.equals_var(&x).unwrap().p().unwrap(), 1.0);
        assert_eq!(x.not_equals_var(&x).unwrap().p().unwrap(), 0.0);
        let b = binomial(3, 0.5);
        assert_eq!(b.equals_var(&(&b + 1)).unwrap().p().unwrap(), 0.0);
    }

    #[test]
    fn test_same_base_sum_folds() {
        let x = binomial(4, 0.5);
        let y = (&x + &(&x * 2)).unwrap();
        assert!(y.shares_distribution(&x));
        assert_eq!(y.scale(), Number::Int(3));
    }

    #[test]
    fn test_independent_bernoulli_equality() {
        let x = RandomVar::new(Bernoulli::new(0.5).unwrap());
        let y = RandomVar::new(Bernoulli::new(0.5).unwrap());
        assert_relative_eq!(x.equals_var(&y).unwrap().p().unwrap(), 0.5, epsilon = 1e-12);
    }

    fn bernoulli(p: f64) -> RandomVar {
        RandomVar::new(Bernoulli::new(p).unwrap())
    }

    #[test]
    fn test_sum_keeps_shifted_lattice() {
        let (x, y) = (bernoulli(0.5), bernoulli(0.5));
        let z = (x + (y + 0.5)).unwrap();
        assert_relative_eq!(z.less_or_equal(0.5).p().unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(z.less_or_equal(1.5).p().unwrap(), 0.75, epsilon = 1e-12);
        assert_relative_eq!(z.equals(1.5).p().unwrap(), 0.5, epsilon = 1e-12);
        assert_eq!(z.equals(1).p().unwrap(), 0.0);
        assert_relative_eq!(z.mean().re(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_sum_of_different_steps() {
        let (x, y) = (bernoulli(0.5), bernoulli(0.5));
        // X/2 + Y takes 0, 0.5, 1, 1.5 with equal mass
        let w = (&x / 2).unwrap().sum(&y).unwrap();
        assert_relative_eq!(w.equals(0.5).p().unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(w.equals(1).p().unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(w.less_or_equal(0.5).p().unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(w.less_than(1.5).p().unwrap(), 0.75, epsilon = 1e-12);

        let real = (&x * 0.5).sum(&y).unwrap();
        assert_relative_eq!(real.equals(0.5).p().unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(real.less_or_equal(0.5).p().unwrap(), 0.5, epsilon = 1e-12);

        // 1.5X + Y lives on multiples of 0.5: {0, 1, 1.5, 2.5}
        let v = (&x * 1.5).sum(&y).unwrap();
        assert_relative_eq!(v.equals(1.5).p().unwrap(), 0.25, epsilon = 1e-12);
        assert_eq!(v.equals(0.5).p().unwrap(), 0.0);
        assert_relative_eq!(v.less_or_equal(2).p().unwrap(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_sum_of_incommensurate_lattices() {
        let (x, y) = (bernoulli(0.5), bernoulli(0.5));
        let r = (&x * 2f64.sqrt()).sum(&y);
        assert!(matches!(r, Err(Error::NotImplemented(_))));
    }

    #[test]
    fn test_shifted_discrete_plus_continuous() {
        let y = bernoulli(0.5);
        let n = normal(0.0, 1.0);
        let phi = |x: f64| Normal::standard().cdf(Number::Real(x)).unwrap();

        let z = ((&y + 0.5) + n.clone()).unwrap();
        assert!(!z.is_discrete());
        assert_relative_eq!(
            z.less_or_equal(0.5).p().unwrap(),
            0.5 * phi(0.0) + 0.5 * phi(-1.0),
            epsilon = 1e-9
        );

        // 2Y + N is symmetric about 1
        let w = ((&y * 2) + n).unwrap();
        assert_relative_eq!(w.less_or_equal(1).p().unwrap(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(w.mean().re(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_integer_literal_sugar() {
        let x = binomial(4, 0.5);
        let y = 2 * x.clone() + 1;
        assert_eq!(y.mean().re(), 5.0);
        let z = (&x * 3 - 2).div(3).unwrap();
        assert_relative_eq!(z.mean().re(), 4.0 / 3.0, epsilon = 1e-12);
        assert_eq!((1 - x).mean().re(), -1.0);
    }

    // --- identity ---

    #[test]
    fn test_structural_identity() {
        let x = binomial(4, 0.5);
        assert!(x.is_identical(&x.clone()));
        assert!((&x * 2).is_identical(&(&x * 4).div(2).unwrap()));
        assert!(!x.is_identical(&(&x + 1)));
        assert!(!x.is_identical(&binomial(4, 0.5)));
    }

    #[test]
    fn test_display() {
        let x = binomial(4, 0.5);
        assert_eq!(x.to_string(), "X");
        assert_eq!((&x * 2 + 1).to_string(), "2X + 1");
        assert_eq!((-&x - 1).to_string(), "-X - 1");
        assert_eq!(x.div(3).unwrap().to_string(), "X/3");
    }
}
