//! Query operators over random variables and events.
//!
//! The notation of probability theory as functions: [`prob`] is `P[·]`,
//! [`expect`] is `E[·]`, then [`var`], [`std_dev`], [`cov`], [`corr`] and
//! [`sample`]. Everything here is a thin layer over the
//! [`Distribution`] contract of a [`RandomVar`]; the work happens in the
//! variable's transform and the underlying distribution.
//!
//! [`descriptive`] holds the running accumulators shared with numeric
//! summation.
//!
//! ```
//! use hall::distributions::Normal;
//! use hall::random_var::RandomVar;
//! use hall::stats::{expect, prob, std_dev};
//!
//! let x = RandomVar::new(Normal::new(1.0, 2.0).unwrap());
//! let y = x.clone() * 3 - 3;
//! assert_eq!(expect(&y).re(), 0.0);
//! assert_eq!(std_dev(&y).re(), 6.0);
//! assert!((prob(&y.less_or_equal(0)).unwrap() - 0.5).abs() < 1e-12);
//! ```

pub mod descriptive;

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::number::{Number, Probability};
use crate::random::uniform_sample;
use crate::random_var::RandomVar;
use rand::Rng;

/// Anything `P[·]` can be asked about.
pub trait Query {
    fn probability(&self) -> Result<Probability>;
}

impl Query for Event {
    fn probability(&self) -> Result<Probability> {
        self.p()
    }
}

/// A bare variable stands for the event `X != 0`.
impl Query for RandomVar {
    fn probability(&self) -> Result<Probability> {
        self.not_equals(0).p()
    }
}

/// `P[event]`, or `P[X != 0]` for a random variable.
///
/// # Examples
/// ```
/// use hall::distributions::Bernoulli;
/// use hall::random_var::RandomVar;
/// use hall::stats::prob;
/// let x = RandomVar::new(Bernoulli::new(0.4).unwrap());
/// assert!((prob(&x).unwrap() - 0.4).abs() < 1e-15);
/// assert!((prob(&!x.equals(1)).unwrap() - 0.6).abs() < 1e-15);
/// ```
pub fn prob<Q: Query + ?Sized>(query: &Q) -> Result<Probability> {
    query.probability()
}

/// `E[X]`.
pub fn expect(x: &RandomVar) -> Number {
    x.mean()
}

/// `Var[X]`.
pub fn var(x: &RandomVar) -> Number {
    x.variance()
}

/// `Std[X] = √Var[X]`.
pub fn std_dev(x: &RandomVar) -> Number {
    x.std_dev()
}

/// `Cov[X, Y]`.
///
/// Only defined where no joint law is needed: when either side is a
/// constant (0), or when both are transforms of the same underlying
/// variable (`a·c·Var[Z]` for `X = aZ + b`, `Y = cZ + d`).
///
/// # Errors
/// [`Error::NotImplemented`] for variables over different distributions.
pub fn cov(x: &RandomVar, y: &RandomVar) -> Result<Number> {
    if x.is_constant() || y.is_constant() {
        return Ok(Number::Int(0));
    }
    if !x.shares_distribution(y) {
        return Err(Error::NotImplemented(format!(
            "covariance of {x} and {y} needs their joint distribution"
        )));
    }
    Ok(x.scale() * y.scale() * x.distribution().variance())
}

/// `Corr[X, Y] = Cov[X, Y] / (Std[X]·Std[Y])`.
///
/// Transforms of one variable are perfectly correlated, so the result is
/// `±1` by the sign of the two scales.
///
/// # Errors
/// - [`Error::Domain`] if either side has zero variance.
/// - [`Error::NotImplemented`] for variables over different distributions.
pub fn corr(x: &RandomVar, y: &RandomVar) -> Result<Number> {
    let degenerate = |v: &RandomVar| v.is_constant() || v.variance().is_zero();
    if degenerate(x) || degenerate(y) {
        return Err(Error::Domain(format!(
            "correlation of {x} and {y} is undefined for zero variance"
        )));
    }
    if !x.shares_distribution(y) {
        return Err(Error::NotImplemented(format!(
            "correlation of {x} and {y} needs their joint distribution"
        )));
    }
    let sign = (x.scale() * y.scale()).re().signum();
    Ok(Number::Int(sign as i64))
}

/// One draw of `X` by inverse transform sampling: `G(u)` for a uniform `u`.
///
/// # Errors
/// Whatever the quantile of `X` raises, e.g. [`Error::NotImplemented`] for
/// a discrete law with unbounded support and no closed-form quantile.
///
/// # Examples
/// ```
/// use hall::distribution::Distribution;
/// use hall::distributions::Uniform;
/// use hall::random::create_rng;
/// use hall::random_var::RandomVar;
/// use hall::stats::sample;
/// let die = RandomVar::new(Uniform::new(1, 6).unwrap());
/// let mut rng = create_rng(7);
/// let roll = sample(&die, &mut rng).unwrap();
/// assert!(die.contains(roll));
/// ```
pub fn sample<R: Rng + ?Sized>(x: &RandomVar, rng: &mut R) -> Result<Number> {
    x.ppf(uniform_sample(rng))
}

/// `n` independent draws of `X`.
pub fn sample_n<R: Rng + ?Sized>(x: &RandomVar, n: usize, rng: &mut R) -> Result<Vec<Number>> {
    (0..n).map(|_| sample(x, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::descriptive::WelfordAccumulator;
    use super::*;
    use crate::distributions::{Bernoulli, Binomial, Normal, Uniform};
    use crate::random::create_rng;
    use approx::assert_relative_eq;
    use std::ops::Neg;

    fn binomial(n: i64, p: f64) -> RandomVar {
        RandomVar::new(Binomial::new(n, p).unwrap())
    }

    #[test]
    fn test_prob_of_event_and_variable() {
        let x = RandomVar::new(Bernoulli::new(0.4).unwrap());
        assert_relative_eq!(prob(&x.equals(1)).unwrap(), 0.4, epsilon = 1e-15);
        assert_relative_eq!(prob(&x).unwrap(), 0.4, epsilon = 1e-15);
        let shifted = x.clone() - 1;
        assert_relative_eq!(prob(&shifted).unwrap(), 0.6, epsilon = 1e-15);
    }

    #[test]
    fn test_bernoulli_scenario() {
        let x = RandomVar::new(Bernoulli::new(0.4).unwrap());
        assert_relative_eq!(expect(&x).re(), 0.4, epsilon = 1e-15);
        assert_relative_eq!(var(&x).re(), 0.24, epsilon = 1e-15);
        assert_relative_eq!(prob(&x.equals(1)).unwrap(), 0.4, epsilon = 1e-15);
        assert_relative_eq!(prob(&x.equals(0)).unwrap(), 0.6, epsilon = 1e-15);
    }

    #[test]
    fn test_standard_normal_scenario() {
        let x = RandomVar::new(Normal::standard());
        assert_eq!(expect(&x).re(), 0.0);
        assert_eq!(var(&x).re(), 1.0);
        assert_eq!(prob(&x.less_or_equal(0)).unwrap(), 0.5);
    }

    #[test]
    fn test_binomial_scenario() {
        let x = binomial(4, 0.5);
        assert_eq!(expect(&x).re(), 2.0);
        assert_eq!(var(&x).re(), 1.0);
        assert_eq!(std_dev(&x).re(), 1.0);
        assert_relative_eq!(prob(&x.less_or_equal(1)).unwrap(), 5.0 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(prob(&x.greater_than(1)).unwrap(), 11.0 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(prob(&x.equals(4)).unwrap(), 1.0 / 16.0, epsilon = 1e-15);
    }

    #[test]
    fn test_uniform_scenario() {
        let x = RandomVar::new(Uniform::new(-5, 5).unwrap());
        assert_eq!(expect(&x), Number::Int(0));
        assert_eq!(var(&x), Number::Int(10));
        assert_relative_eq!(prob(&x.less_than(0)).unwrap(), 5.0 / 11.0, epsilon = 1e-12);
        assert_relative_eq!(prob(&x.greater_or_equal(0)).unwrap(), 6.0 / 11.0, epsilon = 1e-12);
    }

    #[test]
    fn test_moments_of_affine_transforms() {
        let x = RandomVar::new(Normal::new(1.0, 2.0).unwrap());
        let y = x.clone() * -3 + 4;
        assert_relative_eq!(expect(&y).re(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(var(&y).re(), 36.0, epsilon = 1e-12);
        assert_relative_eq!(std_dev(&y).re(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cov_of_one_variable() {
        let x = binomial(10, 0.3);
        let y = x.clone() * 2 + 1;
        let z = x.clone().neg();
        assert_relative_eq!(cov(&x, &x).unwrap().re(), 2.1, epsilon = 1e-12);
        assert_relative_eq!(cov(&x, &y).unwrap().re(), 4.2, epsilon = 1e-12);
        assert_relative_eq!(cov(&y, &z).unwrap().re(), -4.2, epsilon = 1e-12);
        assert_eq!(corr(&x, &y).unwrap(), Number::Int(1));
        assert_eq!(corr(&y, &z).unwrap(), Number::Int(-1));
    }

    #[test]
    fn test_cov_with_constant_is_zero() {
        let x = binomial(10, 0.3);
        let c = x.clone() * 0 + 5;
        assert_eq!(cov(&x, &c).unwrap(), Number::Int(0));
        assert!(matches!(corr(&x, &c), Err(Error::Domain(_))));
    }

    #[test]
    fn test_cov_across_distributions_unsupported() {
        let x = binomial(10, 0.3);
        let y = binomial(10, 0.3);
        assert!(matches!(cov(&x, &y), Err(Error::NotImplemented(_))));
        assert!(matches!(corr(&x, &y), Err(Error::NotImplemented(_))));
    }

    #[test]
    fn test_sample_stays_in_support() {
        let x = binomial(6, 0.3) * 2 + 1;
        let mut rng = create_rng(42);
        for draw in sample_n(&x, 500, &mut rng).unwrap() {
            assert!(x.contains(draw), "{draw} outside {}", x.support());
        }
    }

    #[test]
    fn test_sample_moments_match() {
        let mut rng = create_rng(2024);
        let x = binomial(10, 0.3);
        let mut acc = WelfordAccumulator::new();
        for _ in 0..20_000 {
            acc.update(sample(&x, &mut rng).unwrap().re());
        }
        assert!((acc.mean().unwrap() - 3.0).abs() < 0.05);
        assert!((acc.sample_variance().unwrap() - 2.1).abs() < 0.1);

        let y = RandomVar::new(Normal::new(2.0, 0.5).unwrap()) * 3;
        let mut acc = WelfordAccumulator::new();
        for _ in 0..20_000 {
            acc.update(sample(&y, &mut rng).unwrap().re());
        }
        assert!((acc.mean().unwrap() - 6.0).abs() < 0.05);
        assert!((acc.sample_std_dev().unwrap() - 1.5).abs() < 0.05);
    }

    #[test]
    fn test_sample_is_reproducible() {
        let x = RandomVar::new(Normal::standard());
        let a = sample_n(&x, 10, &mut create_rng(1)).unwrap();
        let b = sample_n(&x, 10, &mut create_rng(1)).unwrap();
        assert_eq!(a, b);
    }
}
