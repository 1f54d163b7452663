//! The distribution plug-in contract.
//!
//! Anything implementing [`Distribution`] can be wrapped in a
//! [`RandomVar`](crate::random_var::RandomVar) and used throughout the
//! algebra. Implementors provide the raw functions (`density`,
//! `cumulative` and optionally `percent_point`) for arguments already known
//! to be valid; callers go through the checked `pdf`, `cdf` and `ppf`, which
//! validate the argument and handle everything outside the support.

use crate::config::{config, NumericConfig};
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::number::{is_probability, Number, Probability};
use std::fmt;

/// An immutable probability law.
///
/// Invariants every implementation must keep:
/// - `density` sums (discrete) or integrates (continuous) to 1 over `support`.
/// - `cumulative` is non-decreasing and reaches 1 at `support().b()`.
/// - `percent_point(p)` is the smallest `x` with `cumulative(x) >= p`.
pub trait Distribution: Send + Sync + fmt::Debug {
    /// `true` for laws over the integers (PMF), `false` for densities.
    fn is_discrete(&self) -> bool;

    fn support(&self) -> Interval;

    fn mean(&self) -> Number;

    fn variance(&self) -> Number;

    /// PMF/PDF at a real `x` inside the support (integral if discrete).
    fn density(&self, x: f64) -> Result<f64>;

    /// CDF at a real `x` inside the support (integral if discrete).
    fn cumulative(&self, x: f64) -> Result<f64>;

    /// Quantile for `p` in `[0, 1]`.
    ///
    /// Defaults to [`search_quantile`] under the process-wide configuration.
    fn percent_point(&self, p: Probability) -> Result<Number> {
        search_quantile(self, p, config())
    }

    fn std_dev(&self) -> Number {
        self.variance().sqrt()
    }

    fn contains(&self, x: Number) -> bool {
        self.support().contains(x)
    }

    /// Checked PMF/PDF: 0 outside the support.
    ///
    /// # Errors
    /// - [`Error::Type`] if `x` is complex.
    /// - [`Error::Domain`] if `x` is NaN, or non-integral for a discrete law.
    fn pdf(&self, x: Number) -> Result<f64> {
        let x = real_argument(x)?;
        if self.is_discrete() && x.is_finite() && x.fract() != 0.0 {
            return Err(Error::Domain(format!(
                "discrete distribution evaluated at non-integral {x}"
            )));
        }
        let support = self.support();
        if x < support.a().re() || x > support.b().re() {
            return Ok(0.0);
        }
        self.density(x)
    }

    /// Checked CDF: 0 below the support, 1 from its upper bound on.
    ///
    /// # Errors
    /// - [`Error::Type`] if `x` is complex.
    /// - [`Error::Domain`] if `x` is NaN, or a non-integral point inside the
    ///   support of a discrete law.
    fn cdf(&self, x: Number) -> Result<f64> {
        let x = real_argument(x)?;
        let support = self.support();
        if x < support.a().re() {
            return Ok(0.0);
        }
        if x >= support.b().re() {
            return Ok(1.0);
        }
        if self.is_discrete() && x.fract() != 0.0 {
            return Err(Error::Domain(format!(
                "discrete distribution evaluated at non-integral {x}"
            )));
        }
        self.cumulative(x)
    }

    /// Checked quantile.
    ///
    /// # Errors
    /// [`Error::Domain`] if `p` is outside `[0, 1]`, plus whatever
    /// `percent_point` raises.
    fn ppf(&self, p: Probability) -> Result<Number> {
        if !is_probability(p) {
            return Err(Error::Domain(format!("p = {p} is not a probability")));
        }
        self.percent_point(p)
    }
}

fn real_argument(x: Number) -> Result<f64> {
    let x = x.to_real()?;
    if x.is_nan() {
        return Err(Error::Domain("distribution evaluated at NaN".into()));
    }
    Ok(x)
}

/// Quantile by search over the CDF.
///
/// Discrete laws are searched by bisection over the integers of a bounded
/// support. Continuous laws bracket the answer around the mean (expanding by
/// doubling when the support is unbounded) and then bisect until the bracket
/// is narrower than `cfg.tolerance` relative to its magnitude.
///
/// # Errors
/// - [`Error::NotImplemented`] for a discrete law on an unbounded support.
/// - [`Error::Computation`] if the bracket cannot be found or the bisection
///   does not settle within `cfg.max_terms` steps.
pub fn search_quantile<D>(dist: &D, p: Probability, cfg: &NumericConfig) -> Result<Number>
where
    D: Distribution + ?Sized,
{
    let support = dist.support();
    let (a, b) = (support.a().to_real()?, support.b().to_real()?);
    if dist.is_discrete() {
        return search_lattice(dist, p, a, b);
    }
    if p <= 0.0 {
        return Ok(support.a());
    }
    if p >= 1.0 {
        return Ok(support.b());
    }

    let center = dist.mean().re();
    let center = if center.is_finite() { center.clamp(a, b) } else { 0.0_f64.clamp(a, b) };
    let width = dist.std_dev().re();
    let width = if width.is_finite() && width > 0.0 { width } else { 1.0 };

    let lo = expand(center, -width, a, cfg, |x| Ok(dist.cumulative(x)? < p))?;
    let hi = expand(center, width, b, cfg, |x| Ok(dist.cumulative(x)? >= p))?;
    let (mut lo, mut hi) = (lo.min(hi), hi.max(lo));

    for step in 0..cfg.max_terms {
        let mid = 0.5 * (lo + hi);
        if hi - lo <= cfg.tolerance * mid.abs().max(1.0) || mid <= lo || mid >= hi {
            tracing::debug!(p, x = mid, steps = step, "quantile search finished");
            return Ok(Number::Real(mid));
        }
        if dist.cumulative(mid)? >= p {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Err(Error::Computation(format!(
        "quantile search for p = {p} did not settle within {} steps",
        cfg.max_terms
    )))
}

fn search_lattice<D>(dist: &D, p: Probability, a: f64, b: f64) -> Result<Number>
where
    D: Distribution + ?Sized,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(Error::NotImplemented(
            "quantile of a discrete distribution with unbounded support".into(),
        ));
    }
    let (mut lo, mut hi) = (a as i64, b as i64);
    let target = p - 4.0 * f64::EPSILON * p;
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if dist.cumulative(mid as f64)? >= target {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(Number::Int(lo))
}

/// Walks away from `start` by `width`, doubling the step, until `settled`
/// holds or the finite support bound `limit` is reached.
fn expand<F>(start: f64, width: f64, limit: f64, cfg: &NumericConfig, mut settled: F) -> Result<f64>
where
    F: FnMut(f64) -> Result<bool>,
{
    let mut step = width;
    for _ in 0..cfg.max_terms {
        let x = start + step;
        let x = if width < 0.0 { x.max(limit) } else { x.min(limit) };
        if x == limit && limit.is_finite() {
            return Ok(x);
        }
        if !x.is_finite() {
            break;
        }
        if settled(x)? {
            return Ok(x);
        }
        step *= 2.0;
    }
    Err(Error::Computation(
        "could not bracket the quantile within the configured steps".into(),
    ))
}
