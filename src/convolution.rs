//! Law of the sum of two independent random variables.
//!
//! [`Convolution`] is what `X + Y` builds when `X` and `Y` do not share a
//! base distribution. Nothing is precomputed: every density or CDF value is
//! a numeric sum or integral over one operand, evaluated on demand.
//!
//! # Algorithm
//! With `f` the law of the left operand and `g` that of the right:
//! - `h(n) = Σₘ f(n − m)·g(m)` when `g` is discrete, with `m` restricted to
//!   the overlap `[max(g.a, n − f.b), min(g.b, n − f.a)]`.
//! - `h(n) = ∫ f(n − m)·g(m) dm` over the same overlap when both are
//!   continuous.
//! - `H(x) = Σₘ / ∫ g(m)·F(x − m)`, where `m` stops at `x − f.a` since `F`
//!   vanishes beyond it.
//!
//! If only the left operand is discrete the roles are swapped, so the sum
//! always runs over the lattice of a discrete operand.

use crate::config::{config, NumericConfig};
use crate::distribution::{search_quantile, Distribution};
use crate::error::Result;
use crate::interval::Interval;
use crate::number::{Number, Probability};
use crate::quadrature::{integrate, sum_range};
use std::sync::Arc;

/// Standard deviations around each operand's mean where break points are
/// placed for the integrator.
const PEAK_SPAN: f64 = 8.0;

/// Distribution of `lhs + rhs` for independent operands.
#[derive(Debug, Clone)]
pub struct Convolution {
    lhs: Arc<dyn Distribution>,
    rhs: Arc<dyn Distribution>,
    cfg: NumericConfig,
}

impl Convolution {
    /// Sum of two independent operands under the process-wide configuration.
    pub fn new(lhs: Arc<dyn Distribution>, rhs: Arc<dyn Distribution>) -> Self {
        tracing::debug!(?lhs, ?rhs, "building convolution");
        Self {
            lhs,
            rhs,
            cfg: config().clone(),
        }
    }

    /// Replaces the numeric configuration used by this convolution.
    pub fn with_config(mut self, cfg: NumericConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn lhs(&self) -> &Arc<dyn Distribution> {
        &self.lhs
    }

    pub fn rhs(&self) -> &Arc<dyn Distribution> {
        &self.rhs
    }

    pub fn config(&self) -> &NumericConfig {
        &self.cfg
    }

    /// `(outer, inner)`: the operand evaluated at `n − m` and the one `m`
    /// runs over. The inner operand is discrete whenever either one is.
    fn roles(&self) -> (&dyn Distribution, &dyn Distribution) {
        if !self.rhs.is_discrete() && self.lhs.is_discrete() {
            (self.rhs.as_ref(), self.lhs.as_ref())
        } else {
            (self.lhs.as_ref(), self.rhs.as_ref())
        }
    }

    /// Integration points for `m ∈ [lo, hi]` when the outer operand is
    /// evaluated at `x − m`: the bounds plus the regions where either
    /// factor peaks.
    fn points(outer: &dyn Distribution, inner: &dyn Distribution, x: f64, lo: f64, hi: f64) -> Vec<f64> {
        let mut points = vec![lo];
        for (centre, spread) in [
            (inner.mean().re(), inner.std_dev().re()),
            (x - outer.mean().re(), outer.std_dev().re()),
        ] {
            if centre.is_finite() {
                points.push(centre);
                if spread.is_finite() {
                    points.push(centre - PEAK_SPAN * spread);
                    points.push(centre + PEAK_SPAN * spread);
                }
            }
        }
        points.push(hi);
        points
    }
}

impl Distribution for Convolution {
    fn is_discrete(&self) -> bool {
        self.lhs.is_discrete() && self.rhs.is_discrete()
    }

    fn support(&self) -> Interval {
        self.lhs.support().add(&self.rhs.support())
    }

    fn mean(&self) -> Number {
        self.lhs.mean() + self.rhs.mean()
    }

    fn variance(&self) -> Number {
        self.lhs.variance() + self.rhs.variance()
    }

    fn density(&self, n: f64) -> Result<f64> {
        let (outer, inner) = self.roles();
        let (fo, go) = (outer.support(), inner.support());
        let lo = go.a().re().max(n - fo.b().re());
        let hi = go.b().re().min(n - fo.a().re());
        if lo > hi || lo.is_nan() || hi.is_nan() {
            return Ok(0.0);
        }

        let term = |m: f64| -> Result<f64> {
            let g = inner.pdf(Number::Real(m))?;
            if g == 0.0 {
                return Ok(0.0);
            }
            Ok(outer.pdf(Number::Real(n - m))? * g)
        };
        let value = if inner.is_discrete() {
            sum_range(|m| term(m as f64), lo, hi, &self.cfg)?
        } else {
            integrate(term, &Self::points(outer, inner, n, lo, hi), &self.cfg)?
        };
        tracing::trace!(n, value, "convolution density");
        Ok(value.max(0.0))
    }

    fn cumulative(&self, x: f64) -> Result<f64> {
        let (outer, inner) = self.roles();
        let go = inner.support();
        let lo = go.a().re();
        let hi = go.b().re().min(x - outer.support().a().re());
        if lo > hi || hi.is_nan() {
            return Ok(0.0);
        }

        let term = |m: f64| -> Result<f64> {
            let g = inner.pdf(Number::Real(m))?;
            if g == 0.0 {
                return Ok(0.0);
            }
            Ok(outer.cdf(Number::Real(x - m))? * g)
        };
        let value = if inner.is_discrete() {
            sum_range(|m| term(m as f64), lo, hi, &self.cfg)?
        } else {
            integrate(term, &Self::points(outer, inner, x, lo, hi), &self.cfg)?
        };
        tracing::trace!(x, value, "convolution cdf");
        Ok(value.clamp(0.0, 1.0))
    }

    fn percent_point(&self, p: Probability) -> Result<Number> {
        search_quantile(self, p, &self.cfg)
    }
}
