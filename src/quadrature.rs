//! Numeric integration and summation.
//!
//! The two primitives convolution needs: [`integrate`] over a possibly
//! unbounded real range and [`sum_range`] over a possibly unbounded range
//! of integers. Both take fallible integrands so that evaluation errors of
//! a plugged-in distribution propagate, and both are bounded by a
//! [`NumericConfig`] so that a pathological integrand fails with
//! [`Error::Computation`] instead of running forever.
//!
//! # Algorithm
//! - Integration: adaptive Gauss–Legendre (20 points per panel); a panel is
//!   accepted once its estimate agrees with the sum of its two halves.
//!   Infinite ends are mapped to a finite range by `x = t / (1 − t²)`
//!   (both ends) or `x = a + t / (1 − t)` (one end).
//! - Summation: Neumaier-compensated running sum; unbounded ranges stop
//!   once terms have stayed negligible for a run of consecutive indices.

use crate::config::NumericConfig;
use crate::error::{Error, Result};
use crate::stats::descriptive::NeumaierSum;
use std::sync::OnceLock;

const GL_POINTS: usize = 20;

/// Consecutive negligible terms required before an unbounded sum stops.
const QUIET_RUN: usize = 16;

static GL_RULE: OnceLock<(Vec<f64>, Vec<f64>)> = OnceLock::new();

/// Gauss–Legendre nodes and weights on `[-1, 1]` by Newton iteration on
/// Pₙ(x), using the Chebyshev guess `cos(π(i + 3/4) / (n + 1/2))`.
fn gauss_legendre_nodes_weights(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = vec![0.0f64; n];
    let mut weights = vec![0.0f64; n];
    let nf = n as f64;

    let legendre = |x: f64| {
        let mut p0 = 1.0f64;
        let mut p1 = x;
        for j in 2..=n {
            let jf = j as f64;
            let p2 = ((2.0 * jf - 1.0) * x * p1 - (jf - 1.0) * p0) / jf;
            p0 = p1;
            p1 = p2;
        }
        // (Pₙ(x), P'ₙ(x))
        (p1, nf * (x * p1 - p0) / (x * x - 1.0))
    };

    for i in 0..n.div_ceil(2) {
        let mut x = ((std::f64::consts::PI * (i as f64 + 0.75)) / (nf + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre(x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() < 1e-16 {
                break;
            }
        }
        let (_, dp) = legendre(x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);

        nodes[i] = -x;
        nodes[n - 1 - i] = x;
        weights[i] = w;
        weights[n - 1 - i] = w;
    }

    (nodes, weights)
}

fn gl_rule() -> &'static (Vec<f64>, Vec<f64>) {
    GL_RULE.get_or_init(|| gauss_legendre_nodes_weights(GL_POINTS))
}

struct Panels<'a, F> {
    f: F,
    cfg: &'a NumericConfig,
    evaluations: usize,
    depth_limited: bool,
}

impl<F> Panels<'_, F>
where
    F: FnMut(f64) -> Result<f64>,
{
    fn panel(&mut self, a: f64, b: f64) -> Result<f64> {
        self.evaluations += 1;
        if self.evaluations > self.cfg.max_terms {
            return Err(Error::Computation(format!(
                "integration exceeded {} panels",
                self.cfg.max_terms
            )));
        }
        let (nodes, weights) = gl_rule();
        let half = 0.5 * (b - a);
        let mid = 0.5 * (a + b);
        let mut acc = NeumaierSum::new();
        for (&x, &w) in nodes.iter().zip(weights) {
            acc.add(w * (self.f)(mid + half * x)?);
        }
        Ok(acc.total() * half)
    }

    fn adaptive(&mut self, a: f64, b: f64, whole: f64, tol: f64, depth: usize) -> Result<f64> {
        let mid = 0.5 * (a + b);
        let left = self.panel(a, mid)?;
        let right = self.panel(mid, b)?;
        let refined = left + right;
        if (refined - whole).abs() <= tol {
            return Ok(refined);
        }
        if depth >= self.cfg.max_depth {
            self.depth_limited = true;
            return Ok(refined);
        }
        let half_tol = 0.5 * tol;
        Ok(self.adaptive(a, mid, left, half_tol, depth + 1)?
            + self.adaptive(mid, b, right, half_tol, depth + 1)?)
    }

    fn finite(&mut self, a: f64, b: f64, tol: f64) -> Result<f64> {
        if a == b {
            return Ok(0.0);
        }
        let whole = self.panel(a, b)?;
        self.adaptive(a, b, whole, tol, 0)
    }

    /// Integrates over `[t0, t1]` after the change of variables
    /// `x = map(t).0` with Jacobian `map(t).1`.
    fn mapped<M>(&mut self, t0: f64, t1: f64, tol: f64, map: M) -> Result<f64>
    where
        M: Fn(f64) -> (f64, f64),
    {
        let f = &mut self.f;
        let mut inner = Panels {
            f: |t: f64| {
                let (x, jacobian) = map(t);
                f(x).map(|y| y * jacobian)
            },
            cfg: self.cfg,
            evaluations: self.evaluations,
            depth_limited: false,
        };
        let value = inner.finite(t0, t1, tol);
        self.evaluations = inner.evaluations;
        self.depth_limited |= inner.depth_limited;
        value
    }
}

/// Integrates `f` over the real range spanned by `points`.
///
/// `points` is `[a, p₁, …, b]`: the outer bounds plus optional interior
/// break points where the integrand is known to peak or kink. Each
/// segment is integrated separately, so a narrow peak is not missed by
/// the first coarse panel. Either bound may be infinite.
///
/// # Errors
/// - [`Error::Domain`] if fewer than two points are given or any is NaN.
/// - [`Error::Computation`] if more than `cfg.max_terms` panels are needed.
/// - Any error returned by `f`.
///
/// # Examples
/// ```
/// use hall::config::NumericConfig;
/// use hall::quadrature::integrate;
/// let cfg = NumericConfig::default();
/// let v = integrate(|x| Ok((-x * x).exp()), &[f64::NEG_INFINITY, f64::INFINITY], &cfg).unwrap();
/// assert!((v - std::f64::consts::PI.sqrt()).abs() < 1e-9);
/// ```
pub fn integrate<F>(f: F, points: &[f64], cfg: &NumericConfig) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    if points.len() < 2 || points.iter().any(|p| p.is_nan()) {
        return Err(Error::Domain(format!(
            "integration needs at least two non-NaN points, got {points:?}"
        )));
    }
    let (a, b) = (points[0], points[points.len() - 1]);
    if a == b {
        return Ok(0.0);
    }
    if a > b {
        let reversed: Vec<f64> = points.iter().rev().copied().collect();
        return integrate(f, &reversed, cfg).map(|v| -v);
    }

    let mut breaks: Vec<f64> = points[1..points.len() - 1]
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > a && *p < b)
        .collect();
    breaks.sort_by(f64::total_cmp);
    breaks.dedup();

    let mut bounds = Vec::with_capacity(breaks.len() + 2);
    bounds.push(a);
    bounds.extend(breaks);
    bounds.push(b);

    let segments = bounds.len() - 1;
    let tol = cfg.tolerance / segments as f64;
    let mut panels = Panels {
        f,
        cfg,
        evaluations: 0,
        depth_limited: false,
    };
    let mut total = NeumaierSum::new();

    for w in bounds.windows(2) {
        let (lo, hi) = (w[0], w[1]);
        let value = match (lo.is_finite(), hi.is_finite()) {
            (true, true) => panels.finite(lo, hi, tol)?,
            (true, false) => panels.mapped(0.0, 1.0, tol, |t| {
                let s = 1.0 - t;
                (lo + t / s, 1.0 / (s * s))
            })?,
            (false, true) => panels.mapped(0.0, 1.0, tol, |t| {
                let s = 1.0 - t;
                (hi - t / s, 1.0 / (s * s))
            })?,
            (false, false) => panels.mapped(-1.0, 1.0, tol, |t| {
                let s = 1.0 - t * t;
                (t / s, (1.0 + t * t) / (s * s))
            })?,
        };
        total.add(value);
    }

    if panels.depth_limited {
        tracing::warn!(
            max_depth = cfg.max_depth,
            "quadrature reached its depth limit; result may be inaccurate"
        );
    }
    Ok(total.total())
}

/// Sums `f(k)` for every integer `k` in `[a, b]`.
///
/// Bounds are given as floats so that unbounded supports pass `±∞`
/// directly; finite bounds are rounded inward to the nearest integers. An
/// unbounded range is summed outward from its finite end (or from 0 in
/// both directions) until [`QUIET_RUN`] consecutive terms fall below the
/// tolerance.
///
/// # Errors
/// - [`Error::Computation`] if a finite range holds more than
///   `cfg.max_terms` integers, or an unbounded sum has not settled after
///   `cfg.max_terms` terms.
/// - Any error returned by `f`.
///
/// # Examples
/// ```
/// use hall::config::NumericConfig;
/// use hall::quadrature::sum_range;
/// let cfg = NumericConfig::default();
/// let s = sum_range(|k| Ok(k as f64), 1.0, 100.0, &cfg).unwrap();
/// assert_eq!(s, 5050.0);
/// let g = sum_range(|k| Ok(0.5_f64.powi(k as i32)), 1.0, f64::INFINITY, &cfg).unwrap();
/// assert!((g - 1.0).abs() < 1e-12);
/// ```
pub fn sum_range<F>(mut f: F, a: f64, b: f64, cfg: &NumericConfig) -> Result<f64>
where
    F: FnMut(i64) -> Result<f64>,
{
    if a.is_nan() || b.is_nan() {
        return Err(Error::Domain("summation bounds must not be NaN".into()));
    }
    let lo = a.ceil();
    let hi = b.floor();
    if lo > hi {
        return Ok(0.0);
    }

    let mut acc = NeumaierSum::new();
    match (lo.is_finite(), hi.is_finite()) {
        (true, true) => {
            let count = hi - lo + 1.0;
            if count > cfg.max_terms as f64 {
                return Err(Error::Computation(format!(
                    "summation over {count} terms exceeds max_terms = {}",
                    cfg.max_terms
                )));
            }
            for k in (lo as i64)..=(hi as i64) {
                acc.add(f(k)?);
            }
        }
        (true, false) => outward(&mut f, &mut acc, lo as i64, 1, cfg)?,
        (false, true) => outward(&mut f, &mut acc, hi as i64, -1, cfg)?,
        (false, false) => {
            outward(&mut f, &mut acc, 0, 1, cfg)?;
            outward(&mut f, &mut acc, -1, -1, cfg)?;
        }
    }
    Ok(acc.total())
}

fn outward<F>(f: &mut F, acc: &mut NeumaierSum, start: i64, step: i64, cfg: &NumericConfig) -> Result<()>
where
    F: FnMut(i64) -> Result<f64>,
{
    let mut quiet = 0;
    let mut k = start;
    for _ in 0..cfg.max_terms {
        let term = f(k)?;
        acc.add(term);
        if term.abs() <= cfg.tolerance * acc.total().abs().max(f64::MIN_POSITIVE) {
            quiet += 1;
            if quiet >= QUIET_RUN {
                return Ok(());
            }
        } else {
            quiet = 0;
        }
        k = match k.checked_add(step) {
            Some(next) => next,
            None => return Ok(()),
        };
    }
    Err(Error::Computation(format!(
        "unbounded summation did not settle within {} terms",
        cfg.max_terms
    )))
}
