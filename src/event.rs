//! Lazy events over random variables.
//!
//! An [`Event`] records a proposition such as `X <= 3` or `X != 0` without
//! evaluating it. Its probability is computed on demand by [`Event::p`];
//! coercing it to a boolean draws against that probability.

use crate::config::config;
use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::number::{is_probability, Number, Probability};
use crate::random::uniform_sample;
use crate::random_var::RandomVar;
use rand::Rng;
use std::fmt;
use std::ops::{BitOr, Not};

/// How far a computed probability may stray outside `[0, 1]` through
/// rounding before it is treated as a broken distribution.
const PROBABILITY_SLACK: f64 = 1e-9;

/// `X == x`, or `X != x` when inverted.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct EqualityEvent {
    var: RandomVar,
    x: Number,
    inverted: bool,
}

impl EqualityEvent {
    pub fn new(var: RandomVar, x: impl Into<Number>, inverted: bool) -> Self {
        Self {
            var,
            x: x.into(),
            inverted,
        }
    }

    pub fn var(&self) -> &RandomVar {
        &self.var
    }

    pub fn x(&self) -> Number {
        self.x
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Point mass at `x` for discrete variables; continuous variables put
    /// zero probability on any single point.
    fn p(&self) -> Result<Probability> {
        let p = if self.var.is_constant() {
            if self.var.addend() == self.x {
                1.0
            } else {
                0.0
            }
        } else if self.var.is_discrete() {
            self.var.pdf(self.x)?
        } else {
            0.0
        };
        Ok(if self.inverted { 1.0 - p } else { p })
    }
}

/// `a < X <= b`, with a missing bound meaning unbounded on that side.
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct IntervalEvent {
    var: RandomVar,
    a: Option<Number>,
    b: Option<Number>,
    inverted: bool,
}

impl IntervalEvent {
    /// Creates `a < X <= b`.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if both bounds are missing, either is
    /// NaN, or `a > b`.
    pub fn new(var: RandomVar, a: Option<Number>, b: Option<Number>, inverted: bool) -> Result<Self> {
        if a.is_none() && b.is_none() {
            return Err(Error::InvalidParameters(
                "interval event needs a lower or an upper bound".into(),
            ));
        }
        if a.is_some_and(Number::is_nan) || b.is_some_and(Number::is_nan) {
            return Err(Error::InvalidParameters("interval event bound is NaN".into()));
        }
        if let (Some(lo), Some(hi)) = (a, b) {
            if lo.re() > hi.re() {
                return Err(Error::InvalidParameters(format!(
                    "interval event needs a <= b, got a={lo}, b={hi}"
                )));
            }
        }
        Ok(Self::unchecked(var, a, b, inverted))
    }

    pub(crate) fn unchecked(var: RandomVar, a: Option<Number>, b: Option<Number>, inverted: bool) -> Self {
        Self { var, a, b, inverted }
    }

    pub fn var(&self) -> &RandomVar {
        &self.var
    }

    /// Exclusive lower bound.
    pub fn a(&self) -> Option<Number> {
        self.a
    }

    /// Inclusive upper bound.
    pub fn b(&self) -> Option<Number> {
        self.b
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// `F(b) - F(a)`, with `F(None upper) = 1` and `F(None lower) = 0`.
    fn p(&self) -> Result<Probability> {
        let upper = match self.b {
            Some(b) => self.var.cdf(b)?,
            None => 1.0,
        };
        let lower = match self.a {
            Some(a) => self.var.cdf(a)?,
            None => 0.0,
        };
        let p = upper - lower;
        Ok(if self.inverted { 1.0 - p } else { p })
    }
}

/// A lazy proposition about a random variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    Equality(EqualityEvent),
    Interval(IntervalEvent),
}

impl Event {
    pub fn var(&self) -> &RandomVar {
        match self {
            Event::Equality(e) => e.var(),
            Event::Interval(e) => e.var(),
        }
    }

    /// Probability that the event occurs.
    ///
    /// # Errors
    /// Whatever evaluating the variable's PMF or CDF raises.
    ///
    /// # Panics
    /// If the result lies outside `[0, 1]` beyond rounding: the underlying
    /// distribution's CDF is not monotone or not normalized.
    ///
    /// # Examples
    /// ```
    /// use hall::distributions::Normal;
    /// use hall::random_var::RandomVar;
    /// let x = RandomVar::new(Normal::standard());
    /// assert_eq!(x.less_or_equal(0.0).p().unwrap(), 0.5);
    /// assert_eq!(x.equals(0.0).p().unwrap(), 0.0);
    /// ```
    pub fn p(&self) -> Result<Probability> {
        let p = match self {
            Event::Equality(e) => e.p()?,
            Event::Interval(e) => e.p()?,
        };
        let p = checked_probability(p, self);
        tracing::trace!(event = %self, p, "evaluated event probability");
        Ok(p)
    }

    /// Logical negation.
    ///
    /// An equality flips between `=` and `!=`. A one-sided interval moves
    /// its bound to the other side (`X <= c` becomes `X > c`); a two-sided
    /// interval is inverted.
    pub fn negate(&self) -> Event {
        match self {
            Event::Equality(e) => Event::Equality(EqualityEvent {
                inverted: !e.inverted,
                ..e.clone()
            }),
            Event::Interval(e) => {
                let (a, b, inverted) = match (e.a, e.b) {
                    (None, b) => (b, None, e.inverted),
                    (a, None) => (None, a, e.inverted),
                    (a, b) => (a, b, !e.inverted),
                };
                Event::Interval(IntervalEvent::unchecked(e.var.clone(), a, b, inverted))
            }
        }
    }

    /// Draws whether the event occurs: `true` with probability `p`.
    pub fn occurs<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<bool> {
        let p = self.p()?;
        Ok(uniform_sample(rng) < p)
    }

    /// [`occurs`](Self::occurs) as `1` or `0`.
    pub fn occurs_int<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<i64> {
        Ok(i64::from(self.occurs(rng)?))
    }

    /// The probability itself, as a float.
    pub fn as_f64(&self) -> Result<f64> {
        self.p()
    }

    /// Conditional event `self | given`.
    ///
    /// # Errors
    /// Always [`Error::NotImplemented`]: conditioning needs joint
    /// distributions.
    pub fn given(&self, given: &Event) -> Result<Event> {
        Err(Error::NotImplemented(format!(
            "conditional event ({self}) | ({given})"
        )))
    }

    /// Structural identity: same variable, same bounds, same inversion.
    pub fn is_identical(&self, other: &Event) -> bool {
        self == other
    }
}

fn checked_probability(p: f64, event: &Event) -> Probability {
    let clamped = if (-PROBABILITY_SLACK..=1.0 + PROBABILITY_SLACK).contains(&p) {
        p.clamp(0.0, 1.0)
    } else {
        p
    };
    assert!(
        is_probability(clamped),
        "P[{event}] = {p} is not a probability; the distribution of {} is inconsistent",
        event.var()
    );
    clamped
}

// A NaN operand makes an event unequal to itself, but such an event fails
// on evaluation and is never a useful key.
impl Eq for EqualityEvent {}

impl Eq for IntervalEvent {}

impl From<EqualityEvent> for Event {
    fn from(e: EqualityEvent) -> Self {
        Event::Equality(e)
    }
}

impl From<IntervalEvent> for Event {
    fn from(e: IntervalEvent) -> Self {
        Event::Interval(e)
    }
}

impl Not for Event {
    type Output = Event;

    fn not(self) -> Event {
        self.negate()
    }
}

impl Not for &Event {
    type Output = Event;

    fn not(self) -> Event {
        self.negate()
    }
}

impl BitOr for &Event {
    type Output = Result<Event>;

    fn bitor(self, given: &Event) -> Result<Event> {
        self.given(given)
    }
}

fn bound(x: Number, digits: usize) -> String {
    match x {
        Number::Complex(_) => format!("{x:.digits$}"),
        _ => format!("{:.digits$}", x.re()),
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = config().display_digits;
        match self {
            Event::Equality(e) => {
                let op = if e.inverted { "!=" } else { "=" };
                write!(f, "{} {op} {}", e.var, bound(e.x, digits))
            }
            Event::Interval(e) => {
                let body = match (e.a, e.b) {
                    (None, Some(b)) => format!("{} <= {}", e.var, bound(b, digits)),
                    (Some(a), None) => format!("{} > {}", e.var, bound(a, digits)),
                    (Some(a), Some(b)) => {
                        format!("{} < {} <= {}", bound(a, digits), e.var, bound(b, digits))
                    }
                    (None, None) => e.var.to_string(),
                };
                if e.inverted {
                    write!(f, "~({body})")
                } else {
                    f.write_str(&body)
                }
            }
        }
    }
}
