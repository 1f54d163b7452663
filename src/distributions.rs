//! Concrete probability distributions.
//!
//! Closed-form plug-ins for the [`Distribution`] contract.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Support | Mean | Variance |
//! |---|---|---|---|---|
//! | [`Normal`] | μ, σ | ℝ | μ | σ² |
//! | [`Binomial`] | n, p | {0, …, n} | np | np(1−p) |
//! | [`Bernoulli`] | p | {0, 1} | p | p(1−p) |
//! | [`Uniform`] | a, b | {a, …, b} | (a+b)/2 | ((b−a+1)²−1)/12 |
//!
//! Parameters are validated once at construction; every value is
//! immutable afterwards.

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::number::{is_probability, Number, Probability};
use crate::special;

// ============================================================================
// Normal Distribution
// ============================================================================

/// Normal (Gaussian) distribution N(μ, σ²).
///
/// # Mathematical Definition
/// - PDF: φ(x) = (1/(σ√(2π))) exp(−(x−μ)²/(2σ²))
/// - CDF: Φ((x−μ)/σ) (via standard normal CDF)
/// - Quantile: μ + σ·Φ⁻¹(p)
#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Creates a new normal distribution N(μ, σ).
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if `sigma ≤ 0` or a parameter is not
    /// finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "Normal requires finite μ and σ > 0, got μ={mu}, σ={sigma}"
            )));
        }
        Ok(Self { mu, sigma })
    }

    /// The standard normal N(0, 1).
    pub fn standard() -> Self {
        Self { mu: 0.0, sigma: 1.0 }
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Distribution for Normal {
    fn is_discrete(&self) -> bool {
        false
    }

    fn support(&self) -> Interval {
        Interval::real_line()
    }

    fn mean(&self) -> Number {
        Number::Real(self.mu)
    }

    fn variance(&self) -> Number {
        Number::Real(self.sigma * self.sigma)
    }

    fn std_dev(&self) -> Number {
        Number::Real(self.sigma)
    }

    fn density(&self, x: f64) -> Result<f64> {
        let z = (x - self.mu) / self.sigma;
        Ok(special::standard_normal_pdf(z) / self.sigma)
    }

    fn cumulative(&self, x: f64) -> Result<f64> {
        let z = (x - self.mu) / self.sigma;
        Ok(special::standard_normal_cdf(z))
    }

    fn percent_point(&self, p: Probability) -> Result<Number> {
        let x = if p <= 0.0 {
            f64::NEG_INFINITY
        } else if p >= 1.0 {
            f64::INFINITY
        } else {
            self.mu + self.sigma * special::inverse_normal_cdf(p)
        };
        Ok(Number::Real(x))
    }
}

// ============================================================================
// Binomial Distribution
// ============================================================================

/// Number of successes in `n` independent trials with success probability `p`.
///
/// # Mathematical Definition
/// - PMF: C(n, k) pᵏ qⁿ⁻ᵏ with q = 1 − p
/// - CDF: I_q(n − k, k + 1) (regularized incomplete beta)
/// - Quantile: bisection over `0..=n`
#[derive(Debug, Clone, PartialEq)]
pub struct Binomial {
    n: u64,
    p: f64,
}

impl Binomial {
    /// Creates a new binomial distribution B(n, p).
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if `n < 0` or `p` is outside `[0, 1]`.
    ///
    /// # Examples
    /// ```
    /// use hall::distributions::Binomial;
    /// assert!(Binomial::new(4, 0.5).is_ok());
    /// assert!(Binomial::new(-1, 0.5).is_err());
    /// assert!(Binomial::new(4, 1.5).is_err());
    /// ```
    pub fn new(n: i64, p: Probability) -> Result<Self> {
        let n = u64::try_from(n).map_err(|_| {
            Error::InvalidParameters(format!("Binomial requires n ≥ 0, got n={n}"))
        })?;
        if !is_probability(p) {
            return Err(Error::InvalidParameters(format!(
                "Binomial requires 0 ≤ p ≤ 1, got p={p}"
            )));
        }
        Ok(Self { n, p })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn p(&self) -> Probability {
        self.p
    }

    /// Failure probability `1 − p`.
    pub fn q(&self) -> Probability {
        1.0 - self.p
    }

    fn pmf(&self, k: u64) -> f64 {
        let (n, p, q) = (self.n, self.p, self.q());
        if k > n {
            return 0.0;
        }
        // 0⁰ = 1 at the degenerate ends
        if p == 0.0 {
            return if k == 0 { 1.0 } else { 0.0 };
        }
        if q == 0.0 {
            return if k == n { 1.0 } else { 0.0 };
        }
        let (kf, rest) = (k as f64, (n - k) as f64);
        let c = special::binomial_coefficient(n, k);
        if c.is_finite() {
            c * p.powf(kf) * q.powf(rest)
        } else {
            (special::ln_choose(n, k) + kf * p.ln() + rest * q.ln()).exp()
        }
    }

    fn cmf(&self, k: u64) -> f64 {
        if k >= self.n {
            return 1.0;
        }
        special::regularized_incomplete_beta(self.q(), (self.n - k) as f64, k as f64 + 1.0)
    }
}

/// Raw functions receive integral `x` inside the support.
fn lattice_point(x: f64) -> u64 {
    x.max(0.0) as u64
}

impl Distribution for Binomial {
    fn is_discrete(&self) -> bool {
        true
    }

    fn support(&self) -> Interval {
        Interval::integers(0, self.n as i64)
    }

    fn mean(&self) -> Number {
        Number::Real(self.n as f64 * self.p)
    }

    fn variance(&self) -> Number {
        Number::Real(self.n as f64 * self.p * self.q())
    }

    fn density(&self, x: f64) -> Result<f64> {
        Ok(self.pmf(lattice_point(x)))
    }

    fn cumulative(&self, x: f64) -> Result<f64> {
        Ok(self.cmf(lattice_point(x)))
    }
}

// ============================================================================
// Bernoulli Distribution
// ============================================================================

/// A single trial: `1` with probability `p`, `0` otherwise.
///
/// Delegates to a one-trial [`Binomial`] and adds the closed-form quantile.
#[derive(Debug, Clone, PartialEq)]
pub struct Bernoulli {
    trial: Binomial,
}

impl Bernoulli {
    /// Creates a new Bernoulli distribution.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if `p` is outside `[0, 1]`.
    pub fn new(p: Probability) -> Result<Self> {
        Ok(Self {
            trial: Binomial::new(1, p)?,
        })
    }

    pub fn p(&self) -> Probability {
        self.trial.p()
    }
}

impl Distribution for Bernoulli {
    fn is_discrete(&self) -> bool {
        true
    }

    fn support(&self) -> Interval {
        self.trial.support()
    }

    fn mean(&self) -> Number {
        self.trial.mean()
    }

    fn variance(&self) -> Number {
        self.trial.variance()
    }

    fn density(&self, x: f64) -> Result<f64> {
        self.trial.density(x)
    }

    fn cumulative(&self, x: f64) -> Result<f64> {
        self.trial.cumulative(x)
    }

    fn percent_point(&self, p: Probability) -> Result<Number> {
        Ok(if p <= self.trial.q() {
            Number::ZERO
        } else {
            Number::ONE
        })
    }
}

// ============================================================================
// Uniform Distribution
// ============================================================================

/// Discrete uniform distribution on the integers `a..=b`.
///
/// # Mathematical Definition
/// - PMF: 1/n with n = b − a + 1
/// - CDF: (k − a + 1)/n
/// - Mean: (a+b)/2, exact when `a + b` is even
/// - Variance: (n² − 1)/12
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    a: i64,
    b: i64,
    n: u64,
}

impl Uniform {
    /// Creates a new uniform distribution on `a..=b`.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if `a >= b` or the range holds more
    /// values than fit in a `u64`.
    ///
    /// # Examples
    /// ```
    /// use hall::distributions::Uniform;
    /// use hall::distribution::Distribution;
    /// use hall::number::Number;
    /// let u = Uniform::new(-5, 5).unwrap();
    /// assert_eq!(u.mean(), Number::Int(0));
    /// assert_eq!(u.variance(), Number::Int(10));
    /// ```
    pub fn new(a: i64, b: i64) -> Result<Self> {
        if a >= b {
            return Err(Error::InvalidParameters(format!(
                "Uniform requires a < b, got a={a}, b={b}"
            )));
        }
        let n = b.abs_diff(a).checked_add(1).ok_or_else(|| {
            Error::InvalidParameters(format!("Uniform range {a}..={b} is too wide"))
        })?;
        Ok(Self { a, b, n })
    }

    pub fn a(&self) -> i64 {
        self.a
    }

    pub fn b(&self) -> i64 {
        self.b
    }

    /// Number of values in the support.
    pub fn n(&self) -> u64 {
        self.n
    }

    fn cmf(&self, k: i64) -> f64 {
        if k < self.a {
            0.0
        } else if k >= self.b {
            1.0
        } else {
            (k.abs_diff(self.a) + 1) as f64 / self.n as f64
        }
    }
}

impl Distribution for Uniform {
    fn is_discrete(&self) -> bool {
        true
    }

    fn support(&self) -> Interval {
        Interval::integers(self.a, self.b)
    }

    fn mean(&self) -> Number {
        (Number::Int(self.a) + Number::Int(self.b)) / Number::Int(2)
    }

    fn variance(&self) -> Number {
        let n = Number::from(self.n);
        (n * n - Number::ONE) / Number::Int(12)
    }

    fn density(&self, x: f64) -> Result<f64> {
        let inside = x >= self.a as f64 && x <= self.b as f64;
        Ok(if inside { 1.0 / self.n as f64 } else { 0.0 })
    }

    fn cumulative(&self, x: f64) -> Result<f64> {
        Ok(self.cmf(x as i64))
    }

    fn percent_point(&self, p: Probability) -> Result<Number> {
        let k = (self.a as f64 - 1.0 + (p * self.n as f64).ceil()).clamp(self.a as f64, self.b as f64);
        let mut k = k as i64;
        // undo an upward rounding of p·n
        if k > self.a && self.cmf(k - 1) >= p {
            k -= 1;
        }
        Ok(Number::Int(k))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pmf_total(d: &dyn Distribution) -> f64 {
        let s = d.support();
        let (a, b) = (s.a().to_integer().unwrap(), s.b().to_integer().unwrap());
        (a..=b).map(|k| d.pdf(Number::Int(k)).unwrap()).sum()
    }

    // --- Normal ---

    #[test]
    fn test_normal_moments() {
        let n = Normal::standard();
        assert_eq!(n.mean(), Number::Real(0.0));
        assert_eq!(n.variance(), Number::Real(1.0));
        assert!(!n.is_discrete());
        assert_eq!(n.support(), Interval::real_line());
    }

    #[test]
    fn test_normal_cdf_at_mean() {
        let n = Normal::new(3.0, 2.0).unwrap();
        assert_eq!(n.cdf(Number::Real(3.0)).unwrap(), 0.5);
        assert_relative_eq!(n.cdf(Number::Real(5.0)).unwrap(), 0.8413447460685429, epsilon = 1e-12);
    }

    #[test]
    fn test_normal_pdf() {
        let n = Normal::standard();
        assert_relative_eq!(
            n.pdf(Number::Real(0.0)).unwrap(),
            1.0 / (2.0 * std::f64::consts::PI).sqrt(),
            epsilon = 1e-15
        );
        assert!(matches!(n.pdf(Number::complex(0.0, 1.0)), Err(Error::Type(_))));
    }

    #[test]
    fn test_normal_quantile() {
        let n = Normal::new(10.0, 2.0).unwrap();
        assert_relative_eq!(n.ppf(0.5).unwrap().re(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(n.ppf(0.975).unwrap().re(), 10.0 + 2.0 * 1.959963984540054, epsilon = 1e-8);
        assert_eq!(n.ppf(0.0).unwrap(), Number::Real(f64::NEG_INFINITY));
        assert_eq!(n.ppf(1.0).unwrap(), Number::Real(f64::INFINITY));
    }

    #[test]
    fn test_normal_invalid() {
        assert!(Normal::new(0.0, 0.0).is_err());
        assert!(Normal::new(0.0, -1.0).is_err());
        assert!(Normal::new(f64::NAN, 1.0).is_err());
        assert!(Normal::new(0.0, f64::INFINITY).is_err());
    }

    // --- Binomial ---

    #[test]
    fn test_binomial_four_halves() {
        let b = Binomial::new(4, 0.5).unwrap();
        let expected = [1.0, 4.0, 6.0, 4.0, 1.0];
        for (k, &c) in expected.iter().enumerate() {
            assert_relative_eq!(b.pdf(Number::from(k)).unwrap(), c / 16.0, epsilon = 1e-15);
        }
        assert_relative_eq!(b.cdf(Number::Int(1)).unwrap(), 5.0 / 16.0, epsilon = 1e-12);
        assert_relative_eq!(b.cdf(Number::Int(2)).unwrap(), 11.0 / 16.0, epsilon = 1e-12);
        assert_eq!(b.cdf(Number::Int(4)).unwrap(), 1.0);
        assert_eq!(b.cdf(Number::Int(-1)).unwrap(), 0.0);
    }

    #[test]
    fn test_binomial_moments() {
        let b = Binomial::new(10, 0.3).unwrap();
        assert_relative_eq!(b.mean().re(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(b.variance().re(), 2.1, epsilon = 1e-12);
        assert!(b.is_discrete());
        assert_eq!(b.support(), Interval::new(0, 10).unwrap());
    }

    #[test]
    fn test_binomial_membership() {
        let b = Binomial::new(7, 0.2).unwrap();
        assert!(b.contains(Number::Int(0)));
        assert!(b.contains(Number::Int(7)));
        assert!(!b.contains(Number::Int(8)));
        assert_eq!(b.pdf(Number::Int(8)).unwrap(), 0.0);
        assert!(matches!(b.pdf(Number::Real(1.5)), Err(Error::Domain(_))));
    }

    #[test]
    fn test_binomial_degenerate_p() {
        let never = Binomial::new(5, 0.0).unwrap();
        assert_eq!(never.pdf(Number::Int(0)).unwrap(), 1.0);
        assert_eq!(never.cdf(Number::Int(0)).unwrap(), 1.0);
        let always = Binomial::new(5, 1.0).unwrap();
        assert_eq!(always.pdf(Number::Int(5)).unwrap(), 1.0);
        assert_eq!(always.cdf(Number::Int(4)).unwrap(), 0.0);
        assert_eq!(Binomial::new(0, 0.3).unwrap().pdf(Number::Int(0)).unwrap(), 1.0);
    }

    #[test]
    fn test_binomial_large_n_uses_log_space() {
        let b = Binomial::new(2000, 0.5).unwrap();
        assert_relative_eq!(pmf_total(&b), 1.0, epsilon = 1e-10);
        assert!(b.pdf(Number::Int(1000)).unwrap().is_finite());
    }

    #[test]
    fn test_binomial_quantile() {
        let b = Binomial::new(4, 0.5).unwrap();
        assert_eq!(b.ppf(0.0).unwrap(), Number::Int(0));
        assert_eq!(b.ppf(1.0 / 16.0).unwrap(), Number::Int(0));
        assert_eq!(b.ppf(0.2).unwrap(), Number::Int(1));
        assert_eq!(b.ppf(0.5).unwrap(), Number::Int(2));
        assert_eq!(b.ppf(1.0).unwrap(), Number::Int(4));
    }

    #[test]
    fn test_binomial_quantile_far_tail() {
        let b = Binomial::new(1000, 0.5).unwrap();
        for p in [1e-17, 1e-16, 5e-16] {
            let k = b.ppf(p).unwrap().to_integer().unwrap();
            assert!(k > 0, "p = {p}");
            assert!(b.cdf(Number::Int(k)).unwrap() >= p);
            assert!(b.cdf(Number::Int(k - 1)).unwrap() < p);
        }
    }

    // --- Bernoulli ---

    #[test]
    fn test_bernoulli() {
        let b = Bernoulli::new(0.4).unwrap();
        assert_relative_eq!(b.mean().re(), 0.4);
        assert_relative_eq!(b.variance().re(), 0.24, epsilon = 1e-15);
        assert_relative_eq!(b.pdf(Number::Int(1)).unwrap(), 0.4);
        assert_relative_eq!(b.pdf(Number::Int(0)).unwrap(), 0.6);
        assert_eq!(b.support(), Interval::new(0, 1).unwrap());
    }

    #[test]
    fn test_bernoulli_quantile() {
        let b = Bernoulli::new(0.4).unwrap();
        assert_eq!(b.ppf(0.6).unwrap(), Number::ZERO);
        assert_eq!(b.ppf(0.61).unwrap(), Number::ONE);
        assert_eq!(b.ppf(0.0).unwrap(), Number::ZERO);
    }

    #[test]
    fn test_bernoulli_invalid() {
        assert!(Bernoulli::new(-0.1).is_err());
        assert!(Bernoulli::new(f64::NAN).is_err());
    }

    // --- Uniform ---

    #[test]
    fn test_uniform_minus_five_five() {
        let u = Uniform::new(-5, 5).unwrap();
        assert_eq!(u.n(), 11);
        assert_eq!(u.mean(), Number::Int(0));
        assert_eq!(u.variance(), Number::Int(10));
        assert_relative_eq!(pmf_total(&u), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_uniform_half_integer_mean() {
        let u = Uniform::new(1, 4).unwrap();
        assert_eq!(u.mean(), Number::Real(2.5));
        assert_relative_eq!(u.variance().re(), 15.0 / 12.0);
    }

    #[test]
    fn test_uniform_cdf_and_quantile() {
        let u = Uniform::new(1, 6).unwrap();
        assert_relative_eq!(u.cdf(Number::Int(3)).unwrap(), 0.5);
        assert_eq!(u.ppf(0.5).unwrap(), Number::Int(3));
        assert_eq!(u.ppf(0.0).unwrap(), Number::Int(1));
        assert_eq!(u.ppf(1.0).unwrap(), Number::Int(6));
        assert_eq!(u.ppf(0.51).unwrap(), Number::Int(4));
    }

    #[test]
    fn test_uniform_invalid() {
        assert!(Uniform::new(5, 5).is_err());
        assert!(Uniform::new(5, 3).is_err());
        assert!(Uniform::new(i64::MIN, i64::MAX).is_err());
    }
}
