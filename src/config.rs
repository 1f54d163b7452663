//! Numeric configuration.
//!
//! The tolerances and iteration bounds used by numeric integration,
//! summation and quantile searches, plus the display precision of events.
//! A host installs one configuration at startup with [`configure`]; every
//! later read goes through [`config`] and sees the same value. Code that
//! needs different settings (e.g. tests running in parallel) passes a
//! [`NumericConfig`] explicitly instead of reconfiguring the process.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static GLOBAL: OnceLock<NumericConfig> = OnceLock::new();

/// Tolerances and iteration bounds for numeric evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericConfig {
    /// Target absolute error of integrals, sums and root searches.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Maximum number of terms in a summation (and bisection steps).
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,

    /// Maximum recursion depth of adaptive quadrature.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Digits after the decimal point when events are displayed.
    #[serde(default = "default_display_digits")]
    pub display_digits: usize,
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_max_terms() -> usize {
    100_000
}

fn default_max_depth() -> usize {
    40
}

fn default_display_digits() -> usize {
    4
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_terms: default_max_terms(),
            max_depth: default_max_depth(),
            display_digits: default_display_digits(),
        }
    }
}

impl NumericConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_display_digits(mut self, digits: usize) -> Self {
        self.display_digits = digits;
        self
    }

    /// Checks that every bound is usable.
    ///
    /// # Errors
    /// [`Error::InvalidParameters`] if the tolerance is not a positive finite
    /// number or an iteration bound is zero.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "tolerance must be finite and > 0, got {}",
                self.tolerance
            )));
        }
        if self.max_terms == 0 {
            return Err(Error::InvalidParameters("max_terms must be > 0".into()));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidParameters("max_depth must be > 0".into()));
        }
        Ok(())
    }
}

/// Installs the process-wide configuration.
///
/// # Errors
/// - [`Error::InvalidParameters`] if `cfg` does not validate.
/// - [`Error::InvalidParameters`] if a configuration was already installed
///   (or already read through [`config`]); the first one stays in effect.
pub fn configure(cfg: NumericConfig) -> Result<()> {
    cfg.validate()?;
    tracing::debug!(?cfg, "installing numeric configuration");
    GLOBAL
        .set(cfg)
        .map_err(|_| Error::InvalidParameters("numeric configuration is already set".into()))
}

/// The process-wide configuration (defaults if none was installed).
pub fn config() -> &'static NumericConfig {
    GLOBAL.get_or_init(NumericConfig::default)
}
