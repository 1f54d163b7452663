//! # hall
//!
//! Symbolic probability-distribution algebra.
//!
//! Random variables are values: they can be shifted, scaled, added and
//! compared, and every comparison yields a lazy [`Event`] whose probability
//! is computed from the underlying distribution when asked for.
//!
//! ```
//! use hall::distributions::Binomial;
//! use hall::stats::{expect, prob};
//! use hall::RandomVar;
//!
//! let x = RandomVar::new(Binomial::new(4, 0.5).unwrap());
//! assert_eq!(expect(&(x.clone() * 2 + 1)).re(), 5.0);
//! assert!((prob(&x.less_or_equal(1)).unwrap() - 5.0 / 16.0).abs() < 1e-12);
//! assert!((prob(&!x.less_or_equal(1)).unwrap() - 11.0 / 16.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`number`] — Integer / real / complex scalars with exact-integer promotion
//! - [`interval`] — Closed intervals, the support type
//! - [`distribution`] — The [`Distribution`] plug-in contract
//! - [`distributions`] — Normal, Binomial, Bernoulli, Uniform
//! - [`random_var`] — Affine random-variable algebra
//! - [`event`] — Lazy events and their probabilities
//! - [`convolution`] — Law of the sum of independent variables
//! - [`stats`] — `P`, `E`, `Var`, `Std`, `Cov`, `Corr`, sampling
//! - [`special`] — Special functions (erf, gamma, beta, inverse normal CDF)
//! - [`quadrature`] — Adaptive integration and bounded summation
//! - [`random`] — Seeded RNG and uniform draws
//! - [`config`] — Process-wide numeric configuration
//!
//! ## Design Philosophy
//!
//! - **Nothing nests**: every affine operation folds into one transform of
//!   one shared distribution
//! - **Exact where possible**: integer parameters stay integers through the
//!   arithmetic
//! - **Property-based testing**: Probability axioms verified via proptest

pub mod config;
pub mod convolution;
pub mod distribution;
pub mod distributions;
pub mod error;
pub mod event;
pub mod interval;
pub mod number;
pub mod quadrature;
pub mod random;
pub mod random_var;
pub mod special;
pub mod stats;

pub use distribution::Distribution;
pub use error::{Error, Result};
pub use event::Event;
pub use interval::Interval;
pub use number::{is_probability, Number, Probability};
pub use random_var::RandomVar;
