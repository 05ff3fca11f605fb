//! # iv-smile-lib: Implied Volatility for Mini-IBEX Option Snapshots
//!
//! `iv-smile-lib` turns scraped Mini-IBEX option quotes and the matching future
//! prices into Black-Scholes implied volatilities, ready to be stored or drawn as
//! smiles, skews and surfaces by the dashboard layer.
//!
//! ## Core Features
//!
//! - **Quote normalization**: Spanish-formatted numbers and dates, field aliases,
//!   option class labels, days-to-expiry with a one-day floor
//! - **Black-Scholes pricing**: closed-form European prices with a guarded domain
//! - **Implied volatility**: Brent inversion over a fixed bracket with a
//!   credibility ceiling that separates "a number" from "a usable number"
//! - **Batch processing**: per-quote failure isolation and reason-coded reports
//!
//! ## Quick Start
//!
//! ```rust
//! use iv_smile_lib::{compute_surface, default_configs, OptionClass, RawRecord};
//!
//! let quotes = vec![
//!     RawRecord::new()
//!         .with("type", "calls")
//!         .with("strike", "14.000")
//!         .with("Ant", "250,00")
//!         .with("date", "2025-06-20")
//!         .with("scrape_date", "2025-05-21"),
//! ];
//! let futures = vec![
//!     RawRecord::new()
//!         .with("date", "2025-06-20")
//!         .with("scrape_date", "2025-05-21")
//!         .with("Ant", "14.000"),
//! ];
//!
//! let report = compute_surface(&quotes, &futures, &default_configs::standard())?;
//! let iv = report.results[0].result.iv.expect("credible volatility");
//! assert!(iv > 0.01 && iv < 0.30);
//! # Ok::<(), iv_smile_lib::IvError>(())
//! ```
//!
//! ## Configuration Presets
//!
//! - `standard()`: bracket [1e-6, 5], 200 iterations, 500% ceiling
//! - `fast()`: looser tolerance, 100 iterations
//! - `precise()`: tight tolerance, 500 iterations

// ================================================================================================
// MODULES
// ================================================================================================

pub mod error;
pub mod models;
pub mod parse;
pub mod pipeline;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

pub use error::{IvError, Result};

// Core data types
pub use pipeline::{
    batch::{compute_iv, match_underlying, run_batch, BatchReport},
    config::{IvConfig, SolverConfig},
    normalize::{days_to_expiry, normalize_quote, normalize_underlying, PricingInputs},
    types::{
        IvRecord, PricedQuote, Quote, RawRecord, RawValue, Reason, Rejection, SkippedRecord,
        SurfacePoint, UnderlyingQuote, VolatilityResult,
    },
};

// Pricing and inversion
pub use models::{
    bs::{price, price_years},
    implied::{solve, solve_days, SolveError, SolveOutcome},
    OptionClass,
};

pub use parse::NumberFormat;

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured pipeline settings.
///
/// - [`standard()`]: the documented defaults
/// - [`fast()`]: interactive dashboards
/// - [`precise()`]: research and regression comparisons
pub mod default_configs {
    use crate::pipeline::config::IvConfig;

    /// Documented defaults: zero rate, ACT/365, 30-day fallback horizon,
    /// bracket [1e-6, 5.0], 200 Brent iterations, tolerance 1e-10, 500% ceiling.
    ///
    /// ```rust
    /// use iv_smile_lib::default_configs;
    ///
    /// let config = default_configs::standard();
    /// assert_eq!(config.solver.iv_ceiling, 5.0);
    /// ```
    pub fn standard() -> IvConfig {
        IvConfig::standard()
    }

    /// Tolerance 1e-8 and 100 iterations.
    pub fn fast() -> IvConfig {
        IvConfig::fast()
    }

    /// Tolerance 1e-14 and 500 iterations.
    pub fn precise() -> IvConfig {
        IvConfig::precise()
    }
}

/// Compute implied volatilities for one scrape snapshot.
///
/// # Arguments
///
/// * `quotes` - Raw option records (calls and puts of any expiry). Field names
///   may use any of the aliases the scrapers emit (`strike`/`strike_price`,
///   `Ant`/`price`/`last_price`, `date`/`vencimiento`, `type`/`tipo`,
///   `scrape_date`).
/// * `underlyings` - Raw future records providing the spot proxy per expiry.
/// * `config` - Pipeline settings; see [`default_configs`].
///
/// # Returns
///
/// A [`BatchReport`] with one [`PricedQuote`] per quote that reached the
/// solver, the skipped records with their [`Rejection`], and counts by
/// [`Reason`]. Non-convergent and out-of-range quotes stay in `results` with
/// `iv = None` and the reason in `failure`.
///
/// # Errors
///
/// * [`IvError::InvalidConfig`] if `config` fails validation
/// * [`IvError::InvalidSpot`] if underlying records were supplied but none has
///   a usable price and expiry
///
/// With no underlying records at all, every quote is skipped as
/// `missing_underlying`; no spot price is ever invented.
pub fn compute_surface(
    quotes: &[RawRecord],
    underlyings: &[RawRecord],
    config: &IvConfig,
) -> Result<BatchReport> {
    run_batch(quotes, underlyings, config)
}
