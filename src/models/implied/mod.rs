//! Implied-volatility inversion of the Black-Scholes pricer.
//!
//! The objective `f(σ) = price(σ) − observed` is strictly increasing in σ, so a
//! sign change inside the bracket identifies a unique root. Brent's method
//! (from the `roots` crate) finds it within a bounded number of iterations.
//!
//! A converged root is not automatically trusted: roots at or above the
//! configured ceiling are reported as [`SolveOutcome::OutOfRange`], keeping the
//! raw value for diagnostics while withholding it from downstream consumers.
//! The same holds for premiums that already equal the price at the bracket
//! floor (deep in-the-money quotes at intrinsic), where any σ near the floor
//! fits and none is informative.

use roots::{find_root_brent, SearchError, SimpleConvergency};
use thiserror::Error;

use crate::models::bs::price_years;
use crate::models::utils::{years_from_days, DAYS_PER_YEAR};
use crate::models::OptionClass;
use crate::pipeline::config::SolverConfig;

/// Reasons the solver produced no number at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The objective has the same sign at both bracket ends.
    #[error("no sign change in bracket: f(lower)={at_lower:.6e}, f(upper)={at_upper:.6e}")]
    NoBracket { at_lower: f64, at_upper: f64 },

    /// Brent's method exhausted its iteration budget.
    #[error("no convergence within {max_iterations} iterations")]
    IterationLimit { max_iterations: usize },

    /// Inputs outside the pricer's domain.
    #[error("invalid solver input: {message}")]
    InvalidInput { message: String },
}

/// Result of one inversion.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Converged below the ceiling.
    Credible(f64),
    /// Converged at or above the ceiling, or pinned to the bracket floor.
    OutOfRange(f64),
    /// No root was found.
    Failed(SolveError),
}

impl SolveOutcome {
    /// The solver's numeric output, credible or not.
    pub fn raw(&self) -> Option<f64> {
        match self {
            Self::Credible(v) | Self::OutOfRange(v) => Some(*v),
            Self::Failed(_) => None,
        }
    }

    /// The volatility if it may be used downstream.
    pub fn credible(&self) -> Option<f64> {
        match self {
            Self::Credible(v) => Some(*v),
            _ => None,
        }
    }
}

/// Find σ such that the Black-Scholes price matches `observed_price`.
///
/// `years` is the time to expiry as a year fraction. The returned value is the
/// bare root of the objective; use [`solve`] to apply the credibility ceiling.
pub fn implied_volatility(
    observed_price: f64,
    spot: f64,
    strike: f64,
    years: f64,
    rate: f64,
    class: OptionClass,
    config: &SolverConfig,
) -> Result<f64, SolveError> {
    if !observed_price.is_finite() || observed_price < 0.0 {
        return Err(SolveError::InvalidInput {
            message: format!("observed price must be finite and >= 0, got {observed_price}"),
        });
    }
    if !(spot > 0.0 && strike > 0.0 && years > 0.0) || !rate.is_finite() {
        return Err(SolveError::InvalidInput {
            message: format!(
                "spot={spot}, strike={strike}, years={years}, rate={rate} outside pricer domain"
            ),
        });
    }

    let objective =
        |sigma: f64| price_years(class, spot, strike, years, rate, sigma) - observed_price;

    let mut convergency = SimpleConvergency {
        eps: config.tolerance,
        max_iter: config.max_iterations,
    };

    match find_root_brent(
        config.lower_bound,
        config.upper_bound,
        &objective,
        &mut convergency,
    ) {
        Ok(sigma) => Ok(sigma),
        Err(SearchError::NoBracketing) => Err(SolveError::NoBracket {
            at_lower: objective(config.lower_bound),
            at_upper: objective(config.upper_bound),
        }),
        Err(_) => Err(SolveError::IterationLimit {
            max_iterations: config.max_iterations,
        }),
    }
}

/// Invert the pricer and classify the root against `config.iv_ceiling`.
///
/// `years` is a year fraction; [`solve_days`] takes calendar days like
/// [`crate::models::bs::price`]. Never panics and never clamps: every input
/// maps to one of the three [`SolveOutcome`] variants.
///
/// ```rust
/// use iv_smile_lib::models::{bs, implied::{solve, SolveOutcome}, OptionClass};
/// use iv_smile_lib::SolverConfig;
///
/// let years = 30.0 / 365.0;
/// let premium = bs::price_years(OptionClass::Call, 14_000.0, 14_000.0, years, 0.0, 0.18);
/// let config = SolverConfig::default();
/// let outcome = solve(premium, 14_000.0, 14_000.0, years, 0.0, OptionClass::Call, &config);
/// assert!(matches!(outcome, SolveOutcome::Credible(v) if (v - 0.18).abs() < 1e-6));
/// ```
pub fn solve(
    observed_price: f64,
    spot: f64,
    strike: f64,
    years: f64,
    rate: f64,
    class: OptionClass,
    config: &SolverConfig,
) -> SolveOutcome {
    match implied_volatility(observed_price, spot, strike, years, rate, class, config) {
        Ok(sigma) if sigma >= config.iv_ceiling => SolveOutcome::OutOfRange(sigma),
        Ok(sigma) => {
            let floor_price = price_years(class, spot, strike, years, rate, config.lower_bound);
            let slack = config.tolerance.max(4.0 * f64::EPSILON * observed_price);
            if observed_price - floor_price <= slack {
                SolveOutcome::OutOfRange(sigma)
            } else {
                SolveOutcome::Credible(sigma)
            }
        }
        Err(e) => SolveOutcome::Failed(e),
    }
}

/// [`solve`] with the horizon in calendar days (ACT/365).
///
/// ```rust
/// use iv_smile_lib::models::{bs, implied::solve_days, OptionClass};
/// use iv_smile_lib::SolverConfig;
///
/// let premium = bs::price(14_000.0, 14_000.0, 30, 0.0, 0.18, OptionClass::Call);
/// let config = SolverConfig::default();
/// let outcome = solve_days(premium, 14_000.0, 14_000.0, 30, 0.0, OptionClass::Call, &config);
/// assert!((outcome.credible().unwrap() - 0.18).abs() < 1e-6);
/// ```
pub fn solve_days(
    observed_price: f64,
    spot: f64,
    strike: f64,
    days_to_expiry: u32,
    rate: f64,
    class: OptionClass,
    config: &SolverConfig,
) -> SolveOutcome {
    let years = years_from_days(days_to_expiry, DAYS_PER_YEAR);
    solve(observed_price, spot, strike, years, rate, class, config)
}
