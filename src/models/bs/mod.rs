// Closed-form Black-Scholes-Merton pricing used by the implied-volatility solver.
// Continuous compounding, no dividend yield: the underlying is a future used as
// spot proxy and the rate defaults to zero throughout the pipeline.

use super::utils::{years_from_days, DAYS_PER_YEAR};
use super::OptionClass;

const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Standard normal CDF. `erfc` keeps precision in the far tails.
fn norm_cdf(x: f64) -> f64 {
    0.5 * libm::erfc(-x / std::f64::consts::SQRT_2)
}

fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Discounted intrinsic value, the limit of the formula as σ√T → 0.
#[allow(non_snake_case)]
fn intrinsic(class: OptionClass, S: f64, K: f64, r: f64, T: f64) -> f64 {
    let df = (-r * T.max(0.0)).exp();
    match class {
        OptionClass::Call => (S - K * df).max(0.0),
        OptionClass::Put => (K * df - S).max(0.0),
    }
}

#[allow(non_snake_case)]
fn d1_d2(S: f64, K: f64, r: f64, T: f64, sigma: f64) -> (f64, f64) {
    let vol_sqrt_t = sigma * T.sqrt();
    let d1 = ((S / K).ln() + (r + 0.5 * sigma.powi(2)) * T) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Price of a European call option under Black-Scholes assumptions.
#[allow(non_snake_case)]
pub fn bs_call_price(S: f64, K: f64, r: f64, T: f64, sigma: f64) -> f64 {
    if T <= 0.0 || sigma <= 0.0 || S <= 0.0 || K <= 0.0 {
        return intrinsic(OptionClass::Call, S, K, r, T);
    }
    let (d1, d2) = d1_d2(S, K, r, T, sigma);
    (S * norm_cdf(d1) - K * (-r * T).exp() * norm_cdf(d2)).max(0.0)
}

/// Price of a European put option under Black-Scholes assumptions.
#[allow(non_snake_case)]
pub fn bs_put_price(S: f64, K: f64, r: f64, T: f64, sigma: f64) -> f64 {
    if T <= 0.0 || sigma <= 0.0 || S <= 0.0 || K <= 0.0 {
        return intrinsic(OptionClass::Put, S, K, r, T);
    }
    let (d1, d2) = d1_d2(S, K, r, T, sigma);
    (K * (-r * T).exp() * norm_cdf(-d2) - S * norm_cdf(-d1)).max(0.0)
}

/// Black-Scholes price for a year fraction `years`.
pub fn price_years(
    class: OptionClass,
    spot: f64,
    strike: f64,
    years: f64,
    rate: f64,
    volatility: f64,
) -> f64 {
    match class {
        OptionClass::Call => bs_call_price(spot, strike, rate, years, volatility),
        OptionClass::Put => bs_put_price(spot, strike, rate, years, volatility),
    }
}

/// Black-Scholes price with time to expiry given in days on an ACT/365 basis.
///
/// ```rust
/// use iv_smile_lib::models::{bs::price, OptionClass};
///
/// let call = price(14_000.0, 14_000.0, 30, 0.0, 0.2, OptionClass::Call);
/// let put = price(14_000.0, 14_000.0, 30, 0.0, 0.2, OptionClass::Put);
/// // ATM with zero rate: put-call parity makes both legs equal
/// assert!((call - put).abs() < 1e-9);
/// ```
pub fn price(
    spot: f64,
    strike: f64,
    days_to_expiry: u32,
    rate: f64,
    volatility: f64,
    class: OptionClass,
) -> f64 {
    let years = years_from_days(days_to_expiry, DAYS_PER_YEAR);
    price_years(class, spot, strike, years, rate, volatility)
}

/// Sensitivity of the price to volatility (per unit σ). Same for calls and puts.
#[allow(non_snake_case)]
pub fn vega(S: f64, K: f64, r: f64, T: f64, sigma: f64) -> f64 {
    if T <= 0.0 || sigma <= 0.0 || S <= 0.0 || K <= 0.0 {
        return 0.0;
    }
    let (d1, _) = d1_d2(S, K, r, T, sigma);
    S * norm_pdf(d1) * T.sqrt()
}
