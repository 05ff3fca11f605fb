//! Quote normalization: raw scraped records → validated pricing inputs.
//!
//! Field names vary between the scrapers and the stored tables, so every input
//! is looked up through a list of aliases and the first non-blank value wins.

use chrono::NaiveDate;

use crate::models::utils::years_from_days;
use crate::models::OptionClass;
use crate::parse::{parse_date, parse_number, NumberFormat};

use super::config::IvConfig;
use super::types::{Quote, RawRecord, RawValue, Rejection, UnderlyingQuote};

pub const STRIKE_FIELDS: &[&str] = &["strike", "strike_price", "Strike"];
pub const PREMIUM_FIELDS: &[&str] = &["premium", "Ant", "Ant.", "price", "ultimo", "last_price"];
pub const EXPIRY_FIELDS: &[&str] = &["expiry_date", "date", "fecha", "vencimiento"];
pub const CLASS_FIELDS: &[&str] = &["option_class", "type", "tipo"];
pub const OBSERVATION_FIELDS: &[&str] = &["observation_date", "scrape_date"];
pub const SPOT_FIELDS: &[&str] = &[
    "spot_price",
    "last_price",
    "Ant",
    "Ant.",
    "precio",
    "price",
    "ultimo",
];

/// Numeric inputs for one solver call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingInputs {
    pub option_class: OptionClass,
    pub strike: f64,
    pub premium: f64,
    pub spot: f64,
    pub days_to_expiry: u32,
    /// `days_to_expiry / day_count_basis`
    pub years: f64,
    pub rate: f64,
}

fn value_as_number(value: &RawValue, format: NumberFormat) -> Option<f64> {
    match value {
        RawValue::Number(v) if v.is_finite() => Some(*v),
        RawValue::Text(s) => parse_number(s, format),
        _ => None,
    }
}

fn value_as_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Text(s) => parse_date(s),
        _ => None,
    }
}

fn field_date(record: &RawRecord, keys: &[&str]) -> Option<NaiveDate> {
    record.first_valid(keys).and_then(value_as_date)
}

/// `max(expiry − observation, 1)` in whole days, or the fallback horizon when
/// either date is unknown. The flag reports whether the fallback was used.
pub fn days_to_expiry(
    expiry: Option<NaiveDate>,
    observation: Option<NaiveDate>,
    default_days: u32,
) -> (u32, bool) {
    match (expiry, observation) {
        (Some(exp), Some(obs)) => {
            let days = (exp - obs).num_days().max(1);
            (u32::try_from(days).unwrap_or(u32::MAX), false)
        }
        _ => (default_days.max(1), true),
    }
}

/// Validate one raw option quote.
///
/// Checks run in order: option class, strike, premium. Dates never reject a
/// quote; unusable dates switch it to the fallback horizon instead.
pub fn normalize_quote(record: &RawRecord, config: &IvConfig) -> Result<Quote, Rejection> {
    let format = config.number_format;

    let class_raw = record.first_valid(CLASS_FIELDS);
    let option_class = class_raw
        .and_then(|v| match v {
            RawValue::Text(s) => OptionClass::from_label(s),
            _ => None,
        })
        .ok_or_else(|| Rejection::UnrecognizedOptionClass {
            raw: class_raw.map(RawValue::display).unwrap_or_default(),
        })?;

    let strike_raw = record.first_valid(STRIKE_FIELDS);
    let strike = strike_raw
        .and_then(|v| value_as_number(v, format))
        .filter(|k| *k > 0.0)
        .ok_or_else(|| Rejection::InvalidStrike {
            raw: strike_raw.map(RawValue::display).unwrap_or_default(),
        })?;

    let premium_raw = record.first_valid(PREMIUM_FIELDS);
    let premium = premium_raw
        .and_then(|v| value_as_number(v, format))
        .filter(|p| *p >= 0.0)
        .ok_or_else(|| Rejection::InvalidPremium {
            raw: premium_raw.map(RawValue::display).unwrap_or_default(),
        })?;
    if premium == 0.0 {
        return Err(Rejection::NonPositivePremium { value: premium });
    }

    let expiry_date = field_date(record, EXPIRY_FIELDS);
    let observation_date = field_date(record, OBSERVATION_FIELDS);
    let (days_to_expiry, horizon_fallback) =
        days_to_expiry(expiry_date, observation_date, config.default_days_to_expiry);

    Ok(Quote {
        option_class,
        strike,
        premium,
        expiry_date,
        observation_date,
        days_to_expiry,
        horizon_fallback,
    })
}

/// Validate one raw underlying (future) record. `None` when it has no usable
/// expiry or no positive price.
pub fn normalize_underlying(record: &RawRecord, config: &IvConfig) -> Option<UnderlyingQuote> {
    let spot_price = record
        .first_valid(SPOT_FIELDS)
        .and_then(|v| value_as_number(v, config.number_format))
        .filter(|s| *s > 0.0)?;
    let expiry_date = field_date(record, EXPIRY_FIELDS)?;
    let observation_date = field_date(record, OBSERVATION_FIELDS);

    Some(UnderlyingQuote {
        expiry_date,
        observation_date,
        spot_price,
    })
}

/// Combine a validated quote with its matched underlying.
pub fn pricing_inputs(
    quote: &Quote,
    underlying: Option<&UnderlyingQuote>,
    config: &IvConfig,
) -> Result<PricingInputs, Rejection> {
    let spot = underlying
        .map(|u| u.spot_price)
        .filter(|s| s.is_finite() && *s > 0.0)
        .ok_or(Rejection::MissingUnderlying {
            expiry: quote.expiry_date,
        })?;

    Ok(PricingInputs {
        option_class: quote.option_class,
        strike: quote.strike,
        premium: quote.premium,
        spot,
        days_to_expiry: quote.days_to_expiry,
        years: years_from_days(quote.days_to_expiry, config.day_count_basis),
        rate: config.rate,
    })
}
