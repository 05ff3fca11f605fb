use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::implied::SolveOutcome;
use crate::models::OptionClass;

// ================================================================================================
// RAW INPUT RECORDS
// ================================================================================================

/// A primitive field value as delivered by the ingestion layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl RawValue {
    /// Placeholder values the scrapers emit for empty cells.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(v) => v.is_nan(),
            Self::Text(s) => matches!(s.trim(), "" | "NaN" | "nan" | "-"),
        }
    }

    /// The value as text, for diagnostics.
    pub fn display(&self) -> String {
        match self {
            Self::Number(v) => v.to_string(),
            Self::Text(s) => s.clone(),
            Self::Null => String::new(),
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One scraped or stored row: field name → primitive value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<RawValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// First non-blank value among alternate field names, in order.
    pub fn first_valid(&self, keys: &[&str]) -> Option<&RawValue> {
        keys.iter()
            .filter_map(|k| self.fields.get(*k))
            .find(|v| !v.is_blank())
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ================================================================================================
// NORMALIZED INPUTS
// ================================================================================================

/// A validated option quote, ready for pricing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quote {
    pub option_class: OptionClass,
    /// Strike price (> 0)
    pub strike: f64,
    /// Observed option price (> 0)
    pub premium: f64,
    pub expiry_date: Option<NaiveDate>,
    /// Scrape / snapshot date
    pub observation_date: Option<NaiveDate>,
    /// Whole days between observation and expiry, never below 1
    pub days_to_expiry: u32,
    /// True when `days_to_expiry` is the configured default rather than a date difference
    pub horizon_fallback: bool,
}

/// The future price used as spot proxy for options of one expiry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnderlyingQuote {
    pub expiry_date: NaiveDate,
    /// `None` matches quotes of any snapshot
    pub observation_date: Option<NaiveDate>,
    pub spot_price: f64,
}

// ================================================================================================
// REASON CODES
// ================================================================================================

/// Why a quote has no usable implied volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Reason {
    InvalidStrike,
    InvalidPremium,
    NonPositivePremium,
    UnrecognizedOptionClass,
    MissingUnderlying,
    NoConvergence,
    OutOfRange,
}

impl Reason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidStrike => "invalid_strike",
            Self::InvalidPremium => "invalid_premium",
            Self::NonPositivePremium => "non_positive_premium",
            Self::UnrecognizedOptionClass => "unrecognized_option_class",
            Self::MissingUnderlying => "missing_underlying",
            Self::NoConvergence => "no_convergence",
            Self::OutOfRange => "out_of_range",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A quote excluded before reaching the solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("invalid strike: {raw:?}")]
    InvalidStrike { raw: String },

    #[error("invalid premium: {raw:?}")]
    InvalidPremium { raw: String },

    #[error("non-positive premium: {value}")]
    NonPositivePremium { value: f64 },

    /// The unrecognized label is kept verbatim.
    #[error("unrecognized option class: {raw:?}")]
    UnrecognizedOptionClass { raw: String },

    #[error("no underlying quote for expiry {expiry:?}")]
    MissingUnderlying { expiry: Option<NaiveDate> },
}

impl Rejection {
    pub fn reason(&self) -> Reason {
        match self {
            Self::InvalidStrike { .. } => Reason::InvalidStrike,
            Self::InvalidPremium { .. } => Reason::InvalidPremium,
            Self::NonPositivePremium { .. } => Reason::NonPositivePremium,
            Self::UnrecognizedOptionClass { .. } => Reason::UnrecognizedOptionClass,
            Self::MissingUnderlying { .. } => Reason::MissingUnderlying,
        }
    }
}

// ================================================================================================
// OUTPUTS
// ================================================================================================

/// Solver output for one quote.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolatilityResult {
    /// Raw root, present whenever the solver converged
    pub iv_raw: Option<f64>,
    /// `iv_raw` when below the ceiling, otherwise absent
    pub iv: Option<f64>,
    pub days_to_expiry: u32,
    /// Spot proxy the quote was priced against
    pub spot_price: f64,
    pub horizon_fallback: bool,
    /// Black-Scholes vega at `iv`
    pub vega: Option<f64>,
    /// Set exactly when `iv` is absent
    pub failure: Option<Reason>,
}

impl VolatilityResult {
    pub(crate) fn from_outcome(
        outcome: &SolveOutcome,
        quote: &Quote,
        spot_price: f64,
        vega: Option<f64>,
    ) -> Self {
        let failure = match outcome {
            SolveOutcome::Credible(_) => None,
            SolveOutcome::OutOfRange(_) => Some(Reason::OutOfRange),
            SolveOutcome::Failed(_) => Some(Reason::NoConvergence),
        };
        Self {
            iv_raw: outcome.raw(),
            iv: outcome.credible(),
            days_to_expiry: quote.days_to_expiry,
            spot_price,
            horizon_fallback: quote.horizon_fallback,
            vega,
            failure,
        }
    }
}

/// A quote paired with its volatility result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricedQuote {
    pub quote: Quote,
    pub result: VolatilityResult,
}

/// A record that never reached the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Position in the input sequence
    pub index: usize,
    pub rejection: Rejection,
    pub record: RawRecord,
}

/// Flat output row for the persistence / dashboard layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvRecord {
    pub expiry_date: Option<NaiveDate>,
    pub strike: f64,
    pub option_class: OptionClass,
    pub observation_date: Option<NaiveDate>,
    pub iv: Option<f64>,
    pub days_to_expiry: u32,
}

/// One credible point of the volatility surface.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfacePoint {
    pub strike: f64,
    pub days_to_expiry: u32,
    pub iv: f64,
}
