use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{IvError, Result};
use crate::models::bs::vega;
use crate::models::implied::{solve, SolveOutcome};
use crate::models::OptionClass;

use super::config::IvConfig;
use super::normalize::{normalize_quote, normalize_underlying, pricing_inputs};
use super::types::{
    IvRecord, PricedQuote, Quote, RawRecord, Reason, Rejection, SkippedRecord, SurfacePoint,
    UnderlyingQuote, VolatilityResult,
};

/// Everything produced for one snapshot.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Every quote that reached the solver, in input order
    pub results: Vec<PricedQuote>,
    /// Records rejected before solving, in input order
    pub skipped: Vec<SkippedRecord>,
    /// Skipped and failed records by reason
    pub counts: BTreeMap<Reason, usize>,
    /// Underlying records dropped for lack of a usable price or expiry
    pub invalid_underlyings: usize,
}

impl BatchReport {
    pub fn count(&self, reason: Reason) -> usize {
        self.counts.get(&reason).copied().unwrap_or(0)
    }

    /// Quotes with a credible implied volatility.
    pub fn credible_count(&self) -> usize {
        self.results.iter().filter(|p| p.result.iv.is_some()).count()
    }

    /// Credible (strike, iv) points of one expiry and class, sorted by strike.
    pub fn smile(&self, expiry: NaiveDate, class: OptionClass) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .results
            .iter()
            .filter(|p| p.quote.expiry_date == Some(expiry) && p.quote.option_class == class)
            .filter_map(|p| p.result.iv.map(|iv| (p.quote.strike, iv)))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }

    /// Credible points across all expiries, sorted by horizon then strike.
    pub fn surface(&self, class: OptionClass) -> Vec<SurfacePoint> {
        let mut points: Vec<SurfacePoint> = self
            .results
            .iter()
            .filter(|p| p.quote.option_class == class)
            .filter_map(|p| {
                p.result.iv.map(|iv| SurfacePoint {
                    strike: p.quote.strike,
                    days_to_expiry: p.result.days_to_expiry,
                    iv,
                })
            })
            .collect();
        points.sort_by(|a, b| {
            a.days_to_expiry
                .cmp(&b.days_to_expiry)
                .then(a.strike.total_cmp(&b.strike))
        });
        points
    }

    /// Flat rows for the persistence layer, one per solved quote.
    pub fn records(&self) -> Vec<IvRecord> {
        self.results
            .iter()
            .map(|p| IvRecord {
                expiry_date: p.quote.expiry_date,
                strike: p.quote.strike,
                option_class: p.quote.option_class,
                observation_date: p.quote.observation_date,
                iv: p.result.iv,
                days_to_expiry: p.result.days_to_expiry,
            })
            .collect()
    }

    fn tally(&mut self, reason: Reason) {
        *self.counts.entry(reason).or_insert(0) += 1;
    }
}

/// Pick the underlying for a quote.
///
/// Candidates share the quote's observation date (an unknown date on either
/// side matches). Among them an exact expiry wins, else the nearest expiry by
/// absolute day distance, ties going to the earlier expiry. A quote without an
/// expiry takes the candidate nearest its observation date. When candidates
/// from several snapshots list the same expiry, the latest snapshot wins.
pub fn match_underlying<'a>(
    quote: &Quote,
    underlyings: &'a [UnderlyingQuote],
) -> Option<&'a UnderlyingQuote> {
    let target = quote.expiry_date.or(quote.observation_date)?;

    underlyings
        .iter()
        .filter(|u| match (u.observation_date, quote.observation_date) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        })
        .min_by_key(|u| {
            (
                (u.expiry_date - target).num_days().abs(),
                u.expiry_date,
                Reverse(u.observation_date),
            )
        })
}

/// Implied volatility for one validated quote against its matched underlying.
///
/// Only a missing underlying is a rejection; solver failures are reported
/// inside the [`VolatilityResult`].
pub fn compute_iv(
    quote: &Quote,
    underlying: Option<&UnderlyingQuote>,
    config: &IvConfig,
) -> std::result::Result<VolatilityResult, Rejection> {
    let inputs = pricing_inputs(quote, underlying, config)?;

    let outcome = solve(
        inputs.premium,
        inputs.spot,
        inputs.strike,
        inputs.years,
        inputs.rate,
        inputs.option_class,
        &config.solver,
    );

    debug!(
        strike = inputs.strike,
        premium = inputs.premium,
        spot = inputs.spot,
        days = inputs.days_to_expiry,
        iv_raw = ?outcome.raw(),
        "implied volatility solved"
    );
    if let SolveOutcome::Failed(e) = &outcome {
        debug!(strike = inputs.strike, error = %e, "solver returned no root");
    }

    let vega = outcome
        .credible()
        .map(|iv| vega(inputs.spot, inputs.strike, inputs.rate, inputs.years, iv));

    Ok(VolatilityResult::from_outcome(
        &outcome,
        quote,
        inputs.spot,
        vega,
    ))
}

/// Compute implied volatilities for every quote of a snapshot.
///
/// Each quote is processed independently: a rejection or a solver failure is
/// recorded in the report and never stops the batch. The call fails only when
/// underlying records were supplied and none of them is usable.
pub fn run_batch(
    quotes: &[RawRecord],
    underlyings: &[RawRecord],
    config: &IvConfig,
) -> Result<BatchReport> {
    config.validate()?;

    let spots: Vec<UnderlyingQuote> = underlyings
        .iter()
        .filter_map(|r| normalize_underlying(r, config))
        .collect();
    let invalid_underlyings = underlyings.len() - spots.len();

    if !underlyings.is_empty() && spots.is_empty() {
        return Err(IvError::InvalidSpot {
            supplied: underlyings.len(),
        });
    }
    if invalid_underlyings > 0 {
        warn!(
            dropped = invalid_underlyings,
            "underlying records without usable price or expiry"
        );
    }

    let mut report = BatchReport {
        invalid_underlyings,
        ..BatchReport::default()
    };

    for (index, record) in quotes.iter().enumerate() {
        let priced = normalize_quote(record, config).and_then(|quote| {
            let matched = match_underlying(&quote, &spots);
            compute_iv(&quote, matched, config).map(|result| PricedQuote { quote, result })
        });

        match priced {
            Ok(priced) => {
                if let Some(reason) = priced.result.failure {
                    report.tally(reason);
                }
                report.results.push(priced);
            }
            Err(rejection) => {
                let reason = rejection.reason();
                warn!(index, reason = %reason, detail = %rejection, "quote skipped");
                report.tally(reason);
                report.skipped.push(SkippedRecord {
                    index,
                    rejection,
                    record: record.clone(),
                });
            }
        }
    }

    info!(
        quotes = quotes.len(),
        solved = report.results.len(),
        credible = report.credible_count(),
        skipped = report.skipped.len(),
        "implied volatility batch complete"
    );

    Ok(report)
}
