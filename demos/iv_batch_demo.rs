// demos/iv_batch_demo.rs

//! Demonstration of the implied-volatility batch pipeline
//!
//! This example shows how to:
//! 1. Build raw quote and future records the way the scrapers deliver them
//! 2. Run the batch with the standard configuration
//! 3. Inspect credible smiles, failures and skipped records

use anyhow::Result;
use chrono::NaiveDate;
use iv_smile_lib::{compute_surface, default_configs, OptionClass, RawRecord};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("Mini-IBEX Implied Volatility Demo");
    println!("=================================");

    let scrape = "2025-05-21";
    let expiry = "20/06/2025";

    let mut quotes = Vec::new();
    for (strike, call, put) in [
        ("13.500", "630,71", "110,71"),
        ("13.750", "449,80", "179,80"),
        ("14.000", "299,19", "279,19"),
        ("14.250", "183,02", "413,02"),
        ("14.500", "101,44", "581,44"),
    ] {
        for (class, premium) in [("Calls", call), ("Puts", put)] {
            quotes.push(
                RawRecord::new()
                    .with("type", class)
                    .with("strike", strike)
                    .with("Ant", premium)
                    .with("date", expiry)
                    .with("scrape_date", scrape),
            );
        }
    }
    // a row the table footer leaves behind
    quotes.push(
        RawRecord::new()
            .with("type", "Calls")
            .with("strike", "Volumen Total")
            .with("Ant", "1.234"),
    );

    let futures = vec![RawRecord::new()
        .with("date", expiry)
        .with("scrape_date", scrape)
        .with("Ant", "14.020,00")];

    let config = default_configs::standard();
    let report = compute_surface(&quotes, &futures, &config)?;

    println!("\nSolved {} quotes, skipped {}", report.results.len(), report.skipped.len());
    for (reason, count) in &report.counts {
        println!("  {reason}: {count}");
    }

    let expiry_date = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap_or_default();
    for class in [OptionClass::Call, OptionClass::Put] {
        println!("\n{} smile (20 Jun 2025):", class);
        for (strike, iv) in report.smile(expiry_date, class) {
            println!("  K={:>8.0}  IV={:>6.2}%", strike, iv * 100.0);
        }
    }

    for skipped in &report.skipped {
        println!("\nSkipped row {}: {}", skipped.index, skipped.rejection);
    }

    Ok(())
}
