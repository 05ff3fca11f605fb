//! Lenient parsing of the textual values found in scraped snapshots.
//!
//! Prices on the source site are Spanish-formatted (`14.025,50`) and dates come
//! in ISO, numeric `dd/mm/yyyy`, or Spanish month-abbreviation form
//! (`16 may. 2025`).

use chrono::NaiveDate;

/// How textual numbers are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NumberFormat {
    /// `.` groups thousands, `,` is the decimal separator. A lone `.` that
    /// does not group thousands (`120.5`) is read as a decimal point.
    #[default]
    European,
    /// Plain `1234.5` notation.
    Plain,
}

const SPANISH_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Parse a number written as text. Returns `None` for anything non-finite.
pub fn parse_number(text: &str, format: NumberFormat) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: f64 = match format {
        NumberFormat::European => parse_european(trimmed)?,
        NumberFormat::Plain => trimmed.parse().ok()?,
    };

    value.is_finite().then_some(value)
}

fn parse_european(text: &str) -> Option<f64> {
    let (integer, fraction) = match text.split_once(',') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };
    let unsigned = integer
        .strip_prefix('-')
        .or_else(|| integer.strip_prefix('+'))
        .unwrap_or(integer);

    if unsigned.contains('.') && !is_thousands_grouped(unsigned) {
        // `120.5` style: only a single dot and no decimal comma
        return match fraction {
            None if unsigned.matches('.').count() == 1 => text.parse().ok(),
            _ => None,
        };
    }

    let mut normalized = integer.replace('.', "");
    if let Some(fraction) = fraction {
        normalized.push('.');
        normalized.push_str(fraction);
    }
    normalized.parse().ok()
}

/// `14.025.000`: a leading group of 1-3 digits, then groups of exactly 3.
fn is_thousands_grouped(digits: &str) -> bool {
    let mut groups = digits.split('.');
    let leading_ok = groups.next().is_some_and(|first| {
        (1..=3).contains(&first.len())
            && !first.starts_with('0')
            && first.bytes().all(|b| b.is_ascii_digit())
    });
    leading_ok && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse a calendar date in any of the supported layouts.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();

    // ISO, optionally followed by a time component
    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Some(date);
    }

    parse_spanish_date(trimmed)
}

/// `16 may. 2025` → 2025-05-16
fn parse_spanish_date(text: &str) -> Option<NaiveDate> {
    let lower = text.to_lowercase();
    let parts: Vec<&str> = lower.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month_name = parts[1].trim_end_matches('.');
    let month = SPANISH_MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
    let year: i32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}
