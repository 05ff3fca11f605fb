use chrono::NaiveDate;
use iv_smile_lib::{
    days_to_expiry, normalize_quote, normalize_underlying, IvConfig, NumberFormat, OptionClass,
    RawRecord, RawValue, Reason, Rejection,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn quote(class: &str, strike: impl Into<RawValue>, premium: impl Into<RawValue>) -> RawRecord {
    RawRecord::new()
        .with("tipo", class)
        .with("strike_price", strike)
        .with("price", premium)
        .with("vencimiento", "16 may. 2025")
        .with("scrape_date", "2025-04-16 00:00:00")
}

#[test]
fn test_option_class_labels() {
    for (label, expected) in [
        ("call", OptionClass::Call),
        ("Calls", OptionClass::Call),
        (" C ", OptionClass::Call),
        ("put", OptionClass::Put),
        ("PUTS", OptionClass::Put),
        ("p", OptionClass::Put),
    ] {
        assert_eq!(OptionClass::from_label(label), Some(expected), "{label}");
    }
    assert_eq!(OptionClass::from_label("futures"), None);
}

/// Unknown labels come back verbatim in the rejection.
#[test]
fn test_unrecognized_class_passed_through() {
    let err = normalize_quote(&quote("futures", 14_000.0, 12.0), &IvConfig::default()).unwrap_err();
    assert_eq!(
        err,
        Rejection::UnrecognizedOptionClass {
            raw: "futures".into()
        }
    );
    assert_eq!(err.reason(), Reason::UnrecognizedOptionClass);
}

#[test]
fn test_aliases_and_spanish_formats() {
    let q = normalize_quote(&quote("puts", "13.750", "1.025,5"), &IvConfig::default()).unwrap();

    assert_eq!(q.option_class, OptionClass::Put);
    assert_eq!(q.strike, 13_750.0);
    assert_eq!(q.premium, 1_025.5);
    assert_eq!(q.expiry_date, Some(ymd(2025, 5, 16)));
    assert_eq!(q.observation_date, Some(ymd(2025, 4, 16)));
    assert_eq!(q.days_to_expiry, 30);
    assert!(!q.horizon_fallback);
}

/// Blank placeholders fall through to the next alias.
#[test]
fn test_first_valid_alias_skips_placeholders() {
    let record = quote("call", 14_000.0, 99.0)
        .with("Ant", "-")
        .with("premium", RawValue::Null);
    let q = normalize_quote(&record, &IvConfig::default()).unwrap();
    assert_eq!(q.premium, 99.0);
}

/// Dot-decimal text is not mistaken for thousands grouping.
#[test]
fn test_dot_decimal_text_in_european_mode() {
    let config = IvConfig::default();

    let q = normalize_quote(&quote("call", "14000.5", "120.5"), &config).unwrap();
    assert_eq!(q.strike, 14_000.5);
    assert_eq!(q.premium, 120.5);

    let err = normalize_quote(&quote("call", "1.2.3", "120.5"), &config).unwrap_err();
    assert_eq!(err.reason(), Reason::InvalidStrike);
    let err = normalize_quote(&quote("call", "14.000", "1.2.3"), &config).unwrap_err();
    assert_eq!(err.reason(), Reason::InvalidPremium);
}

#[test]
fn test_plain_number_format() {
    let config = IvConfig {
        number_format: NumberFormat::Plain,
        ..IvConfig::default()
    };
    let q = normalize_quote(&quote("call", "14000", "250.5"), &config).unwrap();
    assert_eq!(q.premium, 250.5);
}

#[test]
fn test_strike_rejections() {
    let config = IvConfig::default();
    for strike in [
        RawValue::from(0.0),
        RawValue::from(-14_000.0),
        RawValue::from("Strike"),
        RawValue::Null,
    ] {
        let err = normalize_quote(&quote("call", strike.clone(), 10.0), &config).unwrap_err();
        assert_eq!(err.reason(), Reason::InvalidStrike, "strike {:?}", strike);
    }
}

#[test]
fn test_premium_rejections() {
    let config = IvConfig::default();

    let negative = normalize_quote(&quote("call", 14_000.0, -1.0), &config).unwrap_err();
    assert_eq!(negative.reason(), Reason::InvalidPremium);

    let text = normalize_quote(&quote("call", 14_000.0, "abc"), &config).unwrap_err();
    assert_eq!(text.reason(), Reason::InvalidPremium);

    let zero = normalize_quote(&quote("call", 14_000.0, "0,00"), &config).unwrap_err();
    assert_eq!(zero, Rejection::NonPositivePremium { value: 0.0 });
}

/// Strike problems are reported even when the premium is also bad.
#[test]
fn test_strike_checked_before_premium() {
    let err = normalize_quote(&quote("call", -5.0, -1.0), &IvConfig::default()).unwrap_err();
    assert_eq!(err.reason(), Reason::InvalidStrike);
}

#[test]
fn test_days_to_expiry_floor_and_fallback() {
    let d = ymd(2025, 6, 20);
    assert_eq!(days_to_expiry(Some(d), Some(d), 30), (1, false));
    assert_eq!(days_to_expiry(Some(ymd(2025, 6, 19)), Some(d), 30), (1, false));
    assert_eq!(days_to_expiry(Some(d), Some(ymd(2025, 5, 21)), 30), (30, false));
    assert_eq!(days_to_expiry(None, Some(d), 30), (30, true));
    assert_eq!(days_to_expiry(Some(d), None, 45), (45, true));
}

#[test]
fn test_unparsable_dates_use_fallback_horizon() {
    let config = IvConfig {
        default_days_to_expiry: 21,
        ..IvConfig::default()
    };
    let record = quote("call", 14_000.0, 120.0).with("vencimiento", "someday");
    let q = normalize_quote(&record, &config).unwrap();
    assert_eq!(q.expiry_date, None);
    assert_eq!(q.days_to_expiry, 21);
    assert!(q.horizon_fallback);
}

#[test]
fn test_normalize_underlying() {
    let config = IvConfig::default();
    let record = RawRecord::new()
        .with("date", "2025-06-20")
        .with("scrape_date", "2025-05-21")
        .with("last_price", "")
        .with("Ant", "14.020,00");
    let u = normalize_underlying(&record, &config).unwrap();
    assert_eq!(u.spot_price, 14_020.0);
    assert_eq!(u.expiry_date, ymd(2025, 6, 20));
    assert_eq!(u.observation_date, Some(ymd(2025, 5, 21)));

    let no_expiry = RawRecord::new().with("Ant", 14_020.0);
    assert!(normalize_underlying(&no_expiry, &config).is_none());

    let no_price = RawRecord::new().with("date", "2025-06-20").with("Ant", "-");
    assert!(normalize_underlying(&no_price, &config).is_none());
}

#[test]
#[cfg(feature = "serde")]
fn test_raw_record_from_json() {
    let record: RawRecord = serde_json::from_str(
        r#"{"type": "calls", "strike": "14.000", "price": 250.0, "date": "2025-06-20", "scrape_date": null}"#,
    )
    .unwrap();
    assert_eq!(record.get("price"), Some(&RawValue::Number(250.0)));
    assert_eq!(record.get("scrape_date"), Some(&RawValue::Null));

    let q = normalize_quote(&record, &IvConfig::default()).unwrap();
    assert_eq!(q.strike, 14_000.0);
    assert!(q.horizon_fallback);
}
