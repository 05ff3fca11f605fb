use iv_smile_lib::models::bs::{bs_call_price, bs_put_price, price, price_years, vega};
use iv_smile_lib::OptionClass;
use proptest::prelude::*;

/// Put-call parity with zero rate: C - P = S - K.
#[test]
fn test_put_call_parity() {
    let (spot, t, sigma) = (14_000.0, 45.0 / 365.0, 0.22);
    for strike in [12_000.0, 13_500.0, 14_000.0, 14_750.0, 16_000.0] {
        let call = bs_call_price(spot, strike, 0.0, t, sigma);
        let put = bs_put_price(spot, strike, 0.0, t, sigma);
        assert!(
            (call - put - (spot - strike)).abs() < 1e-8,
            "parity broken at K={}: C={}, P={}",
            strike,
            call,
            put
        );
    }
}

/// Parity with a non-zero rate uses the discounted strike.
#[test]
fn test_put_call_parity_with_rate() {
    let (spot, strike, r, t, sigma) = (14_000.0, 14_250.0, 0.03, 0.5, 0.2);
    let call = bs_call_price(spot, strike, r, t, sigma);
    let put = bs_put_price(spot, strike, r, t, sigma);
    let expected = spot - strike * (-r * t).exp();
    assert!((call - put - expected).abs() < 1e-8);
}

/// The days-based entry point uses ACT/365.
#[test]
fn test_price_days_matches_years() {
    let by_days = price(14_000.0, 13_800.0, 30, 0.0, 0.18, OptionClass::Put);
    let by_years = price_years(OptionClass::Put, 14_000.0, 13_800.0, 30.0 / 365.0, 0.0, 0.18);
    assert_eq!(by_days, by_years);
}

/// Textbook value: S=K=100, r=5%, T=1, σ=20% → call ≈ 10.4506.
#[test]
fn test_reference_value() {
    let call = bs_call_price(100.0, 100.0, 0.05, 1.0, 0.2);
    assert!((call - 10.450_583_572_185_565).abs() < 1e-9, "got {}", call);
}

/// Degenerate inputs fall back to intrinsic value instead of dividing by zero.
#[test]
fn test_degenerate_inputs_are_guarded() {
    assert_eq!(bs_call_price(14_000.0, 13_000.0, 0.0, 0.0, 0.2), 1_000.0);
    assert_eq!(bs_put_price(14_000.0, 13_000.0, 0.0, 0.0, 0.2), 0.0);
    assert_eq!(bs_call_price(14_000.0, 15_000.0, 0.0, 0.1, 0.0), 0.0);
    assert_eq!(bs_put_price(14_000.0, 15_000.0, 0.0, 0.1, -0.1), 1_000.0);

    for p in [
        bs_call_price(0.0, 14_000.0, 0.0, 0.1, 0.2),
        bs_put_price(14_000.0, 0.0, 0.0, 0.1, 0.2),
        bs_call_price(-1.0, 14_000.0, 0.0, 0.1, 0.2),
    ] {
        assert!(p.is_finite() && p >= 0.0, "got {}", p);
    }
}

#[test]
fn test_vega_positive_and_peaks_near_atm() {
    let t = 30.0 / 365.0;
    let atm = vega(14_000.0, 14_000.0, 0.0, t, 0.2);
    let otm = vega(14_000.0, 15_500.0, 0.0, t, 0.2);
    assert!(atm > otm && otm > 0.0);
    assert_eq!(vega(14_000.0, 14_000.0, 0.0, 0.0, 0.2), 0.0);

    // finite-difference check
    let h = 1e-5;
    let fd = (bs_call_price(14_000.0, 14_000.0, 0.0, t, 0.2 + h)
        - bs_call_price(14_000.0, 14_000.0, 0.0, t, 0.2 - h))
        / (2.0 * h);
    assert!((fd - atm).abs() / atm < 1e-5);
}

proptest! {
    /// Price strictly increases with volatility, all else fixed.
    #[test]
    fn price_is_monotonic_in_sigma(
        spot in 1_000.0_f64..50_000.0,
        z in -1.5_f64..1.5,
        days in 1u32..=730,
        sigma1 in 0.01_f64..2.9,
        bump in 0.01_f64..0.1,
        is_call in any::<bool>(),
    ) {
        let class = if is_call { OptionClass::Call } else { OptionClass::Put };
        let t = days as f64 / 365.0;
        let strike = spot * (z * sigma1 * t.sqrt()).exp();
        let sigma2 = sigma1 + bump;

        let p1 = price_years(class, spot, strike, t, 0.0, sigma1);
        let p2 = price_years(class, spot, strike, t, 0.0, sigma2);
        prop_assert!(p1 < p2, "price({}) = {} !< price({}) = {}", sigma1, p1, sigma2, p2);
    }

    /// Prices are finite and non-negative across the solver bracket.
    #[test]
    fn price_is_finite_and_non_negative(
        spot in 1.0_f64..100_000.0,
        strike in 1.0_f64..100_000.0,
        days in 1u32..=730,
        sigma in 1e-6_f64..5.0,
        is_call in any::<bool>(),
    ) {
        let class = if is_call { OptionClass::Call } else { OptionClass::Put };
        let p = price(spot, strike, days, 0.0, sigma, class);
        prop_assert!(p.is_finite() && p >= 0.0);
    }
}
