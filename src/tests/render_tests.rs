/// Tests for display formatting — currency, percentage, and contract
/// rounding variants.
use crate::error::DemoError;
use crate::render::{
    format_btc, format_btc_whole, format_contracts, format_error, format_pct, format_usd,
    render_exposure, render_market,
};
use crate::state::MarketFeed;
use crate::tests::{sample_exposure, sample_market};
use rust_decimal_macros::dec;

// ── format_usd ────────────────────────────────────────────────────────────────

#[test]
fn usd_whole_thousands() {
    assert_eq!(format_usd(dec!(65000)), "$65,000");
}

#[test]
fn usd_small_amounts_have_no_separator() {
    assert_eq!(format_usd(dec!(999)), "$999");
    assert_eq!(format_usd(dec!(0)), "$0");
}

#[test]
fn usd_rounds_to_whole_dollars() {
    assert_eq!(format_usd(dec!(1234.56)), "$1,235");
    assert_eq!(format_usd(dec!(1234.49)), "$1,234");
}

#[test]
fn usd_millions_grouped() {
    assert_eq!(format_usd(dec!(38000000)), "$38,000,000");
}

#[test]
fn usd_negative() {
    assert_eq!(format_usd(dec!(-1234567)), "-$1,234,567");
}

// ── format_pct ────────────────────────────────────────────────────────────────

#[test]
fn pct_whole_number() {
    assert_eq!(format_pct(dec!(62)), "62%");
}

#[test]
fn pct_keeps_one_decimal_when_fractional() {
    assert_eq!(format_pct(dec!(62.5)), "62.5%");
    assert_eq!(format_pct(dec!(4.25)), "4.3%");
}

#[test]
fn pct_drops_trailing_zero() {
    assert_eq!(format_pct(dec!(80.0)), "80%");
}

// ── contract rounding variants ────────────────────────────────────────────────

#[test]
fn btc_two_decimal_variant() {
    assert_eq!(format_btc(dec!(12.345)), "12.35 BTC");
}

#[test]
fn btc_two_decimal_pads() {
    assert_eq!(format_btc(dec!(12.3)), "12.30 BTC");
    assert_eq!(format_btc(dec!(12)), "12.00 BTC");
}

#[test]
fn btc_whole_variant() {
    assert_eq!(format_btc_whole(dec!(12.345)), "12 BTC");
    assert_eq!(format_btc_whole(dec!(12.5)), "13 BTC");
}

#[test]
fn format_contracts_selects_variant() {
    assert_eq!(format_contracts(dec!(12.345), true), "12 BTC");
    assert_eq!(format_contracts(dec!(12.345), false), "12.35 BTC");
}

// ── views ─────────────────────────────────────────────────────────────────────

#[test]
fn market_view_shows_price_and_volatility() {
    let feed = MarketFeed::Live(sample_market(Some("live"), None));
    let text = render_market(&feed);
    assert!(text.contains("$65,000"), "got: {text}");
    assert!(text.contains("62%"), "got: {text}");
    assert!(text.contains("live"), "got: {text}");
}

#[test]
fn market_view_sentinel_on_failure() {
    let feed = MarketFeed::Unavailable { error: "connection refused".to_string() };
    let text = render_market(&feed);
    assert!(text.contains("UNAVAILABLE"), "got: {text}");
}

#[test]
fn exposure_view_shows_coverage_as_percent() {
    let text = render_exposure(Some(&sample_exposure()));
    assert!(text.contains("80%"), "got: {text}");
    assert!(text.contains("24.10 BTC"), "got: {text}");
}

#[test]
fn exposure_view_without_snapshot() {
    assert_eq!(render_exposure(None), "exposure: no snapshot yet");
}

// ── error banners ─────────────────────────────────────────────────────────────

#[test]
fn backend_error_banner_includes_discriminator() {
    let err = DemoError::backend("No portfolio found", Some("missing_portfolio".to_string()));
    assert_eq!(format_error(&err), "No portfolio found [missing_portfolio]");
}

#[test]
fn backend_error_banner_without_discriminator_is_plain() {
    let err = DemoError::backend("No portfolio found", None);
    assert_eq!(format_error(&err), "No portfolio found");
}

#[test]
fn validation_error_banner_is_the_message() {
    let err = DemoError::validation("position size must be greater than zero");
    assert_eq!(format_error(&err), "position size must be greater than zero");
}
