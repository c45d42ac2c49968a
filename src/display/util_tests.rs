#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("Rent", 10), "Rent");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("Rent", 4), "Rent");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Groceries at the market", 9), "Grocerie…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("Rent", 0), "");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("Rent", 1), "…");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(5000)), "$5,000.00");
    assert_eq!(format_amount(dec!(3499.5)), "$3,499.50");
    assert_eq!(format_amount(dec!(0.01)), "$0.01");
}

#[test]
fn test_format_amount_drops_sign() {
    assert_eq!(format_amount(dec!(-1500.50)), "$1,500.50");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
    assert_eq!(format_amount(dec!(100000)), "$100,000.00");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(Decimal::ZERO), "$0.00");
}

#[test]
fn test_format_amount_rounds() {
    assert_eq!(format_amount(dec!(2.346)), "$2.35");
    assert_eq!(format_amount(dec!(-2.344)), "$2.34");
}

// ── format_signed ─────────────────────────────────────────────

#[test]
fn test_format_signed() {
    assert_eq!(format_signed(dec!(5000)), "+$5,000.00");
    assert_eq!(format_signed(dec!(-1200.50)), "-$1,200.50");
    assert_eq!(format_signed(Decimal::ZERO), "+$0.00");
}
