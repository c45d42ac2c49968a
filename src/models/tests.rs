#![allow(clippy::unwrap_used)]

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::transaction::truncate_to_minute;
use super::*;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn make_txn(amount: Decimal) -> Transaction {
    Transaction::new(
        amount,
        "Test".into(),
        "Other".into(),
        at("2025-03-15 14:30:00"),
    )
}

// ── Transaction ───────────────────────────────────────────────

#[test]
fn test_income() {
    let txn = make_txn(dec!(100.00));
    assert!(txn.is_income());
    assert!(!txn.is_expense());
}

#[test]
fn test_expense() {
    let txn = make_txn(dec!(-50.00));
    assert!(!txn.is_income());
    assert!(txn.is_expense());
}

#[test]
fn test_zero_is_neither() {
    let txn = make_txn(Decimal::ZERO);
    assert!(!txn.is_income());
    assert!(!txn.is_expense());
}

#[test]
fn test_abs_amount() {
    assert_eq!(make_txn(dec!(-42.99)).abs_amount(), dec!(42.99));
    assert_eq!(make_txn(dec!(42.99)).abs_amount(), dec!(42.99));
    assert_eq!(make_txn(Decimal::ZERO).abs_amount(), Decimal::ZERO);
}

#[test]
fn test_new_has_no_id_or_images() {
    let txn = make_txn(dec!(1));
    assert!(txn.id.is_none());
    assert!(txn.image_paths.is_empty());
}

#[test]
fn test_new_truncates_to_minute() {
    let txn = Transaction::new(
        dec!(1),
        "Lunch".into(),
        "Food".into(),
        at("2025-03-15 14:30:47"),
    );
    assert_eq!(txn.occurred_at, at("2025-03-15 14:30:00"));
}

#[test]
fn test_with_images_keeps_order() {
    let txn = make_txn(dec!(-5)).with_images(vec![
        "/r/b.jpg".to_string(),
        "/r/a.jpg".to_string(),
    ]);
    assert_eq!(txn.image_paths, vec!["/r/b.jpg", "/r/a.jpg"]);
}

#[test]
fn test_transaction_month() {
    assert_eq!(make_txn(dec!(1)).month().to_string(), "Mar 2025");
}

// ── Timestamps ────────────────────────────────────────────────

#[test]
fn test_format_timestamp_zeroes_seconds() {
    assert_eq!(
        format_timestamp(&at("2025-03-15 14:30:59")),
        "2025-03-15 14:30:00"
    );
    assert_eq!(
        format_timestamp(&at("2025-01-02 03:04:00")),
        "2025-01-02 03:04:00"
    );
}

#[test]
fn test_parse_timestamp() {
    assert_eq!(
        parse_timestamp("2025-03-15 14:30:00"),
        Some(at("2025-03-15 14:30:00"))
    );
    assert_eq!(parse_timestamp("15/03/2025"), None);
    assert_eq!(
        parse_timestamp("2025-03-15 14:30:59"),
        Some(at("2025-03-15 14:30:00"))
    );
    assert_eq!(parse_timestamp(""), None);
}

#[test]
fn test_now_local_minute_precision() {
    let now = now_local();
    assert_eq!(now, truncate_to_minute(now));
    assert_eq!(format_timestamp(&now).len(), 19);
}

// ── MonthLabel ────────────────────────────────────────────────

#[test]
fn test_month_label_display() {
    assert_eq!(MonthLabel::new(2025, 1).unwrap().to_string(), "Jan 2025");
    assert_eq!(MonthLabel::new(2024, 12).unwrap().to_string(), "Dec 2024");
    assert_eq!(MonthLabel::new(987, 5).unwrap().to_string(), "May 0987");
}

#[test]
fn test_month_label_new_rejects_out_of_range() {
    assert!(MonthLabel::new(2025, 0).is_none());
    assert!(MonthLabel::new(2025, 13).is_none());
    assert!(MonthLabel::new(0, 1).is_none());
    assert!(MonthLabel::new(10000, 1).is_none());
}

#[test]
fn test_month_label_parse() {
    let mar = MonthLabel::new(2025, 3).unwrap();
    assert_eq!(MonthLabel::parse("Mar 2025"), Some(mar));
    assert_eq!(MonthLabel::parse("mar 2025"), Some(mar));
    assert_eq!(MonthLabel::parse("  MAR   2025 "), Some(mar));
    assert_eq!(MonthLabel::parse("2025-03"), Some(mar));
}

#[test]
fn test_month_label_parse_rejects_garbage() {
    assert_eq!(MonthLabel::parse(""), None);
    assert_eq!(MonthLabel::parse("March 2025"), None);
    assert_eq!(MonthLabel::parse("Mar 25"), None);
    assert_eq!(MonthLabel::parse("Mar 2025 extra"), None);
    assert_eq!(MonthLabel::parse("Foo 2025"), None);
    assert_eq!(MonthLabel::parse("2025-3"), None);
    assert_eq!(MonthLabel::parse("2025-13"), None);
}

#[test]
fn test_month_label_roundtrip() {
    for month in 1..=12 {
        let label = MonthLabel::new(2025, month).unwrap();
        assert_eq!(MonthLabel::parse(&label.to_string()), Some(label));
    }
}

#[test]
fn test_month_label_of() {
    let label = MonthLabel::of(&at("2025-03-31 23:59:00"));
    assert_eq!(label.year(), 2025);
    assert_eq!(label.month(), 3);
}

#[test]
fn test_month_label_navigation() {
    let jan = MonthLabel::new(2025, 1).unwrap();
    assert_eq!(jan.prev(), MonthLabel::new(2024, 12).unwrap());
    assert_eq!(jan.prev().next(), jan);
    let december = MonthLabel::new(2025, 12).unwrap();
    assert_eq!(december.next(), MonthLabel::new(2026, 1).unwrap());
}

#[test]
fn test_month_label_navigation_saturates() {
    let first = MonthLabel::new(1, 1).unwrap();
    assert_eq!(first.prev(), first);
    let last = MonthLabel::new(9999, 12).unwrap();
    assert_eq!(last.next(), last);
}

#[test]
fn test_month_label_contains() {
    let mar = MonthLabel::new(2025, 3).unwrap();
    assert!(mar.contains(&at("2025-03-01 00:00:00")));
    assert!(mar.contains(&at("2025-03-31 23:59:00")));
    assert!(!mar.contains(&at("2025-04-01 00:00:00")));
    assert!(!mar.contains(&at("2024-03-15 12:00:00")));
}

// ── Summary ───────────────────────────────────────────────────

#[test]
fn test_summary_from_transactions() {
    let txns = vec![
        make_txn(dec!(5000)),
        make_txn(dec!(-1200.50)),
        make_txn(dec!(-300)),
        make_txn(Decimal::ZERO),
    ];
    let summary = Summary::from_transactions(&txns);
    assert_eq!(summary.income, dec!(5000));
    assert_eq!(summary.expenses, dec!(-1500.50));
    assert_eq!(summary.balance, dec!(3499.50));
    assert_eq!(summary.balance, summary.income + summary.expenses);
}

#[test]
fn test_summary_empty() {
    assert_eq!(Summary::from_transactions(&[]), Summary::default());
}
