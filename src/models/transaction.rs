use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;

use super::MonthLabel;

/// Fixed text layout of `occurred_at` in storage.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    /// Positive is income, negative is expense.
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub occurred_at: NaiveDateTime,
    pub image_paths: Vec<String>,
}

impl Transaction {
    pub fn new(
        amount: Decimal,
        description: String,
        category: String,
        occurred_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            amount,
            description,
            category,
            occurred_at: truncate_to_minute(occurred_at),
            image_paths: Vec::new(),
        }
    }

    pub fn with_images(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.image_paths.extend(paths);
        self
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    pub fn month(&self) -> MonthLabel {
        MonthLabel::of(&self.occurred_at)
    }
}

pub fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// Render a timestamp for storage. Seconds are always written as `00`.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:00").to_string()
}

/// Parse stored text; the result is truncated to the minute like every other timestamp.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(truncate_to_minute)
}

/// Local wall-clock time, minute precision.
pub fn now_local() -> NaiveDateTime {
    truncate_to_minute(chrono::Local::now().naive_local())
}
