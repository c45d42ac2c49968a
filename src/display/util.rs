use rust_decimal::Decimal;

/// Render the magnitude of `val` as currency with thousand separators,
/// e.g. `-1234.5` → `"$1,234.50"`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let formatted = format!("{:.2}", val.abs().round_dp(2));
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let grouped: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    format!("${grouped}.{dec_part}")
}

/// Like [`format_amount`] but always carries the direction: `+` income, `-` expense.
pub(crate) fn format_signed(val: Decimal) -> String {
    if val < Decimal::ZERO {
        format!("-{}", format_amount(val))
    } else {
        format!("+{}", format_amount(val))
    }
}

/// Cut `s` down to `max` characters, ending in "…" when shortened.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max - 1).collect();
    format!("{head}…")
}
