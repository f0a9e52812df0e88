// Utility helpers for value coercion and locale formatting.
//
// This module centralizes all the "dirty" CSV/number handling so the rest of
// the code can assume clean, typed values, and owns the single formatter used
// to render money for the pt-BR audience.
use chrono::Month;
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Placeholder rendered for missing or non-finite values.
pub const MISSING: &str = "N/A";

/// Coerce a FOB cell into a non-negative `Decimal`.
///
/// - Trims whitespace.
/// - Accepts plain decimals (`1234.5`) and scientific notation (`1.2e5`).
/// - Anything that still fails to parse, is not finite or is negative
///   becomes zero. The row itself is always kept.
pub fn parse_fob_value(s: Option<&str>) -> Decimal {
    let Some(s) = s.map(str::trim).filter(|s| !s.is_empty()) else {
        return Decimal::ZERO;
    };
    let parsed = Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(Decimal::from_f64));
    match parsed {
        Some(v) if v.is_sign_positive() => v,
        _ => Decimal::ZERO,
    }
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    // pandas sometimes writes integer columns as `2022.0`
    s.parse::<i32>()
        .ok()
        .or_else(|| s.strip_suffix(".0").and_then(|t| t.parse().ok()))
}

pub fn parse_month_safe(s: Option<&str>) -> Option<u32> {
    let m = parse_i32_safe(s)?;
    u32::try_from(m).ok().filter(|m| (1..=12).contains(m))
}

/// Format a decimal with `.` as thousands separator and `,` as decimal
/// separator, always with two fraction digits (`1.234.567,89`).
///
/// Rounds half away from zero. `None` renders as `N/A`.
pub fn format_brl(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let abs = rounded.abs();
    let (Some(int_part), Some(frac_part)) = (
        abs.trunc().to_u128(),
        (abs.fract() * Decimal::ONE_HUNDRED).trunc().to_u32(),
    ) else {
        return MISSING.to_string();
    };
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{},{:02}", sign, int_part.to_formatted_string(&Locale::pt), frac_part)
}

/// `format_brl` for plain floats; NaN and infinities render as `N/A`.
pub fn format_brl_f64(value: f64) -> String {
    if !value.is_finite() {
        return MISSING.to_string();
    }
    format_brl(Decimal::from_f64(value))
}

pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_brl(Some(value)))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::pt)
}

/// English month name for 1..=12, `Unknown` otherwise.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}
