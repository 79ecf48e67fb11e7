//! Currency display rules.
//!
//! Symbols are kept ASCII-safe so they render with the PDF built-in fonts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currencies whose amounts are shown without fractional digits.
pub const NO_DECIMAL_CURRENCIES: [&str; 3] = ["IDR", "JPY", "CNY"];

pub fn currency_symbol(code: &str) -> String {
    match code {
        "USD" => "$".to_string(),
        "IDR" => "Rp".to_string(),
        "SGD" => "S$".to_string(),
        "MYR" => "RM".to_string(),
        other => format!("{} ", other),
    }
}

pub fn decimal_places(code: &str) -> u32 {
    if NO_DECIMAL_CURRENCIES.contains(&code) {
        0
    } else {
        2
    }
}

/// `1234567.891` in USD becomes `1,234,567.89`; in JPY `1,234,568`.
pub fn format_amount(amount: Decimal, code: &str) -> String {
    let places = decimal_places(code);
    let rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", places as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + text.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_with_symbol(amount: Decimal, code: &str) -> String {
    format!("{}{}", currency_symbol(code), format_amount(amount, code))
}
