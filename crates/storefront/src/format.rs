//! Price display helpers.

use breeze_core::{CurrencyCode, Locale};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount for display, e.g. `1,234.50 ر.س` (Arabic) or
/// `SAR 1,234.50` (English).
#[must_use]
pub fn format_price(amount: Decimal, currency: CurrencyCode, locale: Locale) -> String {
    let digits = group_thousands(amount);
    let symbol = currency.symbol(locale);
    match locale {
        Locale::Ar => format!("{digits} {symbol}"),
        Locale::En if symbol.chars().count() == 1 => format!("{symbol}{digits}"),
        Locale::En => format!("{symbol} {digits}"),
    }
}

/// Two decimals with `,` between thousands.
fn group_thousands(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(text.len() + whole.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(fraction);
    grouped
}
