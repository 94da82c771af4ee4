//! Human-readable labels for months and amounts.

use plannercell_domain::MonthKey;
use rust_decimal::Decimal;

const PT_MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn is_portuguese(locale: &str) -> bool {
    locale.to_ascii_lowercase().starts_with("pt")
}

fn month_name(month: MonthKey, locale: &str) -> &'static str {
    let index = (month.month() as usize).saturating_sub(1).min(11);
    if is_portuguese(locale) {
        PT_MONTHS[index]
    } else {
        EN_MONTHS[index]
    }
}

/// `março 2024` / `March 2024`.
pub fn month_label(month: MonthKey, locale: &str) -> String {
    format!("{} {}", month_name(month, locale), month.year())
}

/// `março/2024` / `March/2024`, used in month-close notices.
pub fn month_close_label(month: MonthKey, locale: &str) -> String {
    format!("{}/{}", month_name(month, locale), month.year())
}

pub fn currency_symbol(currency: &str) -> String {
    match currency.to_ascii_uppercase().as_str() {
        "BRL" => "R$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        other => other.to_string(),
    }
}

/// Formats with two decimals and locale separators, e.g. `R$ 1.200,50` or `$ 1,200.50`.
pub fn format_amount(amount: Decimal, currency: &str, locale: &str) -> String {
    let (decimal_sep, group_sep) = if is_portuguese(locale) {
        (',', '.')
    } else {
        ('.', ',')
    };
    let fixed = format!("{:.2}", amount.round_dp(2).abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::new();
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(digit);
    }
    let sign = if amount.is_sign_negative() && !amount.round_dp(2).is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{sign}{} {grouped}{decimal_sep}{fraction}",
        currency_symbol(currency)
    )
}
