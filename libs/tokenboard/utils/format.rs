//! Number formatting for the token table
//!
//! Every formatter maps NaN and infinities to a fixed placeholder instead of
//! printing them.

/// Decimal places used when the caller has no preference.
pub const DEFAULT_DECIMALS: usize = 2;

/// Currency with a K/M/B suffix for large values.
///
/// ```
/// use tokenboard::utils::format_currency;
///
/// assert_eq!(format_currency(1_500_000.0, 2), "$1.50M");
/// assert_eq!(format_currency(2_500_000_000.0, 2), "$2.50B");
/// assert_eq!(format_currency(999.0, 0), "$999");
/// assert_eq!(format_currency(1_234.56, 2), "$1.23K");
/// ```
pub fn format_currency(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }

    if value >= 1_000_000_000.0 {
        format!("${:.*}B", decimals, value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.*}M", decimals, value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.*}K", decimals, value / 1_000.0)
    } else {
        format!("${:.*}", decimals, value)
    }
}

/// Percentage with an explicit `+` for gains.
///
/// ```
/// use tokenboard::utils::format_percentage;
///
/// assert_eq!(format_percentage(5.23, 1), "+5.2%");
/// assert_eq!(format_percentage(-2.4, 1), "-2.4%");
/// assert_eq!(format_percentage(0.0, 0), "0%");
/// ```
pub fn format_percentage(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }

    // -0.0 prints without a sign
    let value = if value == 0.0 { 0.0 } else { value };
    let prefix = if value > 0.0 { "+" } else { "" };
    format!("{}{:.*}%", prefix, decimals, value)
}

/// Fixed decimals with `,` thousands separators.
///
/// ```
/// use tokenboard::utils::format_number;
///
/// assert_eq!(format_number(1_234_567.89, 2), "1,234,567.89");
/// assert_eq!(format_number(42.0, 0), "42");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    group_thousands(&format!("{:.*}", decimals, value))
}

/// Dollar price with separators and at most three decimals, trailing zeros
/// dropped: `64000.0` → `$64,000`, `0.62` → `$0.62`.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }

    let fixed = format!("{:.3}", value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    let trimmed = if trimmed == "-0" { "0" } else { trimmed };
    format!("${}", group_thousands(trimmed))
}

/// Unrounded percent change with a `+` for gains, as shown in the detail view.
pub fn format_signed_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0%".to_string();
    }
    let prefix = if value > 0.0 { "+" } else { "" };
    format!("{}{}%", prefix, value)
}

/// `$X.XXB`
pub fn format_billions(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("${:.2}B", value / 1_000_000_000.0)
}

/// `$X.XXM`
pub fn format_millions(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("${:.2}M", value / 1_000_000.0)
}

/// Insert `,` every three digits of the integer part of a plain decimal string.
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
