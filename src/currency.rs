//! Presentation formatting for money and quantities.
//!
//! Engine values stay unrounded; rounding happens only here.

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

/// Fixed-point rendering with `,` thousands grouping.
pub fn format_number(value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value.abs());
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let mut rendered = group_digits(int_part, ',');
    if let Some(fraction) = fraction {
        rendered.push('.');
        rendered.push_str(fraction);
    }
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        rendered.insert(0, '-');
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx != 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Currency amount with its symbol, e.g. `$1,234.50` or `-$3.00`.
pub fn format_currency_value(amount: f64, code: &str, precision: u8) -> String {
    let body = format_number(amount, precision);
    let symbol = symbol_for(code);
    match body.strip_prefix('-') {
        Some(unsigned) => format!("-{symbol}{unsigned}"),
        None => format!("{symbol}{body}"),
    }
}

pub fn format_quantity(quantity: f64, precision: u8) -> String {
    format_number(quantity, precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_and_rounds() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn currency_places_sign_before_symbol() {
        assert_eq!(format_currency_value(96.0, "USD", 2), "$96.00");
        assert_eq!(format_currency_value(-3.0, "EUR", 2), "-€3.00");
        assert_eq!(format_currency_value(5.0, "XAU", 3), "XAU5.000");
    }
}
