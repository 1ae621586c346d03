//! Input masks for checkout fields.
//!
//! Each formatter accepts raw or partially formatted input and returns the
//! masked form shown to the customer. Prices are formatted by
//! [`crate::types::format_price`].

use crate::validators::digits;

/// Format a postal code as `00000-000`.
///
/// Input with fewer than eight digits is returned as bare digits.
#[must_use]
pub fn format_cep(cep: &str) -> String {
    let clean = digits(cep);
    match (clean.get(..5), clean.get(5..8)) {
        (Some(head), Some(tail)) if clean.len() == 8 => format!("{head}-{tail}"),
        _ => clean,
    }
}

/// Format a phone number as `(00) 0000-0000` or `(00) 00000-0000`.
///
/// Input that does not have 10 or 11 digits is returned unchanged.
#[must_use]
pub fn format_phone(phone: &str) -> String {
    let clean = digits(phone);
    let split = match clean.len() {
        10 => 6,
        11 => 7,
        _ => return phone.to_string(),
    };

    match (clean.get(..2), clean.get(2..split), clean.get(split..)) {
        (Some(area), Some(prefix), Some(line)) => format!("({area}) {prefix}-{line}"),
        _ => phone.to_string(),
    }
}

/// Group a card number in blocks of four digits.
#[must_use]
pub fn format_credit_card(card_number: &str) -> String {
    let clean = digits(card_number);
    let mut out = String::with_capacity(clean.len() + clean.len() / 4);
    for (i, c) in clean.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Format a card expiry as `MM/YY`.
///
/// Two or more digits get a slash after the month; extra digits beyond
/// four are dropped.
#[must_use]
pub fn format_card_expiry(expiry: &str) -> String {
    let clean = digits(expiry);
    match (clean.get(..2), clean.get(2..)) {
        (Some(month), Some(year)) => {
            let year: String = year.chars().take(2).collect();
            format!("{month}/{year}")
        }
        _ => clean,
    }
}

/// Keep at most four digits of a card security code.
#[must_use]
pub fn format_cvc(value: &str) -> String {
    digits(value).chars().take(4).collect()
}
