//! Input validators for Brazilian documents, postal codes and cards.
//!
//! All validators strip non-digit characters first, so formatted input
//! (`123.456.789-09`, `01310-100`, `4111 1111 1111 1111`) is accepted.

use crate::types::Email;

/// Keep only ASCII digits.
#[must_use]
pub fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

fn digit_values(input: &str) -> Vec<u32> {
    input.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Whether `email` is a plausible address (`local@domain.tld`).
#[must_use]
pub fn validate_email(email: &str) -> bool {
    Email::parse(email).is_ok()
}

/// Whether `cep` is a Brazilian postal code (8 digits once formatting is
/// removed).
#[must_use]
pub fn validate_cep(cep: &str) -> bool {
    digits(cep).len() == 8
}

/// Whether `cpf` is a valid Brazilian taxpayer number.
///
/// Requires 11 digits, not all identical, with both mod-11 check digits
/// matching.
#[must_use]
pub fn validate_cpf(cpf: &str) -> bool {
    let values = digit_values(cpf);
    let [first, rest @ ..] = values.as_slice() else {
        return false;
    };
    if values.len() != 11 || rest.iter().all(|d| d == first) {
        return false;
    }

    cpf_check_digit(&values, 9) && cpf_check_digit(&values, 10)
}

/// Verify the check digit at `position` against the digits before it.
fn cpf_check_digit(values: &[u32], position: usize) -> bool {
    let Some(expected) = values.get(position) else {
        return false;
    };
    let weight_start = u32::try_from(position).unwrap_or(0) + 1;
    let sum: u32 = values
        .iter()
        .take(position)
        .zip((2..=weight_start).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();

    let remainder = match (sum * 10) % 11 {
        10 => 0,
        r => r,
    };
    remainder == *expected
}

/// Whether `card_number` passes the Luhn checksum with 13-19 digits.
#[must_use]
pub fn validate_credit_card(card_number: &str) -> bool {
    let values = digit_values(card_number);
    if !(13..=19).contains(&values.len()) {
        return false;
    }

    let sum: u32 = values
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}
