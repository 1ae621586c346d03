//! Checkout form and validation.
//!
//! [`CheckoutForm::validate`] reports every failing field at once so the
//! caller can show all messages together. Messages are customer-facing and
//! in Portuguese, like the rest of the storefront.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{Email, PaymentMethod};

static CEP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-\d{3}$").expect("Invalid regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{2}\) \d{4,5}-\d{4}$").expect("Invalid regex"));
static CARD_EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}$").expect("Invalid regex"));
static CVC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("Invalid regex"));

/// Minimum number of digits in a card number.
const MIN_CARD_DIGITS: usize = 16;

/// Customer, shipping and payment details submitted at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub neighborhood: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_expiry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_cvc: Option<String>,
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the field (e.g., `zipCode`).
    pub field: &'static str,
    /// Customer-facing message.
    pub message: &'static str,
}

/// All field errors found in a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// The individual field errors, in field order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// The first message reported for `field`, if any.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|err| err.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl CheckoutForm {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each failing field. Card
    /// payments additionally require number, expiry and CVC; the missing
    /// details are reported on `cardNumber`.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        let mut fail = |field: &'static str, message: &'static str| {
            errors.push(FieldError { field, message });
        };

        if self.email.is_empty() {
            fail("email", "Email é obrigatório");
        } else if Email::parse(&self.email).is_err() {
            fail("email", "Email inválido");
        }

        let lengths = [
            (&self.first_name, "firstName", 2, 50, "Nome deve ter pelo menos 2 caracteres", "Nome muito longo"),
            (&self.last_name, "lastName", 2, 50, "Sobrenome deve ter pelo menos 2 caracteres", "Sobrenome muito longo"),
            (&self.address, "address", 10, 200, "Endereço deve ter pelo menos 10 caracteres", "Endereço muito longo"),
            (&self.city, "city", 2, 50, "Cidade deve ter pelo menos 2 caracteres", "Cidade muito longa"),
            (&self.neighborhood, "neighborhood", 2, 50, "Bairro deve ter pelo menos 2 caracteres", "Bairro muito longo"),
            (&self.state, "state", 2, 2, "Estado deve ter pelo menos 2 caracteres", "Estado deve ter 2 caracteres"),
        ];
        for (value, field, min, max, too_short, too_long) in lengths {
            let len = value.chars().count();
            if len < min {
                fail(field, too_short);
            } else if len > max {
                fail(field, too_long);
            }
        }

        if !CEP_RE.is_match(&self.zip_code) {
            fail("zipCode", "CEP deve ter formato 00000-000");
        }
        if !PHONE_RE.is_match(&self.phone) {
            fail("phone", "Telefone deve ter formato (00) 00000-0000");
        }

        let card_number = non_empty(self.card_number.as_deref());
        let card_expiry = non_empty(self.card_expiry.as_deref());
        let card_cvc = non_empty(self.card_cvc.as_deref());

        if let Some(number) = card_number
            && number.chars().filter(|c| !c.is_whitespace()).count() < MIN_CARD_DIGITS
        {
            fail("cardNumber", "Número do cartão deve ter pelo menos 16 dígitos");
        }
        if let Some(expiry) = card_expiry
            && !CARD_EXPIRY_RE.is_match(expiry)
        {
            fail("cardExpiry", "Data deve ter formato MM/AA");
        }
        if let Some(cvc) = card_cvc
            && !CVC_RE.is_match(cvc)
        {
            fail("cardCvc", "CVC deve ter 3 ou 4 dígitos");
        }

        if self.payment_method.requires_card()
            && (card_number.is_none() || card_expiry.is_none() || card_cvc.is_none())
        {
            fail(
                "cardNumber",
                "Dados do cartão são obrigatórios para pagamento com cartão",
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    /// Customer's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
