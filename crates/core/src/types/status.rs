//! Status and choice enums for orders and checkout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Serialized with the storefront's customer-facing labels, which is also
/// how order history is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Processando")]
    Processing,
    #[serde(rename = "Processado")]
    Processed,
    #[serde(rename = "Enviado")]
    Shipped,
    #[serde(rename = "Entregue")]
    Delivered,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// Customer-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Processing => "Processando",
            Self::Processed => "Processado",
            Self::Shipped => "Enviado",
            Self::Delivered => "Entregue",
            Self::Cancelled => "Cancelado",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payment method chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Pix,
}

impl PaymentMethod {
    /// Whether this method requires card details at checkout.
    #[must_use]
    pub const fn requires_card(self) -> bool {
        matches!(self, Self::CreditCard | Self::DebitCard)
    }

    /// Wire value (e.g., `credit-card`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit-card",
            Self::DebitCard => "debit-card",
            Self::Pix => "pix",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serializes_label() {
        let json = serde_json::to_string(&OrderStatus::Processed).unwrap();
        assert_eq!(json, "\"Processado\"");
        let parsed: OrderStatus = serde_json::from_str("\"Enviado\"").unwrap();
        assert_eq!(parsed, OrderStatus::Shipped);
    }

    #[test]
    fn test_payment_method_wire_values() {
        let parsed: PaymentMethod = serde_json::from_str("\"debit-card\"").unwrap();
        assert_eq!(parsed, PaymentMethod::DebitCard);
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Pix).unwrap(),
            "\"pix\""
        );
        assert!(serde_json::from_str::<PaymentMethod>("\"boleto\"").is_err());
    }

    #[test]
    fn test_requires_card() {
        assert!(PaymentMethod::CreditCard.requires_card());
        assert!(PaymentMethod::DebitCard.requires_card());
        assert!(!PaymentMethod::Pix.requires_card());
    }
}
