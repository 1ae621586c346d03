//! Checkout and order history.

use std::path::Path;

use vitrine_core::{CheckoutForm, OrderId, format_price};
use vitrine_storefront::checkout::{self, CheckoutError};
use vitrine_storefront::state::AppState;

use super::CommandError;
use crate::output;

/// Read a checkout form from a JSON file.
fn read_form(path: &Path) -> Result<CheckoutForm, CommandError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CommandError::ReadForm {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Place an order from the cart using the form in `form_path`.
///
/// # Errors
///
/// Returns an error when not signed in, when the form cannot be read or
/// fails validation, when the cart is empty, or when the order cannot be
/// stored.
pub fn checkout(state: &AppState, form_path: &Path) -> Result<(), CommandError> {
    if !state.session().is_authenticated() {
        return Err(CommandError::NotSignedIn);
    }
    let form = read_form(form_path)?;

    let result = {
        let mut cart = state.cart();
        checkout::place_order(&mut cart, state.orders(), form)
    };

    match result {
        Ok(order) => {
            output::line(&format!(
                "Order {} placed: {} item(s), {}",
                order.id,
                order.total_items(),
                format_price(order.total)
            ));
            Ok(())
        }
        Err(CheckoutError::Invalid(errors)) => {
            let rows: Vec<String> = errors
                .errors()
                .iter()
                .map(|e| format!("  {}: {}", e.field, e.message))
                .collect();
            output::lines(&rows);
            Err(CheckoutError::Invalid(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Show the order history, or one order as JSON.
///
/// # Errors
///
/// Returns an error when not signed in or when `id` is unknown.
pub fn list(state: &AppState, id: Option<OrderId>) -> Result<(), CommandError> {
    if !state.session().is_authenticated() {
        return Err(CommandError::NotSignedIn);
    }

    if let Some(id) = id {
        let order = state
            .orders()
            .order_by_id(id)
            .ok_or_else(|| CommandError::NotFound(format!("Order not found: {id}")))?;
        output::json(&order)?;
        return Ok(());
    }

    let rows: Vec<String> = state
        .orders()
        .orders()
        .iter()
        .map(|o| {
            format!(
                "{}  {}  {:>12}  {}",
                o.id,
                o.date.format("%d/%m/%Y"),
                format_price(o.total),
                o.status
            )
        })
        .collect();
    if rows.is_empty() {
        output::line("No orders yet");
    } else {
        output::lines(&rows);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use vitrine_core::PaymentMethod;

    use super::*;

    #[test]
    fn test_read_form_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "email": "carla@example.com",
                "firstName": "Carla",
                "lastName": "Mendes",
                "address": "Rua das Flores, 100",
                "city": "São Paulo",
                "neighborhood": "Centro",
                "state": "SP",
                "zipCode": "01310-100",
                "phone": "(11) 98765-4321",
                "paymentMethod": "pix"
            }}"#
        )
        .unwrap();

        let form = read_form(file.path()).unwrap();
        assert_eq!(form.first_name, "Carla");
        assert_eq!(form.payment_method, PaymentMethod::Pix);
        assert!(form.card_number.is_none());
    }

    #[test]
    fn test_read_form_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_form(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CommandError::ReadForm { .. }));
    }

    #[test]
    fn test_read_form_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            read_form(file.path()).unwrap_err(),
            CommandError::Json(_)
        ));
    }
}
