//! Postal code lookup client.

use serde_json::Value;
use tracing::{debug, instrument};
use vitrine_core::validators::{digits, validate_cep};

use super::ApiError;
use super::client::{ApiClient, parse_json};
use super::types::AddressData;

/// Client for a ViaCEP-compatible lookup service.
#[derive(Debug, Clone)]
pub struct AddressClient {
    api: ApiClient,
}

impl AddressClient {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Resolve a postal code to an address.
    ///
    /// Formatting characters are ignored. Returns `Ok(None)` when the code
    /// is well formed but unknown to the service.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPostalCode`] if the code does not have 8
    /// digits, or another error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_address(&self, cep: &str) -> Result<Option<AddressData>, ApiError> {
        if !validate_cep(cep) {
            return Err(ApiError::InvalidPostalCode(cep.to_string()));
        }

        let body = self
            .api
            .get_text(&format!("/{}/json/", digits(cep)), None)
            .await?;
        let value: Value = parse_json(&body)?;

        if is_not_found(&value) {
            debug!("Postal code not found");
            return Ok(None);
        }

        Ok(Some(serde_json::from_value(value)?))
    }
}

/// The service flags unknown codes with `"erro": true` (or `"true"`).
fn is_not_found(value: &Value) -> bool {
    match value.get("erro") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag == "true",
        _ => false,
    }
}
