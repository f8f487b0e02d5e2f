//! Cart store configuration.

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::Currency;

/// Maximum quantity allowed per cart line unless configured otherwise.
pub const DEFAULT_MAX_QUANTITY_PER_LINE: i64 = 9999;

/// Name of the persisted cart record unless configured otherwise.
pub const DEFAULT_STORE_NAME: &str = "cart-storage";

/// Configuration for a [`CartStore`](crate::cart::CartStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Key the cart is persisted under.
    #[serde(default = "default_store_name")]
    pub store_name: String,

    /// Currency every line price must be in.
    #[serde(default)]
    pub currency: Currency,

    /// Upper bound on a single line's quantity.
    #[serde(default = "default_max_quantity_per_line")]
    pub max_quantity_per_line: i64,
}

fn default_store_name() -> String {
    DEFAULT_STORE_NAME.to_string()
}

fn default_max_quantity_per_line() -> i64 {
    DEFAULT_MAX_QUANTITY_PER_LINE
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_name: default_store_name(),
            currency: Currency::default(),
            max_quantity_per_line: default_max_quantity_per_line(),
        }
    }
}

impl StoreConfig {
    /// Set the store name.
    pub fn with_store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = name.into();
        self
    }

    /// Set the currency.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the per-line quantity limit.
    pub fn with_max_quantity_per_line(mut self, max: i64) -> Self {
        self.max_quantity_per_line = max;
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.store_name.trim().is_empty() {
            return Err(CommerceError::ConfigError(
                "store_name must not be empty".to_string(),
            ));
        }
        if self.max_quantity_per_line < 1 {
            return Err(CommerceError::ConfigError(format!(
                "max_quantity_per_line must be at least 1, got {}",
                self.max_quantity_per_line
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.store_name, "cart-storage");
        assert_eq!(config.currency, Currency::COP);
        assert_eq!(config.max_quantity_per_line, 9999);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"currency":"USD"}"#).unwrap();
        assert_eq!(config.currency, Currency::USD);
        assert_eq!(config.store_name, DEFAULT_STORE_NAME);
        assert_eq!(config.max_quantity_per_line, DEFAULT_MAX_QUANTITY_PER_LINE);
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let config = StoreConfig::default().with_store_name("  ");
        assert!(matches!(config.validate(), Err(CommerceError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let config = StoreConfig::default().with_max_quantity_per_line(0);
        assert!(matches!(config.validate(), Err(CommerceError::ConfigError(_))));
    }
}
