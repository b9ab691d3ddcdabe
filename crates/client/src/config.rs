//! Billing client configuration.

use billflow_core::{CatalogError, ProductCatalog};

/// Validated billing client configuration.
///
/// Carries the product catalog (the three disjoint id sets) plus the
/// acknowledge/consume automation flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    catalog: ProductCatalog,
    auto_acknowledge: bool,
    auto_consume: bool,
    license_key: Option<String>,
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Acknowledge non-consumable/subscription purchases as soon as they
    /// complete, instead of waiting for an explicit
    /// `acknowledge_purchase` call.
    pub fn auto_acknowledge(&self) -> bool {
        self.auto_acknowledge
    }

    /// Consume consumable purchases as soon as they complete, instead of
    /// waiting for an explicit `consume_purchase` call.
    pub fn auto_consume(&self) -> bool {
        self.auto_consume
    }

    /// Public developer key from the store console, if any.
    pub fn license_key(&self) -> Option<&str> {
        self.license_key.as_deref()
    }
}

/// Builder for [`ClientConfig`]; `build` validates the id sets.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    consumable_ids: Vec<String>,
    non_consumable_ids: Vec<String>,
    subscription_ids: Vec<String>,
    auto_acknowledge: bool,
    auto_consume: bool,
    license_key: Option<String>,
}

impl ClientConfigBuilder {
    pub fn consumable_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumable_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn non_consumable_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_consumable_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn subscription_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subscription_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn auto_acknowledge(mut self) -> Self {
        self.auto_acknowledge = true;
        self
    }

    pub fn auto_consume(mut self) -> Self {
        self.auto_consume = true;
        self
    }

    pub fn license_key(mut self, key: impl Into<String>) -> Self {
        self.license_key = Some(key.into());
        self
    }

    pub fn build(self) -> Result<ClientConfig, CatalogError> {
        let catalog = ProductCatalog::from_ids(
            self.consumable_ids,
            self.non_consumable_ids,
            self.subscription_ids,
        )?;

        Ok(ClientConfig {
            catalog,
            auto_acknowledge: self.auto_acknowledge,
            auto_consume: self.auto_consume,
            license_key: self.license_key,
        })
    }
}
