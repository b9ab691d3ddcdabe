//! Catalog configuration: which product ids exist and what kind each is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::id::ProductId;
use crate::product::ProductKind;

/// Validated mapping from product id to product category.
///
/// Built from the three id lists handed to the billing client at
/// configuration time. The lists must be disjoint; ids are case-normalized
/// on the way in, so `"Coins_100"` and `"coins_100"` count as the same id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCatalog {
    kinds: HashMap<ProductId, ProductKind>,
}

impl ProductCatalog {
    /// Build a catalog from the three category id lists.
    ///
    /// Fails on a blank id or an id appearing in more than one category
    /// (including twice in the same category).
    pub fn from_ids<I, S>(consumables: I, non_consumables: I, subscriptions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kinds = HashMap::new();

        for (ids, kind) in [
            (consumables, ProductKind::Consumable),
            (non_consumables, ProductKind::NonConsumable),
            (subscriptions, ProductKind::Subscription),
        ] {
            for raw in ids {
                let id = ProductId::new(raw);
                if id.is_empty() {
                    return Err(CatalogError::BlankId);
                }
                if kinds.insert(id.clone(), kind).is_some() {
                    return Err(CatalogError::OverlappingId(id));
                }
            }
        }

        Ok(Self { kinds })
    }

    pub fn kind_of(&self, id: &ProductId) -> Option<ProductKind> {
        self.kinds.get(id).copied()
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.kinds.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// All configured ids of one category.
    pub fn ids_of_kind(&self, kind: ProductKind) -> impl Iterator<Item = &ProductId> {
        self.kinds
            .iter()
            .filter(move |(_, k)| **k == kind)
            .map(|(id, _)| id)
    }

    /// Whether any subscription products are configured.
    pub fn has_subscriptions(&self) -> bool {
        self.kinds.values().any(|k| *k == ProductKind::Subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_disjoint_id_lists() {
        let catalog = ProductCatalog::from_ids(
            vec!["coins_100", "coins_500"],
            vec!["premium_upgrade"],
            vec!["monthly_pass"],
        )
        .unwrap();

        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.kind_of(&ProductId::new("coins_100")),
            Some(ProductKind::Consumable)
        );
        assert_eq!(
            catalog.kind_of(&ProductId::new("premium_upgrade")),
            Some(ProductKind::NonConsumable)
        );
        assert_eq!(
            catalog.kind_of(&ProductId::new("monthly_pass")),
            Some(ProductKind::Subscription)
        );
        assert!(catalog.has_subscriptions());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog =
            ProductCatalog::from_ids(vec!["Coins_100"], Vec::<&str>::new(), Vec::<&str>::new())
                .unwrap();

        assert!(catalog.contains(&ProductId::new("COINS_100")));
        assert_eq!(
            catalog.kind_of(&ProductId::new("coins_100")),
            Some(ProductKind::Consumable)
        );
    }

    #[test]
    fn rejects_id_in_two_categories() {
        let err = ProductCatalog::from_ids(
            vec!["coins_100"],
            vec!["coins_100"],
            Vec::<&str>::new(),
        )
        .unwrap_err();

        assert_eq!(err, CatalogError::OverlappingId(ProductId::new("coins_100")));
    }

    #[test]
    fn rejects_case_variant_duplicates_across_categories() {
        let err = ProductCatalog::from_ids(
            vec!["coins_100"],
            Vec::<&str>::new(),
            vec!["COINS_100"],
        )
        .unwrap_err();

        assert!(matches!(err, CatalogError::OverlappingId(_)));
    }

    #[test]
    fn rejects_blank_ids() {
        let err =
            ProductCatalog::from_ids(vec!["   "], Vec::<&str>::new(), Vec::<&str>::new())
                .unwrap_err();

        assert_eq!(err, CatalogError::BlankId);
    }

    #[test]
    fn ids_of_kind_filters_by_category() {
        let catalog = ProductCatalog::from_ids(
            vec!["coins_100", "coins_500"],
            vec!["premium_upgrade"],
            Vec::<&str>::new(),
        )
        .unwrap();

        let mut consumables: Vec<&ProductId> =
            catalog.ids_of_kind(ProductKind::Consumable).collect();
        consumables.sort();
        assert_eq!(
            consumables,
            vec![&ProductId::new("coins_100"), &ProductId::new("coins_500")]
        );
        assert!(!catalog.has_subscriptions());
    }
}
