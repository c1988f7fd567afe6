//! Normalized catalog entities.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Reserved category id that every item belongs to.
///
/// The platform exposes an implicit "all items" collection; a query
/// filtering on this id passes every item without consulting its
/// category memberships.
pub const ALL_ITEMS_CATEGORY_ID: &str = "all-items";

/// A catalog item normalized from the upstream's heterogeneous shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Upstream item id. Never empty.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Plain-text description, when provided.
    pub description: Option<String>,
    /// Price in minor units with currency. Currency is never empty.
    pub price: Price,
    /// Image URLs in upstream gallery order.
    pub images: Vec<String>,
    /// Whether the item can currently be purchased.
    ///
    /// Defaults to `true` when the upstream carried no stock information
    /// at all: assume available unless told otherwise.
    pub in_stock: bool,
    /// Exact units on hand, when the upstream tracks inventory.
    pub stock_quantity: Option<i64>,
    /// Ids of every category the item belongs to.
    pub category_ids: BTreeSet<String>,
    /// Selectable variant options (e.g. Size: S/M/L).
    pub variant_options: Vec<VariantOption>,
}

impl CatalogItem {
    /// Whether this item belongs to `category_id`.
    ///
    /// The reserved [`ALL_ITEMS_CATEGORY_ID`] sentinel matches every item.
    #[must_use]
    pub fn in_category(&self, category_id: &str) -> bool {
        category_id == ALL_ITEMS_CATEGORY_ID || self.category_ids.contains(category_id)
    }
}

/// A named variant option with its selectable choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    /// Option name (e.g. "Size").
    pub name: String,
    /// Choices in upstream order.
    pub choices: Vec<String>,
}

/// A catalog category (upstream "collection"), normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Upstream category id. Never empty.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the category is visible to shoppers.
    pub visible: bool,
}
