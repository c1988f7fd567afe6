//! Normalized cart entities.

use serde::{Deserialize, Serialize};

use super::price::Price;

/// A shopper's cart, normalized from upstream cart shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Upstream cart id.
    pub id: String,
    /// Current lines, in upstream order.
    pub lines: Vec<CartLine>,
    /// Cart subtotal, when the upstream reported one.
    pub subtotal: Option<Price>,
}

impl Cart {
    /// Total quantity across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// One line in a cart. The line id is always upstream-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Upstream-assigned line id.
    pub id: String,
    /// Id of the catalog item the line refers to.
    pub catalog_item_id: String,
    /// Units of the item in the cart.
    pub quantity: u32,
    /// Per-unit price at the time the upstream computed the cart.
    pub unit_price: Price,
    /// Variant choices the shopper made for this line.
    pub selected_options: Vec<SelectedOption>,
}

/// A variant choice on a cart line (e.g. Size = M).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// Input for adding a line to the cart. Line ids are assigned upstream,
/// so inputs carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartLine {
    /// Catalog item to add.
    pub catalog_item_id: String,
    /// Units to add.
    pub quantity: u32,
    /// Variant choices for the line.
    pub selected_options: Vec<SelectedOption>,
}

impl NewCartLine {
    /// A line for `quantity` units of `catalog_item_id` with no options.
    #[must_use]
    pub fn new(catalog_item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            catalog_item_id: catalog_item_id.into(),
            quantity,
            selected_options: vec![],
        }
    }
}
