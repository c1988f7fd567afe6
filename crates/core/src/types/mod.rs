//! Normalized domain types shared across the Saltbox workspace.

mod cart;
mod catalog;
mod credential;
mod price;
mod query;

pub use cart::{Cart, CartLine, NewCartLine, SelectedOption};
pub use catalog::{ALL_ITEMS_CATEGORY_ID, CatalogItem, Category, VariantOption};
pub use credential::Credential;
pub use price::Price;
pub use query::{Page, QuerySpec, SortField, SortOrder};
