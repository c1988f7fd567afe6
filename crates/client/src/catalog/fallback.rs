//! Client-side fallback filtering, sorting, and pagination.
//!
//! The platform's query endpoint cannot filter by category, filter by
//! availability, or sort; this module reproduces those semantics locally
//! over an over-fetched page of normalized items. Everything here is a
//! pure function.

use saltbox_core::{CatalogItem, Page, SortField, SortOrder};

use crate::error::CommerceError;

/// A parsed filter clause.
///
/// The caller-facing syntax is `field:value`; recognized fields are
/// `visible`, `inStock`, and `in_stock`, all meaning availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterClause {
    Available(bool),
}

/// Parse a raw filter clause.
///
/// # Errors
///
/// Returns [`CommerceError::InvalidQuery`] for unknown fields or
/// non-boolean values. Queries recover by dropping the clause.
pub(crate) fn parse_filter_clause(clause: &str) -> Result<FilterClause, CommerceError> {
    let (field, value) = clause
        .split_once(':')
        .ok_or_else(|| CommerceError::InvalidQuery(format!("missing ':' in {clause:?}")))?;

    let wanted = match value.trim() {
        "true" => true,
        "false" => false,
        other => {
            return Err(CommerceError::InvalidQuery(format!(
                "expected a boolean, got {other:?}"
            )));
        }
    };

    match field.trim() {
        "visible" | "inStock" | "in_stock" => Ok(FilterClause::Available(wanted)),
        other => Err(CommerceError::InvalidQuery(format!(
            "unknown filter field {other:?}"
        ))),
    }
}

/// Whether an item counts as purchasable.
///
/// Normalization already folded the upstream's stock signals (explicit
/// flag, status string, absence of stock info) into `in_stock`; a
/// positive quantity also counts, whatever the flag said.
pub(crate) fn is_available(item: &CatalogItem) -> bool {
    item.in_stock || item.stock_quantity.is_some_and(|q| q > 0)
}

/// Apply a parsed filter clause. Filtering is idempotent.
pub(crate) fn apply_filter(items: Vec<CatalogItem>, clause: FilterClause) -> Vec<CatalogItem> {
    match clause {
        FilterClause::Available(wanted) => items
            .into_iter()
            .filter(|item| is_available(item) == wanted)
            .collect(),
    }
}

/// Keep only items belonging to `category_id` (sentinel-aware).
pub(crate) fn filter_by_category(items: Vec<CatalogItem>, category_id: &str) -> Vec<CatalogItem> {
    items
        .into_iter()
        .filter(|item| item.in_category(category_id))
        .collect()
}

/// Sort in place by the requested field and order.
///
/// `sort_by` is stable, so ties keep their original fetch order.
pub(crate) fn sort_items(items: &mut [CatalogItem], field: SortField, order: SortOrder) {
    items.sort_by(|a, b| {
        let forward = match field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Price => a.price.minor_units.cmp(&b.price.minor_units),
        };
        match order {
            SortOrder::Ascending => forward,
            SortOrder::Descending => forward.reverse(),
        }
    });
}

/// Slice the filtered set by offset/limit.
///
/// `total_count` and `has_more` describe the filtered set, which is an
/// approximation whenever the over-fetched page was itself truncated
/// upstream.
pub(crate) fn paginate(items: Vec<CatalogItem>, offset: usize, limit: usize) -> Page<CatalogItem> {
    let total_count = items.len();
    let has_more = offset + limit < total_count;
    let page = items.into_iter().skip(offset).take(limit).collect();

    Page {
        items: page,
        total_count,
        has_more,
    }
}
