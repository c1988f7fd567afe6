//! Catalog query descriptions and paginated results.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not specify one.
pub const DEFAULT_QUERY_LIMIT: usize = 20;

/// Field a catalog query sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    /// Lexicographic by item name (case-insensitive).
    Name,
    /// Numeric by normalized minor-unit price.
    Price,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// An immutable description of one catalog query.
///
/// Drives both the outbound request payload and, where the upstream cannot
/// honor a field, the client-side fallback filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Requested sort field; `None` leaves upstream order.
    pub sort_field: Option<SortField>,
    /// Sort direction, meaningful only with a sort field.
    pub sort_order: SortOrder,
    /// Raw filter clause, e.g. `"visible:true"` or `"inStock:true"`.
    ///
    /// A malformed clause is dropped (with a warning), never fatal.
    pub filter: Option<String>,
    /// Full-text search term. Always delegated to the upstream.
    pub search_term: Option<String>,
    /// Restrict results to one category.
    pub category_id: Option<String>,
    /// Maximum items to return.
    pub limit: usize,
    /// Items to skip before the returned page.
    pub offset: usize,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            sort_field: None,
            sort_order: SortOrder::default(),
            filter: None,
            search_term: None,
            category_id: None,
            limit: DEFAULT_QUERY_LIMIT,
            offset: 0,
        }
    }
}

impl QuerySpec {
    /// A query for the first `limit` items in upstream order.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Builder-style setter for the sort field and order.
    #[must_use]
    pub fn sorted(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = order;
        self
    }

    /// Builder-style setter for the filter clause.
    #[must_use]
    pub fn filtered(mut self, clause: impl Into<String>) -> Self {
        self.filter = Some(clause.into());
        self
    }

    /// Builder-style setter for the search term.
    #[must_use]
    pub fn searching(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Builder-style setter for the category restriction.
    #[must_use]
    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// Builder-style setter for the page offset.
    #[must_use]
    pub const fn starting_at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Whether this query is "basic": no search term, no explicit sort,
    /// no category filter. Only basic queries are cache-eligible, because
    /// only they map to the deterministic broad page the fallback engine
    /// narrows locally.
    #[must_use]
    pub const fn is_basic(&self) -> bool {
        self.search_term.is_none() && self.sort_field.is_none() && self.category_id.is_none()
    }
}

/// One page of query results.
///
/// `total_count` and `has_more` are computed from the locally filtered
/// set; when the upstream truncated the broad page they are approximations,
/// not exact counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in this page, in final (sorted, sliced) order.
    pub items: Vec<T>,
    /// Size of the filtered set the page was sliced from.
    pub total_count: usize,
    /// Whether a further page exists past `offset + limit`.
    pub has_more: bool,
}
