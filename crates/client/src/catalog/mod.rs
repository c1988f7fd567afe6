//! Catalog query facade.
//!
//! Resolves a [`QuerySpec`] into normalized, paginated items. The
//! platform's query endpoint only understands a page window and a search
//! term; category filtering, availability filtering, and sorting are
//! reproduced locally over an over-fetched broad page (cached for basic
//! queries).

pub(crate) mod convert;
mod fallback;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Method;
use tracing::{debug, instrument, warn};

use saltbox_core::{CatalogItem, Category, Page, QuerySpec};

use crate::cache::{CacheValue, TtlCache};
use crate::error::CommerceError;
use crate::http::wire::{
    CategoriesResponse, ItemEnvelope, ItemsQueryPayload, ItemsQueryRequest, ItemsQueryResponse,
};
use crate::http::{Executor, Outcome};

const ITEMS_QUERY_PATH: &str = "catalog/items/query";
const CATEGORIES_QUERY_PATH: &str = "catalog/categories/query";
const CATEGORIES_CACHE_KEY: &str = "categories";

/// Multiplier applied to the requested window when fetching material for
/// local narrowing, capped by the configured over-fetch limit.
const OVER_FETCH_FACTOR: usize = 4;

/// Read access to the catalog.
pub struct Catalog {
    executor: Arc<Executor>,
    cache: TtlCache<CacheValue>,
    over_fetch_limit: usize,
    default_currency: String,
    /// Monotonic query identity for the stale-page guard.
    query_seq: AtomicU64,
}

impl Catalog {
    pub(crate) fn new(
        executor: Arc<Executor>,
        cache: TtlCache<CacheValue>,
        over_fetch_limit: usize,
        default_currency: String,
    ) -> Self {
        Self {
            executor,
            cache,
            over_fetch_limit,
            default_currency,
            query_seq: AtomicU64::new(0),
        }
    }

    /// Resolve a query into one page of normalized items.
    ///
    /// # Errors
    ///
    /// Propagates auth, network, and upstream failures. A malformed
    /// filter clause is dropped with a warning, never an error.
    #[instrument(skip(self, spec), fields(limit = spec.limit, offset = spec.offset))]
    pub async fn query(&self, spec: &QuerySpec) -> Result<Page<CatalogItem>, CommerceError> {
        // Text search needs server-side matching: always delegate, never
        // cache, never narrow locally.
        if let Some(term) = spec.search_term.clone() {
            return self.search(&term, spec).await;
        }

        let seq = self.query_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let fetch_limit = self.broad_fetch_limit(spec);
        let cache_key = format!("items:broad:{fetch_limit}");
        let cacheable = spec.is_basic();

        let items = if cacheable
            && let Some(CacheValue::Items(items)) = self.cache.get(&cache_key).await
        {
            items
        } else {
            let items = self.fetch_broad_page(fetch_limit).await?;
            if cacheable {
                if self.query_seq.load(Ordering::SeqCst) == seq {
                    self.cache
                        .set(cache_key, CacheValue::Items(items.clone()))
                        .await;
                } else {
                    // A newer query started while this page was in
                    // flight; return it to our caller but keep it out of
                    // shared state.
                    debug!("superseded page not committed to cache");
                }
            }
            items
        };

        Ok(Self::narrow(items, spec))
    }

    /// Fetch a single item by id, cached per id.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::NotFound`] when the platform reports the
    /// item absent; this is a genuine error for a direct fetch.
    #[instrument(skip(self))]
    pub async fn item(&self, id: &str) -> Result<CatalogItem, CommerceError> {
        let cache_key = format!("item:{id}");
        if let Some(CacheValue::Item(item)) = self.cache.get(&cache_key).await {
            return Ok(*item);
        }

        let outcome: Outcome<ItemEnvelope> = self
            .executor
            .send(Method::GET, &format!("catalog/items/{id}"), None)
            .await?;

        let Outcome::Success(envelope) = outcome else {
            return Err(CommerceError::NotFound(format!("item {id}")));
        };

        let item = convert::normalize_item(envelope.item, &self.default_currency)
            .ok_or_else(|| CommerceError::NotFound(format!("item {id}")))?;

        self.cache
            .set(cache_key, CacheValue::Item(Box::new(item.clone())))
            .await;

        Ok(item)
    }

    /// Fetch the category list, cached.
    ///
    /// # Errors
    ///
    /// Propagates auth, network, and upstream failures.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CommerceError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache.get(CATEGORIES_CACHE_KEY).await
        {
            return Ok(categories);
        }

        let outcome: Outcome<CategoriesResponse> = self
            .executor
            .send(
                Method::POST,
                CATEGORIES_QUERY_PATH,
                Some(serde_json::json!({})),
            )
            .await?;

        let categories: Vec<Category> = match outcome {
            Outcome::Success(response) => response
                .categories
                .into_iter()
                .filter_map(convert::normalize_category)
                .collect(),
            Outcome::Absent => vec![],
        };

        self.cache
            .set(CATEGORIES_CACHE_KEY, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Drop every cached catalog read (user-triggered refresh).
    pub async fn refresh(&self) {
        self.cache.clear_all().await;
    }

    /// Search path: delegate to the upstream, skip cache and fallback.
    async fn search(
        &self,
        term: &str,
        spec: &QuerySpec,
    ) -> Result<Page<CatalogItem>, CommerceError> {
        let body = serde_json::to_value(ItemsQueryRequest {
            query: ItemsQueryPayload {
                search: Some(term.to_string()),
                limit: spec.limit,
                offset: spec.offset,
            },
        })?;

        let outcome: Outcome<ItemsQueryResponse> = self
            .executor
            .send(Method::POST, ITEMS_QUERY_PATH, Some(body))
            .await?;

        let Outcome::Success(response) = outcome else {
            return Ok(Page {
                items: vec![],
                total_count: 0,
                has_more: false,
            });
        };

        let upstream_total = response.total_count;
        let items: Vec<CatalogItem> = response
            .items
            .into_iter()
            .filter_map(|raw| convert::normalize_item(raw, &self.default_currency))
            .collect();

        // Without an upstream total, approximate from the page shape: a
        // full page suggests more results exist.
        let (total_count, has_more) = upstream_total.map_or_else(
            || (spec.offset + items.len(), items.len() == spec.limit),
            |total| {
                let total = usize::try_from(total).unwrap_or(0);
                (total, spec.offset + spec.limit < total)
            },
        );

        Ok(Page {
            items,
            total_count,
            has_more,
        })
    }

    /// Fetch the broad unfiltered, unsorted page the fallback engine
    /// narrows locally.
    async fn fetch_broad_page(
        &self,
        fetch_limit: usize,
    ) -> Result<Vec<CatalogItem>, CommerceError> {
        let body = serde_json::to_value(ItemsQueryRequest {
            query: ItemsQueryPayload {
                search: None,
                limit: fetch_limit,
                offset: 0,
            },
        })?;

        let outcome: Outcome<ItemsQueryResponse> = self
            .executor
            .send(Method::POST, ITEMS_QUERY_PATH, Some(body))
            .await?;

        let items = match outcome {
            Outcome::Success(response) => response
                .items
                .into_iter()
                .filter_map(|raw| convert::normalize_item(raw, &self.default_currency))
                .collect(),
            Outcome::Absent => vec![],
        };

        Ok(items)
    }

    /// Apply the local fallback pipeline: category filter, availability
    /// filter, sort, slice. Order matters; slicing is always last.
    fn narrow(mut items: Vec<CatalogItem>, spec: &QuerySpec) -> Page<CatalogItem> {
        if let Some(category_id) = &spec.category_id {
            items = fallback::filter_by_category(items, category_id);
        }

        if let Some(clause) = &spec.filter {
            match fallback::parse_filter_clause(clause) {
                Ok(parsed) => items = fallback::apply_filter(items, parsed),
                Err(e) => warn!(error = %e, clause, "dropping malformed filter clause"),
            }
        }

        if let Some(field) = spec.sort_field {
            fallback::sort_items(&mut items, field, spec.sort_order);
        }

        fallback::paginate(items, spec.offset, spec.limit)
    }

    /// Over-fetch window for local narrowing, capped at the configured
    /// limit. The cap means deep pages can be approximations; that
    /// inaccuracy is accepted rather than guessed away.
    fn broad_fetch_limit(&self, spec: &QuerySpec) -> usize {
        (spec.offset + spec.limit)
            .saturating_mul(OVER_FETCH_FACTOR)
            .min(self.over_fetch_limit)
    }
}
