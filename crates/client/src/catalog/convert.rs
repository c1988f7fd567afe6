//! Normalization from raw wire shapes into `saltbox-core` types.
//!
//! One pure function per upstream shape variant; the variant is picked by
//! the discriminating field shape serde already decoded. Items that
//! violate the core invariants (empty id) are skipped with a warning
//! rather than failing the whole page.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::warn;

use saltbox_core::{CatalogItem, Category, Price, VariantOption};

use crate::http::wire::{
    RawCatalogItem, RawCategory, RawMedia, RawMediaItem, RawPrice, RawStructuredPrice,
};

/// Normalize one raw item. Returns `None` when the item cannot satisfy
/// the core invariants.
pub(crate) fn normalize_item(raw: RawCatalogItem, default_currency: &str) -> Option<CatalogItem> {
    if raw.id.is_empty() {
        warn!("skipping catalog item with empty id");
        return None;
    }

    let (in_stock, stock_quantity) = normalize_availability(&raw);

    let price = raw
        .price
        .and_then(|p| normalize_price(p, raw.currency.as_deref(), default_currency))
        .unwrap_or_else(|| Price::new(0, default_currency));

    let mut category_ids: BTreeSet<String> = raw.category_ids.unwrap_or_default().into_iter().collect();
    // Some tenants still serve the pre-rename field.
    category_ids.extend(raw.collection_ids.unwrap_or_default());

    Some(CatalogItem {
        id: raw.id,
        name: raw.name.unwrap_or_default(),
        description: raw.description,
        price,
        images: raw.media.map(normalize_media).unwrap_or_default(),
        in_stock,
        stock_quantity,
        category_ids,
        variant_options: raw
            .options
            .unwrap_or_default()
            .into_iter()
            .filter_map(|o| {
                Some(VariantOption {
                    name: o.name?,
                    choices: o.choices,
                })
            })
            .collect(),
    })
}

/// Normalize a price, whichever encoding the platform served.
pub(crate) fn normalize_price(
    raw: RawPrice,
    item_currency: Option<&str>,
    default_currency: &str,
) -> Option<Price> {
    match raw {
        RawPrice::Flat(amount) => normalize_flat_price(amount, item_currency, default_currency),
        RawPrice::Structured(price) => normalize_structured_price(price, default_currency),
    }
}

/// Flat encoding: a bare decimal number, currency on the item (if at all).
fn normalize_flat_price(
    amount: f64,
    item_currency: Option<&str>,
    default_currency: &str,
) -> Option<Price> {
    let Some(decimal) = Decimal::from_f64(amount) else {
        warn!(amount, "unrepresentable flat price");
        return None;
    };
    let currency = item_currency
        .filter(|c| !c.is_empty())
        .unwrap_or(default_currency);
    Price::from_decimal(decimal, currency)
}

/// Structured encoding: `{"amount": "19.99", "currency": "USD"}`.
fn normalize_structured_price(raw: RawStructuredPrice, default_currency: &str) -> Option<Price> {
    let decimal = match Decimal::from_str(&raw.amount) {
        Ok(d) => d,
        Err(e) => {
            warn!(amount = %raw.amount, error = %e, "unparseable price amount");
            return None;
        }
    };
    let currency = raw
        .currency
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| default_currency.to_string());
    Price::from_decimal(decimal, currency)
}

/// Normalize media, whichever encoding the platform served.
fn normalize_media(raw: RawMedia) -> Vec<String> {
    match raw {
        RawMedia::Urls(urls) => urls,
        RawMedia::Gallery { items } => normalize_gallery(items),
    }
}

/// Gallery-object encoding: ordered items, entries without a URL dropped.
fn normalize_gallery(items: Vec<RawMediaItem>) -> Vec<String> {
    items.into_iter().filter_map(|i| i.url).collect()
}

/// Fold the upstream's stock signals into one availability flag.
///
/// An item is available when any of these holds: an explicit in-stock
/// flag, a positive quantity, a recognized in-stock status string, or no
/// stock information at all (assume purchasable unless told otherwise).
fn normalize_availability(raw: &RawCatalogItem) -> (bool, Option<i64>) {
    let nested = raw.stock.as_ref();
    let flag = raw.in_stock.or_else(|| nested.and_then(|s| s.in_stock));
    let quantity = raw
        .stock_quantity
        .or_else(|| nested.and_then(|s| s.quantity));
    let status = nested.and_then(|s| s.status.as_deref());

    let no_stock_info = flag.is_none() && quantity.is_none() && status.is_none();
    let in_stock = flag == Some(true)
        || quantity.is_some_and(|q| q > 0)
        || status.is_some_and(is_in_stock_status)
        || no_stock_info;

    (in_stock, quantity)
}

fn is_in_stock_status(status: &str) -> bool {
    status.eq_ignore_ascii_case("in_stock") || status.eq_ignore_ascii_case("instock")
}

/// Normalize one raw category; `None` when the id is empty.
pub(crate) fn normalize_category(raw: RawCategory) -> Option<Category> {
    if raw.id.is_empty() {
        warn!("skipping category with empty id");
        return None;
    }
    Some(Category {
        id: raw.id,
        name: raw.name.unwrap_or_default(),
        // Hidden only when the upstream says so explicitly.
        visible: raw.visible.unwrap_or(true),
    })
}
