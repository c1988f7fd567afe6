//! Raw wire shapes for the commerce platform's JSON API.
//!
//! Everything here is private to the crate: consumers only ever see the
//! normalized types in `saltbox-core`. The platform serves several
//! historical encodings for the same logical field (flat vs structured
//! prices, URL-array vs gallery-object media, flat vs nested stock,
//! `categoryIds` vs `collectionIds`); each such field is an untagged enum
//! discriminated by shape, normalized by one pure function per variant in
//! `catalog::convert` and `cart`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Token endpoints
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IssueTokenRequest<'a> {
    pub api_key: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshTokenRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds from the moment of issuance.
    pub expires_in: i64,
}

// =============================================================================
// Catalog endpoints
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemsQueryRequest {
    pub query: ItemsQueryPayload,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemsQueryPayload {
    /// Full-text search term; only the upstream can evaluate it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemsQueryResponse {
    #[serde(default)]
    pub items: Vec<RawCatalogItem>,
    #[serde(default)]
    pub total_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemEnvelope {
    pub item: RawCatalogItem,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CategoriesResponse {
    #[serde(default)]
    pub categories: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCategory {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub visible: Option<bool>,
}

/// An item as the platform serves it, before normalization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCatalogItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    /// Item-level currency, used by the flat price encoding.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub media: Option<RawMedia>,
    /// Nested stock encoding.
    #[serde(default)]
    pub stock: Option<RawStock>,
    /// Flat stock encoding.
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub category_ids: Option<Vec<String>>,
    /// Alternate spelling of the category membership field.
    #[serde(default)]
    pub collection_ids: Option<Vec<String>>,
    #[serde(default)]
    pub options: Option<Vec<RawVariantOption>>,
}

/// Flat (`19.99`) or structured (`{"amount": "19.99", "currency": "USD"}`)
/// price encoding.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawPrice {
    Structured(RawStructuredPrice),
    Flat(f64),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawStructuredPrice {
    pub amount: String,
    #[serde(default)]
    pub currency: Option<String>,
}

/// URL-array or gallery-object media encoding.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawMedia {
    Urls(Vec<String>),
    Gallery { items: Vec<RawMediaItem> },
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMediaItem {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawStock {
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Status string such as `IN_STOCK` or `OUT_OF_STOCK`.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawVariantOption {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
}

// =============================================================================
// Cart endpoints
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct CartEnvelope {
    pub cart: RawCart,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCart {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "lineItems")]
    pub lines: Vec<RawCartLine>,
    #[serde(default)]
    pub subtotal: Option<RawPrice>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawCartLine {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "productId")]
    pub catalog_item_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default, alias = "unitPrice")]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, alias = "options")]
    pub selected_options: Vec<RawSelectedOption>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSelectedOption {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddLinesRequest {
    pub line_items: Vec<NewLinePayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewLinePayload {
    pub catalog_item_id: String,
    pub quantity: u32,
    pub selected_options: Vec<SelectedOptionPayload>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectedOptionPayload {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateLineRequest<'a> {
    pub line_id: &'a str,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoveLinesRequest<'a> {
    pub line_ids: &'a [String],
}

// =============================================================================
// Error bodies
// =============================================================================

/// Error body shape the platform uses for non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct RawErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_decodes_both_encodings() {
        let flat: RawPrice = serde_json::from_str("19.99").expect("flat");
        assert!(matches!(flat, RawPrice::Flat(v) if (v - 19.99).abs() < f64::EPSILON));

        let structured: RawPrice =
            serde_json::from_str(r#"{"amount": "19.99", "currency": "EUR"}"#).expect("structured");
        match structured {
            RawPrice::Structured(p) => {
                assert_eq!(p.amount, "19.99");
                assert_eq!(p.currency.as_deref(), Some("EUR"));
            }
            RawPrice::Flat(_) => panic!("expected structured price"),
        }
    }

    #[test]
    fn media_decodes_both_encodings() {
        let urls: RawMedia = serde_json::from_str(r#"["https://a/1.jpg"]"#).expect("urls");
        assert!(matches!(urls, RawMedia::Urls(v) if v.len() == 1));

        let gallery: RawMedia =
            serde_json::from_str(r#"{"items": [{"url": "https://a/1.jpg"}, {}]}"#).expect("gallery");
        assert!(matches!(gallery, RawMedia::Gallery { items } if items.len() == 2));
    }

    #[test]
    fn cart_accepts_alternate_field_spellings() {
        let json = r#"{
            "id": "cart-1",
            "lineItems": [
                {"id": "line-1", "productId": "item-1", "quantity": 2, "unitPrice": 5.0}
            ]
        }"#;
        let cart: RawCart = serde_json::from_str(json).expect("cart");
        assert_eq!(cart.lines.len(), 1);
        let line = cart.lines.first().expect("line");
        assert_eq!(line.catalog_item_id.as_deref(), Some("item-1"));
        assert!(matches!(line.price, Some(RawPrice::Flat(_))));
    }
}
