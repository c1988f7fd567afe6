//! Cart mutation coordinator.
//!
//! Cart operations always go live over the shared executor; the platform
//! tracks one current cart per visitor credential, so no cart id travels
//! with requests. "No cart yet" is a domain-normal state, surfaced as
//! `Ok(None)` from [`CartService::current`], never as an error.
//!
//! Mutations are never auto-retried. `update_quantity` and `remove` are
//! idempotent per explicit line id; `add` is not, so after an ambiguous
//! failure (e.g. a timeout) callers must reconcile via `current` before
//! retrying, or they may add the line twice.

use std::sync::Arc;

use reqwest::Method;
use tracing::instrument;

use saltbox_core::{Cart, CartLine, NewCartLine, Price, SelectedOption};

use crate::catalog::convert::normalize_price;
use crate::error::CommerceError;
use crate::http::wire::{
    AddLinesRequest, CartEnvelope, NewLinePayload, RawCart, RawCartLine, RemoveLinesRequest,
    SelectedOptionPayload, UpdateLineRequest,
};
use crate::http::{Executor, Outcome};

const CART_PATH: &str = "cart/current";
const CART_ADD_PATH: &str = "cart/current/add";
const CART_UPDATE_PATH: &str = "cart/current/update";
const CART_REMOVE_PATH: &str = "cart/current/remove";

/// Cart read and mutation operations.
pub struct CartService {
    executor: Arc<Executor>,
    default_currency: String,
}

impl CartService {
    pub(crate) fn new(executor: Arc<Executor>, default_currency: String) -> Self {
        Self {
            executor,
            default_currency,
        }
    }

    /// Read the visitor's current cart.
    ///
    /// Returns `Ok(None)` when no cart exists yet (an expected absence,
    /// not a failure).
    ///
    /// # Errors
    ///
    /// Propagates auth, network, and upstream failures.
    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<Option<Cart>, CommerceError> {
        let outcome: Outcome<CartEnvelope> =
            self.executor.send(Method::GET, CART_PATH, None).await?;

        match outcome {
            Outcome::Success(envelope) => Ok(Some(self.convert_cart(envelope.cart))),
            Outcome::Absent => Ok(None),
        }
    }

    /// Add lines to the cart, creating it upstream if needed.
    ///
    /// Not idempotent: a blind retry after an ambiguous failure can add
    /// the same lines twice.
    ///
    /// # Errors
    ///
    /// Propagates auth, network, and upstream failures.
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub async fn add(&self, lines: Vec<NewCartLine>) -> Result<Cart, CommerceError> {
        let body = serde_json::to_value(AddLinesRequest {
            line_items: lines
                .into_iter()
                .map(|line| NewLinePayload {
                    catalog_item_id: line.catalog_item_id,
                    quantity: line.quantity,
                    selected_options: line
                        .selected_options
                        .into_iter()
                        .map(|o| SelectedOptionPayload {
                            name: o.name,
                            value: o.value,
                        })
                        .collect(),
                })
                .collect(),
        })?;

        let outcome = self.executor.send(Method::POST, CART_ADD_PATH, Some(body)).await?;
        self.expect_cart(outcome)
    }

    /// Set a line's quantity.
    ///
    /// Setting a quantity of zero removes the line; the platform rejects
    /// zero-quantity lines, and removal matches what shoppers mean by it.
    ///
    /// # Errors
    ///
    /// Propagates auth, network, and upstream failures.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        line_id: &str,
        quantity: u32,
    ) -> Result<Cart, CommerceError> {
        if quantity == 0 {
            return self.remove(&[line_id.to_string()]).await;
        }

        let body = serde_json::to_value(UpdateLineRequest { line_id, quantity })?;
        let outcome = self
            .executor
            .send(Method::POST, CART_UPDATE_PATH, Some(body))
            .await?;
        self.expect_cart(outcome)
    }

    /// Remove lines by id. Removing an already-removed line is a no-op
    /// upstream.
    ///
    /// # Errors
    ///
    /// Propagates auth, network, and upstream failures.
    #[instrument(skip(self, line_ids), fields(line_count = line_ids.len()))]
    pub async fn remove(&self, line_ids: &[String]) -> Result<Cart, CommerceError> {
        let body = serde_json::to_value(RemoveLinesRequest { line_ids })?;
        let outcome = self
            .executor
            .send(Method::POST, CART_REMOVE_PATH, Some(body))
            .await?;
        self.expect_cart(outcome)
    }

    /// Mutations must come back with a cart; absence here is a genuine
    /// failure, unlike on reads.
    fn expect_cart(&self, outcome: Outcome<CartEnvelope>) -> Result<Cart, CommerceError> {
        match outcome {
            Outcome::Success(envelope) => Ok(self.convert_cart(envelope.cart)),
            Outcome::Absent => Err(CommerceError::NotFound("cart after mutation".to_string())),
        }
    }

    fn convert_cart(&self, raw: RawCart) -> Cart {
        convert_cart(raw, &self.default_currency)
    }
}

/// Normalize an upstream cart, whichever field spellings it used.
fn convert_cart(raw: RawCart, default_currency: &str) -> Cart {
    let cart_currency = raw.currency.clone();
    Cart {
        subtotal: raw
            .subtotal
            .and_then(|p| normalize_price(p, cart_currency.as_deref(), default_currency)),
        lines: raw
            .lines
            .into_iter()
            .map(|line| convert_line(line, cart_currency.as_deref(), default_currency))
            .collect(),
        id: raw.id,
    }
}

fn convert_line(raw: RawCartLine, cart_currency: Option<&str>, default_currency: &str) -> CartLine {
    let currency = raw.currency.as_deref().or(cart_currency);
    let unit_price = raw
        .price
        .and_then(|p| normalize_price(p, currency, default_currency))
        .unwrap_or_else(|| Price::new(0, currency.unwrap_or(default_currency)));

    CartLine {
        id: raw.id,
        catalog_item_id: raw.catalog_item_id.unwrap_or_default(),
        quantity: raw.quantity.unwrap_or(1),
        unit_price,
        selected_options: raw
            .selected_options
            .into_iter()
            .map(|o| SelectedOption {
                name: o.name,
                value: o.value,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_modern_cart_shape() {
        let raw: RawCart = serde_json::from_str(
            r#"{
                "id": "cart-1",
                "currency": "USD",
                "subtotal": {"amount": "25.00"},
                "lines": [
                    {
                        "id": "line-1",
                        "catalogItemId": "item-1",
                        "quantity": 2,
                        "price": {"amount": "12.50"},
                        "selectedOptions": [{"name": "Size", "value": "M"}]
                    }
                ]
            }"#,
        )
        .expect("raw cart");

        let cart = convert_cart(raw, "USD");
        assert_eq!(cart.id, "cart-1");
        assert_eq!(cart.subtotal, Some(Price::new(2500, "USD")));

        let line = cart.lines.first().expect("line");
        assert_eq!(line.catalog_item_id, "item-1");
        assert_eq!(line.unit_price, Price::new(1250, "USD"));
        assert_eq!(line.selected_options.len(), 1);
    }

    #[test]
    fn converts_legacy_cart_shape() {
        let raw: RawCart = serde_json::from_str(
            r#"{
                "id": "cart-2",
                "lineItems": [
                    {"id": "line-1", "productId": "item-9", "unitPrice": 5.0, "currency": "EUR"}
                ]
            }"#,
        )
        .expect("raw cart");

        let cart = convert_cart(raw, "USD");
        let line = cart.lines.first().expect("line");
        assert_eq!(line.catalog_item_id, "item-9");
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, Price::new(500, "EUR"));
    }
}
