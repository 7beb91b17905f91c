//! Checkout: turning the cart into a server-confirmed order.

use async_trait::async_trait;
use shopfront_core::api::Envelope;
use shopfront_core::{NewOrder, Order, ShippingAddress};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::Cart;
use crate::persistent::PersistentCart;
use crate::storage::CartStorage;

/// Errors from a checkout attempt. The cart is unchanged after any of them.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    /// The server answered with an error envelope.
    #[error("order rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("could not reach the storefront: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response from the storefront: {0}")]
    InvalidResponse(String),
}

/// What the shopper enters at checkout.
#[derive(Debug, Clone)]
pub struct CheckoutDetails {
    pub customer_email: String,
    pub customer_name: String,
    pub shipping_address: ShippingAddress,
}

impl Cart {
    /// Project the cart into an order submission.
    ///
    /// The total is included for display parity only; the server computes
    /// its own.
    #[must_use]
    pub fn to_new_order(&self, details: CheckoutDetails) -> NewOrder {
        NewOrder {
            items: Some(self.to_order_lines()),
            customer_email: Some(details.customer_email),
            customer_name: Some(details.customer_name),
            shipping_address: Some(details.shipping_address),
            total_amount: Some(self.total()),
        }
    }
}

/// Sends an order submission to the storefront.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submit `order` and return the order the server created.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the order or cannot be reached.
    async fn submit(&self, order: &NewOrder) -> Result<Order, CheckoutError>;
}

/// [`OrderSubmitter`] posting to the storefront's `/orders` endpoint.
#[derive(Debug, Clone)]
pub struct HttpOrderSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpOrderSubmitter {
    /// Submit to `{base_url}/orders`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/orders", base_url.trim_end_matches('/')),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl OrderSubmitter for HttpOrderSubmitter {
    async fn submit(&self, order: &NewOrder) -> Result<Order, CheckoutError> {
        let response = self.client.post(&self.endpoint).json(order).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<Envelope<Order>>(&body) {
            Ok(Envelope::Ok(response)) if status.is_success() && response.success => {
                Ok(response.data)
            }
            Ok(Envelope::Err(error)) => Err(CheckoutError::Rejected {
                status: status.as_u16(),
                message: error.error,
            }),
            Ok(Envelope::Ok(_)) => Err(CheckoutError::InvalidResponse(format!(
                "success body with status {status}"
            ))),
            Err(e) => Err(CheckoutError::InvalidResponse(format!(
                "status {status}: {e}"
            ))),
        }
    }
}

impl<S: CartStorage> PersistentCart<S> {
    /// Submit the cart as an order.
    ///
    /// On success the cart is cleared and saved. A failure to save the
    /// cleared cart is logged but does not fail the checkout, since the order
    /// already exists. On any error the cart is left as it was so the shopper
    /// can retry.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] without contacting the server if
    /// there is nothing to buy, otherwise whatever the submitter returns.
    #[instrument(skip_all, fields(entries = self.cart().entries().len()))]
    pub async fn checkout(
        &mut self,
        details: CheckoutDetails,
        submitter: &dyn OrderSubmitter,
    ) -> Result<Order, CheckoutError> {
        if self.cart().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let submission = self.cart().to_new_order(details);
        let order = match submitter.submit(&submission).await {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "Checkout failed, cart kept");
                return Err(e);
            }
        };

        if let Err(e) = self.clear() {
            warn!(error = %e, order_id = %order.id, "Order placed but cleared cart was not saved");
        }
        info!(order_id = %order.id, total = %order.total_amount, "Checkout complete");
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::cart::tests::product;
    use crate::storage::{CART_STORAGE_KEY, MemoryStorage};
    use rust_decimal::Decimal;

    /// Places orders locally the way the storefront does, or refuses them.
    struct FakeSubmitter {
        accept: bool,
        received: Mutex<Vec<NewOrder>>,
    }

    impl FakeSubmitter {
        fn new(accept: bool) -> Self {
            Self {
                accept,
                received: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.received.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl OrderSubmitter for FakeSubmitter {
        async fn submit(&self, order: &NewOrder) -> Result<Order, CheckoutError> {
            self.received.lock().unwrap().push(order.clone());
            if !self.accept {
                return Err(CheckoutError::Rejected {
                    status: 503,
                    message: "try again".to_string(),
                });
            }
            let validated = order.clone().validate().map_err(|e| CheckoutError::Rejected {
                status: 400,
                message: e.to_string(),
            })?;
            Ok(validated.place(chrono::Utc::now()))
        }
    }

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            customer_email: "sam@example.com".to_string(),
            customer_name: "Sam Lee".to_string(),
            shipping_address: ShippingAddress::Structured {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_checkout_places_order_and_clears() {
        let storage = MemoryStorage::new();
        let mut cart = PersistentCart::open(&storage);
        cart.add_item(&product("a", 10, 5), 2).unwrap();
        cart.add_item(&product("b", 5, 5), 1).unwrap();

        let submitter = FakeSubmitter::new(true);
        let order = cart.checkout(details(), &submitter).await.unwrap();

        assert_eq!(order.total_amount, Decimal::from(25));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.shipping_address, "1 Main St, Springfield, IL 62701");
        assert!(cart.cart().is_empty());
        assert_eq!(storage.load(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let storage = MemoryStorage::new();
        let mut cart = PersistentCart::open(&storage);
        cart.add_item(&product("a", 10, 5), 2).unwrap();

        let submitter = FakeSubmitter::new(false);
        let err = cart.checkout(details(), &submitter).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Rejected { status: 503, .. }));
        assert_eq!(cart.cart().item_count(), 2);
        assert_eq!(PersistentCart::open(&storage).cart().item_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_cart_never_reaches_server() {
        let mut cart = PersistentCart::open(MemoryStorage::new());
        let submitter = FakeSubmitter::new(true);

        let err = cart.checkout(details(), &submitter).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(submitter.calls(), 0);
    }

    #[test]
    fn test_submission_shape() {
        let mut cart = Cart::new();
        cart.add_item(&product("a", 10, 5), 2).unwrap();

        let json = serde_json::to_value(cart.to_new_order(details())).unwrap();
        assert_eq!(json["items"][0]["productId"], "a");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["customerEmail"], "sam@example.com");
        assert_eq!(json["shippingAddress"]["zipCode"], "62701");
        assert_eq!(json["totalAmount"].as_f64(), Some(20.0));
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let submitter = HttpOrderSubmitter::new("http://127.0.0.1:3000/");
        assert_eq!(submitter.endpoint(), "http://127.0.0.1:3000/orders");
    }
}
