//! Order types.
//!
//! An order is created exactly once from a checkout submission and is never
//! changed by the storefront afterwards. Its total is computed here from the
//! submitted lines; any total the client sends along is only a hint.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{OrderId, ProductId};
use super::price::Price;
use super::status::OrderStatus;
use super::validation::{ValidationError, required_text};

/// One line of an order, copied from a cart entry at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(alias = "id")]
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl OrderLine {
    /// `price * quantity` for this line, `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_times(self.quantity)
    }
}

/// Sum of `price * quantity` over `lines`, `None` if the total does not fit
/// in a [`Decimal`].
///
/// ```
/// use shopfront_core::{OrderLine, Price, ProductId, order_total};
/// use rust_decimal::Decimal;
///
/// let line = |price, quantity| OrderLine {
///     product_id: ProductId::new("p"),
///     name: String::new(),
///     price: Price::new(Decimal::from(price)).unwrap(),
///     quantity,
///     image: None,
/// };
/// assert_eq!(order_total(&[line(10, 2), line(5, 1)]), Some(Decimal::from(25)));
/// ```
#[must_use]
pub fn order_total(lines: &[OrderLine]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.line_total()?))
}

/// Shipping address as submitted: a single line, or the checkout form's parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShippingAddress {
    Line(String),
    #[serde(rename_all = "camelCase")]
    Structured {
        street: String,
        city: String,
        state: String,
        zip_code: String,
    },
}

impl ShippingAddress {
    /// Flatten into the single line stored on the order. Blank input yields `None`.
    #[must_use]
    pub fn into_line(self) -> Option<String> {
        let line = match self {
            Self::Line(line) => line.trim().to_owned(),
            Self::Structured {
                street,
                city,
                state,
                zip_code,
            } => [street, city, format!("{} {}", state.trim(), zip_code.trim())]
                .iter()
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        };
        (!line.is_empty()).then_some(line)
    }
}

/// Order submission as received on the wire.
///
/// Every field is optional so that an absent field is reported as a
/// validation error with a stable message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderLine>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    /// Client-computed total. Never used for the stored order.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub total_amount: Option<Decimal>,
}

impl NewOrder {
    /// Check that all four required fields are present and usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for an absent field and
    /// [`ValidationError::InvalidField`] for an empty item list, a line with a
    /// zero quantity or blank product id, a total too large to represent, or
    /// a malformed email.
    pub fn validate(self) -> Result<ValidatedOrder, ValidationError> {
        let items = self.items.ok_or(ValidationError::MissingField("items"))?;
        let customer_email = required_text(self.customer_email, "customerEmail")?;
        let customer_name = required_text(self.customer_name, "customerName")?;
        let shipping_address = self
            .shipping_address
            .and_then(ShippingAddress::into_line)
            .ok_or(ValidationError::MissingField("shippingAddress"))?;

        if items.is_empty() {
            return Err(ValidationError::invalid(
                "items",
                "must contain at least one line",
            ));
        }
        if let Some(line) = items.iter().find(|line| line.quantity == 0) {
            return Err(ValidationError::invalid(
                "items",
                format!("quantity for product {} must be at least 1", line.product_id),
            ));
        }
        if items.iter().any(|line| line.product_id.as_str().trim().is_empty()) {
            return Err(ValidationError::invalid("items", "product id cannot be blank"));
        }
        let total = order_total(&items)
            .ok_or_else(|| ValidationError::invalid("items", "order total is out of range"))?;

        let customer_email = Email::parse(&customer_email)
            .map_err(|e| ValidationError::invalid("customerEmail", e))?;

        Ok(ValidatedOrder {
            items,
            customer_email,
            customer_name,
            shipping_address,
            claimed_total: self.total_amount,
            total,
        })
    }
}

/// An order submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub items: Vec<OrderLine>,
    pub customer_email: Email,
    pub customer_name: String,
    pub shipping_address: String,
    /// The total the client claimed, kept only for diagnostics.
    pub claimed_total: Option<Decimal>,
    total: Decimal,
}

impl ValidatedOrder {
    /// The authoritative total, computed once during validation.
    #[must_use]
    pub const fn computed_total(&self) -> Decimal {
        self.total
    }

    /// Whether the client's claimed total disagrees with the computed one.
    #[must_use]
    pub fn total_mismatch(&self) -> Option<Decimal> {
        self.claimed_total
            .filter(|claimed| *claimed != self.computed_total())
    }

    /// Turn the submission into a pending order created at `now`.
    #[must_use]
    pub fn place(self, now: DateTime<Utc>) -> Order {
        let total_amount = self.computed_total();
        Order {
            id: OrderId::generate(now),
            items: self.items,
            total_amount,
            status: OrderStatus::Pending,
            customer_email: self.customer_email,
            customer_name: self.customer_name,
            shipping_address: self.shipping_address,
            created_at: now,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub customer_email: Email,
    pub customer_name: String,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
}
