//! Order repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use shopfront_core::{Email, Order, OrderId, OrderLine, OrderStatus};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    items: Json<Vec<OrderLine>>,
    total_amount: Decimal,
    status: OrderStatus,
    customer_email: String,
    customer_name: String,
    shipping_address: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let customer_email = Email::parse(&row.customer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email on order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            items: row.items.0,
            total_amount: row.total_amount,
            status: row.status,
            customer_email,
            customer_name: row.customer_name,
            shipping_address: row.shipping_address,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a newly placed order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO storefront."order"
                (id, items, total_amount, status, customer_email, customer_name,
                 shipping_address, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(order.id.as_str())
        .bind(Json(&order.items))
        .bind(order.total_amount)
        .bind(order.status)
        .bind(order.customer_email.as_str())
        .bind(&order.customer_name)
        .bind(&order.shipping_address)
        .bind(order.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, items, total_amount, status, customer_email, customer_name,
                   shipping_address, created_at
            FROM storefront."order"
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }
}
