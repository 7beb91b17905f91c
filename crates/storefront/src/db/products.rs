//! Product repository.
//!
//! Queries are built at runtime (`query_as`) so the crate compiles without a
//! live database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use shopfront_core::{Price, Product, ProductFilter, ProductId};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, slug, name, description, category, price, stock, image, \
                               rating, reviews, featured, last_updated";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    slug: String,
    name: String,
    description: String,
    category: String,
    price: Decimal,
    stock: i32,
    image: String,
    rating: f64,
    reviews: i32,
    featured: bool,
    last_updated: Option<DateTime<Utc>>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;
        let stock = u32::try_from(row.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative stock for product {}", row.id))
        })?;
        let reviews = u32::try_from(row.reviews).map_err(|_| {
            RepositoryError::DataCorruption(format!("negative reviews for product {}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            slug: row.slug,
            name: row.name,
            description: row.description,
            category: row.category,
            price,
            stock,
            image: row.image,
            rating: row.rating,
            reviews,
            featured: row.featured,
            last_updated: row.last_updated,
        })
    }
}

/// Admin writes are range-checked before they get here; only records that
/// bypass validation, such as the fallback dataset, can hit the clamp.
fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Number of stored products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM storefront.product")
            .fetch_one(self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Products matching `filter`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product
             WHERE ($1::text IS NULL OR category = $1)
               AND (NOT $2 OR featured)
             ORDER BY seq"
        ))
        .bind(filter.category.as_deref())
        .bind(filter.featured_only)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored row is invalid.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Insert or replace a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO storefront.product
                (id, slug, name, description, category, price, stock, image,
                 rating, reviews, featured, last_updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                slug = EXCLUDED.slug,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                price = EXCLUDED.price,
                stock = EXCLUDED.stock,
                image = EXCLUDED.image,
                rating = EXCLUDED.rating,
                reviews = EXCLUDED.reviews,
                featured = EXCLUDED.featured,
                last_updated = EXCLUDED.last_updated
            ",
        )
        .bind(product.id.as_str())
        .bind(&product.slug)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price.amount())
        .bind(to_i32(product.stock))
        .bind(&product.image)
        .bind(product.rating)
        .bind(to_i32(product.reviews))
        .bind(product.featured)
        .bind(product.last_updated)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Insert every product whose id is not already stored, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// committed in that case.
    pub async fn seed(&self, products: &[Product]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for product in products {
            let result = sqlx::query(
                r"
                INSERT INTO storefront.product
                    (id, slug, name, description, category, price, stock, image,
                     rating, reviews, featured, last_updated)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                ON CONFLICT (id) DO NOTHING
                ",
            )
            .bind(product.id.as_str())
            .bind(&product.slug)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.category)
            .bind(product.price.amount())
            .bind(to_i32(product.stock))
            .bind(&product.image)
            .bind(product.rating)
            .bind(to_i32(product.reviews))
            .bind(product.featured)
            .bind(product.last_updated)
            .execute(&mut *tx)
            .await?;

            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
