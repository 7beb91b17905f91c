//! One-time seeding of the product table.
//!
//! Copies the built-in fallback dataset into `storefront.product`. Products
//! already present (by id) are left alone, so running it twice is harmless.

use shopfront_storefront::catalog::FallbackCatalog;
use shopfront_storefront::db::{CatalogStore, PgCatalogStore};

/// Seed products from the fallback dataset.
///
/// Returns the number of products inserted.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the insert fails.
pub async fn products() -> Result<u64, super::CommandError> {
    let fallback = FallbackCatalog::builtin()?;
    let store = PgCatalogStore::new(super::connect().await?);

    let existing = store.count_products().await?;
    let inserted = store.seed_products(fallback.seed_products()).await?;

    let offered = u64::try_from(fallback.seed_products().len()).unwrap_or(u64::MAX);
    tracing::info!(
        existing,
        inserted,
        skipped = offered.saturating_sub(inserted),
        "Product seeding complete"
    );
    Ok(inserted)
}
