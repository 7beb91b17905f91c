//! Product catalog types.
//!
//! Product JSON arrives from three places: the built-in fallback dataset,
//! administrative writes, and API responses decoded by clients. All of them go
//! through [`ProductRecord`], which is where the two historical names for the
//! quantity on hand (`stock` and `inventory`) collapse into one field via
//! [`canonical_stock`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::validation::{ValidationError, required_text};

/// Image used when a product is created without one.
pub const DEFAULT_PRODUCT_IMAGE: &str =
    "https://images.unsplash.com/photo-1505740420928-5e560c06d30e";

/// Rating given to a product created without one.
pub const DEFAULT_PRODUCT_RATING: f64 = 4.0;

const MAX_RATING: f64 = 5.0;

/// Derive the single authoritative stock figure.
///
/// Precedence is `stock`, then `inventory`, then `0`. Negative values clamp to
/// zero so the result is always a valid quantity.
///
/// ```
/// use shopfront_core::canonical_stock;
///
/// assert_eq!(canonical_stock(Some(3), Some(9)), 3);
/// assert_eq!(canonical_stock(None, Some(9)), 9);
/// assert_eq!(canonical_stock(None, None), 0);
/// assert_eq!(canonical_stock(Some(-4), Some(9)), 0);
/// ```
#[must_use]
pub fn canonical_stock(stock: Option<i64>, inventory: Option<i64>) -> u32 {
    let raw = stock.or(inventory).unwrap_or(0);
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// Derive a URL slug from a product name.
///
/// Lowercases the name and replaces every run of whitespace with a single
/// hyphen. Leading and trailing whitespace become hyphens too, so
/// `" Lamp "` slugs to `"-lamp-"`. Slugs are cosmetic and are not checked
/// for uniqueness.
///
/// ```
/// use shopfront_core::slugify;
///
/// assert_eq!(slugify("Wireless  Noise Cancelling\tHeadphones"), "wireless-noise-cancelling-headphones");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }
    slug
}

/// Quantities are stored as 32-bit signed integers.
fn storable_quantity(value: Option<i64>, field: &'static str) -> Result<(), ValidationError> {
    let max = i64::from(i32::MAX);
    match value {
        Some(v) if v > max => Err(ValidationError::invalid(
            field,
            format!("must be at most {max}"),
        )),
        _ => Ok(()),
    }
}

fn clamp_rating(rating: f64) -> f64 {
    if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, MAX_RATING)
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ProductRecord")]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub description: String,
    /// Free-text label, not a reference to another record.
    pub category: String,
    pub price: Price,
    /// Canonical quantity on hand.
    pub stock: u32,
    pub image: String,
    /// Average review score, 0 to 5.
    pub rating: f64,
    pub reviews: u32,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Value of the units on hand (`price * stock`).
    #[must_use]
    pub fn inventory_value(&self) -> Decimal {
        self.price.times(self.stock)
    }
}

/// Loose product shape accepted at every ingestion point.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub inventory: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Option<u32>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let slug = record
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&record.name));

        Self {
            id: record.id,
            slug,
            name: record.name,
            description: record.description,
            category: record.category,
            price: record.price,
            stock: canonical_stock(record.stock, record.inventory),
            image: record
                .image
                .unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_owned()),
            rating: clamp_rating(record.rating.unwrap_or(0.0)),
            reviews: record.reviews.unwrap_or(0),
            featured: record.featured,
            last_updated: record.last_updated,
        }
    }
}

/// Filter applied to product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category label to match.
    pub category: Option<String>,
    /// Only return featured products.
    pub featured_only: bool,
}

impl ProductFilter {
    /// Whether `product` passes this filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && product.category != *category
        {
            return false;
        }
        !self.featured_only || product.featured
    }
}

/// Administrative request to create a product.
///
/// Every field is optional on the wire so that a missing field surfaces as a
/// [`ValidationError`] rather than a body parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category: Option<String>,
    pub inventory: Option<i64>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub featured: Option<bool>,
}

impl NewProduct {
    /// Validate the request and build the product it describes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if `name`, `description`,
    /// `price`, `category` or `inventory` is absent, and
    /// [`ValidationError::InvalidField`] if a quantity is too large to store.
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Result<Product, ValidationError> {
        let name = required_text(self.name, "name")?;
        let description = required_text(self.description, "description")?;
        let price = self.price.ok_or(ValidationError::MissingField("price"))?;
        let category = required_text(self.category, "category")?;
        let inventory = self
            .inventory
            .ok_or(ValidationError::MissingField("inventory"))?;
        storable_quantity(Some(inventory), "inventory")?;
        storable_quantity(self.stock, "stock")?;
        storable_quantity(self.reviews.map(i64::from), "reviews")?;

        let slug = self
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&name));

        Ok(Product {
            id,
            slug,
            name,
            description,
            category,
            price,
            stock: canonical_stock(self.stock, Some(inventory)),
            image: self
                .image
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_owned()),
            rating: clamp_rating(self.rating.unwrap_or(DEFAULT_PRODUCT_RATING)),
            reviews: self.reviews.unwrap_or(0),
            featured: self.featured.unwrap_or(false),
            last_updated: Some(now),
        })
    }
}

/// Administrative partial update of a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category: Option<String>,
    pub inventory: Option<i64>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub featured: Option<bool>,
}

impl ProductPatch {
    /// Apply the patch and stamp `last_updated`.
    ///
    /// The slug is left alone unless the patch supplies one; renaming a
    /// product does not move its URL.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] if a text field is supplied
    /// but blank, or a quantity is too large to store. A quantity error is
    /// reported before anything is changed.
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) -> Result<(), ValidationError> {
        storable_quantity(self.inventory, "inventory")?;
        storable_quantity(self.stock, "stock")?;

        if let Some(name) = self.name {
            product.name = non_blank(name, "name")?;
        }
        if let Some(slug) = self.slug {
            product.slug = non_blank(slug, "slug")?;
        }
        if let Some(description) = self.description {
            product.description = non_blank(description, "description")?;
        }
        if let Some(category) = self.category {
            product.category = non_blank(category, "category")?;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if self.stock.is_some() || self.inventory.is_some() {
            product.stock = canonical_stock(self.stock, self.inventory);
        }
        if let Some(image) = self.image {
            product.image = non_blank(image, "image")?;
        }
        if let Some(rating) = self.rating {
            product.rating = clamp_rating(rating);
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        product.last_updated = Some(now);
        Ok(())
    }
}

fn non_blank(value: String, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::invalid(field, "cannot be blank"));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request() -> NewProduct {
        serde_json::from_value(json!({
            "name": "Trail Running Shoes",
            "description": "Light and grippy",
            "price": 89.5,
            "category": "Sports",
            "inventory": 12
        }))
        .unwrap()
    }

    #[test]
    fn test_canonical_stock_precedence() {
        assert_eq!(canonical_stock(Some(0), Some(7)), 0);
        assert_eq!(canonical_stock(None, Some(-1)), 0);
        assert_eq!(canonical_stock(Some(i64::MAX), None), u32::MAX);
    }

    #[test]
    fn test_slugify_collapses_whitespace() {
        assert_eq!(slugify("Smart  Watch"), "smart-watch");
        assert_eq!(slugify("Yoga Mat"), "yoga-mat");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_keeps_edge_whitespace_as_hyphens() {
        assert_eq!(slugify(" Lamp "), "-lamp-");
        assert_eq!(slugify("\tDesk\n\nLamp"), "-desk-lamp");
    }

    #[test]
    fn test_record_uses_inventory_when_stock_absent() {
        let product: Product = serde_json::from_value(json!({
            "id": "7",
            "name": "Desk Lamp",
            "price": 25,
            "category": "Home & Garden",
            "inventory": 4
        }))
        .unwrap();
        assert_eq!(product.stock, 4);
        assert_eq!(product.slug, "desk-lamp");
        assert_eq!(product.image, DEFAULT_PRODUCT_IMAGE);
    }

    #[test]
    fn test_record_prefers_stock() {
        let product: Product = serde_json::from_value(json!({
            "id": "8",
            "name": "Novel",
            "price": 12,
            "stock": 2,
            "inventory": 50,
            "rating": 9.0
        }))
        .unwrap();
        assert_eq!(product.stock, 2);
        assert!((product.rating - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serialized_product_has_single_stock_field() {
        let product: Product = serde_json::from_value(json!({
            "id": "9", "name": "Mug", "price": 8, "inventory": 3
        }))
        .unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["stock"], json!(3));
        assert!(value.get("inventory").is_none());
        assert!(value.get("lastUpdated").is_none());
    }

    #[test]
    fn test_new_product_defaults() {
        let now = Utc::now();
        let product = create_request()
            .into_product(ProductId::new("p1"), now)
            .unwrap();
        assert_eq!(product.slug, "trail-running-shoes");
        assert_eq!(product.stock, 12);
        assert!((product.rating - DEFAULT_PRODUCT_RATING).abs() < f64::EPSILON);
        assert_eq!(product.reviews, 0);
        assert!(!product.featured);
        assert_eq!(product.last_updated, Some(now));
    }

    #[test]
    fn test_new_product_keeps_explicit_slug() {
        let mut req = create_request();
        req.slug = Some("shoes".to_owned());
        let product = req.into_product(ProductId::new("p1"), Utc::now()).unwrap();
        assert_eq!(product.slug, "shoes");
    }

    #[test]
    fn test_new_product_missing_fields() {
        for field in ["name", "description", "price", "category", "inventory"] {
            let mut body = json!({
                "name": "X", "description": "Y", "price": 1, "category": "Z", "inventory": 1
            });
            body.as_object_mut().unwrap().remove(field);
            let req: NewProduct = serde_json::from_value(body).unwrap();
            assert_eq!(
                req.into_product(ProductId::new("p"), Utc::now()),
                Err(ValidationError::MissingField(field)),
                "field {field}"
            );
        }
    }

    #[test]
    fn test_new_product_blank_name_is_missing() {
        let mut req = create_request();
        req.name = Some("   ".to_owned());
        assert_eq!(
            req.into_product(ProductId::new("p"), Utc::now()),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn test_patch_applies_and_stamps() {
        let mut product = create_request()
            .into_product(ProductId::new("p1"), Utc::now())
            .unwrap();
        let later = Utc::now() + chrono::Duration::seconds(5);
        let patch: ProductPatch =
            serde_json::from_value(json!({"name": "Road Shoes", "inventory": 3, "featured": true}))
                .unwrap();
        patch.apply(&mut product, later).unwrap();

        assert_eq!(product.name, "Road Shoes");
        assert_eq!(product.slug, "trail-running-shoes");
        assert_eq!(product.stock, 3);
        assert!(product.featured);
        assert_eq!(product.last_updated, Some(later));
    }

    #[test]
    fn test_patch_rejects_blank_name() {
        let mut product = create_request()
            .into_product(ProductId::new("p1"), Utc::now())
            .unwrap();
        let patch = ProductPatch {
            name: Some(String::new()),
            ..ProductPatch::default()
        };
        assert!(matches!(
            patch.apply(&mut product, Utc::now()),
            Err(ValidationError::InvalidField { field: "name", .. })
        ));
    }

    #[test]
    fn test_filter() {
        let product = create_request()
            .into_product(ProductId::new("p1"), Utc::now())
            .unwrap();
        assert!(ProductFilter::default().matches(&product));
        assert!(
            ProductFilter {
                category: Some("Sports".into()),
                featured_only: false
            }
            .matches(&product)
        );
        assert!(
            !ProductFilter {
                category: Some("Books".into()),
                featured_only: false
            }
            .matches(&product)
        );
        assert!(
            !ProductFilter {
                category: None,
                featured_only: true
            }
            .matches(&product)
        );
    }

    #[test]
    fn test_new_product_rejects_unstorable_quantity() {
        let too_many = i64::from(i32::MAX) + 1;

        let mut req = create_request();
        req.inventory = Some(too_many);
        assert!(matches!(
            req.into_product(ProductId::new("p"), Utc::now()),
            Err(ValidationError::InvalidField { field: "inventory", .. })
        ));

        let mut req = create_request();
        req.stock = Some(too_many);
        assert!(matches!(
            req.into_product(ProductId::new("p"), Utc::now()),
            Err(ValidationError::InvalidField { field: "stock", .. })
        ));

        let mut req = create_request();
        req.reviews = Some(u32::MAX);
        assert!(matches!(
            req.into_product(ProductId::new("p"), Utc::now()),
            Err(ValidationError::InvalidField { field: "reviews", .. })
        ));

        let mut req = create_request();
        req.inventory = Some(i64::from(i32::MAX));
        let product = req.into_product(ProductId::new("p"), Utc::now()).unwrap();
        assert_eq!(product.stock, i32::MAX.unsigned_abs());
    }

    #[test]
    fn test_patch_rejects_unstorable_stock_untouched() {
        let mut product = create_request()
            .into_product(ProductId::new("p1"), Utc::now())
            .unwrap();
        let before = product.clone();
        let patch: ProductPatch =
            serde_json::from_value(json!({"name": "Renamed", "stock": 3_000_000_000_i64}))
                .unwrap();

        assert!(matches!(
            patch.apply(&mut product, Utc::now()),
            Err(ValidationError::InvalidField { field: "stock", .. })
        ));
        assert_eq!(product, before);
    }
}
