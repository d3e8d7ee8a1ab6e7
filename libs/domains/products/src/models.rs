use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Product document as stored in the `products` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque identifier (stored as `_id`)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    /// Whether the product is available for sale
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a complete record from a creation payload.
    ///
    /// The identifier is assigned here, before the document reaches the store.
    pub fn new(input: ProductIn) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            name: input.name,
            quantity: input.quantity,
            price: input.price,
            status: input.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Creation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductIn {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default = "default_status")]
    pub status: bool,
}

fn default_status() -> bool {
    true
}

/// Sparse update payload: only fields present in the request are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

impl ProductUpdate {
    /// Body of the `$set` operator: exactly the supplied fields plus `updated_at`.
    pub fn into_set_document(self, now: DateTime<Utc>) -> bson::ser::Result<Document> {
        let mut set = bson::to_document(&self)?;
        set.insert("updated_at", bson::to_bson(&now)?);
        Ok(set)
    }
}

/// Read projection of a stored product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductOut {
    pub id: String,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductOut {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            quantity: product.quantity,
            price: product.price,
            status: product.status,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Projection returned after a partial update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductUpdateOut {
    pub id: String,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductUpdateOut {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            quantity: product.quantity,
            price: product.price,
            status: product.status,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Optional exclusive price bounds for listing products
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceRange {
    /// Only products priced strictly above this value
    pub min_price: Option<f64>,
    /// Only products priced strictly below this value
    pub max_price: Option<f64>,
}

impl PriceRange {
    pub fn new(min_price: Option<f64>, max_price: Option<f64>) -> Self {
        Self {
            min_price,
            max_price,
        }
    }

    /// Name of the first bound that is NaN or infinite, if any
    pub fn non_finite_bound(&self) -> Option<&'static str> {
        match (self.min_price, self.max_price) {
            (Some(min), _) if !min.is_finite() => Some("min_price"),
            (_, Some(max)) if !max.is_finite() => Some("max_price"),
            _ => None,
        }
    }

    /// Whether `price` falls inside the (exclusive) bounds
    pub fn contains(&self, price: f64) -> bool {
        self.min_price.is_none_or(|min| price > min) && self.max_price.is_none_or(|max| price < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> ProductIn {
        ProductIn {
            name: "Desk lamp".to_string(),
            quantity: 12,
            price: 24.5,
            status: true,
        }
    }

    #[test]
    fn test_new_product_copies_payload_and_assigns_id() {
        let product = Product::new(lamp());
        assert!(!product.id.is_empty());
        assert_eq!(product.name, "Desk lamp");
        assert_eq!(product.quantity, 12);
        assert_eq!(product.price, 24.5);
        assert!(product.status);
        assert_eq!(product.created_at, product.updated_at);

        let other = Product::new(lamp());
        assert_ne!(product.id, other.id);
    }

    #[test]
    fn test_product_serializes_id_as_underscore_id() {
        let product = Product::new(lamp());
        let doc = bson::to_document(&product).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), product.id);
        assert!(!doc.contains_key("id"));
    }

    #[test]
    fn test_product_in_status_defaults_to_true() {
        let input: ProductIn =
            serde_json::from_str(r#"{"name":"Mug","quantity":3,"price":7.0}"#).unwrap();
        assert!(input.status);
    }

    #[test]
    fn test_product_in_validation() {
        assert!(lamp().validate().is_ok());

        let invalid = ProductIn {
            name: String::new(),
            price: -1.0,
            ..lamp()
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_set_document_contains_only_supplied_fields() {
        let update = ProductUpdate {
            price: Some(99.0),
            ..Default::default()
        };
        let now = Utc::now();
        let set = update.into_set_document(now).unwrap();

        let mut keys: Vec<_> = set.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["price", "updated_at"]);
        assert_eq!(set.get_f64("price").unwrap(), 99.0);
    }

    #[test]
    fn test_update_from_json_leaves_absent_fields_unset() {
        let update: ProductUpdate = serde_json::from_str(r#"{"quantity": 0}"#).unwrap();
        assert_eq!(update.quantity, Some(0));
        assert!(update.name.is_none());
        assert!(update.price.is_none());
        assert!(update.status.is_none());
    }

    #[test]
    fn test_projections_keep_every_field() {
        let product = Product::new(lamp());
        let out = ProductOut::from(product.clone());
        assert_eq!(out.id, product.id);
        assert_eq!(out.price, product.price);

        let update_out = ProductUpdateOut::from(product.clone());
        assert_eq!(update_out.name, product.name);
        assert_eq!(update_out.updated_at, product.updated_at);
    }

    #[test]
    fn test_price_range_bounds_are_exclusive() {
        let range = PriceRange::new(Some(10.0), Some(50.0));
        assert!(!range.contains(10.0));
        assert!(range.contains(10.01));
        assert!(!range.contains(50.0));

        assert!(PriceRange::new(None, Some(50.0)).contains(-3.0));
        assert!(PriceRange::default().contains(f64::MAX));
    }

    #[test]
    fn test_price_range_detects_non_finite_bounds() {
        assert_eq!(
            PriceRange::new(Some(f64::NAN), None).non_finite_bound(),
            Some("min_price")
        );
        assert_eq!(
            PriceRange::new(Some(1.0), Some(f64::INFINITY)).non_finite_bound(),
            Some("max_price")
        );
        assert_eq!(PriceRange::new(Some(1.0), Some(2.0)).non_finite_bound(), None);
    }
}
