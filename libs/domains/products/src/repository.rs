use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{PriceRange, Product, ProductUpdate};

/// Repository trait for Product persistence
///
/// Implementations return `Ok(None)` / a zero count when nothing matches;
/// turning absence into `ProductError::NotFound` is the service's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a fully built product as a single document
    async fn insert(&self, product: Product) -> ProductResult<Product>;

    /// Point lookup on `_id`
    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>>;

    /// All products inside the (exclusive) price bounds, in store order
    async fn find_by_price_range(&self, range: PriceRange) -> ProductResult<Vec<Product>>;

    /// Apply `$set` with the supplied fields and return the post-update document
    async fn update_fields(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> ProductResult<Option<Product>>;

    /// Remove the document with this id, returning the number deleted
    async fn delete_by_id(&self, id: &str) -> ProductResult<u64>;
}
