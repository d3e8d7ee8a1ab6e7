//! Product Service - Business logic layer

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{PriceRange, Product, ProductIn, ProductOut, ProductUpdate, ProductUpdateOut};
use crate::repository::ProductRepository;

/// Product service providing the CRUD operations
///
/// Validates input, turns absent records into `ProductError::NotFound` and
/// projects stored documents into output shapes.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, body), fields(product_name = %body.name))]
    pub async fn create(&self, body: ProductIn) -> ProductResult<ProductOut> {
        body.validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        let product = self.repository.insert(Product::new(body)).await?;
        Ok(product.into())
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> ProductResult<ProductOut> {
        self.repository
            .find_by_id(id)
            .await?
            .map(ProductOut::from)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// List products priced strictly inside the optional bounds
    #[instrument(skip(self))]
    pub async fn query(&self, range: PriceRange) -> ProductResult<Vec<ProductOut>> {
        if let Some(bound) = range.non_finite_bound() {
            return Err(ProductError::Validation(format!(
                "{} must be a finite number",
                bound
            )));
        }

        let products = self.repository.find_by_price_range(range).await?;
        Ok(products.into_iter().map(ProductOut::from).collect())
    }

    /// Apply a partial update and return the updated record
    #[instrument(skip(self, body))]
    pub async fn update(&self, id: &str, body: ProductUpdate) -> ProductResult<ProductUpdateOut> {
        body.validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository
            .update_fields(id, body)
            .await?
            .map(ProductUpdateOut::from)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Delete a product; absent ids fail before any removal is attempted
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ProductResult<bool> {
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id.to_string()));
        }

        let deleted = self.repository.delete_by_id(id).await?;
        Ok(deleted > 0)
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
