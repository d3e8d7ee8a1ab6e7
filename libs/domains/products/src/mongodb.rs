//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::{PriceRange, Product, ProductUpdate};
use crate::repository::ProductRepository;

/// Default collection holding product documents
pub const PRODUCTS_COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Create a repository over the `products` collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    /// Create a repository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Create the index backing price range queries
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "price": 1 })
            .options(IndexOptions::builder().name("idx_price".to_string()).build())
            .build();

        self.collection.create_index(index).await?;
        tracing::info!(collection = %self.collection.name(), "Product indexes created successfully");
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    /// Build the price filter.
    ///
    /// Either bound may be given on its own; the `price` sub-document is
    /// only added when at least one bound is present.
    fn build_filter(range: &PriceRange) -> Document {
        let mut filter = doc! {};

        let mut price = doc! {};
        if let Some(min) = range.min_price {
            price.insert("$gt", min);
        }
        if let Some(max) = range.max_price {
            price.insert("$lt", max);
        }

        if !price.is_empty() {
            filter.insert("price", price);
        }

        filter
    }

    fn id_filter(id: &str) -> Document {
        doc! { "_id": id }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id, product_name = %product.name))]
    async fn insert(&self, product: Product) -> ProductResult<Product> {
        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_by_price_range(&self, range: PriceRange) -> ProductResult<Vec<Product>> {
        let filter = Self::build_filter(&range);

        let cursor = self.collection.find(filter).await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        tracing::debug!(count = products.len(), "Products fetched");
        Ok(products)
    }

    #[instrument(skip(self, update))]
    async fn update_fields(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> ProductResult<Option<Product>> {
        let set = update.into_set_document(Utc::now())?;

        let updated = self
            .collection
            .find_one_and_update(Self::id_filter(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(product_id = %id, "Product updated successfully");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &str) -> ProductResult<u64> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Product deleted successfully");
        }
        Ok(result.deleted_count)
    }
}
