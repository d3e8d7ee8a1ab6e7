//! Database connectors and utilities for the products workspace.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client setup, retry and health checks
//! - `config` - Load [`mongodb::MongoConfig`] with `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "store");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
