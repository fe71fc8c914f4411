//! Relational source for the product-mapping tables the billing export joins
//! against.
//!
//! Two tables are read wholesale:
//!
//! - the product-mapping table (`input_activeproducts`): meter code to
//!   Netsuite product ID
//! - the bundle cross-reference table: internal (plan) code to the Netsuite
//!   product ID a bundle bills as
//!
//! # Example
//!
//! ```no_run
//! use m3ter_store::{DatabaseConfig, MappingSource, PgMappingSource};
//!
//! # async fn example() -> m3ter_store::Result<()> {
//! let config = DatabaseConfig::from_env()?;
//! let source = PgMappingSource::connect(&config).await?;
//! let products = source.product_mappings().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod mapping;
pub mod memory;
pub mod postgres;

pub use config::DatabaseConfig;
pub use error::{Result, StoreError};
pub use mapping::{BundleMapping, ProductMapping};
pub use memory::StaticMappingSource;
pub use postgres::PgMappingSource;

use async_trait::async_trait;

/// Source of the mapping tables.
///
/// Abstracts the database so the export can run against fixed tables in
/// tests.
#[async_trait]
pub trait MappingSource: Send + Sync {
    /// Every row of the product-mapping table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    async fn product_mappings(&self) -> Result<Vec<ProductMapping>>;

    /// Every row of the bundle cross-reference table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be read.
    async fn bundle_mappings(&self) -> Result<Vec<BundleMapping>>;
}
