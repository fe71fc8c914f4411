//! In-memory mapping source.

use async_trait::async_trait;

use crate::error::Result;
use crate::mapping::{BundleMapping, ProductMapping};
use crate::MappingSource;

/// Fixed mapping tables held in memory.
///
/// Used by tests and by callers that already hold the mappings.
#[derive(Debug, Clone, Default)]
pub struct StaticMappingSource {
    products: Vec<ProductMapping>,
    bundles: Vec<BundleMapping>,
}

impl StaticMappingSource {
    /// Source with product mappings and no bundles.
    #[must_use]
    pub fn new(products: Vec<ProductMapping>) -> Self {
        Self {
            products,
            bundles: Vec::new(),
        }
    }

    /// Add bundle mappings.
    #[must_use]
    pub fn with_bundles(mut self, bundles: Vec<BundleMapping>) -> Self {
        self.bundles = bundles;
        self
    }
}

#[async_trait]
impl MappingSource for StaticMappingSource {
    async fn product_mappings(&self) -> Result<Vec<ProductMapping>> {
        Ok(self.products.clone())
    }

    async fn bundle_mappings(&self) -> Result<Vec<BundleMapping>> {
        Ok(self.bundles.clone())
    }
}
