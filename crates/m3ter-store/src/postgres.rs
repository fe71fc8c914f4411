//! Postgres mapping source.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::error::{Result, StoreError};
use crate::mapping::{BundleMapping, ProductMapping};
use crate::MappingSource;

/// Reads mapping tables from Postgres.
///
/// Tables are read wholesale; each row is fetched as a JSON object so the
/// CRM-owned column set can change without touching this code.
#[derive(Debug, Clone)]
pub struct PgMappingSource {
    pool: PgPool,
    schema: String,
    product_table: String,
    bundle_table: String,
}

impl PgMappingSource {
    /// Open a connection pool.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the server cannot be reached or
    /// rejects the login.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .options(config.options.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await?;

        tracing::info!(
            host = %config.host,
            database = %config.database,
            schema = %config.schema,
            "Connected to mapping database"
        );

        Ok(Self::from_pool(pool, config))
    }

    /// Wrap an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            schema: config.schema.clone(),
            product_table: config.product_table.clone(),
            bundle_table: config.bundle_table.clone(),
        }
    }

    async fn read_table(&self, table: &str) -> Result<Vec<serde_json::Map<String, Value>>> {
        let sql = select_all(&self.schema, table);
        let rows = sqlx::query_scalar::<_, Value>(&sql).fetch_all(&self.pool).await?;

        let rows = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => Ok(map),
                other => Err(StoreError::Database(format!(
                    "expected a row object from {table}, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(schema = %self.schema, table, count = rows.len(), "Read table");
        Ok(rows)
    }
}

#[async_trait]
impl MappingSource for PgMappingSource {
    async fn product_mappings(&self) -> Result<Vec<ProductMapping>> {
        let rows = self.read_table(&self.product_table).await?;
        Ok(rows.iter().map(ProductMapping::from_row).collect())
    }

    async fn bundle_mappings(&self) -> Result<Vec<BundleMapping>> {
        let rows = self.read_table(&self.bundle_table).await?;
        Ok(rows.iter().map(BundleMapping::from_row).collect())
    }
}

/// `SELECT` every row of `schema.table` as one JSON object per row.
fn select_all(schema: &str, table: &str) -> String {
    format!(
        "SELECT to_jsonb(t) FROM {}.{} AS t",
        quote_ident(schema),
        quote_ident(table)
    )
}

/// Quote an SQL identifier, doubling embedded quotes.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
