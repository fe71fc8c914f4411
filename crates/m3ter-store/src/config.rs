//! Database connection settings.

use std::time::Duration;

use crate::error::{Result, StoreError};

/// Default product-mapping table.
pub const DEFAULT_PRODUCT_TABLE: &str = "input_activeproducts";

/// Default bundle cross-reference table.
pub const DEFAULT_BUNDLE_TABLE: &str = "input_bundleproducts";

/// Postgres connection settings and the tables to read.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Server host name.
    pub host: String,

    /// Server port (default 5432).
    pub port: u16,

    /// Login role.
    pub user: String,

    /// Login password.
    pub password: String,

    /// Database name.
    pub database: String,

    /// Run-time parameters sent at connection start, parsed from a
    /// libpq-style `-c key=value` list.
    pub options: Vec<(String, String)>,

    /// Schema holding the mapping tables.
    pub schema: String,

    /// Product-mapping table name.
    pub product_table: String,

    /// Bundle cross-reference table name.
    pub bundle_table: String,

    /// Pool size. The export reads two tables sequentially.
    pub max_connections: u32,

    /// How long to wait for a pooled connection.
    pub acquire_timeout: Duration,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("product_table", &self.product_table)
            .field("bundle_table", &self.bundle_table)
            .finish_non_exhaustive()
    }
}

impl DatabaseConfig {
    /// Create settings with default port, tables and pool size.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
        schema: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 5432,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            options: Vec::new(),
            schema: schema.into(),
            product_table: DEFAULT_PRODUCT_TABLE.to_string(),
            bundle_table: DEFAULT_BUNDLE_TABLE.to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Load settings from environment variables.
    ///
    /// Required: `dbhost`, `dbuser`, `dbpassword`, `dbname`,
    /// `currentSchemaName`. Optional: `dbport`, `dboptions`,
    /// `PRODUCT_TABLE`, `BUNDLE_TABLE`, `DB_MAX_CONNECTIONS`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Configuration` if a required variable is missing
    /// or an optional one does not parse.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            required("dbhost")?,
            required("dbuser")?,
            required("dbpassword")?,
            required("dbname")?,
            required("currentSchemaName")?,
        );

        if let Some(port) = parsed("dbport")? {
            config.port = port;
        }
        if let Ok(raw) = std::env::var("dboptions") {
            config.options = parse_options(&raw)?;
        }
        if let Ok(table) = std::env::var("PRODUCT_TABLE") {
            config.product_table = table;
        }
        if let Ok(table) = std::env::var("BUNDLE_TABLE") {
            config.bundle_table = table;
        }
        if let Some(max) = parsed("DB_MAX_CONNECTIONS")? {
            config.max_connections = max;
        }

        Ok(config)
    }

    /// Set the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the bundle table name.
    #[must_use]
    pub fn with_bundle_table(mut self, table: impl Into<String>) -> Self {
        self.bundle_table = table.into();
        self
    }
}

/// Parse a libpq `options` string such as
/// `-c search_path=billing -c statement_timeout=5000`.
///
/// Accepts `-c key=value`, `-ckey=value` and `--key=value`.
///
/// # Errors
///
/// Returns `StoreError::Configuration` for a token that is not one of the
/// accepted forms.
pub fn parse_options(raw: &str) -> Result<Vec<(String, String)>> {
    let mut options = Vec::new();
    let mut tokens = raw.split_whitespace();

    while let Some(token) = tokens.next() {
        let setting = if token == "-c" {
            tokens
                .next()
                .ok_or_else(|| StoreError::Configuration("dboptions: -c without a setting".into()))?
        } else if let Some(rest) = token.strip_prefix("--") {
            rest
        } else if let Some(rest) = token.strip_prefix("-c") {
            rest
        } else {
            return Err(StoreError::Configuration(format!(
                "dboptions: unexpected token {token}"
            )));
        };

        let (key, value) = setting
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| {
                StoreError::Configuration(format!("dboptions: expected key=value, got {setting}"))
            })?;
        options.push((key.replace('-', "_"), value.to_string()));
    }

    Ok(options)
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| StoreError::Configuration(format!("{key} is not set")))
}

fn parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StoreError::Configuration(format!("{key} is not a valid number: {raw}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DatabaseConfig::new("db", "user", "pw", "billing", "public");
        assert_eq!(config.port, 5432);
        assert_eq!(config.product_table, "input_activeproducts");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn debug_hides_password() {
        let config = DatabaseConfig::new("db", "user", "hunter2", "billing", "public");
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn parses_separate_c_flags() {
        let options = parse_options("-c search_path=billing -c statement_timeout=5000").unwrap();
        assert_eq!(
            options,
            vec![
                ("search_path".to_string(), "billing".to_string()),
                ("statement_timeout".to_string(), "5000".to_string()),
            ]
        );
    }

    #[test]
    fn parses_attached_and_long_forms() {
        let options = parse_options("-csearch_path=a --statement-timeout=10").unwrap();
        assert_eq!(options[0], ("search_path".to_string(), "a".to_string()));
        assert_eq!(options[1], ("statement_timeout".to_string(), "10".to_string()));
    }

    #[test]
    fn empty_options() {
        assert!(parse_options("   ").unwrap().is_empty());
    }

    #[test]
    fn rejects_dangling_flag() {
        assert!(matches!(
            parse_options("-c"),
            Err(StoreError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_bare_word() {
        assert!(parse_options("search_path=billing").is_err());
        assert!(parse_options("-c =x").is_err());
    }
}
