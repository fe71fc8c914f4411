//! Export configuration.

use std::path::{Path, PathBuf};

use m3ter_client::ClientConfig;
use m3ter_store::DatabaseConfig;

use crate::error::{ExportError, Result};
use crate::report::{MalformedPolicy, Variant};

/// Env file read before the environment, unless `M3TER_ENV_FILE` says
/// otherwise.
pub const DEFAULT_ENV_FILE: &str = "config/config.env";

/// Directory reports are written to by default.
pub const DEFAULT_OUTPUT_DIR: &str = "logs";

/// Where and how one run writes its report.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Output directory.
    pub output_dir: PathBuf,

    /// Output file name; the variant's default when unset.
    pub output_file: Option<String>,

    /// Handling of records the report cannot represent.
    pub malformed: MalformedPolicy,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_file: None,
            malformed: MalformedPolicy::default(),
        }
    }
}

impl RunOptions {
    /// Load options from `OUTPUT_DIR`, `OUTPUT_FILE` and
    /// `MALFORMED_RECORDS` (`abort` or `skip`).
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Configuration` for an unknown policy.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(dir) = std::env::var("OUTPUT_DIR") {
            options.output_dir = PathBuf::from(dir);
        }
        options.output_file = std::env::var("OUTPUT_FILE").ok();
        if let Ok(policy) = std::env::var("MALFORMED_RECORDS") {
            options.malformed = policy.parse()?;
        }

        Ok(options)
    }

    /// Write into `dir`.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the malformed-record policy.
    #[must_use]
    pub fn with_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }

    /// Full path of the report file for `variant`.
    #[must_use]
    pub fn output_path(&self, variant: Variant) -> PathBuf {
        self.output_dir.join(
            self.output_file
                .as_deref()
                .unwrap_or_else(|| variant.file_name()),
        )
    }
}

/// Everything a scheduled run needs.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Billing API settings.
    pub client: ClientConfig,

    /// Mapping database settings.
    pub database: DatabaseConfig,

    /// Output settings.
    pub run: RunOptions,
}

impl ExportConfig {
    /// Load the env file, then read every setting from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the env file is unreadable or a required setting
    /// is missing.
    pub fn from_env() -> Result<Self> {
        load_env_file()?;

        Ok(Self {
            client: ClientConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            run: RunOptions::from_env()?,
        })
    }
}

/// Load `M3TER_ENV_FILE` (default `config/config.env`) into the environment.
///
/// A missing file is not an error; variables already set are not
/// overridden.
///
/// # Errors
///
/// Returns `ExportError::Configuration` if the file exists but cannot be
/// parsed.
pub fn load_env_file() -> Result<Option<PathBuf>> {
    let path = std::env::var("M3TER_ENV_FILE")
        .map_or_else(|_| PathBuf::from(DEFAULT_ENV_FILE), PathBuf::from);
    load_env_file_from(&path)
}

fn load_env_file_from(path: &Path) -> Result<Option<PathBuf>> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Loaded env file");
            Ok(Some(path.to_path_buf()))
        }
        Err(e) if e.not_found() => {
            tracing::debug!(path = %path.display(), "No env file");
            Ok(None)
        }
        Err(e) => Err(ExportError::Configuration(format!(
            "cannot load {}: {e}",
            path.display()
        ))),
    }
}
