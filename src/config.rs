//! Pre-answer configuration, loaded from an optional YAML file.
//!
//! Every field is optional: the resolver consults these values first and
//! falls through to interactive prompting for anything unset. Loading fails
//! closed: unknown fields and mistyped values reject the whole file.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Externally supplied pre-answers for a wizard run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutoConfig {
    /// Installer entry URL.
    pub url: Option<String>,

    /// Language code to pick on the language step.
    pub lang: Option<String>,

    /// Installation profile to pick on the profile step.
    pub profile: Option<String>,

    /// Database connection pre-answers.
    #[serde(default)]
    pub db_connection: DbConnection,

    /// Site configuration pre-answers.
    #[serde(default)]
    pub site_data: SiteData,
}

/// Pre-answers for the database connection step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DbConnection {
    pub driver: Option<String>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub prefix: Option<String>,
}

/// Pre-answers for the site configuration step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteData {
    pub site_name: Option<String>,
    pub site_email: Option<String>,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl AutoConfig {
    /// Load from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "cannot read '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: AutoConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

/// Treat a present-but-empty field as unset.
pub fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
