//! Input resolution: merge supplied configuration, interactive answers, and
//! documented defaults per field, by precedence.
//!
//! Precedence per field: (1) non-empty value from [`AutoConfig`], (2)
//! interactively prompted value, (3) documented default. When the run was
//! started from a config file (or the documented-defaults mode), unset
//! fields that carry a default take it silently rather than prompting.

use crate::config::{supplied, AutoConfig};
use crate::page::OptionChoice;
use crate::prompt::Prompter;
use crate::validate::{check, password_ok, ErrorClass, FieldCheck};
use crate::Result;
use tracing::{debug, warn};

/// Resolved database connection values.
///
/// Held immutably for one submission attempt; a replayed step re-resolves
/// everything from scratch.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub driver: String,
    pub database: String,
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub table_prefix: String,
}

/// Resolved site configuration values.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site_name: String,
    pub site_email: String,
    pub admin_username: String,
    pub admin_password: String,
}

/// Resolves field values against the precedence chain.
pub struct Resolver<'a, P: Prompter> {
    prompt: &'a P,
    auto: &'a AutoConfig,
    prompt_defaults: bool,
}

impl<'a, P: Prompter> Resolver<'a, P> {
    /// Resolver that takes documented defaults silently for unset fields.
    pub fn new(prompt: &'a P, auto: &'a AutoConfig) -> Self {
        Self {
            prompt,
            auto,
            prompt_defaults: false,
        }
    }

    /// In fully interactive runs, defaulted fields are still offered as a
    /// prompt with the default prefilled.
    pub fn prompt_defaults(mut self, yes: bool) -> Self {
        self.prompt_defaults = yes;
        self
    }

    /// Resolve every connection field for one submission attempt.
    pub fn connection_params(&self, driver: &OptionChoice) -> Result<ConnectionParams> {
        let db = &self.auto.db_connection;
        Ok(ConnectionParams {
            driver: driver.value.clone(),
            database: self.field(
                "Database name",
                supplied(&db.database),
                None,
                FieldCheck::Required,
            )?,
            username: self.field(
                "Database username",
                supplied(&db.username),
                None,
                FieldCheck::Required,
            )?,
            password: self.secret("Database password", supplied(&db.password))?,
            host: self.field(
                "Database host",
                supplied(&db.host),
                Some("localhost"),
                FieldCheck::Required,
            )?,
            port: self.field(
                "Database port",
                supplied(&db.port),
                default_port(&driver.value),
                FieldCheck::Required,
            )?,
            table_prefix: self.field(
                "Table prefix (optional)",
                supplied(&db.prefix),
                None,
                FieldCheck::Optional,
            )?,
        })
    }

    /// Resolve every site configuration field.
    pub fn site_config(&self) -> Result<SiteConfig> {
        let site = &self.auto.site_data;
        Ok(SiteConfig {
            site_name: self.field(
                "Site name",
                supplied(&site.site_name),
                None,
                FieldCheck::Required,
            )?,
            site_email: self.field(
                "Site email address",
                supplied(&site.site_email),
                None,
                FieldCheck::Email,
            )?,
            admin_username: self.field(
                "Admin username",
                supplied(&site.admin_username),
                None,
                FieldCheck::Username,
            )?,
            admin_password: self.admin_password()?,
        })
    }

    /// Two-prompt confirm protocol for the admin password.
    ///
    /// Both prompts must independently pass the complexity predicate before
    /// the pair is compared; on mismatch both prompts are re-issued. Only
    /// terminates on a matching valid pair.
    pub fn admin_password(&self) -> Result<String> {
        if let Some(v) = supplied(&self.auto.site_data.admin_password) {
            if password_ok(v) {
                return Ok(v.to_string());
            }
            warn!("supplied admin password fails the complexity rules; asking interactively");
        }
        loop {
            let first = self.complex_password("Admin password")?;
            let second = self.complex_password("Confirm admin password")?;
            if first == second {
                return Ok(first);
            }
            warn!(
                class = %ErrorClass::RecoverableInput,
                "passwords do not match; enter both again"
            );
        }
    }

    /// Resolve one field against the precedence chain.
    fn field(
        &self,
        label: &str,
        supplied: Option<&str>,
        default: Option<&str>,
        kind: FieldCheck,
    ) -> Result<String> {
        if let Some(v) = supplied {
            match check(kind, v) {
                Ok(()) => return Ok(v.to_string()),
                Err(reason) => {
                    warn!("supplied value for '{label}' rejected: {reason}; asking interactively")
                }
            }
        }
        if !self.prompt_defaults {
            if let Some(d) = default {
                debug!("{label}: using default '{d}'");
                return Ok(d.to_string());
            }
            if kind == FieldCheck::Optional {
                debug!("{label}: optional and unset, leaving empty");
                return Ok(String::new());
            }
        }
        loop {
            let answer = self
                .prompt
                .input(label, default, kind == FieldCheck::Optional)?;
            match check(kind, &answer) {
                Ok(()) => return Ok(answer),
                Err(reason) => {
                    warn!(class = %ErrorClass::RecoverableInput, "{label}: {reason}")
                }
            }
        }
    }

    /// Masked required input with no default.
    fn secret(&self, label: &str, supplied: Option<&str>) -> Result<String> {
        if let Some(v) = supplied {
            return Ok(v.to_string());
        }
        loop {
            let answer = self.prompt.password(label)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            warn!(class = %ErrorClass::RecoverableInput, "{label}: input cannot be empty");
        }
    }

    /// Loop a masked prompt until the complexity predicate passes.
    fn complex_password(&self, label: &str) -> Result<String> {
        loop {
            let answer = self.prompt.password(label)?;
            match check(FieldCheck::Password, &answer) {
                Ok(()) => return Ok(answer),
                Err(reason) => {
                    warn!(class = %ErrorClass::RecoverableInput, "{label}: {reason}")
                }
            }
        }
    }
}

/// Documented default port for the selected database driver.
fn default_port(driver_value: &str) -> Option<&'static str> {
    let v = driver_value.to_ascii_lowercase();
    if v.contains("pgsql") {
        Some("5432")
    } else if v.contains("mysql") {
        Some("3306")
    } else {
        None
    }
}
