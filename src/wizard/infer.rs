//! Step state inference: what can the driver do on the page rendered right
//! now. Everything here reads transient page content through [`PageDriver`];
//! nothing is cached between calls.

use crate::page::{OptionChoice, PageDriver};
use crate::wizard::WizardStep;
use crate::{Error, Result};
use std::collections::HashSet;
use tracing::debug;

/// First-run entry link shown before the wizard has ever been completed.
pub const FIRST_RUN_LINK: &str = r#"a[href*="install.php?continue=1"]"#;

/// Language picker on the first wizard page.
pub const LANGUAGE_SELECT: &str = r#"select[name="langcode"]"#;
pub const LANGUAGE_OPTIONS: &str = r#"select[name="langcode"] option"#;

/// Radio items used for the profile and database driver groups.
pub const RADIO_ITEMS: &str = ".js-form-type-radio";

/// Server-side submission failure banner.
pub const ERROR_BANNER: &str = "[data-drupal-messages] .messages--error, .messages--error";

/// Collapsed disclosure hiding the advanced connection options.
pub const ADVANCED_DETAILS: &str = "summary.claro-details__summary";

/// "Save and continue" on the language, profile, and site forms.
pub const SUBMIT_CONTINUE: &str = r#"input[data-drupal-selector="edit-submit"]"#;

/// "Save and continue" on the database connection form.
pub const SUBMIT_SAVE: &str = r#"input[data-drupal-selector="edit-save"]"#;

/// Site name field; also the marker that installation finished.
pub const SITE_NAME_FIELD: &str = r#"input[data-drupal-selector="edit-site-name"]"#;
pub const SITE_MAIL_FIELD: &str = r#"input[data-drupal-selector="edit-site-mail"]"#;
pub const ACCOUNT_NAME_FIELD: &str = r#"input[data-drupal-selector="edit-account-name"]"#;
pub const ACCOUNT_PASS1_FIELD: &str = r#"input[data-drupal-selector="edit-account-pass-pass1"]"#;
pub const ACCOUNT_PASS2_FIELD: &str = r#"input[data-drupal-selector="edit-account-pass-pass2"]"#;

/// Optional pre-configured content type checkboxes on the site form.
pub const CONTENT_TYPE_BOXES: &str = "input.form-checkbox";

/// Link the installer renders when a translation download failed and it
/// offers to continue in the already-available language.
const LANGUAGE_FALLBACK_TEXT: &str = "continue in";

/// Enumerate the option group for the step currently rendered.
///
/// Contract: an empty group is a hard error naming the step (the expected
/// page structure is missing); a singleton must be auto-selected by the
/// caller; a multi-element list is resolved via the prompt collaborator.
pub async fn enumerate_options<D: PageDriver>(
    page: &D,
    step: WizardStep,
) -> Result<Vec<OptionChoice>> {
    let selector = match step {
        WizardStep::Language => LANGUAGE_OPTIONS,
        WizardStep::Profile | WizardStep::DatabaseConnection => RADIO_ITEMS,
        _ => {
            return Err(Error::MissingStructure {
                step,
                detail: "step has no option group".into(),
            })
        }
    };
    let raw = page.query_options(selector).await?;

    // Values are unique within a step; presentation order is kept.
    let mut seen = HashSet::new();
    let choices: Vec<OptionChoice> = raw
        .into_iter()
        .filter(|c| seen.insert(c.value.clone()))
        .collect();
    debug!("step {step}: {} option(s)", choices.len());

    if choices.is_empty() {
        return Err(Error::MissingStructure {
            step,
            detail: format!("no options found for '{selector}'"),
        });
    }
    Ok(choices)
}

/// Whether the last submission left a server-side error banner.
///
/// This is the sole signal used to decide retry-vs-advance.
pub async fn submission_failed<D: PageDriver>(page: &D) -> Result<bool> {
    page.exists(ERROR_BANNER).await
}

/// Whether the installer is offering to continue in the chosen language
/// because a required translation resource could not be fetched.
pub async fn language_fallback_offered<D: PageDriver>(page: &D) -> Result<bool> {
    let text = page.page_text().await?;
    Ok(text.to_lowercase().contains(LANGUAGE_FALLBACK_TEXT))
}

/// Selector for the radio input carrying a given option value.
pub fn radio_selector(value: &str) -> String {
    format!(
        r#"input[type="radio"][value="{}"]"#,
        value.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

/// Selector for a per-driver connection field.
///
/// The installer flattens the driver identifier and the field name into a
/// `data-drupal-selector` attribute, e.g. the PostgreSQL driver's database
/// field becomes `edit-drupalpgsqldriverdatabasepgsql-database`.
pub fn connection_field_selector(driver_value: &str, field: &str) -> String {
    let slug: String = driver_value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    format!(r#"input[data-drupal-selector="edit-{slug}-{field}"]"#)
}
