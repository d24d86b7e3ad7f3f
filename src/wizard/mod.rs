//! The wizard step state machine.
//!
//! Steps are driven strictly in order; the only back-edges are the language
//! translation fallback and the database connection replay. Every decision
//! is inferred from the live page through [`infer`]; nothing read from a
//! previous entry of a step is reused.

pub(crate) mod infer;

use crate::config::{supplied, AutoConfig};
use crate::page::PageDriver;
use crate::prompt::Prompter;
use crate::resolve::{ConnectionParams, Resolver};
use crate::validate::ErrorClass;
use crate::{Error, Result};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// One discrete page in the installer's fixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Language,
    Profile,
    DatabaseConnection,
    InstallationProgress,
    SiteConfiguration,
    Complete,
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Language => "Language",
            Self::Profile => "Profile",
            Self::DatabaseConnection => "DatabaseConnection",
            Self::InstallationProgress => "InstallationProgress",
            Self::SiteConfiguration => "SiteConfiguration",
            Self::Complete => "Complete",
        })
    }
}

/// Tunables for a wizard run.
#[derive(Debug, Clone)]
pub struct WizardOptions {
    /// Fixed interval between installation progress polls.
    pub poll_interval_ms: u64,
    /// Optional deadline for the installation progress step. Absent by
    /// default, matching the installer's own open-ended batch run.
    pub progress_timeout_secs: Option<u64>,
    /// Offer documented defaults as prompts instead of taking them
    /// silently (fully interactive runs).
    pub prompt_defaults: bool,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2_000,
            progress_timeout_secs: None,
            prompt_defaults: false,
        }
    }
}

/// Drives the wizard from the language step to completion.
pub struct Wizard<'a, D: PageDriver, P: Prompter> {
    page: &'a D,
    prompt: &'a P,
    auto: &'a AutoConfig,
    opts: WizardOptions,
}

impl<'a, D: PageDriver, P: Prompter> Wizard<'a, D, P> {
    pub fn new(page: &'a D, prompt: &'a P, auto: &'a AutoConfig, opts: WizardOptions) -> Self {
        Self {
            page,
            prompt,
            auto,
            opts,
        }
    }

    /// Run every step in order; returns the URL reached on completion.
    pub async fn run(&self) -> Result<String> {
        let mut step = WizardStep::Language;
        while step != WizardStep::Complete {
            debug!("entering step {step}");
            let outcome = match step {
                WizardStep::Language => self.language().await.map(|_| WizardStep::Profile),
                WizardStep::Profile => {
                    self.profile().await.map(|_| WizardStep::DatabaseConnection)
                }
                WizardStep::DatabaseConnection => self
                    .database()
                    .await
                    .map(|_| WizardStep::InstallationProgress),
                WizardStep::InstallationProgress => self
                    .progress()
                    .await
                    .map(|_| WizardStep::SiteConfiguration),
                WizardStep::SiteConfiguration => self
                    .site_configuration()
                    .await
                    .map(|_| WizardStep::Complete),
                WizardStep::Complete => unreachable!("loop exits on Complete"),
            };
            step = outcome.map_err(|e| {
                error!(class = %e.class(), "aborting at step {step}: {e}");
                e
            })?;
            info!("step {step} reached");
        }
        self.page.current_url().await
    }

    /// Language selection, with the translation-fallback back-edge: if the
    /// result page still offers to continue in the chosen language, a
    /// required translation could not be fetched and the selection restarts.
    async fn language(&self) -> Result<()> {
        loop {
            let choice = self
                .choose(
                    WizardStep::Language,
                    "Select a language",
                    supplied(&self.auto.lang),
                )
                .await?;
            self.page
                .select(infer::LANGUAGE_SELECT, &choice.value)
                .await?;
            self.page.click_and_settle(infer::SUBMIT_CONTINUE).await?;

            if infer::language_fallback_offered(self.page).await? {
                warn!(
                    class = %ErrorClass::RecoverableStep,
                    "translation for '{}' could not be fetched; restarting language selection",
                    choice.label
                );
                self.page.back().await?;
                continue;
            }
            return Ok(());
        }
    }

    /// Profile selection; advances unconditionally after submission.
    async fn profile(&self) -> Result<()> {
        let choice = self
            .choose(
                WizardStep::Profile,
                "Select an installation profile",
                supplied(&self.auto.profile),
            )
            .await?;
        self.page.click(&infer::radio_selector(&choice.value)).await?;
        self.page.click_and_settle(infer::SUBMIT_CONTINUE).await
    }

    /// Database connection, replayed whole while the installer reports a
    /// submission error. Every replay re-reads the driver options and
    /// re-resolves every field; only an underlying navigation or browser
    /// failure ends the loop.
    async fn database(&self) -> Result<()> {
        let resolver = self.resolver();
        loop {
            let choice = self
                .choose(
                    WizardStep::DatabaseConnection,
                    "Select a database type",
                    supplied(&self.auto.db_connection.driver),
                )
                .await?;
            self.page.click(&infer::radio_selector(&choice.value)).await?;

            // Host, port, and prefix sit behind a collapsed disclosure.
            let _ = self.page.try_click(infer::ADVANCED_DETAILS).await?;

            let params = resolver.connection_params(&choice)?;
            self.fill_connection(&params).await?;
            self.page.click_and_settle(infer::SUBMIT_SAVE).await?;

            if !infer::submission_failed(self.page).await? {
                return Ok(());
            }
            warn!(
                class = %ErrorClass::RecoverableStep,
                "installer rejected the database settings; re-entering all fields"
            );
        }
    }

    async fn fill_connection(&self, params: &ConnectionParams) -> Result<()> {
        let fields = [
            ("database", &params.database),
            ("username", &params.username),
            ("password", &params.password),
            ("host", &params.host),
            ("port", &params.port),
            ("prefix", &params.table_prefix),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                continue;
            }
            let selector = infer::connection_field_selector(&params.driver, name);
            self.page.fill(&selector, value).await?;
        }
        Ok(())
    }

    /// Blocking poll at a fixed interval until the site configuration form
    /// appears. Open-ended unless a deadline was configured.
    async fn progress(&self) -> Result<()> {
        let started = Instant::now();
        info!(
            "installation running; polling every {}ms",
            self.opts.poll_interval_ms
        );
        loop {
            if self.page.exists(infer::SITE_NAME_FIELD).await? {
                return Ok(());
            }
            if let Some(limit) = self.opts.progress_timeout_secs {
                if started.elapsed() >= Duration::from_secs(limit) {
                    return Err(Error::ProgressTimeout(limit));
                }
            }
            self.page.sleep(self.opts.poll_interval_ms).await;
        }
    }

    /// Site and admin account form, plus the optional content type
    /// checkboxes when the installer renders them.
    async fn site_configuration(&self) -> Result<()> {
        let site = self.resolver().site_config()?;
        self.page.fill(infer::SITE_NAME_FIELD, &site.site_name).await?;
        self.page.fill(infer::SITE_MAIL_FIELD, &site.site_email).await?;
        self.page
            .fill(infer::ACCOUNT_NAME_FIELD, &site.admin_username)
            .await?;
        self.page
            .fill(infer::ACCOUNT_PASS1_FIELD, &site.admin_password)
            .await?;
        self.page
            .fill(infer::ACCOUNT_PASS2_FIELD, &site.admin_password)
            .await?;

        self.content_types().await?;

        self.page.click_and_settle(infer::SUBMIT_CONTINUE).await?;
        if infer::submission_failed(self.page).await? {
            // No replay edge exists for this step; advancing past a live
            // error banner is forbidden, so the run ends here.
            return Err(Error::SubmissionRejected {
                step: WizardStep::SiteConfiguration,
                detail: "site configuration form reported an error".into(),
            });
        }
        Ok(())
    }

    async fn content_types(&self) -> Result<()> {
        let boxes = self.page.query_elements(infer::CONTENT_TYPE_BOXES).await?;
        if boxes.is_empty() {
            return Ok(());
        }
        let labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
        let picks = self.prompt.multi_select(
            "Pre-configured content types to enable (none to skip)",
            &labels,
        )?;
        if picks.is_empty() {
            info!("no content types selected, skipping");
            return Ok(());
        }
        for index in picks {
            let Some(item) = boxes.get(index) else { continue };
            if item.checked {
                continue;
            }
            info!("enabling content type '{}'", item.label);
            self.page.click(&item.selector).await?;
        }
        Ok(())
    }

    /// Apply the edge policy to an option group: a supplied value that the
    /// page offers wins, a singleton is auto-selected without prompting,
    /// anything else goes to the prompt collaborator. Zero options already
    /// failed inside [`infer::enumerate_options`].
    async fn choose(
        &self,
        step: WizardStep,
        message: &str,
        preset: Option<&str>,
    ) -> Result<crate::page::OptionChoice> {
        let choices = infer::enumerate_options(self.page, step).await?;
        if let Some(want) = preset {
            if let Some(found) = choices.iter().find(|c| c.value == want || c.label == want) {
                debug!("step {step}: using supplied value '{}'", found.value);
                return Ok(found.clone());
            }
            warn!("step {step}: supplied value '{want}' is not offered by the page");
        }
        if choices.len() == 1 {
            info!(
                "step {step}: only one option ('{}'), selecting it automatically",
                choices[0].label
            );
            return Ok(choices[0].clone());
        }
        let value = self.prompt.select(message, &choices)?;
        choices
            .into_iter()
            .find(|c| c.value == value)
            .ok_or_else(|| Error::Prompt(format!("selection '{value}' is not an offered choice")))
    }

    fn resolver(&self) -> Resolver<'a, P> {
        Resolver::new(self.prompt, self.auto).prompt_defaults(self.opts.prompt_defaults)
    }
}
