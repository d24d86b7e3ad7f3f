//! Session bootstrapping: launch the browser, open the target with retries,
//! detect an already-completed installation, and hand control to the
//! sequencer. The browser handle is owned here and only here; every exit
//! path goes through a single [`Session::close`].

use crate::config::AutoConfig;
use crate::page::PageDriver;
use crate::prompt::Prompter;
use crate::wizard::{infer, Wizard, WizardOptions};
use crate::{Error, Result};
use eoka::{Browser, Page};
use tracing::{debug, info, warn};

/// Transient navigation failures are retried this many times in total.
const NAV_ATTEMPTS: u32 = 3;

/// Fixed delay between navigation attempts.
const NAV_RETRY_DELAY_MS: u64 = 1_500;

/// What the first page load revealed about the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Landing {
    /// The installer's first-run entry is reachable.
    FreshInstall,
    /// The wizard has already been completed; nothing to do.
    AlreadyInstalled { url: String },
}

/// How a run ended (other than with an error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The wizard ran to its final step.
    Completed { url: String },
    /// The target was already installed; no field was resolved and no form
    /// was submitted.
    AlreadyInstalled { url: String },
}

/// The single browser automation handle for a run.
pub struct Session {
    browser: Browser,
    page: Page,
}

impl Session {
    /// Launch a browser and open a blank page.
    pub async fn launch(headless: bool) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless,
            ..Default::default()
        };
        debug!("launching browser (headless: {headless})");
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;
        Ok(Self { browser, page })
    }

    /// The underlying page handle.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Release the browser. Consumes the session; callers invoke this
    /// exactly once on every exit path.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

/// Open the target and run the wizard to an outcome.
///
/// Generic over the page and prompt collaborators; the production caller
/// passes the [`Session`] itself.
pub async fn drive<D: PageDriver, P: Prompter>(
    page: &D,
    prompt: &P,
    auto: &AutoConfig,
    url: &str,
    opts: WizardOptions,
) -> Result<RunOutcome> {
    open_with_retries(page, url).await?;

    match detect_landing(page).await? {
        Landing::AlreadyInstalled { url } => {
            info!("site is already installed and reachable at {url}");
            Ok(RunOutcome::AlreadyInstalled { url })
        }
        Landing::FreshInstall => {
            let final_url = Wizard::new(page, prompt, auto, opts).run().await?;
            Ok(RunOutcome::Completed { url: final_url })
        }
    }
}

/// Navigate to the target, retrying transient failures with a fixed delay.
/// The third consecutive failure ends the run.
pub async fn open_with_retries<D: PageDriver>(page: &D, url: &str) -> Result<()> {
    let mut last_cause = String::new();
    for attempt in 1..=NAV_ATTEMPTS {
        if attempt > 1 {
            info!("retrying navigation, attempt {attempt}/{NAV_ATTEMPTS}");
        }
        match page.goto(url).await {
            Ok(()) => return Ok(()),
            Err(e) => {
                warn!("navigation attempt {attempt}/{NAV_ATTEMPTS} failed: {e}");
                last_cause = e.to_string();
                if attempt < NAV_ATTEMPTS {
                    page.sleep(NAV_RETRY_DELAY_MS).await;
                }
            }
        }
    }
    Err(Error::NavigationExhausted {
        url: url.to_string(),
        attempts: NAV_ATTEMPTS,
        cause: last_cause,
    })
}

/// Inspect the landing page. A first-run entry link is followed; a page
/// that exposes neither that link nor the wizard's first form means the
/// installation already completed.
pub async fn detect_landing<D: PageDriver>(page: &D) -> Result<Landing> {
    if page.exists(infer::FIRST_RUN_LINK).await? {
        debug!("first-run entry link found, following it");
        page.click_and_settle(infer::FIRST_RUN_LINK).await?;
        return Ok(Landing::FreshInstall);
    }
    if page.exists(infer::LANGUAGE_SELECT).await? || page.exists(infer::RADIO_ITEMS).await? {
        return Ok(Landing::FreshInstall);
    }
    let url = page.current_url().await?;
    Ok(Landing::AlreadyInstalled { url })
}
