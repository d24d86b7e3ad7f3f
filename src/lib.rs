//! # wizard-runner
//!
//! Drives a multi-page web install wizard end-to-end. The target exposes no
//! API: the driver infers what it can do from the rendered page, resolves
//! input values by precedence (supplied config, interactive prompt,
//! documented default), submits, and reads the result page to decide whether
//! to retry, advance, or abort.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wizard_runner::{drive, AutoConfig, Session, TermPrompter, WizardOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> wizard_runner::Result<()> {
//! let auto = AutoConfig::load("configs/example.yaml")?;
//! let session = Session::launch(true).await?;
//! let outcome = drive(
//!     &session,
//!     &TermPrompter,
//!     &auto,
//!     "http://localhost:8080/",
//!     WizardOptions::default(),
//! )
//! .await;
//! session.close().await?;
//! println!("{:?}", outcome?);
//! # Ok(())
//! # }
//! ```

mod config;
mod driver;
mod page;
mod prompt;
mod resolve;
mod session;
#[cfg(test)]
pub(crate) mod testutil;
pub mod validate;
mod wizard;

pub use config::AutoConfig;
pub use page::{ElementInfo, OptionChoice, PageDriver};
pub use prompt::{Prompter, TermPrompter};
pub use resolve::{ConnectionParams, Resolver, SiteConfig};
pub use session::{drive, Landing, RunOutcome, Session};
pub use validate::ErrorClass;
pub use wizard::{Wizard, WizardOptions, WizardStep};

/// Result type for wizard-runner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a wizard run.
///
/// Recoverable conditions never appear here: an input that fails a local
/// predicate is re-prompted at the point of entry, and a page-reported
/// submission error replays the current step. Anything carried as an
/// [`Error`] is terminal for the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("navigation to '{url}' failed after {attempts} attempts: {cause}")]
    NavigationExhausted {
        url: String,
        attempts: u32,
        cause: String,
    },

    #[error("step {step}: expected page structure missing ({detail})")]
    MissingStructure {
        step: WizardStep,
        detail: String,
    },

    #[error("step {step}: installer still reports a submission error ({detail})")]
    SubmissionRejected {
        step: WizardStep,
        detail: String,
    },

    #[error("installation did not finish within {0} seconds")]
    ProgressTimeout(u64),
}

impl Error {
    /// Every carried error is terminal; see [`ErrorClass`] for the full
    /// three-way taxonomy used at the points where recovery happens.
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Fatal
    }
}
