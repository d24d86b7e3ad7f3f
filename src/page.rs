//! Typed page query capability consumed by the sequencer.
//!
//! All DOM access goes through [`PageDriver`]: plain structured records in,
//! plain values out, no live handles. The production implementation sits on
//! top of `eoka::Page` (see `driver.rs`); tests script one in memory.

use crate::Result;
use serde::Deserialize;

/// One selectable value extracted from the current page.
///
/// Recomputed fresh every time a step is (re-)entered; never cached across
/// step re-entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OptionChoice {
    /// Form value submitted when this option is chosen.
    pub value: String,
    /// Visible label, presentation order preserved.
    pub label: String,
    /// Optional descriptive text rendered next to the option.
    pub description: Option<String>,
}

impl OptionChoice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
        }
    }
}

/// A form element reported as a plain record (used for checkbox groups).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ElementInfo {
    /// Stable CSS selector that reaches this element again.
    pub selector: String,
    /// Associated label text, empty when none could be found.
    pub label: String,
    /// Current form value.
    pub value: String,
    /// Checked state for checkable inputs.
    pub checked: bool,
}

/// Generic DOM query interface: list, read, set, click, wait.
///
/// Implemented once per automation backend. The wizard sequencer depends
/// only on this trait, never on the backend directly.
#[allow(async_fn_in_trait)]
pub trait PageDriver {
    /// Navigate to a URL and wait for the load to settle.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Navigate back one history entry.
    async fn back(&self) -> Result<()>;

    /// URL the page is currently at.
    async fn current_url(&self) -> Result<String>;

    /// Full visible text of the page.
    async fn page_text(&self) -> Result<String>;

    /// Whether at least one element matches the selector.
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// Enumerate an option group (select options or radio items) as
    /// ordered choices.
    async fn query_options(&self, selector: &str) -> Result<Vec<OptionChoice>>;

    /// Enumerate matching form elements as plain records.
    async fn query_elements(&self, selector: &str) -> Result<Vec<ElementInfo>>;

    /// Set a form field's value.
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Pick an option of a select element by value.
    async fn select(&self, selector: &str, value: &str) -> Result<()>;

    /// Click an element; the element must exist.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Click an element if present; returns whether a click happened.
    async fn try_click(&self, selector: &str) -> Result<bool>;

    /// Click and suspend until the resulting navigation/update settles.
    ///
    /// A submission is never considered complete before this returns, so
    /// the caller never reads stale page state.
    async fn click_and_settle(&self, selector: &str) -> Result<()>;

    /// Wait until an element matching the selector appears.
    async fn wait_for(&self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// Suspend for a fixed interval.
    async fn sleep(&self, ms: u64);
}
