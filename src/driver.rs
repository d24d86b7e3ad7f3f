//! [`PageDriver`] implemented over `eoka::Page`.
//!
//! Enumeration runs a small script in the page and parses the JSON it
//! returns, so the core only ever sees plain records.

use crate::page::{ElementInfo, OptionChoice, PageDriver};
use crate::session::Session;
use crate::{Error, Result};
use serde::Deserialize;
use tracing::debug;

/// How long a submission is given to settle before the result page is read.
const SETTLE_IDLE_MS: u64 = 500;
const SETTLE_TIMEOUT_MS: u64 = 20_000;

/// Enumerate an option group as `{value, label, description}` records.
/// Handles both `<option>` elements and radio-item wrappers.
const OPTIONS_JS: &str = r#"(() => {
    const out = [];
    for (const el of document.querySelectorAll(__selector)) {
        if (el.tagName === 'OPTION') {
            out.push({
                value: el.value,
                label: (el.textContent || '').trim(),
                description: null,
            });
            continue;
        }
        const input = el.matches('input[type="radio"]')
            ? el
            : el.querySelector('input[type="radio"]');
        if (!input) continue;
        const label = el.querySelector('label');
        const desc = el.querySelector('.form-item__description');
        out.push({
            value: input.value,
            label: label ? label.textContent.trim() : input.value,
            description: desc ? desc.textContent.trim() : null,
        });
    }
    return JSON.stringify(out);
})()"#;

/// Enumerate form elements as `{selector, label, value, checked}` records.
/// Selectors are rebuilt from stable attributes so they survive re-renders.
const ELEMENTS_JS: &str = r#"(() => {
    const out = [];
    for (const el of document.querySelectorAll(__selector)) {
        let selector;
        if (el.dataset && el.dataset.drupalSelector) {
            selector = el.tagName.toLowerCase()
                + '[data-drupal-selector=' + JSON.stringify(el.dataset.drupalSelector) + ']';
        } else if (el.id) {
            selector = '#' + CSS.escape(el.id);
        } else if (el.name) {
            selector = el.tagName.toLowerCase() + '[name=' + JSON.stringify(el.name) + ']';
        } else {
            continue;
        }
        let label = '';
        const item = el.closest('.form-item');
        const lbl = item ? item.querySelector('label') : null;
        if (lbl) label = lbl.textContent.trim();
        out.push({
            selector,
            label,
            value: el.value || '',
            checked: !!el.checked,
        });
    }
    return JSON.stringify(out);
})()"#;

#[derive(Deserialize)]
struct RawOption {
    value: String,
    label: String,
    description: Option<String>,
}

impl Session {
    /// Evaluate a script with `__selector` bound to a quoted selector and
    /// parse the JSON it stringifies.
    async fn enumerate<T: for<'de> Deserialize<'de>>(
        &self,
        js: &str,
        selector: &str,
    ) -> Result<Vec<T>> {
        let script = format!(
            "var __selector = {}; {}",
            serde_json::to_string(selector).unwrap(),
            js
        );
        let json: String = self.page().evaluate(&script).await?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("page enumeration returned bad data: {e}")))
    }
}

impl PageDriver for Session {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("goto: {url}");
        self.page().goto(url).await?;
        Ok(())
    }

    async fn back(&self) -> Result<()> {
        debug!("back");
        self.page().back().await?;
        let _ = self
            .page()
            .wait_for_network_idle(SETTLE_IDLE_MS, SETTLE_TIMEOUT_MS)
            .await;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page().url().await?)
    }

    async fn page_text(&self) -> Result<String> {
        Ok(self.page().text().await?)
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        let js = format!(
            "!!document.querySelector({})",
            serde_json::to_string(selector).unwrap()
        );
        Ok(self.page().evaluate(&js).await?)
    }

    async fn query_options(&self, selector: &str) -> Result<Vec<OptionChoice>> {
        let raw: Vec<RawOption> = self.enumerate(OPTIONS_JS, selector).await?;
        Ok(raw
            .into_iter()
            .map(|r| OptionChoice {
                value: r.value,
                label: r.label,
                description: r.description.filter(|d| !d.is_empty()),
            })
            .collect())
    }

    async fn query_elements(&self, selector: &str) -> Result<Vec<ElementInfo>> {
        self.enumerate(ELEMENTS_JS, selector).await
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        debug!("fill: {selector}");
        self.page().fill(selector, value).await?;
        Ok(())
    }

    async fn select(&self, selector: &str, value: &str) -> Result<()> {
        debug!("select: {selector} = '{value}'");
        let js = format!(
            r#"(() => {{
                const sel = document.querySelector({sel});
                if (!sel) return 'element_not_found';
                const opt = Array.from(sel.options).find(o => o.value === {val} || o.text === {val});
                if (!opt) return 'option_not_found';
                sel.value = opt.value;
                sel.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return 'ok';
            }})()"#,
            sel = serde_json::to_string(selector).unwrap(),
            val = serde_json::to_string(value).unwrap()
        );
        let result: String = self.page().evaluate(&js).await?;
        match result.as_str() {
            "ok" => Ok(()),
            "element_not_found" => Err(Error::Config(format!(
                "select element '{selector}' not found"
            ))),
            "option_not_found" => Err(Error::Config(format!(
                "option '{value}' not found in '{selector}'"
            ))),
            other => Err(Error::Config(format!("select failed: {other}"))),
        }
    }

    async fn click(&self, selector: &str) -> Result<()> {
        debug!("click: {selector}");
        self.page().click(selector).await?;
        Ok(())
    }

    async fn try_click(&self, selector: &str) -> Result<bool> {
        debug!("try_click: {selector}");
        Ok(self.page().try_click(selector).await?)
    }

    async fn click_and_settle(&self, selector: &str) -> Result<()> {
        debug!("click_and_settle: {selector}");
        self.page().click(selector).await?;
        self.page()
            .wait_for_network_idle(SETTLE_IDLE_MS, SETTLE_TIMEOUT_MS)
            .await?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        self.page().wait_for(selector, timeout_ms).await?;
        Ok(())
    }

    async fn sleep(&self, ms: u64) {
        self.page().wait(ms).await;
    }
}
