//! Scripted in-memory collaborators for unit tests.

use crate::page::{ElementInfo, OptionChoice, PageDriver};
use crate::prompt::Prompter;
use crate::{Error, Result};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

/// Scripted page: per-selector answers, recorded calls, no real browser.
///
/// Sequenced answers (`push_*_seq` / repeated `push_options`) are consumed
/// in order; the last entry repeats once the queue runs dry.
#[derive(Default)]
pub(crate) struct FakePage {
    options: RefCell<HashMap<String, VecDeque<Vec<OptionChoice>>>>,
    elements: RefCell<HashMap<String, Vec<ElementInfo>>>,
    exists: RefCell<HashMap<String, VecDeque<bool>>>,
    texts: RefCell<VecDeque<String>>,
    url: RefCell<String>,
    goto_failures: Cell<u32>,
    log: RefCell<Vec<String>>,
}

impl FakePage {
    pub fn new() -> Self {
        let page = Self::default();
        *page.url.borrow_mut() = "http://localhost:8080/".into();
        page
    }

    pub fn set_url(&self, url: &str) {
        *self.url.borrow_mut() = url.into();
    }

    pub fn push_options(&self, selector: &str, choices: Vec<OptionChoice>) {
        self.options
            .borrow_mut()
            .entry(selector.into())
            .or_default()
            .push_back(choices);
    }

    pub fn set_elements(&self, selector: &str, elements: Vec<ElementInfo>) {
        self.elements.borrow_mut().insert(selector.into(), elements);
    }

    pub fn push_exists_seq<I: IntoIterator<Item = bool>>(&self, selector: &str, seq: I) {
        self.exists
            .borrow_mut()
            .entry(selector.into())
            .or_default()
            .extend(seq);
    }

    pub fn push_texts<'a, I: IntoIterator<Item = &'a str>>(&self, seq: I) {
        self.texts
            .borrow_mut()
            .extend(seq.into_iter().map(String::from));
    }

    /// Make the next `n` navigations fail.
    pub fn fail_gotos(&self, n: u32) {
        self.goto_failures.set(n);
    }

    pub fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn goto_count(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|l| l.starts_with("goto "))
            .count()
    }

    fn record(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }

    fn next_from<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl PageDriver for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.record(format!("goto {url}"));
        if self.goto_failures.get() > 0 {
            self.goto_failures.set(self.goto_failures.get() - 1);
            return Err(Error::Config("simulated navigation failure".into()));
        }
        Ok(())
    }

    async fn back(&self) -> Result<()> {
        self.record("back".into());
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.url.borrow().clone())
    }

    async fn page_text(&self) -> Result<String> {
        let mut texts = self.texts.borrow_mut();
        Ok(Self::next_from(&mut texts).unwrap_or_default())
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        let mut map = self.exists.borrow_mut();
        let answer = map
            .get_mut(selector)
            .and_then(Self::next_from)
            .unwrap_or(false);
        Ok(answer)
    }

    async fn query_options(&self, selector: &str) -> Result<Vec<OptionChoice>> {
        let mut map = self.options.borrow_mut();
        let answer = map
            .get_mut(selector)
            .and_then(Self::next_from)
            .unwrap_or_default();
        Ok(answer)
    }

    async fn query_elements(&self, selector: &str) -> Result<Vec<ElementInfo>> {
        Ok(self
            .elements
            .borrow()
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        self.record(format!("fill {selector}={value}"));
        Ok(())
    }

    async fn select(&self, selector: &str, value: &str) -> Result<()> {
        self.record(format!("select {selector}={value}"));
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.record(format!("click {selector}"));
        Ok(())
    }

    async fn try_click(&self, selector: &str) -> Result<bool> {
        self.record(format!("try_click {selector}"));
        Ok(true)
    }

    async fn click_and_settle(&self, selector: &str) -> Result<()> {
        self.record(format!("settle {selector}"));
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout_ms: u64) -> Result<()> {
        self.record(format!("wait_for {selector}"));
        Ok(())
    }

    async fn sleep(&self, _ms: u64) {
        self.record("sleep".into());
    }
}

/// Scripted prompter: queued answers, total invocation count, panics on an
/// unexpected prompt so "no prompt issued" assertions fail loudly.
#[derive(Default)]
pub(crate) struct FakePrompter {
    selects: RefCell<VecDeque<String>>,
    inputs: RefCell<VecDeque<String>>,
    passwords: RefCell<VecDeque<String>>,
    multi: RefCell<VecDeque<Vec<usize>>>,
    calls: Cell<usize>,
}

impl FakePrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_selects<'a, I: IntoIterator<Item = &'a str>>(&self, answers: I) {
        self.selects
            .borrow_mut()
            .extend(answers.into_iter().map(String::from));
    }

    pub fn push_inputs<'a, I: IntoIterator<Item = &'a str>>(&self, answers: I) {
        self.inputs
            .borrow_mut()
            .extend(answers.into_iter().map(String::from));
    }

    pub fn push_passwords<'a, I: IntoIterator<Item = &'a str>>(&self, answers: I) {
        self.passwords
            .borrow_mut()
            .extend(answers.into_iter().map(String::from));
    }

    pub fn push_multi<I: IntoIterator<Item = Vec<usize>>>(&self, answers: I) {
        self.multi.borrow_mut().extend(answers);
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Prompter for FakePrompter {
    fn select(&self, message: &str, _choices: &[OptionChoice]) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        let answer = self.selects.borrow_mut().pop_front();
        Ok(answer.unwrap_or_else(|| panic!("unexpected select prompt: {message}")))
    }

    fn multi_select(&self, message: &str, _items: &[String]) -> Result<Vec<usize>> {
        self.calls.set(self.calls.get() + 1);
        let answer = self.multi.borrow_mut().pop_front();
        Ok(answer.unwrap_or_else(|| panic!("unexpected multi_select prompt: {message}")))
    }

    fn input(&self, message: &str, _default: Option<&str>, _allow_empty: bool) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        let answer = self.inputs.borrow_mut().pop_front();
        Ok(answer.unwrap_or_else(|| panic!("unexpected input prompt: {message}")))
    }

    fn password(&self, message: &str) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        let answer = self.passwords.borrow_mut().pop_front();
        Ok(answer.unwrap_or_else(|| panic!("unexpected password prompt: {message}")))
    }
}
