//! Interactive prompt capability.
//!
//! The sequencer and resolver talk to [`Prompter`]; the terminal
//! implementation sits on top of `dialoguer`. Tests script one in memory.

use crate::page::OptionChoice;
use crate::{Error, Result};
use dialoguer::{Input, MultiSelect, Password, Select};

/// Prompt interface consumed by the core.
pub trait Prompter {
    /// Single choice; returns the value of the chosen option.
    fn select(&self, message: &str, choices: &[OptionChoice]) -> Result<String>;

    /// Multi choice over plain labels; returns chosen indices (may be empty).
    fn multi_select(&self, message: &str, items: &[String]) -> Result<Vec<usize>>;

    /// Free-text input. With a default, an empty answer yields the default;
    /// with `allow_empty`, an empty answer is returned as-is.
    fn input(&self, message: &str, default: Option<&str>, allow_empty: bool) -> Result<String>;

    /// Masked password input.
    fn password(&self, message: &str) -> Result<String>;
}

/// Terminal prompter backed by `dialoguer`.
pub struct TermPrompter;

impl Prompter for TermPrompter {
    fn select(&self, message: &str, choices: &[OptionChoice]) -> Result<String> {
        let items: Vec<String> = choices
            .iter()
            .map(|c| match &c.description {
                Some(d) => format!("{} ({})", c.label, d),
                None => c.label.clone(),
            })
            .collect();
        let index = Select::new()
            .with_prompt(message)
            .items(&items)
            .default(0)
            .interact()
            .map_err(prompt_err)?;
        Ok(choices[index].value.clone())
    }

    fn multi_select(&self, message: &str, items: &[String]) -> Result<Vec<usize>> {
        MultiSelect::new()
            .with_prompt(message)
            .items(items)
            .interact()
            .map_err(prompt_err)
    }

    fn input(&self, message: &str, default: Option<&str>, allow_empty: bool) -> Result<String> {
        let mut input = Input::<String>::new()
            .with_prompt(message)
            .allow_empty(allow_empty || default.is_some());
        if let Some(d) = default {
            input = input.default(d.to_string());
        }
        input.interact_text().map_err(prompt_err)
    }

    fn password(&self, message: &str) -> Result<String> {
        Password::new()
            .with_prompt(message)
            .interact()
            .map_err(prompt_err)
    }
}

fn prompt_err(e: dialoguer::Error) -> Error {
    Error::Prompt(e.to_string())
}
