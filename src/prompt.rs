//! Operator selection of the offered upgrades
//!
//! This module provides:
//! - The `Prompt` trait used by the selection stage
//! - `TerminalPrompt`, a numbered multi-select on the terminal
//! - `SelectAll`, which accepts every option (`--yes`)

use crate::error::PromptError;
use console::{style, Term};
use std::collections::BTreeSet;

/// Multi-select over string labels
pub trait Prompt: Send + Sync {
    /// Present `options` and return the chosen subset, in offered order
    fn select(&self, message: &str, options: &[String]) -> Result<Vec<String>, PromptError>;
}

/// Prompt that picks every option without asking
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAll;

impl Prompt for SelectAll {
    fn select(&self, _message: &str, options: &[String]) -> Result<Vec<String>, PromptError> {
        Ok(options.to_vec())
    }
}

/// Interactive numbered selection on stderr/stdin
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    /// Create a prompt reading from the controlling terminal
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn show_options(&self, message: &str, options: &[String]) -> Result<(), PromptError> {
        self.term.write_line("")?;
        self.term
            .write_line(&style(message).bold().white().to_string())?;
        for (i, option) in options.iter().enumerate() {
            self.term
                .write_line(&format!("  [{}] {}", style(i + 1).cyan().bold(), option))?;
        }
        self.term.write_line("")?;
        Ok(())
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn select(&self, message: &str, options: &[String]) -> Result<Vec<String>, PromptError> {
        if options.is_empty() {
            return Ok(Vec::new());
        }
        self.show_options(message, options)?;

        loop {
            self.term.write_str(
                &style(format!(
                    "Select (e.g. 1,3-{}, all; empty for none): ",
                    options.len()
                ))
                .cyan()
                .to_string(),
            )?;
            self.term.flush()?;

            let input = self.term.read_line()?;
            match parse_selection(&input, options.len()) {
                Ok(indices) => {
                    return Ok(indices.into_iter().map(|i| options[i].clone()).collect());
                }
                Err(problem) => {
                    self.term.write_line(&style(problem).red().to_string())?;
                }
            }
        }
    }
}

/// Parse a selection line into sorted, de-duplicated zero-based indices
///
/// Accepts 1-based numbers and inclusive ranges separated by commas or
/// whitespace (`1,3-4`), `all`/`*` for everything, and an empty line for
/// nothing.
pub fn parse_selection(input: &str, count: usize) -> Result<Vec<usize>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    if input.eq_ignore_ascii_case("all") || input == "*" {
        return Ok((0..count).collect());
    }

    let parse_index = |token: &str| -> Result<usize, String> {
        match token.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
            _ => Err(format!(
                "'{}' is not a number between 1 and {}",
                token.trim(),
                count
            )),
        }
    };

    let mut selected = BTreeSet::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
    {
        match token.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse_index(start)?, parse_index(end)?);
                if start > end {
                    return Err(format!("range '{}' is reversed", token));
                }
                selected.extend(start..=end);
            }
            None => {
                selected.insert(parse_index(token)?);
            }
        }
    }

    Ok(selected.into_iter().collect())
}
