//! ledger.rs
//! Caller-owned holder of the current snapshot.

use crate::compute::solver;
use crate::sources::SourceError;
use crate::store::{Assignments, Model, Variable, VariableError};
use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::debug;

pub use self::error::LedgerError;
mod error {
    use super::*;
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum LedgerError {
        #[error(transparent)]
        Variable(#[from] VariableError),
        #[error("Invalid ledger config: {0}")]
        InvalidConfig(String),
        #[error(transparent)]
        Source(#[from] SourceError),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Superseded snapshots kept for `undo`. 0 disables history.
    pub history_limit: usize,
    /// Parse edits like an HTML integer field: leading integer prefix only,
    /// so "12.7" pins 12 and "abc" pins nothing.
    pub integer_text_input: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { history_limit: 32, integer_text_input: false }
    }
}

impl LedgerConfig {
    pub fn from_json(json: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(json).map_err(|e| LedgerError::InvalidConfig(e.to_string()))
    }
}

/// Owns "the current model" and replaces it atomically on every pin.
///
/// Snapshots are shared as `Arc<Model>`; anyone holding an older one keeps a
/// valid, unchanged view after the ledger moves on.
#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
    current: Arc<Model>,
    history: VecDeque<Arc<Model>>,
}

impl Default for Ledger {
    fn default() -> Self { Self::new(LedgerConfig::default()) }
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_model(config, Model::zero())
    }

    pub fn with_model(config: LedgerConfig, model: Model) -> Self {
        Self { config, current: Arc::new(model), history: VecDeque::new() }
    }

    pub fn config(&self) -> &LedgerConfig { &self.config }

    pub fn current(&self) -> Arc<Model> { Arc::clone(&self.current) }

    pub fn get(&self, var: Variable) -> f64 { self.current.get(var) }

    pub fn history_len(&self) -> usize { self.history.len() }

    pub fn pin(&mut self, var: Variable, value: f64) -> Arc<Model> {
        let next = solver::apply_single(&self.current, var, value);
        self.replace(next)
    }

    pub fn pin_named(&mut self, name: &str, value: f64) -> Result<Arc<Model>, LedgerError> {
        let var: Variable = name.parse()?;
        Ok(self.pin(var, value))
    }

    /// Applies a whole batch in one solver pass. An empty batch changes nothing.
    pub fn pin_batch(&mut self, assignments: &Assignments) -> Arc<Model> {
        if assignments.is_empty() {
            return self.current();
        }
        let next = solver::apply_batch(&self.current, assignments);
        self.replace(next)
    }

    /// Pins a value typed by a user. Returns `Ok(false)` and leaves the model
    /// alone when the text is not a number.
    pub fn pin_text(&mut self, name: &str, text: &str) -> Result<bool, LedgerError> {
        let var: Variable = name.parse()?;
        let parsed = if self.config.integer_text_input {
            parse_integer_prefix(text)
        } else {
            parse_real(text)
        };
        match parsed {
            Some(value) => {
                self.pin(var, value);
                Ok(true)
            }
            None => {
                debug!(variable = %var, text, "ignoring non-numeric input");
                Ok(false)
            }
        }
    }

    /// Restores the previous snapshot. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }

    fn replace(&mut self, next: Model) -> Arc<Model> {
        let next = Arc::new(next);
        let prev = std::mem::replace(&mut self.current, Arc::clone(&next));
        if self.config.history_limit > 0 {
            if self.history.len() == self.config.history_limit {
                self.history.pop_front();
            }
            self.history.push_back(prev);
        }
        next
    }
}

fn parse_real(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Leading optional sign and decimal digits after whitespace; the rest is ignored.
fn parse_integer_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let (negative, digits) = match s.as_bytes().first().copied() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let magnitude: f64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
