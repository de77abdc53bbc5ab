//! Call arguments supplied to both sides of a test
//!
//! Arguments are stored as JSON values so a single test definition can
//! render them in start messages and decode them inside callables.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Positional and keyword arguments for one invocation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Args {
    #[serde(default)]
    positional: Vec<Value>,
    #[serde(default)]
    keyword: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument, replacing an earlier one with the same name
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.keyword.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.keyword.push((name, value)),
        }
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &[(String, Value)] {
        &self.keyword
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Decode the positional argument at `index`
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        let value = self
            .positional
            .get(index)
            .with_context(|| format!("Missing positional argument {index}"))?;
        serde_json::from_value(value.clone())
            .with_context(|| format!("Positional argument {index} has the wrong type"))
    }

    /// Decode the keyword argument `name`
    pub fn get_kw<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .keyword
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
            .with_context(|| format!("Missing keyword argument '{name}'"))?;
        serde_json::from_value(value.clone())
            .with_context(|| format!("Keyword argument '{name}' has the wrong type"))
    }

    /// Render as the inside of a call expression: `1, "a", key=2`
    pub fn render(&self) -> String {
        self.positional
            .iter()
            .map(Value::to_string)
            .chain(self.keyword.iter().map(|(k, v)| format!("{k}={v}")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
