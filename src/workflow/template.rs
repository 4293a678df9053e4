//! Prompt Templates
//!
//! Templates reference form answers as `{field}` and earlier step outputs as
//! `{step:key}`. Rendering fails if a placeholder has no value.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::types::{ForgeError, Result};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-z_]+(?::[a-z_]+)?)\}").expect("placeholder pattern is valid")
});

/// Values available to a template
pub type TemplateVars = BTreeMap<String, String>;

/// Key under which a step's output is exposed to later templates
pub fn step_var(step_key: &str) -> String {
    format!("step:{}", step_key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate(&'static str);

impl PromptTemplate {
    pub const fn new(source: &'static str) -> Self {
        Self(source)
    }

    pub fn source(&self) -> &'static str {
        self.0
    }

    /// Names of all placeholders, in order of first appearance
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(self.0) {
            if let Some(name) = caps.get(1).map(|m| m.as_str())
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        names
    }

    pub fn render(&self, vars: &TemplateVars) -> Result<String> {
        let missing: Vec<&str> = self
            .placeholders()
            .into_iter()
            .filter(|name| !vars.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(ForgeError::Template(format!(
                "no value for placeholder(s): {}",
                missing.join(", ")
            )));
        }

        let rendered = PLACEHOLDER.replace_all(self.0, |caps: &regex::Captures<'_>| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        });
        Ok(rendered.trim().to_string())
    }
}
