//! Form Fields and Submissions
//!
//! A workflow declares its fields; answers arrive from the CLI as
//! `key=value` pairs, an input file, or interactive prompts. Validation
//! happens before any remote call is made.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::template::TemplateVars;
use crate::types::{ForgeError, Result};

/// One free-text field of a workflow form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    /// Question shown to the user
    pub label: &'static str,
    /// Guidance shown when prompting interactively
    pub help: &'static str,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(key: &'static str, label: &'static str, help: &'static str) -> Self {
        Self {
            key,
            label,
            help,
            required: true,
        }
    }

    pub const fn optional(key: &'static str, label: &'static str, help: &'static str) -> Self {
        Self {
            key,
            label,
            help,
            required: false,
        }
    }
}

/// Raw answers keyed by field key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSubmission {
    answers: BTreeMap<String, String>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read answers from a TOML file of `key = "answer"` pairs
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Parse a `key=value` assignment as given on the command line
    pub fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("missing field name in '{}'", raw));
        }
        Ok((key.to_string(), value.to_string()))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.answers.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.answers.get(key).map(String::as_str)
    }

    /// Whether the field has a non-blank answer
    pub fn is_answered(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.trim().is_empty())
    }

    /// Overlay answers from `other`; its values win
    pub fn merge(&mut self, other: FormSubmission) {
        self.answers.extend(other.answers);
    }

    /// Check the answers against the form and produce template variables.
    ///
    /// Every blank required field is reported at once. Unknown keys are
    /// rejected so typos do not silently drop an answer.
    pub fn validate(&self, fields: &[FieldSpec]) -> Result<TemplateVars> {
        let unknown: Vec<&str> = self
            .answers
            .keys()
            .map(String::as_str)
            .filter(|key| !fields.iter().any(|f| f.key == *key))
            .collect();
        if !unknown.is_empty() {
            let known: Vec<&str> = fields.iter().map(|f| f.key).collect();
            return Err(ForgeError::Validation(format!(
                "unknown field(s): {} (expected one of: {})",
                unknown.join(", "),
                known.join(", ")
            )));
        }

        let missing: Vec<String> = fields
            .iter()
            .filter(|f| f.required && !self.is_answered(f.key))
            .map(|f| f.label.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ForgeError::IncompleteInput { missing });
        }

        Ok(fields
            .iter()
            .map(|f| {
                let value = self.get(f.key).map(str::trim).unwrap_or_default();
                (f.key.to_string(), value.to_string())
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::required("problem", "Core problem", ""),
        FieldSpec::optional("context", "Context", ""),
        FieldSpec::required("affected", "Affected parties", ""),
    ];

    #[test]
    fn test_validate_trims_and_fills_optional() {
        let mut form = FormSubmission::new();
        form.insert("problem", "  Heat and noise  ");
        form.insert("affected", "Workers");

        let vars = form.validate(FIELDS).unwrap();
        assert_eq!(vars["problem"], "Heat and noise");
        assert_eq!(vars["affected"], "Workers");
        assert_eq!(vars["context"], "");
    }

    #[test]
    fn test_validate_reports_all_blank_required_fields() {
        let mut form = FormSubmission::new();
        form.insert("problem", "   ");

        let err = form.validate(FIELDS).unwrap_err();
        match err {
            ForgeError::IncompleteInput { missing } => {
                assert_eq!(missing, vec!["Core problem", "Affected parties"]);
            }
            other => panic!("expected IncompleteInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_unknown_keys() {
        let mut form = FormSubmission::new();
        form.insert("problem", "x");
        form.insert("affected", "y");
        form.insert("probelm", "typo");

        let err = form.validate(FIELDS).unwrap_err();
        assert!(matches!(err, ForgeError::Validation(ref m) if m.contains("probelm")));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            FormSubmission::parse_assignment("problem=a=b").unwrap(),
            ("problem".to_string(), "a=b".to_string())
        );
        assert!(FormSubmission::parse_assignment("no-equals").is_err());
        assert!(FormSubmission::parse_assignment("=value").is_err());
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = FormSubmission::new();
        base.insert("problem", "from file");
        base.insert("affected", "kept");

        let mut overlay = FormSubmission::new();
        overlay.insert("problem", "from flag");
        base.merge(overlay);

        assert_eq!(base.get("problem"), Some("from flag"));
        assert_eq!(base.get("affected"), Some("kept"));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "problem = \"\"\"\nMulti-line\nanswer\n\"\"\"\naffected = \"Operators\""
        )
        .unwrap();

        let form = FormSubmission::from_toml_file(file.path()).unwrap();
        assert_eq!(form.get("problem"), Some("Multi-line\nanswer\n"));
        assert_eq!(form.get("affected"), Some("Operators"));
    }
}
