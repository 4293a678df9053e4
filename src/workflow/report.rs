//! Workflow Report
//!
//! Ordered step outputs plus the optional opportunity matrix, renderable as
//! styled terminal text, Markdown, or JSON.

use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

use super::matrix::OpportunityMatrix;
use crate::types::Result;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

/// Output of one workflow step
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub key: String,
    pub heading: String,
    pub body: String,
    /// Attempts the step needed, first try included
    pub attempts: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: Uuid,
    pub workflow: String,
    pub title: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<OpportunityMatrix>,
}

impl Report {
    pub fn new(workflow: &str, title: &str, model: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow: workflow.to_string(),
            title: title.to_string(),
            model: model.to_string(),
            generated_at: Utc::now(),
            sections: Vec::new(),
            matrix: None,
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Markdown => Ok(self.render_markdown()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Render and write to `path`
    pub fn write_to(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let content = match format {
            // Files never get terminal styling
            OutputFormat::Text => console::strip_ansi_codes(&self.render_text()).into_owned(),
            _ => self.render(format)?,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", style(&self.title).bold().underlined()));
        out.push_str(&format!(
            "{}\n",
            style(format!(
                "{} · {}",
                self.model,
                self.generated_at.format("%Y-%m-%d %H:%M UTC")
            ))
            .dim()
        ));
        for section in &self.sections {
            out.push_str(&format!("\n{}\n", style(&section.heading).bold()));
            out.push_str(&format!("{}\n", "─".repeat(40)));
            out.push_str(&section.body);
            out.push('\n');
        }
        if let Some(matrix) = &self.matrix {
            out.push_str(&format!("\n{}\n", style("Opportunity Matrix").bold()));
            out.push_str(&format!("{}\n", "─".repeat(40)));
            out.push_str(&matrix.render());
        }
        out
    }

    fn render_markdown(&self) -> String {
        let mut out = format!(
            "# {}\n\n_Model: {} · Generated: {}_\n",
            self.title,
            self.model,
            self.generated_at.to_rfc3339()
        );
        for section in &self.sections {
            out.push_str(&format!("\n## {}\n\n{}\n", section.heading, section.body));
        }
        if let Some(matrix) = &self.matrix {
            out.push_str(&format!(
                "\n## Opportunity Matrix\n\n```text\n{}```\n",
                matrix.render()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        let mut report = Report::new("problem", "Problem Analysis", "gpt-4-turbo");
        report.push(Section {
            key: "summary".into(),
            heading: "Problem Summary".into(),
            body: "Heat and noise hurt productivity.".into(),
            attempts: 1,
        });
        report.push(Section {
            key: "evidence".into(),
            heading: "Empirical Evidence".into(),
            body: "Studies show...".into(),
            attempts: 3,
        });
        report
    }

    #[test]
    fn test_markdown_keeps_section_order() {
        let md = report().render(OutputFormat::Markdown).unwrap();
        assert!(md.starts_with("# Problem Analysis"));
        let summary = md.find("## Problem Summary").unwrap();
        let evidence = md.find("## Empirical Evidence").unwrap();
        assert!(summary < evidence);
        assert!(!md.contains("Opportunity Matrix"));
    }

    #[test]
    fn test_markdown_includes_matrix() {
        let mut report = report();
        report.matrix = Some(OpportunityMatrix::new(8.5, 6.0).unwrap());
        let md = report.render(OutputFormat::Markdown).unwrap();
        assert!(md.contains("## Opportunity Matrix"));
        assert!(md.contains("```text"));
    }

    #[test]
    fn test_json_round_trips_fields() {
        let json = report().render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["workflow"], "problem");
        assert_eq!(value["sections"][1]["attempts"], 3);
        assert!(value.get("matrix").is_none());
    }

    #[test]
    fn test_text_contains_bodies() {
        let text = report().render(OutputFormat::Text).unwrap();
        let plain = console::strip_ansi_codes(&text);
        assert!(plain.contains("Problem Summary"));
        assert!(plain.contains("Studies show..."));
    }

    #[test]
    fn test_write_to_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports/out.md");
        report().write_to(&path, OutputFormat::Markdown).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("## Empirical Evidence"));
    }

    #[test]
    fn test_section_lookup() {
        let report = report();
        assert_eq!(report.section("evidence").unwrap().attempts, 3);
        assert!(report.section("missing").is_none());
    }
}
