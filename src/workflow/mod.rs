//! Idea Workflows
//!
//! Form-driven prompt pipelines: collect answers, render prompts, run the
//! steps through the resilient caller, and assemble a report.

pub mod catalog;
pub mod form;
pub mod matrix;
pub mod report;
pub mod runner;
pub mod template;

pub use catalog::{Step, Workflow};
pub use form::{FieldSpec, FormSubmission};
pub use matrix::OpportunityMatrix;
pub use report::{OutputFormat, Report, Section};
pub use runner::{RunObserver, WorkflowRunner};
pub use template::{PromptTemplate, TemplateVars};
