//! Workflow Runner
//!
//! Validates the form, then runs each step through the [`ResilientCaller`]
//! in order. A step's output is exposed to later steps as `{step:key}`.
//! Any step failure aborts the run; partial reports are not returned.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, instrument};

use super::catalog::{Step, Workflow};
use super::form::FormSubmission;
use super::matrix::OpportunityMatrix;
use super::report::{Report, Section};
use super::template::step_var;
use crate::ai::{ResilientCaller, RetryStats};
use crate::types::{ForgeError, Result};

/// Hooks for reporting step progress to a user interface
pub trait RunObserver: Send + Sync {
    fn step_started(&self, _index: usize, _total: usize, _step: &Step) {}
    fn step_finished(&self, _index: usize, _total: usize, _step: &Step, _stats: &RetryStats) {}
}

impl RunObserver for () {}

pub struct WorkflowRunner {
    caller: ResilientCaller,
    /// Pause between consecutive steps
    pacing: Duration,
}

impl WorkflowRunner {
    pub fn new(caller: ResilientCaller) -> Self {
        Self {
            caller,
            pacing: Duration::ZERO,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn caller(&self) -> &ResilientCaller {
        &self.caller
    }

    pub async fn run(
        &self,
        workflow: &Workflow,
        form: &FormSubmission,
        matrix: Option<OpportunityMatrix>,
    ) -> Result<Report> {
        self.run_observed(workflow, form, matrix, &()).await
    }

    #[instrument(skip_all, fields(workflow = workflow.name, steps = workflow.steps.len()))]
    pub async fn run_observed(
        &self,
        workflow: &Workflow,
        form: &FormSubmission,
        matrix: Option<OpportunityMatrix>,
        observer: &dyn RunObserver,
    ) -> Result<Report> {
        if matrix.is_some() && !workflow.supports_matrix {
            return Err(ForgeError::Validation(format!(
                "workflow '{}' does not support an opportunity matrix",
                workflow.name
            )));
        }
        let mut vars = form.validate(workflow.fields)?;

        let mut report = Report::new(workflow.name, workflow.title, self.caller.provider().model());
        let total = workflow.steps.len();

        for (index, step) in workflow.steps.iter().enumerate() {
            if index > 0 && !self.pacing.is_zero() {
                sleep(self.pacing).await;
            }

            let prompt = step.prompt.render(&vars)?;
            observer.step_started(index, total, step);
            info!(step = step.key, index = index + 1, total, "Running step");

            let (completion, stats) = self.caller.call_with_stats(&step.request(prompt)).await?;
            observer.step_finished(index, total, step, &stats);

            // The report keeps the model the provider actually answered with
            if index == 0 {
                report.model = completion.model.clone();
            }
            vars.insert(step_var(step.key), completion.text.clone());
            report.push(Section {
                key: step.key.to_string(),
                heading: step.heading.to_string(),
                body: completion.text,
                attempts: stats.attempts,
            });
        }

        report.matrix = matrix;
        info!(sections = report.sections.len(), "Workflow complete");
        Ok(report)
    }
}
