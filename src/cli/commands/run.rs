//! Run Command
//!
//! Collect form answers, run a workflow, and print or save the report.
//!
//! Usage:
//!   ideaforge run problem --set problem="..." --set effect="..." ...
//!   ideaforge run validate --input answers.toml --format markdown -o report.md
//!   ideaforge run solutions --interactive

use std::path::PathBuf;

use console::{Term, style};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::cli::progress::StepProgress;
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{ForgeError, Result};
use crate::workflow::{
    FieldSpec, FormSubmission, OpportunityMatrix, OutputFormat, Workflow, catalog,
};

/// Run command options
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Workflow name
    pub workflow: String,
    /// Explicit config file, bypassing the resolution chain
    pub config_path: Option<PathBuf>,
    /// `key=value` answers from the command line
    pub assignments: Vec<(String, String)>,
    /// TOML file of answers
    pub input: Option<PathBuf>,
    /// Prompt for unanswered fields
    pub interactive: bool,
    /// API key supplied at runtime
    pub api_key: Option<String>,
    /// Market potential score for the opportunity matrix
    pub potential: Option<f32>,
    /// Challenge score for the opportunity matrix
    pub challenge: Option<f32>,
    pub format: OutputFormat,
    /// Write the report here instead of stdout
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

/// Answer source for `--interactive`, called once per unanswered field
pub type AskField<'a> = dyn FnMut(&FieldSpec) -> Result<String> + 'a;

pub fn run(options: RunOptions) -> Result<()> {
    if options.interactive
        && !options.quiet
        && let Ok(workflow) = catalog::find(&options.workflow)
    {
        Term::stderr().write_line(&format!("{}\n", style(workflow.description).dim()))?;
    }
    run_with(options, &mut ask_terminal)
}

fn run_with(options: RunOptions, ask: &mut AskField<'_>) -> Result<()> {
    let workflow = catalog::find(&options.workflow)?;
    let form = collect_form(workflow, &options, ask)?;

    // Bad input never reaches credential lookup or the network
    form.validate(workflow.fields)?;
    let matrix = matrix_from(options.potential, options.challenge)?;

    let ctx = CommandContext::load(options.config_path.as_deref())?;
    let runner = ctx.runner(options.api_key.as_deref())?;

    let out = Output::quiet(options.quiet);
    out.header(workflow.title);
    out.field("Model", runner.caller().provider().model());
    out.field("Steps", &workflow.steps.len().to_string());

    let progress = StepProgress::new(!options.quiet);
    let rt = Runtime::new()?;
    let report = rt.block_on(runner.run_observed(workflow, &form, matrix, &progress))?;
    debug!(report_id = %report.id, "Report ready");

    match &options.output {
        Some(path) => {
            report.write_to(path, options.format)?;
            out.success(&format!("Report written to {}", path.display()));
        }
        None => println!("{}", report.render(options.format)?),
    }
    Ok(())
}

/// Merge answers: input file first, then `--set` pairs, then interactive prompts
fn collect_form(
    workflow: &Workflow,
    options: &RunOptions,
    ask: &mut AskField<'_>,
) -> Result<FormSubmission> {
    let mut form = match &options.input {
        Some(path) => FormSubmission::from_toml_file(path)?,
        None => FormSubmission::new(),
    };

    let mut overlay = FormSubmission::new();
    for (key, value) in &options.assignments {
        overlay.insert(key.clone(), value.clone());
    }
    form.merge(overlay);

    if options.interactive {
        prompt_missing(workflow, &mut form, ask)?;
    }
    Ok(form)
}

fn prompt_missing(
    workflow: &Workflow,
    form: &mut FormSubmission,
    ask: &mut AskField<'_>,
) -> Result<()> {
    let pending: Vec<&FieldSpec> = workflow
        .fields
        .iter()
        .filter(|f| !form.is_answered(f.key))
        .collect();

    for field in pending {
        let answer = ask(field)?;
        form.insert(field.key, answer);
    }
    Ok(())
}

fn prompt_label(field: &FieldSpec) -> String {
    if field.required {
        field.label.to_string()
    } else {
        format!("{} (optional)", field.label)
    }
}

fn ask_terminal(field: &FieldSpec) -> Result<String> {
    let term = Term::stderr();
    term.write_line(&style(prompt_label(field)).bold().to_string())?;
    if !field.help.is_empty() {
        term.write_line(&style(field.help).dim().to_string())?;
    }
    term.write_str("> ")?;
    let answer = term.read_line()?;
    term.write_line("")?;
    Ok(answer)
}

fn matrix_from(potential: Option<f32>, challenge: Option<f32>) -> Result<Option<OpportunityMatrix>> {
    match (potential, challenge) {
        (Some(potential), Some(challenge)) => Ok(Some(OpportunityMatrix::new(potential, challenge)?)),
        (None, None) => Ok(None),
        _ => Err(ForgeError::Validation(
            "--potential and --challenge must be given together".to_string(),
        )),
    }
}
