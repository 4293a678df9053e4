//! Workflows Command
//!
//! List the built-in workflows and their form fields.

use console::style;
use serde_json::json;

use crate::types::Result;
use crate::workflow::catalog;

pub fn run(as_json: bool) -> Result<()> {
    if as_json {
        let listing: Vec<_> = catalog::all()
            .iter()
            .map(|w| {
                json!({
                    "name": w.name,
                    "title": w.title,
                    "description": w.description,
                    "fields": w.fields.iter().map(|f| json!({
                        "key": f.key,
                        "label": f.label,
                        "required": f.required,
                    })).collect::<Vec<_>>(),
                    "steps": w.steps.iter().map(|s| s.key).collect::<Vec<_>>(),
                    "matrix": w.supports_matrix,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for workflow in catalog::all() {
        println!(
            "{}  {}",
            style(workflow.name).bold().cyan(),
            workflow.description
        );
        for field in workflow.fields {
            let marker = if field.required { "*" } else { " " };
            println!("   {} {:<12} {}", marker, field.key, style(field.label).dim());
        }
        if workflow.supports_matrix {
            println!("     accepts --potential/--challenge for an opportunity matrix");
        }
        println!();
    }
    println!("{}", style("* required").dim());
    Ok(())
}
