use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ideaforge::cli::commands;
use ideaforge::cli::commands::run::RunOptions;
use ideaforge::workflow::{FormSubmission, OutputFormat};

#[derive(Parser)]
#[command(name = "ideaforge")]
#[command(
    version,
    about = "Problem, solution and startup-idea analysis backed by a rate-limit aware LLM client"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        short,
        global = true,
        help = "Config file to use instead of the global/project chain"
    )]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workflow and print its report
    Run {
        #[arg(help = "Workflow name (see 'ideaforge workflows')")]
        workflow: String,
        #[arg(
            long = "set",
            short = 's',
            value_name = "KEY=VALUE",
            value_parser = FormSubmission::parse_assignment,
            help = "Answer a form field"
        )]
        assignments: Vec<(String, String)>,
        #[arg(long, short, help = "TOML file of field answers")]
        input: Option<PathBuf>,
        #[arg(long, short = 'I', help = "Prompt for unanswered fields")]
        interactive: bool,
        #[arg(long, help = "API key (overrides environment and secrets file)")]
        api_key: Option<String>,
        #[arg(long, requires = "challenge", help = "Market potential score, 0-10")]
        potential: Option<f32>,
        #[arg(long, requires = "potential", help = "Challenge score, 0-10")]
        challenge: Option<f32>,
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        #[arg(long, short, help = "Write the report to a file")]
        output: Option<PathBuf>,
    },

    /// List available workflows
    Workflows {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },

    /// Verify configuration, credential and provider reachability
    Check {
        #[arg(long, help = "API key (overrides environment and secrets file)")]
        api_key: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Show configuration file paths
    Path,
    /// Write a default configuration file
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mideaforge encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "ideaforge=debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run {
            workflow,
            assignments,
            input,
            interactive,
            api_key,
            potential,
            challenge,
            format,
            output,
        } => {
            commands::run::run(RunOptions {
                workflow,
                config_path: cli.config.clone(),
                assignments,
                input,
                interactive,
                api_key,
                potential,
                challenge,
                format,
                output,
                quiet: cli.quiet,
            })?;
        }
        Commands::Workflows { json } => {
            commands::workflows::run(json)?;
        }
        Commands::Check { api_key } => {
            commands::check::run(config_path, api_key.as_deref())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                commands::config::show(config_path, json)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
