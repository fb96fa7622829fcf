//! process-vars — check start requests against process variable extensions.
//!
//! Reads config from flags, falling back to env vars:
//!   PROCESS_VARS_EXTENSIONS_DIR — directory of `*-extensions.{json,yaml,yml}` files
//!   PROCESS_VARS_DATE_FORMAT    — chrono format for `date` text (default: %Y-%m-%d)
//!   RUST_LOG                    — tracing filter (default: info)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use process_vars_core::resolver::DEFAULT_DATE_FORMAT;
use process_vars_core::{
    ExtensionRegistry, ProcessStartRequest, ResolverConfig, VariableContract,
    VariableContractResolver,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "process-vars", version, about)]
struct Cli {
    /// Directory holding the extension documents.
    #[arg(long, env = "PROCESS_VARS_EXTENSIONS_DIR", global = true)]
    extensions_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a start request and print the resulting variables as JSON.
    Check {
        /// Start request JSON: {"processDefinitionKey", "businessKey", "variables"}.
        #[arg(long)]
        request: PathBuf,

        #[arg(long, env = "PROCESS_VARS_DATE_FORMAT", default_value = DEFAULT_DATE_FORMAT)]
        date_format: String,
    },
    /// List registered processes and their declared variables.
    List,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let dir = cli
        .extensions_dir
        .context("--extensions-dir or PROCESS_VARS_EXTENSIONS_DIR must be set")?;
    let registry = ExtensionRegistry::load_dir(&dir)
        .with_context(|| format!("loading extensions from {}", dir.display()))?;
    tracing::info!(processes = registry.len(), "extensions loaded");

    match cli.command {
        Command::Check {
            request,
            date_format,
        } => {
            let text = std::fs::read_to_string(&request)
                .with_context(|| format!("reading start request {}", request.display()))?;
            let outcome = check(&registry, &text, date_format)
                .with_context(|| format!("parsing start request {}", request.display()))?;
            match &outcome {
                CheckOutcome::Resolved(json) => println!("{json}"),
                CheckOutcome::Rejected(message) => eprintln!("{message}"),
            }
            Ok(outcome.exit_code())
        }
        Command::List => {
            print!("{}", list(&registry));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Result of checking one start request.
#[derive(Debug, PartialEq)]
enum CheckOutcome {
    /// Resolved variables as pretty JSON.
    Resolved(String),
    /// The validation message.
    Rejected(String),
}

impl CheckOutcome {
    fn exit_code(&self) -> ExitCode {
        match self {
            CheckOutcome::Resolved(_) => ExitCode::SUCCESS,
            CheckOutcome::Rejected(_) => ExitCode::from(2),
        }
    }
}

fn check(
    registry: &ExtensionRegistry,
    request_json: &str,
    date_format: String,
) -> Result<CheckOutcome> {
    let request = ProcessStartRequest::from_json_str(request_json)?;

    let key = request.process_definition_key();
    let contract = match registry.contract(key) {
        Some(contract) => contract.clone(),
        None => {
            tracing::warn!(process_key = key, "no extensions registered, variables pass through");
            VariableContract::empty(key)
        }
    };

    let resolver = VariableContractResolver::new(ResolverConfig { date_format });
    match resolver.resolve(&contract, request.variables()) {
        Ok(variables) => Ok(CheckOutcome::Resolved(serde_json::to_string_pretty(&variables)?)),
        Err(err) => Ok(CheckOutcome::Rejected(err.to_string())),
    }
}

fn list(registry: &ExtensionRegistry) -> String {
    registry
        .keys()
        .into_iter()
        .filter_map(|key| registry.contract(key))
        .map(render_contract)
        .collect()
}

fn render_contract(contract: &VariableContract) -> String {
    let mut out = format!("{}\n", contract.process_key());
    for def in contract.definitions() {
        let required = if def.required { " required" } else { "" };
        let line = match &def.value {
            Some(default) => format!(
                "  {}: {}{} (default {})\n",
                def.name, def.variable_type, required, default
            ),
            None => format!("  {}: {}{}\n", def.name, def.variable_type, required),
        };
        out.push_str(&line);
    }
    out
}
