use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use travel_assistant::{
    AssistantConfig, QueryParser, ReplayCollaborator, TravelAssistant, TravelAssistantError,
    VERSION, logging,
};

#[derive(Parser)]
#[command(name = "travel-assistant")]
#[command(about = "Travel query normalization and agent response reconciliation", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract structured travel parameters from a request
    Parse {
        /// Free-text travel request
        query: String,
    },
    /// Reconcile a recorded agent payload against a request
    Reconcile {
        /// Free-text travel request the payload answers
        #[arg(long)]
        query: String,
        /// Payload file, or `-` for stdin
        #[arg(long, default_value = "-")]
        payload: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.chain().find_map(|cause| cause.downcast_ref::<TravelAssistantError>()) {
                Some(app_error) => eprintln!("{}", app_error.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let mut config = AssistantConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging);

    let output = match cli.command {
        Command::Parse { query } => {
            require_query(&query)?;
            render(&QueryParser::new().parse(&query))?
        }
        Command::Reconcile { query, payload } => {
            require_query(&query)?;
            let raw = read_payload(&payload)?;
            let assistant =
                TravelAssistant::new(ReplayCollaborator::new(raw), config.collaborator.clone());
            let response = assistant.handle(&query).await;
            if let Some(kind) = response.error() {
                eprintln!("{}", kind.description());
            }
            render(&response)?
        }
    };

    Ok(output)
}

fn require_query(query: &str) -> travel_assistant::Result<()> {
    if query.trim().is_empty() {
        return Err(TravelAssistantError::validation("Query cannot be empty"));
    }
    Ok(())
}

fn render<T: Serialize>(value: &T) -> travel_assistant::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn read_payload(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .with_context(|| "Failed to read payload from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source)
            .map_err(TravelAssistantError::from)
            .with_context(|| format!("Failed to read payload file: {source}"))
    }
}
