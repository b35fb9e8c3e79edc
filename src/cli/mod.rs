use anyhow::Result;
use clap::{Parser, Subcommand};
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod credentials;
pub mod input;
pub mod menu;

use crate::ai::chat::ConversationEngine;
use crate::core::AppConfig;
use crate::core::error::{CredentialError, EngineError};
use crate::gemini::GeminiGateway;
use menu::MenuExit;

#[derive(Subcommand)]
enum Command {
    /// Start the interactive menu (default)
    Menu {},
    /// Ask a single question about diseases or health
    Ask {
        message: String,
    },
    /// Analyze an X-ray image
    Analyze {
        image: PathBuf,
    },
    /// Explain a file of ML model results in plain language
    Explain {
        file: PathBuf,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Model to use, overrides MEDCHAT_MODEL
    #[arg(long, global = true)]
    model: Option<String>,

    /// Base URL of the generative language API, overrides GEMINI_API_BASE
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Request timeout in seconds, overrides MEDCHAT_REQUEST_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing() {
    // Logs go to stderr so they don't interleave with the menu
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Prints a one-shot reply to `out`, or the error as the menu would show
/// it to `err`, and picks the exit code.
fn one_shot(
    result: Result<String, EngineError>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<ExitCode> {
    if result.is_ok() {
        writeln!(out, "{}", menu::present(result))?;
        Ok(ExitCode::SUCCESS)
    } else {
        writeln!(err, "{}", menu::present(result))?;
        Ok(ExitCode::FAILURE)
    }
}

pub async fn run() -> Result<ExitCode> {
    let args = Cli::parse();
    init_tracing();

    let config = AppConfig::default().with_overrides(args.model, args.api_base, args.timeout_secs);
    let mut rl = DefaultEditor::new()?;
    let mut stdout = io::stdout();

    let api_key = match credentials::acquire_api_key(
        config.gemini_api_key.as_deref(),
        &mut rl,
        &mut stdout,
    ) {
        Ok(key) => key,
        Err(CredentialError::Interrupted) => {
            println!("\n\n👋 Interrupted by user. Goodbye!");
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => return Err(err.into()),
    };

    let gateway = GeminiGateway::new(&config.gemini_api_base, &api_key, &config.gemini_model)
        .with_timeout(config.request_timeout);
    tracing::info!("Using model {}", gateway.model());
    let mut engine = ConversationEngine::builder(Box::new(gateway)).build();

    let mut stderr = io::stderr();
    let code = match args.command.unwrap_or(Command::Menu {}) {
        Command::Menu {} => {
            println!("✅ Chatbot initialized successfully!");
            if menu::run(&mut engine, &mut rl, &mut stdout).await? == MenuExit::Interrupted {
                println!("\n\n👋 Chatbot interrupted by user. Goodbye!");
            }
            ExitCode::SUCCESS
        }
        Command::Ask { message } => {
            one_shot(engine.chat(&message).await, &mut stdout, &mut stderr)?
        }
        Command::Analyze { image } => {
            one_shot(engine.analyze_image(&image).await, &mut stdout, &mut stderr)?
        }
        Command::Explain { file } => {
            let result = match input::read_results_file(&file) {
                Ok(raw_results) => engine.explain_results(&raw_results).await,
                Err(err) => Err(err.into()),
            };
            one_shot(result, &mut stdout, &mut stderr)?
        }
    };

    Ok(code)
}
