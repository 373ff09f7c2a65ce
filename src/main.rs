mod ai;
mod backend;
mod command;
mod compose;
mod config;
mod constants;
mod history;
mod server;
mod service;
mod tone;
mod types;

use anyhow::{Context, Result};
use std::env;
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::backend::BackendSelector;
use crate::command::{ParsedCommand, available_commands, parse_command};
use crate::config::Config;
use crate::service::{EmailService, ServiceError};
use crate::types::GenerationRequest;

/// Server logs go to stderr; one-shot commands log to a file so stdout and
/// stderr stay clean for the generated email.
fn setup_logging(to_stderr: bool) {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,smartmail=debug"));

    let log_file = if to_stderr {
        None
    } else {
        Config::data_dir()
            .ok()
            .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|_| dir))
            .map(|dir| dir.join("smartmail.log"))
            .and_then(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .ok()
            })
    };

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!("smartmail - Email rewriter and tone polisher\n");
    eprintln!("Usage: smartmail [command]\n");
    eprintln!("Commands:");
    for cmd in available_commands() {
        eprintln!("    {:<12}{}", cmd.name, cmd.description);
    }
    eprintln!("\nConfiguration file: ~/.config/smartmail/config.toml");
    eprintln!("API key: set GROQ_API_KEY (without it the local composer is used)");
}

fn print_tones() {
    for tone in tone::all() {
        println!(
            "{:<12}{:<20}{:<36}{}",
            tone.name, tone.greeting, tone.closing, tone.style
        );
    }
}

async fn run_generate(tone: String, mode: types::Mode) -> Result<()> {
    let config = Config::load()?;

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("Failed to read text from stdin")?;

    let service = EmailService::new(BackendSelector::new(&config.ai)?, None);
    let request = GenerationRequest {
        input_text: input,
        tone,
        mode,
        persist: false,
    };

    match service.handle(request).await {
        Ok(result) => {
            println!("{}", result.output_text);
            Ok(())
        }
        Err(ServiceError::Validation(e)) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(ServiceError::Internal(e)) => Err(e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    match command {
        ParsedCommand::Help => {
            print_usage();
            Ok(())
        }
        ParsedCommand::Tones => {
            print_tones();
            Ok(())
        }
        ParsedCommand::Generate { tone, mode } => {
            setup_logging(false);
            run_generate(tone, mode).await
        }
        ParsedCommand::Serve => {
            setup_logging(true);
            let config = Config::load()?;
            server::run(config).await
        }
    }
}
