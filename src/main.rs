//! Command line front end for resolving messages from JSON bundles.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use json_message_source::{
    Locale, MessageArg, MessageSource, MessageSourceConfig, candidate_filenames,
};

#[derive(Debug, Parser)]
#[command(name = "json-messages", version, about = "Resolve localized messages from JSON bundles")]
struct Cli {
    /// Configuration file (JSON or YAML). Defaults to messages.config.json in the current directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing bundle files, overriding the configuration.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Comma-separated basenames, overriding the configuration.
    #[arg(long, global = true)]
    basename: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the message for CODE, substituting ARGS into its placeholders.
    Get {
        /// Message code to look up.
        code: String,
        /// Positional arguments; values that parse as numbers are formatted as numbers.
        args: Vec<String>,
        /// Locale tag such as `fr`, `en_CA` or `en-CA`.
        #[arg(long, default_value = "")]
        locale: String,
    },
    /// List the bundle filenames tried for BASENAME, most specific first.
    Candidates {
        /// Basename to expand.
        basename: String,
        /// Locale tag such as `fr`, `en_CA` or `en-CA`.
        #[arg(long, default_value = "")]
        locale: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Get { code, args, locale } => {
            let locale = parse_locale(locale)?;
            let source = build_source(&cli)?;
            let args: Vec<MessageArg> = args.iter().map(|value| parse_arg(value)).collect();

            match source.get_message(code, &args, &locale) {
                Ok(message) => {
                    println!("{message}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    eprintln!("{err}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Candidates { basename, locale } => {
            let locale = parse_locale(locale)?;
            for filename in candidate_filenames(basename, &locale) {
                println!("{filename}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_source(cli: &Cli) -> Result<MessageSource> {
    let base_dir = std::env::current_dir().context("failed to determine current directory")?;

    let mut config = match &cli.config {
        Some(path) => MessageSourceConfig::from_path(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => MessageSourceConfig::discover(&base_dir),
    };
    if let Some(root) = &cli.root {
        config.resource_root = root.to_string_lossy().into_owned();
    }
    if let Some(basename) = &cli.basename {
        config.basename = basename.clone();
    }

    Ok(MessageSource::from_config(&config, &base_dir))
}

fn parse_locale(tag: &str) -> Result<Locale> {
    tag.parse()
        .with_context(|| format!("invalid locale '{tag}'"))
}

fn parse_arg(value: &str) -> MessageArg {
    if let Ok(integer) = value.parse::<i64>() {
        return MessageArg::Integer(integer);
    }
    match value.parse::<f64>() {
        Ok(float) if float.is_finite() => MessageArg::Float(float),
        _ => MessageArg::Text(value.to_string()),
    }
}
