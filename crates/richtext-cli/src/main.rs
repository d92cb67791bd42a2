// SPDX-License-Identifier: AGPL-3.0-or-later
//! richtext CLI tool
//!
//! Reads serialized rich-text documents and paints them on the terminal.
//!
//! ## Commands
//!
//! - `render [FILE]`: Interpret and print as text, Markdown or JSON
//! - `plain [FILE]`: Print the collapsed preview text
//! - `stats [FILE]`: Print word, character and depth counts as JSON
//!
//! FILE defaults to stdin.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use richtext_core::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "richtext")]
#[command(author, version, about = "Interpret serialized rich-text documents", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Deepest node nesting to accept
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Largest input to accept, in bytes
    #[arg(long, global = true)]
    max_input_bytes: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a document and print it
    Render {
        /// Document to read; stdin when omitted or `-`
        file: Option<PathBuf>,

        /// Output format: text, markdown or json
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Fail instead of printing unreadable input verbatim
        #[arg(long)]
        strict: bool,
    },

    /// Print the collapsed preview text of a document
    Plain {
        /// Document to read; stdin when omitted or `-`
        file: Option<PathBuf>,
    },

    /// Print document statistics as JSON
    Stats {
        /// Document to read; stdin when omitted or `-`
        file: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CliConfig::load(cli.config.as_deref())?;
    let render_config = config.render_config(cli.max_depth, cli.max_input_bytes);

    match cli.command {
        Commands::Render {
            file,
            format,
            strict,
        } => {
            let content = commands::read_input(file.as_deref())?;
            let format = format.unwrap_or(config.output.format);
            let output = commands::render_document(&content, format, render_config, strict)?;
            println!("{output}");
        }
        Commands::Plain { file } => {
            let content = commands::read_input(file.as_deref())?;
            println!("{}", commands::plain_text(&content, render_config));
        }
        Commands::Stats { file } => {
            let content = commands::read_input(file.as_deref())?;
            let stats = commands::document_stats(&content, render_config);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
