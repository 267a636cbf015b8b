// Declare modules
pub mod cli;
pub mod config;
pub mod errors;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod selection;
pub mod writer;

use anyhow::{Context, Result};
use chrono::Local;
use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

use self::cli::{parse_args, version_text, CliAction};
use self::config::resolve_config;
use self::writer::OutputWriter;

/// Initializes components and orchestrates data flow.
pub fn run<I, T>(args: I) -> Result<ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let started_at = Local::now();

    // 1. Parse Args
    let parsed = match parse_args(args)? {
        CliAction::Help(text) => {
            println!("{}", text);
            return Ok(ExitCode::FAILURE);
        }
        CliAction::Version => {
            println!("{}", version_text());
            return Ok(ExitCode::SUCCESS);
        }
        CliAction::Run(parsed) => parsed,
    };

    // 2. Resolve Configuration
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let config = resolve_config(parsed, &current_dir, &started_at)?;

    // 3. Walk and write
    println!("Generating your file tree, please wait...");
    let stats = OutputWriter::new(&config).write_tree(&current_dir)?;
    log::info!(
        "Listed {} directories and {} files",
        stats.directories,
        stats.files
    );

    println!(
        "File tree has been written to {}",
        config.output_path.display()
    );
    Ok(ExitCode::SUCCESS)
}
