mod cli;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let source = fs::read_to_string(&cli.src)
        .with_context(|| format!("failed to read `{}`", cli.src.display()))?;
    debug!(path = %cli.src.display(), bytes = source.len(), "read source");

    let compilation = match atel::compile(&source) {
        Ok(compilation) => compilation,
        Err(error) => {
            eprintln!("{} {}", style("error:").red().bold().for_stderr(), error);
            return Ok(ExitCode::FAILURE);
        }
    };

    let output = atel::render(&compilation, cli.emit);
    if !output.is_empty() {
        println!("{}", output);
    }

    for diagnostic in &compilation.diagnostics {
        eprintln!("{} {}", style("error:").red().bold().for_stderr(), diagnostic);
    }

    if compilation.has_no_errors() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "{}",
            style(format!("{} error(s) reported", compilation.diagnostics.len()))
                .yellow()
                .for_stderr()
        );
        Ok(ExitCode::FAILURE)
    }
}
