use std::path::PathBuf;

use atel::Emit;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "atelier")]
#[command(version)]
#[command(about = "Scans and parses a script, printing its tokens or syntax tree")]
pub struct Cli {
    /// Script to parse
    #[arg(long, value_name = "PATH")]
    pub src: PathBuf,

    /// What to print to stdout
    #[arg(long, value_enum, default_value_t = Emit::Ast)]
    pub emit: Emit,

    /// Log debug events (overridden by `RUST_LOG`)
    #[arg(short, long)]
    pub verbose: bool,
}
