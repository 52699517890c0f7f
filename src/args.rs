use clap::Parser;
use std::path::PathBuf;

/// Import a WeChat Pay ledger export into a Notion database.
#[derive(Parser, Debug)]
pub struct Args {
    /// Path to the exported ledger CSV file
    pub file: PathBuf,

    /// Parse and validate the ledger without talking to Notion
    #[clap(long)]
    pub dry_run: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
