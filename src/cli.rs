mod analyze;
mod burrow;
mod input;

use clap::{Parser, Subcommand};

use crate::cli::{analyze::AnalyzeArgs, burrow::BurrowArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: summarize the resilience files, filter, price and shortlist.
    #[clap(name = "analyze")]
    Analyze(Box<AnalyzeArgs>),

    /// Development tools.
    #[clap(name = "burrow")]
    Burrow(Box<BurrowArgs>),
}
