#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod export;
mod prelude;
mod quantity;
mod settings;
mod source;
mod tables;
mod tradespace;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Analyze(args) => args.run(),
        Command::Burrow(args) => args.run(),
    }
}
