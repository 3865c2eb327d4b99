use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    cli::input::{InputArgs, SettingsArgs},
    export,
    prelude::*,
    source,
    tables::build_summary_table,
    tradespace::{
        confidence::ConfidenceSummary,
        metadata::{ConfigParams, Metadata},
        outage::OutageDataset,
    },
};

#[derive(Parser)]
pub struct BurrowArgs {
    #[command(subcommand)]
    command: BurrowCommand,
}

impl BurrowArgs {
    pub fn run(&self) -> Result {
        match &self.command {
            BurrowCommand::Files(args) => args.run(),
            BurrowCommand::Inspect(args) => args.run(),
            BurrowCommand::Summary(args) => args.run(),
        }
    }
}

#[derive(Subcommand)]
pub enum BurrowCommand {
    /// List the files the analysis would pick up.
    Files(BurrowFilesArgs),

    /// Parse a single resilience file and show its confidence row.
    Inspect(BurrowInspectArgs),

    /// Show a previously exported wide table.
    Summary(BurrowSummaryArgs),
}

#[derive(Parser)]
pub struct BurrowFilesArgs {
    #[clap(flatten)]
    input: InputArgs,
}

impl BurrowFilesArgs {
    fn run(&self) -> Result {
        for path in self.input.discover()? {
            println!("{}", path.display());
        }
        Ok(())
    }
}

#[derive(Parser)]
pub struct BurrowInspectArgs {
    #[clap(flatten)]
    settings: SettingsArgs,

    /// Resilience file to inspect.
    file: PathBuf,
}

impl BurrowInspectArgs {
    fn run(&self) -> Result {
        let settings = self.settings.read()?;
        let durations = settings.durations.hours();

        let rows = source::read_rows(&self.file)?;
        let metadata = Metadata::extract(&rows)?;
        let params = ConfigParams::try_from(&metadata)?;
        info!(config = ?params.key, battery_hours = ?params.battery_hours, "metadata");

        let dataset = OutageDataset::load(&rows, params)?;
        info!(
            header = ?dataset.header,
            n_outages = dataset.rows.len(),
            n_skipped_rows = dataset.n_skipped_rows,
            first_start = ?dataset.rows.iter().map(|row| row.record.start).min(),
            last_start = ?dataset.rows.iter().map(|row| row.record.start).max(),
            max_cot = ?dataset.rows.iter().map(|row| row.record.cot).max(),
            "event table",
        );

        let mut summary = ConfidenceSummary::new(durations.clone());
        summary.rows.push(dataset.summarize(&durations)?);
        println!("{}", build_summary_table(&summary, settings.success_criterion()));
        Ok(())
    }
}

#[derive(Parser)]
pub struct BurrowSummaryArgs {
    #[clap(flatten)]
    settings: SettingsArgs,

    /// Wide table written by `analyze`.
    file: PathBuf,
}

impl BurrowSummaryArgs {
    fn run(&self) -> Result {
        let settings = self.settings.read()?;
        let summary = export::read_wide(&self.file)?;
        info!(n_rows = summary.len(), n_durations = summary.durations.len(), "read");
        println!("{}", build_summary_table(&summary, settings.success_criterion()));
        Ok(())
    }
}
