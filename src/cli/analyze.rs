use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::{
    cli::input::{InputArgs, SettingsArgs},
    export,
    prelude::*,
    source,
    tables::{build_failures_table, build_shortlist_table, build_summary_table},
    tradespace::{assembler::assemble, capex::estimate, shortlist::cheapest_per_tier},
};

#[derive(Parser)]
pub struct AnalyzeArgs {
    #[clap(flatten)]
    input: InputArgs,

    #[clap(flatten)]
    settings: SettingsArgs,

    /// Directory for the CSV tables, created when missing.
    #[clap(long = "output-dir", env = "OUTPUT_DIR", default_value = "output")]
    output_directory: PathBuf,
}

impl AnalyzeArgs {
    pub fn run(&self) -> Result {
        let settings = self.settings.read()?;
        let durations = settings.durations.hours();
        let criterion = settings.success_criterion();

        let paths = self.input.discover()?;
        if paths.is_empty() {
            warn!(directory = %self.input.directory.display(), "no resilience files found");
        }
        let assembly = assemble(
            paths.iter().map(|path| path.display().to_string()),
            &durations,
            |path| source::read_rows(Path::new(path)),
        );
        if !assembly.failures.is_empty() {
            println!("{}", build_failures_table(&assembly.failures));
        }
        let summary = assembly.summary;
        println!("{}", build_summary_table(&summary, criterion));

        fs::create_dir_all(&self.output_directory).with_context(|| {
            format!("failed to create `{}`", self.output_directory.display())
        })?;
        export::write_wide(&self.output_directory.join(export::WIDE_FILE_NAME), &summary)?;

        let all_cases = summary.to_long(None)?;
        let successful_cases = summary.to_long(Some(criterion))?;
        for (title, points) in [("all_cases", &all_cases), ("successful_cases", &successful_cases)] {
            let paths = export::write_per_generator(&self.output_directory, title, points)?;
            info!(title, n_files = paths.len(), "exported the long tables");
        }

        let records = estimate(&successful_cases, settings.reference_duration, &settings.cost)?;
        let shortlist = cheapest_per_tier(records, settings.top_k);
        println!("{}", build_shortlist_table(&shortlist));
        export::write_capex(&self.output_directory.join(export::CAPEX_FILE_NAME), &shortlist)?;

        info!(
            n_configurations = summary.len(),
            n_successful = successful_cases.len() / durations.len().max(1),
            n_shortlisted = shortlist.len(),
            "done",
        );
        Ok(())
    }
}
