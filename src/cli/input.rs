use std::path::PathBuf;

use clap::Parser;

use crate::{prelude::*, settings::Settings, source};

#[derive(Parser)]
pub struct InputArgs {
    /// Directory with the simulated resilience files.
    #[clap(long = "input-dir", env = "INPUT_DIR")]
    pub directory: PathBuf,

    /// Only file names containing this are analyzed.
    #[clap(long, env = "INCLUDE", default_value = "resilience")]
    pub include: String,

    /// File names containing this are skipped.
    #[clap(long, env = "EXCLUDE", default_value = "superloop")]
    pub exclude: String,
}

impl InputArgs {
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        source::discover(&self.directory, &self.include, &self.exclude)
    }
}

#[derive(Parser)]
pub struct SettingsArgs {
    /// TOML file with duration thresholds, the success criterion and unit costs.
    #[clap(long = "settings", env = "SETTINGS", default_value = "tradespace.toml")]
    pub settings_path: PathBuf,
}

impl SettingsArgs {
    pub fn read(&self) -> Result<Settings> {
        Settings::read_from(&self.settings_path)
    }
}
