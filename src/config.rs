//! Command line arguments and the validated run configuration.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Plot column-wise mean, max and min of every CSV file in a directory"
)]
pub struct Args {
    /// Directory containing the input CSV files
    #[arg(long, value_name = "PATH")]
    pub data_dir: PathBuf,

    /// Directory the PDF plots are written to
    #[arg(long, value_name = "PATH")]
    pub output_dir: PathBuf,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Data directory {} does not exist", .0.display())]
    DataDirNotFound(PathBuf),
    #[error("Data directory {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Settings of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Not checked up front: a run without inputs never touches it.
    pub output_dir: PathBuf,
}

impl TryFrom<Args> for Config {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        if !args.data_dir.exists() {
            return Err(ConfigError::DataDirNotFound(args.data_dir));
        }
        if !args.data_dir.is_dir() {
            return Err(ConfigError::NotADirectory(args.data_dir));
        }

        Ok(Self {
            data_dir: args.data_dir,
            output_dir: args.output_dir,
        })
    }
}
