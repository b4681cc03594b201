//! Batch Plotter
//! Turns every CSV file of a data directory into a summary statistics plot.

use crate::charts::{Figure, RenderError, StaticChartRenderer};
use crate::config::Config;
use crate::data::{find_csv_files, CsvLoader, LoaderError, TableLoader};
use crate::stats::{StatsCalculator, SUMMARY_STATISTICS};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Suffix appended to the input stem to name its plot.
pub const PLOT_SUFFIX: &str = "-plot.pdf";

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Cannot read data directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Failed to render plot for {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Input path {} has no file name", path.display())]
    FileName { path: PathBuf },
}

/// Outcome of a completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    /// Written plot files, in processing order.
    pub outputs: Vec<PathBuf>,
}

/// Output file name for `input`: its stem followed by `-plot.pdf`.
pub fn plot_file_name(input: &Path) -> Option<OsString> {
    let mut name = input.file_stem()?.to_os_string();
    name.push(PLOT_SUFFIX);
    Some(name)
}

/// Processes the data directory's CSV files one at a time, in name order.
///
/// The first failing file stops the run; plots already written stay on disk.
pub struct BatchPlotter<L: TableLoader = CsvLoader> {
    config: Config,
    loader: L,
}

impl BatchPlotter<CsvLoader> {
    pub fn new(config: Config) -> Self {
        Self::with_loader(config, CsvLoader::new())
    }
}

impl<L: TableLoader> BatchPlotter<L> {
    pub fn with_loader(config: Config, loader: L) -> Self {
        Self { config, loader }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Run the whole batch.
    pub fn run(&mut self) -> Result<BatchReport, BatchError> {
        let data_dir = self.config.data_dir.clone();
        let inputs = find_csv_files(&data_dir).map_err(|source| BatchError::DataDir {
            path: data_dir.clone(),
            source,
        })?;

        info!(
            data_dir = %data_dir.display(),
            output_dir = %self.config.output_dir.display(),
            files = inputs.len(),
            "Found input files"
        );

        let mut report = BatchReport::default();
        for input in &inputs {
            let output = self.process_file(input)?;
            report.outputs.push(output);
        }

        Ok(report)
    }

    /// Load, summarize, render and save one input file.
    fn process_file(&mut self, input: &Path) -> Result<PathBuf, BatchError> {
        let file_name = plot_file_name(input).ok_or_else(|| BatchError::FileName {
            path: input.to_path_buf(),
        })?;
        let output = self.config.output_dir.join(file_name);

        let table = self.loader.load(input)?;
        let series = StatsCalculator::summarize(&table, &SUMMARY_STATISTICS);

        let title = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let figure = Figure::from_series(title, &series);
        debug!(
            input = %input.display(),
            panels = figure.panels.len(),
            "Rendering figure"
        );

        let pdf = StaticChartRenderer::render_pdf(&figure).map_err(|source| {
            BatchError::Render {
                path: input.to_path_buf(),
                source,
            }
        })?;
        fs::write(&output, pdf).map_err(|source| BatchError::Write {
            path: output.clone(),
            source,
        })?;

        info!(
            input = %input.display(),
            output = %output.display(),
            "Wrote plot"
        );
        Ok(output)
    }
}
