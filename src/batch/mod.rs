//! Batch processing: one plot per CSV file of the data directory.

mod plotter;
#[cfg(test)]
mod tests;

pub use plotter::{plot_file_name, BatchError, BatchPlotter, BatchReport, PLOT_SUFFIX};
