//! Batch Plotter - summary statistic plots for directories of CSV files.
//!
//! Every `*.csv` file of the data directory is loaded as a numeric table, its
//! column-wise mean, max and min are computed, and the three series are drawn
//! side by side into `<stem>-plot.pdf` in the output directory.

pub mod batch;
pub mod charts;
pub mod config;
pub mod data;
pub mod stats;
