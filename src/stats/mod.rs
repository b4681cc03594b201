//! Stats module - Column-wise summary statistics

mod calculator;

pub use calculator::{StatSeries, Statistic, StatsCalculator, SUMMARY_STATISTICS};
