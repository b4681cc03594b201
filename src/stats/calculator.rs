//! Statistics Calculator Module
//! Column-wise summary statistics over a numeric table.

use crate::data::DataTable;
use statrs::statistics::Statistics;

/// Reduces one column to a single value.
pub type Reducer = fn(&[f64]) -> f64;

/// A named column-wise reducer.
#[derive(Debug, Clone, Copy)]
pub struct Statistic {
    name: &'static str,
    reducer: Reducer,
}

impl Statistic {
    pub const fn new(name: &'static str, reducer: Reducer) -> Self {
        Self { name, reducer }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Axis label: the name with its first letter upper-cased.
    pub fn label(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Apply the reducer to every column, aggregating over rows.
    pub fn reduce(&self, table: &DataTable) -> Vec<f64> {
        table.columns().map(self.reducer).collect()
    }
}

fn column_mean(column: &[f64]) -> f64 {
    Statistics::mean(column)
}

fn column_max(column: &[f64]) -> f64 {
    Statistics::max(column)
}

fn column_min(column: &[f64]) -> f64 {
    Statistics::min(column)
}

/// The statistics plotted for every input file, in panel order.
pub const SUMMARY_STATISTICS: [Statistic; 3] = [
    Statistic::new("mean", column_mean),
    Statistic::new("max", column_max),
    Statistic::new("min", column_min),
];

/// One statistic's values, one per column.
#[derive(Debug, Clone)]
pub struct StatSeries {
    pub statistic: Statistic,
    pub values: Vec<f64>,
}

/// Computes summary statistics for a table.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Reduce `table` with each statistic, keeping the order of `statistics`.
    pub fn summarize(table: &DataTable, statistics: &[Statistic]) -> Vec<StatSeries> {
        statistics
            .iter()
            .map(|statistic| StatSeries {
                statistic: *statistic,
                values: statistic.reduce(table),
            })
            .collect()
    }
}
