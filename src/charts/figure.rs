//! Figure model: what gets drawn, independent of how.

use crate::stats::StatSeries;

/// PDF user space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Physical page size of a figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width_in: 10.0,
            height_in: 3.0,
        }
    }
}

impl FigureSize {
    /// Size in points, as used by the drawing backend.
    pub fn to_points(self) -> (u32, u32) {
        (
            (self.width_in * POINTS_PER_INCH).round() as u32,
            (self.height_in * POINTS_PER_INCH).round() as u32,
        )
    }
}

/// One subplot: a sequence plotted against its index.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub label: String,
    pub values: Vec<f64>,
}

impl Panel {
    /// `(column index, value)` pairs as plotted.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(idx, &value)| (idx as f64, value))
    }
}

/// Panels laid out side by side on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub size: FigureSize,
    pub panels: Vec<Panel>,
}

impl Figure {
    /// One panel per series, in series order, labelled with the statistic's label.
    pub fn from_series(title: impl Into<String>, series: &[StatSeries]) -> Self {
        Self {
            title: title.into(),
            size: FigureSize::default(),
            panels: series
                .iter()
                .map(|s| Panel {
                    label: s.statistic.label(),
                    values: s.values.clone(),
                })
                .collect(),
        }
    }
}
