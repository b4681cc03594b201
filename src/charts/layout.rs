//! Panel layout pass.
//!
//! Sizes the label areas of each panel from the text that will actually be
//! drawn, so tick labels and the axis label stay clear of the plotting area
//! and of the neighbouring panel.

use super::figure::Panel;
use super::pdf::{text_height, text_width};
use std::ops::Range;

pub const TICK_FONT_SIZE: f64 = 9.0;
pub const LABEL_FONT_SIZE: f64 = 10.0;
pub const TICK_MARK_SIZE: u32 = 4;
pub const MAX_TICKS: usize = 6;

/// Fraction of the data span added on both sides of an axis.
const DATA_MARGIN: f64 = 0.05;
const PANEL_MARGIN: f64 = 6.0;
const LABEL_GAP: f64 = 4.0;

/// Values at or beyond this magnitude get scientific tick labels.
const SCIENTIFIC_ABOVE: f64 = 1e6;
/// Tick steps below this get scientific tick labels.
const SCIENTIFIC_BELOW: f64 = 1e-4;
/// Largest magnitude an axis shows.
const AXIS_LIMIT: f64 = f64::MAX / 4.0;
/// Significant digits an `f64` can show.
const MAX_DIGITS: i32 = 15;

/// How the tick values of one axis are written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickFormat {
    /// Plain decimal notation with a fixed number of fraction digits.
    Fixed { decimals: usize },
    /// Mantissa with `decimals` fraction digits and an exponent. Values
    /// smaller than `resolution` are written as zero.
    Scientific { decimals: usize, resolution: f64 },
}

impl TickFormat {
    /// Format that tells apart the ticks of `range` when at most `max_ticks`
    /// of them are drawn.
    pub fn for_range(range: &Range<f64>, max_ticks: usize) -> Self {
        let max_abs = range.start.abs().max(range.end.abs());
        let Some(step) = nice_step(range, max_ticks) else {
            return if max_abs >= SCIENTIFIC_ABOVE
                || (max_abs > 0.0 && max_abs < SCIENTIFIC_BELOW)
            {
                TickFormat::Scientific {
                    decimals: 1,
                    resolution: 0.0,
                }
            } else {
                TickFormat::Fixed { decimals: 0 }
            };
        };

        if max_abs >= SCIENTIFIC_ABOVE || step < SCIENTIFIC_BELOW {
            let digits = (exponent(max_abs) - exponent(step)).clamp(0, MAX_DIGITS);
            TickFormat::Scientific {
                decimals: digits as usize,
                resolution: step * 1e-6,
            }
        } else {
            let decimals = (-exponent(step)).clamp(0, MAX_DIGITS);
            TickFormat::Fixed {
                decimals: decimals as usize,
            }
        }
    }

    /// Write `value`, never as `-0`.
    pub fn format(&self, value: f64) -> String {
        match *self {
            TickFormat::Fixed { decimals } => {
                let half_unit = 0.5 / 10f64.powi(decimals as i32);
                let value = if value.abs() < half_unit { 0.0 } else { value };
                format!("{:.*}", decimals, value)
            }
            TickFormat::Scientific {
                decimals,
                resolution,
            } => {
                let value = if value.abs() <= resolution { 0.0 } else { value };
                format!("{:.*e}", decimals, value)
            }
        }
    }
}

/// Computed geometry for one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub x_format: TickFormat,
    pub y_format: TickFormat,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub margin: u32,
    pub margin_right: u32,
}

impl PanelLayout {
    /// Tight layout for `panel`.
    pub fn tight(panel: &Panel) -> Self {
        let x_range = axis_range(panel.points().map(|(x, _)| x));
        let y_range = axis_range(panel.values.iter().copied());
        let x_format = TickFormat::for_range(&x_range, MAX_TICKS);
        let y_format = TickFormat::for_range(&y_range, MAX_TICKS);

        // One spare digit: the mesh may place ticks between the ones sampled.
        let widest_y_tick = tick_values(&y_range, MAX_TICKS)
            .into_iter()
            .map(|v| text_width(&y_format.format(v), TICK_FONT_SIZE))
            .fold(0.0, f64::max)
            + text_width("0", TICK_FONT_SIZE);
        let y_label_area = widest_y_tick
            + f64::from(TICK_MARK_SIZE)
            + LABEL_GAP * 2.0
            + text_height(LABEL_FONT_SIZE)
            + LABEL_GAP;

        let x_label_area =
            text_height(TICK_FONT_SIZE) + f64::from(TICK_MARK_SIZE) + LABEL_GAP * 2.0;

        // Tick labels are centred on their tick, so the last one overhangs the
        // plotting area on the right and the top one overhangs at the top.
        let last_x_tick = text_width(&x_format.format(x_range.end), TICK_FONT_SIZE);
        let margin = PANEL_MARGIN + text_height(TICK_FONT_SIZE) / 2.0;
        let margin_right = PANEL_MARGIN + last_x_tick / 2.0;

        Self {
            x_range,
            y_range,
            x_format,
            y_format,
            x_label_area: x_label_area.ceil() as u32,
            y_label_area: y_label_area.ceil() as u32,
            margin: margin.ceil() as u32,
            margin_right: margin_right.ceil() as u32,
        }
    }

    pub fn format_x(&self, value: f64) -> String {
        self.x_format.format(value)
    }

    pub fn format_y(&self, value: f64) -> String {
        self.y_format.format(value)
    }
}

/// Axis range covering the finite `values` plus a margin on both sides.
///
/// Constant data gets a margin proportional to its magnitude (a unit span
/// around zero); no finite data gives `0..1`. Values are clamped to
/// `AXIS_LIMIT` so the span of the range stays finite.
pub fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(-AXIS_LIMIT, AXIS_LIMIT))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return 0.0..1.0;
    }

    let span = hi - lo;
    let pad = if span > 0.0 {
        span * DATA_MARGIN
    } else if lo != 0.0 {
        lo.abs() * DATA_MARGIN
    } else {
        0.5
    };
    (lo - pad)..(hi + pad)
}

/// Smallest step of 1, 2 or 5 times a power of ten that spans `range` in at
/// most `max_ticks` steps.
fn nice_step(range: &Range<f64>, max_ticks: usize) -> Option<f64> {
    let ticks = max_ticks.max(1) as f64;
    let step = range.end / ticks - range.start / ticks;
    if !(step.is_finite() && step > 0.0) {
        return None;
    }
    let magnitude = 10f64.powi(exponent(step));
    let nice = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= step)
        .unwrap_or(10.0 * magnitude);
    Some(nice)
}

/// Both ends of `range` and the multiples of its nice step between them.
fn tick_values(range: &Range<f64>, max_ticks: usize) -> Vec<f64> {
    let mut values = vec![range.start, range.end];
    if let Some(step) = nice_step(range, max_ticks) {
        let mut k = (range.start / step).ceil();
        while k * step <= range.end && values.len() < max_ticks * 4 {
            values.push(k * step);
            k += 1.0;
        }
    }
    values
}

/// Decimal exponent of `value`, tolerant of rounding just below a power of ten.
fn exponent(value: f64) -> i32 {
    (value.abs().log10() + 1e-9).floor() as i32
}
