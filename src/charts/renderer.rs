//! Static Chart Renderer
//! Renders a `Figure` to a PDF page with plotters.
//!
//! Layout:
//! 1. White page of the figure's physical size
//! 2. Panels side by side, equal width, in figure order
//! 3. Each panel: axes with tick labels, the y-axis label, and the series
//!    drawn as a line against column index

use super::figure::{Figure, Panel};
use super::layout::{PanelLayout, LABEL_FONT_SIZE, MAX_TICKS, TICK_FONT_SIZE, TICK_MARK_SIZE};
use super::pdf::{PdfBackend, PdfError};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use thiserror::Error;

// Colors
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const AXIS_COLOR: RGBColor = BLACK;
const LINE_WIDTH: u32 = 1;

const FONT_FAMILY: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Figure has no panels")]
    NoPanels,
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

impl From<DrawingAreaErrorKind<PdfError>> for RenderError {
    fn from(err: DrawingAreaErrorKind<PdfError>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `figure` as a single-page PDF document.
    pub fn render_pdf(figure: &Figure) -> Result<Vec<u8>, RenderError> {
        if figure.panels.is_empty() {
            return Err(RenderError::NoPanels);
        }

        let mut buf = Vec::new();
        {
            let root = PdfBackend::with_buffer(&mut buf, figure.size.to_points())
                .with_title(figure.title.as_str())
                .into_drawing_area();
            root.fill(&WHITE)?;

            let areas = root.split_evenly((1, figure.panels.len()));
            for (area, panel) in areas.iter().zip(&figure.panels) {
                Self::draw_panel(area, panel)?;
            }

            root.present()?;
        }
        Ok(buf)
    }

    fn draw_panel(
        area: &DrawingArea<PdfBackend<'_>, Shift>,
        panel: &Panel,
    ) -> Result<(), RenderError> {
        let layout = PanelLayout::tight(panel);

        let mut chart = ChartBuilder::on(area)
            .margin(layout.margin)
            .margin_right(layout.margin_right)
            .x_label_area_size(layout.x_label_area)
            .y_label_area_size(layout.y_label_area)
            .build_cartesian_2d(layout.x_range.clone(), layout.y_range.clone())?;

        let x_formatter = |x: &f64| layout.format_x(*x);
        let y_formatter = |y: &f64| layout.format_y(*y);

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(MAX_TICKS)
            .y_labels(MAX_TICKS)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .label_style((FONT_FAMILY, TICK_FONT_SIZE))
            .axis_desc_style((FONT_FAMILY, LABEL_FONT_SIZE))
            .set_all_tick_mark_size(TICK_MARK_SIZE)
            .axis_style(AXIS_COLOR)
            .y_desc(panel.label.as_str())
            .draw()?;

        for segment in finite_segments(panel) {
            chart.draw_series(LineSeries::new(
                segment,
                LINE_COLOR.stroke_width(LINE_WIDTH),
            ))?;
        }

        Ok(())
    }
}

/// Runs of consecutive finite points. Non-finite values break the line.
fn finite_segments(panel: &Panel) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for (x, y) in panel.points() {
        if y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}
