//! Charts module - Figure model and PDF rendering

mod figure;
mod layout;
mod pdf;
mod renderer;

pub use figure::{Figure, FigureSize, Panel, POINTS_PER_INCH};
pub use layout::{PanelLayout, TickFormat};
pub use pdf::{PdfBackend, PdfError};
pub use renderer::{RenderError, StaticChartRenderer};
