//! Multi-panel chart rendering.
//!
//! [`plan`] decides panel count, figure size and the shared legend without
//! touching a backend; [`draw`] paints the figure with plotters.

pub mod draw;
pub mod palette;
pub mod plan;

pub use draw::{ChartKind, RenderReport, render_figure};
pub use plan::{FigurePlan, LegendEntry, LegendGlyph, RenderConfig};
