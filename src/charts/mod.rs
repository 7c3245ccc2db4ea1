//! Chart model shared by the SVG writer and the interactive viewer.

mod model;
mod svg;

pub use model::{nice_axis_max, Chart, ChartColor, ChartKind, Series};
pub use svg::{render_svg, write_svg, write_svg_into};
