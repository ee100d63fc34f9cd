//! brush_chart: windowed line-chart core with a draggable brush
//!
//! The crate is headless: it computes transforms, brush geometry and axis
//! labels, and drives a host-provided [`rendering::RenderSurface`].

pub mod axis_sampler;
pub mod brush;
pub mod chart;
pub mod data_types;
pub mod error;
pub mod events;
pub mod extract;
pub mod input;
pub mod rendering;
pub mod scales;
pub mod transform;
pub mod utils;
pub mod view_controller;

pub use axis_sampler::{AxisLabelSampler, YAxisSampler};
pub use brush::{Brush, BrushState, DragTarget};
pub use chart::{Chart, ChartEvent, Formatters};
pub use data_types::{ChartConfig, Dataset, RawChartData, Scaled, Series, Transform, Window};
pub use error::{ChartError, Result};
pub use rendering::{RecordingSurface, RenderSurface};
pub use transform::TransformEngine;
