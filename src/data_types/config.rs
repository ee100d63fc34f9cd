use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Minimum brush width as a fraction of the track width.
    pub min_width_percentage: f64,
    /// Brush width on first display as a fraction of the track width.
    pub initial_width_percentage: f64,
    /// Grab zone of each resize handle, in track pixels.
    pub handle_width: f64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            min_width_percentage: 0.02,
            initial_width_percentage: 0.1,
            handle_width: 8.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub brush_height: f64,
    /// Gap between the plot area and the brush track.
    pub brush_offset: f64,
    pub with_brush: bool,
    pub with_x_axis: bool,
    pub with_y_axis: bool,
    pub with_tooltip: bool,
    pub lines_toggleable: bool,
    pub horizontal_strokes_amount: usize,
    pub x_axis_max_text_width: f64,
    pub brush: BrushConfig,
    pub x_axis_animation_ms: u64,
    pub y_axis_animation_ms: u64,
    pub line_type: String,
    pub x_axis_type: String,
    pub default_line_color: String,
    pub default_line_name: String,
    /// Upper bound on memoized windows. `None` keeps every entry.
    pub cache_capacity: Option<usize>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 512.0,
            brush_height: 128.0,
            brush_offset: 50.0,
            with_brush: true,
            with_x_axis: true,
            with_y_axis: true,
            with_tooltip: true,
            lines_toggleable: true,
            horizontal_strokes_amount: 5,
            x_axis_max_text_width: 80.0,
            brush: BrushConfig::default(),
            x_axis_animation_ms: 200,
            y_axis_animation_ms: 200,
            line_type: "line".to_string(),
            x_axis_type: "x".to_string(),
            default_line_color: "#000".to_string(),
            default_line_name: String::new(),
            cache_capacity: None,
        }
    }
}

impl ChartConfig {
    pub fn x_axis_animation(&self) -> Duration {
        Duration::from_millis(self.x_axis_animation_ms)
    }

    pub fn y_axis_animation(&self) -> Duration {
        Duration::from_millis(self.y_axis_animation_ms)
    }

    /// Number of x labels that fit the output width.
    pub fn x_axis_label_amount(&self) -> usize {
        if self.x_axis_max_text_width <= 0.0 {
            return 0;
        }
        (self.width / self.x_axis_max_text_width).floor().max(0.0) as usize
    }

    /// Track dimensions the brush runs on.
    pub fn track(&self) -> crate::data_types::Track {
        crate::data_types::Track {
            width: self.width,
            height: self.brush_height,
        }
    }
}
