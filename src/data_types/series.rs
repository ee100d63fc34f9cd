use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One named, colored line sharing the dataset index space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub field: String,
    pub values: Vec<f64>,
    pub color: String,
    pub name: String,
    pub visible: bool,
    /// All-time maximum, not windowed.
    pub max_value: f64,
}

impl Series {
    pub fn new(
        field: impl Into<String>,
        values: Vec<f64>,
        color: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let max_value = max_of(&values).unwrap_or(0.0);
        Self {
            field: field.into(),
            values,
            color: color.into(),
            name: name.into(),
            visible: true,
            max_value,
        }
    }

    /// Maximum over `values[start..end]`, `None` for an empty slice.
    pub fn max_in(&self, start: usize, end: usize) -> Option<f64> {
        self.values.get(start..end).and_then(max_of)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub series: Vec<Series>,
    pub x_axis: Vec<f64>,
    pub length: usize,
    pub y_max: f64,
}

impl Dataset {
    pub fn new(series: Vec<Series>, x_axis: Vec<f64>) -> Self {
        let y_max = series
            .iter()
            .map(|s| s.max_value)
            .reduce(f64::max)
            .unwrap_or(0.0);
        Self {
            length: x_axis.len(),
            series,
            x_axis,
            y_max,
        }
    }

    pub fn series(&self, field: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.field == field)
    }

    pub fn series_mut(&mut self, field: &str) -> Option<&mut Series> {
        self.series.iter_mut().find(|s| s.field == field)
    }

    pub fn visible_series(&self) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(|s| s.visible)
    }

    pub fn visible_fields(&self) -> BTreeSet<String> {
        self.visible_series().map(|s| s.field.clone()).collect()
    }

    pub fn has_visible(&self) -> bool {
        self.series.iter().any(|s| s.visible)
    }

    /// Largest all-time maximum among visible series.
    pub fn visible_y_max(&self) -> Option<f64> {
        self.visible_series().map(|s| s.max_value).reduce(f64::max)
    }

    /// Largest value of any visible series inside `[start, end)`.
    pub fn visible_max_in(&self, start: usize, end: usize) -> Option<f64> {
        self.visible_series()
            .filter_map(|s| s.max_in(start, end))
            .reduce(f64::max)
    }
}

pub(crate) fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}
