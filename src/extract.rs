//! Dataset extraction from raw tabular input.

use crate::data_types::{ChartConfig, Dataset, RawChartData, Series};
use crate::error::{ChartError, Result};
use std::fmt;
use tracing::info;

pub type FieldsFn = Box<dyn Fn(&RawChartData) -> Vec<String>>;
pub type MetaFn = Box<dyn Fn(&RawChartData, &str) -> Option<String>>;
pub type ValuesFn = Box<dyn Fn(&RawChartData, &str) -> Result<Vec<f64>>>;

/// Pluggable extraction strategy. Each function can be replaced on its own.
pub struct Extractors {
    pub fields: FieldsFn,
    pub field_type: MetaFn,
    pub color: MetaFn,
    pub name: MetaFn,
    pub values: ValuesFn,
}

impl Default for Extractors {
    fn default() -> Self {
        Self {
            fields: Box::new(default_fields),
            field_type: Box::new(|raw: &RawChartData, field: &str| {
                raw.types.get(field).cloned()
            }),
            color: Box::new(|raw: &RawChartData, field: &str| {
                raw.colors.get(field).cloned()
            }),
            name: Box::new(|raw: &RawChartData, field: &str| {
                raw.names.get(field).cloned()
            }),
            values: Box::new(default_values),
        }
    }
}

impl fmt::Debug for Extractors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractors").finish_non_exhaustive()
    }
}

impl Extractors {
    pub fn with_fields(mut self, f: impl Fn(&RawChartData) -> Vec<String> + 'static) -> Self {
        self.fields = Box::new(f);
        self
    }

    pub fn with_field_type(
        mut self,
        f: impl Fn(&RawChartData, &str) -> Option<String> + 'static,
    ) -> Self {
        self.field_type = Box::new(f);
        self
    }

    pub fn with_color(
        mut self,
        f: impl Fn(&RawChartData, &str) -> Option<String> + 'static,
    ) -> Self {
        self.color = Box::new(f);
        self
    }

    pub fn with_name(
        mut self,
        f: impl Fn(&RawChartData, &str) -> Option<String> + 'static,
    ) -> Self {
        self.name = Box::new(f);
        self
    }

    pub fn with_values(
        mut self,
        f: impl Fn(&RawChartData, &str) -> Result<Vec<f64>> + 'static,
    ) -> Self {
        self.values = Box::new(f);
        self
    }
}

/// Typed fields in column order.
fn default_fields(raw: &RawChartData) -> Vec<String> {
    raw.column_fields()
        .filter(|field| raw.types.contains_key(*field))
        .map(str::to_string)
        .collect()
}

/// Reads the column whose first entry is `field`. A missing column is empty.
fn default_values(raw: &RawChartData, field: &str) -> Result<Vec<f64>> {
    let Some(column) = raw.column(field) else {
        return Ok(Vec::new());
    };
    column
        .iter()
        .enumerate()
        .map(|(position, value)| {
            value.as_f64().ok_or_else(|| ChartError::InvalidColumn {
                field: field.to_string(),
                position,
            })
        })
        .collect()
}

/// Builds a [`Dataset`] from raw input.
///
/// Fields typed `config.line_type` become series in field order; the first
/// field typed `config.x_axis_type` becomes the x axis.
pub fn prepare_data(
    raw: &RawChartData,
    config: &ChartConfig,
    extractors: &Extractors,
) -> Result<Dataset> {
    let fields = (extractors.fields)(raw);
    let types: Vec<Option<String>> = fields
        .iter()
        .map(|field| (extractors.field_type)(raw, field))
        .collect();

    let x_field = fields
        .iter()
        .zip(&types)
        .find(|(_, ty)| ty.as_deref() == Some(config.x_axis_type.as_str()))
        .map(|(field, _)| field)
        .ok_or(ChartError::NoXAxisField)?;

    let x_axis = (extractors.values)(raw, x_field)?;
    if x_axis.is_empty() {
        return Err(ChartError::EmptyDataset);
    }
    let length = x_axis.len();

    let mut series = Vec::new();
    for (field, ty) in fields.iter().zip(&types) {
        if ty.as_deref() != Some(config.line_type.as_str()) {
            continue;
        }
        let values = (extractors.values)(raw, field)?;
        if values.len() != length {
            return Err(ChartError::LengthMismatch {
                field: field.clone(),
                expected: length,
                actual: values.len(),
            });
        }
        let color = (extractors.color)(raw, field)
            .unwrap_or_else(|| config.default_line_color.clone());
        let name =
            (extractors.name)(raw, field).unwrap_or_else(|| config.default_line_name.clone());
        series.push(Series::new(field.clone(), values, color, name));
    }

    let dataset = Dataset::new(series, x_axis);
    info!(
        length = dataset.length,
        series = dataset.series.len(),
        y_max = dataset.y_max,
        "prepared chart dataset"
    );
    Ok(dataset)
}
