use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw tabular chart input.
///
/// Each column starts with its field id followed by the values:
/// `[["x", 1542412800000, ...], ["y0", 37, ...]]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawChartData {
    pub columns: Vec<Vec<Value>>,
    #[serde(default)]
    pub types: BTreeMap<String, String>,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

impl RawChartData {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).wrap_err("failed to parse chart data")
    }

    /// Parses a JSON array of charts, the layout chart exports usually ship in.
    pub fn list_from_json_str(json: &str) -> Result<Vec<Self>> {
        serde_json::from_str(json).wrap_err("failed to parse chart data list")
    }

    /// Locates a column by matching its first entry against `field`.
    pub fn column(&self, field: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|column| column.first().and_then(Value::as_str) == Some(field))
            .map(|column| &column[1..])
    }

    /// Field ids in column order.
    pub fn column_fields(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter_map(|column| column.first().and_then(Value::as_str))
    }
}
