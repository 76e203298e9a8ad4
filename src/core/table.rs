use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::filter::RowFilter;
use crate::error::{ChartError, ChartResult};

/// Semantic type of a table column.
///
/// Drives the x-axis policy (numeric vs. positional) and the choice of tick
/// label formatter. Host type names that are not recognized are preserved in
/// `Unknown` so they survive a serialize/deserialize round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Number,
    String,
    Boolean,
    Date,
    LocalDateTime,
    ZonedDateTime,
    Time,
    /// Legacy millisecond/UTC date-time type.
    LegacyDateTime,
    Unknown(String),
}

impl ColumnType {
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "number" => Self::Number,
            "string" => Self::String,
            "boolean" => Self::Boolean,
            "Date" | "Local Date" => Self::Date,
            "Date&time (Local)" | "Local Date Time" => Self::LocalDateTime,
            "Date&time (Zoned)" | "Zoned Date Time" => Self::ZonedDateTime,
            "Time" | "Local Time" => Self::Time,
            "Date and Time" => Self::LegacyDateTime,
            other => Self::Unknown(other.to_owned()),
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Date => "Date",
            Self::LocalDateTime => "Date&time (Local)",
            Self::ZonedDateTime => "Date&time (Zoned)",
            Self::Time => "Time",
            Self::LegacyDateTime => "Date and Time",
            Self::Unknown(tag) => tag,
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number)
    }

    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Date
                | Self::LocalDateTime
                | Self::ZonedDateTime
                | Self::Time
                | Self::LegacyDateTime
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for ColumnType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&tag))
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Human readable rendition used for labels and nominal filter matching.
    #[must_use]
    pub fn to_label(&self) -> String {
        match self {
            Self::Missing => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub key: String,
    pub cells: Vec<CellValue>,
    /// Row display color (`#rrggbb`) assigned by the host, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TableRow {
    #[must_use]
    pub fn new(key: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            key: key.into(),
            cells,
            color: None,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTable {
    columns: Vec<ColumnSpec>,
    rows: Vec<TableRow>,
    #[serde(default)]
    filter_ids: Vec<String>,
}

/// Read-only view over an immutable row/column result set.
///
/// Invariants checked on construction: unique column names and one cell per
/// column in every row. Row order is the input order and never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTable {
    columns: Vec<ColumnSpec>,
    rows: Vec<TableRow>,
    filter_ids: Vec<String>,
    #[serde(skip)]
    index: IndexMap<String, usize>,
}

impl DataTable {
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<TableRow>) -> ChartResult<Self> {
        let mut index = IndexMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if index.insert(column.name.clone(), position).is_some() {
                return Err(ChartError::InvalidTable(format!(
                    "duplicate column name `{}`",
                    column.name
                )));
            }
        }

        for (row_index, row) in rows.iter().enumerate() {
            if row.cells.len() != columns.len() {
                return Err(ChartError::InvalidTable(format!(
                    "row {row_index} (`{}`) has {} cells, expected {}",
                    row.key,
                    row.cells.len(),
                    columns.len()
                )));
            }
        }

        Ok(Self {
            columns,
            rows,
            filter_ids: Vec::new(),
            index,
        })
    }

    /// Filter ids the host associates with this table (used on subscribe).
    #[must_use]
    pub fn with_filter_ids(mut self, filter_ids: Vec<String>) -> Self {
        self.filter_ids = filter_ids;
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let raw: RawTable = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidTable(format!("failed to parse table json: {e}")))?;
        Ok(Self::new(raw.columns, raw.rows)?.with_filter_ids(raw.filter_ids))
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> ChartResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ChartError::InvalidTable(format!("unknown column `{name}`")))
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_type(&self, name: &str) -> ChartResult<&ColumnType> {
        let index = self.column_index(name)?;
        Ok(&self.columns[index].column_type)
    }

    /// Cells of one column in row order.
    pub fn column_values(&self, name: &str) -> ChartResult<Vec<&CellValue>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row.cells[index]).collect())
    }

    /// Numeric view of one column; non-numeric cells map to `None`.
    pub fn numeric_column(&self, name: &str) -> ChartResult<Vec<Option<f64>>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row.cells[index].as_f64()).collect())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    #[must_use]
    pub fn row_key(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|row| row.key.as_str())
    }

    #[must_use]
    pub fn row_color(&self, row: usize) -> Option<&str> {
        self.rows.get(row).and_then(|row| row.color.as_deref())
    }

    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|row| row.cells.get(column))
    }

    #[must_use]
    pub fn filter_ids(&self) -> &[String] {
        &self.filter_ids
    }

    /// Whether `row` passes `filter`; every row passes when no filter is active.
    #[must_use]
    pub fn is_included(&self, row: usize, filter: Option<&RowFilter>) -> bool {
        match filter {
            None => row < self.rows.len(),
            Some(filter) => self
                .rows
                .get(row)
                .is_some_and(|table_row| filter.matches(self, table_row)),
        }
    }

    /// Indices of all rows passing `filter`, in table order.
    #[must_use]
    pub fn included_rows(&self, filter: Option<&RowFilter>) -> Vec<usize> {
        (0..self.rows.len())
            .filter(|row| self.is_included(*row, filter))
            .collect()
    }
}

impl<'de> Deserialize<'de> for DataTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTable::deserialize(deserializer)?;
        let table = Self::new(raw.columns, raw.rows).map_err(serde::de::Error::custom)?;
        Ok(table.with_filter_ids(raw.filter_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::{CellValue, ColumnSpec, ColumnType, DataTable, TableRow};

    #[test]
    fn unknown_type_tags_round_trip() {
        let parsed: ColumnType = serde_json::from_str("\"Molecule\"").expect("parse");
        assert_eq!(parsed, ColumnType::Unknown("Molecule".to_owned()));
        assert_eq!(serde_json::to_string(&parsed).expect("json"), "\"Molecule\"");
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let result = DataTable::new(
            vec![
                ColumnSpec::new("a", ColumnType::Number),
                ColumnSpec::new("a", ColumnType::Number),
            ],
            vec![TableRow::new("Row0", vec![CellValue::Missing, CellValue::Missing])],
        );
        assert!(result.is_err());
    }
}
