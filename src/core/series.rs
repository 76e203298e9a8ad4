use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::filter::RowFilter;
use crate::core::table::{CellValue, ColumnType, DataTable};
use crate::core::types::DataPoint;
use crate::error::ChartResult;

/// One named band of the chart, derived from one selected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub key: String,
    pub values: Vec<DataPoint>,
}

impl SeriesSpec {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Output of one series rebuild.
///
/// `included_rows[p]` is the original table row shown at dense position `p`;
/// positional axes use it to look their labels up.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesSet {
    pub series: Vec<SeriesSpec>,
    pub included_rows: Vec<usize>,
    pub numeric_x: bool,
}

impl SeriesSet {
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.series.iter().map(|series| series.key.as_str()).collect()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.included_rows.len()
    }

    /// Original row index displayed at dense position `position`.
    #[must_use]
    pub fn row_at(&self, position: usize) -> Option<usize> {
        self.included_rows.get(position).copied()
    }
}

/// Where x-axis values and labels come from.
#[derive(Debug, Clone, PartialEq)]
pub struct XAxisSource {
    column: Option<String>,
    column_type: ColumnType,
    labels: Vec<CellValue>,
}

impl XAxisSource {
    /// Resolves the x axis for `column`; `None` selects the row keys.
    pub fn resolve(table: &DataTable, column: Option<&str>) -> ChartResult<Self> {
        match column {
            None => Ok(Self {
                column: None,
                column_type: ColumnType::String,
                labels: table
                    .rows()
                    .iter()
                    .map(|row| CellValue::Text(row.key.clone()))
                    .collect(),
            }),
            Some(name) => {
                let column_type = table.column_type(name)?.clone();
                let labels = table.column_values(name)?.into_iter().cloned().collect();
                Ok(Self {
                    column: Some(name.to_owned()),
                    column_type,
                    labels,
                })
            }
        }
    }

    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    #[must_use]
    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    #[must_use]
    pub fn uses_row_keys(&self) -> bool {
        self.column.is_none()
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.column.is_some() && self.column_type.is_numeric()
    }

    /// Raw x cell of an original table row.
    #[must_use]
    pub fn label(&self, row: usize) -> Option<&CellValue> {
        self.labels.get(row)
    }
}

/// Converts included rows and selected columns into per-series coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesBuilder;

impl SeriesBuilder {
    /// Rebuilds every series from scratch.
    ///
    /// Series follow `selected_columns` order. With a numeric x-axis column the
    /// x coordinate is that column's value; otherwise it is the dense position
    /// within the included rows, so filtered rows leave no gaps.
    pub fn build(
        table: &DataTable,
        selected_columns: &[String],
        filter: Option<&RowFilter>,
        x_axis: &XAxisSource,
    ) -> ChartResult<SeriesSet> {
        let included_rows = table.included_rows(filter);

        let numeric_x = match x_axis.column() {
            Some(name) if x_axis.is_numeric() => Some(table.numeric_column(name)?),
            _ => None,
        };

        let mut series = Vec::with_capacity(selected_columns.len());
        for column in selected_columns {
            let values = table.numeric_column(column)?;
            let points = included_rows
                .iter()
                .enumerate()
                .map(|(position, &row)| {
                    let x = match &numeric_x {
                        Some(xs) => xs[row].unwrap_or(f64::NAN),
                        None => position as f64,
                    };
                    DataPoint { x, y: values[row] }
                })
                .collect();
            trace!(column = %column, "built series");
            series.push(SeriesSpec {
                key: column.clone(),
                values: points,
            });
        }

        debug!(
            rows = table.row_count(),
            included = included_rows.len(),
            series = series.len(),
            filtered = filter.is_some(),
            "rebuilt series"
        );

        Ok(SeriesSet {
            series,
            included_rows,
            numeric_x: numeric_x.is_some(),
        })
    }
}
