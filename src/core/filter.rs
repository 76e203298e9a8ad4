use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::table::{DataTable, TableRow};

/// One criterion of a row filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterElement {
    /// Inclusive numeric bounds on one column; open ends are `None`.
    Range {
        column: String,
        #[serde(default)]
        minimum: Option<f64>,
        #[serde(default)]
        maximum: Option<f64>,
    },
    /// Allowed labels of one nominal column.
    Nominal {
        column: String,
        values: SmallVec<[String; 4]>,
    },
}

impl FilterElement {
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Range { column, .. } | Self::Nominal { column, .. } => column,
        }
    }

    fn matches(&self, table: &DataTable, row: &TableRow) -> bool {
        // Criteria on columns this table does not carry do not constrain it.
        let Ok(index) = table.column_index(self.column()) else {
            return true;
        };
        // Rows shaped for another table never match.
        let Some(cell) = row.cells.get(index) else {
            return false;
        };

        match self {
            Self::Range {
                minimum, maximum, ..
            } => {
                let Some(value) = cell.as_f64() else {
                    return false;
                };
                minimum.is_none_or(|min| value >= min) && maximum.is_none_or(|max| value <= max)
            }
            Self::Nominal { values, .. } => {
                if cell.is_missing() {
                    return false;
                }
                let label = cell.to_label();
                values.iter().any(|allowed| *allowed == label)
            }
        }
    }
}

/// Externally supplied set of row-inclusion criteria.
///
/// Filters are immutable once built; a newer filter replaces the previous one
/// as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFilter {
    pub id: String,
    #[serde(default)]
    pub elements: Vec<FilterElement>,
}

impl RowFilter {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_range(
        mut self,
        column: impl Into<String>,
        minimum: Option<f64>,
        maximum: Option<f64>,
    ) -> Self {
        self.elements.push(FilterElement::Range {
            column: column.into(),
            minimum,
            maximum,
        });
        self
    }

    #[must_use]
    pub fn with_nominal<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements.push(FilterElement::Nominal {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    #[must_use]
    pub fn matches(&self, table: &DataTable, row: &TableRow) -> bool {
        self.elements
            .iter()
            .all(|element| element.matches(table, row))
    }
}
