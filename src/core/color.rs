use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::core::table::DataTable;
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Color from 8-bit channels.
    #[must_use]
    pub const fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            red as f64 / 255.0,
            green as f64 / 255.0,
            blue as f64 / 255.0,
        )
    }

    /// Parses `#rrggbb` or `#rgb` (case-insensitive, `#` optional).
    pub fn from_hex(input: &str) -> ChartResult<Self> {
        let digits = input.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ChartError::InvalidData(format!(
                "color `{input}` is not a hex color"
            )));
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            _ => {
                return Err(ChartError::InvalidData(format!(
                    "color `{input}` is not a hex color"
                )));
            }
        };

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16)
                .map_err(|_| ChartError::InvalidData(format!("color `{input}` is not a hex color")))
        };
        Ok(Self::rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Lowercase `#rrggbb`; alpha is dropped.
    #[must_use]
    pub fn to_hex(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Ten-color categorical palette.
pub const CATEGORY10: [Color; 10] = [
    Color::rgb8(0x1f, 0x77, 0xb4),
    Color::rgb8(0xff, 0x7f, 0x0e),
    Color::rgb8(0x2c, 0xa0, 0x2c),
    Color::rgb8(0xd6, 0x27, 0x28),
    Color::rgb8(0x94, 0x67, 0xbd),
    Color::rgb8(0x8c, 0x56, 0x4b),
    Color::rgb8(0xe3, 0x77, 0xc2),
    Color::rgb8(0x7f, 0x7f, 0x7f),
    Color::rgb8(0xbc, 0xbd, 0x22),
    Color::rgb8(0x17, 0xbe, 0xcf),
];

/// Twenty-color categorical palette (each hue with a light companion).
pub const CATEGORY20: [Color; 20] = [
    Color::rgb8(0x1f, 0x77, 0xb4),
    Color::rgb8(0xae, 0xc7, 0xe8),
    Color::rgb8(0xff, 0x7f, 0x0e),
    Color::rgb8(0xff, 0xbb, 0x78),
    Color::rgb8(0x2c, 0xa0, 0x2c),
    Color::rgb8(0x98, 0xdf, 0x8a),
    Color::rgb8(0xd6, 0x27, 0x28),
    Color::rgb8(0xff, 0x98, 0x96),
    Color::rgb8(0x94, 0x67, 0xbd),
    Color::rgb8(0xc5, 0xb0, 0xd5),
    Color::rgb8(0x8c, 0x56, 0x4b),
    Color::rgb8(0xc4, 0x9c, 0x94),
    Color::rgb8(0xe3, 0x77, 0xc2),
    Color::rgb8(0xf7, 0xb6, 0xd2),
    Color::rgb8(0x7f, 0x7f, 0x7f),
    Color::rgb8(0xc7, 0xc7, 0xc7),
    Color::rgb8(0xbc, 0xbd, 0x22),
    Color::rgb8(0xdb, 0xdb, 0x8d),
    Color::rgb8(0x17, 0xbe, 0xcf),
    Color::rgb8(0x9e, 0xda, 0xe5),
];

/// Used for series the color table does not know.
pub const FALLBACK_SERIES_COLOR: Color = Color::rgb8(0x7c, 0x7c, 0x7c);

/// Series name to color lookup built from a secondary table.
///
/// Names come from the table's first column, colors from the row colors.
/// The first row wins when a name repeats. A table without columns yields an
/// empty lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorTable {
    entries: IndexMap<String, Option<Color>>,
}

impl ColorTable {
    pub fn from_table(table: &DataTable) -> ChartResult<Self> {
        if table.column_count() == 0 {
            warn!(rows = table.row_count(), "color table has no name column; ignoring it");
            return Ok(Self::default());
        }

        let mut entries = IndexMap::with_capacity(table.row_count());
        for (row_index, row) in table.rows().iter().enumerate() {
            let name = row.cells[0].to_label();
            let color = match table.row_color(row_index) {
                Some(hex) => match Color::from_hex(hex) {
                    Ok(color) => Some(color),
                    Err(err) => {
                        debug!(row = row_index, error = %err, "ignoring unparseable row color");
                        None
                    }
                },
                None => None,
            };
            entries.entry(name).or_insert(color);
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Color> {
        self.entries.get(name).copied().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColorAssigner;

impl ColorAssigner {
    /// One color per series name, in input order.
    #[must_use]
    pub fn assign<S: AsRef<str>>(series_names: &[S], color_table: Option<&ColorTable>) -> Vec<Color> {
        match color_table {
            None => {
                let palette: &[Color] = if series_names.len() > CATEGORY10.len() {
                    &CATEGORY20
                } else {
                    &CATEGORY10
                };
                (0..series_names.len())
                    .map(|index| palette[index % palette.len()])
                    .collect()
            }
            Some(table) => series_names
                .iter()
                .map(|name| {
                    let name = name.as_ref();
                    table.lookup(name).unwrap_or_else(|| {
                        debug!(series = name, "no color table entry; using fallback color");
                        FALLBACK_SERIES_COLOR
                    })
                })
                .collect(),
        }
    }
}
