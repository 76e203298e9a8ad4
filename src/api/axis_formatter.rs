use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use tracing::warn;

use crate::core::{CellValue, ColumnType, SeriesSet, XAxisSource};

use super::date_format::{
    DateTimeParts, MomentPattern, parse_legacy_date_time, parse_local_date, parse_local_date_time,
    parse_local_time, parse_offset_date_time,
};
use super::number_format::NumberFormat;
use super::options::ViewOptions;

pub type LabelFormatterFn = Arc<dyn Fn(f64) -> String + Send + Sync + 'static>;

/// How a zoned cell's zone was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneResolution {
    /// A `[Zone/Id]` suffix was present; the value is shown in the display zone.
    BracketSuffix,
    /// No suffix: the value was read as if it had no zone and shown unconverted.
    /// This can silently misplace values whose zone was lost upstream.
    ZoneLess,
}

/// Splits `2017-03-01T12:00+01:00[Europe/Berlin]` into date-time and zone id.
#[must_use]
pub fn split_zone_suffix(raw: &str) -> Option<(&str, &str)> {
    let head = raw.strip_suffix(']')?;
    let open = head.rfind('[')?;
    Some((&head[..open], &head[open + 1..]))
}

/// Parses a zoned cell and converts it into `display_zone`.
#[must_use]
pub fn parse_zoned_value(raw: &str, display_zone: Tz) -> Option<(DateTimeParts, ZoneResolution)> {
    match split_zone_suffix(raw) {
        Some((date_time, _zone_id)) => {
            let value = parse_offset_date_time(date_time)?;
            let shown = value.with_timezone(&display_zone);
            Some((DateTimeParts::zoned(&shown), ZoneResolution::BracketSuffix))
        }
        None => {
            let value = match parse_offset_date_time(raw) {
                Some(value) => value.with_timezone(&Utc),
                None => parse_local_date_time(raw)?.and_utc(),
            };
            Some((DateTimeParts::zoned(&value), ZoneResolution::ZoneLess))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TemporalKind {
    Date,
    LocalDateTime,
    ZonedDateTime,
    Time,
    LegacyDateTime,
}

#[derive(Debug, Clone)]
enum FormatterKind {
    Numeric(NumberFormat),
    Categorical(Arc<[CellValue]>),
    Temporal {
        kind: TemporalKind,
        pattern: MomentPattern,
        display_zone: Tz,
        labels: Arc<[CellValue]>,
    },
    Positional,
}

/// Tick label formatter for one axis.
///
/// Numeric axes format the axis value itself. Every other axis receives a
/// dense position and looks the label of the row shown there up.
#[derive(Debug, Clone)]
pub struct AxisFormatter {
    kind: FormatterKind,
}

impl AxisFormatter {
    /// Numeric formatter; an invalid pattern degrades to the default notation.
    #[must_use]
    pub fn numeric(pattern: &str) -> Self {
        let format = NumberFormat::parse(pattern).unwrap_or_else(|err| {
            warn!(pattern, error = %err, "falling back to default number format");
            NumberFormat::default()
        });
        Self {
            kind: FormatterKind::Numeric(format),
        }
    }

    #[must_use]
    pub fn positional() -> Self {
        Self {
            kind: FormatterKind::Positional,
        }
    }

    /// Formatter for a column of `column_type`; `labels[p]` is the raw cell at
    /// dense position `p`.
    #[must_use]
    pub fn for_column_type(
        column_type: &ColumnType,
        labels: Vec<CellValue>,
        options: &ViewOptions,
    ) -> Self {
        let formats = &options.date_time_formats;
        let temporal = |kind: TemporalKind, pattern: &str| FormatterKind::Temporal {
            kind,
            pattern: MomentPattern::parse(pattern),
            display_zone: resolve_zone(&formats.timezone),
            labels: labels.clone().into(),
        };

        let kind = match column_type {
            ColumnType::Number => return Self::numeric(&options.x_axis_format_string),
            ColumnType::String => FormatterKind::Categorical(labels.clone().into()),
            ColumnType::Date => temporal(TemporalKind::Date, &formats.global_local_date_format),
            ColumnType::LocalDateTime => temporal(
                TemporalKind::LocalDateTime,
                &formats.global_local_date_time_format,
            ),
            ColumnType::ZonedDateTime => temporal(
                TemporalKind::ZonedDateTime,
                &formats.global_zoned_date_time_format,
            ),
            ColumnType::Time => temporal(TemporalKind::Time, &formats.global_local_time_format),
            ColumnType::LegacyDateTime => {
                temporal(TemporalKind::LegacyDateTime, &formats.global_date_time_format)
            }
            ColumnType::Boolean | ColumnType::Unknown(_) => FormatterKind::Positional,
        };
        Self { kind }
    }

    /// X-axis formatter for the current series rebuild.
    #[must_use]
    pub fn for_x_axis(source: &XAxisSource, series: &SeriesSet, options: &ViewOptions) -> Self {
        if source.is_numeric() {
            return Self::numeric(&options.x_axis_format_string);
        }
        let labels = series
            .included_rows
            .iter()
            .map(|&row| source.label(row).cloned().unwrap_or_default())
            .collect();
        Self::for_column_type(source.column_type(), labels, options)
    }

    #[must_use]
    pub fn for_y_axis(options: &ViewOptions) -> Self {
        Self::numeric(&options.y_axis_format_string)
    }

    #[must_use]
    pub fn is_positional(&self) -> bool {
        !matches!(self.kind, FormatterKind::Numeric(_))
    }

    /// Never fails: unusable values render unchanged.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match &self.kind {
            FormatterKind::Numeric(format) => format.format(value),
            FormatterKind::Positional => format_index(value),
            FormatterKind::Categorical(labels) => match label_at(labels, value) {
                Some(label) => label.to_label(),
                None => format_index(value),
            },
            FormatterKind::Temporal {
                kind,
                pattern,
                display_zone,
                labels,
            } => match label_at(labels, value) {
                Some(label) => format_temporal(*kind, pattern, *display_zone, label),
                None => format_index(value),
            },
        }
    }

    #[must_use]
    pub fn into_fn(self) -> LabelFormatterFn {
        Arc::new(move |value| self.format(value))
    }
}

fn resolve_zone(name: &str) -> Tz {
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!(timezone = name, "unknown display timezone; using UTC");
        Tz::UTC
    })
}

fn label_at(labels: &[CellValue], value: f64) -> Option<&CellValue> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return None;
    }
    labels.get(value as usize)
}

fn format_index(value: f64) -> String {
    NumberFormat::default().format(value)
}

fn format_temporal(
    kind: TemporalKind,
    pattern: &MomentPattern,
    display_zone: Tz,
    label: &CellValue,
) -> String {
    let raw = label.to_label();
    let parts = match kind {
        TemporalKind::Date => parse_local_date(&raw).map(DateTimeParts::from_date),
        TemporalKind::LocalDateTime => parse_local_date_time(&raw).map(DateTimeParts::naive),
        TemporalKind::Time => parse_local_time(&raw).map(DateTimeParts::from_time),
        TemporalKind::LegacyDateTime => {
            parse_legacy_date_time(&raw).map(|value| DateTimeParts::zoned(&value))
        }
        TemporalKind::ZonedDateTime => {
            parse_zoned_value(&raw, display_zone).map(|(parts, resolution)| {
                if resolution == ZoneResolution::ZoneLess {
                    warn!(value = %raw, "zoned value has no zone suffix; shown without conversion");
                }
                parts
            })
        }
    };

    match parts {
        Some(parts) => pattern.render(&parts),
        None => {
            if !label.is_missing() {
                warn!(value = %raw, kind = ?kind, "unparseable temporal value; showing raw text");
            }
            raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::split_zone_suffix;

    #[test]
    fn zone_suffix_is_split_from_the_end() {
        assert_eq!(
            split_zone_suffix("2017-03-01T12:00+01:00[Europe/Berlin]"),
            Some(("2017-03-01T12:00+01:00", "Europe/Berlin"))
        );
        assert_eq!(split_zone_suffix("2017-03-01T12:00+01:00"), None);
        assert_eq!(split_zone_suffix("broken]"), None);
    }
}
