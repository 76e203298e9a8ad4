use serde::{Deserialize, Serialize};

use crate::core::{DataTable, Viewport};
use crate::error::{ChartError, ChartResult};

fn default_true() -> bool {
    true
}

/// Moment-style date/time patterns and display zone for temporal axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateTimeFormats {
    pub global_date_time_locale: String,
    /// Pattern for legacy UTC date-time columns.
    pub global_date_time_format: String,
    pub global_local_date_format: String,
    pub global_local_date_time_format: String,
    pub global_local_time_format: String,
    pub global_zoned_date_time_format: String,
    /// IANA zone zoned values are converted into before formatting.
    pub timezone: String,
}

impl Default for DateTimeFormats {
    fn default() -> Self {
        Self {
            global_date_time_locale: "en".to_owned(),
            global_date_time_format: "YYYY-MM-DD HH:mm:ss".to_owned(),
            global_local_date_format: "YYYY-MM-DD".to_owned(),
            global_local_date_time_format: "YYYY-MM-DD HH:mm:ss".to_owned(),
            global_local_time_format: "HH:mm:ss".to_owned(),
            global_zoned_date_time_format: "YYYY-MM-DD HH:mm:ss z".to_owned(),
            timezone: "UTC".to_owned(),
        }
    }
}

/// Canvas sizing: fixed pixels unless fullscreen applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgOptions {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fullscreen: true,
        }
    }
}

/// Fixed configuration of one view instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOptions {
    /// Selected data columns, in series order.
    pub columns: Vec<String>,
    /// `None` plots against the row keys.
    #[serde(default)]
    pub x_axis_column: Option<String>,
    #[serde(default = "default_number_format")]
    pub x_axis_format_string: String,
    #[serde(default = "default_number_format")]
    pub y_axis_format_string: String,
    #[serde(default)]
    pub date_time_formats: DateTimeFormats,
    #[serde(default)]
    pub svg: SvgOptions,
    #[serde(default = "default_true")]
    pub enable_view_controls: bool,
    #[serde(default = "default_true")]
    pub enable_title_edit: bool,
    #[serde(default = "default_true")]
    pub enable_subtitle_edit: bool,
    #[serde(default = "default_true", rename = "enableXAxisEdit")]
    pub enable_x_axis_edit: bool,
    #[serde(default = "default_true", rename = "enableYAxisEdit")]
    pub enable_y_axis_edit: bool,
    #[serde(default = "default_true")]
    pub enable_chart_type_change: bool,
    #[serde(default = "default_true")]
    pub enable_interpolation_method_edit: bool,
    #[serde(default = "default_true")]
    pub enable_legend_toggle: bool,
    #[serde(default = "default_true")]
    pub enable_interactive_guideline_toggle: bool,
    #[serde(default = "default_true")]
    pub show_grid_toggle: bool,
    #[serde(default)]
    pub display_fullscreen_button: bool,
}

fn default_number_format() -> String {
    ".2f".to_owned()
}

impl ViewOptions {
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            x_axis_column: None,
            x_axis_format_string: default_number_format(),
            y_axis_format_string: default_number_format(),
            date_time_formats: DateTimeFormats::default(),
            svg: SvgOptions::default(),
            enable_view_controls: true,
            enable_title_edit: true,
            enable_subtitle_edit: true,
            enable_x_axis_edit: true,
            enable_y_axis_edit: true,
            enable_chart_type_change: true,
            enable_interpolation_method_edit: true,
            enable_legend_toggle: true,
            enable_interactive_guideline_toggle: true,
            show_grid_toggle: true,
            display_fullscreen_button: false,
        }
    }

    #[must_use]
    pub fn with_x_axis_column(mut self, column: impl Into<String>) -> Self {
        self.x_axis_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_format_strings(mut self, x_axis: impl Into<String>, y_axis: impl Into<String>) -> Self {
        self.x_axis_format_string = x_axis.into();
        self.y_axis_format_string = y_axis.into();
        self
    }

    #[must_use]
    pub fn with_fixed_size(mut self, width: u32, height: u32) -> Self {
        self.svg = SvgOptions {
            width,
            height,
            fullscreen: false,
        };
        self
    }

    #[must_use]
    pub fn with_view_controls(mut self, enabled: bool) -> Self {
        self.enable_view_controls = enabled;
        self
    }
}

/// Immutable part of the view: options plus input tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRepresentation {
    pub options: ViewOptions,
    /// Port tables: data table first, optional color table second.
    #[serde(default)]
    pub in_objects: Vec<Option<DataTable>>,
    /// Host identifiers of the input tables, used as filter channel keys.
    #[serde(default)]
    pub table_ids: Vec<String>,
    #[serde(default)]
    pub running_in_view: bool,
    /// Whether the host can deliver filter events at all.
    #[serde(default = "default_true")]
    pub interactivity_available: bool,
    /// Height of the host's menu header, used by fullscreen sizing.
    #[serde(default)]
    pub header_height_px: u32,
}

impl ViewRepresentation {
    #[must_use]
    pub fn new(options: ViewOptions, data: DataTable) -> Self {
        Self {
            options,
            in_objects: vec![Some(data), None],
            table_ids: vec!["table-0".to_owned()],
            running_in_view: false,
            interactivity_available: true,
            header_height_px: 0,
        }
    }

    #[must_use]
    pub fn with_color_table(mut self, table: DataTable) -> Self {
        if self.in_objects.len() < 2 {
            self.in_objects.resize(2, None);
        }
        self.in_objects[1] = Some(table);
        self
    }

    #[must_use]
    pub fn with_table_id(mut self, table_id: impl Into<String>) -> Self {
        self.table_ids = vec![table_id.into()];
        self
    }

    #[must_use]
    pub fn running_in_view(mut self, running: bool, header_height_px: u32) -> Self {
        self.running_in_view = running;
        self.header_height_px = header_height_px;
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse view representation: {e}"))
        })
    }

    pub fn data_table(&self) -> ChartResult<&DataTable> {
        self.in_objects
            .first()
            .and_then(Option::as_ref)
            .ok_or_else(|| ChartError::InvalidTable("no input data table".to_owned()))
    }

    #[must_use]
    pub fn color_table(&self) -> Option<&DataTable> {
        self.in_objects.get(1).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn table_id(&self) -> Option<&str> {
        self.table_ids.first().map(String::as_str)
    }

    #[must_use]
    pub fn fullscreen(&self) -> bool {
        self.options.svg.fullscreen && self.running_in_view
    }

    /// Initial viewport before the host reports a real window size.
    #[must_use]
    pub fn initial_viewport(&self) -> Viewport {
        Viewport::new(
            self.options.svg.width.max(super::MIN_CANVAS_WIDTH),
            self.options.svg.height.max(super::MIN_CANVAS_HEIGHT),
        )
    }
}
