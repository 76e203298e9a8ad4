use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Interpolation, StackOffset, StackOrder};
use crate::error::{ChartError, ChartResult};

/// Stack variant of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChartType {
    #[default]
    #[serde(rename = "Stacked-Area-Chart")]
    StackedArea,
    #[serde(rename = "Percentage-Area-Chart")]
    PercentageArea,
    #[serde(rename = "Stream-Graph")]
    StreamGraph,
}

impl ChartType {
    pub const ALL: [Self; 3] = [Self::StackedArea, Self::PercentageArea, Self::StreamGraph];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::StackedArea => "Stacked-Area-Chart",
            Self::PercentageArea => "Percentage-Area-Chart",
            Self::StreamGraph => "Stream-Graph",
        }
    }

    #[must_use]
    pub fn stack_offset(self) -> StackOffset {
        match self {
            Self::StackedArea => StackOffset::Zero,
            Self::PercentageArea => StackOffset::Expand,
            Self::StreamGraph => StackOffset::Silhouette,
        }
    }

    #[must_use]
    pub fn stack_order(self) -> StackOrder {
        match self {
            Self::StreamGraph => StackOrder::InsideOut,
            Self::StackedArea | Self::PercentageArea => StackOrder::Default,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_true() -> bool {
    true
}

/// User-editable display settings.
///
/// `disabled` is only present once a series was hidden (or the host sent the
/// field); serialization omits it otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default)]
    pub chart_type: ChartType,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub x_axis_label: String,
    #[serde(default)]
    pub y_axis_label: String,
    #[serde(default = "default_true")]
    pub legend: bool,
    #[serde(default)]
    pub show_grid: bool,
    #[serde(default = "default_true")]
    pub interactive_guideline: bool,
    #[serde(default = "default_true")]
    pub subscribe_filter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<Vec<bool>>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_type: ChartType::default(),
            interpolation: Interpolation::default(),
            title: String::new(),
            subtitle: String::new(),
            x_axis_label: String::new(),
            y_axis_label: String::new(),
            legend: true,
            show_grid: false,
            interactive_guideline: true,
            subscribe_filter: true,
            disabled: None,
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    #[must_use]
    pub fn with_axis_labels(mut self, x_axis: impl Into<String>, y_axis: impl Into<String>) -> Self {
        self.x_axis_label = x_axis.into();
        self.y_axis_label = y_axis.into();
        self
    }

    #[must_use]
    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.chart_type = chart_type;
        self
    }

    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    #[must_use]
    pub fn with_subscribe_filter(mut self, subscribe: bool) -> Self {
        self.subscribe_filter = subscribe;
        self
    }

    #[must_use]
    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    #[must_use]
    pub fn has_subtitle(&self) -> bool {
        !self.subtitle.is_empty()
    }

    /// Tooltip guideline as actually shown: basis curves cannot carry it.
    #[must_use]
    pub fn effective_interactive_guideline(&self) -> bool {
        self.interactive_guideline && self.interpolation != Interpolation::Basis
    }

    #[must_use]
    pub fn is_series_disabled(&self, index: usize) -> bool {
        self.disabled
            .as_ref()
            .and_then(|flags| flags.get(index).copied())
            .unwrap_or(false)
    }

    /// Disabled flags padded or truncated to `series_count`.
    #[must_use]
    pub fn disabled_flags(&self, series_count: usize) -> Vec<bool> {
        (0..series_count)
            .map(|index| self.is_series_disabled(index))
            .collect()
    }
}

pub const CHART_SETTINGS_JSON_SCHEMA_V1: u32 = 1;

/// Persisted view value as exchanged with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ChartSettings {
    #[serde(default)]
    pub options: ChartConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSettingsJsonContractV1 {
    pub schema_version: u32,
    pub settings: ChartSettings,
}

impl ChartSettings {
    #[must_use]
    pub fn new(options: ChartConfig) -> Self {
        Self { options }
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize settings: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartSettingsJsonContractV1 {
            schema_version: CHART_SETTINGS_JSON_SCHEMA_V1,
            settings: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize settings contract v1: {e}"))
        })
    }

    /// Accepts both the bare host value and the versioned contract.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let document: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse settings json: {e}")))?;

        if document.get("schema_version").is_none() {
            return serde_json::from_value(document).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse settings payload: {e}"))
            });
        }

        let payload: ChartSettingsJsonContractV1 =
            serde_json::from_value(document).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse settings contract: {e}"))
            })?;
        if payload.schema_version != CHART_SETTINGS_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported settings schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.settings)
    }
}
