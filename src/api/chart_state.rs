use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::core::Interpolation;
use crate::error::{ChartError, ChartResult};

use super::chart_config::{ChartConfig, ChartType};
use super::invalidation::{InvalidationLevel, InvalidationMask, InvalidationTopic};
use super::margins::{ChartMargins, TITLE_X_PX, TITLE_Y_PX, subtitle_y};

/// User edit of the mutable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "camelCase")]
pub enum SettingCommand {
    SetTitle(String),
    SetSubtitle(String),
    SetXAxisLabel(String),
    SetYAxisLabel(String),
    SetLegendVisible(bool),
    SetGridVisible(bool),
    SetInterpolation(Interpolation),
    SetChartType(ChartType),
    SetInteractiveGuideline(bool),
    SetSubscribeFilter(bool),
    SetSeriesDisabled { index: usize, disabled: bool },
}

impl SettingCommand {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetTitle(_) => "title",
            Self::SetSubtitle(_) => "subtitle",
            Self::SetXAxisLabel(_) => "xAxisLabel",
            Self::SetYAxisLabel(_) => "yAxisLabel",
            Self::SetLegendVisible(_) => "legend",
            Self::SetGridVisible(_) => "showGrid",
            Self::SetInterpolation(_) => "interpolation",
            Self::SetChartType(_) => "chartType",
            Self::SetInteractiveGuideline(_) => "interactiveGuideline",
            Self::SetSubscribeFilter(_) => "subscribeFilter",
            Self::SetSeriesDisabled { .. } => "disabled",
        }
    }
}

/// Non-fatal notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Advisory {
    BasisTooltipUnsupported,
}

impl Advisory {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::BasisTooltipUnsupported => "basisTooltip",
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::BasisTooltipUnsupported => {
                "Displaying a tooltip is not supported when interpolation is set to \"basis\"."
            }
        }
    }
}

/// Text element with its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedText {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// What the last render showed, derived only from the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedState {
    pub title: Option<PlacedText>,
    pub subtitle: Option<PlacedText>,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub margins: ChartMargins,
    pub legend_visible: bool,
    pub grid_visible: bool,
    pub tooltip_enabled: bool,
    pub interpolation: Interpolation,
    pub chart_type: ChartType,
}

impl RenderedState {
    #[must_use]
    pub fn derive(config: &ChartConfig) -> Self {
        let title = config.has_title().then(|| PlacedText {
            text: config.title.clone(),
            x: TITLE_X_PX,
            y: TITLE_Y_PX,
        });
        let subtitle = config.has_subtitle().then(|| PlacedText {
            text: config.subtitle.clone(),
            x: TITLE_X_PX,
            y: subtitle_y(config.has_title()),
        });

        Self {
            title,
            subtitle,
            x_axis_label: config.x_axis_label.clone(),
            y_axis_label: config.y_axis_label.clone(),
            margins: ChartMargins::from_config(config),
            legend_visible: config.legend,
            grid_visible: config.show_grid,
            tooltip_enabled: config.effective_interactive_guideline(),
            interpolation: config.interpolation,
            chart_type: config.chart_type,
        }
    }
}

/// Result of one applied setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingOutcome {
    pub invalidation: InvalidationMask,
    /// New filter subscription flag when it changed.
    pub subscription: Option<bool>,
}

impl SettingOutcome {
    #[must_use]
    pub fn is_noop(self) -> bool {
        self.invalidation.is_none() && self.subscription.is_none()
    }
}

impl From<InvalidationMask> for SettingOutcome {
    fn from(invalidation: InvalidationMask) -> Self {
        Self {
            invalidation,
            subscription: None,
        }
    }
}

/// Mutable display configuration plus what was last rendered from it.
///
/// Every setter compares against the rendered state and returns
/// `InvalidationMask::none()` when nothing visible changed. Changes that the
/// live chart cannot absorb report `InvalidationLevel::Full`.
#[derive(Debug, Clone)]
pub struct ChartState {
    config: ChartConfig,
    rendered: RenderedState,
    pending: InvalidationMask,
    advisories: SmallVec<[Advisory; 1]>,
    series_count: usize,
}

impl ChartState {
    /// The first render is always a full build.
    #[must_use]
    pub fn new(config: ChartConfig, series_count: usize) -> Self {
        let rendered = RenderedState::derive(&config);
        let mut state = Self {
            config,
            rendered,
            pending: InvalidationMask::full(),
            advisories: SmallVec::new(),
            series_count,
        };
        state.refresh_advisories();
        state
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn rendered(&self) -> &RenderedState {
        &self.rendered
    }

    #[must_use]
    pub fn margins(&self) -> ChartMargins {
        self.rendered.margins
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series_count
    }

    #[must_use]
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    #[must_use]
    pub fn pending_invalidation(&self) -> InvalidationMask {
        self.pending
    }

    pub fn take_pending_invalidation(&mut self) -> InvalidationMask {
        std::mem::take(&mut self.pending)
    }

    /// Requests a repaint not caused by a setting (filter, resize).
    pub fn invalidate(&mut self, mask: InvalidationMask) {
        self.pending.merge(mask);
    }

    /// Single dispatch point for user edits.
    pub fn apply_setting(&mut self, command: SettingCommand) -> ChartResult<SettingOutcome> {
        let outcome = match command {
            SettingCommand::SetTitle(title) => self.set_title(title).into(),
            SettingCommand::SetSubtitle(subtitle) => self.set_subtitle(subtitle).into(),
            SettingCommand::SetXAxisLabel(label) => self.set_x_axis_label(label).into(),
            SettingCommand::SetYAxisLabel(label) => self.set_y_axis_label(label).into(),
            SettingCommand::SetLegendVisible(visible) => self.set_legend_visible(visible).into(),
            SettingCommand::SetGridVisible(visible) => self.set_grid_visible(visible).into(),
            SettingCommand::SetInterpolation(mode) => self.set_interpolation(mode).into(),
            SettingCommand::SetChartType(chart_type) => self.set_chart_type(chart_type).into(),
            SettingCommand::SetInteractiveGuideline(enabled) => {
                self.set_interactive_guideline(enabled).into()
            }
            SettingCommand::SetSubscribeFilter(subscribe) => SettingOutcome {
                invalidation: InvalidationMask::none(),
                subscription: self.set_subscribe_filter(subscribe).then_some(subscribe),
            },
            SettingCommand::SetSeriesDisabled { index, disabled } => {
                self.set_series_disabled(index, disabled)?.into()
            }
        };
        Ok(outcome)
    }

    /// Whether `command` would force the chart to be created again.
    #[must_use]
    pub fn requires_rebuild(&self, command: &SettingCommand) -> bool {
        let mut probe = self.clone();
        probe
            .apply_setting(command.clone())
            .is_ok_and(|outcome| outcome.invalidation.level() == InvalidationLevel::Full)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> InvalidationMask {
        let title = title.into();
        if self.config.title == title {
            return InvalidationMask::none();
        }
        self.config.title = title;
        self.reconcile_titles()
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) -> InvalidationMask {
        let subtitle = subtitle.into();
        if self.config.subtitle == subtitle {
            return InvalidationMask::none();
        }
        self.config.subtitle = subtitle;
        self.reconcile_titles()
    }

    pub fn set_x_axis_label(&mut self, label: impl Into<String>) -> InvalidationMask {
        let label = label.into();
        if self.config.x_axis_label == label {
            return InvalidationMask::none();
        }
        self.config.x_axis_label = label;
        self.reconcile_axis_labels()
    }

    pub fn set_y_axis_label(&mut self, label: impl Into<String>) -> InvalidationMask {
        let label = label.into();
        if self.config.y_axis_label == label {
            return InvalidationMask::none();
        }
        self.config.y_axis_label = label;
        self.reconcile_axis_labels()
    }

    pub fn set_legend_visible(&mut self, visible: bool) -> InvalidationMask {
        if self.config.legend == visible {
            return InvalidationMask::none();
        }
        self.config.legend = visible;
        let next = RenderedState::derive(&self.config);
        let level = if next.margins != self.rendered.margins {
            InvalidationLevel::Layout
        } else {
            InvalidationLevel::Light
        };
        self.commit(next, InvalidationMask::new(level, InvalidationTopic::Legend))
    }

    pub fn set_grid_visible(&mut self, visible: bool) -> InvalidationMask {
        if self.config.show_grid == visible {
            return InvalidationMask::none();
        }
        self.config.show_grid = visible;
        let next = RenderedState::derive(&self.config);
        self.commit(
            next,
            InvalidationMask::new(InvalidationLevel::Light, InvalidationTopic::Grid),
        )
    }

    /// Switching to basis while the tooltip guideline is on needs a rebuild;
    /// every other curve change is applied to the live chart.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) -> InvalidationMask {
        if self.config.interpolation == interpolation {
            return InvalidationMask::none();
        }
        let changed_to_basis = interpolation == Interpolation::Basis;
        self.config.interpolation = interpolation;

        let next = RenderedState::derive(&self.config);
        let mask = if changed_to_basis && self.config.interactive_guideline {
            InvalidationMask::full()
        } else {
            let mut mask =
                InvalidationMask::new(InvalidationLevel::Layout, InvalidationTopic::Interpolation);
            if next.tooltip_enabled != self.rendered.tooltip_enabled {
                mask = mask.with_topic(InvalidationTopic::Tooltip);
            }
            mask
        };
        self.commit(next, mask)
    }

    pub fn set_chart_type(&mut self, chart_type: ChartType) -> InvalidationMask {
        if self.config.chart_type == chart_type {
            return InvalidationMask::none();
        }
        self.config.chart_type = chart_type;
        let next = RenderedState::derive(&self.config);
        self.commit(next, InvalidationMask::full())
    }

    pub fn set_interactive_guideline(&mut self, enabled: bool) -> InvalidationMask {
        if self.config.interactive_guideline == enabled {
            return InvalidationMask::none();
        }
        self.config.interactive_guideline = enabled;
        let next = RenderedState::derive(&self.config);
        self.commit(next, InvalidationMask::full())
    }

    /// Returns whether the flag changed; subscription itself is the caller's.
    pub fn set_subscribe_filter(&mut self, subscribe: bool) -> bool {
        if self.config.subscribe_filter == subscribe {
            return false;
        }
        self.config.subscribe_filter = subscribe;
        debug!(subscribe, "filter subscription flag changed");
        true
    }

    pub fn set_series_disabled(
        &mut self,
        index: usize,
        disabled: bool,
    ) -> ChartResult<InvalidationMask> {
        if index >= self.series_count {
            return Err(ChartError::InvalidData(format!(
                "series index {index} out of range for {} series",
                self.series_count
            )));
        }
        if self.config.is_series_disabled(index) == disabled {
            return Ok(InvalidationMask::none());
        }

        let mut flags = self.config.disabled_flags(self.series_count);
        flags[index] = disabled;
        self.config.disabled = Some(flags);

        let next = RenderedState::derive(&self.config);
        Ok(self.commit(
            next,
            InvalidationMask::new(InvalidationLevel::Data, InvalidationTopic::Series),
        ))
    }

    fn reconcile_titles(&mut self) -> InvalidationMask {
        let next = RenderedState::derive(&self.config);
        if next.title == self.rendered.title && next.subtitle == self.rendered.subtitle {
            return InvalidationMask::none();
        }
        let level = if next.margins != self.rendered.margins {
            InvalidationLevel::Layout
        } else {
            InvalidationLevel::Light
        };
        self.commit(next, InvalidationMask::new(level, InvalidationTopic::Title))
    }

    fn reconcile_axis_labels(&mut self) -> InvalidationMask {
        let next = RenderedState::derive(&self.config);
        if next.x_axis_label == self.rendered.x_axis_label
            && next.y_axis_label == self.rendered.y_axis_label
        {
            return InvalidationMask::none();
        }
        self.commit(
            next,
            InvalidationMask::new(InvalidationLevel::Layout, InvalidationTopic::Axis),
        )
    }

    fn commit(&mut self, next: RenderedState, mask: InvalidationMask) -> InvalidationMask {
        self.rendered = next;
        self.refresh_advisories();
        self.pending.merge(mask);
        debug!(level = ?mask.level(), "reconciled chart state");
        mask
    }

    fn refresh_advisories(&mut self) {
        self.advisories.clear();
        if self.config.interpolation == Interpolation::Basis && self.config.interactive_guideline {
            self.advisories.push(Advisory::BasisTooltipUnsupported);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartState, SettingCommand};
    use crate::api::chart_config::ChartConfig;

    #[test]
    fn command_json_uses_tagged_form() {
        let command: SettingCommand =
            serde_json::from_str(r#"{"command":"setTitle","value":"Sales"}"#).expect("parse");
        assert_eq!(command, SettingCommand::SetTitle("Sales".to_owned()));
    }

    #[test]
    fn new_state_starts_with_full_invalidation() {
        let mut state = ChartState::new(ChartConfig::default(), 2);
        assert!(!state.take_pending_invalidation().is_none());
        assert!(state.take_pending_invalidation().is_none());
    }
}
