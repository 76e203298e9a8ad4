use tracing::{debug, info, warn};

use crate::core::{Color, ColorAssigner, ColorTable, DataTable, SeriesBuilder, SeriesSet, Viewport, XAxisSource};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, Renderer, render_svg};

use super::axis_formatter::AxisFormatter;
use super::chart_config::{ChartConfig, ChartSettings};
use super::chart_state::{Advisory, ChartState, SettingCommand, SettingOutcome};
use super::filter_bridge::{FilterBridge, FilterChannel, FilterEvent};
use super::invalidation::{InvalidationLevel, InvalidationMask, InvalidationTopic};
use super::margins::{CanvasSizing, MIN_CANVAS_HEIGHT, MIN_CANVAS_WIDTH};
use super::options::{ViewOptions, ViewRepresentation};
use super::scene_builder::{SceneBuilder, SceneInput};

/// One streamgraph view instance.
///
/// Owns the rendering backend and the filter channel. Every host event goes
/// through `&mut self`; the pending invalidation tells the host how much of
/// the chart has to be redrawn.
pub struct StreamgraphView<R: Renderer, C: FilterChannel> {
    renderer: R,
    channel: C,
    representation: ViewRepresentation,
    table: DataTable,
    x_source: XAxisSource,
    colors: Vec<Color>,
    state: ChartState,
    bridge: Option<FilterBridge>,
    series: SeriesSet,
    x_formatter: AxisFormatter,
    y_formatter: AxisFormatter,
    viewport: Viewport,
    persist_disabled: bool,
    closed: bool,
}

impl<R: Renderer, C: FilterChannel> StreamgraphView<R, C> {
    /// Validates the input tables and builds the initial series.
    ///
    /// `value` is the saved settings; `None` starts from defaults.
    pub fn new(
        renderer: R,
        channel: C,
        representation: ViewRepresentation,
        value: Option<ChartSettings>,
    ) -> ChartResult<Self> {
        let table = representation.data_table()?.clone();
        let options = &representation.options;
        for column in &options.columns {
            if !table.has_column(column) {
                return Err(ChartError::InvalidTable(format!(
                    "selected column `{column}` is not in the input table"
                )));
            }
        }
        let x_source = XAxisSource::resolve(&table, options.x_axis_column.as_deref())?;

        let color_table = representation
            .color_table()
            .map(ColorTable::from_table)
            .transpose()?;
        let colors = ColorAssigner::assign(&options.columns, color_table.as_ref());

        let config = value.map(|settings| settings.options).unwrap_or_default();
        let persist_disabled = config.disabled.is_some();
        let state = ChartState::new(config, options.columns.len());

        let series = SeriesBuilder::build(&table, &options.columns, None, &x_source)?;
        let x_formatter = AxisFormatter::for_x_axis(&x_source, &series, options);
        let y_formatter = AxisFormatter::for_y_axis(options);

        let bridge = representation
            .table_id()
            .map(|table_id| FilterBridge::new(table_id, table.filter_ids().to_vec()));
        let viewport = representation.initial_viewport();

        let mut view = Self {
            renderer,
            channel,
            representation,
            table,
            x_source,
            colors,
            state,
            bridge,
            series,
            x_formatter,
            y_formatter,
            viewport,
            persist_disabled,
            closed: false,
        };
        if view.state.config().subscribe_filter {
            view.subscribe();
        }

        info!(
            series = view.series.series.len(),
            points = view.series.point_count(),
            chart_type = %view.state.config().chart_type,
            "streamgraph view initialized"
        );
        Ok(view)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        self.state.config()
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        &self.state
    }

    #[must_use]
    pub fn series(&self) -> &SeriesSet {
        &self.series
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[must_use]
    pub fn options(&self) -> &ViewOptions {
        &self.representation.options
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn advisories(&self) -> &[Advisory] {
        self.state.advisories()
    }

    #[must_use]
    pub fn x_formatter(&self) -> &AxisFormatter {
        &self.x_formatter
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.bridge.as_ref().is_some_and(FilterBridge::is_subscribed)
    }

    /// Applies a user edit after checking that its control is enabled.
    ///
    /// Series toggles come from legend clicks and are always accepted.
    pub fn apply_setting(&mut self, command: SettingCommand) -> ChartResult<InvalidationMask> {
        if !self.is_editable(&command) {
            return Err(ChartError::SettingNotEditable {
                setting: command.name(),
            });
        }

        let name = command.name();
        let SettingOutcome {
            invalidation,
            subscription,
        } = self.state.apply_setting(command)?;
        match subscription {
            Some(true) => self.subscribe(),
            Some(false) => self.unsubscribe(),
            None => {}
        }
        debug!(setting = name, level = ?invalidation.level(), "applied setting");
        Ok(invalidation)
    }

    /// Whether `command` would tear the chart down.
    #[must_use]
    pub fn requires_rebuild(&self, command: &SettingCommand) -> bool {
        self.state.requires_rebuild(command)
    }

    /// Handles a filter event from the host channel.
    pub fn on_filter_changed(&mut self, event: FilterEvent) -> ChartResult<InvalidationMask> {
        let Some(bridge) = self.bridge.as_mut() else {
            return Ok(InvalidationMask::none());
        };
        if !bridge.on_filter_event(event) {
            return Ok(InvalidationMask::none());
        }
        self.rebuild_series()?;
        let mask = InvalidationMask::new(InvalidationLevel::Data, InvalidationTopic::Filter);
        self.state.invalidate(mask);
        Ok(mask)
    }

    /// New container size, clamped to the minimum canvas.
    pub fn resize(&mut self, width: u32, height: u32) -> InvalidationMask {
        let viewport = Viewport::new(width.max(MIN_CANVAS_WIDTH), height.max(MIN_CANVAS_HEIGHT));
        if viewport == self.viewport {
            return InvalidationMask::none();
        }
        self.viewport = viewport;
        let mask = InvalidationMask::new(InvalidationLevel::Layout, InvalidationTopic::Size);
        self.state.invalidate(mask);
        mask
    }

    #[must_use]
    pub fn canvas_sizing(&self) -> CanvasSizing {
        let options = &self.representation.options;
        CanvasSizing::resolve(
            self.state.config(),
            (
                options.svg.width.max(MIN_CANVAS_WIDTH),
                options.svg.height.max(MIN_CANVAS_HEIGHT),
            ),
            self.representation.fullscreen(),
            options.enable_view_controls,
            self.representation.header_height_px,
        )
    }

    pub fn build_scene(&self) -> ChartResult<RenderFrame> {
        SceneBuilder::build(&SceneInput {
            state: &self.state,
            series: &self.series,
            colors: &self.colors,
            x_formatter: &self.x_formatter,
            y_formatter: &self.y_formatter,
            viewport: self.viewport,
        })
    }

    /// Draws the current scene and clears the pending invalidation.
    ///
    /// Returns the invalidation that was serviced.
    pub fn render(&mut self) -> ChartResult<InvalidationMask> {
        let frame = self.build_scene()?;
        self.renderer.render(&frame)?;
        Ok(self.state.take_pending_invalidation())
    }

    #[must_use]
    pub fn pending_invalidation(&self) -> InvalidationMask {
        self.state.pending_invalidation()
    }

    pub fn take_invalidation(&mut self) -> InvalidationMask {
        self.state.take_pending_invalidation()
    }

    /// Standalone SVG of the current chart.
    pub fn export_svg(&self) -> ChartResult<String> {
        render_svg(&self.build_scene()?)
    }

    /// Settings to persist.
    ///
    /// Disabled flags are written once they were saved before or any series
    /// is disabled; after that they stay.
    pub fn component_value(&mut self) -> ChartSettings {
        let mut config = self.state.config().clone();
        let flags = config.disabled_flags(self.series.series.len());
        if self.persist_disabled || flags.iter().any(|&disabled| disabled) {
            self.persist_disabled = true;
            config.disabled = Some(flags);
        } else {
            config.disabled = None;
        }
        ChartSettings::new(config)
    }

    /// Drops the filter subscription. Further events are ignored.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.unsubscribe();
        self.closed = true;
        debug!("streamgraph view closed");
    }

    fn is_editable(&self, command: &SettingCommand) -> bool {
        let options = &self.representation.options;
        if let SettingCommand::SetSeriesDisabled { .. } = command {
            return true;
        }
        if let SettingCommand::SetSubscribeFilter(_) = command {
            return self.representation.interactivity_available;
        }
        if !options.enable_view_controls {
            return false;
        }
        match command {
            SettingCommand::SetTitle(_) => options.enable_title_edit,
            SettingCommand::SetSubtitle(_) => options.enable_subtitle_edit,
            SettingCommand::SetXAxisLabel(_) => options.enable_x_axis_edit,
            SettingCommand::SetYAxisLabel(_) => options.enable_y_axis_edit,
            SettingCommand::SetLegendVisible(_) => options.enable_legend_toggle,
            SettingCommand::SetGridVisible(_) => options.show_grid_toggle,
            SettingCommand::SetInterpolation(_) => options.enable_interpolation_method_edit,
            SettingCommand::SetChartType(_) => options.enable_chart_type_change,
            SettingCommand::SetInteractiveGuideline(_) => {
                options.enable_interactive_guideline_toggle
            }
            SettingCommand::SetSubscribeFilter(_) | SettingCommand::SetSeriesDisabled { .. } => {
                true
            }
        }
    }

    fn subscribe(&mut self) {
        if self.closed || !self.representation.interactivity_available {
            return;
        }
        match self.bridge.as_mut() {
            Some(bridge) => {
                bridge.subscribe(&mut self.channel);
            }
            None => warn!("no table id; filter subscription skipped"),
        }
    }

    fn unsubscribe(&mut self) {
        let Some(bridge) = self.bridge.as_mut() else {
            return;
        };
        let had_filter = bridge.current_filter().is_some();
        bridge.unsubscribe(&mut self.channel);
        if had_filter {
            match self.rebuild_series() {
                Ok(()) => self.state.invalidate(InvalidationMask::new(
                    InvalidationLevel::Data,
                    InvalidationTopic::Filter,
                )),
                Err(err) => warn!(error = %err, "failed to rebuild series after unsubscribing"),
            }
        }
    }

    fn rebuild_series(&mut self) -> ChartResult<()> {
        let filter = self.bridge.as_ref().and_then(FilterBridge::current_filter);
        self.series = SeriesBuilder::build(
            &self.table,
            &self.representation.options.columns,
            filter,
            &self.x_source,
        )?;
        self.x_formatter =
            AxisFormatter::for_x_axis(&self.x_source, &self.series, &self.representation.options);
        debug!(
            points = self.series.point_count(),
            filtered = filter.is_some(),
            "rebuilt series"
        );
        Ok(())
    }
}
