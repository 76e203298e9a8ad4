//! View-level API: settings, reconciliation, formatting and scene building.

mod axis_formatter;
mod chart_config;
mod chart_state;
mod date_format;
mod filter_bridge;
mod invalidation;
mod margins;
mod number_format;
mod options;
mod scene_builder;
mod view;

pub use axis_formatter::{
    AxisFormatter, LabelFormatterFn, ZoneResolution, parse_zoned_value, split_zone_suffix,
};
pub use chart_config::{
    CHART_SETTINGS_JSON_SCHEMA_V1, ChartConfig, ChartSettings, ChartSettingsJsonContractV1,
    ChartType,
};
pub use chart_state::{
    Advisory, ChartState, PlacedText, RenderedState, SettingCommand, SettingOutcome,
};
pub use date_format::{DateTimeParts, MomentPattern, ZoneInfo};
pub use filter_bridge::{FilterBridge, FilterChannel, FilterEvent, NullFilterChannel};
pub use invalidation::{InvalidationLevel, InvalidationMask, InvalidationTopic, InvalidationTopics};
pub use margins::{
    CanvasLength, CanvasSizing, ChartMargins, MARGIN_RIGHT_PX, MIN_CANVAS_HEIGHT,
    MIN_CANVAS_WIDTH, SUBTITLE_Y_ALONE_PX, SUBTITLE_Y_WITH_TITLE_PX, TITLE_X_PX, TITLE_Y_PX,
    subtitle_y,
};
pub use number_format::NumberFormat;
pub use options::{DateTimeFormats, SvgOptions, ViewOptions, ViewRepresentation};
pub use scene_builder::{
    LEGEND_ROW_PX, SUBTITLE_ELEMENT_ID, SceneBuilder, SceneInput, TITLE_ELEMENT_ID,
};
pub use view::StreamgraphView;
