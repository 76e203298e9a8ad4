use streamgraph_rs::ChartError;
use streamgraph_rs::api::{
    Advisory, CanvasLength, ChartConfig, ChartSettings, FilterEvent, InvalidationLevel,
    InvalidationTopic, NullFilterChannel, SettingCommand, StreamgraphView, ViewOptions,
    ViewRepresentation,
};
use streamgraph_rs::core::{
    CellValue, ColumnSpec, ColumnType, DataTable, FALLBACK_SERIES_COLOR, Interpolation, RowFilter,
    TableRow, Viewport,
};
use streamgraph_rs::render::NullRenderer;

type TestView = StreamgraphView<NullRenderer, NullFilterChannel>;

fn table() -> DataTable {
    let rows = [(2015.0, 1.0, 2.0), (2016.0, 2.0, 2.0), (2017.0, 3.0, 1.0)]
        .iter()
        .enumerate()
        .map(|(index, &(year, a, b))| {
            TableRow::new(
                format!("Row{index}"),
                vec![
                    CellValue::Number(year),
                    CellValue::Number(a),
                    CellValue::Number(b),
                ],
            )
        })
        .collect();
    DataTable::new(
        vec![
            ColumnSpec::new("year", ColumnType::Number),
            ColumnSpec::new("a", ColumnType::Number),
            ColumnSpec::new("b", ColumnType::Number),
        ],
        rows,
    )
    .expect("valid table")
    .with_filter_ids(vec!["f1".to_owned()])
}

fn representation() -> ViewRepresentation {
    ViewRepresentation::new(ViewOptions::new(["a", "b"]).with_x_axis_column("year"), table())
}

fn view_with(representation: ViewRepresentation, value: Option<ChartSettings>) -> TestView {
    StreamgraphView::new(
        NullRenderer::default(),
        NullFilterChannel::default(),
        representation,
        value,
    )
    .expect("view init")
}

fn view() -> TestView {
    view_with(representation(), None)
}

#[test]
fn construction_builds_series_and_subscribes() {
    let view = view();
    assert_eq!(view.series().keys(), vec!["a", "b"]);
    assert_eq!(view.series().point_count(), 3);
    assert!(view.series().numeric_x);
    assert_eq!(view.colors().len(), 2);
    assert!(view.is_subscribed());
    assert_eq!(view.channel().subscribe_calls, 1);
    assert_eq!(view.pending_invalidation().level(), InvalidationLevel::Full);
}

#[test]
fn saved_value_without_subscription_does_not_subscribe() {
    let value = ChartSettings::new(ChartConfig::default().with_subscribe_filter(false));
    let view = view_with(representation(), Some(value));
    assert!(!view.is_subscribed());
    assert_eq!(view.channel().subscribe_calls, 0);
}

#[test]
fn missing_inputs_are_invalid_tables() {
    let mut no_table = representation();
    no_table.in_objects.clear();
    let result = StreamgraphView::new(
        NullRenderer::default(),
        NullFilterChannel::default(),
        no_table,
        None,
    );
    assert!(matches!(result, Err(ChartError::InvalidTable(_))));

    let unknown_column =
        ViewRepresentation::new(ViewOptions::new(["a", "missing"]), table());
    let result = StreamgraphView::new(
        NullRenderer::default(),
        NullFilterChannel::default(),
        unknown_column,
        None,
    );
    assert!(matches!(result, Err(ChartError::InvalidTable(_))));

    let unknown_x =
        ViewRepresentation::new(ViewOptions::new(["a"]).with_x_axis_column("day"), table());
    let result = StreamgraphView::new(
        NullRenderer::default(),
        NullFilterChannel::default(),
        unknown_x,
        None,
    );
    assert!(matches!(result, Err(ChartError::InvalidTable(_))));
}

#[test]
fn color_table_without_columns_falls_back_to_gray() {
    let color_table =
        DataTable::new(Vec::new(), vec![TableRow::new("Row0", Vec::new())]).expect("empty table");
    let view = view_with(representation().with_color_table(color_table), None);
    assert_eq!(view.colors(), &[FALLBACK_SERIES_COLOR, FALLBACK_SERIES_COLOR]);
    view.build_scene().expect("scene still builds");
}

#[test]
fn disabled_controls_reject_settings() {
    let mut representation = representation();
    representation.options.enable_title_edit = false;
    let mut view = view_with(representation, None);

    let err = view
        .apply_setting(SettingCommand::SetTitle("Sales".to_owned()))
        .expect_err("title edit disabled");
    assert!(matches!(err, ChartError::SettingNotEditable { setting: "title" }));
    assert!(view.config().title.is_empty());

    let mask = view
        .apply_setting(SettingCommand::SetGridVisible(true))
        .expect("grid edit allowed");
    assert_eq!(mask.level(), InvalidationLevel::Light);
}

#[test]
fn without_view_controls_only_legend_clicks_and_filter_toggle_pass() {
    let representation = ViewRepresentation::new(
        ViewOptions::new(["a", "b"]).with_view_controls(false),
        table(),
    );
    let mut view = view_with(representation, None);

    assert!(view
        .apply_setting(SettingCommand::SetChartType(
            streamgraph_rs::api::ChartType::StreamGraph
        ))
        .is_err());
    assert!(view
        .apply_setting(SettingCommand::SetSeriesDisabled {
            index: 0,
            disabled: true
        })
        .is_ok());
    assert!(view
        .apply_setting(SettingCommand::SetSubscribeFilter(false))
        .is_ok());
}

#[test]
fn filter_toggle_needs_interactivity() {
    let mut representation = representation();
    representation.interactivity_available = false;
    let mut view = view_with(representation, None);
    assert!(!view.is_subscribed());
    assert!(view
        .apply_setting(SettingCommand::SetSubscribeFilter(false))
        .is_err());
}

#[test]
fn filter_events_rebuild_series_without_full_redraw() {
    let mut view = view();
    let _ = view.take_invalidation();

    let filter = RowFilter::new("f1").with_range("year", Some(2016.0), None);
    let mask = view
        .on_filter_changed(FilterEvent::new("table-0", Some(filter)))
        .expect("filter");
    assert_eq!(mask.level(), InvalidationLevel::Data);
    assert!(mask.has_topic(InvalidationTopic::Filter));
    assert_eq!(view.series().point_count(), 2);
    let xs: Vec<f64> = view.series().series[0].values.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![2016.0, 2017.0]);

    let ignored = view
        .on_filter_changed(FilterEvent::new("other-table", None))
        .expect("ignored");
    assert!(ignored.is_none());
}

#[test]
fn unsubscribing_restores_unfiltered_rows() {
    let mut view = view();
    let filter = RowFilter::new("f1").with_range("year", None, Some(2015.0));
    view.on_filter_changed(FilterEvent::new("table-0", Some(filter)))
        .expect("filter");
    assert_eq!(view.series().point_count(), 1);

    view.apply_setting(SettingCommand::SetSubscribeFilter(false))
        .expect("unsubscribe");
    assert!(!view.is_subscribed());
    assert_eq!(view.channel().unsubscribe_calls, 1);
    assert_eq!(view.series().point_count(), 3);

    let late = RowFilter::new("f1").with_range("year", None, Some(2015.0));
    let mask = view
        .on_filter_changed(FilterEvent::new("table-0", Some(late)))
        .expect("ignored");
    assert!(mask.is_none());
}

#[test]
fn render_services_pending_invalidation() {
    let mut view = view();
    let serviced = view.render().expect("render");
    assert_eq!(serviced.level(), InvalidationLevel::Full);
    assert_eq!(view.renderer().frames_rendered, 1);
    assert_eq!(view.renderer().last_area_count, 2);

    assert!(view.render().expect("render").is_none());

    view.apply_setting(SettingCommand::SetSeriesDisabled {
        index: 1,
        disabled: true,
    })
    .expect("toggle");
    let serviced = view.render().expect("render");
    assert_eq!(serviced.level(), InvalidationLevel::Data);
    assert_eq!(view.renderer().last_area_count, 1);
}

#[test]
fn resize_clamps_to_minimum_canvas() {
    let mut view = view();
    let _ = view.take_invalidation();
    let mask = view.resize(40, 2000);
    assert_eq!(mask.level(), InvalidationLevel::Layout);
    assert!(mask.has_topic(InvalidationTopic::Size));
    assert_eq!(view.viewport(), Viewport::new(100, 2000));
    assert!(view.resize(10, 2000).is_none());
    view.render().expect("render at minimum size");
}

#[test]
fn component_value_writes_disabled_only_when_needed() {
    let mut view = view();
    assert!(view.component_value().options.disabled.is_none());

    view.apply_setting(SettingCommand::SetSeriesDisabled {
        index: 0,
        disabled: true,
    })
    .expect("toggle");
    assert_eq!(
        view.component_value().options.disabled,
        Some(vec![true, false])
    );

    view.apply_setting(SettingCommand::SetSeriesDisabled {
        index: 0,
        disabled: false,
    })
    .expect("toggle back");
    assert_eq!(
        view.component_value().options.disabled,
        Some(vec![false, false])
    );
}

#[test]
fn saved_disabled_flags_are_kept() {
    let mut config = ChartConfig::default();
    config.disabled = Some(vec![false]);
    let mut view = view_with(representation(), Some(ChartSettings::new(config)));
    assert_eq!(
        view.component_value().options.disabled,
        Some(vec![false, false])
    );
}

#[test]
fn basis_with_tooltip_raises_advisory() {
    let mut view = view();
    assert!(view.requires_rebuild(&SettingCommand::SetInterpolation(Interpolation::Basis)));
    let mask = view
        .apply_setting(SettingCommand::SetInterpolation(Interpolation::Basis))
        .expect("basis");
    assert_eq!(mask.level(), InvalidationLevel::Full);
    assert_eq!(view.advisories(), &[Advisory::BasisTooltipUnsupported]);
}

#[test]
fn canvas_sizing_follows_mode_and_header() {
    let fixed = view_with(
        ViewRepresentation::new(
            ViewOptions::new(["a"]).with_fixed_size(640, 50),
            table(),
        ),
        None,
    );
    let sizing = fixed.canvas_sizing();
    assert_eq!(sizing.width, CanvasLength::Pixels(640));
    assert_eq!(sizing.height, CanvasLength::Pixels(100));

    let fullscreen = view_with(representation().running_in_view(true, 32), None);
    let sizing = fullscreen.canvas_sizing();
    assert_eq!(sizing.width, CanvasLength::Percent(100));
    assert_eq!(sizing.height.to_css(), "calc(100% - 32px)");
    assert!(!sizing.floating_header);

    let titled = view_with(
        representation().running_in_view(true, 32),
        Some(ChartSettings::new(ChartConfig::default().with_title("Sales"))),
    );
    let sizing = titled.canvas_sizing();
    assert_eq!(sizing.height, CanvasLength::Percent(100));
    assert!(sizing.floating_header);
}

#[test]
fn close_unsubscribes_once() {
    let mut view = view();
    view.close();
    view.close();
    assert_eq!(view.channel().unsubscribe_calls, 1);
    assert!(!view.is_subscribed());
}
