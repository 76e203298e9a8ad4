use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use streamgraph_rs::api::{
    NullFilterChannel, SettingCommand, StreamgraphView, ViewOptions, ViewRepresentation,
};
use streamgraph_rs::core::{
    CellValue, ColumnSpec, ColumnType, DataTable, RowFilter, SeriesBuilder, StackOffset,
    StackOrder, TableRow, XAxisSource, stack_series,
};
use streamgraph_rs::render::{NullRenderer, render_svg};

const SERIES: usize = 12;

fn column_names() -> Vec<String> {
    (0..SERIES).map(|index| format!("s{index}")).collect()
}

fn wide_table(rows: usize) -> DataTable {
    let mut columns = vec![ColumnSpec::new("t", ColumnType::Number)];
    columns.extend(
        column_names()
            .into_iter()
            .map(|name| ColumnSpec::new(name, ColumnType::Number)),
    );
    let rows = (0..rows)
        .map(|row| {
            let t = row as f64;
            let mut cells = vec![CellValue::Number(t)];
            cells.extend((0..SERIES).map(|series| {
                let phase = series as f64 * 0.7;
                CellValue::Number(10.0 + 8.0 * (t * 0.01 + phase).sin())
            }));
            TableRow::new(format!("Row{row}"), cells)
        })
        .collect();
    DataTable::new(columns, rows).expect("valid generated table")
}

fn bench_series_build_10k(c: &mut Criterion) {
    let table = wide_table(10_000);
    let selected = column_names();
    let source = XAxisSource::resolve(&table, Some("t")).expect("x column");
    let filter = RowFilter::new("f").with_range("t", Some(2_500.0), Some(7_500.0));

    c.bench_function("series_build_10k_filtered", |b| {
        b.iter(|| {
            let _ = SeriesBuilder::build(
                black_box(&table),
                black_box(&selected),
                Some(black_box(&filter)),
                black_box(&source),
            )
            .expect("series should build");
        })
    });
}

fn bench_silhouette_stack_10k(c: &mut Criterion) {
    let table = wide_table(10_000);
    let source = XAxisSource::resolve(&table, Some("t")).expect("x column");
    let set = SeriesBuilder::build(&table, &column_names(), None, &source).expect("series");
    let disabled = vec![false; SERIES];

    c.bench_function("silhouette_stack_10k", |b| {
        b.iter(|| {
            let _ = stack_series(
                black_box(&set.series),
                black_box(&disabled),
                StackOrder::InsideOut,
                StackOffset::Silhouette,
            );
        })
    });
}

fn bench_scene_to_svg_2k(c: &mut Criterion) {
    let representation = ViewRepresentation::new(
        ViewOptions::new(column_names()).with_x_axis_column("t"),
        wide_table(2_000),
    );
    let mut view = StreamgraphView::new(
        NullRenderer::default(),
        NullFilterChannel::default(),
        representation,
        None,
    )
    .expect("view init");
    view.apply_setting(SettingCommand::SetGridVisible(true))
        .expect("grid toggle");

    c.bench_function("scene_to_svg_2k", |b| {
        b.iter(|| {
            let frame = view.build_scene().expect("scene");
            let _ = render_svg(black_box(&frame)).expect("svg");
        })
    });
}

criterion_group!(
    benches,
    bench_series_build_10k,
    bench_silhouette_stack_10k,
    bench_scene_to_svg_2k
);
criterion_main!(benches);
