use streamgraph_rs::core::{
    CellValue, ColumnSpec, ColumnType, DataTable, RowFilter, SeriesBuilder, TableRow, XAxisSource,
};

fn table() -> DataTable {
    let rows = [(10.0, 1.0, 4.0), (20.0, 2.0, 5.0), (30.0, 3.0, 6.0)]
        .iter()
        .enumerate()
        .map(|(index, &(x, a, b))| {
            TableRow::new(
                format!("Row{index}"),
                vec![
                    CellValue::Number(x),
                    CellValue::Number(a),
                    CellValue::Number(b),
                    CellValue::Text(format!("label-{index}")),
                ],
            )
        })
        .collect();
    DataTable::new(
        vec![
            ColumnSpec::new("x", ColumnType::Number),
            ColumnSpec::new("a", ColumnType::Number),
            ColumnSpec::new("b", ColumnType::Number),
            ColumnSpec::new("name", ColumnType::String),
        ],
        rows,
    )
    .expect("valid table")
}

fn columns() -> Vec<String> {
    vec!["a".to_owned(), "b".to_owned()]
}

#[test]
fn numeric_x_column_provides_coordinates_for_included_rows() {
    let table = table();
    let x_axis = XAxisSource::resolve(&table, Some("x")).expect("x axis");
    let filter = RowFilter::new("f").with_nominal("name", ["label-0", "label-2"]);

    let set = SeriesBuilder::build(&table, &columns(), Some(&filter), &x_axis).expect("series");
    assert!(set.numeric_x);
    assert_eq!(set.included_rows, vec![0, 2]);

    let a: Vec<(f64, Option<f64>)> = set.series[0].values.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(a, vec![(10.0, Some(1.0)), (30.0, Some(3.0))]);
}

#[test]
fn row_key_axis_uses_dense_positions() {
    let table = table();
    let x_axis = XAxisSource::resolve(&table, None).expect("x axis");
    assert!(x_axis.uses_row_keys());

    let set = SeriesBuilder::build(&table, &columns(), None, &x_axis).expect("series");
    assert!(!set.numeric_x);
    let xs: Vec<f64> = set.series[1].values.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 1.0, 2.0]);
}

#[test]
fn filtered_positional_axis_stays_dense() {
    let table = table();
    let x_axis = XAxisSource::resolve(&table, Some("name")).expect("x axis");
    let filter = RowFilter::new("f").with_nominal("name", ["label-1", "label-2"]);

    let set = SeriesBuilder::build(&table, &columns(), Some(&filter), &x_axis).expect("series");
    let xs: Vec<f64> = set.series[0].values.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 1.0]);
    assert_eq!(set.row_at(0), Some(1));
    assert_eq!(x_axis.label(set.row_at(1).expect("row")), Some(&CellValue::Text("label-2".to_owned())));
}

#[test]
fn series_follow_selected_column_order() {
    let table = table();
    let x_axis = XAxisSource::resolve(&table, None).expect("x axis");
    let selected = vec!["b".to_owned(), "a".to_owned()];
    let set = SeriesBuilder::build(&table, &selected, None, &x_axis).expect("series");
    assert_eq!(set.keys(), vec!["b", "a"]);
    assert_eq!(set.series[0].values[0].y, Some(4.0));
}

#[test]
fn filter_excluding_everything_yields_empty_series() {
    let table = table();
    let x_axis = XAxisSource::resolve(&table, Some("x")).expect("x axis");
    let filter = RowFilter::new("f").with_range("x", Some(100.0), None);
    let set = SeriesBuilder::build(&table, &columns(), Some(&filter), &x_axis).expect("series");
    assert_eq!(set.series.len(), 2);
    assert!(set.series.iter().all(|series| series.is_empty()));
    assert_eq!(set.point_count(), 0);
}

#[test]
fn missing_values_are_kept_as_gaps() {
    let table = DataTable::new(
        vec![
            ColumnSpec::new("x", ColumnType::Number),
            ColumnSpec::new("a", ColumnType::Number),
        ],
        vec![
            TableRow::new("Row0", vec![CellValue::Missing, CellValue::Missing]),
            TableRow::new("Row1", vec![CellValue::Number(2.0), CellValue::Number(7.0)]),
        ],
    )
    .expect("valid table");
    let x_axis = XAxisSource::resolve(&table, Some("x")).expect("x axis");
    let set = SeriesBuilder::build(&table, &["a".to_owned()], None, &x_axis).expect("series");

    let first = set.series[0].values[0];
    assert!(first.x.is_nan());
    assert_eq!(first.y, None);
    assert_eq!(first.stack_value(), 0.0);
    assert_eq!(set.series[0].values[1].y, Some(7.0));
}

#[test]
fn unknown_selected_column_is_rejected() {
    let table = table();
    let x_axis = XAxisSource::resolve(&table, None).expect("x axis");
    assert!(SeriesBuilder::build(&table, &["zzz".to_owned()], None, &x_axis).is_err());
    assert!(XAxisSource::resolve(&table, Some("zzz")).is_err());
}
