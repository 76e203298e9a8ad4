use approx::assert_abs_diff_eq;
use streamgraph_rs::core::{
    DataPoint, SeriesSpec, StackOffset, StackOrder, interpolate, stack_series, Interpolation,
};

fn series(key: &str, ys: &[Option<f64>]) -> SeriesSpec {
    SeriesSpec {
        key: key.to_owned(),
        values: ys
            .iter()
            .enumerate()
            .map(|(index, y)| DataPoint {
                x: index as f64,
                y: *y,
            })
            .collect(),
    }
}

fn sample() -> Vec<SeriesSpec> {
    vec![
        series("a", &[Some(1.0), Some(2.0), Some(3.0)]),
        series("b", &[Some(4.0), None, Some(1.0)]),
    ]
}

#[test]
fn zero_offset_stacks_from_the_axis() {
    let layout = stack_series(&sample(), &[], StackOrder::Default, StackOffset::Zero);
    let a = &layout.bands[0].points;
    let b = &layout.bands[1].points;

    assert_abs_diff_eq!(a[0].y0, 0.0);
    assert_abs_diff_eq!(a[0].y1, 1.0);
    assert_abs_diff_eq!(b[0].y0, 1.0);
    assert_abs_diff_eq!(b[0].y1, 5.0);
    // Missing values stack as zero height.
    assert_abs_diff_eq!(b[1].y0, b[1].y1);
    assert_eq!(layout.value_extent(), (0.0, 5.0));
    assert_eq!(layout.x_extent(), Some((0.0, 2.0)));
}

#[test]
fn expand_offset_columns_sum_to_one() {
    let layout = stack_series(&sample(), &[], StackOrder::Default, StackOffset::Expand);
    for column in 0..3 {
        let top = layout.bands.last().expect("band").points[column].y1;
        assert_abs_diff_eq!(top, 1.0, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(layout.bands[0].points[0].y1, 0.2, epsilon = 1e-12);
}

#[test]
fn expand_offset_splits_all_zero_columns_evenly() {
    let data = vec![
        series("a", &[Some(0.0)]),
        series("b", &[None]),
    ];
    let layout = stack_series(&data, &[], StackOrder::Default, StackOffset::Expand);
    assert_abs_diff_eq!(layout.bands[0].points[0].y1, 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(layout.bands[1].points[0].y1, 1.0, epsilon = 1e-12);
}

#[test]
fn silhouette_offset_centers_columns_on_a_shared_midline() {
    let layout = stack_series(&sample(), &[], StackOrder::Default, StackOffset::Silhouette);
    // Column sums are 5, 2, 4; the midline sits at half the largest sum.
    for column in 0..3 {
        let bottom = layout.bands[0].points[column].y0;
        let top = layout.bands[1].points[column].y1;
        assert_abs_diff_eq!((bottom + top) / 2.0, 2.5, epsilon = 1e-12);
    }
}

#[test]
fn disabled_series_are_left_out_of_the_stack() {
    let layout = stack_series(
        &sample(),
        &[true, false],
        StackOrder::Default,
        StackOffset::Zero,
    );
    assert_eq!(layout.bands.len(), 1);
    assert_eq!(layout.bands[0].key, "b");
    assert_eq!(layout.bands[0].series_index, 1);
    assert_abs_diff_eq!(layout.bands[0].points[0].y0, 0.0);
}

#[test]
fn all_disabled_or_empty_input_gives_empty_layout() {
    let layout = stack_series(&sample(), &[true, true], StackOrder::Default, StackOffset::Zero);
    assert!(layout.bands.is_empty());
    assert_eq!(layout.value_extent(), (0.0, 1.0));
    assert_eq!(layout.x_extent(), None);
    assert!(stack_series(&[], &[], StackOrder::InsideOut, StackOffset::Silhouette)
        .bands
        .is_empty());
}

#[test]
fn inside_out_order_keeps_band_identity() {
    let data = vec![
        series("late", &[Some(0.0), Some(0.0), Some(5.0)]),
        series("early", &[Some(5.0), Some(0.0), Some(0.0)]),
        series("middle", &[Some(0.0), Some(5.0), Some(0.0)]),
    ];
    let layout = stack_series(&data, &[], StackOrder::InsideOut, StackOffset::Zero);
    let keys: Vec<&str> = layout.bands.iter().map(|band| band.key.as_str()).collect();
    assert_eq!(keys, vec!["late", "early", "middle"]);
    // "late" is stacked first, "early" on top of it, "middle" on top of both.
    assert_abs_diff_eq!(layout.bands[1].points[0].y0, 0.0);
    assert_abs_diff_eq!(layout.bands[2].points[2].y0, 5.0);
}

#[test]
fn step_interpolation_holds_values_until_next_x() {
    let points = [(0.0, 1.0), (1.0, 3.0), (2.0, 2.0)];
    let stepped = interpolate(&points, Interpolation::Step);
    assert_eq!(
        stepped,
        vec![(0.0, 1.0), (1.0, 1.0), (1.0, 3.0), (2.0, 3.0), (2.0, 2.0)]
    );
    assert_eq!(interpolate(&points, Interpolation::Linear), points.to_vec());
}

#[test]
fn basis_interpolation_keeps_endpoints() {
    let points = [(0.0, 0.0), (1.0, 6.0), (2.0, 0.0)];
    let curve = interpolate(&points, Interpolation::Basis);
    assert!(curve.len() > points.len());
    assert_eq!(curve.first(), Some(&(0.0, 0.0)));
    let last = curve.last().expect("last");
    assert_abs_diff_eq!(last.0, 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(last.1, 0.0, epsilon = 1e-12);
    // The smoothed peak stays below the control point.
    let peak = curve.iter().map(|p| p.1).fold(f64::MIN, f64::max);
    assert!(peak < 6.0);
}
