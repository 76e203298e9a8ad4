use streamgraph_rs::core::LinearScale;
use streamgraph_rs::core::scale::tick_step;

#[test]
fn scale_round_trip_within_tolerance() {
    let scale = LinearScale::new((10.0, 110.0), (0.0, 1000.0)).expect("valid scale");

    let original = 42.5;
    let px = scale.map(original);
    let recovered = scale.invert(px);

    let epsilon = 1e-9;
    assert!((px - 325.0).abs() <= epsilon);
    assert!((recovered - original).abs() <= epsilon);
}

#[test]
fn non_finite_domain_is_rejected() {
    assert!(LinearScale::new((f64::NAN, 1.0), (0.0, 1.0)).is_err());
    assert!(LinearScale::new((0.0, 1.0), (0.0, f64::INFINITY)).is_err());
}

#[test]
fn ticks_are_round_numbers_inside_the_domain() {
    let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0)).expect("valid scale");
    assert_eq!(scale.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);

    let scale = LinearScale::new((-3.0, 47.0), (0.0, 100.0)).expect("valid scale");
    assert_eq!(scale.ticks(5), vec![0.0, 10.0, 20.0, 30.0, 40.0]);
}

#[test]
fn tick_step_uses_one_two_five_progression() {
    assert!((tick_step(0.0, 10.0, 10) - 1.0).abs() <= 1e-12);
    assert!((tick_step(0.0, 10.0, 5) - 2.0).abs() <= 1e-12);
    assert!((tick_step(0.0, 100.0, 3) - 50.0).abs() <= 1e-12);
    assert_eq!(tick_step(1.0, 1.0, 5), 0.0);
}
