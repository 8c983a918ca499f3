use speedtrack_core::estimator::{estimate_speed, EstimateMethod, EstimatorConfig};
use speedtrack_core::models::Fix;

fn cfg() -> EstimatorConfig {
    EstimatorConfig::default()
}

#[test]
fn reported_speed_is_converted_exactly() {
    for v in [0.5, 1.0, 10.0, 27.7, 83.0] {
        let fix = Fix::new(59.9, 10.7, 1000).with_speed(v);
        let est = estimate_speed(&fix, None, &cfg());
        assert_eq!(est.method, EstimateMethod::Reported);
        assert_eq!(est.speed_kmh, v * 3.6);
    }
}

#[test]
fn reported_speed_wins_over_position_change() {
    let prior = Fix::new(0.0, 0.0, 0);
    let fix = Fix::new(0.0, 0.0009, 10_000).with_speed(2.0);
    let est = estimate_speed(&fix, Some(&prior), &cfg());
    assert_eq!(est.method, EstimateMethod::Reported);
    assert_eq!(est.speed_kmh, 2.0 * 3.6);
}

#[test]
fn negative_or_nan_reported_speed_is_never_trusted() {
    for v in [-3.0, f64::NAN, 0.0] {
        let fix = Fix::new(59.9, 10.7, 1000).with_speed(v);
        let est = estimate_speed(&fix, None, &cfg());
        assert_eq!(est.method, EstimateMethod::NoMotion, "v={v}");
        assert_eq!(est.speed_kmh, 0.0);
    }
}

#[test]
fn finite_difference_from_100_m_in_10_s() {
    let prior = Fix::new(0.0, 0.0, 0).with_accuracy(5.0);
    let fix = Fix::new(0.0, 0.0009, 10_000).with_accuracy(5.0);
    let est = estimate_speed(&fix, Some(&prior), &cfg());
    assert_eq!(est.method, EstimateMethod::FiniteDifference);
    assert!((est.speed_kmh - 36.0).abs() < 0.1, "fikk {}", est.speed_kmh);
    assert!(!est.stale_prior);
}

#[test]
fn identical_coordinates_fall_through_to_zero() {
    let prior = Fix::new(59.91, 10.75, 0);
    let fix = Fix::new(59.91, 10.75, 1000);
    let est = estimate_speed(&fix, Some(&prior), &cfg());
    assert_eq!(est.method, EstimateMethod::NoMotion);
    assert_eq!(est.speed_kmh, 0.0);
}

#[test]
fn tiny_time_delta_is_treated_as_noise() {
    let prior = Fix::new(0.0, 0.0, 0);
    let fix = Fix::new(0.0, 0.00001, 80); // 0.08 s
    let est = estimate_speed(&fix, Some(&prior), &cfg());
    assert_eq!(est.method, EstimateMethod::NoMotion);
    assert_eq!(est.speed_kmh, 0.0);
}

#[test]
fn sub_threshold_creep_gets_floor_speed() {
    // ~5 cm på 1 s, under min_movement_m, men ikke null
    let prior = Fix::new(0.0, 0.0, 0);
    let fix = Fix::new(0.0, 0.00000045, 1000);
    let est = estimate_speed(&fix, Some(&prior), &cfg());
    assert_eq!(est.method, EstimateMethod::CreepFloor);
    assert!(est.speed_kmh >= cfg().creep_floor_kmh);
    assert!(est.speed_kmh < 1.0);
}

#[test]
fn creep_needs_more_than_floor_dt() {
    let prior = Fix::new(0.0, 0.0, 0);
    let fix = Fix::new(0.0, 0.00000045, 200); // 0.2 s < 0.3 s
    let est = estimate_speed(&fix, Some(&prior), &cfg());
    assert_eq!(est.method, EstimateMethod::NoMotion);
}

#[test]
fn implausible_speed_is_rejected() {
    // 500 m på 1 s ≈ 1800 km/h
    let prior = Fix::new(0.0, 0.0, 0);
    let fix = Fix::new(0.0, 0.0045, 1000);
    let est = estimate_speed(&fix, Some(&prior), &cfg());
    assert_eq!(est.method, EstimateMethod::NoMotion);
    assert_eq!(est.speed_kmh, 0.0);
}

#[test]
fn stale_prior_is_flagged_and_ignored() {
    let prior = Fix::new(0.0, 0.0, 0);
    let fix = Fix::new(0.0, 0.0009, 20_000);
    let est = estimate_speed(&fix, Some(&prior), &cfg());
    assert!(est.stale_prior);
    assert_eq!(est.method, EstimateMethod::NoMotion);

    // rapportert fart brukes fortsatt, men foreldet-flagget følger med
    let est = estimate_speed(&fix.with_speed(4.0), Some(&prior), &cfg());
    assert!(est.stale_prior);
    assert_eq!(est.method, EstimateMethod::Reported);
}

#[test]
fn estimate_is_never_negative() {
    let prior = Fix::new(10.0, 10.0, 5_000);
    let fixes = [
        Fix::new(10.0, 10.0, 1_000),            // eldre enn prior
        Fix::new(10.001, 10.0, 6_000),
        Fix::new(10.0, 10.0, 5_050),
        Fix::new(-10.0, -10.0, 6_000),
        Fix::new(10.0, 10.0, 6_000).with_speed(-1.0),
    ];
    for f in fixes {
        let est = estimate_speed(&f, Some(&prior), &cfg());
        assert!(est.speed_kmh >= 0.0, "{f:?} ga {}", est.speed_kmh);
    }
}
