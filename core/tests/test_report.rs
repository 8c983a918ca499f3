use speedtrack_core::models::Fix;
use speedtrack_core::report::{format_distance, format_elapsed, format_speed, trip_report};
use speedtrack_core::{SpeedTracker, SpeedUnit};

#[test]
fn elapsed_is_hh_mm_ss() {
    assert_eq!(format_elapsed(0), "00:00:00");
    assert_eq!(format_elapsed(59), "00:00:59");
    assert_eq!(format_elapsed(3661), "01:01:01");
    assert_eq!(format_elapsed(90_000), "25:00:00");
}

#[test]
fn elapsed_does_not_panic_on_huge_input() {
    assert!(!format_elapsed(u64::MAX).is_empty());
}

#[test]
fn number_formatting() {
    assert_eq!(format_speed(0.0), "0.0");
    assert_eq!(format_speed(36.04), "36.0");
    assert_eq!(format_distance(3.14159), "3.14");
    assert_eq!(format_distance(0.0), "0.00");
}

#[test]
fn report_uses_display_units() {
    let mut t = SpeedTracker::with_defaults().expect("gyldig");
    t.start();
    t.accept(Fix::new(59.91, 10.75, 0).with_speed(10.0).with_accuracy(3.5));
    t.accept(Fix::new(59.91, 10.75, 65_000).with_speed(10.0).with_accuracy(3.5));
    t.set_speed_unit(SpeedUnit::Mph);

    let report = trip_report(&t.snapshot());
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "--- Trip Report ---");
    assert!(lines.contains(&"Status: Excellent GPS Signal"), "{report}");
    assert!(lines.contains(&"Elapsed: 00:01:05"), "{report}");
    assert!(lines.contains(&"Max: 22.4 mph"), "{report}");
    assert!(lines.contains(&"Distance: 0.00 km"), "{report}");
    assert!(lines.contains(&"Accuracy: 3.5 m"), "{report}");
}

#[test]
fn logging_the_report_works_without_a_logger() {
    let t = SpeedTracker::with_defaults().expect("gyldig");
    speedtrack_core::report::log_trip_report(&t.snapshot());
}
