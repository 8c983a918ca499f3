use chrono::Duration;
use log::info;

use crate::models::TripSnapshot;

/// HH:MM:SS
pub fn format_elapsed(secs: u64) -> String {
    // Duration::seconds panikker over i64::MAX / 1000
    let d = Duration::seconds(secs.min((i64::MAX / 1000) as u64) as i64);
    format!(
        "{:02}:{:02}:{:02}",
        d.num_hours(),
        d.num_minutes() % 60,
        d.num_seconds() % 60
    )
}

pub fn format_speed(v: f64) -> String {
    format!("{v:.1}")
}

pub fn format_distance(v: f64) -> String {
    format!("{v:.2}")
}

pub fn trip_report(s: &TripSnapshot) -> String {
    let su = s.speed_unit.label();
    let accuracy = match s.accuracy_m {
        Some(a) => format!("{a:.1} m"),
        None => "-".to_string(),
    };

    let mut out = String::new();
    out.push_str("--- Trip Report ---\n");
    out.push_str(&format!("Status: {}\n", s.status));
    out.push_str(&format!("Elapsed: {}\n", format_elapsed(s.elapsed_secs.max(0.0) as u64)));
    out.push_str(&format!("Speed: {} {su}\n", format_speed(s.current_speed)));
    out.push_str(&format!("Max: {} {su}\n", format_speed(s.max_speed)));
    out.push_str(&format!("Avg: {} {su}\n", format_speed(s.average_speed)));
    out.push_str(&format!(
        "Distance: {} {}\n",
        format_distance(s.total_distance),
        s.distance_unit.label()
    ));
    out.push_str(&format!("Accuracy: {accuracy}\n"));
    out
}

pub fn log_trip_report(s: &TripSnapshot) {
    for line in trip_report(s).lines() {
        info!("{line}");
    }
}
