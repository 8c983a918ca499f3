use std::fs;
use std::path::PathBuf;

use speedtrack_core::{load_config, save_config, ConfigError, DistanceUnit, SpeedUnit, TrackerConfig};

fn tmp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("speedtrack_{}_{}", std::process::id(), name))
}

#[test]
fn default_config_is_valid() {
    let cfg = TrackerConfig::default();
    cfg.validate().expect("default skal validere");
    assert_eq!(cfg.accuracy_gate_m, 10.0);
    assert_eq!(cfg.max_step_m, 120.0);
    assert_eq!(cfg.recent_capacity, 10);
    assert_eq!(cfg.history_capacity, 50);
    assert_eq!(cfg.trail_capacity, 20);
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg = TrackerConfig::from_json_str(
        r#"{"max_step_m": 80.0, "speed_unit": "mph", "estimator": {"stale_after_s": 8.0}}"#,
    )
    .expect("gyldig delvis konfig");
    assert_eq!(cfg.max_step_m, 80.0);
    assert_eq!(cfg.speed_unit, SpeedUnit::Mph);
    assert_eq!(cfg.distance_unit, DistanceUnit::Km);
    assert_eq!(cfg.estimator.stale_after_s, 8.0);
    assert_eq!(cfg.estimator.min_dt_s, 0.1);
    assert_eq!(cfg.smoother, TrackerConfig::default().smoother);
}

#[test]
fn type_error_reports_field_path() {
    match TrackerConfig::from_json_str(r#"{"max_step_m": "langt"}"#) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, "max_step_m"),
        other => panic!("forventet Parse-feil, fikk {other:?}"),
    }
    match TrackerConfig::from_json_str(r#"{"smoother": {"weight_mid": "høy"}}"#) {
        Err(ConfigError::Parse { path, .. }) => assert_eq!(path, "smoother.weight_mid"),
        other => panic!("forventet Parse-feil, fikk {other:?}"),
    }
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        (r#"{"recent_capacity": 0}"#, "recent_capacity"),
        (r#"{"max_step_m": -1.0}"#, "max_step_m"),
        (r#"{"smoother": {"weight_low": 1.5}}"#, "smoother.weight_low"),
        (r#"{"smoother": {"fresh_start_zeros": 9}}"#, "smoother.fresh_start_zeros"),
        (r#"{"estimator": {"stale_after_s": 0.05}}"#, "estimator.stale_after_s"),
    ];
    for (json, expected) in cases {
        match TrackerConfig::from_json_str(json) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected, "{json}"),
            other => panic!("{json}: forventet Invalid, fikk {other:?}"),
        }
    }
}

#[test]
fn unit_names_parse_leniently() {
    assert_eq!("km/h".parse::<SpeedUnit>().ok(), Some(SpeedUnit::Kmh));
    assert_eq!(" MPH ".parse::<SpeedUnit>().ok(), Some(SpeedUnit::Mph));
    assert_eq!("mi".parse::<DistanceUnit>().ok(), Some(DistanceUnit::Miles));
    assert!(matches!("knop".parse::<SpeedUnit>(), Err(ConfigError::Invalid { field: "speed_unit", .. })));
}

#[test]
fn save_and_load_roundtrip() {
    let path = tmp_path("config.json");
    let mut cfg = TrackerConfig::default();
    cfg.max_step_m = 95.0;
    cfg.distance_unit = DistanceUnit::Miles;

    save_config(&cfg, &path).expect("kunne ikke lagre konfig");
    let loaded = load_config(&path).expect("kunne ikke laste konfig");
    assert_eq!(loaded, cfg);

    fs::remove_file(&path).ok();
}

#[test]
fn missing_file_gives_default() {
    let path = tmp_path("finnes_ikke.json");
    fs::remove_file(&path).ok();
    let cfg = load_config(&path).expect("manglende fil er ikke en feil");
    assert_eq!(cfg, TrackerConfig::default());
}

#[test]
fn invalid_config_is_not_saved() {
    let path = tmp_path("ugyldig.json");
    let mut cfg = TrackerConfig::default();
    cfg.trail_capacity = 0;
    assert!(matches!(save_config(&cfg, &path), Err(ConfigError::Invalid { field: "trail_capacity", .. })));
    assert!(!path.exists());
}
