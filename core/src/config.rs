use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::estimator::EstimatorConfig;
use crate::models::{DistanceUnit, SpeedUnit};
use crate::smoothing::SmootherConfig;

/// Alle terskler i pipelinen. Delvis JSON er ok, manglende felt får default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub estimator: EstimatorConfig,
    pub smoother: SmootherConfig,
    pub accuracy_gate_m: f64,  // distanse integreres kun under denne nøyaktigheten
    pub max_step_m: f64,       // større steg per oppdatering = GPS-hopp
    pub max_display_kmh: f64,
    pub recent_capacity: usize,
    pub history_capacity: usize,
    pub trail_capacity: usize,
    pub speed_unit: SpeedUnit,
    pub distance_unit: DistanceUnit,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            smoother: SmootherConfig::default(),
            accuracy_gate_m: 10.0,
            max_step_m: 120.0,
            max_display_kmh: 300.0,
            recent_capacity: 10,
            history_capacity: 50,
            trail_capacity: 20,
            speed_unit: SpeedUnit::Kmh,
            distance_unit: DistanceUnit::Km,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("må være > 0, fikk {v}")))
    }
}

fn unit_weight(field: &'static str, w: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&w) {
        Ok(())
    } else {
        Err(invalid(field, format!("vekt må ligge i [0, 1], fikk {w}")))
    }
}

impl TrackerConfig {
    pub fn from_json_str(txt: &str) -> Result<Self, ConfigError> {
        let mut de = serde_json::Deserializer::from_str(txt);
        let cfg: TrackerConfig = serde_path_to_error::deserialize(&mut de).map_err(|e| ConfigError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.estimator;
        positive("estimator.min_dt_s", e.min_dt_s)?;
        positive("estimator.stale_after_s", e.stale_after_s)?;
        positive("estimator.min_movement_m", e.min_movement_m)?;
        positive("estimator.max_plausible_kmh", e.max_plausible_kmh)?;
        positive("estimator.creep_min_dt_s", e.creep_min_dt_s)?;
        positive("estimator.creep_floor_kmh", e.creep_floor_kmh)?;
        if e.stale_after_s <= e.min_dt_s {
            return Err(invalid("estimator.stale_after_s", "må være større enn min_dt_s"));
        }

        let s = &self.smoother;
        if s.outlier_window == 0 {
            return Err(invalid("smoother.outlier_window", "må være minst 1"));
        }
        if s.fresh_start_zeros == 0 || s.fresh_start_zeros > s.outlier_window {
            return Err(invalid("smoother.fresh_start_zeros", "må ligge i 1..=outlier_window"));
        }
        positive("smoother.outlier_factor", s.outlier_factor)?;
        unit_weight("smoother.weight_snap", s.weight_snap)?;
        unit_weight("smoother.weight_mid", s.weight_mid)?;
        unit_weight("smoother.weight_low", s.weight_low)?;

        positive("accuracy_gate_m", self.accuracy_gate_m)?;
        positive("max_step_m", self.max_step_m)?;
        positive("max_display_kmh", self.max_display_kmh)?;

        for (field, cap) in [
            ("recent_capacity", self.recent_capacity),
            ("history_capacity", self.history_capacity),
            ("trail_capacity", self.trail_capacity),
        ] {
            if cap == 0 {
                return Err(invalid(field, "kapasitet må være minst 1"));
            }
        }
        Ok(())
    }
}

/// Leser konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrackerConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("fant ikke konfig på {}, bruker default", path.display());
        return Ok(TrackerConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let cfg = TrackerConfig::from_json_str(&contents)?;
    info!("konfig lastet fra {} (max_step_m={})", path.display(), cfg.max_step_m);
    Ok(cfg)
}

/// Lagrer konfig til disk som JSON (pretty-print).
pub fn save_config<P: AsRef<Path>>(cfg: &TrackerConfig, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    cfg.validate()?;
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(path, json).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("konfig lagret til {}", path.display());
    Ok(())
}
