use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo::{fix_distance_km, MS_TO_KMH};
use crate::models::Fix;

/// Terskler for fartsestimatet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub min_dt_s: f64,          // dt ≤ dette regnes som støy
    pub stale_after_s: f64,     // dt > dette => forrige fix er foreldet
    pub min_movement_m: f64,    // minste forflytning for differanse-fart
    pub max_plausible_kmh: f64,
    pub creep_min_dt_s: f64,
    pub creep_floor_kmh: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_dt_s: 0.1,
            stale_after_s: 15.0,
            min_movement_m: 0.10,
            max_plausible_kmh: 300.0,
            creep_min_dt_s: 0.3,
            creep_floor_kmh: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateMethod {
    Reported,
    FiniteDifference,
    CreepFloor,
    NoMotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedEstimate {
    pub speed_kmh: f64,
    pub method: EstimateMethod,
    /// Forrige fix var foreldet og skal forkastes av kalleren.
    pub stale_prior: bool,
}

impl SpeedEstimate {
    fn new(speed_kmh: f64, method: EstimateMethod, stale_prior: bool) -> Self {
        Self { speed_kmh, method, stale_prior }
    }
}

/// Rå fartskandidat (km/h) for `fix`, gitt forrige aksepterte fix.
///
/// Strategier i prioritert rekkefølge, første treff vinner:
/// 1) rapportert fart (m/s × 3.6)
/// 2) endelig differanse over geodetisk avstand
/// 3) gulv for sakte kryping (aldri «stoppet» ved reell bevegelse)
/// 4) foreldet forrige fix => ingen kontekst
/// 5) ellers 0
pub fn estimate_speed(fix: &Fix, prior: Option<&Fix>, cfg: &EstimatorConfig) -> SpeedEstimate {
    let dt = prior.map(|p| fix.seconds_since(p));
    let stale_prior = matches!(dt, Some(dt) if dt > cfg.stale_after_s);
    if stale_prior {
        debug!("forrige fix er foreldet (dt={:.1}s), starter uten kontekst", dt.unwrap_or_default());
    }

    if let Some(v_ms) = fix.trusted_speed_ms() {
        return SpeedEstimate::new(v_ms * MS_TO_KMH, EstimateMethod::Reported, stale_prior);
    }

    let context = if stale_prior { None } else { prior.zip(dt) };

    if let Some((p, dt)) = context {
        if dt > cfg.min_dt_s {
            let d_km = fix_distance_km(p, fix);
            let kmh = d_km / dt * 3600.0;
            let plausible = kmh.is_finite() && kmh <= cfg.max_plausible_kmh;

            if d_km * 1000.0 > cfg.min_movement_m && plausible {
                return SpeedEstimate::new(kmh, EstimateMethod::FiniteDifference, false);
            }
            if dt > cfg.creep_min_dt_s && d_km > 0.0 && plausible {
                return SpeedEstimate::new(kmh.max(cfg.creep_floor_kmh), EstimateMethod::CreepFloor, false);
            }
            if !plausible {
                debug!("urealistisk differanse-fart {:.1} km/h forkastet", kmh);
            }
        }
    }

    SpeedEstimate::new(0.0, EstimateMethod::NoMotion, stale_prior)
}
