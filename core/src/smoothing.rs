use std::collections::VecDeque;

use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    pub outlier_window: usize,    // antall siste verdier i snittet
    pub outlier_factor: f64,      // avvik > factor × snitt => outlier
    pub fresh_start_zeros: usize, // antall nuller (av vinduet) som gir ny start
    pub fresh_start_keep: usize,
    pub high_speed_kmh: f64,
    pub low_speed_kmh: f64,
    pub weight_snap: f64, // kandidat == 0 eller > high_speed
    pub weight_mid: f64,
    pub weight_low: f64,  // 0 < kandidat < low_speed
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            outlier_window: 5,
            outlier_factor: 3.0,
            fresh_start_zeros: 3,
            fresh_start_keep: 2,
            high_speed_kmh: 50.0,
            low_speed_kmh: 5.0,
            weight_snap: 0.8,
            weight_mid: 0.7,
            weight_low: 0.6,
        }
    }
}

/// Hvilken regel i beslutningslisten som ga resultatet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SmoothingRule {
    Seed,
    WakeFromStop,
    ComingToStop,
    FreshStart,
    Outlier,
    Blend { weight: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Smoothed {
    pub speed_kmh: f64,
    pub rule: SmoothingRule,
}

/// Snitt av de siste `window` verdiene (0 for tom historikk).
pub fn recent_mean(recent: &VecDeque<f64>, window: usize) -> f64 {
    let n = recent.len().min(window);
    if n == 0 {
        return 0.0;
    }
    recent.iter().rev().take(n).sum::<f64>() / n as f64
}

fn zeros_in_window(recent: &VecDeque<f64>, window: usize) -> usize {
    recent.iter().rev().take(window).filter(|v| **v == 0.0).count()
}

/// Adaptiv vekt: rask respons mot stopp og høy fart, mykere i mellomsjiktet.
pub fn blend_weight(candidate_kmh: f64, cfg: &SmootherConfig) -> f64 {
    if candidate_kmh == 0.0 || candidate_kmh > cfg.high_speed_kmh {
        cfg.weight_snap
    } else if candidate_kmh < cfg.low_speed_kmh {
        cfg.weight_low
    } else {
        cfg.weight_mid
    }
}

/// Glatter en rå fartskandidat (km/h) mot historikken.
///
/// Reglene er ordnet og gjensidig utelukkende; rekkefølgen avgjør tie-break:
/// seed → våkne fra stopp → på vei til stopp → ny start → outlier → blanding.
/// `recent` kan bli trimmet her (våkne/ny start), men resultatet legges ikke til;
/// det gjør aggregatoren.
pub fn smooth_speed(recent: &mut VecDeque<f64>, candidate_kmh: f64, cfg: &SmootherConfig) -> Smoothed {
    let candidate = if candidate_kmh.is_finite() { candidate_kmh.max(0.0) } else { 0.0 };

    if recent.is_empty() {
        return Smoothed { speed_kmh: candidate, rule: SmoothingRule::Seed };
    }

    let mean = recent_mean(recent, cfg.outlier_window);

    if mean == 0.0 && candidate > 0.0 {
        recent.clear();
        return Smoothed { speed_kmh: candidate, rule: SmoothingRule::WakeFromStop };
    }

    if mean > 0.0 && candidate == 0.0 {
        return Smoothed { speed_kmh: 0.0, rule: SmoothingRule::ComingToStop };
    }

    if candidate > 0.0 && zeros_in_window(recent, cfg.outlier_window) >= cfg.fresh_start_zeros {
        while recent.len() > cfg.fresh_start_keep {
            recent.pop_front();
        }
        return Smoothed { speed_kmh: candidate, rule: SmoothingRule::FreshStart };
    }

    if mean > 0.0 && (candidate - mean).abs() > mean * cfg.outlier_factor {
        debug!("outlier: kandidat {:.2} km/h mot snitt {:.2} km/h", candidate, mean);
        return Smoothed { speed_kmh: mean, rule: SmoothingRule::Outlier };
    }

    let weight = blend_weight(candidate, cfg);
    Smoothed {
        speed_kmh: mean * (1.0 - weight) + candidate * weight,
        rule: SmoothingRule::Blend { weight },
    }
}
