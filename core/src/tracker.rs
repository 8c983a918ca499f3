use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::TrackerConfig;
use crate::error::{AcquisitionError, FixError, TrackerError};
use crate::estimator::{estimate_speed, EstimateMethod, SpeedEstimate};
use crate::geo::fix_distance_km;
use crate::metrics::PipelineMetrics;
use crate::models::{DistanceUnit, Fix, RawFix, SpeedSample, SpeedUnit, TrailPoint, TripSnapshot};
use crate::smoothing::{smooth_speed, SmoothingRule};
use crate::source::{FixEvent, FixReceiver};
use crate::status::{GpsStatus, SignalQuality};

/// Mutabel tur-tilstand. Eies av trackeren alene; alt internt er km/h og km.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineState {
    pub last_fix: Option<Fix>,
    pub recent_speeds: VecDeque<f64>,
    pub speed_history: VecDeque<SpeedSample>,
    pub trail: VecDeque<TrailPoint>,
    pub total_distance_km: f64,
    pub max_speed_kmh: f64,
    pub current_speed_kmh: f64,
    pub average_speed_kmh: f64,
    pub accuracy_m: Option<f64>,
    pub altitude_m: Option<f64>,
    pub first_timestamp_ms: Option<u64>,
    pub last_timestamp_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    OutOfOrder { timestamp_ms: u64, last_ms: u64 },
    Malformed(FixError),
}

/// Hva distanse-integrasjonen gjorde med steget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistanceStep {
    NoPrior,
    LowAccuracy { accuracy_m: f64 },
    Stationary,
    Integrated { meters: f64 },
    Jump { meters: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FixUpdate {
    pub estimate: SpeedEstimate,
    pub rule: SmoothingRule,
    pub smoothed_kmh: f64,
    pub published: bool,
    pub distance: DistanceStep,
    pub watchdog_reset: bool,
}

impl FixUpdate {
    pub fn method(&self) -> EstimateMethod {
        self.estimate.method
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AcceptOutcome {
    Accepted(FixUpdate),
    /// Trackeren er stoppet.
    Ignored,
    Skipped(SkipReason),
    /// Kilden meldte feil; ingen fix denne runden.
    NoFix,
}

impl AcceptOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            AcceptOutcome::Accepted(_) => "accepted",
            AcceptOutcome::Ignored => "ignored",
            AcceptOutcome::Skipped(_) => "skipped",
            AcceptOutcome::NoFix => "no_fix",
        }
    }

    pub fn update(&self) -> Option<&FixUpdate> {
        match self {
            AcceptOutcome::Accepted(u) => Some(u),
            _ => None,
        }
    }
}

fn push_capped<T>(buf: &mut VecDeque<T>, value: T, cap: usize) {
    buf.push_back(value);
    while buf.len() > cap {
        buf.pop_front();
    }
}

/// Glatter og aggregerer en strøm av GPS-fixer til fart, maks, snitt og distanse.
#[derive(Debug)]
pub struct SpeedTracker {
    config: TrackerConfig,
    state: PipelineState,
    tracking: bool,
    speed_unit: SpeedUnit,
    distance_unit: DistanceUnit,
    status: GpsStatus,
    started_at: Option<DateTime<Utc>>,
    metrics: PipelineMetrics,
}

impl SpeedTracker {
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self {
            speed_unit: config.speed_unit,
            distance_unit: config.distance_unit,
            config,
            state: PipelineState::default(),
            tracking: false,
            status: GpsStatus::Waiting,
            started_at: None,
            metrics: PipelineMetrics::new()?,
        })
    }

    pub fn with_defaults() -> Result<Self, TrackerError> {
        Self::new(TrackerConfig::default())
    }

    // ── livssyklus ─────────────────────────────────────────────────────────

    pub fn start(&mut self) {
        self.start_at(Utc::now());
    }

    /// Ny tur: tom tilstand, tracking på.
    pub fn start_at(&mut self, at: DateTime<Utc>) {
        self.state = PipelineState::default();
        self.tracking = true;
        self.started_at = Some(at);
        self.status = GpsStatus::Acquiring;
        info!("tracking startet {}", at.to_rfc3339());
    }

    /// Stopper mottak; verdiene blir stående til reset.
    pub fn stop(&mut self) {
        if self.tracking {
            info!(
                "tracking stoppet: {:.3} km, maks {:.1} km/h",
                self.state.total_distance_km, self.state.max_speed_kmh
            );
        }
        self.tracking = false;
        self.status = GpsStatus::Stopped;
    }

    pub fn reset(&mut self) {
        self.stop();
        self.state = PipelineState::default();
        self.started_at = None;
        self.status = GpsStatus::Waiting;
        info!("tur nullstilt");
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn set_speed_unit(&mut self, unit: SpeedUnit) {
        self.speed_unit = unit;
    }

    pub fn set_distance_unit(&mut self, unit: DistanceUnit) {
        self.distance_unit = unit;
    }

    pub fn toggle_speed_unit(&mut self) -> SpeedUnit {
        self.speed_unit = self.speed_unit.toggled();
        self.speed_unit
    }

    pub fn toggle_distance_unit(&mut self) -> DistanceUnit {
        self.distance_unit = self.distance_unit.toggled();
        self.distance_unit
    }

    // ── inngang ────────────────────────────────────────────────────────────

    pub fn accept_raw(&mut self, raw: RawFix) -> AcceptOutcome {
        match Fix::try_from(raw) {
            Ok(fix) => self.accept(fix),
            Err(e) => self.skip(SkipReason::Malformed(e)),
        }
    }

    pub fn accept_json(&mut self, txt: &str) -> AcceptOutcome {
        match RawFix::from_json(txt) {
            Ok(raw) => self.accept_raw(raw),
            Err(e) => self.skip(SkipReason::Malformed(e)),
        }
    }

    pub fn handle(&mut self, event: FixEvent) -> AcceptOutcome {
        match event {
            Ok(fix) => self.accept(fix),
            Err(e) => {
                self.report_error(&e);
                AcceptOutcome::NoFix
            }
        }
    }

    /// Innhentingsfeil blir kun en statusstreng; tilstanden røres ikke.
    pub fn report_error(&mut self, err: &AcquisitionError) {
        warn!("fix-innhenting feilet: {err}");
        self.metrics.acquisition_errors.inc();
        self.status = GpsStatus::Failed(err.clone());
    }

    /// Behandler alle ventende hendelser i køen, i ankomstrekkefølge.
    pub fn drain(&mut self, rx: &FixReceiver) -> usize {
        let mut n = 0;
        while let Some(event) = rx.try_next() {
            self.handle(event);
            n += 1;
        }
        n
    }

    fn skip(&mut self, reason: SkipReason) -> AcceptOutcome {
        debug!("fix hoppet over: {:?}", reason);
        self.metrics.fixes_skipped.inc();
        AcceptOutcome::Skipped(reason)
    }

    /// Én fix gjennom hele pipelinen. Feiler aldri; dårlige fixer filtreres stille.
    pub fn accept(&mut self, fix: Fix) -> AcceptOutcome {
        if !self.tracking {
            self.metrics.fixes_ignored.inc();
            return AcceptOutcome::Ignored;
        }
        // kilder kan bygge Fix direkte; samme sjekk som for RawFix
        let fix = match fix.validate() {
            Ok(fix) => fix,
            Err(e) => return self.skip(SkipReason::Malformed(e)),
        };
        if let Some(last_ms) = self.state.last_timestamp_ms {
            if fix.timestamp_ms <= last_ms {
                return self.skip(SkipReason::OutOfOrder { timestamp_ms: fix.timestamp_ms, last_ms });
            }
        }

        // 1) rå kandidat
        let estimate = estimate_speed(&fix, self.state.last_fix.as_ref(), &self.config.estimator);
        let prior = if estimate.stale_prior { None } else { self.state.last_fix };

        // 2) glatting (intern enhet er alltid km/h)
        let smoothed = smooth_speed(&mut self.state.recent_speeds, estimate.speed_kmh, &self.config.smoother);
        if smoothed.rule == SmoothingRule::Outlier {
            self.metrics.outliers_rejected.inc();
        }
        let speed = smoothed.speed_kmh;

        // 3-4) publiser
        let published = speed >= 0.0 && speed < self.config.max_display_kmh;
        if published {
            self.state.current_speed_kmh = speed;
            if speed > self.state.max_speed_kmh {
                self.state.max_speed_kmh = speed;
            }
        } else {
            debug!("glattet fart {:.1} km/h utenfor visningsområdet", speed);
            self.metrics.implausible_speeds.inc();
        }

        // 5) distanse
        let distance = self.integrate_distance(prior.as_ref(), &fix);

        // 6-7) historikk og snitt
        let st = &mut self.state;
        push_capped(&mut st.recent_speeds, speed, self.config.recent_capacity);
        push_capped(
            &mut st.speed_history,
            SpeedSample { speed, timestamp_ms: fix.timestamp_ms },
            self.config.history_capacity,
        );
        push_capped(&mut st.trail, TrailPoint::from(&fix), self.config.trail_capacity);
        st.average_speed_kmh = st.recent_speeds.iter().sum::<f64>() / st.recent_speeds.len() as f64;

        st.accuracy_m = fix.accuracy_m;
        st.altitude_m = fix.altitude_m;
        st.first_timestamp_ms.get_or_insert(fix.timestamp_ms);
        st.last_timestamp_ms = Some(fix.timestamp_ms);

        // 8) vaktbikkje: full historikk med bare nuller => frisk kontekst
        let watchdog_reset = st.recent_speeds.len() >= self.config.recent_capacity
            && st.recent_speeds.iter().all(|v| *v == 0.0);
        if watchdog_reset {
            st.recent_speeds.clear();
            st.last_fix = None;
            self.metrics.watchdog_resets.inc();
            info!("vaktbikkje: {} nuller på rad, nullstiller estimeringskontekst", self.config.recent_capacity);
        } else {
            // 9)
            st.last_fix = Some(fix);
        }

        self.status = GpsStatus::Signal(SignalQuality::from_accuracy(fix.accuracy_m));
        self.metrics.fixes_accepted.inc();

        AcceptOutcome::Accepted(FixUpdate {
            estimate,
            rule: smoothed.rule,
            smoothed_kmh: speed,
            published,
            distance,
            watchdog_reset,
        })
    }

    fn integrate_distance(&mut self, prior: Option<&Fix>, fix: &Fix) -> DistanceStep {
        let Some(prior) = prior else {
            return DistanceStep::NoPrior;
        };

        // manglende nøyaktighet regnes som 0
        let accuracy_m = fix.accuracy_m.unwrap_or(0.0);
        if accuracy_m >= self.config.accuracy_gate_m {
            return DistanceStep::LowAccuracy { accuracy_m };
        }

        let meters = fix_distance_km(prior, fix) * 1000.0;
        if meters <= 0.0 {
            return DistanceStep::Stationary;
        }
        if meters >= self.config.max_step_m {
            debug!("GPS-hopp på {:.1} m forkastet", meters);
            self.metrics.distance_jumps.inc();
            return DistanceStep::Jump { meters };
        }

        self.state.total_distance_km += meters / 1000.0;
        DistanceStep::Integrated { meters }
    }

    // ── utgang ─────────────────────────────────────────────────────────────

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub fn status(&self) -> &GpsStatus {
        &self.status
    }

    pub fn speed_unit(&self) -> SpeedUnit {
        self.speed_unit
    }

    pub fn distance_unit(&self) -> DistanceUnit {
        self.distance_unit
    }

    /// Verdier konvertert til valgt visningsenhet.
    pub fn snapshot(&self) -> TripSnapshot {
        let st = &self.state;
        let su = self.speed_unit;
        let elapsed_secs = match (st.first_timestamp_ms, st.last_timestamp_ms) {
            (Some(a), Some(b)) => b.saturating_sub(a) as f64 / 1000.0,
            _ => 0.0,
        };

        TripSnapshot {
            current_speed: su.from_kmh(st.current_speed_kmh),
            max_speed: su.from_kmh(st.max_speed_kmh),
            average_speed: su.from_kmh(st.average_speed_kmh),
            total_distance: self.distance_unit.from_km(st.total_distance_km),
            speed_unit: su,
            distance_unit: self.distance_unit,
            speed_history: st
                .speed_history
                .iter()
                .map(|s| SpeedSample { speed: su.from_kmh(s.speed), timestamp_ms: s.timestamp_ms })
                .collect(),
            trail: st.trail.iter().copied().collect(),
            accuracy_m: st.accuracy_m,
            altitude_m: st.altitude_m,
            status: self.status.to_string(),
            tracking: self.tracking,
            started_at: self.started_at,
            elapsed_secs,
        }
    }
}
