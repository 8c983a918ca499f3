use std::fmt;

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Tellere for filtreringsbeslutninger i pipelinen. Ett register per tracker,
/// så flere trackere (og parallelle tester) ikke deler tellere.
#[derive(Clone)]
pub struct PipelineMetrics {
    registry: Registry,
    pub fixes_accepted: IntCounter,
    pub fixes_ignored: IntCounter,
    pub fixes_skipped: IntCounter,
    pub outliers_rejected: IntCounter,
    pub implausible_speeds: IntCounter,
    pub distance_jumps: IntCounter,
    pub watchdog_resets: IntCounter,
    pub acquisition_errors: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, prometheus::Error> {
    let c = IntCounter::new(name, help)?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl PipelineMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        Ok(Self {
            fixes_accepted: counter(&registry, "speedtrack_fixes_accepted_total", "Fixes processed by the pipeline")?,
            fixes_ignored: counter(&registry, "speedtrack_fixes_ignored_total", "Fixes received while not tracking")?,
            fixes_skipped: counter(&registry, "speedtrack_fixes_skipped_total", "Malformed or out-of-order fixes")?,
            outliers_rejected: counter(&registry, "speedtrack_outliers_rejected_total", "Speed candidates replaced by the recent mean")?,
            implausible_speeds: counter(&registry, "speedtrack_implausible_speeds_total", "Smoothed speeds outside the display range")?,
            distance_jumps: counter(&registry, "speedtrack_distance_jumps_rejected_total", "Distance steps dropped as GPS jumps")?,
            watchdog_resets: counter(&registry, "speedtrack_watchdog_resets_total", "Stuck-at-zero watchdog resets")?,
            acquisition_errors: counter(&registry, "speedtrack_acquisition_errors_total", "Fix acquisition failures reported by the source")?,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus tekstformat.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl fmt::Debug for PipelineMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineMetrics")
            .field("fixes_accepted", &self.fixes_accepted.get())
            .field("fixes_ignored", &self.fixes_ignored.get())
            .field("fixes_skipped", &self.fixes_skipped.get())
            .field("outliers_rejected", &self.outliers_rejected.get())
            .field("implausible_speeds", &self.implausible_speeds.get())
            .field("distance_jumps", &self.distance_jumps.get())
            .field("watchdog_resets", &self.watchdog_resets.get())
            .field("acquisition_errors", &self.acquisition_errors.get())
            .finish()
    }
}
