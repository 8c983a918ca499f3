//! Speedtrack core: gjør støyende GPS-fixer om til stabil fart, maksfart,
//! snittfart og tripdistanse. Ren, synkron pipeline, én fix om gangen.

pub mod config;
pub mod error;
pub mod estimator;
pub mod geo;
pub mod metrics;
pub mod models;
pub mod report;
pub mod smoothing;
pub mod source;
pub mod status;
pub mod tracker;

#[cfg(feature = "python")]
pub mod py;

pub use config::{load_config, save_config, TrackerConfig};
pub use error::{AcquisitionError, ConfigError, FixError, TrackerError};
pub use estimator::{estimate_speed, EstimateMethod, EstimatorConfig, SpeedEstimate};
pub use geo::{fix_distance_km, haversine_km};
pub use metrics::PipelineMetrics;
pub use models::{DistanceUnit, Fix, RawFix, SpeedSample, SpeedUnit, TrailPoint, TripSnapshot};
pub use smoothing::{smooth_speed, SmootherConfig, Smoothed, SmoothingRule};
pub use source::{fix_channel, FixEvent, FixReceiver, FixSender, FixSource, ReplaySource, SimulatedSource};
pub use status::{GpsStatus, SignalQuality};
pub use tracker::{AcceptOutcome, DistanceStep, FixUpdate, PipelineState, SkipReason, SpeedTracker};
