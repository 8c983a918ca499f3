use std::fmt;

use serde::Serialize;

use crate::error::AcquisitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalQuality {
    Excellent,
    Good,
    Poor,
    Unknown,
}

impl SignalQuality {
    /// < 5 m utmerket, < 10 m bra, ellers dårlig.
    pub fn from_accuracy(accuracy_m: Option<f64>) -> Self {
        match accuracy_m {
            Some(a) if a < 5.0 => SignalQuality::Excellent,
            Some(a) if a < 10.0 => SignalQuality::Good,
            Some(_) => SignalQuality::Poor,
            None => SignalQuality::Unknown,
        }
    }
}

/// GPS-status slik presentasjonslaget viser den.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpsStatus {
    Waiting,
    Acquiring,
    Signal(SignalQuality),
    Failed(AcquisitionError),
    Stopped,
}

impl fmt::Display for GpsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let txt = match self {
            GpsStatus::Waiting => "Waiting for GPS...",
            GpsStatus::Acquiring => "Acquiring GPS signal...",
            GpsStatus::Signal(SignalQuality::Excellent) => "Excellent GPS Signal",
            GpsStatus::Signal(SignalQuality::Good) => "Good GPS Signal",
            GpsStatus::Signal(SignalQuality::Poor) => "Poor GPS Signal",
            GpsStatus::Signal(SignalQuality::Unknown) => "GPS Signal",
            GpsStatus::Failed(AcquisitionError::PermissionDenied) => "Permission Denied",
            GpsStatus::Failed(AcquisitionError::Unavailable) => "Location Unavailable",
            GpsStatus::Failed(AcquisitionError::Timeout) => "GPS Timeout",
            GpsStatus::Failed(AcquisitionError::Other(_)) => "GPS Error",
            GpsStatus::Stopped => "GPS Stopped",
        };
        f.write_str(txt)
    }
}
