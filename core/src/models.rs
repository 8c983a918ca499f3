use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, FixError};
use crate::geo::KM_TO_MILES;

/// Validert GPS-fix. Koordinater er alltid endelige og innenfor gyldig område.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub latitude: f64,      // grader
    pub longitude: f64,     // grader
    pub speed_ms: Option<f64>,    // rapportert fart (m/s)
    pub accuracy_m: Option<f64>,  // meter, ≥ 0
    pub altitude_m: Option<f64>,  // meter
    pub timestamp_ms: u64,  // monoton klokke
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64, timestamp_ms: u64) -> Self {
        Self {
            latitude,
            longitude,
            speed_ms: None,
            accuracy_m: None,
            altitude_m: None,
            timestamp_ms,
        }
    }

    pub fn with_speed(mut self, speed_ms: f64) -> Self {
        self.speed_ms = Some(speed_ms);
        self
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    /// Rapportert fart brukes kun når den er endelig og positiv.
    #[inline]
    pub fn trusted_speed_ms(&self) -> Option<f64> {
        self.speed_ms.filter(|v| v.is_finite() && *v > 0.0)
    }

    /// Felles sjekk for alle innganger: koordinater må være endelige og innenfor
    /// gyldig område. Ugyldig fart/nøyaktighet/høyde droppes til `None`.
    pub fn validate(self) -> Result<Self, FixError> {
        if !self.latitude.is_finite() || self.latitude.abs() > 90.0 {
            return Err(FixError::OutOfRange { field: "latitude", value: self.latitude });
        }
        if !self.longitude.is_finite() || self.longitude.abs() > 180.0 {
            return Err(FixError::OutOfRange { field: "longitude", value: self.longitude });
        }

        Ok(Fix {
            speed_ms: self.speed_ms.filter(|v| v.is_finite()),
            accuracy_m: self.accuracy_m.filter(|v| v.is_finite() && *v >= 0.0),
            altitude_m: self.altitude_m.filter(|v| v.is_finite()),
            ..self
        })
    }

    /// Sekunder siden `prior` (negativ hvis `prior` er nyere).
    #[inline]
    pub fn seconds_since(&self, prior: &Fix) -> f64 {
        (self.timestamp_ms as f64 - prior.timestamp_ms as f64) / 1000.0
    }
}

// Tolerant inngang: eldre klienter bruker lat/lon/speed/accuracy osv.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "lon", alias = "lng")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "speed")]
    pub speed_ms: Option<f64>,
    #[serde(default, alias = "accuracy")]
    pub accuracy_m: Option<f64>,
    #[serde(default, alias = "altitude", alias = "alt")]
    pub altitude_m: Option<f64>,
    #[serde(default, alias = "timestamp")]
    pub timestamp_ms: Option<u64>,
}

impl RawFix {
    pub fn from_json(txt: &str) -> Result<Self, FixError> {
        let mut de = serde_json::Deserializer::from_str(txt);
        serde_path_to_error::deserialize(&mut de).map_err(|e| FixError::Parse {
            path: e.path().to_string(),
            message: e.inner().to_string(),
        })
    }
}

impl TryFrom<RawFix> for Fix {
    type Error = FixError;

    fn try_from(raw: RawFix) -> Result<Self, Self::Error> {
        let latitude = raw.latitude.ok_or(FixError::MissingField("latitude"))?;
        let longitude = raw.longitude.ok_or(FixError::MissingField("longitude"))?;
        let timestamp_ms = raw.timestamp_ms.ok_or(FixError::MissingField("timestamp_ms"))?;

        Fix {
            latitude,
            longitude,
            speed_ms: raw.speed_ms,
            accuracy_m: raw.accuracy_m,
            altitude_m: raw.altitude_m,
            timestamp_ms,
        }
        .validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    #[default]
    Kmh,
    Mph,
}

impl SpeedUnit {
    /// Konverterer fra intern km/h til denne enheten.
    pub fn from_kmh(self, kmh: f64) -> f64 {
        match self {
            SpeedUnit::Kmh => kmh,
            SpeedUnit::Mph => kmh * KM_TO_MILES,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SpeedUnit::Kmh => SpeedUnit::Mph,
            SpeedUnit::Mph => SpeedUnit::Kmh,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedUnit::Kmh => "km/h",
            SpeedUnit::Mph => "mph",
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kmh" | "km/h" => Ok(SpeedUnit::Kmh),
            "mph" => Ok(SpeedUnit::Mph),
            other => Err(ConfigError::Invalid {
                field: "speed_unit",
                reason: format!("ukjent enhet '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
    Miles,
}

impl DistanceUnit {
    pub fn from_km(self, km: f64) -> f64 {
        match self {
            DistanceUnit::Km => km,
            DistanceUnit::Miles => km * KM_TO_MILES,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DistanceUnit::Km => DistanceUnit::Miles,
            DistanceUnit::Miles => DistanceUnit::Km,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DistanceUnit::Km => "km",
            DistanceUnit::Miles => "miles",
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "km" => Ok(DistanceUnit::Km),
            "mi" | "mile" | "miles" => Ok(DistanceUnit::Miles),
            other => Err(ConfigError::Invalid {
                field: "distance_unit",
                reason: format!("ukjent enhet '{other}'"),
            }),
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ett punkt i fartsgrafen. Internt alltid km/h; i snapshot i visningsenhet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub speed: f64,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp_ms: u64,
    pub accuracy_m: Option<f64>,
}

impl From<&Fix> for TrailPoint {
    fn from(fix: &Fix) -> Self {
        Self {
            latitude: fix.latitude,
            longitude: fix.longitude,
            timestamp_ms: fix.timestamp_ms,
            accuracy_m: fix.accuracy_m,
        }
    }
}

/// Skrivebeskyttet øyeblikksbilde for presentasjonslaget (verdier i visningsenhet).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSnapshot {
    pub current_speed: f64,
    pub max_speed: f64,
    pub average_speed: f64,
    pub total_distance: f64,
    pub speed_unit: SpeedUnit,
    pub distance_unit: DistanceUnit,
    pub speed_history: Vec<SpeedSample>,
    pub trail: Vec<TrailPoint>,
    pub accuracy_m: Option<f64>,
    pub altitude_m: Option<f64>,
    pub status: String,
    pub tracking: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_secs: f64,
}
