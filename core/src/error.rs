use thiserror::Error;

/// Fix-kilden klarte ikke å levere en posisjon.
/// Vises kun som statusstreng, pipeline-tilstanden røres aldri.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    #[error("permission denied - check app permissions")]
    PermissionDenied,
    #[error("location unavailable - check GPS settings")]
    Unavailable,
    #[error("timeout - GPS taking too long to respond")]
    Timeout,
    #[error("GPS error: {0}")]
    Other(String),
}

impl AcquisitionError {
    /// W3C geolocation-koder: 1 = permission, 2 = unavailable, 3 = timeout.
    pub fn from_code(code: i32, message: &str) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::Unavailable,
            3 => Self::Timeout,
            _ if message.trim().is_empty() => Self::Other("unknown GPS error".into()),
            _ => Self::Other(message.to_string()),
        }
    }
}

/// Ugyldig fix-input (mangler koordinater o.l.). Fixen hoppes over.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixError {
    #[error("fix mangler feltet `{0}`")]
    MissingField(&'static str),
    #[error("fix-feltet `{field}` er utenfor gyldig område: {value}")]
    OutOfRange { field: &'static str, value: f64 },
    #[error("ugyldig fix-JSON ved {path}: {message}")]
    Parse { path: String, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("kunne ikke lese/skrive konfig {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("ugyldig konfig ved {path}: {message}")]
    Parse { path: String, message: String },
    #[error("ugyldig verdi for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Feil som kun kan oppstå når trackeren bygges.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}
