use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Insufficient data: {found} classifiable players, need at least {required}")]
    InsufficientData { found: usize, required: usize },

    #[error("Degenerate geometry: x spread {x_spread_px}px, y spread {y_spread_px}px; scale unresolved")]
    DegenerateGeometry { x_spread_px: f64, y_spread_px: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MapError {
    /// True when re-invoking with a different batch could succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            MapError::InsufficientData { .. } => true,
            MapError::DegenerateGeometry { .. } => true,
            MapError::InvalidInput(_) => true,
            MapError::Config(_) => false,
            MapError::Serialization(_) => false,
        }
    }

    /// Stable machine-readable code for API envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            MapError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            MapError::DegenerateGeometry { .. } => "DEGENERATE_GEOMETRY",
            MapError::InvalidInput(_) => "INVALID_INPUT",
            MapError::Config(_) => "CONFIG",
            MapError::Serialization(_) => "SERIALIZATION",
        }
    }
}

impl From<serde_yaml::Error> for MapError {
    fn from(err: serde_yaml::Error) -> Self {
        MapError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
