//! Core types for the geoid service.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Interpolation method for height queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Bilinear blend of the 4 surrounding samples.
    Bilinear,
    /// Bicubic least-squares fit over a 12-point stencil.
    #[default]
    Cubic,
}

impl Interpolation {
    /// Parse from string (case-insensitive). Unknown names fall back to cubic.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bilinear" | "linear" => Self::Bilinear,
            "cubic" | "bicubic" => Self::Cubic,
            _ => Self::Cubic,
        }
    }

    /// Select a method from the boolean flag used by `initialize`.
    pub fn from_cubic(cubic: bool) -> Self {
        if cubic {
            Self::Cubic
        } else {
            Self::Bilinear
        }
    }

    pub fn is_cubic(&self) -> bool {
        matches!(self, Self::Cubic)
    }

    /// Get the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bilinear => "bilinear",
            Self::Cubic => "cubic",
        }
    }
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serializable snapshot of a geoid view's provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoidMetadata {
    pub name: String,
    pub interpolation: Interpolation,
    pub width: usize,
    pub height: usize,
    pub offset: f64,
    pub scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_time: Option<NaiveDateTime>,
    /// Maximum interpolation error for the selected method, in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_error: Option<f64>,
    /// RMS interpolation error for the selected method, in meters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rms_error: Option<f64>,
}

impl GeoidMetadata {
    /// Serialize to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Registry statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Requests served from an already-loaded grid.
    pub hits: u64,
    /// Grids read from disk.
    pub loads: u64,
    /// Load attempts that failed.
    pub failures: u64,
    /// Grids currently cached.
    pub entries: usize,
}

impl RegistryStats {
    /// Fraction of requests served without reading a resource.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.loads + self.failures;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
