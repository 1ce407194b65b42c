//! Widget configuration.
//!
//! Supplied by the host page as a JSON object. Every field is optional and
//! falls back to the defaults below; an empty string means "all defaults".

use crate::error::ConfigError;
use crate::export::EXPORT_FILENAME;
use crate::geo::EARTH_RADIUS_M;
use crate::model::LatLng;
use serde::{Deserialize, Serialize};

// ─── Config ───────────────────────────────────────────────────────────────

/// Initial map view and tile source, consumed by the JS map glue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapViewConfig {
    pub center: LatLng,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(51.505, -0.09),
            zoom: 13,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                .to_string(),
        }
    }
}

/// Configuration for the annotation widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub map: MapViewConfig,

    /// Filename offered by the export download. Default: `annotations.geojson`.
    pub export_filename: String,

    /// Decimals shown on measurement labels. Default: **2**.
    pub distance_decimals: usize,

    /// Sphere radius used for every distance. Default: 6 371 000 m.
    pub earth_radius_m: f64,

    /// First annotation id. `None` lets the host choose (the browser bridge
    /// uses the current epoch milliseconds).
    pub id_seed: Option<u64>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            map: MapViewConfig::default(),
            export_filename: EXPORT_FILENAME.to_string(),
            distance_decimals: 2,
            earth_radius_m: EARTH_RADIUS_M,
            id_seed: None,
        }
    }
}

impl WidgetConfig {
    /// Parse and validate a JSON config. Blank input yields the defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.export_filename.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "exportFilename",
                message: "must not be empty".to_string(),
            });
        }
        if !(self.earth_radius_m.is_finite() && self.earth_radius_m > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "earthRadiusM",
                message: format!("must be a positive number, got {}", self.earth_radius_m),
            });
        }
        if self.distance_decimals > 10 {
            return Err(ConfigError::InvalidValue {
                field: "distanceDecimals",
                message: format!("must be at most 10, got {}", self.distance_decimals),
            });
        }
        Ok(())
    }
}
