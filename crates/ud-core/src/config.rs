//! Engine configuration: label offsets and marker dimensions.
//!
//! Values are in canvas units. Every field has a default, so a partial JSON
//! object only overrides what it names.

use serde::{Deserialize, Serialize};

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for connector geometry and label placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Vertical lift of the relationship name above the line midpoint. Default: **8**.
    pub name_label_margin: f64,

    /// Distance of a multiplicity label from the line, along its normal. Default: **10**.
    pub multiplicity_margin: f64,

    /// Distance of a multiplicity label from its endpoint, along the line. Default: **15**.
    pub multiplicity_inset: f64,

    /// Bounding-box width of the aggregation/composition diamond. Default: **20**.
    pub diamond_width: f64,

    /// Bounding-box height of the aggregation/composition diamond. Default: **12**.
    pub diamond_height: f64,

    /// Side length of the inheritance arrowhead. Default: **14**.
    pub arrow_size: f64,

    /// Half-angle of the inheritance arrowhead, in radians. Default: **0.4**.
    pub arrow_spread: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name_label_margin: 8.0,
            multiplicity_margin: 10.0,
            multiplicity_inset: 15.0,
            diamond_width: 20.0,
            diamond_height: 12.0,
            arrow_size: 14.0,
            arrow_spread: 0.4,
        }
    }
}

impl EngineConfig {
    /// Load configuration overrides from a JSON object.
    ///
    /// # Errors
    /// Returns the `serde_json` error if the input is not a valid config object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
