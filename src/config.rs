//! Cursor effect configuration.
//!
//! Appearance (size, color, shape) and motion feel (follow speed, position
//! transition) of the cursor element. Every field has a default, so callers
//! may pass any subset of options from JS. Values are not validated; they
//! flow into the rendered style verbatim.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use wasm_bindgen::JsValue;

use crate::error::CursorResult;

/// Shape of the cursor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorShape {
    /// Round cursor (the default).
    #[default]
    Circle,
    /// Square cursor with sharp corners.
    Square,
}

impl CursorShape {
    /// CSS `border-radius` producing this shape.
    pub fn border_radius(self) -> &'static str {
        match self {
            CursorShape::Circle => "50%",
            CursorShape::Square => "0%",
        }
    }
}

impl fmt::Display for CursorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorShape::Circle => write!(f, "circle"),
            CursorShape::Square => write!(f, "square"),
        }
    }
}

/// Options recognised by the cursor effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CursorConfig {
    /// Width and height of the cursor element in pixels.
    pub size: f64,

    /// Background color (any CSS color).
    pub color: String,

    /// Circle or square.
    pub shape: CursorShape,

    /// Duration of `top`/`left` transitions (CSS time, e.g. "0.1s").
    pub transition_duration: String,

    /// Duration of the eased transform transition that makes the element
    /// trail the pointer.
    pub follow_speed: String,

    /// Extra style properties, merged last. Keys use JS style-object naming
    /// (`borderRadius`, not `border-radius`).
    pub custom_styles: BTreeMap<String, String>,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            size: 50.0,
            color: "black".to_string(),
            shape: CursorShape::Circle,
            transition_duration: "0.1s".to_string(),
            follow_speed: "0.1s".to_string(),
            custom_styles: BTreeMap::new(),
        }
    }
}

impl CursorConfig {
    /// Parse a config from JSON text. Missing keys take their defaults.
    pub fn from_json(json: &str) -> CursorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config handed over from JS. `undefined` and `null` mean
    /// "use every default".
    pub fn from_js(value: JsValue) -> CursorResult<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_wasm_bindgen::from_value(value)?)
    }

    /// Builder-style override of a single custom style property.
    pub fn with_custom_style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_styles.insert(name.into(), value.into());
        self
    }
}
