//! Error types for the cursor effect.
//!
//! The follower itself never fails: a missing target element is a silent
//! no-op. Errors only surface at the edges, when reading configuration or
//! wiring the effect into the browser. All errors implement `Serialize` so
//! they cross the JS boundary as plain message strings.

use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Main error type for cursor effect operations.
#[derive(Error, Debug)]
pub enum CursorError {
    /// No global `window` (e.g. running outside a browser)
    #[error("No window available")]
    NoWindow,

    /// Window has no document attached
    #[error("No document available")]
    NoDocument,

    /// Configuration object could not be read
    #[error("Invalid cursor config: {0}")]
    InvalidConfig(String),

    /// A DOM call was rejected by the browser
    #[error("DOM error: {0}")]
    Dom(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Serialize for CursorError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl CursorError {
    /// Wrap a rejected DOM call, keeping whatever message JS gave us.
    pub fn dom(context: &str, err: JsValue) -> Self {
        let detail = err
            .as_string()
            .unwrap_or_else(|| format!("{:?}", err));
        CursorError::Dom(format!("{}: {}", context, detail))
    }
}

impl From<serde_wasm_bindgen::Error> for CursorError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        CursorError::InvalidConfig(err.to_string())
    }
}

impl From<CursorError> for JsValue {
    fn from(err: CursorError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Type alias for Results using CursorError.
pub type CursorResult<T> = Result<T, CursorError>;
