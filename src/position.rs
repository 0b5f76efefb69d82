//! Pointer position and the centering transform.

/// Last known pointer position in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Top-left corner that centers an element of `width` x `height` on
    /// this position.
    pub fn centered_origin(&self, width: f64, height: f64) -> (f64, f64) {
        (self.x - width / 2.0, self.y - height / 2.0)
    }

    /// CSS transform that centers an element of the given rendered size on
    /// this position.
    pub fn centered_transform(&self, width: f64, height: f64) -> String {
        let (left, top) = self.centered_origin(width, height);
        format!("translate({}px, {}px)", css_number(left), css_number(top))
    }
}

/// Normalize a coordinate before formatting. `Display` already drops the
/// fraction of integral values; this also turns `-0` into `0`.
fn css_number(value: f64) -> f64 {
    // -0.0 + 0.0 == +0.0
    value + 0.0
}
