//! Style descriptor for the cursor element.
//!
//! `compute_styles` is a pure function of the configuration. `StyleMemo`
//! caches its result and only recomputes when one of the inputs changed,
//! comparing custom styles by their serialized form so a freshly built but
//! identical map does not count as a change.

use serde::ser::SerializeMap;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::{CursorConfig, CursorShape};

/// Stacking order that keeps the cursor above page content.
pub const CURSOR_Z_INDEX: &str = "9999";

/// Ordered mapping of style property names to values.
///
/// Names use JS style-object casing (`backgroundColor`). Use
/// [`StyleDescriptor::to_css_text`] to get declarations in CSS casing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDescriptor {
    properties: Vec<(String, String)>,
}

impl StyleDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing an existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.properties.push((name, value)),
        }
    }

    /// Remove a property, returning its value if it was set.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.properties.iter().position(|(n, _)| n == name)?;
        Some(self.properties.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Render as a CSS declaration block, e.g. `position: fixed; top: 0;`.
    pub fn to_css_text(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{}: {};", css_property_name(name), value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Serialize for StyleDescriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for (name, value) in &self.properties {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Convert a JS style-object name to its CSS property name.
///
/// `backgroundColor` becomes `background-color`, a leading capital marks a
/// vendor prefix (`WebkitTransform` becomes `-webkit-transform`), and custom
/// properties (`--accent`) are returned untouched.
pub fn css_property_name(name: &str) -> Cow<'_, str> {
    if name.starts_with("--") || !name.chars().any(|c| c.is_ascii_uppercase()) {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    // "ms" prefix is lowercase in JS but still a vendor prefix in CSS
    if name.starts_with("ms") && name[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        out.insert(0, '-');
    }
    Cow::Owned(out)
}

/// Format a number the way JS stringifies it, so infinities come out as
/// `Infinity` rather than Rust's `inf`.
fn js_number(value: f64) -> String {
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}Infinity", sign)
    } else {
        value.to_string()
    }
}

/// Compute the cursor element's style from configuration.
///
/// Custom styles are merged last and win over every computed property.
pub fn compute_styles(config: &CursorConfig) -> StyleDescriptor {
    let size = format!("{}px", js_number(config.size));

    let mut styles = StyleDescriptor::new();
    styles.set("position", "fixed");
    styles.set("top", "0");
    styles.set("left", "0");
    styles.set("width", size.clone());
    styles.set("height", size);
    styles.set("backgroundColor", config.color.clone());
    styles.set("borderRadius", config.shape.border_radius());
    styles.set(
        "transition",
        format!(
            "transform {} ease-out, top {}, left {}",
            config.follow_speed, config.transition_duration, config.transition_duration
        ),
    );
    styles.set("pointerEvents", "none");
    styles.set("zIndex", CURSOR_Z_INDEX);
    styles.set("willChange", "transform, top, left");

    for (name, value) in &config.custom_styles {
        styles.set(name.clone(), value.clone());
    }
    styles
}

/// Inputs the style depends on, in comparable form.
#[derive(Debug, Clone, PartialEq)]
struct StyleKey {
    // bit pattern, so NaN matches NaN and 0.0 differs from -0.0
    size_bits: u64,
    color: String,
    shape: CursorShape,
    transition_duration: String,
    follow_speed: String,
    custom_styles: String,
}

impl StyleKey {
    fn of(config: &CursorConfig) -> Self {
        Self {
            size_bits: config.size.to_bits(),
            color: config.color.clone(),
            shape: config.shape,
            transition_duration: config.transition_duration.clone(),
            follow_speed: config.follow_speed.clone(),
            custom_styles: fingerprint(&config.custom_styles),
        }
    }
}

fn fingerprint(custom_styles: &BTreeMap<String, String>) -> String {
    serde_json::to_string(custom_styles).unwrap_or_else(|e| {
        log::warn!("[Cursor] Failed to serialize custom styles: {}", e);
        String::new()
    })
}

/// Memoized style computation.
#[derive(Debug, Default)]
pub struct StyleMemo {
    cached: Option<(StyleKey, Rc<StyleDescriptor>)>,
    recomputations: usize,
}

impl StyleMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Styles for `config`. Returns the cached `Rc` when nothing changed.
    pub fn styles(&mut self, config: &CursorConfig) -> Rc<StyleDescriptor> {
        let key = StyleKey::of(config);
        if let Some((cached_key, styles)) = &self.cached {
            if *cached_key == key {
                return Rc::clone(styles);
            }
        }

        let styles = Rc::new(compute_styles(config));
        self.recomputations += 1;
        log::trace!("[Cursor] Styles recomputed ({})", self.recomputations);
        self.cached = Some((key, Rc::clone(&styles)));
        styles
    }

    /// How many times the styles were actually computed.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_styles() {
        let styles = compute_styles(&CursorConfig::default());
        assert_eq!(styles.get("position"), Some("fixed"));
        assert_eq!(styles.get("top"), Some("0"));
        assert_eq!(styles.get("left"), Some("0"));
        assert_eq!(styles.get("width"), Some("50px"));
        assert_eq!(styles.get("height"), Some("50px"));
        assert_eq!(styles.get("backgroundColor"), Some("black"));
        assert_eq!(styles.get("borderRadius"), Some("50%"));
        assert_eq!(
            styles.get("transition"),
            Some("transform 0.1s ease-out, top 0.1s, left 0.1s")
        );
        assert_eq!(styles.get("pointerEvents"), Some("none"));
        assert_eq!(styles.get("zIndex"), Some("9999"));
        assert_eq!(styles.get("willChange"), Some("transform, top, left"));
        assert_eq!(styles.len(), 11);
    }

    #[test]
    fn test_square_shape() {
        let config = CursorConfig {
            shape: CursorShape::Square,
            ..Default::default()
        };
        assert_eq!(compute_styles(&config).get("borderRadius"), Some("0%"));
    }

    #[test]
    fn test_transition_uses_both_durations() {
        let config = CursorConfig {
            follow_speed: "250ms".to_string(),
            transition_duration: "1s".to_string(),
            ..Default::default()
        };
        assert_eq!(
            compute_styles(&config).get("transition"),
            Some("transform 250ms ease-out, top 1s, left 1s")
        );
    }

    #[test]
    fn test_custom_styles_override_computed() {
        let config = CursorConfig::default()
            .with_custom_style("borderRadius", "4px")
            .with_custom_style("zIndex", "10")
            .with_custom_style("mixBlendMode", "difference");
        let styles = compute_styles(&config);

        assert_eq!(styles.get("borderRadius"), Some("4px"));
        assert_eq!(styles.get("zIndex"), Some("10"));
        assert_eq!(styles.get("mixBlendMode"), Some("difference"));
        // Overrides replace in place, new keys are appended
        assert_eq!(styles.len(), 12);
        assert_eq!(styles.iter().last(), Some(("mixBlendMode", "difference")));
    }

    #[test]
    fn test_fractional_and_negative_size() {
        let config = CursorConfig {
            size: 12.5,
            ..Default::default()
        };
        assert_eq!(compute_styles(&config).get("width"), Some("12.5px"));

        let config = CursorConfig {
            size: -8.0,
            ..Default::default()
        };
        assert_eq!(compute_styles(&config).get("height"), Some("-8px"));
    }

    #[test]
    fn test_infinite_size_matches_js_text() {
        let config = CursorConfig {
            size: f64::INFINITY,
            ..Default::default()
        };
        assert_eq!(compute_styles(&config).get("width"), Some("Infinitypx"));

        let config = CursorConfig {
            size: f64::NEG_INFINITY,
            ..Default::default()
        };
        assert_eq!(compute_styles(&config).get("height"), Some("-Infinitypx"));

        let config = CursorConfig {
            size: f64::NAN,
            ..Default::default()
        };
        assert_eq!(compute_styles(&config).get("width"), Some("NaNpx"));
    }

    #[test]
    fn test_descriptor_remove() {
        let mut styles = StyleDescriptor::new();
        styles.set("opacity", "0.5");
        styles.set("top", "0");
        assert_eq!(styles.remove("opacity"), Some("0.5".to_string()));
        assert_eq!(styles.remove("opacity"), None);
        assert_eq!(styles.len(), 1);
    }

    #[test]
    fn test_css_property_name() {
        assert_eq!(css_property_name("position"), "position");
        assert_eq!(css_property_name("backgroundColor"), "background-color");
        assert_eq!(css_property_name("zIndex"), "z-index");
        assert_eq!(css_property_name("WebkitTransform"), "-webkit-transform");
        assert_eq!(css_property_name("msTransform"), "-ms-transform");
        assert_eq!(css_property_name("--cursor-accent"), "--cursor-accent");
    }

    #[test]
    fn test_css_text() {
        let mut styles = StyleDescriptor::new();
        styles.set("position", "fixed");
        styles.set("pointerEvents", "none");
        assert_eq!(styles.to_css_text(), "position: fixed; pointer-events: none;");
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut styles = StyleDescriptor::new();
        styles.set("width", "50px");
        styles.set("backgroundColor", "red");
        let json = serde_json::to_string(&styles).unwrap();
        assert_eq!(json, r#"{"width":"50px","backgroundColor":"red"}"#);
    }

    #[test]
    fn test_memo_returns_same_rc_for_equal_config() {
        let mut memo = StyleMemo::new();
        let config = CursorConfig::default().with_custom_style("opacity", "0.8");

        let first = memo.styles(&config);
        // Structurally equal but freshly built custom styles
        let rebuilt = CursorConfig::default().with_custom_style("opacity", "0.8");
        let second = memo.styles(&rebuilt);

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(memo.recomputations(), 1);
    }

    #[test]
    fn test_memo_detects_custom_style_change() {
        let mut memo = StyleMemo::new();
        let first = memo.styles(&CursorConfig::default().with_custom_style("opacity", "0.8"));
        let second = memo.styles(&CursorConfig::default().with_custom_style("opacity", "0.5"));

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(second.get("opacity"), Some("0.5"));
        assert_eq!(memo.recomputations(), 2);
    }

    #[test]
    fn test_memo_detects_primitive_changes() {
        let mut memo = StyleMemo::new();
        let mut config = CursorConfig::default();
        memo.styles(&config);

        config.color = "red".to_string();
        assert_eq!(memo.styles(&config).get("backgroundColor"), Some("red"));

        config.size = 30.0;
        assert_eq!(memo.styles(&config).get("width"), Some("30px"));

        config.shape = CursorShape::Square;
        memo.styles(&config);
        memo.styles(&config);

        assert_eq!(memo.recomputations(), 4);
    }

    #[test]
    fn test_memo_nan_size_is_stable() {
        let mut memo = StyleMemo::new();
        let config = CursorConfig {
            size: f64::NAN,
            ..Default::default()
        };
        let first = memo.styles(&config);
        let second = memo.styles(&config);
        assert!(Rc::ptr_eq(&first, &second));
    }
}
