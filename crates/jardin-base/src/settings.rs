use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tuning for touch interaction, placement and grounding.
///
/// Times are in seconds, distances on screen in pixels and in the scene in
/// meters. Missing fields in JSON fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Layer that placed objects live on and that selection raycasts hit.
    pub placeable_layer: String,
    /// Layer of the detected real-world surfaces.
    pub environment_layer: String,
    /// Scale change per pixel of pinch distance change.
    pub scale_sensitivity: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub rotation_speed: f32,
    /// Per-frame finger travel that separates a resting finger from a moving one.
    pub rotation_drag_threshold: f32,
    pub double_tap_threshold: f64,
    pub placement_cooldown: f64,
    /// Minimum age of a catalog selection before a tap may place it.
    pub settle_delay: f64,
    /// Height above the object origin the grounding probe starts from.
    pub grounding_probe_lift: f32,
    pub grounding_probe_range: f32,
    pub highlight_color: [f32; 4],
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            placeable_layer: "Placeable".to_string(),
            environment_layer: "Environment".to_string(),
            scale_sensitivity: 0.001,
            min_scale: 0.1,
            max_scale: 2.0,
            rotation_speed: 1.0,
            rotation_drag_threshold: 2.0,
            double_tap_threshold: 0.3,
            placement_cooldown: 0.2,
            settle_delay: 0.5,
            grounding_probe_lift: 0.5,
            grounding_probe_range: 2.0,
            highlight_color: [1.0, 0.92, 0.016, 1.0],
        }
    }
}

impl InteractionSettings {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.placeable_layer.trim().is_empty() {
            return Err(Error::MissingConfiguration(
                "placeable_layer is empty".to_string(),
            ));
        }
        if self.environment_layer.trim().is_empty() {
            return Err(Error::MissingConfiguration(
                "environment_layer is empty".to_string(),
            ));
        }
        ensure_positive("min_scale", self.min_scale as f64)?;
        if self.max_scale < self.min_scale {
            return Err(Error::InvalidParameter(
                "max_scale must be >= min_scale".to_string(),
            ));
        }
        ensure_non_negative("scale_sensitivity", self.scale_sensitivity as f64)?;
        ensure_non_negative("rotation_speed", self.rotation_speed as f64)?;
        ensure_non_negative("rotation_drag_threshold", self.rotation_drag_threshold as f64)?;
        ensure_non_negative("double_tap_threshold", self.double_tap_threshold)?;
        ensure_non_negative("placement_cooldown", self.placement_cooldown)?;
        ensure_non_negative("settle_delay", self.settle_delay)?;
        ensure_non_negative("grounding_probe_lift", self.grounding_probe_lift as f64)?;
        ensure_positive("grounding_probe_range", self.grounding_probe_range as f64)?;
        Ok(())
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) {
        return Err(Error::InvalidParameter(format!("{name} must be > 0")));
    }
    Ok(())
}

fn ensure_non_negative(name: &str, value: f64) -> Result<()> {
    if !(value >= 0.0) {
        return Err(Error::InvalidParameter(format!("{name} must be >= 0")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() -> Result<()> {
        InteractionSettings::default().validate()
    }

    #[test]
    fn partial_json_keeps_defaults() -> Result<()> {
        let settings = InteractionSettings::from_json_str(r#"{ "max_scale": 3.5 }"#)?;
        assert_eq!(settings.max_scale, 3.5);
        assert_eq!(settings.min_scale, 0.1);
        assert_eq!(settings.placeable_layer, "Placeable");
        Ok(())
    }

    #[test]
    fn inverted_scale_bounds_are_rejected() {
        let result = InteractionSettings::from_json_str(r#"{ "min_scale": 2.0, "max_scale": 1.0 }"#);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn blank_layer_is_missing_configuration() {
        let result = InteractionSettings::from_json_str(r#"{ "environment_layer": " " }"#);
        assert!(matches!(result, Err(Error::MissingConfiguration(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        let result = InteractionSettings::from_json_str("{ nope");
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
