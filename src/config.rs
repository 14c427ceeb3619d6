//! Backdrop options, deserialized from the JSON the page passes in.

use serde::Deserialize;

use crate::error::BackdropError;
use crate::theme::Theme;

/// Multiplier from host milliseconds to noise-time units. One visual cycle
/// takes minutes.
pub const DEFAULT_TIME_SCALE: f64 = 0.000_08;

/// Spatial frequency of the noise lookup, per pixel.
pub const DEFAULT_NOISE_SCALE: f64 = 0.003;

/// Number of gradient segments; the gradient has `stops + 1` colour stops.
pub const DEFAULT_STOPS: u32 = 10;

/// Upper bounds accepted by [`BackdropConfig::validate`].
pub const MAX_TIME_SCALE: f64 = 1.0;
pub const MAX_NOISE_SCALE: f64 = 1.0;
pub const MAX_STOPS: u32 = 256;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct BackdropConfig {
    pub theme: Theme,
    pub time_scale: f64,
    pub noise_scale: f64,
    pub stops: u32,
    /// Fixed noise seed. `None` reseeds randomly on every activation.
    pub seed: Option<u32>,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            time_scale: DEFAULT_TIME_SCALE,
            noise_scale: DEFAULT_NOISE_SCALE,
            stops: DEFAULT_STOPS,
            seed: None,
        }
    }
}

impl BackdropConfig {
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Parse and validate. An empty or whitespace-only string yields defaults.
    pub fn from_json(json: &str) -> Result<Self, BackdropError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BackdropError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BackdropError> {
        if !(self.time_scale > 0.0 && self.time_scale <= MAX_TIME_SCALE) {
            return Err(BackdropError::InvalidConfig(format!(
                "timeScale must be in (0, {MAX_TIME_SCALE}], got {}",
                self.time_scale
            )));
        }
        if !(self.noise_scale > 0.0 && self.noise_scale <= MAX_NOISE_SCALE) {
            return Err(BackdropError::InvalidConfig(format!(
                "noiseScale must be in (0, {MAX_NOISE_SCALE}], got {}",
                self.noise_scale
            )));
        }
        if !(1..=MAX_STOPS).contains(&self.stops) {
            return Err(BackdropError::InvalidConfig(format!(
                "stops must be in 1..={MAX_STOPS}, got {}",
                self.stops
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(BackdropConfig::from_json("  ").unwrap(), BackdropConfig::default());
        assert_eq!(BackdropConfig::from_json("{}").unwrap(), BackdropConfig::default());
    }

    #[test]
    fn camel_case_fields() {
        let cfg = BackdropConfig::from_json(
            r#"{"theme":"dark","timeScale":0.001,"noiseScale":0.01,"stops":4,"seed":7}"#,
        )
        .unwrap();
        assert_eq!(cfg.theme, Theme::Dark);
        assert_eq!(cfg.time_scale, 0.001);
        assert_eq!(cfg.noise_scale, 0.01);
        assert_eq!(cfg.stops, 4);
        assert_eq!(cfg.seed, Some(7));
    }

    #[test]
    fn accepts_upper_bounds() {
        let cfg = BackdropConfig::from_json(r#"{"timeScale":1,"noiseScale":1,"stops":256}"#)
            .unwrap();
        assert_eq!(cfg.stops, MAX_STOPS);
    }

    #[test]
    fn rejects_bad_values() {
        for bad in [
            r#"{"theme":"sepia"}"#,
            r#"{"timeScale":0}"#,
            r#"{"noiseScale":-1}"#,
            r#"{"stops":0}"#,
            r#"{"stops":257}"#,
            r#"{"stops":4294967295}"#,
            r#"{"noiseScale":1e17}"#,
            r#"{"timeScale":2.5}"#,
            r#"{"colour":"red"}"#,
            "not json",
        ] {
            assert!(
                matches!(BackdropConfig::from_json(bad), Err(BackdropError::InvalidConfig(_))),
                "{bad} should be rejected"
            );
        }
    }
}
