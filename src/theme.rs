use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::color::Rgb;
use crate::error::BackdropError;

/// Colour mode the backdrop is painted in.
///
/// Captured once per activation; a change of theme requires tearing the
/// backdrop down and activating it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Solid colour shown behind the canvas before the first frame paints.
    pub const fn fallback_background(self) -> Rgb {
        match self {
            Self::Light => Rgb::new(248, 249, 250),
            Self::Dark => Rgb::new(18, 18, 22),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(BackdropError::InvalidConfig(format!(
                "unknown theme {other:?} (expected \"light\" or \"dark\")"
            ))),
        }
    }
}
