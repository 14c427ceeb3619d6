//! Theme-specific mapping from noise samples to colours.

use crate::color::{channel, Rgb, Rgba};
use crate::theme::Theme;

/// Inclusive channel band a theme's gradient stops are confined to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub lo: u8,
    pub hi: u8,
}

impl Band {
    pub const fn contains(self, v: u8) -> bool {
        v >= self.lo && v <= self.hi
    }
}

/// Per-channel bands `(r, g, b)` for the base gradient.
pub const fn bands(theme: Theme) -> [Band; 3] {
    match theme {
        Theme::Light => [
            Band { lo: 240, hi: 255 },
            Band { lo: 240, hi: 255 },
            Band { lo: 245, hi: 255 },
        ],
        Theme::Dark => [
            Band { lo: 12, hi: 28 },
            Band { lo: 12, hi: 28 },
            Band { lo: 18, hi: 38 },
        ],
    }
}

/// Colour of one base-gradient stop from two decorrelated noise samples.
pub fn stop_color(theme: Theme, n1: f64, n2: f64) -> Rgb {
    match theme {
        Theme::Light => {
            let base = 248.0 + n1 * 8.0;
            let base2 = 249.0 + n2 * 6.0;
            Rgb::new(
                channel(base, 240.0, 255.0),
                channel(base2, 240.0, 255.0),
                channel(base + 2.0, 245.0, 255.0),
            )
        }
        Theme::Dark => {
            // purple-leaning: blue rides above red
            let base = 18.0 + n1 * 6.0;
            let base2 = 18.0 + n2 * 4.0;
            Rgb::new(
                channel(base, 12.0, 28.0),
                channel(base2, 12.0, 28.0),
                channel(base + 8.0 + n2 * 4.0, 18.0, 38.0),
            )
        }
    }
}

pub const MIN_OVERLAY_OPACITY: f64 = 0.03;
pub const MAX_OVERLAY_OPACITY: f64 = 0.07;

/// Overlay opacity for a noise sample in `[-1, 1]`; lands in `[0.03, 0.07]`.
pub fn overlay_opacity(n: f64) -> f64 {
    (MIN_OVERLAY_OPACITY + (n.clamp(-1.0, 1.0) + 1.0) * 0.02)
        .clamp(MIN_OVERLAY_OPACITY, MAX_OVERLAY_OPACITY)
}

/// Three stops of the radial overlay, centre to rim.
pub fn overlay_stops(theme: Theme, opacity: f64) -> [(f64, Rgba); 3] {
    match theme {
        Theme::Dark => [
            (0.0, Rgba::new(60, 50, 80, opacity * 1.5)),
            (0.5, Rgba::new(40, 35, 60, opacity)),
            (1.0, Rgba::new(20, 20, 30, 0.0)),
        ],
        Theme::Light => [
            (0.0, Rgba::new(250, 251, 252, opacity)),
            (0.5, Rgba::new(248, 249, 250, opacity * 0.7)),
            (1.0, Rgba::new(246, 247, 248, 0.0)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_midpoint() {
        assert_eq!(stop_color(Theme::Light, 0.0, 0.0), Rgb::new(248, 249, 250));
    }

    #[test]
    fn dark_midpoint() {
        assert_eq!(stop_color(Theme::Dark, 0.0, 0.0), Rgb::new(18, 18, 26));
    }

    #[test]
    fn extremes_hit_band_edges() {
        assert_eq!(stop_color(Theme::Light, 1.0, 1.0), Rgb::new(255, 255, 255));
        assert_eq!(stop_color(Theme::Light, -1.0, -1.0), Rgb::new(240, 243, 245));
        assert_eq!(stop_color(Theme::Dark, 1.0, 1.0), Rgb::new(24, 22, 36));
        assert_eq!(stop_color(Theme::Dark, -1.0, -1.0), Rgb::new(12, 14, 18));
    }

    #[test]
    fn overlay_opacity_range() {
        assert_eq!(overlay_opacity(-1.0), 0.03);
        assert!((overlay_opacity(1.0) - 0.07).abs() < 1e-12);
        assert!((overlay_opacity(0.0) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn overlay_fades_to_transparent() {
        for theme in [Theme::Light, Theme::Dark] {
            let stops = overlay_stops(theme, 0.05);
            assert_eq!(stops[2].1.a, 0.0);
            assert_eq!(stops[0].0, 0.0);
            assert_eq!(stops[2].0, 1.0);
        }
        assert!((overlay_stops(Theme::Dark, 0.04)[0].1.a - 0.06).abs() < 1e-12);
    }
}
