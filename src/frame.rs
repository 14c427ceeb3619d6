//! Pure per-frame computation: what a frame paints, independent of where.

use crate::color::Rgba;
use crate::field::NoiseField;
use crate::palette;
use crate::theme::Theme;

/// One `(offset, colour)` anchor of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Linear gradient from `(x0, y0)` to `(x1, y1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub stops: Vec<ColorStop>,
}

/// Two-circle radial gradient, canvas semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub x0: f64,
    pub y0: f64,
    pub r0: f64,
    pub x1: f64,
    pub y1: f64,
    pub r1: f64,
    pub stops: Vec<ColorStop>,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub width: u32,
    pub height: u32,
    pub base: LinearGradient,
    pub overlay: RadialGradient,
    pub overlay_opacity: f64,
}

/// Inputs of a frame besides the noise field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub theme: Theme,
    pub noise_scale: f64,
    pub stops: u32,
    pub width: u32,
    pub height: u32,
    /// Scaled elapsed time.
    pub t: f64,
}

// Decorrelates the second channel's samples from the first.
const SECOND_SAMPLE_OFFSET: (f64, f64) = (100.0, 50.0);

/// Colour of the base gradient at `position ∈ [0, 1]`.
pub fn base_stop(field: &NoiseField, params: &FrameParams, position: f64) -> ColorStop {
    let x = position * f64::from(params.width) * params.noise_scale;
    let y = position * f64::from(params.height) * params.noise_scale;
    let n1 = field.sample(x, y + params.t);
    let n2 = field.sample(
        x + SECOND_SAMPLE_OFFSET.0,
        y + params.t + SECOND_SAMPLE_OFFSET.1,
    );
    ColorStop {
        offset: position,
        color: palette::stop_color(params.theme, n1, n2).into(),
    }
}

pub fn plan_frame(field: &NoiseField, params: &FrameParams) -> FramePlan {
    let w = f64::from(params.width);
    let h = f64::from(params.height);
    let t = params.t;

    let segments = params.stops.max(1);
    let stops = (0..=segments)
        .map(|i| base_stop(field, params, f64::from(i) / f64::from(segments)))
        .collect();
    let base = LinearGradient {
        x0: 0.0,
        y0: 0.0,
        x1: w,
        y1: h,
        stops,
    };

    let overlay_opacity = palette::overlay_opacity(field.sample(t * 0.3, t * 0.4));
    let overlay = RadialGradient {
        x0: w * 0.3 + field.sample(t * 0.5, 0.0) * 100.0,
        y0: h * 0.4 + field.sample(0.0, t * 0.7) * 80.0,
        r0: 0.0,
        x1: w * 0.6,
        y1: h * 0.6,
        r1: w.max(h) * 0.8,
        stops: palette::overlay_stops(params.theme, overlay_opacity)
            .into_iter()
            .map(|(offset, color)| ColorStop { offset, color })
            .collect(),
    };

    FramePlan {
        width: params.width,
        height: params.height,
        base,
        overlay,
        overlay_opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(theme: Theme, t: f64) -> FrameParams {
        FrameParams {
            theme,
            noise_scale: 0.003,
            stops: 10,
            width: 1920,
            height: 1080,
            t,
        }
    }

    #[test]
    fn eleven_evenly_spaced_stops() {
        let field = NoiseField::new(3);
        let plan = plan_frame(&field, &params(Theme::Light, 0.0));
        assert_eq!(plan.base.stops.len(), 11);
        for (i, stop) in plan.base.stops.iter().enumerate() {
            assert!((stop.offset - i as f64 / 10.0).abs() < 1e-12);
            assert_eq!(stop.color.a, 1.0);
        }
    }

    #[test]
    fn gradient_spans_the_diagonal() {
        let field = NoiseField::new(3);
        let plan = plan_frame(&field, &params(Theme::Dark, 1.5));
        assert_eq!((plan.base.x0, plan.base.y0), (0.0, 0.0));
        assert_eq!((plan.base.x1, plan.base.y1), (1920.0, 1080.0));
        assert!((plan.overlay.x1 - 1152.0).abs() < 1e-9);
        assert!((plan.overlay.y1 - 648.0).abs() < 1e-9);
        assert_eq!(plan.overlay.r0, 0.0);
        assert!((plan.overlay.r1 - 1536.0).abs() < 1e-9);
    }

    #[test]
    fn overlay_centre_jitter_is_bounded() {
        let field = NoiseField::new(11);
        for k in 0..40 {
            let plan = plan_frame(&field, &params(Theme::Light, k as f64 * 0.37));
            assert!((plan.overlay.x0 - 576.0).abs() <= 100.0 + 1e-9);
            assert!((plan.overlay.y0 - 432.0).abs() <= 80.0 + 1e-9);
        }
    }

    #[test]
    fn first_stop_samples_origin() {
        let field = NoiseField::new(5);
        let p = params(Theme::Light, 0.25);
        let stop = base_stop(&field, &p, 0.0);
        let expected = palette::stop_color(
            Theme::Light,
            field.sample(0.0, 0.25),
            field.sample(100.0, 50.25),
        );
        assert_eq!(stop.color.rgb(), expected);
    }
}
