//! Drawing surfaces the backdrop paints into.
//!
//! The trait mirrors the subset of a canvas 2D context the backdrop needs:
//! backing-store sizing plus full-surface gradient fills. [`PixelSurface`] is
//! a software implementation used for headless rendering and tests; the
//! browser canvas lives in the wasm binding.

use crate::color::Rgba;
use crate::frame::{ColorStop, FramePlan, LinearGradient, RadialGradient};

pub trait Surface {
    /// Backing-store size in pixels.
    fn size(&self) -> (u32, u32);

    /// Set the backing-store size. Contents after a resize are unspecified.
    fn resize(&mut self, width: u32, height: u32);

    /// Fill the whole surface with a linear gradient, source-over.
    fn fill_linear(&mut self, gradient: &LinearGradient);

    /// Fill the whole surface with a radial gradient, source-over.
    fn fill_radial(&mut self, gradient: &RadialGradient);
}

/// Paint one frame: base gradient first, overlay on top.
pub fn paint<S: Surface + ?Sized>(surface: &mut S, plan: &FramePlan) {
    if surface.size() != (plan.width, plan.height) {
        surface.resize(plan.width, plan.height);
    }
    surface.fill_linear(&plan.base);
    surface.fill_radial(&plan.overlay);
}

/// Colour of a gradient at parameter `t`, pad-extended past the end stops.
/// Returned colour is straight (non-premultiplied) alpha.
///
/// Stops are assumed sorted by offset, as the frame planner emits them.
pub fn color_at(stops: &[ColorStop], t: f64) -> Option<Rgba> {
    let first = stops.first()?;
    let last = stops.last()?;
    if t <= first.offset {
        return Some(first.color);
    }
    if t >= last.offset {
        return Some(last.color);
    }
    let seg = stops
        .windows(2)
        .find(|pair| t >= pair[0].offset && t <= pair[1].offset)?;
    let (a, b) = (seg[0], seg[1]);
    let span = b.offset - a.offset;
    if span <= f64::EPSILON {
        return Some(b.color);
    }
    let k = (t - a.offset) / span;
    let alpha = a.color.a + (b.color.a - a.color.a) * k;
    if alpha <= 0.0 {
        return Some(Rgba::new(b.color.r, b.color.g, b.color.b, 0.0));
    }
    // canvas interpolates stops in premultiplied space
    let lerp = |x: u8, y: u8| {
        let px = f64::from(x) * a.color.a;
        let py = f64::from(y) * b.color.a;
        ((px + (py - px) * k) / alpha).round().clamp(0.0, 255.0) as u8
    };
    Some(Rgba::new(
        lerp(a.color.r, b.color.r),
        lerp(a.color.g, b.color.g),
        lerp(a.color.b, b.color.b),
        alpha,
    ))
}

/// Gradient parameter of a point on a two-circle radial gradient.
///
/// Follows canvas semantics: the largest `ω` whose interpolated circle passes
/// through the point with a non-negative radius. `None` means the point is
/// not covered and stays untouched.
pub fn radial_param(g: &RadialGradient, px: f64, py: f64) -> Option<f64> {
    let (cdx, cdy) = (g.x1 - g.x0, g.y1 - g.y0);
    let (pdx, pdy) = (px - g.x0, py - g.y0);
    let dr = g.r1 - g.r0;

    let a = cdx * cdx + cdy * cdy - dr * dr;
    let b = pdx * cdx + pdy * cdy + g.r0 * dr;
    let c = pdx * pdx + pdy * pdy - g.r0 * g.r0;

    let radius_ok = |w: f64| g.r0 + w * dr >= 0.0;

    if a.abs() < 1e-9 {
        if b.abs() < 1e-12 {
            return None;
        }
        let w = c / (2.0 * b);
        return radius_ok(w).then_some(w);
    }

    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let (w1, w2) = ((b + root) / a, (b - root) / a);
    let (hi, lo) = if w1 >= w2 { (w1, w2) } else { (w2, w1) };
    if radius_ok(hi) {
        Some(hi)
    } else if radius_ok(lo) {
        Some(lo)
    } else {
        None
    }
}

/// RGBA8 software surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; Self::byte_len(width, height)],
            width,
            height,
        }
    }

    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn fill_with(&mut self, mut shade: impl FnMut(f64, f64) -> Option<Rgba>) {
        let width = self.width as usize;
        if width == 0 {
            return;
        }
        for (row, line) in self.pixels.chunks_exact_mut(width * 4).enumerate() {
            let py = row as f64 + 0.5;
            for (col, px) in line.chunks_exact_mut(4).enumerate() {
                if let Some(src) = shade(col as f64 + 0.5, py) {
                    blend_over(px, src);
                }
            }
        }
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(Self::byte_len(width, height), 0);
    }

    fn fill_linear(&mut self, g: &LinearGradient) {
        let (dx, dy) = (g.x1 - g.x0, g.y1 - g.y0);
        let len2 = dx * dx + dy * dy;
        if len2 <= f64::EPSILON {
            // degenerate gradients paint nothing
            return;
        }
        self.fill_with(|x, y| color_at(&g.stops, ((x - g.x0) * dx + (y - g.y0) * dy) / len2));
    }

    fn fill_radial(&mut self, g: &RadialGradient) {
        if (g.x0 - g.x1).abs() < f64::EPSILON
            && (g.y0 - g.y1).abs() < f64::EPSILON
            && (g.r0 - g.r1).abs() < f64::EPSILON
        {
            return;
        }
        self.fill_with(|x, y| radial_param(g, x, y).and_then(|w| color_at(&g.stops, w)));
    }
}

/// Source-over composite of a straight-alpha colour onto an RGBA8 pixel.
fn blend_over(dst: &mut [u8], src: Rgba) {
    let sa = src.a.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = f64::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let mix = |s: u8, d: u8| {
        ((f64::from(s) * sa + f64::from(d) * da * (1.0 - sa)) / out_a).round() as u8
    };
    dst[0] = mix(src.r, dst[0]);
    dst[1] = mix(src.g, dst[1]);
    dst[2] = mix(src.b, dst[2]);
    dst[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(offset: f64, r: u8, a: f64) -> ColorStop {
        ColorStop {
            offset,
            color: Rgba::new(r, r, r, a),
        }
    }

    #[test]
    fn color_at_pads_and_interpolates() {
        let stops = [stop(0.0, 0, 1.0), stop(1.0, 200, 1.0)];
        assert_eq!(color_at(&stops, -3.0).unwrap().r, 0);
        assert_eq!(color_at(&stops, 4.0).unwrap().r, 200);
        let mid = color_at(&stops, 0.5).unwrap();
        assert_eq!(mid.r, 100);
        assert_eq!(mid.a, 1.0);
        assert!(color_at(&[], 0.5).is_none());
    }

    #[test]
    fn color_at_mixes_premultiplied() {
        // a transparent stop contributes no colour, only coverage
        let stops = [stop(0.0, 200, 1.0), stop(1.0, 0, 0.0)];
        let mid = color_at(&stops, 0.5).unwrap();
        assert_eq!(mid.r, 200);
        assert!((mid.a - 0.5).abs() < 1e-12);

        let stops = [stop(0.0, 100, 0.5), stop(1.0, 200, 1.0)];
        let mid = color_at(&stops, 0.5).unwrap();
        // (50 + 200) / 2 / 0.75
        assert_eq!(mid.r, 167);
        assert!((mid.a - 0.75).abs() < 1e-12);

        let stops = [stop(0.0, 10, 0.0), stop(1.0, 90, 0.0)];
        assert_eq!(color_at(&stops, 0.5).unwrap().a, 0.0);
    }

    #[test]
    fn resize_reallocates() {
        let mut s = PixelSurface::new(4, 4);
        s.resize(3, 7);
        assert_eq!(s.size(), (3, 7));
        assert_eq!(s.as_bytes().len(), 3 * 7 * 4);
        assert!(s.pixel(2, 6).is_some());
        assert!(s.pixel(3, 0).is_none());
    }

    #[test]
    fn linear_fill_is_opaque_and_monotone() {
        let mut s = PixelSurface::new(16, 1);
        s.fill_linear(&LinearGradient {
            x0: 0.0,
            y0: 0.0,
            x1: 16.0,
            y1: 0.0,
            stops: vec![stop(0.0, 0, 1.0), stop(1.0, 255, 1.0)],
        });
        let reds: Vec<u8> = (0..16).map(|x| s.pixel(x, 0).unwrap()[0]).collect();
        assert!(reds.windows(2).all(|w| w[0] <= w[1]));
        assert!((0..16).all(|x| s.pixel(x, 0).unwrap()[3] == 255));
    }

    #[test]
    fn radial_param_concentric() {
        let g = RadialGradient {
            x0: 0.0,
            y0: 0.0,
            r0: 0.0,
            x1: 0.0,
            y1: 0.0,
            r1: 10.0,
            stops: vec![],
        };
        assert!((radial_param(&g, 5.0, 0.0).unwrap() - 0.5).abs() < 1e-9);
        assert!((radial_param(&g, 0.0, 10.0).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn translucent_overlay_blends() {
        let mut px = [100, 100, 100, 255];
        blend_over(&mut px, Rgba::new(200, 200, 200, 0.5));
        assert_eq!(px, [150, 150, 150, 255]);
        blend_over(&mut px, Rgba::new(0, 0, 0, 0.0));
        assert_eq!(px, [150, 150, 150, 255]);
    }
}
