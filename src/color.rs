use std::fmt;

/// Opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// Formats as a CSS colour, e.g. `rgb(248, 249, 250)`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// RGB colour with a straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        c.with_alpha(1.0)
    }
}

/// Formats as a CSS colour, e.g. `rgba(60, 50, 80, 0.045)`.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Clamp to `[lo, hi]` and truncate to an 8-bit channel.
#[inline]
pub(crate) fn channel(v: f64, lo: f64, hi: f64) -> u8 {
    v.clamp(lo, hi).floor() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_strings() {
        assert_eq!(Rgb::new(18, 18, 22).to_string(), "rgb(18, 18, 22)");
        assert_eq!(
            Rgba::new(20, 20, 30, 0.0).to_string(),
            "rgba(20, 20, 30, 0)"
        );
        assert_eq!(
            Rgba::new(60, 50, 80, 0.045).to_string(),
            "rgba(60, 50, 80, 0.045)"
        );
    }

    #[test]
    fn channel_clamps_then_floors() {
        assert_eq!(channel(256.7, 240.0, 255.0), 255);
        assert_eq!(channel(239.0, 240.0, 255.0), 240);
        assert_eq!(channel(247.9, 240.0, 255.0), 247);
    }
}
