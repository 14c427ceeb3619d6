//! Animated ambient background for a web page.
//!
//! A full-viewport canvas is repainted every display frame with a slowly
//! drifting colour gradient sampled from 2-D simplex noise, plus a soft radial
//! overlay, in a light or dark theme. The core modules are host-agnostic and
//! test natively; the `wasm` module binds them to a browser `<canvas>`.

pub mod backdrop;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod frame;
pub mod palette;
pub mod scheduler;
pub mod surface;
pub mod theme;

pub use backdrop::Backdrop;
pub use config::BackdropConfig;
pub use error::BackdropError;
pub use field::NoiseField;
pub use surface::{PixelSurface, Surface};
pub use theme::Theme;

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::NoiseBackground;
