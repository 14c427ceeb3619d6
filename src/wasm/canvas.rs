use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::frame::{ColorStop, LinearGradient, RadialGradient};
use crate::surface::Surface;

/// A `<canvas>` with its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` when the element refuses a 2D context.
    pub fn acquire(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas: canvas.clone(),
            ctx,
        })
    }

    fn fill(&self, gradient: &CanvasGradient, stops: &[ColorStop]) {
        for stop in stops {
            if let Err(err) = gradient.add_color_stop(stop.offset as f32, &stop.color.to_string()) {
                warn!(error = ?err, offset = stop.offset, "rejected colour stop");
            }
        }
        self.ctx.set_fill_style_canvas_gradient(gradient);
        self.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) {
        // assigning a dimension clears the canvas even when unchanged
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
    }

    fn fill_linear(&mut self, g: &LinearGradient) {
        let gradient = self.ctx.create_linear_gradient(g.x0, g.y0, g.x1, g.y1);
        self.fill(&gradient, &g.stops);
    }

    fn fill_radial(&mut self, g: &RadialGradient) {
        match self
            .ctx
            .create_radial_gradient(g.x0, g.y0, g.r0, g.x1, g.y1, g.r1)
        {
            Ok(gradient) => self.fill(&gradient, &g.stops),
            Err(err) => warn!(error = ?err, "radial gradient rejected"),
        }
    }
}
