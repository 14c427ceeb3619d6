//! Lifecycle of one mounted backdrop: activation, frames, resize, teardown.

use tracing::{debug, trace, warn};

use crate::clock::AnimationClock;
use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::field::NoiseField;
use crate::frame::{plan_frame, FrameParams, FramePlan};
use crate::scheduler::{FrameLoop, FrameScheduler};
use crate::surface::{self, Surface};
use crate::theme::Theme;

/// An activated backdrop. Everything it owns lives and dies with it; dropping
/// it cancels the pending frame.
pub struct Backdrop<S: Surface, F: FrameScheduler> {
    surface: S,
    field: NoiseField,
    clock: AnimationClock,
    config: BackdropConfig,
    frames: FrameLoop<F>,
}

impl<S: Surface, F: FrameScheduler> Backdrop<S, F> {
    /// Activate on `surface` sized to `viewport`, and request the first frame.
    ///
    /// `seed` is used unless the config pins one. A missing surface yields
    /// [`BackdropError::SurfaceUnavailable`]; callers treat it as "no effect".
    pub fn activate(
        surface: Option<S>,
        scheduler: F,
        viewport: (u32, u32),
        config: &BackdropConfig,
        seed: u32,
    ) -> Result<Self, BackdropError> {
        config.validate()?;
        let Some(mut surface) = surface else {
            debug!("no drawing surface, backdrop disabled");
            return Err(BackdropError::SurfaceUnavailable);
        };
        surface.resize(viewport.0, viewport.1);

        let seed = config.seed.unwrap_or(seed);
        let mut backdrop = Self {
            surface,
            field: NoiseField::new(seed),
            clock: AnimationClock::new(config.time_scale),
            config: config.clone(),
            frames: FrameLoop::new(scheduler),
        };
        backdrop.frames.start()?;
        debug!(
            theme = %config.theme,
            seed,
            width = viewport.0,
            height = viewport.1,
            "backdrop activated"
        );
        Ok(backdrop)
    }

    /// Viewport resize: the next frame paints at the new size.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        debug!(width, height, "backdrop resized");
        self.surface.resize(width, height);
    }

    /// Frame callback. Paints and requests the next frame; returns `false`
    /// when the frame was stale (not requested, or the loop was stopped).
    pub fn on_frame(&mut self, now_ms: f64) -> Result<bool, BackdropError> {
        if !self.frames.begin_frame() {
            return Ok(false);
        }
        let plan = self.plan(now_ms);
        trace!(
            width = plan.width,
            height = plan.height,
            opacity = plan.overlay_opacity,
            "painting frame"
        );
        surface::paint(&mut self.surface, &plan);
        if let Err(err) = self.frames.end_frame() {
            warn!(%err, "backdrop animation stopped");
            return Err(err);
        }
        Ok(true)
    }

    /// Plan the frame for `now_ms` at the current surface size.
    pub fn plan(&mut self, now_ms: f64) -> FramePlan {
        let (width, height) = self.surface.size();
        let params = FrameParams {
            theme: self.config.theme,
            noise_scale: self.config.noise_scale,
            stops: self.config.stops,
            width,
            height,
            t: self.clock.elapsed(now_ms),
        };
        plan_frame(&self.field, &params)
    }

    /// Re-run setup for a new theme: fresh noise field, clock back to zero,
    /// frame loop restarted.
    pub fn set_theme(&mut self, theme: Theme, seed: u32) -> Result<(), BackdropError> {
        self.config.theme = theme;
        let seed = self.config.seed.unwrap_or(seed);
        self.field = NoiseField::new(seed);
        self.clock = AnimationClock::new(self.config.time_scale);
        debug!(%theme, seed, "backdrop re-themed");
        self.frames.restart()
    }

    /// Cancel the pending frame. Idempotent; also runs on drop.
    pub fn deactivate(&mut self) {
        if self.frames.is_running() {
            debug!("backdrop deactivated");
        }
        self.frames.stop();
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    pub fn theme(&self) -> Theme {
        self.config.theme
    }

    pub fn seed(&self) -> u32 {
        self.field.seed()
    }

    pub fn clock_started(&self) -> bool {
        self.clock.has_started()
    }

    pub fn frames_painted(&self) -> u64 {
        self.frames.frames_painted()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use crate::surface::PixelSurface;

    fn activate(theme: Theme) -> (Backdrop<PixelSurface, ManualScheduler>, ManualScheduler) {
        let sched = ManualScheduler::new();
        let config = BackdropConfig::default().with_theme(theme);
        let backdrop = Backdrop::activate(
            Some(PixelSurface::new(1, 1)),
            sched.clone(),
            (64, 48),
            &config,
            17,
        )
        .unwrap();
        (backdrop, sched)
    }

    #[test]
    fn missing_surface_is_silent_error() {
        let result = Backdrop::<PixelSurface, _>::activate(
            None,
            ManualScheduler::new(),
            (10, 10),
            &BackdropConfig::default(),
            1,
        );
        assert!(matches!(result, Err(BackdropError::SurfaceUnavailable)));
    }

    #[test]
    fn activation_sizes_surface_and_requests_frame() {
        let (backdrop, sched) = activate(Theme::Light);
        assert_eq!(backdrop.surface().size(), (64, 48));
        assert!(sched.pending().is_some());
        assert!(backdrop.is_running());
        assert!(!backdrop.clock_started());
    }

    #[test]
    fn pinned_seed_wins() {
        let config = BackdropConfig {
            seed: Some(99),
            ..BackdropConfig::default()
        };
        let backdrop = Backdrop::activate(
            Some(PixelSurface::new(1, 1)),
            ManualScheduler::new(),
            (4, 4),
            &config,
            5,
        )
        .unwrap();
        assert_eq!(backdrop.seed(), 99);
    }

    #[test]
    fn frame_paints_every_pixel_opaque() {
        let (mut backdrop, _sched) = activate(Theme::Dark);
        assert!(backdrop.on_frame(1_000.0).unwrap());
        let s = backdrop.surface();
        for y in 0..s.height() {
            for x in 0..s.width() {
                assert_eq!(s.pixel(x, y).unwrap()[3], 255);
            }
        }
    }

    #[test]
    fn set_theme_restarts_clock_and_field() {
        let (mut backdrop, sched) = activate(Theme::Light);
        backdrop.on_frame(0.0).unwrap();
        backdrop.on_frame(5_000.0).unwrap();
        backdrop.set_theme(Theme::Dark, 23).unwrap();
        assert_eq!(backdrop.theme(), Theme::Dark);
        assert_eq!(backdrop.seed(), 23);
        assert!(!backdrop.clock_started());
        assert_eq!(sched.cancelled().len(), 1);
        assert!(backdrop.is_running());
    }

    #[test]
    fn deactivate_stops_frames() {
        let (mut backdrop, sched) = activate(Theme::Light);
        backdrop.deactivate();
        assert!(sched.pending().is_none());
        assert!(!backdrop.on_frame(16.0).unwrap());
        assert_eq!(backdrop.frames_painted(), 0);
    }
}
