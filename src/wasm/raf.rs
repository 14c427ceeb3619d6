use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::BackdropError;
use crate::scheduler::{FrameHandle, FrameScheduler};

/// Slot holding the per-frame closure. It is filled before the first request
/// and emptied only after the last request was cancelled.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` / `cancelAnimationFrame` on a window.
pub struct RafScheduler {
    window: Window,
    callback: FrameCallback,
}

impl RafScheduler {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, BackdropError> {
        let slot = self.callback.borrow();
        let callback = slot
            .as_ref()
            .ok_or_else(|| BackdropError::Scheduler("frame callback not installed".into()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|err| BackdropError::Scheduler(format!("{err:?}")))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        // only fails for a detached window, where nothing will fire anyway
        self.window.cancel_animation_frame(handle.0).ok();
    }
}
