use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{window, HtmlCanvasElement, MediaQueryList, Window};

use crate::backdrop::Backdrop;
use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::theme::Theme;

mod canvas;
mod log;
mod raf;

use canvas::CanvasSurface;
use raf::{FrameCallback, RafScheduler};

/// Canvas id picked up automatically when the module starts.
const AUTO_MOUNT_ID: &str = "noise-background";

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

type Shared = Rc<RefCell<Option<Backdrop<CanvasSurface, RafScheduler>>>>;

thread_local! {
    static AUTO_MOUNTED: RefCell<Option<NoiseBackground>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    log::init();
    let window = window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let Some(element) = document.get_element_by_id(AUTO_MOUNT_ID) else {
        return Ok(());
    };
    let canvas = element.dyn_into::<HtmlCanvasElement>()?;
    let options = canvas.get_attribute("data-options");

    let mut background = NoiseBackground::new(canvas, options)?;
    background.mount()?;
    AUTO_MOUNTED.with(|slot| *slot.borrow_mut() = Some(background));
    Ok(())
}

/// Ambient noise background bound to one `<canvas>`.
///
/// JS usage:
/// ```js
/// const bg = new NoiseBackground(canvas, JSON.stringify({ theme: "dark" }));
/// bg.mount();
/// bg.setTheme("light");
/// bg.unmount();
/// ```
#[wasm_bindgen]
pub struct NoiseBackground {
    canvas: HtmlCanvasElement,
    config: BackdropConfig,
    /// Theme given explicitly; otherwise it follows the page and the system.
    theme_pinned: bool,
    state: Shared,
    callback: FrameCallback,
    resize: Option<Closure<dyn FnMut()>>,
    scheme: Option<(MediaQueryList, Closure<dyn FnMut()>)>,
}

#[wasm_bindgen]
impl NoiseBackground {
    /// Throws when `options` is not valid JSON or holds out-of-range values.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: Option<String>) -> Result<NoiseBackground, JsValue> {
        log::init();
        let json = options.unwrap_or_default();
        let config = BackdropConfig::from_json(&json).map_err(to_js)?;
        Ok(Self {
            canvas,
            config,
            theme_pinned: names_theme(&json),
            state: Rc::new(RefCell::new(None)),
            callback: Rc::new(RefCell::new(None)),
            resize: None,
            scheme: None,
        })
    }

    /// Start painting. Without a 2D context this quietly does nothing.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        self.unmount();
        let window = window().ok_or("no window")?;
        if !self.theme_pinned {
            self.config.theme = page_theme(&window);
        }
        apply_surface_style(&self.canvas, self.config.theme)?;

        self.install_frame_callback();
        let activated = Backdrop::activate(
            CanvasSurface::acquire(&self.canvas),
            RafScheduler::new(window.clone(), self.callback.clone()),
            viewport(&window),
            &self.config,
            random_seed(),
        );
        match activated {
            Ok(backdrop) => *self.state.borrow_mut() = Some(backdrop),
            Err(BackdropError::SurfaceUnavailable) => {
                self.callback.borrow_mut().take();
                return Ok(());
            }
            Err(err) => {
                self.callback.borrow_mut().take();
                return Err(to_js(err));
            }
        }

        self.listen_for_resize(&window)?;
        if !self.theme_pinned {
            self.listen_for_scheme(&window)?;
        }
        Ok(())
    }

    /// Switch theme. Re-runs setup with a freshly seeded noise field.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&mut self, theme: &str) -> Result<(), JsValue> {
        let theme: Theme = theme.parse().map_err(to_js)?;
        self.config.theme = theme;
        self.theme_pinned = true;
        self.detach_scheme_listener();
        retheme(&self.state, &self.canvas, theme)
    }

    /// Cancel the pending frame and detach every listener. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(mut backdrop) = self.state.borrow_mut().take() {
            self.config.theme = backdrop.theme();
            backdrop.deactivate();
        }
        self.detach_scheme_listener();
        if let Some(resize) = self.resize.take() {
            if let Some(window) = window() {
                window
                    .remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
                    .ok();
            }
        }
        // after the pending frame is cancelled, nothing can call into it
        self.callback.borrow_mut().take();
    }

    /// Explicit teardown for JS callers.
    pub fn destroy(&mut self) {
        self.unmount();
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.state
            .borrow()
            .as_ref()
            .is_some_and(|backdrop| backdrop.is_running())
    }

    /// Re-read the page theme (`data-theme`, `dark`/`light` class, system
    /// scheme) and re-run setup if it changed. No-op once a theme was pinned.
    #[wasm_bindgen(js_name = syncTheme)]
    pub fn sync_theme(&mut self) -> Result<(), JsValue> {
        if self.theme_pinned {
            return Ok(());
        }
        let window = window().ok_or("no window")?;
        follow_page_theme(&self.state, &self.canvas, &window)
    }

    /// Theme currently painted; the configured one while unmounted.
    #[wasm_bindgen(getter)]
    pub fn theme(&self) -> String {
        self.state
            .borrow()
            .as_ref()
            .map_or(self.config.theme, |backdrop| backdrop.theme())
            .to_string()
    }
}

impl NoiseBackground {
    fn install_frame_callback(&self) {
        let state = Rc::downgrade(&self.state);
        let frame = Closure::wrap(Box::new(move |now: f64| {
            with_backdrop(&state, |backdrop| {
                // failures are logged by the backdrop and end the loop
                backdrop.on_frame(now).ok();
            });
        }) as Box<dyn FnMut(f64)>);
        *self.callback.borrow_mut() = Some(frame);
    }

    fn listen_for_resize(&mut self, window: &Window) -> Result<(), JsValue> {
        let state = Rc::downgrade(&self.state);
        let win = window.clone();
        let resize = Closure::wrap(Box::new(move || {
            let (width, height) = viewport(&win);
            with_backdrop(&state, |backdrop| backdrop.on_resize(width, height));
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
        self.resize = Some(resize);
        Ok(())
    }

    fn listen_for_scheme(&mut self, window: &Window) -> Result<(), JsValue> {
        let Some(query) = window.match_media(DARK_SCHEME_QUERY)? else {
            return Ok(());
        };
        let state = Rc::downgrade(&self.state);
        let canvas = self.canvas.clone();
        let win = window.clone();
        let changed = Closure::wrap(Box::new(move || {
            let Some(state) = state.upgrade() else {
                return;
            };
            if let Err(err) = follow_page_theme(&state, &canvas, &win) {
                warn!(error = ?err, "re-theme failed");
            }
        }) as Box<dyn FnMut()>);
        query.add_event_listener_with_callback("change", changed.as_ref().unchecked_ref())?;
        self.scheme = Some((query, changed));
        Ok(())
    }

    fn detach_scheme_listener(&mut self) {
        if let Some((query, changed)) = self.scheme.take() {
            query
                .remove_event_listener_with_callback("change", changed.as_ref().unchecked_ref())
                .ok();
        }
    }
}

impl Drop for NoiseBackground {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn with_backdrop(
    state: &Weak<RefCell<Option<Backdrop<CanvasSurface, RafScheduler>>>>,
    f: impl FnOnce(&mut Backdrop<CanvasSurface, RafScheduler>),
) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let Ok(mut slot) = state.try_borrow_mut() else {
        return;
    };
    if let Some(backdrop) = slot.as_mut() {
        f(backdrop);
    }
}

/// Re-theme a mounted backdrop to the page theme when it differs.
fn follow_page_theme(state: &Shared, canvas: &HtmlCanvasElement, window: &Window) -> Result<(), JsValue> {
    let theme = page_theme(window);
    let current = state.borrow().as_ref().map(|backdrop| backdrop.theme());
    if current.is_some_and(|current| current != theme) {
        retheme(state, canvas, theme)?;
    }
    Ok(())
}

fn retheme(state: &Shared, canvas: &HtmlCanvasElement, theme: Theme) -> Result<(), JsValue> {
    apply_surface_style(canvas, theme)?;
    if let Some(backdrop) = state.borrow_mut().as_mut() {
        backdrop.set_theme(theme, random_seed()).map_err(to_js)?;
    }
    Ok(())
}

/// Fixed full-viewport placement behind the content, with a solid fallback
/// colour until the first frame lands.
fn apply_surface_style(canvas: &HtmlCanvasElement, theme: Theme) -> Result<(), JsValue> {
    let style = canvas.style();
    style.set_property("position", "fixed")?;
    style.set_property("inset", "0")?;
    style.set_property("z-index", "-10")?;
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;
    style.set_property("transition", "background-color 300ms")?;
    style.set_property("background", &theme.fallback_background().to_string())?;
    Ok(())
}

/// `data-theme` or a `dark`/`light` class on `<html>`, then the system
/// colour scheme, then light.
fn page_theme(window: &Window) -> Theme {
    document_theme(window)
        .or_else(|| system_theme(window))
        .unwrap_or_default()
}

fn document_theme(window: &Window) -> Option<Theme> {
    let root = window.document()?.document_element()?;
    if let Some(theme) = root
        .get_attribute("data-theme")
        .and_then(|attr| attr.parse().ok())
    {
        return Some(theme);
    }
    let classes = root.class_list();
    if classes.contains("dark") {
        Some(Theme::Dark)
    } else if classes.contains("light") {
        Some(Theme::Light)
    } else {
        None
    }
}

fn system_theme(window: &Window) -> Option<Theme> {
    let query = window.match_media(DARK_SCHEME_QUERY).ok().flatten()?;
    Some(if query.matches() { Theme::Dark } else { Theme::Light })
}

fn viewport(window: &Window) -> (u32, u32) {
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok()
            .and_then(|v| v.as_f64())
            .map_or(0, |v| v.max(0.0) as u32)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}

fn random_seed() -> u32 {
    (js_sys::Math::random() * f64::from(u32::MAX)) as u32
}

fn names_theme(json: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(json)
        .ok()
        .is_some_and(|v| v.get("theme").is_some())
}

fn to_js(err: BackdropError) -> JsValue {
    debug!(%err, "error surfaced to JS");
    JsValue::from_str(&err.to_string())
}
