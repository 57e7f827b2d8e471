//! LAWGL Web - WebGL2 frontend for the transform demos
//!
//! Each `start_*` export wires one canvas, the slider inputs on the page, and
//! the matrix grids to a fresh scene. Demos share no state; dropping the
//! returned handle detaches its listeners and cancels any pending frame.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use lawgl_core::{
    parse_assignments, FrameDriver, FrameScheduler, MatrixPanel, ParamKey, ParamKind, ParamValue,
    Scene, SceneKind,
};
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlCanvasElement, HtmlInputElement, Window};

pub mod gl;

pub use gl::GlSurface;

/// `requestAnimationFrame` as a frame scheduler
pub struct AnimationFrameScheduler {
    window: Window,
    callback: Closure<dyn FnMut()>,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window, callback: Closure<dyn FnMut()>) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    type Handle = i32;

    fn request_frame(&mut self) -> i32 {
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(handle) => handle,
            Err(err) => {
                error!("requestAnimationFrame failed: {err:?}");
                0
            }
        }
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            warn!("cancelAnimationFrame({handle}) failed: {err:?}");
        }
    }
}

struct DemoState {
    scene: Box<dyn Scene>,
    surface: GlSurface,
    driver: FrameDriver<AnimationFrameScheduler>,
    document: Document,
}

impl DemoState {
    fn redraw(&mut self) {
        if let Some(frame) = self.driver.on_frame(self.scene.as_ref(), &mut self.surface) {
            show_panels(&self.document, &frame.panels);
        }
    }

    /// Pull the current value of one input element into the scene
    fn read_input(&mut self, key: ParamKey) -> bool {
        let Some(input) = find_input(&self.document, key) else {
            return false;
        };
        let value = match key.kind() {
            ParamKind::Toggle => ParamValue::Toggle(input.checked()),
            ParamKind::Scalar => {
                let v = input.value_as_number();
                if v.is_nan() {
                    warn!("#{} has a non-numeric value `{}`", key.id(), input.value());
                    return false;
                }
                ParamValue::Scalar(v as f32)
            }
        };
        match self.scene.set(key, value) {
            Ok(()) => true,
            Err(err) => {
                warn!("{err}");
                false
            }
        }
    }
}

/// How a parameter value is written back into its `<input>` element
#[derive(Debug, Clone, Copy, PartialEq)]
enum InputWrite {
    Number(f64),
    Checked(bool),
}

impl From<ParamValue> for InputWrite {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Scalar(v) => InputWrite::Number(f64::from(v)),
            ParamValue::Toggle(b) => InputWrite::Checked(b),
        }
    }
}

fn write_input(document: &Document, key: ParamKey, value: ParamValue) {
    let Some(input) = find_input(document, key) else {
        return;
    };
    match InputWrite::from(value) {
        InputWrite::Number(v) => input.set_value_as_number(v),
        InputWrite::Checked(b) => input.set_checked(b),
    }
}

fn find_input(document: &Document, key: ParamKey) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(key.id())?
        .dyn_into::<HtmlInputElement>()
        .ok()
}

fn show_panels(document: &Document, panels: &[MatrixPanel]) {
    for panel in panels {
        if let Some(element) = document.get_element_by_id(panel.target) {
            element.set_inner_html(&panel.to_html());
        }
    }
}

/// A running demo; keep it alive for as long as the page shows it
#[wasm_bindgen]
pub struct Demo {
    state: Rc<RefCell<DemoState>>,
    listeners: Vec<(HtmlInputElement, Closure<dyn FnMut(Event)>)>,
}

#[wasm_bindgen]
impl Demo {
    /// Apply an assignment list such as `"tx=0.2 rz=0.25"` and redraw
    pub fn set(&self, assignments: &str) -> Result<(), JsValue> {
        let parsed = parse_assignments(assignments).map_err(to_js)?;
        let mut state = self.state.borrow_mut();
        state.scene.apply_all(&parsed).map_err(to_js)?;
        for (key, _) in &parsed {
            if let Some(value) = state.scene.value(*key) {
                write_input(&state.document, *key, value);
            }
        }
        state.driver.notify_change();
        Ok(())
    }

    /// Number of frames actually drawn so far
    pub fn redraws(&self) -> f64 {
        self.state.borrow().driver.stats().redraws as f64
    }
}

impl Drop for Demo {
    fn drop(&mut self) {
        for (input, listener) in &self.listeners {
            if let Err(err) = input
                .remove_event_listener_with_callback("input", listener.as_ref().unchecked_ref())
            {
                warn!("removing the `input` listener from #{} failed: {err:?}", input.id());
            }
        }
        // The frame callback dies with the state, so it must never fire
        self.state.borrow_mut().driver.cancel();
    }
}

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn start(kind: SceneKind, canvas_id: &str) -> Result<Demo, JsValue> {
    let window = web_sys::window().ok_or_else(|| to_js("window not available"))?;
    let document = window
        .document()
        .ok_or_else(|| to_js("document not available"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| to_js(format!("canvas #{canvas_id} not found")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| to_js(format!("#{canvas_id} is not a canvas")))?;

    let scene = kind.build();
    let surface = GlSurface::new(&canvas, scene.mesh(), scene.depth_test()).map_err(to_js)?;

    let state = Rc::new_cyclic(|weak: &Weak<RefCell<DemoState>>| {
        let weak = weak.clone();
        let on_frame = Closure::<dyn FnMut()>::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().redraw();
            }
        });

        RefCell::new(DemoState {
            scene,
            surface,
            driver: FrameDriver::new(AnimationFrameScheduler::new(window, on_frame)),
            document,
        })
    });

    let mut listeners = Vec::new();
    {
        let mut st = state.borrow_mut();
        let keys: Vec<ParamKey> = st.scene.controls().iter().map(|c| c.key).collect();
        for key in keys {
            // Start from whatever the page shows
            st.read_input(key);

            let Some(input) = find_input(&st.document, key) else {
                debug!("no #{} input on the page", key.id());
                continue;
            };
            let weak = Rc::downgrade(&state);
            let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
                if let Some(state) = weak.upgrade() {
                    let mut state = state.borrow_mut();
                    if state.read_input(key) {
                        state.driver.notify_change();
                    }
                }
            });
            input.add_event_listener_with_callback("input", listener.as_ref().unchecked_ref())?;
            listeners.push((input, listener));
        }

        st.driver.start();
        info!(
            "{} demo started on #{canvas_id} with {} input(s)",
            st.scene.name(),
            listeners.len()
        );
    }

    Ok(Demo { state, listeners })
}

#[wasm_bindgen]
pub fn start_basic(canvas_id: &str) -> Result<Demo, JsValue> {
    start(SceneKind::Basic, canvas_id)
}

#[wasm_bindgen]
pub fn start_flat(canvas_id: &str) -> Result<Demo, JsValue> {
    start(SceneKind::Flat, canvas_id)
}

#[wasm_bindgen]
pub fn start_spatial(canvas_id: &str) -> Result<Demo, JsValue> {
    start(SceneKind::Spatial, canvas_id)
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGES: &[(SceneKind, &str, &str)] = &[
        (SceneKind::Basic, "start_basic", include_str!("../www/basic.html")),
        (SceneKind::Flat, "start_flat", include_str!("../www/flat.html")),
        (SceneKind::Spatial, "start_spatial", include_str!("../www/index.html")),
    ];

    #[test]
    fn test_pages_host_every_control_and_grid() {
        for (kind, export, page) in PAGES {
            let scene = kind.build();
            assert!(page.contains(&format!("{export}(\"webgl-canvas\")")), "{export}");
            assert!(page.contains(r#"<canvas id="webgl-canvas""#));

            for control in scene.controls() {
                let id = format!(r#"id="{}""#, control.key.id());
                assert!(page.contains(&id), "{} page lacks {id}", scene.name());
            }
            for panel in scene.frame().panels {
                let id = format!(r#"id="{}""#, panel.target);
                assert!(page.contains(&id), "{} page lacks {id}", scene.name());
            }
        }
    }

    #[test]
    fn test_flat_page_has_no_spatial_inputs() {
        let (_, _, page) = PAGES[1];
        assert!(!page.contains(r#"id="rotate-x""#));
        assert!(!page.contains(r#"id="projection-matrix""#));
    }

    #[test]
    fn test_input_write_back() {
        assert_eq!(
            InputWrite::from(ParamValue::Scalar(0.25)),
            InputWrite::Number(0.25)
        );
        assert_eq!(
            InputWrite::from(ParamValue::Toggle(true)),
            InputWrite::Checked(true)
        );
    }
}
