//! Spin3D web viewer (WASM)
//!
//! Renders the viewer onto a 2D canvas. JavaScript owns the animation loop
//! and event listeners: it forwards pointer, wheel and control changes to
//! [`WebViewer`] and calls [`WebViewer::frame`] from `requestAnimationFrame`.

use spin3d_core::{Input, RenderMode, ShapeKind, Viewer, ViewerConfig};
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCanvasElement};

pub mod canvas;

pub use canvas::CanvasSurface;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

/// Backing store size for a CSS size at the given device pixel ratio
pub fn device_size(css: i32, ratio: f64) -> u32 {
    (css.max(0) as f64 * ratio.max(0.0)).round() as u32
}

#[wasm_bindgen]
pub struct WebViewer {
    viewer: Viewer,
    surface: CanvasSurface,
    fps_label: Option<Element>,
    mode_label: Option<Element>,
    shown_mode: String,
}

#[wasm_bindgen]
impl WebViewer {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<WebViewer, JsError> {
        Self::build(canvas, ViewerConfig::default())
    }

    /// Create a viewer from a JSON config; missing fields take defaults
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(canvas: HtmlCanvasElement, json: &str) -> Result<WebViewer, JsError> {
        let config = ViewerConfig::from_json(json)?;
        Self::build(canvas, config)
    }

    /// Mirror the FPS readout and mode label into DOM elements by id.
    /// Either target may be omitted.
    #[wasm_bindgen(js_name = bindLabels)]
    pub fn bind_labels(
        &mut self,
        fps_id: Option<String>,
        mode_id: Option<String>,
    ) -> Result<(), JsError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsError::new("No document available"))?;
        let find = |id: Option<String>| -> Result<Option<Element>, JsError> {
            match id {
                Some(id) => document
                    .get_element_by_id(&id)
                    .map(Some)
                    .ok_or_else(|| JsError::new(&format!("No element with id '{id}'"))),
                None => Ok(None),
            }
        };
        self.fps_label = find(fps_id)?;
        self.mode_label = find(mode_id)?;
        self.shown_mode.clear();
        Ok(())
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Result<(), JsError> {
        self.send(Input::PointerDown { x, y })
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<(), JsError> {
        self.send(Input::PointerMove { x, y })
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) -> Result<(), JsError> {
        self.send(Input::PointerUp)
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> Result<(), JsError> {
        self.send(Input::PointerLeave)
    }

    /// Wheel `deltaY`; positive zooms out
    pub fn wheel(&mut self, delta: f32) -> Result<(), JsError> {
        self.send(Input::Wheel { delta })
    }

    /// Select by name. Unknown names select the sphere.
    #[wasm_bindgen(js_name = setShape)]
    pub fn set_shape(&mut self, name: &str) -> Result<(), JsError> {
        self.send(Input::SelectShape(ShapeKind::from_name(name)))
    }

    /// `"solid"` or `"wire"`
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, token: &str) -> Result<(), JsError> {
        let mode = token.parse::<RenderMode>()?;
        self.send(Input::SetMode(mode))
    }

    #[wasm_bindgen(js_name = toggleMode)]
    pub fn toggle_mode(&mut self) -> Result<(), JsError> {
        self.send(Input::ToggleMode)
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&mut self, speed: f32) -> Result<(), JsError> {
        self.send(Input::SetSpeed(speed))
    }

    #[wasm_bindgen(js_name = setSize)]
    pub fn set_size(&mut self, size: f32) -> Result<(), JsError> {
        self.send(Input::SetSize(size))
    }

    #[wasm_bindgen(js_name = setHue)]
    pub fn set_hue(&mut self, hue: f32) -> Result<(), JsError> {
        self.send(Input::SetHue(hue))
    }

    #[wasm_bindgen(js_name = setGlow)]
    pub fn set_glow(&mut self, glow: bool) -> Result<(), JsError> {
        self.send(Input::SetGlow(glow))
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), JsError> {
        self.send(Input::SetZoom(zoom))
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) -> Result<(), JsError> {
        self.send(Input::ResetView)
    }

    /// Resize the backing store to `width x height` device pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.surface.resize(width, height) {
            tracing::debug!(width, height, "canvas resized");
        }
    }

    /// Match the backing store to the element's display size. Returns
    /// whether the size changed.
    #[wasm_bindgen(js_name = resizeToDisplay)]
    pub fn resize_to_display(&mut self) -> bool {
        let ratio = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let (css_width, css_height) = self.surface.client_size();
        self.surface
            .resize(device_size(css_width, ratio), device_size(css_height, ratio))
    }

    /// Run one frame; `timestamp` is the `requestAnimationFrame` time in ms
    pub fn frame(&mut self, timestamp: f64) {
        let frame = self.viewer.tick(timestamp, self.surface.viewport());
        self.surface.execute(&frame.draw_list);

        if let (Some(fps), Some(label)) = (frame.fps, &self.fps_label) {
            label.set_text_content(Some(format!("{fps} fps").as_str()));
        }
        if frame.mode_label != self.shown_mode {
            if let Some(label) = &self.mode_label {
                label.set_text_content(Some(frame.mode_label.as_str()));
            }
            self.shown_mode = frame.mode_label;
        }
    }

    #[wasm_bindgen(getter)]
    pub fn fps(&self) -> u32 {
        self.viewer.fps()
    }

    #[wasm_bindgen(getter, js_name = modeLabel)]
    pub fn mode_label(&self) -> String {
        self.viewer.mode_label()
    }
}

impl WebViewer {
    fn build(canvas: HtmlCanvasElement, config: ViewerConfig) -> Result<WebViewer, JsError> {
        let surface = CanvasSurface::new(canvas)?;
        let viewer = Viewer::new(config)?;
        Ok(WebViewer {
            viewer,
            surface,
            fps_label: None,
            mode_label: None,
            shown_mode: String::new(),
        })
    }

    fn send(&mut self, input: Input) -> Result<(), JsError> {
        self.viewer.push_input(input)?;
        Ok(())
    }
}
