use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;

use catalog::{CatalogError, StarCatalog};
use render::RenderFrame;
use runtime::{AppConfig, Controller, InputEvent, InputHandler, UiUpdate};

mod canvas;
mod dom;

use canvas::CanvasSurface;

pub const CANVAS_ID: &str = "starfield";
pub const DEFAULT_DATA_URL: &str = "stars.json";

thread_local! {
    static STATE: RefCell<Controller> =
        RefCell::new(Controller::new(AppConfig::default(), StdRng::from_entropy()));
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn canvas() -> Result<HtmlCanvasElement, JsValue> {
    dom::document()?
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str("missing star canvas"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(JsValue::from)
}

fn draw(frame: &RenderFrame) -> Result<(), JsValue> {
    let mut surface = CanvasSurface::from_canvas(&canvas()?)?;
    frame.replay(&mut surface);
    Ok(())
}

/// Redraws if asked to, then updates the page.
///
/// The controller borrow is released before any DOM work so that a blocking
/// alert cannot overlap a state borrow.
fn present(update: UiUpdate) -> Result<(), JsValue> {
    if update.needs_redraw() {
        let frame = STATE.with(|state| state.borrow().render_frame());
        draw(&frame)?;
    }
    dom::apply(&dom::document()?, &update)
}

fn dispatch(event: InputEvent) -> Result<(), JsValue> {
    let update = STATE.with(|state| state.borrow_mut().handle(event));
    present(update)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Sizes the canvas backing store to `width` x `height` CSS pixels.
#[wasm_bindgen]
pub fn set_canvas_size(width: f64, height: f64) -> Result<(), JsValue> {
    let canvas = canvas()?;
    canvas.set_width(width.max(1.0) as u32);
    canvas.set_height(height.max(1.0) as u32);
    dispatch(InputEvent::Resize { width, height })
}

#[wasm_bindgen]
pub fn drag_start(x: f64, y: f64) -> Result<(), JsValue> {
    dispatch(InputEvent::DragStart { x, y })
}

#[wasm_bindgen]
pub fn drag_move(x: f64, y: f64) -> Result<(), JsValue> {
    dispatch(InputEvent::DragMove { x, y })
}

/// Pointer released or left the canvas.
#[wasm_bindgen]
pub fn drag_end() -> Result<(), JsValue> {
    dispatch(InputEvent::DragEnd)
}

#[wasm_bindgen]
pub fn wheel(x: f64, y: f64, delta_y: f64) -> Result<(), JsValue> {
    dispatch(InputEvent::Wheel { x, y, delta_y })
}

#[wasm_bindgen]
pub fn click(x: f64, y: f64) -> Result<(), JsValue> {
    dispatch(InputEvent::Click { x, y })
}

#[wasm_bindgen]
pub fn set_grid(visible: bool) -> Result<(), JsValue> {
    dispatch(InputEvent::ToggleGrid(visible))
}

/// Submits whichever answer radio is checked.
#[wasm_bindgen]
pub fn submit_answer() -> Result<(), JsValue> {
    let selected = dom::selected_option(&dom::document()?)?;
    dispatch(InputEvent::Submit { selected })
}

#[wasm_bindgen]
pub fn skip_question() -> Result<(), JsValue> {
    dispatch(InputEvent::Skip)
}

#[wasm_bindgen]
pub fn close_feedback() -> Result<(), JsValue> {
    dispatch(InputEvent::CloseFeedback)
}

#[wasm_bindgen]
pub fn show_results() -> Result<(), JsValue> {
    dispatch(InputEvent::ShowResults)
}

#[wasm_bindgen]
pub fn reset_quiz() -> Result<(), JsValue> {
    dispatch(InputEvent::Reset)
}

/// Fetches the star document once and installs it. Failures are reported to
/// the user and not retried.
#[wasm_bindgen]
pub fn load_stars(url: Option<String>) {
    let url = url.unwrap_or_else(|| DEFAULT_DATA_URL.to_string());
    spawn_local(async move {
        let result = fetch_catalog(&url).await;
        if let Err(err) = &result {
            log(&format!("star data load failed: {err}"));
        }
        let update = STATE.with(|state| state.borrow_mut().on_catalog_loaded(result));
        if let Err(err) = present(update) {
            log(&format!("present failed: {err:?}"));
        }
    });
}

async fn fetch_catalog(url: &str) -> Result<StarCatalog, CatalogError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| CatalogError::Fetch(e.to_string()))?;
    if !resp.ok() {
        return Err(CatalogError::Fetch(format!(
            "{url}: HTTP {}",
            resp.status()
        )));
    }
    let text = resp
        .text()
        .await
        .map_err(|e| CatalogError::Fetch(e.to_string()))?;
    StarCatalog::from_json_str(&text)
}
