use gloo::timers::future::TimeoutFuture;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, ShadowRoot, ShadowRootInit, ShadowRootMode, Window};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

pub fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Some(err) = error.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}

pub fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "missing window".to_string())
}

pub fn document() -> Result<Document, String> {
    window()?
        .document()
        .ok_or_else(|| "missing document".to_string())
}

pub fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, String> {
    document
        .create_element(tag)
        .map_err(js_err)?
        .dyn_into::<T>()
        .map_err(|_| format!("<{tag}> has an unexpected type"))
}

/// Open shadow root on `host`, reusing (and emptying) an existing one.
pub fn attach_shadow(host: &Element) -> Result<ShadowRoot, String> {
    if let Some(shadow) = host.shadow_root() {
        shadow.set_inner_html("");
        return Ok(shadow);
    }
    let init = ShadowRootInit::new(ShadowRootMode::Open);
    host.attach_shadow(&init).map_err(js_err)
}

/// Opens a window on the next timer tick so the click that triggered it has
/// finished dispatching. With an `anchor`, the window is placed just below it.
/// A blocked popup yields `None`.
pub async fn window_open_async(
    anchor: Option<&HtmlElement>,
    url: &str,
    features: Option<&str>,
) -> Option<Window> {
    TimeoutFuture::new(0).await;
    let host = web_sys::window()?;
    let mut parts: Vec<String> = features
        .filter(|features| !features.trim().is_empty())
        .map(|features| vec![features.to_string()])
        .unwrap_or_default();
    if let Some(anchor) = anchor {
        let rect = anchor.get_bounding_client_rect();
        let screen_x = host.screen_x().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let screen_y = host.screen_y().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let left = screen_x + rect.left();
        let top = screen_y + rect.bottom();
        parts.push(format!("left={left:.0},top={top:.0}"));
    }
    let opened = if parts.is_empty() {
        host.open_with_url_and_target(url, "_blank")
    } else {
        host.open_with_url_and_target_and_features(url, "_blank", &parts.join(","))
    };
    opened.ok().flatten()
}
