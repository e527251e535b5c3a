use std::rc::Rc;

use futures_util::future::{FutureExt, LocalBoxFuture};
use js_sys::{Function, Promise, Reflect};
use scoredl_core::Destroy;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Window;

use crate::dom::{js_err, window};
use crate::score_info::ScoreInfo;

pub const MSCORE_HOOK: &str = "__SCOREDL_MSCORE";

/// A score renderer living in a child window. `destroy` may be reached from
/// either window's teardown; ownership is tracked by a `RendererLease`.
pub trait Renderer: Destroy {}

pub trait RendererLoader {
    fn load(&self, info: &ScoreInfo, window: &Window)
        -> LocalBoxFuture<'static, Result<Rc<dyn Renderer>, String>>;
}

pub struct JsRenderer {
    handle: JsValue,
}

impl Destroy for JsRenderer {
    fn destroy(&self) {
        let Ok(value) = Reflect::get(&self.handle, &JsValue::from_str("destroy")) else {
            return;
        };
        let Ok(func) = value.dyn_into::<Function>() else {
            return;
        };
        if let Err(err) = func.call0(&self.handle) {
            gloo::console::warn!("renderer destroy failed", js_err(err));
        }
    }
}

impl Renderer for JsRenderer {}

/// Loads renderers through the bootstrap object the page script exposes as
/// `window.__SCOREDL_MSCORE`, whose `load(id, title, window)` returns a
/// promise of an object with `destroy()`.
#[derive(Clone, Debug)]
pub struct GlobalMscoreLoader {
    hook: &'static str,
}

impl GlobalMscoreLoader {
    pub fn new(hook: &'static str) -> Self {
        Self { hook }
    }
}

impl Default for GlobalMscoreLoader {
    fn default() -> Self {
        Self::new(MSCORE_HOOK)
    }
}

impl RendererLoader for GlobalMscoreLoader {
    fn load(
        &self,
        info: &ScoreInfo,
        child: &Window,
    ) -> LocalBoxFuture<'static, Result<Rc<dyn Renderer>, String>> {
        let prepared = prepare_load(self.hook, info, child);
        async move {
            let promise = prepared?;
            let handle = JsFuture::from(promise).await.map_err(js_err)?;
            if handle.is_null() || handle.is_undefined() {
                return Err("renderer loader resolved to nothing".to_string());
            }
            Ok(Rc::new(JsRenderer { handle }) as Rc<dyn Renderer>)
        }
        .boxed_local()
    }
}

fn prepare_load(hook: &str, info: &ScoreInfo, child: &Window) -> Result<Promise, String> {
    let id = info.id().map_err(|err| err.to_string())?;
    let title = info.title().map_err(|err| err.to_string())?;
    let host = window()?;
    let boot = Reflect::get(&host, &JsValue::from_str(hook)).map_err(js_err)?;
    if boot.is_null() || boot.is_undefined() {
        return Err(format!("{hook} is not installed"));
    }
    let load = Reflect::get(&boot, &JsValue::from_str("load"))
        .map_err(js_err)?
        .dyn_into::<Function>()
        .map_err(|_| format!("{hook}.load is not a function"))?;
    let result = load
        .call3(
            &boot,
            &JsValue::from_f64(id as f64),
            &JsValue::from_str(&title),
            child,
        )
        .map_err(js_err)?;
    Ok(Promise::resolve(&result))
}
