use futures_util::future::{FutureExt, LocalBoxFuture};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

use crate::dom::{js_err, window};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchMethod {
    Get,
    Post,
}

impl FetchMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchMethod::Get => "GET",
            FetchMethod::Post => "POST",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchResponse {
    pub ok: bool,
    pub status: u16,
    pub text: String,
}

/// Single-attempt HTTP access. No retries, no caching.
pub trait Fetch {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        method: FetchMethod,
    ) -> LocalBoxFuture<'a, Result<FetchResponse, String>>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WindowFetch;

impl Fetch for WindowFetch {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
        method: FetchMethod,
    ) -> LocalBoxFuture<'a, Result<FetchResponse, String>> {
        async move {
            let init = RequestInit::new();
            init.set_method(method.as_str());
            let request = Request::new_with_str_and_init(url, &init).map_err(js_err)?;
            let response = JsFuture::from(window()?.fetch_with_request(&request))
                .await
                .map_err(js_err)?
                .dyn_into::<Response>()
                .map_err(js_err)?;
            let text = JsFuture::from(response.text().map_err(js_err)?)
                .await
                .map_err(js_err)?
                .as_string()
                .unwrap_or_default();
            Ok(FetchResponse {
                ok: response.ok(),
                status: response.status(),
                text,
            })
        }
        .boxed_local()
    }
}
