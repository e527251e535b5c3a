use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures_channel::oneshot;
use futures_util::future::{FutureExt, LocalBoxFuture, Shared};
use gloo::events::EventListener;
use gloo::timers::future::TimeoutFuture;
use js_sys::Function;
use scoredl_core::{settle, I18nKey, RendererLease, Settled, DEFAULT_TIMEOUT_MS};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlAnchorElement, HtmlButtonElement, MouseEvent, Text, Window};

use crate::dom::{create, document, js_err, window, window_open_async};
use crate::i18n::{i18n, i18n_with};
use crate::mscore::{Renderer, RendererLoader};
use crate::score_info::ScoreInfo;

pub type SetText = Rc<dyn Fn(&str)>;

/// Click capability: `(button name, clicked button, label setter)`.
pub type BtnAction = Rc<dyn Fn(String, HtmlButtonElement, SetText) -> LocalBoxFuture<'static, ()>>;

pub type Fallback = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<(), String>>>;

type UrlFuture = LocalBoxFuture<'static, Result<String, String>>;

pub enum UrlInput {
    Literal(String),
    /// Resolved once, shared by every click.
    Pending(Shared<UrlFuture>),
    /// Called afresh on every click.
    Provider(Rc<dyn Fn() -> UrlFuture>),
}

impl UrlInput {
    pub fn pending<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<String, String>> + 'static,
    {
        UrlInput::Pending(fut.boxed_local().shared())
    }

    pub fn provider<F, Fut>(provider: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<String, String>> + 'static,
    {
        UrlInput::Provider(Rc::new(move || provider().boxed_local()))
    }

    async fn resolve(&self) -> Result<String, String> {
        match self {
            UrlInput::Literal(url) => Ok(url.clone()),
            UrlInput::Pending(fut) => fut.clone().await,
            UrlInput::Provider(provider) => provider().await,
        }
    }
}

impl From<String> for UrlInput {
    fn from(url: String) -> Self {
        UrlInput::Literal(url)
    }
}

impl From<&str> for UrlInput {
    fn from(url: &str) -> Self {
        UrlInput::Literal(url.to_string())
    }
}

pub fn fallback<F, Fut>(f: F) -> Fallback
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<(), String>> + 'static,
{
    Rc::new(move || f().boxed_local())
}

/// Takes the button's click handler away while an action runs.
struct ClickGuard {
    btn: HtmlButtonElement,
    saved: Option<Function>,
}

impl ClickGuard {
    fn suspend(btn: &HtmlButtonElement) -> Self {
        let saved = btn.onclick();
        btn.set_onclick(None);
        Self {
            btn: btn.clone(),
            saved,
        }
    }

    fn restore(self) {
        self.btn.set_onclick(self.saved.as_ref());
    }
}

/// Wraps `op` with the busy label, a timeout and an optional fallback.
///
/// A timed-out operation keeps running in the background; only the wait for
/// it is abandoned. The returned future never fails: the outcome shows up in
/// the button label.
pub fn process<F, Fut>(op: F, fallback: Option<Fallback>, timeout_ms: Option<u32>) -> BtnAction
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<(), String>> + 'static,
{
    let op = Rc::new(op);
    let timeout_ms = timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
    Rc::new(move |name: String, btn: HtmlButtonElement, set_text: SetText| {
        let op = op.clone();
        let fallback = fallback.clone();
        async move {
            let guard = ClickGuard::suspend(&btn);
            set_text(&i18n(I18nKey::Processing));

            let settled = settle(
                detach(op()),
                TimeoutFuture::new(timeout_ms),
                fallback.map(|fallback| move || fallback()),
            )
            .await;
            log_settled(&name, &settled);

            set_text(&settled.label(&name, &i18n(I18nKey::BtnError)));
            guard.restore();
        }
        .boxed_local()
    })
}

pub fn download(url: UrlInput, fallback: Option<Fallback>, timeout_ms: Option<u32>) -> BtnAction {
    let url = Rc::new(url);
    process(
        move || {
            let url = url.clone();
            async move {
                let href = url.resolve().await?;
                trigger_download(&href)
            }
        },
        fallback,
        timeout_ms,
    )
}

/// Opens a child window next to the button and loads a renderer into it.
///
/// The renderer is destroyed by whichever closes first: the host page (which
/// also closes the child) or the child window (which also restores the
/// button). `f` receives the child window, the renderer and the
/// "processing" text node shown in the child.
pub fn mscore_window<F>(info: Rc<ScoreInfo>, loader: Rc<dyn RendererLoader>, f: F) -> BtnAction
where
    F: Fn(&Window, Rc<dyn Renderer>, &Text) + 'static,
{
    mscore_window_in(Rc::new(BrowserWindows), info, loader, f)
}

/// Source of the two windows a renderer lives between.
pub trait RendererWindows {
    fn host(&self) -> Result<Window, String>;
    /// `None` when the child could not be opened.
    fn open_child(&self, anchor: &HtmlButtonElement) -> LocalBoxFuture<'static, Option<Window>>;
}

/// The current window, plus a popup placed under the clicked button.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserWindows;

impl RendererWindows for BrowserWindows {
    fn host(&self) -> Result<Window, String> {
        window()
    }

    fn open_child(&self, anchor: &HtmlButtonElement) -> LocalBoxFuture<'static, Option<Window>> {
        let anchor = anchor.clone();
        async move { window_open_async(Some(&anchor), "", None).await }.boxed_local()
    }
}

pub fn mscore_window_in<F>(
    windows: Rc<dyn RendererWindows>,
    info: Rc<ScoreInfo>,
    loader: Rc<dyn RendererLoader>,
    f: F,
) -> BtnAction
where
    F: Fn(&Window, Rc<dyn Renderer>, &Text) + 'static,
{
    let f = Rc::new(f);
    Rc::new(move |name: String, btn: HtmlButtonElement, set_text: SetText| {
        let windows = windows.clone();
        let info = info.clone();
        let loader = loader.clone();
        let f = f.clone();
        async move {
            let guard = Rc::new(RefCell::new(Some(ClickGuard::suspend(&btn))));
            set_text(&i18n(I18nKey::Processing));

            let Some(child) = windows.open_child(&btn).await else {
                gloo::console::warn!("renderer window was blocked", name.clone());
                set_text(&i18n(I18nKey::BtnError));
                if let Some(guard) = guard.borrow_mut().take() {
                    guard.restore();
                }
                return;
            };
            let placeholder = match show_placeholder(&child) {
                Ok(text) => text,
                Err(err) => {
                    gloo::console::error!("renderer window has no document", err);
                    let _ = child.close();
                    set_text(&i18n(I18nKey::BtnError));
                    if let Some(guard) = guard.borrow_mut().take() {
                        guard.restore();
                    }
                    return;
                }
            };

            let lease: Rc<RendererLease<Rc<dyn Renderer>>> = Rc::new(RendererLease::new());
            let host_unload: Rc<RefCell<Option<EventListener>>> = Rc::new(RefCell::new(None));
            match windows.host() {
                Ok(host) => {
                    let lease = lease.clone();
                    let child = child.clone();
                    let listener = EventListener::new(&host, "unload", move |_| {
                        if lease.host_unloaded() {
                            let _ = child.close();
                        }
                    });
                    host_unload.borrow_mut().replace(listener);
                }
                Err(err) => gloo::console::warn!("host unload hook not installed", err),
            }
            {
                let lease = lease.clone();
                let host_unload = host_unload.clone();
                let set_text = set_text.clone();
                let name = name.clone();
                let guard = guard.clone();
                EventListener::new(&child, "beforeunload", move |_| {
                    lease.child_closed();
                    host_unload.borrow_mut().take();
                    set_text(&name);
                    if let Some(guard) = guard.borrow_mut().take() {
                        guard.restore();
                    }
                })
                .forget();
            }

            let renderer = match loader.load(&info, &child).await {
                Ok(renderer) => renderer,
                Err(err) => {
                    gloo::console::error!("failed to load renderer", name.clone(), err);
                    let error_label = i18n(I18nKey::BtnError);
                    placeholder.set_data(&error_label);
                    set_text(&error_label);
                    return;
                }
            };
            if !lease.attach(renderer.clone()) {
                gloo::console::log!("renderer window closed before load finished", name);
                return;
            }
            f(&child, renderer, &placeholder);
        }
        .boxed_local()
    })
}

/// Shows a blocking deprecation notice, then runs `action` regardless.
pub fn deprecate(action: BtnAction) -> BtnAction {
    deprecate_with(action, Rc::new(alert))
}

/// `deprecate` with the notice delivered through `notify`.
pub fn deprecate_with(action: BtnAction, notify: Rc<dyn Fn(&str)>) -> BtnAction {
    Rc::new(move |name: String, btn: HtmlButtonElement, set_text: SetText| {
        notify(&i18n_with(I18nKey::DeprecationNotice, &[&name]));
        action(name, btn, set_text)
    })
}

fn alert(notice: &str) {
    match window() {
        Ok(window) => {
            let _ = window.alert_with_message(notice);
        }
        Err(_) => gloo::console::warn!(notice.to_string()),
    }
}

fn detach<Fut>(fut: Fut) -> impl Future<Output = Result<(), String>>
where
    Fut: Future<Output = Result<(), String>> + 'static,
{
    let (tx, rx) = oneshot::channel();
    spawn_local(async move {
        let _ = tx.send(fut.await);
    });
    async move {
        rx.await
            .unwrap_or_else(|_| Err("operation dropped before settling".to_string()))
    }
}

fn trigger_download(href: &str) -> Result<(), String> {
    let document = document()?;
    let anchor: HtmlAnchorElement = create(&document, "a")?;
    anchor.set_href(href);
    let event = MouseEvent::new("click").map_err(js_err)?;
    anchor.dispatch_event(&event).map_err(js_err)?;
    Ok(())
}

fn show_placeholder(child: &Window) -> Result<Text, String> {
    let doc = child
        .document()
        .ok_or_else(|| "missing child document".to_string())?;
    let body = doc.body().ok_or_else(|| "missing child body".to_string())?;
    let text = doc.create_text_node(&i18n(I18nKey::Processing));
    body.append_child(&text).map_err(js_err)?;
    Ok(text)
}

fn log_settled(name: &str, settled: &Settled) {
    match settled {
        Settled::Completed => {}
        Settled::Recovered { cause } => {
            gloo::console::warn!("action failed, fallback used", name.to_string(), cause.clone());
        }
        Settled::Failed { cause } => {
            gloo::console::error!("action failed", name.to_string(), cause.clone());
        }
    }
}
