#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures_util::future::{FutureExt, LocalBoxFuture};
use gloo::timers::future::TimeoutFuture;
use scoredl::btn::{
    build_download_btn, locate_btn_container, text_setter, BtnList, BtnOptions, CommitError,
    LocateAnchor,
};
use scoredl::btn_action::{
    deprecate_with, download, fallback, mscore_window_in, process, RendererWindows, UrlInput,
};
use scoredl::mscore::{Renderer, RendererLoader};
use scoredl::{ScoreInfo, SheetInfo};
use scoredl_core::{BtnListMode, Destroy, ImgType, ScoreInfoError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use wasm_bindgen_test::*;
use web_sys::{Document, Event, HtmlButtonElement, HtmlElement, HtmlIFrameElement, Text, Window};

wasm_bindgen_test_configure!(run_in_browser);

fn live_document() -> Document {
    web_sys::window()
        .and_then(|window| window.document())
        .expect("document")
}

fn blank_document() -> Document {
    live_document()
        .implementation()
        .expect("implementation")
        .create_html_document_with_title("blank")
        .expect("blank document")
}

fn button_with_handler(document: &Document) -> HtmlButtonElement {
    let btn = build_download_btn(document).expect("button");
    btn.set_onclick(Some(&js_sys::Function::new_no_args("")));
    btn
}

fn label(btn: &HtmlButtonElement) -> String {
    btn.query_selector("span")
        .ok()
        .flatten()
        .and_then(|span| span.text_content())
        .unwrap_or_default()
}

fn append_meta(document: &Document, property: &str, content: &str) {
    let meta = document.create_element("meta").expect("meta");
    meta.set_attribute("property", property).expect("property");
    meta.set_attribute("content", content).expect("content");
    document
        .head()
        .expect("head")
        .append_child(&meta)
        .expect("append meta");
}

#[wasm_bindgen_test]
async fn process_restores_name_and_handler_after_success() {
    let btn = button_with_handler(&live_document());
    let action = process(
        || async {
            TimeoutFuture::new(40).await;
            Ok(())
        },
        None,
        Some(5_000),
    );

    spawn_local(action("Download".to_string(), btn.clone(), text_setter(&btn)));
    TimeoutFuture::new(5).await;
    assert!(btn.onclick().is_none());
    assert_eq!(label(&btn), "Processing…");

    TimeoutFuture::new(120).await;
    assert_eq!(label(&btn), "Download");
    assert!(btn.onclick().is_some());
}

#[wasm_bindgen_test]
async fn process_timeout_shows_error_label() {
    let btn = button_with_handler(&live_document());
    let action = process(
        || async {
            TimeoutFuture::new(1_000).await;
            Ok(())
        },
        None,
        Some(20),
    );

    action("Download".to_string(), btn.clone(), text_setter(&btn)).await;
    assert_eq!(label(&btn), "❌Download Failed!");
    assert!(btn.onclick().is_some());
}

#[wasm_bindgen_test]
async fn fallback_recovers_failed_operation() {
    let btn = button_with_handler(&live_document());
    let action = process(
        || async { Err::<(), String>("boom".to_string()) },
        Some(fallback(|| async { Ok::<(), String>(()) })),
        None,
    );

    action("Download".to_string(), btn.clone(), text_setter(&btn)).await;
    assert_eq!(label(&btn), "Download");
}

#[wasm_bindgen_test]
async fn failing_fallback_is_a_failure() {
    let btn = button_with_handler(&live_document());
    let action = process(
        || async { Err::<(), String>("boom".to_string()) },
        Some(fallback(|| async { Err::<(), String>("still broken".to_string()) })),
        None,
    );

    action("Download".to_string(), btn.clone(), text_setter(&btn)).await;
    assert_eq!(label(&btn), "❌Download Failed!");
    assert!(btn.onclick().is_some());
}

#[wasm_bindgen_test]
async fn commit_without_anchor_uses_ext_window() {
    let locator: LocateAnchor = Rc::new(|_: &Document| -> Result<HtmlElement, CommitError> {
        Err(CommitError::AnchorNotFound)
    });
    let mut list = BtnList::with_anchor_locator(live_document(), locator);
    list.add(BtnOptions::new(
        "Download",
        process(|| async { Ok::<(), String>(()) }, None, None),
    ))
    .expect("add");

    let mode = list.commit(BtnListMode::InPage).await;
    assert_eq!(mode, Ok(BtnListMode::ExtWindow));
}

#[wasm_bindgen_test]
async fn commit_in_page_mounts_clones_in_shadow_root() {
    let document = live_document();
    let body = document.body().expect("body");
    let host: HtmlElement = document
        .create_element("div")
        .expect("div")
        .dyn_into()
        .expect("html element");
    body.prepend_with_node_1(&host).expect("prepend");

    let anchor = body.clone();
    let locator: LocateAnchor = Rc::new(move |_: &Document| -> Result<HtmlElement, CommitError> {
        Ok(anchor.clone())
    });
    let mut list = BtnList::with_anchor_locator(document.clone(), locator);
    let original = list
        .add(BtnOptions::new(
            "Download",
            process(|| async { Ok::<(), String>(()) }, None, None),
        ))
        .expect("add");
    list.add(BtnOptions::unavailable("Unavailable").tooltip("not configured"))
        .expect("add unavailable");

    let mode = list.commit(BtnListMode::InPage).await;
    assert_eq!(mode, Ok(BtnListMode::InPage));

    let root = document
        .query_selector("div")
        .expect("query")
        .expect("root div");
    let shadow = root.shadow_root().expect("shadow root");
    let buttons = shadow
        .query_selector_all(".btn-list button")
        .expect("buttons");
    assert_eq!(buttons.length(), 2);

    let first: HtmlButtonElement = buttons.item(0).expect("first").dyn_into().expect("button");
    assert_eq!(label(&first), "Download");
    let shared = first.onclick().expect("clone handler");
    let own = original.onclick().expect("original handler");
    assert!(js_sys::Object::is(&shared, &own));

    let second: HtmlButtonElement = buttons.item(1).expect("second").dyn_into().expect("button");
    assert!(second.disabled());
    assert!(second.onclick().is_none());
    assert_eq!(second.title(), "not configured");
}

#[wasm_bindgen_test]
fn in_page_score_info_reads_meta_tags() {
    let document = blank_document();
    append_meta(&document, "og:title", "Clair de Lune");
    append_meta(
        &document,
        "og:image",
        "https://musescore.com/static/musescore/scoredata/g/0a1b2c/score_0.png@500x660",
    );
    append_meta(&document, "al:ios:url", "musescore://score/6040123");

    let info = ScoreInfo::in_page(document);
    assert_eq!(info.id(), Ok(6_040_123));
    assert_eq!(info.title(), Ok("Clair de Lune".to_string()));
    assert_eq!(
        info.base_url(),
        Ok("https://musescore.com/static/musescore/scoredata/g/0a1b2c/".to_string())
    );
}

#[wasm_bindgen_test]
fn in_page_score_info_fails_loudly_without_markup() {
    let info = ScoreInfo::in_page(blank_document());
    assert!(matches!(info.title(), Err(ScoreInfoError::MissingElement { .. })));
    assert!(matches!(info.id(), Err(ScoreInfoError::MissingElement { .. })));
}

#[wasm_bindgen_test]
fn in_page_sheet_info_counts_pages_and_strips_suffix() {
    let document = blank_document();
    let body = document.body().expect("body");
    for _ in 0..3 {
        let page = document.create_element("div").expect("div");
        page.set_class_name("gXB83");
        body.append_child(&page).expect("append page");
    }
    let link = document.create_element("link").expect("link");
    link.set_attribute("as", "image").expect("as");
    link.set_attribute(
        "href",
        "https://musescore.com/static/musescore/scoredata/g/0a1b2c/score_0.svg@0?no-cache=1",
    )
    .expect("href");
    document
        .head()
        .expect("head")
        .append_child(&link)
        .expect("append link");

    let sheet = SheetInfo::in_page(document);
    assert_eq!(sheet.page_count(), 3);
    assert_eq!(
        sheet.thumbnail_url().expect("thumbnail"),
        "https://musescore.com/static/musescore/scoredata/g/0a1b2c/score_0.svg"
    );
    assert_eq!(sheet.img_type(), Ok(ImgType::Svg));
}

#[wasm_bindgen_test]
fn empty_sheet_has_no_pages() {
    let sheet = SheetInfo::in_page(blank_document());
    assert_eq!(sheet.page_count(), 0);
    assert!(sheet.thumbnail_url().is_err());
}

#[wasm_bindgen_test]
async fn timed_out_operation_keeps_running() {
    let btn = button_with_handler(&live_document());
    let finished = Rc::new(Cell::new(false));
    let flag = finished.clone();
    let action = process(
        move || {
            let flag = flag.clone();
            async move {
                TimeoutFuture::new(100).await;
                flag.set(true);
                Ok::<(), String>(())
            }
        },
        None,
        Some(20),
    );

    action("Download".to_string(), btn.clone(), text_setter(&btn)).await;
    assert_eq!(label(&btn), "❌Download Failed!");
    assert!(!finished.get());

    TimeoutFuture::new(200).await;
    assert!(finished.get());
}

#[wasm_bindgen_test]
async fn download_provider_is_called_per_click() {
    let btn = button_with_handler(&live_document());
    let calls = Rc::new(Cell::new(0u32));
    let counter = calls.clone();
    let action = download(
        UrlInput::provider(move || {
            counter.set(counter.get() + 1);
            let href = format!("#scoredl-download-{}", counter.get());
            async move { Ok::<String, String>(href) }
        }),
        None,
        None,
    );

    action("Download".to_string(), btn.clone(), text_setter(&btn)).await;
    action("Download".to_string(), btn.clone(), text_setter(&btn)).await;
    assert_eq!(calls.get(), 2);
    assert_eq!(label(&btn), "Download");
}

#[wasm_bindgen_test]
async fn download_pending_url_resolves_once() {
    let btn = button_with_handler(&live_document());
    let calls = Rc::new(Cell::new(0u32));
    let counter = calls.clone();
    let action = download(
        UrlInput::pending(async move {
            counter.set(counter.get() + 1);
            Ok::<String, String>("#scoredl-download-pending".to_string())
        }),
        None,
        None,
    );

    action("Download".to_string(), btn.clone(), text_setter(&btn)).await;
    action("Download".to_string(), btn.clone(), text_setter(&btn)).await;
    assert_eq!(calls.get(), 1);
    assert_eq!(label(&btn), "Download");
}

#[wasm_bindgen_test]
async fn download_provider_error_shows_error_label() {
    let btn = button_with_handler(&live_document());
    let action = download(
        UrlInput::provider(|| async { Err::<String, String>("no url".to_string()) }),
        None,
        None,
    );

    action("Download".to_string(), btn.clone(), text_setter(&btn)).await;
    assert_eq!(label(&btn), "❌Download Failed!");
    assert!(btn.onclick().is_some());
}

#[wasm_bindgen_test]
async fn deprecate_notifies_then_delegates() {
    let btn = button_with_handler(&live_document());
    let notices = Rc::new(RefCell::new(Vec::<String>::new()));
    let ran = Rc::new(Cell::new(false));

    let seen = notices.clone();
    let flag = ran.clone();
    let action = deprecate_with(
        process(
            move || {
                flag.set(true);
                async { Ok::<(), String>(()) }
            },
            None,
            None,
        ),
        Rc::new(move |notice: &str| seen.borrow_mut().push(notice.to_string())),
    );

    action("First page".to_string(), btn.clone(), text_setter(&btn)).await;
    assert!(ran.get());
    assert_eq!(label(&btn), "First page");
    let notices = notices.borrow();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("First page"));
}

#[wasm_bindgen_test]
fn anchor_heuristic_finds_nothing_in_blank_document() {
    assert_eq!(
        locate_btn_container(&blank_document()).err(),
        Some(CommitError::AnchorNotFound)
    );
}

#[wasm_bindgen_test]
fn anchor_heuristic_returns_grandparent_of_last_match() {
    let document = blank_document();
    let body = document.body().expect("body");
    body.set_inner_html("<div id=\"outer\"><div><span>Download</span></div></div>");

    let anchor = locate_btn_container(&document).expect("anchor");
    assert_eq!(anchor.id(), "outer");
}

#[wasm_bindgen_test]
async fn removed_root_is_rendered_again() {
    let document = live_document();
    let body = document.body().expect("body");
    let spare = document.create_element("div").expect("spare");
    body.prepend_with_node_1(&spare).expect("prepend spare");
    let host = document.create_element("div").expect("host");
    body.prepend_with_node_1(&host).expect("prepend host");

    let anchor = body.clone();
    let locator: LocateAnchor = Rc::new(move |_: &Document| -> Result<HtmlElement, CommitError> {
        Ok(anchor.clone())
    });
    let mut list = BtnList::with_anchor_locator(document.clone(), locator);
    list.add(BtnOptions::new(
        "Download",
        process(|| async { Ok::<(), String>(()) }, None, None),
    ))
    .expect("add");
    assert_eq!(list.commit(BtnListMode::InPage).await, Ok(BtnListMode::InPage));
    assert!(host.shadow_root().is_some());

    host.remove();
    TimeoutFuture::new(0).await;

    let shadow = spare.shadow_root().expect("re-rendered shadow root");
    let buttons = shadow
        .query_selector_all(".btn-list button")
        .expect("buttons");
    assert_eq!(buttons.length(), 1);
}

struct CountingRenderer {
    destroyed: Rc<Cell<u32>>,
}

impl Destroy for CountingRenderer {
    fn destroy(&self) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

impl Renderer for CountingRenderer {}

struct CountingLoader {
    destroyed: Rc<Cell<u32>>,
}

impl RendererLoader for CountingLoader {
    fn load(
        &self,
        _info: &ScoreInfo,
        _window: &Window,
    ) -> LocalBoxFuture<'static, Result<Rc<dyn Renderer>, String>> {
        let renderer: Rc<dyn Renderer> = Rc::new(CountingRenderer {
            destroyed: self.destroyed.clone(),
        });
        async move { Ok(renderer) }.boxed_local()
    }
}

/// Two same-origin frames standing in for the host page and the popup.
struct FrameWindows {
    host: Window,
    child: Window,
}

impl RendererWindows for FrameWindows {
    fn host(&self) -> Result<Window, String> {
        Ok(self.host.clone())
    }

    fn open_child(&self, _anchor: &HtmlButtonElement) -> LocalBoxFuture<'static, Option<Window>> {
        let child = self.child.clone();
        async move { Some(child) }.boxed_local()
    }
}

fn frame_window(document: &Document) -> Window {
    let frame: HtmlIFrameElement = document
        .create_element("iframe")
        .expect("iframe")
        .dyn_into()
        .expect("iframe element");
    document
        .body()
        .expect("body")
        .append_child(&frame)
        .expect("append iframe");
    frame.content_window().expect("frame window")
}

fn dispatch(target: &Window, kind: &str) {
    let event = Event::new(kind).expect("event");
    target.dispatch_event(&event).expect("dispatch");
}

struct RendererFixture {
    host: Window,
    child: Window,
    destroyed: Rc<Cell<u32>>,
    placeholder: Rc<RefCell<String>>,
    btn: HtmlButtonElement,
}

async fn open_renderer_window() -> RendererFixture {
    let document = live_document();
    let host = frame_window(&document);
    let child = frame_window(&document);
    let destroyed = Rc::new(Cell::new(0u32));
    let placeholder = Rc::new(RefCell::new(String::new()));

    let seen = placeholder.clone();
    let action = mscore_window_in(
        Rc::new(FrameWindows {
            host: host.clone(),
            child: child.clone(),
        }),
        Rc::new(ScoreInfo::literal(6_040_123, "Clair de Lune")),
        Rc::new(CountingLoader {
            destroyed: destroyed.clone(),
        }),
        move |_child: &Window, _renderer: Rc<dyn Renderer>, text: &Text| {
            *seen.borrow_mut() = text.data();
            text.set_data("ready");
        },
    );

    let btn = button_with_handler(&document);
    action("View".to_string(), btn.clone(), text_setter(&btn)).await;
    RendererFixture {
        host,
        child,
        destroyed,
        placeholder,
        btn,
    }
}

#[wasm_bindgen_test]
async fn child_close_destroys_once_and_restores_button() {
    let fixture = open_renderer_window().await;
    assert_eq!(fixture.placeholder.borrow().as_str(), "Processing…");
    assert_eq!(label(&fixture.btn), "Processing…");
    assert!(fixture.btn.onclick().is_none());
    assert_eq!(fixture.destroyed.get(), 0);

    dispatch(&fixture.child, "beforeunload");
    assert_eq!(fixture.destroyed.get(), 1);
    assert_eq!(label(&fixture.btn), "View");
    assert!(fixture.btn.onclick().is_some());

    dispatch(&fixture.host, "unload");
    assert_eq!(fixture.destroyed.get(), 1);
}

#[wasm_bindgen_test]
async fn host_unload_destroys_once_before_child_close() {
    let fixture = open_renderer_window().await;

    dispatch(&fixture.host, "unload");
    assert_eq!(fixture.destroyed.get(), 1);

    dispatch(&fixture.child, "beforeunload");
    assert_eq!(fixture.destroyed.get(), 1);
    assert_eq!(label(&fixture.btn), "View");
    assert!(fixture.btn.onclick().is_some());
}
