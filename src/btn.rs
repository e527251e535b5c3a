use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use gloo::events::EventListener;
use scoredl_core::{BtnListMode, EXT_WINDOW_FEATURES};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, MouseEvent, MutationObserver, MutationObserverInit, Node};

use crate::btn_action::{BtnAction, SetText};
use crate::dom::{attach_shadow, create, js_err, window, window_open_async, SVG_NS};

const BTN_LIST_CSS: &str = include_str!("btn.css");
const DOWNLOAD_ICON_PATH: &str =
    "M9.6 2.4h4.8V12h2.784l-5.18 5.18L6.823 12H9.6V2.4zM19.2 19.2H4.8v2.4h14.4v-2.4z";

pub type LocateAnchor = Rc<dyn Fn(&Document) -> Result<HtmlElement, CommitError>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitError {
    AnchorNotFound,
    MissingRoot,
    Dom(String),
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitError::AnchorNotFound => write!(f, "download button container not found"),
            CommitError::MissingRoot => write!(f, "page has no <div> to host the button list"),
            CommitError::Dom(reason) => write!(f, "dom error: {reason}"),
        }
    }
}

impl std::error::Error for CommitError {}

impl From<String> for CommitError {
    fn from(reason: String) -> Self {
        CommitError::Dom(reason)
    }
}

/// A button to add. Without an action the button is rendered disabled.
pub struct BtnOptions {
    pub name: String,
    pub action: Option<BtnAction>,
    pub tooltip: Option<String>,
}

impl BtnOptions {
    pub fn new(name: impl Into<String>, action: BtnAction) -> Self {
        Self {
            name: name.into(),
            action: Some(action),
            tooltip: None,
        }
    }

    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: None,
            tooltip: None,
        }
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

/// Finds the host's own download/print controls: the last element whose
/// whitespace-free text mentions either, two levels up.
pub fn locate_btn_container(document: &Document) -> Result<HtmlElement, CommitError> {
    let nodes = document.query_selector_all("*").map_err(js_err)?;
    let matched = (0..nodes.length())
        .rev()
        .filter_map(|idx| nodes.item(idx))
        .find(|node| {
            let text: String = node
                .text_content()
                .unwrap_or_default()
                .chars()
                .filter(|ch| !ch.is_whitespace())
                .collect();
            text.contains("Download") || text.contains("Print")
        });
    matched
        .and_then(|node| node.parent_element())
        .and_then(|parent| parent.parent_element())
        .and_then(|container| container.dyn_into::<HtmlElement>().ok())
        .ok_or(CommitError::AnchorNotFound)
}

pub fn build_download_btn(document: &Document) -> Result<HtmlButtonElement, String> {
    let btn: HtmlButtonElement = create(document, "button")?;
    btn.set_type("button");

    let svg = document
        .create_element_ns(Some(SVG_NS), "svg")
        .map_err(js_err)?;
    svg.set_attribute("width", "20").map_err(js_err)?;
    svg.set_attribute("height", "20").map_err(js_err)?;
    svg.set_attribute("viewBox", "0 0 24 24").map_err(js_err)?;
    let path = document
        .create_element_ns(Some(SVG_NS), "path")
        .map_err(js_err)?;
    path.set_attribute("fill", "#fff").map_err(js_err)?;
    path.set_attribute("d", DOWNLOAD_ICON_PATH).map_err(js_err)?;
    svg.append_child(&path).map_err(js_err)?;
    btn.append_child(&svg).map_err(js_err)?;

    let label: HtmlElement = create(document, "span")?;
    btn.append_child(&label).map_err(js_err)?;
    Ok(btn)
}

/// Label setter bound to the `<span>` of this particular button.
pub fn text_setter(btn: &HtmlButtonElement) -> SetText {
    let label = btn.query_selector("span").ok().flatten();
    Rc::new(move |text: &str| {
        if let Some(label) = label.as_ref() {
            label.set_text_content(Some(text));
        }
    })
}

/// Deep copy that keeps the click handler; `cloneNode` alone drops it.
pub fn clone_btn(btn: &HtmlButtonElement) -> Result<HtmlButtonElement, String> {
    let copy = btn
        .clone_node_with_deep(true)
        .map_err(js_err)?
        .dyn_into::<HtmlButtonElement>()
        .map_err(|_| "button clone has an unexpected type".to_string())?;
    copy.set_onclick(btn.onclick().as_ref());
    Ok(copy)
}

pub struct BtnList {
    document: Document,
    list: Vec<HtmlButtonElement>,
    locate_anchor: LocateAnchor,
}

impl BtnList {
    pub fn new(document: Document) -> Self {
        Self::with_anchor_locator(document, Rc::new(locate_btn_container))
    }

    pub fn with_anchor_locator(document: Document, locate_anchor: LocateAnchor) -> Self {
        Self {
            document,
            list: Vec::new(),
            locate_anchor,
        }
    }

    /// Builds a button whose click runs `options.action` against whichever
    /// copy of the button was clicked.
    pub fn add(&mut self, options: BtnOptions) -> Result<HtmlButtonElement, String> {
        let BtnOptions {
            name,
            action,
            tooltip,
        } = options;
        let btn = build_download_btn(&self.document)?;
        text_setter(&btn)(&name);

        match action {
            Some(action) => {
                let onclick = Closure::wrap(Box::new(move |event: MouseEvent| {
                    let Some(clicked) = event
                        .current_target()
                        .and_then(|target| target.dyn_into::<HtmlButtonElement>().ok())
                    else {
                        return;
                    };
                    let set_text = text_setter(&clicked);
                    spawn_local(action(name.clone(), clicked, set_text));
                }) as Box<dyn FnMut(MouseEvent)>);
                btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
                onclick.forget();
            }
            None => btn.set_disabled(true),
        }
        if let Some(tooltip) = tooltip {
            btn.set_title(&tooltip);
        }
        self.list.push(btn.clone());
        Ok(btn)
    }

    /// Mounts the list. In-page mounting falls back to a separate window when
    /// the host controls cannot be found; the returned mode is the one used.
    pub async fn commit(self, mode: BtnListMode) -> Result<BtnListMode, CommitError> {
        match mode {
            BtnListMode::InPage => match self.render_in_page() {
                Ok(root) => {
                    self.watch(root)?;
                    Ok(BtnListMode::InPage)
                }
                Err(err) => {
                    gloo::console::warn!("in-page buttons unavailable, opening window", err.to_string());
                    self.commit_ext_window().await
                }
            },
            BtnListMode::ExtWindow => self.commit_ext_window().await,
        }
    }

    fn render_in_page(&self) -> Result<Element, CommitError> {
        let anchor = (self.locate_anchor)(&self.document)?;
        let host = self
            .document
            .query_selector("div")
            .map_err(js_err)?
            .ok_or(CommitError::MissingRoot)?;
        self.render_into(&host, Some(&anchor))?;
        Ok(host)
    }

    fn render_into(&self, host: &Element, anchor: Option<&HtmlElement>) -> Result<(), CommitError> {
        let shadow = attach_shadow(host)?;

        let style: HtmlElement = create(&self.document, "style")?;
        style.set_text_content(Some(BTN_LIST_CSS));
        shadow.append_child(&style).map_err(js_err)?;

        // keep the host's own children visible
        let slot = self.document.create_element("slot").map_err(js_err)?;
        shadow.append_child(&slot).map_err(js_err)?;

        let container: HtmlElement = create(&self.document, "div")?;
        container.set_class_name("btn-list");
        for btn in &self.list {
            let copy = clone_btn(btn)?;
            container.append_child(&copy).map_err(js_err)?;
        }
        if let Some(anchor) = anchor {
            let rect = anchor.get_bounding_client_rect();
            let style = container.style();
            style
                .set_property("width", &format!("{}px", rect.width()))
                .map_err(js_err)?;
            style
                .set_property("top", &format!("{}px", rect.top()))
                .map_err(js_err)?;
            style
                .set_property("left", &format!("{}px", rect.left()))
                .map_err(js_err)?;
        }
        shadow.append_child(&container).map_err(js_err)?;
        Ok(())
    }

    /// Re-renders whenever the host drops the root from the document. A
    /// failed re-render is retried on the next mutation.
    fn watch(self, root: Element) -> Result<(), CommitError> {
        let document = self.document.clone();
        let list = Rc::new(self);
        let current = Rc::new(RefCell::new(root));
        let failing = Rc::new(Cell::new(false));

        let observed = document.clone();
        let callback = Closure::wrap(Box::new(move |_records: js_sys::Array, _observer: MutationObserver| {
            let Ok(mut root) = current.try_borrow_mut() else {
                return;
            };
            let node: &Node = &root;
            if observed.contains(Some(node)) {
                return;
            }
            match list.render_in_page() {
                Ok(next) => {
                    *root = next;
                    failing.set(false);
                }
                Err(err) => {
                    if !failing.replace(true) {
                        gloo::console::warn!("button list re-render failed", err.to_string());
                    }
                }
            }
        }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(js_err)?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(&document, &init)
            .map_err(js_err)?;
        callback.forget();
        Ok(())
    }

    async fn commit_ext_window(self) -> Result<BtnListMode, CommitError> {
        let root: Element = create(&self.document, "div")?;
        self.render_into(&root, None)?;

        let Some(popup) = window_open_async(None, "", Some(EXT_WINDOW_FEATURES)).await else {
            gloo::console::warn!("button list window was blocked");
            return Ok(BtnListMode::ExtWindow);
        };
        let body = popup
            .document()
            .and_then(|doc| doc.body())
            .ok_or_else(|| CommitError::Dom("button list window has no body".to_string()))?;
        body.append_child(&root).map_err(js_err)?;

        let host = window()?;
        EventListener::new(&host, "unload", move |_| {
            let _ = popup.close();
        })
        .forget();
        Ok(BtnListMode::ExtWindow)
    }
}
