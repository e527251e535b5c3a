use scoredl_core::sheet::{
    strip_thumbnail_suffix, FIRST_PAGE_LINK_SELECTOR, PAGE_THUMBNAIL_SELECTOR,
};
use scoredl_core::{ImgType, SheetInfoError};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlLinkElement};

/// Sheet pages as rendered by the live score page.
pub struct SheetInfo {
    document: Document,
}

impl SheetInfo {
    pub fn in_page(document: Document) -> Self {
        Self { document }
    }

    pub fn page_count(&self) -> usize {
        self.document
            .query_selector_all(PAGE_THUMBNAIL_SELECTOR)
            .map(|nodes| nodes.length() as usize)
            .unwrap_or(0)
    }

    /// First page image, without the host's `@<size>` suffix.
    pub fn thumbnail_url(&self) -> Result<String, SheetInfoError> {
        let link = self
            .document
            .query_selector(FIRST_PAGE_LINK_SELECTOR)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlLinkElement>().ok())
            .ok_or(SheetInfoError::MissingElement {
                selector: FIRST_PAGE_LINK_SELECTOR,
            })?;
        Ok(strip_thumbnail_suffix(&link.href()).to_string())
    }

    pub fn img_type(&self) -> Result<ImgType, SheetInfoError> {
        scoredl_core::sheet::img_type(&self.thumbnail_url()?)
    }
}
