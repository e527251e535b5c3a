use scoredl_core::html::{
    base_url_from_image, id_from_ios_url, parse_score_html, ID_META_SELECTOR,
    IMAGE_META_SELECTOR, TITLE_META_SELECTOR,
};
use scoredl_core::{escape_filename, id_last_digit, ipfs, ActualId, ScoreInfoError, ScoreMeta};
use web_sys::Document;

use crate::fetch::{Fetch, FetchMethod};

enum ScoreSource {
    Literal { id: u64, title: String },
    InPage(Document),
    Html(ScoreMeta),
}

/// What score is on the page. Live-document reads fail loudly when the
/// host markup is missing; html reads degrade to `0` / `""`.
pub struct ScoreInfo {
    source: ScoreSource,
    actual_id: ActualId,
}

impl ScoreInfo {
    pub fn literal(id: u64, title: impl Into<String>) -> Self {
        Self::from_source(ScoreSource::Literal {
            id,
            title: title.into(),
        })
    }

    pub fn in_page(document: Document) -> Self {
        Self::from_source(ScoreSource::InPage(document))
    }

    pub fn from_html(html: &str) -> Self {
        Self::from_source(ScoreSource::Html(parse_score_html(html)))
    }

    fn from_source(source: ScoreSource) -> Self {
        Self {
            source,
            actual_id: ActualId::new(),
        }
    }

    /// Fetches and parses a score page. Any failure yields an empty
    /// instance (`is_empty()`, `title() == ""`).
    pub async fn request(url: &str, fetch: &dyn Fetch) -> Self {
        match fetch.fetch(url, FetchMethod::Get).await {
            Ok(response) if response.ok => Self::from_html(&response.text),
            _ => Self::from_html(""),
        }
    }

    pub fn id(&self) -> Result<u64, ScoreInfoError> {
        if let Some(id) = self.actual_id.get() {
            return Ok(id);
        }
        self.raw_id()
    }

    fn raw_id(&self) -> Result<u64, ScoreInfoError> {
        match &self.source {
            ScoreSource::Literal { id, .. } => Ok(*id),
            ScoreSource::Html(meta) => Ok(meta.id),
            ScoreSource::InPage(document) => {
                let content = meta_content(document, ID_META_SELECTOR)?;
                id_from_ios_url(&content).ok_or(ScoreInfoError::PatternMismatch {
                    field: "al:ios:url",
                    value: content,
                })
            }
        }
    }

    pub fn title(&self) -> Result<String, ScoreInfoError> {
        match &self.source {
            ScoreSource::Literal { title, .. } => Ok(title.clone()),
            ScoreSource::Html(meta) => Ok(meta.title.clone()),
            ScoreSource::InPage(document) => meta_content(document, TITLE_META_SELECTOR),
        }
    }

    /// Directory of the first page image; empty for literal and unparsable html.
    pub fn base_url(&self) -> Result<String, ScoreInfoError> {
        match &self.source {
            ScoreSource::Literal { .. } => Ok(String::new()),
            ScoreSource::Html(meta) => Ok(meta.base_url.clone()),
            ScoreSource::InPage(document) => {
                let content = meta_content(document, IMAGE_META_SELECTOR)?;
                base_url_from_image(&content).ok_or(ScoreInfoError::PatternMismatch {
                    field: "og:image",
                    value: content,
                })
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.source {
            ScoreSource::Html(meta) => meta.is_empty() && self.actual_id.get().is_none(),
            _ => false,
        }
    }

    pub fn id_last_digit(&self) -> Result<u64, ScoreInfoError> {
        Ok(id_last_digit(self.id()?))
    }

    pub fn file_name(&self) -> Result<String, ScoreInfoError> {
        Ok(escape_filename(&self.title()?))
    }

    pub fn mscz_ipfs_ref(&self, main_cid: &str) -> Result<String, ScoreInfoError> {
        Ok(ipfs::mscz_ipfs_ref(main_cid, self.id()?))
    }

    pub fn mscz_cid_url(&self, main_cid: &str) -> Result<String, ScoreInfoError> {
        Ok(ipfs::mscz_cid_url(main_cid, self.id()?))
    }
}

/// Exchanges a placeholder id for the backend id and memoizes it on `info`.
/// Canonical ids return immediately without touching the network.
pub async fn get_actual_id(info: &ScoreInfo, fetch: &dyn Fetch) -> Result<u64, ScoreInfoError> {
    if let Some(id) = info.actual_id.get() {
        return Ok(id);
    }
    let raw_id = info.raw_id()?;
    if !scoredl_core::score::is_placeholder_id(raw_id) {
        return Ok(raw_id);
    }
    let base_url = info.base_url()?;
    scoredl_core::resolve_actual_id(&info.actual_id, raw_id, &base_url, |url| async move {
        let response = fetch.fetch(&url, FetchMethod::Get).await?;
        Ok::<String, String>(response.text)
    })
    .await
}

fn meta_content(document: &Document, selector: &'static str) -> Result<String, ScoreInfoError> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.get_attribute("content"))
        .ok_or(ScoreInfoError::MissingElement { selector })
}
