use std::cell::Cell;
use std::future::Future;
use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::ScoreInfoError;
use crate::score::is_placeholder_id;

pub const METADATA_HOST: &str = "s.musescore.com";
pub const METADATA_RESOURCE: &str = "space.jsonp";

/// One-shot override for a placeholder id. Once set, every read of the
/// owning score's id returns the canonical value.
#[derive(Debug, Default)]
pub struct ActualId(Cell<Option<u64>>);

impl ActualId {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<u64> {
        self.0.get()
    }

    pub fn or(&self, raw: u64) -> u64 {
        self.0.get().unwrap_or(raw)
    }

    /// Returns the stored id; a later resolution never replaces the first one.
    pub fn set(&self, id: u64) -> u64 {
        match self.0.get() {
            Some(existing) => existing,
            None => {
                self.0.set(Some(id));
                id
            }
        }
    }
}

pub fn lookup_url(base_url: &str) -> Result<String, ScoreInfoError> {
    let invalid = |reason: String| ScoreInfoError::InvalidLookupUrl {
        base_url: base_url.to_string(),
        reason,
    };
    if base_url.is_empty() {
        return Err(ScoreInfoError::MissingBaseUrl);
    }
    let mut url = Url::parse(&format!("{base_url}{METADATA_RESOURCE}"))
        .map_err(|err| invalid(err.to_string()))?;
    url.set_host(Some(METADATA_HOST))
        .map_err(|err| invalid(err.to_string()))?;
    Ok(url.into())
}

pub fn parse_jsonp_id(body: &str) -> Result<u64, ScoreInfoError> {
    static JSONP: OnceLock<Regex> = OnceLock::new();
    let pattern = JSONP.get_or_init(|| Regex::new(r"^jsonp(\d+)").expect("jsonp pattern"));
    pattern
        .captures(body)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| ScoreInfoError::PatternMismatch {
            field: "jsonp",
            value: body.chars().take(64).collect(),
        })
}

/// Exchanges a placeholder id for the canonical one.
///
/// Ids at or below the threshold resolve immediately without calling
/// `fetch_text`. Concurrent calls before the first exchange completes each
/// issue their own request; the first stored result wins.
pub async fn resolve_actual_id<F, Fut>(
    cell: &ActualId,
    raw_id: u64,
    base_url: &str,
    fetch_text: F,
) -> Result<u64, ScoreInfoError>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String, String>>,
{
    if let Some(id) = cell.get() {
        return Ok(id);
    }
    if !is_placeholder_id(raw_id) {
        return Ok(raw_id);
    }
    let url = lookup_url(base_url)?;
    let body = fetch_text(url).await.map_err(ScoreInfoError::Fetch)?;
    let id = parse_jsonp_id(&body)?;
    Ok(cell.set(id))
}
