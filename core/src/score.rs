use std::sync::OnceLock;

use regex::Regex;

pub const ID_RADIX: u64 = 20;

/// Ids above this value are page-local placeholders that must be exchanged
/// for the backend id before they can address storage.
pub const PLACEHOLDER_ID_THRESHOLD: u64 = 1_000_000_000_000;

pub fn id_last_digit(id: u64) -> u64 {
    id % ID_RADIX
}

pub fn is_placeholder_id(id: u64) -> bool {
    id > PLACEHOLDER_ID_THRESHOLD
}

pub fn escape_filename(title: &str) -> String {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE.get_or_init(|| {
        Regex::new(r#"[\s<>:{}"/\\|?*~.\x00-\x1F]+"#).expect("filename pattern")
    });
    unsafe_chars.replace_all(title, "_").into_owned()
}

/// Resolved `{id, title}` pair plus the directory used for the id lookup.
/// `base_url` is empty for literal scores and for unparsable html.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreMeta {
    pub id: u64,
    pub title: String,
    pub base_url: String,
}

impl ScoreMeta {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            base_url: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id == 0 && self.title.is_empty()
    }

    pub fn id_last_digit(&self) -> u64 {
        id_last_digit(self.id)
    }

    pub fn file_name(&self) -> String {
        escape_filename(&self.title)
    }
}
