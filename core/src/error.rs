use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreInfoError {
    MissingElement { selector: &'static str },
    PatternMismatch { field: &'static str, value: String },
    InvalidLookupUrl { base_url: String, reason: String },
    MissingBaseUrl,
    Fetch(String),
}

impl fmt::Display for ScoreInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreInfoError::MissingElement { selector } => {
                write!(f, "element not found: {selector}")
            }
            ScoreInfoError::PatternMismatch { field, value } => {
                write!(f, "unexpected {field} value: {value:?}")
            }
            ScoreInfoError::InvalidLookupUrl { base_url, reason } => {
                write!(f, "cannot build id lookup url from {base_url:?}: {reason}")
            }
            ScoreInfoError::MissingBaseUrl => write!(f, "score has no base url"),
            ScoreInfoError::Fetch(message) => write!(f, "id lookup failed: {message}"),
        }
    }
}

impl std::error::Error for ScoreInfoError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetInfoError {
    MissingElement { selector: &'static str },
    MissingImgType { url: String },
    UnsupportedImgType { ext: String },
}

impl fmt::Display for SheetInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetInfoError::MissingElement { selector } => {
                write!(f, "element not found: {selector}")
            }
            SheetInfoError::MissingImgType { url } => {
                write!(f, "thumbnail url has no score_0.<ext> token: {url}")
            }
            SheetInfoError::UnsupportedImgType { ext } => {
                write!(f, "unsupported thumbnail type '{ext}'")
            }
        }
    }
}

impl std::error::Error for SheetInfoError {}
