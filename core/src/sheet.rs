use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::SheetInfoError;

pub const PAGE_THUMBNAIL_SELECTOR: &str = ".gXB83";
pub const FIRST_PAGE_LINK_SELECTOR: &str = "link[as=image]";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImgType {
    Svg,
    Png,
}

impl ImgType {
    pub fn as_str(self) -> &'static str {
        match self {
            ImgType::Svg => "svg",
            ImgType::Png => "png",
        }
    }
}

impl fmt::Display for ImgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drops the `@<size>` resize suffix the host page appends to thumbnails.
pub fn strip_thumbnail_suffix(href: &str) -> &str {
    href.split('@').next().unwrap_or(href)
}

pub fn img_type(thumbnail_url: &str) -> Result<ImgType, SheetInfoError> {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    let token = TOKEN.get_or_init(|| Regex::new(r"score_0\.(\w+)").expect("thumbnail pattern"));
    let caps = token
        .captures(thumbnail_url)
        .ok_or_else(|| SheetInfoError::MissingImgType {
            url: thumbnail_url.to_string(),
        })?;
    match &caps[1] {
        "svg" => Ok(ImgType::Svg),
        "png" => Ok(ImgType::Png),
        other => Err(SheetInfoError::UnsupportedImgType {
            ext: other.to_string(),
        }),
    }
}
