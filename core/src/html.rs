use std::sync::OnceLock;

use regex::Regex;

use crate::score::ScoreMeta;

pub const ID_META_SELECTOR: &str = "meta[property='al:ios:url']";
pub const TITLE_META_SELECTOR: &str = "meta[property='og:title']";
pub const IMAGE_META_SELECTOR: &str = "meta[property='og:image']";

struct Patterns {
    id_tag: Regex,
    title_tag: Regex,
    base_url_tag: Regex,
    trailing_digits: Regex,
    image_dir: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        id_tag: Regex::new(r#"<meta property="al:ios:url" content="musescore://score/(\d+)">"#)
            .expect("id tag pattern"),
        title_tag: Regex::new(r#"<meta property="og:title" content="(.*)">"#)
            .expect("title tag pattern"),
        base_url_tag: Regex::new(r#"<meta property="og:image" content="(.+/)score_.*">"#)
            .expect("image tag pattern"),
        trailing_digits: Regex::new(r"(\d+)$").expect("digits pattern"),
        image_dir: Regex::new(r"^(.+/)score_").expect("image dir pattern"),
    })
}

/// Reads score metadata out of a raw page. Missing tags degrade to
/// `0` / empty strings instead of failing.
pub fn parse_score_html(html: &str) -> ScoreMeta {
    let p = patterns();
    let id = p
        .id_tag
        .captures(html)
        .and_then(|caps| caps[1].parse::<u64>().ok())
        .unwrap_or(0);
    let title = p
        .title_tag
        .captures(html)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();
    let base_url = p
        .base_url_tag
        .captures(html)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();
    ScoreMeta {
        id,
        title,
        base_url,
    }
}

/// `musescore://score/123` -> `123`
pub fn id_from_ios_url(content: &str) -> Option<u64> {
    patterns()
        .trailing_digits
        .captures(content)
        .and_then(|caps| caps[1].parse().ok())
}

/// `https://host/dir/score_0.png@300x420` -> `https://host/dir/`
pub fn base_url_from_image(content: &str) -> Option<String> {
    patterns()
        .image_dir
        .captures(content)
        .map(|caps| caps[1].to_string())
}
