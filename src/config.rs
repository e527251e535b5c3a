use scoredl_core::{BtnListMode, Locale, ModeParseError, DEFAULT_TIMEOUT_MS};

use crate::i18n::browser_locale;

const HASH_MODE_KEY: &str = "scoredl-mode";
const HASH_TIMEOUT_KEY: &str = "scoredl-timeout";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub mode: BtnListMode,
    pub action_timeout_ms: u32,
    pub main_cid: Option<String>,
    pub ipfs_gateway: String,
    pub locale: Locale,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: BtnListMode::default(),
            action_timeout_ms: DEFAULT_TIMEOUT_MS,
            main_cid: None,
            ipfs_gateway: scoredl_core::ipfs::DEFAULT_GATEWAY.to_string(),
            locale: Locale::default(),
        }
    }
}

/// Build-time defaults (`SCOREDL_*`, forwarded from `.env` by the build
/// script), then overrides from the host page's `#scoredl-mode=...` hash.
pub fn load_config() -> Result<Config, ModeParseError> {
    let mut config = build_time_config()?;
    config.locale = browser_locale();
    let hash = web_sys::window()
        .and_then(|window| window.location().hash().ok())
        .unwrap_or_default();
    apply_hash_overrides(&mut config, &hash)?;
    Ok(config)
}

pub fn build_time_config() -> Result<Config, ModeParseError> {
    let mut config = Config::default();
    if let Some(mode) = non_empty(option_env!("SCOREDL_MODE")) {
        config.mode = BtnListMode::parse(mode)?;
    }
    if let Some(timeout) = non_empty(option_env!("SCOREDL_TIMEOUT_MS")) {
        if let Ok(ms) = timeout.parse::<u32>() {
            if ms > 0 {
                config.action_timeout_ms = ms;
            }
        }
    }
    config.main_cid = non_empty(option_env!("SCOREDL_MAIN_CID")).map(str::to_string);
    if let Some(gateway) = non_empty(option_env!("SCOREDL_IPFS_GATEWAY")) {
        config.ipfs_gateway = gateway.trim_end_matches('/').to_string();
    }
    Ok(config)
}

pub fn apply_hash_overrides(config: &mut Config, hash: &str) -> Result<(), ModeParseError> {
    let raw = hash.trim().trim_start_matches('#').trim();
    for chunk in raw.split(';') {
        let mut iter = chunk.trim().splitn(2, '=');
        let key = iter.next().unwrap_or("").trim();
        let value = iter.next().unwrap_or("").trim();
        if key.eq_ignore_ascii_case(HASH_MODE_KEY) {
            config.mode = BtnListMode::parse(value)?;
        } else if key.eq_ignore_ascii_case(HASH_TIMEOUT_KEY) {
            match value.parse::<u32>() {
                Ok(ms) if ms > 0 => config.action_timeout_ms = ms,
                _ => gloo::console::warn!("ignoring invalid timeout override", value.to_string()),
            }
        }
    }
    Ok(())
}

fn non_empty(value: Option<&'static str>) -> Option<&'static str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
