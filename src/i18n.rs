use std::cell::Cell;

use scoredl_core::i18n::{format, text};
use scoredl_core::{I18nKey, Locale};

thread_local! {
    static LOCALE: Cell<Locale> = Cell::new(Locale::default());
}

pub fn set_locale(locale: Locale) {
    LOCALE.with(|slot| slot.set(locale));
}

pub fn locale() -> Locale {
    LOCALE.with(|slot| slot.get())
}

pub fn i18n(key: I18nKey) -> String {
    text(locale(), key).to_string()
}

pub fn i18n_with(key: I18nKey, args: &[&str]) -> String {
    format(locale(), key, args)
}

/// `navigator.language`, or the default table outside a browser.
pub fn browser_locale() -> Locale {
    web_sys::window()
        .and_then(|window| window.navigator().language())
        .map(|tag| Locale::from_tag(&tag))
        .unwrap_or_default()
}
