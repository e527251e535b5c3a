#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum I18nKey {
    Processing,
    BtnError,
    DeprecationNotice,
    DownloadMscz,
    MsczUnavailable,
    ViewScore,
    DownloadThumbnail,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    Es,
    Zh,
}

impl Locale {
    /// Maps a BCP 47 tag such as `es-MX` onto a built-in table.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match primary.as_str() {
            "es" => Locale::Es,
            "zh" => Locale::Zh,
            _ => Locale::En,
        }
    }
}

pub fn text(locale: Locale, key: I18nKey) -> &'static str {
    match locale {
        Locale::En => en(key),
        Locale::Es => es(key),
        Locale::Zh => zh(key),
    }
}

pub fn format(locale: Locale, key: I18nKey, args: &[&str]) -> String {
    let mut out = text(locale, key).to_string();
    for (idx, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{idx}}}"), arg);
    }
    out
}

fn en(key: I18nKey) -> &'static str {
    match key {
        I18nKey::Processing => "Processing…",
        I18nKey::BtnError => "❌Download Failed!",
        I18nKey::DeprecationNotice => {
            "DEPRECATED!\nUse `{0}` at your own risk; it will be removed in a future release."
        }
        I18nKey::DownloadMscz => "Download MSCZ",
        I18nKey::MsczUnavailable => "No MSCZ source is configured for this build",
        I18nKey::ViewScore => "View score",
        I18nKey::DownloadThumbnail => "Download first page",
    }
}

fn es(key: I18nKey) -> &'static str {
    match key {
        I18nKey::Processing => "Procesando…",
        I18nKey::BtnError => "❌¡Descarga fallida!",
        I18nKey::DeprecationNotice => {
            "¡OBSOLETO!\nUsa `{0}` bajo tu propio riesgo; se eliminará en una versión futura."
        }
        I18nKey::DownloadMscz => "Descargar MSCZ",
        I18nKey::MsczUnavailable => "Esta compilación no tiene una fuente MSCZ configurada",
        I18nKey::ViewScore => "Ver partitura",
        I18nKey::DownloadThumbnail => "Descargar primera página",
    }
}

fn zh(key: I18nKey) -> &'static str {
    match key {
        I18nKey::Processing => "处理中…",
        I18nKey::BtnError => "❌下载失败！",
        I18nKey::DeprecationNotice => "已弃用！\n请自行承担使用 `{0}` 的风险，它将在未来版本中移除。",
        I18nKey::DownloadMscz => "下载 MSCZ",
        I18nKey::MsczUnavailable => "此版本未配置 MSCZ 来源",
        I18nKey::ViewScore => "查看乐谱",
        I18nKey::DownloadThumbnail => "下载第一页",
    }
}
