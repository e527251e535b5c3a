use std::rc::Rc;

use scoredl_core::ipfs::{gateway_url, parse_block_stat};
use scoredl_core::I18nKey;

use crate::btn::{BtnList, BtnOptions};
use crate::btn_action::{deprecate, download, mscore_window, UrlInput};
use crate::config::{load_config, Config};
use crate::dom::document;
use crate::fetch::{Fetch, FetchMethod, WindowFetch};
use crate::i18n::{i18n, set_locale};
use crate::mscore::{GlobalMscoreLoader, RendererLoader};
use crate::score_info::{get_actual_id, ScoreInfo};
use crate::sheet_info::SheetInfo;

/// Reads the score page, assembles the default buttons and mounts them.
pub async fn run() -> Result<(), String> {
    let config = load_config().map_err(|err| err.to_string())?;
    set_locale(config.locale);

    let document = document()?;
    let fetch: Rc<dyn Fetch> = Rc::new(WindowFetch);
    let score = Rc::new(ScoreInfo::in_page(document.clone()));
    let sheet = Rc::new(SheetInfo::in_page(document.clone()));

    let mut list = BtnList::new(document);
    list.add(mscz_btn(&config, score.clone(), fetch))?;
    list.add(view_btn(score, sheet.clone()))?;
    list.add(thumbnail_btn(&config, sheet))?;

    let mode = list
        .commit(config.mode)
        .await
        .map_err(|err| err.to_string())?;
    gloo::console::log!("scoredl buttons mounted", mode.to_string());
    Ok(())
}

fn mscz_btn(config: &Config, score: Rc<ScoreInfo>, fetch: Rc<dyn Fetch>) -> BtnOptions {
    let name = i18n(I18nKey::DownloadMscz);
    let Some(main_cid) = config.main_cid.clone() else {
        return BtnOptions::unavailable(name).tooltip(i18n(I18nKey::MsczUnavailable));
    };
    let gateway = config.ipfs_gateway.clone();
    let url = UrlInput::provider(move || {
        let score = score.clone();
        let fetch = fetch.clone();
        let main_cid = main_cid.clone();
        let gateway = gateway.clone();
        async move { mscz_url(&score, &*fetch, &main_cid, &gateway).await }
    });
    BtnOptions::new(name, download(url, None, Some(config.action_timeout_ms)))
}

async fn mscz_url(
    score: &ScoreInfo,
    fetch: &dyn Fetch,
    main_cid: &str,
    gateway: &str,
) -> Result<String, String> {
    get_actual_id(score, fetch)
        .await
        .map_err(|err| err.to_string())?;
    let stat_url = score.mscz_cid_url(main_cid).map_err(|err| err.to_string())?;
    let response = fetch.fetch(&stat_url, FetchMethod::Post).await?;
    if !response.ok {
        return Err(format!("block stat failed with status {}", response.status));
    }
    let stat = parse_block_stat(&response.text)?;
    if stat.size == 0 {
        return Err(format!("block {} is empty", stat.key));
    }
    let ipfs_ref = score.mscz_ipfs_ref(main_cid).map_err(|err| err.to_string())?;
    Ok(gateway_url(gateway, &ipfs_ref))
}

fn view_btn(score: Rc<ScoreInfo>, sheet: Rc<SheetInfo>) -> BtnOptions {
    let loader: Rc<dyn RendererLoader> = Rc::new(GlobalMscoreLoader::default());
    let info = score.clone();
    let action = mscore_window(info, loader, move |_child, _renderer, placeholder| {
        let title = score.title().unwrap_or_default();
        placeholder.set_data(&format!("{title} ({})", sheet.page_count()));
    });
    BtnOptions::new(i18n(I18nKey::ViewScore), action)
}

fn thumbnail_btn(config: &Config, sheet: Rc<SheetInfo>) -> BtnOptions {
    let url = UrlInput::provider(move || {
        let sheet = sheet.clone();
        async move { sheet.thumbnail_url().map_err(|err| err.to_string()) }
    });
    let action = download(url, None, Some(config.action_timeout_ms));
    BtnOptions::new(i18n(I18nKey::DownloadThumbnail), deprecate(action))
}
