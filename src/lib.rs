pub mod app;
pub mod btn;
pub mod btn_action;
pub mod config;
pub mod dom;
pub mod fetch;
pub mod i18n;
pub mod mscore;
pub mod score_info;
pub mod sheet_info;

pub use btn::{BtnList, BtnOptions, CommitError};
pub use btn_action::{BtnAction, Fallback, SetText, UrlInput};
pub use score_info::{get_actual_id, ScoreInfo};
pub use sheet_info::SheetInfo;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = app::run().await {
            gloo::console::error!("scoredl failed to start", err);
        }
    });
}
