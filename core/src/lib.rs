pub mod action;
pub mod actual_id;
pub mod error;
pub mod html;
pub mod i18n;
pub mod ipfs;
pub mod lease;
pub mod mode;
pub mod score;
pub mod sheet;

pub use action::{settle, Settled, DEFAULT_TIMEOUT_MS};
pub use actual_id::{resolve_actual_id, ActualId};
pub use error::{ScoreInfoError, SheetInfoError};
pub use i18n::{I18nKey, Locale};
pub use lease::{Destroy, RendererLease};
pub use mode::{BtnListMode, ModeParseError, EXT_WINDOW_FEATURES};
pub use score::{escape_filename, id_last_digit, ScoreMeta, PLACEHOLDER_ID_THRESHOLD};
pub use sheet::ImgType;
