use std::future::Future;
use std::pin::pin;

use futures_util::future::{select, Either};

pub const DEFAULT_TIMEOUT_MS: u32 = 10 * 60 * 1000;

pub const TIMED_OUT: &str = "operation timed out";

/// How a wrapped button operation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settled {
    Completed,
    /// The operation failed (or timed out) and the fallback succeeded.
    Recovered { cause: String },
    Failed { cause: String },
}

impl Settled {
    pub fn label(&self, name: &str, error_label: &str) -> String {
        match self {
            Settled::Completed | Settled::Recovered { .. } => name.to_string(),
            Settled::Failed { .. } => error_label.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Settled::Failed { .. })
    }
}

/// Races `op` against `timer`, then runs `fallback` on failure.
///
/// Only the wait is abandoned on timeout; callers that need the operation to
/// keep running must hand in a future that merely observes it.
pub async fn settle<Op, Timer, Fb, FbFut>(op: Op, timer: Timer, fallback: Option<Fb>) -> Settled
where
    Op: Future<Output = Result<(), String>>,
    Timer: Future<Output = ()>,
    Fb: FnOnce() -> FbFut,
    FbFut: Future<Output = Result<(), String>>,
{
    let outcome = match select(pin!(op), pin!(timer)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(TIMED_OUT.to_string()),
    };
    let cause = match outcome {
        Ok(()) => return Settled::Completed,
        Err(cause) => cause,
    };
    let Some(fallback) = fallback else {
        return Settled::Failed { cause };
    };
    match fallback().await {
        Ok(()) => Settled::Recovered { cause },
        Err(err) => Settled::Failed {
            cause: format!("{cause}; fallback failed: {err}"),
        },
    }
}
