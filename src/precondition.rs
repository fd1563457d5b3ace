//! Precondition snapshot: precomputed per-basin wetness indices used to
//! recolor the basin fill layer.
//!
//! The snapshot document is fetched once per process from a well-known path
//! and cached for the rest of the session. Retrieval is abstracted behind
//! [`SnapshotFetcher`] so the transport (HTTP on the web, a file in tests)
//! stays out of the core.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use futures_util::future::{LocalBoxFuture, Shared};
use futures_util::FutureExt;
use serde::Deserialize;

/// Result type for snapshot retrieval.
pub type FetchResult = Result<PreconditionSnapshot, String>;

/// Flat baseline fill color. Also the lowest bucket of the ramp and the
/// fallback for basins missing from the snapshot.
pub const BASELINE_COLOR: &str = "#2166ac";

/// Which precomputed snapshot to color by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionMode {
    Peak,
    PreStorm,
}

impl PreconditionMode {
    /// Key of this mode in the snapshot document.
    pub fn key(self) -> &'static str {
        match self {
            PreconditionMode::Peak => "peak",
            PreconditionMode::PreStorm => "pre_storm",
        }
    }
}

/// Per-mode basin indices; `{"basins": {name: value}}` on the wire, with
/// values normalized to `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModeSnapshot {
    #[serde(default)]
    pub basins: BTreeMap<String, f64>,
}

/// The full snapshot document, keyed by mode name.
///
/// Absence of a mode key is a valid "no data" case, not an error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PreconditionSnapshot {
    #[serde(flatten)]
    pub modes: BTreeMap<String, ModeSnapshot>,
}

impl PreconditionSnapshot {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("Invalid precondition snapshot: {}", e))
    }

    pub fn mode(&self, mode: PreconditionMode) -> Option<&ModeSnapshot> {
        self.modes.get(mode.key())
    }
}

/// Loads the snapshot document, typically over HTTP from a fixed path.
pub trait SnapshotFetcher {
    fn fetch(&self) -> LocalBoxFuture<'static, FetchResult>;
}

/// Maps a normalized index to its bucket color.
///
/// Buckets are half-open on the low end; the final bucket is closed on both
/// ends.
pub fn bucket_color(value: f64) -> &'static str {
    if value < 0.2 {
        BASELINE_COLOR
    } else if value < 0.4 {
        "#67a9cf"
    } else if value < 0.6 {
        "#f7f7f7"
    } else if value < 0.8 {
        "#ef8a62"
    } else {
        "#b2182b"
    }
}

type SharedFetch = Shared<LocalBoxFuture<'static, Result<Rc<PreconditionSnapshot>, String>>>;

#[derive(Default)]
enum Slot {
    #[default]
    Idle,
    InFlight(SharedFetch),
    Ready(Rc<PreconditionSnapshot>),
}

/// Single-flight cache slot for the snapshot.
///
/// Concurrent requesters join one in-flight fetch instead of racing
/// independent downloads. A failed fetch returns the slot to idle so a later
/// call can retry; a successful fetch pins the snapshot for the process
/// lifetime.
#[derive(Default)]
pub struct SnapshotCell {
    slot: RefCell<Slot>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        matches!(&*self.slot.borrow(), Slot::Ready(_))
    }

    pub async fn get_or_fetch(
        &self,
        fetcher: &dyn SnapshotFetcher,
    ) -> Result<Rc<PreconditionSnapshot>, String> {
        let shared = {
            let mut slot = self.slot.borrow_mut();
            match &*slot {
                Slot::Ready(snapshot) => return Ok(Rc::clone(snapshot)),
                Slot::InFlight(fut) => fut.clone(),
                Slot::Idle => {
                    let fut = fetcher.fetch();
                    let fut = async move { fut.await.map(Rc::new) }.boxed_local().shared();
                    *slot = Slot::InFlight(fut.clone());
                    fut
                }
            }
        };

        // The slot borrow is released before awaiting; re-entrant callers see
        // the in-flight future and join it.
        let result = shared.await;

        let mut slot = self.slot.borrow_mut();
        match &result {
            Ok(snapshot) => *slot = Slot::Ready(Rc::clone(snapshot)),
            Err(_) => {
                if matches!(&*slot, Slot::InFlight(_)) {
                    *slot = Slot::Idle;
                }
            }
        }
        result
    }
}
