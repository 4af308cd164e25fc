use thiserror::Error;

use crate::node::SceneNode;

/// Why an asset could not be loaded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Failed to fetch asset: {0}")]
    Fetch(String),

    #[error("Failed to decode asset: {0}")]
    Decode(String),

    #[error("Asset contains no scene")]
    NoScene,

    #[error("Asset request ended without a result")]
    Disconnected,
}

/// One observation of an in-flight asset request.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Progress { loaded: u64, total: u64 },
    Loaded(SceneNode),
    Failed(LoadError),
}

impl LoadStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadStatus::Progress { .. })
    }
}

/// Where the context is in the single load of its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Pending,
    Loaded,
    Failed,
}

/// A source of [`LoadStatus`] updates, polled by the host between frames.
///
/// Returns `None` when nothing new has happened. After a terminal status has
/// been returned, every later poll returns `None`.
pub trait AssetSource {
    fn poll(&mut self) -> Option<LoadStatus>;
}

/// Whole-number percentage of `loaded` over `total`; zero when the total is
/// unknown.
pub fn progress_percent(loaded: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (loaded as f64 / total as f64 * 100.0).round().min(100.0) as u32
}
