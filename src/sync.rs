//! Phase synchronizer: turns fetched snapshots into the view to render.
//!
//! [`synchronize`] is a total function of a snapshot: unknown phases map to
//! [`Region::None`] rather than failing. [`SyncState`] holds the single
//! current snapshot; each applied snapshot replaces the previous one
//! unconditionally, even when the round did not change.

use tokio::sync::Mutex;
use tracing::debug;

use crate::protocol::{RoundId, RoundSnapshot};
use crate::view::{Region, RoundView};

/// Map a snapshot to what should be shown.
pub fn synchronize(snapshot: &RoundSnapshot) -> RoundView {
    RoundView::from(snapshot)
}

/// Shared holder of the current snapshot.
///
/// Written only by the polling loop, read by the submission path.
#[derive(Debug, Default)]
pub struct SyncState {
    current: Mutex<Option<RoundSnapshot>>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot and return its view.
    pub async fn apply(&self, snapshot: RoundSnapshot) -> RoundView {
        let view = synchronize(&snapshot);
        let mut current = self.current.lock().await;
        if let Some(prev) = current.as_ref() {
            if prev.round_id != snapshot.round_id {
                debug!(
                    from = ?prev.round_id,
                    to = ?snapshot.round_id,
                    "round advanced"
                );
            }
            if prev.phase != snapshot.phase {
                debug!(round_id = ?snapshot.round_id, phase = %snapshot.phase, "phase changed");
            }
        }
        *current = Some(snapshot);
        view
    }

    pub async fn snapshot(&self) -> Option<RoundSnapshot> {
        self.current.lock().await.clone()
    }

    pub async fn round_id(&self) -> Option<RoundId> {
        self.current.lock().await.as_ref().and_then(|s| s.round_id)
    }

    pub async fn view(&self) -> Option<RoundView> {
        self.current.lock().await.as_ref().map(synchronize)
    }

    pub async fn region(&self) -> Region {
        self.view().await.map_or(Region::None, |v| v.region)
    }
}
