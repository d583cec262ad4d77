//! Snapshot query boundary for external read-only consumers.
//!
//! The network/viewer layers never touch the live world; they poll a
//! `SnapshotFeed` that caches one serialized world per completed tick. The
//! feed is refreshed at tick boundaries only, so a consumer can never observe
//! a mid-tick state.

use serde::{Deserialize, Serialize};

use super::kernel::WorldKernel;
use super::persist::PersistError;
use super::types::Revision;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotQueryResult {
    /// The caller already holds the snapshot for the current revision.
    Unchanged,
    Full {
        revision: Revision,
        /// JSON-serialized [`super::persist::WorldSnapshot`].
        world: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotFeed {
    revision: Revision,
    cached: String,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caches the kernel's current state. Call at tick boundaries.
    pub fn refresh(&mut self, kernel: &WorldKernel) -> Result<(), PersistError> {
        self.cached = kernel.snapshot().to_json()?;
        self.revision = kernel.revision();
        Ok(())
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns `Unchanged` when the caller's revision is current, else the
    /// full cached serialization.
    pub fn get_snapshot(&self, last_known_revision: Option<Revision>) -> SnapshotQueryResult {
        if last_known_revision == Some(self.revision) {
            SnapshotQueryResult::Unchanged
        } else {
            SnapshotQueryResult::Full {
                revision: self.revision,
                world: self.cached.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::config::SimulationConfig;

    #[test]
    fn feed_reports_unchanged_until_next_tick() {
        let config = SimulationConfig::default().validate().unwrap();
        let mut kernel = WorldKernel::new(config);
        let mut feed = SnapshotFeed::new();

        kernel.tick();
        feed.refresh(&kernel).unwrap();

        let first = feed.get_snapshot(None);
        let revision = match &first {
            SnapshotQueryResult::Full { revision, world } => {
                assert!(!world.is_empty());
                *revision
            }
            SnapshotQueryResult::Unchanged => panic!("first query must be full"),
        };
        assert_eq!(revision, 1);
        assert_eq!(feed.get_snapshot(Some(revision)), SnapshotQueryResult::Unchanged);

        kernel.tick();
        feed.refresh(&kernel).unwrap();
        match feed.get_snapshot(Some(revision)) {
            SnapshotQueryResult::Full { revision: next, .. } => assert_eq!(next, 2),
            SnapshotQueryResult::Unchanged => panic!("stale revision must get a full snapshot"),
        }
    }
}
