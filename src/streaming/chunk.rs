use bevy::prelude::*;

/// Lifecycle of one chunk coordinate.
///
/// `Absent → PendingLoad → Loaded → PendingUnload → Absent`; nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum ChunkState {
    /// No record, not queued.
    Absent,
    /// Queued for materialisation.
    PendingLoad,
    /// Materialised and owning its artifacts.
    Loaded,
    /// Materialised, queued for release.
    PendingUnload,
}

/// A materialised chunk and the artifacts it exclusively owns.
#[derive(Debug)]
pub struct ChunkRecord<A> {
    coord: IVec2,
    artifacts: Vec<A>,
}

impl<A> ChunkRecord<A> {
    pub(super) fn new(coord: IVec2) -> Self {
        Self {
            coord,
            artifacts: Vec::new(),
        }
    }

    /// Chunk coordinate.
    pub fn coord(&self) -> IVec2 {
        self.coord
    }

    /// Live artifacts, in creation order.
    pub fn artifacts(&self) -> &[A] {
        &self.artifacts
    }

    pub(super) fn push(&mut self, artifact: A) {
        self.artifacts.push(artifact);
    }

    /// Hands every artifact back for disposal.
    pub(super) fn release(self) -> Vec<A> {
        self.artifacts
    }
}
