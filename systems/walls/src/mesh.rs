//! Contract between wall placement and the visual mesh generator.

use floorgrid_core::{CornerCoord, DiagonalKind, EdgeCoord, TileCoord};
use floorgrid_world::GridStore;

/// Opaque handle to a preview visual, used only to request its destruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    /// Creates a handle wrapping a generator-assigned value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the generator-assigned value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Opaque handle to a permanent wall mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(u64);

impl MeshHandle {
    /// Creates a handle wrapping a generator-assigned value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the generator-assigned value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Geometry of a candidate wall shown while a gesture is in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewShape {
    /// Straight wall from the anchor corner along `edges`.
    Straight {
        /// Corner captured when the gesture started.
        anchor: CornerCoord,
        /// Edges the wall would cover, starting at the anchor. Empty before
        /// the pointer leaves the anchor.
        edges: Vec<EdgeCoord>,
    },
    /// Diagonal wall across the anchor tile.
    Diagonal {
        /// Tile captured when the gesture started.
        tile: TileCoord,
        /// Diagonal sketched by the drag so far, if any.
        kind: Option<DiagonalKind>,
    },
}

/// Non-committing preview of a candidate wall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallPreview {
    /// Geometry of the candidate.
    pub shape: PreviewShape,
    /// Whether nothing on the floor blocks the candidate.
    pub valid: bool,
}

impl WallPreview {
    /// Whether releasing now would build a wall: the candidate is valid and
    /// covers at least one edge or names a diagonal.
    #[must_use]
    pub fn is_committable(&self) -> bool {
        self.valid
            && match &self.shape {
                PreviewShape::Straight { edges, .. } => !edges.is_empty(),
                PreviewShape::Diagonal { kind, .. } => kind.is_some(),
            }
    }
}

/// Permanent wall requested from the mesh generator after a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WallMesh {
    /// Straight wall segments.
    Straight {
        /// Edges walled by the gesture, in placement order.
        placed: Vec<EdgeCoord>,
        /// Full contiguous run the placed edges now belong to.
        run: Vec<EdgeCoord>,
    },
    /// Diagonal wall across one tile.
    Diagonal {
        /// Tile the wall was drawn across.
        tile: TileCoord,
        /// Orientation of the wall.
        kind: DiagonalKind,
        /// Full same-kind diagonal run the tile now belongs to.
        run: Vec<TileCoord>,
    },
}

/// Spawns and destroys wall visuals on behalf of wall placement.
///
/// The store is passed along so generators can place geometry in world
/// space; generators never mutate it.
pub trait MeshGenerator {
    /// Shows a preview and returns the handle used to remove it later.
    fn spawn_preview(&mut self, store: &GridStore, preview: &WallPreview) -> PreviewHandle;

    /// Builds the permanent mesh for a committed wall.
    fn spawn_wall(&mut self, store: &GridStore, wall: &WallMesh) -> MeshHandle;

    /// Removes every listed preview.
    fn destroy_previews(&mut self, handles: &[PreviewHandle]);
}
