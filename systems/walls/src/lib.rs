#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gesture-driven wall placement for a single floor.
//!
//! A press near a lattice corner starts a straight wall; a press inside a
//! tile away from its corners starts a diagonal wall. While the pointer is
//! held, every move recomputes the candidate, validates it against the
//! [`GridStore`] and replaces the preview visual without touching the
//! store. Releasing commits a valid candidate, asks the [`MeshGenerator`]
//! for the permanent mesh and returns to idle; anything else is discarded.

use floorgrid_core::{
    direction_to_diagonal_kind, Cardinal, CornerCoord, Diagnostics, EdgeCoord, LatticeError,
    TileCoord,
};
use floorgrid_world::{ClickResolution, ClickResolver, GridStore};
use glam::Vec3;
use serde::Deserialize;

pub mod mesh;

pub use mesh::{MeshGenerator, MeshHandle, PreviewHandle, PreviewShape, WallMesh, WallPreview};

const SOURCE: &str = "walls";

/// Share of a tile's side within which a press snaps to a corner.
const DEFAULT_CAPTURE_SHARE: f32 = 0.25;
/// Capture radius used when no tile size is known.
const DEFAULT_CAPTURE_RADIUS: f32 = 12.5;

/// Tunables for wall placement.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WallPlacementConfig {
    corner_capture_radius: f32,
}

impl WallPlacementConfig {
    /// Creates a configuration with an explicit corner capture radius in
    /// world units.
    #[must_use]
    pub const fn new(corner_capture_radius: f32) -> Self {
        Self {
            corner_capture_radius,
        }
    }

    /// Capture radius covering a quarter of the tile side around each corner.
    #[must_use]
    pub fn for_tile_size(tile_size: f32) -> Self {
        Self::new(tile_size * DEFAULT_CAPTURE_SHARE)
    }

    /// Distance from a corner within which a press starts a straight wall.
    #[must_use]
    pub const fn corner_capture_radius(&self) -> f32 {
        self.corner_capture_radius
    }
}

impl Default for WallPlacementConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_RADIUS)
    }
}

/// Observable state of the placement gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementPhase {
    /// No gesture in flight.
    Idle,
    /// Dragging a straight wall out of a corner.
    PlacingStraight {
        /// Corner captured by the press.
        anchor: CornerCoord,
    },
    /// Sketching a diagonal across a tile.
    PlacingDiagonal {
        /// Tile captured by the press.
        anchor: TileCoord,
    },
}

/// What a single input did to the gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The input did not apply in the current phase.
    Ignored,
    /// A gesture started and showed its first preview.
    Started {
        /// Preview spawned at the anchor.
        preview: WallPreview,
    },
    /// The candidate was recomputed and the preview replaced.
    Updated {
        /// Preview now on screen.
        preview: WallPreview,
    },
    /// The candidate was written to the store.
    Committed {
        /// Mesh requested from the generator.
        wall: WallMesh,
        /// Handle returned by the generator.
        handle: MeshHandle,
    },
    /// The gesture ended without building anything.
    Discarded {
        /// Final candidate that was rejected.
        preview: WallPreview,
    },
    /// The gesture was aborted by an external signal.
    Cancelled,
}

/// Collaborators borrowed for the duration of one input.
pub struct WallContext<'a> {
    /// Floor topology read for validation and written on commit.
    pub store: &'a mut GridStore,
    /// Resolver translating world points into lattice coordinates.
    pub click: &'a dyn ClickResolver,
    /// Generator owning every visual.
    pub meshes: &'a mut dyn MeshGenerator,
    /// Sink for progress and misuse reports.
    pub diagnostics: &'a dyn Diagnostics,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gesture {
    Idle,
    Straight {
        anchor: CornerCoord,
        target: CornerCoord,
    },
    Diagonal {
        anchor: TileCoord,
        target: TileCoord,
    },
}

/// State machine carving walls from press, drag and release inputs.
#[derive(Debug)]
pub struct WallPlacement {
    config: WallPlacementConfig,
    gesture: Gesture,
    previews: Vec<PreviewHandle>,
}

impl WallPlacement {
    /// Creates an idle state machine.
    #[must_use]
    pub fn new(config: WallPlacementConfig) -> Self {
        Self {
            config,
            gesture: Gesture::Idle,
            previews: Vec::new(),
        }
    }

    /// Tunables in effect.
    #[must_use]
    pub const fn config(&self) -> &WallPlacementConfig {
        &self.config
    }

    /// Current phase of the gesture.
    #[must_use]
    pub fn phase(&self) -> PlacementPhase {
        match self.gesture {
            Gesture::Idle => PlacementPhase::Idle,
            Gesture::Straight { anchor, .. } => PlacementPhase::PlacingStraight { anchor },
            Gesture::Diagonal { anchor, .. } => PlacementPhase::PlacingDiagonal { anchor },
        }
    }

    /// Whether a gesture is in flight.
    #[must_use]
    pub fn is_placing(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Preview visuals currently owned by the gesture.
    #[must_use]
    pub fn preview_handles(&self) -> &[PreviewHandle] {
        &self.previews
    }

    /// Routes a raw pointer sample: a press while idle starts a gesture, a
    /// held press while placing drags it, and a release finishes it.
    pub fn handle_place_wall(
        &mut self,
        ctx: &mut WallContext<'_>,
        world_point: Vec3,
        is_pressed: bool,
    ) -> PlacementOutcome {
        match (is_pressed, self.is_placing()) {
            (true, false) => self.press(ctx, world_point),
            (true, true) => self.drag(ctx, world_point),
            (false, _) => self.release(ctx, world_point),
        }
    }

    /// Starts a gesture. Ignored while one is already in flight.
    pub fn press(&mut self, ctx: &mut WallContext<'_>, world_point: Vec3) -> PlacementOutcome {
        if self.is_placing() {
            ctx.diagnostics
                .debug(SOURCE, format_args!("press ignored, gesture already in flight"));
            return PlacementOutcome::Ignored;
        }

        let resolution = ctx.click.resolve(world_point);
        self.gesture = match resolution {
            ClickResolution {
                corner: Some(corner),
                corner_distance,
                ..
            } if corner_distance <= self.config.corner_capture_radius => Gesture::Straight {
                anchor: corner,
                target: corner,
            },
            ClickResolution {
                tile: Some(tile), ..
            } => Gesture::Diagonal {
                anchor: tile,
                target: tile,
            },
            _ => {
                ctx.diagnostics.debug(
                    SOURCE,
                    format_args!("press at {world_point} missed the floor"),
                );
                return PlacementOutcome::Ignored;
            }
        };

        let Some(preview) = self.candidate(ctx.store) else {
            return PlacementOutcome::Ignored;
        };
        self.show_preview(ctx, &preview);
        PlacementOutcome::Started { preview }
    }

    /// Moves the held pointer, replacing the preview.
    pub fn drag(&mut self, ctx: &mut WallContext<'_>, world_point: Vec3) -> PlacementOutcome {
        self.retarget(ctx.click.resolve(world_point));
        let Some(preview) = self.candidate(ctx.store) else {
            return PlacementOutcome::Ignored;
        };
        self.show_preview(ctx, &preview);
        PlacementOutcome::Updated { preview }
    }

    /// Finishes the gesture at `world_point`, committing a valid candidate.
    pub fn release(&mut self, ctx: &mut WallContext<'_>, world_point: Vec3) -> PlacementOutcome {
        self.retarget(ctx.click.resolve(world_point));
        let Some(preview) = self.candidate(ctx.store) else {
            return PlacementOutcome::Ignored;
        };
        self.clear_previews(ctx);
        self.gesture = Gesture::Idle;

        if !preview.is_committable() {
            ctx.diagnostics
                .info(SOURCE, format_args!("wall discarded: {:?}", preview.shape));
            return PlacementOutcome::Discarded { preview };
        }

        match commit(ctx.store, &preview.shape) {
            Ok(Some(wall)) => {
                let handle = ctx.meshes.spawn_wall(ctx.store, &wall);
                ctx.diagnostics
                    .info(SOURCE, format_args!("wall committed: {wall:?}"));
                PlacementOutcome::Committed { wall, handle }
            }
            Ok(None) => PlacementOutcome::Discarded { preview },
            Err(error) => {
                ctx.diagnostics
                    .error(SOURCE, format_args!("wall commit failed: {error}"));
                PlacementOutcome::Discarded { preview }
            }
        }
    }

    /// Aborts an in-flight gesture without building anything.
    pub fn cancel(&mut self, ctx: &mut WallContext<'_>) -> PlacementOutcome {
        if !self.is_placing() {
            return PlacementOutcome::Ignored;
        }

        self.clear_previews(ctx);
        self.gesture = Gesture::Idle;
        ctx.diagnostics
            .debug(SOURCE, format_args!("wall placement cancelled"));
        PlacementOutcome::Cancelled
    }

    fn retarget(&mut self, resolution: ClickResolution) {
        match &mut self.gesture {
            Gesture::Straight { target, .. } => {
                if let Some(corner) = resolution.corner {
                    *target = corner;
                }
            }
            Gesture::Diagonal { target, .. } => {
                if let Some(tile) = resolution.tile {
                    *target = tile;
                }
            }
            Gesture::Idle => {}
        }
    }

    fn candidate(&self, store: &GridStore) -> Option<WallPreview> {
        let preview = match self.gesture {
            Gesture::Straight { anchor, target } => {
                let edges = straight_path(store, anchor, target);
                let valid = edges
                    .iter()
                    .all(|edge| store.is_edge_blocked(*edge) == Ok(false));
                WallPreview {
                    shape: PreviewShape::Straight { anchor, edges },
                    valid,
                }
            }
            Gesture::Diagonal { anchor, target } => {
                let kind = direction_to_diagonal_kind(
                    target.x().saturating_sub(anchor.x()),
                    target.y().saturating_sub(anchor.y()),
                );
                let valid = store.tile(anchor).map_or(false, |tile| {
                    !tile.is_occupied() && tile.diagonal_wall().is_none()
                });
                WallPreview {
                    shape: PreviewShape::Diagonal { tile: anchor, kind },
                    valid,
                }
            }
            Gesture::Idle => return None,
        };
        Some(preview)
    }

    fn show_preview(&mut self, ctx: &mut WallContext<'_>, preview: &WallPreview) {
        self.clear_previews(ctx);
        let handle = ctx.meshes.spawn_preview(ctx.store, preview);
        self.previews.push(handle);
    }

    fn clear_previews(&mut self, ctx: &mut WallContext<'_>) {
        if self.previews.is_empty() {
            return;
        }
        ctx.meshes.destroy_previews(&self.previews);
        self.previews.clear();
    }
}

/// Edges of the straight wall from `anchor` toward `target`.
///
/// The target is projected onto the dominant axis of the drag, ties going to
/// the x axis, and the path walks one corner at a time from the anchor. A
/// step that would leave the floor ends the walk, so drags past the boundary
/// clamp to the last corner on the floor.
#[must_use]
pub fn straight_path(store: &GridStore, anchor: CornerCoord, target: CornerCoord) -> Vec<EdgeCoord> {
    let dx = i64::from(target.x()) - i64::from(anchor.x());
    let dy = i64::from(target.y()) - i64::from(anchor.y());

    let (direction, steps) = if dx.abs() >= dy.abs() {
        let direction = if dx >= 0 { Cardinal::East } else { Cardinal::West };
        (direction, dx.unsigned_abs())
    } else {
        let direction = if dy > 0 { Cardinal::South } else { Cardinal::North };
        (direction, dy.unsigned_abs())
    };

    let mut path = Vec::new();
    let mut cursor = anchor;
    for _ in 0..steps {
        let Ok(next) = store.neighbor_corner(cursor, direction) else {
            break;
        };
        let Ok(edge) = store.edge_between(cursor, next) else {
            break;
        };
        path.push(edge);
        cursor = next;
    }
    path
}

fn commit(store: &mut GridStore, shape: &PreviewShape) -> Result<Option<WallMesh>, LatticeError> {
    match shape {
        PreviewShape::Straight { edges, .. } => {
            let Some(first) = edges.first().copied() else {
                return Ok(None);
            };
            for edge in edges {
                store.set_edge_wall(*edge, true)?;
            }
            Ok(Some(WallMesh::Straight {
                placed: edges.clone(),
                run: store.line_wall(first)?,
            }))
        }
        PreviewShape::Diagonal { tile, kind } => {
            let Some(kind) = *kind else {
                return Ok(None);
            };
            store.set_diagonal_wall(*tile, Some(kind))?;
            Ok(Some(WallMesh::Diagonal {
                tile: *tile,
                kind,
                run: store.diagonal_line_wall(*tile)?,
            }))
        }
    }
}
