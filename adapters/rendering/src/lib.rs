#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reference visuals for floorgrid adapters.
//!
//! [`SegmentMeshes`] implements the wall [`MeshGenerator`] contract by
//! reducing every preview and wall to flat world-space segments, and
//! [`plan`] renders a floor's topology as text.

use std::collections::{BTreeMap, HashMap};

use floorgrid_core::{CornerCoord, DiagonalKind, EdgeCoord, LatticeError, TileCoord};
use floorgrid_system_walls::{
    MeshGenerator, MeshHandle, PreviewHandle, PreviewShape, WallMesh, WallPreview,
};
use floorgrid_world::GridStore;
use glam::Vec3;

pub mod plan;

/// RGBA color used when presenting walls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Errors raised while describing wall visuals.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum RenderingError {
    /// Walls need a finite, positive thickness.
    #[error("wall thickness must be finite and positive (received {thickness})")]
    InvalidThickness {
        /// Provided thickness that failed validation.
        thickness: f32,
    },
}

/// Colors and thickness applied to generated segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallStyle {
    thickness: f32,
    wall: Color,
    valid_preview: Color,
    invalid_preview: Color,
}

impl WallStyle {
    /// Creates a style, rejecting non-positive thickness.
    pub fn new(
        thickness: f32,
        wall: Color,
        valid_preview: Color,
        invalid_preview: Color,
    ) -> Result<Self, RenderingError> {
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(RenderingError::InvalidThickness { thickness });
        }
        Ok(Self {
            thickness,
            wall,
            valid_preview,
            invalid_preview,
        })
    }

    /// Thickness of every segment in world units.
    #[must_use]
    pub const fn thickness(&self) -> f32 {
        self.thickness
    }

    /// Color of committed walls.
    #[must_use]
    pub const fn wall(&self) -> Color {
        self.wall
    }

    /// Color of a preview with the given validity.
    #[must_use]
    pub const fn preview(&self, valid: bool) -> Color {
        if valid {
            self.valid_preview
        } else {
            self.invalid_preview
        }
    }
}

impl Default for WallStyle {
    fn default() -> Self {
        Self {
            thickness: 0.1,
            wall: Color::from_rgb_u8(200, 200, 200),
            valid_preview: Color::from_rgb_u8(80, 160, 255).with_alpha(0.6),
            invalid_preview: Color::from_rgb_u8(230, 60, 60).with_alpha(0.6),
        }
    }
}

/// Flat wall segment in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// Start of the segment.
    pub from: Vec3,
    /// End of the segment.
    pub to: Vec3,
    /// Thickness in world units.
    pub thickness: f32,
    /// Fill color.
    pub color: Color,
}

impl WallSegment {
    /// Length of the segment in world units.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Footprint {
    Edges(Vec<EdgeCoord>),
    Tiles(DiagonalKind, Vec<TileCoord>),
}

impl Footprint {
    fn is_covered_by(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Edges(mine), Self::Edges(theirs)) => {
                mine.iter().all(|edge| theirs.contains(edge))
            }
            (Self::Tiles(my_kind, mine), Self::Tiles(their_kind, theirs)) => {
                my_kind == their_kind && mine.iter().all(|tile| theirs.contains(tile))
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
struct WallRecord {
    footprint: Footprint,
    segment: WallSegment,
}

/// Mesh generator reducing walls to world-space segments.
///
/// Each committed wall is drawn as one segment spanning its whole run;
/// walls whose run is swallowed by a newer one are merged away.
#[derive(Debug, Default)]
pub struct SegmentMeshes {
    style: WallStyle,
    next_handle: u64,
    previews: HashMap<PreviewHandle, WallSegment>,
    walls: BTreeMap<MeshHandle, WallRecord>,
}

impl SegmentMeshes {
    /// Creates a generator drawing with `style`.
    #[must_use]
    pub fn new(style: WallStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Style applied to new segments.
    #[must_use]
    pub const fn style(&self) -> &WallStyle {
        &self.style
    }

    /// Number of live previews.
    #[must_use]
    pub fn preview_count(&self) -> usize {
        self.previews.len()
    }

    /// Segments of every committed wall, oldest first.
    pub fn wall_segments(&self) -> impl Iterator<Item = (MeshHandle, &WallSegment)> + '_ {
        self.walls
            .iter()
            .map(|(handle, record)| (*handle, &record.segment))
    }

    fn allocate(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn segment(&self, from: Vec3, to: Vec3, color: Color) -> WallSegment {
        WallSegment {
            from,
            to,
            thickness: self.style.thickness,
            color,
        }
    }

    fn preview_segment(
        &self,
        store: &GridStore,
        preview: &WallPreview,
    ) -> Result<WallSegment, LatticeError> {
        let color = self.style.preview(preview.valid);
        let (from, to) = match &preview.shape {
            PreviewShape::Straight { anchor, edges } => {
                let start = store.corner_world_position(*anchor)?;
                let end = match edges.last() {
                    Some(edge) => store.corner_world_position(far_end(*anchor, *edge))?,
                    None => start,
                };
                (start, end)
            }
            PreviewShape::Diagonal { tile, kind: None } => {
                let center = store.tile_world_position(*tile)?;
                (center, center)
            }
            PreviewShape::Diagonal {
                tile,
                kind: Some(kind),
            } => {
                let [from, to] = diagonal_corners(*tile, *tile, *kind);
                (
                    store.corner_world_position(from)?,
                    store.corner_world_position(to)?,
                )
            }
        };
        Ok(self.segment(from, to, color))
    }

    fn wall_record(
        &self,
        store: &GridStore,
        wall: &WallMesh,
    ) -> Result<Option<WallRecord>, LatticeError> {
        let (footprint, from, to) = match wall {
            WallMesh::Straight { run, .. } => {
                let (Some(first), Some(last)) = (run.first(), run.last()) else {
                    return Ok(None);
                };
                (
                    Footprint::Edges(run.clone()),
                    first.origin(),
                    last.end(),
                )
            }
            WallMesh::Diagonal { kind, run, .. } => {
                let (Some(first), Some(last)) = (run.first(), run.last()) else {
                    return Ok(None);
                };
                let [from, to] = diagonal_corners(*first, *last, *kind);
                (Footprint::Tiles(*kind, run.clone()), from, to)
            }
        };
        let segment = self.segment(
            store.corner_world_position(from)?,
            store.corner_world_position(to)?,
            self.style.wall,
        );
        Ok(Some(WallRecord { footprint, segment }))
    }
}

impl MeshGenerator for SegmentMeshes {
    fn spawn_preview(&mut self, store: &GridStore, preview: &WallPreview) -> PreviewHandle {
        let handle = PreviewHandle::new(self.allocate());
        match self.preview_segment(store, preview) {
            Ok(segment) => {
                let _ = self.previews.insert(handle, segment);
            }
            Err(error) => tracing::warn!(%error, "preview left undrawn"),
        }
        handle
    }

    fn spawn_wall(&mut self, store: &GridStore, wall: &WallMesh) -> MeshHandle {
        let handle = MeshHandle::new(self.allocate());
        match self.wall_record(store, wall) {
            Ok(Some(record)) => {
                let before = self.walls.len();
                self.walls
                    .retain(|_, existing| !existing.footprint.is_covered_by(&record.footprint));
                tracing::debug!(
                    handle = handle.get(),
                    merged = before - self.walls.len(),
                    length = record.segment.length(),
                    "wall mesh spawned"
                );
                let _ = self.walls.insert(handle, record);
            }
            Ok(None) => tracing::debug!("empty wall mesh skipped"),
            Err(error) => tracing::warn!(%error, "wall left undrawn"),
        }
        handle
    }

    fn destroy_previews(&mut self, handles: &[PreviewHandle]) {
        for handle in handles {
            let _ = self.previews.remove(handle);
        }
    }
}

fn far_end(anchor: CornerCoord, edge: EdgeCoord) -> CornerCoord {
    let [origin, end] = edge.corners();
    if origin == anchor {
        end
    } else if end == anchor {
        origin
    } else if origin.manhattan_distance(anchor) > end.manhattan_distance(anchor) {
        origin
    } else {
        end
    }
}

/// Corners spanned by a same-kind diagonal run from `first` to `last`,
/// ordered by increasing x.
fn diagonal_corners(first: TileCoord, last: TileCoord, kind: DiagonalKind) -> [CornerCoord; 2] {
    match kind {
        DiagonalKind::ForwardSlash => [first.origin_corner(), last.origin_corner().offset(1, 1)],
        DiagonalKind::BackSlash => [
            first.origin_corner().offset(0, 1),
            last.origin_corner().offset(1, 0),
        ],
    }
}
