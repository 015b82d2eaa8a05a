//! World transform of a lot's grid and the registry that hands it out.

use std::collections::BTreeMap;

use floorgrid_core::{CornerCoord, Extent, LotKey, TileCoord};
use glam::{Quat, Vec2, Vec3};

/// Failures raised while describing a grid's world transform.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum CalculatorError {
    /// Tiles must have a finite, positive side length.
    #[error("tile size must be finite and positive, got {0}")]
    InvalidTileSize(f32),
}

/// Projects between world space and a lot's grid.
///
/// Only yaw about +Z is considered, and the Z axis is never projected so a
/// single calculator can serve every floor of a lot; callers supply the
/// floor height when converting back to world space.
#[derive(Clone, Debug, PartialEq)]
pub struct GridCalculator {
    extent: Extent,
    origin: Vec3,
    yaw_degrees: f32,
    tile_size: f32,
}

impl GridCalculator {
    /// Creates a calculator for a grid anchored at `origin`.
    pub fn new(
        extent: Extent,
        origin: Vec3,
        yaw_degrees: f32,
        tile_size: f32,
    ) -> Result<Self, CalculatorError> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(CalculatorError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            extent,
            origin,
            yaw_degrees,
            tile_size,
        })
    }

    /// Dimensions of the grid in tiles.
    #[must_use]
    pub const fn extent(&self) -> Extent {
        self.extent
    }

    /// World position of corner `(0, 0)` at floor height zero.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Rotation of the grid about +Z, in degrees.
    #[must_use]
    pub const fn yaw_degrees(&self) -> f32 {
        self.yaw_degrees
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Converts a world point into grid units, where `(1, 1)` is one tile
    /// along each axis from the origin.
    #[must_use]
    pub fn world_to_grid(&self, world_point: Vec3) -> Vec2 {
        let local = self.rotation().inverse() * (world_point - self.origin);
        Vec2::new(local.x, local.y) / self.tile_size
    }

    /// Converts a point in grid units back into world space at `height`.
    #[must_use]
    pub fn grid_to_world(&self, grid_point: Vec2, height: f32) -> Vec3 {
        let local = Vec3::new(
            grid_point.x * self.tile_size,
            grid_point.y * self.tile_size,
            0.0,
        );
        self.origin + self.rotation() * local + Vec3::Z * height
    }

    /// World position of a lattice corner.
    #[must_use]
    pub fn corner_world(&self, corner: CornerCoord, height: f32) -> Vec3 {
        self.grid_to_world(Vec2::new(corner.x() as f32, corner.y() as f32), height)
    }

    /// World position of a tile's center.
    #[must_use]
    pub fn tile_center_world(&self, tile: TileCoord, height: f32) -> Vec3 {
        self.grid_to_world(
            Vec2::new(tile.x() as f32 + 0.5, tile.y() as f32 + 0.5),
            height,
        )
    }

    fn rotation(&self) -> Quat {
        Quat::from_rotation_z(self.yaw_degrees.to_radians())
    }
}

/// Calculators for every known lot, looked up once per floor at construction.
#[derive(Clone, Debug, Default)]
pub struct CalculatorRegistry {
    lots: BTreeMap<LotKey, GridCalculator>,
}

impl CalculatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the calculator for `lot`, returning the one it replaced.
    pub fn register(&mut self, lot: LotKey, calculator: GridCalculator) -> Option<GridCalculator> {
        self.lots.insert(lot, calculator)
    }

    /// Calculator registered for `lot`, if any.
    #[must_use]
    pub fn calculator(&self, lot: LotKey) -> Option<&GridCalculator> {
        self.lots.get(&lot)
    }
}
