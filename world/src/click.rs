//! Translation of world-space clicks into lattice coordinates.

use floorgrid_core::{CornerCoord, TileCoord};
use glam::{Vec2, Vec3};

use crate::calculator::GridCalculator;

/// Lattice coordinates nearest to a world-space point.
///
/// Both anchors are reported for every click since straight walls anchor on
/// corners while diagonal walls anchor on tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickResolution {
    /// Nearest lattice corner, or `None` when it lies off the floor.
    pub corner: Option<CornerCoord>,
    /// World-space distance from the point to `corner`; infinite without one.
    pub corner_distance: f32,
    /// Tile containing the point, or `None` when the point is off the floor.
    pub tile: Option<TileCoord>,
}

impl ClickResolution {
    /// Resolution for a point that touches nothing on the floor.
    pub const MISS: Self = Self {
        corner: None,
        corner_distance: f32::INFINITY,
        tile: None,
    };
}

/// Resolves world points against a floor's lattice.
pub trait ClickResolver {
    /// Finds the nearest corner and the containing tile of `world_point`.
    fn resolve(&self, world_point: Vec3) -> ClickResolution;
}

/// Click resolver driven by a lot's [`GridCalculator`].
#[derive(Clone, Debug)]
pub struct GridClick {
    calculator: GridCalculator,
}

impl GridClick {
    /// Creates a resolver projecting through `calculator`.
    #[must_use]
    pub fn new(calculator: GridCalculator) -> Self {
        Self { calculator }
    }
}

impl ClickResolver for GridClick {
    fn resolve(&self, world_point: Vec3) -> ClickResolution {
        let extent = self.calculator.extent();
        let grid_point = self.calculator.world_to_grid(world_point);
        if !grid_point.is_finite() {
            return ClickResolution::MISS;
        }

        let rounded = grid_point.round();
        let corner = CornerCoord::new(rounded.x as i32, rounded.y as i32);
        let (corner, corner_distance) = if extent.contains_corner(corner) {
            let offset = grid_point - Vec2::new(rounded.x, rounded.y);
            (Some(corner), offset.length() * self.calculator.tile_size())
        } else {
            (None, f32::INFINITY)
        };

        let floored = grid_point.floor();
        let tile = TileCoord::new(floored.x as i32, floored.y as i32);
        let tile = extent.contains_tile(tile).then_some(tile);

        ClickResolution {
            corner,
            corner_distance,
            tile,
        }
    }
}

#[cfg(test)]
mod tests {
    use floorgrid_core::Extent;

    use super::*;

    fn click() -> GridClick {
        let calculator = GridCalculator::new(
            Extent::new(4, 4).expect("extent"),
            Vec3::ZERO,
            0.0,
            50.0,
        )
        .expect("calculator");
        GridClick::new(calculator)
    }

    #[test]
    fn resolves_nearest_corner_and_containing_tile() {
        let resolution = click().resolve(Vec3::new(105.0, 95.0, 0.0));
        assert_eq!(resolution.corner, Some(CornerCoord::new(2, 2)));
        assert!((resolution.corner_distance - 7.071_068).abs() < 1e-3);
        assert_eq!(resolution.tile, Some(TileCoord::new(2, 1)));
    }

    #[test]
    fn far_boundary_corner_has_no_tile() {
        let resolution = click().resolve(Vec3::new(200.0, 200.0, 0.0));
        assert_eq!(resolution.corner, Some(CornerCoord::new(4, 4)));
        assert_eq!(resolution.tile, None);
    }

    #[test]
    fn points_off_the_floor_miss() {
        let resolution = click().resolve(Vec3::new(-80.0, 20.0, 0.0));
        assert_eq!(resolution.corner, None);
        assert_eq!(resolution.tile, None);
        assert!(resolution.corner_distance.is_infinite());
    }
}
