#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative tile, edge and corner state for a single floor.
//!
//! [`GridStore`] is built once per floor from the lot's [`GridCalculator`]
//! and pre-populates a record for every tile and edge in dense row-major
//! arrays. Corners carry no state and are derived on demand. Every accessor
//! validates its coordinate against the floor [`Extent`] first and reports
//! [`LatticeError::InvalidCoordinate`] rather than panicking.

use floorgrid_core::{
    edge_between, Axis, Cardinal, CornerCoord, DiagonalKind, Direction, EdgeCoord, Extent,
    LatticeError, ObjectId, TileCoord,
};
use glam::Vec3;

pub mod calculator;
pub mod click;

pub use calculator::{CalculatorError, CalculatorRegistry, GridCalculator};
pub use click::{ClickResolution, ClickResolver, GridClick};

/// State recorded for a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    coord: TileCoord,
    occupied: bool,
    diagonal_wall: Option<DiagonalKind>,
    object: Option<ObjectId>,
}

impl Tile {
    const fn vacant(coord: TileCoord) -> Self {
        Self {
            coord,
            occupied: false,
            diagonal_wall: None,
            object: None,
        }
    }

    /// Coordinate of the tile.
    #[must_use]
    pub const fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Whether the tile blocks object placement.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Diagonal wall drawn across the tile, if any.
    #[must_use]
    pub const fn diagonal_wall(&self) -> Option<DiagonalKind> {
        self.diagonal_wall
    }

    /// Object placed on the tile, if any.
    #[must_use]
    pub const fn object(&self) -> Option<ObjectId> {
        self.object
    }
}

/// State recorded for a single edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    coord: EdgeCoord,
    wall: bool,
    object: bool,
    forbidden: bool,
}

impl Edge {
    const fn open(coord: EdgeCoord) -> Self {
        Self {
            coord,
            wall: false,
            object: false,
            forbidden: false,
        }
    }

    /// Canonical coordinate of the edge.
    #[must_use]
    pub const fn coord(&self) -> EdgeCoord {
        self.coord
    }

    /// Whether a wall stands on the edge.
    #[must_use]
    pub const fn has_wall(&self) -> bool {
        self.wall
    }

    /// Whether a prop such as a window or door occupies the edge.
    #[must_use]
    pub const fn has_object(&self) -> bool {
        self.object
    }

    /// Whether an external rule forbids building on the edge.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        self.forbidden
    }

    /// Whether nothing more may be built on the edge.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.wall || self.object || self.forbidden
    }
}

/// A validated lattice corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Corner {
    coord: CornerCoord,
}

impl Corner {
    /// Coordinate of the corner.
    #[must_use]
    pub const fn coord(&self) -> CornerCoord {
        self.coord
    }
}

/// Topology and occupancy store for one floor.
#[derive(Clone, Debug)]
pub struct GridStore {
    calculator: GridCalculator,
    floor_height: f32,
    tiles: Vec<Tile>,
    horizontal_edges: Vec<Edge>,
    vertical_edges: Vec<Edge>,
}

impl GridStore {
    /// Creates a store covering the calculator's extent with every tile
    /// vacant and every edge open.
    #[must_use]
    pub fn new(calculator: GridCalculator, floor_height: f32) -> Self {
        let extent = calculator.extent();
        let width = extent.width() as i32;
        let height = extent.height() as i32;

        let mut tiles = Vec::with_capacity(extent.tile_count());
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::vacant(TileCoord::new(x, y)));
            }
        }

        let mut horizontal_edges = Vec::with_capacity(extent.horizontal_edge_count());
        for y in 0..=height {
            for x in 0..width {
                horizontal_edges.push(Edge::open(EdgeCoord::horizontal(x, y)));
            }
        }

        let mut vertical_edges = Vec::with_capacity(extent.vertical_edge_count());
        for y in 0..height {
            for x in 0..=width {
                vertical_edges.push(Edge::open(EdgeCoord::vertical(x, y)));
            }
        }

        tracing::debug!(%extent, floor_height, "grid store initialized");

        Self {
            calculator,
            floor_height,
            tiles,
            horizontal_edges,
            vertical_edges,
        }
    }

    /// Dimensions of the floor in tiles.
    #[must_use]
    pub const fn extent(&self) -> Extent {
        self.calculator.extent()
    }

    /// World transform the store was built from.
    #[must_use]
    pub const fn calculator(&self) -> &GridCalculator {
        &self.calculator
    }

    /// Height of the floor above the lot origin.
    #[must_use]
    pub const fn floor_height(&self) -> f32 {
        self.floor_height
    }

    /// Retrieves the tile at `coord`.
    pub fn tile(&self, coord: TileCoord) -> Result<&Tile, LatticeError> {
        let index = self.tile_index(coord)?;
        Ok(&self.tiles[index])
    }

    /// Reports whether `coord` addresses a tile on this floor.
    #[must_use]
    pub fn is_valid_tile(&self, coord: TileCoord) -> bool {
        self.extent().contains_tile(coord)
    }

    /// Reports whether the tile blocks object placement.
    pub fn is_tile_occupied(&self, coord: TileCoord) -> Result<bool, LatticeError> {
        self.tile(coord).map(Tile::is_occupied)
    }

    /// Marks the tile as occupied. Occupying an occupied tile is a no-op.
    pub fn occupy_tile(&mut self, coord: TileCoord) -> Result<(), LatticeError> {
        self.tile_mut(coord)?.occupied = true;
        tracing::trace!(tile = %coord, "tile occupied");
        Ok(())
    }

    /// Clears the tile's occupied flag.
    pub fn vacate_tile(&mut self, coord: TileCoord) -> Result<(), LatticeError> {
        self.tile_mut(coord)?.occupied = false;
        tracing::trace!(tile = %coord, "tile vacated");
        Ok(())
    }

    /// Records which object, if any, sits on the tile.
    pub fn set_tile_object(
        &mut self,
        coord: TileCoord,
        object: Option<ObjectId>,
    ) -> Result<(), LatticeError> {
        self.tile_mut(coord)?.object = object;
        tracing::trace!(tile = %coord, ?object, "tile object updated");
        Ok(())
    }

    /// Diagonal wall drawn across the tile, if any.
    pub fn diagonal_wall_kind(
        &self,
        coord: TileCoord,
    ) -> Result<Option<DiagonalKind>, LatticeError> {
        self.tile(coord).map(Tile::diagonal_wall)
    }

    /// Draws, replaces or (with `None`) removes the tile's diagonal wall.
    pub fn set_diagonal_wall(
        &mut self,
        coord: TileCoord,
        kind: Option<DiagonalKind>,
    ) -> Result<(), LatticeError> {
        self.tile_mut(coord)?.diagonal_wall = kind;
        tracing::trace!(tile = %coord, ?kind, "diagonal wall updated");
        Ok(())
    }

    /// Tile adjacent to `coord` in `direction`.
    pub fn neighbor_tile(
        &self,
        coord: TileCoord,
        direction: Direction,
    ) -> Result<TileCoord, LatticeError> {
        self.extent().neighbor_tile(coord, direction)
    }

    /// The four edges bounding a tile: north, east, south, west.
    pub fn tile_edges(&self, coord: TileCoord) -> Result<[EdgeCoord; 4], LatticeError> {
        let coord = self.extent().check_tile(coord)?;
        let (x, y) = (coord.x(), coord.y());
        Ok([
            EdgeCoord::horizontal(x, y),
            EdgeCoord::vertical(x + 1, y),
            EdgeCoord::horizontal(x, y + 1),
            EdgeCoord::vertical(x, y),
        ])
    }

    /// The four corners bounding a tile, clockwise from the upper-left.
    pub fn tile_corners(&self, coord: TileCoord) -> Result<[CornerCoord; 4], LatticeError> {
        let origin = self.extent().check_tile(coord)?.origin_corner();
        Ok([
            origin,
            origin.offset(1, 0),
            origin.offset(1, 1),
            origin.offset(0, 1),
        ])
    }

    /// Iterates over every tile carrying a diagonal wall, in row-major order.
    pub fn diagonal_tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles
            .iter()
            .filter(|tile| tile.diagonal_wall.is_some())
    }

    /// Traces the run of same-kind diagonal walls through `start`.
    ///
    /// The run follows the diagonal the seed's kind draws, so a
    /// [`DiagonalKind::ForwardSlash`] tile continues through `(x + 1, y + 1)`
    /// and `(x - 1, y - 1)`. Tiles of the other kind never join. The result is
    /// ordered by increasing `x`; a seed without a diagonal wall yields itself.
    pub fn diagonal_line_wall(&self, start: TileCoord) -> Result<Vec<TileCoord>, LatticeError> {
        let Some(kind) = self.diagonal_wall_kind(start)? else {
            return Ok(vec![start]);
        };

        let [backward, forward] = kind.run_offsets();
        let mut run = self.walk_diagonal(start, kind, backward);
        run.reverse();
        run.push(start);
        run.extend(self.walk_diagonal(start, kind, forward));
        Ok(run)
    }

    fn walk_diagonal(
        &self,
        start: TileCoord,
        kind: DiagonalKind,
        (dx, dy): (i32, i32),
    ) -> Vec<TileCoord> {
        let mut run = Vec::new();
        let mut cursor = start;
        loop {
            let next = cursor.offset(dx, dy);
            match self.tile(next) {
                Ok(tile) if tile.diagonal_wall == Some(kind) => {
                    run.push(next);
                    cursor = next;
                }
                _ => break,
            }
        }
        run
    }

    /// Retrieves the edge at `coord`.
    pub fn edge(&self, coord: EdgeCoord) -> Result<&Edge, LatticeError> {
        let (axis, index) = self.edge_index(coord)?;
        Ok(match axis {
            Axis::Horizontal => &self.horizontal_edges[index],
            Axis::Vertical => &self.vertical_edges[index],
        })
    }

    /// Reports whether `coord` addresses an edge on this floor.
    #[must_use]
    pub fn is_valid_edge(&self, coord: EdgeCoord) -> bool {
        self.extent().contains_edge(coord)
    }

    /// Resolves the edge joining two corners of this floor.
    pub fn edge_between(
        &self,
        a: CornerCoord,
        b: CornerCoord,
    ) -> Result<EdgeCoord, LatticeError> {
        let extent = self.extent();
        let _ = extent.check_corner(a)?;
        let _ = extent.check_corner(b)?;
        edge_between(a, b)
    }

    /// Reports whether nothing more may be built on the edge.
    pub fn is_edge_blocked(&self, coord: EdgeCoord) -> Result<bool, LatticeError> {
        self.edge(coord).map(Edge::is_blocked)
    }

    /// Reports whether a wall stands on the edge.
    pub fn edge_has_wall(&self, coord: EdgeCoord) -> Result<bool, LatticeError> {
        self.edge(coord).map(Edge::has_wall)
    }

    /// Raises or removes the wall on an edge.
    pub fn set_edge_wall(&mut self, coord: EdgeCoord, has_wall: bool) -> Result<(), LatticeError> {
        self.edge_mut(coord)?.wall = has_wall;
        tracing::trace!(edge = %coord, has_wall, "edge wall updated");
        Ok(())
    }

    /// Places or removes a prop on an edge.
    pub fn set_edge_object(
        &mut self,
        coord: EdgeCoord,
        has_object: bool,
    ) -> Result<(), LatticeError> {
        self.edge_mut(coord)?.object = has_object;
        tracing::trace!(edge = %coord, has_object, "edge object updated");
        Ok(())
    }

    /// Marks an edge as forbidden for building by an external rule.
    pub fn set_edge_forbidden(
        &mut self,
        coord: EdgeCoord,
        forbidden: bool,
    ) -> Result<(), LatticeError> {
        self.edge_mut(coord)?.forbidden = forbidden;
        tracing::trace!(edge = %coord, forbidden, "edge rule updated");
        Ok(())
    }

    /// Next collinear edge from `coord` in `direction`.
    pub fn neighbor_edge(
        &self,
        coord: EdgeCoord,
        direction: Cardinal,
    ) -> Result<EdgeCoord, LatticeError> {
        self.extent().neighbor_edge(coord, direction)
    }

    /// The two corners of an edge, lower first.
    pub fn edge_corners(&self, coord: EdgeCoord) -> Result<[CornerCoord; 2], LatticeError> {
        Ok(self.extent().check_edge(coord)?.corners())
    }

    /// Iterates over every walled edge, horizontal edges first.
    pub fn walled_edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.horizontal_edges
            .iter()
            .chain(self.vertical_edges.iter())
            .filter(|edge| edge.wall)
    }

    /// Traces the maximal run of collinear walled edges through `start`.
    ///
    /// The run is ordered by increasing coordinate along the edge's axis and
    /// is identical for every member. It never crosses the floor boundary or
    /// an unwalled gap; an unwalled seed yields itself.
    pub fn line_wall(&self, start: EdgeCoord) -> Result<Vec<EdgeCoord>, LatticeError> {
        if !self.edge_has_wall(start)? {
            return Ok(vec![start]);
        }

        let [backward, forward] = start.directions_along();
        let mut run = self.walk_walls(start, backward);
        run.reverse();
        run.push(start);
        run.extend(self.walk_walls(start, forward));
        Ok(run)
    }

    fn walk_walls(&self, start: EdgeCoord, direction: Cardinal) -> Vec<EdgeCoord> {
        let mut run = Vec::new();
        let mut cursor = start;
        while let Ok(next) = self.neighbor_edge(cursor, direction) {
            if !self.edge_has_wall(next).unwrap_or(false) {
                break;
            }
            run.push(next);
            cursor = next;
        }
        run
    }

    /// Retrieves the corner at `coord`.
    pub fn corner(&self, coord: CornerCoord) -> Result<Corner, LatticeError> {
        let coord = self.extent().check_corner(coord)?;
        Ok(Corner { coord })
    }

    /// Reports whether `coord` addresses a corner on this floor.
    #[must_use]
    pub fn is_valid_corner(&self, coord: CornerCoord) -> bool {
        self.extent().contains_corner(coord)
    }

    /// Corner adjacent to `coord` in `direction`.
    pub fn neighbor_corner(
        &self,
        coord: CornerCoord,
        direction: Cardinal,
    ) -> Result<CornerCoord, LatticeError> {
        self.extent().neighbor_corner(coord, direction)
    }

    /// World position of a tile's center on this floor.
    pub fn tile_world_position(&self, coord: TileCoord) -> Result<Vec3, LatticeError> {
        let coord = self.extent().check_tile(coord)?;
        Ok(self.calculator.tile_center_world(coord, self.floor_height))
    }

    /// World position of a corner on this floor.
    pub fn corner_world_position(&self, coord: CornerCoord) -> Result<Vec3, LatticeError> {
        let coord = self.extent().check_corner(coord)?;
        Ok(self.calculator.corner_world(coord, self.floor_height))
    }

    fn tile_mut(&mut self, coord: TileCoord) -> Result<&mut Tile, LatticeError> {
        let index = self.tile_index(coord)?;
        Ok(&mut self.tiles[index])
    }

    fn edge_mut(&mut self, coord: EdgeCoord) -> Result<&mut Edge, LatticeError> {
        let (axis, index) = self.edge_index(coord)?;
        Ok(match axis {
            Axis::Horizontal => &mut self.horizontal_edges[index],
            Axis::Vertical => &mut self.vertical_edges[index],
        })
    }

    fn tile_index(&self, coord: TileCoord) -> Result<usize, LatticeError> {
        let extent = self.extent();
        let coord = extent.check_tile(coord)?;
        Ok(dense_index(coord.x(), coord.y(), extent.width()))
    }

    fn edge_index(&self, coord: EdgeCoord) -> Result<(Axis, usize), LatticeError> {
        let extent = self.extent();
        let coord = extent.check_edge(coord)?;
        let origin = coord.origin();
        let row_width = match coord.axis() {
            Axis::Horizontal => extent.width(),
            Axis::Vertical => extent.width() + 1,
        };
        Ok((coord.axis(), dense_index(origin.x(), origin.y(), row_width)))
    }
}

/// Row-major offset of a coordinate already validated as non-negative.
fn dense_index(x: i32, y: i32, row_width: u32) -> usize {
    y as usize * row_width as usize + x as usize
}
