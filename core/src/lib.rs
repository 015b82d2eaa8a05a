#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core lattice contracts shared across the Floorgrid building editor.
//!
//! A floor is a `W x H` block of square tiles. Three coordinate spaces share
//! one integer lattice: [`TileCoord`] addresses cells, [`CornerCoord`]
//! addresses the lattice intersections that bound them, and [`EdgeCoord`]
//! addresses the axis-aligned segment between two adjacent corners. The
//! [`Extent`] of a floor validates coordinates of every space and answers
//! neighbor queries; the free functions [`edge_between`],
//! [`corners_of_edge`] and [`direction_to_diagonal_kind`] need no extent.
//!
//! Coordinates are signed so neighbor arithmetic can step off the floor and
//! be rejected with [`LatticeError::InvalidCoordinate`] instead of wrapping.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod diagnostics;

pub use diagnostics::{Diagnostics, Severity, TracingDiagnostics};

/// Largest supported extent along either axis.
///
/// Corner coordinates run one past the tile range, so the limit keeps every
/// corner representable as an `i32`.
pub const MAX_DIMENSION: u32 = (i32::MAX - 1) as u32;

/// Location of a single floor tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    x: i32,
    y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Corner at the upper-left of the tile.
    #[must_use]
    pub const fn origin_corner(self) -> CornerCoord {
        CornerCoord::new(self.x, self.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Location of a lattice intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CornerCoord {
    x: i32,
    y: i32,
}

impl CornerCoord {
    /// Creates a new corner coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the corner.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the corner.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Computes the Manhattan distance between two corners.
    #[must_use]
    pub fn manhattan_distance(self, other: CornerCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for CornerCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orientation of an edge on the lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    /// Edge joining a corner with its eastern neighbor.
    Horizontal,
    /// Edge joining a corner with its southern neighbor.
    Vertical,
}

/// Canonical identity of the segment between two adjacent corners.
///
/// The key is the lower of the two corners plus the axis, so the same
/// segment resolves to one value no matter which endpoint a query starts
/// from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeCoord {
    origin: CornerCoord,
    axis: Axis,
}

impl EdgeCoord {
    /// Creates an edge starting at `origin` and extending one step along `axis`.
    #[must_use]
    pub const fn new(origin: CornerCoord, axis: Axis) -> Self {
        Self { origin, axis }
    }

    /// Creates a horizontal edge from `(x, y)` to `(x + 1, y)`.
    #[must_use]
    pub const fn horizontal(x: i32, y: i32) -> Self {
        Self::new(CornerCoord::new(x, y), Axis::Horizontal)
    }

    /// Creates a vertical edge from `(x, y)` to `(x, y + 1)`.
    #[must_use]
    pub const fn vertical(x: i32, y: i32) -> Self {
        Self::new(CornerCoord::new(x, y), Axis::Vertical)
    }

    /// Lower corner of the edge.
    #[must_use]
    pub const fn origin(&self) -> CornerCoord {
        self.origin
    }

    /// Upper corner of the edge.
    #[must_use]
    pub const fn end(&self) -> CornerCoord {
        match self.axis {
            Axis::Horizontal => self.origin.offset(1, 0),
            Axis::Vertical => self.origin.offset(0, 1),
        }
    }

    /// Orientation of the edge.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Both corners of the edge, lower first.
    #[must_use]
    pub const fn corners(&self) -> [CornerCoord; 2] {
        [self.origin, self.end()]
    }

    /// Cardinal directions that run along the edge, decreasing first.
    #[must_use]
    pub const fn directions_along(&self) -> [Cardinal; 2] {
        match self.axis {
            Axis::Horizontal => [Cardinal::West, Cardinal::East],
            Axis::Vertical => [Cardinal::North, Cardinal::South],
        }
    }
}

impl fmt::Display for EdgeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.end())
    }
}

/// The eight unit and diagonal steps between neighboring tiles.
///
/// North points toward decreasing `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Step toward decreasing `y`.
    North,
    /// Step toward increasing `x` and decreasing `y`.
    NorthEast,
    /// Step toward increasing `x`.
    East,
    /// Step toward increasing `x` and `y`.
    SouthEast,
    /// Step toward increasing `y`.
    South,
    /// Step toward decreasing `x` and increasing `y`.
    SouthWest,
    /// Step toward decreasing `x`.
    West,
    /// Step toward decreasing `x` and `y`.
    NorthWest,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Lattice offset `(dx, dy)` of a single step.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }
}

/// The four axis-aligned steps used by corners and edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinal {
    /// Step toward decreasing `y`.
    North,
    /// Step toward increasing `x`.
    East,
    /// Step toward increasing `y`.
    South,
    /// Step toward decreasing `x`.
    West,
}

impl Cardinal {
    /// Every cardinal direction in clockwise order starting at north.
    pub const ALL: [Cardinal; 4] = [
        Cardinal::North,
        Cardinal::East,
        Cardinal::South,
        Cardinal::West,
    ];

    /// Lattice offset `(dx, dy)` of a single step.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// Axis a step in this direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::East | Self::West => Axis::Horizontal,
            Self::North | Self::South => Axis::Vertical,
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

impl From<Cardinal> for Direction {
    fn from(value: Cardinal) -> Self {
        match value {
            Cardinal::North => Direction::North,
            Cardinal::East => Direction::East,
            Cardinal::South => Direction::South,
            Cardinal::West => Direction::West,
        }
    }
}

/// Orientation of a wall drawn across a tile's diagonal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagonalKind {
    /// Diagonal whose offsets share a sign, `(+1, +1)` or `(-1, -1)`.
    ForwardSlash,
    /// Diagonal whose offsets have opposite signs, `(+1, -1)` or `(-1, +1)`.
    BackSlash,
}

impl DiagonalKind {
    /// Tile offsets that continue a run of this diagonal, decreasing `x` first.
    #[must_use]
    pub const fn run_offsets(self) -> [(i32, i32); 2] {
        match self {
            Self::ForwardSlash => [(-1, -1), (1, 1)],
            Self::BackSlash => [(-1, 1), (1, -1)],
        }
    }
}

/// Dimensions of a floor measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Extent {
    width: u32,
    height: u32,
}

impl Extent {
    /// Creates an extent, rejecting empty or oversized floors.
    pub fn new(width: u32, height: u32) -> Result<Self, LatticeError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(LatticeError::InvalidExtent { width, height });
        }
        Ok(Self { width, height })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the tile lies in `[0, W) x [0, H)`.
    #[must_use]
    pub fn contains_tile(&self, tile: TileCoord) -> bool {
        within(tile.x(), self.width) && within(tile.y(), self.height)
    }

    /// Reports whether the corner lies in `[0, W] x [0, H]`.
    #[must_use]
    pub fn contains_corner(&self, corner: CornerCoord) -> bool {
        within_inclusive(corner.x(), self.width) && within_inclusive(corner.y(), self.height)
    }

    /// Reports whether both corners of the edge lie on the floor.
    #[must_use]
    pub fn contains_edge(&self, edge: EdgeCoord) -> bool {
        let origin = edge.origin();
        match edge.axis() {
            Axis::Horizontal => {
                within(origin.x(), self.width) && within_inclusive(origin.y(), self.height)
            }
            Axis::Vertical => {
                within_inclusive(origin.x(), self.width) && within(origin.y(), self.height)
            }
        }
    }

    /// Returns the tile unchanged when valid.
    pub fn check_tile(&self, tile: TileCoord) -> Result<TileCoord, LatticeError> {
        if self.contains_tile(tile) {
            Ok(tile)
        } else {
            Err(self.invalid(CoordSpace::Tile, tile.x(), tile.y()))
        }
    }

    /// Returns the corner unchanged when valid.
    pub fn check_corner(&self, corner: CornerCoord) -> Result<CornerCoord, LatticeError> {
        if self.contains_corner(corner) {
            Ok(corner)
        } else {
            Err(self.invalid(CoordSpace::Corner, corner.x(), corner.y()))
        }
    }

    /// Returns the edge unchanged when valid.
    pub fn check_edge(&self, edge: EdgeCoord) -> Result<EdgeCoord, LatticeError> {
        if self.contains_edge(edge) {
            Ok(edge)
        } else {
            let space = match edge.axis() {
                Axis::Horizontal => CoordSpace::HorizontalEdge,
                Axis::Vertical => CoordSpace::VerticalEdge,
            };
            Err(self.invalid(space, edge.origin().x(), edge.origin().y()))
        }
    }

    /// Tile reached by stepping once from `tile` in `direction`.
    pub fn neighbor_tile(
        &self,
        tile: TileCoord,
        direction: Direction,
    ) -> Result<TileCoord, LatticeError> {
        let tile = self.check_tile(tile)?;
        let (dx, dy) = direction.offset();
        self.check_tile(tile.offset(dx, dy))
    }

    /// Corner reached by stepping once from `corner` in `direction`.
    pub fn neighbor_corner(
        &self,
        corner: CornerCoord,
        direction: Cardinal,
    ) -> Result<CornerCoord, LatticeError> {
        let corner = self.check_corner(corner)?;
        let (dx, dy) = direction.offset();
        self.check_corner(corner.offset(dx, dy))
    }

    /// Next collinear edge sharing one corner with `edge`.
    ///
    /// Fails with [`LatticeError::NotCollinear`] when `direction` crosses the
    /// edge instead of running along it.
    pub fn neighbor_edge(
        &self,
        edge: EdgeCoord,
        direction: Cardinal,
    ) -> Result<EdgeCoord, LatticeError> {
        let edge = self.check_edge(edge)?;
        if direction.axis() != edge.axis() {
            return Err(LatticeError::NotCollinear { edge, direction });
        }
        let (dx, dy) = direction.offset();
        self.check_edge(EdgeCoord::new(edge.origin().offset(dx, dy), edge.axis()))
    }

    /// Number of tiles on the floor.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        dense_len(self.width, self.height)
    }

    /// Number of horizontal edges, `W x (H + 1)`.
    #[must_use]
    pub fn horizontal_edge_count(&self) -> usize {
        dense_len(self.width, self.height + 1)
    }

    /// Number of vertical edges, `(W + 1) x H`.
    #[must_use]
    pub fn vertical_edge_count(&self) -> usize {
        dense_len(self.width + 1, self.height)
    }

    fn invalid(&self, space: CoordSpace, x: i32, y: i32) -> LatticeError {
        LatticeError::InvalidCoordinate {
            space,
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn within(value: i32, bound: u32) -> bool {
    u32::try_from(value).map_or(false, |value| value < bound)
}

fn within_inclusive(value: i32, bound: u32) -> bool {
    u32::try_from(value).map_or(false, |value| value <= bound)
}

fn dense_len(columns: u32, rows: u32) -> usize {
    let len = u64::from(columns) * u64::from(rows);
    usize::try_from(len).unwrap_or(usize::MAX)
}

/// Resolves the edge joining two lattice-adjacent corners.
///
/// Argument order does not matter; both orders yield the canonical key.
pub fn edge_between(a: CornerCoord, b: CornerCoord) -> Result<EdgeCoord, LatticeError> {
    let dx = i64::from(b.x()) - i64::from(a.x());
    let dy = i64::from(b.y()) - i64::from(a.y());
    match (dx, dy) {
        (1, 0) => Ok(EdgeCoord::new(a, Axis::Horizontal)),
        (-1, 0) => Ok(EdgeCoord::new(b, Axis::Horizontal)),
        (0, 1) => Ok(EdgeCoord::new(a, Axis::Vertical)),
        (0, -1) => Ok(EdgeCoord::new(b, Axis::Vertical)),
        _ => Err(LatticeError::NotAdjacent { a, b }),
    }
}

/// Returns the two corners bounding `edge`, lower first.
#[must_use]
pub const fn corners_of_edge(edge: EdgeCoord) -> [CornerCoord; 2] {
    edge.corners()
}

/// Maps a drag offset onto the diagonal it sketches.
///
/// Offsets whose components share a sign produce
/// [`DiagonalKind::ForwardSlash`], opposite signs produce
/// [`DiagonalKind::BackSlash`]; an offset with a zero component does not
/// describe a diagonal and yields `None`.
#[must_use]
pub const fn direction_to_diagonal_kind(dx: i32, dy: i32) -> Option<DiagonalKind> {
    if dx == 0 || dy == 0 {
        None
    } else if (dx > 0) == (dy > 0) {
        Some(DiagonalKind::ForwardSlash)
    } else {
        Some(DiagonalKind::BackSlash)
    }
}

/// Coordinate space named by an [`LatticeError::InvalidCoordinate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordSpace {
    /// Tile coordinates, `[0, W) x [0, H)`.
    Tile,
    /// Corner coordinates, `[0, W] x [0, H]`.
    Corner,
    /// Horizontal edge origins, `[0, W) x [0, H]`.
    HorizontalEdge,
    /// Vertical edge origins, `[0, W] x [0, H)`.
    VerticalEdge,
}

impl fmt::Display for CoordSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Tile => "tile",
            Self::Corner => "corner",
            Self::HorizontalEdge => "horizontal edge",
            Self::VerticalEdge => "vertical edge",
        };
        f.write_str(label)
    }
}

/// Failures raised by lattice addressing and the topology store.
///
/// Every variant describes bad input; callers treat the operation as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LatticeError {
    /// A coordinate fell outside the floor extent.
    #[error("{space} coordinate ({x}, {y}) lies outside the {width}x{height} floor")]
    InvalidCoordinate {
        /// Coordinate space the value belongs to.
        space: CoordSpace,
        /// Offending column.
        x: i32,
        /// Offending row.
        y: i32,
        /// Floor width in tiles.
        width: u32,
        /// Floor height in tiles.
        height: u32,
    },
    /// An edge was requested between corners that are not lattice-adjacent.
    #[error("corners {a} and {b} are not lattice-adjacent")]
    NotAdjacent {
        /// First corner supplied.
        a: CornerCoord,
        /// Second corner supplied.
        b: CornerCoord,
    },
    /// A collinear neighbor was requested across the edge's axis.
    #[error("direction {direction:?} does not run along edge {edge}")]
    NotCollinear {
        /// Edge the walk started from.
        edge: EdgeCoord,
        /// Direction that crosses the edge.
        direction: Cardinal,
    },
    /// A floor extent was empty or too large for the lattice.
    #[error("floor extent {width}x{height} must be non-empty and fit the lattice")]
    InvalidExtent {
        /// Requested width in tiles.
        width: u32,
        /// Requested height in tiles.
        height: u32,
    },
}

/// Editing tool selected by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditTool {
    /// Pointer tool that does not edit the floor.
    #[default]
    Select,
    /// Carves straight or diagonal walls.
    PlaceWall,
    /// Places props onto tiles and edges.
    PlaceObject,
}

/// Key identifying a building lot and its grid calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LotKey(u32);

impl LotKey {
    /// Creates a new lot key.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the key.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lot#{}", self.0)
    }
}

/// Identifier of a prop placed on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates a new object identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}
