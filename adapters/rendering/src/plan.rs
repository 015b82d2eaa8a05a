//! Text rendering of a floor's topology, north up.
//!
//! Corners print as `+`, walled edges as `-` or `|`, edges carrying an
//! object as `~`, forbidden edges as `x`. Tiles print their diagonal wall
//! as it appears with north up, or `#` when occupied.

use floorgrid_core::{DiagonalKind, EdgeCoord, TileCoord};
use floorgrid_world::GridStore;

/// Renders every tile, edge and corner of `store` as a character grid.
#[must_use]
pub fn render_plan(store: &GridStore) -> String {
    let extent = store.extent();
    let width = i32::try_from(extent.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(extent.height()).unwrap_or(i32::MAX);

    let mut lines = Vec::new();
    for y in 0..=height {
        let mut line = String::new();
        for x in 0..=width {
            line.push('+');
            if x < width {
                line.push(edge_glyph(store, EdgeCoord::horizontal(x, y), '-'));
            }
        }
        lines.push(line);

        if y == height {
            break;
        }

        let mut line = String::new();
        for x in 0..=width {
            line.push(edge_glyph(store, EdgeCoord::vertical(x, y), '|'));
            if x < width {
                line.push(tile_glyph(store, TileCoord::new(x, y)));
            }
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn edge_glyph(store: &GridStore, coord: EdgeCoord, wall: char) -> char {
    match store.edge(coord) {
        Ok(edge) if edge.has_wall() => wall,
        Ok(edge) if edge.has_object() => '~',
        Ok(edge) if edge.is_forbidden() => 'x',
        _ => ' ',
    }
}

fn tile_glyph(store: &GridStore, coord: TileCoord) -> char {
    match store.tile(coord) {
        Ok(tile) => match (tile.diagonal_wall(), tile.is_occupied()) {
            (Some(DiagonalKind::ForwardSlash), _) => '\\',
            (Some(DiagonalKind::BackSlash), _) => '/',
            (None, true) => '#',
            (None, false) => ' ',
        },
        Err(_) => ' ',
    }
}
