//! Scenario files replayed by the command-line adapter.

use std::fmt;

use anyhow::{Context, Result};
use floorgrid_core::{
    edge_between, CornerCoord, EditTool, Extent, LotKey, TileCoord, TracingDiagnostics,
};
use floorgrid_rendering::{plan::render_plan, SegmentMeshes};
use floorgrid_system_floor::{Building, ClickOutcome, FloorId, FloorServices};
use floorgrid_system_walls::{PlacementOutcome, WallPlacementConfig};
use floorgrid_world::{CalculatorRegistry, GridCalculator};
use glam::Vec3;
use serde::Deserialize;

/// Lot, floors and input steps to replay.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct Scenario {
    /// Grid transform of the lot every floor is built on.
    pub(crate) lot: LotSpec,
    /// Wall placement tunables; scaled to the tile size when omitted.
    #[serde(default)]
    pub(crate) walls: Option<WallPlacementConfig>,
    /// Number of floors stacked on the lot.
    #[serde(default = "default_floors")]
    pub(crate) floors: u32,
    /// Vertical distance between consecutive floors.
    #[serde(default)]
    pub(crate) floor_height: f32,
    /// Inputs applied in order.
    #[serde(default, rename = "step")]
    pub(crate) steps: Vec<Step>,
}

fn default_floors() -> u32 {
    1
}

/// Grid transform of a lot.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct LotSpec {
    /// Lot identifier.
    #[serde(default)]
    pub(crate) key: u32,
    /// Tiles along x.
    pub(crate) width: u32,
    /// Tiles along y.
    pub(crate) height: u32,
    /// Side of a tile in world units.
    pub(crate) tile_size: f32,
    /// World position of corner `(0, 0)`.
    #[serde(default)]
    pub(crate) origin: [f32; 3],
    /// Rotation about +Z in degrees.
    #[serde(default)]
    pub(crate) yaw_degrees: f32,
}

/// One replayed input.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum Step {
    /// Switch the active tool.
    Tool {
        /// Tool to select.
        tool: EditTool,
    },
    /// Press the pointer at a world point.
    Press {
        /// World x and y.
        at: [f32; 2],
        /// Floor receiving the input.
        #[serde(default)]
        floor: u32,
    },
    /// Move the held pointer.
    Drag {
        /// World x and y.
        at: [f32; 2],
        /// Floor receiving the input.
        #[serde(default)]
        floor: u32,
    },
    /// Release the pointer.
    Release {
        /// World x and y.
        at: [f32; 2],
        /// Floor receiving the input.
        #[serde(default)]
        floor: u32,
    },
    /// Abort any gesture on a floor.
    Cancel {
        /// Floor receiving the signal.
        #[serde(default)]
        floor: u32,
    },
    /// Mark a tile occupied before drawing around it.
    Occupy {
        /// Tile x and y.
        tile: [i32; 2],
        /// Floor holding the tile.
        #[serde(default)]
        floor: u32,
    },
    /// Forbid building on the edge between two adjacent corners.
    Forbid {
        /// Corner x and y at one end.
        from: [i32; 2],
        /// Corner x and y at the other end.
        to: [i32; 2],
        /// Floor holding the edge.
        #[serde(default)]
        floor: u32,
    },
}

impl Scenario {
    /// Parses a scenario from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid scenario")
    }
}

/// Result of a replay.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Report {
    /// Walls committed across every floor.
    pub(crate) committed: usize,
    /// Gestures that ended without building.
    pub(crate) discarded: usize,
    /// Inputs ignored by their target.
    pub(crate) ignored: usize,
    /// Rendered plan of every floor, ground floor first.
    pub(crate) plans: Vec<String>,
    /// Wall segments held by the mesh generator at the end.
    pub(crate) wall_segments: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, plan) in self.plans.iter().enumerate() {
            writeln!(f, "floor {level}")?;
            writeln!(f, "{plan}")?;
        }
        write!(
            f,
            "{} committed, {} discarded, {} ignored, {} wall segment(s)",
            self.committed, self.discarded, self.ignored, self.wall_segments
        )
    }
}

/// Builds the scenario's floors and applies every step.
pub(crate) fn replay(scenario: &Scenario) -> Result<Report> {
    let lot = LotKey::new(scenario.lot.key);
    let extent = Extent::new(scenario.lot.width, scenario.lot.height)
        .context("invalid lot dimensions")?;
    let calculator = GridCalculator::new(
        extent,
        Vec3::from_array(scenario.lot.origin),
        scenario.lot.yaw_degrees,
        scenario.lot.tile_size,
    )
    .context("invalid lot transform")?;
    let config = scenario
        .walls
        .unwrap_or_else(|| WallPlacementConfig::for_tile_size(calculator.tile_size()));

    let mut registry = CalculatorRegistry::new();
    let _ = registry.register(lot, calculator);

    let diagnostics = TracingDiagnostics;
    let mut building = Building::new();
    for level in 0..scenario.floors.max(1) {
        let id = building.add_floor();
        building
            .floor_mut(id)?
            .initialize(
                lot,
                level as f32 * scenario.floor_height,
                &registry,
                config,
                &diagnostics,
            )
            .with_context(|| format!("initializing floor {level}"))?;
    }

    let mut meshes = SegmentMeshes::default();
    let mut report = Report::default();
    {
        let mut services = FloorServices {
            meshes: &mut meshes,
            diagnostics: &diagnostics,
            objects: None,
        };
        for (index, step) in scenario.steps.iter().enumerate() {
            apply(&mut building, &mut services, step, scenario.floor_height, &mut report)
                .with_context(|| format!("step {} ({step:?})", index + 1))?;
        }
    }

    for (_, floor) in building.floors() {
        report.plans.push(render_plan(floor.grid()?.store()));
    }
    report.wall_segments = meshes.wall_segments().count();
    Ok(report)
}

fn apply(
    building: &mut Building,
    services: &mut FloorServices<'_>,
    step: &Step,
    floor_height: f32,
    report: &mut Report,
) -> Result<()> {
    let point = |at: [f32; 2], floor: u32| Vec3::new(at[0], at[1], floor as f32 * floor_height);
    let outcome = match *step {
        Step::Tool { tool } => {
            let cancelled = building.set_tool(tool, services);
            tracing::info!(?tool, cancelled, "tool selected");
            return Ok(());
        }
        Step::Press { at, floor } | Step::Drag { at, floor } => {
            building.handle_click(FloorId::new(floor), point(at, floor), true, services)?
        }
        Step::Release { at, floor } => {
            building.handle_click(FloorId::new(floor), point(at, floor), false, services)?
        }
        Step::Cancel { floor } => {
            let cancelled = building
                .floor_mut(FloorId::new(floor))?
                .cancel_interactions(services);
            tracing::info!(floor, cancelled, "cancel requested");
            return Ok(());
        }
        Step::Occupy { tile, floor } => {
            building
                .floor_mut(FloorId::new(floor))?
                .grid_mut()?
                .store_mut()
                .occupy_tile(TileCoord::new(tile[0], tile[1]))?;
            return Ok(());
        }
        Step::Forbid { from, to, floor } => {
            let edge = edge_between(
                CornerCoord::new(from[0], from[1]),
                CornerCoord::new(to[0], to[1]),
            )?;
            building
                .floor_mut(FloorId::new(floor))?
                .grid_mut()?
                .store_mut()
                .set_edge_forbidden(edge, true)?;
            return Ok(());
        }
    };

    tracing::debug!(?outcome, "click handled");
    match outcome {
        ClickOutcome::Wall(PlacementOutcome::Committed { .. }) => report.committed += 1,
        ClickOutcome::Wall(PlacementOutcome::Discarded { .. }) => report.discarded += 1,
        ClickOutcome::Wall(PlacementOutcome::Ignored)
        | ClickOutcome::Unhandled(_)
        | ClickOutcome::Uninitialized => report.ignored += 1,
        ClickOutcome::Wall(_) | ClickOutcome::Object => {}
    }
    Ok(())
}
