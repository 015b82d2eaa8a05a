#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Floor context tying one floor's topology store to its interactions.
//!
//! A [`Floor`] owns its [`GridStore`], click resolver and wall placement
//! state machine once initialized against a lot's calculator, and routes
//! clicks to them according to the active [`EditTool`]. Floors live in a
//! [`Building`] arena that links each floor to the ones above and below.

use std::fmt;

use floorgrid_core::{Diagnostics, EditTool, LotKey};
use floorgrid_system_walls::{
    MeshGenerator, PlacementOutcome, WallContext, WallPlacement, WallPlacementConfig,
};
use floorgrid_world::{CalculatorRegistry, ClickResolution, ClickResolver, GridClick, GridStore};
use glam::Vec3;

mod building;

pub use building::{Building, FloorId};

const SOURCE: &str = "floor";

/// Level of a floor within its building, ground floor first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FloorIndex(u32);

impl FloorIndex {
    /// Creates a new floor index.
    #[must_use]
    pub const fn new(level: u32) -> Self {
        Self(level)
    }

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FloorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "floor {}", self.0)
    }
}

/// Failures raised by floor setup and lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FloorError {
    /// The lot has no registered calculator.
    #[error("no grid calculator registered for lot {lot}")]
    MissingCalculator {
        /// Lot the floor belongs to.
        lot: LotKey,
    },
    /// The floor has not been initialized against a calculator yet.
    #[error("{floor} has no grid")]
    Uninitialized {
        /// Floor that was queried.
        floor: FloorIndex,
    },
    /// A wall gesture is in flight on the floor.
    #[error("{floor} has a wall gesture in flight")]
    GestureInFlight {
        /// Floor that was busy.
        floor: FloorIndex,
    },
    /// The building holds no floor with this identifier.
    #[error("unknown floor {floor}")]
    UnknownFloor {
        /// Identifier that failed to resolve.
        floor: FloorId,
    },
}

/// Handles clicks made with [`EditTool::PlaceObject`].
///
/// Object placement itself lives outside this workspace; implementors get
/// the resolved click and the floor's store.
pub trait ObjectPlacement {
    /// Reacts to one pointer sample.
    fn handle_click(
        &mut self,
        resolution: ClickResolution,
        store: &mut GridStore,
        is_pressed: bool,
        diagnostics: &dyn Diagnostics,
    );
}

/// Process-wide services lent to a floor for one call.
pub struct FloorServices<'a> {
    /// Generator owning every wall visual.
    pub meshes: &'a mut dyn MeshGenerator,
    /// Sink for progress and misuse reports.
    pub diagnostics: &'a dyn Diagnostics,
    /// Optional handler for the object tool.
    pub objects: Option<&'a mut dyn ObjectPlacement>,
}

impl fmt::Debug for FloorServices<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloorServices")
            .field("objects", &self.objects.is_some())
            .finish_non_exhaustive()
    }
}

/// What a click did on a floor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The wall tool consumed the click.
    Wall(PlacementOutcome),
    /// The object handler consumed the click.
    Object,
    /// No handler exists for the active tool.
    Unhandled(EditTool),
    /// The floor has no grid yet.
    Uninitialized,
}

/// Everything a floor owns once it has a grid.
#[derive(Debug)]
pub struct FloorGrid {
    lot: LotKey,
    store: GridStore,
    click: GridClick,
    walls: WallPlacement,
}

impl FloorGrid {
    /// Lot the grid was built for.
    #[must_use]
    pub const fn lot(&self) -> LotKey {
        self.lot
    }

    /// Topology of the floor.
    #[must_use]
    pub const fn store(&self) -> &GridStore {
        &self.store
    }

    /// Mutable topology of the floor, for edits made outside a gesture.
    pub fn store_mut(&mut self) -> &mut GridStore {
        &mut self.store
    }

    /// Resolver used for every click on this floor.
    #[must_use]
    pub const fn click(&self) -> &GridClick {
        &self.click
    }

    /// Wall placement state machine of this floor.
    #[must_use]
    pub const fn walls(&self) -> &WallPlacement {
        &self.walls
    }

    fn wall_context<'a>(
        &'a mut self,
        services: &'a mut FloorServices<'_>,
    ) -> (&'a mut WallPlacement, WallContext<'a>) {
        let ctx = WallContext {
            store: &mut self.store,
            click: &self.click,
            meshes: &mut *services.meshes,
            diagnostics: services.diagnostics,
        };
        (&mut self.walls, ctx)
    }
}

/// One floor of a building.
#[derive(Debug)]
pub struct Floor {
    index: FloorIndex,
    above: Option<FloorId>,
    below: Option<FloorId>,
    debug: bool,
    grid: Option<FloorGrid>,
}

impl Floor {
    /// Creates an uninitialized floor at `index`.
    #[must_use]
    pub const fn new(index: FloorIndex) -> Self {
        Self {
            index,
            above: None,
            below: None,
            debug: false,
            grid: None,
        }
    }

    /// Builds the floor's grid from the calculator registered for `lot`.
    ///
    /// Calling it again rebuilds the grid from scratch. Rebuilding is refused
    /// while a wall gesture is in flight, since its previews would be lost;
    /// cancel the gesture first.
    pub fn initialize(
        &mut self,
        lot: LotKey,
        floor_height: f32,
        registry: &CalculatorRegistry,
        config: WallPlacementConfig,
        diagnostics: &dyn Diagnostics,
    ) -> Result<(), FloorError> {
        if let Some(grid) = self.grid.as_ref().filter(|grid| grid.walls.is_placing()) {
            diagnostics.warning(
                SOURCE,
                format_args!(
                    "{} cannot reinitialize on lot {lot}: wall gesture in flight on lot {}",
                    self.index, grid.lot
                ),
            );
            return Err(FloorError::GestureInFlight { floor: self.index });
        }

        let Some(calculator) = registry.calculator(lot) else {
            diagnostics.error(
                SOURCE,
                format_args!("{} cannot initialize: no calculator for lot {lot}", self.index),
            );
            return Err(FloorError::MissingCalculator { lot });
        };

        let extent = calculator.extent();
        self.grid = Some(FloorGrid {
            lot,
            store: GridStore::new(calculator.clone(), floor_height),
            click: GridClick::new(calculator.clone()),
            walls: WallPlacement::new(config),
        });
        diagnostics.info(
            SOURCE,
            format_args!("{} initialized on lot {lot} with {extent} tiles", self.index),
        );
        Ok(())
    }

    /// Level of this floor.
    #[must_use]
    pub const fn index(&self) -> FloorIndex {
        self.index
    }

    /// Floor directly above, if any.
    #[must_use]
    pub const fn above(&self) -> Option<FloorId> {
        self.above
    }

    /// Floor directly below, if any.
    #[must_use]
    pub const fn below(&self) -> Option<FloorId> {
        self.below
    }

    /// Whether unhandled clicks are reported.
    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Enables or disables reporting of unhandled clicks.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Whether the floor has a grid.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.grid.is_some()
    }

    /// Grid owned by the floor.
    pub fn grid(&self) -> Result<&FloorGrid, FloorError> {
        self.grid.as_ref().ok_or(FloorError::Uninitialized { floor: self.index })
    }

    /// Mutable grid owned by the floor.
    pub fn grid_mut(&mut self) -> Result<&mut FloorGrid, FloorError> {
        self.grid.as_mut().ok_or(FloorError::Uninitialized { floor: self.index })
    }

    /// Routes a pointer sample to the handler of `tool`.
    pub fn handle_click(
        &mut self,
        tool: EditTool,
        world_point: Vec3,
        is_pressed: bool,
        services: &mut FloorServices<'_>,
    ) -> ClickOutcome {
        let index = self.index;
        let debug = self.debug;
        let Some(grid) = self.grid.as_mut() else {
            services.diagnostics.warning(
                SOURCE,
                format_args!("{index} ignored a click before initialization"),
            );
            return ClickOutcome::Uninitialized;
        };

        match tool {
            EditTool::PlaceWall => {
                let (walls, mut ctx) = grid.wall_context(services);
                ClickOutcome::Wall(walls.handle_place_wall(&mut ctx, world_point, is_pressed))
            }
            EditTool::PlaceObject if services.objects.is_some() => {
                let resolution = grid.click.resolve(world_point);
                if let Some(objects) = services.objects.as_deref_mut() {
                    objects.handle_click(
                        resolution,
                        &mut grid.store,
                        is_pressed,
                        services.diagnostics,
                    );
                }
                ClickOutcome::Object
            }
            other => {
                if debug {
                    services.diagnostics.debug(
                        SOURCE,
                        format_args!("{index} has no handler for {other:?}"),
                    );
                }
                ClickOutcome::Unhandled(other)
            }
        }
    }

    /// Aborts every in-flight gesture on this floor.
    ///
    /// Returns `true` when a gesture was cancelled.
    pub fn cancel_interactions(&mut self, services: &mut FloorServices<'_>) -> bool {
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let (walls, mut ctx) = grid.wall_context(services);
        walls.cancel(&mut ctx) == PlacementOutcome::Cancelled
    }

    pub(crate) fn link(&mut self, above: Option<FloorId>, below: Option<FloorId>) {
        if above.is_some() {
            self.above = above;
        }
        if below.is_some() {
            self.below = below;
        }
    }
}
