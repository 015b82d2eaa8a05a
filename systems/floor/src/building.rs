//! Arena of floors stacked into one building.

use std::fmt;

use floorgrid_core::EditTool;
use glam::Vec3;

use crate::{ClickOutcome, Floor, FloorError, FloorIndex, FloorServices};

/// Identifier of a floor inside its [`Building`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FloorId(u32);

impl FloorId {
    /// Creates a new floor identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FloorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Floors of one building together with the active edit tool.
#[derive(Debug, Default)]
pub struct Building {
    floors: Vec<Floor>,
    tool: EditTool,
}

impl Building {
    /// Creates a building with no floors and the default tool selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a floor on top of the current top floor and links the two.
    pub fn add_floor(&mut self) -> FloorId {
        let level = u32::try_from(self.floors.len()).unwrap_or(u32::MAX);
        let id = FloorId::new(level);
        let below = self.floors.len().checked_sub(1).map(|top| {
            let top_id = FloorId::new(level.saturating_sub(1));
            if let Some(floor) = self.floors.get_mut(top) {
                floor.link(Some(id), None);
            }
            top_id
        });

        let mut floor = Floor::new(FloorIndex::new(level));
        floor.link(None, below);
        self.floors.push(floor);
        tracing::debug!(floor = %id, "floor added");
        id
    }

    /// Number of floors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.floors.len()
    }

    /// Whether the building has no floors yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Floor with identifier `id`.
    pub fn floor(&self, id: FloorId) -> Result<&Floor, FloorError> {
        self.floors
            .get(slot(id))
            .ok_or(FloorError::UnknownFloor { floor: id })
    }

    /// Mutable floor with identifier `id`.
    pub fn floor_mut(&mut self, id: FloorId) -> Result<&mut Floor, FloorError> {
        self.floors
            .get_mut(slot(id))
            .ok_or(FloorError::UnknownFloor { floor: id })
    }

    /// Floor directly above `id`, if any.
    pub fn floor_above(&self, id: FloorId) -> Result<Option<&Floor>, FloorError> {
        let above = self.floor(id)?.above();
        above.map(|above| self.floor(above)).transpose()
    }

    /// Floor directly below `id`, if any.
    pub fn floor_below(&self, id: FloorId) -> Result<Option<&Floor>, FloorError> {
        let below = self.floor(id)?.below();
        below.map(|below| self.floor(below)).transpose()
    }

    /// Iterates over every floor, ground floor first.
    pub fn floors(&self) -> impl Iterator<Item = (FloorId, &Floor)> + '_ {
        self.floors
            .iter()
            .enumerate()
            .map(|(position, floor)| {
                let id = u32::try_from(position).unwrap_or(u32::MAX);
                (FloorId::new(id), floor)
            })
    }

    /// Tool applied to every click.
    #[must_use]
    pub const fn current_tool(&self) -> EditTool {
        self.tool
    }

    /// Switches the active tool, cancelling gestures on every floor when it
    /// changes.
    ///
    /// Returns the number of gestures cancelled.
    pub fn set_tool(&mut self, tool: EditTool, services: &mut FloorServices<'_>) -> usize {
        if tool == self.tool {
            return 0;
        }

        let mut cancelled = 0;
        for floor in &mut self.floors {
            if floor.cancel_interactions(services) {
                cancelled += 1;
            }
        }
        services.diagnostics.debug(
            crate::SOURCE,
            format_args!("tool {:?} -> {tool:?}, {cancelled} gesture(s) cancelled", self.tool),
        );
        self.tool = tool;
        cancelled
    }

    /// Routes a pointer sample on floor `id` with the current tool.
    ///
    /// A press cancels gestures left in flight on every other floor, so at
    /// most one gesture exists in the building.
    pub fn handle_click(
        &mut self,
        id: FloorId,
        world_point: Vec3,
        is_pressed: bool,
        services: &mut FloorServices<'_>,
    ) -> Result<ClickOutcome, FloorError> {
        let tool = self.tool;
        let target = slot(id);
        if target >= self.floors.len() {
            return Err(FloorError::UnknownFloor { floor: id });
        }

        if is_pressed {
            for (position, floor) in self.floors.iter_mut().enumerate() {
                if position != target && floor.cancel_interactions(services) {
                    services.diagnostics.debug(
                        crate::SOURCE,
                        format_args!("{} gesture cancelled by a press on {id}", floor.index()),
                    );
                }
            }
        }

        let floor = self.floor_mut(id)?;
        Ok(floor.handle_click(tool, world_point, is_pressed, services))
    }
}

fn slot(id: FloorId) -> usize {
    usize::try_from(id.get()).unwrap_or(usize::MAX)
}
