use std::cell::RefCell;
use std::fmt;

use floorgrid_core::{Diagnostics, EditTool, EdgeCoord, Extent, LotKey, Severity, TileCoord};
use floorgrid_system_floor::{
    Building, ClickOutcome, FloorError, FloorId, FloorServices, ObjectPlacement,
};
use floorgrid_system_walls::{
    MeshGenerator, MeshHandle, PlacementOutcome, PlacementPhase, PreviewHandle, WallMesh,
    WallPlacementConfig, WallPreview,
};
use floorgrid_world::{CalculatorRegistry, ClickResolution, GridCalculator, GridStore};
use glam::Vec3;

#[derive(Default)]
struct Recorder {
    entries: RefCell<Vec<(Severity, String)>>,
}

impl Recorder {
    fn count(&self, severity: Severity) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(entry, _)| *entry == severity)
            .count()
    }
}

impl Diagnostics for Recorder {
    fn emit(&self, severity: Severity, _source: &str, message: fmt::Arguments<'_>) {
        self.entries.borrow_mut().push((severity, message.to_string()));
    }
}

#[derive(Default)]
struct CountingMeshes {
    live_previews: usize,
    walls: usize,
}

impl MeshGenerator for CountingMeshes {
    fn spawn_preview(&mut self, _store: &GridStore, _preview: &WallPreview) -> PreviewHandle {
        self.live_previews += 1;
        PreviewHandle::new(self.live_previews as u64)
    }

    fn spawn_wall(&mut self, _store: &GridStore, _wall: &WallMesh) -> MeshHandle {
        self.walls += 1;
        MeshHandle::new(self.walls as u64)
    }

    fn destroy_previews(&mut self, handles: &[PreviewHandle]) {
        self.live_previews -= handles.len();
    }
}

#[derive(Default)]
struct OccupyOnPress {
    clicks: usize,
}

impl ObjectPlacement for OccupyOnPress {
    fn handle_click(
        &mut self,
        resolution: ClickResolution,
        store: &mut GridStore,
        is_pressed: bool,
        _diagnostics: &dyn Diagnostics,
    ) {
        self.clicks += 1;
        if let (true, Some(tile)) = (is_pressed, resolution.tile) {
            store.occupy_tile(tile).expect("tile on the floor");
        }
    }
}

const LOT: LotKey = LotKey::new(3);

fn registry() -> CalculatorRegistry {
    let mut registry = CalculatorRegistry::new();
    let calculator = GridCalculator::new(Extent::new(6, 6).expect("extent"), Vec3::ZERO, 0.0, 1.0)
        .expect("calculator");
    let _ = registry.register(LOT, calculator);
    registry
}

fn building_with_floors(count: usize, diagnostics: &Recorder) -> (Building, Vec<FloorId>) {
    let registry = registry();
    let mut building = Building::new();
    let ids: Vec<FloorId> = (0..count).map(|_| building.add_floor()).collect();
    for (level, id) in ids.iter().enumerate() {
        building
            .floor_mut(*id)
            .expect("floor")
            .initialize(
                LOT,
                level as f32 * 3.0,
                &registry,
                WallPlacementConfig::for_tile_size(1.0),
                diagnostics,
            )
            .expect("initialize");
    }
    (building, ids)
}

#[test]
fn floors_link_to_their_neighbors() {
    let recorder = Recorder::default();
    let (building, ids) = building_with_floors(3, &recorder);

    let middle = building.floor(ids[1]).expect("floor");
    assert_eq!(middle.above(), Some(ids[2]));
    assert_eq!(middle.below(), Some(ids[0]));

    let ground = building.floor(ids[0]).expect("floor");
    assert_eq!(ground.below(), None, "ground floor has nothing below");
    assert_eq!(
        building
            .floor_above(ids[0])
            .expect("floor")
            .map(|floor| floor.index()),
        Some(building.floor(ids[1]).expect("floor").index())
    );
    assert!(building.floor_above(ids[2]).expect("floor").is_none());
    assert_eq!(building.floors().count(), 3);
    assert_eq!(
        building.floor(FloorId::new(7)).map(|floor| floor.index()),
        Err(FloorError::UnknownFloor {
            floor: FloorId::new(7)
        })
    );
}

#[test]
fn wall_clicks_flow_through_the_building() {
    let recorder = Recorder::default();
    let mut meshes = CountingMeshes::default();
    let (mut building, ids) = building_with_floors(2, &recorder);
    let mut services = FloorServices {
        meshes: &mut meshes,
        diagnostics: &recorder,
        objects: None,
    };

    assert_eq!(building.set_tool(EditTool::PlaceWall, &mut services), 0);
    let upper = ids[1];
    let _ = building
        .handle_click(upper, Vec3::new(1.0, 1.0, 3.0), true, &mut services)
        .expect("click");
    let outcome = building
        .handle_click(upper, Vec3::new(1.0, 3.0, 3.0), false, &mut services)
        .expect("click");

    assert!(
        matches!(
            outcome,
            ClickOutcome::Wall(PlacementOutcome::Committed { .. })
        ),
        "release should commit on the upper floor, got {outcome:?}"
    );
    let upper_store = building.floor(upper).expect("floor").grid().expect("grid").store();
    assert_eq!(upper_store.edge_has_wall(EdgeCoord::vertical(1, 2)), Ok(true));
    let ground_store = building.floor(ids[0]).expect("floor").grid().expect("grid").store();
    assert_eq!(
        ground_store.walled_edges().count(),
        0,
        "other floors are untouched"
    );
    assert_eq!(meshes.walls, 1);
    assert_eq!(meshes.live_previews, 0);
}

#[test]
fn switching_tools_cancels_gestures_in_flight() {
    let recorder = Recorder::default();
    let mut meshes = CountingMeshes::default();
    let (mut building, ids) = building_with_floors(1, &recorder);
    let mut services = FloorServices {
        meshes: &mut meshes,
        diagnostics: &recorder,
        objects: None,
    };

    let _ = building.set_tool(EditTool::PlaceWall, &mut services);
    let _ = building
        .handle_click(ids[0], Vec3::new(2.0, 2.0, 0.0), true, &mut services)
        .expect("click");
    let _ = building
        .handle_click(ids[0], Vec3::new(5.0, 2.0, 0.0), true, &mut services)
        .expect("click");
    let walls = building.floor(ids[0]).expect("floor").grid().expect("grid").walls();
    assert!(matches!(
        walls.phase(),
        PlacementPhase::PlacingStraight { .. }
    ));

    assert_eq!(building.set_tool(EditTool::Select, &mut services), 1);
    assert_eq!(building.current_tool(), EditTool::Select);

    let grid = building.floor(ids[0]).expect("floor").grid().expect("grid");
    assert_eq!(grid.walls().phase(), PlacementPhase::Idle);
    assert_eq!(grid.store().walled_edges().count(), 0);
    assert_eq!(meshes.live_previews, 0);
}

#[test]
fn object_clicks_reach_the_object_handler() {
    let recorder = Recorder::default();
    let mut meshes = CountingMeshes::default();
    let mut objects = OccupyOnPress::default();
    let (mut building, ids) = building_with_floors(1, &recorder);
    {
        let mut services = FloorServices {
            meshes: &mut meshes,
            diagnostics: &recorder,
            objects: Some(&mut objects),
        };
        let _ = building.set_tool(EditTool::PlaceObject, &mut services);
        let outcome = building
            .handle_click(ids[0], Vec3::new(4.5, 0.5, 0.0), true, &mut services)
            .expect("click");
        assert_eq!(outcome, ClickOutcome::Object);
    }

    assert_eq!(objects.clicks, 1);
    let store = building.floor(ids[0]).expect("floor").grid().expect("grid").store();
    assert_eq!(store.is_tile_occupied(TileCoord::new(4, 0)), Ok(true));
}

#[test]
fn clicks_on_an_uninitialized_floor_warn_and_do_nothing() {
    let recorder = Recorder::default();
    let mut meshes = CountingMeshes::default();
    let mut building = Building::new();
    let id = building.add_floor();
    let mut services = FloorServices {
        meshes: &mut meshes,
        diagnostics: &recorder,
        objects: None,
    };

    let _ = building.set_tool(EditTool::PlaceWall, &mut services);
    let outcome = building
        .handle_click(id, Vec3::new(1.0, 1.0, 0.0), true, &mut services)
        .expect("click");

    assert_eq!(outcome, ClickOutcome::Uninitialized);
    assert_eq!(recorder.count(Severity::Warning), 1);
    assert_eq!(meshes.live_previews, 0);
}

#[test]
fn reinitializing_mid_gesture_is_refused() {
    let recorder = Recorder::default();
    let mut meshes = CountingMeshes::default();
    let (mut building, ids) = building_with_floors(1, &recorder);
    let mut services = FloorServices {
        meshes: &mut meshes,
        diagnostics: &recorder,
        objects: None,
    };

    let _ = building.set_tool(EditTool::PlaceWall, &mut services);
    let _ = building
        .handle_click(ids[0], Vec3::new(1.0, 1.0, 0.0), true, &mut services)
        .expect("click");

    let floor = building.floor_mut(ids[0]).expect("floor");
    let result = floor.initialize(
        LOT,
        0.0,
        &registry(),
        WallPlacementConfig::for_tile_size(1.0),
        &recorder,
    );
    assert_eq!(
        result,
        Err(FloorError::GestureInFlight {
            floor: floor.index()
        })
    );
    assert_eq!(recorder.count(Severity::Warning), 1);
    assert!(floor.grid().expect("grid").walls().is_placing());

    assert!(floor.cancel_interactions(&mut services));
    assert_eq!(
        floor.initialize(
            LOT,
            0.0,
            &registry(),
            WallPlacementConfig::for_tile_size(1.0),
            &recorder,
        ),
        Ok(())
    );
    assert_eq!(floor.grid().expect("grid").lot(), LOT);
    assert_eq!(meshes.live_previews, 0);
}

#[test]
fn pressing_another_floor_cancels_the_first_gesture() {
    let recorder = Recorder::default();
    let mut meshes = CountingMeshes::default();
    let (mut building, ids) = building_with_floors(2, &recorder);
    let mut services = FloorServices {
        meshes: &mut meshes,
        diagnostics: &recorder,
        objects: None,
    };

    let _ = building.set_tool(EditTool::PlaceWall, &mut services);
    let _ = building
        .handle_click(ids[0], Vec3::new(1.0, 1.0, 0.0), true, &mut services)
        .expect("click");
    let outcome = building
        .handle_click(ids[1], Vec3::new(2.0, 2.0, 3.0), true, &mut services)
        .expect("click");
    assert!(matches!(
        outcome,
        ClickOutcome::Wall(PlacementOutcome::Started { .. })
    ));

    let previews: Vec<(bool, usize)> = building
        .floors()
        .map(|(_, floor)| {
            let walls = floor.grid().expect("grid").walls();
            (walls.is_placing(), walls.preview_handles().len())
        })
        .collect();
    assert_eq!(previews, vec![(false, 0), (true, 1)]);

    let _ = building
        .handle_click(ids[1], Vec3::new(2.0, 4.0, 3.0), false, &mut services)
        .expect("click");
    let ground = building.floor(ids[0]).expect("floor").grid().expect("grid");
    assert_eq!(ground.store().walled_edges().count(), 0);
    assert_eq!(meshes.live_previews, 0);
}

#[test]
fn clicks_on_an_unknown_floor_fail() {
    let recorder = Recorder::default();
    let mut meshes = CountingMeshes::default();
    let (mut building, _) = building_with_floors(1, &recorder);
    let mut services = FloorServices {
        meshes: &mut meshes,
        diagnostics: &recorder,
        objects: None,
    };

    assert_eq!(
        building.handle_click(FloorId::new(4), Vec3::ZERO, true, &mut services),
        Err(FloorError::UnknownFloor {
            floor: FloorId::new(4)
        })
    );
}
