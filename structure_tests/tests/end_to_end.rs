// End-to-end scenarios across the hashing, ID and structure crates.
//
// Each test drives the public API the way an editor or loader would: build
// or load a structure, render it, fill instance buffers, persist and reload
// it, and resolve assets through the registry. Fixtures live in
// `structure_tests::*` (src/lib.rs).

use alienation_hash::{hash_ascii, hash_str};
use alienation_ids::IdError;
use alienation_sim::assets::{Item, ItemAsset};
use alienation_sim::bounds::{FromTo, FromTo3D};
use alienation_sim::config::RegistryConfig;
use alienation_sim::instances::InstanceBuffers;
use alienation_sim::issue::unhandled_issue_count;
use alienation_sim::render::RenderInfo;
use alienation_sim::types::{Door, OpenSides, Orientation, RoomPart};
use alienation_sim::{IssueKind, Structure};
use proptest::prelude::*;
use structure_tests::*;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn single_closed_room_renders_full_ring() {
    let config = config_with("{}");
    let mut s = Structure::new();
    placed(s.place_room(FromTo::new((0, 0), (9, -4)), 0, 0));

    let c = tally(s.render_all(&config.structure));
    assert_eq!(count(&c, RoomPart::Floor), 1);
    assert_eq!(count(&c, RoomPart::Ceiling), 1);
    assert_eq!(count(&c, RoomPart::Wall), 30);
    assert_eq!(count(&c, RoomPart::WallShort), 26);
    assert_eq!(count(&c, RoomPart::DoorFrame), 0);
    assert_eq!(count(&c, RoomPart::Railing), 0);
}

#[test]
fn demo_interior_part_counts() {
    let config = config_with("{}");
    let (s, _) = demo();
    let c = tally(s.render_all(&config.structure));

    // The main room's back door and the annex's front door open onto each
    // other, so only the left-wall door gets a frame.
    assert_eq!(count(&c, RoomPart::DoorFrame), 1);
    // Level 1 has two open edges over open floors: the back of the area
    // above the ground floor and the front of the wing above the annex.
    assert_eq!(count(&c, RoomPart::Railing), 20);
    assert_eq!(count(&c, RoomPart::Floor), 4);
    assert_eq!(count(&c, RoomPart::Ceiling), 3);
    assert_eq!(count(&c, RoomPart::None), 0);
    assert_eq!(count(&c, RoomPart::Stairs), 0);
}

#[test]
fn parallel_render_matches_lazy_render() {
    let config = config_with("{}");
    let (s, _) = demo();
    let lazy: Vec<RenderInfo> = s.render_all(&config.structure).collect();
    assert_eq!(s.render_all_par(&config.structure), lazy);
}

#[test]
fn instance_buffers_take_every_record() {
    let config = config_with(r#"{ "structure": { "floor_collider_thickness": 0.5 } }"#);
    let (s, _) = demo();
    let records = s.render_all_par(&config.structure);
    let buffers = InstanceBuffers::from_records(records.iter().copied(), &config.structure);

    assert_eq!(buffers.total(), records.len());
    assert_eq!(buffers.colliders().len(), buffers.count(RoomPart::Floor));
    assert!(
        buffers
            .colliders()
            .iter()
            .all(|c| c.half_extents[1] == 0.25)
    );
    let by_name = buffers.counts_by_name();
    assert_eq!(by_name["door_frame"], 1);
    assert_eq!(by_name.values().sum::<usize>(), records.len());
}

#[test]
fn config_changes_positions_not_counts() {
    let small = config_with("{}");
    let large = config_with(r#"{ "structure": { "wall_width": 4.0 } }"#);
    let (s, _) = demo();

    let a: Vec<RenderInfo> = s.render_all(&small.structure).collect();
    let b: Vec<RenderInfo> = s.render_all(&large.structure).collect();
    assert_eq!(a.len(), b.len());
    assert!(a.iter().zip(&b).all(|(x, y)| x.part == y.part));
    assert_ne!(a, b);
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[test]
fn removing_a_room_updates_render_output() {
    let config = config_with("{}");
    let (mut s, rooms) = demo();

    s.remove_room(rooms.annex).unwrap();
    let c = tally(s.render_all(&config.structure));
    // The main room's back door is walled again and the wing gains a floor.
    assert_eq!(count(&c, RoomPart::DoorFrame), 2);
    assert_eq!(count(&c, RoomPart::Floor), 4);
    assert_eq!(count(&c, RoomPart::Ceiling), 3);

    // The freed space and the freed room ID are both reused.
    let annex = placed(s.place_room(FromTo::new((3, -5), (7, -7)), 0, 1));
    assert_eq!(annex, rooms.annex);
    assert_eq!(s.rooms().len(), 2);
    assert_eq!(s.area_count(), 7);
}

#[test]
fn door_added_after_placement_is_rendered() {
    let config = config_with("{}");
    let mut s = Structure::new();
    let id = placed(s.place_room(FromTo::new((0, 0), (3, 3)), 0, 0));
    let (area, _) = s.room_areas(id).unwrap().next().unwrap();

    s.add_door(area, Door::new(0, Orientation::Right, 1)).unwrap();
    let c = tally(s.render_all(&config.structure));
    assert_eq!(count(&c, RoomPart::DoorFrame), 1);
    assert_eq!(count(&c, RoomPart::Wall), 15);
}

#[test]
fn rejected_edits_are_acknowledged() {
    let before = unhandled_issue_count();
    let (mut s, rooms) = demo();

    let overlap = s.place_room(FromTo::new((2, -1), (4, -2)), 0, 0).unwrap_err();
    assert_eq!(overlap.kind().rooms(), &[rooms.main]);

    // Touches both the main room and the annex on level 0.
    let ambiguous = s
        .expand_room(FromTo3D::new((3, 0, -3), (5, 0, -6)))
        .unwrap_err();
    assert!(matches!(
        ambiguous.handle(),
        IssueKind::AmbiguousExpansion { .. }
    ));

    let nowhere = s
        .expand_room(FromTo3D::new((40, 0, 40), (42, 0, 42)))
        .unwrap_err();
    assert_eq!(nowhere.to_string(), IssueKind::NoRoomSelected.to_string());

    assert_eq!(unhandled_issue_count(), before);
    assert_eq!(s.rooms().len(), 2);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn json_round_trip_preserves_render_output() {
    let config = config_with("{}");
    let (s, rooms) = demo();
    let json = s.to_json().unwrap();
    let restored = Structure::from_json(&json).unwrap();

    let a: Vec<RenderInfo> = s.render_all(&config.structure).collect();
    let b: Vec<RenderInfo> = restored.render_all(&config.structure).collect();
    assert_eq!(a, b);
    assert_eq!(
        restored.room_bounding_box(rooms.main).unwrap(),
        s.room_bounding_box(rooms.main).unwrap()
    );
}

#[test]
fn bincode_round_trip_preserves_structure() {
    let (s, rooms) = demo();
    let bytes = bincode::serialize(&s).unwrap();
    let restored: Structure = bincode::deserialize(&bytes).unwrap();
    assert_eq!(restored.to_json().unwrap(), s.to_json().unwrap());

    let open: Vec<OpenSides> = restored
        .room_areas(rooms.main)
        .unwrap()
        .map(|(_, a)| a.open_sides())
        .collect();
    assert_eq!(
        open[0],
        OpenSides::FRONT | OpenSides::RIGHT | OpenSides::TOP | OpenSides::BACK
    );
}

#[test]
fn relinking_a_loaded_structure_is_stable() {
    let (s, _) = demo();
    let mut restored = Structure::from_json(&s.to_json().unwrap()).unwrap();
    restored.link_neighbours();
    assert_eq!(restored.to_json().unwrap(), s.to_json().unwrap());
}

#[test]
fn corrupt_saves_are_rejected() {
    let (s, rooms) = demo();
    let out_of_range = edited_save(&s, |doc| doc["free_slots"] = serde_json::json!([99]));
    let live_slot = edited_save(&s, |doc| doc["free_slots"] = serde_json::json!([0]));
    let empty_room = edited_save(&s, |doc| doc["rooms"][1]["areas"] = serde_json::json!([]));
    for json in [out_of_range, live_slot, empty_room] {
        assert!(Structure::from_json(&json).is_err(), "{json}");
    }

    // An untouched save still loads and accepts edits around the annex.
    let mut restored = Structure::from_json(&edited_save(&s, |_| {})).unwrap();
    let clash = restored
        .place_room(FromTo::new((4, -6), (5, -6)), 0, 0)
        .unwrap_err();
    assert_eq!(clash.kind().rooms(), &[rooms.annex]);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
enum Edit {
    Place { x: i16, z: i16, w: i16, d: i16, level: i16 },
    Remove(usize),
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => (-6i16..6, -6i16..6, 0i16..4, 0i16..4, -1i16..2)
            .prop_map(|(x, z, w, d, level)| Edit::Place { x, z, w, d, level }),
        1 => any::<usize>().prop_map(Edit::Remove),
    ]
}

proptest! {
    /// Whatever mix of placements and removals is applied, live areas never
    /// share a cell and the incremental links equal a fresh sweep.
    #[test]
    fn edits_keep_areas_disjoint_and_links_swept(edits in prop::collection::vec(arb_edit(), 1..24)) {
        let mut s = Structure::new();
        for edit in edits {
            match edit {
                Edit::Place { x, z, w, d, level } => {
                    if let Err(issue) = s.place_room(FromTo::new((x, z), (x + w, z + d)), level, 0) {
                        issue.handle();
                    }
                }
                Edit::Remove(pick) if !s.rooms().is_empty() => {
                    let id = s.rooms()[pick % s.rooms().len()].id;
                    s.remove_room(id).unwrap();
                }
                Edit::Remove(_) => {}
            }
        }

        let boxes: Vec<_> = s.areas().map(|(_, a)| a.bounding_box()).collect();
        for (i, a) in boxes.iter().enumerate() {
            for b in &boxes[i + 1..] {
                prop_assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }

        let mut swept = Structure::from_json(&s.to_json().unwrap()).unwrap();
        swept.link_neighbours();
        prop_assert_eq!(swept.to_json().unwrap(), s.to_json().unwrap());
    }
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[test]
fn registry_resolves_items_in_registration_order() {
    let registry = test_registry(&RegistryConfig::default());
    assert_eq!(registry.item_count(), TEST_ITEMS.len());
    assert_eq!(registry.effect_count(), TEST_EFFECTS.len());

    for (expected, &(id, w, h)) in TEST_ITEMS.iter().enumerate() {
        let global = registry.item_global_id(id).unwrap();
        assert_eq!(global, expected as u64);
        let asset = registry.item(global).unwrap();
        assert_eq!((asset.size.x, asset.size.y), (w, h));
    }
    assert_eq!(registry.effect_global_id("irradiated"), Some(1));
    assert_eq!(registry.item_global_id("grenade"), None);
}

#[test]
fn items_rotate_their_footprint() {
    let registry = test_registry(&RegistryConfig::default());
    let rifle = registry.item_global_id("rifle_ak").unwrap();

    let mut item = Item::new(rifle);
    assert_eq!(item.current_size(&registry).unwrap().x, 4);
    item.orientation = Orientation::Up;
    let size = item.current_size(&registry).unwrap();
    assert_eq!((size.x, size.y), (2, 4));

    let ghost = Item::new(99);
    assert_eq!(
        ghost.current_size(&registry),
        Err(IdError::UnknownGlobalId(99))
    );
}

#[test]
fn sealed_registry_rejects_late_assets() {
    let mut registry = test_registry(&RegistryConfig {
        item_capacity: 2,
        effect_capacity: 1,
    });
    assert!(registry.is_past_init_phase());
    let late = registry.add_items([ItemAsset::new("grenade", 1, 1)]);
    assert_eq!(late, Err(IdError::Sealed));
    assert_eq!(registry.item_count(), TEST_ITEMS.len());
}

#[test]
fn registry_lookup_hash_ignores_non_ascii() {
    // Registry lookups hash with non-ASCII characters folded to `?`.
    assert_eq!(hash_ascii("medkit"), hash_str("medkit"));
    assert_eq!(hash_ascii("mëdkit"), hash_ascii("m?dkit"));
}
