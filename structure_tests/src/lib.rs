// Fixtures for the structure integration tests.
//
// Builders for the scenarios in `tests/end_to_end.rs`: the demo interior, a
// populated asset registry, helpers that tally render output by part, and
// a hook for hand-editing saved structures.
// Everything here goes through the public APIs of `alienation_sim`,
// `alienation_ids` and `alienation_hash`; nothing is mocked.
//
// See also: `tests/end_to_end.rs`.

use std::collections::BTreeMap;

use alienation_sim::assets::{ItemAsset, StatusEffectAsset};
use alienation_sim::config::{CoreConfig, RegistryConfig};
use alienation_sim::demo::{DemoRooms, demo_structure};
use alienation_sim::registry::ObjectRegistry;
use alienation_sim::render::RenderInfo;
use alienation_sim::types::RoomPart;
use alienation_sim::{Issue, Structure};

/// Item master IDs registered by `test_registry`, in registration order.
pub const TEST_ITEMS: [(&str, i32, i32); 4] = [
    ("rifle_ak", 4, 2),
    ("pistol_makarov", 2, 1),
    ("medkit", 2, 2),
    ("ration_pack", 1, 1),
];

/// Effect master IDs registered by `test_registry`.
pub const TEST_EFFECTS: [&str; 2] = ["bleeding", "irradiated"];

/// The demo interior. Panics if the layout is rejected.
pub fn demo() -> (Structure, DemoRooms) {
    match demo_structure() {
        Ok(demo) => demo,
        Err(issue) => panic!("demo interior rejected: {}", issue.handle()),
    }
}

/// Unwrap a placement result, acknowledging and reporting any issue.
pub fn placed<T>(result: Result<T, Issue>) -> T {
    match result {
        Ok(v) => v,
        Err(issue) => panic!("unexpected issue: {}", issue.handle()),
    }
}

/// A registry with `TEST_ITEMS` and `TEST_EFFECTS`, init phase closed.
pub fn test_registry(config: &RegistryConfig) -> ObjectRegistry {
    let mut registry = ObjectRegistry::new(config);
    registry
        .add_items(TEST_ITEMS.iter().map(|&(id, w, h)| ItemAsset::new(id, w, h)))
        .expect("test items are unique");
    registry
        .add_effects(TEST_EFFECTS.iter().map(|&id| StatusEffectAsset::new(id)))
        .expect("test effects are unique");
    registry.end_init();
    registry
}

/// Default config with the given JSON overrides applied.
pub fn config_with(json: &str) -> CoreConfig {
    CoreConfig::from_json(json).expect("fixture config must parse")
}

/// Count render records per part.
pub fn tally(records: impl IntoIterator<Item = RenderInfo>) -> BTreeMap<RoomPart, usize> {
    let mut counts = BTreeMap::new();
    for r in records {
        *counts.entry(r.part).or_insert(0) += 1;
    }
    counts
}

/// Count of one part in a tally, zero when absent.
pub fn count(tally: &BTreeMap<RoomPart, usize>, part: RoomPart) -> usize {
    tally.get(&part).copied().unwrap_or(0)
}

/// Save `s` as JSON, apply `edit` to the document, and re-serialize it.
pub fn edited_save(s: &Structure, edit: impl FnOnce(&mut serde_json::Value)) -> String {
    let mut doc: serde_json::Value =
        serde_json::from_str(&s.to_json().expect("structure serializes")).expect("saved JSON parses");
    edit(&mut doc);
    doc.to_string()
}
