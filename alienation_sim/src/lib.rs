// alienation_sim — interior structures and asset registry for Alienation.
//
// This crate holds the engine-free logic: the room topology of a building
// interior, the render-info generator that turns it into mesh placements,
// and the asset registry that maps string asset IDs to dense handles. It has
// no engine dependency; the game wraps it and feeds the render records into
// its own instance buffers and physics.
//
// Module overview:
// - `bounds.rs`:    GridCoord, Aabbi, FromTo, FromTo3D (integer box arithmetic).
// - `types.rs`:     Orientation, Door, Side, OpenSides, RoomPart, RoomId, AreaId.
// - `room.rs`:      Room and RoomArea (neighbour slots, open sides).
// - `structure.rs`: Structure: area arena, placement, expansion, removal, neighbour inference.
// - `issue.rs`:     Issue / IssueKind, recoverable editing errors that must be acknowledged.
// - `error.rs`:     StructureError, invariant violations.
// - `render.rs`:    AreaRender, the lazy wall/floor/ceiling/railing generator.
// - `transform.rs`: Basis and Transform3D for render records.
// - `instances.rs`: InstanceBuffers and FloorCollider.
// - `assets.rs`:    ItemAsset, StatusEffectAsset, Item, StatusEffect.
// - `registry.rs`:  ObjectRegistry (item and effect ID tables).
// - `config.rs`:    StructureConfig, RegistryConfig, CoreConfig.
// - `demo.rs`:      The two-room demo interior.
//
// Identifier tables (`Dictionary64`, `MasterToGlobal`) live in
// `alienation_ids`; hashing lives in `alienation_hash`.
//
// **Determinism.** Rendering is a pure function of the topology and config:
// the same structure always yields the same records in the same order,
// including through `render_all_par`.

pub mod assets;
pub mod bounds;
pub mod config;
pub mod demo;
pub mod error;
pub mod instances;
pub mod issue;
pub mod registry;
pub mod render;
pub mod room;
pub mod structure;
pub mod transform;
pub mod types;

pub use error::StructureError;
pub use issue::{Issue, IssueKind};
pub use structure::Structure;
