// Per-part instance buffers and floor colliders.
//
// The renderer keeps one instance buffer per mesh (wall, connector, floor,
// ...). `InstanceBuffers` is the engine-free version of that: render records
// are sorted into one transform list per `RoomPart`, in arrival order, and
// every floor quad also yields a static box collider sized from the quad's
// horizontal scale and `StructureConfig::floor_collider_thickness`.
//
// See also: `render.rs` (producer), `bin/structure_dump.rs` (prints the
// counts).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::StructureConfig;
use crate::render::RenderInfo;
use crate::transform::{Transform3D, Vec3};
use crate::types::RoomPart;

/// Axis-aligned static box under a floor quad.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FloorCollider {
    pub center: Vec3,
    pub half_extents: Vec3,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct InstanceBuffers {
    buffers: BTreeMap<RoomPart, Vec<Transform3D>>,
    colliders: Vec<FloorCollider>,
}

impl InstanceBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build buffers from a full render sequence.
    pub fn from_records(
        records: impl IntoIterator<Item = RenderInfo>,
        config: &StructureConfig,
    ) -> Self {
        let mut buffers = Self::new();
        buffers.extend(records, config);
        buffers
    }

    pub fn push(&mut self, record: RenderInfo, config: &StructureConfig) {
        if record.part == RoomPart::None {
            return;
        }
        if record.part == RoomPart::Floor {
            let scale = record.transform.basis.scale();
            self.colliders.push(FloorCollider {
                center: record.transform.origin,
                half_extents: [
                    scale[0] * 0.5,
                    config.floor_collider_thickness * 0.5,
                    scale[2] * 0.5,
                ],
            });
        }
        self.buffers
            .entry(record.part)
            .or_default()
            .push(record.transform);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = RenderInfo>, config: &StructureConfig) {
        for record in records {
            self.push(record, config);
        }
    }

    pub fn transforms(&self, part: RoomPart) -> &[Transform3D] {
        self.buffers.get(&part).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, part: RoomPart) -> usize {
        self.transforms(part).len()
    }

    pub fn total(&self) -> usize {
        self.buffers.values().map(Vec::len).sum()
    }

    pub fn colliders(&self) -> &[FloorCollider] {
        &self.colliders
    }

    /// Instance count per part name, for every renderable part.
    pub fn counts_by_name(&self) -> BTreeMap<&'static str, usize> {
        RoomPart::RENDERED
            .iter()
            .map(|&part| (part.name(), self.count(part)))
            .collect()
    }

    /// Drop all instances, keeping allocations.
    pub fn clear(&mut self) {
        self.buffers.values_mut().for_each(Vec::clear);
        self.colliders.clear();
    }
}
