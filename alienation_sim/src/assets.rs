// Item and status-effect assets, and the runtime references to them.
//
// Assets are authored data keyed by a string master ID. Runtime objects
// (`Item`, `StatusEffect`) only carry the dense global ID assigned by the
// `ObjectRegistry` and resolve their asset through it on demand.
//
// See also: `registry.rs`, `alienation_ids::indirection`.

use alienation_ids::{IdError, Master};
use serde::{Deserialize, Serialize};

use crate::bounds::CellCoord;
use crate::registry::ObjectRegistry;
use crate::types::Orientation;

/// An inventory item definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAsset {
    pub id: String,
    /// Footprint in inventory cells, in the `Right` orientation.
    pub size: CellCoord,
}

impl ItemAsset {
    pub fn new(id: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            id: id.into(),
            size: CellCoord::new(width, height),
        }
    }

    /// Number of inventory cells covered.
    pub fn area(&self) -> i32 {
        self.size.x * self.size.y
    }
}

impl Master for ItemAsset {
    fn master_id(&self) -> &str {
        &self.id
    }
}

/// A status-effect definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffectAsset {
    pub id: String,
}

impl StatusEffectAsset {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Master for StatusEffectAsset {
    fn master_id(&self) -> &str {
        &self.id
    }
}

/// An item instance placed in a container grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub global_id: u64,
    pub orientation: Orientation,
    pub x: u8,
    pub y: u8,
}

impl Item {
    pub fn new(global_id: u64) -> Self {
        Self {
            global_id,
            orientation: Orientation::Right,
            x: 0,
            y: 0,
        }
    }

    pub fn asset<'r>(&self, registry: &'r ObjectRegistry) -> Result<&'r ItemAsset, IdError> {
        registry.item(self.global_id)
    }

    /// Footprint in the current orientation: `Up` and `Down` swap the axes.
    pub fn current_size(&self, registry: &ObjectRegistry) -> Result<CellCoord, IdError> {
        let size = self.asset(registry)?.size;
        Ok(if self.orientation.is_vertical() {
            CellCoord::new(size.y, size.x)
        } else {
            size
        })
    }

    pub fn position(&self) -> CellCoord {
        CellCoord::new(self.x as i32, self.y as i32)
    }
}

/// An active status effect on a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub global_id: u64,
    /// Remaining duration in ticks.
    pub duration: i32,
    pub amplitude: u8,
}

impl StatusEffect {
    pub fn asset<'r>(&self, registry: &'r ObjectRegistry) -> Result<&'r StatusEffectAsset, IdError> {
        registry.effect(self.global_id)
    }
}
