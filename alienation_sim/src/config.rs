// Data-driven structure and registry configuration.
//
// Every dimension the render-info generator uses comes from
// `StructureConfig`; the generator itself has no size constants. Registry
// capacities live in `RegistryConfig`. Both are grouped in `CoreConfig`,
// loaded from JSON at startup. Missing fields fall back to the defaults, so
// a config file only needs to list what it overrides.
//
// See also: `render.rs` (consumes `StructureConfig`), `registry.rs`
// (consumes `RegistryConfig`), `bin/structure_dump.rs` (loads a config from
// `--config <path>`).

use serde::{Deserialize, Serialize};

/// Wall and floor dimensions, in world units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Height of a full wall panel.
    pub wall_height: f32,
    /// Width of a full wall panel (one grid cell, minus the connector).
    pub wall_width: f32,
    /// Width of the short connector between panels, and the slab thickness
    /// between a ceiling and the floor above.
    pub wall_short_size: f32,
    /// Vertical thickness of the static box placed under each floor quad.
    pub floor_collider_thickness: f32,
}

impl StructureConfig {
    /// Horizontal size of one grid cell.
    pub fn cell_width(&self) -> f32 {
        self.wall_width + self.wall_short_size
    }

    /// Vertical size of one level.
    pub fn level_height(&self) -> f32 {
        self.wall_height + self.wall_short_size
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            wall_height: 2.5,
            wall_width: 2.0,
            wall_short_size: 0.5,
            floor_collider_thickness: 0.1,
        }
    }
}

/// Initial capacities for the asset registry tables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub item_capacity: usize,
    pub effect_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            item_capacity: 64,
            effect_capacity: 16,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub structure: StructureConfig,
    pub registry: RegistryConfig,
}

impl CoreConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
