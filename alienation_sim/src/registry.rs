// Asset registry: string asset IDs to dense global IDs.
//
// `ObjectRegistry` owns one `MasterToGlobal` table per asset kind. It is an
// ordinary value, built at startup from a `RegistryConfig` and passed by
// reference to whatever needs to resolve assets; there is no process-wide
// instance.
//
// Lifecycle: assets are added during the init phase, then `end_init()` seals
// both tables. Adding afterwards is `IdError::Sealed`. Master IDs are hashed
// as ASCII (`hash_ascii`): IDs differing only in non-ASCII characters share a
// hash code and a bucket chain, and are told apart by key comparison.

use alienation_hash::hash_ascii;
use alienation_ids::{IdError, MasterToGlobal};

use crate::assets::{ItemAsset, StatusEffectAsset};
use crate::config::RegistryConfig;

#[derive(Clone, Debug)]
pub struct ObjectRegistry {
    items: MasterToGlobal<ItemAsset>,
    effects: MasterToGlobal<StatusEffectAsset>,
    past_init_phase: bool,
}

impl ObjectRegistry {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            items: MasterToGlobal::new(hash_ascii, config.item_capacity),
            effects: MasterToGlobal::new(hash_ascii, config.effect_capacity),
            past_init_phase: false,
        }
    }

    pub fn add_items(&mut self, items: impl IntoIterator<Item = ItemAsset>) -> Result<(), IdError> {
        if self.past_init_phase {
            return Err(IdError::Sealed);
        }
        self.items.add_range(items)
    }

    pub fn add_effects(
        &mut self,
        effects: impl IntoIterator<Item = StatusEffectAsset>,
    ) -> Result<(), IdError> {
        if self.past_init_phase {
            return Err(IdError::Sealed);
        }
        self.effects.add_range(effects)
    }

    pub fn item(&self, global_id: u64) -> Result<&ItemAsset, IdError> {
        self.items
            .get_item(global_id)
            .ok_or(IdError::UnknownGlobalId(global_id))
    }

    pub fn effect(&self, global_id: u64) -> Result<&StatusEffectAsset, IdError> {
        self.effects
            .get_item(global_id)
            .ok_or(IdError::UnknownGlobalId(global_id))
    }

    pub fn item_global_id(&self, master_id: &str) -> Option<u64> {
        self.items.get_global(master_id)
    }

    pub fn effect_global_id(&self, master_id: &str) -> Option<u64> {
        self.effects.get_global(master_id)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    /// Close the init phase. Idempotent.
    pub fn end_init(&mut self) {
        if !self.past_init_phase {
            tracing::debug!(
                items = self.items.len(),
                effects = self.effects.len(),
                "asset registry sealed"
            );
        }
        self.past_init_phase = true;
        self.items.seal();
        self.effects.seal();
    }

    pub fn is_past_init_phase(&self) -> bool {
        self.past_init_phase
    }
}
