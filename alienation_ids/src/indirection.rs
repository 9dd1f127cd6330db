// Two-level identifier indirection.
//
// Assets are authored under string "master" IDs (`"rifle_ak"`). At load time
// each asset is assigned a dense `u64` global ID, its index in
// `MasterToGlobal::items`, so runtime references are a plain integer and an
// array index. Subsystems that only see a small subset of assets (an
// inventory, a status-effect bar) can further compress global IDs to `u16`
// local IDs with `GlobalToLocal`.
//
// Both layers are append-only and can be sealed once loading completes.
// Adding after `seal()` is an `IdError::Sealed`.
//
// See also: `dictionary64.rs` for the lookup tables, `alienation_sim::registry`
// for the object registry that owns the item and effect layers.

use std::ops::Index;

use crate::dictionary64::Dictionary64;
use crate::error::IdError;

/// An asset addressable by a unique string ID.
pub trait Master {
    fn master_id(&self) -> &str;
}

/// Maps master string IDs to dense global IDs and owns the assets.
#[derive(Clone, Debug)]
pub struct MasterToGlobal<T: Master> {
    items: Vec<T>,
    lookup: Dictionary64<String, u64, str>,
    sealed: bool,
}

impl<T: Master> MasterToGlobal<T> {
    pub fn new(hash_func: fn(&str) -> i64, capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            lookup: Dictionary64::with_capacity(hash_func, capacity),
            sealed: false,
        }
    }

    /// Register an asset and return its global ID. Fails on a duplicate
    /// master ID, leaving the layer unchanged.
    pub fn add(&mut self, item: T) -> Result<u64, IdError> {
        if self.sealed {
            return Err(IdError::Sealed);
        }
        let global_id = self.items.len() as u64;
        self.lookup.add(item.master_id().to_owned(), global_id)?;
        self.items.push(item);
        Ok(global_id)
    }

    /// Register assets in order, stopping at the first failure.
    pub fn add_range(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), IdError> {
        for item in items {
            self.add(item)?;
        }
        Ok(())
    }

    pub fn get_item(&self, global_id: u64) -> Option<&T> {
        self.items.get(global_id as usize)
    }

    pub fn get_global(&self, master_id: &str) -> Option<u64> {
        self.lookup.get(master_id).copied()
    }

    pub fn get_master(&self, global_id: u64) -> Option<&str> {
        self.get_item(global_id).map(Master::master_id)
    }

    /// Look up an asset by master ID.
    pub fn get_by_master(&self, master_id: &str) -> Option<&T> {
        self.get_global(master_id).and_then(|g| self.get_item(g))
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }
}

impl<T: Master> Index<u64> for MasterToGlobal<T> {
    type Output = T;

    fn index(&self, global_id: u64) -> &T {
        &self.items[global_id as usize]
    }
}

/// Compresses a subset of global IDs to `u16` local IDs.
#[derive(Clone, Debug)]
pub struct GlobalToLocal {
    globals: Vec<u64>,
    lookup: Dictionary64<u64, u16>,
    sealed: bool,
}

impl GlobalToLocal {
    /// Local IDs are `u16`, so at most this many globals fit.
    pub const MAX_LOCALS: usize = u16::MAX as usize + 1;

    pub fn new(hash_func: fn(&u64) -> i64) -> Self {
        Self {
            globals: Vec::new(),
            lookup: Dictionary64::new(hash_func),
            sealed: false,
        }
    }

    /// Assign the next local ID to `global_id`.
    pub fn add(&mut self, global_id: u64) -> Result<u16, IdError> {
        if self.sealed {
            return Err(IdError::Sealed);
        }
        if self.globals.len() >= Self::MAX_LOCALS {
            return Err(IdError::LocalIdExhausted);
        }
        let local = self.globals.len() as u16;
        self.lookup.add(global_id, local)?;
        self.globals.push(global_id);
        Ok(local)
    }

    pub fn add_range(&mut self, globals: impl IntoIterator<Item = u64>) -> Result<(), IdError> {
        for g in globals {
            self.add(g)?;
        }
        Ok(())
    }

    pub fn local(&self, global_id: u64) -> Result<u16, IdError> {
        self.lookup
            .get(&global_id)
            .copied()
            .ok_or(IdError::UnknownGlobalId(global_id))
    }

    pub fn global(&self, local_id: u16) -> Option<u64> {
        self.globals.get(local_id as usize).copied()
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.globals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.globals.is_empty()
    }
}
