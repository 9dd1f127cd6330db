// Contract-violation errors for the hash table and identifier layers.
//
// These are programming errors in the calling layer (inserting the same asset
// ID twice, resolving an ID that was never registered, adding after the init
// phase). Callers are expected to propagate them with `?` up to a point where
// they abort loading, not to recover and continue.
//
// See also: `dictionary64.rs`, `indirection.rs`.

use thiserror::Error;

/// Errors raised by `Dictionary64`, `MasterToGlobal` and `GlobalToLocal`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdError {
    /// `add` was called with a key that is already present.
    #[error("key with hash code {hash_code:#018x} is already present in the dictionary")]
    DuplicateKey { hash_code: i64 },

    /// The caller's hash function returned a negative code for a key.
    #[error("hash function returned negative code {hash_code}")]
    NegativeHashCode { hash_code: i64 },

    /// A required lookup found no entry.
    #[error("key with hash code {hash_code:#018x} was not present in the dictionary")]
    KeyNotFound { hash_code: i64 },

    /// The table cannot grow past the largest supported array length.
    #[error("dictionary cannot grow beyond {max} entries")]
    CapacityOverflow { max: usize },

    /// An append was attempted after the table was sealed.
    #[error("cannot add entries after the init phase")]
    Sealed,

    /// Every 16-bit local ID is already assigned.
    #[error("all {} local IDs are in use", u16::MAX as usize + 1)]
    LocalIdExhausted,

    /// A global ID that was never registered.
    #[error("unknown global ID {0}")]
    UnknownGlobalId(u64),
}
