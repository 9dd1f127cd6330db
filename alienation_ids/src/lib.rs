// Identifier plumbing for the Alienation structure and asset layers.
//
// - `dictionary64`: chained hash table over caller-supplied 64-bit hash
//   codes, with prime-sized growth and slot reuse via a free list.
// - `indirection`: `MasterToGlobal` (string master IDs to dense `u64` global
//   IDs, owning the assets) and `GlobalToLocal` (global IDs to `u16` local
//   IDs).
// - `id_provider`: recycling numeric ID allocator used for room IDs.
// - `error`: `IdError`, shared by all of the above.
//
// Hash functions live in `alienation_hash`; they are re-exported here for
// convenience since every table constructor takes one.

pub mod dictionary64;
pub mod error;
pub mod id_provider;
pub mod indirection;

pub use alienation_hash::{hash_ascii, hash_str, hash_u16, hash_u32, hash_u64};
pub use dictionary64::Dictionary64;
pub use error::IdError;
pub use id_provider::IdProvider;
pub use indirection::{GlobalToLocal, Master, MasterToGlobal};
