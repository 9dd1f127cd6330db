// Chained hash table keyed by 64-bit hash codes.
//
// `Dictionary64` exists for string-heavy lookups (asset IDs): with a 64-bit
// hash space the chance of two live keys sharing a code stays negligible even
// at tens of thousands of entries, which keeps chains short.
//
// ## Layout
//
// - `buckets[b]` holds the index of the first entry in bucket `b`'s chain, or
//   `NIL`.
// - `entries` is a dense array. Each entry stores its hash code, the index of
//   the next entry in its chain (or in the free list), and the key/value pair.
//   A negative hash code marks a free slot whose pair has been dropped.
// - Removed slots form a free list threaded through `next`; inserts reuse the
//   most recently freed slot before appending.
// - When the dense array is full, the table grows to the next prime at or
//   above twice the current entry count (see `expand_prime`) and every live
//   entry is relinked into the new bucket array. Stored hash codes are reused
//   unless `rehash_on_grow` is set.
//
// A chain match requires equal hash codes first and equal keys second, so a
// deliberate collision (two keys with the same code) still resolves to the
// right entry; the test `colliding_hashes_still_compare_keys` pins this.
//
// The hash function is supplied by the caller and must return non-negative
// codes (every function in `alienation_hash` does). The table does not mask
// codes itself: `add` and `insert` reject a negative code with
// `IdError::NegativeHashCode`, and lookups of such a key find nothing.
//
// The third type parameter `Q` is the borrowed form the hash function takes,
// so a `Dictionary64<String, V, str>` hashes and looks up by `&str` without
// allocating. It defaults to the key type.
//
// See also: `alienation_hash` for the hash functions, `indirection.rs` for the
// ID layers built on this table.

use std::borrow::Borrow;
use std::ops::Index;

use crate::error::IdError;

/// Terminator for chains and the free list.
const NIL: i64 = -1;

/// Largest entry array the table will grow to.
pub const MAX_PRIME_ARRAY_LENGTH: usize = 0x7FEF_FFFD;

/// Ascending primes used as table sizes. Sizes past the end of this table
/// are found by trial division.
const PRIMES: [usize; 72] = [
    3, 7, 11, 17, 23, 29, 37, 47, 59, 71, 89, 107, 131, 163, 197, 239, 293, 353, 431, 521, 631,
    761, 919, 1103, 1327, 1597, 1931, 2333, 2801, 3371, 4049, 4861, 5839, 7013, 8419, 10103, 12143,
    14591, 17519, 21023, 25229, 30293, 36353, 43627, 52361, 62851, 75431, 90523, 108631, 130363,
    156437, 187751, 225307, 270371, 324449, 389357, 467237, 560689, 672827, 807403, 968897,
    1162687, 1395263, 1674319, 2009191, 2411033, 2893249, 3471899, 4166287, 4999559, 5999471,
    7199369,
];

#[derive(Clone, Debug)]
struct Entry<K, V> {
    /// Non-negative for live entries, `NIL` for free slots.
    hash_code: i64,
    /// Next entry in the bucket chain, or next free slot.
    next: i64,
    pair: Option<(K, V)>,
}

/// A hash map over caller-supplied 64-bit hash codes.
#[derive(Debug)]
pub struct Dictionary64<K, V, Q: ?Sized = K> {
    buckets: Vec<i64>,
    entries: Vec<Entry<K, V>>,
    free_list: i64,
    free_count: usize,
    version: u64,
    hash_func: fn(&Q) -> i64,
    rehash_on_grow: bool,
}

// Manual impl: a derive would require `Q: Clone`, which `str` is not.
impl<K: Clone, V: Clone, Q: ?Sized> Clone for Dictionary64<K, V, Q> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            entries: self.entries.clone(),
            free_list: self.free_list,
            free_count: self.free_count,
            version: self.version,
            hash_func: self.hash_func,
            rehash_on_grow: self.rehash_on_grow,
        }
    }
}

impl<K, V, Q> Dictionary64<K, V, Q>
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    /// Create an empty table. No storage is allocated until the first insert.
    ///
    /// `hash_func` must be deterministic and non-negative; keys it maps to a
    /// negative code cannot be stored.
    pub fn new(hash_func: fn(&Q) -> i64) -> Self {
        Self {
            buckets: Vec::new(),
            entries: Vec::new(),
            free_list: NIL,
            free_count: 0,
            version: 0,
            hash_func,
            rehash_on_grow: false,
        }
    }

    /// Create a table with room for at least `capacity` entries.
    pub fn with_capacity(hash_func: fn(&Q) -> i64, capacity: usize) -> Self {
        let mut dict = Self::new(hash_func);
        if capacity > 0 {
            dict.initialize(capacity);
        }
        dict
    }

    /// Recompute every live entry's hash code when the table grows, instead
    /// of reusing the stored codes.
    pub fn with_rehash_on_grow(mut self, rehash: bool) -> Self {
        self.rehash_on_grow = rehash;
        self
    }

    fn initialize(&mut self, capacity: usize) {
        let size = get_prime(capacity);
        self.buckets = vec![NIL; size];
        self.entries = Vec::with_capacity(size);
        self.free_list = NIL;
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len() - self.free_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current size of the bucket array (always a prime once allocated).
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Incremented on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn bucket_of(hash_code: i64, bucket_count: usize) -> usize {
        hash_code.rem_euclid(bucket_count as i64) as usize
    }

    fn find_entry(&self, key: &Q) -> Option<usize> {
        if self.buckets.is_empty() {
            return None;
        }
        let hash_code = (self.hash_func)(key);
        let mut i = self.buckets[Self::bucket_of(hash_code, self.buckets.len())];
        while i >= 0 {
            let entry = &self.entries[i as usize];
            if entry.hash_code == hash_code
                && entry.pair.as_ref().is_some_and(|(k, _)| key_eq(k, key))
            {
                return Some(i as usize);
            }
            i = entry.next;
        }
        None
    }

    pub fn contains_key(&self, key: &Q) -> bool {
        self.find_entry(key).is_some()
    }

    /// Linear scan over live values.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    pub fn get(&self, key: &Q) -> Option<&V> {
        self.find_entry(key)
            .and_then(|i| self.entries[i].pair.as_ref())
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &Q) -> Option<&mut V> {
        let i = self.find_entry(key)?;
        self.entries[i].pair.as_mut().map(|(_, v)| v)
    }

    /// Like `get`, but a missing key is a `KeyNotFound` error.
    pub fn try_get(&self, key: &Q) -> Result<&V, IdError> {
        self.get(key).ok_or_else(|| IdError::KeyNotFound {
            hash_code: (self.hash_func)(key),
        })
    }

    /// Add a new entry. Fails with `DuplicateKey` if the key is present.
    pub fn add(&mut self, key: K, value: V) -> Result<(), IdError> {
        self.insert_entry(key, value, true)
    }

    /// Insert or overwrite.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), IdError> {
        self.insert_entry(key, value, false)
    }

    fn insert_entry(&mut self, key: K, value: V, add: bool) -> Result<(), IdError> {
        let hash_code = (self.hash_func)(key.borrow());
        if hash_code < 0 {
            return Err(IdError::NegativeHashCode { hash_code });
        }
        if self.buckets.is_empty() {
            self.initialize(0);
        }
        let mut target = Self::bucket_of(hash_code, self.buckets.len());

        let mut i = self.buckets[target];
        while i >= 0 {
            let entry = &mut self.entries[i as usize];
            if entry.hash_code == hash_code {
                if let Some((k, v)) = entry.pair.as_mut() {
                    if key_eq::<K, Q>(k, key.borrow()) {
                        if add {
                            return Err(IdError::DuplicateKey { hash_code });
                        }
                        *v = value;
                        self.version += 1;
                        return Ok(());
                    }
                }
            }
            i = entry.next;
        }

        let index = if self.free_count > 0 {
            let index = self.free_list as usize;
            self.free_list = self.entries[index].next;
            self.free_count -= 1;
            index
        } else {
            if self.entries.len() == self.buckets.len() {
                self.resize()?;
                target = Self::bucket_of(hash_code, self.buckets.len());
            }
            self.entries.push(Entry {
                hash_code: NIL,
                next: NIL,
                pair: None,
            });
            self.entries.len() - 1
        };

        let entry = &mut self.entries[index];
        entry.hash_code = hash_code;
        entry.next = self.buckets[target];
        entry.pair = Some((key, value));
        self.buckets[target] = index as i64;
        self.version += 1;
        Ok(())
    }

    fn resize(&mut self) -> Result<(), IdError> {
        let count = self.entries.len();
        let new_size = expand_prime(count);
        if new_size <= count {
            return Err(IdError::CapacityOverflow {
                max: MAX_PRIME_ARRAY_LENGTH,
            });
        }
        tracing::debug!(from = count, to = new_size, "dictionary64 growing");
        self.resize_to(new_size, self.rehash_on_grow);
        Ok(())
    }

    fn resize_to(&mut self, new_size: usize, force_new_hash_codes: bool) {
        let mut buckets = vec![NIL; new_size];
        self.entries.reserve(new_size.saturating_sub(self.entries.len()));

        if force_new_hash_codes {
            let hash_func = self.hash_func;
            for entry in self.entries.iter_mut() {
                if let Some((k, _)) = entry.pair.as_ref() {
                    entry.hash_code = hash_func(k.borrow());
                }
            }
        }

        for (i, entry) in self.entries.iter_mut().enumerate() {
            if entry.pair.is_some() {
                let bucket = Self::bucket_of(entry.hash_code, new_size);
                entry.next = buckets[bucket];
                buckets[bucket] = i as i64;
            }
        }

        self.buckets = buckets;
    }

    /// Remove a key. Returns whether an entry was removed.
    pub fn remove(&mut self, key: &Q) -> bool {
        self.take(key).is_some()
    }

    /// Remove a key and return its value.
    pub fn take(&mut self, key: &Q) -> Option<V> {
        if self.buckets.is_empty() {
            return None;
        }
        let hash_code = (self.hash_func)(key);
        let bucket = Self::bucket_of(hash_code, self.buckets.len());
        let mut last = NIL;
        let mut i = self.buckets[bucket];
        while i >= 0 {
            let idx = i as usize;
            let matches = self.entries[idx].hash_code == hash_code
                && self.entries[idx]
                    .pair
                    .as_ref()
                    .is_some_and(|(k, _)| key_eq(k, key));
            if matches {
                let next = self.entries[idx].next;
                if last < 0 {
                    self.buckets[bucket] = next;
                } else {
                    self.entries[last as usize].next = next;
                }
                let entry = &mut self.entries[idx];
                entry.hash_code = NIL;
                entry.next = self.free_list;
                let pair = entry.pair.take();
                self.free_list = i;
                self.free_count += 1;
                self.version += 1;
                return pair.map(|(_, v)| v);
            }
            last = i;
            i = self.entries[idx].next;
        }
        None
    }

    /// Drop every entry, keeping the bucket array size.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.buckets.iter_mut().for_each(|b| *b = NIL);
        self.entries.clear();
        self.free_list = NIL;
        self.free_count = 0;
        self.version += 1;
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries
            .iter()
            .filter_map(|e| e.pair.as_ref().map(|(k, v)| (k, v)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

fn key_eq<K: Borrow<Q>, Q: Eq + ?Sized>(stored: &K, key: &Q) -> bool {
    let stored: &Q = stored.borrow();
    stored == key
}

/// Read access to a missing key is a hard failure, as with std maps.
impl<K, V, Q> Index<&Q> for Dictionary64<K, V, Q>
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key was not present in the dictionary"),
        }
    }
}

// ---------------------------------------------------------------------------
// Prime sizing
// ---------------------------------------------------------------------------

/// Trial-division primality test.
pub fn is_prime(candidate: usize) -> bool {
    if candidate & 1 != 0 {
        let mut divisor = 3;
        while divisor * divisor <= candidate {
            if candidate % divisor == 0 {
                return false;
            }
            divisor += 2;
        }
        return candidate != 1;
    }
    candidate == 2
}

/// Smallest table prime at or above `min`.
pub fn get_prime(min: usize) -> usize {
    if let Some(&p) = PRIMES.iter().find(|&&p| p >= min) {
        return p;
    }
    let mut i = min | 1;
    while i < i32::MAX as usize {
        if is_prime(i) {
            return i;
        }
        i += 2;
    }
    min
}

/// Size to grow to from `old_size` entries: the prime at or above twice the
/// old size, capped at `MAX_PRIME_ARRAY_LENGTH`.
pub fn expand_prime(old_size: usize) -> usize {
    let new_size = old_size.saturating_mul(2);
    if new_size > MAX_PRIME_ARRAY_LENGTH {
        return MAX_PRIME_ARRAY_LENGTH;
    }
    get_prime(new_size)
}
