// Deterministic, portable 64-bit hashing for identifiers.
//
// Implements xxHash64 (Yann Collet) with seed 0. This is a hand-rolled
// implementation with zero external dependencies, chosen so that identifier
// hashes are identical on every platform and across releases: hash codes
// feed `Dictionary64` bucket placement in `alienation_ids`, and asset
// registries built on two machines must agree bit-for-bit.
//
// Every public entry point masks the digest to its 63 low bits, so hash codes
// are always non-negative `i64`s. `Dictionary64` relies on that: a negative
// hash code marks a free slot in its entry array, and the table itself does
// not mask.
//
// Identifier types opt in through the `Hash64` trait, which exposes the byte
// view that gets hashed. Strings hash their UTF-8 bytes; fixed-width integers
// hash their little-endian bytes.
//
// See also: `alienation_ids::dictionary64` for the table that consumes these
// codes, `alienation_ids::indirection` for the master/global ID layers.
//
// **Critical constraint: determinism.** Do not route anything here through
// `std::hash::Hasher` implementations with random state, and do not make the
// digest depend on pointer width or endianness.

use std::borrow::Cow;

/// A hash function over identifier values, as stored by `Dictionary64`.
///
/// Any deterministic function works; the ones in this crate all return
/// non-negative codes.
pub type HashFunc<T> = fn(&T) -> i64;

/// Mask keeping the 63 low bits of a digest.
pub const HASH_MASK: u64 = 0x7FFF_FFFF_FFFF_FFFF;

// ---------------------------------------------------------------------------
// Hash64 trait
// ---------------------------------------------------------------------------

/// A value with a canonical byte representation for 64-bit hashing.
pub trait Hash64 {
    /// The bytes fed to xxHash64.
    fn hash64_bytes(&self) -> Cow<'_, [u8]>;
}

impl Hash64 for str {
    fn hash64_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Hash64 for String {
    fn hash64_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Hash64 for [u8] {
    fn hash64_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

macro_rules! hash64_int {
    ($($t:ty),*) => {
        $(
            impl Hash64 for $t {
                fn hash64_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_le_bytes().to_vec())
                }
            }
        )*
    };
}

hash64_int!(u8, i8, u16, i16, u32, i32, u64, i64);

impl<T: Hash64 + ?Sized> Hash64 for &T {
    fn hash64_bytes(&self) -> Cow<'_, [u8]> {
        (**self).hash64_bytes()
    }
}

// ---------------------------------------------------------------------------
// Public hashing entry points
// ---------------------------------------------------------------------------

/// Hash any `Hash64` value to a non-negative 63-bit code.
pub fn hash<T: Hash64 + ?Sized>(value: &T) -> i64 {
    mask(xxh64(&value.hash64_bytes()))
}

/// Hash the UTF-8 bytes of a string.
pub fn hash_str(value: &str) -> i64 {
    mask(xxh64(value.as_bytes()))
}

/// Hash a string as ASCII. Characters outside the ASCII range are replaced
/// by `?` before hashing, so `"é"` and `"?"` collide on purpose.
pub fn hash_ascii(value: &str) -> i64 {
    let bytes: Vec<u8> = value
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect();
    mask(xxh64(&bytes))
}

/// `HashFunc<String>` over UTF-8 bytes.
#[allow(clippy::ptr_arg)]
pub fn hash_string(value: &String) -> i64 {
    hash_str(value)
}

/// `HashFunc<String>` over ASCII bytes.
#[allow(clippy::ptr_arg)]
pub fn hash_string_ascii(value: &String) -> i64 {
    hash_ascii(value)
}

/// `HashFunc<u64>` over little-endian bytes.
pub fn hash_u64(value: &u64) -> i64 {
    mask(xxh64(&value.to_le_bytes()))
}

/// `HashFunc<i64>` over little-endian bytes.
pub fn hash_i64(value: &i64) -> i64 {
    mask(xxh64(&value.to_le_bytes()))
}

/// `HashFunc<u32>` over little-endian bytes.
pub fn hash_u32(value: &u32) -> i64 {
    mask(xxh64(&value.to_le_bytes()))
}

/// `HashFunc<u16>` over little-endian bytes.
pub fn hash_u16(value: &u16) -> i64 {
    mask(xxh64(&value.to_le_bytes()))
}

fn mask(digest: u64) -> i64 {
    (digest & HASH_MASK) as i64
}

// ---------------------------------------------------------------------------
// xxHash64
// ---------------------------------------------------------------------------

const PRIME64_1: u64 = 0x9E37_79B1_85EB_CA87;
const PRIME64_2: u64 = 0xC2B2_AE3D_27D4_EB4F;
const PRIME64_3: u64 = 0x1656_67B1_9E37_79F9;
const PRIME64_4: u64 = 0x85EB_CA77_C2B2_AE63;
const PRIME64_5: u64 = 0x27D4_EB2F_1656_67C5;

/// Raw xxHash64 digest of `input` with seed 0 (unmasked).
pub fn xxh64(input: &[u8]) -> u64 {
    let seed: u64 = 0;
    let len = input.len();
    let mut rest = input;

    let mut h = if len >= 32 {
        let mut v1 = seed.wrapping_add(PRIME64_1).wrapping_add(PRIME64_2);
        let mut v2 = seed.wrapping_add(PRIME64_2);
        let mut v3 = seed;
        let mut v4 = seed.wrapping_sub(PRIME64_1);

        while rest.len() >= 32 {
            v1 = round(v1, read_u64(&rest[0..8]));
            v2 = round(v2, read_u64(&rest[8..16]));
            v3 = round(v3, read_u64(&rest[16..24]));
            v4 = round(v4, read_u64(&rest[24..32]));
            rest = &rest[32..];
        }

        let mut acc = v1
            .rotate_left(1)
            .wrapping_add(v2.rotate_left(7))
            .wrapping_add(v3.rotate_left(12))
            .wrapping_add(v4.rotate_left(18));
        acc = merge_round(acc, v1);
        acc = merge_round(acc, v2);
        acc = merge_round(acc, v3);
        merge_round(acc, v4)
    } else {
        seed.wrapping_add(PRIME64_5)
    };

    h = h.wrapping_add(len as u64);

    while rest.len() >= 8 {
        h ^= round(0, read_u64(&rest[0..8]));
        h = h
            .rotate_left(27)
            .wrapping_mul(PRIME64_1)
            .wrapping_add(PRIME64_4);
        rest = &rest[8..];
    }

    if rest.len() >= 4 {
        h ^= (read_u32(&rest[0..4]) as u64).wrapping_mul(PRIME64_1);
        h = h
            .rotate_left(23)
            .wrapping_mul(PRIME64_2)
            .wrapping_add(PRIME64_3);
        rest = &rest[4..];
    }

    for &byte in rest {
        h ^= (byte as u64).wrapping_mul(PRIME64_5);
        h = h.rotate_left(11).wrapping_mul(PRIME64_1);
    }

    avalanche(h)
}

fn round(acc: u64, input: u64) -> u64 {
    acc.wrapping_add(input.wrapping_mul(PRIME64_2))
        .rotate_left(31)
        .wrapping_mul(PRIME64_1)
}

fn merge_round(acc: u64, val: u64) -> u64 {
    (acc ^ round(0, val))
        .wrapping_mul(PRIME64_1)
        .wrapping_add(PRIME64_4)
}

fn avalanche(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(PRIME64_2);
    h ^= h >> 29;
    h = h.wrapping_mul(PRIME64_3);
    h ^= h >> 32;
    h
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Reference digests from the canonical xxHash64 implementation, seed 0.
    #[test]
    fn known_vectors() {
        assert_eq!(xxh64(b""), 0xEF46_DB37_51D8_E999);
        assert_eq!(xxh64(b"a"), 0xD24E_C4F1_A98C_6E5B);
        assert_eq!(xxh64(b"abc"), 0x44BC_2CF5_AD77_0999);
        assert_eq!(
            xxh64(b"Nobody inspects the spammish repetition"),
            0xFBCE_A83C_8A37_8BF1
        );
    }

    #[test]
    fn long_input_uses_stripe_path() {
        let bytes: Vec<u8> = (0u8..64).collect();
        assert_eq!(xxh64(&bytes), 0xF7C6_7301_DB67_13F0);
    }

    #[test]
    fn public_hashes_are_masked() {
        // The empty digest has its top bit set; the public API clears it.
        assert_eq!(hash_str(""), 0x6F46_DB37_51D8_E999);
        assert!(hash_str("a") >= 0);
    }

    #[test]
    fn integers_hash_little_endian_bytes() {
        assert_eq!(hash_u64(&42), 0x3556_806F_B6D1_4353);
        assert_eq!(hash(&42u64), hash_u64(&42));
        assert_eq!(hash_i64(&-1), hash(&u64::MAX));
        assert_eq!(hash_u32(&7), hash(&7u32));
        assert_eq!(hash_u16(&7), hash(&7u16));
    }

    #[test]
    fn ascii_hash_replaces_non_ascii() {
        assert_eq!(hash_ascii("caf\u{e9}"), hash_str("caf?"));
        assert_eq!(hash_ascii("rifle_ak"), hash_str("rifle_ak"));
        assert_ne!(hash_str("caf\u{e9}"), hash_ascii("caf\u{e9}"));
    }

    #[test]
    fn string_and_str_agree() {
        let owned = String::from("medkit");
        assert_eq!(hash_string(&owned), hash_str("medkit"));
        assert_eq!(hash(&owned), hash(&"medkit"));
        assert_eq!(hash_string_ascii(&owned), hash_ascii("medkit"));
    }

    proptest! {
        #[test]
        fn hash_is_non_negative(bytes in proptest::collection::vec(any::<u8>(), 0..200)) {
            prop_assert!(hash(bytes.as_slice()) >= 0);
        }

        #[test]
        fn hash_is_deterministic(s in ".{0,80}") {
            prop_assert_eq!(hash_str(&s), hash_str(&s));
            prop_assert_eq!(hash_str(&s), hash(s.as_str()));
        }
    }
}
