//! Hash functions.
//!
//! Tables take their hash function as a `BuildHasher` type parameter and
//! call it through `hash_one`, so any `std` or third-party builder works.
//! The builders here cover the usual needs: `Fnv1aState` is the default,
//! `FixedState` and `ModuloState` force collisions for testing, and
//! `IdentityState` maps integer keys to themselves.

use core::hash::{BuildHasher, Hasher};

/// A general-purpose mixing hash (aHash, through hashbrown).
pub type MixState = hashbrown::hash_map::DefaultHashBuilder;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fowler-Noll-Vo (FNV-1a), 64-bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv1aState;

#[derive(Debug, Clone, Copy)]
pub struct Fnv1aHasher(u64);

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Fnv1aHasher(FNV_OFFSET)
    }
}

impl Hasher for Fnv1aHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 ^ u64::from(b)).wrapping_mul(FNV_PRIME);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

impl BuildHasher for Fnv1aState {
    type Hasher = Fnv1aHasher;
    fn build_hasher(&self) -> Self::Hasher {
        Fnv1aHasher::default()
    }
}

/// Jenkins one-at-a-time.
#[derive(Debug, Clone, Copy, Default)]
pub struct JenkinsState;

#[derive(Debug, Clone, Copy, Default)]
pub struct JenkinsHasher(u64);

impl Hasher for JenkinsHasher {
    fn write(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h = h.wrapping_add(u64::from(b));
            h = h.wrapping_add(h << 10);
            h ^= h >> 6;
        }
        self.0 = h;
    }

    fn finish(&self) -> u64 {
        let mut h = self.0;
        h = h.wrapping_add(h << 3);
        h ^= h >> 11;
        h.wrapping_add(h << 15)
    }
}

impl BuildHasher for JenkinsState {
    type Hasher = JenkinsHasher;
    fn build_hasher(&self) -> Self::Hasher {
        JenkinsHasher::default()
    }
}

/// Shift-add-xor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaxState;

#[derive(Debug, Clone, Copy, Default)]
pub struct SaxHasher(u64);

impl Hasher for SaxHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= (self.0 << 5)
                .wrapping_add(self.0 >> 2)
                .wrapping_add(u64::from(b));
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

impl BuildHasher for SaxState {
    type Hasher = SaxHasher;
    fn build_hasher(&self) -> Self::Hasher {
        SaxHasher::default()
    }
}

/// Hashes every key to zero. Every key lands in the first slot or bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedState;

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedHasher;

impl Hasher for FixedHasher {
    #[inline]
    fn write(&mut self, _bytes: &[u8]) {}

    #[inline]
    fn finish(&self) -> u64 {
        0
    }
}

impl BuildHasher for FixedState {
    type Hasher = FixedHasher;
    fn build_hasher(&self) -> Self::Hasher {
        FixedHasher
    }
}

/// Returns integer keys unchanged.
///
/// Every write folds into the state as `state * FOLD ^ word`. The state
/// starts at zero, so a key made of a single integer write hashes to its own
/// value (negative values wrap). Byte writes fold in little-endian words of
/// eight bytes, so strings and composite keys still hash by their content.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityState;

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher(u64);

/// Odd, so folding a word never discards the previous state.
const FOLD: u64 = 0x9e37_79b9_7f4a_7c15;

impl IdentityHasher {
    #[inline]
    fn fold(&mut self, word: u64) {
        self.0 = self.0.wrapping_mul(FOLD) ^ word;
    }
}

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.fold(u64::from_le_bytes(word));
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.fold(u64::from(i));
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.fold(u64::from(i));
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.fold(u64::from(i));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

impl BuildHasher for IdentityState {
    type Hasher = IdentityHasher;
    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}

/// Identity hash reduced modulo `M`, so at most `M` distinct hashes exist.
///
/// `M` must be positive; a zero modulus is rejected when the hasher is built:
///
/// ```compile_fail
/// use core::hash::BuildHasher;
/// use hashkit::hash::ModuloState;
///
/// let _ = ModuloState::<0>.hash_one(1u32);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuloState<const M: u64>;

impl<const M: u64> ModuloState<M> {
    const NONZERO: () = assert!(M > 0, "a modulo hasher needs a positive modulus");
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModuloHasher<const M: u64>(IdentityHasher);

impl<const M: u64> Hasher for ModuloHasher<M> {
    fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes);
    }

    fn write_u8(&mut self, i: u8) {
        self.0.write_u8(i);
    }

    fn write_u16(&mut self, i: u16) {
        self.0.write_u16(i);
    }

    fn write_u32(&mut self, i: u32) {
        self.0.write_u32(i);
    }

    fn write_u64(&mut self, i: u64) {
        self.0.write_u64(i);
    }

    fn write_usize(&mut self, i: usize) {
        self.0.write_usize(i);
    }

    fn finish(&self) -> u64 {
        self.0.finish() % M
    }
}

impl<const M: u64> BuildHasher for ModuloState<M> {
    type Hasher = ModuloHasher<M>;
    fn build_hasher(&self) -> Self::Hasher {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO;
        ModuloHasher::default()
    }
}
