//! Fast walk PRNG and its seeding.
//!
//! [`Xoshiro256`] is the per-step generator: four 64-bit words, an output
//! that adds two of them, then xor-propagation, a shift and a rotation.
//! Its state is never taken straight from entropy bits. Seeds go through
//! SplitMix64 expansion, and the entropy path first draws from a
//! [`StdRng`] seeding generator mixed with the wall clock.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Error as RandError, RngCore, SeedableRng};

/// SplitMix64 step, used to expand one word of seed into a full state.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// xoshiro256+ style generator.
///
/// Deterministic given its state; not safe to share between threads
/// without external synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xoshiro256 {
    s: [u64; 4],
}

impl Xoshiro256 {
    /// Creates a generator from raw state words.
    ///
    /// The all-zero state is a fixed point, so it is replaced by the
    /// expansion of seed `0`.
    #[must_use]
    pub fn from_state(s: [u64; 4]) -> Self {
        if s == [0; 4] {
            return Self::seed_from_u64(0);
        }
        Self { s }
    }

    /// Returns the current state words.
    #[must_use]
    pub fn state(&self) -> [u64; 4] {
        self.s
    }

    /// Seeds from OS entropy through a [`StdRng`] seeding generator.
    ///
    /// Each state word is a SplitMix64 expansion of the clock mixed with a
    /// seeding-generator draw, xored with a further draw.
    #[must_use]
    pub fn from_entropy_mixed() -> Self {
        let mut seeder = StdRng::from_entropy();
        // Reason: only the low 64 bits of the nanosecond clock matter for mixing.
        #[allow(clippy::cast_possible_truncation)]
        let clock = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);

        let mut expander = clock ^ seeder.next_u64();
        let mut s = [0u64; 4];
        for word in &mut s {
            *word = splitmix64(&mut expander) ^ seeder.next_u64();
        }
        Self::from_state(s)
    }

    #[inline]
    fn step(&mut self) -> u64 {
        let s = &mut self.s;
        let result = s[0].wrapping_add(s[3]);
        let t = s[1] << 17;

        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];

        s[2] ^= t;
        s[3] = s[3].rotate_left(45);

        result
    }
}

impl RngCore for Xoshiro256 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        // Reason: upper bits of the `+` output are the strongest.
        #[allow(clippy::cast_possible_truncation)]
        let high = (self.step() >> 32) as u32;
        high
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Xoshiro256 {
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut s = [0u64; 4];
        for (word, bytes) in s.iter_mut().zip(seed.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(bytes);
            *word = u64::from_le_bytes(buf);
        }
        Self::from_state(s)
    }

    fn seed_from_u64(seed: u64) -> Self {
        let mut expander = seed;
        let mut s = [0u64; 4];
        for word in &mut s {
            *word = splitmix64(&mut expander);
        }
        // SplitMix64 is a bijection over distinct counters, so four
        // consecutive outputs are never all zero.
        Self { s }
    }
}
