//! Twofish key schedule: S-box key words, 40 subkeys and the expanded keyed S-box.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use serde_big_array::BigArray;

use crate::error::Result;
use crate::gf::rs_encode;
use crate::key::{Key, KeySize};
use crate::round::{byte, h, keyed_byte, rotate_left};
use crate::tables::MDS;

/// Number of Feistel rounds.
pub const ROUNDS: usize = 16;
/// Index of the first input-whitening subkey.
pub const INPUT_WHITEN: usize = 0;
/// Index of the first output-whitening subkey.
pub const OUTPUT_WHITEN: usize = 4;
/// Index of the first round subkey.
pub const ROUND_SUBKEYS: usize = 8;
/// Total number of subkey words.
pub const SUBKEY_COUNT: usize = ROUND_SUBKEYS + 2 * ROUNDS;
/// Number of words in the expanded keyed S-box.
pub const SBOX_WORDS: usize = 1024;

const SK_STEP: u32 = 0x0202_0202;
const SK_BUMP: u32 = 0x0101_0101;
const SK_ROTL: u32 = 9;

/// Fully derived key schedule.
///
/// Every field is a function of the key bytes alone. A `Schedule` only comes
/// out of [`expand_key`] (or a validated image), so a block transform never
/// sees a partially built one.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    key_size: KeySize,
    sbox_key: [u32; 4],
    #[cfg_attr(feature = "serde", serde(with = "BigArray"))]
    subkeys: [u32; SUBKEY_COUNT],
    #[cfg_attr(feature = "serde", serde(with = "BigArray"))]
    sbox: [u32; SBOX_WORDS],
}

impl Schedule {
    /// Validates `key` and derives its schedule.
    pub fn new(key: &[u8]) -> Result<Self> {
        let key = Key::new(key)?;
        Ok(expand_key(&key))
    }

    /// Size of the key this schedule was derived from.
    pub fn key_size(&self) -> KeySize {
        self.key_size
    }

    /// S-box key words, stored in reverse order of derivation.
    ///
    /// Entries at and past [`KeySize::k64_count`] are zero.
    pub fn sbox_key(&self) -> &[u32; 4] {
        &self.sbox_key
    }

    /// All 40 subkey words: whitening first, then two per round.
    pub fn subkeys(&self) -> &[u32; SUBKEY_COUNT] {
        &self.subkeys
    }

    /// The expanded keyed S-box.
    ///
    /// Lanes 0 and 1 interleave in the first 512 words (`2 * x` and
    /// `2 * x + 1`), lanes 2 and 3 likewise from offset `0x200`.
    pub fn expanded_sbox(&self) -> &[u32; SBOX_WORDS] {
        &self.sbox
    }

    /// Subkey word `index`. Panics if `index >= SUBKEY_COUNT`.
    #[inline]
    pub(crate) fn subkey(&self, index: usize) -> u32 {
        self.subkeys[index]
    }

    /// Keyed function `g(x)` through the expanded S-box.
    #[inline]
    pub fn g(&self, x: u32) -> u32 {
        self.sbox[2 * byte(x, 0) as usize]
            ^ self.sbox[2 * byte(x, 1) as usize + 1]
            ^ self.sbox[0x200 + 2 * byte(x, 2) as usize]
            ^ self.sbox[0x200 + 2 * byte(x, 3) as usize + 1]
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schedule")
            .field("key_size", &self.key_size)
            .finish_non_exhaustive()
    }
}

/// Index of lane `lane`'s entry for byte `x` in the expanded S-box.
#[inline]
const fn sbox_index(lane: usize, x: usize) -> usize {
    (lane >> 1) * 0x200 + 2 * x + (lane & 1)
}

/// Derives the full schedule for `key`.
pub fn expand_key(key: &Key) -> Schedule {
    let key_size = key.size();
    let k64_count = key_size.k64_count();
    let (even, odd) = key.split_words();

    let mut sbox_key = [0u32; 4];
    for i in 0..k64_count {
        sbox_key[k64_count - 1 - i] = rs_encode(even[i], odd[i]);
    }

    let mut subkeys = [0u32; SUBKEY_COUNT];
    let mut q = 0u32;
    for pair in subkeys.chunks_exact_mut(2) {
        let a = h(k64_count, q, &even);
        let b = rotate_left(h(k64_count, q.wrapping_add(SK_BUMP), &odd), 8);
        pair[0] = a.wrapping_add(b);
        pair[1] = rotate_left(a.wrapping_add(b.wrapping_mul(2)), SK_ROTL);
        q = q.wrapping_add(SK_STEP);
    }

    let mut sbox = [0u32; SBOX_WORDS];
    for x in 0..256usize {
        for (lane, column) in MDS.iter().enumerate() {
            let b = keyed_byte(k64_count, lane, x as u8, &sbox_key);
            sbox[sbox_index(lane, x)] = column[b as usize];
        }
    }

    log::debug!("derived twofish schedule for {}-bit key", key_size.bits());

    Schedule {
        key_size,
        sbox_key,
        subkeys,
        sbox,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    const KEY_192: [u8; 24] = hex!("0123456789ABCDEFFEDCBA98765432100011223344556677");

    #[test]
    fn zero_key_128_subkeys_match_published_values() {
        let schedule = expand_key(&Key::from([0u8; 16]));
        assert_eq!(
            &schedule.subkeys()[..8],
            &[
                0x52c5_4dde, 0x11f0_626d, 0x7cac_9d4a, 0x4d1b_4aaa, 0xb7b8_3a10, 0x1e7d_0beb,
                0xee9c_341f, 0xcfe1_4be4,
            ]
        );
        assert_eq!(schedule.sbox_key(), &[0, 0, 0, 0]);
    }

    #[test]
    fn sbox_key_is_stored_reversed() {
        let schedule = expand_key(&Key::from(KEY_192));
        assert_eq!(
            schedule.sbox_key(),
            &[0x4566_1061, 0xb255_bc4b, 0xb89f_f6f2, 0]
        );
        assert_eq!(schedule.subkey(0), 0x3839_4a24);
        assert_eq!(schedule.subkey(SUBKEY_COUNT - 1), 0x6a1a_d61e);
    }

    #[test]
    fn derivation_is_deterministic() {
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        for len in [8usize, 16, 24, 32] {
            let mut bytes = vec![0u8; len];
            rng.fill_bytes(&mut bytes);
            let first = Schedule::new(&bytes).expect("valid key");
            let second = Schedule::new(&bytes).expect("valid key");
            assert_eq!(first.sbox_key(), second.sbox_key());
            assert_eq!(first.subkeys(), second.subkeys());
            assert_eq!(first.expanded_sbox()[..], second.expanded_sbox()[..]);
        }
    }

    #[test]
    fn expanded_sbox_matches_h() {
        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
        for len in [8usize, 16, 24, 32] {
            let mut bytes = vec![0u8; len];
            rng.fill_bytes(&mut bytes);
            let schedule = Schedule::new(&bytes).expect("valid key");
            let k64_count = schedule.key_size().k64_count();
            for _ in 0..256 {
                let x = rng.next_u32();
                assert_eq!(schedule.g(x), h(k64_count, x, schedule.sbox_key()));
            }
        }
    }

    #[test]
    fn unused_sbox_key_words_are_zero() {
        for len in [8usize, 16, 24] {
            let schedule = Schedule::new(&vec![0xffu8; len]).expect("valid key");
            let used = schedule.key_size().k64_count();
            assert!(schedule.sbox_key()[used..].iter().all(|&w| w == 0));
            assert!(schedule.sbox_key()[..used].iter().all(|&w| w != 0));
        }
    }

    #[test]
    fn invalid_key_produces_no_schedule() {
        assert!(Schedule::new(&[0u8; 20]).is_err());
        assert!(Schedule::new(&[]).is_err());
    }
}
