//! Twofish single-block encryption and decryption.

use crate::block::{load_words, store_words, Block};
use crate::round::{rotate_left, rotate_right};
use crate::schedule::{Schedule, INPUT_WHITEN, OUTPUT_WHITEN, ROUNDS, ROUND_SUBKEYS, SUBKEY_COUNT};

/// One encryption round: mixes `(a, b)` into `(c, d)` with subkeys `k`, `k + 1`.
#[inline(always)]
fn encrypt_round(schedule: &Schedule, a: u32, b: u32, c: &mut u32, d: &mut u32, k: usize) {
    let t0 = schedule.g(a);
    let t1 = schedule.g(rotate_left(b, 8));
    *c ^= t0.wrapping_add(t1).wrapping_add(schedule.subkey(k));
    *c = rotate_right(*c, 1);
    *d = rotate_left(*d, 1);
    *d ^= t0
        .wrapping_add(t1.wrapping_mul(2))
        .wrapping_add(schedule.subkey(k + 1));
}

/// Inverse of [`encrypt_round`].
#[inline(always)]
fn decrypt_round(schedule: &Schedule, a: u32, b: u32, c: &mut u32, d: &mut u32, k: usize) {
    let t0 = schedule.g(a);
    let t1 = schedule.g(rotate_left(b, 8));
    *d ^= t0
        .wrapping_add(t1.wrapping_mul(2))
        .wrapping_add(schedule.subkey(k + 1));
    *d = rotate_right(*d, 1);
    *c = rotate_left(*c, 1);
    *c ^= t0.wrapping_add(t1).wrapping_add(schedule.subkey(k));
}

/// Encrypts a single 16-byte block with a derived schedule.
pub fn encrypt_block(block: &Block, schedule: &Schedule) -> Block {
    let [mut x0, mut x1, mut x2, mut x3] = load_words(block);

    x0 ^= schedule.subkey(INPUT_WHITEN);
    x1 ^= schedule.subkey(INPUT_WHITEN + 1);
    x2 ^= schedule.subkey(INPUT_WHITEN + 2);
    x3 ^= schedule.subkey(INPUT_WHITEN + 3);

    let mut k = ROUND_SUBKEYS;
    for _ in 0..ROUNDS / 2 {
        encrypt_round(schedule, x0, x1, &mut x2, &mut x3, k);
        encrypt_round(schedule, x2, x3, &mut x0, &mut x1, k + 2);
        k += 4;
    }

    // The final half-swap is undone by the output word order.
    store_words([
        x2 ^ schedule.subkey(OUTPUT_WHITEN),
        x3 ^ schedule.subkey(OUTPUT_WHITEN + 1),
        x0 ^ schedule.subkey(OUTPUT_WHITEN + 2),
        x1 ^ schedule.subkey(OUTPUT_WHITEN + 3),
    ])
}

/// Decrypts a single 16-byte block with a derived schedule.
pub fn decrypt_block(block: &Block, schedule: &Schedule) -> Block {
    let [mut x2, mut x3, mut x0, mut x1] = load_words(block);

    x2 ^= schedule.subkey(OUTPUT_WHITEN);
    x3 ^= schedule.subkey(OUTPUT_WHITEN + 1);
    x0 ^= schedule.subkey(OUTPUT_WHITEN + 2);
    x1 ^= schedule.subkey(OUTPUT_WHITEN + 3);

    let mut k = SUBKEY_COUNT;
    for _ in 0..ROUNDS / 2 {
        decrypt_round(schedule, x2, x3, &mut x0, &mut x1, k - 2);
        decrypt_round(schedule, x0, x1, &mut x2, &mut x3, k - 4);
        k -= 4;
    }

    store_words([
        x0 ^ schedule.subkey(INPUT_WHITEN),
        x1 ^ schedule.subkey(INPUT_WHITEN + 1),
        x2 ^ schedule.subkey(INPUT_WHITEN + 2),
        x3 ^ schedule.subkey(INPUT_WHITEN + 3),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use crate::schedule::expand_key;
    use hex_literal::hex;
    use rand::{Rng, RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    const KEY_256: [u8; 32] =
        hex!("0123456789ABCDEFFEDCBA987654321000112233445566778899AABBCCDDEEFF");

    #[test]
    fn encrypt_matches_published_256_vector() {
        let schedule = expand_key(&Key::from(KEY_256));
        let ct = encrypt_block(&[0u8; 16], &schedule);
        assert_eq!(ct, hex!("37527BE0052334B89F0CFCCAE87CFA20"));
    }

    #[test]
    fn decrypt_matches_published_256_vector() {
        let schedule = expand_key(&Key::from(KEY_256));
        let pt = decrypt_block(&hex!("37527BE0052334B89F0CFCCAE87CFA20"), &schedule);
        assert_eq!(pt, [0u8; 16]);
    }

    #[test]
    fn iterated_128_chain() {
        // Consecutive entries of the 128-bit variable-key table.
        let zero = expand_key(&Key::from([0u8; 16]));
        let c1 = encrypt_block(&[0u8; 16], &zero);
        let c2 = encrypt_block(&c1, &zero);
        assert_eq!(c2, hex!("D491DB16E7B1C39E86CB086B789F5419"));
        let next = expand_key(&Key::from(c1));
        assert_eq!(
            encrypt_block(&c2, &next),
            hex!("019F9809DE1711858FAAC3A3BA20FBC3")
        );
    }

    #[test]
    fn key_64_regression() {
        let schedule = expand_key(&Key::from(hex!("0123456789ABCDEF")));
        let ct = encrypt_block(&[0u8; 16], &schedule);
        assert_eq!(ct, hex!("984FE0732D590F555DF69ED1E8F52B5F"));
        assert_eq!(decrypt_block(&ct, &schedule), [0u8; 16]);
    }

    #[test]
    fn encrypt_decrypt_round_trip_random() {
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        for len in [8usize, 16, 24, 32] {
            for _ in 0..50 {
                let mut key_bytes = vec![0u8; len];
                let mut block = [0u8; 16];
                rng.fill_bytes(&mut key_bytes);
                rng.fill_bytes(&mut block);
                let schedule = expand_key(&Key::new(&key_bytes).expect("valid key"));
                let ct = encrypt_block(&block, &schedule);
                assert_ne!(ct, block);
                assert_eq!(decrypt_block(&ct, &schedule), block);
            }
        }
    }

    #[test]
    fn single_bit_flip_changes_about_half_the_output() {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        let mut key_bytes = [0u8; 16];
        rng.fill_bytes(&mut key_bytes);
        let schedule = expand_key(&Key::from(key_bytes));

        let samples = 1000;
        let mut flipped_bits = 0u32;
        for _ in 0..samples {
            let mut block = [0u8; 16];
            rng.fill_bytes(&mut block);
            let mut tweaked = block;
            let bit: usize = rng.gen_range(0..128);
            tweaked[bit / 8] ^= 1 << (bit % 8);

            let a = encrypt_block(&block, &schedule);
            let b = encrypt_block(&tweaked, &schedule);
            flipped_bits += a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x ^ y).count_ones())
                .sum::<u32>();
        }
        let mean = flipped_bits as f64 / samples as f64;
        assert!((60.0..68.0).contains(&mean), "mean flipped bits {mean}");
    }
}
