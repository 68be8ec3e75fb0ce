//! Block-by-block buffer encryption (ECB) with a fixed tail filler.
//!
//! Encryption fills a short final block with [`PAD_BYTE`]. The filler is not a
//! padding scheme: its length is not recorded and decryption does not strip
//! it, so callers must track the true plaintext length themselves. Identical
//! plaintext blocks encrypt to identical ciphertext blocks.

use twofish_core::{decrypt_block, encrypt_block, Block, Error, Result, Schedule, BLOCK_SIZE};

/// Byte used to fill the tail of a short final block.
pub const PAD_BYTE: u8 = 0xff;

/// Rounds `len` up to a whole number of blocks.
pub const fn aligned_len(len: usize) -> usize {
    len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE
}

/// Copies `input` into a fresh buffer of `aligned` bytes filled with [`PAD_BYTE`].
fn padded(input: &[u8], aligned: usize) -> Result<Vec<u8>> {
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(aligned)
        .map_err(|_| Error::AllocationFailure { bytes: aligned })?;
    scratch.extend_from_slice(input);
    scratch.resize(aligned, PAD_BYTE);
    Ok(scratch)
}

/// Applies `transform` to each whole block of `input` that fits in `out`.
fn apply_blocks<F>(input: &[u8], out: &mut [u8], transform: F) -> usize
where
    F: Fn(&Block) -> Block,
{
    let mut written = 0;
    for (src, dst) in input
        .chunks_exact(BLOCK_SIZE)
        .zip(out.chunks_exact_mut(BLOCK_SIZE))
    {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(src);
        dst.copy_from_slice(&transform(&block));
        written += BLOCK_SIZE;
    }
    written
}

/// Encrypts `input` into `out`, returning the number of bytes written.
///
/// The input is processed as `aligned_len(input.len())` bytes, the tail of
/// the last block filled with [`PAD_BYTE`]. Only whole blocks that fit in
/// `out` are written.
pub fn encrypt(schedule: &Schedule, input: &[u8], out: &mut [u8]) -> Result<usize> {
    let aligned = aligned_len(input.len());
    let written = if aligned == input.len() {
        apply_blocks(input, out, |block| encrypt_block(block, schedule))
    } else {
        log::debug!(
            "filling {} tail bytes with {PAD_BYTE:#04x}",
            aligned - input.len()
        );
        let scratch = padded(input, aligned)?;
        apply_blocks(&scratch, out, |block| encrypt_block(block, schedule))
    };
    log::trace!("encrypted {} blocks", written / BLOCK_SIZE);
    Ok(written)
}

/// Decrypts `input` into `out`, returning the number of bytes written.
///
/// A trailing partial block is ignored. Only whole blocks that fit in `out`
/// are written.
pub fn decrypt(schedule: &Schedule, input: &[u8], out: &mut [u8]) -> usize {
    let written = apply_blocks(input, out, |block| decrypt_block(block, schedule));
    log::trace!("decrypted {} blocks", written / BLOCK_SIZE);
    written
}

/// Encrypts `input` into a newly allocated, block-aligned buffer.
pub fn encrypt_to_vec(schedule: &Schedule, input: &[u8]) -> Result<Vec<u8>> {
    let mut out = vec![0u8; aligned_len(input.len())];
    let written = encrypt(schedule, input, &mut out)?;
    out.truncate(written);
    Ok(out)
}

/// Decrypts the whole blocks of `input` into a newly allocated buffer.
pub fn decrypt_to_vec(schedule: &Schedule, input: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; input.len() / BLOCK_SIZE * BLOCK_SIZE];
    let written = decrypt(schedule, input, &mut out);
    out.truncate(written);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use proptest::prelude::*;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn schedule() -> Schedule {
        Schedule::new(&[0x2bu8; 16]).expect("valid key")
    }

    #[test]
    fn aligned_len_rounds_up() {
        assert_eq!(aligned_len(0), 0);
        assert_eq!(aligned_len(1), 16);
        assert_eq!(aligned_len(16), 16);
        assert_eq!(aligned_len(17), 32);
    }

    #[test]
    fn short_input_is_filled_with_pad_byte() {
        let schedule = schedule();
        let input = *b"0123456789";
        let ct = encrypt_to_vec(&schedule, &input).expect("encrypt");
        assert_eq!(ct.len(), 16);

        let mut expected_block = [PAD_BYTE; 16];
        expected_block[..10].copy_from_slice(&input);
        assert_eq!(ct, encrypt_block(&expected_block, &schedule));

        let pt = decrypt_to_vec(&schedule, &ct);
        assert_eq!(pt.len(), 16);
        assert_eq!(&pt[..10], &input);
        assert_eq!(&pt[10..], &[PAD_BYTE; 6]);
    }

    #[test]
    fn zero_key_buffer_matches_known_block() {
        let schedule = Schedule::new(&[0u8; 16]).expect("valid key");
        let ct = encrypt_to_vec(&schedule, &[0u8; 32]).expect("encrypt");
        let block = hex!("9F589F5CF6122C32B6BFEC2F2AE8C35A");
        assert_eq!(ct[..16], block);
        assert_eq!(ct[16..], block);
        assert_eq!(decrypt_to_vec(&schedule, &ct), [0u8; 32]);
    }

    #[test]
    fn scratch_overflow_reports_allocation_failure() {
        assert_eq!(
            padded(&[1u8; 3], usize::MAX),
            Err(Error::AllocationFailure { bytes: usize::MAX })
        );
    }

    #[test]
    fn identical_blocks_encrypt_identically() {
        let schedule = schedule();
        let input = [0x5au8; 48];
        let ct = encrypt_to_vec(&schedule, &input).expect("encrypt");
        assert_eq!(ct[..16], ct[16..32]);
        assert_eq!(ct[16..32], ct[32..]);
    }

    #[test]
    fn encrypt_stops_at_output_capacity() {
        let schedule = schedule();
        let input = [0u8; 40];
        let mut out = [0u8; 40];
        let written = encrypt(&schedule, &input, &mut out).expect("encrypt");
        assert_eq!(written, 32);
        assert_eq!(&out[32..], &[0u8; 8]);

        let mut small = [0u8; 15];
        assert_eq!(encrypt(&schedule, &input, &mut small), Ok(0));
    }

    #[test]
    fn decrypt_drops_trailing_partial_block() {
        let schedule = schedule();
        let mut rng = ChaCha20Rng::from_seed([8u8; 32]);
        let mut input = [0u8; 37];
        rng.fill_bytes(&mut input);
        let mut out = [0u8; 48];
        assert_eq!(decrypt(&schedule, &input, &mut out), 32);
        assert_eq!(decrypt_to_vec(&schedule, &input).len(), 32);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let schedule = schedule();
        let mut out = [0u8; 16];
        assert_eq!(encrypt(&schedule, &[], &mut out), Ok(0));
        assert_eq!(decrypt(&schedule, &[], &mut out), 0);
    }

    proptest! {
        #[test]
        fn round_trip_preserves_prefix(data in proptest::collection::vec(any::<u8>(), 0..200)) {
            let schedule = schedule();
            let ct = encrypt_to_vec(&schedule, &data).expect("encrypt");
            prop_assert_eq!(ct.len(), aligned_len(data.len()));
            let pt = decrypt_to_vec(&schedule, &ct);
            prop_assert_eq!(&pt[..data.len()], &data[..]);
            prop_assert!(pt[data.len()..].iter().all(|&b| b == PAD_BYTE));
        }
    }
}
