//! Block representation helpers.

/// Twofish block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Twofish block of 16 bytes.
pub type Block = [u8; BLOCK_SIZE];

/// Loads the block as four little-endian words.
#[inline]
pub fn load_words(block: &Block) -> [u32; 4] {
    let mut words = [0u32; 4];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

/// Stores four words into a block, little-endian.
#[inline]
pub fn store_words(words: [u32; 4]) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    for (chunk, word) in block.chunks_exact_mut(4).zip(words.iter()) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_little_endian() {
        let block: Block = [
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
            0x0f, 0x10,
        ];
        let words = load_words(&block);
        assert_eq!(words, [0x04030201, 0x08070605, 0x0c0b0a09, 0x100f0e0d]);
        assert_eq!(store_words(words), block);
    }
}
