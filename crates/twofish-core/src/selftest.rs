//! Known-answer self test against the published Twofish vectors.

use hex_literal::hex;

use crate::block::Block;
use crate::cipher::{decrypt_block, encrypt_block};
use crate::error::{Error, Result};
use crate::schedule::Schedule;

/// One published key / plaintext / ciphertext triple.
#[derive(Clone, Copy, Debug)]
pub struct KnownAnswer {
    /// Raw key bytes.
    pub key: &'static [u8],
    /// Plaintext block.
    pub plaintext: Block,
    /// Expected ciphertext block.
    pub ciphertext: Block,
}

/// Published vectors for 128-, 192- and 256-bit keys.
pub const KNOWN_ANSWERS: [KnownAnswer; 7] = [
    KnownAnswer {
        key: &[0u8; 16],
        plaintext: [0u8; 16],
        ciphertext: hex!("9F589F5CF6122C32B6BFEC2F2AE8C35A"),
    },
    KnownAnswer {
        key: &[0u8; 16],
        plaintext: hex!("9F589F5CF6122C32B6BFEC2F2AE8C35A"),
        ciphertext: hex!("D491DB16E7B1C39E86CB086B789F5419"),
    },
    KnownAnswer {
        key: &hex!("9F589F5CF6122C32B6BFEC2F2AE8C35A"),
        plaintext: hex!("D491DB16E7B1C39E86CB086B789F5419"),
        ciphertext: hex!("019F9809DE1711858FAAC3A3BA20FBC3"),
    },
    KnownAnswer {
        key: &hex!("0123456789ABCDEFFEDCBA98765432100011223344556677"),
        plaintext: [0u8; 16],
        ciphertext: hex!("CFD1D2E5A9BE9CDF501F13B892BD2248"),
    },
    KnownAnswer {
        key: &[0u8; 24],
        plaintext: [0u8; 16],
        ciphertext: hex!("EFA71F788965BD4453F860178FC19101"),
    },
    KnownAnswer {
        key: &hex!("0123456789ABCDEFFEDCBA987654321000112233445566778899AABBCCDDEEFF"),
        plaintext: [0u8; 16],
        ciphertext: hex!("37527BE0052334B89F0CFCCAE87CFA20"),
    },
    KnownAnswer {
        key: &[0u8; 32],
        plaintext: [0u8; 16],
        ciphertext: hex!("57FF739D4DC92C1BD7FC01700CC8216F"),
    },
];

/// Checks every entry of [`KNOWN_ANSWERS`] in both directions.
pub fn self_test() -> Result<()> {
    for (index, vector) in KNOWN_ANSWERS.iter().enumerate() {
        let schedule = Schedule::new(vector.key)?;
        if encrypt_block(&vector.plaintext, &schedule) != vector.ciphertext
            || decrypt_block(&vector.ciphertext, &schedule) != vector.plaintext
        {
            log::error!("twofish known-answer test {index} failed");
            return Err(Error::SelfTest { index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_known_answers_pass() {
        assert_eq!(self_test(), Ok(()));
    }

    #[test]
    fn covers_each_published_key_size() {
        let mut lens: Vec<usize> = KNOWN_ANSWERS.iter().map(|v| v.key.len()).collect();
        lens.dedup();
        assert_eq!(lens, vec![16, 24, 32]);
    }
}
