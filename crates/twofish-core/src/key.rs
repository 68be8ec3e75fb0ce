//! Key material accepted by the Twofish key schedule.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest accepted key, in bytes.
pub const MAX_KEY_LEN: usize = 32;

/// Supported key sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeySize {
    /// 64-bit key.
    Bits64,
    /// 128-bit key.
    Bits128,
    /// 192-bit key.
    Bits192,
    /// 256-bit key.
    Bits256,
}

impl KeySize {
    /// Maps a byte length onto a key size.
    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            8 => Ok(Self::Bits64),
            16 => Ok(Self::Bits128),
            24 => Ok(Self::Bits192),
            32 => Ok(Self::Bits256),
            _ => Err(Error::InvalidKey { len }),
        }
    }

    /// Key length in bytes.
    pub const fn len(self) -> usize {
        self.k64_count() * 8
    }

    /// Key length in bits.
    pub const fn bits(self) -> u32 {
        self.len() as u32 * 8
    }

    /// Number of 64-bit words in the key (1..=4).
    pub const fn k64_count(self) -> usize {
        match self {
            Self::Bits64 => 1,
            Self::Bits128 => 2,
            Self::Bits192 => 3,
            Self::Bits256 => 4,
        }
    }
}

/// Validated Twofish key.
///
/// Only the first [`Key::len`] bytes are meaningful; the rest stay zero so
/// that equality compares key material alone.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key {
    bytes: [u8; MAX_KEY_LEN],
    size: KeySize,
}

#[allow(clippy::len_without_is_empty)]
impl Key {
    /// Copies and validates raw key bytes.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let size = KeySize::from_len(bytes.len())?;
        let mut buf = [0u8; MAX_KEY_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self { bytes: buf, size })
    }

    /// Key size.
    pub fn size(&self) -> KeySize {
        self.size
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.size.len()
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// Splits the key into even and odd little-endian words.
    ///
    /// Slots past [`KeySize::k64_count`] stay zero.
    pub(crate) fn split_words(&self) -> ([u32; 4], [u32; 4]) {
        let mut even = [0u32; 4];
        let mut odd = [0u32; 4];
        for (i, chunk) in self.as_bytes().chunks_exact(8).enumerate() {
            even[i] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            odd[i] = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
        }
        (even, odd)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key").field("size", &self.size).finish_non_exhaustive()
    }
}

impl TryFrom<&[u8]> for Key {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self> {
        Self::new(value)
    }
}

macro_rules! key_from_array {
    ($($n:literal => $size:ident),*) => {
        $(
            impl From<[u8; $n]> for Key {
                fn from(value: [u8; $n]) -> Self {
                    let mut bytes = [0u8; MAX_KEY_LEN];
                    bytes[..$n].copy_from_slice(&value);
                    Self { bytes, size: KeySize::$size }
                }
            }
        )*
    };
}

key_from_array!(8 => Bits64, 16 => Bits128, 24 => Bits192, 32 => Bits256);
