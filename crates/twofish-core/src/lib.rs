//! Twofish block cipher core.
//!
//! This crate follows the published Twofish design and provides:
//! - Key validation for 64-, 128-, 192- and 256-bit keys.
//! - The key schedule: Reed-Solomon S-box key words, 40 PHT-combined subkeys
//!   and a fully expanded 1024-word keyed S-box.
//! - Single-block encryption and decryption over a derived [`Schedule`].
//! - A known-answer self test against the published vectors.
//!
//! Lookups go through key-dependent tables; the implementation is not hardened
//! against cache-timing side channels.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
pub mod gf;
mod key;
pub mod round;
mod schedule;
mod selftest;
pub mod tables;

pub use crate::block::{Block, BLOCK_SIZE};
pub use crate::cipher::{decrypt_block, encrypt_block};
pub use crate::error::{Error, Result};
pub use crate::key::{Key, KeySize, MAX_KEY_LEN};
pub use crate::schedule::{expand_key, Schedule, ROUNDS, SBOX_WORDS, SUBKEY_COUNT};
pub use crate::selftest::{self_test, KnownAnswer, KNOWN_ANSWERS};
