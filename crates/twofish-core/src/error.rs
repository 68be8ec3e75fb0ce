//! Error type shared by the Twofish crates.

use thiserror::Error;

/// Failures reported by key setup and the buffer entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// Key material is empty, longer than 32 bytes, or not a multiple of 8 bytes.
    #[error("invalid key length: {len} bytes (expected 8, 16, 24 or 32)")]
    InvalidKey {
        /// Length of the rejected key in bytes.
        len: usize,
    },
    /// The padded scratch buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes of scratch space")]
    AllocationFailure {
        /// Requested allocation size in bytes.
        bytes: usize,
    },
    /// A known-answer vector did not reproduce.
    #[error("known-answer test {index} failed")]
    SelfTest {
        /// Index into [`crate::KNOWN_ANSWERS`].
        index: usize,
    },
}

/// Result alias used across the Twofish crates.
pub type Result<T> = core::result::Result<T, Error>;
