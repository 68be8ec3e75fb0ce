//! Image representation and serialization helpers.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use twofish_core::{expand_key, Key, KeySize, Schedule, BLOCK_SIZE, ROUNDS};

/// Current image format version.
pub const IMAGE_VERSION: u32 = 1;

/// Reasons an image is rejected on load.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The bytes are not a valid `bincode` encoding.
    #[error("malformed schedule image: {0}")]
    Decode(#[from] bincode::Error),
    /// The image was written by an unknown format version.
    #[error("unsupported image version {0}")]
    UnsupportedVersion(u32),
    /// Header fields disagree with this cipher or with the stored schedule.
    #[error("image parameters do not match: {0}")]
    ParamsMismatch(&'static str),
}

/// Static parameters describing the image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageParams {
    /// Number of rounds (always 16).
    pub rounds: usize,
    /// Block size in bytes (always 16).
    pub block_bytes: usize,
    /// Key size the schedule was derived from, in bits.
    pub key_bits: u32,
    /// Version tag for future format changes.
    pub version: u32,
}

impl ImageParams {
    /// Parameters for a schedule derived from a key of `size`.
    pub fn for_key_size(size: KeySize) -> Self {
        Self {
            rounds: ROUNDS,
            block_bytes: BLOCK_SIZE,
            key_bits: size.bits(),
            version: IMAGE_VERSION,
        }
    }
}

/// A derived schedule together with its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleImage {
    /// The expanded schedule.
    pub schedule: Schedule,
    /// Static parameters.
    pub params: ImageParams,
}

impl ScheduleImage {
    /// Derives the schedule for `key` and wraps it in an image.
    pub fn from_key(key: &Key) -> Self {
        let schedule = expand_key(key);
        log::debug!("built schedule image for {}-bit key", key.size().bits());
        Self {
            params: ImageParams::for_key_size(key.size()),
            schedule,
        }
    }

    /// Serializes the image with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserializes and validates an image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let image: Self = bincode::deserialize(bytes)?;
        image.validate()?;
        Ok(image)
    }

    /// Consumes the image, returning the schedule.
    pub fn into_schedule(self) -> Schedule {
        self.schedule
    }

    fn validate(&self) -> Result<(), ImageError> {
        let params = &self.params;
        if params.version != IMAGE_VERSION {
            return Err(ImageError::UnsupportedVersion(params.version));
        }
        if params.rounds != ROUNDS {
            return Err(ImageError::ParamsMismatch("round count"));
        }
        if params.block_bytes != BLOCK_SIZE {
            return Err(ImageError::ParamsMismatch("block size"));
        }
        let size = self.schedule.key_size();
        if params.key_bits != size.bits() {
            return Err(ImageError::ParamsMismatch("key size"));
        }
        if self.schedule.sbox_key()[size.k64_count()..]
            .iter()
            .any(|&word| word != 0)
        {
            return Err(ImageError::ParamsMismatch("S-box key words beyond key size"));
        }
        Ok(())
    }
}
