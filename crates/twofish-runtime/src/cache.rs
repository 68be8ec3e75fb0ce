//! Single-entry schedule cache and the process-wide convenience entry point.
//!
//! The cache keeps the schedule for the most recently used key and re-derives
//! it whenever a different key is requested. Lookups and replacement happen
//! under a mutex and callers receive a shared handle, so threads using
//! different keys never see each other's schedule; they only evict each
//! other's entry. Callers that alternate keys heavily should hold their own
//! [`Schedule`] instead.

use std::sync::{Arc, Mutex, PoisonError};

use twofish_core::{expand_key, Key, Result, Schedule};

use crate::buffer;

/// Direction of a buffer operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Encrypt, filling a short tail block with [`buffer::PAD_BYTE`].
    Encrypt,
    /// Decrypt, dropping a trailing partial block.
    Decrypt,
}

struct Entry {
    key: Key,
    schedule: Arc<Schedule>,
}

/// Remembers the schedule for the last key it was asked for.
#[derive(Default)]
pub struct ScheduleCache {
    entry: Mutex<Option<Entry>>,
}

impl ScheduleCache {
    /// Creates an empty cache.
    pub const fn new() -> Self {
        Self {
            entry: Mutex::new(None),
        }
    }

    /// Returns the schedule for `key`, deriving it on a miss.
    ///
    /// An invalid key fails before the cached entry is touched.
    pub fn schedule(&self, key: &[u8]) -> Result<Arc<Schedule>> {
        // The entry is only ever replaced whole, so a poisoned lock still guards valid data.
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = entry.as_ref() {
            if current.key.as_bytes() == key {
                return Ok(Arc::clone(&current.schedule));
            }
        }

        let key = Key::new(key)?;
        log::debug!(
            "schedule cache miss, deriving for {}-bit key",
            key.size().bits()
        );
        let schedule = Arc::new(expand_key(&key));
        *entry = Some(Entry {
            key,
            schedule: Arc::clone(&schedule),
        });
        Ok(schedule)
    }

    /// Runs a buffer operation with the cached schedule for `key`.
    pub fn apply(
        &self,
        direction: Direction,
        key: &[u8],
        input: &[u8],
        out: &mut [u8],
    ) -> Result<usize> {
        let schedule = self.schedule(key)?;
        match direction {
            Direction::Encrypt => buffer::encrypt(&schedule, input, out),
            Direction::Decrypt => Ok(buffer::decrypt(&schedule, input, out)),
        }
    }

    /// Reports whether the cached entry was derived from `key`.
    pub fn holds(&self, key: &[u8]) -> bool {
        let entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        entry
            .as_ref()
            .is_some_and(|current| current.key.as_bytes() == key)
    }

    /// Drops the cached schedule.
    pub fn clear(&self) {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        *entry = None;
    }
}

static GLOBAL: ScheduleCache = ScheduleCache::new();

/// Encrypts or decrypts `data` into `out` with a process-wide cached schedule.
///
/// Returns the number of bytes written; see [`buffer::encrypt`] and
/// [`buffer::decrypt`] for alignment and capacity rules.
pub fn twofish(data: &[u8], out: &mut [u8], key: &[u8], direction: Direction) -> Result<usize> {
    GLOBAL.apply(direction, key, data, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use twofish_core::Error;

    #[test]
    fn same_key_reuses_schedule() {
        let cache = ScheduleCache::new();
        let first = cache.schedule(&[1u8; 16]).expect("valid key");
        let second = cache.schedule(&[1u8; 16]).expect("valid key");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn different_key_rederives() {
        let cache = ScheduleCache::new();
        let first = cache.schedule(&[1u8; 16]).expect("valid key");
        let second = cache.schedule(&[2u8; 16]).expect("valid key");
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(cache.holds(&[2u8; 16]));
        assert!(!cache.holds(&[1u8; 16]));

        // Same prefix, different length.
        let third = cache.schedule(&[2u8; 24]).expect("valid key");
        assert!(!Arc::ptr_eq(&second, &third));
    }

    #[test]
    fn invalid_key_keeps_previous_entry() {
        let cache = ScheduleCache::new();
        cache.schedule(&[3u8; 32]).expect("valid key");
        assert_eq!(
            cache.schedule(&[3u8; 33]).map(|_| ()),
            Err(Error::InvalidKey { len: 33 })
        );
        assert!(cache.holds(&[3u8; 32]));
    }

    #[test]
    fn cached_output_matches_explicit_schedule() {
        let cache = ScheduleCache::new();
        let key = [4u8; 24];
        let input = *b"a message spanning two blocks";
        let expected = buffer::encrypt_to_vec(&Schedule::new(&key).expect("valid key"), &input)
            .expect("encrypt");

        let mut out = [0u8; 32];
        for _ in 0..2 {
            let written = cache
                .apply(Direction::Encrypt, &key, &input, &mut out)
                .expect("encrypt");
            assert_eq!(&out[..written], &expected[..]);
        }

        let mut plain = [0u8; 32];
        let written = cache
            .apply(Direction::Decrypt, &key, &out, &mut plain)
            .expect("decrypt");
        assert_eq!(written, 32);
        assert_eq!(&plain[..input.len()], &input[..]);
    }

    #[test]
    fn clear_forces_rederive() {
        let cache = ScheduleCache::new();
        let first = cache.schedule(&[5u8; 8]).expect("valid key");
        cache.clear();
        assert!(!cache.holds(&[5u8; 8]));
        let second = cache.schedule(&[5u8; 8]).expect("valid key");
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn concurrent_callers_with_different_keys() {
        let cache = ScheduleCache::new();
        let keys: Vec<[u8; 16]> = (0u8..4).map(|i| [i; 16]).collect();
        let input = [0x77u8; 64];
        let expected: Vec<Vec<u8>> = keys
            .iter()
            .map(|key| {
                buffer::encrypt_to_vec(&Schedule::new(key).expect("valid key"), &input)
                    .expect("encrypt")
            })
            .collect();

        std::thread::scope(|scope| {
            for (key, want) in keys.iter().zip(expected.iter()) {
                let cache = &cache;
                let input = &input;
                scope.spawn(move || {
                    for _ in 0..50 {
                        let mut out = [0u8; 64];
                        let written = cache
                            .apply(Direction::Encrypt, key, input, &mut out)
                            .expect("encrypt");
                        assert_eq!(&out[..written], &want[..]);
                    }
                });
            }
        });
    }

    #[test]
    fn global_entry_point_round_trips() {
        let key = [6u8; 32];
        let input = *b"global cache";
        let mut ct = [0u8; 16];
        assert_eq!(twofish(&input, &mut ct, &key, Direction::Encrypt), Ok(16));
        let mut pt = [0u8; 16];
        assert_eq!(twofish(&ct, &mut pt, &key, Direction::Decrypt), Ok(16));
        assert_eq!(&pt[..input.len()], &input[..]);
        assert_eq!(
            twofish(&input, &mut ct, &[0u8; 7], Direction::Encrypt),
            Err(Error::InvalidKey { len: 7 })
        );
    }
}
