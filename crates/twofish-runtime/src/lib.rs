//! Buffer-level Twofish: block-by-block (ECB) encryption of arbitrary-length
//! buffers and a schedule cache for callers that only hold raw key bytes.
//!
//! There is no IV, chaining or integrity protection at this layer; a protocol
//! on top must supply them.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod buffer;
mod cache;

pub use cache::{twofish, Direction, ScheduleCache};
pub use twofish_core::{Error, Key, Result, Schedule};
