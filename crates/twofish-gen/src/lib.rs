//! Schedule images for Twofish.
//!
//! An image is a derived [`twofish_core::Schedule`] plus the parameters it was
//! built for, serialized with `bincode`. Shipping an image lets a runtime
//! encrypt with the expanded tables without holding or re-deriving the key.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod instance;

pub use instance::{ImageError, ImageParams, ScheduleImage, IMAGE_VERSION};
