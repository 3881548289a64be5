//! Core types for Shop Panel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod media;
pub mod price;

pub use id::*;
pub use media::{ImageMimeType, MimeTypeError};
pub use price::{Price, PriceError};
