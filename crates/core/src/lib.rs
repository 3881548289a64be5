//! Shop Panel Core - Shared types library.
//!
//! This crate provides the domain types used by the admin backend:
//! - Shopify global IDs for products, collections and variants
//! - The image MIME types accepted for staged uploads
//! - Decimal prices
//!
//! # Architecture
//!
//! The core crate contains only types and parsing - no I/O and no HTTP
//! clients. Everything that talks to Shopify lives in `shop-panel-admin`.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, MIME types and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
