//! Business logic services for the panel.
//!
//! # Services
//!
//! - `products` - Product CRUD on top of the Admin API
//! - `upload` - Staged image upload orchestration

pub mod products;
pub mod upload;
