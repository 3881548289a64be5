//! Request extractors for admin.
//!
//! - `shop` - explicit per-request shop context

pub mod shop;

pub use shop::{SHOP_DOMAIN_HEADER, ShopContext};
