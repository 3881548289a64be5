//! Shop Panel Admin library.
//!
//! This crate provides the admin backend as a library, allowing it to be
//! tested and reused.
//!
//! # Security
//!
//! This crate holds HIGH PRIVILEGE access to the Shopify Admin API (full
//! product, collection and file management). The access token is kept in
//! [`shopify::AdminClient`] and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
