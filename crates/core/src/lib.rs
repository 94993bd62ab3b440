//! Zafago Core - Shared domain types.
//!
//! This crate provides the types used across all Zafago components:
//! - `storefront` - Cart, recently-viewed, wishlist, recommendation and review engine
//! - `cli` - Command-line front end over a file-backed state directory
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O and no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, identities, prices, catalog items and reviews

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
