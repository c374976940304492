//! Bundle Kit Core - Shared domain types.
//!
//! This crate provides the types used across all Bundle Kit components:
//! - `admin` - The embedded Shopify app backend (bundle creation, listing, feedback)
//! - `cli` - Command-line tools for migrations and reporting
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product GIDs, decimal prices, feedback kinds, operation statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
