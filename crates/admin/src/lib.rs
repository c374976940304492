//! Bundle Kit admin library.
//!
//! This crate provides the embedded app backend as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! This crate holds an offline Shopify Admin API token for the store and the
//! app secret that signs session tokens. Every `/api/*` route requires a
//! valid session token from the Shopify admin.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bundles;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod shopify;
pub mod state;
