//! Core types for Bundle Kit.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod gid;
pub mod id;
pub mod price;
pub mod status;

pub use gid::{GidError, ProductGid, legacy_id};
pub use id::*;
pub use price::{Price, PriceError};
pub use status::*;
