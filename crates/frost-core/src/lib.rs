//! # frost-core
//!
//! Core types and primitives for the Frost SDF scene compiler.
//! This crate contains foundational types shared across all Frost crates:
//! the error taxonomy, configuration, vector argument values, and hashing.

pub mod config;
pub mod error;
pub mod hash;
pub mod math;

pub use config::{CodegenConfig, FrostConfig, LogConfig};
pub use error::{FrostError, FrostResult};
pub use hash::{hash_source, ContentHash};
pub use math::{Dimension, Vec2, Vec3};
