//! # Core Module
//!
//! The particle entity model and the spatial-transform engine.
//!
//! - **Particle Representation** ([`models`]) - Entities, particles, variants, the particle store
//!   and the aggregate contract
//! - **Geometry** ([`utils`]) - Pure translation and rotation functions
//! - **Grouping** ([`grouping`]) - Attribute-based partitioning into aggregates
//! - **Configuration** ([`config`]) - Engine tolerances and policies

pub mod config;
pub mod grouping;
pub mod models;
pub mod utils;
