//! # mollab Core Library
//!
//! Building blocks for programmatically constructing, rearranging and exporting
//! molecular and particle structures.
//!
//! ## Architecture
//!
//! - **[`core::models`]**: Particle entities, their format-specific payloads, the
//!   arena-backed [`ParticleStore`](core::models::store::ParticleStore) that owns
//!   bonding graphs and replica bookkeeping, and the aggregate contract.
//! - **[`core::utils`]**: The stateless transform engine (translation, axis-angle
//!   rotation about an arbitrary pivot, random unit directions).
//! - **[`core::grouping`]**: Partitioning of flat particle collections into aggregates.
//! - **[`core::config`]**: Tolerances and policies shared by the engine.
//!
//! ## Example
//!
//! ```ignore
//! use mollab::core::models::store::ParticleStore;
//! use mollab::core::models::variant::ParticleKind;
//! use nalgebra::{Point3, Vector3};
//!
//! let mut store = ParticleStore::new();
//! let a = store.add_particle(ParticleKind::molecular(1, 1, 1), Point3::origin())?;
//! let b = store.add_particle(ParticleKind::molecular(2, 1, 1), Point3::new(1.5, 0.0, 0.0))?;
//! store.add_bonds(a, &[b])?;
//! store.duplicate(a, 3, &Vector3::new(0.0, 0.0, 4.0))?;
//! ```

pub mod core;
