//! # Core Models Module
//!
//! Data structures used to represent particles and the relations between them.
//!
//! ## Key Components
//!
//! - [`entity`] - Base identity, label, parent reference and position record
//! - [`particle`] - A positioned entity with mass, bonding set, replica list and transform API
//! - [`variant`] - Format-specific attribute sets ("full", "molecular", "pdb")
//! - [`store`] - Arena owning particles; bonding, replication and pairwise operations
//! - [`molecule`] - The aggregate contract and the bundled `Molecule` container
//! - [`ids`] - Handle and identity types
//! - [`error`] - Errors raised by particle operations
//!
//! ## Usage
//!
//! ```ignore
//! use mollab::core::models::store::ParticleStore;
//! use mollab::core::models::variant::ParticleKind;
//! use nalgebra::Point3;
//!
//! let mut store = ParticleStore::new();
//! let id = store.add_particle(ParticleKind::full(1, 1, "CT", -0.12), Point3::origin())?;
//! if let Some(particle) = store.particle_mut(id) {
//!     particle.move_by(1.0, 2.0, 3.0)?;
//! }
//! ```

pub mod entity;
pub mod error;
pub mod ids;
pub mod molecule;
pub mod particle;
pub mod store;
pub mod variant;
