use super::ids::ParticleId;
use crate::core::utils::geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParticleError {
    #[error("Bonding partner must be a particle, but handle {handle:?} refers to none")]
    NotAParticle { handle: ParticleId },

    #[error("Particle {handle:?} cannot be bonded to itself")]
    SelfBond { handle: ParticleId },

    #[error("Particle not found in store: {0:?}")]
    ParticleNotFound(ParticleId),

    #[error(
        "Particles {first:?} and {second:?} share the same position, the separation direction is undefined"
    )]
    DegenerateGeometry {
        first: ParticleId,
        second: ParticleId,
    },

    #[error("Unknown separation mode '{0}' (expected 'relative', 'rel', 'absolute' or 'abs')")]
    UnknownSeparationMode(String),

    #[error("Position ({x}, {y}, {z}) must have finite coordinates")]
    NonFinitePosition { x: f64, y: f64, z: f64 },

    #[error("Mass must be a finite number, got {0}")]
    InvalidMass(f64),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
