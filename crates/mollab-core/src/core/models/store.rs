use super::entity::ensure_finite;
use super::error::ParticleError;
use super::ids::ParticleId;
use super::particle::Particle;
use super::variant::ParticleKind;
use crate::core::config::{EngineConfig, SeparationPolicy};
use crate::core::utils::geometry;
use nalgebra::{Point3, Vector3};
use slotmap::SlotMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

/// How [`ParticleStore::separate`] interprets its `value` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeparationMode {
    /// Scale the current separation by `value`; each particle covers half the change.
    Relative,
    /// Move each particle `value` away from the other.
    Absolute,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid separation mode string")]
pub struct ParseSeparationModeError;

impl FromStr for SeparationMode {
    type Err = ParseSeparationModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relative" | "rel" => Ok(Self::Relative),
            "absolute" | "abs" => Ok(Self::Absolute),
            _ => Err(ParseSeparationModeError),
        }
    }
}

impl fmt::Display for SeparationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Relative => "relative",
                Self::Absolute => "absolute",
            }
        )
    }
}

/// Owns every particle and the relations between them.
///
/// Particles are addressed by [`ParticleId`] handles. Operations that involve more than
/// one particle (bonding, replication, separation) live here so that both sides of a
/// relation are updated together. Every operation validates its inputs before mutating
/// anything.
#[derive(Debug, Default)]
pub struct ParticleStore {
    particles: SlotMap<ParticleId, Particle>,
    config: EngineConfig,
}

impl ParticleStore {
    /// Creates an empty store with the default [`EngineConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store governed by `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Axis tolerance, separation policy and undefined group key used by the
    ///   store's operations.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            particles: SlotMap::with_key(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the number of particles currently in the store.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Checks whether `id` still refers to a particle in this store.
    ///
    /// # Return
    ///
    /// `false` for handles of removed particles and for handles issued by another store
    /// whose slot is vacant here.
    pub fn contains(&self, id: ParticleId) -> bool {
        self.particles.contains_key(id)
    }

    /// Retrieves a particle by its handle.
    ///
    /// # Arguments
    ///
    /// * `id` - The handle returned by [`insert`](Self::insert) or
    ///   [`add_particle`](Self::add_particle).
    ///
    /// # Return
    ///
    /// The particle, or `None` if the handle is stale.
    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id)
    }

    /// Retrieves a mutable reference to a particle by its handle.
    ///
    /// Bonding and replica lists are not reachable through this reference; use the store's
    /// own operations to change them.
    ///
    /// # Return
    ///
    /// The particle, or `None` if the handle is stale.
    pub fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.get_mut(id)
    }

    /// Iterates over every `(handle, particle)` pair in slot order.
    pub fn particles_iter(&self) -> impl Iterator<Item = (ParticleId, &Particle)> {
        self.particles.iter()
    }

    pub fn particles_iter_mut(&mut self) -> impl Iterator<Item = (ParticleId, &mut Particle)> {
        self.particles.iter_mut()
    }

    /// Takes ownership of a particle and returns its handle.
    ///
    /// Any bonding or replica entries carried by the particle are discarded; its replica
    /// list is reset to its own handle.
    ///
    /// # Arguments
    ///
    /// * `particle` - The particle to store.
    ///
    /// # Return
    ///
    /// The handle under which the particle is now addressed.
    pub fn insert(&mut self, mut particle: Particle) -> ParticleId {
        particle.neighbors.clear();
        particle.replicas.clear();
        self.particles.insert_with_key(|id| {
            particle.replicas.push(id);
            particle
        })
    }

    /// Builds a particle from `kind` at `position` and inserts it.
    ///
    /// # Arguments
    ///
    /// * `kind` - The format-specific payload (full, molecular or PDB).
    /// * `position` - Initial coordinates.
    ///
    /// # Return
    ///
    /// The handle of the new particle.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::NonFinitePosition`] if `position` is not finite; nothing is
    /// inserted in that case.
    pub fn add_particle(
        &mut self,
        kind: ParticleKind,
        position: Point3<f64>,
    ) -> Result<ParticleId, ParticleError> {
        Ok(self.insert(Particle::new(kind, position)?))
    }

    /// Removes a particle and scrubs its handle from every bonding set and replica list.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_particle(&mut self, id: ParticleId) -> Option<Particle> {
        let particle = self.particles.remove(id)?;
        for &neighbor in &particle.neighbors {
            if let Some(other) = self.particles.get_mut(neighbor) {
                other.neighbors.retain(|&n| n != id);
            }
        }
        for (_, other) in self.particles.iter_mut() {
            other.replicas.retain(|&r| r != id);
        }
        debug!(
            neighbors = particle.neighbors.len(),
            "Removed particle from store."
        );
        Some(particle)
    }

    /// Bonds `id` to each of `others`, symmetrically.
    ///
    /// Bonding is idempotent: an existing bond is left as it is on both sides.
    ///
    /// # Errors
    ///
    /// - [`ParticleError::ParticleNotFound`] if `id` is not in the store.
    /// - [`ParticleError::NotAParticle`] if one of `others` refers to no particle.
    /// - [`ParticleError::SelfBond`] if `others` contains `id`.
    ///
    /// No bond is added when any handle is rejected.
    #[instrument(level = "debug", skip(self))]
    pub fn add_bonds(&mut self, id: ParticleId, others: &[ParticleId]) -> Result<(), ParticleError> {
        if !self.particles.contains_key(id) {
            return Err(ParticleError::ParticleNotFound(id));
        }
        for &other in others {
            if !self.particles.contains_key(other) {
                return Err(ParticleError::NotAParticle { handle: other });
            }
            if other == id {
                return Err(ParticleError::SelfBond { handle: id });
            }
        }

        for &other in others {
            self.link(id, other);
            self.link(other, id);
        }
        Ok(())
    }

    fn link(&mut self, from: ParticleId, to: ParticleId) {
        if let Some(particle) = self.particles.get_mut(from) {
            if !particle.neighbors.contains(&to) {
                particle.neighbors.push(to);
            } else {
                trace!(?from, ?to, "Bond already present.");
            }
        }
    }

    /// Replicates every member of `id`'s replica list `n` times along `delta`.
    ///
    /// For each existing replica `source` (in list order) and each `i` in `1..=n`, a
    /// structural copy of `source` is placed at `source.position + i * delta`. The new
    /// handles are appended to `id`'s replica list in that order, so its length grows from
    /// `L` to `L * (n + 1)`.
    ///
    /// # Return
    ///
    /// The handles of the newly created particles.
    ///
    /// # Errors
    ///
    /// - [`ParticleError::ParticleNotFound`] if `id` or one of its replicas is not in the
    ///   store.
    /// - [`ParticleError::NonFinitePosition`] if an offset copy would not have a finite
    ///   position.
    ///
    /// Every copy is built before any is inserted, so nothing is added on error.
    #[instrument(level = "debug", skip(self))]
    pub fn duplicate(
        &mut self,
        id: ParticleId,
        n: usize,
        delta: &Vector3<f64>,
    ) -> Result<Vec<ParticleId>, ParticleError> {
        let sources = self
            .particles
            .get(id)
            .ok_or(ParticleError::ParticleNotFound(id))?
            .replicas
            .clone();

        let mut copies = Vec::with_capacity(sources.len() * n);
        for &source in &sources {
            let template = self
                .particles
                .get(source)
                .ok_or(ParticleError::ParticleNotFound(source))?;
            for i in 1..=n {
                let mut copy = template.replicate();
                copy.translate(&(delta * i as f64))?;
                copies.push(copy);
            }
        }

        let created: Vec<ParticleId> = copies.into_iter().map(|p| self.insert(p)).collect();
        if let Some(particle) = self.particles.get_mut(id) {
            particle.replicas.extend_from_slice(&created);
        }
        debug!(
            sources = sources.len(),
            created = created.len(),
            "Duplicated particle replicas."
        );
        Ok(created)
    }

    /// Computes the Euclidean distance between two particles.
    ///
    /// # Arguments
    ///
    /// * `a` - Handle of the first particle.
    /// * `b` - Handle of the second particle.
    ///
    /// # Return
    ///
    /// The distance, identical for either argument order.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::ParticleNotFound`] if either handle is stale.
    pub fn distance_between(&self, a: ParticleId, b: ParticleId) -> Result<f64, ParticleError> {
        Ok(self.get(a)?.distance_to(self.get(b)?))
    }

    /// Rotates a particle using the store's configured axis tolerance.
    ///
    /// # Arguments
    ///
    /// * `id` - Handle of the particle to rotate.
    /// * `theta` - Counter-clockwise angle in radians.
    /// * `axis` - Rotation axis; it need not be normalized.
    /// * `pivot` - Point the axis passes through.
    ///
    /// # Errors
    ///
    /// - [`ParticleError::ParticleNotFound`] if `id` is stale.
    /// - [`ParticleError::Geometry`] if `axis` is too short or not finite.
    /// - [`ParticleError::NonFinitePosition`] if the rotated position would not be finite.
    pub fn rotate(
        &mut self,
        id: ParticleId,
        theta: f64,
        axis: &Vector3<f64>,
        pivot: &Point3<f64>,
    ) -> Result<(), ParticleError> {
        let tolerance = self.config.axis_tolerance;
        self.get_mut(id)?
            .rotate_with_tolerance(theta, axis, pivot, tolerance)?;
        Ok(())
    }

    /// Moves `a` and `b` apart along the line joining them (or together for negative
    /// values).
    ///
    /// # Errors
    ///
    /// - [`ParticleError::DegenerateGeometry`] if both particles occupy the same position,
    ///   since the direction between them is undefined.
    /// - [`ParticleError::NonFinitePosition`] if either new position would not be finite,
    ///   e.g. for an infinite or NaN `value`.
    ///
    /// Neither particle moves on error.
    #[instrument(level = "debug", skip(self))]
    pub fn separate(
        &mut self,
        a: ParticleId,
        b: ParticleId,
        mode: SeparationMode,
        value: f64,
    ) -> Result<(), ParticleError> {
        let from = *self.get(a)?.position();
        let to = *self.get(b)?.position();
        if from == to {
            return Err(ParticleError::DegenerateGeometry {
                first: a,
                second: b,
            });
        }

        let orientation = to - from;
        let distance = orientation.norm();
        let unit = orientation / distance;
        let shift = match mode {
            SeparationMode::Relative => distance * (value - 1.0) / 2.0,
            SeparationMode::Absolute => value,
        };

        let moved_a = geometry::translate(&from, &(-unit * shift));
        let moved_b = geometry::translate(&to, &(unit * shift));
        ensure_finite(&moved_a)?;
        ensure_finite(&moved_b)?;

        self.get_mut(a)?.move_to(moved_a.x, moved_a.y, moved_a.z)?;
        self.get_mut(b)?.move_to(moved_b.x, moved_b.y, moved_b.z)?;
        trace!(distance, shift, "Separated particles.");
        Ok(())
    }

    /// Like [`separate`](Self::separate), taking the mode as text (`relative`/`rel` or
    /// `absolute`/`abs`).
    ///
    /// An unrecognized mode fails with [`ParticleError::UnknownSeparationMode`] under
    /// [`SeparationPolicy::Strict`] and is ignored with a warning under
    /// [`SeparationPolicy::Lenient`].
    pub fn separate_with(
        &mut self,
        a: ParticleId,
        b: ParticleId,
        mode: &str,
        value: f64,
    ) -> Result<(), ParticleError> {
        match mode.parse::<SeparationMode>() {
            Ok(mode) => self.separate(a, b, mode, value),
            Err(_) => match self.config.separation_policy {
                SeparationPolicy::Strict => {
                    Err(ParticleError::UnknownSeparationMode(mode.to_string()))
                }
                SeparationPolicy::Lenient => {
                    warn!(
                        "Unknown separation mode '{}'; particles {:?} and {:?} were not moved.",
                        mode, a, b
                    );
                    Ok(())
                }
            },
        }
    }

    fn get(&self, id: ParticleId) -> Result<&Particle, ParticleError> {
        self.particles
            .get(id)
            .ok_or(ParticleError::ParticleNotFound(id))
    }

    fn get_mut(&mut self, id: ParticleId) -> Result<&mut Particle, ParticleError> {
        self.particles
            .get_mut(id)
            .ok_or(ParticleError::ParticleNotFound(id))
    }
}
