use super::error::ParticleError;
use super::ids::EntityUid;
use nalgebra::Point3;

/// Identity, label, parent reference and position shared by every positioned object.
///
/// The identity is allocated at construction and never changes. Entities are not `Clone`;
/// [`Entity::fork`] copies the fields under a fresh identity.
#[derive(Debug)]
pub struct Entity {
    uid: EntityUid,
    label: String,
    parent: Option<String>,
    position: Point3<f64>,
}

impl Entity {
    /// Creates an entity at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::NonFinitePosition`] if any coordinate is NaN or infinite.
    pub fn new(label: &str, position: Point3<f64>) -> Result<Self, ParticleError> {
        ensure_finite(&position)?;
        Ok(Self {
            uid: EntityUid::allocate(),
            label: label.to_string(),
            parent: None,
            position,
        })
    }

    /// Copies label, parent and position under a newly allocated identity.
    pub fn fork(&self) -> Self {
        Self {
            uid: EntityUid::allocate(),
            label: self.label.clone(),
            parent: self.parent.clone(),
            position: self.position,
        }
    }

    pub fn uid(&self) -> EntityUid {
        self.uid
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replaces the display label.
    ///
    /// # Arguments
    ///
    /// * `label` - New label; an empty string is accepted.
    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    /// Returns the name of the owning container, if one has been assigned.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Records the name of the owning container, replacing any previous one.
    ///
    /// # Arguments
    ///
    /// * `parent` - Name of the container (a molecule key, a file name, ...).
    pub fn set_parent(&mut self, parent: &str) {
        self.parent = Some(parent.to_string());
    }

    pub fn clear_parent(&mut self) {
        self.parent = None;
    }

    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// Moves the entity to `position`.
    ///
    /// Every transform on a particle commits its result through this method, so a position
    /// is never left holding a NaN or infinite coordinate.
    ///
    /// # Arguments
    ///
    /// * `position` - The new absolute coordinates.
    ///
    /// # Return
    ///
    /// `Ok(())` once the position has been replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::NonFinitePosition`] and leaves the position untouched if any
    /// coordinate is NaN or infinite.
    pub fn set_position(&mut self, position: Point3<f64>) -> Result<(), ParticleError> {
        ensure_finite(&position)?;
        self.position = position;
        Ok(())
    }
}

pub(crate) fn ensure_finite(position: &Point3<f64>) -> Result<(), ParticleError> {
    if position.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ParticleError::NonFinitePosition {
            x: position.x,
            y: position.y,
            z: position.z,
        })
    }
}
