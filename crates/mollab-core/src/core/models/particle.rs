use super::entity::Entity;
use super::error::ParticleError;
use super::ids::{EntityUid, ParticleId};
use super::variant::{ParticleKind, ParticleStyle};
use crate::core::utils::geometry::{self, DEFAULT_AXIS_TOLERANCE, OrthogonalAxis};
use nalgebra::{Point3, Vector3};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Tag written to the `item` field of every exported particle record.
pub const PARTICLE_ITEM_TAG: &str = "Atom";

/// A positioned entity with a format-specific payload, a bonding set and a replica list.
///
/// Bonding and replica entries are [`ParticleId`] handles into the owning
/// [`ParticleStore`](super::store::ParticleStore). Both collections are maintained by the
/// store: once a particle is inserted, its replica list starts with its own handle.
#[derive(Debug)]
pub struct Particle {
    entity: Entity,
    kind: ParticleKind,
    atom_type: Option<String>,
    mass: Option<f64>,
    attributes: HashMap<String, String>,
    pub(crate) neighbors: Vec<ParticleId>,
    pub(crate) replicas: Vec<ParticleId>,
}

/// Flat, scalar-only export of a particle.
///
/// All eight keys (`item`, `id`, `label`, `type`, `parent`, `x`, `y`, `z`) are always
/// serialized. An unset type label or parent is written as null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleRecord {
    pub item: &'static str,
    pub id: usize,
    pub label: String,
    #[serde(rename = "type")]
    pub atom_type: Option<String>,
    pub parent: Option<String>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Particle {
    /// Creates a particle from a format-specific payload and its coordinates.
    ///
    /// The label defaults to the atom name for PDB records and to the explicit id
    /// otherwise; the type label defaults to the type the format carries, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::NonFinitePosition`] if any coordinate is not finite.
    pub fn new(kind: ParticleKind, position: Point3<f64>) -> Result<Self, ParticleError> {
        let entity = Entity::new(&kind.default_label(), position)?;
        Ok(Self {
            entity,
            atom_type: kind.default_type(),
            kind,
            mass: None,
            attributes: HashMap::new(),
            neighbors: Vec::new(),
            replicas: Vec::new(),
        })
    }

    /// Structural copy under a new identity.
    ///
    /// Payload, label, parent, type label, mass, custom attributes and position are copied.
    /// The copy starts
    /// with no bonds and no replicas.
    pub fn replicate(&self) -> Self {
        Self {
            entity: self.entity.fork(),
            kind: self.kind.clone(),
            atom_type: self.atom_type.clone(),
            mass: self.mass,
            attributes: self.attributes.clone(),
            neighbors: Vec::new(),
            replicas: Vec::new(),
        }
    }

    pub fn uid(&self) -> EntityUid {
        self.entity.uid()
    }

    /// The identity supplied by the particle's format (atom id or serial number).
    pub fn id(&self) -> usize {
        self.kind.id()
    }

    pub fn style(&self) -> ParticleStyle {
        self.kind.style()
    }

    pub fn kind(&self) -> &ParticleKind {
        &self.kind
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn label(&self) -> &str {
        self.entity.label()
    }

    pub fn set_label(&mut self, label: &str) -> &mut Self {
        self.entity.set_label(label);
        self
    }

    pub fn parent(&self) -> Option<&str> {
        self.entity.parent()
    }

    pub fn set_parent(&mut self, parent: &str) -> &mut Self {
        self.entity.set_parent(parent);
        self
    }

    pub fn atom_type(&self) -> Option<&str> {
        self.atom_type.as_deref()
    }

    pub fn set_atom_type(&mut self, atom_type: &str) -> &mut Self {
        self.atom_type = Some(atom_type.to_string());
        self
    }

    /// The particle mass, or `None` if it was never set.
    pub fn mass(&self) -> Option<f64> {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f64) -> Result<&mut Self, ParticleError> {
        if !mass.is_finite() {
            return Err(ParticleError::InvalidMass(mass));
        }
        self.mass = Some(mass);
        Ok(self)
    }

    pub fn position(&self) -> &Point3<f64> {
        self.entity.position()
    }

    pub fn neighbors(&self) -> &[ParticleId] {
        &self.neighbors
    }

    pub fn is_bonded_to(&self, other: ParticleId) -> bool {
        self.neighbors.contains(&other)
    }

    pub fn replicas(&self) -> &[ParticleId] {
        &self.replicas
    }

    /// Shifts the particle by `(dx, dy, dz)`.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::NonFinitePosition`] if the shifted position would not be
    /// finite. The position is left untouched on error.
    pub fn move_by(&mut self, dx: f64, dy: f64, dz: f64) -> Result<&mut Self, ParticleError> {
        self.translate(&Vector3::new(dx, dy, dz))
    }

    pub fn translate(&mut self, delta: &Vector3<f64>) -> Result<&mut Self, ParticleError> {
        let moved = geometry::translate(self.entity.position(), delta);
        self.entity.set_position(moved)?;
        Ok(self)
    }

    pub fn move_to(&mut self, x: f64, y: f64, z: f64) -> Result<&mut Self, ParticleError> {
        self.entity.set_position(Point3::new(x, y, z))?;
        Ok(self)
    }

    /// Moves `length` along a direction drawn uniformly from the unit sphere.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::NonFinitePosition`] if `length` is not finite.
    pub fn random_move(
        &mut self,
        length: f64,
        rng: &mut impl Rng,
    ) -> Result<&mut Self, ParticleError> {
        let direction = geometry::random_unit_vector(rng);
        self.translate(&(direction.into_inner() * length))
    }

    /// Rotates counter-clockwise by `theta` radians about the axis through `pivot`.
    ///
    /// # Errors
    ///
    /// Returns [`ParticleError::Geometry`] wrapping
    /// [`GeometryError::InvalidAxis`](geometry::GeometryError::InvalidAxis) if `axis`
    /// cannot be normalized, or [`ParticleError::NonFinitePosition`] if `theta` or `pivot`
    /// yields a non-finite result. The position is left untouched on error.
    pub fn rotate(
        &mut self,
        theta: f64,
        axis: &Vector3<f64>,
        pivot: &Point3<f64>,
    ) -> Result<&mut Self, ParticleError> {
        self.rotate_with_tolerance(theta, axis, pivot, DEFAULT_AXIS_TOLERANCE)
    }

    pub fn rotate_with_tolerance(
        &mut self,
        theta: f64,
        axis: &Vector3<f64>,
        pivot: &Point3<f64>,
        tolerance: f64,
    ) -> Result<&mut Self, ParticleError> {
        let rotated =
            geometry::rotate_about_axis(self.entity.position(), theta, axis, pivot, tolerance)?;
        self.entity.set_position(rotated)?;
        Ok(self)
    }

    /// Rotates about the x, y or z direction through `pivot`, chosen by a one-hot selector.
    pub fn rotate_orthogonal(
        &mut self,
        theta: f64,
        pivot: &Point3<f64>,
        selector: [bool; 3],
    ) -> Result<&mut Self, ParticleError> {
        let axis = OrthogonalAxis::from_selector(selector)?;
        let rotated = geometry::rotate_orthogonal(self.entity.position(), theta, pivot, axis);
        self.entity.set_position(rotated)?;
        Ok(self)
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        nalgebra::distance(self.position(), other.position())
    }

    /// Attaches a caller-defined attribute, replacing any earlier value under `name`.
    ///
    /// Custom attributes are readable through [`Particle::attribute`] and so can serve as
    /// grouping keys. They never shadow the built-in names or payload fields.
    ///
    /// # Arguments
    ///
    /// * `name` - Attribute name, e.g. `"ref"`.
    /// * `value` - Attribute value rendered as text.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> &mut Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Reads an attribute by name, rendered as text.
    ///
    /// Common names are `label`, `parent`, `type` and `style`. Any other name is looked up
    /// among the payload fields (see [`ParticleKind::field`]) and then among the attributes
    /// set with [`Particle::set_attribute`].
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "label" => Some(self.label().to_string()),
            "parent" => self.parent().map(str::to_string),
            "type" => self.atom_type.clone(),
            "style" => Some(self.style().to_string()),
            _ => self
                .kind
                .field(name)
                .or_else(|| self.attributes.get(name).cloned()),
        }
    }

    pub fn to_record(&self) -> ParticleRecord {
        let position = self.position();
        ParticleRecord {
            item: PARTICLE_ITEM_TAG,
            id: self.id(),
            label: self.label().to_string(),
            atom_type: self.atom_type.clone(),
            parent: self.parent().map(str::to_string),
            x: position.x,
            y: position.y,
            z: position.z,
        }
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position();
        write!(
            f,
            "Atom {{ label: \"{}\", parent: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
            self.label(),
            self.parent().unwrap_or("-"),
            p.x,
            p.y,
            p.z
        )
    }
}
