use super::ids::ParticleId;
use std::convert::Infallible;

/// Contract for containers that collect particles under one logical unit.
///
/// Implementors are constructed from a group key, receive the name of the collection
/// they belong to, and accept particle handles.
pub trait Aggregate: Sized {
    type Error;

    fn with_key(key: &str) -> Result<Self, Self::Error>;

    fn set_parent(&mut self, parent: &str);

    fn add_items(&mut self, items: &[ParticleId]) -> Result<(), Self::Error>;
}

/// A named group of particles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Molecule {
    name: String,
    parent: Option<String>,
    items: Vec<ParticleId>,
}

impl Molecule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn items(&self) -> &[ParticleId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.items.contains(&id)
    }
}

impl Aggregate for Molecule {
    type Error = Infallible;

    fn with_key(key: &str) -> Result<Self, Self::Error> {
        Ok(Self::new(key))
    }

    fn set_parent(&mut self, parent: &str) {
        self.parent = Some(parent.to_string());
    }

    fn add_items(&mut self, items: &[ParticleId]) -> Result<(), Self::Error> {
        for &id in items {
            if !self.items.contains(&id) {
                self.items.push(id);
            }
        }
        Ok(())
    }
}
