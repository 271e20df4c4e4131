use crate::core::models::ids::ParticleId;
use crate::core::models::molecule::Aggregate;
use crate::core::models::store::ParticleStore;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, instrument, warn};

/// Partitions `particles` by the value of the `reference` attribute.
///
/// `reference` may name a built-in attribute, a payload field or a custom attribute set
/// with [`Particle::set_attribute`](crate::core::models::particle::Particle::set_attribute).
///
/// Each particle's parent is set to its group key. Particles without the attribute are
/// collected under the store's configured undefined key (`"UNDEFINED"` by default). One
/// aggregate is built per distinct key, in order of first occurrence: it is constructed
/// from the key, parented to `collection`, and given the group's particles in input order.
///
/// Handles that no longer refer to a particle are skipped.
///
/// # Errors
///
/// Errors raised by the aggregate's constructor or `add_items` are returned unchanged.
#[instrument(level = "debug", skip(store, particles), fields(count = particles.len()))]
pub fn group_by<A: Aggregate>(
    collection: &str,
    store: &mut ParticleStore,
    particles: &[ParticleId],
    reference: &str,
) -> Result<Vec<A>, A::Error> {
    let undefined = store.config().undefined_group_key.clone();
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<ParticleId>> = HashMap::new();

    for &id in particles {
        let Some(particle) = store.particle_mut(id) else {
            warn!("Skipping stale particle handle {:?} while grouping.", id);
            continue;
        };
        let key = particle
            .attribute(reference)
            .unwrap_or_else(|| undefined.clone());
        particle.set_parent(&key);

        match groups.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().push(id),
            Entry::Vacant(entry) => {
                order.push(entry.key().clone());
                entry.insert(vec![id]);
            }
        }
    }

    let mut aggregates = Vec::with_capacity(order.len());
    for key in order {
        let members = groups.remove(&key).unwrap_or_default();
        let mut aggregate = A::with_key(&key)?;
        aggregate.set_parent(collection);
        aggregate.add_items(&members)?;
        aggregates.push(aggregate);
    }
    debug!(groups = aggregates.len(), "Grouped particles.");
    Ok(aggregates)
}
