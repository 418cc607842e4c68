//! Identity of records stored in flat collections.

/// Anything addressed by a stable id inside a collection.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Position of the entity with `id` inside a flat collection.
pub fn position_of<E: Entity>(collection: &[E], id: &E::Id) -> Option<usize> {
    collection.iter().position(|e| e.id() == id)
}
