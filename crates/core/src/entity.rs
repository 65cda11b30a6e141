//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// An entity keeps its identity while its attributes change, so equality and
/// hashing of an implementor should be derived from [`Entity::id`] alone.
pub trait Entity {
    /// Identifier type. Must be usable as a set member / map key.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether `other` denotes the same entity, regardless of current state.
    fn same_identity_as(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
