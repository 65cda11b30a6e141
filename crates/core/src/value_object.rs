//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// holding the same attributes are interchangeable. Requiring `Eq + Hash` lets
/// them live in sets and serve as map keys.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: no identity (an order line for 10 LAMPs on order 42 is
///   the same line wherever it appears)
/// - **Entity**: has identity (a batch stays the same batch while its
///   allocations change)
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Sku(String);
///
/// impl ValueObject for Sku {}
///
/// assert_eq!(Sku("LAMP".into()), Sku("LAMP".into()));
/// ```
pub trait ValueObject: Clone + Eq + core::hash::Hash + core::fmt::Debug {}
