//! Identity of catalog records.

/// A record identified by its id rather than by its field values.
///
/// Products and their image records are entities: two records with the same
/// identifier are the same thing even if their `sort_order` or price differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Index of the entity carrying `id`, first match wins.
pub fn position_by_id<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}
