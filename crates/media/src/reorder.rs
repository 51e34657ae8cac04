//! Pure list reordering, decoupled from any drag-and-drop event system.

/// Move the element at `from` so that it ends up at index `to`.
///
/// Returns `false` (leaving `items` untouched) if either index is out of
/// range.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}

/// Translate a drag gesture (start index plus signed slot offset) into a
/// target index clamped to the list.
pub fn drag_target(from: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    from.saturating_add_signed(delta).min(len - 1)
}
