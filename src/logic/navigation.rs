//! Navigation selection logic
//!
//! Pure functions for calculating navigation selection indices with wrapping behavior.

/// Calculate the next selection index with wrapping
///
/// Advances the selection to the next item in the list. If at the end,
/// wraps around to the beginning. If no item is selected, selects the first item.
///
/// # Examples
/// ```
/// use wargatui::logic::navigation::next_selection;
///
/// // Empty list
/// assert_eq!(next_selection(None, 0), None);
///
/// // Normal progression
/// assert_eq!(next_selection(None, 3), Some(0));
/// assert_eq!(next_selection(Some(1), 3), Some(2));
///
/// // Wrapping at end
/// assert_eq!(next_selection(Some(2), 3), Some(0));
/// ```
pub fn next_selection(current: Option<usize>, list_len: usize) -> Option<usize> {
    if list_len == 0 {
        return None;
    }

    Some(match current {
        Some(i) if i >= list_len - 1 => 0, // Wrap to start
        Some(i) => i + 1,
        None => 0,
    })
}

/// Calculate the previous selection index with wrapping
///
/// # Examples
/// ```
/// use wargatui::logic::navigation::prev_selection;
///
/// assert_eq!(prev_selection(None, 0), None);
/// assert_eq!(prev_selection(Some(2), 3), Some(1));
/// assert_eq!(prev_selection(Some(0), 3), Some(2));
/// assert_eq!(prev_selection(None, 3), Some(2));
/// ```
pub fn prev_selection(current: Option<usize>, list_len: usize) -> Option<usize> {
    if list_len == 0 {
        return None;
    }

    Some(match current {
        Some(0) | None => list_len - 1, // Wrap to end
        Some(i) => i - 1,
    })
}

/// Keep a selection valid after its list was replaced
///
/// Selects the first item of a non-empty list when nothing was selected, and
/// clamps an index that now points past the end.
pub fn clamp_selection(current: Option<usize>, list_len: usize) -> Option<usize> {
    if list_len == 0 {
        return None;
    }
    Some(current.map_or(0, |i| i.min(list_len - 1)))
}
