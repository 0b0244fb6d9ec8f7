//! Collapse flags for the category tree widget.

use crate::model::category::CategoryId;
use std::collections::HashMap;

/// Per-node collapse flags. A missing entry means expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashMap<CategoryId, bool>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag for `id` and returns the new collapsed value.
    pub fn toggle(&mut self, id: CategoryId) -> bool {
        let flag = self.collapsed.entry(id).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_collapsed(&self, id: CategoryId) -> bool {
        self.collapsed.get(&id).copied().unwrap_or(false)
    }

    /// Forgets all flags, expanding every node.
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::CollapseState;

    #[test]
    fn missing_entry_is_expanded_and_toggle_flips() {
        let mut state = CollapseState::new();
        assert!(!state.is_collapsed(7));
        assert!(state.toggle(7));
        assert!(state.is_collapsed(7));
        assert!(!state.toggle(7));
        assert!(!state.is_collapsed(7));
    }

    #[test]
    fn flags_are_tracked_per_node() {
        let mut state = CollapseState::new();
        state.toggle(1);
        assert!(state.is_collapsed(1));
        assert!(!state.is_collapsed(2));

        state.expand_all();
        assert!(!state.is_collapsed(1));
    }
}
