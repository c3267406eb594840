//! Toggles and exclusive toggle groups.
//!
//! This module provides [`Toggles`], an arena owning toggles (the selectable
//! state behind radio buttons, toggle buttons and radio menu items) and the
//! [`ToggleGroup`]s that coordinate them. Toggles and groups are addressed
//! by [`ToggleId`] and [`ToggleGroupId`], so membership never forms a
//! reference cycle.
//!
//! # Invariant
//!
//! At most one member of a group is selected. Selecting a member deselects
//! the previous one. When selected toggles join a group, the first of them
//! takes over the selection and the rest are deselected.
//!
//! # Example
//!
//! ```
//! use horizon_controls::toggle::Toggles;
//!
//! let mut toggles = Toggles::new();
//! let group = toggles.create_group();
//! let small = toggles.create_toggle();
//! let large = toggles.create_toggle();
//! toggles.add_toggles(group, &[small, large]).unwrap();
//!
//! toggles.selected_toggle_changed.connect(|&(_, selected)| {
//!     println!("group selection is now {selected:?}");
//! });
//!
//! toggles.set_selected(small, true).unwrap();
//! toggles.set_selected(large, true).unwrap();
//! assert!(!toggles.is_selected(small));
//! assert_eq!(toggles.selected_toggle(group), Some(large));
//! ```

use std::collections::HashSet;
use std::fmt;

use horizon_controls_core::Signal;
use horizon_controls_core::logging::targets;
use slotmap::{SlotMap, new_key_type};

use crate::error::ToggleError;

new_key_type! {
    /// Identifies a toggle in a [`Toggles`] arena.
    pub struct ToggleId;

    /// Identifies a toggle group in a [`Toggles`] arena.
    pub struct ToggleGroupId;
}

#[derive(Debug, Default, Clone, Copy)]
struct Toggle {
    selected: bool,
    group: Option<ToggleGroupId>,
}

/// Ordered toggle membership and the selected member.
#[derive(Debug, Default, Clone)]
pub struct ToggleGroup {
    toggles: Vec<ToggleId>,
    selected: Option<ToggleId>,
}

impl ToggleGroup {
    /// Members in insertion order.
    pub fn toggles(&self) -> &[ToggleId] {
        &self.toggles
    }

    /// The selected member, if any.
    pub fn selected_toggle(&self) -> Option<ToggleId> {
        self.selected
    }

    /// Check if a toggle is a member.
    pub fn contains(&self, toggle: ToggleId) -> bool {
        self.toggles.contains(&toggle)
    }

    /// Record a new selection, returning the previous one.
    ///
    /// Every change of the selection record goes through here.
    fn replace_selected(&mut self, selected: Option<ToggleId>) -> Option<ToggleId> {
        std::mem::replace(&mut self.selected, selected)
    }
}

enum Notice {
    Selected(ToggleId, bool),
    GroupSelection(ToggleGroupId, Option<ToggleId>),
}

/// An arena of toggles and toggle groups.
pub struct Toggles {
    toggles: SlotMap<ToggleId, Toggle>,
    groups: SlotMap<ToggleGroupId, ToggleGroup>,

    /// Signal emitted when a toggle's selected flag changes.
    /// Parameter is (toggle, selected).
    pub selected_changed: Signal<(ToggleId, bool)>,

    /// Signal emitted when a group's selected toggle changes.
    /// Parameter is (group, new selection).
    pub selected_toggle_changed: Signal<(ToggleGroupId, Option<ToggleId>)>,
}

impl Default for Toggles {
    fn default() -> Self {
        Self::new()
    }
}

impl Toggles {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            toggles: SlotMap::with_key(),
            groups: SlotMap::with_key(),
            selected_changed: Signal::new(),
            selected_toggle_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create an unselected toggle outside any group.
    pub fn create_toggle(&mut self) -> ToggleId {
        self.toggles.insert(Toggle::default())
    }

    /// Destroy a toggle, removing it from its group first.
    pub fn destroy_toggle(&mut self, toggle: ToggleId) -> Result<(), ToggleError> {
        let group = self.toggle(toggle)?.group;
        let mut notices = Vec::new();
        if let Some(group) = group {
            self.detach(group, toggle, &mut notices);
        }
        self.toggles.remove(toggle);
        self.publish(notices);
        Ok(())
    }

    /// Create an empty group.
    pub fn create_group(&mut self) -> ToggleGroupId {
        self.groups.insert(ToggleGroup::default())
    }

    /// Destroy a group. Its members leave the group but keep their
    /// selected flags.
    pub fn destroy_group(&mut self, group: ToggleGroupId) -> Result<(), ToggleError> {
        let removed = self.groups.remove(group).ok_or(ToggleError::UnknownGroup)?;
        for member in removed.toggles {
            if let Some(state) = self.toggles.get_mut(member) {
                state.group = None;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check if a toggle is selected. Unknown toggles are not.
    pub fn is_selected(&self, toggle: ToggleId) -> bool {
        self.toggles.get(toggle).is_some_and(|state| state.selected)
    }

    /// The group a toggle belongs to.
    pub fn toggle_group(&self, toggle: ToggleId) -> Option<ToggleGroupId> {
        self.toggles.get(toggle)?.group
    }

    /// A group's membership and selection.
    pub fn group(&self, group: ToggleGroupId) -> Option<&ToggleGroup> {
        self.groups.get(group)
    }

    /// A group's members, empty for an unknown group.
    pub fn toggles(&self, group: ToggleGroupId) -> &[ToggleId] {
        self.groups.get(group).map(ToggleGroup::toggles).unwrap_or(&[])
    }

    /// A group's selected toggle.
    pub fn selected_toggle(&self, group: ToggleGroupId) -> Option<ToggleId> {
        self.groups.get(group)?.selected
    }

    /// Check if a toggle still exists.
    pub fn contains_toggle(&self, toggle: ToggleId) -> bool {
        self.toggles.contains_key(toggle)
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Add one toggle to a group. See [`add_toggles`](Self::add_toggles).
    pub fn add_toggle(&mut self, group: ToggleGroupId, toggle: ToggleId) -> Result<(), ToggleError> {
        self.add_toggles(group, &[toggle])
    }

    /// Append toggles to a group.
    ///
    /// The whole batch is rejected with [`ToggleError::Duplicate`] if a
    /// toggle is already a member or appears twice. A toggle in another
    /// group leaves it first. The first selected newcomer becomes the
    /// group's selection, deselecting the previous one; later selected
    /// newcomers are deselected.
    pub fn add_toggles(&mut self, group: ToggleGroupId, batch: &[ToggleId]) -> Result<(), ToggleError> {
        let members = &self.groups.get(group).ok_or(ToggleError::UnknownGroup)?.toggles;
        let mut seen = HashSet::new();
        for &toggle in batch {
            self.toggle(toggle)?;
            if members.contains(&toggle) || !seen.insert(toggle) {
                tracing::warn!(target: targets::TOGGLE, ?toggle, "duplicate toggle rejected");
                return Err(ToggleError::Duplicate(toggle));
            }
        }

        let mut notices = Vec::new();
        self.admit(group, batch.iter().copied(), &mut notices);
        self.publish(notices);
        Ok(())
    }

    /// Remove a toggle from a group. Returns `false` if it was not a member.
    ///
    /// The toggle keeps its selected flag, but the group forgets it as its
    /// selection.
    pub fn remove_toggle(&mut self, group: ToggleGroupId, toggle: ToggleId) -> Result<bool, ToggleError> {
        if !self.groups.get(group).ok_or(ToggleError::UnknownGroup)?.contains(toggle) {
            return Ok(false);
        }
        let mut notices = Vec::new();
        self.detach(group, toggle, &mut notices);
        self.publish(notices);
        Ok(true)
    }

    /// Replace a group's members.
    ///
    /// Unlike [`add_toggles`](Self::add_toggles) repeated toggles are not an
    /// error: the first occurrence is kept. Members missing from `toggles`
    /// leave the group.
    pub fn set_toggles(&mut self, group: ToggleGroupId, toggles: &[ToggleId]) -> Result<(), ToggleError> {
        if !self.groups.contains_key(group) {
            return Err(ToggleError::UnknownGroup);
        }
        for &toggle in toggles {
            self.toggle(toggle)?;
        }
        let mut seen = HashSet::new();
        let wanted: Vec<ToggleId> = toggles.iter().copied().filter(|&toggle| seen.insert(toggle)).collect();

        let mut notices = Vec::new();
        let current = self.toggles(group).to_vec();
        for member in current {
            if !seen.contains(&member) {
                self.detach(group, member, &mut notices);
            }
        }

        // Keep surviving members in their new order, then admit newcomers.
        let newcomers: Vec<ToggleId> = wanted
            .iter()
            .copied()
            .filter(|&toggle| self.toggle_group(toggle) != Some(group))
            .collect();
        if let Some(entry) = self.groups.get_mut(group) {
            entry.toggles = wanted.iter().copied().filter(|toggle| !newcomers.contains(toggle)).collect();
        }
        self.admit(group, newcomers.into_iter(), &mut notices);
        if let Some(entry) = self.groups.get_mut(group) {
            entry.toggles = wanted;
        }

        self.publish(notices);
        Ok(())
    }

    /// Move a toggle into `group`, or out of any group with `None`.
    pub fn set_toggle_group(&mut self, toggle: ToggleId, group: Option<ToggleGroupId>) -> Result<(), ToggleError> {
        let current = self.toggle(toggle)?.group;
        if current == group {
            return Ok(());
        }
        match group {
            Some(group) => self.add_toggle(group, toggle),
            None => {
                if let Some(current) = current {
                    self.remove_toggle(current, toggle)?;
                }
                Ok(())
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a member of the group, or clear the selection with `None`.
    ///
    /// A toggle that is not a member is ignored.
    pub fn select_toggle(&mut self, group: ToggleGroupId, toggle: Option<ToggleId>) -> Result<(), ToggleError> {
        let entry = self.groups.get(group).ok_or(ToggleError::UnknownGroup)?;
        if let Some(toggle) = toggle
            && !entry.contains(toggle)
        {
            tracing::trace!(target: targets::TOGGLE, ?toggle, "select ignored for non-member");
            return Ok(());
        }

        let mut notices = Vec::new();
        self.select_in_group(group, toggle, &mut notices);
        self.publish(notices);
        Ok(())
    }

    /// Forget the group's selection, unless a member is still selected.
    pub fn clear_selected_toggle(&mut self, group: ToggleGroupId) -> Result<(), ToggleError> {
        let entry = self.groups.get(group).ok_or(ToggleError::UnknownGroup)?;
        if entry.toggles.iter().any(|&member| self.is_selected(member)) {
            return Ok(());
        }
        let mut notices = Vec::new();
        self.record_selection(group, None, &mut notices);
        self.publish(notices);
        Ok(())
    }

    /// Set a toggle's selected flag, keeping its group consistent.
    pub fn set_selected(&mut self, toggle: ToggleId, selected: bool) -> Result<(), ToggleError> {
        let state = *self.toggle(toggle)?;
        let mut notices = Vec::new();
        match (state.group, selected) {
            (Some(group), true) => self.select_in_group(group, Some(toggle), &mut notices),
            (Some(group), false) => {
                self.set_flag(toggle, false, &mut notices);
                if self.selected_toggle(group) == Some(toggle) {
                    let next = self
                        .toggles(group)
                        .iter()
                        .copied()
                        .find(|&member| self.is_selected(member));
                    self.record_selection(group, next, &mut notices);
                }
            }
            (None, selected) => self.set_flag(toggle, selected, &mut notices),
        }
        self.publish(notices);
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn toggle(&self, toggle: ToggleId) -> Result<&Toggle, ToggleError> {
        self.toggles.get(toggle).ok_or(ToggleError::UnknownToggle(toggle))
    }

    /// Join validated newcomers to `group`, leaving their old groups.
    fn admit(&mut self, group: ToggleGroupId, batch: impl Iterator<Item = ToggleId>, notices: &mut Vec<Notice>) {
        let mut selection_taken = false;
        for toggle in batch {
            if let Some(previous) = self.toggle_group(toggle)
                && previous != group
            {
                self.detach(previous, toggle, notices);
            }
            if let Some(state) = self.toggles.get_mut(toggle) {
                state.group = Some(group);
            }
            if let Some(entry) = self.groups.get_mut(group)
                && !entry.contains(toggle)
            {
                entry.toggles.push(toggle);
            }

            if !self.is_selected(toggle) {
                continue;
            }
            if selection_taken {
                self.set_flag(toggle, false, notices);
            } else {
                selection_taken = true;
                self.select_in_group(group, Some(toggle), notices);
            }
        }
    }

    /// Remove `toggle` from `group`, forgetting it as the selection.
    fn detach(&mut self, group: ToggleGroupId, toggle: ToggleId, notices: &mut Vec<Notice>) {
        if let Some(entry) = self.groups.get_mut(group) {
            entry.toggles.retain(|&member| member != toggle);
        }
        if let Some(state) = self.toggles.get_mut(toggle)
            && state.group == Some(group)
        {
            state.group = None;
        }
        if self.selected_toggle(group) == Some(toggle) {
            self.record_selection(group, None, notices);
        }
    }

    /// Make `toggle` the only selected member, or deselect every member.
    fn select_in_group(&mut self, group: ToggleGroupId, toggle: Option<ToggleId>, notices: &mut Vec<Notice>) {
        let others: Vec<ToggleId> = self
            .toggles(group)
            .iter()
            .copied()
            .filter(|&member| Some(member) != toggle && self.is_selected(member))
            .collect();
        for other in others {
            self.set_flag(other, false, notices);
        }
        if let Some(toggle) = toggle {
            self.set_flag(toggle, true, notices);
        }
        self.record_selection(group, toggle, notices);
    }

    fn record_selection(&mut self, group: ToggleGroupId, toggle: Option<ToggleId>, notices: &mut Vec<Notice>) {
        let Some(entry) = self.groups.get_mut(group) else {
            return;
        };
        if entry.replace_selected(toggle) != toggle {
            tracing::trace!(target: targets::TOGGLE, ?toggle, "group selection changed");
            notices.push(Notice::GroupSelection(group, toggle));
        }
    }

    fn set_flag(&mut self, toggle: ToggleId, selected: bool, notices: &mut Vec<Notice>) {
        if let Some(state) = self.toggles.get_mut(toggle)
            && state.selected != selected
        {
            state.selected = selected;
            notices.push(Notice::Selected(toggle, selected));
        }
    }

    /// Emit collected notifications once the arena is consistent.
    fn publish(&self, notices: Vec<Notice>) {
        for notice in notices {
            match notice {
                Notice::Selected(toggle, selected) => self.selected_changed.emit((toggle, selected)),
                Notice::GroupSelection(group, toggle) => self.selected_toggle_changed.emit((group, toggle)),
            }
        }
    }
}

impl fmt::Debug for Toggles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toggles")
            .field("toggles", &self.toggles.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

// Ensure Toggles is Send + Sync
static_assertions::assert_impl_all!(Toggles: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn group_of(toggles: &mut Toggles, count: usize) -> (ToggleGroupId, Vec<ToggleId>) {
        let group = toggles.create_group();
        let ids: Vec<ToggleId> = (0..count).map(|_| toggles.create_toggle()).collect();
        toggles.add_toggles(group, &ids).unwrap();
        (group, ids)
    }

    fn selected_members(toggles: &Toggles, group: ToggleGroupId) -> Vec<ToggleId> {
        toggles
            .toggles(group)
            .iter()
            .copied()
            .filter(|&toggle| toggles.is_selected(toggle))
            .collect()
    }

    #[test]
    fn test_selecting_member_deselects_previous() {
        let mut toggles = Toggles::new();
        let (group, ids) = group_of(&mut toggles, 3);

        toggles.set_selected(ids[0], true).unwrap();
        toggles.select_toggle(group, Some(ids[2])).unwrap();
        assert_eq!(toggles.selected_toggle(group), Some(ids[2]));
        assert_eq!(selected_members(&toggles, group), vec![ids[2]]);

        toggles.select_toggle(group, None).unwrap();
        assert_eq!(toggles.selected_toggle(group), None);
        assert!(selected_members(&toggles, group).is_empty());
    }

    #[test]
    fn test_select_non_member_is_ignored() {
        let mut toggles = Toggles::new();
        let (group, ids) = group_of(&mut toggles, 2);
        let outsider = toggles.create_toggle();

        toggles.select_toggle(group, Some(ids[1])).unwrap();
        toggles.select_toggle(group, Some(outsider)).unwrap();
        assert_eq!(toggles.selected_toggle(group), Some(ids[1]));
        assert!(!toggles.is_selected(outsider));
    }

    #[test]
    fn test_duplicates_rejected_before_mutation() {
        let mut toggles = Toggles::new();
        let (group, ids) = group_of(&mut toggles, 1);
        let fresh = toggles.create_toggle();

        assert_eq!(
            toggles.add_toggles(group, &[fresh, ids[0]]),
            Err(ToggleError::Duplicate(ids[0]))
        );
        assert_eq!(toggles.add_toggles(group, &[fresh, fresh]), Err(ToggleError::Duplicate(fresh)));
        assert_eq!(toggles.toggles(group), &[ids[0]]);
        assert_eq!(toggles.toggle_group(fresh), None);
    }

    #[test]
    fn test_first_selected_newcomer_wins() {
        let mut toggles = Toggles::new();
        let (group, ids) = group_of(&mut toggles, 1);
        toggles.set_selected(ids[0], true).unwrap();

        let a = toggles.create_toggle();
        let b = toggles.create_toggle();
        toggles.set_selected(a, true).unwrap();
        toggles.set_selected(b, true).unwrap();

        toggles.add_toggles(group, &[a, b]).unwrap();
        assert_eq!(toggles.selected_toggle(group), Some(a));
        assert_eq!(selected_members(&toggles, group), vec![a]);
    }

    #[test]
    fn test_selected_toggle_moves_between_groups() {
        let mut toggles = Toggles::new();
        let (first, ids) = group_of(&mut toggles, 2);
        let (second, _) = group_of(&mut toggles, 2);
        let moving = ids[1];
        toggles.set_selected(moving, true).unwrap();

        toggles.add_toggle(second, moving).unwrap();
        assert_eq!(toggles.selected_toggle(first), None);
        assert_eq!(toggles.selected_toggle(second), Some(moving));
        assert!(toggles.is_selected(moving));
        assert_eq!(toggles.toggles(first), &[ids[0]]);
    }

    #[test]
    fn test_remove_selected_clears_group() {
        let mut toggles = Toggles::new();
        let (group, ids) = group_of(&mut toggles, 2);
        toggles.set_selected(ids[0], true).unwrap();

        assert!(toggles.remove_toggle(group, ids[0]).unwrap());
        assert_eq!(toggles.selected_toggle(group), None);
        assert!(toggles.is_selected(ids[0]));
        assert!(!toggles.remove_toggle(group, ids[0]).unwrap());
    }

    #[test]
    fn test_clear_selected_toggle_respects_selected_member() {
        let mut toggles = Toggles::new();
        let (group, ids) = group_of(&mut toggles, 2);
        toggles.set_selected(ids[1], true).unwrap();

        toggles.clear_selected_toggle(group).unwrap();
        assert_eq!(toggles.selected_toggle(group), Some(ids[1]));

        toggles.set_selected(ids[1], false).unwrap();
        assert_eq!(toggles.selected_toggle(group), None);
        toggles.clear_selected_toggle(group).unwrap();
        assert_eq!(toggles.selected_toggle(group), None);
    }

    #[test]
    fn test_set_toggles_keeps_first_occurrence() {
        let mut toggles = Toggles::new();
        let (group, ids) = group_of(&mut toggles, 3);
        toggles.set_selected(ids[0], true).unwrap();
        let fresh = toggles.create_toggle();

        toggles.set_toggles(group, &[ids[2], fresh, ids[2], ids[1]]).unwrap();
        assert_eq!(toggles.toggles(group), &[ids[2], fresh, ids[1]]);
        assert_eq!(toggles.toggle_group(ids[0]), None);
        assert_eq!(toggles.selected_toggle(group), None);
        assert_eq!(toggles.toggle_group(fresh), Some(group));
    }

    #[test]
    fn test_set_toggle_group_and_destroy() {
        let mut toggles = Toggles::new();
        let group = toggles.create_group();
        let toggle = toggles.create_toggle();

        toggles.set_toggle_group(toggle, Some(group)).unwrap();
        toggles.set_toggle_group(toggle, Some(group)).unwrap();
        assert_eq!(toggles.toggles(group), &[toggle]);

        toggles.set_toggle_group(toggle, None).unwrap();
        assert!(toggles.toggles(group).is_empty());

        toggles.add_toggle(group, toggle).unwrap();
        toggles.set_selected(toggle, true).unwrap();
        toggles.destroy_toggle(toggle).unwrap();
        assert_eq!(toggles.selected_toggle(group), None);
        assert!(!toggles.contains_toggle(toggle));
        assert_eq!(toggles.set_selected(toggle, true), Err(ToggleError::UnknownToggle(toggle)));

        toggles.destroy_group(group).unwrap();
        assert_eq!(toggles.destroy_group(group), Err(ToggleError::UnknownGroup));
    }

    #[test]
    fn test_signals_follow_changes() {
        let mut toggles = Toggles::new();
        let (_, ids) = group_of(&mut toggles, 2);
        let flags = Arc::new(Mutex::new(Vec::new()));
        let selections = Arc::new(Mutex::new(Vec::new()));

        let f = flags.clone();
        toggles.selected_changed.connect(move |&change| f.lock().push(change));
        let s = selections.clone();
        toggles.selected_toggle_changed.connect(move |&(_, selected)| s.lock().push(selected));

        toggles.set_selected(ids[0], true).unwrap();
        toggles.set_selected(ids[1], true).unwrap();

        assert_eq!(*flags.lock(), vec![(ids[0], true), (ids[0], false), (ids[1], true)]);
        assert_eq!(*selections.lock(), vec![Some(ids[0]), Some(ids[1])]);
    }
}
