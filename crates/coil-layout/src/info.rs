//! Per-component bookkeeping and linked-size groups.

use std::collections::HashMap;

use coil_core::{Axis, ComponentId, Container};
use slab::Slab;

use crate::spring::SpringId;

/// What the engine knows about one component.
#[derive(Debug, Clone)]
pub(crate) struct ComponentInfo {
    pub horizontal: Option<SpringId>,
    pub vertical: Option<SpringId>,
    pub visible: bool,
    /// Per-component override of the layout-wide visibility flag
    pub honors_visibility: Option<bool>,
}

impl Default for ComponentInfo {
    fn default() -> Self {
        Self {
            horizontal: None,
            vertical: None,
            visible: true,
            honors_visibility: None,
        }
    }
}

impl ComponentInfo {
    pub fn spring(&self, axis: Axis) -> Option<SpringId> {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn set_spring(&mut self, axis: Axis, spring: Option<SpringId>) {
        match axis {
            Axis::Horizontal => self.horizontal = spring,
            Axis::Vertical => self.vertical = spring,
        }
    }

    /// Re-read visibility from the host. Returns true if it changed.
    pub fn update_visibility(&mut self, id: ComponentId, host: &dyn Container, honors_default: bool) -> bool {
        let honors = self.honors_visibility.unwrap_or(honors_default);
        let visible = if honors {
            host.component(id).map_or(true, |component| component.is_visible())
        } else {
            true
        };
        if visible != self.visible {
            self.visible = visible;
            return true;
        }
        false
    }
}

/// Components along one axis that must share a size.
#[derive(Debug, Clone, Default)]
pub(crate) struct LinkGroup {
    pub members: Vec<ComponentId>,
    /// Shared size, memoized until invalidated
    pub size: Option<i32>,
}

/// Disjoint sets of linked components for one axis.
#[derive(Debug, Clone, Default)]
pub(crate) struct AxisLinks {
    groups: Slab<LinkGroup>,
    member_of: HashMap<ComponentId, usize>,
}

impl AxisLinks {
    pub fn is_linked(&self, id: ComponentId) -> bool {
        self.member_of.contains_key(&id)
    }

    pub fn group_of(&self, id: ComponentId) -> Option<&LinkGroup> {
        self.member_of.get(&id).and_then(|&key| self.groups.get(key))
    }

    pub fn group_of_mut(&mut self, id: ComponentId) -> Option<&mut LinkGroup> {
        let key = *self.member_of.get(&id)?;
        self.groups.get_mut(key)
    }

    /// Union every component in `ids` into the group of the last one.
    pub fn link(&mut self, ids: &[ComponentId]) {
        let Some((&master, rest)) = ids.split_last() else {
            return;
        };
        let master_key = match self.member_of.get(&master) {
            Some(&key) => key,
            None => {
                let key = self.groups.insert(LinkGroup {
                    members: vec![master],
                    size: None,
                });
                self.member_of.insert(master, key);
                key
            }
        };
        for &id in rest.iter().rev() {
            match self.member_of.get(&id).copied() {
                None => {
                    self.groups[master_key].members.push(id);
                    self.member_of.insert(id, master_key);
                }
                Some(key) if key != master_key => {
                    let merged = self.groups.remove(key);
                    for &member in &merged.members {
                        self.member_of.insert(member, master_key);
                    }
                    self.groups[master_key].members.extend(merged.members);
                }
                Some(_) => {}
            }
        }
        self.groups[master_key].size = None;
    }

    /// Take `id` out of its group; a group left with one member dissolves.
    pub fn remove(&mut self, id: ComponentId) {
        let Some(key) = self.member_of.remove(&id) else {
            return;
        };
        let group = &mut self.groups[key];
        group.members.retain(|&member| member != id);
        group.size = None;
        if group.members.len() <= 1 {
            let group = self.groups.remove(key);
            for member in group.members {
                self.member_of.remove(&member);
            }
        }
    }

    pub fn rename(&mut self, from: ComponentId, to: ComponentId) {
        if let Some(key) = self.member_of.remove(&from) {
            for member in &mut self.groups[key].members {
                if *member == from {
                    *member = to;
                }
            }
            self.member_of.insert(to, key);
        }
    }

    pub fn clear_cached_sizes(&mut self) {
        for (_, group) in self.groups.iter_mut() {
            group.size = None;
        }
    }
}

/// Link groups for both axes.
#[derive(Debug, Clone, Default)]
pub(crate) struct LinkSets {
    pub horizontal: AxisLinks,
    pub vertical: AxisLinks,
}

impl LinkSets {
    pub fn axis(&self, axis: Axis) -> &AxisLinks {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisLinks {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    pub fn is_linked(&self, axis: Axis, id: ComponentId) -> bool {
        self.axis(axis).is_linked(id)
    }

    pub fn remove(&mut self, id: ComponentId) {
        self.horizontal.remove(id);
        self.vertical.remove(id);
    }

    pub fn rename(&mut self, from: ComponentId, to: ComponentId) {
        self.horizontal.rename(from, to);
        self.vertical.rename(from, to);
    }

    pub fn clear_cached_sizes(&mut self) {
        self.horizontal.clear_cached_sizes();
        self.vertical.clear_cached_sizes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<ComponentId> {
        raw.iter().map(|&n| ComponentId(n)).collect()
    }

    #[test]
    fn test_link_creates_single_group() {
        let mut links = AxisLinks::default();
        links.link(&ids(&[1, 2, 3]));
        let group = links.group_of(ComponentId(1)).unwrap();
        assert_eq!(group.members.len(), 3);
        assert!(links.is_linked(ComponentId(3)));
    }

    #[test]
    fn test_link_merges_existing_groups() {
        let mut links = AxisLinks::default();
        links.link(&ids(&[1, 2]));
        links.link(&ids(&[3, 4]));
        links.link(&ids(&[2, 4]));
        let group = links.group_of(ComponentId(1)).unwrap();
        let mut members = group.members.clone();
        members.sort();
        assert_eq!(members, ids(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_remove_dissolves_pair() {
        let mut links = AxisLinks::default();
        links.link(&ids(&[1, 2]));
        links.remove(ComponentId(1));
        assert!(!links.is_linked(ComponentId(1)));
        assert!(!links.is_linked(ComponentId(2)));
    }

    #[test]
    fn test_remove_keeps_larger_group() {
        let mut links = AxisLinks::default();
        links.link(&ids(&[1, 2, 3]));
        links.remove(ComponentId(2));
        assert!(links.is_linked(ComponentId(1)));
        assert!(links.is_linked(ComponentId(3)));
        assert_eq!(links.group_of(ComponentId(3)).unwrap().members.len(), 2);
    }

    #[test]
    fn test_rename_moves_membership() {
        let mut links = LinkSets::default();
        links.horizontal.link(&ids(&[1, 2]));
        links.rename(ComponentId(1), ComponentId(9));
        assert!(links.is_linked(Axis::Horizontal, ComponentId(9)));
        assert!(!links.is_linked(Axis::Horizontal, ComponentId(1)));
        assert!(!links.is_linked(Axis::Vertical, ComponentId(9)));
    }

    #[test]
    fn test_link_single_component_is_linked_alone() {
        let mut links = AxisLinks::default();
        links.link(&ids(&[5]));
        assert!(links.is_linked(ComponentId(5)));
    }
}
