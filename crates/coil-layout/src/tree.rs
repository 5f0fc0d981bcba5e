//! Spring tree storage.
//!
//! Springs of both axes live in one arena. Groups own their children by
//! index; the `parent` index on each spring is a non-owning back link used
//! for ancestor walks.

use indexmap::IndexMap;
use slab::Slab;
use tracing::debug;

use coil_core::{Axis, ComponentId};

use crate::info::{ComponentInfo, LinkSets};
use crate::spring::{BaselineSpring, ParallelSpring, Spring, SpringId, SpringKind};

/// Arena of springs plus the per-component tables that point into it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tree {
    springs: Slab<Spring>,
    /// Components in registration order
    pub infos: IndexMap<ComponentId, ComponentInfo>,
    pub links: LinkSets,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spring(&self, id: SpringId) -> &Spring {
        &self.springs[id.0]
    }

    pub fn spring_mut(&mut self, id: SpringId) -> &mut Spring {
        &mut self.springs[id.0]
    }

    /// Add a parentless spring.
    pub fn insert(&mut self, spring: Spring) -> SpringId {
        SpringId(self.springs.insert(spring))
    }

    /// Append a spring to a group.
    pub fn add_child(&mut self, parent: SpringId, mut spring: Spring) -> SpringId {
        spring.parent = Some(parent);
        let id = self.insert(spring);
        if let Some(children) = self.spring_mut(parent).children_mut() {
            children.push(id);
        }
        id
    }

    /// Insert a spring into a group before `index`.
    pub fn insert_child(&mut self, parent: SpringId, index: usize, mut spring: Spring) -> SpringId {
        spring.parent = Some(parent);
        let id = self.insert(spring);
        if let Some(children) = self.spring_mut(parent).children_mut() {
            children.insert(index, id);
        }
        id
    }

    /// Re-home an existing parentless spring at the end of a group.
    pub fn adopt(&mut self, parent: SpringId, child: SpringId) {
        self.spring_mut(child).parent = Some(parent);
        if let Some(children) = self.spring_mut(parent).children_mut() {
            children.push(child);
        }
    }

    pub fn children(&self, id: SpringId) -> &[SpringId] {
        self.spring(id).children().unwrap_or(&[])
    }

    pub fn child_count(&self, id: SpringId) -> usize {
        self.children(id).len()
    }

    pub fn child(&self, id: SpringId, index: usize) -> SpringId {
        self.children(id)[index]
    }

    /// Remove the child at `index` from a group and free it with its subtree.
    pub fn remove_child(&mut self, parent: SpringId, index: usize) {
        let removed = self
            .spring_mut(parent)
            .children_mut()
            .map(|children| children.remove(index));
        if let Some(child) = removed {
            self.free(child);
        }
    }

    /// Detach a spring from its parent and free it with its subtree.
    pub fn detach(&mut self, id: SpringId) {
        self.unparent(id);
        self.free(id);
    }

    /// Take a spring out of its parent group without freeing it.
    pub fn unparent(&mut self, id: SpringId) {
        let Some(parent) = self.spring_mut(id).parent.take() else {
            return;
        };
        match &mut self.spring_mut(parent).kind {
            SpringKind::Sequential(group) => {
                group.children.retain(|&child| child != id);
                if group.baseline_child == Some(id) {
                    group.baseline_child = None;
                }
            }
            SpringKind::Parallel(ParallelSpring { children, .. })
            | SpringKind::Baseline(BaselineSpring { children, .. }) => {
                children.retain(|&child| child != id);
            }
            _ => {}
        }
    }

    /// Free a spring and everything below it.
    pub fn free(&mut self, id: SpringId) {
        let spring = self.springs.remove(id.0);
        if let Some(children) = spring.children() {
            for &child in children {
                self.free(child);
            }
        }
    }

    /// Forget resolved and memoized sizes of a whole subtree.
    ///
    /// The resolved size is dropped before each node is unset, so padding
    /// springs carry no previous size into the next calculation.
    pub fn unset_tree(&mut self, id: SpringId) {
        let spring = self.spring_mut(id);
        spring.size = None;
        spring.unset();
        for index in 0..self.child_count(id) {
            let child = self.child(id, index);
            self.unset_tree(child);
        }
    }

    /// Parent chain of a spring, nearest first.
    pub fn ancestors(&self, id: SpringId) -> impl Iterator<Item = SpringId> + '_ {
        std::iter::successors(self.spring(id).parent, move |&parent| self.spring(parent).parent)
    }

    /// Look up or create the bookkeeping for a component.
    pub fn info_mut(&mut self, id: ComponentId) -> &mut ComponentInfo {
        self.infos.entry(id).or_default()
    }

    /// The registered spring of a component along an axis.
    pub fn component_spring(&self, id: ComponentId, axis: Axis) -> Option<SpringId> {
        self.infos.get(&id).and_then(|info| info.spring(axis))
    }

    /// Bind every component spring below `group` to its component's info.
    pub fn register_components(&mut self, group: SpringId, axis: Axis) {
        for index in (0..self.child_count(group)).rev() {
            let child = self.child(group, index);
            let (component, is_group) = {
                let spring = self.spring(child);
                (spring.component(), spring.is_group())
            };
            if let Some(component) = component {
                self.info_mut(component).set_spring(axis, Some(child));
            } else if is_group {
                self.register_components(child, axis);
            }
        }
    }

    /// Forget the registered springs of one axis.
    pub fn clear_registrations(&mut self, axis: Axis) {
        for info in self.infos.values_mut() {
            info.set_spring(axis, None);
        }
    }

    /// Drop components that no longer appear on either axis.
    pub fn prune_unregistered(&mut self) -> usize {
        let stale: Vec<ComponentId> = self
            .infos
            .iter()
            .filter(|(_, info)| info.horizontal.is_none() && info.vertical.is_none())
            .map(|(&id, _)| id)
            .collect();
        for id in &stale {
            if Axis::ALL.iter().any(|&axis| self.links.is_linked(axis, *id)) {
                debug!(component = %id, "linked component left both groups, unlinking");
            }
            self.infos.shift_remove(id);
            self.links.remove(*id);
        }
        stale.len()
    }

    /// Point every spring and link naming `from` at `to` instead.
    pub fn rename_component(&mut self, from: ComponentId, to: ComponentId) {
        for (_, spring) in self.springs.iter_mut() {
            match &mut spring.kind {
                SpringKind::Component(component) if component.component == from => {
                    component.component = to;
                    component.baseline = None;
                }
                SpringKind::PreferredGap(gap) => {
                    if gap.source == from {
                        gap.source = to;
                    }
                    if gap.target == from {
                        gap.target = to;
                    }
                }
                _ => {}
            }
        }
        self.links.rename(from, to);
    }

    /// Number of live springs.
    pub fn len(&self) -> usize {
        self.springs.len()
    }
}
