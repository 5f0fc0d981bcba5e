//! Automatic padding.
//!
//! Padding springs size themselves from the live positions of the
//! components around them. Insertion walks a tree once per structural
//! change, threading the components and padding springs that lead into
//! each position, and records for every padding spring which components
//! it separates. Calculation then runs after a provisional layout and
//! grows each padding spring to whatever the gap style asks for.

use tracing::{trace, warn};

use coil_core::{Axis, ComponentId, ComponentPlacement, Edge};

use crate::solver::Solver;
use crate::spring::{AutoGapSpring, SizeType, Spring, SpringId, SpringKind};
use crate::tree::Tree;

/// Gap used when a component vanished from the host after validation.
const FALLBACK_GAP: i32 = 10;

impl Tree {
    /// Drop synthesized padding and forget everything learned by the last
    /// insertion. Returns how many springs were removed.
    pub fn remove_autopadding(&mut self, group: SpringId) -> usize {
        self.spring_mut(group).unset();
        let mut removed = 0;
        for index in (0..self.child_count(group)).rev() {
            let child = self.child(group, index);
            if matches!(&self.spring(child).kind, SpringKind::AutoGap(gap) if !gap.user_created) {
                self.remove_child(group, index);
                removed += 1;
                continue;
            }
            match &mut self.spring_mut(child).kind {
                SpringKind::AutoGap(gap) => gap.reset(),
                SpringKind::ContainerGap(gap) => gap.reset(),
                SpringKind::Sequential(_) | SpringKind::Parallel(_) | SpringKind::Baseline(_) => {
                    removed += self.remove_autopadding(child);
                }
                _ => {}
            }
        }
        removed
    }

    /// Clear the memoized sizes of groups and padding springs, leaving
    /// component sizes alone.
    pub fn unset_autopadding(&mut self, group: SpringId) {
        self.spring_mut(group).unset();
        for index in (0..self.child_count(group)).rev() {
            let child = self.child(group, index);
            let spring = self.spring_mut(child);
            if spring.is_autopadding() {
                spring.unset();
            } else if spring.is_group() {
                self.unset_autopadding(child);
            }
        }
    }
}

/// Springs leading into, or trailing out of, a position in the tree.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    pub padding: Vec<SpringId>,
    pub components: Vec<SpringId>,
}

impl Solver<'_> {
    /// Wire padding springs to their neighbors, inserting new padding
    /// between adjacent components when `insert` is set.
    ///
    /// `leading` holds what precedes the group; whatever trails out of the
    /// group is appended to `trailing`. Returns the number of springs
    /// inserted.
    pub fn insert_autopadding(
        &mut self,
        group: SpringId,
        axis: Axis,
        leading: &Frontier,
        trailing: &mut Frontier,
        insert: bool,
    ) -> usize {
        if self.tree.spring(group).is_parallel() {
            return self.insert_parallel_autopadding(group, axis, leading, trailing, insert);
        }
        let mut inserted = 0;
        let mut lead = Frontier {
            padding: leading.padding.clone(),
            components: leading.components.clone(),
        };
        let mut inner = Frontier::default();
        let mut index = 0;
        // The child count changes as padding is inserted
        while index < self.tree.child_count(group) {
            let child = self.tree.child(group, index);
            let spring = self.tree.spring(child);
            if spring.is_autopadding() {
                if lead.padding.is_empty() {
                    let is_container = matches!(spring.kind, SpringKind::ContainerGap(_));
                    self.set_sources(child, &lead.components);
                    lead.components.clear();
                    index = self.next_non_zero(group, index + 1, true);
                    if index == self.tree.child_count(group) {
                        if !is_container {
                            trailing.padding.push(child);
                        }
                    } else {
                        lead.padding.clear();
                        lead.padding.push(child);
                    }
                } else {
                    index = self.next_non_zero(group, index + 1, true);
                }
                continue;
            }
            if !lead.components.is_empty() && lead.padding.is_empty() && insert {
                // Revisit this index so the new padding is wired up
                self.tree
                    .insert_child(group, index, Spring::new(SpringKind::AutoGap(AutoGapSpring::synthesized())));
                inserted += 1;
                continue;
            }
            match &spring.kind {
                SpringKind::Component(component) => {
                    if !self.is_visible(component.component) {
                        index += 1;
                        continue;
                    }
                    for gap in lead.padding.clone() {
                        self.add_target(gap, child, axis);
                    }
                    lead.components.clear();
                    lead.padding.clear();
                    index = self.next_non_zero(group, index + 1, false);
                    if index == self.tree.child_count(group) {
                        trailing.components.push(child);
                    } else {
                        lead.components.push(child);
                    }
                }
                SpringKind::Sequential(_) | SpringKind::Parallel(_) | SpringKind::Baseline(_) => {
                    inner.components.clear();
                    inner.padding.clear();
                    inserted += self.insert_autopadding(child, axis, &lead, &mut inner, insert);
                    lead.components.clear();
                    lead.padding.clear();
                    index = self.next_non_zero(group, index + 1, inner.components.is_empty());
                    if index == self.tree.child_count(group) {
                        trailing.components.extend_from_slice(&inner.components);
                        trailing.padding.extend_from_slice(&inner.padding);
                    } else {
                        lead.components.extend_from_slice(&inner.components);
                        lead.padding.extend_from_slice(&inner.padding);
                    }
                }
                // Explicit gaps break adjacency
                _ => {
                    lead.padding.clear();
                    lead.components.clear();
                    index += 1;
                }
            }
        }
        inserted
    }

    fn insert_parallel_autopadding(
        &mut self,
        group: SpringId,
        axis: Axis,
        leading: &Frontier,
        trailing: &mut Frontier,
        insert: bool,
    ) -> usize {
        let mut inserted = 0;
        for child in self.tree.children(group).to_vec() {
            match &self.tree.spring(child).kind {
                SpringKind::Component(component) => {
                    if self.is_visible(component.component) {
                        for &gap in &leading.padding {
                            self.add_target(gap, child, axis);
                        }
                        trailing.components.push(child);
                    }
                }
                SpringKind::Sequential(_) | SpringKind::Parallel(_) | SpringKind::Baseline(_) => {
                    inserted += self.insert_autopadding(child, axis, leading, trailing, insert);
                }
                SpringKind::AutoGap(_) | SpringKind::ContainerGap(_) => {
                    self.set_sources(child, &leading.components);
                    trailing.padding.push(child);
                }
                _ => {}
            }
        }
        inserted
    }

    /// Index of the first child at or after `index` that can take up
    /// space, or the child count.
    fn next_non_zero(&self, group: SpringId, mut index: usize, padding_is_empty: bool) -> usize {
        let children = self.tree.children(group);
        while index < children.len() && self.will_have_zero_size(children[index], padding_is_empty) {
            index += 1;
        }
        index
    }

    fn set_sources(&mut self, gap: SpringId, sources: &[SpringId]) {
        match &mut self.tree.spring_mut(gap).kind {
            SpringKind::AutoGap(gap) => gap.sources = sources.iter().copied().collect(),
            SpringKind::ContainerGap(gap) => gap.sources = sources.iter().copied().collect(),
            _ => {}
        }
    }

    /// Tell a padding spring that `target` follows it.
    fn add_target(&mut self, gap: SpringId, target: SpringId, axis: Axis) {
        let sources = match &mut self.tree.spring_mut(gap).kind {
            SpringKind::ContainerGap(container) => {
                container.targets.push(target);
                return;
            }
            SpringKind::AutoGap(auto) => auto.sources.clone(),
            _ => return,
        };
        // Only components that overlap on the other axis are neighbors
        for &source in sources.iter().rev() {
            if self.are_parallel_siblings(source, target, axis.other()) {
                if let SpringKind::AutoGap(auto) = &mut self.tree.spring_mut(gap).kind {
                    auto.matches.push((source, target));
                }
            }
        }
    }

    /// True if the components behind two component springs share an
    /// ancestor along `axis` at or above which some group is parallel.
    fn are_parallel_siblings(&self, source: SpringId, target: SpringId, axis: Axis) -> bool {
        let (Some(source), Some(target)) = (self.tree.spring(source).component(), self.tree.spring(target).component())
        else {
            return false;
        };
        let (Some(source), Some(target)) = (
            self.tree.component_spring(source, axis),
            self.tree.component_spring(target, axis),
        ) else {
            return false;
        };
        let source_path: Vec<SpringId> = self.tree.ancestors(source).collect();
        let Some(common) = self.tree.ancestors(target).find(|spring| source_path.contains(spring)) else {
            return false;
        };
        std::iter::once(common)
            .chain(self.tree.ancestors(common))
            .any(|spring| self.tree.spring(spring).is_parallel())
    }

    /// Recompute every padding spring below `group` from the current
    /// positions of its neighbors.
    pub fn calculate_autopadding(&mut self, group: SpringId, axis: Axis) {
        for index in (0..self.tree.child_count(group)).rev() {
            let child = self.tree.child(group, index);
            let spring = self.tree.spring_mut(child);
            if spring.is_autopadding() {
                spring.unset();
                self.calculate_padding(child, axis);
            } else if spring.is_group() {
                self.calculate_autopadding(child, axis);
            }
        }
        self.tree.spring_mut(group).unset();
    }

    fn calculate_padding(&mut self, id: SpringId, axis: Axis) {
        let (size, max_padding, last_size) = match &self.tree.spring(id).kind {
            SpringKind::AutoGap(gap) => {
                let (placement, matches, last_size) = (gap.placement, gap.matches.clone(), gap.last_size);
                let (size, max_padding) = self.padding_between(&matches, placement, axis);
                (size, max_padding, last_size)
            }
            SpringKind::ContainerGap(gap) => {
                let (sources, targets, last_size) = (gap.sources.clone(), gap.targets.clone(), gap.last_size);
                let (size, max_padding) = if targets.is_empty() {
                    self.trailing_container_padding(id, &sources, axis)
                } else {
                    self.leading_container_padding(&targets, axis)
                };
                (size, max_padding, last_size)
            }
            _ => return,
        };
        // Damp against the size the spring had in the provisional layout
        let computed = match last_size {
            Some(last) => size + max_padding.min(last),
            None => size,
        };
        trace!(spring = id.0, %axis, computed, max_padding, "padding");
        match &mut self.tree.spring_mut(id).kind {
            SpringKind::AutoGap(gap) => gap.computed = computed,
            SpringKind::ContainerGap(gap) => gap.computed = computed,
            _ => {}
        }
    }

    /// Shortfall between matched components, and the largest gap asked for.
    fn padding_between(&self, matches: &[(SpringId, SpringId)], placement: ComponentPlacement, axis: Axis) -> (i32, i32) {
        let edge = match axis {
            Axis::Horizontal if self.ltr => Edge::East,
            Axis::Horizontal => Edge::West,
            Axis::Vertical => Edge::South,
        };
        let mut size = 0;
        let mut max_padding = 0;
        for &(source, target) in matches.iter().rev() {
            let (source, target) = (self.tree.spring(source), self.tree.spring(target));
            let delta = target.origin - (source.origin + source.size.unwrap_or(0));
            if delta < 0 {
                continue;
            }
            let (Some(first), Some(second)) = (source.component(), target.component()) else {
                continue;
            };
            let padding = self.preferred_gap(first, second, placement, edge);
            if padding > delta {
                size = size.max(padding - delta);
            }
            max_padding = max_padding.max(padding);
        }
        (size, max_padding)
    }

    fn leading_container_padding(&self, targets: &[SpringId], axis: Axis) -> (i32, i32) {
        let edge = match axis {
            Axis::Horizontal if self.ltr => Edge::West,
            Axis::Horizontal => Edge::East,
            // The leading vertical gap sits against the top edge, never South
            Axis::Vertical => Edge::North,
        };
        let mut size = 0;
        let mut max_padding = 0;
        for &target in targets.iter().rev() {
            let spring = self.tree.spring(target);
            let padding = spring
                .component()
                .map_or(FALLBACK_GAP, |component| self.container_gap(component, edge));
            max_padding = max_padding.max(padding);
            size = size.max(padding - spring.origin);
        }
        (size, max_padding)
    }

    fn trailing_container_padding(&self, id: SpringId, sources: &[SpringId], axis: Axis) -> (i32, i32) {
        let edge = match axis {
            Axis::Horizontal if self.ltr => Edge::East,
            Axis::Horizontal => Edge::West,
            Axis::Vertical => Edge::South,
        };
        let far_edge = self.tree.spring(id).parent.map_or(0, |parent| {
            let parent = self.tree.spring(parent);
            parent.origin + parent.size.unwrap_or(0)
        });
        let mut size = 0;
        let mut max_padding = 0;
        for &source in sources.iter().rev() {
            let spring = self.tree.spring(source);
            let padding = spring
                .component()
                .map_or(FALLBACK_GAP, |component| self.container_gap(component, edge));
            let delta = (far_edge - spring.size.unwrap_or(0) - spring.origin).max(0);
            size = size.max(padding - delta);
            max_padding = max_padding.max(padding);
        }
        (size, max_padding)
    }

    fn preferred_gap(&self, first: ComponentId, second: ComponentId, placement: ComponentPlacement, edge: Edge) -> i32 {
        match (self.host.component(first), self.host.component(second)) {
            (Some(a), Some(b)) => self.style.preferred_gap(a, b, placement, edge),
            _ => {
                warn!(%first, %second, "component missing from host, using fallback gap");
                FALLBACK_GAP
            }
        }
    }

    fn container_gap(&self, component: ComponentId, edge: Edge) -> i32 {
        match self.host.component(component) {
            Some(component) => self.style.container_gap(component, edge),
            None => {
                warn!(%component, "component missing from host, using fallback gap");
                FALLBACK_GAP
            }
        }
    }

    /// Gap between two named components; explicit preferred gaps always
    /// measure toward the east or south.
    pub(crate) fn explicit_gap(
        &self,
        first: ComponentId,
        second: ComponentId,
        placement: ComponentPlacement,
        axis: Axis,
    ) -> i32 {
        let edge = match axis {
            Axis::Horizontal => Edge::East,
            Axis::Vertical => Edge::South,
        };
        self.preferred_gap(first, second, placement, edge)
    }

    /// Provisionally lay out a top-level group and size its padding.
    ///
    /// With `size_type` set the group is laid out at that size of its own;
    /// otherwise at `size`.
    pub fn autopad(&mut self, group: SpringId, axis: Axis, size_type: Option<SizeType>, size: i32) {
        self.tree.unset_autopadding(group);
        let size = match size_type {
            Some(size_type) => self.size(group, axis, size_type),
            None => size,
        };
        self.set_size(group, axis, 0, size);
        self.calculate_autopadding(group, axis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Installer, ParallelGroup, SequentialGroup};
    use crate::panel::{Panel, Widget};
    use coil_core::{DefaultGapStyle, Size};

    struct Fixture {
        tree: Tree,
        panel: Panel,
        horizontal: SpringId,
        vertical: SpringId,
    }

    impl Fixture {
        fn new(
            panel: Panel,
            horizontal: impl Into<crate::builder::Group>,
            vertical: impl Into<crate::builder::Group>,
        ) -> Self {
            let mut tree = Tree::new();
            let (horizontal, installed) = Installer::new(&mut tree, Axis::Horizontal)
                .install(&horizontal.into())
                .unwrap();
            let (vertical, _) = Installer::new(&mut tree, Axis::Vertical)
                .install(&vertical.into())
                .unwrap();
            for id in installed.components {
                tree.info_mut(id);
            }
            tree.register_components(horizontal, Axis::Horizontal);
            tree.register_components(vertical, Axis::Vertical);
            Self {
                tree,
                panel,
                horizontal,
                vertical,
            }
        }

        fn run<R>(&mut self, f: impl FnOnce(&mut Solver<'_>, SpringId, SpringId) -> R) -> R {
            let style = DefaultGapStyle::default();
            let (h, v) = (self.horizontal, self.vertical);
            let mut solver = Solver::new(&mut self.tree, &self.panel, &style, true);
            f(&mut solver, h, v)
        }

        fn insert(&mut self, insert: bool) -> usize {
            self.run(|solver, h, v| {
                let mut horizontal = Frontier::default();
                let mut vertical = Frontier::default();
                solver.insert_autopadding(h, Axis::Horizontal, &Frontier::default(), &mut horizontal, insert)
                    + solver.insert_autopadding(v, Axis::Vertical, &Frontier::default(), &mut vertical, insert)
            })
        }
    }

    fn square() -> Widget {
        Widget::fixed(Size::new(20, 20))
    }

    fn two_in_a_row() -> Fixture {
        let mut panel = Panel::new();
        let a = panel.add(square());
        let b = panel.add(square());
        Fixture::new(
            panel,
            SequentialGroup::new().component(a).component(b),
            ParallelGroup::new().component(a).component(b),
        )
    }

    #[test]
    fn test_insert_between_adjacent_components() {
        let mut fx = two_in_a_row();
        assert_eq!(fx.insert(true), 1);
        assert_eq!(fx.tree.child_count(fx.horizontal), 3);
        let gap = fx.tree.child(fx.horizontal, 1);
        match &fx.tree.spring(gap).kind {
            SpringKind::AutoGap(auto) => {
                assert!(!auto.user_created);
                assert_eq!(auto.matches.len(), 1);
            }
            _ => panic!("expected padding"),
        }
    }

    #[test]
    fn test_insert_is_undone_by_remove() {
        let mut fx = two_in_a_row();
        fx.insert(true);
        assert_eq!(fx.tree.remove_autopadding(fx.horizontal), 1);
        assert_eq!(fx.tree.child_count(fx.horizontal), 2);
        // inserting again gives the same shape
        assert_eq!(fx.insert(true), 1);
        assert_eq!(fx.tree.child_count(fx.horizontal), 3);
    }

    #[test]
    fn test_no_insert_without_flag() {
        let mut fx = two_in_a_row();
        assert_eq!(fx.insert(false), 0);
        assert_eq!(fx.tree.child_count(fx.horizontal), 2);
    }

    #[test]
    fn test_padding_grows_to_style_gap() {
        let mut fx = two_in_a_row();
        fx.insert(true);
        let width = fx.run(|solver, h, _| {
            solver.autopad(h, Axis::Horizontal, Some(SizeType::Preferred), 0);
            solver.preferred(h, Axis::Horizontal)
        });
        assert_eq!(width, 46);
    }

    #[test]
    fn test_stacked_components_are_not_neighbors() {
        let mut panel = Panel::new();
        let a = panel.add(square());
        let b = panel.add(square());
        // a above b: horizontally they overlap only through a sequence
        let mut fx = Fixture::new(
            panel,
            SequentialGroup::new().component(a).component(b),
            SequentialGroup::new().component(a).component(b),
        );
        fx.insert(true);
        let gap = fx.tree.child(fx.horizontal, 1);
        match &fx.tree.spring(gap).kind {
            SpringKind::AutoGap(auto) => assert!(auto.matches.is_empty()),
            _ => panic!("expected padding"),
        }
    }

    #[test]
    fn test_invisible_component_is_skipped() {
        let mut panel = Panel::new();
        let a = panel.add(square());
        let hidden = panel.add(square().with_visible(false));
        let b = panel.add(square());
        let mut fx = Fixture::new(
            panel,
            SequentialGroup::new().component(a).component(hidden).component(b),
            ParallelGroup::new().component(a).component(hidden).component(b),
        );
        fx.tree.info_mut(hidden).visible = false;
        assert_eq!(fx.insert(true), 1);
        assert_eq!(fx.tree.child_count(fx.horizontal), 4);
    }

    #[test]
    fn test_user_gap_wired_not_duplicated() {
        let mut panel = Panel::new();
        let a = panel.add(square());
        let b = panel.add(square());
        let mut fx = Fixture::new(
            panel,
            SequentialGroup::new()
                .component(a)
                .preferred_gap(ComponentPlacement::Unrelated)
                .component(b),
            ParallelGroup::new().component(a).component(b),
        );
        assert_eq!(fx.insert(true), 0);
        let width = fx.run(|solver, h, _| {
            solver.autopad(h, Axis::Horizontal, Some(SizeType::Preferred), 0);
            solver.preferred(h, Axis::Horizontal)
        });
        assert_eq!(width, 52);
        // user gaps survive removal
        assert_eq!(fx.tree.remove_autopadding(fx.horizontal), 0);
        assert_eq!(fx.tree.child_count(fx.horizontal), 3);
    }
}
