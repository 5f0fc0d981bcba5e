//! The layout manager.
//!
//! `GroupLayout` owns one horizontal and one vertical spring tree over the
//! same set of components. Every query first brings the trees up to date:
//! cached sizes are dropped after `invalidate`, components are bound to
//! their springs after a structural change, and automatic padding is
//! rebuilt whenever the structure or visibility changed.

use tracing::{debug, trace_span};

use coil_core::{Alignment, Axis, ComponentId, Container, DefaultGapStyle, Extent, GapStyle, LayoutError, Rect, Size};

use crate::autopadding::Frontier;
use crate::builder::{Group, Installer};
use crate::options::LayoutOptions;
use crate::solver::Solver;
use crate::spring::{ContainerGapSpring, ParallelSpring, SequentialSpring, SizeType, Spring, SpringId, SpringKind};
use crate::tree::Tree;

/// Lays out a host's components along two independent spring trees.
pub struct GroupLayout {
    tree: Tree,
    /// Top-level springs, wrapping the roots in container gaps when enabled
    horizontal: SpringId,
    vertical: SpringId,
    horizontal_root: SpringId,
    vertical_root: SpringId,
    options: LayoutOptions,
    style: Box<dyn GapStyle>,
    /// Structure changed since components were last registered
    springs_changed: bool,
    /// Cached sizes are current
    valid: bool,
    /// A tree holds user-created preferred or container gaps
    has_preferred_padding: bool,
}

impl Default for GroupLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GroupLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupLayout")
            .field("options", &self.options)
            .field("components", &self.tree.infos.len())
            .field("springs", &self.tree.len())
            .field("springs_changed", &self.springs_changed)
            .field("valid", &self.valid)
            .finish_non_exhaustive()
    }
}

impl GroupLayout {
    /// Create a layout with default options and empty groups.
    pub fn new() -> Self {
        Self::with_options(LayoutOptions::default())
    }

    pub fn with_options(options: LayoutOptions) -> Self {
        let mut tree = Tree::new();
        let horizontal_root = tree.insert(Spring::new(empty_root()));
        let vertical_root = tree.insert(Spring::new(empty_root()));
        let mut layout = Self {
            tree,
            horizontal: horizontal_root,
            vertical: vertical_root,
            horizontal_root,
            vertical_root,
            options,
            style: Box::new(DefaultGapStyle::default()),
            springs_changed: true,
            valid: false,
            has_preferred_padding: false,
        };
        layout.horizontal = layout.create_top_level(horizontal_root);
        layout.vertical = layout.create_top_level(vertical_root);
        layout
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replace the group that lays out components along the x axis.
    pub fn set_horizontal_group(&mut self, group: impl Into<Group>) -> Result<(), LayoutError> {
        self.set_group(Axis::Horizontal, group.into())
    }

    /// Replace the group that lays out components along the y axis.
    pub fn set_vertical_group(&mut self, group: impl Into<Group>) -> Result<(), LayoutError> {
        self.set_group(Axis::Vertical, group.into())
    }

    fn set_group(&mut self, axis: Axis, group: Group) -> Result<(), LayoutError> {
        let (root, installed) = Installer::new(&mut self.tree, axis).install(&group)?;
        let old_top = self.top(axis);
        self.tree.free(old_top);
        self.tree.clear_registrations(axis);
        for id in installed.components {
            self.tree.info_mut(id);
        }
        let top = self.create_top_level(root);
        match axis {
            Axis::Horizontal => {
                self.horizontal = top;
                self.horizontal_root = root;
            }
            Axis::Vertical => {
                self.vertical = top;
                self.vertical_root = root;
            }
        }
        self.has_preferred_padding |= installed.has_preferred_padding;
        self.structure_changed();
        Ok(())
    }

    fn top(&self, axis: Axis) -> SpringId {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Wrap a root group in the sequence the engine lays out, adding
    /// container gaps on both ends when enabled.
    fn create_top_level(&mut self, root: SpringId) -> SpringId {
        let top = self
            .tree
            .insert(Spring::new(SpringKind::Sequential(SequentialSpring::default())));
        if self.options.auto_create_container_gaps {
            self.tree.add_child(top, container_gap());
            self.tree.adopt(top, root);
            self.tree.add_child(top, container_gap());
        } else {
            self.tree.adopt(top, root);
        }
        top
    }

    fn structure_changed(&mut self) {
        self.springs_changed = true;
        self.valid = false;
    }

    pub fn auto_create_gaps(&self) -> bool {
        self.options.auto_create_gaps
    }

    /// Insert padding between adjacent components.
    pub fn set_auto_create_gaps(&mut self, auto_create_gaps: bool) {
        if self.options.auto_create_gaps != auto_create_gaps {
            self.options.auto_create_gaps = auto_create_gaps;
            self.structure_changed();
        }
    }

    pub fn auto_create_container_gaps(&self) -> bool {
        self.options.auto_create_container_gaps
    }

    /// Insert padding between components and the host edges.
    pub fn set_auto_create_container_gaps(&mut self, auto_create_container_gaps: bool) {
        if self.options.auto_create_container_gaps == auto_create_container_gaps {
            return;
        }
        self.options.auto_create_container_gaps = auto_create_container_gaps;
        for axis in Axis::ALL {
            let (top, root) = match axis {
                Axis::Horizontal => (self.horizontal, self.horizontal_root),
                Axis::Vertical => (self.vertical, self.vertical_root),
            };
            self.tree.unparent(root);
            self.tree.free(top);
            let top = self.create_top_level(root);
            match axis {
                Axis::Horizontal => self.horizontal = top,
                Axis::Vertical => self.vertical = top,
            }
        }
        self.structure_changed();
    }

    pub fn honors_visibility(&self) -> bool {
        self.options.honors_visibility
    }

    /// Lay out invisible components as if they were absent.
    pub fn set_honors_visibility(&mut self, honors_visibility: bool) {
        self.options.honors_visibility = honors_visibility;
        self.structure_changed();
    }

    /// Override the layout-wide visibility flag for one component.
    /// `None` falls back to the layout-wide flag.
    pub fn set_component_honors_visibility(
        &mut self,
        id: ComponentId,
        honors_visibility: Option<bool>,
    ) -> Result<(), LayoutError> {
        let info = self
            .tree
            .infos
            .get_mut(&id)
            .ok_or(LayoutError::NotRegistered { id })?;
        info.honors_visibility = honors_visibility;
        self.structure_changed();
        Ok(())
    }

    /// Install the source of preferred and container gaps.
    pub fn set_gap_style(&mut self, style: Box<dyn GapStyle>) {
        self.style = style;
        self.valid = false;
    }

    /// Force `ids` to share one size along `axis`: the largest of their
    /// own preferred sizes.
    pub fn link_size(&mut self, axis: Axis, ids: &[ComponentId]) -> Result<(), LayoutError> {
        if ids.is_empty() {
            return Err(LayoutError::EmptyLink);
        }
        for &id in ids {
            self.tree.info_mut(id);
        }
        self.tree.links.axis_mut(axis).link(ids);
        self.valid = false;
        Ok(())
    }

    /// Link sizes along both axes.
    pub fn link_size_both(&mut self, ids: &[ComponentId]) -> Result<(), LayoutError> {
        for axis in Axis::ALL {
            self.link_size(axis, ids)?;
        }
        Ok(())
    }

    /// Take a component out of both trees and forget it.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<(), LayoutError> {
        if !self.tree.infos.contains_key(&id) {
            return Err(LayoutError::NotRegistered { id });
        }
        if self.springs_changed {
            self.register();
        }
        if let Some(info) = self.tree.infos.shift_remove(&id) {
            for spring in [info.horizontal, info.vertical].into_iter().flatten() {
                self.tree.detach(spring);
            }
        }
        self.tree.links.remove(id);
        self.structure_changed();
        Ok(())
    }

    /// Put `new` where `existing` was, in both trees and in every link.
    pub fn replace(&mut self, existing: ComponentId, new: ComponentId) -> Result<(), LayoutError> {
        if existing == new {
            return Ok(());
        }
        if self.tree.infos.contains_key(&new) {
            return Err(LayoutError::AlreadyRegistered { id: new });
        }
        let (index, _, info) = self
            .tree
            .infos
            .swap_remove_full(&existing)
            .ok_or(LayoutError::NotRegistered { id: existing })?;
        let (last, _) = self.tree.infos.insert_full(new, info);
        self.tree.infos.swap_indices(index, last);
        self.tree.rename_component(existing, new);
        self.valid = false;
        Ok(())
    }

    /// Mark cached sizes stale after the host changed.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Bind every component spring to its component and drop components
    /// that left both trees.
    fn register(&mut self) {
        for axis in Axis::ALL {
            let top = self.top(axis);
            self.tree.clear_registrations(axis);
            self.tree.register_components(top, axis);
        }
        let pruned = self.tree.prune_unregistered();
        if pruned > 0 {
            debug!(pruned, "dropped components no longer in either group");
        }
    }

    fn uses_padding(&self) -> bool {
        self.options.auto_create_gaps || self.options.auto_create_container_gaps || self.has_preferred_padding
    }

    /// Bring the trees up to date. With `size_type` set, padding is
    /// calculated against that size of the trees themselves.
    fn prepare(&mut self, host: &dyn Container, size_type: Option<SizeType>) -> Result<(), LayoutError> {
        let (horizontal, vertical) = (self.horizontal, self.vertical);
        if !self.valid {
            self.tree.unset_tree(horizontal);
            self.tree.unset_tree(vertical);
            let honors = self.options.honors_visibility;
            let mut visibility_changed = false;
            for (&id, info) in self.tree.infos.iter_mut() {
                visibility_changed |= info.update_visibility(id, host, honors);
            }
            self.tree.links.clear_cached_sizes();
            if visibility_changed {
                self.springs_changed = true;
            }
            self.valid = true;
        }

        if self.springs_changed {
            self.register();
            self.check_components(host)?;
            let removed = self.tree.remove_autopadding(horizontal) + self.tree.remove_autopadding(vertical);
            let insert = self.options.auto_create_gaps;
            let inserted = if insert || self.has_preferred_padding || self.options.auto_create_container_gaps {
                let mut solver = Solver::new(&mut self.tree, host, &*self.style, host.is_left_to_right());
                let mut trailing = Frontier::default();
                let count = solver.insert_autopadding(horizontal, Axis::Horizontal, &Frontier::default(), &mut trailing, insert);
                let mut trailing = Frontier::default();
                count + solver.insert_autopadding(vertical, Axis::Vertical, &Frontier::default(), &mut trailing, insert)
            } else {
                0
            };
            debug!(removed, inserted, "rebuilt autopadding");
            self.springs_changed = false;
        }

        if let Some(size_type) = size_type {
            if self.uses_padding() {
                let mut solver = Solver::new(&mut self.tree, host, &*self.style, host.is_left_to_right());
                solver.autopad(horizontal, Axis::Horizontal, Some(size_type), 0);
                solver.autopad(vertical, Axis::Vertical, Some(size_type), 0);
            }
        }
        Ok(())
    }

    /// Every component must be provided by the host and sit on both axes.
    fn check_components(&self, host: &dyn Container) -> Result<(), LayoutError> {
        for (&id, info) in &self.tree.infos {
            let Some(component) = host.component(id) else {
                return Err(LayoutError::UnknownComponent { id });
            };
            let name = || component.name().map_or_else(|| id.to_string(), str::to_string);
            for axis in Axis::ALL {
                if info.spring(axis).is_none() {
                    return Err(LayoutError::MissingAxis { component: name(), axis });
                }
            }
        }
        Ok(())
    }

    pub fn minimum_size(&mut self, host: &dyn Container) -> Result<Size, LayoutError> {
        self.size_of(host, SizeType::Minimum)
    }

    pub fn preferred_size(&mut self, host: &dyn Container) -> Result<Size, LayoutError> {
        self.size_of(host, SizeType::Preferred)
    }

    pub fn maximum_size(&mut self, host: &dyn Container) -> Result<Size, LayoutError> {
        self.size_of(host, SizeType::Maximum)
    }

    /// Size of both trees plus the host's insets.
    fn size_of(&mut self, host: &dyn Container, size_type: SizeType) -> Result<Size, LayoutError> {
        let _span = trace_span!("size", ?size_type).entered();
        self.prepare(host, Some(size_type))?;
        let (horizontal, vertical) = (self.horizontal, self.vertical);
        let mut solver = Solver::new(&mut self.tree, host, &*self.style, host.is_left_to_right());
        let width = solver.size(horizontal, Axis::Horizontal, size_type);
        let height = solver.size(vertical, Axis::Vertical, size_type);
        let insets = host.insets();
        Ok(Size::new(
            width.saturating_add(insets.horizontal()),
            height.saturating_add(insets.vertical()),
        ))
    }

    /// Resolve both trees for a host of `width` x `height` and push the
    /// resulting bounds to every component.
    pub fn layout(&mut self, host: &mut dyn Container, width: i32, height: i32) -> Result<(), LayoutError> {
        let _span = trace_span!("layout", width, height).entered();
        self.prepare(&*host, None)?;

        let insets = host.insets();
        let ltr = host.is_left_to_right();
        let width = (width - insets.horizontal()).max(0);
        let height = (height - insets.vertical()).max(0);
        let (horizontal, vertical) = (self.horizontal, self.vertical);
        let uses_padding = self.uses_padding();

        let mut solver = Solver::new(&mut self.tree, &*host, &*self.style, ltr);
        if uses_padding {
            solver.autopad(horizontal, Axis::Horizontal, None, width);
            solver.autopad(vertical, Axis::Vertical, None, height);
        }
        solver.set_size(horizontal, Axis::Horizontal, 0, width);
        solver.set_size(vertical, Axis::Vertical, 0, height);

        let bounds: Vec<(ComponentId, Rect)> = self
            .tree
            .infos
            .iter()
            .filter_map(|(&id, info)| {
                let h = self.tree.spring(info.horizontal?);
                let v = self.tree.spring(info.vertical?);
                let w = h.size.unwrap_or(0);
                let x = if ltr { h.origin } else { width - h.origin - w };
                let rect = Rect::new(x + insets.left, v.origin + insets.top, w, v.size.unwrap_or(0));
                Some((id, rect))
            })
            .collect();
        for (id, rect) in bounds {
            if let Some(component) = host.component_mut(id) {
                component.set_bounds(rect);
            }
        }
        Ok(())
    }

    /// Whether a component's spring can take a size other than its
    /// preferred one along `axis`. Linked components never can.
    pub fn is_resizable(&mut self, host: &dyn Container, id: ComponentId, axis: Axis) -> Result<bool, LayoutError> {
        self.prepare(host, None)?;
        let spring = self
            .tree
            .component_spring(id, axis)
            .ok_or(LayoutError::NotRegistered { id })?;
        let mut solver = Solver::new(&mut self.tree, host, &*self.style, host.is_left_to_right());
        Ok(solver.is_resizable(spring, axis))
    }

    /// Dump both trees with their current sizes.
    pub fn describe(&mut self, host: &dyn Container) -> Result<String, LayoutError> {
        self.prepare(host, None)?;
        let (horizontal, vertical) = (self.horizontal, self.vertical);
        let mut solver = Solver::new(&mut self.tree, host, &*self.style, host.is_left_to_right());
        Ok(solver.describe(horizontal, vertical))
    }
}

fn empty_root() -> SpringKind {
    SpringKind::Parallel(ParallelSpring {
        children: Vec::new(),
        alignment: Alignment::Leading,
        resizable: true,
    })
}

fn container_gap() -> Spring {
    Spring::new(SpringKind::ContainerGap(ContainerGapSpring::new(
        Extent::Preferred,
        Extent::Preferred,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ParallelGroup, SequentialGroup};
    use crate::panel::{Panel, Widget};

    fn two_buttons() -> (Panel, ComponentId, ComponentId) {
        let mut panel = Panel::new();
        let a = panel.add(Widget::fixed(Size::new(50, 20)));
        let b = panel.add(Widget::fixed(Size::new(50, 20)));
        (panel, a, b)
    }

    fn row(layout: &mut GroupLayout, a: ComponentId, b: ComponentId) {
        layout
            .set_horizontal_group(SequentialGroup::new().component(a).component(b))
            .unwrap();
        layout
            .set_vertical_group(ParallelGroup::new().component(a).component(b))
            .unwrap();
    }

    /// Container gaps that differ per edge.
    struct EdgeStyle;

    impl GapStyle for EdgeStyle {
        fn preferred_gap(
            &self,
            _first: &dyn coil_core::Component,
            _second: &dyn coil_core::Component,
            _placement: coil_core::ComponentPlacement,
            _edge: coil_core::Edge,
        ) -> i32 {
            0
        }

        fn container_gap(&self, _component: &dyn coil_core::Component, edge: coil_core::Edge) -> i32 {
            match edge {
                coil_core::Edge::West => 1,
                coil_core::Edge::East => 2,
                coil_core::Edge::North => 3,
                coil_core::Edge::South => 4,
            }
        }
    }

    #[test]
    fn test_container_gaps_ask_for_their_own_edge() {
        let (mut panel, a, b) = two_buttons();
        let mut layout = GroupLayout::with_options(LayoutOptions {
            auto_create_container_gaps: true,
            ..Default::default()
        });
        layout.set_gap_style(Box::new(EdgeStyle));
        row(&mut layout, a, b);

        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(103, 27));
        layout.layout(&mut panel, 103, 27).unwrap();
        assert_eq!(panel.bounds(a), Some(Rect::new(1, 3, 50, 20)));
        assert_eq!(panel.bounds(b), Some(Rect::new(51, 3, 50, 20)));
    }

    #[test]
    fn test_empty_layout_is_insets_only() {
        let panel = Panel::new().with_insets(coil_core::Insets::uniform(3));
        let mut layout = GroupLayout::new();
        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(6, 6));
    }

    #[test]
    fn test_auto_gaps_toggle() {
        let (panel, a, b) = two_buttons();
        let mut layout = GroupLayout::new();
        row(&mut layout, a, b);
        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(100, 20));
        layout.set_auto_create_gaps(true);
        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(106, 20));
        layout.set_auto_create_gaps(false);
        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(100, 20));
    }

    #[test]
    fn test_container_gaps_toggle() {
        let (panel, a, b) = two_buttons();
        let mut layout = GroupLayout::new();
        row(&mut layout, a, b);
        layout.set_auto_create_container_gaps(true);
        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(124, 44));
        layout.set_auto_create_container_gaps(false);
        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(100, 20));
    }

    #[test]
    fn test_replacing_group_drops_old_tree() {
        let (panel, a, b) = two_buttons();
        let mut layout = GroupLayout::new();
        row(&mut layout, a, b);
        let springs = layout.tree.len();
        row(&mut layout, a, b);
        assert_eq!(layout.tree.len(), springs);
        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(100, 20));
    }

    #[test]
    fn test_failed_install_keeps_previous_group() {
        let (panel, a, b) = two_buttons();
        let mut layout = GroupLayout::new();
        row(&mut layout, a, b);
        let err = layout
            .set_horizontal_group(SequentialGroup::new().component(a).component(a))
            .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateComponent { axis: Axis::Horizontal, .. }));
        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(100, 20));
    }

    #[test]
    fn test_unknown_component() {
        let (panel, a, _) = two_buttons();
        let ghost = ComponentId(99);
        let mut layout = GroupLayout::new();
        row(&mut layout, a, ghost);
        assert_eq!(
            layout.preferred_size(&panel).unwrap_err(),
            LayoutError::UnknownComponent { id: ghost }
        );
    }

    #[test]
    fn test_empty_link_rejected() {
        let mut layout = GroupLayout::new();
        assert_eq!(layout.link_size(Axis::Horizontal, &[]).unwrap_err(), LayoutError::EmptyLink);
    }

    #[test]
    fn test_visibility_override_requires_component() {
        let mut layout = GroupLayout::new();
        let id = ComponentId(4);
        assert_eq!(
            layout.set_component_honors_visibility(id, Some(false)).unwrap_err(),
            LayoutError::NotRegistered { id }
        );
    }

    #[test]
    fn test_replace_keeps_order() {
        let mut panel = Panel::new();
        let a = panel.add(Widget::fixed(Size::new(10, 10)));
        let b = panel.add(Widget::fixed(Size::new(10, 10)));
        let c = panel.add(Widget::fixed(Size::new(10, 10)));
        let mut layout = GroupLayout::new();
        layout
            .set_horizontal_group(SequentialGroup::new().component(a).component(b).component(c))
            .unwrap();
        layout
            .set_vertical_group(ParallelGroup::new().component(a).component(b).component(c))
            .unwrap();
        let d = panel.add(Widget::fixed(Size::new(30, 10)));
        layout.replace(a, d).unwrap();
        let order: Vec<_> = layout.tree.infos.keys().copied().collect();
        assert_eq!(order, vec![d, b, c]);
        assert_eq!(layout.preferred_size(&panel).unwrap(), Size::new(50, 10));
        assert_eq!(
            layout.replace(b, c).unwrap_err(),
            LayoutError::AlreadyRegistered { id: c }
        );
    }
}
