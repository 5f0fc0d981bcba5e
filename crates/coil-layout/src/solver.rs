//! Size resolution.
//!
//! A `Solver` borrows the spring arena together with the host and the gap
//! style for the duration of one pass. Sizes are memoized on the springs
//! themselves, so asking for the same size twice is cheap until the next
//! invalidation.

use coil_core::{Alignment, Axis, ComponentId, Container, Extent, GapStyle, Size};

use crate::spring::{constrain, ComponentSpring, SizeType, SpringId, SpringKind};
use crate::tree::Tree;

pub(crate) struct Solver<'a> {
    pub tree: &'a mut Tree,
    pub host: &'a dyn Container,
    pub style: &'a dyn GapStyle,
    /// Host reads left to right
    pub ltr: bool,
}

impl<'a> Solver<'a> {
    pub fn new(tree: &'a mut Tree, host: &'a dyn Container, style: &'a dyn GapStyle, ltr: bool) -> Self {
        Self { tree, host, style, ltr }
    }

    /// Memoized size of a spring, clamped to `[0, INFINITE]`.
    pub fn size(&mut self, id: SpringId, axis: Axis, size_type: SizeType) -> i32 {
        if let Some(size) = self.tree.spring(id).cached(size_type) {
            return size;
        }
        let size = constrain(self.calculate(id, axis, size_type));
        self.tree.spring_mut(id).store(size_type, size);
        size
    }

    pub fn minimum(&mut self, id: SpringId, axis: Axis) -> i32 {
        self.size(id, axis, SizeType::Minimum)
    }

    pub fn preferred(&mut self, id: SpringId, axis: Axis) -> i32 {
        self.size(id, axis, SizeType::Preferred)
    }

    pub fn maximum(&mut self, id: SpringId, axis: Axis) -> i32 {
        self.size(id, axis, SizeType::Maximum)
    }

    pub fn is_resizable(&mut self, id: SpringId, axis: Axis) -> bool {
        let min = self.minimum(id, axis);
        let pref = self.preferred(id, axis);
        min != pref || pref != self.maximum(id, axis)
    }

    fn calculate(&mut self, id: SpringId, axis: Axis, size_type: SizeType) -> i32 {
        match &self.tree.spring(id).kind {
            SpringKind::Component(spring) => {
                let spring = *spring;
                self.component_size(id, &spring, axis, size_type)
            }
            SpringKind::Gap(gap) => {
                let gap = *gap;
                let extent = match size_type {
                    SizeType::Minimum => gap.min,
                    SizeType::Preferred => return gap.pref,
                    SizeType::Maximum => gap.max,
                };
                match extent {
                    Extent::Fixed(value) => value,
                    _ => self.preferred(id, axis),
                }
            }
            SpringKind::PreferredGap(gap) => {
                let gap = *gap;
                match size_type {
                    SizeType::Minimum => self.explicit_gap(gap.source, gap.target, gap.placement, axis),
                    SizeType::Preferred => match gap.pref {
                        Extent::Fixed(pref) => {
                            let min = self.minimum(id, axis);
                            let max = self.maximum(id, axis);
                            pref.max(min).min(max)
                        }
                        _ => self.minimum(id, axis),
                    },
                    SizeType::Maximum => match gap.max {
                        Extent::Fixed(max) => self.minimum(id, axis).max(max),
                        _ => self.explicit_gap(gap.source, gap.target, gap.placement, axis),
                    },
                }
            }
            SpringKind::AutoGap(gap) => {
                let (computed, pref, max) = (gap.computed, gap.pref, gap.max);
                self.padding_size(id, axis, size_type, computed, pref, max)
            }
            SpringKind::ContainerGap(gap) => {
                let (computed, pref, max) = (gap.computed, gap.pref, gap.max);
                self.padding_size(id, axis, size_type, computed, pref, max)
            }
            SpringKind::Sequential(_) => self.fold_children(id, axis, size_type, |a, b| {
                constrain(a) + constrain(b)
            }),
            SpringKind::Parallel(group) => {
                if !group.resizable && size_type != SizeType::Preferred {
                    return self.preferred(id, axis);
                }
                self.fold_children(id, axis, size_type, i32::max)
            }
            SpringKind::Baseline(_) => self.baseline_group_size(id, size_type),
        }
    }

    /// Combine the children's sizes with `operator`.
    pub(crate) fn fold_children(
        &mut self,
        id: SpringId,
        axis: Axis,
        size_type: SizeType,
        operator: impl Fn(i32, i32) -> i32,
    ) -> i32 {
        let children = self.tree.children(id).to_vec();
        let mut children = children.into_iter();
        let Some(first) = children.next() else {
            return 0;
        };
        let mut size = self.size(first, axis, size_type);
        for child in children {
            let next = self.size(child, axis, size_type);
            size = constrain(operator(size, next));
        }
        size
    }

    /// Autopadding sizes: the computed padding is the floor, a fixed
    /// preferred or maximum size can only widen it.
    fn padding_size(
        &mut self,
        id: SpringId,
        axis: Axis,
        size_type: SizeType,
        computed: i32,
        pref: Extent,
        max: Extent,
    ) -> i32 {
        match size_type {
            SizeType::Minimum => computed,
            SizeType::Preferred => match pref {
                Extent::Fixed(pref) => computed.max(pref),
                _ => computed,
            },
            SizeType::Maximum => match max {
                Extent::Fixed(max) => self.preferred(id, axis).max(max),
                _ => computed,
            },
        }
    }

    fn component_size(&mut self, id: SpringId, spring: &ComponentSpring, axis: Axis, size_type: SizeType) -> i32 {
        if self.tree.links.is_linked(axis, spring.component) {
            return self.link_size(spring.component, axis);
        }
        match size_type {
            SizeType::Minimum => self.nonlinked_size(spring, axis, SizeType::Minimum),
            SizeType::Preferred => {
                let min = self.minimum(id, axis);
                let pref = self.nonlinked_size(spring, axis, SizeType::Preferred);
                let max = self.maximum(id, axis);
                pref.max(min).min(max)
            }
            SizeType::Maximum => {
                let min = self.minimum(id, axis);
                min.max(self.nonlinked_size(spring, axis, SizeType::Maximum))
            }
        }
    }

    /// A component's size before link groups are applied.
    pub(crate) fn nonlinked_size(&self, spring: &ComponentSpring, axis: Axis, size_type: SizeType) -> i32 {
        if !self.is_visible(spring.component) {
            return 0;
        }
        let extent = match size_type {
            SizeType::Minimum => spring.min,
            SizeType::Preferred => spring.pref,
            SizeType::Maximum => spring.max,
        };
        match extent {
            Extent::Fixed(value) => value,
            Extent::Preferred if size_type != SizeType::Preferred => {
                self.nonlinked_size(spring, axis, SizeType::Preferred)
            }
            _ => self.host_size(spring.component, size_type).along(axis),
        }
    }

    fn host_size(&self, id: ComponentId, size_type: SizeType) -> Size {
        match self.host.component(id) {
            Some(component) => match size_type {
                SizeType::Minimum => component.minimum_size(),
                SizeType::Preferred => component.preferred_size(),
                SizeType::Maximum => component.maximum_size(),
            },
            None => Size::ZERO,
        }
    }

    /// Shared size of a link group: the largest unlinked preferred size.
    fn link_size(&mut self, id: ComponentId, axis: Axis) -> i32 {
        if !self.is_visible(id) {
            return 0;
        }
        let members = match self.tree.links.axis(axis).group_of(id) {
            Some(group) => match group.size {
                Some(size) => return size,
                None => group.members.clone(),
            },
            None => return 0,
        };
        let mut size = 0;
        for member in members {
            let Some(spring) = self.tree.component_spring(member, axis) else {
                continue;
            };
            if let SpringKind::Component(spring) = &self.tree.spring(spring).kind {
                size = size.max(self.nonlinked_size(spring, axis, SizeType::Preferred));
            }
        }
        if let Some(group) = self.tree.links.axis_mut(axis).group_of_mut(id) {
            group.size = Some(size);
        }
        size
    }

    pub fn is_visible(&self, id: ComponentId) -> bool {
        self.tree.infos.get(&id).map_or(true, |info| info.visible)
    }

    /// Resolve a spring to `size` at `origin` and lay out its children.
    pub fn set_size(&mut self, id: SpringId, axis: Axis, origin: i32, size: i32) {
        let spring = self.tree.spring_mut(id);
        spring.origin = origin;
        spring.size = Some(size);
        match &spring.kind {
            SpringKind::Sequential(_) => self.sequential_layout(id, axis, origin, size),
            SpringKind::Parallel(group) => {
                let alignment = group.alignment;
                for child in self.tree.children(id).to_vec() {
                    self.set_child_size(child, axis, origin, size, alignment);
                }
            }
            SpringKind::Baseline(_) => self.baseline_group_layout(id, origin, size),
            _ => {}
        }
    }

    /// Place one child of a parallel group according to its alignment.
    pub(crate) fn set_child_size(&mut self, child: SpringId, axis: Axis, origin: i32, size: i32, fallback: Alignment) {
        let min = self.minimum(child, axis);
        let max = self.maximum(child, axis);
        let child_size = size.max(min).min(max);
        let origin = match self.tree.spring(child).alignment.unwrap_or(fallback) {
            Alignment::Trailing => origin + size - child_size,
            Alignment::Center => origin + (size - child_size) / 2,
            Alignment::Leading | Alignment::Baseline => origin,
        };
        self.set_size(child, axis, origin, child_size);
    }

    fn sequential_layout(&mut self, id: SpringId, axis: Axis, mut origin: i32, size: i32) {
        let children = self.tree.children(id).to_vec();
        let pref = self.preferred(id, axis);
        if size == pref {
            for child in children {
                let child_pref = self.preferred(child, axis);
                self.set_size(child, axis, origin, child_pref);
                origin += child_pref;
            }
        } else if let [child] = children[..] {
            let min = self.minimum(child, axis);
            let max = self.maximum(child, axis);
            self.set_size(child, axis, origin, size.max(min).min(max));
        } else if !children.is_empty() {
            self.distribute(&children, axis, origin, size - pref);
        }
    }

    /// Spread `delta` (positive to grow, negative to shrink) over the
    /// children, least flexible first, so no child passes its own limit.
    fn distribute(&mut self, children: &[SpringId], axis: Axis, mut origin: i32, delta: i32) {
        let shrink = delta < 0;
        let mut delta = delta.abs();

        let mut resizable = Vec::with_capacity(children.len());
        for (index, &child) in children.iter().enumerate() {
            let pref = self.preferred(child, axis);
            let flex = if shrink {
                pref - self.minimum(child, axis)
            } else {
                self.maximum(child, axis) - pref
            };
            if flex > 0 {
                resizable.push((index, flex));
            }
        }
        // Stable, so equal flexibility keeps child order
        resizable.sort_by_key(|&(_, flex)| flex);

        if resizable.is_empty() {
            for &child in children {
                let size = if shrink {
                    self.minimum(child, axis)
                } else {
                    self.maximum(child, axis)
                };
                self.set_size(child, axis, origin, size);
                origin += size;
            }
            return;
        }

        let count = resizable.len() as i32;
        let mut share = delta / count;
        let mut slop = delta - share * count;
        let mut deltas = vec![0; children.len()];
        for (n, &(index, flex)) in resizable.iter().enumerate() {
            let n = n as i32;
            if n + 1 == count {
                share += slop;
            }
            let taken = share.min(flex);
            delta -= taken;
            if taken != share && n + 1 < count {
                let left = count - n - 1;
                share = delta / left;
                slop = delta - share * left;
            }
            deltas[index] = taken;
        }
        // What the last spring could not take goes to earlier ones with room
        for &(index, flex) in resizable.iter().rev().skip(1) {
            if delta == 0 {
                break;
            }
            let extra = (flex - deltas[index]).min(delta);
            deltas[index] += extra;
            delta -= extra;
        }

        let sign = if shrink { -1 } else { 1 };
        for (index, &child) in children.iter().enumerate() {
            let size = self.preferred(child, axis) + sign * deltas[index];
            self.set_size(child, axis, origin, size);
            origin += size;
        }
    }

    /// True if the spring can never take up space.
    ///
    /// Autopadding counts as empty only when `padding_is_empty` is set.
    pub fn will_have_zero_size(&self, id: SpringId, padding_is_empty: bool) -> bool {
        match &self.tree.spring(id).kind {
            SpringKind::Component(spring) => !self.is_visible(spring.component),
            SpringKind::Gap(_) | SpringKind::PreferredGap(_) => false,
            SpringKind::AutoGap(_) | SpringKind::ContainerGap(_) => padding_is_empty,
            SpringKind::Sequential(_) | SpringKind::Parallel(_) | SpringKind::Baseline(_) => self
                .tree
                .children(id)
                .iter()
                .all(|&child| self.will_have_zero_size(child, padding_is_empty)),
        }
    }
}
