//! Baseline alignment.
//!
//! A baseline group lines its baseline-aligned children up on a shared
//! text baseline. Its size is an ascent/descent envelope around that line,
//! and how each child stretches depends on the child's baseline resize
//! behavior and on whether the group keeps its baseline a fixed distance
//! from the top or from the bottom.

use coil_core::{Alignment, Axis, BaselineResizeBehavior};

use crate::solver::Solver;
use crate::spring::{BaselineMetrics, SizeType, SpringId, SpringKind};

const VERTICAL: Axis = Axis::Vertical;

impl Solver<'_> {
    /// Baseline of a spring at its preferred size, if it has one.
    pub fn baseline(&mut self, id: SpringId) -> Option<i32> {
        match &self.tree.spring(id).kind {
            SpringKind::Component(spring) => {
                if spring.baseline.is_some() {
                    return spring.baseline;
                }
                let component = spring.component;
                let horizontal = self.tree.component_spring(component, Axis::Horizontal)?;
                let width = self.preferred(horizontal, Axis::Horizontal);
                let height = self.preferred(id, VERTICAL);
                if width <= 0 || height <= 0 {
                    return None;
                }
                let baseline = self
                    .host
                    .component(component)?
                    .baseline(width, height)
                    .filter(|&baseline| baseline >= 0)?;
                if let SpringKind::Component(spring) = &mut self.tree.spring_mut(id).kind {
                    spring.baseline = Some(baseline);
                }
                Some(baseline)
            }
            SpringKind::Sequential(group) => {
                let target = group.baseline_child?;
                let baseline = self.baseline(target)?;
                let mut offset = 0;
                for child in self.tree.children(id).to_vec() {
                    if child == target {
                        return Some(offset + baseline);
                    }
                    offset += self.preferred(child, VERTICAL);
                }
                None
            }
            SpringKind::Baseline(group) => {
                if group.children.len() > 1 {
                    self.preferred(id, VERTICAL);
                    return Some(self.baseline_metrics(id).pref_ascent);
                }
                let only = group.children.first().copied()?;
                self.baseline(only)
            }
            _ => None,
        }
    }

    /// How the baseline of a spring moves as the spring is resized.
    pub fn baseline_resize_behavior(&mut self, id: SpringId) -> BaselineResizeBehavior {
        match &self.tree.spring(id).kind {
            SpringKind::Component(spring) => self
                .host
                .component(spring.component)
                .map_or(BaselineResizeBehavior::Other, |component| {
                    component.baseline_resize_behavior()
                }),
            SpringKind::Sequential(group) => {
                let target = group.baseline_child;
                self.sequential_resize_behavior(id, target)
            }
            SpringKind::Baseline(group) => {
                if group.children.len() == 1 {
                    let only = group.children[0];
                    return self.baseline_resize_behavior(only);
                }
                self.baseline_metrics(id);
                if self.anchored_to_top(id) {
                    BaselineResizeBehavior::ConstantAscent
                } else {
                    BaselineResizeBehavior::ConstantDescent
                }
            }
            _ => BaselineResizeBehavior::Other,
        }
    }

    fn sequential_resize_behavior(&mut self, id: SpringId, target: Option<SpringId>) -> BaselineResizeBehavior {
        if !self.is_resizable(id, VERTICAL) {
            return BaselineResizeBehavior::ConstantAscent;
        }
        let Some(target) = target else {
            return BaselineResizeBehavior::Other;
        };
        let children = self.tree.children(id).to_vec();
        if !self.is_resizable(target, VERTICAL) {
            // The baseline moves with whichever side of it stretches
            let mut leading = false;
            for &child in children.iter().take_while(|&&child| child != target) {
                if self.is_resizable(child, VERTICAL) {
                    leading = true;
                    break;
                }
            }
            let mut trailing = false;
            for &child in children.iter().rev().take_while(|&&child| child != target) {
                if self.is_resizable(child, VERTICAL) {
                    trailing = true;
                    break;
                }
            }
            return match (leading, trailing) {
                (true, false) => BaselineResizeBehavior::ConstantDescent,
                (false, true) => BaselineResizeBehavior::ConstantAscent,
                _ => BaselineResizeBehavior::Other,
            };
        }
        match self.baseline_resize_behavior(target) {
            BaselineResizeBehavior::ConstantAscent => {
                for &child in &children {
                    if child == target {
                        return BaselineResizeBehavior::ConstantAscent;
                    }
                    if self.is_resizable(child, VERTICAL) {
                        break;
                    }
                }
            }
            BaselineResizeBehavior::ConstantDescent => {
                for &child in children.iter().rev() {
                    if child == target {
                        return BaselineResizeBehavior::ConstantDescent;
                    }
                    if self.is_resizable(child, VERTICAL) {
                        break;
                    }
                }
            }
            _ => {}
        }
        BaselineResizeBehavior::Other
    }

    fn aligns_on_baseline(&self, id: SpringId) -> bool {
        matches!(self.tree.spring(id).alignment, None | Some(Alignment::Baseline))
    }

    fn anchored_to_top(&self, id: SpringId) -> bool {
        match &self.tree.spring(id).kind {
            SpringKind::Baseline(group) => group.anchored_to_top,
            _ => true,
        }
    }

    /// Ascent/descent envelope of a baseline group, computed on first use.
    pub(crate) fn baseline_metrics(&mut self, id: SpringId) -> BaselineMetrics {
        if let SpringKind::Baseline(group) = &self.tree.spring(id).kind {
            if let Some(metrics) = group.metrics {
                return metrics;
            }
        }
        let children = self.tree.children(id).to_vec();
        let mut pref_ascent = 0;
        let mut pref_descent = 0;
        let mut with_baseline = 0;
        let mut behavior = None;
        for &child in &children {
            if !self.aligns_on_baseline(child) {
                continue;
            }
            let Some(baseline) = self.baseline(child) else {
                continue;
            };
            if self.is_resizable(child, VERTICAL) {
                let child_behavior = self.baseline_resize_behavior(child);
                behavior = match behavior {
                    None => Some(child_behavior),
                    Some(current) if current != child_behavior => Some(BaselineResizeBehavior::ConstantAscent),
                    current => current,
                };
            }
            pref_ascent = pref_ascent.max(baseline);
            pref_descent = pref_descent.max(self.preferred(child, VERTICAL) - baseline);
            with_baseline += 1;
        }
        let metrics = BaselineMetrics {
            pref_ascent,
            pref_descent,
            all_have_baseline: with_baseline == children.len(),
        };
        if let SpringKind::Baseline(group) = &mut self.tree.spring_mut(id).kind {
            group.anchored_to_top = group
                .anchor
                .unwrap_or(behavior != Some(BaselineResizeBehavior::ConstantDescent));
            group.metrics = Some(metrics);
        }
        metrics
    }

    pub(crate) fn baseline_group_size(&mut self, id: SpringId, size_type: SizeType) -> i32 {
        let resizable = match &self.tree.spring(id).kind {
            SpringKind::Baseline(group) => group.resizable,
            _ => true,
        };
        if !resizable && size_type != SizeType::Preferred {
            return self.preferred(id, VERTICAL);
        }
        let metrics = self.baseline_metrics(id);
        match size_type {
            SizeType::Minimum => self.baseline_minimum(id, metrics),
            SizeType::Maximum => self.baseline_maximum(id, metrics),
            SizeType::Preferred => {
                let envelope = metrics.pref_ascent + metrics.pref_descent;
                if metrics.all_have_baseline {
                    envelope
                } else {
                    envelope.max(self.fold_children(id, VERTICAL, SizeType::Preferred, i32::max))
                }
            }
        }
    }

    fn baseline_minimum(&mut self, id: SpringId, metrics: BaselineMetrics) -> i32 {
        let top = self.anchored_to_top(id);
        let (mut ascent, mut descent) = if top {
            (metrics.pref_ascent, 0)
        } else {
            (0, metrics.pref_descent)
        };
        let mut others = 0;
        for child in self.tree.children(id).to_vec() {
            let min = self.minimum(child, VERTICAL);
            let baseline = match self.aligns_on_baseline(child) {
                true => self.baseline(child),
                false => None,
            };
            let Some(baseline) = baseline else {
                others = others.max(min);
                continue;
            };
            let pref = self.preferred(child, VERTICAL);
            match self.baseline_resize_behavior(child) {
                BaselineResizeBehavior::ConstantAscent => {
                    if top {
                        descent = descent.max(min - baseline);
                    } else {
                        ascent = ascent.max(baseline);
                    }
                }
                BaselineResizeBehavior::ConstantDescent => {
                    if top {
                        descent = descent.max(pref - baseline);
                    } else {
                        ascent = ascent.max(baseline - (pref - min));
                    }
                }
                // Cannot shrink around the baseline
                _ => {
                    ascent = ascent.max(baseline);
                    descent = descent.max(pref - baseline);
                }
            }
        }
        others.max(ascent + descent)
    }

    fn baseline_maximum(&mut self, id: SpringId, metrics: BaselineMetrics) -> i32 {
        let top = self.anchored_to_top(id);
        let mut ascent = metrics.pref_ascent;
        let mut descent = metrics.pref_descent;
        let mut others = 0;
        for child in self.tree.children(id).to_vec() {
            let max = self.maximum(child, VERTICAL);
            let baseline = match self.aligns_on_baseline(child) {
                true => self.baseline(child),
                false => None,
            };
            let Some(baseline) = baseline else {
                others = others.max(max);
                continue;
            };
            let pref = self.preferred(child, VERTICAL);
            if pref == max {
                continue;
            }
            match self.baseline_resize_behavior(child) {
                BaselineResizeBehavior::ConstantAscent if top => {
                    descent = descent.max(max - baseline);
                }
                BaselineResizeBehavior::ConstantDescent if !top => {
                    ascent = ascent.max(max - pref + baseline);
                }
                _ => {}
            }
        }
        others.max(ascent + descent)
    }

    pub(crate) fn baseline_group_layout(&mut self, id: SpringId, origin: i32, size: i32) {
        let metrics = match &self.tree.spring(id).kind {
            SpringKind::Baseline(group) => group.metrics,
            _ => None,
        };
        let Some(metrics) = metrics else {
            for child in self.tree.children(id).to_vec() {
                self.set_child_size(child, VERTICAL, origin, size, Alignment::Leading);
            }
            return;
        };
        let (ascent, descent) = if self.anchored_to_top(id) {
            (metrics.pref_ascent, size - metrics.pref_ascent)
        } else {
            (size - metrics.pref_descent, metrics.pref_descent)
        };
        for child in self.tree.children(id).to_vec() {
            let baseline = match self.aligns_on_baseline(child) {
                true => self.baseline(child),
                false => None,
            };
            let Some(baseline) = baseline else {
                self.set_child_size(child, VERTICAL, origin, size, Alignment::Leading);
                continue;
            };
            let max = self.maximum(child, VERTICAL);
            let pref = self.preferred(child, VERTICAL);
            let (y, height) = match self.baseline_resize_behavior(child) {
                BaselineResizeBehavior::ConstantAscent => {
                    (origin + ascent - baseline, descent.min(max - baseline) + baseline)
                }
                BaselineResizeBehavior::ConstantDescent => {
                    let height = ascent.min(max - pref + baseline) + (pref - baseline);
                    (origin + ascent + (pref - baseline) - height, height)
                }
                _ => (origin + ascent - baseline, pref),
            };
            self.set_size(child, VERTICAL, y, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Panel, Widget};
    use crate::spring::{BaselineSpring, ComponentSpring, SequentialSpring, Spring};
    use crate::tree::Tree;
    use coil_core::{ComponentId, DefaultGapStyle, Extent, Size};

    struct Fixture {
        tree: Tree,
        panel: Panel,
        group: SpringId,
    }

    fn component(tree: &mut Tree, parent: SpringId, axis: Axis, id: ComponentId) -> SpringId {
        let spring = tree.add_child(
            parent,
            Spring::new(SpringKind::Component(ComponentSpring {
                component: id,
                min: Extent::Default,
                pref: Extent::Default,
                max: Extent::Default,
                baseline: None,
            })),
        );
        tree.info_mut(id).set_spring(axis, Some(spring));
        spring
    }

    /// A baseline group holding `widgets`, each also placed in a
    /// horizontal sequence so baselines can be measured.
    fn fixture(widgets: Vec<Widget>, anchor: Option<bool>) -> Fixture {
        let mut tree = Tree::new();
        let mut panel = Panel::new();
        let row = tree.insert(Spring::new(SpringKind::Sequential(SequentialSpring::default())));
        let group = tree.insert(Spring::new(SpringKind::Baseline(BaselineSpring {
            children: Vec::new(),
            resizable: true,
            anchor,
            anchored_to_top: anchor.unwrap_or(true),
            metrics: None,
        })));
        for widget in widgets {
            let id = panel.add(widget);
            component(&mut tree, row, Axis::Horizontal, id);
            component(&mut tree, group, VERTICAL, id);
        }
        Fixture { tree, panel, group }
    }

    fn with_solver<R>(fixture: &mut Fixture, f: impl FnOnce(&mut Solver<'_>, SpringId) -> R) -> R {
        let style = DefaultGapStyle::default();
        let group = fixture.group;
        let mut solver = Solver::new(&mut fixture.tree, &fixture.panel, &style, true);
        f(&mut solver, group)
    }

    fn label(height: i32, baseline: i32) -> Widget {
        Widget::fixed(Size::new(40, height)).with_baseline(baseline)
    }

    #[test]
    fn test_envelope_from_ascent_and_descent() {
        let mut fx = fixture(vec![label(20, 15), label(30, 10)], None);
        let pref = with_solver(&mut fx, |s, group| s.preferred(group, VERTICAL));
        // ascent 15, descent max(5, 20)
        assert_eq!(pref, 35);
    }

    #[test]
    fn test_group_baseline_is_largest_ascent() {
        let mut fx = fixture(vec![label(20, 15), label(30, 10)], None);
        let baseline = with_solver(&mut fx, |s, group| s.baseline(group));
        assert_eq!(baseline, Some(15));
    }

    #[test]
    fn test_children_without_baseline_still_count() {
        let mut fx = fixture(vec![label(20, 15), Widget::fixed(Size::new(10, 50))], None);
        let pref = with_solver(&mut fx, |s, group| s.preferred(group, VERTICAL));
        assert_eq!(pref, 50);
    }

    #[test]
    fn test_constant_ascent_children_sit_on_baseline() {
        let grow = |height, baseline| {
            Widget::new(Size::new(10, height), Size::new(10, height), Size::new(10, 100))
                .with_baseline(baseline)
                .with_resize_behavior(BaselineResizeBehavior::ConstantAscent)
        };
        let mut fx = fixture(vec![grow(20, 15), grow(30, 10)], None);
        let ids: Vec<_> = fx.tree.children(fx.group).to_vec();
        with_solver(&mut fx, |s, group| {
            let pref = s.preferred(group, VERTICAL);
            s.set_size(group, VERTICAL, 0, pref + 10);
        });
        // ascent 15: first at 0, second at 5
        assert_eq!(fx.tree.spring(ids[0]).origin, 0);
        assert_eq!(fx.tree.spring(ids[1]).origin, 5);
        // both stretch down to the bottom of the group
        assert_eq!(fx.tree.spring(ids[0]).size, Some(45));
        assert_eq!(fx.tree.spring(ids[1]).size, Some(40));
    }

    #[test]
    fn test_constant_descent_anchors_to_bottom() {
        let grow = |height, baseline| {
            Widget::new(Size::new(10, height), Size::new(10, height), Size::new(10, 100))
                .with_baseline(baseline)
                .with_resize_behavior(BaselineResizeBehavior::ConstantDescent)
        };
        let mut fx = fixture(vec![grow(20, 15), grow(30, 10)], None);
        let behavior = with_solver(&mut fx, |s, group| {
            s.preferred(group, VERTICAL);
            s.baseline_resize_behavior(group)
        });
        assert_eq!(behavior, BaselineResizeBehavior::ConstantDescent);
    }

    #[test]
    fn test_mixed_behaviors_anchor_to_top() {
        let mut fx = fixture(
            vec![
                Widget::new(Size::new(10, 20), Size::new(10, 20), Size::new(10, 80))
                    .with_baseline(15)
                    .with_resize_behavior(BaselineResizeBehavior::ConstantDescent),
                Widget::new(Size::new(10, 20), Size::new(10, 20), Size::new(10, 80))
                    .with_baseline(15)
                    .with_resize_behavior(BaselineResizeBehavior::ConstantAscent),
            ],
            None,
        );
        let behavior = with_solver(&mut fx, |s, group| {
            s.preferred(group, VERTICAL);
            s.baseline_resize_behavior(group)
        });
        assert_eq!(behavior, BaselineResizeBehavior::ConstantAscent);
    }

    #[test]
    fn test_rigid_children_keep_preferred_height() {
        let mut fx = fixture(vec![label(20, 15), label(30, 10)], Some(false));
        let ids: Vec<_> = fx.tree.children(fx.group).to_vec();
        with_solver(&mut fx, |s, group| {
            s.preferred(group, VERTICAL);
            s.set_size(group, VERTICAL, 0, 45);
        });
        // anchored to the bottom: ascent = 45 - 20
        assert_eq!(fx.tree.spring(ids[0]).origin, 10);
        assert_eq!(fx.tree.spring(ids[0]).size, Some(20));
        assert_eq!(fx.tree.spring(ids[1]).origin, 15);
    }

    #[test]
    fn test_sequence_baseline_adds_leading_heights() {
        let mut tree = Tree::new();
        let mut panel = Panel::new();
        let row = tree.insert(Spring::new(SpringKind::Sequential(SequentialSpring::default())));
        let column = tree.insert(Spring::new(SpringKind::Sequential(SequentialSpring::default())));
        let top = panel.add(Widget::fixed(Size::new(10, 8)));
        let text = panel.add(label(20, 14));
        component(&mut tree, row, Axis::Horizontal, top);
        component(&mut tree, row, Axis::Horizontal, text);
        component(&mut tree, column, VERTICAL, top);
        let target = component(&mut tree, column, VERTICAL, text);
        if let SpringKind::Sequential(seq) = &mut tree.spring_mut(column).kind {
            seq.baseline_child = Some(target);
        }
        let style = DefaultGapStyle::default();
        let mut solver = Solver::new(&mut tree, &panel, &style, true);
        assert_eq!(solver.baseline(column), Some(22));
        assert_eq!(
            solver.baseline_resize_behavior(column),
            BaselineResizeBehavior::ConstantAscent
        );
    }
}
