//! Group builders.
//!
//! Trees are described with plain values and handed to the engine with
//! `GroupLayout::set_horizontal_group` / `set_vertical_group`, which
//! validates them and copies them into the spring arena.
//!
//! ```ignore
//! let horizontal = SequentialGroup::new()
//!     .component(label)
//!     .preferred_gap(ComponentPlacement::Related)
//!     .group(ParallelGroup::new().component(field).component(hint));
//! layout.set_horizontal_group(horizontal)?;
//! ```

use std::collections::HashSet;

use coil_core::{Alignment, Axis, ComponentId, ComponentPlacement, Extent, LayoutError};

use crate::spring::{
    AutoGapSpring, BaselineSpring, ComponentSpring, ContainerGapSpring, GapSpring, ParallelSpring,
    PreferredGapSpring, SequentialSpring, Spring, SpringId, SpringKind,
};
use crate::tree::Tree;

/// A child of a group under construction.
#[derive(Debug, Clone)]
enum Node {
    Component {
        id: ComponentId,
        min: Extent,
        pref: Extent,
        max: Extent,
        alignment: Option<Alignment>,
    },
    Gap {
        min: Extent,
        pref: Extent,
        max: Extent,
    },
    PreferredGap {
        first: ComponentId,
        second: ComponentId,
        placement: ComponentPlacement,
        pref: Extent,
        max: Extent,
    },
    AutoGap {
        placement: ComponentPlacement,
        pref: Extent,
        max: Extent,
    },
    ContainerGap {
        pref: Extent,
        max: Extent,
    },
    Group {
        group: Group,
        alignment: Option<Alignment>,
    },
}

/// Either kind of group.
#[derive(Debug, Clone)]
pub enum Group {
    Sequential(SequentialGroup),
    Parallel(ParallelGroup),
}

impl From<SequentialGroup> for Group {
    fn from(group: SequentialGroup) -> Self {
        Group::Sequential(group)
    }
}

impl From<ParallelGroup> for Group {
    fn from(group: ParallelGroup) -> Self {
        Group::Parallel(group)
    }
}

/// Children laid out one after another.
#[derive(Debug, Clone, Default)]
pub struct SequentialGroup {
    children: Vec<Node>,
    baseline_child: Option<usize>,
}

impl SequentialGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component at its own sizes.
    pub fn component(self, id: ComponentId) -> Self {
        self.component_sized(id, Extent::Default, Extent::Default, Extent::Default)
    }

    /// Add a component with explicit size overrides.
    pub fn component_sized(
        mut self,
        id: ComponentId,
        min: impl Into<Extent>,
        pref: impl Into<Extent>,
        max: impl Into<Extent>,
    ) -> Self {
        self.children.push(Node::Component {
            id,
            min: min.into(),
            pref: pref.into(),
            max: max.into(),
            alignment: None,
        });
        self
    }

    /// Add a component whose baseline becomes the baseline of this group.
    pub fn baseline_component(self, id: ComponentId) -> Self {
        self.component(id).mark_baseline()
    }

    pub fn baseline_component_sized(
        self,
        id: ComponentId,
        min: impl Into<Extent>,
        pref: impl Into<Extent>,
        max: impl Into<Extent>,
    ) -> Self {
        self.component_sized(id, min, pref, max).mark_baseline()
    }

    /// Add a rigid gap.
    pub fn gap(self, size: i32) -> Self {
        self.gap_sized(size, size, size)
    }

    /// Add a gap with a size range.
    pub fn gap_sized(mut self, min: impl Into<Extent>, pref: impl Into<Extent>, max: impl Into<Extent>) -> Self {
        self.children.push(Node::Gap {
            min: min.into(),
            pref: pref.into(),
            max: max.into(),
        });
        self
    }

    /// Add a nested group.
    pub fn group(mut self, group: impl Into<Group>) -> Self {
        self.children.push(Node::Group {
            group: group.into(),
            alignment: None,
        });
        self
    }

    /// Add a nested group whose baseline becomes the baseline of this group.
    pub fn baseline_group(self, group: impl Into<Group>) -> Self {
        self.group(group).mark_baseline()
    }

    /// Add style-suggested padding between whatever components end up
    /// on either side of it.
    pub fn preferred_gap(self, placement: ComponentPlacement) -> Self {
        self.preferred_gap_sized(placement, Extent::Default, Extent::Default)
    }

    pub fn preferred_gap_sized(
        mut self,
        placement: ComponentPlacement,
        pref: impl Into<Extent>,
        max: impl Into<Extent>,
    ) -> Self {
        self.children.push(Node::AutoGap {
            placement,
            pref: pref.into(),
            max: max.into(),
        });
        self
    }

    /// Add style-suggested padding between two specific components.
    pub fn preferred_gap_between(
        self,
        first: ComponentId,
        second: ComponentId,
        placement: ComponentPlacement,
    ) -> Self {
        self.preferred_gap_between_sized(first, second, placement, Extent::Default, Extent::Preferred)
    }

    pub fn preferred_gap_between_sized(
        mut self,
        first: ComponentId,
        second: ComponentId,
        placement: ComponentPlacement,
        pref: impl Into<Extent>,
        max: impl Into<Extent>,
    ) -> Self {
        self.children.push(Node::PreferredGap {
            first,
            second,
            placement,
            pref: pref.into(),
            max: max.into(),
        });
        self
    }

    /// Add padding between the adjacent components and the host edge.
    pub fn container_gap(self) -> Self {
        self.container_gap_sized(Extent::Default, Extent::Default)
    }

    pub fn container_gap_sized(mut self, pref: impl Into<Extent>, max: impl Into<Extent>) -> Self {
        self.children.push(Node::ContainerGap {
            pref: pref.into(),
            max: max.into(),
        });
        self
    }

    fn mark_baseline(mut self) -> Self {
        self.baseline_child = Some(self.children.len() - 1);
        self
    }
}

/// Children laid out on top of each other.
#[derive(Debug, Clone)]
pub struct ParallelGroup {
    children: Vec<Node>,
    alignment: Alignment,
    resizable: bool,
    anchor_to_top: Option<bool>,
}

impl Default for ParallelGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl ParallelGroup {
    /// Leading-aligned, resizable group.
    pub fn new() -> Self {
        Self::with_resizable(Alignment::Leading, true)
    }

    /// Resizable group with the given default child alignment.
    ///
    /// `Alignment::Baseline` creates a baseline group.
    pub fn aligned(alignment: Alignment) -> Self {
        Self::with_resizable(alignment, true)
    }

    /// A group that is `resizable` or fixed at its preferred size.
    pub fn with_resizable(alignment: Alignment, resizable: bool) -> Self {
        Self {
            children: Vec::new(),
            alignment,
            resizable,
            anchor_to_top: None,
        }
    }

    /// A baseline group with an explicit anchor.
    pub fn baseline(resizable: bool, anchor_to_top: bool) -> Self {
        Self {
            anchor_to_top: Some(anchor_to_top),
            ..Self::with_resizable(Alignment::Baseline, resizable)
        }
    }

    pub fn is_baseline(&self) -> bool {
        self.alignment == Alignment::Baseline
    }

    pub fn component(self, id: ComponentId) -> Self {
        self.push_component(id, Extent::Default, Extent::Default, Extent::Default, None)
    }

    pub fn component_sized(
        self,
        id: ComponentId,
        min: impl Into<Extent>,
        pref: impl Into<Extent>,
        max: impl Into<Extent>,
    ) -> Self {
        self.push_component(id, min.into(), pref.into(), max.into(), None)
    }

    /// Add a component with its own alignment.
    pub fn aligned_component(self, id: ComponentId, alignment: Alignment) -> Self {
        self.push_component(id, Extent::Default, Extent::Default, Extent::Default, Some(alignment))
    }

    pub fn aligned_component_sized(
        self,
        id: ComponentId,
        alignment: Alignment,
        min: impl Into<Extent>,
        pref: impl Into<Extent>,
        max: impl Into<Extent>,
    ) -> Self {
        self.push_component(id, min.into(), pref.into(), max.into(), Some(alignment))
    }

    pub fn gap(self, pref: i32) -> Self {
        self.gap_sized(pref, pref, pref)
    }

    pub fn gap_sized(mut self, min: impl Into<Extent>, pref: impl Into<Extent>, max: impl Into<Extent>) -> Self {
        self.children.push(Node::Gap {
            min: min.into(),
            pref: pref.into(),
            max: max.into(),
        });
        self
    }

    pub fn group(mut self, group: impl Into<Group>) -> Self {
        self.children.push(Node::Group {
            group: group.into(),
            alignment: None,
        });
        self
    }

    /// Add a nested group with its own alignment.
    pub fn aligned_group(mut self, alignment: Alignment, group: impl Into<Group>) -> Self {
        self.children.push(Node::Group {
            group: group.into(),
            alignment: Some(alignment),
        });
        self
    }

    fn push_component(
        mut self,
        id: ComponentId,
        min: Extent,
        pref: Extent,
        max: Extent,
        alignment: Option<Alignment>,
    ) -> Self {
        self.children.push(Node::Component {
            id,
            min,
            pref,
            max,
            alignment,
        });
        self
    }
}

/// What installing a tree found out about it.
#[derive(Debug, Default)]
pub(crate) struct Installed {
    /// The tree contains user-created preferred or container gaps
    pub has_preferred_padding: bool,
    /// Components referenced by the tree, in insertion order
    pub components: Vec<ComponentId>,
}

/// Copies builder values into the arena, validating as it goes.
pub(crate) struct Installer<'t> {
    tree: &'t mut Tree,
    axis: Axis,
    seen: HashSet<ComponentId>,
    installed: Installed,
}

impl<'t> Installer<'t> {
    pub fn new(tree: &'t mut Tree, axis: Axis) -> Self {
        Self {
            tree,
            axis,
            seen: HashSet::new(),
            installed: Installed::default(),
        }
    }

    /// Install `group` as a parentless spring.
    pub fn install(mut self, group: &Group) -> Result<(SpringId, Installed), LayoutError> {
        let id = self.tree.insert(Spring::new(group_kind(group)));
        if let Err(err) = self.fill(id, group) {
            self.tree.free(id);
            return Err(err);
        }
        Ok((id, self.installed))
    }

    fn fill(&mut self, id: SpringId, group: &Group) -> Result<(), LayoutError> {
        match group {
            Group::Sequential(sequential) => {
                for (index, node) in sequential.children.iter().enumerate() {
                    let child = self.add_node(id, node)?;
                    if sequential.baseline_child == Some(index) {
                        if let SpringKind::Sequential(seq) = &mut self.tree.spring_mut(id).kind {
                            seq.baseline_child = Some(child);
                        }
                    }
                }
            }
            Group::Parallel(parallel) => {
                if parallel.is_baseline() && self.axis == Axis::Horizontal {
                    return Err(LayoutError::BaselineOnHorizontalAxis);
                }
                for node in &parallel.children {
                    let alignment = match node {
                        Node::Component { alignment, .. } | Node::Group { alignment, .. } => *alignment,
                        _ => None,
                    };
                    if alignment == Some(Alignment::Baseline) && !parallel.is_baseline() {
                        return Err(LayoutError::BaselineNotAllowed);
                    }
                    self.add_node(id, node)?;
                }
            }
        }
        Ok(())
    }

    fn add_node(&mut self, parent: SpringId, node: &Node) -> Result<SpringId, LayoutError> {
        let spring = match node {
            Node::Component {
                id,
                min,
                pref,
                max,
                alignment,
            } => {
                check_size(*min, *pref, *max, true)?;
                if !self.seen.insert(*id) {
                    return Err(LayoutError::DuplicateComponent {
                        component: id.to_string(),
                        axis: self.axis,
                    });
                }
                self.installed.components.push(*id);
                Spring::new(SpringKind::Component(ComponentSpring {
                    component: *id,
                    min: *min,
                    pref: *pref,
                    max: *max,
                    baseline: None,
                }))
                .with_alignment(*alignment)
            }
            Node::Gap { min, pref, max } => {
                check_size(*min, *pref, *max, false)?;
                Spring::new(SpringKind::Gap(GapSpring {
                    min: *min,
                    pref: pref.fixed().unwrap_or(0),
                    max: *max,
                }))
            }
            Node::PreferredGap {
                first,
                second,
                placement,
                pref,
                max,
            } => {
                check_preferred_gap(*pref, *max)?;
                Spring::new(SpringKind::PreferredGap(PreferredGapSpring {
                    source: *first,
                    target: *second,
                    placement: *placement,
                    pref: *pref,
                    max: *max,
                }))
            }
            Node::AutoGap { placement, pref, max } => {
                if *placement == ComponentPlacement::Indent {
                    return Err(LayoutError::InvalidPlacement);
                }
                check_preferred_gap(*pref, *max)?;
                self.installed.has_preferred_padding = true;
                Spring::new(SpringKind::AutoGap(AutoGapSpring::user(*placement, *pref, *max)))
            }
            Node::ContainerGap { pref, max } => {
                check_container_gap(*pref, *max)?;
                self.installed.has_preferred_padding = true;
                Spring::new(SpringKind::ContainerGap(ContainerGapSpring::new(*pref, *max)))
            }
            Node::Group { group, alignment } => {
                let child = self
                    .tree
                    .add_child(parent, Spring::new(group_kind(group)).with_alignment(*alignment));
                self.fill(child, group)?;
                return Ok(child);
            }
        };
        Ok(self.tree.add_child(parent, spring))
    }
}

fn group_kind(group: &Group) -> SpringKind {
    match group {
        Group::Sequential(_) => SpringKind::Sequential(SequentialSpring::default()),
        Group::Parallel(parallel) if parallel.is_baseline() => SpringKind::Baseline(BaselineSpring {
            children: Vec::new(),
            resizable: parallel.resizable,
            anchor: parallel.anchor_to_top,
            anchored_to_top: parallel.anchor_to_top.unwrap_or(true),
            metrics: None,
        }),
        Group::Parallel(parallel) => SpringKind::Parallel(ParallelSpring {
            children: Vec::new(),
            alignment: parallel.alignment,
            resizable: parallel.resizable,
        }),
    }
}

/// Components accept `Default` and `Preferred` everywhere; gaps need a
/// concrete preferred size and accept only `Preferred` for min/max.
pub(crate) fn check_size(min: Extent, pref: Extent, max: Extent, is_component: bool) -> Result<(), LayoutError> {
    check_resize_type(min, is_component)?;
    if is_component {
        check_resize_type(pref, true)?;
    } else if !matches!(pref, Extent::Fixed(value) if value >= 0) {
        return Err(LayoutError::InvalidSizeValue { value: pref });
    }
    check_resize_type(max, is_component)?;
    let ordered = |a: Extent, b: Extent| match (a, b) {
        (Extent::Fixed(a), Extent::Fixed(b)) => a <= b,
        _ => true,
    };
    if !ordered(min, pref) || !ordered(pref, max) {
        return Err(LayoutError::SizeOrder { min, pref, max });
    }
    Ok(())
}

fn check_resize_type(value: Extent, is_component: bool) -> Result<(), LayoutError> {
    let valid = match value {
        Extent::Fixed(value) => value >= 0,
        Extent::Preferred => true,
        Extent::Default => is_component,
    };
    if valid {
        Ok(())
    } else {
        Err(LayoutError::InvalidSizeValue { value })
    }
}

fn check_preferred_gap(pref: Extent, max: Extent) -> Result<(), LayoutError> {
    let invalid = matches!(pref, Extent::Fixed(value) if value < 0)
        || matches!(max, Extent::Fixed(value) if value < 0)
        || matches!((pref, max), (Extent::Fixed(pref), Extent::Fixed(max)) if pref > max);
    if invalid {
        Err(LayoutError::InvalidGap { pref, max })
    } else {
        Ok(())
    }
}

fn check_container_gap(pref: Extent, max: Extent) -> Result<(), LayoutError> {
    if pref == Extent::Preferred {
        return Err(LayoutError::InvalidGap { pref, max });
    }
    check_preferred_gap(pref, max)
}
