//! Spring node data.
//!
//! Every node of a layout tree is a `Spring`: a one-dimensional range with
//! memoized minimum/preferred/maximum sizes and, once resolved, an origin
//! and a size. The variant payload in `SpringKind` carries what is specific
//! to components, gaps, and groups.

use smallvec::SmallVec;

use coil_core::{Alignment, ComponentId, ComponentPlacement, Extent, INFINITE};

/// Index of a spring in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SpringId(pub usize);

/// Which of the three memoized sizes is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeType {
    Minimum,
    Preferred,
    Maximum,
}

impl SizeType {
    fn slot(self) -> usize {
        match self {
            SizeType::Minimum => 0,
            SizeType::Preferred => 1,
            SizeType::Maximum => 2,
        }
    }
}

/// Clamp a calculated size into `[0, INFINITE]`.
pub(crate) fn constrain(value: i32) -> i32 {
    value.clamp(0, INFINITE)
}

/// A node in a spring tree.
#[derive(Debug, Clone)]
pub(crate) struct Spring {
    pub kind: SpringKind,
    /// Owning group (None for the engine's top-level groups)
    pub parent: Option<SpringId>,
    /// Alignment override inside a parallel group
    pub alignment: Option<Alignment>,
    cache: [Option<i32>; 3],
    /// Resolved size, None until the spring is laid out
    pub size: Option<i32>,
    /// Resolved origin along the axis
    pub origin: i32,
}

impl Spring {
    pub fn new(kind: SpringKind) -> Self {
        Self {
            kind,
            parent: None,
            alignment: None,
            cache: [None; 3],
            size: None,
            origin: 0,
        }
    }

    pub fn with_alignment(mut self, alignment: Option<Alignment>) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn cached(&self, size_type: SizeType) -> Option<i32> {
        self.cache[size_type.slot()]
    }

    pub fn store(&mut self, size_type: SizeType, value: i32) {
        self.cache[size_type.slot()] = Some(value);
    }

    /// Forget the resolved size and the memoized sizes of this node only.
    ///
    /// Autopadding springs remember the size they had so the next padding
    /// calculation can be damped against it.
    pub fn unset(&mut self) {
        let last = self.size;
        self.size = None;
        self.cache = [None; 3];
        match &mut self.kind {
            SpringKind::AutoGap(gap) => {
                gap.last_size = last;
                gap.computed = 0;
            }
            SpringKind::ContainerGap(gap) => {
                gap.last_size = last;
                gap.computed = 0;
            }
            SpringKind::Baseline(group) => group.metrics = None,
            SpringKind::Component(component) => component.baseline = None,
            _ => {}
        }
    }

    /// Child springs, if this is a group.
    pub fn children(&self) -> Option<&[SpringId]> {
        match &self.kind {
            SpringKind::Sequential(group) => Some(&group.children),
            SpringKind::Parallel(group) => Some(&group.children),
            SpringKind::Baseline(group) => Some(&group.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<SpringId>> {
        match &mut self.kind {
            SpringKind::Sequential(group) => Some(&mut group.children),
            SpringKind::Parallel(group) => Some(&mut group.children),
            SpringKind::Baseline(group) => Some(&mut group.children),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        self.children().is_some()
    }

    /// True for both engine-synthesized and user-created padding springs.
    pub fn is_autopadding(&self) -> bool {
        matches!(self.kind, SpringKind::AutoGap(_) | SpringKind::ContainerGap(_))
    }

    /// True for parallel groups, baseline groups included.
    pub fn is_parallel(&self) -> bool {
        matches!(self.kind, SpringKind::Parallel(_) | SpringKind::Baseline(_))
    }

    pub fn component(&self) -> Option<ComponentId> {
        match &self.kind {
            SpringKind::Component(spring) => Some(spring.component),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SpringKind::Component(_) => "Component",
            SpringKind::Gap(_) => "Gap",
            SpringKind::PreferredGap(_) => "PreferredGap",
            SpringKind::AutoGap(_) => "AutoPreferredGap",
            SpringKind::ContainerGap(_) => "ContainerAutoPreferredGap",
            SpringKind::Sequential(_) => "SequentialGroup",
            SpringKind::Parallel(_) => "ParallelGroup",
            SpringKind::Baseline(_) => "BaselineGroup",
        }
    }
}

/// Closed set of spring variants.
#[derive(Debug, Clone)]
pub(crate) enum SpringKind {
    Component(ComponentSpring),
    Gap(GapSpring),
    PreferredGap(PreferredGapSpring),
    AutoGap(AutoGapSpring),
    ContainerGap(ContainerGapSpring),
    Sequential(SequentialSpring),
    Parallel(ParallelSpring),
    Baseline(BaselineSpring),
}

/// A spring bound to a host component.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ComponentSpring {
    pub component: ComponentId,
    pub min: Extent,
    pub pref: Extent,
    pub max: Extent,
    /// Baseline found at the preferred size
    pub baseline: Option<i32>,
}

/// Fixed-range gap.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GapSpring {
    pub min: Extent,
    pub pref: i32,
    pub max: Extent,
}

/// Style-suggested gap between two explicit components.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PreferredGapSpring {
    pub source: ComponentId,
    pub target: ComponentId,
    pub placement: ComponentPlacement,
    pub pref: Extent,
    pub max: Extent,
}

/// Padding between whichever components end up adjacent to it.
#[derive(Debug, Clone)]
pub(crate) struct AutoGapSpring {
    pub placement: ComponentPlacement,
    pub pref: Extent,
    pub max: Extent,
    /// Created through the builder rather than inserted by the engine
    pub user_created: bool,
    /// Component springs leading into this gap
    pub sources: SmallVec<[SpringId; 2]>,
    /// (source, target) pairs that share a parallel ancestor on the other axis
    pub matches: SmallVec<[(SpringId, SpringId); 2]>,
    pub computed: i32,
    pub last_size: Option<i32>,
}

impl AutoGapSpring {
    /// Engine-synthesized padding between adjacent components.
    pub fn synthesized() -> Self {
        Self {
            placement: ComponentPlacement::Related,
            pref: Extent::Preferred,
            max: Extent::Preferred,
            user_created: false,
            sources: SmallVec::new(),
            matches: SmallVec::new(),
            computed: 0,
            last_size: None,
        }
    }

    pub fn user(placement: ComponentPlacement, pref: Extent, max: Extent) -> Self {
        Self {
            placement,
            pref,
            max,
            user_created: true,
            ..Self::synthesized()
        }
    }

    /// Drop everything learned during the last autopadding insertion.
    pub fn reset(&mut self) {
        self.computed = 0;
        self.sources.clear();
        self.matches.clear();
    }
}

/// Padding between components and the edge of the host.
#[derive(Debug, Clone)]
pub(crate) struct ContainerGapSpring {
    pub pref: Extent,
    pub max: Extent,
    /// Components this gap trails (trailing edge)
    pub sources: SmallVec<[SpringId; 2]>,
    /// Components this gap leads into (leading edge)
    pub targets: SmallVec<[SpringId; 2]>,
    pub computed: i32,
    pub last_size: Option<i32>,
}

impl ContainerGapSpring {
    pub fn new(pref: Extent, max: Extent) -> Self {
        Self {
            pref,
            max,
            sources: SmallVec::new(),
            targets: SmallVec::new(),
            computed: 0,
            last_size: None,
        }
    }

    pub fn reset(&mut self) {
        self.computed = 0;
        self.sources.clear();
        self.targets.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct SequentialSpring {
    pub children: Vec<SpringId>,
    /// Child whose baseline is the baseline of the sequence
    pub baseline_child: Option<SpringId>,
}

#[derive(Debug, Clone)]
pub(crate) struct ParallelSpring {
    pub children: Vec<SpringId>,
    pub alignment: Alignment,
    pub resizable: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct BaselineSpring {
    pub children: Vec<SpringId>,
    pub resizable: bool,
    /// Explicit anchor; None derives it from the children
    pub anchor: Option<bool>,
    pub anchored_to_top: bool,
    pub metrics: Option<BaselineMetrics>,
}

/// Baseline envelope of a baseline group at its preferred size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BaselineMetrics {
    /// Largest baseline among baseline-aligned children
    pub pref_ascent: i32,
    /// Largest (preferred height - baseline) among them
    pub pref_descent: i32,
    pub all_have_baseline: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constrain_clamps_both_ends() {
        assert_eq!(constrain(-5), 0);
        assert_eq!(constrain(i32::MAX), INFINITE);
        assert_eq!(constrain(42), 42);
    }

    #[test]
    fn test_unset_carries_last_size() {
        let mut spring = Spring::new(SpringKind::AutoGap(AutoGapSpring::synthesized()));
        spring.size = Some(7);
        spring.store(SizeType::Preferred, 7);
        spring.unset();
        assert_eq!(spring.size, None);
        assert_eq!(spring.cached(SizeType::Preferred), None);
        match &spring.kind {
            SpringKind::AutoGap(gap) => assert_eq!(gap.last_size, Some(7)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_user_gap_keeps_flag() {
        let gap = AutoGapSpring::user(ComponentPlacement::Unrelated, Extent::Fixed(4), Extent::Preferred);
        assert!(gap.user_created);
        assert!(!AutoGapSpring::synthesized().user_created);
    }
}
