//! Collaborator traits implemented by the host toolkit.
//!
//! The engine never owns components. It identifies them by `ComponentId`
//! and asks the host `Container` for them whenever it needs a size, a
//! baseline, or somewhere to push the final bounds.

use crate::types::{BaselineResizeBehavior, Insets, Rect, Size};

/// Stable identity of a component within one host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentId(pub u64);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A laid out leaf: anything that can report a size range and accept bounds.
pub trait Component {
    fn minimum_size(&self) -> Size;

    fn preferred_size(&self) -> Size;

    fn maximum_size(&self) -> Size;

    /// Baseline measured from the top when sized to `width` x `height`.
    ///
    /// `None` (or a negative value) means the component has no baseline.
    fn baseline(&self, _width: i32, _height: i32) -> Option<i32> {
        None
    }

    fn baseline_resize_behavior(&self) -> BaselineResizeBehavior {
        BaselineResizeBehavior::Other
    }

    fn is_visible(&self) -> bool {
        true
    }

    /// Receive the bounds computed by a layout pass.
    fn set_bounds(&mut self, bounds: Rect);

    /// Name used in diagnostics.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// The host whose children are being laid out.
pub trait Container {
    fn component(&self, id: ComponentId) -> Option<&dyn Component>;

    fn component_mut(&mut self, id: ComponentId) -> Option<&mut dyn Component>;

    fn insets(&self) -> Insets {
        Insets::default()
    }

    /// Right-to-left hosts mirror every horizontal position.
    fn is_left_to_right(&self) -> bool {
        true
    }
}
