//! Error types for the layout engine.

use crate::component::ComponentId;
use crate::types::{Axis, Extent};
use thiserror::Error;

/// Configuration errors reported by the layout engine.
///
/// All of these are programmer errors: the tree or the host is set up
/// inconsistently. They are raised before any bounds are assigned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Invalid size {value:?}: must be >= 0 or one of the allowed sentinels")]
    InvalidSizeValue { value: Extent },

    #[error("Following is not met: min <= pref <= max ({min:?}, {pref:?}, {max:?})")]
    SizeOrder { min: Extent, pref: Extent, max: Extent },

    #[error("Invalid gap: pref {pref:?} and max {max:?} must be sentinels or >= 0 with pref <= max")]
    InvalidGap { pref: Extent, max: Extent },

    #[error("Placement must be Related or Unrelated for an automatic preferred gap")]
    InvalidPlacement,

    #[error("Alignment must be one of Leading, Trailing or Center outside a baseline group")]
    BaselineNotAllowed,

    #[error("Baseline must be used along vertical axis")]
    BaselineOnHorizontalAxis,

    #[error("Component {component} is not attached to a {axis} group")]
    MissingAxis { component: String, axis: Axis },

    #[error("Component {component} is added more than once to the {axis} group")]
    DuplicateComponent { component: String, axis: Axis },

    #[error("Host does not provide component {id}")]
    UnknownComponent { id: ComponentId },

    #[error("Component {id} is not part of this layout")]
    NotRegistered { id: ComponentId },

    #[error("Component {id} is already part of this layout")]
    AlreadyRegistered { id: ComponentId },

    #[error("At least one component is required to link sizes")]
    EmptyLink,
}
