//! Core value types for the layout engine.

/// Largest size a spring may report.
///
/// Half of `i32::MAX` so that summing two constrained values along a
/// sequential group can never overflow.
pub const INFINITE: i32 = i32::MAX >> 1;

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Left to right
    Horizontal,
    /// Top to bottom
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const ALL: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// The perpendicular axis.
    pub fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Horizontal => f.write_str("horizontal"),
            Axis::Vertical => f.write_str("vertical"),
        }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0, height: 0 };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Size along an axis.
    pub fn along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Axis-aligned rectangle, position relative to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

/// Space reserved by the host around its laid out content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    /// Create uniform insets.
    pub fn uniform(value: i32) -> Self {
        Self {
            top: value,
            left: value,
            bottom: value,
            right: value,
        }
    }

    /// Total horizontal insets.
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Total vertical insets.
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

/// Where a child is placed when its parallel group is larger than it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    /// Origin side (left, or right in right-to-left hosts; top)
    #[default]
    Leading,
    /// Far side
    Trailing,
    /// Centered
    Center,
    /// Along the shared text baseline (vertical axis only)
    Baseline,
}

/// How a component's baseline moves as its height changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaselineResizeBehavior {
    /// Baseline stays a fixed distance from the top
    ConstantAscent,
    /// Baseline stays a fixed distance from the bottom
    ConstantDescent,
    /// Baseline stays a fixed distance from the center
    CenterOffset,
    /// Baseline cannot be derived from the height
    #[default]
    Other,
}

/// Side of a component a gap is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edge {
    North,
    South,
    East,
    West,
}

/// Relationship between two components separated by a preferred gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentPlacement {
    /// Visually related components
    #[default]
    Related,
    /// Unrelated components
    Unrelated,
    /// The second component is indented under the first
    Indent,
}

/// A size argument for a component or gap.
///
/// `Default` reads the component's own size for that bound, `Preferred`
/// reuses the preferred size, `Fixed` is an explicit pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extent {
    #[default]
    Default,
    Preferred,
    Fixed(i32),
}

impl Extent {
    /// The explicit pixel value, if any.
    pub fn fixed(self) -> Option<i32> {
        match self {
            Extent::Fixed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_fixed(self) -> bool {
        matches!(self, Extent::Fixed(_))
    }
}

impl From<i32> for Extent {
    fn from(value: i32) -> Self {
        Extent::Fixed(value)
    }
}
