//! Gap suggestions supplied by the look and feel.

use crate::component::Component;
use crate::types::{ComponentPlacement, Edge};

/// Source of recommended spacing between components and around the host.
pub trait GapStyle {
    /// Gap to leave between `first` and `second`, where `second` sits on
    /// the `edge` side of `first`.
    fn preferred_gap(
        &self,
        first: &dyn Component,
        second: &dyn Component,
        placement: ComponentPlacement,
        edge: Edge,
    ) -> i32;

    /// Gap to leave between `component` and the `edge` of the host.
    fn container_gap(&self, component: &dyn Component, edge: Edge) -> i32;
}

/// Fixed-value gap style used when the host does not install its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefaultGapStyle {
    /// Gap between related components
    pub related: i32,
    /// Gap between unrelated components
    pub unrelated: i32,
    /// Horizontal indent of a subordinate component
    pub indent: i32,
    /// Gap between a component and the host edge
    pub container: i32,
}

impl Default for DefaultGapStyle {
    fn default() -> Self {
        Self {
            related: 6,
            unrelated: 12,
            indent: 6,
            container: 12,
        }
    }
}

impl GapStyle for DefaultGapStyle {
    fn preferred_gap(
        &self,
        _first: &dyn Component,
        _second: &dyn Component,
        placement: ComponentPlacement,
        edge: Edge,
    ) -> i32 {
        match placement {
            ComponentPlacement::Related => self.related,
            ComponentPlacement::Unrelated => self.unrelated,
            // Indenting only makes sense sideways
            ComponentPlacement::Indent => match edge {
                Edge::East | Edge::West => self.indent,
                Edge::North | Edge::South => self.related,
            },
        }
    }

    fn container_gap(&self, _component: &dyn Component, _edge: Edge) -> i32 {
        self.container
    }
}
