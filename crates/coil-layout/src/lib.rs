//! Group and spring layout for two-dimensional component hosts.
//!
//! Components are arranged by two independent trees, one per axis. Each
//! tree is built from sequential groups (children one after another) and
//! parallel groups (children on top of each other), with gaps and
//! components as leaves. Every node is a spring with a minimum, preferred
//! and maximum size.
//!
//! # Architecture
//!
//! 1. **Building**: `SequentialGroup` / `ParallelGroup` values describe a tree
//! 2. **Installing**: the engine validates a tree and copies it into a spring arena
//! 3. **Sizing**: springs compute and memoize their size ranges bottom-up
//! 4. **Padding**: style-suggested gaps are inserted and sized from live positions
//! 5. **Layout**: sizes are distributed top-down and bounds pushed to the host
//!
//! # Example
//!
//! ```ignore
//! use coil_layout::{GroupLayout, Panel, ParallelGroup, SequentialGroup, Widget};
//!
//! let mut panel = Panel::new();
//! let label = panel.add(Widget::fixed(Size::new(60, 20)).with_baseline(15));
//! let field = panel.add(Widget::new(Size::new(40, 24), Size::new(120, 24), Size::new(400, 24)).with_baseline(17));
//!
//! let mut layout = GroupLayout::new();
//! layout.set_auto_create_gaps(true);
//! layout.set_horizontal_group(SequentialGroup::new().component(label).component(field))?;
//! layout.set_vertical_group(ParallelGroup::aligned(Alignment::Baseline).component(label).component(field))?;
//!
//! let size = layout.preferred_size(&panel)?;
//! layout.layout(&mut panel, size.width, size.height)?;
//! ```

mod autopadding;
mod baseline;
mod builder;
mod describe;
mod engine;
mod info;
mod options;
mod panel;
mod solver;
mod spring;
mod tree;

pub use builder::{Group, ParallelGroup, SequentialGroup};
pub use engine::GroupLayout;
pub use options::LayoutOptions;
pub use panel::{Panel, Widget};

pub use coil_core::{
    Alignment, Axis, BaselineResizeBehavior, Component, ComponentId, ComponentPlacement, Container,
    DefaultGapStyle, Edge, Extent, GapStyle, Insets, LayoutError, Rect, Size, INFINITE,
};
