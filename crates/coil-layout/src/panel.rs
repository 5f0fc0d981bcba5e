//! A minimal in-memory host.
//!
//! `Panel` owns plain `Widget` values and implements `Container`, which is
//! enough to drive the engine in tests, benchmarks, and headless tools.

use indexmap::IndexMap;

use coil_core::{BaselineResizeBehavior, Component, ComponentId, Container, Insets, Rect, Size};

/// A component with fixed size hints.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub minimum: Size,
    pub preferred: Size,
    pub maximum: Size,
    /// Baseline at the preferred height
    pub baseline: Option<i32>,
    pub resize_behavior: BaselineResizeBehavior,
    pub visible: bool,
    pub name: Option<String>,
    /// Last bounds pushed by a layout pass
    pub bounds: Rect,
}

impl Widget {
    pub fn new(minimum: Size, preferred: Size, maximum: Size) -> Self {
        Self {
            minimum,
            preferred,
            maximum,
            baseline: None,
            resize_behavior: BaselineResizeBehavior::Other,
            visible: true,
            name: None,
            bounds: Rect::default(),
        }
    }

    /// A widget that cannot be resized.
    pub fn fixed(size: Size) -> Self {
        Self::new(size, size, size)
    }

    pub fn with_baseline(mut self, baseline: i32) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn with_resize_behavior(mut self, behavior: BaselineResizeBehavior) -> Self {
        self.resize_behavior = behavior;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Component for Widget {
    fn minimum_size(&self) -> Size {
        self.minimum
    }

    fn preferred_size(&self) -> Size {
        self.preferred
    }

    fn maximum_size(&self) -> Size {
        self.maximum
    }

    fn baseline(&self, _width: i32, height: i32) -> Option<i32> {
        let baseline = self.baseline.filter(|&b| b >= 0)?;
        let extra = height - self.preferred.height;
        Some(match self.resize_behavior {
            BaselineResizeBehavior::ConstantAscent | BaselineResizeBehavior::Other => baseline,
            BaselineResizeBehavior::ConstantDescent => baseline + extra,
            BaselineResizeBehavior::CenterOffset => baseline + extra / 2,
        })
    }

    fn baseline_resize_behavior(&self) -> BaselineResizeBehavior {
        self.resize_behavior
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Host holding widgets in insertion order.
#[derive(Debug, Clone)]
pub struct Panel {
    widgets: IndexMap<ComponentId, Widget>,
    next_id: u64,
    insets: Insets,
    left_to_right: bool,
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel {
    pub fn new() -> Self {
        Self {
            widgets: IndexMap::new(),
            next_id: 1,
            insets: Insets::default(),
            left_to_right: true,
        }
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    pub fn set_left_to_right(&mut self, left_to_right: bool) {
        self.left_to_right = left_to_right;
    }

    /// Add a widget and return its id.
    pub fn add(&mut self, widget: Widget) -> ComponentId {
        let id = ComponentId(self.next_id);
        self.next_id += 1;
        self.widgets.insert(id, widget);
        id
    }

    /// Take a widget out of the panel.
    pub fn remove(&mut self, id: ComponentId) -> Option<Widget> {
        self.widgets.shift_remove(&id)
    }

    pub fn widget(&self, id: ComponentId) -> Option<&Widget> {
        self.widgets.get(&id)
    }

    pub fn widget_mut(&mut self, id: ComponentId) -> Option<&mut Widget> {
        self.widgets.get_mut(&id)
    }

    /// Bounds assigned by the last layout pass.
    pub fn bounds(&self, id: ComponentId) -> Option<Rect> {
        self.widgets.get(&id).map(|widget| widget.bounds)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl Container for Panel {
    fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        self.widgets.get(&id).map(|widget| widget as &dyn Component)
    }

    fn component_mut(&mut self, id: ComponentId) -> Option<&mut dyn Component> {
        self.widgets.get_mut(&id).map(|widget| widget as &mut dyn Component)
    }

    fn insets(&self) -> Insets {
        self.insets
    }

    fn is_left_to_right(&self) -> bool {
        self.left_to_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut panel = Panel::new();
        let a = panel.add(Widget::fixed(Size::new(1, 1)));
        let b = panel.add(Widget::fixed(Size::new(1, 1)));
        assert_eq!(a, ComponentId(1));
        assert_eq!(b, ComponentId(2));
        assert_eq!(panel.len(), 2);
    }

    #[test]
    fn test_baseline_follows_resize_behavior() {
        let widget = |behavior| {
            Widget::fixed(Size::new(10, 20))
                .with_baseline(15)
                .with_resize_behavior(behavior)
        };
        assert_eq!(widget(BaselineResizeBehavior::ConstantAscent).baseline(10, 30), Some(15));
        assert_eq!(widget(BaselineResizeBehavior::ConstantDescent).baseline(10, 30), Some(25));
        assert_eq!(widget(BaselineResizeBehavior::CenterOffset).baseline(10, 30), Some(20));
        assert_eq!(widget(BaselineResizeBehavior::Other).baseline(10, 30), Some(15));
    }

    #[test]
    fn test_no_baseline() {
        assert_eq!(Widget::fixed(Size::new(10, 20)).baseline(10, 20), None);
        assert_eq!(Widget::fixed(Size::new(10, 20)).with_baseline(-1).baseline(10, 20), None);
    }

    #[test]
    fn test_set_bounds_through_container() {
        let mut panel = Panel::new();
        let id = panel.add(Widget::fixed(Size::new(5, 5)));
        let bounds = Rect::new(1, 2, 3, 4);
        if let Some(component) = panel.component_mut(id) {
            component.set_bounds(bounds);
        }
        assert_eq!(panel.bounds(id), Some(bounds));
    }
}
