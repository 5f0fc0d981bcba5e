//! Property tests for the size and resize invariants.

use proptest::prelude::*;

use coil_layout::{
    ComponentId, GroupLayout, LayoutOptions, Panel, ParallelGroup, SequentialGroup, Size, Widget,
};

const HEIGHT: i32 = 20;

/// (min, pref, max) widths with min <= pref <= max.
fn width_range() -> impl Strategy<Value = (i32, i32, i32)> {
    (0..100i32, 0..100i32, 0..100i32).prop_map(|(min, extra_pref, extra_max)| {
        (min, min + extra_pref, min + extra_pref + extra_max)
    })
}

fn panel_of(ranges: &[(i32, i32, i32)]) -> (Panel, Vec<ComponentId>) {
    let mut panel = Panel::new();
    let ids = ranges
        .iter()
        .map(|&(min, pref, max)| {
            panel.add(Widget::new(
                Size::new(min, HEIGHT),
                Size::new(pref, HEIGHT),
                Size::new(max, HEIGHT),
            ))
        })
        .collect();
    (panel, ids)
}

fn row_layout(ids: &[ComponentId], options: LayoutOptions) -> GroupLayout {
    let mut layout = GroupLayout::with_options(options);
    let horizontal = ids.iter().fold(SequentialGroup::new(), |group, &id| group.component(id));
    let vertical = ids.iter().fold(ParallelGroup::new(), |group, &id| group.component(id));
    layout.set_horizontal_group(horizontal).unwrap();
    layout.set_vertical_group(vertical).unwrap();
    layout
}

proptest! {
    #[test]
    fn sequential_sizes_are_sums(ranges in prop::collection::vec(width_range(), 1..8)) {
        let (panel, ids) = panel_of(&ranges);
        let mut layout = row_layout(&ids, LayoutOptions::default());

        let min = layout.minimum_size(&panel).unwrap().width;
        let pref = layout.preferred_size(&panel).unwrap().width;
        let max = layout.maximum_size(&panel).unwrap().width;
        prop_assert_eq!(min, ranges.iter().map(|r| r.0).sum::<i32>());
        prop_assert_eq!(pref, ranges.iter().map(|r| r.1).sum::<i32>());
        prop_assert_eq!(max, ranges.iter().map(|r| r.2).sum::<i32>());
        prop_assert!(min <= pref && pref <= max);
    }

    #[test]
    fn parallel_preferred_is_max(ranges in prop::collection::vec(width_range(), 1..8)) {
        let (panel, ids) = panel_of(&ranges);
        let mut layout = GroupLayout::new();
        let horizontal = ids.iter().fold(ParallelGroup::new(), |group, &id| group.component(id));
        let vertical = ids.iter().fold(SequentialGroup::new(), |group, &id| group.component(id));
        layout.set_horizontal_group(horizontal).unwrap();
        layout.set_vertical_group(vertical).unwrap();

        let pref = layout.preferred_size(&panel).unwrap();
        prop_assert_eq!(pref.width, ranges.iter().map(|r| r.1).max().unwrap_or(0));
        prop_assert_eq!(pref.height, HEIGHT * ranges.len() as i32);
    }

    #[test]
    fn resize_conserves_space(
        ranges in prop::collection::vec(width_range(), 1..8),
        fraction in 0.0f64..=1.0,
    ) {
        let (mut panel, ids) = panel_of(&ranges);
        let mut layout = row_layout(&ids, LayoutOptions::default());
        let min: i32 = ranges.iter().map(|r| r.0).sum();
        let max: i32 = ranges.iter().map(|r| r.2).sum();
        let width = min + ((max - min) as f64 * fraction) as i32;

        layout.layout(&mut panel, width, HEIGHT).unwrap();
        let mut total = 0;
        let mut x = 0;
        for (&id, &(lo, _, hi)) in ids.iter().zip(&ranges) {
            let bounds = panel.bounds(id).unwrap();
            prop_assert!(lo <= bounds.width && bounds.width <= hi);
            prop_assert_eq!(bounds.x, x);
            x += bounds.width;
            total += bounds.width;
        }
        prop_assert_eq!(total, width);
    }

    #[test]
    fn layout_is_idempotent(
        ranges in prop::collection::vec(width_range(), 1..6),
        width in 0..600i32,
        height in 0..100i32,
    ) {
        let (mut panel, ids) = panel_of(&ranges);
        let options = LayoutOptions {
            auto_create_gaps: true,
            auto_create_container_gaps: true,
            ..Default::default()
        };
        let mut layout = row_layout(&ids, options);

        layout.layout(&mut panel, width, height).unwrap();
        let first: Vec<_> = ids.iter().map(|&id| panel.bounds(id)).collect();
        layout.layout(&mut panel, width, height).unwrap();
        let second: Vec<_> = ids.iter().map(|&id| panel.bounds(id)).collect();
        prop_assert_eq!(first, second);
    }
}
