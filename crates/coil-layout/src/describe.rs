//! Human-readable dump of both spring trees.

use coil_core::Axis;

use crate::solver::Solver;
use crate::spring::{SpringId, SpringKind};

impl Solver<'_> {
    /// Describe the horizontal and vertical trees, one spring per line.
    pub(crate) fn describe(&mut self, horizontal: SpringId, vertical: SpringId) -> String {
        let mut out = String::from("HORIZONTAL\n");
        self.describe_spring(&mut out, horizontal, Axis::Horizontal, 1);
        out.push_str("\nVERTICAL\n");
        self.describe_spring(&mut out, vertical, Axis::Vertical, 1);
        out
    }

    fn describe_spring(&mut self, out: &mut String, id: SpringId, axis: Axis, depth: usize) {
        let min = self.minimum(id, axis);
        let pref = self.preferred(id, axis);
        let max = self.maximum(id, axis);

        let spring = self.tree.spring(id);
        let position = match spring.component() {
            Some(component) => match self.host.component(component).and_then(|c| c.name()) {
                Some(name) => format!("name={name} origin={} ", spring.origin),
                None => format!("{component} origin={} ", spring.origin),
            },
            None => String::new(),
        };
        let size = spring.size.map_or_else(|| "unset".to_string(), |size| size.to_string());
        let alignment = spring
            .alignment
            .map_or_else(|| "-".to_string(), |alignment| format!("{alignment:?}"));
        let padding = match &spring.kind {
            SpringKind::AutoGap(gap) => {
                let matches: Vec<String> = gap
                    .matches
                    .iter()
                    .map(|&(source, target)| self.match_description(source, target))
                    .collect();
                format!(", user_created={}, matches=[{}]", gap.user_created, matches.join(", "))
            }
            SpringKind::ContainerGap(gap) => {
                let edge = if gap.targets.is_empty() { "trailing" } else { "leading" };
                format!(", user_created=true, edge={edge}")
            }
            _ => String::new(),
        };

        out.push_str(&format!(
            "{}{} {}size={}, alignment={} prefs=[{} {} {}{}]\n",
            "  ".repeat(depth),
            spring.kind_name(),
            position,
            size,
            alignment,
            min,
            pref,
            max,
            padding
        ));

        for child in self.tree.children(id).to_vec() {
            self.describe_spring(out, child, axis, depth + 1);
        }
    }

    fn match_description(&self, source: SpringId, target: SpringId) -> String {
        let name = |id: SpringId| {
            self.tree
                .spring(id)
                .component()
                .map_or_else(|| "?".to_string(), |component| component.to_string())
        };
        format!("{}-{}", name(source), name(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Installer, ParallelGroup, SequentialGroup};
    use crate::panel::{Panel, Widget};
    use crate::tree::Tree;
    use coil_core::{DefaultGapStyle, Size};

    #[test]
    fn test_describe_lists_both_axes() {
        let mut panel = Panel::new();
        let ok = panel.add(Widget::fixed(Size::new(40, 20)).with_name("ok"));
        let cancel = panel.add(Widget::fixed(Size::new(60, 20)));
        let mut tree = Tree::new();
        let (h, _) = Installer::new(&mut tree, Axis::Horizontal)
            .install(&SequentialGroup::new().component(ok).gap(5).component(cancel).into())
            .unwrap();
        let (v, _) = Installer::new(&mut tree, Axis::Vertical)
            .install(&ParallelGroup::new().component(ok).component(cancel).into())
            .unwrap();
        let style = DefaultGapStyle::default();
        let text = Solver::new(&mut tree, &panel, &style, true).describe(h, v);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "HORIZONTAL");
        assert!(lines[1].starts_with("  SequentialGroup "));
        assert!(lines[1].ends_with("prefs=[105 105 105]"));
        assert!(lines[2].contains("name=ok origin=0 size="));
        assert!(lines[3].starts_with("    Gap "));
        assert!(lines[4].contains("#2 origin=0 size="));
        assert!(text.contains("\nVERTICAL\n  ParallelGroup "));
    }
}
