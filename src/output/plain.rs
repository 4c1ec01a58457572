//! Plain text output formatters
//!
//! Provides simple text output for terminals and logs, plus a Graphviz DOT
//! formatter for the current view.
//!
//! @module output/plain

use super::{NamedPath, ViewFormatter};
use crate::explore::{Mutation, PartView, Transaction, ViewSnapshot};
use crate::graph::model::ModelStats;
use crate::graph::types::NodeRole;

// =============================================================================
// PLAIN TEXT FORMATTER
// =============================================================================

/// Plain text formatter
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }

    fn write_part(output: &mut String, part: &PartView, depth: usize) {
        let indent = "  ".repeat(depth);
        if part.is_group {
            let marker = if part.expanded == Some(true) { '-' } else { '+' };
            output.push_str(&format!("{}[{}] {}", indent, marker, part.key));
        } else {
            output.push_str(&format!("{}{}", indent, part.key));
            match part.role {
                Some(NodeRole::Source) => output.push_str(" (source)"),
                Some(NodeRole::Sink) => output.push_str(" (sink)"),
                _ => {}
            }
            if !part.collapsed {
                output.push_str(" >");
            }
        }
        if part.highlighted {
            output.push_str(" *");
        }
        output.push('\n');

        for member in &part.members {
            Self::write_part(output, member, depth + 1);
        }
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewFormatter for PlainFormatter {
    fn format_view(&self, view: &ViewSnapshot) -> String {
        let mut output = String::new();

        let layers: Vec<_> = view.layers.present().iter().map(|l| l.to_string()).collect();
        output.push_str(&format!(
            "Layers: {}\n",
            if layers.is_empty() { "none".to_string() } else { layers.join(", ") }
        ));

        if view.is_empty() {
            output.push_str("\nNothing visible.\n");
            return output;
        }

        output.push('\n');
        for part in &view.parts {
            Self::write_part(&mut output, part, 0);
        }

        if !view.links.is_empty() {
            output.push_str("\nLinks:\n");
            for link in &view.links {
                output.push_str(&format!(
                    "  {} -> {}{}\n",
                    link.from,
                    link.to,
                    if link.highlighted { " *" } else { "" }
                ));
            }
        }
        output
    }

    fn format_stats(&self, stats: &ModelStats) -> String {
        stats.to_string()
    }

    fn format_paths(&self, paths: &[NamedPath]) -> String {
        if paths.is_empty() {
            return "No recommended paths.\n".to_string();
        }
        let mut output = String::new();
        for path in paths {
            output.push_str(&format!("{:>3}: {}\n", path.index, path.nodes.join(" -> ")));
        }
        output
    }

    fn format_transaction(&self, transaction: &Transaction) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} ({} changes)\n",
            transaction.name,
            transaction.mutations.len()
        ));
        for mutation in &transaction.mutations {
            let line = match mutation {
                Mutation::AddPart { key, group } => match group {
                    Some(group) => format!("add {} in {}", key, group),
                    None => format!("add {}", key),
                },
                Mutation::RemovePart { key } => format!("remove {}", key),
                Mutation::SetGroup { key, group } => {
                    format!("move {} to {}", key, group.as_deref().unwrap_or("top level"))
                }
                Mutation::SetProperty {
                    key,
                    property,
                    value,
                } => format!("{} {:?} = {}", key, property, value),
                Mutation::SetLinkProperty {
                    from,
                    to,
                    property,
                    value,
                } => format!("{} -> {} {:?} = {}", from, to, property, value),
            };
            output.push_str(&format!("  {}\n", line));
        }
        output
    }
}

// =============================================================================
// DOT FORMATTER (Graph Visualization)
// =============================================================================

/// DOT formatter for graph visualization
pub struct DotFormatter;

impl DotFormatter {
    pub fn new() -> Self {
        Self
    }

    fn escape_dot(s: &str) -> String {
        s.replace('\\', "\\\\").replace('"', "\\\"")
    }

    fn write_part(output: &mut String, part: &PartView, depth: usize, clusters: &mut usize) {
        let indent = "  ".repeat(depth + 1);
        let key = Self::escape_dot(&part.key);

        if part.is_group {
            output.push_str(&format!("{}subgraph cluster_{} {{\n", indent, clusters));
            *clusters += 1;
            output.push_str(&format!("{}  label=\"{}\";\n", indent, key));
            if part.highlighted {
                output.push_str(&format!("{}  color=red;\n", indent));
            }
            for member in &part.members {
                Self::write_part(output, member, depth + 1, clusters);
            }
            output.push_str(&format!("{}}}\n", indent));
        } else {
            let color = part.color.as_deref().unwrap_or("white");
            let border = if part.highlighted { ", color=red, penwidth=3" } else { "" };
            output.push_str(&format!(
                "{}\"{}\" [fillcolor=\"{}\"{}];\n",
                indent, key, color, border
            ));
        }
    }
}

impl Default for DotFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewFormatter for DotFormatter {
    fn format_view(&self, view: &ViewSnapshot) -> String {
        let mut output = String::from("digraph view {\n");
        output.push_str("  rankdir=TB;\n");
        output.push_str("  node [shape=box, style=\"rounded,filled\"];\n\n");

        let mut clusters = 0;
        for part in &view.parts {
            Self::write_part(&mut output, part, 0, &mut clusters);
        }

        if !view.links.is_empty() {
            output.push('\n');
        }
        for link in &view.links {
            let style = if link.highlighted { " [color=red, penwidth=2]" } else { "" };
            output.push_str(&format!(
                "  \"{}\" -> \"{}\"{};\n",
                Self::escape_dot(&link.from),
                Self::escape_dot(&link.to),
                style
            ));
        }

        output.push_str("}\n");
        output
    }

    fn format_stats(&self, _stats: &ModelStats) -> String {
        String::from("// Stats not suitable for DOT format\n")
    }

    fn format_paths(&self, paths: &[NamedPath]) -> String {
        let mut output = String::from("digraph paths {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box];\n");
        for path in paths {
            for pair in path.nodes.windows(2) {
                output.push_str(&format!(
                    "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
                    Self::escape_dot(&pair[0]),
                    Self::escape_dot(&pair[1]),
                    path.index
                ));
            }
        }
        output.push_str("}\n");
        output
    }

    fn format_transaction(&self, transaction: &Transaction) -> String {
        format!(
            "// {}: {} changes\n",
            Self::escape_dot(&transaction.name),
            transaction.mutations.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ColorConfig;
    use crate::explore::engine::tests::scenario_engine;
    use crate::explore::Property;

    #[test]
    fn test_plain_view_tree() {
        let mut engine = scenario_engine();
        engine.highlight_recommended().unwrap();
        let text = PlainFormatter::new().format_view(&engine.snapshot(&ColorConfig::default()));

        let expected = "\
Layers: package, class, method

[+] p
  [+] p.C
    [+] p.C.m
      v1 (source) > *
      v2 (sink) > *
      f
      v3

Links:
  v1 -> v2 *
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_plain_empty_view() {
        let mut engine = scenario_engine();
        for layer in crate::graph::types::Layer::ALL {
            engine.remove_layer(layer).unwrap();
        }
        let view = engine.snapshot(&ColorConfig::default());
        let text = PlainFormatter::new().format_view(&view);
        assert!(text.starts_with("Layers: none\n"));
        assert!(text.contains("v1 (source)"));
    }

    #[test]
    fn test_dot_view_clusters_and_colors() {
        let mut engine = scenario_engine();
        engine.expand("v1").unwrap();
        let text = DotFormatter::new().format_view(&engine.snapshot(&ColorConfig::default()));

        assert!(text.starts_with("digraph view {\n"));
        assert!(text.contains("subgraph cluster_0 {"));
        assert!(text.contains("label=\"p.C.m\";"));
        assert!(text.contains("\"v1\" [fillcolor=\"gold\"];"));
        assert!(text.contains("\"v2\" [fillcolor=\"aquamarine\"];"));
        assert!(text.contains("\"f\" [fillcolor=\"lightblue\"];"));
        assert!(text.contains("  \"v1\" -> \"v2\";\n"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_plain_paths() {
        let paths = vec![NamedPath {
            index: 0,
            nodes: vec!["v1".to_string(), "v2".to_string()],
        }];
        assert_eq!(PlainFormatter::new().format_paths(&paths), "  0: v1 -> v2\n");
        assert_eq!(PlainFormatter::new().format_paths(&[]), "No recommended paths.\n");
    }

    #[test]
    fn test_plain_transaction_lines() {
        let transaction = Transaction {
            name: "collapse".to_string(),
            mutations: vec![
                Mutation::SetProperty {
                    key: "v1".into(),
                    property: Property::IsCollapsed,
                    value: true,
                },
                Mutation::SetGroup {
                    key: "p.C.m".into(),
                    group: None,
                },
            ],
        };
        assert_eq!(
            PlainFormatter::new().format_transaction(&transaction),
            "collapse (2 changes)\n  v1 IsCollapsed = true\n  move p.C.m to top level\n"
        );
    }
}
