//! Graphviz DOT text emission.
//!
//! String production only; writing files or invoking `dot` is left to the
//! caller.

use lazy_static::lazy_static;
use regex::Regex;

use crate::graph::Graph;
use crate::node::Node;

lazy_static! {
    static ref BARE_ID_RE: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

fn quoted(id: &str) -> String {
    if BARE_ID_RE.is_match(id) {
        id.to_string()
    } else {
        format!("\"{}\"", id.replace('"', "\\\""))
    }
}

impl Graph {
    /// Renders the graph as a Graphviz digraph with edge weights as labels.
    /// Ids that are not bare DOT identifiers are quoted.
    pub fn to_dot(&self, name: &str) -> String {
        let mut out = format!("digraph {} {{\n", quoted(name));
        let mut nodes: Vec<&Node> = self.nodes().collect();
        nodes.sort_by(|a, b| a.id().cmp(b.id()));
        for node in nodes {
            let mut children: Vec<(&str, i32)> = node
                .children()
                .filter_map(|(child, weight)| self.id_of(child).map(|id| (id, weight)))
                .collect();
            children.sort();
            for (child, weight) in children {
                out.push_str(&format!(
                    "    {} -> {} [label=\"{}\"];\n",
                    quoted(node.id()),
                    quoted(child),
                    weight
                ));
            }
        }
        out.push_str("}\n");
        out
    }
}
