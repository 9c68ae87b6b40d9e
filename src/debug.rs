//! Graphviz rendering of a tree, for eyeballing the shape a sequence of operations produced.

use std::{collections::VecDeque, fmt};

use crate::Linkage;

/// Writes the tree rooted at `root` to `w` as a Graphviz digraph named `name`.
///
/// Nodes are labelled with `label(handle)` and filled with their color; each depth is laid out on
/// one rank, and missing children are drawn as points.
pub fn dotgraph<L, W, K, F>(
    links: &L,
    root: Option<L::Handle>,
    name: &str,
    mut w: W,
    mut label: F,
) -> fmt::Result
where
    L: Linkage,
    W: fmt::Write,
    K: fmt::Display,
    F: FnMut(L::Handle) -> K,
{
    let root = match root {
        Some(r) => r,
        None => return write!(w, "digraph \"graph-{name}\" {{}}"),
    };

    enum Item<H> {
        Node(H),
        Missing(u32),
    }

    let mut queue = VecDeque::new();
    queue.push_back(Item::Node(root));

    write!(
        w,
        "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
    )?;

    let mut missing = 0;
    let mut edges = String::new();

    while !queue.is_empty() {
        use fmt::Write;

        write!(w, "{{rank=same; ")?;

        for _ in 0..queue.len() {
            let node = match queue.pop_front() {
                Some(Item::Node(node)) => node,
                Some(Item::Missing(id)) => {
                    write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                    continue;
                }
                None => break,
            };

            let key = label(node);
            let (fill, font) = if links.is_black(node) {
                ("black", "white")
            } else {
                ("red", "black")
            };
            write!(
                w,
                "\"graph{name}-{key}\" [label=\"{key}\", style=filled, fillcolor={fill}, fontcolor={font}]; "
            )?;

            for child in [links.left(node), links.right(node)] {
                match child {
                    Some(child) => {
                        let child_key = label(child);
                        queue.push_back(Item::Node(child));
                        writeln!(edges, "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";")?;
                    }
                    None => {
                        queue.push_back(Item::Missing(missing));
                        writeln!(
                            edges,
                            "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                        )?;
                        missing += 1;
                    }
                }
            }
        }

        writeln!(w, "}}")?;
    }

    w.write_str(&edges)?;

    w.write_str(" }\n}")
}
