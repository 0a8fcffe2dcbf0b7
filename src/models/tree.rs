use serde::{Deserialize, Serialize};

/// One node of the repository file tree.
///
/// Leaf-ness is explicit in the type rather than encoded as an optional
/// children list. On the wire a leaf serializes as `{"label": ...}` with no
/// `children` key, an interior node as `{"label": ..., "children": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathNode {
    Interior { label: String, children: Vec<PathNode> },
    Leaf { label: String },
}

impl PathNode {
    pub fn label(&self) -> &str {
        match self {
            PathNode::Interior { label, .. } | PathNode::Leaf { label } => label,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, PathNode::Leaf { .. })
    }

    pub fn children(&self) -> &[PathNode] {
        match self {
            PathNode::Interior { children, .. } => children,
            PathNode::Leaf { .. } => &[],
        }
    }
}

/// Build a file tree from slash-delimited paths.
///
/// Siblings keep first-seen order, so identical path lists always produce
/// identical trees. A prefix first seen as a leaf (`"a"`) is promoted to an
/// interior node when a longer path (`"a/b"`) later descends through it;
/// its original leaf-ness is discarded. Empty segments (leading, trailing,
/// or doubled slashes) become nodes with empty labels.
pub fn build_tree<I, S>(paths: I) -> Vec<PathNode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = Vec::new();
    for path in paths {
        let segments: Vec<&str> = path.as_ref().split('/').collect();
        insert_path(&mut root, &segments);
    }
    root
}

fn insert_path(level: &mut Vec<PathNode>, segments: &[&str]) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };

    let idx = match level.iter().position(|n| n.label() == *segment) {
        Some(i) => i,
        None => {
            let node = if rest.is_empty() {
                PathNode::Leaf { label: (*segment).to_string() }
            } else {
                PathNode::Interior { label: (*segment).to_string(), children: Vec::new() }
            };
            level.push(node);
            level.len() - 1
        }
    };

    if rest.is_empty() {
        // The path terminates on an existing node; an interior node here
        // keeps its children (leaf-ness was already discarded).
        return;
    }

    let node = &mut level[idx];
    if let PathNode::Leaf { label } = node {
        let label = std::mem::take(label);
        *node = PathNode::Interior { label, children: Vec::new() };
    }
    if let PathNode::Interior { children, .. } = node {
        insert_path(children, rest);
    }
}
