//! Structural diffing of IR snapshots.
//!
//! Both trees are indexed by each node's full hierarchical path, so the
//! diff is a join on paths rather than a tree alignment. A node present
//! only in `after` is added, one present only in `before` is deleted, and
//! shared nodes are compared property by property over the union of their
//! style, text and auto-layout keys.
//!
//! Canonical snapshots already name every node by its full path, while the
//! design tool keeps only the local part on each layer. Paths are therefore
//! built while walking: a name that already contains the separator is taken
//! as a full path, any other name is joined onto its parent's path.

mod report;

pub use report::{
    ChangeCounts, Changeset, NodeChange, NodeStatus, PatchPlan, PatchTarget, PropertyChange,
    LAYOUT_INTEGRITY_KEY,
};

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::ir::{IrDocument, IrNode, NodeType};
use crate::naming::DEFAULT_SEPARATOR;

/// Diff options.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffOptions {
    /// Width/height differences up to this many pixels are ignored.
    pub size_tolerance: f64,
    /// Do not report added design-side GROUP/FRAME wrappers that carry no
    /// styling, text or auto layout.
    pub ignore_inert_wrappers: bool,
    /// Path separator used to qualify local layer names.
    pub separator: String,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            size_tolerance: 1.0,
            ignore_inert_wrappers: false,
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

/// Diffs the trees of two IR documents.
pub fn diff_documents(before: &IrDocument, after: &IrDocument, opts: &DiffOptions) -> Changeset {
    diff_trees(&before.tree, &after.tree, opts)
}

/// Computes the changeset turning `before` into `after`.
///
/// Modified and added nodes are emitted in `after` preorder, then deleted
/// nodes in `before` preorder. Nodes without differences are omitted.
pub fn diff_trees(before: &IrNode, after: &IrNode, opts: &DiffOptions) -> Changeset {
    let before_index = PathIndex::build(before, &opts.separator);
    let after_index = PathIndex::build(after, &opts.separator);

    let mut changes = Changeset::new();
    for (path, node) in &after_index.order {
        match before_index.get(path) {
            None => {
                if opts.ignore_inert_wrappers && is_inert_wrapper(node) {
                    continue;
                }
                changes.push(
                    path.clone(),
                    NodeChange::Status {
                        status: NodeStatus::Added,
                    },
                );
            }
            Some(old) => {
                let properties = diff_node(old, node, opts);
                if !properties.is_empty() {
                    changes.push(path.clone(), NodeChange::Properties(properties));
                }
            }
        }
    }
    for (path, _) in &before_index.order {
        if after_index.get(path).is_none() {
            changes.push(
                path.clone(),
                NodeChange::Status {
                    status: NodeStatus::Deleted,
                },
            );
        }
    }
    changes
}

/// Full path of a node named `name` under `parent`.
pub fn qualify(parent: &str, name: &str, separator: &str) -> String {
    if parent.is_empty() || separator.is_empty() || name.contains(separator) {
        name.to_string()
    } else {
        format!("{parent}{separator}{name}")
    }
}

/// Preorder list of uniquely-pathed nodes plus a path index.
///
/// The first node at a path wins; later duplicates are ignored.
struct PathIndex<'a> {
    order: Vec<(String, &'a IrNode)>,
    index: HashMap<String, usize>,
}

impl<'a> PathIndex<'a> {
    fn build(tree: &'a IrNode, separator: &str) -> Self {
        let mut order = Vec::new();
        let mut index = HashMap::new();
        let mut stack = vec![(tree, String::new())];
        while let Some((node, parent)) = stack.pop() {
            let path = qualify(&parent, &node.name, separator);
            for child in node.children.iter().rev() {
                stack.push((child, path.clone()));
            }
            if index.contains_key(&path) {
                warn!(path = %path, "duplicate node path, keeping first occurrence");
                continue;
            }
            index.insert(path.clone(), order.len());
            order.push((path, node));
        }
        Self { order, index }
    }

    fn get(&self, path: &str) -> Option<&'a IrNode> {
        self.index
            .get(path)
            .and_then(|&i| self.order.get(i))
            .map(|(_, node)| *node)
    }
}

fn is_inert_wrapper(node: &IrNode) -> bool {
    matches!(node.node_type, NodeType::Group | NodeType::Frame)
        && !node.children.is_empty()
        && node.styles.is_empty()
        && node.text.is_none()
        && node.auto_layout.is_none()
}

/// Property-level differences of two nodes sharing a name.
fn diff_node(before: &IrNode, after: &IrNode, opts: &DiffOptions) -> BTreeMap<String, PropertyChange> {
    let mut changes = BTreeMap::new();

    diff_bag(
        "styles",
        &as_object(Some(&before.styles)),
        &as_object(Some(&after.styles)),
        &mut changes,
    );
    diff_bag(
        "text",
        &as_object(before.text.as_ref()),
        &as_object(after.text.as_ref()),
        &mut changes,
    );
    diff_bag(
        "autoLayout",
        &as_object(before.auto_layout.as_ref()),
        &as_object(after.auto_layout.as_ref()),
        &mut changes,
    );

    for (key, b, a) in [
        ("width", before.layout.width, after.layout.width),
        ("height", before.layout.height, after.layout.height),
    ] {
        if (b - a).abs() > opts.size_tolerance {
            changes.insert(
                format!("layout.{key}"),
                PropertyChange {
                    before: Value::from(b),
                    after: Value::from(a),
                },
            );
        }
    }

    if let Some(warning) = after.layout_warning {
        changes.insert(
            LAYOUT_INTEGRITY_KEY.to_string(),
            PropertyChange {
                before: before
                    .layout_warning
                    .map(|w| Value::from(w.as_str()))
                    .unwrap_or(Value::Null),
                after: Value::from(warning.as_str()),
            },
        );
    }

    changes
}

static NULL: Value = Value::Null;

/// Serializes a sparse bag into a JSON object; absent bags are empty.
fn as_object<T: Serialize>(bag: Option<&T>) -> Map<String, Value> {
    match bag.map(serde_json::to_value) {
        Some(Ok(Value::Object(map))) => map,
        _ => Map::new(),
    }
}

fn diff_bag(
    prefix: &str,
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    changes: &mut BTreeMap<String, PropertyChange>,
) {
    for key in before.keys().chain(after.keys()) {
        let b = before.get(key).unwrap_or(&NULL);
        let a = after.get(key).unwrap_or(&NULL);
        if b != a {
            changes.insert(
                format!("{prefix}.{key}"),
                PropertyChange {
                    before: b.clone(),
                    after: a.clone(),
                },
            );
        }
    }
}
