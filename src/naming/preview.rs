//! Text rendering of a naming tree, for debugging naming rules.

use std::fmt::Write;

use crate::ir::IrNode;

/// Renders the tree as indented lines of `├─ LocalName  [TYPE]  <origin>`.
///
/// The origin is the component reference when there is one, otherwise the
/// source tag.
pub fn preview_tree(tree: &IrNode, separator: &str) -> String {
    let mut out = String::new();
    render(tree, separator, 0, &mut out);
    out
}

fn render(node: &IrNode, separator: &str, depth: usize, out: &mut String) {
    let local = if separator.is_empty() {
        node.name.as_str()
    } else {
        node.name.rsplit(separator).next().unwrap_or(&node.name)
    };
    let _ = write!(
        out,
        "{}├─ {}  [{}]",
        "  ".repeat(depth),
        local,
        node.node_type.as_str()
    );
    if let Some(component) = &node.component_ref {
        let _ = write!(out, "  <{}>", component);
    } else if !node.source_tag.is_empty() {
        let _ = write!(out, "  <{}>", node.source_tag);
    }
    out.push('\n');
    for child in &node.children {
        render(child, separator, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeType;

    #[test]
    fn test_preview_layout() {
        let mut title = IrNode::new("Hero/Title", NodeType::Text);
        title.source_tag = "h1".into();
        let mut root = IrNode::new("Hero", NodeType::Frame).with_child(title);
        root.component_ref = Some("HeroBanner".into());

        let text = preview_tree(&root, "/");
        assert_eq!(
            text,
            "├─ Hero  [FRAME]  <HeroBanner>\n  ├─ Title  [TEXT]  <h1>\n"
        );
    }
}
