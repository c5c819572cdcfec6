//! Node type classification.

use crate::ir::raw::RawNode;
use crate::ir::NodeType;

type Predicate = fn(&RawNode) -> bool;

/// Classification rules in priority order; the first match wins.
const TYPE_RULES: [(Predicate, NodeType); 5] = [
    (is_text, NodeType::Text),
    (is_vector, NodeType::Vector),
    (is_media, NodeType::Image),
    (is_layout_container, NodeType::AutoLayout),
    (is_form_control, NodeType::Rectangle),
];

/// Picks the IR node type for an extracted element.
pub fn classify(node: &RawNode) -> NodeType {
    TYPE_RULES
        .iter()
        .find(|(matches, _)| matches(node))
        .map(|(_, node_type)| *node_type)
        .unwrap_or(NodeType::Frame)
}

fn is_text(node: &RawNode) -> bool {
    node.is_text_node
}

fn is_vector(node: &RawNode) -> bool {
    node.is_svg || node.tag_lower() == "svg"
}

fn is_media(node: &RawNode) -> bool {
    node.is_image
        || node.is_canvas
        || node.is_video
        || matches!(node.tag_lower().as_str(), "img" | "canvas" | "video")
}

fn is_layout_container(node: &RawNode) -> bool {
    node.auto_layout
        .as_ref()
        .is_some_and(|layout| layout.is_container())
}

fn is_form_control(node: &RawNode) -> bool {
    matches!(node.tag_lower().as_str(), "input" | "textarea" | "select")
}
