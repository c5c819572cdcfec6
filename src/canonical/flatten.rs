//! Smart flattening of inert wrapper elements.
//!
//! Component frameworks wrap real content in layers of anonymous `div`s
//! that carry no styling or layout of their own. Mirroring them as frames
//! in the design tool adds noise and breaks alignment with hand-built
//! designs, so they are elided while building the IR.

use crate::ir::color::normalize_css_color;
use crate::ir::raw::RawNode;

/// Tags that may be elided as wrappers.
pub const INERT_WRAPPER_TAGS: [&str; 4] = ["div", "span", "section", "article"];

/// Returns the single child that replaces `node` when `node` is an inert
/// wrapper, or `None` when the node must be kept.
///
/// The wrapper must have exactly one element child and contribute nothing
/// a design tool could render or name: no component, no override or `id`,
/// no visual styling, no padding, static positioning, no transform or
/// filter, full opacity and no generated content.
pub fn inert_wrapper_child<'a>(node: &'a RawNode, override_attribute: &str) -> Option<&'a RawNode> {
    let tag = node.tag_lower();
    if !INERT_WRAPPER_TAGS.contains(&tag.as_str()) {
        return None;
    }
    let [child] = node.children.as_slice() else {
        return None;
    };
    if node.is_text_node || child.is_text_node {
        return None;
    }
    if node.component_name.as_deref().is_some_and(|c| !c.trim().is_empty())
        || node.attr(override_attribute).is_some()
        || node.attr("id").is_some()
    {
        return None;
    }
    if has_visual_styling(node) || node.has_padding() || node.styles.is_positioned() {
        return None;
    }
    if node.is_transformed() || !node.filter.is_empty() || node.has_generated_content() {
        return None;
    }
    if node.styles.opacity.is_some_and(|o| o < 1.0) {
        return None;
    }
    Some(child)
}

fn has_visual_styling(node: &RawNode) -> bool {
    let s = &node.styles;
    let paints = |v: &Option<String>| {
        v.as_deref()
            .is_some_and(|c| c.trim() != "none" && normalize_css_color(c).is_some())
    };
    paints(&s.background_color)
        || paints(&s.background_image)
        || s.border_width.is_some_and(|w| w > 0.0)
        || !s.shadow.is_empty()
        || s.border_radius.is_some_and(|r| !r.corners().is_zero())
        || s.clips_content()
}
