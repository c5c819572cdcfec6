//! Raw node tree as produced by the external DOM/style extractor.
//!
//! The extractor walks the rendered page in a headless browser and emits
//! one [`RawNode`] per element with computed styles already flattened into
//! a small bag. Everything here is permissive: every field has a default and
//! malformed children are dropped instead of failing the whole tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::lenient::{or_none, skip_invalid, truthy};
use super::model::{CornerRadii, Layout, Viewport};

/// The extractor's top-level output: a tree plus the viewport it was
/// rendered at.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawExtraction {
    pub tree: RawNode,
    #[serde(default)]
    pub viewport: Viewport,
}

/// One extracted DOM element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    /// Lower-case tag name.
    pub tag: String,

    /// All attributes of the element.
    pub attrs: BTreeMap<String, String>,

    /// Framework component that rendered this element, if detected.
    pub component_name: Option<String>,

    /// Index among siblings with the same tag.
    pub sibling_index: usize,

    /// Number of siblings (including this one) with the same tag.
    pub sibling_tag_count: usize,

    #[serde(deserialize_with = "or_none")]
    pub layout: Option<Layout>,

    #[serde(deserialize_with = "truthy")]
    pub is_text_node: bool,
    #[serde(deserialize_with = "truthy")]
    pub is_image: bool,
    #[serde(deserialize_with = "truthy")]
    pub is_svg: bool,
    #[serde(deserialize_with = "truthy")]
    pub is_canvas: bool,
    #[serde(deserialize_with = "truthy")]
    pub is_video: bool,

    pub text_content: Option<String>,
    pub image_src: Option<String>,

    pub styles: RawStyles,

    /// CSS layout descriptor, present for flex and grid containers.
    #[serde(deserialize_with = "or_none")]
    pub auto_layout: Option<RawLayoutDescriptor>,

    #[serde(deserialize_with = "or_none")]
    pub transform: Option<RawTransform>,

    /// CSS filter functions, e.g. `{"blur": "4px"}`.
    pub filter: BTreeMap<String, String>,

    #[serde(deserialize_with = "or_none")]
    pub svg: Option<RawSvg>,

    /// Generated content of `::before` / `::after`, keyed by pseudo-element.
    pub pseudo: BTreeMap<String, String>,

    #[serde(deserialize_with = "skip_invalid")]
    pub children: Vec<RawNode>,
}

impl Default for RawNode {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            attrs: BTreeMap::new(),
            component_name: None,
            sibling_index: 0,
            sibling_tag_count: 1,
            layout: None,
            is_text_node: false,
            is_image: false,
            is_svg: false,
            is_canvas: false,
            is_video: false,
            text_content: None,
            image_src: None,
            styles: RawStyles::default(),
            auto_layout: None,
            transform: None,
            filter: BTreeMap::new(),
            svg: None,
            pseudo: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

impl RawNode {
    /// Creates an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Creates a text-only element.
    pub fn text(tag: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            is_text_node: true,
            text_content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Adds an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Sets sibling position information.
    pub fn with_siblings(mut self, index: usize, tag_count: usize) -> Self {
        self.sibling_index = index;
        self.sibling_tag_count = tag_count;
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns a trimmed, non-empty attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Lower-cased tag name.
    pub fn tag_lower(&self) -> String {
        self.tag.to_ascii_lowercase()
    }

    /// Non-blank text content.
    pub fn text_content(&self) -> Option<&str> {
        self.text_content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Returns true if the node is repositioned or re-rendered by a
    /// transform or a non-trivial filter.
    pub fn is_transformed(&self) -> bool {
        self.transform.as_ref().is_some_and(|t| !t.is_identity())
    }

    /// Returns true if the element has padding, either in its computed
    /// styles or inside a mapped layout descriptor.
    pub fn has_padding(&self) -> bool {
        self.styles.has_padding()
            || self
                .auto_layout
                .as_ref()
                .is_some_and(|d| d.padding().iter().any(|p| *p != 0.0))
    }

    /// Returns true if `::before` / `::after` generate visible content.
    pub fn has_generated_content(&self) -> bool {
        self.pseudo
            .values()
            .any(|content| !matches!(content.trim(), "" | "none" | "normal" | "\"\""))
    }
}

/// Corner radius as reported by the extractor: one number or four corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRadius {
    Uniform(f64),
    Corners(CornerRadii),
}

impl RawRadius {
    pub fn corners(&self) -> CornerRadii {
        match *self {
            RawRadius::Uniform(r) => CornerRadii::uniform(r),
            RawRadius::Corners(c) => c,
        }
    }
}

/// A parsed `box-shadow` entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawShadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: Option<String>,
    pub inset: bool,
}

/// The extractor's normalized computed-style bag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStyles {
    pub background_color: Option<String>,
    pub background_image: Option<String>,
    pub opacity: Option<f64>,
    #[serde(deserialize_with = "or_none")]
    pub border_radius: Option<RawRadius>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub border_style: Option<String>,
    #[serde(deserialize_with = "skip_invalid")]
    pub shadow: Vec<RawShadow>,
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub position: Option<String>,
    pub overflow: Option<String>,
    pub mix_blend_mode: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    #[serde(deserialize_with = "or_none")]
    pub font_weight: Option<f64>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_align: Option<String>,
    pub color: Option<String>,
}

impl RawStyles {
    /// Padding as `[top, right, bottom, left]`, missing sides as zero.
    pub fn padding(&self) -> [f64; 4] {
        [
            self.padding_top.unwrap_or(0.0),
            self.padding_right.unwrap_or(0.0),
            self.padding_bottom.unwrap_or(0.0),
            self.padding_left.unwrap_or(0.0),
        ]
    }

    /// Returns true if any side has padding.
    pub fn has_padding(&self) -> bool {
        self.padding().iter().any(|p| *p != 0.0)
    }

    /// Returns true if the element is taken out of normal flow or offset.
    pub fn is_positioned(&self) -> bool {
        !matches!(self.position.as_deref().map(str::trim), None | Some("") | Some("static"))
    }

    /// Returns true if the element clips its content.
    pub fn clips_content(&self) -> bool {
        matches!(
            self.overflow.as_deref().map(str::trim),
            Some("hidden") | Some("clip") | Some("scroll") | Some("auto")
        )
    }
}

/// Layout descriptor of a flex or grid container.
///
/// Two shapes are accepted. The CSS shape carries the container's computed
/// `display`, `flexDirection`, gaps and alignment keywords. The mapped shape
/// has already been translated by the extractor into `direction`, `spacing`,
/// per-side padding and `MIN`/`CENTER`/`MAX`-style alignment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLayoutDescriptor {
    /// `flex`, `inline-flex`, `grid` or `inline-grid`.
    pub display: String,
    pub flex_direction: Option<String>,
    pub flex_wrap: Option<String>,
    pub justify_content: Option<String>,
    pub align_items: Option<String>,
    pub gap: Option<f64>,
    pub row_gap: Option<f64>,
    pub column_gap: Option<f64>,

    /// `HORIZONTAL` or `VERTICAL`.
    pub direction: Option<String>,
    #[serde(deserialize_with = "or_none")]
    pub spacing: Option<f64>,
    #[serde(deserialize_with = "or_none")]
    pub padding_top: Option<f64>,
    #[serde(deserialize_with = "or_none")]
    pub padding_right: Option<f64>,
    #[serde(deserialize_with = "or_none")]
    pub padding_bottom: Option<f64>,
    #[serde(deserialize_with = "or_none")]
    pub padding_left: Option<f64>,
    pub primary_align: Option<String>,
    pub counter_align: Option<String>,
    #[serde(deserialize_with = "truthy")]
    pub wrap: bool,
}

impl RawLayoutDescriptor {
    pub fn is_flex(&self) -> bool {
        matches!(self.display.trim(), "flex" | "inline-flex")
    }

    pub fn is_grid(&self) -> bool {
        matches!(self.display.trim(), "grid" | "inline-grid")
    }

    /// Returns true for the extractor's pre-mapped shape.
    pub fn is_mapped(&self) -> bool {
        self.direction
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    /// Returns true if the descriptor describes a managed layout container.
    pub fn is_container(&self) -> bool {
        self.is_mapped() || self.is_flex() || self.is_grid()
    }

    /// Padding carried inside the descriptor, missing sides as zero.
    pub fn padding(&self) -> [f64; 4] {
        [
            self.padding_top.unwrap_or(0.0),
            self.padding_right.unwrap_or(0.0),
            self.padding_bottom.unwrap_or(0.0),
            self.padding_left.unwrap_or(0.0),
        ]
    }
}

/// Decomposed CSS transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTransform {
    /// Clockwise rotation in degrees.
    pub rotation: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
    pub translate_x: Option<f64>,
    pub translate_y: Option<f64>,
}

impl RawTransform {
    pub fn is_identity(&self) -> bool {
        self.rotation.unwrap_or(0.0) == 0.0
            && self.scale_x.unwrap_or(1.0) == 1.0
            && self.scale_y.unwrap_or(1.0) == 1.0
            && self.translate_x.unwrap_or(0.0) == 0.0
            && self.translate_y.unwrap_or(0.0) == 0.0
    }
}

/// Inline SVG payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSvg {
    pub markup: String,
    pub view_box: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_sparse_node() {
        let node: RawNode = serde_json::from_str(r#"{"attrs": {"id": "x"}}"#).expect("parse");
        assert_eq!(node.tag, "div");
        assert_eq!(node.sibling_tag_count, 1);
        assert_eq!(node.attr("id"), Some("x"));
        assert!(node.layout.is_none());
    }

    #[test]
    fn test_malformed_child_is_skipped() {
        let json = r#"{
            "tag": "ul",
            "children": [
                {"tag": "li"},
                {"tag": "li", "siblingIndex": "first"},
                {"tag": "li", "siblingIndex": 2}
            ]
        }"#;
        let node: RawNode = serde_json::from_str(json).expect("parse");
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[1].sibling_index, 2);
    }

    #[test]
    fn test_radius_accepts_number_or_corners() {
        let styles: RawStyles = serde_json::from_str(r#"{"borderRadius": 8}"#).expect("parse");
        assert_eq!(
            styles.border_radius.map(|r| r.corners()),
            Some(CornerRadii::uniform(8.0))
        );

        let styles: RawStyles = serde_json::from_str(
            r#"{"borderRadius": {"topLeft": 4, "topRight": 0, "bottomRight": 4, "bottomLeft": 0}}"#,
        )
        .expect("parse");
        assert_eq!(styles.border_radius.map(|r| r.corners().top_left), Some(4.0));
    }

    #[test]
    fn test_position_and_clip_detection() {
        let mut styles = RawStyles::default();
        assert!(!styles.is_positioned());
        styles.position = Some("static".into());
        assert!(!styles.is_positioned());
        styles.position = Some("absolute".into());
        assert!(styles.is_positioned());

        styles.overflow = Some("visible".into());
        assert!(!styles.clips_content());
        styles.overflow = Some("hidden".into());
        assert!(styles.clips_content());
    }

    #[test]
    fn test_mapped_layout_descriptor() {
        let json = r#"{
            "tag": "nav",
            "autoLayout": {
                "direction": "HORIZONTAL",
                "spacing": 8,
                "paddingTop": 0,
                "paddingRight": 12,
                "paddingBottom": 0,
                "paddingLeft": 12,
                "primaryAlign": "SPACE_BETWEEN",
                "counterAlign": "CENTER",
                "wrap": false
            }
        }"#;
        let node: RawNode = serde_json::from_str(json).expect("parse");
        let layout = node.auto_layout.as_ref().expect("layout");
        assert!(layout.is_mapped());
        assert!(layout.is_container());
        assert!(!layout.is_flex());
        assert_eq!(layout.padding(), [0.0, 12.0, 0.0, 12.0]);
        assert!(!node.styles.has_padding());
        assert!(node.has_padding());
    }

    #[test]
    fn test_generated_content() {
        let mut node = RawNode::new("div");
        node.pseudo.insert("before".into(), "none".into());
        assert!(!node.has_generated_content());
        node.pseudo.insert("after".into(), "\"→\"".into());
        assert!(node.has_generated_content());
    }
}
