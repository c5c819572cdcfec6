//! Core node model for the designsync intermediate representation.
//!
//! Both synchronization directions produce these types: the canonicalizer
//! builds them from a raw DOM extraction and the reverse converter builds
//! them from a design-tool document. Because the style vocabulary is a single
//! set of Rust types, the diff engine can compare the two sides structurally
//! without knowing where a tree came from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current IR document schema version.
pub const IR_VERSION: &str = "1.0.0";

/// A complete IR document produced by one canonicalization pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrDocument {
    /// Schema version of this document.
    #[serde(default = "default_version")]
    pub version: String,

    /// Where the tree was extracted from.
    #[serde(default)]
    pub source: SourceInfo,

    /// Viewport the page was rendered at.
    #[serde(default)]
    pub viewport: Viewport,

    /// Name → source locator table built during canonicalization.
    #[serde(default)]
    pub name_mapping: NameMapping,

    /// Document statistics.
    #[serde(default)]
    pub stats: Stats,

    /// The canonical node tree.
    pub tree: IrNode,
}

fn default_version() -> String {
    IR_VERSION.to_string()
}

/// Metadata describing the source side of a document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceInfo {
    pub framework: String,
    pub entry_file: String,
    pub style_strategy: String,
    pub generated_at: String,
}

/// Rendering viewport in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}

/// Document statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    /// Number of emitted nodes (flattened wrappers are not counted).
    pub node_count: usize,
}

/// Name → source locator table.
///
/// Keyed by fully-qualified node name; a `BTreeMap` keeps serialization
/// order stable between runs.
pub type NameMapping = BTreeMap<String, MappingEntry>;

/// Where a named node came from in the source project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingEntry {
    pub source_file: String,
    pub selector: String,
    pub component_name: String,
}

/// The kind of design-tool layer a node maps to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    #[default]
    Frame,
    AutoLayout,
    Text,
    Image,
    Vector,
    Rectangle,
    Component,
    Instance,
    Section,
    Group,
}

impl NodeType {
    /// The wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Frame => "FRAME",
            NodeType::AutoLayout => "AUTO_LAYOUT",
            NodeType::Text => "TEXT",
            NodeType::Image => "IMAGE",
            NodeType::Vector => "VECTOR",
            NodeType::Rectangle => "RECTANGLE",
            NodeType::Component => "COMPONENT",
            NodeType::Instance => "INSTANCE",
            NodeType::Section => "SECTION",
            NodeType::Group => "GROUP",
        }
    }
}

/// Position and size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Layout {
    /// A zero-origin unit box, used whenever a source omits geometry.
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// The sparse style bag.
///
/// Every field is skipped when it holds its default value, so two nodes
/// that render identically serialize identically.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Styles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<CornerRadii>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shadow: Vec<Shadow>,

    /// Layer blur radius in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,

    /// Clockwise rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub clips_content: bool,
}

impl Styles {
    /// Returns true if no style property is set.
    pub fn is_empty(&self) -> bool {
        *self == Styles::default()
    }
}

/// Gradient paint kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradientKind {
    Linear,
    Radial,
    Angular,
    Diamond,
}

/// A gradient fill with ordered color stops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub kind: GradientKind,

    /// CSS angle in degrees (0 = towards the top), linear gradients only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,

    pub stops: Vec<ColorStop>,
}

/// A gradient color stop; `position` is in `0.0..=1.0`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub color: String,
    pub position: f64,
}

impl ColorStop {
    /// Resolves stops whose position may be missing.
    ///
    /// A missing first position is 0 and a missing last position is 1;
    /// runs of missing positions in between are spread evenly between
    /// their known neighbours. Positions never decrease along the list.
    pub fn distribute(stops: Vec<(String, Option<f64>)>) -> Vec<ColorStop> {
        let n = stops.len();
        let mut positions: Vec<Option<f64>> = stops.iter().map(|(_, p)| *p).collect();
        if n == 0 {
            return Vec::new();
        }
        if positions[0].is_none() {
            positions[0] = Some(0.0);
        }
        if positions[n - 1].is_none() {
            positions[n - 1] = Some(1.0);
        }

        let mut max_so_far = f64::MIN;
        for p in positions.iter_mut().flatten() {
            *p = p.max(max_so_far);
            max_so_far = *p;
        }

        let mut i = 0;
        while i < n {
            if positions[i].is_some() {
                i += 1;
                continue;
            }
            let start = i - 1;
            let mut end = i;
            while positions[end].is_none() {
                end += 1;
            }
            let (a, b) = (positions[start].unwrap_or(0.0), positions[end].unwrap_or(1.0));
            let span = (end - start) as f64;
            for (k, slot) in positions.iter_mut().enumerate().take(end).skip(i) {
                *slot = Some(a + (b - a) * (k - start) as f64 / span);
            }
            i = end;
        }

        stops
            .into_iter()
            .zip(positions)
            .map(|((color, _), position)| ColorStop {
                color,
                position: (position.unwrap_or(0.0) * 10_000.0).round() / 10_000.0,
            })
            .collect()
    }
}

/// Per-corner radii in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    /// The same radius on all four corners.
    pub fn uniform(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    /// Returns true if every corner is square.
    pub fn is_zero(&self) -> bool {
        self.top_left == 0.0
            && self.top_right == 0.0
            && self.bottom_right == 0.0
            && self.bottom_left == 0.0
    }
}

/// Stroke style of a border.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
}

/// A uniform border.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub width: f64,
    pub color: String,
    #[serde(default)]
    pub style: BorderStyle,
}

/// A drop or inner shadow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(default)]
    pub blur: f64,
    #[serde(default)]
    pub spread: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inset: bool,
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

/// Text content and typography of a TEXT node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub characters: String,
    #[serde(default = "TextStyle::default_font_size")]
    pub font_size: f64,
    #[serde(default = "TextStyle::default_font_family")]
    pub font_family: String,
    #[serde(default = "TextStyle::default_font_weight")]
    pub font_weight: u16,
    #[serde(default)]
    pub line_height: Option<f64>,
    #[serde(default)]
    pub letter_spacing: f64,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default = "TextStyle::default_color")]
    pub color: String,
}

impl TextStyle {
    pub const DEFAULT_FONT_SIZE: f64 = 14.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Inter";
    pub const DEFAULT_FONT_WEIGHT: u16 = 400;
    pub const DEFAULT_COLOR: &'static str = "rgba(0, 0, 0, 1)";

    /// Text with default typography.
    pub fn new(characters: impl Into<String>) -> Self {
        Self {
            characters: characters.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_weight: Self::DEFAULT_FONT_WEIGHT,
            line_height: None,
            letter_spacing: 0.0,
            align: TextAlign::Left,
            color: Self::DEFAULT_COLOR.to_string(),
        }
    }

    fn default_font_size() -> f64 {
        Self::DEFAULT_FONT_SIZE
    }

    fn default_font_family() -> String {
        Self::DEFAULT_FONT_FAMILY.to_string()
    }

    fn default_font_weight() -> u16 {
        Self::DEFAULT_FONT_WEIGHT
    }

    fn default_color() -> String {
        Self::DEFAULT_COLOR.to_string()
    }
}

/// How an image fills its box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    #[default]
    Fill,
    Fit,
    Crop,
    Tile,
}

/// Image payload of an IMAGE node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageRef {
    pub src: String,
    pub scale_mode: ScaleMode,
}

/// Auto-layout flow direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

/// Alignment along the flow axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
}

/// Alignment across the flow axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterAlign {
    #[default]
    Min,
    Center,
    Max,
    Baseline,
}

/// A managed (flex-like) layout container.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoLayout {
    pub direction: Direction,
    pub spacing: f64,
    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
    pub padding_left: f64,
    pub primary_align: PrimaryAlign,
    pub counter_align: CounterAlign,
    pub wrap: bool,
}

/// Source location of a node, stored on the node itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Locator {
    pub source_file: String,
    pub selector: String,
    pub css_classes: String,
}

/// Integrity problems detected on the design-tool side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutWarning {
    /// A container with children lost its managed layout.
    NoAutoLayout,
}

impl LayoutWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutWarning::NoAutoLayout => "NO_AUTO_LAYOUT",
        }
    }
}

/// A node of the canonical tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrNode {
    /// Fully-qualified hierarchical name, unique within the tree.
    pub name: String,

    #[serde(rename = "type", default)]
    pub node_type: NodeType,

    #[serde(default)]
    pub source_tag: String,

    #[serde(default)]
    pub layout: Layout,

    #[serde(default, skip_serializing_if = "Styles::is_empty")]
    pub styles: Styles,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_layout: Option<AutoLayout>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_ref: Option<String>,

    #[serde(default)]
    pub locator: Locator,

    #[serde(
        rename = "_layoutWarning",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub layout_warning: Option<LayoutWarning>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<IrNode>,
}

impl IrNode {
    /// Creates a node with the given name and type and default everything else.
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            ..Default::default()
        }
    }

    /// Sets the layout box.
    pub fn with_layout(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.layout = Layout {
            x,
            y,
            width,
            height,
        };
        self
    }

    /// Replaces the style bag.
    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: IrNode) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first preorder iterator over this node and its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &IrNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_styles_are_not_serialized() {
        let node = IrNode::new("Card", NodeType::Frame);
        let json = serde_json::to_value(&node).expect("serialize node");

        assert!(json.get("styles").is_none());
        assert!(json.get("children").is_none());
        assert!(json.get("_layoutWarning").is_none());
        assert_eq!(json["type"], "FRAME");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let node: IrNode = serde_json::from_str(r#"{"name": "Lone"}"#).expect("parse node");

        assert_eq!(node.node_type, NodeType::Frame);
        assert_eq!(node.layout, Layout::default());
        assert_eq!(node.layout.width, 1.0);
        assert!(node.styles.is_empty());
    }

    #[test]
    fn test_layout_warning_wire_name() {
        let mut node = IrNode::new("Panel", NodeType::Frame);
        node.layout_warning = Some(LayoutWarning::NoAutoLayout);
        let json = serde_json::to_value(&node).expect("serialize node");

        assert_eq!(json["_layoutWarning"], "NO_AUTO_LAYOUT");
    }

    #[test]
    fn test_stop_distribution() {
        let stops = ColorStop::distribute(vec![
            ("a".into(), None),
            ("b".into(), None),
            ("c".into(), Some(0.5)),
            ("d".into(), None),
            ("e".into(), None),
        ]);
        let positions: Vec<f64> = stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_stop_distribution_keeps_order_monotonic() {
        let stops = ColorStop::distribute(vec![
            ("a".into(), Some(0.6)),
            ("b".into(), Some(0.2)),
            ("c".into(), None),
        ]);
        let positions: Vec<f64> = stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.6, 0.6, 1.0]);
    }

    #[test]
    fn test_preorder_iteration() {
        let tree = IrNode::new("A", NodeType::Frame)
            .with_child(IrNode::new("A/B", NodeType::Frame).with_child(IrNode::new(
                "A/B/C",
                NodeType::Text,
            )))
            .with_child(IrNode::new("A/D", NodeType::Frame));

        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "A/B", "A/B/C", "A/D"]);
        assert_eq!(tree.count(), 4);
    }
}
