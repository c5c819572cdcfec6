//! Reverse conversion of design-tool documents into the IR.
//!
//! The design side names its layers itself, so node names are taken
//! verbatim. Layers pushed from a canonicalized snapshot carry only their
//! local name; the diff rebuilds full paths from the hierarchy. Source
//! locators are recovered from the shared plugin data the push step wrote.

mod paint;

use tracing::warn;

use crate::ir::color::round_to;
use crate::ir::design::{DesignNode, TypeStyle};
use crate::ir::{
    AutoLayout, Border, BorderStyle, CornerRadii, CounterAlign, Direction, IrNode, Layout,
    LayoutWarning, Locator, NodeType, PrimaryAlign, Styles, TextAlign, TextStyle,
};

/// Default shared plugin data namespace.
pub const DEFAULT_NAMESPACE: &str = "figma-code-sync";

/// Converts design-tool nodes into IR nodes.
#[derive(Clone, Debug)]
pub struct ReverseConverter {
    namespace: String,
}

impl Default for ReverseConverter {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl ReverseConverter {
    /// Creates a converter reading locators from the given plugin namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Converts a node and its visible descendants.
    pub fn convert(&self, node: &DesignNode) -> IrNode {
        let frame_like = is_frame_like(&node.node_type);
        let mut ir = IrNode::new(node.name.clone(), map_type(&node.node_type));

        ir.layout = node
            .absolute_bounding_box
            .map(|b| Layout {
                x: round_to(b.x, 2),
                y: round_to(b.y, 2),
                width: round_to(b.width, 2),
                height: round_to(b.height, 2),
            })
            .unwrap_or_default();
        ir.styles = self.styles(node, frame_like);

        if frame_like {
            if let Some(mode) = node.active_layout_mode() {
                ir.node_type = NodeType::AutoLayout;
                ir.auto_layout = Some(auto_layout(node, mode));
            } else if !node.children.is_empty() {
                warn!(name = %node.name, "container has children but no auto layout");
                ir.layout_warning = Some(LayoutWarning::NoAutoLayout);
            }
        }

        if node.children.is_empty()
            && matches!(node.node_type.as_str(), "RECTANGLE" | "FRAME")
        {
            if let Some(image) = paint::image(&node.fills) {
                ir.node_type = NodeType::Image;
                ir.image = Some(image);
                ir.auto_layout = None;
            }
        }

        if node.node_type == "TEXT" {
            ir.text = node
                .characters
                .as_deref()
                .filter(|c| !c.is_empty())
                .map(|chars| text_style(node, chars));
        }

        if let Some(data) = node.shared_plugin_data.get(&self.namespace) {
            let field = |key: &str| data.get(key).cloned().unwrap_or_default();
            ir.locator = Locator {
                source_file: field("sourceFile"),
                selector: field("selector"),
                css_classes: field("cssClasses"),
            };
            ir.source_tag = field("originalTag");
            ir.component_ref = data
                .get("componentName")
                .filter(|c| !c.trim().is_empty())
                .cloned();
        }

        ir.children = node
            .children
            .iter()
            .filter(|child| child.visible)
            .map(|child| self.convert(child))
            .collect();
        ir
    }

    fn styles(&self, node: &DesignNode, frame_like: bool) -> Styles {
        let is_text = node.node_type == "TEXT";
        Styles {
            background_color: if is_text {
                None
            } else {
                paint::solid_color(&node.fills)
            },
            gradient: paint::gradient(&node.fills),
            opacity: node
                .opacity
                .map(|o| round_to(o.clamp(0.0, 1.0), 3))
                .filter(|o| *o < 1.0),
            blend_mode: node
                .blend_mode
                .as_deref()
                .filter(|m| !matches!(*m, "NORMAL" | "PASS_THROUGH" | ""))
                .map(str::to_string),
            border_radius: corner_radii(node).filter(|r| !r.is_zero()),
            border: border(node),
            shadow: paint::shadows(&node.effects),
            blur: paint::layer_blur(&node.effects),
            rotation: node
                .rotation
                .map(|r| round_to(-r, 2))
                .filter(|r| *r != 0.0),
            clips_content: frame_like && node.clips_content.unwrap_or(false),
        }
    }
}

/// Native type → IR type.
fn map_type(native: &str) -> NodeType {
    match native {
        "FRAME" => NodeType::Frame,
        "GROUP" => NodeType::Group,
        "COMPONENT" | "COMPONENT_SET" => NodeType::Component,
        "INSTANCE" => NodeType::Instance,
        "TEXT" => NodeType::Text,
        "RECTANGLE" | "LINE" => NodeType::Rectangle,
        "VECTOR" | "BOOLEAN_OPERATION" | "ELLIPSE" | "STAR" | "POLYGON" | "REGULAR_POLYGON" => {
            NodeType::Vector
        }
        "SECTION" => NodeType::Section,
        _ => NodeType::Frame,
    }
}

fn is_frame_like(native: &str) -> bool {
    matches!(native, "FRAME" | "COMPONENT" | "INSTANCE")
}

fn corner_radii(node: &DesignNode) -> Option<CornerRadii> {
    if let Some([tl, tr, br, bl]) = node.rectangle_corner_radii.as_deref() {
        return Some(CornerRadii {
            top_left: round_to(*tl, 2),
            top_right: round_to(*tr, 2),
            bottom_right: round_to(*br, 2),
            bottom_left: round_to(*bl, 2),
        });
    }
    node.corner_radius
        .map(|r| CornerRadii::uniform(round_to(r, 2)))
}

fn border(node: &DesignNode) -> Option<Border> {
    let width = node
        .stroke_weight
        .map(|w| round_to(w, 2))
        .filter(|w| *w > 0.0)?;
    let color = paint::solid_color(&node.strokes)?;
    let style = if node.stroke_dashes.iter().any(|d| *d > 0.0) {
        BorderStyle::Dashed
    } else {
        BorderStyle::Solid
    };
    Some(Border {
        width,
        color,
        style,
    })
}

fn auto_layout(node: &DesignNode, mode: &str) -> AutoLayout {
    let pad = |p: Option<f64>| round_to(p.unwrap_or(0.0), 2);
    AutoLayout {
        direction: if mode == "VERTICAL" {
            Direction::Vertical
        } else {
            Direction::Horizontal
        },
        spacing: pad(node.item_spacing),
        padding_top: pad(node.padding_top),
        padding_right: pad(node.padding_right),
        padding_bottom: pad(node.padding_bottom),
        padding_left: pad(node.padding_left),
        primary_align: match node.primary_axis_align_items.as_deref() {
            Some("CENTER") => PrimaryAlign::Center,
            Some("MAX") => PrimaryAlign::Max,
            Some("SPACE_BETWEEN") => PrimaryAlign::SpaceBetween,
            _ => PrimaryAlign::Min,
        },
        counter_align: match node.counter_axis_align_items.as_deref() {
            Some("CENTER") => CounterAlign::Center,
            Some("MAX") => CounterAlign::Max,
            Some("BASELINE") => CounterAlign::Baseline,
            _ => CounterAlign::Min,
        },
        wrap: node.layout_wrap.as_deref() == Some("WRAP"),
    }
}

fn text_style(node: &DesignNode, characters: &str) -> TextStyle {
    let mut text = TextStyle::new(characters);
    let style = node.style.clone().unwrap_or_default();
    let TypeStyle {
        font_family,
        font_weight,
        font_size,
        line_height_px,
        line_height_unit,
        letter_spacing,
        text_align_horizontal,
    } = style;

    if let Some(size) = font_size.filter(|s| *s > 0.0) {
        text.font_size = round_to(size, 2);
    }
    if let Some(family) = font_family.filter(|f| !f.trim().is_empty()) {
        text.font_family = family;
    }
    if let Some(weight) = font_weight {
        text.font_weight = weight.round().clamp(1.0, 1000.0) as u16;
    }
    text.line_height = match line_height_unit.as_deref() {
        Some("INTRINSIC_%") => None,
        _ => line_height_px.filter(|h| *h > 0.0).map(|h| round_to(h, 2)),
    };
    text.letter_spacing = round_to(letter_spacing.unwrap_or(0.0), 2);
    text.align = match text_align_horizontal.as_deref() {
        Some("CENTER") => TextAlign::Center,
        Some("RIGHT") => TextAlign::Right,
        Some("JUSTIFIED") => TextAlign::Justified,
        _ => TextAlign::Left,
    };
    if let Some(color) = paint::solid_color(&node.fills) {
        text.color = color;
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::design::{Paint, TypeStyle};
    use std::collections::BTreeMap;

    #[test]
    fn type_table() {
        assert_eq!(map_type("COMPONENT_SET"), NodeType::Component);
        assert_eq!(map_type("ELLIPSE"), NodeType::Vector);
        assert_eq!(map_type("LINE"), NodeType::Rectangle);
        assert_eq!(map_type("STICKY"), NodeType::Frame);
    }

    #[test]
    fn names_are_verbatim_and_hidden_children_skipped() {
        let mut hidden = DesignNode::new("RECTANGLE", "Page/Ghost");
        hidden.visible = false;
        let mut page = DesignNode::new("FRAME", "Page")
            .with_child(DesignNode::new("TEXT", "Page/Title"))
            .with_child(hidden);
        page.layout_mode = Some("VERTICAL".into());

        let ir = ReverseConverter::default().convert(&page);
        assert_eq!(ir.name, "Page");
        assert_eq!(ir.children.len(), 1);
        assert_eq!(ir.children[0].name, "Page/Title");
    }

    #[test]
    fn auto_layout_frame() {
        let mut row = DesignNode::new("FRAME", "Row").with_child(DesignNode::new("TEXT", "Row/A"));
        row.layout_mode = Some("HORIZONTAL".into());
        row.item_spacing = Some(12.0);
        row.padding_left = Some(16.0);
        row.primary_axis_align_items = Some("SPACE_BETWEEN".into());
        row.counter_axis_align_items = Some("CENTER".into());
        row.layout_wrap = Some("WRAP".into());

        let ir = ReverseConverter::default().convert(&row);
        assert_eq!(ir.node_type, NodeType::AutoLayout);
        let layout = ir.auto_layout.expect("auto layout");
        assert_eq!(layout.spacing, 12.0);
        assert_eq!(layout.padding_left, 16.0);
        assert_eq!(layout.primary_align, PrimaryAlign::SpaceBetween);
        assert_eq!(layout.counter_align, CounterAlign::Center);
        assert!(layout.wrap);
        assert!(ir.layout_warning.is_none());
    }

    #[test]
    fn container_without_layout_is_flagged() {
        let frame = DesignNode::new("FRAME", "Card").with_child(DesignNode::new("TEXT", "Card/T"));
        let ir = ReverseConverter::default().convert(&frame);
        assert_eq!(ir.layout_warning, Some(LayoutWarning::NoAutoLayout));
        assert_eq!(ir.node_type, NodeType::Frame);

        let group = DesignNode::new("GROUP", "G").with_child(DesignNode::new("TEXT", "G/T"));
        assert!(ReverseConverter::default().convert(&group).layout_warning.is_none());

        let empty = DesignNode::new("FRAME", "Empty");
        assert!(ReverseConverter::default().convert(&empty).layout_warning.is_none());
    }

    #[test]
    fn styles_from_fills_strokes_and_geometry() {
        let mut node = DesignNode::new("RECTANGLE", "Box").with_box(10.0, 20.0, 100.5, 40.0);
        node.fills = vec![Paint::solid(79.0 / 255.0, 70.0 / 255.0, 229.0 / 255.0, 1.0)];
        node.strokes = vec![Paint::solid(0.0, 0.0, 0.0, 1.0)];
        node.stroke_weight = Some(2.0);
        node.stroke_dashes = vec![4.0, 2.0];
        node.corner_radius = Some(8.0);
        node.rotation = Some(30.0);
        node.opacity = Some(0.8);
        node.blend_mode = Some("MULTIPLY".into());

        let ir = ReverseConverter::default().convert(&node);
        assert_eq!(ir.layout.width, 100.5);
        assert_eq!(ir.styles.background_color.as_deref(), Some("rgba(79, 70, 229, 1)"));
        let border = ir.styles.border.expect("border");
        assert_eq!(border.style, BorderStyle::Dashed);
        assert_eq!(border.width, 2.0);
        assert_eq!(ir.styles.border_radius, Some(CornerRadii::uniform(8.0)));
        assert_eq!(ir.styles.rotation, Some(-30.0));
        assert_eq!(ir.styles.opacity, Some(0.8));
        assert_eq!(ir.styles.blend_mode.as_deref(), Some("MULTIPLY"));
        assert!(!ir.styles.clips_content);
    }

    #[test]
    fn per_corner_radii_win() {
        let mut node = DesignNode::new("RECTANGLE", "Tab");
        node.corner_radius = Some(4.0);
        node.rectangle_corner_radii = Some(vec![8.0, 8.0, 0.0, 0.0]);
        let radii = corner_radii(&node).expect("radii");
        assert_eq!(radii.top_left, 8.0);
        assert_eq!(radii.bottom_left, 0.0);
    }

    #[test]
    fn text_node_fill_is_text_color() {
        let mut node = DesignNode::new("TEXT", "Title");
        node.characters = Some("Hello".into());
        node.fills = vec![Paint::solid(1.0, 0.0, 0.0, 1.0)];
        node.style = Some(TypeStyle {
            font_family: Some("Inter".into()),
            font_weight: Some(700.0),
            font_size: Some(32.0),
            line_height_px: Some(38.73),
            line_height_unit: Some("INTRINSIC_%".into()),
            text_align_horizontal: Some("CENTER".into()),
            ..Default::default()
        });

        let ir = ReverseConverter::default().convert(&node);
        assert!(ir.styles.background_color.is_none());
        let text = ir.text.expect("text");
        assert_eq!(text.color, "rgba(255, 0, 0, 1)");
        assert_eq!(text.font_weight, 700);
        assert_eq!(text.line_height, None);
        assert_eq!(text.align, TextAlign::Center);
    }

    #[test]
    fn image_fill_makes_an_image_node() {
        let mut node = DesignNode::new("RECTANGLE", "Hero/Image");
        node.fills = vec![Paint {
            paint_type: "IMAGE".into(),
            image_ref: Some("ref-1".into()),
            ..Default::default()
        }];
        let ir = ReverseConverter::default().convert(&node);
        assert_eq!(ir.node_type, NodeType::Image);
        assert_eq!(ir.image.map(|i| i.src), Some("ref-1".to_string()));
    }

    #[test]
    fn plugin_data_restores_locator() {
        let mut node = DesignNode::new("FRAME", "Login");
        let mut data = BTreeMap::new();
        data.insert("sourceFile".to_string(), "src/Login.vue".to_string());
        data.insert("selector".to_string(), "form#login".to_string());
        data.insert("cssClasses".to_string(), "card".to_string());
        data.insert("originalTag".to_string(), "form".to_string());
        node.shared_plugin_data.insert(DEFAULT_NAMESPACE.to_string(), data);

        let ir = ReverseConverter::default().convert(&node);
        assert_eq!(ir.locator.selector, "form#login");
        assert_eq!(ir.source_tag, "form");

        let other = ReverseConverter::new("another-plugin").convert(&node);
        assert_eq!(other.locator, Locator::default());
    }

    #[test]
    fn missing_box_is_unit_layout() {
        let ir = ReverseConverter::default().convert(&DesignNode::new("FRAME", "X"));
        assert_eq!(ir.layout, Layout::default());
    }
}
