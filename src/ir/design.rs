//! Design-tool document nodes, as returned by the tool's public file API.
//!
//! Only the fields the reverse converter reads are modelled. Unknown fields
//! are ignored and every modelled field is optional, so documents written
//! by newer tool versions still parse.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::lenient::{or_none, skip_invalid};

/// A node of the design document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignNode {
    pub id: String,
    pub name: String,

    /// Native node type, e.g. `FRAME`, `TEXT`, `RECTANGLE`.
    #[serde(rename = "type")]
    pub node_type: String,

    pub visible: bool,

    #[serde(deserialize_with = "or_none")]
    pub absolute_bounding_box: Option<BoundingBox>,

    #[serde(deserialize_with = "skip_invalid")]
    pub fills: Vec<Paint>,
    #[serde(deserialize_with = "skip_invalid")]
    pub strokes: Vec<Paint>,
    pub stroke_weight: Option<f64>,
    pub stroke_dashes: Vec<f64>,
    #[serde(deserialize_with = "skip_invalid")]
    pub effects: Vec<Effect>,

    pub corner_radius: Option<f64>,
    #[serde(deserialize_with = "or_none")]
    pub rectangle_corner_radii: Option<Vec<f64>>,

    pub opacity: Option<f64>,
    pub blend_mode: Option<String>,
    /// Counter-clockwise rotation in degrees.
    pub rotation: Option<f64>,
    pub clips_content: Option<bool>,

    /// `NONE`, `HORIZONTAL` or `VERTICAL`.
    pub layout_mode: Option<String>,
    pub item_spacing: Option<f64>,
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,
    /// `NO_WRAP` or `WRAP`.
    pub layout_wrap: Option<String>,

    pub characters: Option<String>,
    #[serde(deserialize_with = "or_none")]
    pub style: Option<TypeStyle>,

    /// Plugin data grouped by namespace.
    pub shared_plugin_data: BTreeMap<String, BTreeMap<String, String>>,

    #[serde(deserialize_with = "skip_invalid")]
    pub children: Vec<DesignNode>,
}

impl Default for DesignNode {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            node_type: "FRAME".to_string(),
            visible: true,
            absolute_bounding_box: None,
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: None,
            stroke_dashes: Vec::new(),
            effects: Vec::new(),
            corner_radius: None,
            rectangle_corner_radii: None,
            opacity: None,
            blend_mode: None,
            rotation: None,
            clips_content: None,
            layout_mode: None,
            item_spacing: None,
            padding_top: None,
            padding_right: None,
            padding_bottom: None,
            padding_left: None,
            primary_axis_align_items: None,
            counter_axis_align_items: None,
            layout_wrap: None,
            characters: None,
            style: None,
            shared_plugin_data: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

impl DesignNode {
    /// Creates a node with the given native type and name.
    pub fn new(node_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the bounding box.
    pub fn with_box(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.absolute_bounding_box = Some(BoundingBox {
            x,
            y,
            width,
            height,
        });
        self
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: DesignNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the layout mode if it is an active flow direction.
    pub fn active_layout_mode(&self) -> Option<&str> {
        match self.layout_mode.as_deref() {
            Some(mode @ ("HORIZONTAL" | "VERTICAL")) => Some(mode),
            _ => None,
        }
    }
}

/// Absolute position and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Unit-interval color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Default for DesignColor {
    fn default() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        }
    }
}

/// A 2D vector in normalized or pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// A gradient stop; `position` may be missing in hand-written documents.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientStop {
    pub color: DesignColor,
    pub position: Option<f64>,
}

/// A fill or stroke paint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Paint {
    /// `SOLID`, `GRADIENT_LINEAR`, `GRADIENT_RADIAL`, `GRADIENT_ANGULAR`,
    /// `GRADIENT_DIAMOND`, `IMAGE`, ...
    #[serde(rename = "type")]
    pub paint_type: String,
    pub visible: bool,
    pub opacity: Option<f64>,
    pub color: Option<DesignColor>,
    pub gradient_handle_positions: Vec<Vector>,
    pub gradient_stops: Vec<GradientStop>,
    pub image_ref: Option<String>,
    pub scale_mode: Option<String>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            paint_type: "SOLID".to_string(),
            visible: true,
            opacity: None,
            color: None,
            gradient_handle_positions: Vec::new(),
            gradient_stops: Vec::new(),
            image_ref: None,
            scale_mode: None,
        }
    }
}

impl Paint {
    /// A visible solid paint.
    pub fn solid(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            color: Some(DesignColor { r, g, b, a }),
            ..Default::default()
        }
    }
}

/// A visual effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Effect {
    /// `DROP_SHADOW`, `INNER_SHADOW`, `LAYER_BLUR` or `BACKGROUND_BLUR`.
    #[serde(rename = "type")]
    pub effect_type: String,
    pub visible: bool,
    pub color: Option<DesignColor>,
    pub offset: Vector,
    pub radius: f64,
    pub spread: f64,
}

impl Default for Effect {
    fn default() -> Self {
        Self {
            effect_type: "DROP_SHADOW".to_string(),
            visible: true,
            color: None,
            offset: Vector::default(),
            radius: 0.0,
            spread: 0.0,
        }
    }
}

/// Typography of a text node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeStyle {
    pub font_family: Option<String>,
    pub font_weight: Option<f64>,
    pub font_size: Option<f64>,
    pub line_height_px: Option<f64>,
    /// `PIXELS`, `FONT_SIZE_%` or `INTRINSIC_%` (auto).
    pub line_height_unit: Option<String>,
    pub letter_spacing: Option<f64>,
    pub text_align_horizontal: Option<String>,
}
