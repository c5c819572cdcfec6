//! Canonicalization of extracted DOM trees into the IR.
//!
//! The [`Canonicalizer`] walks a [`RawNode`] tree depth-first in preorder,
//! names every node through the [`NamingEngine`], classifies it, normalizes
//! its computed styles into the sparse IR vocabulary and elides inert
//! wrapper elements. The name → locator table and node count are collected
//! in a context value that lives for exactly one [`Canonicalizer::build`]
//! call, so one canonicalizer can serve any number of pages, including from
//! several threads at once.
//!
//! # Example
//!
//! ```
//! use designsync::canonical::{BuildOptions, Canonicalizer};
//! use designsync::ir::raw::RawNode;
//! use designsync::ir::{NodeType, Viewport};
//! use designsync::naming::NamingEngine;
//!
//! let page = RawNode::new("div")
//!     .with_attr("id", "hero")
//!     .with_child(RawNode::text("h1", "Welcome").with_attr("class", "title"));
//!
//! let canonicalizer = Canonicalizer::new(NamingEngine::default(), BuildOptions::default());
//! let doc = canonicalizer.build(&page, Viewport::default());
//!
//! assert_eq!(doc.tree.name, "Hero");
//! assert_eq!(doc.tree.children[0].name, "Hero/Title");
//! assert_eq!(doc.tree.children[0].node_type, NodeType::Text);
//! ```

mod classify;
mod flatten;
mod gradient;
mod style;

pub use classify::classify;
pub use flatten::{inert_wrapper_child, INERT_WRAPPER_TAGS};
pub use gradient::parse_css_gradient;

use tracing::{debug, warn};

use crate::ir::raw::{RawExtraction, RawNode};
use crate::ir::{
    ImageRef, IrDocument, IrNode, Layout, Locator, MappingEntry, NameMapping, NodeType,
    ScaleMode, SourceInfo, Stats, Viewport, IR_VERSION,
};
use crate::naming::{NameRequest, NamingEngine};

/// Number of class tokens carried into a node selector.
const SELECTOR_CLASS_LIMIT: usize = 3;

/// Options for one canonicalization pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Frontend framework the page was rendered with.
    pub framework: String,
    /// Source file every locator points at.
    pub entry_file: String,
    /// Styling approach of the source project (`tailwind`, `css-modules`, ...).
    pub style_strategy: String,
    /// Timestamp written to the document header.
    ///
    /// Supplied by the caller; the canonicalizer never reads the clock so
    /// that identical input gives byte-identical output.
    pub generated_at: String,
    /// Whether inert wrapper elements are elided.
    pub smart_flatten: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            framework: "html".to_string(),
            entry_file: String::new(),
            style_strategy: "tailwind".to_string(),
            generated_at: String::new(),
            smart_flatten: true,
        }
    }
}

/// State accumulated during one build.
#[derive(Debug, Default)]
struct BuildContext {
    mapping: NameMapping,
    node_count: usize,
}

/// Converts extracted DOM trees into IR documents.
#[derive(Clone, Debug, Default)]
pub struct Canonicalizer {
    naming: NamingEngine,
    options: BuildOptions,
}

impl Canonicalizer {
    pub fn new(naming: NamingEngine, options: BuildOptions) -> Self {
        Self { naming, options }
    }

    pub fn naming(&self) -> &NamingEngine {
        &self.naming
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Builds an IR document from an extractor output.
    pub fn build_extraction(&self, extraction: &RawExtraction) -> IrDocument {
        self.build(&extraction.tree, extraction.viewport)
    }

    /// Builds an IR document from a raw tree rendered at `viewport`.
    pub fn build(&self, raw: &RawNode, viewport: Viewport) -> IrDocument {
        let mut ctx = BuildContext::default();
        let tree = self.convert(raw, "", &mut ctx);
        debug!(
            nodes = ctx.node_count,
            names = ctx.mapping.len(),
            "canonicalized tree"
        );

        IrDocument {
            version: IR_VERSION.to_string(),
            source: SourceInfo {
                framework: self.options.framework.clone(),
                entry_file: self.options.entry_file.clone(),
                style_strategy: self.options.style_strategy.clone(),
                generated_at: self.options.generated_at.clone(),
            },
            viewport,
            name_mapping: ctx.mapping,
            stats: Stats {
                node_count: ctx.node_count,
            },
            tree,
        }
    }

    fn convert(&self, raw: &RawNode, parent_path: &str, ctx: &mut BuildContext) -> IrNode {
        let raw = self.skip_wrappers(raw, parent_path);

        let name = self.unique_name(
            self.naming.resolve(parent_path, &NameRequest::from_raw(raw)),
            &ctx.mapping,
        );
        let node_type = classify(raw);
        let selector = build_selector(raw);
        let component_name = raw
            .component_name
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        ctx.node_count += 1;
        ctx.mapping.insert(
            name.clone(),
            MappingEntry {
                source_file: self.options.entry_file.clone(),
                selector: selector.clone(),
                component_name: component_name.unwrap_or_default().to_string(),
            },
        );

        let mut node = IrNode::new(name, node_type);
        node.source_tag = raw.tag.clone();
        node.layout = raw.layout.map(round_layout).unwrap_or_default();
        node.styles = style::normalize_styles(raw);
        node.component_ref = component_name.map(str::to_string);
        node.locator = Locator {
            source_file: self.options.entry_file.clone(),
            selector,
            css_classes: raw.attr("class").unwrap_or_default().to_string(),
        };

        match node_type {
            NodeType::Text => {
                node.text = raw
                    .text_content()
                    .map(|chars| style::text_style(&raw.styles, chars));
            }
            NodeType::Image => {
                node.image = Some(ImageRef {
                    src: raw
                        .image_src
                        .as_deref()
                        .or_else(|| raw.attr("src"))
                        .unwrap_or_default()
                        .to_string(),
                    scale_mode: ScaleMode::Fill,
                });
            }
            NodeType::AutoLayout => {
                node.auto_layout = raw
                    .auto_layout
                    .as_ref()
                    .and_then(|d| style::auto_layout(d, &raw.styles));
            }
            _ => {}
        }

        node.children = raw
            .children
            .iter()
            .map(|child| self.convert(child, &node.name, ctx))
            .collect();
        node
    }

    /// Descends through inert wrappers; the returned node takes their place.
    fn skip_wrappers<'a>(&self, mut raw: &'a RawNode, parent_path: &str) -> &'a RawNode {
        if !self.options.smart_flatten {
            return raw;
        }
        let override_attribute = &self.naming.config().override_attribute;
        while let Some(child) = inert_wrapper_child(raw, override_attribute) {
            debug!(tag = %raw.tag, parent = parent_path, "flattened inert wrapper");
            raw = child;
        }
        raw
    }

    /// Appends `_2`, `_3`, ... when a name was already emitted in this build.
    fn unique_name(&self, name: String, mapping: &NameMapping) -> String {
        if !mapping.contains_key(&name) {
            return name;
        }
        let unique = (2..)
            .map(|n| format!("{}_{}", name, n))
            .find(|candidate| !mapping.contains_key(candidate))
            .unwrap_or_default();
        warn!(name = %name, renamed = %unique, "duplicate node name");
        unique
    }
}

/// CSS selector of an element: tag, `#id`, and the first class tokens.
pub fn build_selector(raw: &RawNode) -> String {
    let mut selector = raw.tag.clone();
    if let Some(id) = raw.attr("id") {
        selector.push('#');
        selector.push_str(id);
    }
    if let Some(classes) = raw.attr("class") {
        for cls in classes.split_whitespace().take(SELECTOR_CLASS_LIMIT) {
            selector.push('.');
            selector.push_str(cls);
        }
    }
    selector
}

/// Fuzz-only entrypoint for CSS color and gradient value parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_css_value(input: &str) {
    let _ = crate::ir::color::normalize_css_color(input);
    let _ = parse_css_gradient(input);
}

fn round_layout(layout: Layout) -> Layout {
    Layout {
        x: style::px(layout.x),
        y: style::px(layout.y),
        width: style::px(layout.width),
        height: style::px(layout.height),
    }
}
