#![allow(dead_code)]

use std::collections::BTreeSet;

use designsync::ir::raw::{RawLayoutDescriptor, RawNode};
use designsync::ir::{IrNode, Layout, NodeType, Styles};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

const TAGS: &[&str] = &[
    "div", "span", "section", "article", "nav", "header", "ul", "li", "button", "p", "img", "a",
];

const CLASSES: &[&str] = &[
    "card", "flex", "p-4", "title", "hero-banner", "text-sm", "x", "42", "nav-item",
];

const IDS: &[&str] = &["main", "cta", "user-menu"];

const IR_TYPES: &[NodeType] = &[NodeType::Frame, NodeType::Text, NodeType::Rectangle];

const COLORS: &[&str] = &[
    "#fff",
    "#ff0000",
    "rgb(0, 128, 255)",
    "rgba(0, 0, 0, 0.5)",
    "transparent",
    "hsl(120, 50%, 50%)",
];

fn arb_layout() -> impl Strategy<Value = Option<Layout>> {
    prop::option::of(
        (0.0f64..2000.0, 0.0f64..2000.0, 0.0f64..1500.0, 0.0f64..1500.0).prop_map(
            |(x, y, width, height)| Layout {
                x,
                y,
                width,
                height,
            },
        ),
    )
}

fn arb_raw_leaf() -> impl Strategy<Value = RawNode> {
    (
        prop::sample::select(TAGS),
        prop::option::of(prop::sample::subsequence(CLASSES, 0..3)),
        prop::option::of(prop::sample::select(IDS)),
        prop::option::of(prop::sample::select(COLORS)),
        prop::option::of("[A-Za-z ]{1,12}"),
        any::<bool>(),
        arb_layout(),
    )
        .prop_map(|(tag, classes, id, background, text, flex, layout)| {
            let mut node = RawNode::new(tag);
            if let Some(classes) = classes {
                node = node.with_attr("class", classes.join(" "));
            }
            if let Some(id) = id {
                node = node.with_attr("id", id);
            }
            node.styles.background_color = background.map(str::to_string);
            if let Some(text) = text {
                node.is_text_node = true;
                node.text_content = Some(text);
            }
            if flex {
                node.auto_layout = Some(RawLayoutDescriptor {
                    display: "flex".into(),
                    gap: Some(8.0),
                    ..Default::default()
                });
            }
            node.layout = layout;
            node
        })
}

/// Arbitrary extracted DOM trees, with sibling indices filled in the way
/// the extractor reports them.
pub fn arb_raw_tree(depth: u32, size: u32, branch: u32) -> BoxedStrategy<RawNode> {
    arb_raw_leaf()
        .prop_recursive(depth, size, branch, move |inner| {
            (arb_raw_leaf(), prop::collection::vec(inner, 0..branch as usize)).prop_map(
                |(mut parent, children)| {
                    parent.is_text_node = false;
                    parent.text_content = None;
                    parent.children = children;
                    assign_siblings(&mut parent);
                    parent
                },
            )
        })
        .boxed()
}

fn assign_siblings(parent: &mut RawNode) {
    let tags: Vec<String> = parent.children.iter().map(|c| c.tag.clone()).collect();
    for (i, child) in parent.children.iter_mut().enumerate() {
        let count = tags.iter().filter(|t| **t == child.tag).count();
        let index = tags[..i].iter().filter(|t| **t == child.tag).count();
        child.sibling_index = index;
        child.sibling_tag_count = count;
    }
}

/// Arbitrary IR trees whose names are qualified paths, as produced by the
/// canonicalizer.
pub fn arb_ir_tree(depth: u32, size: u32, branch: u32) -> BoxedStrategy<IrNode> {
    let leaf = (
        "[A-Z][a-z]{0,6}",
        prop::sample::select(IR_TYPES),
        prop::option::of(prop::sample::select(COLORS)),
        1.0f64..500.0,
    )
        .prop_map(|(name, node_type, background, width)| {
            IrNode::new(name, node_type)
                .with_layout(0.0, 0.0, width, 40.0)
                .with_styles(Styles {
                    background_color: background.map(str::to_string),
                    ..Default::default()
                })
        });

    leaf.prop_recursive(depth, size, branch, move |inner| {
        (
            "[A-Z][a-z]{0,6}",
            prop::collection::vec(inner, 0..branch as usize),
        )
            .prop_map(|(name, children)| {
                let mut root = IrNode::new(name, NodeType::Frame);
                root.children = children;
                root
            })
    })
    .prop_map(|mut tree| {
        qualify(&mut tree, "");
        tree
    })
    .boxed()
}

fn qualify(node: &mut IrNode, parent: &str) {
    if !parent.is_empty() {
        node.name = format!("{parent}/{}", node.name);
    }
    let name = node.name.clone();
    for child in &mut node.children {
        qualify(child, &name);
    }
}

/// Distinct names of a tree.
pub fn names(tree: &IrNode) -> BTreeSet<String> {
    tree.iter().map(|n| n.name.clone()).collect()
}
