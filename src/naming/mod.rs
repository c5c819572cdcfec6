//! Deterministic hierarchical naming of UI nodes.
//!
//! Every IR node gets a name of the form `Page/Header/Title`: the parent's
//! qualified name, a separator, and a local name picked by the first
//! matching rule in a fixed priority list. Names must be stable across
//! independent runs because they are the join key between a pushed
//! snapshot and the design document pulled back later.
//!
//! Resolution must happen in preorder: a child's qualified name embeds the
//! parent's already-resolved name.

mod preview;

pub use preview::preview_tree;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use crate::ir::raw::RawNode;

/// Default separator between hierarchy levels.
pub const DEFAULT_SEPARATOR: &str = "/";

/// Naming engine settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingConfig {
    /// Separator between hierarchy levels.
    pub separator: String,

    /// Attribute whose value overrides every other rule.
    pub override_attribute: String,

    /// Class prefixes that mark utility (non-semantic) classes.
    pub ignore_class_prefixes: Vec<String>,

    /// Tag → display name table for semantic HTML tags.
    pub semantic_tags: BTreeMap<String, String>,

    /// Component names that are framework wrappers, not real components.
    pub generic_component_names: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            override_attribute: "data-figma-name".to_string(),
            ignore_class_prefixes: DEFAULT_UTILITY_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            semantic_tags: DEFAULT_SEMANTIC_TAGS
                .iter()
                .map(|(tag, name)| (tag.to_string(), name.to_string()))
                .collect(),
            generic_component_names: ["div", "span", "template", "fragment"]
                .iter()
                .map(|n| n.to_string())
                .collect(),
        }
    }
}

const DEFAULT_UTILITY_PREFIXES: &[&str] = &[
    "flex", "grid", "block", "inline", "hidden", "relative", "absolute", "fixed", "sticky",
    "overflow", "z-", "opacity-", "w-", "h-", "min-w-", "min-h-", "max-w-", "max-h-", "p-",
    "px-", "py-", "pt-", "pr-", "pb-", "pl-", "m-", "mx-", "my-", "mt-", "mr-", "mb-", "ml-",
    "gap-", "space-", "items-", "justify-", "self-", "text-", "font-", "leading-", "tracking-",
    "align-", "bg-", "from-", "via-", "to-", "gradient-", "border-", "rounded-", "ring-",
    "outline-", "shadow-", "blur-", "brightness-", "contrast-", "transition-", "duration-",
    "ease-", "delay-", "animate-", "transform-", "scale-", "rotate-", "translate-", "cursor-",
    "select-", "pointer-events-", "sm:", "md:", "lg:", "xl:", "2xl:", "dark:", "hover:",
    "focus:", "group-", "peer-",
];

const DEFAULT_SEMANTIC_TAGS: &[(&str, &str)] = &[
    ("nav", "Nav"),
    ("header", "Header"),
    ("footer", "Footer"),
    ("main", "Main"),
    ("aside", "Sidebar"),
    ("section", "Section"),
    ("article", "Article"),
    ("form", "Form"),
    ("button", "Button"),
    ("input", "Input"),
    ("textarea", "TextArea"),
    ("select", "Select"),
    ("img", "Image"),
    ("video", "Video"),
    ("audio", "Audio"),
    ("canvas", "Canvas"),
    ("svg", "SVG"),
    ("table", "Table"),
    ("ul", "List"),
    ("ol", "OrderedList"),
    ("li", "ListItem"),
    ("a", "Link"),
    ("h1", "Heading1"),
    ("h2", "Heading2"),
    ("h3", "Heading3"),
    ("h4", "Heading4"),
    ("h5", "Heading5"),
    ("h6", "Heading6"),
    ("p", "Paragraph"),
    ("span", "Text"),
    ("label", "Label"),
    ("dialog", "Dialog"),
];

/// Everything the engine looks at to name one node.
#[derive(Clone, Copy, Debug)]
pub struct NameRequest<'a> {
    pub tag: &'a str,
    pub attrs: &'a BTreeMap<String, String>,
    pub component_name: Option<&'a str>,
    pub sibling_index: usize,
    pub sibling_tag_count: usize,
}

impl<'a> NameRequest<'a> {
    /// Builds a request from an extracted node.
    pub fn from_raw(raw: &'a RawNode) -> Self {
        Self {
            tag: &raw.tag,
            attrs: &raw.attrs,
            component_name: raw.component_name.as_deref(),
            sibling_index: raw.sibling_index,
            sibling_tag_count: raw.sibling_tag_count,
        }
    }

    fn attr(&self, key: &str) -> Option<&'a str> {
        self.attrs
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// The rule that produced a local name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameSource {
    Override,
    Component,
    Id,
    SemanticClass,
    Role,
    SemanticTag,
    Tag,
}

/// A resolved local name and the rule it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedName {
    pub local: String,
    pub source: NameSource,
}

type Rule = fn(&NamingConfig, &NameRequest<'_>) -> Option<String>;

/// Resolution rules in priority order; the first `Some` wins.
const RULES: [(NameSource, Rule); 7] = [
    (NameSource::Override, override_rule),
    (NameSource::Component, component_rule),
    (NameSource::Id, id_rule),
    (NameSource::SemanticClass, semantic_class_rule),
    (NameSource::Role, role_rule),
    (NameSource::SemanticTag, semantic_tag_rule),
    (NameSource::Tag, tag_rule),
];

fn override_rule(config: &NamingConfig, req: &NameRequest<'_>) -> Option<String> {
    let value = req.attr(&config.override_attribute)?;
    let sanitized = if config.separator.is_empty() {
        value.to_string()
    } else {
        value.replace(config.separator.as_str(), "")
    };
    non_empty(sanitized.trim().to_string())
}

fn component_rule(config: &NamingConfig, req: &NameRequest<'_>) -> Option<String> {
    let name = req.component_name.map(str::trim).filter(|n| !n.is_empty())?;
    let generic = config
        .generic_component_names
        .iter()
        .any(|g| g.eq_ignore_ascii_case(name));
    if generic {
        return None;
    }
    non_empty(to_pascal_case(name))
}

fn id_rule(_config: &NamingConfig, req: &NameRequest<'_>) -> Option<String> {
    req.attr("id").and_then(|id| non_empty(to_pascal_case(id)))
}

fn semantic_class_rule(config: &NamingConfig, req: &NameRequest<'_>) -> Option<String> {
    req.attr("class")?
        .split_whitespace()
        .find(|cls| !is_utility_class(config, cls))
        .and_then(|cls| non_empty(to_pascal_case(cls)))
}

fn role_rule(_config: &NamingConfig, req: &NameRequest<'_>) -> Option<String> {
    req.attr("role").and_then(|role| non_empty(to_pascal_case(role)))
}

fn semantic_tag_rule(config: &NamingConfig, req: &NameRequest<'_>) -> Option<String> {
    config
        .semantic_tags
        .get(&req.tag.to_ascii_lowercase())
        .cloned()
}

fn tag_rule(_config: &NamingConfig, req: &NameRequest<'_>) -> Option<String> {
    let tag = req.tag.trim();
    Some(if tag.is_empty() { "node" } else { tag }.to_string())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Returns true if a class token carries no naming meaning.
///
/// A token is a utility class when it starts with one of the configured
/// prefixes (case-insensitive), has at most two characters, or is purely
/// numeric.
pub fn is_utility_class(config: &NamingConfig, cls: &str) -> bool {
    let lower = cls.to_ascii_lowercase();
    if config
        .ignore_class_prefixes
        .iter()
        .any(|prefix| lower.starts_with(&prefix.to_ascii_lowercase()))
    {
        return true;
    }
    cls.chars().count() <= 2 || cls.chars().all(|c| c.is_ascii_digit())
}

/// Converts an identifier to PascalCase.
///
/// Non-alphanumeric characters are word boundaries and are dropped; the
/// first character of each word is upper-cased and the rest lower-cased, so
/// `user-profile_card` becomes `UserProfileCard` and `LoginForm` becomes
/// `Loginform`.
pub fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Resolves names for extracted nodes.
///
/// The engine holds only configuration; it is immutable after construction
/// and can be shared between threads.
#[derive(Clone, Debug, Default)]
pub struct NamingEngine {
    config: NamingConfig,
}

impl NamingEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    pub fn separator(&self) -> &str {
        &self.config.separator
    }

    /// Resolves the fully-qualified name of a node under `parent_path`.
    pub fn resolve(&self, parent_path: &str, req: &NameRequest<'_>) -> String {
        let resolved = self.resolve_local(req);
        let name = self.join(parent_path, &resolved.local);
        trace!(name = %name, source = ?resolved.source, "resolved node name");
        name
    }

    /// Resolves the local (last-segment) name of a node.
    ///
    /// When more than one sibling shares the tag, `_{index + 1}` is appended
    /// whichever rule matched.
    pub fn resolve_local(&self, req: &NameRequest<'_>) -> ResolvedName {
        let (source, base) = RULES
            .iter()
            .find_map(|(source, rule)| rule(&self.config, req).map(|name| (*source, name)))
            .unwrap_or((NameSource::Tag, "node".to_string()));

        let local = if req.sibling_tag_count > 1 {
            format!("{}_{}", base, req.sibling_index + 1)
        } else {
            base
        };
        ResolvedName { local, source }
    }

    /// Joins a parent path and a local name.
    pub fn join(&self, parent_path: &str, local: &str) -> String {
        if parent_path.is_empty() {
            local.to_string()
        } else {
            format!("{}{}{}", parent_path, self.config.separator, local)
        }
    }

    /// Returns the last segment of a qualified name.
    pub fn local_part<'n>(&self, name: &'n str) -> &'n str {
        if self.config.separator.is_empty() {
            return name;
        }
        name.rsplit(self.config.separator.as_str())
            .next()
            .unwrap_or(name)
    }
}
