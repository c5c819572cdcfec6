//! Changeset types and text formatting.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::ir::{MappingEntry, NameMapping};

/// Property path emitted when the after side lost its managed layout.
pub const LAYOUT_INTEGRITY_KEY: &str = "layout.integrity";

/// Structural status of a node present on only one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Added,
    Deleted,
}

/// Before and after values of one property path; an absent side is `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyChange {
    pub before: Value,
    pub after: Value,
}

/// What happened to one named node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeChange {
    /// The node exists on one side only.
    Status { status: NodeStatus },
    /// Property paths (`styles.backgroundColor`, `layout.width`, ...) that differ.
    Properties(BTreeMap<String, PropertyChange>),
}

impl NodeChange {
    pub fn status(&self) -> Option<NodeStatus> {
        match self {
            NodeChange::Status { status } => Some(*status),
            NodeChange::Properties(_) => None,
        }
    }

    pub fn properties(&self) -> Option<&BTreeMap<String, PropertyChange>> {
        match self {
            NodeChange::Status { .. } => None,
            NodeChange::Properties(props) => Some(props),
        }
    }
}

/// Name-keyed changes between two IR snapshots, in emission order.
///
/// Serializes as a JSON object whose key order is the emission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changeset {
    entries: Vec<(String, NodeChange)>,
}

/// Added / deleted / modified counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChangeCounts {
    pub added: usize,
    pub deleted: usize,
    pub modified: usize,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, change: NodeChange) {
        self.entries.push((name.into(), change));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeChange)> {
        self.entries.iter().map(|(name, change)| (name.as_str(), change))
    }

    /// Looks up the change recorded for a node name.
    pub fn get(&self, name: &str) -> Option<&NodeChange> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, change)| change)
    }

    pub fn counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for (_, change) in &self.entries {
            match change.status() {
                Some(NodeStatus::Added) => counts.added += 1,
                Some(NodeStatus::Deleted) => counts.deleted += 1,
                None => counts.modified += 1,
            }
        }
        counts
    }

    /// Names of nodes whose changes carry a layout-integrity warning.
    pub fn layout_warnings(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, change)| {
                change
                    .properties()
                    .is_some_and(|props| props.contains_key(LAYOUT_INTEGRITY_KEY))
            })
            .map(|(name, _)| name)
            .collect()
    }

    /// Routes modified entries to their source locations.
    ///
    /// Added and deleted nodes cannot be patched property by property and
    /// are listed as structural. A modified node resolves through an exact
    /// mapping key first, then through the single mapping key sharing its
    /// last path segment; anything else, or an entry without a source file
    /// or selector, is listed as unmapped.
    pub fn route<'a>(&'a self, mapping: &'a NameMapping, separator: &str) -> PatchPlan<'a> {
        let mut plan = PatchPlan::default();
        for (name, change) in self.iter() {
            let Some(properties) = change.properties() else {
                plan.structural.push(name);
                continue;
            };
            let entry = mapping
                .get(name)
                .or_else(|| unique_by_local_part(mapping, name, separator))
                .filter(|e| !e.source_file.is_empty() && !e.selector.is_empty());
            match entry {
                Some(entry) => plan.targets.push(PatchTarget {
                    name,
                    source_file: &entry.source_file,
                    selector: &entry.selector,
                    properties,
                }),
                None => plan.unmapped.push(name),
            }
        }
        plan
    }
}

fn local_part<'n>(name: &'n str, separator: &str) -> &'n str {
    if separator.is_empty() {
        return name;
    }
    name.rsplit(separator).next().unwrap_or(name)
}

fn unique_by_local_part<'a>(
    mapping: &'a NameMapping,
    name: &str,
    separator: &str,
) -> Option<&'a MappingEntry> {
    let local = local_part(name, separator);
    let mut matches = mapping
        .iter()
        .filter(|(key, _)| local_part(key, separator) == local)
        .map(|(_, entry)| entry);
    let first = matches.next()?;
    matches.next().is_none().then_some(first)
}

impl Serialize for Changeset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, change) in &self.entries {
            map.serialize_entry(name, change)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Changeset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChangesetVisitor;

        impl<'de> Visitor<'de> for ChangesetVisitor {
            type Value = Changeset;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of node names to changes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Changeset, A::Error> {
                let mut changeset = Changeset::new();
                while let Some((name, change)) = access.next_entry::<String, NodeChange>()? {
                    changeset.push(name, change);
                }
                Ok(changeset)
            }
        }

        deserializer.deserialize_map(ChangesetVisitor)
    }
}

/// Modified nodes resolved to their source locations.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PatchPlan<'a> {
    pub targets: Vec<PatchTarget<'a>>,
    /// Added or deleted nodes.
    pub structural: Vec<&'a str>,
    pub unmapped: Vec<&'a str>,
}

/// One modified node and where its source lives.
#[derive(Clone, Debug, Serialize)]
pub struct PatchTarget<'a> {
    pub name: &'a str,
    pub source_file: &'a str,
    pub selector: &'a str,
    pub properties: &'a BTreeMap<String, PropertyChange>,
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "(none)".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_properties(
    f: &mut fmt::Formatter<'_>,
    properties: &BTreeMap<String, PropertyChange>,
) -> fmt::Result {
    for (path, change) in properties {
        writeln!(
            f,
            "    {}: {} -> {}",
            path,
            display_value(&change.before),
            display_value(&change.after)
        )?;
    }
    Ok(())
}

impl fmt::Display for Changeset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "No changes.");
        }
        for (name, change) in &self.entries {
            match change {
                NodeChange::Status {
                    status: NodeStatus::Added,
                } => writeln!(f, "  NEW: {name}")?,
                NodeChange::Status {
                    status: NodeStatus::Deleted,
                } => writeln!(f, "  DEL: {name}")?,
                NodeChange::Properties(properties) => {
                    writeln!(f, "  CHANGED: {name}")?;
                    write_properties(f, properties)?;
                }
            }
        }
        let counts = self.counts();
        writeln!(f)?;
        writeln!(
            f,
            "Total changes: {} ({} modified, {} added, {} deleted)",
            self.entries.len(),
            counts.modified,
            counts.added,
            counts.deleted
        )?;
        let warnings = self.layout_warnings();
        if !warnings.is_empty() {
            writeln!(f, "Layout integrity warnings: {}", warnings.len())?;
        }
        Ok(())
    }
}

impl fmt::Display for PatchPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patch targets:")?;
        if self.targets.is_empty() {
            writeln!(f, "  - (none)")?;
        }
        for target in &self.targets {
            writeln!(f, "  {} ({})", target.name, target.source_file)?;
            writeln!(f, "    selector: {}", target.selector)?;
            write_properties(f, target.properties)?;
        }
        if !self.structural.is_empty() {
            writeln!(f)?;
            writeln!(f, "Structural changes (not patched):")?;
            for name in &self.structural {
                writeln!(f, "  - {name}")?;
            }
        }
        if !self.unmapped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unmapped nodes:")?;
            for name in &self.unmapped {
                writeln!(f, "  - {name}")?;
            }
        }
        Ok(())
    }
}
