//! JSON reading and writing for IR documents and the two input trees.
//!
//! File-based functions attach the path to parse errors; the string and
//! slice variants exist for tests, benches and fuzzing without file I/O.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::design::DesignNode;
use super::model::{IrDocument, IrNode};
use super::raw::{RawExtraction, RawNode};
use crate::error::SyncError;

/// Either a full IR document or a bare IR tree.
///
/// Snapshots are persisted as documents while reverse-converted trees are
/// usually bare; the diff accepts both.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum IrInput {
    Document(Box<IrDocument>),
    Tree(Box<IrNode>),
}

impl IrInput {
    /// The tree, regardless of wrapping.
    pub fn into_tree(self) -> IrNode {
        match self {
            IrInput::Document(doc) => doc.tree,
            IrInput::Tree(tree) => *tree,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInput {
    Extraction(RawExtraction),
    Tree(RawNode),
}

#[derive(Deserialize)]
struct DesignFile {
    document: DesignNode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DesignInput {
    File(DesignFile),
    Node(DesignNode),
}

/// Reads an IR document or bare tree from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_ir_json(path: &Path) -> Result<IrInput, SyncError> {
    read_json(path, "IR")
}

/// Writes any IR value (document or tree) as pretty JSON.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SyncError> {
    let file = File::create(path).map_err(SyncError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| SyncError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads an extractor output file.
///
/// Accepts either `{tree, viewport}` or a bare raw tree; a bare tree gets
/// the default viewport.
pub fn read_raw_json(path: &Path) -> Result<RawExtraction, SyncError> {
    let input: RawInput = read_json(path, "raw tree")?;
    Ok(raw_input_into_extraction(input))
}

/// Reads a design-tool document file.
///
/// Accepts either a file response (`{document: ...}`) or a bare node.
pub fn read_design_json(path: &Path) -> Result<DesignNode, SyncError> {
    let input: DesignInput = read_json(path, "design")?;
    Ok(design_input_into_node(input))
}

/// Parses an IR document or bare tree from a string.
pub fn from_json_str(json: &str) -> Result<IrInput, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses an IR document or bare tree from bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<IrInput, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Serializes any IR value to pretty JSON.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Parses extractor output from bytes.
pub fn raw_from_slice(bytes: &[u8]) -> Result<RawExtraction, serde_json::Error> {
    serde_json::from_slice(bytes).map(raw_input_into_extraction)
}

/// Parses a design-tool document from bytes.
pub fn design_from_slice(bytes: &[u8]) -> Result<DesignNode, serde_json::Error> {
    serde_json::from_slice(bytes).map(design_input_into_node)
}

fn raw_input_into_extraction(input: RawInput) -> RawExtraction {
    match input {
        RawInput::Extraction(extraction) => extraction,
        RawInput::Tree(tree) => RawExtraction {
            tree,
            viewport: Default::default(),
        },
    }
}

fn design_input_into_node(input: DesignInput) -> DesignNode {
    match input {
        DesignInput::File(file) => file.document,
        DesignInput::Node(node) => node,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, kind: &'static str) -> Result<T, SyncError> {
    let file = File::open(path).map_err(SyncError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| SyncError::JsonParse {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeType;

    #[test]
    fn test_document_and_tree_inputs() {
        let doc = r#"{"version": "1.0.0", "tree": {"name": "Root", "type": "FRAME"}}"#;
        match from_json_str(doc).expect("parse document") {
            IrInput::Document(d) => assert_eq!(d.tree.name, "Root"),
            IrInput::Tree(_) => panic!("expected a document"),
        }

        let tree = r#"{"name": "Root", "type": "TEXT"}"#;
        let parsed = from_json_str(tree).expect("parse tree").into_tree();
        assert_eq!(parsed.node_type, NodeType::Text);
    }

    #[test]
    fn test_raw_input_wrapped_or_bare() {
        let wrapped = br#"{"tree": {"tag": "main"}, "viewport": {"width": 390, "height": 844}}"#;
        let extraction = raw_from_slice(wrapped).expect("parse wrapped");
        assert_eq!(extraction.tree.tag, "main");
        assert_eq!(extraction.viewport.width, 390.0);

        let bare = br#"{"tag": "body", "children": [{"tag": "p"}]}"#;
        let extraction = raw_from_slice(bare).expect("parse bare");
        assert_eq!(extraction.tree.children.len(), 1);
        assert_eq!(extraction.viewport.width, 1440.0);
    }

    #[test]
    fn test_design_file_response() {
        let file = br#"{"document": {"type": "DOCUMENT", "name": "Doc", "children": []}}"#;
        let node = design_from_slice(file).expect("parse file");
        assert_eq!(node.node_type, "DOCUMENT");
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tree.json");
        let tree = IrNode::new("Root", NodeType::Frame);

        write_json(&path, &tree).expect("write");
        let restored = read_ir_json(&path).expect("read").into_tree();
        assert_eq!(restored, tree);
    }
}
