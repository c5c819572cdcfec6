//! Intermediate Representation (IR) for designsync.
//!
//! This module defines the canonical tree that both synchronization
//! directions meet in. A rendered page is canonicalized into it, a design
//! document is reverse-converted into it, and the diff engine compares two
//! snapshots of it.
//!
//! # Design Principles
//!
//! 1. **One Vocabulary**: Styles, text, and auto-layout are typed structs
//!    shared by both directions, so there is no representation-specific
//!    comparison anywhere downstream.
//!
//! 2. **Sparse Bags**: Default values are never serialized. Two nodes that
//!    render the same serialize the same, which keeps diffs minimal.
//!
//! 3. **Permissive Input**: The raw and design input types accept partial
//!    data and substitute documented defaults instead of failing.
//!
//! # Example
//!
//! ```
//! use designsync::ir::{IrNode, NodeType, Styles};
//!
//! let tree = IrNode::new("Hero", NodeType::Frame)
//!     .with_layout(0.0, 0.0, 1440.0, 600.0)
//!     .with_child(IrNode::new("Hero/Title", NodeType::Text));
//!
//! assert_eq!(tree.count(), 2);
//! assert!(tree.styles.is_empty());
//! ```

pub mod color;
pub mod design;
pub mod io_json;
mod lenient;
mod model;
pub mod raw;

// Re-export core types for convenient access
pub use model::{
    AutoLayout, Border, BorderStyle, ColorStop, CornerRadii, CounterAlign, Direction, Gradient,
    GradientKind, ImageRef, IrDocument, IrNode, Layout, LayoutWarning, Locator, MappingEntry,
    NameMapping, NodeType, PrimaryAlign, ScaleMode, Shadow, SourceInfo, Stats, Styles, TextAlign,
    TextStyle, Viewport, IR_VERSION,
};
