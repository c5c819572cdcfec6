//! Fuzz target for IR JSON parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the IR JSON parser and
//! diffs every parsed tree against itself, which must yield nothing but
//! layout-integrity entries for nodes that already carry a warning.

#![no_main]

use designsync::diff::{diff_trees, DiffOptions};
use designsync::ir::io_json::from_json_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(input) = from_json_slice(data) {
        let tree = input.into_tree();
        let changes = diff_trees(&tree, &tree, &DiffOptions::default());
        let counts = changes.counts();
        assert_eq!(counts.added + counts.deleted, 0);
        assert_eq!(counts.modified, changes.layout_warnings().len());
    }
});
