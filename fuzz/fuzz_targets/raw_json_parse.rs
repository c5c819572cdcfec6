//! Fuzz target for extractor output parsing.
//!
//! Anything that parses is also canonicalized, so panics in naming, style
//! normalization or flattening surface here too.

#![no_main]

use designsync::canonical::Canonicalizer;
use designsync::ir::io_json::raw_from_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(extraction) = raw_from_slice(data) {
        let _ = Canonicalizer::default().build_extraction(&extraction);
    }
});
