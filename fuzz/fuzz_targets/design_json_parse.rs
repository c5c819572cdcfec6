//! Fuzz target for design document parsing and reverse conversion.

#![no_main]

use designsync::ir::io_json::design_from_slice;
use designsync::reverse::ReverseConverter;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(design) = design_from_slice(data) {
        let _ = ReverseConverter::default().convert(&design);
    }
});
