//! Fuzz target for CSS color and gradient value parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 strings to the computed-style value
//! parsers, checking for panics, crashes, or hangs.

#![no_main]

use designsync::canonical::fuzz_css_value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 1024 * 1024 {
        return;
    }

    let Ok(value) = std::str::from_utf8(data) else {
        return;
    };

    fuzz_css_value(value);
});
