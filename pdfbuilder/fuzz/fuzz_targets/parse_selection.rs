#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfbuilder::config::JoinInput;
use pdfbuilder::selection::{self, PageWindow};
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(parsed) = selection::parse(s) {
        // Every resolved index must be in bounds.
        for page_count in [0, 1, 7] {
            if let Ok(indices) = parsed.resolve(page_count, Path::new("fuzz.pdf")) {
                assert!(indices.iter().all(|&i| i < page_count));
            }
        }

        if let Ok(window) = PageWindow::try_from(&parsed) {
            assert!(window.as_range().start < window.as_range().end);
        }
    }

    if let Ok(input) = s.parse::<JoinInput>() {
        assert!(!input.path.as_os_str().is_empty());
    }
});
