#![no_main]

use libfuzzer_sys::fuzz_target;
use logcompat::{CompatibilityConfig, OpenOptions};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    if let Ok(text) = std::str::from_utf8(data) {
        if text.len() > 10_000 {
            return;
        }

        // Parsing should never panic, and whatever parses must survive
        // a render/parse cycle unchanged
        if let Ok(config) = CompatibilityConfig::parse(text) {
            let rendered = config.to_string();
            let reparsed = CompatibilityConfig::parse(&rendered).expect("rendered config parses");
            assert_eq!(config, reparsed);
        }
        let _ = OpenOptions::parse(text);
    }
});
