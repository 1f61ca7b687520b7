#![no_main]

use libfuzzer_sys::fuzz_target;
use logcompat_meta::CompatMetadata;

fuzz_target!(|data: &[u8]| {
    // Limit input size to prevent timeout
    if data.len() > 1_000_000 {
        return;
    }

    // Try to decode metadata - should never panic
    if let Ok(meta) = CompatMetadata::decode(data) {
        let encoded = meta.encode().expect("decoded metadata re-encodes");
        assert_eq!(CompatMetadata::decode(&encoded).ok(), Some(meta));
    }
});
