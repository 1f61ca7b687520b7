#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use logcompat_core::{resolve, CompatibilityRequest, LogVersionTable, ReleaseSpec, Version};

#[derive(Arbitrary, Debug)]
struct RawRequest {
    creation: (u8, u8),
    active: Option<(u8, u8)>,
    release: Option<(u8, u8)>,
    min: Option<(u8, u8)>,
    max: Option<(u8, u8)>,
}

fn spec(v: Option<(u8, u8)>) -> ReleaseSpec {
    v.map(|(major, minor)| Version::new(major as u32, minor as u32))
        .into()
}

fuzz_target!(|raw: RawRequest| {
    let table = LogVersionTable::builtin();
    let creation = Version::new(raw.creation.0 as u32, raw.creation.1 as u32);
    let request = CompatibilityRequest::new(creation)
        .with_active(spec(raw.active))
        .with_release(spec(raw.release))
        .with_min(spec(raw.min))
        .with_max(spec(raw.max));

    let first = resolve(&request, &table);
    assert_eq!(first, resolve(&request, &table));

    if let Ok(resolution) = first {
        let log_create = table.lookup(creation).expect("creation mapped");
        assert!(resolution.log_version >= log_create);
        assert!(table.is_supported(resolution.log_version));
    }
});
