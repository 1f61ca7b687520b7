// Full decision table: create a database at one release, reopen it with every
// combination of release, require_min and require_max, and check the gate
// accepts or refuses exactly when it should.

mod common;

use common::{DbFixture, FUTURE_LOGV};
use logcompat::{CompatibilityConfig, Error, MetadataStore, ReleaseSpec, Version};

/// (release setting, log format it maps to)
type Scenario = (&'static str, u16);

// "none" maps to the builtin default, release 3.1 / log format 3.
const CREATE: [Scenario; 4] = [("none", 3), ("3.1", 3), ("3.0", 2), ("2.6", 1)];
const RELEASE: [Scenario; 5] = [("none", 3), ("3.1", 3), ("3.0", 2), ("2.6", 1), ("2.6.1", 1)];
const MAX: [Scenario; 6] = [
    ("5.0", FUTURE_LOGV),
    ("none", 3),
    ("3.1", 3),
    ("3.0", 2),
    ("2.6", 1),
    ("2.6.1", 1),
];
const MIN: [Scenario; 6] = [
    ("5.0", FUTURE_LOGV),
    ("none", 3),
    ("3.1", 3),
    ("3.0", 2),
    ("2.6", 1),
    ("2.6.1", 1),
];

fn spec(s: &str) -> ReleaseSpec {
    s.parse().expect("valid release setting")
}

/// Whether reopening with these settings must fail.
///
/// `log_rel` is the format of the release the reopen runs as. A reopen with
/// no release keeps the active release, which here is the creation release.
fn expect_error(log_create: u16, rel: Scenario, min: Scenario, max: Scenario) -> bool {
    let min_set = min.0 != "none";
    let max_set = max.0 != "none";
    let (log_min, log_max) = (min.1, max.1);
    let log_rel = if rel.0 == "none" { log_create } else { rel.1 };

    log_min >= FUTURE_LOGV
        || log_max >= FUTURE_LOGV
        || (max_set && log_max < log_rel)
        || (min_set && log_min > log_rel)
        || (max_set && min_set && log_max < log_min)
        || (max_set && log_max < log_create)
        || (min_set && log_min > log_create)
}

#[test]
fn test_compat_decision_table() {
    let mut checked = 0;

    for create in CREATE {
        for rel in RELEASE {
            for min in MIN {
                for max in MAX {
                    for base_config in [true, false] {
                        run_scenario(create, rel, min, max, base_config);
                        checked += 1;
                    }
                }
            }
        }
    }

    assert_eq!(checked, 4 * 5 * 6 * 6 * 2);
}

fn run_scenario(create: Scenario, rel: Scenario, min: Scenario, max: Scenario, base_config: bool) {
    let label = format!(
        "create={} release={} min={} max={} base={}",
        create.0, rel.0, min.0, max.0, base_config
    );
    let fixture = DbFixture::new();

    let creation_config = CompatibilityConfig::new().with_release(spec(create.0));
    let conn = fixture
        .open(creation_config, base_config)
        .unwrap_or_else(|e| panic!("{}: create failed: {}", label, e));
    let created = *conn.metadata();
    conn.close().expect("close");
    assert_eq!(created.log_version.get(), create.1, "{}", label);

    let reopen_config = CompatibilityConfig::new()
        .with_release(spec(rel.0))
        .with_require_min(spec(min.0))
        .with_require_max(spec(max.0));
    let result = fixture.open(reopen_config, base_config);

    let stored = MetadataStore::open(&fixture.db_path)
        .expect("metadata store")
        .load()
        .expect("load")
        .expect("metadata present");

    if expect_error(create.1, rel, min, max) {
        match result {
            Err(Error::Compatibility(_)) => {}
            Err(other) => panic!("{}: wrong error type: {}", label, other),
            Ok(conn) => panic!(
                "{}: expected rejection, opened with log format {}",
                label,
                conn.log_version()
            ),
        }
        assert_eq!(stored, created, "{}: rejected open changed metadata", label);
    } else {
        let conn = result.unwrap_or_else(|e| panic!("{}: expected success: {}", label, e));

        let (expected_release, expected_log) = if rel.0 == "none" {
            (created.active_release, created.log_version.get())
        } else {
            (spec(rel.0).version().expect("set"), rel.1)
        };
        assert_eq!(conn.release(), expected_release, "{}", label);
        assert_eq!(
            conn.log_version().get(),
            expected_log.max(create.1),
            "{}",
            label
        );
        assert_eq!(conn.creation_release(), created.creation_release, "{}", label);
        assert_eq!(stored, *conn.metadata(), "{}", label);
    }

    let has_base = MetadataStore::open(&fixture.db_path)
        .expect("metadata store")
        .load_base_config()
        .expect("read base config")
        .is_some();
    assert_eq!(has_base, base_config, "{}", label);
}

#[test]
fn test_release_outside_own_bounds_refused() {
    let upgrade = DbFixture::new();
    upgrade.open_str("release=3.0").unwrap().close().unwrap();
    let err = upgrade
        .open_str("release=3.1,require_max=3.0")
        .unwrap_err();
    assert!(matches!(err, Error::Compatibility(_)));

    let downgrade = DbFixture::new();
    downgrade.open_str("release=3.1").unwrap().close().unwrap();
    let err = downgrade
        .open_str("release=2.6,require_min=3.1")
        .unwrap_err();
    assert!(matches!(err, Error::Compatibility(_)));

    let conn = downgrade.open_str("").unwrap();
    assert_eq!(conn.release(), Version::new(3, 1));
}

#[test]
fn test_patch_release_matches_plain_release() {
    let a = DbFixture::new();
    let b = DbFixture::new();

    let conn_a = a
        .open(CompatibilityConfig::new().with_release(spec("2.6")), true)
        .unwrap();
    let conn_b = b
        .open(CompatibilityConfig::new().with_release(spec("2.6.1")), true)
        .unwrap();
    assert_eq!(conn_a.log_version(), conn_b.log_version());
    assert_eq!(conn_a.release(), conn_b.release());
    assert_eq!(conn_b.release().to_string(), "2.6.1");
}

#[test]
fn test_default_create_records_builtin_release() {
    let fixture = DbFixture::new();
    let conn = fixture.open(CompatibilityConfig::new(), true).unwrap();
    assert!(conn.created());
    assert_eq!(conn.creation_release(), Version::new(3, 1));
}
