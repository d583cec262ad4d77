use microbe_world::{SimulationConfig, WorldKernel, WorldSnapshot};
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> std::path::PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("microbe-world-{prefix}-{unique}"))
}

#[test]
fn save_then_load_restores_the_world() {
    let dir = temp_dir("round-trip");
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("world.json");

    let config = SimulationConfig::default().validate().expect("valid config");
    let mut kernel = WorldKernel::new(config.clone());
    for _ in 0..10 {
        kernel.tick();
    }
    kernel.save_to_path(&path).expect("save world");

    // No temp file left behind after a clean save.
    assert!(!dir.join("world.json.tmp").exists());

    let reloaded = WorldKernel::load_from_path(config, &path).expect("load world");
    // The per-tick budget is transient and not persisted, so compare the
    // serialized form rather than the in-memory models.
    let expected = kernel.snapshot().to_json().expect("serialize saved world");
    let actual = reloaded.snapshot().to_json().expect("serialize loaded world");
    assert_eq!(expected, actual);
    assert_eq!(reloaded.stats().age, kernel.stats().age);
    assert_eq!(reloaded.live_count(), kernel.live_count());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn stale_temp_file_is_removed_on_load() {
    let dir = temp_dir("stale-tmp");
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("world.json");

    let config = SimulationConfig::default().validate().expect("valid config");
    let kernel = WorldKernel::new(config);
    kernel.save_to_path(&path).expect("save world");

    // Simulate an interrupted later save.
    fs::write(dir.join("world.json.tmp"), b"{ partial").expect("write stale temp");

    let snapshot = WorldSnapshot::load_json(&path).expect("load ignores stale temp");
    assert_eq!(snapshot.version, microbe_world::SNAPSHOT_VERSION);
    assert!(!dir.join("world.json.tmp").exists());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn load_rejects_unknown_snapshot_version() {
    let dir = temp_dir("bad-version");
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("world.json");

    let config = SimulationConfig::default().validate().expect("valid config");
    let kernel = WorldKernel::new(config);
    let mut snapshot = kernel.snapshot();
    snapshot.version = 999;
    let data = serde_json::to_vec_pretty(&snapshot).expect("serialize");
    fs::write(&path, data).expect("write snapshot");

    let err = WorldSnapshot::load_json(&path).expect_err("version check");
    assert!(matches!(
        err,
        microbe_world::PersistError::UnsupportedVersion {
            version: 999,
            expected: _
        }
    ));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_version_field_defaults_to_current() {
    let config = SimulationConfig::default().validate().expect("valid config");
    let kernel = WorldKernel::new(config);
    let json = kernel.snapshot().to_json().expect("serialize");

    // Drop the version field as an older writer would have omitted it.
    let mut value: serde_json::Value = serde_json::from_str(&json).expect("parse");
    value.as_object_mut().expect("object").remove("version");
    let stripped = serde_json::to_string(&value).expect("reserialize");

    let snapshot = WorldSnapshot::from_json(&stripped).expect("default version");
    assert_eq!(snapshot.version, microbe_world::SNAPSHOT_VERSION);
}
