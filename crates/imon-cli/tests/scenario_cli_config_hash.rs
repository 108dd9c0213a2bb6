use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    let base = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../config/defaults/base.yaml")
        .to_string_lossy()
        .to_string();

    Command::cargo_bin("imon")
        .unwrap()
        .args(["config-hash", &base])
        .assert()
        .success()
        .stdout(predicate::str::is_match("config_hash=[0-9a-f]{64}\n").unwrap())
        .stdout(predicate::str::contains("\"catalog_max_age_hours\":24"));
}

#[test]
fn config_hash_refuses_secret_literals() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("leaky.yaml");
    std::fs::write(&path, "api:\n  access_key: \"sk-live-abcdef\"\n").unwrap();

    Command::cargo_bin("imon")
        .unwrap()
        .args(["config-hash", &path.to_string_lossy()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_SECRET_DETECTED"));
}

#[test]
fn unknown_status_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    Command::cargo_bin("imon")
        .unwrap()
        .current_dir(tmp.path())
        .env("IMON_API_ACCESS_KEY", "k")
        .args(["check", "--user", "a@b.c", "--status", "urgent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --status 'urgent'"));
}

#[test]
fn out_of_range_catalog_max_age_is_a_config_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("site.yaml");
    std::fs::write(&path, "cache:\n  catalog_max_age_hours: 9000000000000000\n").unwrap();

    Command::cargo_bin("imon")
        .unwrap()
        .current_dir(tmp.path())
        .args(["--config", &path.to_string_lossy(), "cache", "status"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "CONFIG_INVALID /cache/catalog_max_age_hours out of range",
        ));
}
