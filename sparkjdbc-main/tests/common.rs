use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use assert_cmd::Command;

pub fn conf_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/confs")
        .join(name)
}

pub fn sparkjdbc(args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("sparkjdbc").unwrap();
    cmd.env("SPARKJDBC_TEST_PG_PASSWORD", "supersecret")
        .env("RUST_LOG", "info")
        .args(args);
    cmd
}

/// Writes a fake spark-submit binary which runs the supplied script body
pub fn fake_spark_submit(dir: &Path, body: &str) {
    let path = dir.join("spark-submit");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

pub fn path_with(dir: &Path) -> String {
    format!(
        "{}:{}",
        dir.display(),
        std::env::var("PATH").unwrap_or_default()
    )
}
