use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use assert_cmd::Command;

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Writes `source` to a uniquely-named temp file so concurrently-running
/// tests never collide on the same path.
fn write_source(name: &str, source: &str) -> PathBuf {
    let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut path = std::env::temp_dir();
    path.push(format!("lox-test-{name}-{}-{unique}.lox", std::process::id()));
    fs::write(&path, source).expect("write temp source file");
    path
}

pub struct Output {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

/// Runs `source` as a script through the built binary and captures its
/// stdout/stderr/exit code. `name` only needs to be unique per call site.
pub fn run(name: &str, source: &str) -> Output {
    let path = write_source(name, source);
    let output = Command::cargo_bin("lox").unwrap().arg(&path).output().unwrap();
    let _ = fs::remove_file(&path);

    Output {
        stdout: String::from_utf8(output.stdout).expect("stdout to be utf8"),
        stderr: String::from_utf8(output.stderr).expect("stderr to be utf8"),
        code: output.status.code().unwrap_or(-1),
    }
}
