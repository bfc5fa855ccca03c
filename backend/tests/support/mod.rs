#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Write;
use std::sync::Mutex;

use tempfile::NamedTempFile;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub const HEADER: &str = "id,x mm,y mm,score";

/// A match card with two shooters on the left and right mounds, one sighter
/// each, and a stray row from a different range.
pub const MATCH_CSV: &str = "\
id,x mm,y mm,score
LS1,120.5,-80.0,4
L1,10,20,5
L2,-10,-20,X
L3,30,5,5
R1,-40,40,V
R2,12,-8,X
R3,0,0,X
Z1,1,1,5
";

/// Write `rows` below the standard header into a temporary CSV file.
pub fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp csv");
    writeln!(file, "{}", HEADER).expect("write header");
    for row in rows {
        writeln!(file, "{}", row).expect("write row");
    }
    file
}

/// Write raw CSV text into a temporary file.
pub fn raw_csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp csv");
    file.write_all(content.as_bytes()).expect("write csv");
    file
}

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
