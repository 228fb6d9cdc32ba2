//! Shared helpers for unit tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A fresh, unique directory under the system temp dir.
///
/// Uniqueness comes from the process id plus a per-process counter, so tests
/// running in parallel (or repeated runs of the same test binary) never share
/// cache records or plot outputs.
pub fn temp_dir(label: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "massfit-test-{label}-{}-{n}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("failed to create test temp dir");
    dir
}
