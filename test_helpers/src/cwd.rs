//! Helpers for changing the process working directory in tests.
//!
//! The working directory is process-global, so the returned guard holds a
//! global mutex until it restores the original directory.
//!
//! # Examples
//!
//! ```no_run
//! use hakcli_test_helpers::cwd;
//!
//! # fn main() -> anyhow::Result<()> {
//! let _guard = cwd::set_dir("/tmp")?;
//! // The working directory is `/tmp` until `_guard` is dropped.
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use parking_lot::{Mutex, MutexGuard};
use std::path::Path;
use std::sync::LazyLock;

static CWD_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

/// RAII guard that restores the working directory on drop.
#[must_use = "dropping restores the prior working directory"]
pub struct CwdGuard {
    original: Utf8PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    /// Directory that will be restored.
    #[must_use]
    pub fn original(&self) -> &camino::Utf8Path {
        &self.original
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        // Best effort; there is no caller left to report a failure to.
        let _unused = std::env::set_current_dir(&self.original);
    }
}

/// Changes the working directory to `path` until the guard is dropped.
///
/// The original directory is captured and checked for UTF-8 before anything
/// changes.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read, is not valid
/// UTF-8, or `path` cannot be entered.
pub fn set_dir(path: impl AsRef<Path>) -> Result<CwdGuard> {
    let lock = CWD_MUTEX.lock();
    let original = std::env::current_dir().context("read current dir")?;
    let original = Utf8PathBuf::from_path_buf(original)
        .map_err(|path| anyhow!("cwd is not valid UTF-8: {}", path.display()))?;
    std::env::set_current_dir(path.as_ref()).context("set current dir")?;
    Ok(CwdGuard {
        original,
        _lock: lock,
    })
}
