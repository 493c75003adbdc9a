//! Helpers for mutating environment variables in tests.
//!
//! Mutations are serialised by a global re-entrant mutex and return an RAII
//! guard restoring the previous value on drop. Tests that read a variable
//! across several steps should hold an [`EnvScope`] so no other test changes
//! it in between.
//!
//! # Examples
//!
//! ```
//! use hakcli_test_helpers::env;
//!
//! let _scope = env::scope_with(|lock| vec![lock.set_var("XDG_CONFIG_HOME", "/tmp/cfg")]);
//! assert_eq!(std::env::var("XDG_CONFIG_HOME").ok().as_deref(), Some("/tmp/cfg"));
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: `ENV_MUTEX` is held.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// Holds the environment lock; mutations made through it do not re-lock.
#[must_use = "dropping releases the environment lock"]
pub struct EnvVarLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvVarLock {
    /// Sets `key` to `value` while the lock is held.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        let key = key.into();
        let original = env::var_os(&key);
        // SAFETY: `self` holds `ENV_MUTEX`.
        unsafe { env::set_var(&key, value) };
        EnvVarGuard { key, original }
    }

    /// Removes `key` while the lock is held.
    pub fn remove_var<K>(&self, key: K) -> EnvVarGuard
    where
        K: Into<String>,
    {
        let key = key.into();
        let original = env::var_os(&key);
        // SAFETY: `self` holds `ENV_MUTEX`.
        unsafe { env::remove_var(&key) };
        EnvVarGuard { key, original }
    }
}

/// Keeps the environment lock and a set of guards alive together. Guards are
/// restored before the lock is released.
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: EnvVarLock,
}

/// Acquires the global environment lock.
pub fn lock() -> EnvVarLock {
    EnvVarLock {
        _guard: ENV_MUTEX.lock(),
    }
}

/// Sets `key` to `value`, returning a guard that restores the prior value.
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    lock().set_var(key, value)
}

/// Removes `key`, returning a guard that restores the prior value.
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    lock().remove_var(key)
}

/// Runs `builder` under the lock and keeps both the lock and the guards it
/// returns for the lifetime of the scope.
pub fn scope_with<F>(builder: F) -> EnvScope
where
    F: FnOnce(&EnvVarLock) -> Vec<EnvVarGuard>,
{
    let lock = lock();
    let guards = builder(&lock);
    EnvScope {
        guards,
        _lock: lock,
    }
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "HAKCLI_TEST_HELPERS_ENV";

    #[test]
    fn guards_restore_prior_state() {
        let _lock = lock();
        let outer = set_var(KEY, "outer");
        {
            let _inner = set_var(KEY, "inner");
            assert_eq!(env::var(KEY).ok().as_deref(), Some("inner"));
        }
        assert_eq!(env::var(KEY).ok().as_deref(), Some("outer"));
        drop(outer);
        assert!(env::var_os(KEY).is_none());
    }

    #[test]
    fn scopes_restore_on_drop() {
        let scope = scope_with(|lock| vec![lock.set_var(KEY, "scoped")]);
        assert_eq!(env::var(KEY).ok().as_deref(), Some("scoped"));
        drop(scope);
        let _lock = lock();
        assert!(env::var_os(KEY).is_none());
    }
}
