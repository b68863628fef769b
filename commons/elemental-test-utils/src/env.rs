//! Process environment overrides for tests that exercise `from_env` paths.
//!
//! The environment is process-global, so every [`Env`] holds a lock for its
//! whole lifetime; tests touching the environment run one at a time and see
//! their previous values restored on drop.

use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Restores (or unsets) one variable when dropped.
pub struct EnvGuard {
    key: String,
    prev: Option<String>,
}

impl EnvGuard {
    fn capture(key: &str) -> Self {
        Self {
            key: key.to_string(),
            prev: std::env::var(key).ok(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            match self.prev {
                Some(ref v) => std::env::set_var(&self.key, v),
                None => std::env::remove_var(&self.key),
            }
        }
    }
}

/// Exclusive, self-restoring set of environment overrides.
pub struct Env {
    guards: Vec<EnvGuard>,
    _lock: MutexGuard<'static, ()>,
}

impl Env {
    pub fn new() -> Self {
        // A test that panicked while holding the lock has already restored
        // its variables through the guards' drops.
        let lock = ENV_LOCK.lock().unwrap_or_else(|p| p.into_inner());
        Self {
            guards: Vec::new(),
            _lock: lock,
        }
    }

    pub fn set(mut self, key: &str, val: &str) -> Self {
        self.guards.push(EnvGuard::capture(key));
        unsafe { std::env::set_var(key, val) }
        self
    }

    pub fn unset(mut self, key: &str) -> Self {
        self.guards.push(EnvGuard::capture(key));
        unsafe { std::env::remove_var(key) }
        self
    }

    pub fn extend<'a, I>(self, kvs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        kvs.into_iter().fold(self, |env, (k, v)| env.set(k, v))
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Env {
    fn drop(&mut self) {
        // Restore in reverse so a key set twice ends at its original value.
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}
