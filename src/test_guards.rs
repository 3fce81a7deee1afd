//! Environment guard for tests that point issuedesk at a temporary home.
//!
//! `ISSUEDESK_HOME` and `ISSUEDESK_API_URL` are process-global, so tests that
//! set them must be `#[serial]`. The guard restores the previous value when
//! dropped, panics included.

use std::env;
use std::ffi::{OsStr, OsString};

pub struct EnvGuard {
    key: &'static str,
    original: Option<OsString>,
}

impl EnvGuard {
    /// Snapshot `key` and set it to `value`.
    ///
    /// # Safety
    /// Calls `std::env::set_var`; callers must be `#[serial]`.
    pub unsafe fn set(key: &'static str, value: impl AsRef<OsStr>) -> Self {
        let original = env::var_os(key);
        unsafe { env::set_var(key, value) };
        Self { key, original }
    }

    /// Snapshot `key` and unset it.
    ///
    /// # Safety
    /// Calls `std::env::remove_var`; callers must be `#[serial]`.
    pub unsafe fn remove(key: &'static str) -> Self {
        let original = env::var_os(key);
        unsafe { env::remove_var(key) };
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: guarded tests run under #[serial].
        match &self.original {
            Some(value) => unsafe { env::set_var(self.key, value) },
            None => unsafe { env::remove_var(self.key) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_guard_restores_previous_value() {
        let _outer = unsafe { EnvGuard::set("ISSUEDESK_GUARD_TEST", "before") };
        {
            let _inner = unsafe { EnvGuard::set("ISSUEDESK_GUARD_TEST", "during") };
            assert_eq!(env::var("ISSUEDESK_GUARD_TEST").unwrap(), "during");
        }
        assert_eq!(env::var("ISSUEDESK_GUARD_TEST").unwrap(), "before");
    }

    #[test]
    #[serial]
    fn test_guard_restores_absence() {
        {
            let _guard = unsafe { EnvGuard::remove("ISSUEDESK_GUARD_TEST") };
            let _set = unsafe { EnvGuard::set("ISSUEDESK_GUARD_TEST", "temporary") };
        }
        assert!(env::var_os("ISSUEDESK_GUARD_TEST").is_none());
    }
}
