//! Elevated-privilege capability query
//!
//! Probing faster than every 0.2 s is reserved for privileged users, the
//! same limit `ping` itself enforces.

/// Answers whether the current process runs with elevated privileges
pub trait PrivilegeCheck {
    fn is_elevated(&self) -> bool;
}

/// Queries the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPrivileges;

impl PrivilegeCheck for SystemPrivileges {
    fn is_elevated(&self) -> bool {
        has_elevated_privileges()
    }
}

/// Fixed answer, for callers that already know
#[derive(Debug, Clone, Copy)]
pub struct StaticPrivileges(pub bool);

impl PrivilegeCheck for StaticPrivileges {
    fn is_elevated(&self) -> bool {
        self.0
    }
}

/// Root (effective UID 0) on Unix-like systems
#[cfg(unix)]
fn has_elevated_privileges() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

/// Elevated Administrator token on Windows
#[cfg(target_os = "windows")]
fn has_elevated_privileges() -> bool {
    check_elevation::is_elevated().unwrap_or(false)
}

#[cfg(not(any(unix, target_os = "windows")))]
fn has_elevated_privileges() -> bool {
    false
}
