//! Input-injection permission adapters

use crate::application::ports::InjectionPermission;

/// Permission derived from the desktop session.
///
/// - macOS: the Accessibility grant (`AXIsProcessTrusted`)
/// - Linux: a graphical session must be reachable (X11 or Wayland)
/// - Windows: always permitted
#[derive(Debug, Default)]
pub struct SessionPermission;

impl SessionPermission {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "macos")]
#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
}

impl InjectionPermission for SessionPermission {
    #[cfg(target_os = "macos")]
    fn has_injection_permission(&self) -> bool {
        // SAFETY: takes no arguments and only reads process state
        unsafe { AXIsProcessTrusted() }
    }

    #[cfg(target_os = "linux")]
    fn has_injection_permission(&self) -> bool {
        has_graphical_session(
            std::env::var("DISPLAY").ok().as_deref(),
            std::env::var("WAYLAND_DISPLAY").ok().as_deref(),
        )
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    fn has_injection_permission(&self) -> bool {
        true
    }
}

#[cfg(any(target_os = "linux", test))]
fn has_graphical_session(display: Option<&str>, wayland_display: Option<&str>) -> bool {
    [display, wayland_display]
        .into_iter()
        .flatten()
        .any(|value| !value.trim().is_empty())
}

/// Fixed answer, for `paste = false` setups and headless use
#[derive(Debug, Clone, Copy)]
pub struct StaticPermission(pub bool);

impl InjectionPermission for StaticPermission {
    fn has_injection_permission(&self) -> bool {
        self.0
    }
}
