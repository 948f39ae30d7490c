//! Injection permission port interface

/// Port for the accessibility / input-injection permission check
pub trait InjectionPermission: Send + Sync {
    /// Whether synthetic keystrokes may be sent to other applications
    fn has_injection_permission(&self) -> bool;
}

impl InjectionPermission for Box<dyn InjectionPermission> {
    fn has_injection_permission(&self) -> bool {
        self.as_ref().has_injection_permission()
    }
}
