//! Keystroke port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Keystroke errors
#[derive(Debug, Clone, Error)]
pub enum KeystrokeError {
    #[error("{0} not found. Please install it or choose another keystroke tool.")]
    ToolNotFound(String),

    #[error("No keystroke tool available")]
    NoToolAvailable,

    #[error("Failed to send paste keystroke: {0}")]
    InjectionFailed(String),
}

/// Port for keystroke injection
#[async_trait]
pub trait Keystroke: Send + Sync {
    /// Send the platform paste chord (Ctrl+V, Cmd+V on macOS) to the
    /// currently focused window.
    async fn send_paste(&self) -> Result<(), KeystrokeError>;
}

/// Blanket implementation for boxed keystroke types
#[async_trait]
impl Keystroke for Box<dyn Keystroke> {
    async fn send_paste(&self) -> Result<(), KeystrokeError> {
        self.as_ref().send_paste().await
    }
}

/// Blanket implementation for shared keystroke handles
#[async_trait]
impl<T: Keystroke + ?Sized> Keystroke for Arc<T> {
    async fn send_paste(&self) -> Result<(), KeystrokeError> {
        self.as_ref().send_paste().await
    }
}
