//! Keystroke tool selection with automatic detection

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::application::ports::{Keystroke, KeystrokeError};

use super::enigo::EnigoKeystroke;
#[cfg(target_os = "linux")]
use super::native::NativeKeystroke;

/// Tools able to send the paste chord
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeystrokeTool {
    /// Cross-platform enigo library
    Enigo,
    /// Linux: ydotool (requires ydotoold daemon)
    Ydotool,
    /// Linux: wtype (Wayland native)
    Wtype,
    /// Linux: xdotool (X11)
    Xdotool,
}

impl fmt::Display for KeystrokeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enigo => "enigo",
            Self::Ydotool => "ydotool",
            Self::Wtype => "wtype",
            Self::Xdotool => "xdotool",
        };
        f.write_str(name)
    }
}

/// Configured keystroke tool (`linux.keystroke_tool`).
///
/// Outside Linux every preference resolves to enigo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeystrokeToolPreference {
    #[default]
    Enigo,
    /// Best available native tool, enigo as last resort
    Auto,
    Ydotool,
    Xdotool,
    Wtype,
}

impl KeystrokeToolPreference {
    pub const VALID_OPTIONS: &'static str = "enigo, auto, ydotool, xdotool, wtype";
}

impl fmt::Display for KeystrokeToolPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enigo => "enigo",
            Self::Auto => "auto",
            Self::Ydotool => "ydotool",
            Self::Xdotool => "xdotool",
            Self::Wtype => "wtype",
        };
        f.write_str(name)
    }
}

/// Error type for parsing keystroke tool preference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeystrokeToolError {
    pub value: String,
}

impl fmt::Display for ParseKeystrokeToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid keystroke tool '{}'. Valid options: {}",
            self.value,
            KeystrokeToolPreference::VALID_OPTIONS
        )
    }
}

impl std::error::Error for ParseKeystrokeToolError {}

impl FromStr for KeystrokeToolPreference {
    type Err = ParseKeystrokeToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enigo" => Ok(Self::Enigo),
            "auto" => Ok(Self::Auto),
            "ydotool" => Ok(Self::Ydotool),
            "xdotool" => Ok(Self::Xdotool),
            "wtype" => Ok(Self::Wtype),
            _ => Err(ParseKeystrokeToolError {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(target_os = "linux")]
mod detect {
    use std::env;
    use std::path::Path;
    use std::process::Stdio;

    use tokio::process::Command;

    /// Whether `tool` is on PATH
    pub async fn is_tool_available(tool: &str) -> bool {
        Command::new("which")
            .arg(tool)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// ydotool needs both its binary and a running ydotoold socket
    pub async fn is_ydotool_available() -> bool {
        if !is_tool_available("ydotool").await {
            return false;
        }
        let runtime_socket = env::var("XDG_RUNTIME_DIR")
            .ok()
            .map(|dir| Path::new(&dir).join(".ydotool_socket"));
        runtime_socket
            .into_iter()
            .chain(std::iter::once(Path::new("/tmp/.ydotool_socket").to_path_buf()))
            .any(|path| path.exists())
    }

    /// Wayland sessions prefer wtype over xdotool
    pub fn is_wayland_session() -> bool {
        env::var_os("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty())
    }
}

/// Detect the best available tool.
///
/// Linux priority: ydotool, then wtype on Wayland / xdotool on X11, then
/// enigo. Other platforms always use enigo.
pub async fn detect_keystroke_tool() -> KeystrokeTool {
    #[cfg(target_os = "linux")]
    {
        if detect::is_ydotool_available().await {
            return KeystrokeTool::Ydotool;
        }
        let preferred = if detect::is_wayland_session() {
            [KeystrokeTool::Wtype, KeystrokeTool::Xdotool]
        } else {
            [KeystrokeTool::Xdotool, KeystrokeTool::Wtype]
        };
        for tool in preferred {
            if detect::is_tool_available(&tool.to_string()).await {
                return tool;
            }
        }
    }
    KeystrokeTool::Enigo
}

/// Create a keystroke adapter for the given preference.
///
/// Returns the adapter and the tool it uses; an explicitly requested
/// native tool that is not installed is an error.
pub async fn create_keystroke(
    preference: KeystrokeToolPreference,
) -> Result<(Box<dyn Keystroke>, KeystrokeTool), KeystrokeError> {
    let tool = resolve_tool(preference).await?;
    debug!(%preference, %tool, "keystroke tool selected");
    Ok((build(tool), tool))
}

#[cfg(target_os = "linux")]
async fn resolve_tool(preference: KeystrokeToolPreference) -> Result<KeystrokeTool, KeystrokeError> {
    let requested = match preference {
        KeystrokeToolPreference::Enigo => return Ok(KeystrokeTool::Enigo),
        KeystrokeToolPreference::Auto => return Ok(detect_keystroke_tool().await),
        KeystrokeToolPreference::Ydotool => KeystrokeTool::Ydotool,
        KeystrokeToolPreference::Xdotool => KeystrokeTool::Xdotool,
        KeystrokeToolPreference::Wtype => KeystrokeTool::Wtype,
    };

    let available = match requested {
        KeystrokeTool::Ydotool => detect::is_ydotool_available().await,
        other => detect::is_tool_available(&other.to_string()).await,
    };
    if available {
        Ok(requested)
    } else {
        Err(KeystrokeError::ToolNotFound(requested.to_string()))
    }
}

#[cfg(not(target_os = "linux"))]
async fn resolve_tool(_preference: KeystrokeToolPreference) -> Result<KeystrokeTool, KeystrokeError> {
    Ok(KeystrokeTool::Enigo)
}

fn build(tool: KeystrokeTool) -> Box<dyn Keystroke> {
    match tool {
        KeystrokeTool::Enigo => Box::new(EnigoKeystroke::new()),
        #[cfg(target_os = "linux")]
        native => Box::new(NativeKeystroke::new(native)),
        #[cfg(not(target_os = "linux"))]
        _ => Box::new(EnigoKeystroke::new()),
    }
}
