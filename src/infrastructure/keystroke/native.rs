//! Paste chord via native Linux input tools (ydotool, wtype, xdotool)

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{Keystroke, KeystrokeError};

use super::factory::KeystrokeTool;

// evdev codes: 29 = left ctrl, 47 = v
const YDOTOOL_PASTE: &[&str] = &["key", "29:1", "47:1", "47:0", "29:0"];
const WTYPE_PASTE: &[&str] = &["-M", "ctrl", "v", "-m", "ctrl"];
const XDOTOOL_PASTE: &[&str] = &["key", "--clearmodifiers", "ctrl+v"];

/// Keystroke adapter shelling out to a native tool
pub struct NativeKeystroke {
    tool: KeystrokeTool,
}

impl NativeKeystroke {
    /// `tool` must be one of the command-line tools, not enigo
    pub fn new(tool: KeystrokeTool) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> KeystrokeTool {
        self.tool
    }

    /// Program and arguments that press Ctrl+V
    fn command_line(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self.tool {
            KeystrokeTool::Ydotool => Some(("ydotool", YDOTOOL_PASTE)),
            KeystrokeTool::Wtype => Some(("wtype", WTYPE_PASTE)),
            KeystrokeTool::Xdotool => Some(("xdotool", XDOTOOL_PASTE)),
            KeystrokeTool::Enigo => None,
        }
    }
}

#[async_trait]
impl Keystroke for NativeKeystroke {
    async fn send_paste(&self) -> Result<(), KeystrokeError> {
        let (program, args) = self.command_line().ok_or(KeystrokeError::NoToolAvailable)?;

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    KeystrokeError::ToolNotFound(program.to_string())
                } else {
                    KeystrokeError::InjectionFailed(e.to_string())
                }
            })?;

        if !status.success() {
            return Err(KeystrokeError::InjectionFailed(format!(
                "{} exited with status: {}",
                program, status
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdotool_sends_ctrl_v() {
        let (program, args) = NativeKeystroke::new(KeystrokeTool::Xdotool)
            .command_line()
            .unwrap();
        assert_eq!(program, "xdotool");
        assert_eq!(args, XDOTOOL_PASTE);
    }

    #[test]
    fn ydotool_releases_keys_in_reverse_order() {
        let (_, args) = NativeKeystroke::new(KeystrokeTool::Ydotool)
            .command_line()
            .unwrap();
        assert_eq!(args.last(), Some(&"29:0"));
    }

    #[tokio::test]
    async fn enigo_is_not_a_native_tool() {
        let keystroke = NativeKeystroke::new(KeystrokeTool::Enigo);
        assert!(matches!(
            keystroke.send_paste().await,
            Err(KeystrokeError::NoToolAvailable)
        ));
    }
}
