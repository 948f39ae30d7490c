//! Line protocol spoken over the daemon socket.
//!
//! A request is one line: a command word followed by its arguments. The
//! reply is one line too: `ok`, `ok: <detail>`, `error: <message>`, or a
//! JSON document for listings and status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::entry::ClipboardEntry;

/// Commands understood by the daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonRequest {
    Show,
    PasteRich,
    PastePlain,
    Pause,
    Resume,
    Status,
    Stop,
    /// Listing; with a query only matching entries
    List { query: Option<String> },
    Favorite { id: String },
    Delete { id: String },
    Clear,
    ClearAll,
    Copy { id: String, rich: bool },
    Paste { id: String, rich: bool },
}

/// Error for malformed request lines
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRequestError {
    #[error("unknown command")]
    UnknownCommand,
    #[error("missing argument for '{0}'")]
    MissingArgument(&'static str),
    #[error("format must be 'rich' or 'plain'")]
    InvalidFormat,
}

impl FromStr for DaemonRequest {
    type Err = ParseRequestError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let trimmed = line.trim();
        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        let id = |name: &'static str| -> Result<String, ParseRequestError> {
            rest.split_whitespace()
                .next()
                .map(str::to_string)
                .ok_or(ParseRequestError::MissingArgument(name))
        };
        let rich = || -> Result<bool, ParseRequestError> {
            match rest.split_whitespace().nth(1) {
                None | Some("rich") => Ok(true),
                Some("plain") => Ok(false),
                Some(_) => Err(ParseRequestError::InvalidFormat),
            }
        };

        match command {
            "show" => Ok(Self::Show),
            "paste-rich" => Ok(Self::PasteRich),
            "paste-plain" => Ok(Self::PastePlain),
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "status" => Ok(Self::Status),
            "stop" => Ok(Self::Stop),
            "list" => Ok(Self::List {
                query: list_query(line),
            }),
            "favorite" => Ok(Self::Favorite { id: id("favorite")? }),
            "delete" => Ok(Self::Delete { id: id("delete")? }),
            "clear" => Ok(Self::Clear),
            "clear-all" => Ok(Self::ClearAll),
            "copy" => Ok(Self::Copy {
                id: id("copy")?,
                rich: rich()?,
            }),
            "paste" => Ok(Self::Paste {
                id: id("paste")?,
                rich: rich()?,
            }),
            _ => Err(ParseRequestError::UnknownCommand),
        }
    }
}

/// Query text after `list` and its one separator, spaces kept
fn list_query(line: &str) -> Option<String> {
    let line = line.trim_start().trim_end_matches(['\n', '\r']);
    let mut rest = line.strip_prefix("list")?.chars();
    rest.next();
    let query = rest.as_str();
    (!query.trim().is_empty()).then(|| query.to_string())
}

impl fmt::Display for DaemonRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = |rich: &bool| if *rich { "rich" } else { "plain" };
        match self {
            Self::Show => f.write_str("show"),
            Self::PasteRich => f.write_str("paste-rich"),
            Self::PastePlain => f.write_str("paste-plain"),
            Self::Pause => f.write_str("pause"),
            Self::Resume => f.write_str("resume"),
            Self::Status => f.write_str("status"),
            Self::Stop => f.write_str("stop"),
            Self::List { query: None } => f.write_str("list"),
            // newlines would split the request
            Self::List { query: Some(q) } => write!(f, "list {}", q.replace(['\n', '\r'], " ")),
            Self::Favorite { id } => write!(f, "favorite {}", id),
            Self::Delete { id } => write!(f, "delete {}", id),
            Self::Clear => f.write_str("clear"),
            Self::ClearAll => f.write_str("clear-all"),
            Self::Copy { id, rich } => write!(f, "copy {} {}", id, format(rich)),
            Self::Paste { id, rich } => write!(f, "paste {} {}", id, format(rich)),
        }
    }
}

/// Listing row sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: String,
    pub short_id: String,
    pub preview: String,
    pub captured: String,
    pub is_favorite: bool,
    pub has_rich: bool,
}

impl From<&ClipboardEntry> for EntrySummary {
    fn from(entry: &ClipboardEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            short_id: entry.id().short(),
            preview: entry.preview().to_string(),
            captured: entry.formatted_timestamp(),
            is_favorite: entry.is_favorite(),
            has_rich: entry.has_rich(),
        }
    }
}

/// Reply to `status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonStatus {
    pub monitoring: bool,
    pub paused: bool,
    pub entries: usize,
    pub capacity: usize,
}

/// Parsed daemon reply line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok(Option<String>),
    Error(String),
    Data(String),
}

impl Reply {
    pub fn ok() -> Self {
        Self::Ok(None)
    }

    pub fn ok_with(detail: impl Into<String>) -> Self {
        Self::Ok(Some(detail.into()))
    }

    pub fn error(message: impl fmt::Display) -> Self {
        Self::Error(message.to_string())
    }

    /// Serialize `value` as a data reply
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => Self::Data(json),
            Err(e) => Self::error(e),
        }
    }

    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\n', '\r']);
        if line == "ok" {
            Self::Ok(None)
        } else if let Some(detail) = line.strip_prefix("ok:") {
            Self::Ok(Some(detail.trim().to_string()))
        } else if let Some(message) = line.strip_prefix("error:") {
            Self::Error(message.trim().to_string())
        } else {
            Self::Data(line.to_string())
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(None) => f.write_str("ok"),
            Self::Ok(Some(detail)) => write!(f, "ok: {}", detail),
            Self::Error(message) => write!(f, "error: {}", message),
            Self::Data(data) => f.write_str(data),
        }
    }
}
