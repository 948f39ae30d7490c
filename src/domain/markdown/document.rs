//! Rich text document value object

use serde::{Deserialize, Serialize};

/// Styling applied to a run of text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunStyle {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
    /// Heading level 1-6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<u8>,
    /// Link target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl RunStyle {
    /// Plain, unstyled text
    pub fn plain() -> Self {
        Self::default()
    }

    /// True when no styling is applied
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_bold(&self) -> Self {
        Self {
            bold: true,
            ..self.clone()
        }
    }

    pub fn with_italic(&self) -> Self {
        Self {
            italic: true,
            ..self.clone()
        }
    }

    pub fn with_code(&self) -> Self {
        Self {
            code: true,
            ..self.clone()
        }
    }

    pub fn with_link(&self, url: impl Into<String>) -> Self {
        Self {
            link: Some(url.into()),
            ..self.clone()
        }
    }
}

/// A contiguous piece of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub style: RunStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Styled text: an ordered sequence of runs.
///
/// Adjacent runs never share a style and no run is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RichDocument {
    runs: Vec<TextRun>,
}

impl RichDocument {
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// True if at least one run carries styling
    pub fn has_styling(&self) -> bool {
        self.runs.iter().any(|run| !run.style.is_plain())
    }

    /// Concatenated text with all styling dropped
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Append text, merging into the previous run when styles match
    pub(crate) fn push(&mut self, text: &str, style: &RunStyle) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == *style => last.text.push_str(text),
            _ => self.runs.push(TextRun::new(text, style.clone())),
        }
    }
}

impl FromIterator<TextRun> for RichDocument {
    fn from_iter<I: IntoIterator<Item = TextRun>>(iter: I) -> Self {
        let mut document = Self::default();
        for run in iter {
            document.push(&run.text, &run.style);
        }
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_merges_equal_styles() {
        let mut doc = RichDocument::default();
        doc.push("a", &RunStyle::plain());
        doc.push("b", &RunStyle::plain());
        doc.push("c", &RunStyle::plain().with_bold());
        assert_eq!(doc.runs().len(), 2);
        assert_eq!(doc.runs()[0].text, "ab");
        assert_eq!(doc.plain_text(), "abc");
    }

    #[test]
    fn push_skips_empty_text() {
        let mut doc = RichDocument::default();
        doc.push("", &RunStyle::plain().with_bold());
        assert!(doc.is_empty());
        assert!(!doc.has_styling());
    }

    #[test]
    fn plain_style_serializes_compactly() {
        let run = TextRun::new("x", RunStyle::plain());
        let json = serde_json::to_string(&run).unwrap();
        assert_eq!(json, r#"{"text":"x","style":{}}"#);
    }
}
