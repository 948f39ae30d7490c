//! HTML rendering of rich documents (the rich clipboard flavour)

use std::fmt::Write;

use super::document::{RichDocument, TextRun};

impl RichDocument {
    /// Render as an HTML fragment
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let mut open_heading: Option<u8> = None;
        let mut after_heading = false;

        for run in self.runs() {
            if run.style.heading != open_heading {
                if let Some(level) = open_heading {
                    let _ = write!(html, "</h{}>", level);
                    after_heading = true;
                }
                if let Some(level) = run.style.heading {
                    let _ = write!(html, "<h{}>", level);
                }
                open_heading = run.style.heading;
            }

            let text = if after_heading {
                after_heading = false;
                run.text
                    .strip_prefix("\r\n")
                    .or_else(|| run.text.strip_prefix('\n'))
                    .unwrap_or(run.text.as_str())
            } else {
                run.text.as_str()
            };
            render_run(run, text, &mut html);
        }

        if let Some(level) = open_heading {
            let _ = write!(html, "</h{}>", level);
        }
        html
    }
}

fn render_run(run: &TextRun, text: &str, html: &mut String) {
    if text.is_empty() {
        return;
    }

    let style = &run.style;
    if let Some(url) = &style.link {
        let _ = write!(html, "<a href=\"{}\">", escape(url));
    }
    if style.bold {
        html.push_str("<strong>");
    }
    if style.italic {
        html.push_str("<em>");
    }
    if style.code {
        html.push_str("<code>");
    }

    html.push_str(&escape(text).replace("\r\n", "\n").replace('\n', "<br>\n"));

    if style.code {
        html.push_str("</code>");
    }
    if style.italic {
        html.push_str("</em>");
    }
    if style.bold {
        html.push_str("</strong>");
    }
    if style.link.is_some() {
        html.push_str("</a>");
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use crate::domain::markdown::convert;

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            convert("**b** and *i*").to_html(),
            "<strong>b</strong> and <em>i</em>"
        );
    }

    #[test]
    fn heading_swallows_its_line_break() {
        assert_eq!(convert("# Title\ntext").to_html(), "<h1>Title</h1>text");
    }

    #[test]
    fn line_breaks_become_br() {
        assert_eq!(convert("a\nb").to_html(), "a<br>\nb");
    }

    #[test]
    fn link_and_code() {
        assert_eq!(
            convert("[x](https://a.b/?q=1&r=2) `y`").to_html(),
            "<a href=\"https://a.b/?q=1&amp;r=2\">x</a> <code>y</code>"
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(
            convert("**<script>**").to_html(),
            "<strong>&lt;script&gt;</strong>"
        );
    }

    #[test]
    fn consecutive_headings_are_separate_blocks() {
        assert_eq!(
            convert("# A\n## B").to_html(),
            "<h1>A</h1><h2>B</h2>"
        );
    }
}
