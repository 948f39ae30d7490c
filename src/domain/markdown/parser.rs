//! Line-oriented markdown tokenizer
//!
//! Headings are recognised per line; inline constructs are matched
//! left-to-right on a single line. An opening marker only becomes styling
//! when its closing partner is found on the same line, so unmatched
//! markers always fall through as literal characters.

use super::document::{RichDocument, RunStyle};

const MAX_HEADING_LEVEL: usize = 6;

/// Whether `text` contains at least one convertible markdown construct
pub fn contains_markdown(text: &str) -> bool {
    convert(text).has_styling()
}

/// Convert `text` only when it contains markdown
pub fn convert_if_markdown(text: &str) -> Option<RichDocument> {
    let document = convert(text);
    document.has_styling().then_some(document)
}

/// Convert plain text into a rich document.
///
/// Never fails: text without markdown yields a single plain run.
pub fn convert(text: &str) -> RichDocument {
    let mut document = RichDocument::default();

    for line in text.split_inclusive('\n') {
        let (body, line_ending) = split_line_ending(line);
        let (content, heading) = split_heading(body);
        let base = RunStyle {
            heading,
            ..RunStyle::plain()
        };

        let chars: Vec<char> = content.chars().collect();
        parse_inline(&chars, &base, &mut document);
        document.push(line_ending, &RunStyle::plain());
    }

    document
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// `## Title` -> ("Title", Some(2)); anything else is returned untouched
fn split_heading(line: &str) -> (&str, Option<u8>) {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > MAX_HEADING_LEVEL {
        return (line, None);
    }

    match line[level..].strip_prefix(' ') {
        Some(rest) if !rest.trim().is_empty() => (rest.trim_start(), Some(level as u8)),
        _ => (line, None),
    }
}

fn parse_inline(chars: &[char], style: &RunStyle, out: &mut RichDocument) {
    let mut closers = Closers::default();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '`' => {
                if let Some(end) = find_code_end(chars, i + 1, &mut closers) {
                    flush(&mut literal, style, out);
                    let code: String = chars[i + 1..end].iter().collect();
                    out.push(&code, &style.with_code());
                    i = end + 1;
                    continue;
                }
            }
            '[' => {
                if let Some((label_end, url_end)) = find_link(chars, i, &mut closers) {
                    flush(&mut literal, style, out);
                    let url: String = chars[label_end + 2..url_end].iter().collect();
                    parse_inline(&chars[i + 1..label_end], &style.with_link(url), out);
                    i = url_end + 1;
                    continue;
                }
            }
            '*' if is_double_star(chars, i) => {
                if let Some(end) = find_strong_end(chars, i + 2, &mut closers) {
                    flush(&mut literal, style, out);
                    parse_inline(&chars[i + 2..end], &style.with_bold(), out);
                    i = end + 2;
                } else {
                    literal.push_str("**");
                    i += 2;
                }
                continue;
            }
            '*' => {
                if let Some(end) = find_emphasis_end(chars, i + 1, &mut closers) {
                    flush(&mut literal, style, out);
                    parse_inline(&chars[i + 1..end], &style.with_italic(), out);
                    i = end + 1;
                    continue;
                }
            }
            _ => {}
        }

        literal.push(chars[i]);
        i += 1;
    }

    flush(&mut literal, style, out);
}

/// Last answer of a forward search for the first index `>= from` where a
/// fixed predicate holds. That answer stays valid for every later `from`
/// up to the match, so openers that never close do not rescan the line.
#[derive(Default)]
struct NextMatch(Option<(usize, Option<usize>)>);

impl NextMatch {
    fn find(&mut self, chars: &[char], from: usize, is_match: impl Fn(usize) -> bool) -> Option<usize> {
        let cached = self.0;
        match cached {
            Some((searched, found)) if from >= searched && found.map_or(true, |k| from <= k) => {
                found
            }
            _ => {
                let found = (from..chars.len()).find(|&j| is_match(j));
                self.0 = Some((from, found));
                found
            }
        }
    }
}

/// Closing-marker searches for one line (or one nested span)
#[derive(Default)]
struct Closers {
    backtick: NextMatch,
    bracket: NextMatch,
    paren: NextMatch,
    strong: NextMatch,
    emphasis: NextMatch,
}

fn flush(literal: &mut String, style: &RunStyle, out: &mut RichDocument) {
    out.push(literal, style);
    literal.clear();
}

fn is_double_star(chars: &[char], i: usize) -> bool {
    chars.get(i) == Some(&'*') && chars.get(i + 1) == Some(&'*')
}

fn opens_span(chars: &[char], start: usize) -> bool {
    matches!(chars.get(start), Some(c) if !c.is_whitespace())
}

/// Closing backtick for a non-empty code span
fn find_code_end(chars: &[char], start: usize, closers: &mut Closers) -> Option<usize> {
    let end = closers.backtick.find(chars, start, |j| chars[j] == '`')?;
    (end > start).then_some(end)
}

/// `[label](url)`: returns the indices of `]` and `)`
fn find_link(chars: &[char], open: usize, closers: &mut Closers) -> Option<(usize, usize)> {
    let label_end = closers.bracket.find(chars, open, |j| chars[j] == ']')?;
    if label_end == open + 1 || chars.get(label_end + 1) != Some(&'(') {
        return None;
    }

    let url_start = label_end + 2;
    let url_end = closers.paren.find(chars, url_start, |j| chars[j] == ')')?;
    let url = &chars[url_start..url_end];
    if url.is_empty() || url.iter().any(|c| c.is_whitespace()) {
        return None;
    }

    Some((label_end, url_end))
}

/// Closing `**` of a strong span whose content starts at `start`
fn find_strong_end(chars: &[char], start: usize, closers: &mut Closers) -> Option<usize> {
    if !opens_span(chars, start) {
        return None;
    }
    closers.strong.find(chars, start + 1, |j| {
        is_double_star(chars, j) && !chars[j - 1].is_whitespace()
    })
}

/// Closing `*` of an emphasis span whose content starts at `start`.
///
/// Star runs are read in pairs from their first star, so `**` stays inside
/// the span as bold and only the odd star ending a run can close it.
fn find_emphasis_end(chars: &[char], start: usize, closers: &mut Closers) -> Option<usize> {
    if !opens_span(chars, start) || chars[start] == '*' {
        return None;
    }
    closers.emphasis.find(chars, start + 1, |j| {
        if chars[j] != '*' || chars.get(j + 1) == Some(&'*') || chars[j - 1].is_whitespace() {
            return false;
        }
        let run = chars[..=j].iter().rev().take_while(|&&c| c == '*').count();
        run % 2 == 1
    })
}
