//! Plain string helpers over a note's content markup.
//!
//! The formatting delegate owns the markup; these only insert images and undo
//! format inheritance after a line break.

const FORMAT_TAGS: [&str; 5] = ["strong", "b", "i", "u", "em"];

pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Insert `markup` at byte offset `caret` when it is a valid text position,
/// otherwise append it.
pub(crate) fn insert_at_caret(content: &str, caret: Option<usize>, markup: &str) -> String {
    let at = caret.filter(|&c| {
        c <= content.len() && content.is_char_boundary(c) && !inside_tag(content, c)
    });

    match at {
        Some(c) => {
            let mut out = String::with_capacity(content.len() + markup.len());
            out.push_str(&content[..c]);
            out.push_str(markup);
            out.push_str(&content[c..]);
            out
        }
        None => format!("{content}{markup}"),
    }
}

fn inside_tag(s: &str, at: usize) -> bool {
    let head = &s[..at];
    match (head.rfind('<'), head.rfind('>')) {
        (Some(lt), Some(gt)) => lt > gt,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Remove formatting the editor carried into a new line.
///
/// Only format elements lying entirely in the part of `next` that differs
/// from `previous` (after the common prefix, before the common suffix) are
/// touched: empty ones become `<br>`, the rest collapse to their trimmed text.
pub(crate) fn strip_inherited_formatting(previous: &str, next: &str) -> String {
    let mut start = common_prefix_len(previous, next);
    if inside_tag(next, start) {
        start = next[..start].rfind('<').unwrap_or(0);
    }

    let limit = previous.len().min(next.len()) - start;
    let mut end = next.len() - common_suffix_len(previous, next, limit);
    if inside_tag(next, end) {
        end = next[end..].find('>').map(|i| end + i + 1).unwrap_or(next.len());
    }

    let mut out = String::with_capacity(next.len());
    out.push_str(&next[..start]);
    out.push_str(&strip_format_elements(&next[start..end]));
    out.push_str(&next[end..]);
    out
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}

/// Byte length of the shared tail, at most `limit` bytes.
fn common_suffix_len(a: &str, b: &str, limit: usize) -> usize {
    let mut len = 0;
    for (ca, cb) in a.chars().rev().zip(b.chars().rev()) {
        if ca != cb || len + ca.len_utf8() > limit {
            break;
        }
        len += ca.len_utf8();
    }
    len
}

fn strip_format_elements(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(lt) = rest.find('<') {
        let (before, from_lt) = rest.split_at(lt);
        out.push_str(before);

        let Some((name, open_len)) = open_format_tag(from_lt) else {
            let end = from_lt.find('>').map(|i| i + 1).unwrap_or(from_lt.len());
            out.push_str(&from_lt[..end]);
            rest = &from_lt[end..];
            continue;
        };

        let body = &from_lt[open_len..];
        let Some((inner_len, close_len)) = matching_close(body, name) else {
            // Unclosed: leave the remainder untouched.
            out.push_str(from_lt);
            return out;
        };

        out.push_str(&flatten(&body[..inner_len]));
        rest = &body[inner_len + close_len..];
    }

    out.push_str(rest);
    out
}

fn tag_name(s: &str) -> &str {
    let end = s
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(s.len());
    &s[..end]
}

/// `s` starts at `<`. Returns the format tag name and the opening tag length.
fn open_format_tag(s: &str) -> Option<(&'static str, usize)> {
    let name = tag_name(s.get(1..)?);
    let matched = FORMAT_TAGS
        .iter()
        .find(|t| t.eq_ignore_ascii_case(name))?;
    let end = s.find('>')?;
    if s[..end].ends_with('/') {
        return None;
    }
    Some((matched, end + 1))
}

/// Find the close tag balancing an already-consumed `<name ...>`.
fn matching_close(s: &str, name: &str) -> Option<(usize, usize)> {
    let mut depth = 1usize;
    let mut offset = 0usize;

    while let Some(rel) = s[offset..].find('<') {
        let at = offset + rel;
        let tag = &s[at..];
        let end = tag.find('>')?;

        if let Some(closing) = tag.strip_prefix("</") {
            if tag_name(closing).eq_ignore_ascii_case(name) {
                depth -= 1;
                if depth == 0 {
                    return Some((at, end + 1));
                }
            }
        } else if tag_name(&tag[1..]).eq_ignore_ascii_case(name) {
            depth += 1;
        }

        offset = at + end + 1;
    }

    None
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn flatten(inner: &str) -> String {
    let text = strip_tags(inner);
    let trimmed = text.trim();
    if trimmed.replace("&nbsp;", " ").trim().is_empty() {
        "<br>".to_string()
    } else {
        trimmed.to_string()
    }
}
