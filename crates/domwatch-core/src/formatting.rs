//! Telegram HTML helpers.

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Split a message into chunks of at most `limit` bytes, breaking at line boundaries.
///
/// Our messages only carry inline tags that open and close on the same line, so a
/// line break is always a safe split point. A single line longer than `limit` is cut
/// at a char boundary.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut out = Vec::new();
    let mut chunk = String::new();
    for line in text.split('\n') {
        let needed = if chunk.is_empty() {
            line.len()
        } else {
            chunk.len() + 1 + line.len()
        };
        if needed <= limit {
            if !chunk.is_empty() {
                chunk.push('\n');
            }
            chunk.push_str(line);
            continue;
        }

        if !chunk.is_empty() {
            out.push(std::mem::take(&mut chunk));
        }

        let mut rest = line;
        while rest.len() > limit {
            let (head, tail) = split_utf8_prefix(rest, limit);
            out.push(head.to_string());
            rest = tail;
        }
        chunk.push_str(rest);
    }

    if !chunk.trim().is_empty() {
        out.push(chunk);
    }
    out
}

fn split_utf8_prefix(s: &str, max_bytes: usize) -> (&str, &str) {
    let mut idx = max_bytes.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    if idx == 0 {
        // Limit smaller than the first char: take the whole char.
        let next = s.char_indices().nth(1).map(|(i, _)| i).unwrap_or(s.len());
        return (&s[..next], &s[next..]);
    }
    (&s[..idx], &s[idx..])
}
