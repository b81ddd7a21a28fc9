//! `[[Title]]` link extraction for note bodies.

/// Collect the trimmed titles of every `[[...]]` link, in order of appearance.
///
/// The shortest match wins, so `[[a]] and [[b]]` yields two links. An unclosed
/// `[[` ends the scan.
pub fn extract_wiki_links(text: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("[[") {
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("]]") else {
            break;
        };
        let inner = &after_open[..end];
        // Matches may not span lines.
        match inner.char_indices().rev().find(|(_, c)| is_line_break(*c)) {
            Some((pos, c)) => {
                rest = &after_open[pos + c.len_utf8()..];
                continue;
            }
            None => links.push(inner.trim().to_string()),
        }
        rest = &after_open[end + 2..];
    }

    links
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
