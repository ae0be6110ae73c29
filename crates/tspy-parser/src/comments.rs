//! Comment recognition shared by the preprocessor and the parser.
//!
//! Both stages must agree on what a comment is: `//` line comments and
//! (possibly multi-line) `/* ... */` block comments. An unterminated
//! block comment extends to the end of input.

/// If a comment starts at byte `pos`, return its length in bytes.
#[must_use]
pub fn comment_len(text: &str, pos: usize) -> Option<usize> {
    let rest = &text[pos..];
    if let Some(body) = rest.strip_prefix("//") {
        let end = body.find('\n').map_or(rest.len(), |i| 2 + i);
        return Some(end);
    }
    if let Some(body) = rest.strip_prefix("/*") {
        let end = body.find("*/").map_or(rest.len(), |i| 2 + i + 2);
        return Some(end);
    }
    None
}

/// Byte ranges of every comment in `text`, in order.
///
/// String literals are not special-cased here; the grammar only skips
/// comments where whitespace is legal, and the preprocessor uses these
/// ranges solely to mask include references.
#[must_use]
pub fn comment_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] == b'/' {
            if let Some(len) = comment_len(text, pos) {
                spans.push((pos, pos + len));
                pos += len;
                continue;
            }
        }
        pos += 1;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_line_comments() {
        assert_eq!(comment_len("// hi\nx", 0), Some(5));
        assert_eq!(comment_len("// to eof", 0), Some(9));
        assert_eq!(comment_len("/ not a comment", 0), None);
    }

    #[test]
    fn recognizes_block_comments() {
        assert_eq!(comment_len("/* a */x", 0), Some(7));
        assert_eq!(comment_len("/* multi\nline */x", 0), Some(16));
        // unterminated runs to end of input
        assert_eq!(comment_len("/* open", 0), Some(7));
    }

    #[test]
    fn collects_all_comment_spans() {
        let text = "a // one\nb /* two */ c";
        assert_eq!(comment_spans(text), vec![(2, 8), (11, 20)]);
    }
}
