//! Character classification used by the lexer.

pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';
pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';
pub const BACKSLASH: char = '\\';
pub const ZWNJ: char = '\u{200C}';
pub const ZWJ: char = '\u{200D}';

/// Check if a character is a line terminator.
#[inline]
pub fn is_new_line(ch: char) -> bool {
    matches!(
        ch,
        LINE_FEED | CARRIAGE_RETURN | LINE_SEPARATOR | PARAGRAPH_SEPARATOR
    )
}

/// Whitespace that is not a line terminator.
#[inline]
pub fn is_whitespace(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}' // vertical tab
            | '\u{000C}' // form feed
            | '\u{00A0}' // no-break space
            | '\u{1680}' // ogham space mark
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}' // narrow no-break space
            | '\u{205F}' // medium mathematical space
            | '\u{3000}' // ideographic space
            | '\u{FEFF}' // BOM
    )
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        return ch == '$' || ch == '_' || ch.is_ascii_alphabetic();
    }
    unicode_xid::UnicodeXID::is_xid_start(ch)
}

#[inline]
pub fn is_identifier_char(ch: char) -> bool {
    if ch.is_ascii() {
        return ch == '$' || ch == '_' || ch.is_ascii_alphanumeric();
    }
    ch == ZWNJ || ch == ZWJ || unicode_xid::UnicodeXID::is_xid_continue(ch)
}

/// Check that `name` is a syntactically valid identifier name.
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_char),
        _ => false,
    }
}

/// Value of `ch` as a digit in `radix`, if any.
#[inline]
pub fn digit_value(ch: char) -> Option<u32> {
    match ch {
        '0'..='9' => Some(ch as u32 - '0' as u32),
        'a'..='z' => Some(ch as u32 - 'a' as u32 + 10),
        'A'..='Z' => Some(ch as u32 - 'A' as u32 + 10),
        _ => None,
    }
}

/// Skips whitespace, line terminators and comments starting at `pos`.
pub fn skip_trivia(input: &[char], mut pos: usize) -> usize {
    while let Some(&ch) = input.get(pos) {
        if is_whitespace(ch) || is_new_line(ch) {
            pos += 1;
        } else if ch == '/' && input.get(pos + 1) == Some(&'/') {
            pos += 2;
            while pos < input.len() && !is_new_line(input[pos]) {
                pos += 1;
            }
        } else if ch == '/' && input.get(pos + 1) == Some(&'*') {
            match find_comment_end(input, pos + 2) {
                Some(end) => pos = end + 2,
                None => return input.len(),
            }
        } else {
            break;
        }
    }
    pos
}

/// Like [`skip_trivia`] but never crosses a line terminator, including one
/// inside a block comment.
pub fn skip_trivia_in_line(input: &[char], mut pos: usize) -> usize {
    while let Some(&ch) = input.get(pos) {
        if is_whitespace(ch) {
            pos += 1;
        } else if ch == '/' && input.get(pos + 1) == Some(&'/') {
            pos += 2;
            while pos < input.len() && !is_new_line(input[pos]) {
                pos += 1;
            }
        } else if ch == '/' && input.get(pos + 1) == Some(&'*') {
            match find_comment_end(input, pos + 2) {
                Some(end) if !input[pos + 2..end].iter().copied().any(is_new_line) => {
                    pos = end + 2
                }
                _ => break,
            }
        } else {
            break;
        }
    }
    pos
}

/// Index of the `*/` that closes a block comment whose body starts at `from`.
pub fn find_comment_end(input: &[char], from: usize) -> Option<usize> {
    let mut i = from;
    while i + 1 < input.len() {
        if input[i] == '*' && input[i + 1] == '/' {
            return Some(i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_identifier_classes() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_char('1'));
        assert!(is_identifier_char(ZWJ));
        assert!(is_identifier_name("_private1"));
        assert!(!is_identifier_name("1abc"));
        assert!(!is_identifier_name(""));
    }

    #[test]
    fn test_skip_trivia_crosses_comments() {
        let src = chars("  /* a\n b */ // c\n  x");
        assert_eq!(src[skip_trivia(&src, 0)], 'x');
    }

    #[test]
    fn test_skip_trivia_in_line_stops_at_newline() {
        let src = chars(" /* a */ \n x");
        assert_eq!(src[skip_trivia_in_line(&src, 0)], '\n');
        let src = chars(" /* a\n */ x");
        assert_eq!(skip_trivia_in_line(&src, 0), 1);
    }
}
