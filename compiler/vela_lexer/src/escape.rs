//! Escape-sequence decoding for string and character bodies.

/// Decode the backslash escapes in an escaped-string body.
///
/// Recognises `\n \r \t \\ \" \' \0`, `\xNN`, and `\u{…}`. Malformed
/// escapes are passed through undecoded; the parser only needs decoding
/// for module paths, and the tree keeps the raw spelling either way.
pub fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hi = chars.next();
                let lo = chars.next();
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        let mut hex = String::new();
                        hex.push(hi);
                        hex.push(lo);
                        match u8::from_str_radix(&hex, 16) {
                            Ok(byte) => out.push(byte as char),
                            Err(_) => {
                                out.push_str("\\x");
                                out.push_str(&hex);
                            }
                        }
                    }
                    _ => out.push_str("\\x"),
                }
            }
            Some('u') => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    let mut hex = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        hex.push(c);
                    }
                    let decoded = if closed {
                        u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                    } else {
                        None
                    };
                    match decoded {
                        Some(c) => out.push(c),
                        None => {
                            out.push_str("\\u{");
                            out.push_str(&hex);
                            if closed {
                                out.push('}');
                            }
                        }
                    }
                } else {
                    out.push_str("\\u");
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"back\\slash"), "back\\slash");
    }

    #[test]
    fn test_hex_and_unicode() {
        assert_eq!(unescape(r"\x41\x42"), "AB");
        assert_eq!(unescape(r"\u{1F980}"), "\u{1F980}");
    }

    #[test]
    fn test_malformed_passthrough() {
        assert_eq!(unescape(r"\q"), "\\q");
        assert_eq!(unescape(r"\u{zz}"), "\\u{zz}");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_no_escapes() {
        assert_eq!(unescape("../other/mod"), "../other/mod");
    }
}
