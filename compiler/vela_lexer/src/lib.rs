//! Tokeniser for Vela.
//!
//! [`lex`] is a pure function over `(source, position)`: each call returns
//! the next token and advances the position. The parser pulls tokens
//! lazily through its lookahead buffer, so there is no token list and no
//! lexer state beyond the position.
//!
//! String and character bodies are kept undecoded; [`escape::unescape`]
//! decodes them at the point of use.

pub mod escape;

#[cfg(test)]
mod tests;

use vela_ir::{Loc, Source, StringInterner, Token, TokenKind};

/// Produce the next token of `source` starting at `*pos`.
///
/// At end of input this returns an `End` token forever.
pub fn lex(source: &Source, pos: &mut usize, interner: &StringInterner) -> Token {
    let bytes = source.text.as_bytes();

    skip_trivia(bytes, pos);

    let start = *pos;
    if start >= bytes.len() {
        let at = bytes.len() as u32;
        return Token::new(TokenKind::End, Loc::new(source.id, at, at));
    }

    let kind = match bytes[start] {
        b'(' => one(pos, TokenKind::LParen),
        b')' => one(pos, TokenKind::RParen),
        b'[' => one(pos, TokenKind::LBracket),
        b']' => one(pos, TokenKind::RBracket),
        b'{' => one(pos, TokenKind::LBrace),
        b'}' => one(pos, TokenKind::RBrace),
        b',' => one(pos, TokenKind::Comma),
        b';' => one(pos, TokenKind::Semicolon),
        b'@' => one(pos, TokenKind::At),
        b':' => {
            if bytes.get(start + 1) == Some(&b':') {
                *pos += 2;
                TokenKind::DoubleColon
            } else {
                one(pos, TokenKind::Colon)
            }
        }
        b'.' => {
            if bytes.get(start + 1) == Some(&b'.') && bytes.get(start + 2) == Some(&b'.') {
                *pos += 3;
                TokenKind::Ellipsis
            } else {
                one(pos, TokenKind::Dot)
            }
        }
        b'"' => escaped_string(bytes, pos, interner),
        b'`' => unescaped_string(bytes, pos, interner),
        b'\'' => character(bytes, pos),
        b'0'..=b'9' => number(bytes, pos),
        c if is_ident_start(c) => ident(source, bytes, pos, interner),
        c if is_symbol_char(c) => symbol(source, bytes, pos, interner),
        _ => {
            // Skip one whole UTF-8 scalar so the next call makes progress.
            let text = &source.text[start..];
            let width = text.chars().next().map_or(1, char::len_utf8);
            *pos += width;
            TokenKind::Error
        }
    };

    Token::new(kind, Loc::new(source.id, start as u32, *pos as u32))
}

fn one(pos: &mut usize, kind: TokenKind) -> TokenKind {
    *pos += 1;
    kind
}

/// Skip whitespace, line comments, and nestable block comments.
fn skip_trivia(bytes: &[u8], pos: &mut usize) {
    loop {
        while *pos < bytes.len() && bytes[*pos].is_ascii_whitespace() {
            *pos += 1;
        }

        if bytes.get(*pos) == Some(&b'/') && bytes.get(*pos + 1) == Some(&b'/') {
            while *pos < bytes.len() && bytes[*pos] != b'\n' {
                *pos += 1;
            }
            continue;
        }

        if bytes.get(*pos) == Some(&b'/') && bytes.get(*pos + 1) == Some(&b'*') {
            *pos += 2;
            let mut depth = 1usize;
            while *pos < bytes.len() && depth > 0 {
                if bytes.get(*pos) == Some(&b'/') && bytes.get(*pos + 1) == Some(&b'*') {
                    depth += 1;
                    *pos += 2;
                } else if bytes.get(*pos) == Some(&b'*') && bytes.get(*pos + 1) == Some(&b'/') {
                    depth -= 1;
                    *pos += 2;
                } else {
                    *pos += 1;
                }
            }
            continue;
        }

        break;
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Characters that form operator runs. `@` and `.` are punctuation, not
/// symbol characters.
fn is_symbol_char(c: u8) -> bool {
    matches!(
        c,
        b'!' | b'$' | b'%' | b'&' | b'*' | b'+' | b'-' | b'/' | b'<' | b'=' | b'>' | b'?' | b'^'
            | b'|' | b'~' | b'\\'
    )
}

fn ident(source: &Source, bytes: &[u8], pos: &mut usize, interner: &StringInterner) -> TokenKind {
    let start = *pos;
    while *pos < bytes.len() && is_ident_continue(bytes[*pos]) {
        *pos += 1;
    }
    let text = &source.text[start..*pos];

    match text {
        "when" => TokenKind::When,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "match" => TokenKind::Match,
        "new" => TokenKind::New,
        "throw" => TokenKind::Throw,
        "let" => TokenKind::Let,
        "var" => TokenKind::Var,
        "type" => TokenKind::Type,
        "class" => TokenKind::Class,
        "interface" => TokenKind::Interface,
        "using" => TokenKind::Using,
        "module" => TokenKind::Module,
        "iso" => TokenKind::Iso,
        "mut" => TokenKind::Mut,
        "imm" => TokenKind::Imm,
        "Self" => TokenKind::SelfUpper,
        "true" => TokenKind::Bool(true),
        "false" => TokenKind::Bool(false),
        _ => TokenKind::Ident(interner.intern(text)),
    }
}

fn symbol(source: &Source, bytes: &[u8], pos: &mut usize, interner: &StringInterner) -> TokenKind {
    let start = *pos;
    while *pos < bytes.len() && is_symbol_char(bytes[*pos]) {
        // Stop in front of a comment opener so `x+//c` keeps its comment.
        if bytes[*pos] == b'/'
            && matches!(bytes.get(*pos + 1), Some(&b'/') | Some(&b'*'))
            && *pos > start
        {
            break;
        }
        *pos += 1;
    }
    let text = &source.text[start..*pos];

    match text {
        "=" => TokenKind::Equals,
        "=>" => TokenKind::FatArrow,
        "->" => TokenKind::Arrow,
        "~>" => TokenKind::View,
        "<~" => TokenKind::Extract,
        "&" => TokenKind::Amp,
        "|" => TokenKind::Pipe,
        _ => TokenKind::Symbol(interner.intern(text)),
    }
}

fn number(bytes: &[u8], pos: &mut usize) -> TokenKind {
    if bytes.get(*pos) == Some(&b'0')
        && matches!(bytes.get(*pos + 1), Some(&b'x') | Some(&b'X'))
    {
        *pos += 2;
        while *pos < bytes.len() && (bytes[*pos].is_ascii_hexdigit() || bytes[*pos] == b'_') {
            *pos += 1;
        }
        return TokenKind::Hex;
    }

    if bytes.get(*pos) == Some(&b'0')
        && matches!(bytes.get(*pos + 1), Some(&b'b') | Some(&b'B'))
    {
        *pos += 2;
        while *pos < bytes.len() && matches!(bytes[*pos], b'0' | b'1' | b'_') {
            *pos += 1;
        }
        return TokenKind::Binary;
    }

    digits(bytes, pos);
    let mut float = false;

    // A dot only joins the number when a digit follows, so `1.to_string`
    // still lexes as an integer and a selector.
    if bytes.get(*pos) == Some(&b'.')
        && bytes.get(*pos + 1).is_some_and(u8::is_ascii_digit)
    {
        *pos += 1;
        digits(bytes, pos);
        float = true;
    }

    if matches!(bytes.get(*pos), Some(&b'e') | Some(&b'E')) {
        let mut after = *pos + 1;
        if matches!(bytes.get(after), Some(&b'+') | Some(&b'-')) {
            after += 1;
        }
        if bytes.get(after).is_some_and(u8::is_ascii_digit) {
            *pos = after;
            digits(bytes, pos);
            float = true;
        }
    }

    if float {
        TokenKind::Float
    } else {
        TokenKind::Int
    }
}

fn digits(bytes: &[u8], pos: &mut usize) {
    while *pos < bytes.len() && (bytes[*pos].is_ascii_digit() || bytes[*pos] == b'_') {
        *pos += 1;
    }
}

fn escaped_string(bytes: &[u8], pos: &mut usize, interner: &StringInterner) -> TokenKind {
    let body_start = *pos + 1;
    *pos += 1;
    while *pos < bytes.len() {
        match bytes[*pos] {
            b'"' => {
                let body = core::str::from_utf8(&bytes[body_start..*pos])
                    .unwrap_or_default();
                *pos += 1;
                return TokenKind::EscapedString(interner.intern(body));
            }
            b'\\' => {
                // The escape is decoded later; here it only guards the quote.
                *pos += 2usize.min(bytes.len() - *pos);
            }
            _ => *pos += 1,
        }
    }
    TokenKind::Error
}

fn unescaped_string(bytes: &[u8], pos: &mut usize, interner: &StringInterner) -> TokenKind {
    let body_start = *pos + 1;
    *pos += 1;
    while *pos < bytes.len() {
        if bytes[*pos] == b'`' {
            let body = core::str::from_utf8(&bytes[body_start..*pos]).unwrap_or_default();
            *pos += 1;
            return TokenKind::UnescapedString(interner.intern(body));
        }
        *pos += 1;
    }
    TokenKind::Error
}

fn character(bytes: &[u8], pos: &mut usize) -> TokenKind {
    *pos += 1;
    while *pos < bytes.len() {
        match bytes[*pos] {
            b'\'' => {
                *pos += 1;
                return TokenKind::Character;
            }
            b'\\' => *pos += 2usize.min(bytes.len() - *pos),
            b'\n' => break,
            _ => *pos += 1,
        }
    }
    TokenKind::Error
}
