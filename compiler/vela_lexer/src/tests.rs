use vela_ir::{Source, SourceMap, StringInterner, TokenKind, TokenTag};

use crate::lex;

fn source(text: &str) -> (Source, StringInterner) {
    let mut map = SourceMap::new();
    let src = map.add("test.vela", ".", text);
    (src, StringInterner::new())
}

fn kinds(text: &str) -> Vec<TokenKind> {
    let (src, interner) = source(text);
    let mut pos = 0;
    let mut out = Vec::new();
    loop {
        let token = lex(&src, &mut pos, &interner);
        let end = token.kind == TokenKind::End;
        out.push(token.kind);
        if end {
            break;
        }
    }
    out
}

fn tags(text: &str) -> Vec<TokenTag> {
    kinds(text).iter().map(TokenKind::tag).collect()
}

#[test]
fn test_keywords_and_idents() {
    let (src, interner) = source("class Cell when whenx");
    let mut pos = 0;
    assert_eq!(lex(&src, &mut pos, &interner).kind, TokenKind::Class);
    let cell = lex(&src, &mut pos, &interner);
    assert_eq!(cell.kind, TokenKind::Ident(interner.intern("Cell")));
    assert_eq!(lex(&src, &mut pos, &interner).kind, TokenKind::When);
    assert_eq!(
        lex(&src, &mut pos, &interner).kind,
        TokenKind::Ident(interner.intern("whenx"))
    );
}

#[test]
fn test_capability_keywords() {
    assert_eq!(
        tags("iso mut imm Self"),
        vec![
            TokenTag::Iso,
            TokenTag::Mut,
            TokenTag::Imm,
            TokenTag::SelfUpper,
            TokenTag::End
        ]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        tags("( ) [ ] { } , ; : :: = => . ... -> ~> <~ & | @"),
        vec![
            TokenTag::LParen,
            TokenTag::RParen,
            TokenTag::LBracket,
            TokenTag::RBracket,
            TokenTag::LBrace,
            TokenTag::RBrace,
            TokenTag::Comma,
            TokenTag::Semicolon,
            TokenTag::Colon,
            TokenTag::DoubleColon,
            TokenTag::Equals,
            TokenTag::FatArrow,
            TokenTag::Dot,
            TokenTag::Ellipsis,
            TokenTag::Arrow,
            TokenTag::View,
            TokenTag::Extract,
            TokenTag::Amp,
            TokenTag::Pipe,
            TokenTag::At,
            TokenTag::End
        ]
    );
}

#[test]
fn test_double_colon_no_space() {
    assert_eq!(
        tags("a::b"),
        vec![
            TokenTag::Ident,
            TokenTag::DoubleColon,
            TokenTag::Ident,
            TokenTag::End
        ]
    );
}

#[test]
fn test_symbols() {
    let (src, interner) = source("+ == <= >>");
    let mut pos = 0;
    for expected in ["+", "==", "<=", ">>"] {
        let token = lex(&src, &mut pos, &interner);
        assert_eq!(token.kind, TokenKind::Symbol(interner.intern(expected)));
    }
}

#[test]
fn test_reserved_symbol_runs() {
    // `->` is reserved but `->>` is an ordinary symbol.
    assert_eq!(tags("->"), vec![TokenTag::Arrow, TokenTag::End]);
    assert_eq!(tags("->>"), vec![TokenTag::Symbol, TokenTag::End]);
    assert_eq!(tags("&&"), vec![TokenTag::Symbol, TokenTag::End]);
}

#[test]
fn test_numbers() {
    assert_eq!(
        tags("42 3.14 1e9 2.5e-3 0xFF 0b1010"),
        vec![
            TokenTag::Int,
            TokenTag::Float,
            TokenTag::Float,
            TokenTag::Float,
            TokenTag::Hex,
            TokenTag::Binary,
            TokenTag::End
        ]
    );
}

#[test]
fn test_int_then_selector() {
    // The dot must not be folded into the number.
    assert_eq!(
        tags("1.add"),
        vec![TokenTag::Int, TokenTag::Dot, TokenTag::Ident, TokenTag::End]
    );
}

#[test]
fn test_strings() {
    let (src, interner) = source(r#""hi\n" `raw\n` 'x'"#);
    let mut pos = 0;
    assert_eq!(
        lex(&src, &mut pos, &interner).kind,
        TokenKind::EscapedString(interner.intern("hi\\n"))
    );
    assert_eq!(
        lex(&src, &mut pos, &interner).kind,
        TokenKind::UnescapedString(interner.intern("raw\\n"))
    );
    assert_eq!(lex(&src, &mut pos, &interner).kind, TokenKind::Character);
}

#[test]
fn test_unterminated_string() {
    assert_eq!(tags("\"oops"), vec![TokenTag::Error, TokenTag::End]);
}

#[test]
fn test_bools() {
    assert_eq!(
        kinds("true false"),
        vec![
            TokenKind::Bool(true),
            TokenKind::Bool(false),
            TokenKind::End
        ]
    );
}

#[test]
fn test_comments() {
    assert_eq!(
        tags("a // line\nb /* block /* nested */ */ c"),
        vec![
            TokenTag::Ident,
            TokenTag::Ident,
            TokenTag::Ident,
            TokenTag::End
        ]
    );
}

#[test]
fn test_symbol_stops_before_comment() {
    assert_eq!(
        tags("x+//c\ny"),
        vec![
            TokenTag::Ident,
            TokenTag::Symbol,
            TokenTag::Ident,
            TokenTag::End
        ]
    );
}

#[test]
fn test_end_repeats() {
    let (src, interner) = source("x");
    let mut pos = 0;
    lex(&src, &mut pos, &interner);
    assert_eq!(lex(&src, &mut pos, &interner).kind, TokenKind::End);
    assert_eq!(lex(&src, &mut pos, &interner).kind, TokenKind::End);
}

#[test]
fn test_error_token_advances() {
    let (src, interner) = source("§ x");
    let mut pos = 0;
    assert_eq!(lex(&src, &mut pos, &interner).kind, TokenKind::Error);
    assert_eq!(
        lex(&src, &mut pos, &interner).kind,
        TokenKind::Ident(interner.intern("x"))
    );
}

#[test]
fn test_spans() {
    let (src, interner) = source("let abc");
    let mut pos = 0;
    let let_token = lex(&src, &mut pos, &interner);
    assert_eq!(let_token.loc.span.to_range(), 0..3);
    let ident = lex(&src, &mut pos, &interner);
    assert_eq!(ident.loc.span.to_range(), 4..7);
    assert_eq!(src.slice(ident.loc.span.to_range()), "abc");
}
