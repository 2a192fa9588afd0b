//! Token stream adapter over the lexer.
//!
//! The stream keeps two cursors: the consuming cursor (the front of the
//! lookahead buffer) and a speculative cursor `la`. [`TokenStream::peek`]
//! advances `la` on a match without consuming anything; [`TokenStream::rewind`]
//! resets it; [`TokenStream::take`] consumes one token and requires the
//! speculative cursor to be at zero. Lookahead tokens are produced lazily by
//! calling the lexer.

use std::collections::VecDeque;

use vela_ir::{Loc, Source, SourceId, StringInterner, Token, TokenTag};
use vela_lexer::lex;

use crate::recovery::TokenSet;

pub struct TokenStream<'a> {
    source: Source,
    pos: usize,
    /// Speculative cursor: index into `lookahead` of the next token `peek`
    /// will inspect.
    la: usize,
    previous: Token,
    lookahead: VecDeque<Token>,
    interner: &'a StringInterner,
}

impl<'a> TokenStream<'a> {
    /// A stream over no input; [`TokenStream::start`] swaps the real file in.
    pub fn idle(interner: &'a StringInterner) -> Self {
        let source = Source {
            id: SourceId::UNKNOWN,
            path: String::new(),
            origin: String::new(),
            text: "".into(),
        };
        TokenStream {
            source,
            pos: 0,
            la: 0,
            previous: Token::dummy(),
            lookahead: VecDeque::new(),
            interner,
        }
    }

    /// Begin lexing a new file, discarding all state of the previous one.
    pub fn start(&mut self, source: Source) {
        self.source = source;
        self.pos = 0;
        self.la = 0;
        self.previous = Token::dummy();
        self.lookahead.clear();
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The token most recently consumed by [`TokenStream::take`].
    pub fn previous(&self) -> &Token {
        &self.previous
    }

    /// The token matched by the last successful [`TokenStream::peek`].
    pub fn peeked(&self) -> &Token {
        &self.lookahead[self.la - 1]
    }

    fn fill_to(&mut self, n: usize) {
        while self.lookahead.len() <= n {
            let token = lex(&self.source, &mut self.pos, self.interner);
            self.lookahead.push_back(token);
        }
    }

    /// Location of the next unconsumed token; error positions point here.
    pub fn loc(&mut self) -> Loc {
        self.fill_to(0);
        self.lookahead[0].loc
    }

    /// Tag of the next unconsumed token.
    pub fn next_tag(&mut self) -> TokenTag {
        self.fill_to(0);
        self.lookahead[0].kind.tag()
    }

    /// Speculatively match one token. Advances the speculative cursor on a
    /// match and never consumes.
    pub fn peek(&mut self, tag: TokenTag) -> bool {
        self.fill_to(self.la);
        if self.lookahead[self.la].kind.tag() == tag {
            self.la += 1;
            true
        } else {
            false
        }
    }

    /// Advance the speculative cursor without matching.
    pub fn next(&mut self) {
        self.la += 1;
    }

    /// Reset the speculative cursor to the consuming cursor.
    pub fn rewind(&mut self) {
        self.la = 0;
    }

    /// Consume one token. The speculative cursor must be at zero.
    pub fn take(&mut self) -> Token {
        debug_assert_eq!(self.la, 0, "take with an active speculative cursor");
        let token = match self.lookahead.pop_front() {
            Some(token) => token,
            None => lex(&self.source, &mut self.pos, self.interner),
        };
        self.previous = token.clone();
        token
    }

    /// Consume one token iff it matches.
    pub fn has(&mut self, tag: TokenTag) -> bool {
        debug_assert_eq!(self.la, 0, "has with an active speculative cursor");
        self.fill_to(0);
        if self.lookahead[0].kind.tag() == tag {
            self.take();
            true
        } else {
            false
        }
    }

    /// Speculatively scan forward for `target`, skipping balanced `()`,
    /// `[]`, and `{}` groups whole. Stops with `false` at `terminator` or
    /// end of file.
    pub fn peek_delimited(&mut self, target: TokenTag, terminator: TokenTag) -> bool {
        while !self.peek(TokenTag::End) {
            if self.peek(target) {
                return true;
            }
            if self.peek(terminator) {
                return false;
            }

            if self.peek(TokenTag::LParen) {
                self.peek_delimited(TokenTag::RParen, TokenTag::End);
            } else if self.peek(TokenTag::LBracket) {
                self.peek_delimited(TokenTag::RBracket, TokenTag::End);
            } else if self.peek(TokenTag::LBrace) {
                self.peek_delimited(TokenTag::RBrace, TokenTag::End);
            } else {
                self.next();
            }
        }
        false
    }

    /// Consume tokens until one of `kinds` is next, skipping balanced
    /// delimiter groups as atomic units. The found token is not consumed.
    pub fn restart_before(&mut self, kinds: TokenSet) {
        while !self.has(TokenTag::End) {
            if kinds.contains(self.next_tag()) {
                return;
            }

            if self.has(TokenTag::LParen) {
                self.restart_after(TokenSet::single(TokenTag::RParen));
            } else if self.has(TokenTag::LBracket) {
                self.restart_after(TokenSet::single(TokenTag::RBracket));
            } else if self.has(TokenTag::LBrace) {
                self.restart_after(TokenSet::single(TokenTag::RBrace));
            } else {
                self.take();
            }
        }
    }

    /// Like [`TokenStream::restart_before`], but also consumes the found
    /// token.
    pub fn restart_after(&mut self, kinds: TokenSet) {
        self.restart_before(kinds);
        self.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::SourceMap;

    fn stream_over(text: &str) -> TokenStream<'static> {
        let interner: &'static StringInterner = Box::leak(Box::new(StringInterner::new()));
        let mut map = SourceMap::new();
        let source = map.add("test.vela", ".", text);
        let mut stream = TokenStream::idle(interner);
        stream.start(source);
        stream
    }

    #[test]
    fn test_peek_never_consumes() {
        let mut stream = stream_over("a b");

        assert!(stream.peek(TokenTag::Ident));
        assert!(stream.peek(TokenTag::Ident));
        assert!(!stream.peek(TokenTag::Comma));
        stream.rewind();

        // Consuming still starts from the first token.
        assert!(stream.has(TokenTag::Ident));
        assert!(stream.has(TokenTag::Ident));
        assert!(stream.has(TokenTag::End));
    }

    #[test]
    fn test_has_only_consumes_on_match() {
        let mut stream = stream_over(", x");

        assert!(!stream.has(TokenTag::Ident));
        assert!(stream.has(TokenTag::Comma));
        assert!(stream.has(TokenTag::Ident));
    }

    #[test]
    fn test_take_returns_tokens_in_order() {
        let mut stream = stream_over("( )");

        assert_eq!(stream.take().kind.tag(), TokenTag::LParen);
        assert_eq!(stream.previous().kind.tag(), TokenTag::LParen);
        assert_eq!(stream.take().kind.tag(), TokenTag::RParen);
        assert_eq!(stream.take().kind.tag(), TokenTag::End);
    }

    #[test]
    fn test_peek_delimited_finds_target() {
        let interner = StringInterner::new();
        // The `=>` sits after a balanced group containing a stray `=>`.
        let mut stream = stream_over("(a => b) c => d");

        assert!(stream.peek_delimited(TokenTag::FatArrow, TokenTag::RBrace));
        stream.rewind();
        // Nothing was consumed.
        assert!(stream.has(TokenTag::LParen));
    }

    #[test]
    fn test_peek_delimited_respects_terminator() {
        let mut stream = stream_over("a b } =>");
        assert!(!stream.peek_delimited(TokenTag::FatArrow, TokenTag::RBrace));
        stream.rewind();
        assert!(stream.has(TokenTag::Ident));
    }

    #[test]
    fn test_peek_delimited_skips_nested_groups() {
        // The `}` inside `( )` is part of the group; the one after it is
        // the real target.
        let mut stream = stream_over("( } ) }");
        assert!(stream.peek_delimited(TokenTag::RBrace, TokenTag::End));

        // With only the nested `}`, the scan runs out of input.
        let mut stream = stream_over("( } )");
        assert!(!stream.peek_delimited(TokenTag::RBrace, TokenTag::End));
    }

    #[test]
    fn test_restart_before_stops_at_kind() {
        let mut stream = stream_over("a b , c");

        stream.restart_before(TokenSet::single(TokenTag::Comma));
        assert_eq!(stream.next_tag(), TokenTag::Comma);
    }

    #[test]
    fn test_restart_before_skips_balanced_groups() {
        let interner = StringInterner::new();
        // The commas inside the groups must not stop the restart.
        let mut stream = stream_over("x (a, b) [c, d] {e, f} , y");

        stream.restart_before(TokenSet::single(TokenTag::Comma));
        assert!(stream.has(TokenTag::Comma));
        assert!(stream.has(TokenTag::Ident));
        assert!(stream.has(TokenTag::End));
    }

    #[test]
    fn test_restart_after_consumes_target() {
        let mut stream = stream_over("junk ; x");

        stream.restart_after(TokenSet::single(TokenTag::Semicolon));
        assert!(stream.has(TokenTag::Ident));
    }

    #[test]
    fn test_restart_stops_at_end() {
        let mut stream = stream_over("a b c");
        stream.restart_before(TokenSet::single(TokenTag::Semicolon));
        assert!(stream.has(TokenTag::End));
    }
}
