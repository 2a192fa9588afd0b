//! Shared front-end types for the Vela compiler.
//!
//! Everything the lexer, parser, and diagnostics agree on lives here:
//! source files and spans, interned names, tokens, and the AST arena with
//! its symbol tables.

mod ast;
mod interner;
mod name;
mod source;
mod span;
mod token;

pub use ast::{Arena, Entity, Kind, LambdaNode, Node, NodeId, NodeKind, SymbolTable};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use source::{Source, SourceId, SourceMap};
pub use span::{Loc, Span};
pub use token::{Token, TokenKind, TokenTag};
