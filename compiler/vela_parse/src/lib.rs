//! Recursive descent parser for Vela.
//!
//! The parser drives module discovery, pulls tokens lazily through a
//! speculative-lookahead [`stream::TokenStream`], and builds a single
//! program tree: a root entity with one child entity per imported module.
//! A stack of scope nodes disambiguates bare identifiers (local reference
//! vs selector), composite types are normalised to disjunctive normal form
//! as they are built, and errors recover by balanced-delimiter
//! resynchronisation.

mod dnf;
mod grammar;
mod loader;
mod outcome;
pub mod paths;
mod recovery;
mod scope;
mod stream;

#[cfg(test)]
mod tests;

pub use outcome::Parsed;
pub use recovery::TokenSet;
pub use stream::TokenStream;

use vela_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use vela_ir::{
    Arena, Entity, Loc, Name, NodeId, NodeKind, SourceMap, StringInterner, TokenKind, TokenTag,
};

/// Everything a parse produces. `program` is the root entity and is present
/// regardless of success; consult `ok` before trusting the tree.
pub struct ParseResult {
    pub ok: bool,
    pub program: NodeId,
    pub arena: Arena,
    pub sources: SourceMap,
    /// Canonical paths of every imported module, in import order; module
    /// `i` is named `$module-i` in the program.
    pub imports: Vec<String>,
}

/// Parse the module at `path`, following imports, resolving them against
/// the importing file's directory first and `stdlib` second.
pub fn parse(
    path: &str,
    stdlib: &str,
    interner: &StringInterner,
    queue: &mut DiagnosticQueue,
) -> ParseResult {
    tracing::debug!(path, stdlib, "parsing program");
    let mut parser = Parser::new(stdlib, interner, queue);
    let program = parser.alloc_program();

    parser.push_scope(program);
    let canonical = paths::canonical(path);
    parser.imports.push(if canonical.is_empty() {
        path.to_string()
    } else {
        canonical
    });

    // Imports grow while modules parse; re-read the length every iteration.
    let mut index = 0;
    while index < parser.imports.len() {
        let next = parser.imports[index].clone();
        parser.load_module(&next, index, program);
        index += 1;
    }
    parser.pop_scope();

    parser.finish(program)
}

/// Parse a single in-memory source as a one-module program. This is the
/// unit-test and tooling entry; module imports in the text resolve against
/// the working directory.
pub fn parse_source(
    text: &str,
    interner: &StringInterner,
    queue: &mut DiagnosticQueue,
) -> ParseResult {
    let mut parser = Parser::new("", interner, queue);
    let program = parser.alloc_program();
    parser.push_scope(program);

    // Index 0 belongs to the in-memory module itself, so imports in the
    // text take later indices.
    parser.imports.push("<memory>".to_string());
    let module = parser.module_shell(0, program);
    let source = parser.sources.add("<memory>", "", text);
    let mut moduledef = None;
    parser.stream.start(source);
    parser.in_scope(module, |p| p.parse_module_items(module, &mut moduledef));
    parser.apply_moduledef(module, moduledef);

    parser.pop_scope();
    parser.finish(program)
}

pub struct Parser<'a> {
    pub(crate) stream: TokenStream<'a>,
    pub(crate) arena: Arena,
    /// Stack of scope nodes; the last entry is the current scope.
    pub(crate) scopes: Vec<NodeId>,
    pub(crate) imports: Vec<String>,
    pub(crate) stdlib: String,
    pub(crate) interner: &'a StringInterner,
    queue: &'a mut DiagnosticQueue,
    pub(crate) sources: SourceMap,
    pub(crate) name_apply: Name,
    pub(crate) name_create: Name,
}

impl<'a> Parser<'a> {
    pub fn new(stdlib: &str, interner: &'a StringInterner, queue: &'a mut DiagnosticQueue) -> Self {
        Parser {
            stream: TokenStream::idle(interner),
            arena: Arena::new(),
            scopes: Vec::new(),
            imports: Vec::new(),
            stdlib: stdlib.to_string(),
            interner,
            queue,
            sources: SourceMap::new(),
            name_apply: interner.intern("apply"),
            name_create: interner.intern("create"),
        }
    }

    fn alloc_program(&mut self) -> NodeId {
        self.arena
            .alloc(Loc::DUMMY, NodeKind::Class(Entity::new(Name::EMPTY)))
    }

    fn finish(self, program: NodeId) -> ParseResult {
        ParseResult {
            ok: !self.queue.has_errors(),
            program,
            arena: self.arena,
            sources: self.sources,
            imports: self.imports,
        }
    }

    // --- Diagnostics ---

    pub(crate) fn error(&mut self, diagnostic: Diagnostic) {
        self.queue.push(diagnostic);
    }

    /// Report "expected X, found Y" at the next unconsumed token.
    pub(crate) fn expected_here(&mut self, code: ErrorCode, what: &str) {
        let loc = self.stream.loc();
        let found = self.stream.next_tag().describe();
        self.queue
            .push(Diagnostic::error(code, format!("expected {what}, found {found}")).at(loc));
    }

    // --- Stream conveniences ---

    pub(crate) fn has(&mut self, tag: TokenTag) -> bool {
        self.stream.has(tag)
    }

    pub(crate) fn previous_loc(&self) -> Loc {
        self.stream.previous().loc
    }

    /// Interned name of the token just consumed, for identifier and symbol
    /// tokens.
    pub(crate) fn previous_name(&self) -> Option<Name> {
        match self.stream.previous().kind {
            TokenKind::Ident(name) | TokenKind::Symbol(name) => Some(name),
            _ => None,
        }
    }

    // --- Node mutation helpers ---
    //
    // Grammar functions accumulate children in locals and install them with
    // these; scope-bearing nodes are allocated up front so the scope stack
    // and symbol tables can reference them while their children parse.

    pub(crate) fn entity_mut(&mut self, id: NodeId) -> &mut Entity {
        match &mut self.arena.get_mut(id).kind {
            NodeKind::Class(entity) | NodeKind::Interface(entity) => entity,
            _ => panic!("node {id:?} is not an entity"),
        }
    }

    pub(crate) fn lambda_mut(&mut self, id: NodeId) -> &mut vela_ir::LambdaNode {
        match &mut self.arena.get_mut(id).kind {
            NodeKind::Lambda(lambda) => lambda,
            _ => panic!("node {id:?} is not a lambda"),
        }
    }

    pub(crate) fn select_set_args(&mut self, sel: NodeId, args: Option<NodeId>) {
        if let NodeKind::Select { args: slot, .. } = &mut self.arena.get_mut(sel).kind {
            *slot = args;
        }
    }

    /// Allocate a fresh lambda whose result type is inferred.
    pub(crate) fn alloc_lambda(&mut self, loc: Loc) -> NodeId {
        let infer = self.arena.alloc(loc, NodeKind::InferType);
        self.arena.alloc(
            loc,
            NodeKind::Lambda(vela_ir::LambdaNode {
                result: Some(infer),
                ..Default::default()
            }),
        )
    }
}
