//! Type grammar.
//!
//! ```text
//! typeexpr     := uniontype
//! uniontype    := throwtype ('|' throwtype)*
//! throwtype    := 'throw'? isecttype
//! isecttype    := functiontype ('&' functiontype)*
//! functiontype := viewtype ('->' functiontype)?
//! viewtype     := captype (('~>' | '<~') captype)*
//! captype      := 'iso' | 'mut' | 'imm' | 'Self' | tupletype | typelist | typeref
//! typeref      := (modulename | typename) ('::' typename)*
//! ```
//!
//! Unions, intersections, and throws go through the DNF constructors, so
//! the tree never carries a union beneath an intersection or a throw.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::{Kind, Loc, Name, NodeId, NodeKind, TokenKind, TokenTag};

use crate::outcome::{one_of, Parsed};
use crate::recovery::{LIST_BRACKET, LIST_PAREN};
use crate::{dnf, paths, Parser};

impl Parser<'_> {
    /// A type is required here; a missing one is an error, not a skip.
    pub(crate) fn typeexpr(&mut self) -> Parsed<NodeId> {
        let outcome = self.opt_uniontype();
        if outcome.is_skip() {
            self.expected_here(ErrorCode::E1003, "a type");
            return Parsed::Error(None);
        }
        outcome
    }

    /// oftype := ':' typeexpr
    pub(crate) fn oftype(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Colon) {
            return Parsed::Skip;
        }
        self.typeexpr()
    }

    /// inittype := '=' typeexpr
    pub(crate) fn init_type(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Equals) {
            return Parsed::Skip;
        }
        match self.typeexpr() {
            Parsed::Success(ty) => Parsed::Success(ty),
            other => Parsed::Error(other.node()),
        }
    }

    fn opt_uniontype(&mut self) -> Parsed<NodeId> {
        let outcome = self.opt_throwtype();
        let mut ty = match outcome {
            Parsed::Success(ty) => ty,
            other => return other,
        };

        let mut ok = true;
        while self.has(TokenTag::Pipe) {
            match self.opt_throwtype() {
                Parsed::Success(next) => ty = dnf::disjunction(&mut self.arena, ty, next),
                Parsed::Error(next) => {
                    ok = false;
                    if let Some(next) = next {
                        ty = dnf::disjunction(&mut self.arena, ty, next);
                    }
                }
                Parsed::Skip => {
                    self.expected_here(ErrorCode::E1003, "a type");
                    ok = false;
                }
            }
        }
        Parsed::from(ok, ty)
    }

    fn opt_throwtype(&mut self) -> Parsed<NodeId> {
        let throwing = self.has(TokenTag::Throw);
        let outcome = self.opt_isecttype();
        if outcome.is_skip() {
            return Parsed::Skip;
        }
        if !throwing {
            return outcome;
        }

        let ok = !outcome.is_err();
        match outcome.node() {
            Some(ty) => Parsed::from(ok, dnf::throwtype(&mut self.arena, ty)),
            None => Parsed::Error(None),
        }
    }

    fn opt_isecttype(&mut self) -> Parsed<NodeId> {
        let outcome = self.opt_functiontype();
        let mut ty = match outcome {
            Parsed::Success(ty) => ty,
            other => return other,
        };

        let mut ok = true;
        while self.has(TokenTag::Amp) {
            match self.opt_functiontype() {
                Parsed::Success(next) => ty = dnf::conjunction(&mut self.arena, ty, next),
                Parsed::Error(next) => {
                    ok = false;
                    if let Some(next) = next {
                        ty = dnf::conjunction(&mut self.arena, ty, next);
                    }
                }
                Parsed::Skip => {
                    self.expected_here(ErrorCode::E1003, "a type");
                    ok = false;
                }
            }
        }
        Parsed::from(ok, ty)
    }

    /// Right associative: `A -> B -> C` is `A -> (B -> C)`.
    fn opt_functiontype(&mut self) -> Parsed<NodeId> {
        let left = match self.opt_viewtype() {
            Parsed::Success(ty) => ty,
            other => return other,
        };

        if !self.has(TokenTag::Arrow) {
            return Parsed::Success(left);
        }
        let arrow_loc = self.previous_loc();

        match self.opt_functiontype() {
            Parsed::Success(right) => {
                let loc = self
                    .arena
                    .loc(left)
                    .range(arrow_loc)
                    .extend(self.arena.loc(right));
                Parsed::Success(self.arena.alloc(loc, NodeKind::FunctionType { left, right }))
            }
            other => match other.node() {
                Some(right) => {
                    let loc = self.arena.loc(left).range(arrow_loc);
                    Parsed::Error(Some(self.arena.alloc(
                        loc,
                        NodeKind::FunctionType { left, right },
                    )))
                }
                None => Parsed::Error(Some(left)),
            },
        }
    }

    /// Left associative: `A ~> B <~ C` is `(A ~> B) <~ C`.
    fn opt_viewtype(&mut self) -> Parsed<NodeId> {
        let outcome = self.opt_captype();
        if outcome.is_skip() {
            return Parsed::Skip;
        }
        let mut ok = !outcome.is_err();
        let Some(mut ty) = outcome.node() else {
            return Parsed::Error(None);
        };

        loop {
            let view = if self.has(TokenTag::View) {
                true
            } else if self.has(TokenTag::Extract) {
                false
            } else {
                break;
            };
            let op_loc = self.previous_loc();

            match self.opt_captype() {
                Parsed::Success(right) => {
                    let loc = self
                        .arena
                        .loc(ty)
                        .range(op_loc)
                        .extend(self.arena.loc(right));
                    let kind = if view {
                        NodeKind::ViewType { left: ty, right }
                    } else {
                        NodeKind::ExtractType { left: ty, right }
                    };
                    ty = self.arena.alloc(loc, kind);
                }
                Parsed::Error(right) => {
                    ok = false;
                    if let Some(right) = right {
                        let loc = self.arena.loc(ty).range(op_loc);
                        let kind = if view {
                            NodeKind::ViewType { left: ty, right }
                        } else {
                            NodeKind::ExtractType { left: ty, right }
                        };
                        ty = self.arena.alloc(loc, kind);
                    }
                    break;
                }
                Parsed::Skip => {
                    self.expected_here(ErrorCode::E1003, "a type");
                    ok = false;
                    break;
                }
            }
        }
        Parsed::from(ok, ty)
    }

    fn opt_captype(&mut self) -> Parsed<NodeId> {
        for (tag, kind) in [
            (TokenTag::Iso, NodeKind::Iso),
            (TokenTag::Mut, NodeKind::Mut),
            (TokenTag::Imm, NodeKind::Imm),
            (TokenTag::SelfUpper, NodeKind::SelfType),
        ] {
            if self.has(tag) {
                return Parsed::Success(self.arena.alloc(self.previous_loc(), kind));
            }
        }

        one_of!(self.opt_tupletype(), self.opt_typelist(), self.opt_typeref())
    }

    /// tupletype := '(' (typeexpr (',' typeexpr)*)? ')'
    ///
    /// One element is parenthesised grouping and collapses to the element.
    fn opt_tupletype(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::LParen) {
            return Parsed::Skip;
        }
        let mut loc = self.previous_loc();

        if self.has(TokenTag::RParen) {
            loc = loc.extend(self.previous_loc());
            return Parsed::Success(self.arena.alloc(loc, NodeKind::TupleType { types: Vec::new() }));
        }

        let mut ok = true;
        let mut types = Vec::new();
        loop {
            match self.typeexpr() {
                Parsed::Success(ty) => types.push(ty),
                other => {
                    ok = false;
                    self.stream.restart_before(LIST_PAREN);
                    if let Some(ty) = other.node() {
                        types.push(ty);
                    }
                }
            }
            if !self.has(TokenTag::Comma) {
                break;
            }
        }

        if !self.has(TokenTag::RParen) {
            self.expected_here(ErrorCode::E1001, "`)`");
            ok = false;
        }
        loc = loc.extend(self.previous_loc());

        if types.len() == 1 {
            return Parsed::from(ok, types[0]);
        }
        Parsed::from(ok, self.arena.alloc(loc, NodeKind::TupleType { types }))
    }

    /// typelist := ident '...'
    ///
    /// The identifier must resolve to a declared type parameter list.
    fn opt_typelist(&mut self) -> Parsed<NodeId> {
        let matched = self.stream.peek(TokenTag::Ident) && self.stream.peek(TokenTag::Ellipsis);
        self.stream.rewind();
        if !matched {
            return Parsed::Skip;
        }

        self.has(TokenTag::Ident);
        let loc = self.previous_loc();
        let name = self.previous_name().unwrap_or(Name::EMPTY);
        self.has(TokenTag::Ellipsis);
        let loc = loc.extend(self.previous_loc());

        let mut ok = true;
        match self.get_scope_def(name) {
            None => {
                self.error(
                    Diagnostic::error(
                        ErrorCode::E1013,
                        "couldn't find a definition of this type list",
                    )
                    .at(loc),
                );
                ok = false;
            }
            Some(def) if self.arena.kind(def) != Kind::TypeParamList => {
                let described = self.arena.kind(def).describe();
                let def_loc = self.arena.loc(def);
                self.error(
                    Diagnostic::error(
                        ErrorCode::E1013,
                        format!("expected a type list, but this is a {described}"),
                    )
                    .at(loc)
                    .with_label(def_loc, "the definition is here"),
                );
                ok = false;
            }
            Some(_) => {}
        }

        let id = self.arena.alloc(loc, NodeKind::TypeList { name });
        Parsed::from(ok, id)
    }

    /// typeref := (modulename | typename) ('::' typename)*
    pub(crate) fn opt_typeref(&mut self) -> Parsed<NodeId> {
        let matched = self.stream.peek(TokenTag::Ident)
            || self.stream.peek(TokenTag::Symbol)
            || self.stream.peek(TokenTag::EscapedString)
            || self.stream.peek(TokenTag::UnescapedString);
        self.stream.rewind();
        if !matched {
            return Parsed::Skip;
        }

        let mut ok = true;
        let mut typenames: Vec<NodeId> = Vec::new();
        let mut loc: Option<Loc> = None;

        match self.opt_modulename() {
            Parsed::Skip => {}
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                if let Some(module) = outcome.node() {
                    loc = Some(self.arena.loc(module));
                    typenames.push(module);
                }
                if !self.has(TokenTag::DoubleColon) {
                    let loc = loc.unwrap_or_else(|| self.previous_loc());
                    let id = self.arena.alloc(loc, NodeKind::TypeRef { typenames });
                    return Parsed::from(ok, id);
                }
            }
        }

        loop {
            if !self.has(TokenTag::Ident) && !self.has(TokenTag::Symbol) {
                self.expected_here(ErrorCode::E1003, "a type identifier");
                let loc = loc.unwrap_or_else(|| self.stream.loc());
                let id = self.arena.alloc(loc, NodeKind::TypeRef { typenames });
                return Parsed::Error(Some(id));
            }
            let name_loc = self.previous_loc();
            let name = self.previous_name().unwrap_or(Name::EMPTY);

            let typeargs = match self.opt_typeargs() {
                Parsed::Skip => Vec::new(),
                Parsed::Success(args) => args,
                Parsed::Error(args) => {
                    ok = false;
                    args.unwrap_or_default()
                }
            };
            let tn = self.arena.alloc(name_loc, NodeKind::TypeName { name, typeargs });
            typenames.push(tn);

            loc = Some(match loc {
                None => name_loc.extend(self.previous_loc()),
                Some(loc) => loc.extend(self.previous_loc()),
            });

            if !self.has(TokenTag::DoubleColon) {
                break;
            }
        }

        let loc = loc.unwrap_or_else(|| self.previous_loc());
        let id = self.arena.alloc(loc, NodeKind::TypeRef { typenames });
        Parsed::from(ok, id)
    }

    /// modulename := escapedstring typeargs?
    ///
    /// The string is a module path, resolved relative to the importing
    /// file's directory first and the standard library second. A resolved
    /// module is appended to the import list (or found there) and renamed
    /// to its `$module-<index>` identity.
    fn opt_modulename(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::EscapedString) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let raw = match self.stream.previous().kind {
            TokenKind::EscapedString(body) => body,
            _ => Name::EMPTY,
        };

        let mut ok = true;
        let decoded = vela_lexer::escape::unescape(self.interner.lookup(raw));
        let base = paths::to_directory(&decoded);
        let origin = self.stream.source().origin.clone();
        let relative = paths::join(&origin, &base);
        let std_path = paths::join(&self.stdlib, &base);

        let mut found = paths::canonical(&relative);
        if found.is_empty() {
            found = paths::canonical(&std_path);
        }

        let name = if found.is_empty() {
            self.error(
                Diagnostic::error(ErrorCode::E0003, format!("couldn't locate module `{base}`"))
                    .at(loc)
                    .with_help(format!("tried {relative}"))
                    .with_help(format!("tried {std_path}")),
            );
            ok = false;
            raw
        } else {
            let index = match self.imports.iter().position(|path| *path == found) {
                Some(index) => index,
                None => {
                    self.imports.push(found);
                    self.imports.len() - 1
                }
            };
            tracing::debug!(index, module = %base, "resolved module import");
            self.interner.intern_owned(format!("$module-{index}"))
        };

        let typeargs = match self.opt_typeargs() {
            Parsed::Skip => Vec::new(),
            Parsed::Success(args) => args,
            Parsed::Error(args) => {
                ok = false;
                args.unwrap_or_default()
            }
        };
        let id = self.arena.alloc(loc, NodeKind::ModuleName { name, typeargs });
        Parsed::from(ok, id)
    }

    /// typeargs := '[' typeexpr (',' typeexpr)* ']'
    pub(crate) fn opt_typeargs(&mut self) -> Parsed<Vec<NodeId>> {
        if !self.has(TokenTag::LBracket) {
            return Parsed::Skip;
        }

        let mut ok = true;
        let mut args = Vec::new();
        loop {
            match self.typeexpr() {
                Parsed::Success(ty) => args.push(ty),
                other => {
                    ok = false;
                    self.stream.restart_before(LIST_BRACKET);
                    if let Some(ty) = other.node() {
                        args.push(ty);
                    }
                }
            }
            if !self.has(TokenTag::Comma) {
                break;
            }
        }

        if !self.has(TokenTag::RBracket) {
            self.expected_here(ErrorCode::E1001, "`,` or `]`");
            ok = false;
        }
        Parsed::from(ok, args)
    }

    /// An inherits clause must be a type reference or an intersection of
    /// type references.
    pub(crate) fn check_inherit(&mut self, inherit: Option<NodeId>) -> bool {
        let Some(id) = inherit else {
            return true;
        };
        match &self.arena.get(id).kind {
            NodeKind::TypeRef { .. } => true,
            NodeKind::IsectType { types } => {
                let types = types.clone();
                let mut ok = true;
                for ty in types {
                    if !self.check_inherit(Some(ty)) {
                        ok = false;
                    }
                }
                ok
            }
            other => {
                let described = other.kind().describe();
                let loc = self.arena.loc(id);
                self.error(
                    Diagnostic::error(
                        ErrorCode::E1009,
                        format!("a type can't inherit from a {described}"),
                    )
                    .at(loc),
                );
                false
            }
        }
    }
}
