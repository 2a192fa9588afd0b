//! Member grammar: entities, fields, functions, aliases, using directives,
//! module definitions, and parameter lists.
//!
//! ```text
//! typebody  := '{' member* '}'
//! member    := class | interface | typealias | using | field | function
//! class     := 'class'     ident typeparams? oftype? typebody
//! interface := 'interface' ident typeparams? oftype? typebody
//! typealias := 'type'      ident typeparams? '=' typeexpr ';'
//! using     := 'using' typeref ';'
//! field     := ident oftype? initexpr? ';'
//! function  := (ident|symbol)? typeparams? params oftype? (lambda | ';')
//! ```

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::{Entity, Kind, Name, NodeId, NodeKind, SymbolTable, TokenTag};

use crate::outcome::{one_of, Parsed};
use crate::recovery::{TokenSet, LIST_BRACKET, MEMBER_START};
use crate::Parser;

impl Parser<'_> {
    /// typebody := '{' member* '}'
    ///
    /// Missing braces are reported but member parsing continues; an
    /// unrecognised member resynchronises on the next plausible member
    /// start.
    pub(crate) fn typebody(&mut self) -> Parsed<Vec<NodeId>> {
        let mut ok = true;
        if !self.has(TokenTag::LBrace) {
            self.expected_here(ErrorCode::E1001, "`{`");
            ok = false;
        }

        let mut members = Vec::new();
        loop {
            if self.has(TokenTag::RBrace) {
                break;
            }
            if self.has(TokenTag::End) {
                self.expected_here(ErrorCode::E1006, "`}`");
                return Parsed::Error(Some(members));
            }

            match self.opt_member() {
                Parsed::Skip => {
                    let at = self.stream.loc();
                    self.error(
                        Diagnostic::error(
                            ErrorCode::E1005,
                            "expected a class, interface, type alias, field, or function",
                        )
                        .at(at),
                    );
                    self.stream.restart_before(MEMBER_START);
                }
                Parsed::Success(member) => members.push(member),
                Parsed::Error(member) => {
                    ok = false;
                    if let Some(member) = member {
                        members.push(member);
                    }
                }
            }
        }
        Parsed::from(ok, members)
    }

    pub(crate) fn opt_member(&mut self) -> Parsed<NodeId> {
        one_of!(
            self.opt_class(),
            self.opt_interface(),
            self.opt_typealias(),
            self.opt_using(),
            self.opt_function(),
            self.opt_field(),
        )
    }

    fn opt_class(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Class) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let class = self
            .arena
            .alloc(loc, NodeKind::Class(Entity::new(Name::EMPTY)));
        let outcome = self.entity(class);
        self.synthesise_trivial_create(class);
        outcome
    }

    fn opt_interface(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Interface) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let interface = self
            .arena
            .alloc(loc, NodeKind::Interface(Entity::new(Name::EMPTY)));
        self.entity(interface)
    }

    /// Shared shape of `class` and `interface`: name, type parameters,
    /// inherits clause, body. The entity is its own scope while its
    /// contents parse, and registers its name in the enclosing scope once
    /// the scope closes.
    fn entity(&mut self, entity: NodeId) -> Parsed<NodeId> {
        let mut ok = self.in_scope(entity, |p| p.entity_inner(entity));

        let name = match &self.arena.get(entity).kind {
            NodeKind::Class(e) | NodeKind::Interface(e) => e.name,
            _ => Name::EMPTY,
        };
        self.set_sym(name, entity);

        let inherits = match &self.arena.get(entity).kind {
            NodeKind::Class(e) | NodeKind::Interface(e) => e.inherits,
            _ => None,
        };
        if !self.check_inherit(inherits) {
            ok = false;
        }

        Parsed::from(ok, entity)
    }

    fn entity_inner(&mut self, entity: NodeId) -> bool {
        let mut ok = true;

        if self.has(TokenTag::Ident) {
            let loc = self.previous_loc();
            let name = self.previous_name().unwrap_or(Name::EMPTY);
            self.arena.get_mut(entity).loc = loc;
            self.entity_mut(entity).name = name;
        } else {
            self.expected_here(ErrorCode::E1004, "an identifier");
            ok = false;
        }

        match self.opt_typeparams() {
            Parsed::Skip => {}
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                let typeparams = outcome.node().unwrap_or_default();
                self.entity_mut(entity).typeparams.extend(typeparams);
            }
        }

        match self.oftype() {
            Parsed::Skip => {}
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                self.entity_mut(entity).inherits = outcome.node();
            }
        }

        let body = self.typebody();
        if body.is_err() {
            ok = false;
        }
        let members = body.node().unwrap_or_default();
        self.entity_mut(entity).members.extend(members);

        ok
    }

    /// When a class has no `create` and every field carries an
    /// initialiser, synthesise `create(): C[Ts...] & iso = { new }`. All
    /// synthetic nodes take the class's location.
    fn synthesise_trivial_create(&mut self, class: NodeId) {
        let name_create = self.name_create;
        let (class_name, class_loc, typeparams, members, has_create) =
            match &self.arena.get(class).kind {
                NodeKind::Class(entity) => (
                    entity.name,
                    self.arena.get(class).loc,
                    entity.typeparams.clone(),
                    entity.members.clone(),
                    entity.symbols.get(name_create).is_some(),
                ),
                _ => return,
            };
        if has_create {
            return;
        }

        for member in &members {
            if let NodeKind::Field { init: None, .. } = &self.arena.get(*member).kind {
                return;
            }
        }

        // Forward the type parameters: a list becomes a type list, a
        // plain parameter becomes a reference to it.
        let mut typeargs = Vec::with_capacity(typeparams.len());
        for tp in typeparams {
            let tp_loc = self.arena.loc(tp);
            let tp_name = self.arena.name(tp).unwrap_or(Name::EMPTY);
            match self.arena.kind(tp) {
                Kind::TypeParamList => {
                    typeargs.push(self.arena.alloc(tp_loc, NodeKind::TypeList { name: tp_name }));
                }
                _ => {
                    let tn = self.arena.alloc(
                        tp_loc,
                        NodeKind::TypeName {
                            name: tp_name,
                            typeargs: Vec::new(),
                        },
                    );
                    typeargs.push(
                        self.arena
                            .alloc(class_loc, NodeKind::TypeRef { typenames: vec![tn] }),
                    );
                }
            }
        }

        let tn = self.arena.alloc(
            class_loc,
            NodeKind::TypeName {
                name: class_name,
                typeargs,
            },
        );
        let tr = self
            .arena
            .alloc(class_loc, NodeKind::TypeRef { typenames: vec![tn] });
        let iso = self.arena.alloc(class_loc, NodeKind::Iso);
        let result = self
            .arena
            .alloc(class_loc, NodeKind::IsectType { types: vec![tr, iso] });

        let body = self.arena.alloc(
            class_loc,
            NodeKind::New {
                args: None,
                region: None,
            },
        );
        let mut symbols = SymbolTable::new();
        symbols.parent = Some(class);
        let lambda = self.arena.alloc(
            class_loc,
            NodeKind::Lambda(vela_ir::LambdaNode {
                typeparams: Vec::new(),
                params: Vec::new(),
                result: Some(result),
                body: vec![body],
                symbols,
            }),
        );
        let create = self.arena.alloc(
            class_loc,
            NodeKind::Function {
                name: name_create,
                lambda,
            },
        );

        self.entity_mut(class).members.push(create);
        // `create` is known absent, so this cannot collide.
        let _ = self
            .arena
            .symbols_mut(class)
            .expect("class carries a symbol table")
            .set(name_create, create);
    }

    /// typealias := 'type' ident typeparams? '=' typeexpr ';'
    fn opt_typealias(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Type) {
            return Parsed::Skip;
        }
        let mut ok = true;

        if !self.has(TokenTag::Ident) {
            self.expected_here(ErrorCode::E1004, "an identifier");
            ok = false;
        }
        let loc = self.previous_loc();
        let name = self.previous_name().unwrap_or(Name::EMPTY);

        let alias = self.arena.alloc(
            loc,
            NodeKind::TypeAlias {
                name,
                typeparams: Vec::new(),
                inherits: None,
                symbols: SymbolTable::new(),
            },
        );
        self.set_sym(name, alias);

        self.in_scope(alias, |p| p.typealias_inner(alias, ok))
    }

    fn typealias_inner(&mut self, alias: NodeId, mut ok: bool) -> Parsed<NodeId> {
        match self.opt_typeparams() {
            Parsed::Skip => {}
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                let typeparams = outcome.node().unwrap_or_default();
                if let NodeKind::TypeAlias {
                    typeparams: slot, ..
                } = &mut self.arena.get_mut(alias).kind
                {
                    slot.extend(typeparams);
                }
            }
        }

        if !self.has(TokenTag::Equals) {
            self.expected_here(ErrorCode::E1001, "`=`");
            ok = false;
        }

        let aliased = self.typeexpr();
        if aliased.is_err() {
            ok = false;
        }
        let aliased = aliased.node();
        if let NodeKind::TypeAlias { inherits, .. } = &mut self.arena.get_mut(alias).kind {
            *inherits = aliased;
        }

        if !self.has(TokenTag::Semicolon) {
            self.expected_here(ErrorCode::E1001, "`;`");
            ok = false;
        }
        Parsed::from(ok, alias)
    }

    /// using := 'using' typeref ';'
    fn opt_using(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Using) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let mut ok = true;

        let typeref = match self.opt_typeref() {
            Parsed::Success(tr) => Some(tr),
            Parsed::Error(tr) => {
                ok = false;
                tr
            }
            Parsed::Skip => {
                self.expected_here(ErrorCode::E1003, "a type reference");
                ok = false;
                None
            }
        };

        if !self.has(TokenTag::Semicolon) {
            self.expected_here(ErrorCode::E1001, "`;`");
            ok = false;
        }
        let id = self.arena.alloc(loc, NodeKind::Using { typeref });
        Parsed::from(ok, id)
    }

    /// field := ident oftype? initexpr? ';'
    fn opt_field(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Ident) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let name = self.previous_name().unwrap_or(Name::EMPTY);
        let mut ok = true;

        let ty = match self.oftype() {
            Parsed::Skip => None,
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                outcome.node()
            }
        };
        let init = match self.init_expr() {
            Parsed::Skip => None,
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                outcome.node()
            }
        };

        if !self.has(TokenTag::Semicolon) {
            self.expected_here(ErrorCode::E1001, "`;`");
            ok = false;
        }

        let id = self.arena.alloc(loc, NodeKind::Field { name, ty, init });
        self.set_sym(name, id);
        Parsed::from(ok, id)
    }

    /// function := (ident|symbol)? typeparams? params oftype? (lambda | ';')
    ///
    /// A function whose name is omitted is named `apply`. The signature is
    /// parsed inside the function's lambda scope, which closes before the
    /// body and reopens when the body lambda parses into it.
    fn opt_function(&mut self) -> Parsed<NodeId> {
        let matched = self.stream.peek(TokenTag::Symbol)
            || (self.stream.peek(TokenTag::Ident)
                && (self.stream.peek(TokenTag::LBracket) || self.stream.peek(TokenTag::LParen)))
            || self.stream.peek(TokenTag::LBracket)
            || self.stream.peek(TokenTag::LParen);
        self.stream.rewind();
        if !matched {
            return Parsed::Skip;
        }

        let mut ok = true;
        let (name, name_loc) = if self.has(TokenTag::Ident) || self.has(TokenTag::Symbol) {
            (
                self.previous_name().unwrap_or(Name::EMPTY),
                self.previous_loc(),
            )
        } else {
            (self.name_apply, self.stream.loc())
        };

        let lambda = self
            .arena
            .alloc(name_loc, NodeKind::Lambda(vela_ir::LambdaNode::default()));
        let func = self
            .arena
            .alloc(name_loc, NodeKind::Function { name, lambda });
        self.set_sym(name, func);

        self.push_scope(lambda);
        ok &= self.function_signature(lambda);
        self.pop_scope();

        match self.opt_lambda_body(lambda) {
            Parsed::Skip => {
                if !self.has(TokenTag::Semicolon) {
                    self.expected_here(ErrorCode::E1001, "a lambda or `;`");
                    ok = false;
                }
            }
            Parsed::Success(_) => {}
            Parsed::Error(_) => ok = false,
        }

        Parsed::from(ok, func)
    }

    /// Type parameters, parameters, and result type, parsed in the
    /// function's lambda scope. Returns whether everything was well
    /// formed.
    fn function_signature(&mut self, lambda: NodeId) -> bool {
        let mut ok = true;

        match self.opt_typeparams() {
            Parsed::Skip => {}
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                let typeparams = outcome.node().unwrap_or_default();
                self.lambda_mut(lambda).typeparams.extend(typeparams);
            }
        }

        match self.opt_params() {
            Parsed::Skip => ok = false,
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                let params = outcome.node().unwrap_or_default();
                self.lambda_mut(lambda).params.extend(params);
            }
        }

        // Top-level functions are stricter than lambdas: every parameter
        // must be a plain binding with a type.
        let params = self.lambda_mut(lambda).params.clone();
        for param in params {
            let param_loc = self.arena.loc(param);
            match &self.arena.get(param).kind {
                NodeKind::Param { ty, .. } => {
                    if self.arena.kind(*ty) == Kind::InferType {
                        self.error(
                            Diagnostic::error(
                                ErrorCode::E1010,
                                "function parameters must have types",
                            )
                            .at(param_loc),
                        );
                    }
                }
                _ => {
                    self.error(
                        Diagnostic::error(
                            ErrorCode::E1011,
                            "function parameters can't be patterns",
                        )
                        .at(param_loc),
                    );
                }
            }
        }

        match self.oftype() {
            Parsed::Skip => {}
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                let result = outcome.node();
                self.lambda_mut(lambda).result = result;
            }
        }

        ok
    }

    /// params := '(' paramlist ')'
    fn opt_params(&mut self) -> Parsed<Vec<NodeId>> {
        if !self.has(TokenTag::LParen) {
            return Parsed::Skip;
        }
        let outcome = self.opt_paramlist(TokenTag::RParen);
        let mut ok = !outcome.is_err();
        let params = outcome.node().unwrap_or_default();

        if !self.has(TokenTag::RParen) {
            self.expected_here(ErrorCode::E1001, "`)`");
            ok = false;
        }
        Parsed::from(ok, params)
    }

    /// paramlist := (param (',' param)*)?
    ///
    /// Never skips: an empty list is a successful parse of zero
    /// parameters.
    pub(crate) fn opt_paramlist(&mut self, terminator: TokenTag) -> Parsed<Vec<NodeId>> {
        let mut ok = true;
        let mut params = Vec::new();
        let restart = TokenSet::single(TokenTag::Comma).with(terminator);

        loop {
            match self.opt_param() {
                Parsed::Skip => break,
                Parsed::Success(param) => params.push(param),
                Parsed::Error(param) => {
                    ok = false;
                    if let Some(param) = param {
                        params.push(param);
                    }
                    self.stream.restart_before(restart);
                }
            }
            if !self.has(TokenTag::Comma) {
                break;
            }
        }
        Parsed::from(ok, params)
    }

    /// param := ident oftype? initexpr?  — but only when the lookahead
    /// confirms a binding; otherwise the element is an expression in
    /// pattern position.
    fn opt_param(&mut self) -> Parsed<NodeId> {
        let binding = self.stream.peek(TokenTag::Ident)
            && (self.stream.peek(TokenTag::Colon)
                || self.stream.peek(TokenTag::Equals)
                || self.stream.peek(TokenTag::Comma)
                || self.stream.peek(TokenTag::FatArrow)
                || self.stream.peek(TokenTag::RParen));
        self.stream.rewind();

        if !binding {
            return self.opt_expr();
        }

        let mut ok = true;
        self.has(TokenTag::Ident);
        let loc = self.previous_loc();
        let name = self.previous_name().unwrap_or(Name::EMPTY);

        let ty = match self.oftype() {
            Parsed::Skip => None,
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                outcome.node()
            }
        };
        let dflt = match self.init_expr() {
            Parsed::Skip => None,
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                outcome.node()
            }
        };

        // Untyped parameters stay inferable here; function signatures
        // reject them separately.
        let ty = ty.unwrap_or_else(|| self.arena.alloc(loc, NodeKind::InferType));
        let id = self.arena.alloc(loc, NodeKind::Param { name, ty, dflt });
        self.set_sym(name, id);
        Parsed::from(ok, id)
    }

    /// typeparam := ident '...'? oftype? inittype?
    fn opt_typeparam(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Ident) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let name = self.previous_name().unwrap_or(Name::EMPTY);
        let is_list = self.has(TokenTag::Ellipsis);
        let mut ok = true;

        let upper = match self.oftype() {
            Parsed::Skip => None,
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                outcome.node()
            }
        };
        let dflt = match self.init_type() {
            Parsed::Skip => None,
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                outcome.node()
            }
        };

        let kind = if is_list {
            NodeKind::TypeParamList { name, upper, dflt }
        } else {
            NodeKind::TypeParam { name, upper, dflt }
        };
        let id = self.arena.alloc(loc, kind);
        self.set_sym(name, id);
        Parsed::from(ok, id)
    }

    /// typeparams := '[' typeparam (',' typeparam)* ']'
    pub(crate) fn opt_typeparams(&mut self) -> Parsed<Vec<NodeId>> {
        if !self.has(TokenTag::LBracket) {
            return Parsed::Skip;
        }

        let mut ok = true;
        let mut typeparams = Vec::new();
        loop {
            match self.opt_typeparam() {
                Parsed::Success(tp) => typeparams.push(tp),
                outcome => {
                    self.expected_here(ErrorCode::E1001, "a type parameter");
                    ok = false;
                    self.stream.restart_before(LIST_BRACKET);
                    if let Some(tp) = outcome.node() {
                        typeparams.push(tp);
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
        Parsed::from(ok, typeparams)
    }

    /// moduledef := 'module' typeparams? oftype? ';'
    ///
    /// At most one per module; a second is reported against the first and
    /// the parser resynchronises past the next `;`.
    pub(crate) fn opt_moduledef(&mut self, moduledef: &mut Option<NodeId>) -> Parsed<NodeId> {
        if !self.has(TokenTag::Module) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();

        if let Some(previous) = *moduledef {
            let previous_loc = self.arena.loc(previous);
            self.error(
                Diagnostic::error(ErrorCode::E1008, "the module has already been defined")
                    .at(loc)
                    .with_label(previous_loc, "the previous definition is here"),
            );
            self.stream
                .restart_after(TokenSet::single(TokenTag::Semicolon));
            return Parsed::Error(None);
        }

        let mut ok = true;
        let module = self.arena.alloc(
            loc,
            NodeKind::Module {
                typeparams: Vec::new(),
                inherits: None,
            },
        );
        *moduledef = Some(module);

        match self.opt_typeparams() {
            Parsed::Skip => {}
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                let typeparams = outcome.node().unwrap_or_default();
                if let NodeKind::Module {
                    typeparams: slot, ..
                } = &mut self.arena.get_mut(module).kind
                {
                    slot.extend(typeparams);
                }
            }
        }

        match self.oftype() {
            Parsed::Skip => {}
            outcome => {
                if outcome.is_err() {
                    ok = false;
                }
                let inherits = outcome.node();
                if let NodeKind::Module { inherits: slot, .. } =
                    &mut self.arena.get_mut(module).kind
                {
                    *slot = inherits;
                }
                if !self.check_inherit(inherits) {
                    ok = false;
                }
            }
        }

        if !self.has(TokenTag::Semicolon) {
            self.expected_here(ErrorCode::E1001, "`;`");
            ok = false;
        }
        Parsed::from(ok, module)
    }
}
