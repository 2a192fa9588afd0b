//! Expression grammar.
//!
//! ```text
//! expr        := exprstart (':' type)? ('=' expr)?
//! exprstart   := 'let' ident | 'var' ident | 'throw' expr | infix
//! infix       := (postfix | selector)+
//! postfix     := postfixstart select*
//! postfixstart:= atom | applysugar
//! select      := '.' selector tuple?
//! applysugar  := ref typeargs? tuple?
//! atom        := tuple | constant | new | when | try | match | lambda
//! ```
//!
//! Infix has a single precedence level: selectors chain left to right, and
//! plain adjacency is an `apply` call.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::{Name, NodeId, NodeKind, SymbolTable, TokenKind, TokenTag};

use crate::outcome::{one_of, Parsed};
use crate::recovery::LIST_PAREN;
use crate::Parser;

impl Parser<'_> {
    /// expr := exprstart (':' type)? ('=' expr)?
    pub(crate) fn opt_expr(&mut self) -> Parsed<NodeId> {
        let start = self.opt_exprstart();
        if start.is_skip() {
            return Parsed::Skip;
        }
        let mut ok = !start.is_err();
        let mut expr = start.node();

        if self.stream.peek(TokenTag::Colon) {
            self.stream.rewind();
            let colon_loc = self.stream.loc();
            let ty = match self.oftype() {
                Parsed::Success(ty) => Some(ty),
                other => {
                    ok = false;
                    other.node()
                }
            };
            let loc = expr
                .map(|e| self.arena.loc(e))
                .unwrap_or(colon_loc)
                .extend(self.previous_loc());
            expr = Some(self.arena.alloc(loc, NodeKind::Oftype { expr, ty }));
        }

        if self.has(TokenTag::Equals) {
            let eq_loc = self.previous_loc();
            let right = match self.opt_expr() {
                Parsed::Success(rhs) => Some(rhs),
                other => {
                    self.expected_here(
                        ErrorCode::E1002,
                        "an expression on the right-hand side",
                    );
                    ok = false;
                    other.node()
                }
            };
            expr = Some(self.arena.alloc(eq_loc, NodeKind::Assign { left: expr, right }));
        }

        match expr {
            Some(expr) => Parsed::from(ok, expr),
            None => Parsed::Error(None),
        }
    }

    /// exprstart := let | var | throw | infix
    fn opt_exprstart(&mut self) -> Parsed<NodeId> {
        one_of!(
            self.opt_let(),
            self.opt_var(),
            self.opt_throw(),
            self.opt_infix(),
        )
    }

    fn opt_let(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Let) {
            return Parsed::Skip;
        }
        self.binding_decl(true)
    }

    fn opt_var(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Var) {
            return Parsed::Skip;
        }
        self.binding_decl(false)
    }

    /// The identifier after `let`/`var`; bound immediately in the current
    /// scope, typed by inference until ascription.
    fn binding_decl(&mut self, is_let: bool) -> Parsed<NodeId> {
        if !self.has(TokenTag::Ident) {
            self.expected_here(ErrorCode::E1004, "an identifier");
            return Parsed::Error(None);
        }
        let loc = self.previous_loc();
        let name = self.previous_name().unwrap_or(Name::EMPTY);
        let ty = self.arena.alloc(loc, NodeKind::InferType);
        let kind = if is_let {
            NodeKind::Let { name, ty }
        } else {
            NodeKind::Var { name, ty }
        };
        let id = self.arena.alloc(loc, kind);
        self.set_sym(name, id);
        Parsed::Success(id)
    }

    fn opt_throw(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Throw) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let (expr, ok) = match self.opt_expr() {
            Parsed::Success(expr) => (Some(expr), true),
            Parsed::Error(expr) => (expr, false),
            Parsed::Skip => {
                self.expected_here(ErrorCode::E1002, "a throw expression");
                (None, false)
            }
        };
        let id = self.arena.alloc(loc, NodeKind::Throw { expr });
        Parsed::from(ok, id)
    }

    /// infix := (postfix | selector)+
    ///
    /// Left-to-right assembly: a selector without arguments takes the next
    /// postfix as its argument (infix operator call); otherwise adjacency
    /// wraps the running expression as `expr.apply(next)`.
    fn opt_infix(&mut self) -> Parsed<NodeId> {
        let mut expr: Option<NodeId> = None;
        let mut ok = true;

        loop {
            let postfix = self.opt_postfix();
            if !postfix.is_skip() {
                // An error inside a postfix was already reported; the
                // partial node still participates in assembly.
                let Some(next) = postfix.node() else { continue };

                match expr {
                    None => expr = Some(next),
                    Some(current) => {
                        let bare_selector = matches!(
                            &self.arena.get(current).kind,
                            NodeKind::Select { args: None, .. }
                        );
                        if bare_selector {
                            self.select_set_args(current, Some(next));
                        } else {
                            expr = Some(self.apply_select(current, Some(next)));
                        }
                    }
                }
                continue;
            }

            match self.opt_selector(expr) {
                Parsed::Skip => break,
                Parsed::Success(sel) => expr = Some(sel),
                Parsed::Error(sel) => {
                    ok = false;
                    if let Some(sel) = sel {
                        expr = Some(sel);
                    }
                }
            }
        }

        match expr {
            None => Parsed::Skip,
            Some(expr) => Parsed::from(ok, expr),
        }
    }

    /// Wrap `expr.apply(args)` with the synthesised `apply` selector.
    fn apply_select(&mut self, expr: NodeId, args: Option<NodeId>) -> NodeId {
        let loc = self.arena.loc(expr);
        let name = self.name_apply;
        let tn = self.arena.alloc(
            loc,
            NodeKind::TypeName {
                name,
                typeargs: Vec::new(),
            },
        );
        let tr = self.arena.alloc(loc, NodeKind::TypeRef { typenames: vec![tn] });
        self.arena.alloc(
            loc,
            NodeKind::Select {
                expr: Some(expr),
                typeref: Some(tr),
                args,
            },
        )
    }

    /// postfix := postfixstart select*
    fn opt_postfix(&mut self) -> Parsed<NodeId> {
        let start = self.opt_postfixstart();
        if start.is_skip() {
            return Parsed::Skip;
        }
        let mut ok = !start.is_err();
        let Some(mut expr) = start.node() else {
            return Parsed::Error(None);
        };

        loop {
            match self.opt_select(expr) {
                Parsed::Skip => break,
                Parsed::Success(sel) => expr = sel,
                Parsed::Error(sel) => {
                    ok = false;
                    if let Some(sel) = sel {
                        expr = sel;
                    }
                }
            }
        }
        Parsed::from(ok, expr)
    }

    fn opt_postfixstart(&mut self) -> Parsed<NodeId> {
        one_of!(self.opt_atom(), self.opt_applysugar())
    }

    fn opt_atom(&mut self) -> Parsed<NodeId> {
        one_of!(
            self.opt_tuple(),
            self.opt_constant(),
            self.opt_new(),
            self.opt_when(),
            self.opt_try(),
            self.opt_match(),
            self.opt_lambda(),
        )
    }

    /// select := '.' selector tuple?
    fn opt_select(&mut self, lhs: NodeId) -> Parsed<NodeId> {
        if !self.has(TokenTag::Dot) {
            return Parsed::Skip;
        }
        let mut ok = true;

        let sel = match self.opt_selector(Some(lhs)) {
            Parsed::Success(sel) => sel,
            outcome => {
                self.expected_here(ErrorCode::E1015, "a selector");
                ok = false;
                match outcome.node() {
                    Some(sel) => sel,
                    None => {
                        let loc = self.stream.loc();
                        self.arena.alloc(
                            loc,
                            NodeKind::Select {
                                expr: Some(lhs),
                                typeref: None,
                                args: None,
                            },
                        )
                    }
                }
            }
        };

        match self.opt_tuple() {
            Parsed::Skip => {}
            Parsed::Success(args) => self.select_set_args(sel, Some(args)),
            Parsed::Error(args) => {
                ok = false;
                self.select_set_args(sel, args);
            }
        }
        Parsed::from(ok, sel)
    }

    /// selector := name typeargs? ('::' name typeargs?)*
    ///
    /// `lhs` becomes the receiver; a leading selector in an expression has
    /// none.
    pub(crate) fn opt_selector(&mut self, lhs: Option<NodeId>) -> Parsed<NodeId> {
        let named = self.stream.peek(TokenTag::Ident) || self.stream.peek(TokenTag::Symbol);
        self.stream.rewind();
        if !named {
            return Parsed::Skip;
        }

        let mut ok = true;
        let typeref = match self.opt_typeref() {
            Parsed::Success(tr) => Some(tr),
            other => {
                ok = false;
                other.node()
            }
        };

        let loc = match typeref {
            Some(tr) => self.arena.loc(tr),
            None => self.stream.loc(),
        };
        let sel = self.arena.alloc(
            loc,
            NodeKind::Select {
                expr: lhs,
                typeref,
                args: None,
            },
        );
        Parsed::from(ok, sel)
    }

    /// applysugar := ref typeargs? tuple?
    ///
    /// Only fires when the identifier is a local; `f[T](x)` then means
    /// `f.apply[T](x)`.
    fn opt_applysugar(&mut self) -> Parsed<NodeId> {
        let reference = match self.opt_ref() {
            Parsed::Skip => return Parsed::Skip,
            outcome => match outcome.node() {
                Some(r) => r,
                None => return Parsed::Error(None),
            },
        };

        let sugared = self.stream.peek(TokenTag::LBracket) || self.stream.peek(TokenTag::LParen);
        self.stream.rewind();
        if !sugared {
            return Parsed::Success(reference);
        }

        let mut ok = true;
        let loc = self.arena.loc(reference);
        let typeargs = match self.opt_typeargs() {
            Parsed::Skip => Vec::new(),
            Parsed::Success(args) => args,
            Parsed::Error(args) => {
                ok = false;
                args.unwrap_or_default()
            }
        };
        let name = self.name_apply;
        let tn = self.arena.alloc(loc, NodeKind::TypeName { name, typeargs });
        let tr = self.arena.alloc(loc, NodeKind::TypeRef { typenames: vec![tn] });

        let args = match self.opt_tuple() {
            Parsed::Skip => None,
            Parsed::Success(args) => Some(args),
            Parsed::Error(args) => {
                ok = false;
                args
            }
        };

        let sel = self.arena.alloc(
            loc,
            NodeKind::Select {
                expr: Some(reference),
                typeref: Some(tr),
                args,
            },
        );
        Parsed::from(ok, sel)
    }

    /// ref := ident, but only when the identifier resolves to a `Param`,
    /// `Let`, or `Var` in the scope stack; anything else stays a selector.
    /// Resolution uses the in-progress scopes, so a forward reference in
    /// the same scope is a selector, not a local.
    fn opt_ref(&mut self) -> Parsed<NodeId> {
        if !self.stream.peek(TokenTag::Ident) {
            return Parsed::Skip;
        }
        let name = match self.stream.peeked().kind {
            TokenKind::Ident(name) => name,
            _ => Name::EMPTY,
        };
        let local = self
            .get_scope_def(name)
            .map(|def| self.arena.kind(def).is_binding())
            .unwrap_or(false);
        self.stream.rewind();

        if !local || !self.has(TokenTag::Ident) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        Parsed::Success(self.arena.alloc(loc, NodeKind::Ref { name }))
    }

    /// tuple := '(' (expr (',' expr)*)? ')'
    ///
    /// `()` is the zero-element tuple; `(x)` is grouping and yields `x`.
    pub(crate) fn opt_tuple(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::LParen) {
            return Parsed::Skip;
        }
        let mut loc = self.previous_loc();

        if self.has(TokenTag::RParen) {
            loc = loc.extend(self.previous_loc());
            return Parsed::Success(self.arena.alloc(loc, NodeKind::Tuple { seq: Vec::new() }));
        }

        let mut ok = true;
        let mut seq = Vec::new();
        loop {
            match self.opt_expr() {
                Parsed::Skip => break,
                Parsed::Success(expr) => seq.push(expr),
                Parsed::Error(expr) => {
                    self.expected_here(ErrorCode::E1002, "an expression");
                    self.stream.restart_before(LIST_PAREN);
                    ok = false;
                    if let Some(expr) = expr {
                        seq.push(expr);
                    }
                }
            }
            if !self.has(TokenTag::Comma) {
                break;
            }
        }

        if !self.has(TokenTag::RParen) {
            self.expected_here(ErrorCode::E1001, "`,` or `)`");
            ok = false;
        }
        loc = loc.extend(self.previous_loc());

        if seq.len() == 1 {
            // Parenthesised grouping, not a tuple.
            return Parsed::from(ok, seq[0]);
        }
        Parsed::from(ok, self.arena.alloc(loc, NodeKind::Tuple { seq }))
    }

    fn opt_constant(&mut self) -> Parsed<NodeId> {
        let kind = if self.has(TokenTag::EscapedString) {
            NodeKind::EscapedString
        } else if self.has(TokenTag::UnescapedString) {
            NodeKind::UnescapedString
        } else if self.has(TokenTag::Character) {
            NodeKind::Character
        } else if self.has(TokenTag::Int) {
            NodeKind::Int
        } else if self.has(TokenTag::Float) {
            NodeKind::Float
        } else if self.has(TokenTag::Hex) {
            NodeKind::Hex
        } else if self.has(TokenTag::Binary) {
            NodeKind::Binary
        } else if self.has(TokenTag::Bool) {
            NodeKind::Bool
        } else {
            return Parsed::Skip;
        };
        Parsed::Success(self.arena.alloc(self.previous_loc(), kind))
    }

    /// new := 'new' ('@' ident)? (tuple | typebody | typeexpr typebody)
    fn opt_new(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::New) {
            return Parsed::Skip;
        }

        // A constructor call has an argument tuple, optionally after a
        // region annotation; everything else is an object literal.
        let ctor = self.stream.peek(TokenTag::LParen)
            || (self.stream.peek(TokenTag::At)
                && self.stream.peek(TokenTag::Ident)
                && self.stream.peek(TokenTag::LParen));
        self.stream.rewind();

        if !ctor {
            return self.object_literal();
        }

        let loc = self.previous_loc();
        let mut ok = true;
        let mut region = None;
        if self.has(TokenTag::At) {
            if self.has(TokenTag::Ident) {
                region = self.previous_name();
            } else {
                self.expected_here(ErrorCode::E1004, "an identifier");
                ok = false;
            }
        }

        let args = match self.opt_tuple() {
            Parsed::Success(args) => Some(args),
            other => {
                ok = false;
                other.node()
            }
        };
        let id = self.arena.alloc(loc, NodeKind::New { args, region });
        Parsed::from(ok, id)
    }

    /// The `new`-with-body form; `new` is already consumed.
    fn object_literal(&mut self) -> Parsed<NodeId> {
        let loc = self.previous_loc();
        let obj = self.arena.alloc(
            loc,
            NodeKind::ObjectLiteral {
                inherits: None,
                members: Vec::new(),
                region: None,
                symbols: SymbolTable::new(),
            },
        );
        self.in_scope(obj, |p| p.object_literal_inner(obj))
    }

    fn object_literal_inner(&mut self, obj: NodeId) -> Parsed<NodeId> {
        let mut ok = true;

        if self.has(TokenTag::At) {
            if self.has(TokenTag::Ident) {
                let region = self.previous_name();
                if let NodeKind::ObjectLiteral { region: slot, .. } =
                    &mut self.arena.get_mut(obj).kind
                {
                    *slot = region;
                }
            } else {
                self.expected_here(ErrorCode::E1004, "an identifier");
                ok = false;
            }
        }

        let has_inherits = !self.stream.peek(TokenTag::LBrace);
        self.stream.rewind();
        if has_inherits {
            let inherits = match self.typeexpr() {
                Parsed::Success(ty) => Some(ty),
                other => {
                    ok = false;
                    other.node()
                }
            };
            if let NodeKind::ObjectLiteral { inherits: slot, .. } =
                &mut self.arena.get_mut(obj).kind
            {
                *slot = inherits;
            }
            if !self.check_inherit(inherits) {
                ok = false;
            }
        }

        let members = match self.typebody() {
            Parsed::Success(members) => members,
            other => {
                ok = false;
                other.node().unwrap_or_default()
            }
        };
        if let NodeKind::ObjectLiteral { members: slot, .. } = &mut self.arena.get_mut(obj).kind {
            *slot = members;
        }

        Parsed::from(ok, obj)
    }

    /// when := 'when' postfix lambda
    fn opt_when(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::When) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let mut ok = true;

        let waitfor = match self.opt_postfix() {
            Parsed::Success(expr) => Some(expr),
            other => {
                self.expected_here(ErrorCode::E1002, "a when condition");
                ok = false;
                other.node()
            }
        };
        let behaviour = match self.opt_lambda() {
            Parsed::Success(body) => Some(body),
            other => {
                self.expected_here(ErrorCode::E1002, "a when body");
                ok = false;
                other.node()
            }
        };

        let id = self.arena.alloc(loc, NodeKind::When { waitfor, behaviour });
        Parsed::from(ok, id)
    }

    /// try := 'try' lambda 'catch' '{' lambda* '}'
    fn opt_try(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Try) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let mut ok = true;

        let body = match self.opt_lambda() {
            Parsed::Success(body) => Some(body),
            other => {
                self.expected_here(ErrorCode::E1002, "a try block");
                ok = false;
                other.node()
            }
        };

        // The body is a bare block: a signature belongs to the function,
        // not the try.
        if let Some(body) = body {
            let (first_typeparam, first_param) = match &self.arena.get(body).kind {
                NodeKind::Lambda(lambda) => (
                    lambda.typeparams.first().copied(),
                    lambda.params.first().copied(),
                ),
                _ => (None, None),
            };
            if let Some(tp) = first_typeparam {
                let tp_loc = self.arena.loc(tp);
                self.error(
                    Diagnostic::error(
                        ErrorCode::E1014,
                        "a try block can't have type parameters",
                    )
                    .at(tp_loc),
                );
                ok = false;
            }
            if let Some(param) = first_param {
                let param_loc = self.arena.loc(param);
                self.error(
                    Diagnostic::error(ErrorCode::E1014, "a try block can't have parameters")
                        .at(param_loc),
                );
                ok = false;
            }
        }

        let mut catches = Vec::new();
        if !self.has(TokenTag::Catch) {
            self.expected_here(ErrorCode::E1001, "`catch`");
            let id = self.arena.alloc(loc, NodeKind::Try { body, catches });
            return Parsed::Error(Some(id));
        }
        if !self.has(TokenTag::LBrace) {
            self.expected_here(ErrorCode::E1001, "`{`");
            let id = self.arena.alloc(loc, NodeKind::Try { body, catches });
            return Parsed::Error(Some(id));
        }

        loop {
            match self.opt_lambda() {
                Parsed::Skip => break,
                Parsed::Success(clause) => catches.push(clause),
                Parsed::Error(clause) => {
                    ok = false;
                    if let Some(clause) = clause {
                        catches.push(clause);
                    }
                }
            }
        }

        if !self.has(TokenTag::RBrace) {
            self.expected_here(ErrorCode::E1001, "`}`");
            let id = self.arena.alloc(loc, NodeKind::Try { body, catches });
            return Parsed::Error(Some(id));
        }

        let id = self.arena.alloc(loc, NodeKind::Try { body, catches });
        Parsed::from(ok, id)
    }

    /// match := 'match' postfix '{' lambda* '}'
    fn opt_match(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Match) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let mut ok = true;

        let test = match self.opt_postfix() {
            Parsed::Success(expr) => Some(expr),
            other => {
                self.expected_here(ErrorCode::E1002, "a match test-expression");
                ok = false;
                other.node()
            }
        };

        let mut cases = Vec::new();
        if !self.has(TokenTag::LBrace) {
            self.expected_here(ErrorCode::E1001, "`{` to start match cases");
            let id = self.arena.alloc(loc, NodeKind::Match { test, cases });
            return Parsed::Error(Some(id));
        }

        loop {
            if self.has(TokenTag::RBrace) {
                break;
            }
            if self.has(TokenTag::End) {
                self.expected_here(ErrorCode::E1006, "a case or `}` to end match cases");
                ok = false;
                break;
            }
            match self.opt_lambda() {
                Parsed::Skip => break,
                Parsed::Success(case) => cases.push(case),
                Parsed::Error(case) => {
                    ok = false;
                    if let Some(case) = case {
                        cases.push(case);
                    }
                }
            }
        }

        let id = self.arena.alloc(loc, NodeKind::Match { test, cases });
        Parsed::from(ok, id)
    }

    /// lambda := '{' (typeparams? (param (',' param)*)? '=>')? (expr ';'*)* '}'
    pub(crate) fn opt_lambda(&mut self) -> Parsed<NodeId> {
        self.lambda(None)
    }

    /// Parse a function body into the lambda that already holds the
    /// signature.
    pub(crate) fn opt_lambda_body(&mut self, lambda: NodeId) -> Parsed<NodeId> {
        self.lambda(Some(lambda))
    }

    fn lambda(&mut self, func: Option<NodeId>) -> Parsed<NodeId> {
        if !self.has(TokenTag::LBrace) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let is_func = func.is_some();
        let lambda = match func {
            Some(id) => id,
            None => self.alloc_lambda(loc),
        };
        self.arena.get_mut(lambda).loc = loc;

        self.in_scope(lambda, |p| p.lambda_inner(lambda, is_func))
    }

    fn lambda_inner(&mut self, lambda: NodeId, is_func: bool) -> Parsed<NodeId> {
        let typeparams = self.opt_typeparams();
        let mut ok = !typeparams.is_err();
        let had_typeparams = !typeparams.is_skip();

        if let Some(typeparams) = match typeparams {
            Parsed::Skip => None,
            outcome => outcome.node(),
        } {
            if is_func {
                let at = match typeparams.last() {
                    Some(&tp) => self.arena.loc(tp),
                    None => self.stream.loc(),
                };
                self.error(
                    Diagnostic::error(
                        ErrorCode::E1012,
                        "function type parameters can't be placed in lambda position",
                    )
                    .at(at),
                );
            }
            self.lambda_mut(lambda).typeparams.extend(typeparams);
        }

        // `{` may open a parameter list or a bare body: scan ahead for a
        // `=>` before the matching `}` to decide.
        let has_fatarrow = if had_typeparams {
            true
        } else {
            let found = self.stream.peek_delimited(TokenTag::FatArrow, TokenTag::RBrace);
            self.stream.rewind();
            found
        };

        if has_fatarrow {
            let params = self.opt_paramlist(TokenTag::FatArrow);
            if params.is_err() {
                ok = false;
            }
            let params = params.node().unwrap_or_default();
            if is_func {
                let at = match params.last() {
                    Some(&param) => self.arena.loc(param),
                    None => self.stream.loc(),
                };
                self.error(
                    Diagnostic::error(
                        ErrorCode::E1012,
                        "function parameters can't be placed in lambda position",
                    )
                    .at(at),
                );
            }
            self.lambda_mut(lambda).params.extend(params);

            if !self.has(TokenTag::FatArrow) {
                self.expected_here(ErrorCode::E1001, "`=>`");
                ok = false;
            }
        }

        loop {
            if self.has(TokenTag::RBrace) {
                break;
            }
            if self.has(TokenTag::End) {
                let at = self.arena.loc(lambda);
                self.error(
                    Diagnostic::error(ErrorCode::E1006, "unexpected end of file in lambda body")
                        .at(at),
                );
                return Parsed::Error(Some(lambda));
            }

            match self.opt_expr() {
                Parsed::Skip => break,
                Parsed::Success(expr) => self.lambda_mut(lambda).body.push(expr),
                Parsed::Error(expr) => {
                    ok = false;
                    if let Some(expr) = expr {
                        self.lambda_mut(lambda).body.push(expr);
                    }
                }
            }

            while self.has(TokenTag::Semicolon) {}
        }

        Parsed::from(ok, lambda)
    }

    /// initexpr := '=' expr
    ///
    /// The initialiser is wrapped as a zero-argument lambda so evaluation
    /// is deferred to construction.
    pub(crate) fn init_expr(&mut self) -> Parsed<NodeId> {
        if !self.has(TokenTag::Equals) {
            return Parsed::Skip;
        }
        let loc = self.previous_loc();
        let lambda = self.alloc_lambda(loc);

        let outcome = self.in_scope(lambda, |p| p.opt_expr());

        let ok = match outcome {
            Parsed::Skip => {
                self.expected_here(ErrorCode::E1002, "an initialiser expression");
                false
            }
            Parsed::Success(init) => {
                self.lambda_mut(lambda).body.push(init);
                true
            }
            Parsed::Error(init) => {
                if let Some(init) = init {
                    self.lambda_mut(lambda).body.push(init);
                }
                false
            }
        };
        Parsed::from(ok, lambda)
    }
}
