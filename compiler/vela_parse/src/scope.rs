//! The lexical scope stack.
//!
//! Pushing a scope links the node's symbol table to the enclosing scope and
//! makes it current; every push is paired with a pop. Most constructs use
//! [`Parser::in_scope`], which guarantees the pop on all exit paths.
//! Functions use the explicit pair instead: their lambda scope closes after
//! the signature and reopens when the body parses.

use vela_diagnostic::{Diagnostic, ErrorCode};
use vela_ir::{Name, NodeId};

use crate::Parser;

impl Parser<'_> {
    /// Make `node` the current scope, linking its table upward.
    pub(crate) fn push_scope(&mut self, node: NodeId) {
        let parent = self.scopes.last().copied();
        let table = self
            .arena
            .symbols_mut(node)
            .expect("scope node must carry a symbol table");
        table.parent = parent;
        self.scopes.push(node);
    }

    /// Unlink the current scope.
    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Run `f` with `node` as the current scope, popping on every exit path.
    pub(crate) fn in_scope<T>(&mut self, node: NodeId, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push_scope(node);
        let result = f(self);
        self.pop_scope();
        result
    }

    pub(crate) fn current_scope(&self) -> NodeId {
        *self
            .scopes
            .last()
            .expect("parsing always happens inside a scope")
    }

    /// Insert a definition into the current scope. A duplicate reports a
    /// dual-location error and leaves the first definition in place.
    pub(crate) fn set_sym(&mut self, name: Name, node: NodeId) {
        let scope = self.current_scope();
        let result = self
            .arena
            .symbols_mut(scope)
            .expect("current scope has a symbol table")
            .set(name, node);

        if let Err(previous) = result {
            let loc = self.arena.loc(node);
            let previous_loc = self.arena.loc(previous);
            let text = self.interner.lookup(name);
            self.error(
                Diagnostic::error(
                    ErrorCode::E1007,
                    format!("there is a previous definition of `{text}`"),
                )
                .at(loc)
                .with_label(previous_loc, "the previous definition is here"),
            );
        }
    }

    /// Resolve a name by walking from the current scope upward.
    pub(crate) fn get_scope_def(&self, name: Name) -> Option<NodeId> {
        self.arena.get_scope(self.current_scope(), name)
    }
}
