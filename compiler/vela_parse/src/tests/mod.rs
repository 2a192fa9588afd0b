//! Parser unit tests over in-memory sources.

mod items;

use vela_diagnostic::DiagnosticQueue;
use vela_ir::{Kind, Name, NodeId, NodeKind, StringInterner};

use crate::{parse_source, ParseResult};

/// One parsed source plus everything needed to inspect it.
pub(crate) struct Check {
    pub interner: StringInterner,
    pub queue: DiagnosticQueue,
    pub result: ParseResult,
}

pub(crate) fn check(text: &str) -> Check {
    let interner = StringInterner::new();
    let mut queue = DiagnosticQueue::new();
    let result = parse_source(text, &interner, &mut queue);
    Check {
        interner,
        queue,
        result,
    }
}

impl Check {
    pub fn ok(&self) -> bool {
        self.result.ok
    }

    pub fn errors(&self) -> usize {
        self.queue.error_count()
    }

    pub fn kind(&self, id: NodeId) -> Kind {
        self.result.arena.kind(id)
    }

    pub fn name_of(&self, id: NodeId) -> &str {
        self.result
            .arena
            .name(id)
            .map(|name| self.interner.lookup(name))
            .unwrap_or("")
    }

    /// The single module entity under the program root.
    pub fn module(&self) -> NodeId {
        match &self.result.arena.get(self.result.program).kind {
            NodeKind::Class(entity) => entity.members[0],
            _ => panic!("program root is not an entity"),
        }
    }

    pub fn members(&self) -> Vec<NodeId> {
        match &self.result.arena.get(self.module()).kind {
            NodeKind::Class(entity) => entity.members.clone(),
            _ => panic!("module root is not an entity"),
        }
    }

    pub fn member_named(&self, name: &str) -> NodeId {
        let interned: Name = self.interner.intern(name);
        self.members()
            .into_iter()
            .find(|&m| self.result.arena.name(m) == Some(interned))
            .unwrap_or_else(|| panic!("no member named `{name}`"))
    }

    /// Members of an entity node.
    pub fn entity_members(&self, id: NodeId) -> Vec<NodeId> {
        match &self.result.arena.get(id).kind {
            NodeKind::Class(entity) | NodeKind::Interface(entity) => entity.members.clone(),
            _ => panic!("not an entity"),
        }
    }

    pub fn entity_member_named(&self, entity: NodeId, name: &str) -> NodeId {
        let interned: Name = self.interner.intern(name);
        self.entity_members(entity)
            .into_iter()
            .find(|&m| self.result.arena.name(m) == Some(interned))
            .unwrap_or_else(|| panic!("no member named `{name}`"))
    }

    /// The lambda of a function member.
    pub fn func_lambda(&self, func: NodeId) -> NodeId {
        match &self.result.arena.get(func).kind {
            NodeKind::Function { lambda, .. } => *lambda,
            _ => panic!("not a function"),
        }
    }

    pub fn lambda_body(&self, lambda: NodeId) -> Vec<NodeId> {
        match &self.result.arena.get(lambda).kind {
            NodeKind::Lambda(l) => l.body.clone(),
            _ => panic!("not a lambda"),
        }
    }

    pub fn lambda_params(&self, lambda: NodeId) -> Vec<NodeId> {
        match &self.result.arena.get(lambda).kind {
            NodeKind::Lambda(l) => l.params.clone(),
            _ => panic!("not a lambda"),
        }
    }

    pub fn lambda_result(&self, lambda: NodeId) -> Option<NodeId> {
        match &self.result.arena.get(lambda).kind {
            NodeKind::Lambda(l) => l.result,
            _ => panic!("not a lambda"),
        }
    }

    /// Body of the top-level function member `name`.
    pub fn body_of(&self, name: &str) -> Vec<NodeId> {
        let func = self.member_named(name);
        self.lambda_body(self.func_lambda(func))
    }

    /// The field initialiser, unwrapped from its deferring lambda.
    pub fn init_of(&self, field: NodeId) -> Vec<NodeId> {
        match &self.result.arena.get(field).kind {
            NodeKind::Field {
                init: Some(init), ..
            } => self.lambda_body(*init),
            _ => panic!("field has no initialiser"),
        }
    }

    pub fn composite_operands(&self, id: NodeId) -> Vec<NodeId> {
        match &self.result.arena.get(id).kind {
            NodeKind::UnionType { types }
            | NodeKind::IsectType { types }
            | NodeKind::TupleType { types } => types.clone(),
            _ => panic!("not a composite type"),
        }
    }
}

#[test]
fn test_program_shape() {
    let c = check("class Cell {}\n");
    assert!(c.ok());
    assert_eq!(c.kind(c.result.program), Kind::Class);
    assert_eq!(c.kind(c.module()), Kind::Class);
    assert_eq!(c.name_of(c.module()), "$module-0");
    assert_eq!(c.members().len(), 1);
}

#[test]
fn test_parse_twice_is_structurally_equal() {
    let text = "class Cell { x: I32 = 1; f(a: I32): I32 { a } }\n";
    let first = check(text);
    let second = check(text);
    assert_eq!(first.ok(), second.ok());

    let kinds = |c: &Check| -> Vec<Kind> {
        c.entity_members(c.member_named("Cell"))
            .iter()
            .map(|&m| c.kind(m))
            .collect()
    };
    assert_eq!(kinds(&first), kinds(&second));
}

#[test]
fn test_symbol_tables_link_upward() {
    let c = check("class Cell { f(a: I32): I32 { a } }\n");
    assert!(c.ok());
    let cell = c.member_named("Cell");
    let func = c.entity_member_named(cell, "f");
    let lambda = c.func_lambda(func);

    let table = c.result.arena.symbols(lambda).unwrap();
    assert_eq!(table.parent, Some(cell));
    let cell_table = c.result.arena.symbols(cell).unwrap();
    assert_eq!(cell_table.parent, Some(c.module()));

    // Upward lookup sees the class through the lambda.
    let name = c.interner.intern("Cell");
    assert_eq!(c.result.arena.get_scope(lambda, name), Some(cell));
}
