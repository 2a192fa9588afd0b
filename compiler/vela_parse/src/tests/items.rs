//! Member and module-level parsing tests.

use vela_ir::{Kind, NodeKind};

use super::check;

#[test]
fn test_trivial_create_synthesised() {
    let c = check("class C { x: I32 = 1; y: I32 = 2; }\n");
    assert!(c.ok());
    let class = c.member_named("C");
    let members = c.entity_members(class);
    assert_eq!(members.len(), 3);

    let create = c.entity_member_named(class, "create");
    assert_eq!(c.kind(create), Kind::Function);

    // create(): C & iso = { new }
    let lambda = c.func_lambda(create);
    let result = c.lambda_result(lambda).unwrap();
    assert_eq!(c.kind(result), Kind::IsectType);
    let operands = c.composite_operands(result);
    assert_eq!(operands.len(), 2);
    assert_eq!(c.kind(operands[0]), Kind::TypeRef);
    assert_eq!(c.kind(operands[1]), Kind::Iso);

    let body = c.lambda_body(lambda);
    assert_eq!(body.len(), 1);
    assert_eq!(c.kind(body[0]), Kind::New);

    // The synthetic member is also in the class's symbol table.
    let name = c.interner.intern("create");
    assert_eq!(
        c.result.arena.symbols(class).unwrap().get(name),
        Some(create)
    );
}

#[test]
fn test_no_create_without_initialiser() {
    let c = check("class C { x: I32; }\n");
    assert!(c.ok());
    let class = c.member_named("C");
    assert_eq!(c.entity_members(class).len(), 1);
    let name = c.interner.intern("create");
    assert!(c.result.arena.symbols(class).unwrap().get(name).is_none());
}

#[test]
fn test_empty_class_gets_create() {
    let c = check("class C {}\n");
    assert!(c.ok());
    let class = c.member_named("C");
    let members = c.entity_members(class);
    assert_eq!(members.len(), 1);
    assert_eq!(c.name_of(members[0]), "create");
}

#[test]
fn test_explicit_create_is_kept() {
    let c = check("class C { create(): C { new () } }\n");
    assert!(c.ok());
    let class = c.member_named("C");
    let members = c.entity_members(class);
    assert_eq!(members.len(), 1);
}

#[test]
fn test_create_forwards_typeparams() {
    let c = check("class C[T, U...] {}\n");
    assert!(c.ok());
    let class = c.member_named("C");
    let create = c.entity_member_named(class, "create");
    let result = c.lambda_result(c.func_lambda(create)).unwrap();
    let operands = c.composite_operands(result);

    // C[T, U...] & iso — the plain parameter becomes a reference, the
    // list becomes a type list.
    let typeref = operands[0];
    let tn = match &c.result.arena.get(typeref).kind {
        NodeKind::TypeRef { typenames } => typenames[0],
        _ => panic!("expected a type reference"),
    };
    match &c.result.arena.get(tn).kind {
        NodeKind::TypeName { typeargs, .. } => {
            assert_eq!(typeargs.len(), 2);
            assert_eq!(c.kind(typeargs[0]), Kind::TypeRef);
            assert_eq!(c.kind(typeargs[1]), Kind::TypeList);
        }
        _ => panic!("expected a type name"),
    }
}

#[test]
fn test_typealias_dnf() {
    let c = check("type T = A | B & C;\n");
    assert!(c.ok());
    let alias = c.member_named("T");
    assert_eq!(c.kind(alias), Kind::TypeAlias);

    let aliased = match &c.result.arena.get(alias).kind {
        NodeKind::TypeAlias { inherits, .. } => inherits.unwrap(),
        _ => unreachable!(),
    };
    assert_eq!(c.kind(aliased), Kind::UnionType);
    let operands = c.composite_operands(aliased);
    assert_eq!(operands.len(), 2);
    assert_eq!(c.kind(operands[0]), Kind::TypeRef);
    assert_eq!(c.kind(operands[1]), Kind::IsectType);
}

#[test]
fn test_throw_type_distributes() {
    let c = check("type T = throw (A | B);\n");
    assert!(c.ok());
    let alias = c.member_named("T");
    let aliased = match &c.result.arena.get(alias).kind {
        NodeKind::TypeAlias { inherits, .. } => inherits.unwrap(),
        _ => unreachable!(),
    };
    assert_eq!(c.kind(aliased), Kind::UnionType);
    for operand in c.composite_operands(aliased) {
        assert_eq!(c.kind(operand), Kind::ThrowType);
    }
}

#[test]
fn test_duplicate_field_keeps_first() {
    let c = check("class C { x: I32; x: F64; }\n");
    assert!(!c.ok());
    assert_eq!(c.errors(), 1);

    let diagnostic = c.queue.iter().next().unwrap();
    assert!(diagnostic.message.contains("previous definition"));
    assert_eq!(diagnostic.labels.len(), 1);

    // Both fields are in the tree; the table keeps the first.
    let class = c.member_named("C");
    let members = c.entity_members(class);
    assert_eq!(members.len(), 2);
    let name = c.interner.intern("x");
    assert_eq!(
        c.result.arena.symbols(class).unwrap().get(name),
        Some(members[0])
    );
}

#[test]
fn test_duplicate_moduledef() {
    let c = check("module;\nmodule;\nclass C {}\n");
    assert!(!c.ok());
    let diagnostic = c.queue.iter().next().unwrap();
    assert!(diagnostic.message.contains("already been defined"));
    // Parsing continued past the duplicate.
    assert_eq!(c.members().len(), 1);
}

#[test]
fn test_moduledef_applies_to_module_entity() {
    let c = check("module [T]: Base;\nclass Base {}\n");
    assert!(c.ok());
    let module = c.module();
    match &c.result.arena.get(module).kind {
        NodeKind::Class(entity) => {
            assert_eq!(entity.typeparams.len(), 1);
            assert_eq!(c.kind(entity.inherits.unwrap()), Kind::TypeRef);
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_function_member() {
    let c = check("class C { f(a: I32): I32 { a } }\n");
    assert!(c.ok());
    let class = c.member_named("C");
    let func = c.entity_member_named(class, "f");
    let lambda = c.func_lambda(func);
    assert_eq!(c.lambda_params(lambda).len(), 1);
    assert_eq!(c.kind(c.lambda_result(lambda).unwrap()), Kind::TypeRef);
    assert_eq!(c.lambda_body(lambda).len(), 1);
}

#[test]
fn test_unnamed_function_is_apply() {
    let c = check("class C { (x: I32) { x } }\n");
    assert!(c.ok());
    let class = c.member_named("C");
    let func = c.entity_member_named(class, "apply");
    assert_eq!(c.kind(func), Kind::Function);
}

#[test]
fn test_symbolic_function_name() {
    let c = check("class C { + (a: I32): I32; }\n");
    assert!(c.ok());
    let class = c.member_named("C");
    let func = c.entity_member_named(class, "+");
    // Declaration only: no body lambda content.
    assert!(c.lambda_body(c.func_lambda(func)).is_empty());
}

#[test]
fn test_function_params_need_types() {
    let c = check("class C { f(a) { a } }\n");
    assert!(!c.ok());
    assert!(c
        .queue
        .iter()
        .any(|d| d.message.contains("must have types")));
}

#[test]
fn test_function_params_reject_patterns() {
    let c = check("class C { f(1); }\n");
    assert!(!c.ok());
    assert!(c
        .queue
        .iter()
        .any(|d| d.message.contains("can't be patterns")));
}

#[test]
fn test_lambda_position_signature_rejected() {
    let c = check("class C { f(a: I32) { x: I32 => x } }\n");
    assert!(!c.ok());
    assert!(c
        .queue
        .iter()
        .any(|d| d.message.contains("lambda position")));
}

#[test]
fn test_using_directive() {
    let c = check("using Foo::Bar;\n");
    assert!(c.ok());
    let using = c.members()[0];
    assert_eq!(c.kind(using), Kind::Using);
    match &c.result.arena.get(using).kind {
        NodeKind::Using {
            typeref: Some(typeref),
        } => match &c.result.arena.get(*typeref).kind {
            NodeKind::TypeRef { typenames } => assert_eq!(typenames.len(), 2),
            _ => panic!("expected a type reference"),
        },
        _ => panic!("using lost its type reference"),
    }
}

#[test]
fn test_inherit_must_be_reference() {
    let c = check("class C: iso {}\n");
    assert!(!c.ok());
    assert!(c.queue.iter().any(|d| d.message.contains("inherit")));
}

#[test]
fn test_inherit_isect_of_references() {
    let c = check("interface I {}\nclass B {}\nclass C: B & I {}\n");
    assert!(c.ok());
}

#[test]
fn test_interface() {
    let c = check("interface Stream { next(): I32; }\n");
    assert!(c.ok());
    let interface = c.member_named("Stream");
    assert_eq!(c.kind(interface), Kind::Interface);
    // Interfaces never synthesise `create`.
    assert_eq!(c.entity_members(interface).len(), 1);
}

#[test]
fn test_duplicate_class_reported() {
    let c = check("class C {}\nclass C {}\n");
    assert!(!c.ok());
    assert_eq!(c.errors(), 1);
}

#[test]
fn test_recovers_after_bad_member() {
    let c = check("class C { 123 x: I32; }\n");
    assert!(!c.ok());
    let class = c.member_named("C");
    // The garbage is skipped and the field still parses.
    let name = c.interner.intern("x");
    assert!(c.result.arena.symbols(class).unwrap().get(name).is_some());
}

#[test]
fn test_parse_continues_after_broken_entity() {
    let c = check("class C: iso {}\nclass D {}\n");
    assert!(!c.ok());
    assert_eq!(c.kind(c.member_named("D")), Kind::Class);
}

#[test]
fn test_unclosed_body_reports_eof() {
    let c = check("class C {\n");
    assert!(!c.ok());
}

#[test]
fn test_field_without_semicolon_recovers() {
    let c = check("class C { x: I32 }\n");
    assert!(!c.ok());
    // The field itself survives.
    let class = c.member_named("C");
    assert_eq!(c.entity_members(class).len(), 1);
}
