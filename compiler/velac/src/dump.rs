//! Indented program-tree outline.

use std::io::{self, Write};

use vela_ir::{NodeId, NodeKind, StringInterner};
use vela_parse::ParseResult;

pub fn dump<W: Write>(out: &mut W, result: &ParseResult, interner: &StringInterner) -> io::Result<()> {
    node(out, result, interner, result.program, 0)
}

fn node<W: Write>(
    out: &mut W,
    result: &ParseResult,
    interner: &StringInterner,
    id: NodeId,
    depth: usize,
) -> io::Result<()> {
    let arena = &result.arena;
    let indent = "  ".repeat(depth);
    let kind = arena.kind(id);
    let loc = arena.loc(id);

    write!(out, "{indent}{kind:?}")?;
    if let Some(name) = arena.name(id) {
        let text = interner.lookup(name);
        if !text.is_empty() {
            write!(out, " `{text}`")?;
        }
    }
    writeln!(out, " @ {:?}", loc.span)?;

    for child in children(arena, id) {
        node(out, result, interner, child, depth + 1)?;
    }
    Ok(())
}

/// Children in source order.
fn children(arena: &vela_ir::Arena, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut push = |slot: Option<NodeId>, out: &mut Vec<NodeId>| {
        if let Some(id) = slot {
            out.push(id);
        }
    };

    match &arena.get(id).kind {
        NodeKind::Class(entity) | NodeKind::Interface(entity) => {
            out.extend(&entity.typeparams);
            push(entity.inherits, &mut out);
            out.extend(&entity.members);
        }
        NodeKind::TypeAlias {
            typeparams,
            inherits,
            ..
        } => {
            out.extend(typeparams);
            push(*inherits, &mut out);
        }
        NodeKind::Using { typeref } => push(*typeref, &mut out),
        NodeKind::Field { ty, init, .. } => {
            push(*ty, &mut out);
            push(*init, &mut out);
        }
        NodeKind::Function { lambda, .. } => out.push(*lambda),
        NodeKind::Module {
            typeparams,
            inherits,
        } => {
            out.extend(typeparams);
            push(*inherits, &mut out);
        }
        NodeKind::Param { ty, dflt, .. } => {
            out.push(*ty);
            push(*dflt, &mut out);
        }
        NodeKind::Let { ty, .. } | NodeKind::Var { ty, .. } => out.push(*ty),
        NodeKind::TypeParam { upper, dflt, .. } | NodeKind::TypeParamList { upper, dflt, .. } => {
            push(*upper, &mut out);
            push(*dflt, &mut out);
        }
        NodeKind::TypeRef { typenames } => out.extend(typenames),
        NodeKind::TypeName { typeargs, .. } | NodeKind::ModuleName { typeargs, .. } => {
            out.extend(typeargs);
        }
        NodeKind::TupleType { types }
        | NodeKind::IsectType { types }
        | NodeKind::UnionType { types } => out.extend(types),
        NodeKind::ViewType { left, right }
        | NodeKind::ExtractType { left, right }
        | NodeKind::FunctionType { left, right } => {
            out.push(*left);
            out.push(*right);
        }
        NodeKind::ThrowType { ty } => out.push(*ty),
        NodeKind::Tuple { seq } => out.extend(seq),
        NodeKind::Select {
            expr,
            typeref,
            args,
        } => {
            push(*expr, &mut out);
            push(*typeref, &mut out);
            push(*args, &mut out);
        }
        NodeKind::Lambda(lambda) => {
            out.extend(&lambda.typeparams);
            out.extend(&lambda.params);
            push(lambda.result, &mut out);
            out.extend(&lambda.body);
        }
        NodeKind::When { waitfor, behaviour } => {
            push(*waitfor, &mut out);
            push(*behaviour, &mut out);
        }
        NodeKind::Try { body, catches } => {
            push(*body, &mut out);
            out.extend(catches);
        }
        NodeKind::Match { test, cases } => {
            push(*test, &mut out);
            out.extend(cases);
        }
        NodeKind::New { args, .. } => push(*args, &mut out),
        NodeKind::ObjectLiteral {
            inherits, members, ..
        } => {
            push(*inherits, &mut out);
            out.extend(members);
        }
        NodeKind::Throw { expr } => push(*expr, &mut out),
        NodeKind::Assign { left, right } => {
            push(*left, &mut out);
            push(*right, &mut out);
        }
        NodeKind::Oftype { expr, ty } => {
            push(*expr, &mut out);
            push(*ty, &mut out);
        }
        NodeKind::Iso
        | NodeKind::Mut
        | NodeKind::Imm
        | NodeKind::SelfType
        | NodeKind::TypeList { .. }
        | NodeKind::InferType
        | NodeKind::Ref { .. }
        | NodeKind::Int
        | NodeKind::Float
        | NodeKind::Hex
        | NodeKind::Binary
        | NodeKind::Bool
        | NodeKind::Character
        | NodeKind::EscapedString
        | NodeKind::UnescapedString => {}
    }
    out
}
