//! Disjunctive normal form for composite types.
//!
//! The three constructors keep every union/intersection/throw the parser
//! builds in DNF: a union of intersections, with `throw` never above `|`.
//! Nested unions and intersections are flattened as they are combined, and
//! structurally equal operands appear once. Operand order is preserved left
//! to right, so downstream equality must either compare in order or sort.

use vela_ir::{Arena, Loc, NodeId, NodeKind};

/// Build `left & right` in DNF.
///
/// When either side is a union, the intersection distributes over it:
/// `A & (B | C)` becomes `(A & B) | (A & C)`.
pub fn conjunction(arena: &mut Arena, left: NodeId, right: NodeId) -> NodeId {
    let loc = enclosing(arena, left, right);
    let left_parts = union_parts(arena, left);
    let right_parts = union_parts(arena, right);

    if left_parts.len() == 1 && right_parts.len() == 1 {
        return isect(arena, left_parts[0], right_parts[0]);
    }

    let mut terms = Vec::with_capacity(left_parts.len() * right_parts.len());
    for &l in &left_parts {
        for &r in &right_parts {
            let term = isect(arena, l, r);
            if !terms.iter().any(|&t| same_type(arena, t, term)) {
                terms.push(term);
            }
        }
    }

    if terms.len() == 1 {
        terms[0]
    } else {
        arena.alloc(loc, NodeKind::UnionType { types: terms })
    }
}

/// Build `left | right`, flattening nested unions.
pub fn disjunction(arena: &mut Arena, left: NodeId, right: NodeId) -> NodeId {
    let loc = enclosing(arena, left, right);
    let mut types = union_parts(arena, left);
    for part in union_parts(arena, right) {
        if !types.iter().any(|&t| same_type(arena, t, part)) {
            types.push(part);
        }
    }

    if types.len() == 1 {
        types[0]
    } else {
        arena.alloc(loc, NodeKind::UnionType { types })
    }
}

/// Wrap `ty` as a throw type, distributing over a top-level union:
/// `throw (A | B)` becomes `throw A | throw B`.
pub fn throwtype(arena: &mut Arena, ty: NodeId) -> NodeId {
    let loc = arena.loc(ty);
    let parts = union_parts(arena, ty);

    if parts.len() == 1 {
        return arena.alloc(loc, NodeKind::ThrowType { ty: parts[0] });
    }

    let mut wrapped = Vec::with_capacity(parts.len());
    for part in parts {
        let part_loc = arena.loc(part);
        wrapped.push(arena.alloc(part_loc, NodeKind::ThrowType { ty: part }));
    }
    arena.alloc(loc, NodeKind::UnionType { types: wrapped })
}

fn enclosing(arena: &Arena, a: NodeId, b: NodeId) -> Loc {
    arena.loc(a).range(arena.loc(b))
}

fn union_parts(arena: &Arena, id: NodeId) -> Vec<NodeId> {
    match &arena.get(id).kind {
        NodeKind::UnionType { types } => types.clone(),
        _ => vec![id],
    }
}

fn isect_parts(arena: &Arena, id: NodeId) -> Vec<NodeId> {
    match &arena.get(id).kind {
        NodeKind::IsectType { types } => types.clone(),
        _ => vec![id],
    }
}

/// Intersection of two non-union operands, flattened and deduplicated.
fn isect(arena: &mut Arena, a: NodeId, b: NodeId) -> NodeId {
    let loc = enclosing(arena, a, b);
    let mut types = isect_parts(arena, a);
    for part in isect_parts(arena, b) {
        if !types.iter().any(|&t| same_type(arena, t, part)) {
            types.push(part);
        }
    }

    if types.len() == 1 {
        types[0]
    } else {
        arena.alloc(loc, NodeKind::IsectType { types })
    }
}

/// Structural equality of type nodes; operand order matters.
pub(crate) fn same_type(arena: &Arena, a: NodeId, b: NodeId) -> bool {
    if a == b {
        return true;
    }
    match (&arena.get(a).kind, &arena.get(b).kind) {
        (NodeKind::Iso, NodeKind::Iso)
        | (NodeKind::Mut, NodeKind::Mut)
        | (NodeKind::Imm, NodeKind::Imm)
        | (NodeKind::SelfType, NodeKind::SelfType)
        | (NodeKind::InferType, NodeKind::InferType) => true,
        (NodeKind::TypeList { name: a }, NodeKind::TypeList { name: b }) => a == b,
        (
            NodeKind::TypeName {
                name: a,
                typeargs: aa,
            },
            NodeKind::TypeName {
                name: b,
                typeargs: ba,
            },
        )
        | (
            NodeKind::ModuleName {
                name: a,
                typeargs: aa,
            },
            NodeKind::ModuleName {
                name: b,
                typeargs: ba,
            },
        ) => a == b && same_list(arena, aa, ba),
        (NodeKind::TypeRef { typenames: a }, NodeKind::TypeRef { typenames: b })
        | (NodeKind::TupleType { types: a }, NodeKind::TupleType { types: b })
        | (NodeKind::IsectType { types: a }, NodeKind::IsectType { types: b })
        | (NodeKind::UnionType { types: a }, NodeKind::UnionType { types: b }) => {
            same_list(arena, a, b)
        }
        (
            NodeKind::ViewType { left: al, right: ar },
            NodeKind::ViewType { left: bl, right: br },
        )
        | (
            NodeKind::ExtractType { left: al, right: ar },
            NodeKind::ExtractType { left: bl, right: br },
        )
        | (
            NodeKind::FunctionType { left: al, right: ar },
            NodeKind::FunctionType { left: bl, right: br },
        ) => same_type(arena, *al, *bl) && same_type(arena, *ar, *br),
        (NodeKind::ThrowType { ty: a }, NodeKind::ThrowType { ty: b }) => {
            same_type(arena, *a, *b)
        }
        _ => false,
    }
}

fn same_list(arena: &Arena, a: &[NodeId], b: &[NodeId]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| same_type(arena, x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::{Kind, Name, StringInterner};

    struct Builder {
        arena: Arena,
        interner: StringInterner,
    }

    impl Builder {
        fn new() -> Self {
            Builder {
                arena: Arena::new(),
                interner: StringInterner::new(),
            }
        }

        fn named(&mut self, name: &str) -> NodeId {
            let name: Name = self.interner.intern(name);
            let tn = self.arena.alloc(
                Loc::DUMMY,
                NodeKind::TypeName {
                    name,
                    typeargs: Vec::new(),
                },
            );
            self.arena
                .alloc(Loc::DUMMY, NodeKind::TypeRef { typenames: vec![tn] })
        }

        fn operands(&self, id: NodeId) -> Vec<NodeId> {
            match &self.arena.get(id).kind {
                NodeKind::UnionType { types } | NodeKind::IsectType { types } => types.clone(),
                _ => panic!("expected a composite type"),
            }
        }
    }

    #[test]
    fn test_simple_conjunction() {
        let mut b = Builder::new();
        let a = b.named("A");
        let c = b.named("B");
        let isect = conjunction(&mut b.arena, a, c);
        assert_eq!(b.arena.kind(isect), Kind::IsectType);
        assert_eq!(b.operands(isect), vec![a, c]);
    }

    #[test]
    fn test_conjunction_distributes_over_union() {
        let mut b = Builder::new();
        let a = b.named("A");
        let u1 = b.named("B");
        let u2 = b.named("C");
        let union = disjunction(&mut b.arena, u1, u2);

        // A & (B | C) = (A & B) | (A & C)
        let result = conjunction(&mut b.arena, a, union);
        assert_eq!(b.arena.kind(result), Kind::UnionType);
        let terms = b.operands(result);
        assert_eq!(terms.len(), 2);
        for term in terms {
            assert_eq!(b.arena.kind(term), Kind::IsectType);
        }
    }

    #[test]
    fn test_no_union_below_isect() {
        let mut b = Builder::new();
        let union_l = {
            let x = b.named("A");
            let y = b.named("B");
            disjunction(&mut b.arena, x, y)
        };
        let union_r = {
            let x = b.named("C");
            let y = b.named("D");
            disjunction(&mut b.arena, x, y)
        };

        let result = conjunction(&mut b.arena, union_l, union_r);
        assert_eq!(b.arena.kind(result), Kind::UnionType);
        assert_eq!(b.operands(result).len(), 4);
        for term in b.operands(result) {
            for inner in b.operands(term) {
                assert_ne!(b.arena.kind(inner), Kind::UnionType);
                assert_ne!(b.arena.kind(inner), Kind::IsectType);
            }
        }
    }

    #[test]
    fn test_flatten_nested() {
        let mut b = Builder::new();
        let x = b.named("A");
        let y = b.named("B");
        let z = b.named("C");
        let inner = conjunction(&mut b.arena, x, y);
        let outer = conjunction(&mut b.arena, inner, z);
        assert_eq!(b.operands(outer).len(), 3);

        let inner = disjunction(&mut b.arena, x, y);
        let outer = disjunction(&mut b.arena, inner, z);
        assert_eq!(b.operands(outer).len(), 3);
    }

    #[test]
    fn test_deduplication() {
        let mut b = Builder::new();
        let x = b.named("A");
        let x2 = b.named("A");
        // Trivially equal operands collapse, leaving no composite at all.
        let result = conjunction(&mut b.arena, x, x2);
        assert_eq!(result, x);
        let result = disjunction(&mut b.arena, x, x2);
        assert_eq!(result, x);
    }

    #[test]
    fn test_throw_distributes() {
        let mut b = Builder::new();
        let x = b.named("A");
        let y = b.named("B");
        let union = disjunction(&mut b.arena, x, y);

        // throw (A | B) = throw A | throw B
        let result = throwtype(&mut b.arena, union);
        assert_eq!(b.arena.kind(result), Kind::UnionType);
        for part in b.operands(result) {
            assert_eq!(b.arena.kind(part), Kind::ThrowType);
        }
    }

    #[test]
    fn test_throw_simple() {
        let mut b = Builder::new();
        let x = b.named("A");
        let result = throwtype(&mut b.arena, x);
        assert_eq!(b.arena.kind(result), Kind::ThrowType);
    }

    #[test]
    fn test_commutative_modulo_order() {
        let mut b = Builder::new();
        let x = b.named("A");
        let y = b.named("B");
        let ab = conjunction(&mut b.arena, x, y);
        let ba = conjunction(&mut b.arena, y, x);

        let mut ops_ab = b.operands(ab);
        let ops_ba = b.operands(ba);
        ops_ab.reverse();
        assert!(ops_ab
            .iter()
            .zip(&ops_ba)
            .all(|(&l, &r)| same_type(&b.arena, l, r)));
    }
}
