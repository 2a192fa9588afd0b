//! The Vela abstract syntax tree.
//!
//! Nodes live in a flat [`Arena`] and reference each other by [`NodeId`].
//! The arena plus the root id is the owned tree; ids are structurally weak,
//! so symbol tables can point upward at their enclosing scope without
//! creating ownership cycles.
//!
//! Scope-bearing nodes (`Class`, `Interface`, `TypeAlias`, `Lambda`,
//! `ObjectLiteral`) embed a [`SymbolTable`]. The tables are populated during
//! parsing and stay in the finished tree so later passes can resolve names
//! through the same upward chain.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{Loc, Name};

/// Index of a node in an [`Arena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Per-scope mapping from name to declaration.
///
/// `parent` is the id of the enclosing scope node; it is a plain id, not an
/// owning reference, so the scope chain has no cycles.
#[derive(Default, Debug)]
pub struct SymbolTable {
    map: FxHashMap<Name, NodeId>,
    pub parent: Option<NodeId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Look a name up in this scope only.
    pub fn get(&self, name: Name) -> Option<NodeId> {
        self.map.get(&name).copied()
    }

    /// Insert a definition. On a duplicate the first definition stays and
    /// the previous id comes back as the error.
    pub fn set(&mut self, name: Name, node: NodeId) -> Result<(), NodeId> {
        match self.map.get(&name) {
            Some(&prev) => Err(prev),
            None => {
                self.map.insert(name, node);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, NodeId)> + '_ {
        self.map.iter().map(|(&n, &id)| (n, id))
    }
}

/// Fields shared by `class` and `interface` declarations; also the shape of
/// the program root and of each module root.
#[derive(Debug)]
pub struct Entity {
    pub name: Name,
    pub typeparams: Vec<NodeId>,
    pub inherits: Option<NodeId>,
    pub members: Vec<NodeId>,
    pub symbols: SymbolTable,
}

impl Entity {
    pub fn new(name: Name) -> Self {
        Entity {
            name,
            typeparams: Vec::new(),
            inherits: None,
            members: Vec::new(),
            symbols: SymbolTable::new(),
        }
    }
}

/// A lambda: the body of functions, blocks, match cases and initialisers.
#[derive(Debug, Default)]
pub struct LambdaNode {
    pub typeparams: Vec<NodeId>,
    pub params: Vec<NodeId>,
    pub result: Option<NodeId>,
    pub body: Vec<NodeId>,
    pub symbols: SymbolTable,
}

/// A node: a location and the kind-specific payload.
#[derive(Debug)]
pub struct Node {
    pub loc: Loc,
    pub kind: NodeKind,
}

/// Kind-specific node payloads.
///
/// `Option<NodeId>` children may be absent either because the grammar makes
/// them optional or because error recovery gave up on them.
#[derive(Debug)]
pub enum NodeKind {
    // Entities
    Class(Entity),
    Interface(Entity),

    // Declarations
    TypeAlias {
        name: Name,
        typeparams: Vec<NodeId>,
        inherits: Option<NodeId>,
        symbols: SymbolTable,
    },
    Using {
        typeref: Option<NodeId>,
    },
    Field {
        name: Name,
        ty: Option<NodeId>,
        init: Option<NodeId>,
    },
    Function {
        name: Name,
        lambda: NodeId,
    },
    /// A `module ...;` directive, folded into its module's root entity by
    /// the loader.
    Module {
        typeparams: Vec<NodeId>,
        inherits: Option<NodeId>,
    },

    // Bindings
    Param {
        name: Name,
        ty: NodeId,
        dflt: Option<NodeId>,
    },
    Let {
        name: Name,
        ty: NodeId,
    },
    Var {
        name: Name,
        ty: NodeId,
    },

    // Type parameters
    TypeParam {
        name: Name,
        upper: Option<NodeId>,
        dflt: Option<NodeId>,
    },
    TypeParamList {
        name: Name,
        upper: Option<NodeId>,
        dflt: Option<NodeId>,
    },

    // Types
    TypeRef {
        typenames: Vec<NodeId>,
    },
    TypeName {
        name: Name,
        typeargs: Vec<NodeId>,
    },
    ModuleName {
        name: Name,
        typeargs: Vec<NodeId>,
    },
    TupleType {
        types: Vec<NodeId>,
    },
    IsectType {
        types: Vec<NodeId>,
    },
    UnionType {
        types: Vec<NodeId>,
    },
    ViewType {
        left: NodeId,
        right: NodeId,
    },
    ExtractType {
        left: NodeId,
        right: NodeId,
    },
    FunctionType {
        left: NodeId,
        right: NodeId,
    },
    ThrowType {
        ty: NodeId,
    },
    Iso,
    Mut,
    Imm,
    SelfType,
    TypeList {
        name: Name,
    },
    InferType,

    // Expressions
    Tuple {
        seq: Vec<NodeId>,
    },
    Select {
        expr: Option<NodeId>,
        typeref: Option<NodeId>,
        args: Option<NodeId>,
    },
    Ref {
        name: Name,
    },
    Lambda(LambdaNode),
    When {
        waitfor: Option<NodeId>,
        behaviour: Option<NodeId>,
    },
    Try {
        body: Option<NodeId>,
        catches: Vec<NodeId>,
    },
    Match {
        test: Option<NodeId>,
        cases: Vec<NodeId>,
    },
    New {
        args: Option<NodeId>,
        region: Option<Name>,
    },
    ObjectLiteral {
        inherits: Option<NodeId>,
        members: Vec<NodeId>,
        region: Option<Name>,
        symbols: SymbolTable,
    },
    Throw {
        expr: Option<NodeId>,
    },
    Assign {
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
    Oftype {
        expr: Option<NodeId>,
        ty: Option<NodeId>,
    },

    // Constants; the spelling is the source text under the node's location.
    Int,
    Float,
    Hex,
    Binary,
    Bool,
    Character,
    EscapedString,
    UnescapedString,
}

/// Discriminant of a [`NodeKind`], used for shape checks and messages.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
    Class,
    Interface,
    TypeAlias,
    Using,
    Field,
    Function,
    Module,
    Param,
    Let,
    Var,
    TypeParam,
    TypeParamList,
    TypeRef,
    TypeName,
    ModuleName,
    TupleType,
    IsectType,
    UnionType,
    ViewType,
    ExtractType,
    FunctionType,
    ThrowType,
    Iso,
    Mut,
    Imm,
    SelfType,
    TypeList,
    InferType,
    Tuple,
    Select,
    Ref,
    Lambda,
    When,
    Try,
    Match,
    New,
    ObjectLiteral,
    Throw,
    Assign,
    Oftype,
    Int,
    Float,
    Hex,
    Binary,
    Bool,
    Character,
    EscapedString,
    UnescapedString,
}

impl Kind {
    /// Whether a declaration of this kind binds a local.
    pub fn is_binding(self) -> bool {
        matches!(self, Kind::Param | Kind::Let | Kind::Var)
    }

    /// Human-readable name for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Kind::Class => "class",
            Kind::Interface => "interface",
            Kind::TypeAlias => "type alias",
            Kind::Using => "using directive",
            Kind::Field => "field",
            Kind::Function => "function",
            Kind::Module => "module definition",
            Kind::Param => "parameter",
            Kind::Let => "let binding",
            Kind::Var => "var binding",
            Kind::TypeParam => "type parameter",
            Kind::TypeParamList => "type parameter list",
            Kind::TypeRef => "type reference",
            Kind::TypeName => "type name",
            Kind::ModuleName => "module name",
            Kind::TupleType => "tuple type",
            Kind::IsectType => "intersection type",
            Kind::UnionType => "union type",
            Kind::ViewType => "viewpoint type",
            Kind::ExtractType => "extract type",
            Kind::FunctionType => "function type",
            Kind::ThrowType => "throw type",
            Kind::Iso => "iso",
            Kind::Mut => "mut",
            Kind::Imm => "imm",
            Kind::SelfType => "Self",
            Kind::TypeList => "type list",
            Kind::InferType => "inferred type",
            Kind::Tuple => "tuple",
            Kind::Select => "selector expression",
            Kind::Ref => "reference",
            Kind::Lambda => "lambda",
            Kind::When => "when expression",
            Kind::Try => "try expression",
            Kind::Match => "match expression",
            Kind::New => "constructor call",
            Kind::ObjectLiteral => "object literal",
            Kind::Throw => "throw expression",
            Kind::Assign => "assignment",
            Kind::Oftype => "type ascription",
            Kind::Int => "integer literal",
            Kind::Float => "float literal",
            Kind::Hex => "hex literal",
            Kind::Binary => "binary literal",
            Kind::Bool => "boolean literal",
            Kind::Character => "character literal",
            Kind::EscapedString => "string literal",
            Kind::UnescapedString => "raw string literal",
        }
    }
}

impl NodeKind {
    pub fn kind(&self) -> Kind {
        match self {
            NodeKind::Class(_) => Kind::Class,
            NodeKind::Interface(_) => Kind::Interface,
            NodeKind::TypeAlias { .. } => Kind::TypeAlias,
            NodeKind::Using { .. } => Kind::Using,
            NodeKind::Field { .. } => Kind::Field,
            NodeKind::Function { .. } => Kind::Function,
            NodeKind::Module { .. } => Kind::Module,
            NodeKind::Param { .. } => Kind::Param,
            NodeKind::Let { .. } => Kind::Let,
            NodeKind::Var { .. } => Kind::Var,
            NodeKind::TypeParam { .. } => Kind::TypeParam,
            NodeKind::TypeParamList { .. } => Kind::TypeParamList,
            NodeKind::TypeRef { .. } => Kind::TypeRef,
            NodeKind::TypeName { .. } => Kind::TypeName,
            NodeKind::ModuleName { .. } => Kind::ModuleName,
            NodeKind::TupleType { .. } => Kind::TupleType,
            NodeKind::IsectType { .. } => Kind::IsectType,
            NodeKind::UnionType { .. } => Kind::UnionType,
            NodeKind::ViewType { .. } => Kind::ViewType,
            NodeKind::ExtractType { .. } => Kind::ExtractType,
            NodeKind::FunctionType { .. } => Kind::FunctionType,
            NodeKind::ThrowType { .. } => Kind::ThrowType,
            NodeKind::Iso => Kind::Iso,
            NodeKind::Mut => Kind::Mut,
            NodeKind::Imm => Kind::Imm,
            NodeKind::SelfType => Kind::SelfType,
            NodeKind::TypeList { .. } => Kind::TypeList,
            NodeKind::InferType => Kind::InferType,
            NodeKind::Tuple { .. } => Kind::Tuple,
            NodeKind::Select { .. } => Kind::Select,
            NodeKind::Ref { .. } => Kind::Ref,
            NodeKind::Lambda(_) => Kind::Lambda,
            NodeKind::When { .. } => Kind::When,
            NodeKind::Try { .. } => Kind::Try,
            NodeKind::Match { .. } => Kind::Match,
            NodeKind::New { .. } => Kind::New,
            NodeKind::ObjectLiteral { .. } => Kind::ObjectLiteral,
            NodeKind::Throw { .. } => Kind::Throw,
            NodeKind::Assign { .. } => Kind::Assign,
            NodeKind::Oftype { .. } => Kind::Oftype,
            NodeKind::Int => Kind::Int,
            NodeKind::Float => Kind::Float,
            NodeKind::Hex => Kind::Hex,
            NodeKind::Binary => Kind::Binary,
            NodeKind::Bool => Kind::Bool,
            NodeKind::Character => Kind::Character,
            NodeKind::EscapedString => Kind::EscapedString,
            NodeKind::UnescapedString => Kind::UnescapedString,
        }
    }
}

/// Flat storage for AST nodes.
#[derive(Default, Debug)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Arena { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, loc: Loc, kind: NodeKind) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("node count exceeds u32"));
        self.nodes.push(Node { loc, kind });
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> Kind {
        self.get(id).kind.kind()
    }

    #[inline]
    pub fn loc(&self, id: NodeId) -> Loc {
        self.get(id).loc
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The name a declaration introduces, if it introduces one.
    pub fn name(&self, id: NodeId) -> Option<Name> {
        match &self.get(id).kind {
            NodeKind::Class(entity) | NodeKind::Interface(entity) => Some(entity.name),
            NodeKind::TypeAlias { name, .. }
            | NodeKind::Field { name, .. }
            | NodeKind::Function { name, .. }
            | NodeKind::Param { name, .. }
            | NodeKind::Let { name, .. }
            | NodeKind::Var { name, .. }
            | NodeKind::TypeParam { name, .. }
            | NodeKind::TypeParamList { name, .. }
            | NodeKind::TypeName { name, .. }
            | NodeKind::ModuleName { name, .. }
            | NodeKind::TypeList { name }
            | NodeKind::Ref { name } => Some(*name),
            _ => None,
        }
    }

    /// The symbol table of a scope-bearing node.
    pub fn symbols(&self, id: NodeId) -> Option<&SymbolTable> {
        match &self.get(id).kind {
            NodeKind::Class(entity) | NodeKind::Interface(entity) => Some(&entity.symbols),
            NodeKind::TypeAlias { symbols, .. } | NodeKind::ObjectLiteral { symbols, .. } => {
                Some(symbols)
            }
            NodeKind::Lambda(lambda) => Some(&lambda.symbols),
            _ => None,
        }
    }

    pub fn symbols_mut(&mut self, id: NodeId) -> Option<&mut SymbolTable> {
        match &mut self.get_mut(id).kind {
            NodeKind::Class(entity) | NodeKind::Interface(entity) => Some(&mut entity.symbols),
            NodeKind::TypeAlias { symbols, .. } | NodeKind::ObjectLiteral { symbols, .. } => {
                Some(symbols)
            }
            NodeKind::Lambda(lambda) => Some(&mut lambda.symbols),
            _ => None,
        }
    }

    /// Look a name up starting at `scope` and walking the upward chain.
    pub fn get_scope(&self, scope: NodeId, name: Name) -> Option<NodeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let table = self.symbols(id)?;
            if let Some(found) = table.get(name) {
                return Some(found);
            }
            current = table.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_and_get() {
        let mut arena = Arena::new();
        let id = arena.alloc(Loc::DUMMY, NodeKind::Iso);
        assert_eq!(arena.kind(id), Kind::Iso);
        assert_eq!(arena.loc(id), Loc::DUMMY);
    }

    #[test]
    fn test_symbol_table_duplicate() {
        let mut table = SymbolTable::new();
        let mut arena = Arena::new();
        let first = arena.alloc(Loc::DUMMY, NodeKind::Iso);
        let second = arena.alloc(Loc::DUMMY, NodeKind::Mut);
        let name = Name::from_raw(7);

        assert!(table.set(name, first).is_ok());
        // The first definition stays.
        assert_eq!(table.set(name, second), Err(first));
        assert_eq!(table.get(name), Some(first));
    }

    #[test]
    fn test_get_scope_walks_upward() {
        let mut arena = Arena::new();
        let name = Name::from_raw(3);

        let outer = arena.alloc(Loc::DUMMY, NodeKind::Class(Entity::new(Name::EMPTY)));
        let decl = arena.alloc(Loc::DUMMY, NodeKind::Field {
            name,
            ty: None,
            init: None,
        });
        arena.symbols_mut(outer).unwrap().set(name, decl).unwrap();

        let inner = arena.alloc(Loc::DUMMY, NodeKind::Lambda(LambdaNode::default()));
        arena.symbols_mut(inner).unwrap().parent = Some(outer);

        assert_eq!(arena.get_scope(inner, name), Some(decl));
        assert_eq!(arena.get_scope(inner, Name::from_raw(99)), None);
        // `get` on the inner table alone does not see it.
        assert_eq!(arena.symbols(inner).unwrap().get(name), None);
    }

    #[test]
    fn test_kind_is_binding() {
        assert!(Kind::Param.is_binding());
        assert!(Kind::Let.is_binding());
        assert!(Kind::Var.is_binding());
        assert!(!Kind::Field.is_binding());
        assert!(!Kind::Function.is_binding());
    }
}
