//! AST storage core.
//!
//! Fundamental primitives of the front end: `NodeId` (generation-checked
//! node handle), `Ast` (growable node arena with slot reuse), `AstKind` with
//! its classification predicates, and the per-kind `AstPayload` arms. The
//! arena is a passive store: the parser drives all allocation and linking,
//! and later passes read the same handles back.

pub mod interner;
pub mod ordered_dict;

use serde::{Deserialize, Serialize};

use crate::ast_core::interner::SymbolId;
use crate::ast_core::ordered_dict::OrderedDict;
use crate::core::errors::{AstError, AstResult};

/// Handle addressing one node inside an [`Ast`] arena.
///
/// Ordered by slot index, so handles created without intervening removals
/// compare in creation order. The generation ties the handle to one occupancy
/// of its slot: after the node is removed, every surviving copy of the handle
/// is stale and the arena rejects it instead of exposing the slot's next
/// occupant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Slot index inside the arena.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot occupancy this handle was issued for.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AstKind {
    None,
    I8Type,
    I16Type,
    I32Type,
    U8Type,
    U16Type,
    U32Type,
    F32Type,
    F64Type,
    StructType,
    UnionType,
    FunType,
    FunTypeWithNamedParams,
    LocalVariable,
    GlobalVariable,
    StringLiteral,
    I8Literal,
    I16Literal,
    I32Literal,
    U8Literal,
    U16Literal,
    U32Literal,
    F32Literal,
    F64Literal,
    AssignExpr,
    EqualExpr,
    GreatExpr,
    GreatOrEqualExpr,
    LessExpr,
    LessOrEqualExpr,
    ParenthExpr,
    NegExpr,
    StructField,
    UnionField,
    Function,
    Struct,
    Union,
    BlockScope,
    VariableDeclStmt,
    BlockStmt,
    FunctionDeclStmt,
    StructDeclStmt,
    UnionDeclStmt,
    IfElseStmt,
    WhileStmt,
}

impl AstKind {
    /// Type kinds: primitive numeric types, struct/union types and both
    /// function-type variants.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            AstKind::I8Type
                | AstKind::I16Type
                | AstKind::I32Type
                | AstKind::U8Type
                | AstKind::U16Type
                | AstKind::U32Type
                | AstKind::F32Type
                | AstKind::F64Type
                | AstKind::StructType
                | AstKind::UnionType
                | AstKind::FunType
                | AstKind::FunTypeWithNamedParams
        )
    }

    /// Value kinds: variables, literals and struct/union fields.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            AstKind::LocalVariable
                | AstKind::GlobalVariable
                | AstKind::StringLiteral
                | AstKind::I8Literal
                | AstKind::I16Literal
                | AstKind::I32Literal
                | AstKind::U8Literal
                | AstKind::U16Literal
                | AstKind::U32Literal
                | AstKind::F32Literal
                | AstKind::F64Literal
                | AstKind::StructField
                | AstKind::UnionField
        )
    }

    /// Expression kinds: assignment, comparisons, parenthesized and negation.
    pub fn is_expr(self) -> bool {
        matches!(
            self,
            AstKind::AssignExpr
                | AstKind::EqualExpr
                | AstKind::GreatExpr
                | AstKind::GreatOrEqualExpr
                | AstKind::LessExpr
                | AstKind::LessOrEqualExpr
                | AstKind::ParenthExpr
                | AstKind::NegExpr
        )
    }

    pub fn is_stmt(self) -> bool {
        matches!(
            self,
            AstKind::VariableDeclStmt
                | AstKind::BlockStmt
                | AstKind::FunctionDeclStmt
                | AstKind::StructDeclStmt
                | AstKind::UnionDeclStmt
                | AstKind::IfElseStmt
                | AstKind::WhileStmt
        )
    }

    /// Scope kinds own a symbol table through their [`ScopeData`]. Block
    /// scopes carry scope data too but are not scope kinds.
    pub fn is_scope(self) -> bool {
        matches!(self, AstKind::Function | AstKind::Struct | AstKind::Union)
    }
}

/// Base of every value-kind payload: the handle of the value's type node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ValueData {
    pub ty: Option<NodeId>,
}

/// Literal payload for the numeric literal kinds; the arm width matches the
/// node's kind tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue {
    I8(i8),
    I16(i16),
    I32(i32),
    U8(u8),
    U16(u16),
    U32(u32),
    F32(f32),
    F64(f64),
}

/// Function type payload: return type, lazily allocated parameter-type
/// sequence, and the type's name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FunTypeData {
    pub return_type: Option<NodeId>,
    pub param_types: Option<Vec<NodeId>>,
    pub name: Option<SymbolId>,
}

impl FunTypeData {
    /// Append one parameter type, allocating the sequence on first use.
    pub fn add_param_type(&mut self, ty: NodeId) {
        self.param_types.get_or_insert_with(Vec::new).push(ty);
    }

    pub fn params(&self) -> &[NodeId] {
        self.param_types.as_deref().unwrap_or(&[])
    }
}

/// Named-parameter function type: the base data plus a name sequence parallel
/// in length and order to the parameter types.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FunTypeNamedData {
    pub fun_type: FunTypeData,
    pub names: Option<Vec<SymbolId>>,
}

impl FunTypeNamedData {
    /// Append one parameter name. Arity against the parameter types is the
    /// caller's concern.
    pub fn add_name(&mut self, name: SymbolId) {
        self.names.get_or_insert_with(Vec::new).push(name);
    }

    pub fn names(&self) -> &[SymbolId] {
        self.names.as_deref().unwrap_or(&[])
    }
}

/// Scope payload: link to the enclosing scope node, the scope's name, and a
/// lazily allocated symbol table owned by this node alone.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScopeData {
    pub outer: Option<NodeId>,
    pub name: Option<SymbolId>,
    pub dict: Option<Box<OrderedDict>>,
}

impl ScopeData {
    /// Record `node` as a scope member, bound to `name` when given.
    /// Allocates the table on first insertion.
    pub fn add_node(&mut self, node: NodeId, name: Option<SymbolId>) {
        let dict = self.dict.get_or_insert_with(Box::default);
        match name {
            Some(name) => dict.append(name, node),
            None => dict.append_anon(node),
        }
    }

    /// Handle bound to `name` in this scope's table, if any.
    pub fn find(&self, name: SymbolId) -> Option<NodeId> {
        self.dict.as_ref().and_then(|dict| dict.find(name))
    }

    /// Members in insertion order; empty if the table was never allocated.
    pub fn members(&self) -> &[NodeId] {
        self.dict.as_deref().map(|dict| dict.nodes()).unwrap_or(&[])
    }
}

/// Block statement payload: the owning block-scope handle and a lazily
/// allocated statement sequence.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BlockStmtData {
    pub scope: Option<NodeId>,
    pub stmts: Option<Vec<NodeId>>,
}

impl BlockStmtData {
    /// Append one statement, allocating the sequence on first use.
    pub fn add_stmt(&mut self, stmt: NodeId) {
        self.stmts.get_or_insert_with(Vec::new).push(stmt);
    }

    pub fn stmts(&self) -> &[NodeId] {
        self.stmts.as_deref().unwrap_or(&[])
    }
}

/// Per-kind payload. Exactly one arm is live per node; [`AstPayload::default_for`]
/// selects the arm a kind starts with. Arms own their secondary structures
/// (sequences, symbol tables), so replacing or dropping the payload releases
/// them without explicit cleanup calls.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum AstPayload {
    #[default]
    None,
    /// Local or global variable.
    Variable {
        value: ValueData,
        name: Option<SymbolId>,
    },
    /// Parenthesized and negation expressions.
    Unary { operand: Option<NodeId> },
    /// Assignment and comparison expressions.
    Binary {
        left: Option<NodeId>,
        right: Option<NodeId>,
    },
    /// Interned string literal.
    StringLit {
        value: ValueData,
        text: Option<SymbolId>,
    },
    /// Numeric literal.
    NumberLit {
        value: ValueData,
        literal: LiteralValue,
    },
    /// Function type without parameter names.
    FunType(FunTypeData),
    /// Function type with named parameters.
    FunTypeWithNamedParams(FunTypeNamedData),
    /// Struct or union type pointing at its scope-bearing declaration node.
    StructTypeRef { scope: Option<NodeId> },
    /// Struct or union field with its layout offset.
    Field {
        value: ValueData,
        name: Option<SymbolId>,
        offset: u32,
    },
    /// Struct or union declaration scope.
    Scope(ScopeData),
    /// Function declaration scope plus the handle of its function-type node.
    Function {
        scope: ScopeData,
        fun_type: Option<NodeId>,
    },
    /// Block scope: scope data plus the handle of the owning block statement.
    BlockScope {
        scope: ScopeData,
        block_stmt: Option<NodeId>,
    },
    /// Function/struct/union declaration statement wrapping the declared node.
    Decl { target: Option<NodeId> },
    /// Variable declaration statement.
    VariableDecl {
        variable: Option<NodeId>,
        init: Option<NodeId>,
    },
    /// Block statement.
    Block(BlockStmtData),
    IfElse {
        cond: Option<NodeId>,
        then_stmt: Option<NodeId>,
        else_stmt: Option<NodeId>,
    },
    While {
        cond: Option<NodeId>,
        body: Option<NodeId>,
    },
}

impl AstPayload {
    /// Default payload arm for `kind`. Replaces the zero-then-tag
    /// initialization of recycled storage with per-arm default construction.
    pub fn default_for(kind: AstKind) -> Self {
        match kind {
            AstKind::None
            | AstKind::I8Type
            | AstKind::I16Type
            | AstKind::I32Type
            | AstKind::U8Type
            | AstKind::U16Type
            | AstKind::U32Type
            | AstKind::F32Type
            | AstKind::F64Type => AstPayload::None,
            AstKind::StructType | AstKind::UnionType => AstPayload::StructTypeRef { scope: None },
            AstKind::FunType => AstPayload::FunType(FunTypeData::default()),
            AstKind::FunTypeWithNamedParams => {
                AstPayload::FunTypeWithNamedParams(FunTypeNamedData::default())
            }
            AstKind::LocalVariable | AstKind::GlobalVariable => AstPayload::Variable {
                value: ValueData::default(),
                name: None,
            },
            AstKind::StringLiteral => AstPayload::StringLit {
                value: ValueData::default(),
                text: None,
            },
            AstKind::I8Literal => Self::number(LiteralValue::I8(0)),
            AstKind::I16Literal => Self::number(LiteralValue::I16(0)),
            AstKind::I32Literal => Self::number(LiteralValue::I32(0)),
            AstKind::U8Literal => Self::number(LiteralValue::U8(0)),
            AstKind::U16Literal => Self::number(LiteralValue::U16(0)),
            AstKind::U32Literal => Self::number(LiteralValue::U32(0)),
            AstKind::F32Literal => Self::number(LiteralValue::F32(0.0)),
            AstKind::F64Literal => Self::number(LiteralValue::F64(0.0)),
            AstKind::AssignExpr
            | AstKind::EqualExpr
            | AstKind::GreatExpr
            | AstKind::GreatOrEqualExpr
            | AstKind::LessExpr
            | AstKind::LessOrEqualExpr => AstPayload::Binary {
                left: None,
                right: None,
            },
            AstKind::ParenthExpr | AstKind::NegExpr => AstPayload::Unary { operand: None },
            AstKind::StructField | AstKind::UnionField => AstPayload::Field {
                value: ValueData::default(),
                name: None,
                offset: 0,
            },
            AstKind::Function => AstPayload::Function {
                scope: ScopeData::default(),
                fun_type: None,
            },
            AstKind::Struct | AstKind::Union => AstPayload::Scope(ScopeData::default()),
            AstKind::BlockScope => AstPayload::BlockScope {
                scope: ScopeData::default(),
                block_stmt: None,
            },
            AstKind::VariableDeclStmt => AstPayload::VariableDecl {
                variable: None,
                init: None,
            },
            AstKind::BlockStmt => AstPayload::Block(BlockStmtData::default()),
            AstKind::FunctionDeclStmt | AstKind::StructDeclStmt | AstKind::UnionDeclStmt => {
                AstPayload::Decl { target: None }
            }
            AstKind::IfElseStmt => AstPayload::IfElse {
                cond: None,
                then_stmt: None,
                else_stmt: None,
            },
            AstKind::WhileStmt => AstPayload::While {
                cond: None,
                body: None,
            },
        }
    }

    fn number(literal: LiteralValue) -> Self {
        AstPayload::NumberLit {
            value: ValueData::default(),
            literal,
        }
    }
}

/// One arena node: the closed kind tag plus the payload arm live for it.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: AstKind,
    pub payload: AstPayload,
}

impl AstNode {
    pub fn new(kind: AstKind) -> Self {
        Self {
            kind,
            payload: AstPayload::default_for(kind),
        }
    }

    pub fn is_type(&self) -> bool {
        self.kind.is_type()
    }

    pub fn is_value(&self) -> bool {
        self.kind.is_value()
    }

    pub fn is_expr(&self) -> bool {
        self.kind.is_expr()
    }

    pub fn is_stmt(&self) -> bool {
        self.kind.is_stmt()
    }

    pub fn is_scope(&self) -> bool {
        self.kind.is_scope()
    }

    /// Typed-value base of value-kind payloads.
    pub fn value(&self) -> Option<&ValueData> {
        match &self.payload {
            AstPayload::Variable { value, .. }
            | AstPayload::StringLit { value, .. }
            | AstPayload::NumberLit { value, .. }
            | AstPayload::Field { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut ValueData> {
        match &mut self.payload {
            AstPayload::Variable { value, .. }
            | AstPayload::StringLit { value, .. }
            | AstPayload::NumberLit { value, .. }
            | AstPayload::Field { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Function-type data for both function-type kinds.
    pub fn fun_type(&self) -> Option<&FunTypeData> {
        match &self.payload {
            AstPayload::FunType(fun_type) => Some(fun_type),
            AstPayload::FunTypeWithNamedParams(data) => Some(&data.fun_type),
            _ => None,
        }
    }

    pub fn fun_type_mut(&mut self) -> Option<&mut FunTypeData> {
        match &mut self.payload {
            AstPayload::FunType(fun_type) => Some(fun_type),
            AstPayload::FunTypeWithNamedParams(data) => Some(&mut data.fun_type),
            _ => None,
        }
    }

    /// Scope data for function/struct/union declarations and block scopes.
    pub fn scope(&self) -> Option<&ScopeData> {
        match &self.payload {
            AstPayload::Scope(scope)
            | AstPayload::Function { scope, .. }
            | AstPayload::BlockScope { scope, .. } => Some(scope),
            _ => None,
        }
    }

    pub fn scope_mut(&mut self) -> Option<&mut ScopeData> {
        match &mut self.payload {
            AstPayload::Scope(scope)
            | AstPayload::Function { scope, .. }
            | AstPayload::BlockScope { scope, .. } => Some(scope),
            _ => None,
        }
    }

    /// Identifier attached to the node, when its payload carries one.
    pub fn name(&self) -> Option<SymbolId> {
        match &self.payload {
            AstPayload::Variable { name, .. } | AstPayload::Field { name, .. } => *name,
            AstPayload::FunType(fun_type) => fun_type.name,
            AstPayload::FunTypeWithNamedParams(data) => data.fun_type.name,
            AstPayload::Scope(scope) => scope.name,
            AstPayload::Function { scope, .. } | AstPayload::BlockScope { scope, .. } => scope.name,
            _ => None,
        }
    }

    /// Non-owning forward references to other nodes: operands, child
    /// statements, parameter types, scope members. Back links (enclosing
    /// scope, owning block scope) are excluded so traversals do not cycle.
    /// Destruction never uses this.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match &self.payload {
            AstPayload::None => {}
            AstPayload::Variable { value, .. }
            | AstPayload::StringLit { value, .. }
            | AstPayload::NumberLit { value, .. }
            | AstPayload::Field { value, .. } => out.extend(value.ty),
            AstPayload::Unary { operand } => out.extend(*operand),
            AstPayload::Binary { left, right } => {
                out.extend(*left);
                out.extend(*right);
            }
            AstPayload::FunType(fun_type) => {
                out.extend(fun_type.return_type);
                out.extend_from_slice(fun_type.params());
            }
            AstPayload::FunTypeWithNamedParams(data) => {
                out.extend(data.fun_type.return_type);
                out.extend_from_slice(data.fun_type.params());
            }
            AstPayload::StructTypeRef { scope } => out.extend(*scope),
            AstPayload::Scope(scope) => out.extend_from_slice(scope.members()),
            AstPayload::Function { scope, fun_type } => {
                out.extend(*fun_type);
                out.extend_from_slice(scope.members());
            }
            AstPayload::BlockScope { scope, block_stmt } => {
                out.extend(*block_stmt);
                out.extend_from_slice(scope.members());
            }
            AstPayload::Decl { target } => out.extend(*target),
            AstPayload::VariableDecl { variable, init } => {
                out.extend(*variable);
                out.extend(*init);
            }
            AstPayload::Block(block) => out.extend_from_slice(block.stmts()),
            AstPayload::IfElse {
                cond,
                then_stmt,
                else_stmt,
            } => {
                out.extend(*cond);
                out.extend(*then_stmt);
                out.extend(*else_stmt);
            }
            AstPayload::While { cond, body } => {
                out.extend(*cond);
                out.extend(*body);
            }
        }
        out
    }
}

/// One storage slot: the current occupant plus the generation stamp handles
/// are checked against.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: AstNode,
}

/// Growable node arena addressed by [`NodeId`].
///
/// `create` reuses the most recently removed slot before growing storage;
/// `remove` drops the node's owned structures and recycles the slot under a
/// new generation. Cleanup is shallow: child handles are never followed, so
/// destruction cost is independent of the graph built on top.
#[derive(Debug, Default, Clone)]
pub struct Ast {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Allocate a node of `kind` with the default payload for that kind,
    /// reusing a freed slot when one is available.
    pub fn create(&mut self, kind: AstKind) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = AstNode::new(kind);
            tracing::trace!(
                "created {:?} node in recycled slot {} (generation {})",
                kind,
                index,
                slot.generation
            );
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: AstNode::new(kind),
        });
        tracing::trace!("created {:?} node in fresh slot {}", kind, index);
        NodeId {
            index,
            generation: 0,
        }
    }

    fn check(&self, id: NodeId) -> AstResult<usize> {
        let Some(slot) = self.slots.get(id.index as usize) else {
            return Err(AstError::OutOfBounds {
                index: id.index,
                slot_count: self.slots.len() as u32,
            });
        };
        if slot.generation != id.generation {
            return Err(AstError::StaleHandle {
                index: id.index,
                handle_generation: id.generation,
                slot_generation: slot.generation,
            });
        }
        Ok(id.index as usize)
    }

    /// Generation-checked lookup.
    pub fn try_get(&self, id: NodeId) -> AstResult<&AstNode> {
        let index = self.check(id)?;
        Ok(&self.slots[index].node)
    }

    pub fn try_get_mut(&mut self, id: NodeId) -> AstResult<&mut AstNode> {
        let index = self.check(id)?;
        Ok(&mut self.slots[index].node)
    }

    /// Lookup for contract-trusted callers (the parser). Panics on a stale
    /// or unknown handle rather than returning a recycled occupant.
    pub fn get(&self, id: NodeId) -> &AstNode {
        match self.try_get(id) {
            Ok(node) => node,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut AstNode {
        match self.try_get_mut(id) {
            Ok(node) => node,
            Err(err) => panic!("{err}"),
        }
    }

    /// Destroy the node: its payload-owned structures are dropped (child
    /// handles are not followed), the slot is retagged as empty and queued
    /// for reuse. A second `remove` of the same handle fails with
    /// [`AstError::StaleHandle`].
    pub fn remove(&mut self, id: NodeId) -> AstResult<()> {
        let index = self.check(id)?;
        let slot = &mut self.slots[index];
        slot.node = AstNode::new(AstKind::None);
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        tracing::trace!(
            "removed node in slot {}, slot now at generation {}",
            id.index,
            slot.generation
        );
        Ok(())
    }

    /// Slots ever allocated, live or free.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Nodes currently live.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
