/*!
# smalllang AST core

Storage layer of the smalllang compiler front end: one growable arena holds
every syntax node of a program behind small integer handles, and
scope-bearing nodes own insertion-ordered symbol tables used to resolve
names. The arena and tables are passive data structures — the
recursive-descent parser drives node creation and linking, and later passes
(type checking, code generation) read the same handles back.

Handles carry a generation stamp: once a node is removed, surviving copies of
its handle are rejected by the checked accessors instead of silently aliasing
the slot's next occupant.

## Usage

```rust
use smalllang_ast::{Ast, AstKind, AstPayload, IdCache};

let mut ast = Ast::new();
let mut ids = IdCache::new();

let i32_ty = ast.create(AstKind::I32Type);
let var = ast.create(AstKind::LocalVariable);
if let AstPayload::Variable { value, name } = &mut ast.get_mut(var).payload {
    value.ty = Some(i32_ty);
    *name = Some(ids.intern("x"));
}

assert_eq!(ast.get(var).value().unwrap().ty, Some(i32_ty));
assert_eq!(ids.resolve(ast.get(var).name().unwrap()), "x");
```
*/

pub mod ast_core;
pub mod core;

pub use crate::ast_core::interner::{IdCache, SymbolId};
pub use crate::ast_core::ordered_dict::OrderedDict;
pub use crate::ast_core::{
    Ast, AstKind, AstNode, AstPayload, BlockStmtData, FunTypeData, FunTypeNamedData, LiteralValue,
    NodeId, ScopeData, ValueData,
};
pub use crate::core::errors::{AstError, AstResult};
