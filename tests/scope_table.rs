//! Scope symbol-table behavior and end-to-end node construction.
use pretty_assertions::assert_eq;
use smalllang_ast::{Ast, AstKind, AstPayload, IdCache};

#[test]
fn local_variable_round_trip() {
    let mut ast = Ast::new();
    let mut ids = IdCache::new();

    let i32_ty = ast.create(AstKind::I32Type);
    let var = ast.create(AstKind::LocalVariable);
    match &mut ast.get_mut(var).payload {
        AstPayload::Variable { value, name } => {
            value.ty = Some(i32_ty);
            *name = Some(ids.intern("x"));
        }
        other => panic!("unexpected payload {other:?}"),
    }

    let node = ast.get(var);
    assert_eq!(node.kind, AstKind::LocalVariable);
    assert!(node.is_value());
    assert_eq!(node.value().unwrap().ty, Some(i32_ty));
    assert_eq!(ast.get(i32_ty).kind, AstKind::I32Type);

    let text = ids.resolve(node.name().unwrap());
    assert_eq!(text, "x");
    assert_eq!(text.len(), 1);
}

#[test]
fn duplicate_binding_keeps_first() {
    let mut ast = Ast::new();
    let mut ids = IdCache::new();
    let func = ast.create(AstKind::Function);
    let h1 = ast.create(AstKind::LocalVariable);
    let h2 = ast.create(AstKind::LocalVariable);
    let f = ids.intern("f");

    let scope = ast.get_mut(func).scope_mut().unwrap();
    scope.add_node(h1, Some(f));
    scope.add_node(h2, Some(f));

    let scope = ast.get(func).scope().unwrap();
    assert_eq!(scope.find(f), Some(h1));
    assert_eq!(scope.members(), &[h1]);
}

#[test]
fn anonymous_members_keep_position_but_skip_lookup() {
    let mut ast = Ast::new();
    let mut ids = IdCache::new();
    let strukt = ast.create(AstKind::Struct);
    let a = ast.create(AstKind::StructField);
    let pad = ast.create(AstKind::StructField);
    let b = ast.create(AstKind::StructField);
    let name_a = ids.intern("a");
    let name_b = ids.intern("b");

    let scope = ast.get_mut(strukt).scope_mut().unwrap();
    scope.add_node(a, Some(name_a));
    scope.add_node(pad, None);
    scope.add_node(b, Some(name_b));

    let scope = ast.get(strukt).scope().unwrap();
    assert_eq!(scope.members(), &[a, pad, b]);
    assert_eq!(scope.find(name_a), Some(a));
    assert_eq!(scope.find(name_b), Some(b));
}

#[test]
fn function_type_params_and_names_stay_parallel() {
    let mut ast = Ast::new();
    let mut ids = IdCache::new();
    let i32_ty = ast.create(AstKind::I32Type);
    let f64_ty = ast.create(AstKind::F64Type);
    let fun_ty = ast.create(AstKind::FunTypeWithNamedParams);

    match &mut ast.get_mut(fun_ty).payload {
        AstPayload::FunTypeWithNamedParams(data) => {
            data.fun_type.name = Some(ids.intern("add"));
            data.fun_type.return_type = Some(i32_ty);
            data.fun_type.add_param_type(i32_ty);
            data.fun_type.add_param_type(f64_ty);
            data.add_name(ids.intern("lhs"));
            data.add_name(ids.intern("rhs"));
        }
        other => panic!("unexpected payload {other:?}"),
    }

    let node = ast.get(fun_ty);
    assert!(node.is_type());
    let fun_type = node.fun_type().unwrap();
    assert_eq!(fun_type.return_type, Some(i32_ty));
    assert_eq!(fun_type.params(), &[i32_ty, f64_ty]);
    assert_eq!(ids.resolve(fun_type.name.unwrap()), "add");

    match &node.payload {
        AstPayload::FunTypeWithNamedParams(data) => {
            assert_eq!(data.names().len(), data.fun_type.params().len());
            assert_eq!(ids.resolve(data.names()[0]), "lhs");
            assert_eq!(ids.resolve(data.names()[1]), "rhs");
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn function_scope_links_outer_scope_and_fun_type() {
    let mut ast = Ast::new();
    let mut ids = IdCache::new();
    let outer = ast.create(AstKind::Function);
    let fun_ty = ast.create(AstKind::FunTypeWithNamedParams);
    let inner = ast.create(AstKind::Function);

    match &mut ast.get_mut(inner).payload {
        AstPayload::Function { scope, fun_type } => {
            scope.outer = Some(outer);
            scope.name = Some(ids.intern("helper"));
            *fun_type = Some(fun_ty);
        }
        other => panic!("unexpected payload {other:?}"),
    }

    let node = ast.get(inner);
    assert!(node.is_scope());
    assert_eq!(node.scope().unwrap().outer, Some(outer));
    assert_eq!(ids.resolve(node.name().unwrap()), "helper");
    // fun-type link shows up as a forward reference, the outer scope does not
    assert_eq!(node.children(), vec![fun_ty]);
}

#[test]
fn block_scope_and_block_statement_link_both_ways() {
    let mut ast = Ast::new();
    let scope = ast.create(AstKind::BlockScope);
    let block = ast.create(AstKind::BlockStmt);
    let stmt = ast.create(AstKind::VariableDeclStmt);

    match &mut ast.get_mut(scope).payload {
        AstPayload::BlockScope { block_stmt, .. } => *block_stmt = Some(block),
        other => panic!("unexpected payload {other:?}"),
    }
    match &mut ast.get_mut(block).payload {
        AstPayload::Block(data) => {
            data.scope = Some(scope);
            data.add_stmt(stmt);
        }
        other => panic!("unexpected payload {other:?}"),
    }

    assert_eq!(ast.get(scope).children(), vec![block]);
    // the owning-scope back link is not a child
    assert_eq!(ast.get(block).children(), vec![stmt]);
}

#[test]
fn removing_a_scope_releases_its_table() {
    let mut ast = Ast::new();
    let mut ids = IdCache::new();
    let uni = ast.create(AstKind::Union);
    let field = ast.create(AstKind::UnionField);
    let name = ids.intern("tag");

    ast.get_mut(uni)
        .scope_mut()
        .unwrap()
        .add_node(field, Some(name));
    ast.remove(uni).unwrap();

    // the member node is untouched: child references are non-owning
    assert_eq!(ast.get(field).kind, AstKind::UnionField);

    let reused = ast.create(AstKind::Union);
    assert_eq!(reused.index(), uni.index());
    let scope = ast.get(reused).scope().unwrap();
    assert!(scope.dict.is_none());
    assert_eq!(scope.find(name), None);
}
