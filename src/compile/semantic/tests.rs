use crate::compile::{
    Compiler,
    ast::{NodeArena, NodeId, NodeKind},
};

use super::{
    Analysis, SemanticError, analyze,
    symbols::{SymbolTable, SymbolType},
    types::CanonicalSort,
};

fn check(src: &str) -> Analysis {
    Compiler::new().source(src).compile().unwrap().analysis
}

fn errors(src: &str) -> Vec<SemanticError> {
    check(src).diagnostics.errors().to_vec()
}

/// Body scope of the top-level function `name`.
fn body_of(table: &SymbolTable, name: &str) -> usize {
    let symbol = table.get_local(SymbolTable::ROOT, name).unwrap();
    assert_eq!(symbol.ty, SymbolType::FuncDecl);
    symbol.scope.unwrap()
}

fn value_in(table: &SymbolTable, scope: usize, name: &str) -> Option<SymbolType> {
    table.get_local(scope, name).map(|symbol| symbol.ty)
}

#[test]
fn typed_declaration_in_function() {
    let analysis = check("fn f() { let x: i32 = 5; }");

    assert!(analysis.diagnostics.is_empty());
    assert!(analysis.is_ok());

    let body = body_of(&analysis.table, "f");
    assert_ne!(body, SymbolTable::ROOT);
    assert_eq!(
        value_in(&analysis.table, body, "x"),
        Some(SymbolType::Value(CanonicalSort::Integer))
    );
}

#[test]
fn declared_and_inferred_types_must_agree() {
    let analysis = check("fn f() { let x: bool = 5; }");

    assert_eq!(
        analysis.diagnostics.errors(),
        &[SemanticError::DeclarationMismatch {
            name: String::from("x"),
            declared: CanonicalSort::Bool,
            inferred: CanonicalSort::Integer,
        }]
    );
    assert!(!analysis.is_ok());

    let body = body_of(&analysis.table, "f");
    assert_eq!(value_in(&analysis.table, body, "x"), None);
}

#[test]
fn redeclaration_keeps_first_binding() {
    let analysis = check("fn f() { let x = 1; let x = 2.5; }");

    assert_eq!(
        analysis.diagnostics.errors(),
        &[SemanticError::Redeclared(String::from("x"))]
    );

    let body = body_of(&analysis.table, "f");
    assert_eq!(
        value_in(&analysis.table, body, "x"),
        Some(SymbolType::Value(CanonicalSort::Integer))
    );
}

#[test]
fn assignment_to_undeclared_identifier() {
    let analysis = check("fn f() { x = 5; }");

    assert_eq!(
        analysis.diagnostics.errors(),
        &[SemanticError::IdentifierNotFound(String::from("x"))]
    );

    let body = body_of(&analysis.table, "f");
    assert_eq!(value_in(&analysis.table, body, "x"), None);
}

#[test]
fn mixed_sorts_in_if_predicate() {
    assert_eq!(
        errors("fn f() { if (1 + true) { } }"),
        vec![SemanticError::FlowPredicate("if")]
    );
}

#[test]
fn binary_initializer_with_declared_width() {
    let analysis = check("fn f() { let x: i32 = 3 + 4; }");

    assert!(analysis.diagnostics.is_empty());
    let body = body_of(&analysis.table, "f");
    assert_eq!(
        value_in(&analysis.table, body, "x"),
        Some(SymbolType::Value(CanonicalSort::Integer))
    );
}

#[test]
fn integer_widths_are_interchangeable() {
    let analysis = check("fn f() { let x: u8 = 5; let y: i64 = x; let z: u32 = x * y; }");

    assert!(analysis.diagnostics.is_empty());
}

#[test]
fn mixed_sorts_in_while_predicate() {
    assert_eq!(
        errors("fn f() { let x = 1; while x < 1.5 { x = x + 1; } }"),
        vec![SemanticError::FlowPredicate("while")]
    );
}

#[test]
fn bare_predicates_are_not_typed() {
    assert!(errors("fn f() { let x = 1; if x { } while 2.5 { } }").is_empty());
}

#[test]
fn nested_function_shadows_outer_binding() {
    let src = "\
fn outer() {
    let x = 1;
    fn inner() {
        let x = true;
        let y: bool = x;
    }
    let z: i32 = x;
}";
    let analysis = check(src);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);

    let outer = body_of(&analysis.table, "outer");
    let inner = analysis.table.get_local(outer, "inner").unwrap().scope.unwrap();

    assert_eq!(analysis.table.parent(inner), Some(outer));
    assert_eq!(
        value_in(&analysis.table, inner, "x"),
        Some(SymbolType::Value(CanonicalSort::Bool))
    );
    assert_eq!(
        value_in(&analysis.table, outer, "x"),
        Some(SymbolType::Value(CanonicalSort::Integer))
    );
}

#[test]
fn inner_blocks_share_the_function_scope() {
    assert_eq!(
        errors("fn f() { let x = 1; { let x = 2; } }"),
        vec![SemanticError::Redeclared(String::from("x"))]
    );
}

#[test]
fn assignment_keeps_declared_type() {
    let analysis = check("fn f() { let mut x = 1; x = true; }");

    assert_eq!(
        analysis.diagnostics.errors(),
        &[SemanticError::AssignmentMismatch {
            name: String::from("x"),
            expected: SymbolType::Value(CanonicalSort::Integer),
            found: CanonicalSort::Bool,
        }]
    );

    let body = body_of(&analysis.table, "f");
    assert_eq!(
        value_in(&analysis.table, body, "x"),
        Some(SymbolType::Value(CanonicalSort::Integer))
    );
}

#[test]
fn assignment_target_must_be_a_path() {
    let analysis = check(
        "fn f() { let mut x = 1; let c = true; x + 1 = 5; -x = 2; if c { x } else { x } = 5; (x) = 3; }",
    );

    assert_eq!(
        analysis.diagnostics.errors(),
        &[
            SemanticError::Malformed(NodeKind::ExprAssign),
            SemanticError::Malformed(NodeKind::ExprAssign),
            SemanticError::Malformed(NodeKind::ExprAssign),
        ]
    );
    assert!(!analysis.is_ok());
}

#[test]
fn undeclared_operand_is_reported_once() {
    let analysis = check("fn f() { let y = z + 1; }");

    assert_eq!(
        analysis.diagnostics.errors(),
        &[SemanticError::IdentifierNotFound(String::from("z"))]
    );

    let body = body_of(&analysis.table, "f");
    assert_eq!(value_in(&analysis.table, body, "y"), None);
}

#[test]
fn non_homogeneous_initializer_names_the_declaration() {
    assert_eq!(
        errors("fn f() { let y = 1 + 2.5; }"),
        vec![SemanticError::BinaryMismatch(String::from("declaration of y"))]
    );
}

#[test]
fn declaration_without_type_or_initializer() {
    let analysis = check("fn f() { let x; let y: f32; }");

    assert_eq!(
        analysis.diagnostics.errors(),
        &[SemanticError::CannotInfer(String::from("x"))]
    );

    let body = body_of(&analysis.table, "f");
    assert_eq!(
        value_in(&analysis.table, body, "y"),
        Some(SymbolType::Value(CanonicalSort::Float))
    );
}

#[test]
fn unknown_declared_type() {
    assert_eq!(
        errors("fn f() { let s: String = \"hi\"; }"),
        vec![SemanticError::UnknownType {
            name: String::from("s"),
            ty: String::from("String"),
        }]
    );
}

#[test]
fn initializer_without_sort_uses_declared_type() {
    let analysis = check("fn f() { let v: i32 = if true { 1 } else { 2 }; let w = { 3 }; }");

    assert_eq!(
        analysis.diagnostics.errors(),
        &[SemanticError::CannotInfer(String::from("w"))]
    );

    let body = body_of(&analysis.table, "f");
    assert_eq!(
        value_in(&analysis.table, body, "v"),
        Some(SymbolType::Value(CanonicalSort::Integer))
    );
}

#[test]
fn comparisons_take_the_operand_sort() {
    let analysis = check(
        "fn f() { let b: bool = 1 < 2; let c: i32 = 1 == 2; let d = 1.5 >= 2.5 && true; let e = 2.5 < 3.5; }",
    );

    assert_eq!(
        analysis.diagnostics.errors(),
        &[
            SemanticError::DeclarationMismatch {
                name: String::from("b"),
                declared: CanonicalSort::Bool,
                inferred: CanonicalSort::Integer,
            },
            SemanticError::BinaryMismatch(String::from("declaration of d")),
        ]
    );

    let body = body_of(&analysis.table, "f");
    assert_eq!(
        value_in(&analysis.table, body, "c"),
        Some(SymbolType::Value(CanonicalSort::Integer))
    );
    assert_eq!(
        value_in(&analysis.table, body, "e"),
        Some(SymbolType::Value(CanonicalSort::Float))
    );
}

#[test]
fn unary_operands_are_transparent() {
    let analysis = check("fn f() { let n: i32 = -5; let m: bool = !true; let k = -n * 2; }");

    assert!(analysis.diagnostics.is_empty());

    let body = body_of(&analysis.table, "f");
    assert_eq!(
        value_in(&analysis.table, body, "k"),
        Some(SymbolType::Value(CanonicalSort::Integer))
    );
}

#[test]
fn parameters_are_declared_in_the_body_scope() {
    let analysis = check("fn f(a: i32, b: bool) { let c: i32 = a + 1; let d: bool = b; }");

    assert!(analysis.diagnostics.is_empty());

    let body = body_of(&analysis.table, "f");
    assert_eq!(
        value_in(&analysis.table, body, "a"),
        Some(SymbolType::Value(CanonicalSort::Integer))
    );
    assert_eq!(value_in(&analysis.table, SymbolTable::ROOT, "a"), None);
}

#[test]
fn duplicate_and_untyped_parameters() {
    assert_eq!(
        errors("fn f(a: i32, a: bool, s: str) { }"),
        vec![
            SemanticError::Redeclared(String::from("a")),
            SemanticError::UnknownType {
                name: String::from("s"),
                ty: String::from("str"),
            },
        ]
    );
}

#[test]
fn functions_are_not_values() {
    assert_eq!(
        errors("fn f() { let g = f; f = 1; }"),
        vec![
            SemanticError::NotAValue(String::from("f")),
            SemanticError::NotAValue(String::from("f")),
        ]
    );
}

#[test]
fn duplicate_function_body_is_still_checked() {
    assert_eq!(
        errors("fn f() { } fn f() { x = 1; }"),
        vec![
            SemanticError::Redeclared(String::from("f")),
            SemanticError::IdentifierNotFound(String::from("x")),
        ]
    );
}

#[test]
fn diagnostics_follow_traversal_order() {
    let messages = check("fn f() { x = 1; let y: bool = 2; if y == 1.5 { } }")
        .diagnostics
        .messages();

    assert_eq!(
        messages,
        vec![
            String::from("Identifier x not found"),
            String::from(
                "Declaration of y invalid, types mismatch (declared `bool`, inferred `integer`)"
            ),
            String::from("Identifier y not found"),
        ]
    );
}

#[test]
fn repeated_runs_are_identical() {
    let compilation = Compiler::new()
        .source("fn f() { let x = 1; let x = true; y = x + 2.5; }")
        .compile()
        .unwrap();

    let first = analyze(&compilation.arena, compilation.root);
    let second = analyze(&compilation.arena, compilation.root);

    assert_eq!(first.diagnostics.errors(), second.diagnostics.errors());
    assert_eq!(
        first.diagnostics.errors(),
        compilation.analysis.diagnostics.errors()
    );
    assert_eq!(first.diagnostics.len(), 2);
}

fn ident(arena: &mut NodeArena, name: &str) -> NodeId {
    let atom = arena.atom(name);
    arena.create(NodeKind::Ident, &[atom])
}

#[test]
fn malformed_declaration_is_reported() {
    let mut arena = NodeArena::new();
    let name = ident(&mut arena, "x");
    let pat = arena.create(NodeKind::PatIdent, &[name]);
    let decl = arena.create(NodeKind::DeclLocal, &[pat]);

    let analysis = analyze(&arena, decl);

    assert_eq!(
        analysis.diagnostics.errors(),
        &[SemanticError::Malformed(NodeKind::DeclLocal)]
    );
    assert!(!analysis.is_ok());
}

#[test]
fn invalid_operand_in_predicate() {
    let mut arena = NodeArena::new();
    let op = arena.atom("BiAdd");
    let lhs = arena.none();
    let rhs = arena.none();
    let cond = arena.create(NodeKind::ExprBinary, &[op, lhs, rhs]);
    let body = arena.create(NodeKind::ExprBlock, &[]);
    let node = arena.create(NodeKind::ExprIf, &[cond, body]);

    let analysis = analyze(&arena, node);

    assert_eq!(
        analysis.diagnostics.errors(),
        &[
            SemanticError::InvalidOperand(NodeKind::None),
            SemanticError::InvalidOperand(NodeKind::None),
        ]
    );
}

#[test]
fn missing_root_is_malformed() {
    let arena = NodeArena::new();

    let analysis = analyze(&arena, 0);

    assert_eq!(
        analysis.diagnostics.errors(),
        &[SemanticError::Malformed(NodeKind::Crate)]
    );
}
