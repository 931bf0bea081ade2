use pretty_assertions::assert_eq;
use sq_ir::ast::{InfixOp, NodeKind};

use super::*;

fn statements(source: &str) -> Vec<Node> {
    match parse(source, "test") {
        Ok(Ast {
            root: Node {
                kind: NodeKind::Program { statements, .. },
                ..
            },
            ..
        }) => statements,
        Ok(other) => panic!("expected a program, got {:?}", other.root),
        Err(err) => panic!("parse failed: {err}"),
    }
}

fn parse_error(source: &str) -> SyntaxError {
    match parse(source, "test") {
        Ok(ast) => panic!("expected an error, got {:?}", ast.root),
        Err(err) => err,
    }
}

#[test]
fn product_binds_tighter_than_sum() {
    let nodes = statements("1 + 2 * 3");
    let NodeKind::Infix { op, right, .. } = &nodes[0].kind else {
        panic!("expected infix");
    };
    assert_eq!(*op, InfixOp::Add);
    assert!(matches!(
        right.kind,
        NodeKind::Infix {
            op: InfixOp::Multiply,
            ..
        }
    ));
}

#[test]
fn power_is_right_associative() {
    let nodes = statements("2 ^ 3 ^ 2");
    let NodeKind::Infix { op, left, right } = &nodes[0].kind else {
        panic!("expected infix");
    };
    assert_eq!(*op, InfixOp::Power);
    assert_eq!(left.kind, NodeKind::Number(2.0));
    assert!(matches!(
        right.kind,
        NodeKind::Infix {
            op: InfixOp::Power,
            ..
        }
    ));
}

#[test]
fn definitions_and_calls_are_told_apart() {
    let nodes = statements("f(x) = x + 1\nf(2)");
    assert!(matches!(nodes[0].kind, NodeKind::Defun { .. }));
    assert!(matches!(nodes[1].kind, NodeKind::Call { .. }));
}

#[test]
fn braces_disambiguate() {
    let nodes = statements("a = {x: 1}\nb = {|x| x}\nc = { y = 2; y }");
    let values: Vec<_> = nodes
        .iter()
        .map(|node| match &node.kind {
            NodeKind::Let { value, .. } => &value.kind,
            other => panic!("expected let, got {other:?}"),
        })
        .collect();
    assert!(matches!(values[0], NodeKind::Dict(_)));
    assert!(matches!(values[1], NodeKind::Lambda { .. }));
    assert!(matches!(values[2], NodeKind::Block(_)));
}

#[test]
fn multiline_lists_and_calls() {
    let nodes = statements("xs = [\n  1,\n  2,\n]\nf(\n 1,\n 2\n)");
    let NodeKind::Let { value, .. } = &nodes[0].kind else {
        panic!("expected let");
    };
    assert!(matches!(&value.kind, NodeKind::Array(items) if items.len() == 2));
    assert!(matches!(&nodes[1].kind, NodeKind::Call { args, .. } if args.len() == 2));
}

#[test]
fn both_ternary_forms() {
    let nodes = statements("a = true ? 1 : 2\nif a == 1 then 3 else 4");
    assert!(matches!(&nodes[1].kind, NodeKind::Ternary { .. }));
}

#[test]
fn pipe_prepends_value() {
    let nodes = statements("3 -> List.upTo(5)");
    let NodeKind::Pipe { callee, args, .. } = &nodes[0].kind else {
        panic!("expected pipe");
    };
    assert_eq!(callee.kind, NodeKind::Identifier("List.upTo".into()));
    assert_eq!(args.len(), 1);
}

#[test]
fn decorators_attach_to_following_statement() {
    let nodes = statements("@name(\"Speed\")\n@hide\nspeed = 5");
    let NodeKind::Decorated { decorator, statement } = &nodes[0].kind else {
        panic!("expected decorator");
    };
    assert_eq!(decorator.name.name, "name");
    assert!(matches!(statement.kind, NodeKind::Decorated { .. }));
}

#[test]
fn imports_are_collected() {
    let ast = match parse("import \"./a\" as a\n#include \"b\"\nx = 1", "main") {
        Ok(ast) => ast,
        Err(err) => panic!("parse failed: {err}"),
    };
    let NodeKind::Program { imports, .. } = ast.root.kind else {
        panic!("expected program");
    };
    assert_eq!(imports.len(), 2);
    assert_eq!(imports[0].alias.as_deref(), Some("a"));
    assert!(imports[1].is_direct());
}

#[test]
fn import_header_scan_ignores_body_errors() {
    let imports = parse_imports("#include \"common\"\nx = (", "main");
    assert_eq!(imports.map(|found| found.len()), Ok(1));
}

#[test]
fn import_without_alias_is_rejected() {
    let Err(err) = parse_imports("import \"a\"", "main") else {
        panic!("expected error");
    };
    assert_eq!(err.to_string(), "Expected `as`, found end of input");
}

#[test]
fn late_import_is_rejected() {
    assert_eq!(
        parse_error("x = 1\nimport \"a\" as a").kind,
        SyntaxErrorKind::LateImport
    );
}

#[test]
fn expression_before_end_is_rejected() {
    let err = parse_error("1\nx = 2");
    assert_eq!(err.kind, SyntaxErrorKind::ExpressionBeforeEnd);
    assert_eq!(err.location.start.line, 1);
}

#[test]
fn block_needs_result() {
    assert_eq!(
        parse_error("a = { x = 1 }").kind,
        SyntaxErrorKind::BlockWithoutResult
    );
}

#[test]
fn error_location_is_resolved() {
    let err = parse_error("x = 1\ny = )");
    assert_eq!(err.location.start.line, 2);
    assert_eq!(err.location.start.column, 5);
    assert_eq!(err.location.source.as_ref(), "test");
    assert_eq!(err.to_string(), "Expected an expression, found `)`");
}

#[test]
fn deeply_nested_parens_do_not_overflow() {
    let source = format!("{}1{}", "(".repeat(5_000), ")".repeat(5_000));
    assert_eq!(statements(&source)[0].kind, NodeKind::Number(1.0));
}
