use pretty_assertions::assert_eq;

use super::*;
use crate::parse;

fn lower_source(source: &str) -> Result<Expression, CompileError> {
    match parse(source, "test") {
        Ok(ast) => lower(&ast),
        Err(err) => panic!("parse failed: {err}"),
    }
}

fn lowered(source: &str) -> String {
    match lower_source(source) {
        Ok(expression) => expression.to_string(),
        Err(err) => panic!("lowering failed: {err}"),
    }
}

#[test]
fn operators_become_calls() {
    assert_eq!(
        lowered("1 + 2 * 3"),
        "(program (:add 1 (:multiply 2 3)))"
    );
    assert_eq!(lowered("!true"), "(program (:not true))");
    assert_eq!(lowered("-x"), "(program (:unaryMinus :x))");
}

#[test]
fn trailing_expression_is_the_result() {
    assert_eq!(lowered("x = 5\nx"), "(program :x = 5 :x)");
    assert_eq!(lowered("x = 5"), "(program :x = 5)");
}

#[test]
fn definitions_become_named_lambdas() {
    assert_eq!(lowered("f(x) = x"), "(program :f = {|x| :x})");
    let Ok(Expression {
        kind: ExpressionKind::Program { statements, .. },
        ..
    }) = lower_source("g = {|x| x}")
    else {
        panic!("expected program");
    };
    let ExpressionKind::Let { value, .. } = &statements[0].kind else {
        panic!("expected let");
    };
    assert!(matches!(
        &value.kind,
        ExpressionKind::Lambda { name: Some(name), .. } if name.as_ref() == "g"
    ));
}

#[test]
fn lookups_use_index_function() {
    assert_eq!(
        lowered("r = {a: 1}\nr.a"),
        "(program :r = {'a': 1} (:$_atIndex_$ :r 'a'))"
    );
    assert_eq!(
        lowered("xs = [1]\nxs[0]"),
        "(program :xs = [1] (:$_atIndex_$ :xs 0))"
    );
}

#[test]
fn pipe_passes_value_first() {
    assert_eq!(lowered("3 -> f(4)"), "(program (:f 3 4))");
}

#[test]
fn blocks_and_ternaries() {
    assert_eq!(lowered("{ y = 1; y }"), "(program (block :y = 1 :y))");
    assert_eq!(lowered("true ? 1 : 2"), "(program (true ? 1 : 2))");
}

#[test]
fn decorators_wrap_bound_value() {
    assert_eq!(
        lowered("@name(\"Speed\")\nx = 5"),
        "(program :x = (:Tag.name 5 'Speed'))"
    );
    assert_eq!(
        lowered("@hide\n@doc(\"d\")\nx = 5"),
        "(program :x = (:Tag.hide (:Tag.doc 5 'd')))"
    );
}

#[test]
fn duplicate_parameters_are_compile_errors() {
    let Err(err) = lower_source("f(x, x) = x") else {
        panic!("expected error");
    };
    assert_eq!(err.message, "Duplicate parameter name: x");
    assert_eq!(err.location.map(|l| l.start.column), Some(6));
}

#[test]
fn unknown_decorator_is_rejected() {
    let Err(err) = lower_source("@color(\"red\")\nx = 1") else {
        panic!("expected error");
    };
    assert_eq!(err.message, "Unknown decorator: @color");
}

#[test]
fn decorator_needs_a_binding() {
    let Err(err) = lower_source("@hide\n5") else {
        panic!("expected error");
    };
    assert_eq!(err.message, "Decorators can only be applied to bindings");
}

#[test]
fn locations_carry_module_id() {
    let Ok(expression) = lower_source("x = 1") else {
        panic!("expected success");
    };
    assert_eq!(expression.location.source.as_ref(), "test");
}
