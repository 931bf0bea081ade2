use pretty_assertions::assert_eq;
use sq_value::ValueKind;

use super::*;
use crate::test_support::TestContext;
use crate::FrType as T;

fn describe_number(_: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    Ok(Value::string("number"))
}

fn describe_any(_: &[Value], _: &mut dyn CallContext) -> Result<Value, IError> {
    Ok(Value::string("any"))
}

fn two_overloads() -> Registry {
    Registry::new(vec![FrFunction::new(None, "describe")
        .definition(FnDefinition::make(vec![T::Number], T::String, describe_number))
        .definition(FnDefinition::make(vec![T::Any], T::String, describe_any))])
}

#[test]
fn first_matching_definition_wins() {
    let registry = two_overloads();
    let mut context = TestContext::default();
    let number = registry
        .call("describe", &[Value::number(1.0)], &mut context)
        .map(|v| v.to_string());
    let other = registry
        .call("describe", &[Value::bool(true)], &mut context)
        .map(|v| v.to_string());
    assert_eq!(number, Ok("'number'".to_string()));
    assert_eq!(other, Ok("'any'".to_string()));
}

#[test]
fn exhausted_dispatch_lists_every_definition() {
    let registry = Registry::new(vec![FrFunction::new(None, "add")
        .definition(FnDefinition::make(vec![T::Number, T::Number], T::Number, describe_number))
        .definition(FnDefinition::make(vec![T::String, T::String], T::String, describe_any))]);
    let mut context = TestContext::default();
    let error = registry
        .call("add", &[Value::number(1.0), Value::string("x")], &mut context)
        .err()
        .map(|e| e.to_string());
    assert_eq!(
        error.as_deref(),
        Some(
            "There are function matches for add(), but with different arguments:\n  add(Number, Number)\n  add(String, String)\nWas given arguments: (1,'x')"
        )
    );
}

#[test]
fn unknown_name_is_not_defined() {
    let registry = two_overloads();
    let mut context = TestContext::default();
    let error = registry.call("nope", &[], &mut context).err();
    assert_eq!(
        error.map(|e| e.message().clone()),
        Some(ErrorMessage::SymbolNotFound("nope".into()))
    );
}

#[test]
fn namespaced_names() {
    let plain = FrFunction::new(Some("List"), "map");
    let qualified = FrFunction::new(Some("List"), "length").requires_namespace();
    let make = FrFunction::new(Some("Calculator"), "make").requires_namespace();
    assert_eq!(plain.names(), vec!["List.map", "map"]);
    assert_eq!(qualified.names(), vec!["List.length"]);
    assert_eq!(make.names(), vec!["Calculator.make", "Calculator"]);
}

#[test]
fn shared_names_merge_definitions_in_order() {
    let registry = Registry::new(vec![
        FrFunction::new(Some("Number"), "mean").definition(FnDefinition::make(
            vec![T::array(T::Number)],
            T::Number,
            describe_number,
        )),
        FrFunction::new(Some("Dist"), "mean").definition(FnDefinition::make(
            vec![T::Dist],
            T::Number,
            describe_any,
        )),
    ]);
    assert_eq!(registry.definitions("mean").map(<[_]>::len), Some(2));
    assert_eq!(registry.definitions("Dist.mean").map(<[_]>::len), Some(1));
    assert_eq!(registry.names(), vec!["Dist.mean", "Number.mean", "mean"]);
}

#[test]
fn signatures_show_optional_and_rest_inputs() {
    let optional = FnDefinition::make(vec![T::Any], T::Any, describe_any).with_optional(T::Bool);
    let rest = FnDefinition::variadic(vec![T::String], T::Number, T::Number, describe_any);
    assert_eq!(optional.signature("hide"), "hide(any, Bool?)");
    assert_eq!(rest.signature("f"), "f(String, ...Number)");
    assert!(optional.matches(&[Value::void()]));
    assert!(!optional.matches(&[Value::void(), Value::number(1.0)]));
    assert!(rest.matches(&[Value::string("a"), Value::number(1.0), Value::number(2.0)]));
    assert!(!rest.matches(&[]));
}

#[test]
fn assert_definitions_match_then_fail() {
    let registry = Registry::new(vec![FrFunction::new(None, "add")
        .definition(FnDefinition::assert(vec![T::Bool, T::Bool], "Cannot add booleans"))]);
    let mut context = TestContext::default();
    let error = registry
        .call("add", &[Value::bool(true), Value::bool(false)], &mut context)
        .err()
        .map(|e| e.to_string());
    assert_eq!(error.as_deref(), Some("Error: Cannot add booleans"));
}

#[test]
fn std_lib_exposes_registry_and_constants() {
    let std_lib = std_lib();
    assert!(matches!(std_lib.get("add").map(Value::kind), Some(ValueKind::Lambda(_))));
    assert!(matches!(std_lib.get("List.map").map(Value::kind), Some(ValueKind::Lambda(_))));
    assert!(std_lib.get("List.length").is_some());
    assert!(std_lib.get("length").is_none());
    assert_eq!(
        std_lib.get("Math.pi").and_then(Value::as_number),
        Some(std::f64::consts::PI)
    );
}

#[test]
fn global_lambdas_dispatch() {
    let Some(add) = global_registry().make_lambda("add") else {
        panic!("add is registered");
    };
    let mut context = TestContext::default();
    let sum = context.call(&add, vec![Value::number(2.0), Value::number(3.0)]);
    assert_eq!(sum.map(|v| v.as_number()), Ok(Some(5.0)));
}
