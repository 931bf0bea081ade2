use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use sq_value::{BuiltinLambda, Lambda, Namespace, Value};
use sqc::{evaluate, Project, SqError, Stage};

use crate::common::{ids, result};

#[test]
fn stack_trace_lists_each_caller_innermost_first() {
    let (outcome, _) = evaluate(
        "f(x) = { y = \"a\"; x + y }\ng = {|x| f(x)}\nh(x) = g(x)\nh(5)",
    );
    let Err(SqError::Runtime(error)) = outcome else {
        panic!("expected a runtime error");
    };
    let frames: Vec<String> = error
        .frame_stack()
        .expect("frame stack attached")
        .frames()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        frames,
        vec![
            "f at line 1, column 19, file main",
            "g at line 2, column 10, file main",
            "h at line 3, column 8, file main",
            "<top> at line 4, column 1, file main",
        ]
    );
}

#[test]
fn dispatch_exhaustion_lists_every_signature_once() {
    let (outcome, _) = evaluate("1 + true");
    let message = outcome.expect_err("no overload takes a bool").to_string();
    assert_eq!(
        message,
        "There are function matches for add(), but with different arguments:\n  \
         add(Number, Number)\n  \
         add(String, String)\n  \
         add(Date, Duration)\n  \
         add(Duration, Duration)\n  \
         add(Date, Date)\n  \
         add(Dist, Dist|Number)\n\
         Was given arguments: (1,true)"
    );
}

#[test]
fn rerunning_without_edits_reuses_results() {
    let mut project = Project::new();
    project.set_source("main", "x = 1\nx + 1");
    project.run("main").unwrap();
    let first = result(&project, "main");
    assert_eq!(project.evaluation_count(), 1);

    project.run("main").unwrap();
    project.run_all();
    assert_eq!(result(&project, "main"), first);
    assert_eq!(project.evaluation_count(), 1);
}

#[test]
fn editing_a_source_reaches_transitive_dependents() {
    let mut project = Project::new();
    project.set_source("a", "x = 1");
    project.set_source("b", "y = x + 1");
    project.set_source("c", "y * 10");
    project.set_continues("b", ids(&["a"])).unwrap();
    project.set_continues("c", ids(&["b"])).unwrap();
    project.run("c").unwrap();
    assert_eq!(result(&project, "c"), "20");
    assert_eq!(project.evaluation_count(), 3);

    project.set_source("a", "x = 5");
    assert_eq!(project.stage("c"), Some(Stage::Parsed));
    project.run("c").unwrap();
    assert_eq!(result(&project, "c"), "60");
    assert_eq!(project.evaluation_count(), 6);
}

#[test]
fn later_predecessors_win_on_collisions() {
    let mut project = Project::new();
    project.set_source("a", "x = 1");
    project.set_source("b", "x = 2");
    project.set_source("m", "x");
    project.set_continues("m", ids(&["a", "b"])).unwrap();
    project.run("m").unwrap();
    assert_eq!(result(&project, "m"), "2");

    project.set_continues("m", ids(&["b", "a"])).unwrap();
    project.run("m").unwrap();
    assert_eq!(result(&project, "m"), "1");
}

#[test]
fn predecessors_shadow_std_lib_names() {
    let mut project = Project::new();
    project.set_source("a", "min = 5");
    project.set_source("m", "min");
    project.set_continues("m", ids(&["a"])).unwrap();
    project.run("m").unwrap();
    assert_eq!(result(&project, "m"), "5");
}

#[test]
fn a_small_later_predecessor_still_wins() {
    let mut project = Project::new();
    project.set_source("wide", "x = 1\na = 1\nb = 2\nc = 3\nd = 4\ne = 5");
    project.set_source("narrow", "x = 2");
    project.set_source("m", "x + a");
    project.set_continues("m", ids(&["wide", "narrow"])).unwrap();
    project.run("m").unwrap();
    assert_eq!(result(&project, "m"), "3");
}

#[test]
fn bindings_are_the_modules_own() {
    let mut project = Project::new();
    project.set_source("a", "x = 1");
    project.set_source("b", "y = x + 1\nz = y * 2");
    project.set_continues("b", ids(&["a"])).unwrap();
    project.run_all();
    assert_eq!(project.get_bindings("b").to_string(), "{y: 2, z: 4}");
    assert_eq!(project.get_bindings("a").to_string(), "{x: 1}");
}

fn ticking_std_lib(ticks: &Arc<AtomicUsize>) -> Namespace {
    let ticks = Arc::clone(ticks);
    sq_library::std_lib().set(
        "tick",
        Value::lambda(Lambda::builtin(BuiltinLambda::new("tick", move |_, _| {
            ticks.fetch_add(1, Ordering::SeqCst);
            Ok(Value::number(1.0))
        }))),
    )
}

#[test]
fn failures_short_circuit_dependents_only() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let mut project = Project::new();
    project.set_std_lib(ticking_std_lib(&ticks));
    project.set_source("a", "x = missing");
    project.set_source("b", "t = tick()\nt + x");
    project.set_source("independent", "tick()");
    project.set_continues("b", ids(&["a"])).unwrap();

    project.run("b").unwrap();
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
    assert_eq!(project.evaluation_count(), 1);
    let Err(SqError::Import(error)) = project.get_result("b") else {
        panic!("expected an import error");
    };
    assert_eq!(error.failed_module(), Some("a"));
    assert_eq!(error.to_string(), "missing is not defined");

    project.run_all();
    assert_eq!(result(&project, "independent"), "1");
    assert_eq!(ticks.load(Ordering::SeqCst), 1);
}

#[test]
fn fixing_the_failure_lets_dependents_run() {
    let mut project = Project::new();
    project.set_source("a", "x = missing");
    project.set_source("b", "x * 2");
    project.set_continues("b", ids(&["a"])).unwrap();
    project.run_all();
    assert_eq!(result(&project, "b"), "error: missing is not defined");

    project.set_source("a", "x = 21");
    project.run_all();
    assert_eq!(result(&project, "b"), "42");
}

#[test]
fn a_run_order_shift_alone_invalidates_the_moved_modules() {
    let mut project = Project::new();
    project.set_source("a", "1");
    project.set_source("b", "2");
    project.set_source("c", "3");
    project.run_all();
    assert_eq!(project.get_run_order(), ids(&["a", "b", "c"]));
    assert_eq!(project.evaluation_count(), 3);

    // `b` is unrelated to the edit, but its position moves from 1 to 2.
    project.set_continues("a", ids(&["c"])).unwrap();
    assert_eq!(project.get_run_order(), ids(&["c", "a", "b"]));
    assert_eq!(project.stage("b"), Some(Stage::Parsed));
    assert_eq!(project.stage("c"), Some(Stage::Parsed));

    project.run_all();
    assert_eq!(project.evaluation_count(), 6);
    assert_eq!(result(&project, "b"), "2");
}

#[test]
fn an_unchanged_run_order_keeps_other_results() {
    let mut project = Project::new();
    project.set_source("a", "1");
    project.set_source("b", "2");
    project.set_source("c", "3");
    project.run_all();

    project.set_continues("c", ids(&["b"])).unwrap();
    assert_eq!(project.get_run_order(), ids(&["a", "b", "c"]));
    assert_eq!(project.stage("a"), Some(Stage::Evaluated));
    assert_eq!(project.stage("b"), Some(Stage::Evaluated));
    assert_eq!(project.stage("c"), Some(Stage::Parsed));

    project.run_all();
    assert_eq!(project.evaluation_count(), 4);
}

#[test]
fn comparisons_with_nan_are_false() {
    let (outcome, _) = evaluate("0/0 < 1");
    assert_eq!(outcome.map(|v| v.to_string()), Ok("false".to_string()));
}

#[test]
fn block_comments_are_ignored() {
    let (outcome, _) = evaluate("/* c */ 1 /* a * b */ + 2");
    assert_eq!(outcome.map(|v| v.to_string()), Ok("3".to_string()));
}

#[test]
fn run_orders_follow_continues() {
    let mut project = Project::new();
    project.set_source("first", "a = 1");
    project.set_source("second", "b = a + 1");
    project.set_source("main", "a + b");
    project.set_continues("second", ids(&["first"])).unwrap();
    project.set_continues("main", ids(&["first", "second"])).unwrap();
    assert_eq!(project.get_run_order_for("main"), ids(&["first", "second", "main"]));
    assert_eq!(project.get_dependents("first"), ids(&["second", "main"]));
    project.run_all();
    assert_eq!(result(&project, "main"), "3");
}

#[test]
fn single_shot_evaluation_returns_bindings() {
    let (outcome, bindings) = evaluate("x = 2\ny = x ^ 3\ny - 1");
    assert_eq!(outcome.map(|v| v.to_string()), Ok("7".to_string()));
    assert_eq!(bindings.to_string(), "{x: 2, y: 8}");
}

fn sample_count_std_lib() -> Namespace {
    sq_library::std_lib().set(
        "sampleCount",
        Value::lambda(Lambda::builtin(BuiltinLambda::new("sampleCount", |_, context| {
            Ok(Value::number(context.environment().sample_count as f64))
        }))),
    )
}

#[test]
fn environment_reaches_builtins() {
    let mut project = Project::new();
    project.set_std_lib(sample_count_std_lib());
    project.set_environment(project.environment().clone().with_sample_count(5));
    project.set_source("main", "sampleCount()");
    project.run_all();
    assert_eq!(result(&project, "main"), "5");
    let before = project.evaluation_count();

    project.set_environment(project.environment().clone().with_sample_count(7));
    assert_eq!(project.stage("main"), Some(Stage::Parsed));
    project.run_all();
    assert_eq!(result(&project, "main"), "7");
    assert_eq!(project.evaluation_count(), before + 1);
}
