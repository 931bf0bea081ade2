use pretty_assertions::assert_eq;

use super::*;
use crate::IdentityResolver;

fn result(project: &Project, id: &str) -> String {
    match project.get_result(id) {
        Ok(value) => value.to_string(),
        Err(error) => format!("error: {error}"),
    }
}

#[test]
fn results_need_a_run() {
    let mut project = Project::new();
    project.set_source("main", "1 + 2");
    assert_eq!(result(&project, "main"), "error: Need to run");
    assert_eq!(project.stage("main"), Some(Stage::Source));
    assert!(project.run("main").is_ok());
    assert_eq!(result(&project, "main"), "3");
    assert_eq!(project.stage("main"), Some(Stage::Evaluated));
}

#[test]
fn unknown_sources_are_reported() {
    let mut project = Project::new();
    assert_eq!(
        project.run("nope").map_err(|e| e.to_string()),
        Err("Source nope not found".to_string())
    );
    assert_eq!(project.get_source("nope"), None);
    assert_eq!(project.get_continues("nope"), &[] as &[String]);
    assert!(project.touch_source("nope").is_err());
}

#[test]
fn editing_a_dependency_touches_its_dependents() {
    let mut project = Project::new();
    project.set_source("a", "x = 1");
    project.set_source("b", "y = x + 1");
    assert!(project.set_continues("b", vec!["a".into()]).is_ok());
    assert!(project.run("b").is_ok());
    assert_eq!(project.stage("b"), Some(Stage::Evaluated));
    project.set_source("a", "x = 10");
    assert_eq!(project.stage("a"), Some(Stage::Source));
    assert_eq!(project.stage("b"), Some(Stage::Parsed));
}

#[test]
fn cleaning_levels() {
    let mut project = Project::new();
    project.set_source("main", "1");
    project.run_all();
    assert!(project.clean_results("main").is_ok());
    assert_eq!(project.stage("main"), Some(Stage::Parsed));
    assert!(project.clean("main").is_ok());
    assert_eq!(project.stage("main"), Some(Stage::Source));
    project.run_all();
    project.clean_all_results();
    assert_eq!(project.stage("main"), Some(Stage::Parsed));
    project.clean_all();
    assert_eq!(project.stage("main"), Some(Stage::Source));
}

#[test]
fn environment_changes_invalidate_everything() {
    let mut project = Project::new();
    project.set_source("main", "1");
    project.run_all();
    assert_eq!(project.evaluation_count(), 1);
    project.set_environment(Environment::default().with_sample_count(10));
    assert_eq!(project.environment().sample_count, 10);
    assert_eq!(project.stage("main"), Some(Stage::Parsed));
    project.run_all();
    assert_eq!(project.evaluation_count(), 2);
}

#[test]
fn dependency_queries() {
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("a", "x = 1");
    project.set_source("b", "import \"a\" as a\ny = a.x");
    project.set_source("c", "z = y");
    assert!(project.set_continues("c", vec!["b".into()]).is_ok());
    assert!(project.parse_includes("b").is_ok());
    assert_eq!(project.get_includes("b").map_err(|e| e.to_string()), Ok(vec!["a".to_string()]));
    assert_eq!(project.get_immediate_dependencies("c"), vec!["b"]);
    assert_eq!(project.get_dependencies("c"), vec!["a", "b"]);
    assert_eq!(project.get_dependents("a"), vec!["b", "c"]);
    assert_eq!(project.get_run_order_for("b"), vec!["a", "b"]);
    assert_eq!(project.get_run_order(), vec!["a", "b", "c"]);
    assert_eq!(project.source_ids(), vec!["a", "b", "c"]);
}

#[test]
fn includes_are_unread_until_parsed() {
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("main", "#include \"lib\"\nx");
    assert_eq!(
        project.get_includes("main").map_err(|e| e.to_string()),
        Err("Need to run".to_string())
    );
    assert!(project.parse_includes("main").is_ok());
    assert_eq!(project.get_past_chain("main"), vec!["lib"]);
}

#[test]
fn raw_parse_reports_syntax_errors() {
    let mut project = Project::new();
    project.set_source("main", "x = ");
    assert!(matches!(project.raw_parse("main"), Err(SqError::Syntax(_))));
    project.set_source("main", "x = 1");
    assert!(project.raw_parse("main").is_ok());
    assert_eq!(project.stage("main"), Some(Stage::Parsed));
}

#[test]
fn counters_accumulate_across_modules() {
    let mut project = Project::new();
    project.set_source("a", "f(x) = x\ny = f(1)");
    project.set_source("b", "z = f(2)");
    assert!(project.set_continues("b", vec!["a".into()]).is_ok());
    project.run_all();
    assert_eq!(result(&project, "b"), "()");
    assert_eq!(project.counters().function_calls, 2);
}
