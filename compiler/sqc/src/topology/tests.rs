use pretty_assertions::assert_eq;

use super::*;

fn graph(edges: &[(&str, &[&str])]) -> Graph {
    edges
        .iter()
        .map(|(id, deps)| {
            (
                (*id).to_string(),
                deps.iter().map(|d| (*d).to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn dependencies_come_first() {
    let g = graph(&[
        ("main", &["second", "first"]),
        ("second", &["first"]),
        ("first", &[]),
    ]);
    assert_eq!(run_order_for(&g, "main"), vec!["first", "second", "main"]);
    assert_eq!(run_order(&g), vec!["first", "second", "main"]);
}

#[test]
fn unrelated_modules_are_left_out_of_a_single_order() {
    let g = graph(&[("a", &[]), ("b", &["a"]), ("other", &[])]);
    assert_eq!(run_order_for(&g, "b"), vec!["a", "b"]);
    assert_eq!(run_order(&g), vec!["a", "b", "other"]);
}

#[test]
fn missing_modules_are_skipped() {
    let g = graph(&[("main", &["ghost"])]);
    assert_eq!(run_order_for(&g, "main"), vec!["main"]);
    assert_eq!(run_order_for(&g, "ghost"), Vec::<String>::new());
}

#[test]
fn dependents_are_transitive() {
    let g = graph(&[("a", &[]), ("b", &["a"]), ("c", &["b"]), ("d", &[])]);
    assert_eq!(dependents(&g, "a"), vec!["b", "c"]);
    assert_eq!(dependents(&g, "c"), Vec::<String>::new());
}

#[test]
fn cycles_terminate_and_are_found() {
    let g = graph(&[("a", &["b"]), ("b", &["a"]), ("c", &["a"])]);
    assert_eq!(run_order_for(&g, "a"), vec!["b", "a"]);
    assert_eq!(find_cycle(&g, "a"), Some(vec!["a".into(), "b".into(), "a".into()]));
    assert_eq!(find_cycle(&g, "b"), Some(vec!["b".into(), "a".into(), "b".into()]));
    assert_eq!(find_cycle(&g, "c"), None);
    let own = graph(&[("self", &["self"])]);
    assert_eq!(find_cycle(&own, "self"), Some(vec!["self".into(), "self".into()]));
}

#[test]
fn diff_reports_moved_and_new_ids() {
    let previous = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let current = vec!["b".to_string(), "a".to_string(), "c".to_string(), "d".to_string()];
    assert_eq!(run_order_diff(&current, &previous), vec!["b", "a", "d"]);
    assert_eq!(run_order_diff(&previous, &previous), Vec::<String>::new());
}
