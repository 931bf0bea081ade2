use std::collections::HashMap;

use pretty_assertions::assert_eq;
use sqc::{IdentityResolver, Project, SqError};

use crate::common::{ids, result};

#[test]
fn aliased_imports_bind_a_record() {
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("lib", "rate = 0.05\nyears = 10");
    project.set_source("main", "import \"lib\" as lib\nlib.years * 2");
    project.run("main").unwrap();
    assert_eq!(result(&project, "main"), "20");
    assert_eq!(
        project.get_include_as_variables("main"),
        vec![("lib".to_string(), "lib".to_string())]
    );
    assert_eq!(project.get_includes("main"), Ok(ids(&["lib"])));
}

#[test]
fn direct_includes_merge_bindings() {
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("lib", "years = 10");
    project.set_source("main", "#include \"lib\"\nyears + 1");
    project.run_all();
    assert_eq!(result(&project, "main"), "11");
    assert_eq!(project.get_past_chain("main"), ids(&["lib"]));
}

#[test]
fn includes_are_unknown_until_read() {
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("main", "#include \"lib\"\n1");
    assert_eq!(
        project.get_includes("main").map_err(|e| e.to_string()),
        Err("Need to run".to_string())
    );
    project.parse_includes("main").unwrap();
    assert_eq!(project.get_includes("main"), Ok(ids(&["lib"])));
}

#[test]
fn cycles_fail_every_module_on_them() {
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("a", "import \"b\" as b\n1");
    project.set_source("b", "import \"a\" as a\n2");
    project.set_source("c", "import \"a\" as a\n3");
    project.run_all();
    assert_eq!(result(&project, "a"), "error: Circular import: a -> b -> a");
    assert_eq!(result(&project, "b"), "error: Circular import: b -> a -> b");

    let Err(SqError::Import(error)) = project.get_result("c") else {
        panic!("expected an import error");
    };
    assert_eq!(error.to_string(), "Circular import: a -> b -> a");
    assert_eq!(error.failed_module(), Some("a"));
}

#[test]
fn breaking_a_cycle_recovers() {
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("a", "import \"b\" as b\nb.y + 1");
    project.set_source("b", "import \"a\" as a\ny = 2");
    project.run_all();
    assert!(result(&project, "a").starts_with("error: Circular import"));

    project.set_source("b", "y = 2");
    project.run_all();
    assert_eq!(result(&project, "a"), "3");
}

#[test]
fn missing_dependencies_are_reported_until_added() {
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("main", "#include \"ghost\"\nboo");
    project.run_all();
    assert_eq!(result(&project, "main"), "error: Dependency ghost is missing");

    project.set_source("ghost", "boo = 5");
    project.run_all();
    assert_eq!(result(&project, "main"), "5");
}

#[test]
fn removing_a_source_invalidates_dependents() {
    let mut project = Project::new();
    project.set_source("lib", "x = 1");
    project.set_source("main", "x");
    project.set_continues("main", ids(&["lib"])).unwrap();
    project.run_all();
    assert_eq!(result(&project, "main"), "1");

    project.remove_source("lib");
    assert_eq!(project.source_ids(), ids(&["main"]));
    project.run_all();
    assert_eq!(result(&project, "main"), "error: Dependency lib is missing");
}

#[test]
fn imports_need_a_resolver() {
    let mut project = Project::new();
    project.set_source("lib", "x = 1");
    project.set_source("main", "import \"lib\" as lib\nlib.x");
    project.run_all();
    assert_eq!(
        result(&project, "main"),
        "error: Can't use imports when no resolver is configured"
    );
}

#[test]
fn unknown_ids_are_rejected() {
    let mut project = Project::new();
    assert_eq!(
        project.run("nowhere").map_err(|e| e.to_string()),
        Err("Source nowhere not found".to_string())
    );
}

#[test]
fn run_with_imports_loads_transitively() {
    let files: HashMap<&str, &str> = HashMap::from([
        ("a", "import \"b\" as b\nv = b.w + 1"),
        ("b", "w = 20"),
    ]);
    let mut loaded = Vec::new();
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("main", "import \"a\" as a\na.v * 2");
    project
        .run_with_imports("main", |id| {
            loaded.push(id.to_string());
            files
                .get(id)
                .map(|text| (*text).to_string())
                .ok_or_else(|| SqError::other(format!("no file {id}")))
        })
        .unwrap();
    assert_eq!(loaded, ids(&["a", "b"]));
    assert_eq!(result(&project, "main"), "42");
}

#[test]
fn loader_failures_stop_the_run() {
    let mut project = Project::with_resolver(IdentityResolver);
    project.set_source("main", "import \"absent\" as absent\n1");
    let outcome = project.run_with_imports("main", |id| Err(SqError::other(format!("no file {id}"))));
    assert_eq!(outcome, Err(SqError::other("no file absent")));
    assert_eq!(project.source_ids(), ids(&["main"]));
}
