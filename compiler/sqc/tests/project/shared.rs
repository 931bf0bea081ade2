use std::thread;

use pretty_assertions::assert_eq;
use sqc::{Project, SharedProject};

use crate::common::{ids, result};

#[test]
fn threads_share_one_project() {
    let shared = SharedProject::new(Project::new());
    shared.with(|project| project.set_source("base", "k = 10"));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shared = shared.clone();
            thread::spawn(move || {
                let id = format!("m{i}");
                shared.with(|project| {
                    project.set_source(&id, format!("k * {i}"));
                    project.set_continues(&id, ids(&["base"])).unwrap();
                    project.run(&id).unwrap();
                    result(project, &id)
                })
            })
        })
        .collect();

    let results: Vec<String> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(results, vec!["0", "10", "20", "30"]);
    assert_eq!(
        shared.lock().source_ids(),
        ids(&["base", "m0", "m1", "m2", "m3"])
    );
}

#[test]
fn edits_through_one_handle_are_seen_by_another() {
    let first = SharedProject::default();
    let second = first.clone();
    first.with(|project| {
        project.set_source("main", "1 + 1");
        project.run_all();
    });
    assert_eq!(second.with(|project| result(project, "main")), "2");

    second.with(|project| project.set_source("main", "2 + 2"));
    first.with(Project::run_all);
    assert_eq!(result(&first.lock(), "main"), "4");
}
