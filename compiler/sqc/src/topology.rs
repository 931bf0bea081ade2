//! Dependency graph queries.
//!
//! The graph maps each module id to its immediate dependencies. Ids that
//! appear only as dependencies (modules not loaded yet) are skipped by
//! every traversal here; linking reports them as missing.

use rustc_hash::{FxHashMap, FxHashSet};

pub type Graph = FxHashMap<String, Vec<String>>;

/// Every module, each after all of its dependencies.
///
/// Roots are visited in sorted order so the result does not depend on map
/// iteration order.
pub fn run_order(graph: &Graph) -> Vec<String> {
    let mut roots: Vec<&String> = graph.keys().collect();
    roots.sort();
    let mut walk = Walk::new(graph);
    for root in roots {
        walk.visit(root);
    }
    walk.order
}

/// `id` and everything it depends on, dependencies first.
pub fn run_order_for(graph: &Graph, id: &str) -> Vec<String> {
    let mut walk = Walk::new(graph);
    walk.visit(id);
    walk.order
}

/// Everything that depends on `id`, directly or not, in run order.
pub fn dependents(graph: &Graph, id: &str) -> Vec<String> {
    let mut reverse: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for (from, dependencies) in graph {
        for dependency in dependencies {
            reverse.entry(dependency.as_str()).or_default().push(from.as_str());
        }
    }
    let mut found: FxHashSet<&str> = FxHashSet::default();
    let mut pending = vec![id];
    while let Some(next) = pending.pop() {
        for &dependent in reverse.get(next).into_iter().flatten() {
            if dependent != id && found.insert(dependent) {
                pending.push(dependent);
            }
        }
    }
    run_order(graph)
        .into_iter()
        .filter(|other| found.contains(other.as_str()))
        .collect()
}

/// A path `id -> ... -> id`, if `id` sits on a dependency cycle.
pub fn find_cycle(graph: &Graph, id: &str) -> Option<Vec<String>> {
    fn search<'g>(
        graph: &'g Graph,
        target: &str,
        at: &'g str,
        path: &mut Vec<&'g str>,
        seen: &mut FxHashSet<&'g str>,
    ) -> bool {
        for next in graph.get(at).into_iter().flatten() {
            if next == target {
                path.push(next);
                return true;
            }
            if graph.contains_key(next) && seen.insert(next) {
                path.push(next);
                if search(graph, target, next, path, seen) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    let (start, _) = graph.get_key_value(id)?;
    let mut path = vec![start.as_str()];
    let mut seen = FxHashSet::default();
    search(graph, id, start, &mut path, &mut seen)
        .then(|| path.into_iter().map(str::to_string).collect())
}

/// Ids whose position in `current` differs from their position in
/// `previous`, including ids that are new.
pub fn run_order_diff(current: &[String], previous: &[String]) -> Vec<String> {
    current
        .iter()
        .enumerate()
        .filter(|(index, id)| previous.get(*index) != Some(*id))
        .map(|(_, id)| id.clone())
        .collect()
}

/// Depth-first post-order walk. The `visiting` set makes cycles terminate;
/// they are reported separately by [`find_cycle`].
struct Walk<'g> {
    graph: &'g Graph,
    visited: FxHashSet<&'g str>,
    order: Vec<String>,
}

impl<'g> Walk<'g> {
    fn new(graph: &'g Graph) -> Self {
        Walk {
            graph,
            visited: FxHashSet::default(),
            order: Vec::new(),
        }
    }

    fn visit(&mut self, id: &str) {
        let graph = self.graph;
        let Some((key, dependencies)) = graph.get_key_value(id) else {
            return;
        };
        if !self.visited.insert(key.as_str()) {
            return;
        }
        for dependency in dependencies {
            self.visit(dependency);
        }
        self.order.push(key.clone());
    }
}

#[cfg(test)]
mod tests;
