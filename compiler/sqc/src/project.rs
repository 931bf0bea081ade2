//! Incremental multi-module evaluation.
//!
//! A [`Project`] owns one [`ProjectItem`] per module and recomputes only
//! what an edit invalidated:
//!
//! ```text
//! set_source ─▶ parse_includes ─▶ run order ─▶ raw_parse ─▶ link ─▶ evaluate
//!      │                              │
//!      └── touches dependents         └── touches modules whose position moved
//! ```
//!
//! Linking starts from the standard library, merges the bindings of every
//! module in the past chain (direct includes, then continues; later ones
//! win), then binds each `as` import to a record of that module's bindings.
//! A module whose dependency failed is not evaluated; it fails with an
//! [`ImportError`] pointing at the module that did.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use sq_eval::{EvalConfig, EvalCounters, Reducer};
use sq_parse::CompileError;
use sq_value::{Bindings, Environment, Namespace, Value};

use crate::item::{ModuleOutput, ProjectItem, Stage};
use crate::resolver::Resolver;
use crate::topology::{self, Graph};
use crate::{ImportError, SqError};

pub struct Project {
    items: FxHashMap<String, ProjectItem>,
    std_lib: Namespace,
    environment: Environment,
    eval_config: EvalConfig,
    /// Without one, any import statement is a compile error.
    resolver: Option<Arc<dyn Resolver>>,
    previous_run_order: Vec<String>,
    evaluations: usize,
    counters: EvalCounters,
}

impl Default for Project {
    fn default() -> Self {
        Project::new()
    }
}

impl Project {
    pub fn new() -> Self {
        Project {
            items: FxHashMap::default(),
            std_lib: sq_library::std_lib(),
            environment: Environment::default(),
            eval_config: EvalConfig::default(),
            resolver: None,
            previous_run_order: Vec::new(),
            evaluations: 0,
            counters: EvalCounters::default(),
        }
    }

    pub fn with_resolver(resolver: impl Resolver + 'static) -> Self {
        Project {
            resolver: Some(Arc::new(resolver)),
            ..Project::new()
        }
    }

    #[must_use]
    pub fn with_eval_config(mut self, eval_config: EvalConfig) -> Self {
        self.eval_config = eval_config;
        self
    }

    fn item(&self, id: &str) -> Result<&ProjectItem, SqError> {
        self.items.get(id).ok_or_else(|| SqError::source_not_found(id))
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut ProjectItem, SqError> {
        self.items
            .get_mut(id)
            .ok_or_else(|| SqError::source_not_found(id))
    }

    // Sources

    /// Add a module or replace its text. Every dependent is invalidated.
    pub fn set_source(&mut self, id: &str, source: impl Into<String>) {
        let source = source.into();
        match self.items.get_mut(id) {
            Some(item) => item.set_source(source),
            None => {
                self.items
                    .insert(id.to_string(), ProjectItem::new(id, source));
            }
        }
        tracing::debug!(module = id, "source set");
        self.touch_dependents(id);
    }

    pub fn get_source(&self, id: &str) -> Option<&str> {
        self.items.get(id).map(ProjectItem::source)
    }

    /// Drop a module. Its dependents are invalidated and will report it as
    /// missing when they next run.
    pub fn remove_source(&mut self, id: &str) {
        self.touch_dependents(id);
        if self.items.remove(id).is_some() {
            tracing::debug!(module = id, "source removed");
            self.handle_new_topology();
        }
    }

    /// Every module id, sorted.
    pub fn source_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.items.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Force a module to be parsed and evaluated again, along with its
    /// dependents.
    pub fn touch_source(&mut self, id: &str) -> Result<(), SqError> {
        self.item_mut(id)?.touch_source();
        tracing::debug!(module = id, "touched");
        self.touch_dependents(id);
        Ok(())
    }

    /// Pipeline stage a module has reached.
    pub fn stage(&self, id: &str) -> Option<Stage> {
        self.items.get(id).map(ProjectItem::stage)
    }

    pub fn get_item(&self, id: &str) -> Option<&ProjectItem> {
        self.items.get(id)
    }

    // Dependencies

    /// Replace the modules `id` continues, in link order.
    pub fn set_continues(&mut self, id: &str, continues: Vec<String>) -> Result<(), SqError> {
        self.item_mut(id)?.set_continues(continues);
        self.touch_dependents(id);
        self.handle_new_topology();
        Ok(())
    }

    /// Continued modules; empty for unknown ids.
    pub fn get_continues(&self, id: &str) -> &[String] {
        match self.items.get(id) {
            Some(item) => item.continues(),
            None => &[],
        }
    }

    /// Read and resolve the import header of `id`, unless already done.
    pub fn parse_includes(&mut self, id: &str) -> Result<(), SqError> {
        let resolver = self.resolver.as_deref();
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| SqError::source_not_found(id))?;
        if item.includes().is_none() {
            item.parse_includes(resolver);
            self.handle_new_topology();
        }
        Ok(())
    }

    /// Resolved ids of every import of `id`.
    ///
    /// Fails with "Need to run" before the header was read, and with the
    /// header's own error if it could not be read.
    pub fn get_includes(&self, id: &str) -> Result<Vec<String>, SqError> {
        match self.item(id)?.includes() {
            Some(Ok(includes)) => Ok(includes.iter().map(|i| i.id.clone()).collect()),
            Some(Err(error)) => Err(error.clone()),
            None => Err(SqError::need_to_run()),
        }
    }

    /// `(alias, module id)` for every `as` import of `id`.
    pub fn get_include_as_variables(&self, id: &str) -> Vec<(String, String)> {
        self.items
            .get(id)
            .map(ProjectItem::include_as_variables)
            .unwrap_or_default()
    }

    /// Modules whose bindings `id` merges directly: direct includes, then
    /// continues.
    pub fn get_past_chain(&self, id: &str) -> Vec<String> {
        self.items
            .get(id)
            .map(ProjectItem::past_chain)
            .unwrap_or_default()
    }

    pub fn get_immediate_dependencies(&self, id: &str) -> Vec<String> {
        self.items
            .get(id)
            .map(ProjectItem::immediate_dependencies)
            .unwrap_or_default()
    }

    fn graph(&self) -> Graph {
        self.items
            .iter()
            .map(|(id, item)| (id.clone(), item.immediate_dependencies()))
            .collect()
    }

    /// Every module in an order that runs dependencies first.
    ///
    /// Import headers that were never read do not contribute edges; `run`
    /// and `run_all` read them all before ordering.
    pub fn get_run_order(&self) -> Vec<String> {
        topology::run_order(&self.graph())
    }

    pub fn get_run_order_for(&self, id: &str) -> Vec<String> {
        topology::run_order_for(&self.graph(), id)
    }

    /// Modules that depend on `id`, directly or not, in run order.
    pub fn get_dependents(&self, id: &str) -> Vec<String> {
        topology::dependents(&self.graph(), id)
    }

    /// Modules `id` depends on, directly or not, in run order.
    pub fn get_dependencies(&self, id: &str) -> Vec<String> {
        let mut order = self.get_run_order_for(id);
        order.retain(|other| other != id);
        order
    }

    fn touch_dependents(&mut self, id: &str) {
        for dependent in topology::dependents(&self.graph(), id) {
            if let Some(item) = self.items.get_mut(&dependent) {
                tracing::debug!(module = %dependent, because = id, "touched");
                item.clean_results();
            }
        }
    }

    /// Invalidate every module whose run order position changed, so a
    /// reordering alone can never serve bindings linked in the old order.
    fn handle_new_topology(&mut self) {
        let current = self.get_run_order();
        let moved = topology::run_order_diff(&current, &self.previous_run_order);
        for id in &moved {
            if let Some(item) = self.items.get_mut(id) {
                item.clean_results();
            }
            self.touch_dependents(id);
        }
        self.previous_run_order = current;
    }

    /// Read every import header not read yet.
    fn parse_all_includes(&mut self) {
        let resolver = self.resolver.as_deref();
        let mut changed = false;
        for item in self.items.values_mut() {
            if item.includes().is_none() {
                item.parse_includes(resolver);
                changed = true;
            }
        }
        if changed {
            self.handle_new_topology();
        }
    }

    // Running

    /// Parse and lower `id`, reporting a syntax or compile error.
    pub fn raw_parse(&mut self, id: &str) -> Result<(), SqError> {
        self.item_mut(id)?.raw_parse().map(|_| ())
    }

    /// Evaluate `id` and whatever it depends on that has no cached result.
    ///
    /// Only fails for an unknown id; module failures are stored and read
    /// back with [`get_result`](Project::get_result).
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run(&mut self, id: &str) -> Result<(), SqError> {
        self.item(id)?;
        self.parse_all_includes();
        let graph = self.graph();
        let order = topology::run_order_for(&graph, id);
        self.run_ids(&order, &graph);
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run_all(&mut self) {
        self.parse_all_includes();
        let graph = self.graph();
        let order = topology::run_order(&graph);
        self.run_ids(&order, &graph);
    }

    /// Add every module `id` imports, transitively, fetching text with
    /// `load` for each one the project does not have yet.
    ///
    /// Headers that fail to parse are left for the run to report.
    pub fn load_imports_recursively<F>(&mut self, id: &str, mut load: F) -> Result<(), SqError>
    where
        F: FnMut(&str) -> Result<String, SqError>,
    {
        let mut visited = FxHashSet::default();
        self.load_imports(id, &mut load, &mut visited)
    }

    fn load_imports(
        &mut self,
        id: &str,
        load: &mut dyn FnMut(&str) -> Result<String, SqError>,
        visited: &mut FxHashSet<String>,
    ) -> Result<(), SqError> {
        if !visited.insert(id.to_string()) {
            return Ok(());
        }
        self.parse_includes(id)?;
        let Ok(includes) = self.get_includes(id) else {
            return Ok(());
        };
        for include in includes {
            if !self.items.contains_key(&include) {
                let source = load(&include)?;
                tracing::debug!(module = %include, importer = id, "loaded");
                self.set_source(&include, source);
            }
            self.load_imports(&include, load, visited)?;
        }
        Ok(())
    }

    pub fn run_with_imports<F>(&mut self, id: &str, load: F) -> Result<(), SqError>
    where
        F: FnMut(&str) -> Result<String, SqError>,
    {
        self.load_imports_recursively(id, load)?;
        self.run(id)
    }

    fn run_ids(&mut self, order: &[String], graph: &Graph) {
        for id in order {
            let cached = self.items.get(id).is_some_and(|item| item.output().is_some());
            if !cached {
                self.run_module(id, graph);
            }
        }
    }

    fn run_module(&mut self, id: &str, graph: &Graph) {
        let output = self
            .link(id, graph)
            .and_then(|linked| self.evaluate(id, linked));
        if let Err(error) = &output {
            match error {
                SqError::Import(import) => tracing::debug!(
                    module = id,
                    failed = import.failed_module(),
                    "short-circuited"
                ),
                _ => tracing::debug!(module = id, %error, "module failed"),
            }
        }
        if let Some(item) = self.items.get_mut(id) {
            item.finish(output);
        }
    }

    fn link(&self, id: &str, graph: &Graph) -> Result<Bindings, SqError> {
        let item = self.item(id)?;
        if let Some(cycle) = topology::find_cycle(graph, id) {
            let location = match (item.includes(), cycle.get(1)) {
                (Some(Ok(includes)), Some(next)) => includes
                    .iter()
                    .find(|include| &include.id == next)
                    .map(|include| include.location.clone()),
                _ => None,
            };
            return Err(SqError::Compile(CompileError::new(
                format!("Circular import: {}", cycle.join(" -> ")),
                location,
            )));
        }
        if let Some(Err(error)) = item.includes() {
            return Err(error.clone());
        }
        let mut namespace = self.std_lib.clone();
        for dependency in item.past_chain() {
            namespace = namespace.merge(&self.dependency_bindings(id, &dependency)?);
        }
        for (alias, dependency) in item.include_as_variables() {
            let bindings = self.dependency_bindings(id, &dependency)?;
            namespace = namespace.set(alias, bindings.to_value());
        }
        tracing::debug!(module = id, names = namespace.len(), "linked");
        Ok(Bindings::from_namespace(namespace))
    }

    fn dependency_bindings(&self, id: &str, dependency: &str) -> Result<Namespace, SqError> {
        let Some(item) = self.items.get(dependency) else {
            return Err(SqError::other(format!("Dependency {dependency} is missing")));
        };
        match item.output() {
            Some(Ok(output)) => Ok(output.bindings.clone()),
            Some(Err(error)) => Err(SqError::Import(ImportError::wrap(
                id,
                dependency,
                error.clone(),
            ))),
            None => Err(SqError::need_to_run()),
        }
    }

    fn evaluate(&mut self, id: &str, linked: Bindings) -> Result<ModuleOutput, SqError> {
        let item = self.item_mut(id)?;
        item.link(linked)?;
        let Some((expression, bindings)) = item.linked() else {
            return Err(SqError::need_to_run());
        };
        tracing::debug!(module = id, "evaluating");
        self.evaluations += 1;
        let mut reducer = Reducer::with_config(self.environment.clone(), &self.eval_config);
        // A child scope, so the module's own names are exactly its locals.
        let outcome = reducer.evaluate_program(&expression, bindings.extend());
        self.counters.merge(reducer.counters());
        let (result, bindings) = outcome?;
        Ok(ModuleOutput {
            result,
            bindings: bindings.locals().clone(),
        })
    }

    // Results

    /// Result of the last run of `id`; "Need to run" if it has none.
    pub fn get_result(&self, id: &str) -> Result<Value, SqError> {
        match self.item(id)?.output() {
            Some(Ok(output)) => Ok(output.result.clone()),
            Some(Err(error)) => Err(error.clone()),
            None => Err(SqError::need_to_run()),
        }
    }

    /// Top-level bindings `id` defined itself. Empty until it ran
    /// successfully.
    pub fn get_bindings(&self, id: &str) -> Namespace {
        match self.items.get(id).and_then(ProjectItem::output) {
            Some(Ok(output)) => output.bindings.clone(),
            _ => Namespace::new(),
        }
    }

    /// Drop everything derived from the text of `id`, parse included.
    pub fn clean(&mut self, id: &str) -> Result<(), SqError> {
        self.item_mut(id)?.touch_source();
        Ok(())
    }

    pub fn clean_all(&mut self) {
        for item in self.items.values_mut() {
            item.touch_source();
        }
    }

    /// Drop the link and result of `id`, keeping its parse.
    pub fn clean_results(&mut self, id: &str) -> Result<(), SqError> {
        self.item_mut(id)?.clean_results();
        Ok(())
    }

    pub fn clean_all_results(&mut self) {
        for item in self.items.values_mut() {
            item.clean_results();
        }
    }

    // Settings

    /// Replace the environment. Every cached result is dropped.
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
        self.clean_all_results();
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Replace the namespace every module links against. Every cached
    /// result is dropped.
    pub fn set_std_lib(&mut self, std_lib: Namespace) {
        self.std_lib = std_lib;
        self.clean_all_results();
    }

    pub fn std_lib(&self) -> &Namespace {
        &self.std_lib
    }

    /// Number of module evaluations performed, cached runs excluded.
    pub fn evaluation_count(&self) -> usize {
        self.evaluations
    }

    /// Reducer work summed over every evaluation.
    pub fn counters(&self) -> &EvalCounters {
        &self.counters
    }
}

#[cfg(test)]
mod tests;
