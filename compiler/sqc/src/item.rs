//! Per-module pipeline cache.
//!
//! A module moves through `Source < Parsed < Linked < Evaluated`. Editing
//! its source drops it back to `Source`; invalidation caused by another
//! module only drops it back to `Parsed`, since parsing depends on nothing
//! but the module's own text.
//!
//! The import header is cached beside the stages. It is recomputed only
//! when the source changes, because the dependency graph is built from it.

use std::sync::Arc;

use sq_ir::{Expression, LineIndex, LocationRange};
use sq_parse::{lower, parse, parse_imports, CompileError};
use sq_value::{Bindings, Namespace, Value};

use crate::resolver::Resolver;
use crate::SqError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Source,
    Parsed,
    Linked,
    Evaluated,
}

/// One resolved import statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Include {
    /// Resolved module id.
    pub id: String,
    /// `as` name; `None` for a direct include.
    pub alias: Option<String>,
    pub location: LocationRange,
}

/// What a successful run leaves behind.
#[derive(Clone, Debug)]
pub struct ModuleOutput {
    pub result: Value,
    /// The module's own top-level bindings, without anything it linked in.
    pub bindings: Namespace,
}

type Parsed = Result<Arc<Expression>, SqError>;

#[derive(Clone, Debug)]
enum State {
    Source,
    Parsed(Parsed),
    Linked {
        parsed: Arc<Expression>,
        linked: Bindings,
    },
    /// `parsed` is `None` when the run failed before the module was parsed.
    Evaluated {
        parsed: Option<Parsed>,
        output: Result<ModuleOutput, SqError>,
    },
}

#[derive(Clone, Debug)]
pub struct ProjectItem {
    source_id: String,
    source: String,
    continues: Vec<String>,
    includes: Option<Result<Vec<Include>, SqError>>,
    state: State,
}

impl ProjectItem {
    pub fn new(source_id: impl Into<String>, source: impl Into<String>) -> Self {
        ProjectItem {
            source_id: source_id.into(),
            source: source.into(),
            continues: Vec::new(),
            includes: None,
            state: State::Source,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn continues(&self) -> &[String] {
        &self.continues
    }

    pub fn stage(&self) -> Stage {
        match self.state {
            State::Source => Stage::Source,
            State::Parsed(_) => Stage::Parsed,
            State::Linked { .. } => Stage::Linked,
            State::Evaluated { .. } => Stage::Evaluated,
        }
    }

    /// Includes as parsed, or `None` before the header was read.
    pub fn includes(&self) -> Option<&Result<Vec<Include>, SqError>> {
        self.includes.as_ref()
    }

    /// Ids this module needs to have run first: includes, then continues.
    ///
    /// A header that failed to parse contributes nothing; the module fails
    /// on its own when it runs.
    pub fn immediate_dependencies(&self) -> Vec<String> {
        let mut ids: Vec<String> = match &self.includes {
            Some(Ok(includes)) => includes.iter().map(|i| i.id.clone()).collect(),
            _ => Vec::new(),
        };
        ids.extend(self.continues.iter().cloned());
        ids
    }

    /// Modules whose bindings are merged directly: direct includes, then
    /// continues. Later entries win on name collisions.
    pub fn past_chain(&self) -> Vec<String> {
        let mut ids: Vec<String> = match &self.includes {
            Some(Ok(includes)) => includes
                .iter()
                .filter(|i| i.alias.is_none())
                .map(|i| i.id.clone())
                .collect(),
            _ => Vec::new(),
        };
        ids.extend(self.continues.iter().cloned());
        ids
    }

    /// `(alias, module id)` for every `as` import.
    pub fn include_as_variables(&self) -> Vec<(String, String)> {
        match &self.includes {
            Some(Ok(includes)) => includes
                .iter()
                .filter_map(|i| i.alias.clone().map(|alias| (alias, i.id.clone())))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn output(&self) -> Option<&Result<ModuleOutput, SqError>> {
        match &self.state {
            State::Evaluated { output, .. } => Some(output),
            _ => None,
        }
    }

    // Touching

    pub(crate) fn set_source(&mut self, source: String) {
        self.source = source;
        self.includes = None;
        self.state = State::Source;
    }

    /// Forget everything derived from the text, except the import header.
    pub(crate) fn touch_source(&mut self) {
        self.state = State::Source;
    }

    /// Forget linking and results, keeping the parse.
    pub(crate) fn clean_results(&mut self) {
        let state = std::mem::replace(&mut self.state, State::Source);
        self.state = match state {
            State::Source => State::Source,
            State::Parsed(parsed) => State::Parsed(parsed),
            State::Linked { parsed, .. } => State::Parsed(Ok(parsed)),
            State::Evaluated { parsed, .. } => parsed.map_or(State::Source, State::Parsed),
        };
    }

    pub(crate) fn set_continues(&mut self, continues: Vec<String>) {
        self.continues = continues;
        self.clean_results();
    }

    // Advancing

    /// Read and resolve the import header, unless already done.
    pub(crate) fn parse_includes(&mut self, resolver: Option<&dyn Resolver>) {
        if self.includes.is_some() {
            return;
        }
        let includes = self.read_includes(resolver);
        if let Err(error) = &includes {
            tracing::debug!(module = %self.source_id, %error, "import header failed");
        }
        self.includes = Some(includes);
    }

    fn read_includes(&self, resolver: Option<&dyn Resolver>) -> Result<Vec<Include>, SqError> {
        let declarations = parse_imports(&self.source, &self.source_id)?;
        let line_index = LineIndex::new(self.source_id.as_str(), &self.source);
        declarations
            .into_iter()
            .map(|declaration| {
                let location = line_index.location(declaration.span);
                let Some(resolver) = resolver else {
                    return Err(SqError::Compile(CompileError::new(
                        "Can't use imports when no resolver is configured",
                        Some(location),
                    )));
                };
                let id = resolver
                    .resolve(&declaration.path, &self.source_id)
                    .map_err(|error| {
                        SqError::Compile(CompileError::new(
                            format!("Failed to resolve import \"{}\": {error}", declaration.path),
                            Some(location.clone()),
                        ))
                    })?;
                Ok(Include {
                    id,
                    alias: declaration.alias,
                    location,
                })
            })
            .collect()
    }

    /// Parse and lower the source, unless already done.
    pub(crate) fn raw_parse(&mut self) -> Result<Arc<Expression>, SqError> {
        if let Some(parsed) = self.parsed() {
            return parsed;
        }
        tracing::debug!(module = %self.source_id, "parsing");
        let parsed = parse(&self.source, &self.source_id)
            .map_err(SqError::from)
            .and_then(|ast| lower(&ast).map_err(SqError::from))
            .map(Arc::new);
        self.state = State::Parsed(parsed.clone());
        parsed
    }

    fn parsed(&self) -> Option<Parsed> {
        match &self.state {
            State::Source => None,
            State::Parsed(parsed) => Some(parsed.clone()),
            State::Linked { parsed, .. } => Some(Ok(Arc::clone(parsed))),
            State::Evaluated { parsed, .. } => parsed.clone(),
        }
    }

    /// Record the scope the module will run in. Requires a good parse.
    pub(crate) fn link(&mut self, linked: Bindings) -> Result<(), SqError> {
        let parsed = self.raw_parse()?;
        self.state = State::Linked { parsed, linked };
        Ok(())
    }

    /// Expression and scope of a linked module.
    pub(crate) fn linked(&self) -> Option<(Arc<Expression>, Bindings)> {
        match &self.state {
            State::Linked { parsed, linked } => Some((Arc::clone(parsed), linked.clone())),
            _ => None,
        }
    }

    pub(crate) fn finish(&mut self, output: Result<ModuleOutput, SqError>) {
        let parsed = self.parsed();
        self.state = State::Evaluated { parsed, output };
    }
}
