//! Public error taxonomy for project evaluation.

use std::fmt::{self, Write as _};

use sq_ir::LocationRange;
use sq_parse::{CompileError, SyntaxError};
use sq_value::{ErrorMessage, IError};

/// Any failure a module can end up with.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SqError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Static check failure, kept apart from syntax errors so a host can
    /// choose to recover from it differently.
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] IError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("{0}")]
    Other(String),
}

impl SqError {
    pub fn other(message: impl Into<String>) -> Self {
        SqError::Other(message.into())
    }

    pub(crate) fn need_to_run() -> Self {
        SqError::Runtime(IError::new(ErrorMessage::NeedToRun))
    }

    pub(crate) fn source_not_found(id: &str) -> Self {
        SqError::Other(format!("Source {id} not found"))
    }

    /// The error a failure originated with, looking through import chains.
    pub fn root(&self) -> &SqError {
        match self {
            SqError::Import(import) => import.root(),
            other => other,
        }
    }

    /// Where the originating failure points, if anywhere.
    pub fn location(&self) -> Option<&LocationRange> {
        match self.root() {
            SqError::Syntax(error) => Some(&error.location),
            SqError::Compile(error) => error.location.as_ref(),
            SqError::Runtime(error) => error
                .frame_stack()
                .and_then(|stack| stack.top())
                .and_then(|frame| frame.location.as_ref()),
            SqError::Import(_) | SqError::Other(_) => None,
        }
    }

    /// One-line message plus the call chain and import chain, if any.
    pub fn to_string_with_stack_trace(&self) -> String {
        match self {
            SqError::Runtime(error) => error.to_string_with_stack_trace(),
            SqError::Import(import) => import.to_string_with_stack_trace(),
            other => other.to_string(),
        }
    }
}

/// One edge of an import chain: `importer` depends on `imported`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSite {
    pub importer: String,
    pub imported: String,
}

impl fmt::Display for ImportSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.importer, self.imported)
    }
}

/// A failure that happened in a module this one depends on.
///
/// The chain is ordered from the failing module outwards, so the first site
/// names the module that actually failed as `imported`.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{root}")]
pub struct ImportError {
    chain: Vec<ImportSite>,
    root: Box<SqError>,
}

impl ImportError {
    /// Wrap `error`, raised while producing `imported`, for `importer`.
    ///
    /// Wrapping an import error extends its chain instead of nesting it.
    pub fn wrap(importer: &str, imported: &str, error: SqError) -> Self {
        let site = ImportSite {
            importer: importer.to_string(),
            imported: imported.to_string(),
        };
        match error {
            SqError::Import(mut inner) => {
                inner.chain.push(site);
                inner
            }
            root => ImportError {
                chain: vec![site],
                root: Box::new(root),
            },
        }
    }

    pub fn chain(&self) -> &[ImportSite] {
        &self.chain
    }

    pub fn root(&self) -> &SqError {
        &self.root
    }

    /// Id of the module the failure originated in.
    pub fn failed_module(&self) -> Option<&str> {
        self.chain.first().map(|site| site.imported.as_str())
    }

    pub fn to_string_with_stack_trace(&self) -> String {
        let mut out = self.root.to_string_with_stack_trace();
        out.push_str("\nImport chain:");
        for site in &self.chain {
            let _ = write!(out, "\n  {site}");
        }
        out
    }
}

#[cfg(test)]
mod tests;
