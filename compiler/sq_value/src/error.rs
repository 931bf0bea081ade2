//! Runtime error messages and the stack-carrying [`IError`].

use std::fmt::Write as _;

use crate::{DistError, FrameStack};

/// What went wrong, without where.
///
/// Builtins fail with these; the reducer turns them into [`IError`]s at the
/// nearest lambda boundary.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ErrorMessage {
    #[error("{expected} arguments expected. Instead {got} argument(s) were passed.")]
    Arity { expected: usize, got: usize },

    #[error("{0} is not defined")]
    SymbolNotFound(String),

    #[error("{0} is not a function")]
    NotAFunction(String),

    #[error("Expected type: {expected} but got: {got}")]
    ExpectedType { expected: String, got: String },

    #[error("Array index not found: {0}")]
    ArrayIndexNotFound(i64),

    #[error("Dict property not found: {0}")]
    DictPropertyNotFound(String),

    /// Aggregated overload mismatch, already formatted by the registry.
    #[error("{0}")]
    NoMatchingDefinition(String),

    #[error("Maximum call stack size exceeded (limit: {limit})")]
    RecursionLimit { limit: usize },

    #[error("Need to run")]
    NeedToRun,

    #[error(transparent)]
    Distribution(#[from] DistError),

    /// Failure raised by host code called from a builtin.
    #[error("Host error: {0}")]
    Host(String),

    #[error("Error: {0}")]
    Other(String),
}

impl ErrorMessage {
    pub fn other(message: impl Into<String>) -> Self {
        ErrorMessage::Other(message.into())
    }

    pub fn expected_type(expected: impl Into<String>, got: impl ToString) -> Self {
        ErrorMessage::ExpectedType {
            expected: expected.into(),
            got: got.to_string(),
        }
    }
}

/// A runtime error plus the call chain it was raised under.
///
/// The frame stack starts out unset. [`attach_frame_stack`] fills it the
/// first time the error crosses a lambda boundary; outer boundaries leave it
/// alone, so the recorded chain always starts at the innermost call.
///
/// [`attach_frame_stack`]: IError::attach_frame_stack
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct IError {
    message: ErrorMessage,
    frame_stack: Option<FrameStack>,
}

impl IError {
    pub fn new(message: ErrorMessage) -> Self {
        IError {
            message,
            frame_stack: None,
        }
    }

    pub fn with_frame_stack(message: ErrorMessage, frame_stack: FrameStack) -> Self {
        IError {
            message,
            frame_stack: Some(frame_stack),
        }
    }

    pub fn message(&self) -> &ErrorMessage {
        &self.message
    }

    pub fn frame_stack(&self) -> Option<&FrameStack> {
        self.frame_stack.as_ref()
    }

    pub fn has_frame_stack(&self) -> bool {
        self.frame_stack.is_some()
    }

    /// Attach `stack` unless a stack is already present.
    #[must_use]
    pub fn attach_frame_stack(mut self, stack: &FrameStack) -> Self {
        if self.frame_stack.is_none() {
            self.frame_stack = Some(stack.clone());
        }
        self
    }

    /// Message followed by the call chain, innermost first.
    pub fn to_string_with_stack_trace(&self) -> String {
        let mut out = self.message.to_string();
        if let Some(stack) = self.frame_stack.as_ref().filter(|s| !s.is_empty()) {
            let _ = write!(out, "\nStack trace:\n{stack}");
        }
        out
    }
}

impl From<ErrorMessage> for IError {
    fn from(message: ErrorMessage) -> Self {
        IError::new(message)
    }
}

impl From<DistError> for IError {
    fn from(error: DistError) -> Self {
        IError::new(ErrorMessage::Distribution(error))
    }
}

#[cfg(test)]
mod tests;
