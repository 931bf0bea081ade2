//! Recursion safety for the parser and the reducer.
//!
//! Two independent guards live here:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand so that
//!   deeply nested source (long `a + b + c + ...` chains, nested blocks)
//!   never overflows the host thread.
//! - [`DepthLimit`] counts nested language-level calls so that unbounded
//!   recursion in user code fails with a diagnostic instead of exhausting
//!   memory while the stack keeps growing.
//!
//! # Platform Support
//!
//! - **Native targets**: stack growth uses `stacker::maybe_grow`.
//! - **WASM targets**: passthrough; the depth limit still applies.

use std::fmt;

/// Remaining stack below which we grow (1MB).
///
/// One lambda call in an unoptimized build spans several reducer frames
/// between two checks, so the zone must cover that whole step.
const RED_ZONE: usize = 1024 * 1024;

/// Size of each new stack segment (8MB).
const STACK_PER_RECURSION: usize = 8 * 1024 * 1024;

/// Default maximum number of nested lambda calls.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Returned by [`DepthLimit::enter`] when the limit is reached.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    pub limit: usize,
}

impl fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "maximum depth exceeded (limit: {})", self.limit)
    }
}

impl std::error::Error for DepthExceeded {}

/// Counter of nested calls with an upper bound.
///
/// `enter` and `exit` must be paired; the reducer does this around every
/// lambda invocation, including failing ones.
#[derive(Clone, Debug)]
pub struct DepthLimit {
    current: usize,
    max: usize,
}

impl DepthLimit {
    pub fn new(max: usize) -> Self {
        DepthLimit { current: 0, max }
    }

    /// Current nesting depth.
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    /// Record one more level of nesting.
    pub fn enter(&mut self) -> Result<(), DepthExceeded> {
        if self.current >= self.max {
            return Err(DepthExceeded { limit: self.max });
        }
        self.current += 1;
        Ok(())
    }

    /// Leave one level of nesting.
    #[inline]
    pub fn exit(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

impl Default for DepthLimit {
    fn default() -> Self {
        DepthLimit::new(DEFAULT_MAX_DEPTH)
    }
}
