//! Byte spans and resolved line/column locations.

use std::fmt;
use std::sync::Arc;

/// Byte range into a module's source (end exclusive).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span for synthesized nodes.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Create from a lexer byte range, saturating at `u32::MAX`.
    #[inline]
    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        let start = u32::try_from(range.start).unwrap_or(u32::MAX);
        let end = u32::try_from(range.end).unwrap_or(u32::MAX);
        Span { start, end }
    }

    /// Smallest span covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A resolved point in a module: byte offset plus 1-based line and column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

/// A source range tagged with the id of the module it belongs to.
///
/// This is what frames and diagnostics carry. Cloning is cheap: the module
/// id is shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LocationRange {
    pub source: Arc<str>,
    pub start: Position,
    pub end: Position,
}

impl LocationRange {
    /// Byte span covered by this location.
    pub fn span(&self) -> Span {
        Span::new(self.start.offset, self.end.offset)
    }
}

impl fmt::Display for LocationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}, file {}",
            self.start.line, self.start.column, self.source
        )
    }
}

/// Offset to line/column translation for one module.
///
/// Built once per parse; lookups are a binary search over line starts.
#[derive(Clone, Debug)]
pub struct LineIndex {
    source: Arc<str>,
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(source: impl Into<Arc<str>>, text: &str) -> Self {
        let mut line_starts = vec![0];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(u32::try_from(idx + 1).unwrap_or(u32::MAX));
            }
        }
        LineIndex {
            source: source.into(),
            line_starts,
            len: u32::try_from(text.len()).unwrap_or(u32::MAX),
        }
    }

    /// Module id this index resolves locations for.
    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    pub fn position(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        Position {
            offset,
            line: u32::try_from(line + 1).unwrap_or(u32::MAX),
            column: offset - line_start + 1,
        }
    }

    pub fn location(&self, span: Span) -> LocationRange {
        LocationRange {
            source: Arc::clone(&self.source),
            start: self.position(span.start),
            end: self.position(span.end),
        }
    }
}

#[cfg(test)]
mod tests;
