//! Immutable call chain for stack traces.
//!
//! A [`FrameStack`] is a persistent singly linked list. `extend` allocates
//! one node and shares the rest, so every nested call keeps a cheap handle
//! on the full chain that led to it.

use std::fmt;
use std::sync::Arc;

use sq_ir::LocationRange;

/// Name of the frame for code outside any lambda.
pub const TOP_FRAME_NAME: &str = "<top>";

/// One entry: the function that was running and where it made the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub name: Arc<str>,
    pub location: Option<LocationRange>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug)]
struct FrameNode {
    frame: Frame,
    parent: Option<Arc<FrameNode>>,
}

#[derive(Clone, Debug, Default)]
pub struct FrameStack {
    head: Option<Arc<FrameNode>>,
    len: usize,
}

impl FrameStack {
    pub fn new() -> Self {
        FrameStack::default()
    }

    /// New stack with one more frame on top; `self` is unchanged.
    #[must_use]
    pub fn extend(&self, name: impl Into<Arc<str>>, location: Option<LocationRange>) -> Self {
        FrameStack {
            head: Some(Arc::new(FrameNode {
                frame: Frame {
                    name: name.into(),
                    location,
                },
                parent: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Frames from the innermost call outwards.
    pub fn frames(&self) -> Frames<'_> {
        Frames {
            next: self.head.as_deref(),
        }
    }

    /// Innermost frame.
    pub fn top(&self) -> Option<&Frame> {
        self.head.as_deref().map(|node| &node.frame)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl PartialEq for FrameStack {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.frames().eq(other.frames())
    }
}

/// One line per frame, innermost first, each indented by two spaces.
impl fmt::Display for FrameStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {frame}")?;
        }
        Ok(())
    }
}

pub struct Frames<'a> {
    next: Option<&'a FrameNode>,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.parent.as_deref();
        Some(&node.frame)
    }
}

#[cfg(test)]
mod tests;
