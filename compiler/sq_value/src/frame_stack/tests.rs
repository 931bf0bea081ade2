use pretty_assertions::assert_eq;
use sq_ir::{LineIndex, Span};

use super::*;

fn names(stack: &FrameStack) -> Vec<String> {
    stack.frames().map(|frame| frame.name.to_string()).collect()
}

#[test]
fn frames_are_innermost_first() {
    let stack = FrameStack::new()
        .extend(TOP_FRAME_NAME, None)
        .extend("h", None)
        .extend("g", None);
    assert_eq!(names(&stack), vec!["g", "h", "<top>"]);
    assert_eq!(stack.len(), 3);
    assert_eq!(stack.top().map(|f| f.name.as_ref()), Some("g"));
}

#[test]
fn extend_does_not_touch_the_original() {
    let base = FrameStack::new().extend("a", None);
    let left = base.extend("b", None);
    let right = base.extend("c", None);
    assert_eq!(names(&base), vec!["a"]);
    assert_eq!(names(&left), vec!["b", "a"]);
    assert_eq!(names(&right), vec!["c", "a"]);
}

#[test]
fn display_includes_locations() {
    let index = LineIndex::new("main", "x = 1\ny = f(x)");
    let stack = FrameStack::new()
        .extend(TOP_FRAME_NAME, Some(index.location(Span::new(10, 14))))
        .extend("f", None);
    assert_eq!(
        stack.to_string(),
        "  f\n  <top> at line 2, column 5, file main"
    );
}

#[test]
fn equality_compares_frames() {
    let a = FrameStack::new().extend("f", None);
    let b = FrameStack::new().extend("f", None);
    assert_eq!(a, b);
    assert_ne!(a, b.extend("g", None));
    assert!(FrameStack::new().is_empty());
}
