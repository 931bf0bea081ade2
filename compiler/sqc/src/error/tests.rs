use pretty_assertions::assert_eq;
use sq_value::FrameStack;

use super::*;

fn runtime() -> SqError {
    let stack = FrameStack::new().extend("<top>", None);
    SqError::Runtime(IError::with_frame_stack(
        ErrorMessage::SymbolNotFound("x".to_string()),
        stack,
    ))
}

#[test]
fn wrapping_extends_a_single_chain() {
    let first = ImportError::wrap("b", "a", runtime());
    let second = ImportError::wrap("c", "b", SqError::Import(first));
    assert_eq!(second.to_string(), "x is not defined");
    assert_eq!(second.failed_module(), Some("a"));
    assert_eq!(second.chain().len(), 2);
    assert_eq!(second.root(), &runtime());
}

#[test]
fn import_errors_render_their_chain() {
    let error = SqError::Import(ImportError::wrap(
        "c",
        "b",
        SqError::Import(ImportError::wrap("b", "a", runtime())),
    ));
    assert_eq!(
        error.to_string_with_stack_trace(),
        "x is not defined\nStack trace:\n  <top>\nImport chain:\n  b -> a\n  c -> b"
    );
}

#[test]
fn other_errors_render_plainly() {
    let error = SqError::other("Dependency a is missing");
    assert_eq!(error.to_string_with_stack_trace(), "Dependency a is missing");
    assert_eq!(error.location(), None);
    assert_eq!(SqError::need_to_run().to_string(), "Need to run");
}
