use pretty_assertions::assert_eq;

use super::*;

#[test]
fn message_renderings() {
    assert_eq!(
        ErrorMessage::Arity {
            expected: 2,
            got: 3
        }
        .to_string(),
        "2 arguments expected. Instead 3 argument(s) were passed."
    );
    assert_eq!(
        ErrorMessage::SymbolNotFound("x".into()).to_string(),
        "x is not defined"
    );
    assert_eq!(
        ErrorMessage::NotAFunction("5".into()).to_string(),
        "5 is not a function"
    );
    assert_eq!(
        ErrorMessage::expected_type("Bool", 5).to_string(),
        "Expected type: Bool but got: 5"
    );
    assert_eq!(ErrorMessage::other("boom").to_string(), "Error: boom");
    assert_eq!(ErrorMessage::NeedToRun.to_string(), "Need to run");
}

#[test]
fn distribution_errors_render_transparently() {
    let error = IError::from(DistError::NotYetImplemented("pdf".into()));
    assert_eq!(error.to_string(), "Not yet implemented: pdf");
}

#[test]
fn frame_stack_is_attached_once() {
    let inner = FrameStack::new().extend("f", None);
    let outer = FrameStack::new().extend("g", None);
    let error = IError::new(ErrorMessage::other("x"))
        .attach_frame_stack(&inner)
        .attach_frame_stack(&outer);
    assert_eq!(error.frame_stack(), Some(&inner));
}

#[test]
fn stack_trace_rendering() {
    let stack = FrameStack::new().extend("<top>", None).extend("f", None);
    let error = IError::with_frame_stack(ErrorMessage::other("bad"), stack);
    assert_eq!(error.to_string(), "Error: bad");
    assert_eq!(
        error.to_string_with_stack_trace(),
        "Error: bad\nStack trace:\n  f\n  <top>"
    );
}

#[test]
fn no_trace_section_without_frames() {
    let error = IError::new(ErrorMessage::NeedToRun);
    assert!(!error.has_frame_stack());
    assert_eq!(error.to_string_with_stack_trace(), "Need to run");
}
