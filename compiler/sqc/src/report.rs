//! Terminal rendering of module errors.
//!
//! Errors that point into a module are drawn with `ariadne` over that
//! module's text; the call chain and import chain follow as plain lines.
//! Errors without a location, or whose module text is gone, render as the
//! plain message with its traces.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::{Project, SqError};

fn label_message(error: &SqError) -> &'static str {
    match error.root() {
        SqError::Syntax(_) => "syntax error here",
        SqError::Compile(_) => "rejected here",
        SqError::Runtime(_) => "raised here",
        SqError::Import(_) | SqError::Other(_) => "here",
    }
}

/// Render `error`, looking module text up in `project`.
pub fn render_error(error: &SqError, project: &Project, color: bool) -> String {
    let located = error.location().and_then(|location| {
        project
            .get_source(&location.source)
            .map(|text| (location, text))
    });
    let Some((location, text)) = located else {
        return format!("Error: {}\n", error.to_string_with_stack_trace());
    };

    let id: &str = &location.source;
    let start = (location.start.offset as usize).min(text.len());
    let end = (location.end.offset as usize).clamp(start, text.len());
    // Zero-width spans are widened so the label has something to underline.
    let end = if end == start { (start + 1).min(text.len()) } else { end };

    let mut out = Vec::new();
    let written = Report::build(ReportKind::Error, id, start)
        .with_message(error.root().to_string())
        .with_config(Config::default().with_color(color))
        .with_label(
            Label::new((id, start..end))
                .with_message(label_message(error))
                .with_color(Color::Red),
        )
        .finish()
        .write((id, Source::from(text)), &mut out);
    if written.is_err() {
        return format!("Error: {}\n", error.to_string_with_stack_trace());
    }

    let mut rendered = String::from_utf8_lossy(&out).into_owned();
    let full = error.to_string_with_stack_trace();
    let traces = full
        .strip_prefix(&error.root().to_string())
        .unwrap_or_default()
        .trim_start_matches('\n');
    if !traces.is_empty() {
        rendered.push_str(traces);
        rendered.push('\n');
    }
    rendered
}
