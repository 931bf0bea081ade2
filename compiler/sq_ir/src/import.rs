use crate::Span;

/// One import statement found in a module header.
///
/// `#include "x"` has no alias and merges `x`'s bindings directly;
/// `#include "x" as v` and `import "x" as v` bind `v` to a record of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    pub path: String,
    pub alias: Option<String>,
    pub span: Span,
}

impl ImportDecl {
    pub fn is_direct(&self) -> bool {
        self.alias.is_none()
    }
}
