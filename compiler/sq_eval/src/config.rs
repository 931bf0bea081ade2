/// Limits applied while reducing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Nested lambda calls allowed before evaluation fails.
    pub max_call_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_call_depth: sq_stack::DEFAULT_MAX_DEPTH,
        }
    }
}
