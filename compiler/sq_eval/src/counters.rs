/// Work counters for one reducer.
///
/// Hosts use `function_calls` to see whether a run actually evaluated
/// anything; the CLI prints [`report`](EvalCounters::report) under
/// `--profile`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalCounters {
    pub expressions_evaluated: u64,
    pub function_calls: u64,
}

impl EvalCounters {
    #[inline]
    pub fn count_expression(&mut self) {
        self.expressions_evaluated = self.expressions_evaluated.wrapping_add(1);
    }

    #[inline]
    pub fn count_function_call(&mut self) {
        self.function_calls = self.function_calls.wrapping_add(1);
    }

    pub fn merge(&mut self, other: &EvalCounters) {
        self.expressions_evaluated = self
            .expressions_evaluated
            .wrapping_add(other.expressions_evaluated);
        self.function_calls = self.function_calls.wrapping_add(other.function_calls);
    }

    pub fn report(&self) -> String {
        format!(
            "Evaluation profile:\n  \
             Expressions evaluated: {}\n  \
             Function calls:        {}",
            self.expressions_evaluated, self.function_calls,
        )
    }
}
