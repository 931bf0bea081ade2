/// Read-only evaluation settings shared by every module of a project.
///
/// Builtins read it through [`CallContext::environment`](crate::CallContext);
/// distribution implementations receive it on every operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    /// Number of samples drawn when a sample set is built.
    pub sample_count: usize,
    /// Resolution of point-set conversions.
    pub xy_point_length: usize,
    /// Seed for hosts with deterministic sampling.
    pub seed: Option<String>,
}

impl Environment {
    #[must_use]
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    #[must_use]
    pub fn with_xy_point_length(mut self, xy_point_length: usize) -> Self {
        self.xy_point_length = xy_point_length;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            sample_count: 1000,
            xy_point_length: 1000,
            seed: None,
        }
    }
}
