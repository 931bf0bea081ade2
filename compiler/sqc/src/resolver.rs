//! Import path resolution.
//!
//! A [`Resolver`] turns the path written in an import statement into the id
//! of the module it names. The project never touches storage itself; hosts
//! decide what ids mean.

use std::path::{Component, Path, PathBuf};

/// Resolution failure reported back to the importing module.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ResolveError(pub String);

pub trait Resolver: Send + Sync {
    /// Resolve `path`, as written in module `current`, to a module id.
    fn resolve(&self, path: &str, current: &str) -> Result<String, ResolveError>;
}

impl<F> Resolver for F
where
    F: Fn(&str, &str) -> Result<String, ResolveError> + Send + Sync,
{
    fn resolve(&self, path: &str, current: &str) -> Result<String, ResolveError> {
        self(path, current)
    }
}

/// Uses the written path as the module id.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityResolver;

impl Resolver for IdentityResolver {
    fn resolve(&self, path: &str, _current: &str) -> Result<String, ResolveError> {
        Ok(path.to_string())
    }
}

/// Treats module ids as file paths.
///
/// `./x` and `../x` are taken relative to the importing module's directory;
/// anything else is used as is. The result is normalized lexically, so
/// `a/./b/../c` becomes `a/c`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelativePathResolver;

impl Resolver for RelativePathResolver {
    fn resolve(&self, path: &str, current: &str) -> Result<String, ResolveError> {
        let written = Path::new(path);
        let joined = if path.starts_with("./") || path.starts_with("../") {
            Path::new(current)
                .parent()
                .map_or_else(|| written.to_path_buf(), |dir| dir.join(written))
        } else {
            written.to_path_buf()
        };
        let normalized = normalize(&joined)
            .ok_or_else(|| ResolveError(format!("{path} escapes the project root")))?;
        normalized
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| ResolveError(format!("{path} is not valid UTF-8")))
    }
}

/// Fold `.` and `..` components. `None` when `..` climbs past a relative root.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) => {}
                _ => return None,
            },
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests;
