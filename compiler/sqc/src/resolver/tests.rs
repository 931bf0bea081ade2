use pretty_assertions::assert_eq;

use super::*;

fn relative(path: &str, current: &str) -> Result<String, ResolveError> {
    RelativePathResolver.resolve(path, current)
}

#[test]
fn identity_keeps_the_written_path() {
    assert_eq!(IdentityResolver.resolve("lib", "main"), Ok("lib".to_string()));
}

#[test]
fn relative_paths_follow_the_importer() {
    assert_eq!(relative("./lib.sq", "models/main.sq"), Ok("models/lib.sq".to_string()));
    assert_eq!(relative("../shared/a.sq", "models/main.sq"), Ok("shared/a.sq".to_string()));
    assert_eq!(relative("common/b.sq", "models/main.sq"), Ok("common/b.sq".to_string()));
    assert_eq!(relative("./lib.sq", "main.sq"), Ok("lib.sq".to_string()));
}

#[test]
fn climbing_out_of_the_root_fails() {
    assert_eq!(
        relative("../../x.sq", "models/main.sq"),
        Err(ResolveError("../../x.sq escapes the project root".to_string()))
    );
}

#[test]
fn closures_are_resolvers() {
    let prefixed = |path: &str, _: &str| -> Result<String, ResolveError> { Ok(format!("hub:{path}")) };
    assert_eq!(prefixed.resolve("a", "b"), Ok("hub:a".to_string()));
}
