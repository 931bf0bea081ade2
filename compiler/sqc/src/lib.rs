//! Squiggle projects and the `sq` command line.
//!
//! A [`Project`] holds named modules, works out which ones depend on which
//! through `continues` lists and import statements, and evaluates them in
//! dependency order, caching each module's result and bindings until an
//! edit invalidates them. [`evaluate`] is the single-module shortcut.
//!
//! # Example
//!
//! ```
//! use sqc::Project;
//!
//! let mut project = Project::new();
//! project.set_source("prices", "apple = 3\npear = 4");
//! project.set_source("main", "apple + pear");
//! project.set_continues("main", vec!["prices".to_string()]).ok();
//! project.run("main").ok();
//! assert_eq!(project.get_result("main").map(|v| v.to_string()), Ok("7".to_string()));
//! ```
//!
//! # Tracing
//!
//! The `sq` binary logs through `tracing` when `RUST_LOG` is set, e.g.
//! `RUST_LOG=sqc=debug` for module stage transitions or
//! `RUST_LOG=sq_library=trace` for overload dispatch. Set `SQ_LOG_TREE=1`
//! as well for indented span trees.

mod error;
mod item;
mod project;
mod report;
mod resolver;
mod shared;
mod topology;

use std::sync::Once;

use sq_value::{Namespace, Value};

pub use error::{ImportError, ImportSite, SqError};
pub use item::{Include, ModuleOutput, ProjectItem, Stage};
pub use project::Project;
pub use report::render_error;
pub use resolver::{IdentityResolver, RelativePathResolver, ResolveError, Resolver};
pub use shared::SharedProject;

/// Module id used by [`evaluate`].
pub const MAIN_SOURCE_ID: &str = "main";

/// Evaluate one self-contained program.
///
/// Returns the program's result and its top-level bindings. Imports are
/// rejected, since there is nothing to resolve them against.
pub fn evaluate(source: &str) -> (Result<Value, SqError>, Namespace) {
    let mut project = Project::new();
    project.set_source(MAIN_SOURCE_ID, source);
    project.run_all();
    (
        project.get_result(MAIN_SOURCE_ID),
        project.get_bindings(MAIN_SOURCE_ID),
    )
}

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber if `RUST_LOG` is set.
///
/// Safe to call more than once; only the first call does anything.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var("SQ_LOG_TREE").is_ok() {
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
