//! Standard library modules.

mod builtin;
mod date;
mod dict;
mod dist;
mod list;
mod math;
mod plot;
mod string;
mod tag;

use sq_value::Namespace;

use crate::FrFunction;

/// Every standard library function in declaration order.
pub(crate) fn all() -> Vec<FrFunction> {
    let mut functions = Vec::new();
    functions.extend(builtin::functions());
    functions.extend(math::functions());
    functions.extend(string::functions());
    functions.extend(list::functions());
    functions.extend(dict::functions());
    functions.extend(tag::functions());
    functions.extend(date::functions());
    functions.extend(plot::functions());
    functions.extend(dist::functions());
    functions
}

/// Non-function standard library entries.
pub(crate) fn constants() -> Namespace {
    math::constants()
}
