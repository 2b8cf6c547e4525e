//! Turns resolved query descriptors into SPARQL 1.1 query strings.
//!
//! The compiler is pure. It does not look inside hand-written fragments: a malformed fragment
//! surfaces as a syntax error reported by the endpoint.

mod compiler;
mod error;
mod render;

pub use compiler::{compile, compile_count, unbound_variables, CompiledQuery, COUNT_VARIABLE};
pub use error::CompileError;
pub use render::render_where;
