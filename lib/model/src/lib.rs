mod descriptor;
mod error;
mod escape;
mod fragment;
mod params;
mod proto;

pub use descriptor::*;
pub use error::*;
pub use escape::*;
pub use fragment::*;
pub use params::*;
pub use proto::*;

// Re-export some oxrdf types.
pub use oxrdf::{
    BlankNode, IriParseError, Literal, NamedNode, NamedNodeRef, Term, Variable,
    VariableNameParseError, VariableRef,
};
