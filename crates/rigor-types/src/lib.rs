//! Rigor Type System
//!
//! Type specifications, runtime values, the annotation grammar and the
//! structural matcher used by the rigor contract engine.

#![warn(missing_docs)]

pub mod error;
pub mod lexer;
pub mod matcher;
pub mod parse;
pub mod spec;
pub mod value;

pub use error::TypeError;
pub use matcher::{matches, type_name};
pub use parse::parse_spec;
pub use spec::{ContainerKind, PrimitiveType, TypeSpec};
pub use value::{ObjectHandle, Value};
