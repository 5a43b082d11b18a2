//! Rigor Engine
//!
//! Static object discipline for a dynamic object model: classes declared at
//! run time are verified for annotations and override contracts, calls are
//! type checked at their boundary, attribute writes are type and const
//! checked, and reads of protected and private members are authorized
//! against the identity of the calling code.
//!
//! ```ignore
//! let mut builder = Runtime::builder();
//! builder.declare(
//!     ClassDecl::new("Counter").field("_count", "int").constructor(
//!         CallableDecl::method()
//!             .returns("None")
//!             .body(|f| f.set_self("_count", 0).map(|_| Value::None)),
//!     ),
//! )?;
//! let runtime = builder.build()?;
//! let counter = runtime.main().instantiate("Counter", Args::new())?;
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod contract;
pub mod error;
pub mod runtime;
pub mod verifier;

pub use config::{DisciplineConfig, EngineConfig, Mode};
pub use contract::{
    Annotation, CallableDecl, CallableKind, ClassDecl, ClassDescriptor, FriendSpecifier,
    FunctionDecl, MethodDescriptor, MethodFlags, Visibility,
};
pub use error::{ConfigError, DeclarationError, OverrideProblem, RuntimeError};
pub use runtime::{Args, CallerIdentity, Frame, ObjectRef, Runtime, RuntimeBuilder};

pub use rigor_types::{TypeSpec, Value};
