//! Contract metadata
//!
//! Declarations ([`ClassDecl`], [`CallableDecl`], [`FunctionDecl`]) are
//! lowered into drafts, verified, and frozen into descriptors that the
//! runtime consults on every call and attribute access.

pub mod build;
pub mod descriptor;
pub mod friends;
pub mod member;
pub mod mro;

pub use build::{DraftCallable, DraftClass, DraftParam};
pub use descriptor::{AttributeSpec, Boundary, ClassDescriptor, MethodDescriptor, ParamSpec};
pub use friends::{FriendRef, FriendSet, FriendSpecifier};
pub use member::{
    Annotation, Body, CallableDecl, CallableKind, ClassDecl, FunctionDecl, MemberDecl,
    MethodFlags, ParamDecl, ParamKind, Visibility, CONSTRUCTOR,
};
