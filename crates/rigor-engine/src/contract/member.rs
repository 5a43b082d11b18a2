//! Member declarations
//!
//! Builder values describing a class before it is declared: annotations,
//! plain values, callables with their markers, and friends. The runtime
//! builder lowers a [`ClassDecl`] into a frozen
//! [`ClassDescriptor`](super::ClassDescriptor).

use std::fmt;
use std::sync::Arc;

use rigor_types::{parse_spec, TypeSpec, Value};

use super::friends::{FriendRef, FriendSpecifier};
use crate::error::{DeclarationError, RuntimeError};
use crate::runtime::Frame;

/// Callable body. Receives the call frame and returns the result value.
pub type Body = Arc<dyn Fn(&Frame<'_>) -> Result<Value, RuntimeError> + Send + Sync>;

/// Name used for the constructor
pub const CONSTRUCTOR: &str = "__init__";

/// Member visibility, derived from the member name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// `__name__`: lifecycle and special members
    Special,
    /// `__name`
    Private,
    /// `_name`
    Protected,
    /// Everything else
    Public,
}

impl Visibility {
    /// Classify a member name
    pub fn of(name: &str) -> Self {
        if name.len() > 4 && name.starts_with("__") && name.ends_with("__") {
            Visibility::Special
        } else if name.starts_with("__") {
            Visibility::Private
        } else if name.starts_with('_') {
            Visibility::Protected
        } else {
            Visibility::Public
        }
    }

    /// Check if access to this member needs authorization
    pub fn is_restricted(&self) -> bool {
        matches!(self, Visibility::Private | Visibility::Protected)
    }
}

/// Method marker flags (bitflags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodFlags(u8);

impl MethodFlags {
    /// No markers
    pub const NONE: Self = Self(0x00);
    /// May be overridden
    pub const VIRTUAL: Self = Self(0x01);
    /// Must be implemented by subclasses
    pub const ABSTRACT: Self = Self(0x02);
    /// Overrides an inherited method
    pub const OVERRIDE: Self = Self(0x04);

    /// Get raw bits
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Check if all flags of `other` are set
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Union of flags
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Virtual marker set
    pub const fn is_virtual(&self) -> bool {
        self.contains(Self::VIRTUAL)
    }

    /// Abstract marker set
    pub const fn is_abstract(&self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    /// Override marker set
    pub const fn is_override(&self) -> bool {
        self.contains(Self::OVERRIDE)
    }

    /// Can be overridden (virtual or abstract)
    pub const fn is_overridable(&self) -> bool {
        self.0 & (Self::VIRTUAL.0 | Self::ABSTRACT.0) != 0
    }
}

impl fmt::Display for MethodFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.is_virtual() {
            names.push("virtual");
        }
        if self.is_abstract() {
            names.push("abstract");
        }
        if self.is_override() {
            names.push("override");
        }
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

/// Type annotation as written: either text or an already-built spec
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// Annotation text, parsed at declaration time
    Text(String),
    /// Prebuilt spec
    Spec(TypeSpec),
}

impl Annotation {
    /// Resolve into a [`TypeSpec`]; `member` names the annotated thing for errors
    pub fn resolve(&self, member: &str) -> Result<TypeSpec, DeclarationError> {
        match self {
            Annotation::Spec(spec) => Ok(spec.clone()),
            Annotation::Text(text) => {
                parse_spec(text).map_err(|source| DeclarationError::InvalidAnnotation {
                    member: member.to_string(),
                    source,
                })
            }
        }
    }
}

impl From<&str> for Annotation {
    fn from(text: &str) -> Self {
        Annotation::Text(text.to_string())
    }
}

impl From<String> for Annotation {
    fn from(text: String) -> Self {
        Annotation::Text(text)
    }
}

impl From<TypeSpec> for Annotation {
    fn from(spec: TypeSpec) -> Self {
        Annotation::Spec(spec)
    }
}

/// Parameter kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Named parameter, positional unless it follows a variadic positional
    Regular,
    /// `*args` collector
    VarPositional,
    /// `**kwargs` collector
    VarKeyword,
}

impl ParamKind {
    /// Check if this is a variadic collector
    pub fn is_variadic(&self) -> bool {
        !matches!(self, ParamKind::Regular)
    }
}

/// Declared parameter
#[derive(Debug, Clone)]
pub struct ParamDecl {
    /// Parameter name
    pub name: String,
    /// Parameter kind
    pub kind: ParamKind,
    /// Type annotation, if any
    pub annotation: Option<Annotation>,
    /// Default value, if any
    pub default: Option<Value>,
}

/// What kind of callable a member is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    /// Instance method (receiver is the object)
    Method,
    /// Static method (no receiver)
    StaticMethod,
    /// Class method (receiver is the class)
    ClassMethod,
    /// Computed attribute
    Property,
    /// Computed attribute memoized per instance
    CachedProperty,
    /// Free function registered with the runtime
    Function,
}

impl CallableKind {
    /// Check if this callable takes an implicit receiver
    pub fn has_receiver(&self) -> bool {
        matches!(
            self,
            CallableKind::Method
                | CallableKind::ClassMethod
                | CallableKind::Property
                | CallableKind::CachedProperty
        )
    }

    /// Check if this callable is read as an attribute
    pub fn is_property(&self) -> bool {
        matches!(self, CallableKind::Property | CallableKind::CachedProperty)
    }

    /// Conventional receiver name for diagnostics
    pub fn receiver_name(&self) -> &'static str {
        match self {
            CallableKind::ClassMethod => "cls",
            _ => "self",
        }
    }
}

impl fmt::Display for CallableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallableKind::Method => "method",
            CallableKind::StaticMethod => "static method",
            CallableKind::ClassMethod => "class method",
            CallableKind::Property => "property",
            CallableKind::CachedProperty => "cached property",
            CallableKind::Function => "function",
        };
        f.write_str(name)
    }
}

/// A callable member before declaration
#[derive(Clone)]
pub struct CallableDecl {
    pub(crate) kind: CallableKind,
    pub(crate) receiver_annotation: Option<Annotation>,
    pub(crate) params: Vec<ParamDecl>,
    pub(crate) returns: Option<Annotation>,
    pub(crate) flags: MethodFlags,
    pub(crate) body: Option<Body>,
}

impl fmt::Debug for CallableDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableDecl")
            .field("kind", &self.kind)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("flags", &self.flags)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

impl CallableDecl {
    fn new(kind: CallableKind) -> Self {
        Self {
            kind,
            receiver_annotation: None,
            params: Vec::new(),
            returns: None,
            flags: MethodFlags::NONE,
            body: None,
        }
    }

    /// Instance method
    pub fn method() -> Self {
        Self::new(CallableKind::Method)
    }

    /// Static method
    pub fn static_method() -> Self {
        Self::new(CallableKind::StaticMethod)
    }

    /// Class method
    pub fn class_method() -> Self {
        Self::new(CallableKind::ClassMethod)
    }

    /// Property getter
    pub fn property() -> Self {
        Self::new(CallableKind::Property)
    }

    /// Cached property getter
    pub fn cached_property() -> Self {
        Self::new(CallableKind::CachedProperty)
    }

    /// Free function
    pub fn function() -> Self {
        Self::new(CallableKind::Function)
    }

    /// Callable kind
    pub fn kind(&self) -> CallableKind {
        self.kind
    }

    /// Annotated parameter
    pub fn param(self, name: &str, annotation: impl Into<Annotation>) -> Self {
        self.push_param(name, ParamKind::Regular, Some(annotation.into()), None)
    }

    /// Annotated parameter with a default value
    pub fn param_with_default(
        self,
        name: &str,
        annotation: impl Into<Annotation>,
        default: impl Into<Value>,
    ) -> Self {
        self.push_param(
            name,
            ParamKind::Regular,
            Some(annotation.into()),
            Some(default.into()),
        )
    }

    /// Parameter without an annotation
    pub fn untyped_param(self, name: &str) -> Self {
        self.push_param(name, ParamKind::Regular, None, None)
    }

    /// `*name` collector
    pub fn variadic(self, name: &str) -> Self {
        self.push_param(name, ParamKind::VarPositional, None, None)
    }

    /// `*name` collector carrying an annotation
    pub fn annotated_variadic(self, name: &str, annotation: impl Into<Annotation>) -> Self {
        self.push_param(name, ParamKind::VarPositional, Some(annotation.into()), None)
    }

    /// `**name` collector
    pub fn keywords(self, name: &str) -> Self {
        self.push_param(name, ParamKind::VarKeyword, None, None)
    }

    /// `**name` collector carrying an annotation
    pub fn annotated_keywords(self, name: &str, annotation: impl Into<Annotation>) -> Self {
        self.push_param(name, ParamKind::VarKeyword, Some(annotation.into()), None)
    }

    /// Annotate the implicit receiver
    pub fn receiver_annotation(mut self, annotation: impl Into<Annotation>) -> Self {
        self.receiver_annotation = Some(annotation.into());
        self
    }

    /// Declare the return type
    pub fn returns(mut self, annotation: impl Into<Annotation>) -> Self {
        self.returns = Some(annotation.into());
        self
    }

    /// Mark virtual
    pub fn virtual_method(mut self) -> Self {
        self.flags = self.flags.union(MethodFlags::VIRTUAL);
        self
    }

    /// Mark abstract
    pub fn abstract_method(mut self) -> Self {
        self.flags = self.flags.union(MethodFlags::ABSTRACT);
        self
    }

    /// Mark override
    pub fn override_method(mut self) -> Self {
        self.flags = self.flags.union(MethodFlags::OVERRIDE);
        self
    }

    /// Set the body
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&Frame<'_>) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    fn push_param(
        mut self,
        name: &str,
        kind: ParamKind,
        annotation: Option<Annotation>,
        default: Option<Value>,
    ) -> Self {
        self.params.push(ParamDecl {
            name: name.to_string(),
            kind,
            annotation,
            default,
        });
        self
    }
}

/// A class member before declaration
#[derive(Debug, Clone)]
pub enum MemberDecl {
    /// Method, property or other callable
    Callable(CallableDecl),
    /// Plain class-level value
    Value(Value),
}

/// A class before declaration
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub(crate) name: String,
    pub(crate) bases: Vec<String>,
    pub(crate) members: Vec<(String, MemberDecl)>,
    pub(crate) annotations: Vec<(String, Annotation)>,
    pub(crate) friends: Vec<FriendRef>,
    pub(crate) raw_friends: Vec<String>,
}

impl ClassDecl {
    /// Start declaring a class
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bases: Vec::new(),
            members: Vec::new(),
            annotations: Vec::new(),
            friends: Vec::new(),
            raw_friends: Vec::new(),
        }
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a direct base, in resolution order
    pub fn extends(mut self, base: &str) -> Self {
        self.bases.push(base.to_string());
        self
    }

    /// Annotate an instance attribute
    pub fn field(mut self, name: &str, annotation: impl Into<Annotation>) -> Self {
        self.annotations.retain(|(n, _)| n != name);
        self.annotations.push((name.to_string(), annotation.into()));
        self
    }

    /// Annotate an attribute and give it a class-level default
    pub fn field_with_default(
        self,
        name: &str,
        annotation: impl Into<Annotation>,
        default: impl Into<Value>,
    ) -> Self {
        self.field(name, annotation)
            .member(name, MemberDecl::Value(default.into()))
    }

    /// Plain class-level value without an annotation
    pub fn value(self, name: &str, value: impl Into<Value>) -> Self {
        self.member(name, MemberDecl::Value(value.into()))
    }

    /// Callable member
    pub fn method(self, name: &str, callable: CallableDecl) -> Self {
        self.member(name, MemberDecl::Callable(callable))
    }

    /// Constructor (`__init__`)
    pub fn constructor(self, callable: CallableDecl) -> Self {
        self.member(CONSTRUCTOR, MemberDecl::Callable(callable))
    }

    /// Add or replace a member; the last definition of a name wins
    pub fn member(mut self, name: &str, member: MemberDecl) -> Self {
        self.members.retain(|(n, _)| n != name);
        self.members.push((name.to_string(), member));
        self
    }

    /// Friend in text form: `"function"`, `"Class"` or `"Class.method"`
    pub fn friend(mut self, text: &str) -> Self {
        match FriendRef::parse(text) {
            Some(friend) => self.friends.push(friend),
            None => self.raw_friends.push(text.to_string()),
        }
        self
    }

    /// Befriend a free function
    pub fn friend_function(mut self, name: &str) -> Self {
        self.friends
            .push(FriendRef::Specified(FriendSpecifier::FreeFunction(name.to_string())));
        self
    }

    /// Befriend every method of a class
    pub fn friend_class(mut self, name: &str) -> Self {
        self.friends
            .push(FriendRef::Specified(FriendSpecifier::Class(name.to_string())));
        self
    }

    /// Befriend one method of a class
    pub fn friend_method(mut self, class: &str, method: &str) -> Self {
        self.friends
            .push(FriendRef::Specified(FriendSpecifier::QualifiedMethod {
                class: class.to_string(),
                method: method.to_string(),
            }));
        self
    }
}

/// A free function before registration
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub(crate) name: String,
    pub(crate) callable: CallableDecl,
}

impl FunctionDecl {
    /// Declare a free function; `callable` is usually [`CallableDecl::function`]
    pub fn new(name: &str, callable: CallableDecl) -> Self {
        Self {
            name: name.to_string(),
            callable: CallableDecl {
                kind: CallableKind::Function,
                ..callable
            },
        }
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }
}
