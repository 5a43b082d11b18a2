//! Frozen class and method descriptors
//!
//! Built once per declared class and never mutated afterwards, except the
//! friend set which is written once when the runtime is linked.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use rigor_types::{TypeSpec, Value};
use rustc_hash::FxHashMap;

use super::friends::{FriendRef, FriendSet};
use super::member::{Body, CallableKind, MethodFlags, ParamKind};

/// Whether a callable's arguments and result are type checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Arguments and return value are checked on every call
    Checked,
    /// The body is invoked directly
    Unchecked,
}

/// Resolved parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// Parameter name
    pub name: String,
    /// Parameter kind
    pub kind: ParamKind,
    /// Declared type; `None` for collectors and in passthrough mode
    pub spec: Option<TypeSpec>,
    /// Default value
    pub default: Option<Value>,
}

/// Frozen callable
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    owner: Option<Arc<str>>,
    kind: CallableKind,
    params: Vec<ParamSpec>,
    returns: Option<TypeSpec>,
    flags: MethodFlags,
    boundary: Boundary,
    body: Option<Body>,
}

impl MethodDescriptor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        owner: Option<Arc<str>>,
        kind: CallableKind,
        params: Vec<ParamSpec>,
        returns: Option<TypeSpec>,
        flags: MethodFlags,
        boundary: Boundary,
        body: Option<Body>,
    ) -> Self {
        Self {
            name,
            owner,
            kind,
            params,
            returns,
            flags,
            boundary,
            body,
        }
    }

    /// Bare name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaring class; `None` for free functions
    pub fn owner(&self) -> Option<&Arc<str>> {
        self.owner.as_ref()
    }

    /// `Class.name` for methods, `name` for free functions
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}.{}", owner, self.name),
            None => self.name.clone(),
        }
    }

    /// Callable kind
    pub fn kind(&self) -> CallableKind {
        self.kind
    }

    /// Parameters, excluding the implicit receiver
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Declared return type
    pub fn returns(&self) -> Option<&TypeSpec> {
        self.returns.as_ref()
    }

    /// Marker flags
    pub fn flags(&self) -> MethodFlags {
        self.flags
    }

    /// Boundary checking mode
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub(crate) fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.qualified_name())
            .field("kind", &self.kind)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("flags", &self.flags)
            .field("boundary", &self.boundary)
            .finish()
    }
}

/// Declared instance attribute
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSpec {
    /// Attribute name
    pub name: String,
    /// Declared type
    pub spec: TypeSpec,
    /// Declaring class
    pub owner: Arc<str>,
}

impl AttributeSpec {
    /// Check if the attribute is const
    pub fn is_const(&self) -> bool {
        self.spec.is_const()
    }
}

/// Frozen class
pub struct ClassDescriptor {
    name: Arc<str>,
    bases: Vec<Arc<ClassDescriptor>>,
    ancestors: Vec<Arc<ClassDescriptor>>,
    attributes: FxHashMap<String, AttributeSpec>,
    methods: FxHashMap<String, Arc<MethodDescriptor>>,
    values: FxHashMap<String, Value>,
    declared_friends: Vec<FriendRef>,
    friends: OnceCell<FriendSet>,
}

impl ClassDescriptor {
    pub(crate) fn new(
        name: Arc<str>,
        bases: Vec<Arc<ClassDescriptor>>,
        ancestors: Vec<Arc<ClassDescriptor>>,
        attributes: FxHashMap<String, AttributeSpec>,
        methods: FxHashMap<String, Arc<MethodDescriptor>>,
        values: FxHashMap<String, Value>,
        declared_friends: Vec<FriendRef>,
    ) -> Self {
        Self {
            name,
            bases,
            ancestors,
            attributes,
            methods,
            values,
            declared_friends,
            friends: OnceCell::new(),
        }
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Direct bases in declaration order
    pub fn bases(&self) -> &[Arc<ClassDescriptor>] {
        &self.bases
    }

    /// Linearized ancestors, nearest first, excluding this class
    pub fn ancestors(&self) -> &[Arc<ClassDescriptor>] {
        &self.ancestors
    }

    /// This class followed by its ancestors
    pub fn resolution_order(&self) -> impl Iterator<Item = &ClassDescriptor> {
        std::iter::once(self).chain(self.ancestors.iter().map(|a| a.as_ref()))
    }

    /// Names in resolution order
    pub fn resolution_names(&self) -> Vec<&str> {
        self.resolution_order().map(|c| c.name()).collect()
    }

    /// Check if `name` is this class or one of its ancestors
    pub fn is_subclass_of(&self, name: &str) -> bool {
        self.resolution_order().any(|c| c.name() == name)
    }

    /// Find a class in the resolution order by name
    pub fn lineage_class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.resolution_order().find(|c| c.name() == name)
    }

    /// Attribute declared by this class
    pub fn own_attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.get(name)
    }

    /// Method declared by this class
    pub fn own_method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.get(name)
    }

    /// Plain value declared by this class
    pub fn own_value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check if this class itself declares `name` in any form
    pub fn declares(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
            || self.methods.contains_key(name)
            || self.values.contains_key(name)
    }

    /// Nearest attribute declaration in resolution order
    pub fn resolve_attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.resolution_order().find_map(|c| c.own_attribute(name))
    }

    /// Nearest method in resolution order
    pub fn resolve_method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.resolution_order().find_map(|c| c.own_method(name))
    }

    /// Nearest plain value in resolution order
    pub fn resolve_value(&self, name: &str) -> Option<&Value> {
        self.resolution_order().find_map(|c| c.own_value(name))
    }

    /// Nearest class in resolution order declaring `name`
    pub fn declaring_class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.resolution_order().find(|c| c.declares(name))
    }

    /// Own attributes (unordered)
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.attributes.values()
    }

    /// Own methods (unordered)
    pub fn methods(&self) -> impl Iterator<Item = &Arc<MethodDescriptor>> {
        self.methods.values()
    }

    /// Friends as declared on this class
    pub fn declared_friends(&self) -> &[FriendRef] {
        &self.declared_friends
    }

    /// Linked friend set, including inherited friends; empty before linking
    pub fn friends(&self) -> &FriendSet {
        static EMPTY: Lazy<FriendSet> = Lazy::new(FriendSet::new);
        self.friends.get().unwrap_or(&EMPTY)
    }

    /// Link the resolved friend set; returns `false` if already linked,
    /// in which case the first set is kept
    #[must_use]
    pub(crate) fn link_friends(&self, friends: FriendSet) -> bool {
        self.friends.set(friends).is_ok()
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("resolution_order", &self.resolution_names())
            .field("attributes", &self.attributes.len())
            .field("methods", &self.methods.len())
            .finish()
    }
}
