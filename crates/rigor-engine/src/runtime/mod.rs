//! Runtime
//!
//! A [`RuntimeBuilder`] declares classes and free functions one at a time,
//! verifying each declaration as it arrives. [`RuntimeBuilder::build`] links
//! friend references and annotation class references and freezes the
//! registry. The resulting [`Runtime`] hands out frames through which all
//! calls and attribute accesses are mediated.

pub mod access;
pub mod args;
pub mod caller;
pub mod discipline;
pub mod frame;
pub mod object;

mod mediator;
mod wrapper;

pub use access::{GrantRule, MemberRef};
pub use args::{Args, BoundArgs, BoundParam};
pub use caller::{CallerIdentity, CallerOrigin};
pub use discipline::{Discipline, Enforced, Passthrough, WriteRequest};
pub use frame::{AsObject, Frame, Receiver};
pub use object::{ObjectRef, SlotKey};

use std::sync::Arc;

use rigor_types::{TypeSpec, Value};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::{EngineConfig, Mode};
use crate::contract::build::{freeze_callable, freeze_class, lower_class, lower_function};
use crate::contract::mro::linearize;
use crate::contract::{
    ClassDecl, ClassDescriptor, FriendRef, FriendSet, FriendSpecifier, FunctionDecl,
    MethodDescriptor,
};
use crate::error::{DeclarationError, RuntimeError};

/// Declares classes and functions, then links them into a [`Runtime`]
#[derive(Debug)]
pub struct RuntimeBuilder {
    config: EngineConfig,
    discipline: &'static dyn Discipline,
    classes: FxHashMap<String, Arc<ClassDescriptor>>,
    order: Vec<String>,
    functions: FxHashMap<String, Arc<MethodDescriptor>>,
}

impl RuntimeBuilder {
    /// Builder with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        let discipline = config.mode().discipline();
        Self {
            config,
            discipline,
            classes: FxHashMap::default(),
            order: Vec::new(),
            functions: FxHashMap::default(),
        }
    }

    /// Discipline mode
    pub fn mode(&self) -> Mode {
        self.discipline.mode()
    }

    /// Declare a class; its bases must already be declared
    pub fn declare(&mut self, decl: ClassDecl) -> Result<Arc<ClassDescriptor>, DeclarationError> {
        if self.classes.contains_key(decl.name()) {
            return Err(DeclarationError::DuplicateClass {
                name: decl.name().to_string(),
            });
        }

        let bases = decl
            .bases
            .iter()
            .map(|base| {
                self.classes
                    .get(base)
                    .cloned()
                    .ok_or_else(|| DeclarationError::UnknownBase {
                        class: decl.name().to_string(),
                        base: base.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ancestors = linearize(decl.name(), &bases)?;
        let draft = lower_class(decl, bases, ancestors)?;
        self.discipline.verify_class(&draft)?;

        let class = Arc::new(freeze_class(draft, self.discipline));
        debug!(
            class = %class.name(),
            resolution_order = ?class.resolution_names(),
            mode = ?self.mode(),
            "declared class"
        );

        self.order.push(class.name().to_string());
        self.classes
            .insert(class.name().to_string(), class.clone());
        Ok(class)
    }

    /// Register a free function
    pub fn function(&mut self, decl: FunctionDecl) -> Result<Arc<MethodDescriptor>, DeclarationError> {
        if self.functions.contains_key(decl.name()) {
            return Err(DeclarationError::DuplicateFunction {
                name: decl.name().to_string(),
            });
        }

        let draft = lower_function(decl)?;
        self.discipline.verify_function(&draft)?;

        let function = Arc::new(freeze_callable(draft, None, self.discipline));
        debug!(function = %function.name(), "registered function");

        self.functions
            .insert(function.name().to_string(), function.clone());
        Ok(function)
    }

    /// Declared class by name
    pub fn class(&self, name: &str) -> Option<&Arc<ClassDescriptor>> {
        self.classes.get(name)
    }

    /// Resolve friends and annotation class references, then freeze
    pub fn build(self) -> Result<Runtime, DeclarationError> {
        let enforced = self.mode() == Mode::Enforced;
        let strict = enforced && self.config.discipline.strict_friends;

        // Bases are declared before subclasses, so their sets are linked first
        for name in &self.order {
            let class = &self.classes[name];
            let mut friends = self.resolve_friends(class, strict)?;
            for base in class.bases() {
                friends.extend(base.friends());
            }
            let linked = class.link_friends(friends);
            debug_assert!(linked, "friends of '{}' linked twice", class.name());
        }

        if enforced {
            self.check_type_references()?;
        }

        debug!(
            classes = self.classes.len(),
            functions = self.functions.len(),
            mode = ?self.mode(),
            "runtime linked"
        );

        Ok(Runtime {
            config: self.config,
            discipline: self.discipline,
            classes: self.classes,
            functions: self.functions,
        })
    }

    fn resolve_friends(
        &self,
        class: &ClassDescriptor,
        strict: bool,
    ) -> Result<FriendSet, DeclarationError> {
        let mut set = FriendSet::new();
        for friend in class.declared_friends() {
            let unresolved = || DeclarationError::UnresolvedFriend {
                class: class.name().to_string(),
                friend: friend.to_string(),
            };

            match friend {
                FriendRef::Named(name) => {
                    let is_class = self.classes.contains_key(name);
                    let is_function = self.functions.contains_key(name);
                    match (is_class, is_function) {
                        (true, true) if strict => {
                            return Err(DeclarationError::AmbiguousFriend {
                                class: class.name().to_string(),
                                friend: name.clone(),
                            })
                        }
                        (true, false) => set.insert(FriendSpecifier::Class(name.clone())),
                        (false, true) => set.insert(FriendSpecifier::FreeFunction(name.clone())),
                        (false, false) if strict => return Err(unresolved()),
                        _ => {
                            // Lenient: the name stays inert unless something matches it later
                            set.insert(FriendSpecifier::Class(name.clone()));
                            set.insert(FriendSpecifier::FreeFunction(name.clone()));
                        }
                    }
                }
                FriendRef::Specified(spec) => {
                    let exists = match spec {
                        FriendSpecifier::FreeFunction(name) => self.functions.contains_key(name),
                        FriendSpecifier::Class(name) => self.classes.contains_key(name),
                        FriendSpecifier::QualifiedMethod { class, method } => self
                            .classes
                            .get(class)
                            .map_or(false, |c| c.resolve_method(method).is_some()),
                    };
                    if strict && !exists {
                        return Err(unresolved());
                    }
                    set.insert(spec.clone());
                }
            }
        }
        Ok(set)
    }

    fn check_type_references(&self) -> Result<(), DeclarationError> {
        let check = |spec: &TypeSpec, member: String| -> Result<(), DeclarationError> {
            let mut missing = None;
            spec.for_each_class(&mut |name| {
                if missing.is_none() && !self.classes.contains_key(name) {
                    missing = Some(name.to_string());
                }
            });
            match missing {
                Some(class) => Err(DeclarationError::UnresolvedType { member, class }),
                None => Ok(()),
            }
        };

        let check_callable = |method: &MethodDescriptor| -> Result<(), DeclarationError> {
            let qualified = method.qualified_name();
            for param in method.params() {
                if let Some(spec) = &param.spec {
                    check(spec, format!("{}.{}", qualified, param.name))?;
                }
            }
            if let Some(spec) = method.returns() {
                check(spec, qualified)?;
            }
            Ok(())
        };

        for name in &self.order {
            let class = &self.classes[name];
            let mut attributes: Vec<_> = class.attributes().collect();
            attributes.sort_by(|a, b| a.name.cmp(&b.name));
            for attribute in attributes {
                check(&attribute.spec, format!("{}.{}", class.name(), attribute.name))?;
            }
            let mut methods: Vec<_> = class.methods().collect();
            methods.sort_by(|a, b| a.name().cmp(b.name()));
            for method in methods {
                check_callable(method)?;
            }
        }

        let mut functions: Vec<_> = self.functions.values().collect();
        functions.sort_by(|a, b| a.name().cmp(b.name()));
        functions.into_iter().try_for_each(|f| check_callable(f))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Linked, immutable class and function registry
#[derive(Debug)]
pub struct Runtime {
    config: EngineConfig,
    discipline: &'static dyn Discipline,
    classes: FxHashMap<String, Arc<ClassDescriptor>>,
    functions: FxHashMap<String, Arc<MethodDescriptor>>,
}

impl Runtime {
    /// Builder with the default configuration
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    /// Builder with the given configuration
    pub fn builder_with(config: EngineConfig) -> RuntimeBuilder {
        RuntimeBuilder::new(config)
    }

    /// Configuration the runtime was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Discipline mode
    pub fn mode(&self) -> Mode {
        self.discipline.mode()
    }

    pub(crate) fn discipline(&self) -> &'static dyn Discipline {
        self.discipline
    }

    /// Class by name
    pub fn class(&self, name: &str) -> Option<&Arc<ClassDescriptor>> {
        self.classes.get(name)
    }

    /// Free function by name
    pub fn function(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.functions.get(name)
    }

    pub(crate) fn require_class(&self, name: &str) -> Result<&Arc<ClassDescriptor>, RuntimeError> {
        self.class(name).ok_or_else(|| RuntimeError::UnknownClass {
            name: name.to_string(),
        })
    }

    /// Frame for host code outside any declared callable
    pub fn main(&self) -> Frame<'_> {
        Frame::new(
            self,
            CallerIdentity::top_level(),
            Receiver::None,
            BoundArgs::default(),
        )
    }

    /// Frame for introspection machinery; its reads are never denied
    pub fn reflect(&self) -> Frame<'_> {
        Frame::new(
            self,
            CallerIdentity::reflection(),
            Receiver::None,
            BoundArgs::default(),
        )
    }

    /// Every stored attribute of `object`, read without access checks
    pub fn introspect(&self, object: &ObjectRef) -> Vec<(SlotKey, Value)> {
        mediator::introspect(object)
    }
}
