//! Caller identity
//!
//! Every frame carries the identity of the callable it executes. Attribute
//! reads and writes made from that frame are authorized against it; no
//! stack inspection is involved.

use std::fmt;
use std::sync::Arc;

use crate::contract::{MethodDescriptor, CONSTRUCTOR};

/// Where a caller comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallerOrigin {
    /// Host code outside any declared callable
    TopLevel,
    /// Unbound free function
    FreeFunction,
    /// Method, property or static method of a class
    Method,
    /// Introspection machinery; never denied
    Reflection,
}

/// Identity of the code performing an access
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    origin: CallerOrigin,
    name: Arc<str>,
    declaring: Option<Arc<str>>,
    receiver: Option<Arc<str>>,
}

impl CallerIdentity {
    /// Host code
    pub fn top_level() -> Self {
        Self {
            origin: CallerOrigin::TopLevel,
            name: Arc::from("<top-level>"),
            declaring: None,
            receiver: None,
        }
    }

    /// Introspection machinery
    pub fn reflection() -> Self {
        Self {
            origin: CallerOrigin::Reflection,
            name: Arc::from("<reflection>"),
            declaring: None,
            receiver: None,
        }
    }

    /// Identity of `method` running on a receiver of exact type `receiver`
    pub(crate) fn for_callable(method: &MethodDescriptor, receiver: Option<Arc<str>>) -> Self {
        let origin = match method.owner() {
            Some(_) => CallerOrigin::Method,
            None => CallerOrigin::FreeFunction,
        };
        Self {
            origin,
            name: Arc::from(method.name()),
            declaring: method.owner().cloned(),
            receiver,
        }
    }

    /// Origin
    pub fn origin(&self) -> CallerOrigin {
        self.origin
    }

    /// Bare name of the calling function or method
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class declaring the calling method
    pub fn declaring_class(&self) -> Option<&str> {
        self.declaring.as_deref()
    }

    /// Exact runtime type of the bound receiver
    pub fn receiver_class(&self) -> Option<&str> {
        self.receiver.as_deref()
    }

    /// Check if the caller is an unbound free function
    pub fn is_free_function(&self) -> bool {
        self.origin == CallerOrigin::FreeFunction
    }

    /// Check if the caller is a constructor running on an object of exact type `class`
    pub fn is_constructor_of(&self, class: &str) -> bool {
        self.origin == CallerOrigin::Method
            && &*self.name == CONSTRUCTOR
            && self.receiver_class() == Some(class)
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.declaring, &self.receiver) {
            (Some(declaring), Some(receiver)) if declaring != receiver => {
                write!(f, "{}.{} on {}", declaring, self.name, receiver)
            }
            (Some(declaring), _) => write!(f, "{}.{}", declaring, self.name),
            (None, _) => f.write_str(&self.name),
        }
    }
}
