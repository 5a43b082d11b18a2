//! Call frames
//!
//! A frame is the execution context handed to every body: the runtime, the
//! identity of the running callable, its receiver and its bound arguments.
//! Every attribute access and call made through a frame is authorized
//! against that identity.

use std::sync::Arc;

use rigor_types::{type_name, Value};

use crate::contract::ClassDescriptor;
use crate::error::RuntimeError;
use crate::runtime::args::{Args, BoundArgs};
use crate::runtime::caller::CallerIdentity;
use crate::runtime::mediator;
use crate::runtime::object::ObjectRef;
use crate::runtime::Runtime;

/// Implicit receiver of a frame
#[derive(Debug, Clone)]
pub enum Receiver {
    /// Free function, static method or top-level code
    None,
    /// Instance method or property
    Instance(ObjectRef),
    /// Class method
    Class(Arc<ClassDescriptor>),
}

impl Receiver {
    /// Exact runtime type of the receiver
    pub fn class_name(&self) -> Option<Arc<str>> {
        match self {
            Receiver::None => None,
            Receiver::Instance(object) => Some(object.class().name_arc().clone()),
            Receiver::Class(class) => Some(class.name_arc().clone()),
        }
    }

    /// Class of the receiver
    pub fn class(&self) -> Option<&Arc<ClassDescriptor>> {
        match self {
            Receiver::None => None,
            Receiver::Instance(object) => Some(object.class()),
            Receiver::Class(class) => Some(class),
        }
    }
}

/// Something a frame can address as an object
pub trait AsObject {
    /// The object, if this is one
    fn to_object(&self) -> Option<ObjectRef>;

    /// Runtime type name for diagnostics
    fn describe(&self) -> String;
}

impl AsObject for ObjectRef {
    fn to_object(&self) -> Option<ObjectRef> {
        Some(self.clone())
    }

    fn describe(&self) -> String {
        self.class_name().to_string()
    }
}

impl AsObject for Value {
    fn to_object(&self) -> Option<ObjectRef> {
        ObjectRef::from_value(self)
    }

    fn describe(&self) -> String {
        type_name(self)
    }
}

/// Execution context of one callable invocation
pub struct Frame<'rt> {
    runtime: &'rt Runtime,
    caller: CallerIdentity,
    receiver: Receiver,
    args: BoundArgs,
}

impl<'rt> Frame<'rt> {
    pub(crate) fn new(
        runtime: &'rt Runtime,
        caller: CallerIdentity,
        receiver: Receiver,
        args: BoundArgs,
    ) -> Self {
        Self {
            runtime,
            caller,
            receiver,
            args,
        }
    }

    /// Runtime this frame executes in
    pub fn runtime(&self) -> &'rt Runtime {
        self.runtime
    }

    /// Identity of the running callable
    pub fn caller(&self) -> &CallerIdentity {
        &self.caller
    }

    /// Receiver
    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }

    /// The receiving object of an instance method
    pub fn this(&self) -> Result<&ObjectRef, RuntimeError> {
        match &self.receiver {
            Receiver::Instance(object) => Ok(object),
            _ => Err(self.no_receiver()),
        }
    }

    /// Bound argument by parameter name
    pub fn arg(&self, name: &str) -> Result<&Value, RuntimeError> {
        self.args
            .get(name)
            .ok_or_else(|| RuntimeError::ArgumentBinding {
                callable: self.caller.to_string(),
                message: format!("no parameter named '{}'", name),
            })
    }

    /// All bound arguments
    pub fn args(&self) -> &BoundArgs {
        &self.args
    }

    /// Read an attribute
    pub fn get(&self, target: &impl AsObject, name: &str) -> Result<Value, RuntimeError> {
        let object = self.object(target, name)?;
        mediator::get_attribute(self.runtime, &self.caller, &object, name)
    }

    /// Write an attribute
    pub fn set(
        &self,
        target: &impl AsObject,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), RuntimeError> {
        let object = self.object(target, name)?;
        mediator::set_attribute(self.runtime, &self.caller, &object, name, value.into())
    }

    /// Read an attribute of the receiver
    pub fn get_self(&self, name: &str) -> Result<Value, RuntimeError> {
        let this = self.this()?;
        mediator::get_attribute(self.runtime, &self.caller, this, name)
    }

    /// Write an attribute of the receiver
    pub fn set_self(&self, name: &str, value: impl Into<Value>) -> Result<(), RuntimeError> {
        let this = self.this()?;
        mediator::set_attribute(self.runtime, &self.caller, this, name, value.into())
    }

    /// Call a method of an object
    pub fn call(
        &self,
        target: &impl AsObject,
        name: &str,
        args: Args,
    ) -> Result<Value, RuntimeError> {
        let object = self.object(target, name)?;
        mediator::call_method(self.runtime, &self.caller, &object, name, args)
    }

    /// Call a method of the receiver
    pub fn call_self(&self, name: &str, args: Args) -> Result<Value, RuntimeError> {
        match &self.receiver {
            Receiver::Class(class) => {
                mediator::call_static(self.runtime, &self.caller, class, name, args)
            }
            _ => {
                let this = self.this()?;
                mediator::call_method(self.runtime, &self.caller, this, name, args)
            }
        }
    }

    /// Call the next implementation of `name` after the running method's class
    pub fn call_super(&self, name: &str, args: Args) -> Result<Value, RuntimeError> {
        mediator::call_super(self.runtime, &self.caller, &self.receiver, name, args)
    }

    /// Call a static or class method
    pub fn call_static(&self, class: &str, name: &str, args: Args) -> Result<Value, RuntimeError> {
        let class = self.runtime.require_class(class)?;
        mediator::call_static(self.runtime, &self.caller, class, name, args)
    }

    /// Call a free function
    pub fn call_function(&self, name: &str, args: Args) -> Result<Value, RuntimeError> {
        mediator::call_function(self.runtime, name, args)
    }

    /// Create an object and run its constructor
    pub fn instantiate(&self, class: &str, args: Args) -> Result<ObjectRef, RuntimeError> {
        mediator::instantiate(self.runtime, class, args)
    }

    fn object(&self, target: &impl AsObject, member: &str) -> Result<ObjectRef, RuntimeError> {
        target.to_object().ok_or_else(|| RuntimeError::TypeMismatch {
            context: format!("target of '{}'", member),
            expected: "object".to_string(),
            actual: target.describe(),
        })
    }

    fn no_receiver(&self) -> RuntimeError {
        RuntimeError::NoReceiver {
            callable: self.caller.to_string(),
        }
    }
}
