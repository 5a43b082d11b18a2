//! Attribute mediator
//!
//! Every attribute read, attribute write and method call on an object goes
//! through here. Reads and calls are authorized by the discipline before
//! lookup; writes are guarded by declared type and const state.

use std::sync::Arc;

use rigor_types::Value;
use tracing::trace;

use crate::contract::{CallableKind, ClassDescriptor, MethodDescriptor, Visibility, CONSTRUCTOR};
use crate::error::RuntimeError;
use crate::runtime::access::MemberRef;
use crate::runtime::args::Args;
use crate::runtime::caller::CallerIdentity;
use crate::runtime::discipline::WriteRequest;
use crate::runtime::frame::Receiver;
use crate::runtime::object::{ObjectRef, SlotKey};
use crate::runtime::wrapper;
use crate::runtime::Runtime;

/// Read `name` from `object`
///
/// Lookup order: instance slot, property, class-level default.
pub(crate) fn get_attribute(
    runtime: &Runtime,
    caller: &CallerIdentity,
    object: &ObjectRef,
    name: &str,
) -> Result<Value, RuntimeError> {
    let class = object.class();
    let member = MemberRef::locate(class, name, caller);
    let key = runtime.discipline().authorize_read(class, &member, caller)?;

    if let Some(value) = object.slot(&key) {
        return Ok(value);
    }

    if let Some(method) = find_method(class, &key) {
        if method.kind().is_property() {
            return read_property(runtime, object, &method);
        }
        return Err(RuntimeError::MethodAsAttribute {
            class: class.name().to_string(),
            member: name.to_string(),
        });
    }

    find_value(class, &key).ok_or_else(|| undefined(class, name))
}

/// Write `value` to `name` on `object`
pub(crate) fn set_attribute(
    runtime: &Runtime,
    caller: &CallerIdentity,
    object: &ObjectRef,
    name: &str,
    value: Value,
) -> Result<(), RuntimeError> {
    let class = object.class();
    let member = MemberRef::locate(class, name, caller);
    let key = member.slot_key(None, class.name_arc());
    let attribute = match &key {
        SlotKey::Shared(name) => class.resolve_attribute(name),
        SlotKey::Private { owner, name } => class
            .lineage_class(owner)
            .and_then(|c| c.own_attribute(name)),
    };

    let fix = runtime.discipline().authorize_write(&WriteRequest {
        object,
        member: &member,
        key: &key,
        attribute,
        caller,
        value: &value,
    })?;

    object.store(key, value, fix);
    Ok(())
}

/// Call method `name` of `object`
pub(crate) fn call_method(
    runtime: &Runtime,
    caller: &CallerIdentity,
    object: &ObjectRef,
    name: &str,
    args: Args,
) -> Result<Value, RuntimeError> {
    let class = object.class();
    let member = MemberRef::locate(class, name, caller);
    let key = runtime.discipline().authorize_read(class, &member, caller)?;

    let Some(method) = find_method(class, &key) else {
        if object.slot(&key).is_some() || find_value(class, &key).is_some() {
            return Err(not_callable(class, name));
        }
        return Err(undefined(class, name));
    };

    let receiver = match method.kind() {
        CallableKind::Method => Receiver::Instance(object.clone()),
        CallableKind::ClassMethod => Receiver::Class(class.clone()),
        CallableKind::StaticMethod | CallableKind::Function => Receiver::None,
        CallableKind::Property | CallableKind::CachedProperty => {
            return Err(not_callable(class, name))
        }
    };
    wrapper::invoke(runtime, &method, receiver, args)
}

/// Call static or class method `name` of `class`
pub(crate) fn call_static(
    runtime: &Runtime,
    caller: &CallerIdentity,
    class: &Arc<ClassDescriptor>,
    name: &str,
    args: Args,
) -> Result<Value, RuntimeError> {
    let member = MemberRef::locate(class, name, caller);
    let key = runtime.discipline().authorize_read(class, &member, caller)?;
    let method = find_method(class, &key).ok_or_else(|| undefined(class, name))?;

    let receiver = match method.kind() {
        CallableKind::StaticMethod | CallableKind::Function => Receiver::None,
        CallableKind::ClassMethod => Receiver::Class(class.clone()),
        CallableKind::Method => {
            return Err(RuntimeError::NoReceiver {
                callable: method.qualified_name(),
            })
        }
        CallableKind::Property | CallableKind::CachedProperty => {
            return Err(not_callable(class, name))
        }
    };
    wrapper::invoke(runtime, &method, receiver, args)
}

/// Call the implementation of `name` following the caller's class in the
/// receiver's resolution order
pub(crate) fn call_super(
    runtime: &Runtime,
    caller: &CallerIdentity,
    receiver: &Receiver,
    name: &str,
    args: Args,
) -> Result<Value, RuntimeError> {
    let no_receiver = || RuntimeError::NoReceiver {
        callable: caller.to_string(),
    };
    let declaring = caller.declaring_class().ok_or_else(no_receiver)?;
    let class = receiver.class().ok_or_else(no_receiver)?;

    let (owner, method) = class
        .resolution_order()
        .skip_while(|c| c.name() != declaring)
        .skip(1)
        .find_map(|c| c.own_method(name).map(|m| (c, m.clone())))
        .ok_or_else(|| RuntimeError::UndefinedMember {
            class: declaring.to_string(),
            member: name.to_string(),
        })?;

    // Private members never cross the class boundary
    if Visibility::of(name) == Visibility::Private {
        return Err(RuntimeError::AccessModifierViolation {
            class: owner.name().to_string(),
            member: name.to_string(),
        });
    }

    let receiver = match method.kind() {
        CallableKind::StaticMethod | CallableKind::Function => Receiver::None,
        CallableKind::ClassMethod => Receiver::Class(class.clone()),
        _ => receiver.clone(),
    };
    wrapper::invoke(runtime, &method, receiver, args)
}

/// Call a free function
pub(crate) fn call_function(
    runtime: &Runtime,
    name: &str,
    args: Args,
) -> Result<Value, RuntimeError> {
    let function = runtime
        .function(name)
        .ok_or_else(|| RuntimeError::UnknownFunction {
            name: name.to_string(),
        })?;
    wrapper::invoke(runtime, function, Receiver::None, args)
}

/// Allocate an object and run its constructor
pub(crate) fn instantiate(
    runtime: &Runtime,
    class: &str,
    args: Args,
) -> Result<ObjectRef, RuntimeError> {
    let class = runtime.require_class(class)?;
    let object = ObjectRef::new(class.clone());

    match class.resolve_method(CONSTRUCTOR) {
        Some(constructor) => {
            wrapper::invoke(runtime, constructor, Receiver::Instance(object.clone()), args)?;
        }
        None if !args.is_empty() => {
            return Err(RuntimeError::ArgumentBinding {
                callable: format!("{}.{}", class.name(), CONSTRUCTOR),
                message: "takes no arguments".to_string(),
            })
        }
        None => {}
    }

    trace!(class = %class.name(), id = object.id(), "instantiated");
    Ok(object)
}

/// Read every stored slot of `object` without authorization
pub(crate) fn introspect(object: &ObjectRef) -> Vec<(SlotKey, Value)> {
    object.snapshot()
}

fn read_property(
    runtime: &Runtime,
    object: &ObjectRef,
    method: &Arc<MethodDescriptor>,
) -> Result<Value, RuntimeError> {
    let cache_key = method.qualified_name();
    let cached = method.kind() == CallableKind::CachedProperty;

    if cached {
        if let Some(value) = object.cached(&cache_key) {
            return Ok(value);
        }
    }

    let value = wrapper::invoke(
        runtime,
        method,
        Receiver::Instance(object.clone()),
        Args::new(),
    )?;

    if cached {
        object.cache(&cache_key, value.clone());
    }
    Ok(value)
}

fn find_method(class: &ClassDescriptor, key: &SlotKey) -> Option<Arc<MethodDescriptor>> {
    match key {
        SlotKey::Shared(name) => class.resolve_method(name).cloned(),
        SlotKey::Private { owner, name } => class
            .lineage_class(owner)
            .and_then(|c| c.own_method(name))
            .cloned(),
    }
}

fn find_value(class: &ClassDescriptor, key: &SlotKey) -> Option<Value> {
    match key {
        SlotKey::Shared(name) => class.resolve_value(name).cloned(),
        SlotKey::Private { owner, name } => class
            .lineage_class(owner)
            .and_then(|c| c.own_value(name))
            .cloned(),
    }
}

fn undefined(class: &ClassDescriptor, member: &str) -> RuntimeError {
    RuntimeError::UndefinedMember {
        class: class.name().to_string(),
        member: member.to_string(),
    }
}

fn not_callable(class: &ClassDescriptor, member: &str) -> RuntimeError {
    RuntimeError::NotCallable {
        class: class.name().to_string(),
        member: member.to_string(),
    }
}
