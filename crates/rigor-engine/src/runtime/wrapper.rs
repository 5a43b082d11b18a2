//! Call boundary wrapper
//!
//! Binds arguments, checks them against the declared parameter types,
//! runs the body in a fresh frame and checks the result. All argument
//! checks complete before the body runs; the result is checked only when
//! the body returns normally.

use std::sync::Arc;

use rigor_types::{matches, type_name, TypeSpec, Value};

use crate::contract::{Boundary, MethodDescriptor, ParamKind};
use crate::error::RuntimeError;
use crate::runtime::args::{bind, Args, BoundArgs};
use crate::runtime::caller::CallerIdentity;
use crate::runtime::frame::{Frame, Receiver};
use crate::runtime::Runtime;

/// Invoke `method` on `receiver` with `args`
pub(crate) fn invoke(
    runtime: &Runtime,
    method: &Arc<MethodDescriptor>,
    receiver: Receiver,
    args: Args,
) -> Result<Value, RuntimeError> {
    let qualified = method.qualified_name();
    let bound = bind(&qualified, method.params(), args)?;
    let checked = method.boundary() == Boundary::Checked;

    if checked {
        check_arguments(method, &qualified, &bound)?;
    }

    let body = method
        .body()
        .ok_or_else(|| RuntimeError::AbstractInvocation {
            callable: qualified.clone(),
        })?;

    let caller = CallerIdentity::for_callable(method, receiver.class_name());
    let frame = Frame::new(runtime, caller, receiver, bound);
    let result = body(&frame)?;

    if checked {
        if let Some(spec) = method.returns() {
            check_return(&qualified, spec, &result)?;
        }
    }
    Ok(result)
}

fn check_arguments(
    method: &MethodDescriptor,
    qualified: &str,
    bound: &BoundArgs,
) -> Result<(), RuntimeError> {
    for (param, arg) in method.params().iter().zip(bound.iter()) {
        if param.kind != ParamKind::Regular {
            continue;
        }
        let Some(spec) = &param.spec else {
            continue;
        };
        if !matches(&arg.value, spec) {
            return Err(RuntimeError::TypeMismatch {
                context: format!("parameter '{}' of '{}'", param.name, qualified),
                expected: spec.to_string(),
                actual: type_name(&arg.value),
            });
        }
    }
    Ok(())
}

fn check_return(qualified: &str, spec: &TypeSpec, result: &Value) -> Result<(), RuntimeError> {
    let ok = if spec.is_no_value() {
        result.is_none()
    } else {
        matches(result, spec)
    };

    if ok {
        Ok(())
    } else {
        Err(RuntimeError::TypeMismatch {
            context: format!("return value of '{}'", qualified),
            expected: spec.to_string(),
            actual: type_name(result),
        })
    }
}
