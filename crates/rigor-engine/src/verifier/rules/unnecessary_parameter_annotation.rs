//! Rule: unnecessary-parameter-annotation (D1002)
//!
//! The implicit receiver and the `*args`/`**kwargs` collectors must not be
//! annotated.

use crate::contract::{DraftCallable, DraftClass};
use crate::error::DeclarationError;
use crate::verifier::rule::*;

/// Rejects annotated receivers and collectors.
pub struct UnnecessaryParameterAnnotation;

static META: RuleMeta = RuleMeta {
    name: "unnecessary-parameter-annotation",
    code: "D1002",
    description: "Receivers and variadic collectors must not have type annotations",
    category: Category::Annotation,
};

impl DeclarationRule for UnnecessaryParameterAnnotation {
    fn meta(&self) -> &RuleMeta {
        &META
    }

    fn check_class(&self, class: &DraftClass) -> Result<(), DeclarationError> {
        class.callables.iter().try_for_each(check_callable)
    }

    fn check_function(&self, function: &DraftCallable) -> Result<(), DeclarationError> {
        check_callable(function)
    }
}

fn check_callable(callable: &DraftCallable) -> Result<(), DeclarationError> {
    let offending = if callable.receiver_spec.is_some() {
        Some(callable.kind.receiver_name().to_string())
    } else {
        callable
            .params
            .iter()
            .find(|p| p.kind.is_variadic() && p.spec.is_some())
            .map(|p| p.name.clone())
    };

    match offending {
        Some(parameter) => Err(DeclarationError::UnnecessaryParameterTypeAnnotation {
            callable: callable.qualified.clone(),
            parameter,
        }),
        None => Ok(()),
    }
}
