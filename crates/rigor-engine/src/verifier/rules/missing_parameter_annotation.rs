//! Rule: missing-parameter-annotation (D1001)
//!
//! Every parameter except the implicit receiver and variadic collectors must
//! carry a type annotation.

use crate::contract::{DraftCallable, DraftClass, ParamKind};
use crate::error::DeclarationError;
use crate::verifier::rule::*;

/// Rejects unannotated parameters.
pub struct MissingParameterAnnotation;

static META: RuleMeta = RuleMeta {
    name: "missing-parameter-annotation",
    code: "D1001",
    description: "Parameters must have type annotations",
    category: Category::Annotation,
};

impl DeclarationRule for MissingParameterAnnotation {
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
    match callable
        .params
        .iter()
        .find(|p| p.kind == ParamKind::Regular && p.spec.is_none())
    {
        Some(param) => Err(DeclarationError::MissingParameterTypeAnnotation {
            callable: callable.qualified.clone(),
            parameter: param.name.clone(),
        }),
        None => Ok(()),
    }
}
