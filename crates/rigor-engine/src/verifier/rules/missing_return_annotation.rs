//! Rule: missing-return-annotation (D1003)
//!
//! Every callable, properties included, must declare its return type.

use crate::contract::{DraftCallable, DraftClass};
use crate::error::DeclarationError;
use crate::verifier::rule::*;

/// Rejects callables without a return type.
pub struct MissingReturnAnnotation;

static META: RuleMeta = RuleMeta {
    name: "missing-return-annotation",
    code: "D1003",
    description: "Callables must declare a return type",
    category: Category::Annotation,
};

impl DeclarationRule for MissingReturnAnnotation {
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
    if callable.returns.is_none() {
        return Err(DeclarationError::MissingReturnTypeAnnotation {
            callable: callable.qualified.clone(),
        });
    }
    Ok(())
}
