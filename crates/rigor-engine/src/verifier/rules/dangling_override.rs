//! Rule: dangling-override (D2002)
//!
//! A method marked override must shadow a member of some ancestor.

use crate::contract::DraftClass;
use crate::error::{DeclarationError, OverrideProblem};
use crate::verifier::rule::*;

/// Rejects override markers that shadow nothing.
pub struct DanglingOverride;

static META: RuleMeta = RuleMeta {
    name: "dangling-override",
    code: "D2002",
    description: "Methods marked override must override an inherited method",
    category: Category::Inheritance,
};

impl DeclarationRule for DanglingOverride {
    fn meta(&self) -> &RuleMeta {
        &META
    }

    fn check_class(&self, class: &DraftClass) -> Result<(), DeclarationError> {
        let dangling = class.callables.iter().find(|callable| {
            callable.flags.is_override()
                && !class
                    .ancestors
                    .iter()
                    .any(|a| a.declares(&callable.name))
        });

        match dangling {
            Some(callable) => Err(DeclarationError::OverrideMethodViolation {
                class: class.name.clone(),
                method: callable.name.clone(),
                problem: OverrideProblem::NothingToOverride,
            }),
            None => Ok(()),
        }
    }
}
