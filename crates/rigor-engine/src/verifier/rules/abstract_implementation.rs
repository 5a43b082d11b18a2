//! Rule: abstract-implementation (D2003)
//!
//! Every abstract method visible through the ancestors must be implemented
//! by a class earlier in the resolution order, or redeclared by this class.

use crate::contract::DraftClass;
use crate::error::DeclarationError;
use crate::verifier::rule::*;

/// Requires inherited abstract methods to be implemented.
pub struct AbstractImplementation;

static META: RuleMeta = RuleMeta {
    name: "abstract-implementation",
    code: "D2003",
    description: "Inherited abstract methods must be implemented",
    category: Category::Inheritance,
};

impl DeclarationRule for AbstractImplementation {
    fn meta(&self) -> &RuleMeta {
        &META
    }

    fn check_class(&self, class: &DraftClass) -> Result<(), DeclarationError> {
        for ancestor in &class.ancestors {
            let mut abstract_names: Vec<&str> = ancestor
                .methods()
                .filter(|m| m.flags().is_abstract())
                .map(|m| m.name())
                .collect();
            abstract_names.sort_unstable();

            for name in abstract_names {
                if class.callable(name).is_some() {
                    continue;
                }
                let nearest = class
                    .ancestors
                    .iter()
                    .find_map(|a| a.own_method(name).map(|m| (a, m)));
                if let Some((owner, method)) = nearest {
                    if method.flags().is_abstract() {
                        return Err(DeclarationError::AbstractMethodViolation {
                            base: owner.name().to_string(),
                            class: class.name.clone(),
                            method: name.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
