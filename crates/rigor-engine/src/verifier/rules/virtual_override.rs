//! Rule: virtual-override (D2001)
//!
//! A method that shadows any member visible through a direct base requires
//! that member to be a virtual or abstract method, and itself to be marked
//! override.
//! Special methods are exempt.

use crate::contract::DraftClass;
use crate::error::{DeclarationError, OverrideProblem};
use crate::verifier::rule::*;

/// Checks virtual and override markers on shadowing methods.
pub struct VirtualOverride;

static META: RuleMeta = RuleMeta {
    name: "virtual-override",
    code: "D2001",
    description: "Only virtual or abstract methods may be overridden, and overrides must be marked",
    category: Category::Inheritance,
};

impl DeclarationRule for VirtualOverride {
    fn meta(&self) -> &RuleMeta {
        &META
    }

    fn check_class(&self, class: &DraftClass) -> Result<(), DeclarationError> {
        for callable in class.callables.iter().filter(|c| !c.is_special()) {
            for base in &class.bases {
                let Some(declaring) = base.declaring_class(&callable.name) else {
                    continue;
                };

                // Attributes and plain values shadowed by a method count as non-virtual
                let overridable = declaring
                    .own_method(&callable.name)
                    .map_or(false, |shadowed| shadowed.flags().is_overridable());
                if !overridable {
                    return Err(DeclarationError::VirtualMethodViolation {
                        base: declaring.name().to_string(),
                        class: class.name.clone(),
                        method: callable.name.clone(),
                    });
                }

                if !callable.flags.is_override() {
                    return Err(DeclarationError::OverrideMethodViolation {
                        class: class.name.clone(),
                        method: callable.name.clone(),
                        problem: OverrideProblem::MissingMarker,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{CallableDecl, ClassDecl};
    use crate::verifier::rules::testing::{draft, frozen};
    use rigor_types::Value;

    fn method() -> CallableDecl {
        CallableDecl::method()
            .returns("int")
            .body(|_| Ok(Value::Int(0)))
    }

    #[test]
    fn test_overriding_plain_method_rejected() {
        let base = frozen(ClassDecl::new("A").method("run", method()), &[]);
        // Even with the override marker
        let class = draft(
            ClassDecl::new("B")
                .extends("A")
                .method("run", method().override_method()),
            &[&base],
        );
        assert_eq!(
            VirtualOverride.check_class(&class).unwrap_err(),
            DeclarationError::VirtualMethodViolation {
                base: "A".to_string(),
                class: "B".to_string(),
                method: "run".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_override_marker() {
        let base = frozen(
            ClassDecl::new("A").method("run", method().virtual_method()),
            &[],
        );
        let class = draft(ClassDecl::new("B").extends("A").method("run", method()), &[&base]);
        assert!(matches!(
            VirtualOverride.check_class(&class),
            Err(DeclarationError::OverrideMethodViolation {
                problem: OverrideProblem::MissingMarker,
                ..
            })
        ));
    }

    #[test]
    fn test_marked_override_of_virtual_and_abstract() {
        for marker in [
            method().virtual_method(),
            CallableDecl::method().returns("int").abstract_method(),
        ] {
            let base = frozen(ClassDecl::new("A").method("run", marker), &[]);
            let class = draft(
                ClassDecl::new("B")
                    .extends("A")
                    .method("run", method().override_method()),
                &[&base],
            );
            assert!(VirtualOverride.check_class(&class).is_ok());
        }
    }

    #[test]
    fn test_inherited_through_intermediate_class() {
        let x = frozen(ClassDecl::new("X").method("run", method()), &[]);
        let y = frozen(ClassDecl::new("Y").extends("X"), &[&x]);
        let z = draft(
            ClassDecl::new("Z")
                .extends("Y")
                .method("run", method().override_method()),
            &[&y],
        );
        assert!(matches!(
            VirtualOverride.check_class(&z),
            Err(DeclarationError::VirtualMethodViolation { base, .. }) if base == "X"
        ));
    }

    #[test]
    fn test_special_methods_exempt() {
        let ctor = || {
            CallableDecl::method()
                .returns("None")
                .body(|_| Ok(Value::None))
        };
        let base = frozen(ClassDecl::new("A").constructor(ctor()), &[]);
        let class = draft(ClassDecl::new("B").extends("A").constructor(ctor()), &[&base]);
        assert!(VirtualOverride.check_class(&class).is_ok());
    }

    #[test]
    fn test_method_shadowing_attribute_rejected() {
        let base = frozen(
            ClassDecl::new("A")
                .field_with_default("size", "int", 1)
                .value("LIMIT", 10)
                .field("LIMIT", "int"),
            &[],
        );
        for name in ["size", "LIMIT"] {
            let class = draft(
                ClassDecl::new("B").extends("A").method(name, method()),
                &[&base],
            );
            assert_eq!(
                VirtualOverride.check_class(&class).unwrap_err(),
                DeclarationError::VirtualMethodViolation {
                    base: "A".to_string(),
                    class: "B".to_string(),
                    method: name.to_string(),
                }
            );
        }
    }
}
