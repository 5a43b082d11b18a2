//! Rule: missing-attribute-annotation (D1004)
//!
//! Plain class-level values with non-special names must be annotated.

use crate::contract::{DraftClass, Visibility};
use crate::error::DeclarationError;
use crate::verifier::rule::*;

/// Rejects unannotated class values.
pub struct MissingAttributeAnnotation;

static META: RuleMeta = RuleMeta {
    name: "missing-attribute-annotation",
    code: "D1004",
    description: "Class attributes must have type annotations",
    category: Category::Annotation,
};

impl DeclarationRule for MissingAttributeAnnotation {
    fn meta(&self) -> &RuleMeta {
        &META
    }

    fn check_class(&self, class: &DraftClass) -> Result<(), DeclarationError> {
        let missing = class.values.iter().find(|(name, _)| {
            Visibility::of(name) != Visibility::Special && class.annotation(name).is_none()
        });

        match missing {
            Some((name, _)) => Err(DeclarationError::MissingAttributeTypeAnnotation {
                class: class.name.clone(),
                attribute: name.clone(),
            }),
            None => Ok(()),
        }
    }
}
