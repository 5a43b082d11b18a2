//! Declaration rule trait and supporting types.
//!
//! Each rule implements `DeclarationRule`, provides static metadata
//! (`RuleMeta`), and overrides the `check_*` methods for the declarations it
//! inspects. Rules report the first violation they find.

use crate::contract::{DraftCallable, DraftClass};
use crate::error::DeclarationError;

/// What a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Parameter, return and attribute annotations.
    Annotation,
    /// Virtual, override and abstract contracts across the hierarchy.
    Inheritance,
}

/// Static metadata for a declaration rule.
pub struct RuleMeta {
    /// Rule name, e.g. "missing-return-annotation".
    pub name: &'static str,
    /// Rule code, e.g. "D1003".
    pub code: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Category.
    pub category: Category,
}

/// A structural rule run once per declaration.
pub trait DeclarationRule: Send + Sync {
    /// Rule metadata.
    fn meta(&self) -> &RuleMeta;

    /// Check a class declaration.
    fn check_class(&self, _class: &DraftClass) -> Result<(), DeclarationError> {
        Ok(())
    }

    /// Check a free function declaration.
    fn check_function(&self, _function: &DraftCallable) -> Result<(), DeclarationError> {
        Ok(())
    }
}
