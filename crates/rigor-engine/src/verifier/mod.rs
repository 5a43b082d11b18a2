//! Declaration verifier
//!
//! Runs every registered rule over a drafted class or function, in
//! registration order, and stops at the first violation.

pub mod rule;
pub mod rules;

pub use rule::{Category, DeclarationRule, RuleMeta};

use crate::contract::{DraftCallable, DraftClass};
use crate::error::DeclarationError;

/// Rule runner
pub struct Verifier {
    rules: Vec<Box<dyn DeclarationRule>>,
}

impl Verifier {
    /// Verifier with every built-in rule
    pub fn new() -> Self {
        Self {
            rules: rules::all_rules(),
        }
    }

    /// Verifier with a custom rule list
    pub fn with_rules(rules: Vec<Box<dyn DeclarationRule>>) -> Self {
        Self { rules }
    }

    /// Registered rules
    pub fn rules(&self) -> impl Iterator<Item = &RuleMeta> {
        self.rules.iter().map(|r| r.meta())
    }

    /// Check a class
    pub fn verify_class(&self, class: &DraftClass) -> Result<(), DeclarationError> {
        self.rules.iter().try_for_each(|rule| rule.check_class(class))
    }

    /// Check a free function
    pub fn verify_function(&self, function: &DraftCallable) -> Result<(), DeclarationError> {
        self.rules
            .iter()
            .try_for_each(|rule| rule.check_function(function))
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_codes_are_unique() {
        let verifier = Verifier::new();
        let mut codes: Vec<_> = verifier.rules().map(|m| m.code).collect();
        let total = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), total);
        assert_eq!(total, 7);
    }

    #[test]
    fn test_empty_verifier_accepts_everything() {
        let verifier = Verifier::with_rules(Vec::new());
        let class = DraftClass {
            name: "A".to_string(),
            bases: Vec::new(),
            ancestors: Vec::new(),
            callables: Vec::new(),
            values: vec![("x".to_string(), rigor_types::Value::None)],
            annotations: Vec::new(),
            friends: Vec::new(),
        };
        assert!(verifier.verify_class(&class).is_ok());
        assert!(Verifier::new().verify_class(&class).is_err());
    }
}
