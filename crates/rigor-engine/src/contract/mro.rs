//! C3 linearization of class hierarchies

use std::sync::Arc;

use super::descriptor::ClassDescriptor;
use crate::error::DeclarationError;

/// Compute the ancestors of a new class `name` with direct `bases`
///
/// Returns the linearized ancestors, nearest first, excluding the class
/// itself. Fails when the bases admit no monotonic order.
pub fn linearize(
    name: &str,
    bases: &[Arc<ClassDescriptor>],
) -> Result<Vec<Arc<ClassDescriptor>>, DeclarationError> {
    let mut sequences: Vec<Vec<Arc<ClassDescriptor>>> = bases
        .iter()
        .map(|base| {
            std::iter::once(base.clone())
                .chain(base.ancestors().iter().cloned())
                .collect()
        })
        .collect();
    sequences.push(bases.to_vec());

    let mut result = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(result);
        }

        let candidate = sequences
            .iter()
            .map(|seq| &seq[0])
            .find(|head| {
                !sequences
                    .iter()
                    .any(|seq| seq[1..].iter().any(|c| c.name() == head.name()))
            })
            .cloned()
            .ok_or_else(|| DeclarationError::InconsistentHierarchy {
                class: name.to_string(),
            })?;

        for seq in &mut sequences {
            if seq[0].name() == candidate.name() {
                seq.remove(0);
            }
        }
        result.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn class(name: &str, bases: &[&Arc<ClassDescriptor>]) -> Arc<ClassDescriptor> {
        let bases: Vec<_> = bases.iter().map(|b| (*b).clone()).collect();
        let ancestors = linearize(name, &bases).unwrap();
        Arc::new(ClassDescriptor::new(
            name.into(),
            bases,
            ancestors,
            FxHashMap::default(),
            FxHashMap::default(),
            FxHashMap::default(),
            Vec::new(),
        ))
    }

    fn names(order: &[Arc<ClassDescriptor>]) -> Vec<&str> {
        order.iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_single_chain() {
        let x = class("X", &[]);
        let y = class("Y", &[&x]);
        let z = class("Z", &[&y]);
        assert_eq!(names(z.ancestors()), vec!["Y", "X"]);
    }

    #[test]
    fn test_diamond() {
        let o = class("O", &[]);
        let a = class("A", &[&o]);
        let b = class("B", &[&o]);
        let d = class("D", &[&a, &b]);
        assert_eq!(names(d.ancestors()), vec!["A", "B", "O"]);
    }

    #[test]
    fn test_inconsistent_order() {
        let o = class("O", &[]);
        let a = class("A", &[&o]);
        let err = linearize("Bad", &[o.clone(), a.clone()]).unwrap_err();
        assert_eq!(
            err,
            DeclarationError::InconsistentHierarchy {
                class: "Bad".to_string()
            }
        );
    }
}
