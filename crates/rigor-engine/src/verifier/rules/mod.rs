//! Rule registry: every declaration rule, in evaluation order.

pub mod abstract_implementation;
pub mod dangling_override;
pub mod missing_attribute_annotation;
pub mod missing_parameter_annotation;
pub mod missing_return_annotation;
pub mod unnecessary_parameter_annotation;
pub mod virtual_override;

use super::rule::DeclarationRule;

/// Returns all declaration rules in the order they are evaluated.
pub fn all_rules() -> Vec<Box<dyn DeclarationRule>> {
    vec![
        // Annotation
        Box::new(missing_parameter_annotation::MissingParameterAnnotation),
        Box::new(unnecessary_parameter_annotation::UnnecessaryParameterAnnotation),
        Box::new(missing_return_annotation::MissingReturnAnnotation),
        Box::new(missing_attribute_annotation::MissingAttributeAnnotation),
        // Inheritance
        Box::new(virtual_override::VirtualOverride),
        Box::new(dangling_override::DanglingOverride),
        Box::new(abstract_implementation::AbstractImplementation),
    ]
}
