//! Error types for declaration and runtime discipline
//!
//! Declaration errors abort a class (or function) declaration; the type never
//! becomes usable. Runtime errors abort the single offending call or access
//! and propagate to the immediate caller.

use rigor_types::TypeError;
use thiserror::Error;

/// Why an `override` marker was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideProblem {
    /// The member shadows a base member but is not marked `override`
    MissingMarker,
    /// The member is marked `override` but shadows nothing
    NothingToOverride,
}

/// Errors raised while declaring classes and functions or linking the runtime
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeclarationError {
    /// A parameter has no type annotation
    #[error("Parameter '{parameter}' in '{callable}' has no type annotation")]
    MissingParameterTypeAnnotation {
        /// Qualified callable name
        callable: String,
        /// Parameter name
        parameter: String,
    },

    /// A callable has no return type annotation
    #[error("'{callable}' has no return type annotation")]
    MissingReturnTypeAnnotation {
        /// Qualified callable name
        callable: String,
    },

    /// A plain class member has no type annotation
    #[error("Attribute '{class}.{attribute}' has no type annotation")]
    MissingAttributeTypeAnnotation {
        /// Declaring class
        class: String,
        /// Attribute name
        attribute: String,
    },

    /// The receiver or a variadic collector carries a type annotation
    #[error("Parameter '{parameter}' in '{callable}' should not have a type annotation")]
    UnnecessaryParameterTypeAnnotation {
        /// Qualified callable name
        callable: String,
        /// Parameter name
        parameter: String,
    },

    /// A base method that is neither virtual nor abstract is overridden
    #[error("Method '{base}.{method}' must be marked virtual or abstract to be overridden by '{class}'")]
    VirtualMethodViolation {
        /// Class declaring the overridden method
        base: String,
        /// Class being declared
        class: String,
        /// Method name
        method: String,
    },

    /// Override marker missing or dangling
    #[error("{}", override_message(.class, .method, .problem))]
    OverrideMethodViolation {
        /// Class being declared
        class: String,
        /// Method name
        method: String,
        /// What is wrong with the marker
        problem: OverrideProblem,
    },

    /// An inherited abstract method has no implementation
    #[error("Abstract method '{base}.{method}' must be implemented in class '{class}'")]
    AbstractMethodViolation {
        /// Class declaring the abstract method
        base: String,
        /// Class being declared
        class: String,
        /// Method name
        method: String,
    },

    /// Class name already declared
    #[error("Class '{name}' is already declared")]
    DuplicateClass {
        /// Class name
        name: String,
    },

    /// Free function name already registered
    #[error("Function '{name}' is already declared")]
    DuplicateFunction {
        /// Function name
        name: String,
    },

    /// Base class not declared yet
    #[error("Class '{class}' extends undeclared class '{base}'")]
    UnknownBase {
        /// Class being declared
        class: String,
        /// Missing base
        base: String,
    },

    /// No consistent resolution order exists for the bases
    #[error("Cannot create a consistent resolution order for class '{class}'")]
    InconsistentHierarchy {
        /// Class being declared
        class: String,
    },

    /// Annotation text failed to parse
    #[error("Invalid annotation on '{member}': {source}")]
    InvalidAnnotation {
        /// Qualified member or parameter name
        member: String,
        /// Parse failure
        source: TypeError,
    },

    /// Friend text failed to parse
    #[error("Invalid friend '{friend}' on class '{class}'")]
    InvalidFriend {
        /// Class declaring the friend
        class: String,
        /// Friend text
        friend: String,
    },

    /// A concrete callable has no body
    #[error("'{callable}' has no body and is not abstract")]
    MissingBody {
        /// Qualified callable name
        callable: String,
    },

    /// A parameter list that cannot be bound
    #[error("Invalid signature for '{callable}': {message}")]
    InvalidSignature {
        /// Qualified callable name
        callable: String,
        /// What is wrong with the parameter list
        message: String,
    },

    /// A friend reference names nothing that exists
    #[error("Friend '{friend}' of class '{class}' does not resolve to a class, method or function")]
    UnresolvedFriend {
        /// Class declaring the friend
        class: String,
        /// Friend text
        friend: String,
    },

    /// A bare friend name matches both a class and a function
    #[error("Friend '{friend}' of class '{class}' names both a class and a function")]
    AmbiguousFriend {
        /// Class declaring the friend
        class: String,
        /// Friend text
        friend: String,
    },

    /// An annotation references an undeclared class
    #[error("Annotation on '{member}' references undeclared class '{class}'")]
    UnresolvedType {
        /// Qualified member or parameter name
        member: String,
        /// Missing class
        class: String,
    },
}

fn override_message(class: &str, method: &str, problem: &OverrideProblem) -> String {
    match problem {
        OverrideProblem::MissingMarker => {
            format!("Method '{}.{}' must be marked override", class, method)
        }
        OverrideProblem::NothingToOverride => format!(
            "Method '{}.{}' is marked override, but no method to override exists",
            class, method
        ),
    }
}

impl DeclarationError {
    /// Check if this is one of the seven structural discipline violations
    pub fn is_discipline_violation(&self) -> bool {
        matches!(
            self,
            DeclarationError::MissingParameterTypeAnnotation { .. }
                | DeclarationError::MissingReturnTypeAnnotation { .. }
                | DeclarationError::MissingAttributeTypeAnnotation { .. }
                | DeclarationError::UnnecessaryParameterTypeAnnotation { .. }
                | DeclarationError::VirtualMethodViolation { .. }
                | DeclarationError::OverrideMethodViolation { .. }
                | DeclarationError::AbstractMethodViolation { .. }
        )
    }
}

/// Errors raised by a single call or attribute access
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    /// A value does not match its declared type
    #[error("Type mismatch for {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// What was being checked, e.g. "parameter 'x' of 'Test.method'"
        context: String,
        /// Expected type
        expected: String,
        /// Actual runtime type
        actual: String,
    },

    /// A const attribute was written outside its constructor or twice
    #[error("Attribute '{class}.{attribute}' is const and cannot be modified")]
    ConstModifierViolation {
        /// Instance class
        class: String,
        /// Attribute name
        attribute: String,
    },

    /// A non-public member was read by a caller without access
    #[error("Access to protected/private member '{class}.{member}' is not allowed")]
    AccessModifierViolation {
        /// Owner class
        class: String,
        /// Member name
        member: String,
    },

    /// An attribute without a declared type was written
    #[error("Attribute '{class}.{attribute}' has no type annotation")]
    MissingAttributeTypeAnnotation {
        /// Instance class
        class: String,
        /// Attribute name
        attribute: String,
    },

    /// Call arguments could not be bound to parameters
    #[error("'{callable}': {message}")]
    ArgumentBinding {
        /// Qualified callable name
        callable: String,
        /// Binding failure
        message: String,
    },

    /// No attribute, property, default or method of that name
    #[error("'{class}' has no member '{member}'")]
    UndefinedMember {
        /// Owner class
        class: String,
        /// Member name
        member: String,
    },

    /// The member exists but cannot be called
    #[error("Member '{class}.{member}' is not callable")]
    NotCallable {
        /// Owner class
        class: String,
        /// Member name
        member: String,
    },

    /// A method was read as a plain attribute
    #[error("Member '{class}.{member}' is a method and must be called")]
    MethodAsAttribute {
        /// Owner class
        class: String,
        /// Member name
        member: String,
    },

    /// A receiver was required but the frame has none
    #[error("'{callable}' has no receiver")]
    NoReceiver {
        /// Frame's callable name
        callable: String,
    },

    /// A body-less abstract method was invoked
    #[error("Abstract method '{callable}' has no implementation")]
    AbstractInvocation {
        /// Qualified callable name
        callable: String,
    },

    /// Class not declared in this runtime
    #[error("Unknown class '{name}'")]
    UnknownClass {
        /// Class name
        name: String,
    },

    /// Free function not declared in this runtime
    #[error("Unknown function '{name}'")]
    UnknownFunction {
        /// Function name
        name: String,
    },

    /// Error raised by user code inside a body
    #[error("{0}")]
    Raised(String),
}

impl RuntimeError {
    /// Raise an error from user code
    pub fn raised(message: impl Into<String>) -> Self {
        RuntimeError::Raised(message.into())
    }
}

/// Errors loading engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_messages() {
        let missing = DeclarationError::OverrideMethodViolation {
            class: "B".to_string(),
            method: "run".to_string(),
            problem: OverrideProblem::MissingMarker,
        };
        assert_eq!(missing.to_string(), "Method 'B.run' must be marked override");

        let dangling = DeclarationError::OverrideMethodViolation {
            class: "B".to_string(),
            method: "run".to_string(),
            problem: OverrideProblem::NothingToOverride,
        };
        assert!(dangling.to_string().contains("no method to override"));
    }

    #[test]
    fn test_discipline_violation_classification() {
        let violation = DeclarationError::MissingReturnTypeAnnotation {
            callable: "A.f".to_string(),
        };
        assert!(violation.is_discipline_violation());

        let structural = DeclarationError::DuplicateClass {
            name: "A".to_string(),
        };
        assert!(!structural.is_discipline_violation());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = RuntimeError::TypeMismatch {
            context: "parameter 'x' of 'A.f'".to_string(),
            expected: "int".to_string(),
            actual: "str".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch for parameter 'x' of 'A.f': expected int, got str"
        );
    }
}
