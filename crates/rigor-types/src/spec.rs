//! Core type specification definitions

use std::fmt;

/// Primitive value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// 64-bit signed integer
    Int,
    /// IEEE 754 double
    Float,
    /// UTF-8 string
    Str,
    /// Boolean
    Bool,
    /// Raw byte string
    Bytes,
}

impl PrimitiveType {
    /// Annotation keyword for this primitive
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Str => "str",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Bytes => "bytes",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Generic container kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// `list[T]`
    List,
    /// `set[T]`
    Set,
    /// `dict[K, V]`
    Dict,
    /// `tuple[T1, T2, ...]` with a fixed arity
    Tuple,
    /// `tuple[T, ...]` of any length
    VarTuple,
}

impl ContainerKind {
    /// Annotation keyword for this container
    pub fn type_name(&self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Set => "set",
            ContainerKind::Dict => "dict",
            ContainerKind::Tuple | ContainerKind::VarTuple => "tuple",
        }
    }

    /// Number of type arguments this container takes, `None` for any
    pub fn arity(&self) -> Option<usize> {
        match self {
            ContainerKind::List | ContainerKind::Set | ContainerKind::VarTuple => Some(1),
            ContainerKind::Dict => Some(2),
            ContainerKind::Tuple => None,
        }
    }
}

/// A structural description of an acceptable set of runtime values
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    /// Matches every value
    Any,

    /// Exact primitive type
    Primitive(PrimitiveType),

    /// Nominal class reference, matched against the object's resolution order
    Class(String),

    /// Container with element specs; no arguments means any elements
    Generic {
        /// Container kind
        base: ContainerKind,
        /// Element type arguments
        args: Vec<TypeSpec>,
    },

    /// Any alternative matches
    Union(Vec<TypeSpec>),

    /// Write-once wrapper; matches like its inner spec
    Const(Box<TypeSpec>),

    /// Only the absent value
    NoValue,
}

impl TypeSpec {
    /// `int`
    pub fn int() -> Self {
        TypeSpec::Primitive(PrimitiveType::Int)
    }

    /// `float`
    pub fn float() -> Self {
        TypeSpec::Primitive(PrimitiveType::Float)
    }

    /// `str`
    pub fn str() -> Self {
        TypeSpec::Primitive(PrimitiveType::Str)
    }

    /// `bool`
    pub fn bool() -> Self {
        TypeSpec::Primitive(PrimitiveType::Bool)
    }

    /// Class reference by name
    pub fn class(name: impl Into<String>) -> Self {
        TypeSpec::Class(name.into())
    }

    /// `list[element]`
    pub fn list(element: TypeSpec) -> Self {
        TypeSpec::Generic {
            base: ContainerKind::List,
            args: vec![element],
        }
    }

    /// `dict[key, value]`
    pub fn dict(key: TypeSpec, value: TypeSpec) -> Self {
        TypeSpec::Generic {
            base: ContainerKind::Dict,
            args: vec![key, value],
        }
    }

    /// `inner | None`
    pub fn optional(inner: TypeSpec) -> Self {
        TypeSpec::Union(vec![inner, TypeSpec::NoValue])
    }

    /// `const[inner]`
    pub fn constant(inner: TypeSpec) -> Self {
        TypeSpec::Const(Box::new(inner))
    }

    /// Check if this spec is a top-level const wrapper
    pub fn is_const(&self) -> bool {
        matches!(self, TypeSpec::Const(_))
    }

    /// Check if this spec only admits the absent value
    pub fn is_no_value(&self) -> bool {
        matches!(self, TypeSpec::NoValue)
    }

    /// Strip any top-level const wrappers
    pub fn unwrap_const(&self) -> &TypeSpec {
        match self {
            TypeSpec::Const(inner) => inner.unwrap_const(),
            other => other,
        }
    }

    /// Visit every class name referenced anywhere in this spec
    pub fn for_each_class<'a>(&'a self, visit: &mut impl FnMut(&'a str)) {
        match self {
            TypeSpec::Class(name) => visit(name),
            TypeSpec::Generic { args, .. } | TypeSpec::Union(args) => {
                for arg in args {
                    arg.for_each_class(visit);
                }
            }
            TypeSpec::Const(inner) => inner.for_each_class(visit),
            TypeSpec::Any | TypeSpec::Primitive(_) | TypeSpec::NoValue => {}
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Any => write!(f, "any"),
            TypeSpec::Primitive(p) => write!(f, "{}", p),
            TypeSpec::Class(name) => write!(f, "{}", name),
            TypeSpec::Generic { base, args } => {
                write!(f, "{}", base.type_name())?;
                if args.is_empty() {
                    return Ok(());
                }
                write!(f, "[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                if *base == ContainerKind::VarTuple {
                    write!(f, ", ...")?;
                }
                write!(f, "]")
            }
            TypeSpec::Union(alternatives) => {
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", alt)?;
                }
                Ok(())
            }
            TypeSpec::Const(inner) => write!(f, "const[{}]", inner),
            TypeSpec::NoValue => write!(f, "None"),
        }
    }
}
