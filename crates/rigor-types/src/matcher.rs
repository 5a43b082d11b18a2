//! Structural matching of values against type specs
//!
//! `matches` is the single compatibility oracle used at call boundaries and
//! attribute writes. There is no coercion: `bool` is not an `int` and an
//! `int` is not a `float`.

use crate::spec::{ContainerKind, PrimitiveType, TypeSpec};
use crate::value::Value;

/// Check if `value` is an acceptable value for `spec`
pub fn matches(value: &Value, spec: &TypeSpec) -> bool {
    match spec {
        TypeSpec::Any => true,
        TypeSpec::NoValue => value.is_none(),
        TypeSpec::Const(inner) => matches(value, inner),
        TypeSpec::Union(alternatives) => alternatives.iter().any(|alt| matches(value, alt)),
        TypeSpec::Primitive(primitive) => matches_primitive(value, *primitive),
        TypeSpec::Class(name) => match value {
            Value::Object(obj) => obj.is_instance_of(name),
            _ => false,
        },
        TypeSpec::Generic { base, args } => matches_container(value, *base, args),
    }
}

fn matches_primitive(value: &Value, primitive: PrimitiveType) -> bool {
    matches!(
        (value, primitive),
        (Value::Int(_), PrimitiveType::Int)
            | (Value::Float(_), PrimitiveType::Float)
            | (Value::Str(_), PrimitiveType::Str)
            | (Value::Bool(_), PrimitiveType::Bool)
            | (Value::Bytes(_), PrimitiveType::Bytes)
    )
}

fn matches_container(value: &Value, base: ContainerKind, args: &[TypeSpec]) -> bool {
    match (base, value) {
        (ContainerKind::List, Value::List(items))
        | (ContainerKind::Set, Value::Set(items))
        | (ContainerKind::VarTuple, Value::Tuple(items)) => match args.first() {
            Some(element) => items.iter().all(|item| matches(item, element)),
            None => true,
        },
        (ContainerKind::Tuple, Value::Tuple(items)) => {
            args.is_empty()
                || (items.len() == args.len()
                    && items.iter().zip(args).all(|(item, spec)| matches(item, spec)))
        }
        (ContainerKind::Dict, Value::Dict(entries)) => match args {
            [key, val] => entries
                .iter()
                .all(|(k, v)| matches(k, key) && matches(v, val)),
            _ => true,
        },
        _ => false,
    }
}

/// Describe the runtime type of a value for diagnostics
pub fn type_name(value: &Value) -> String {
    match value {
        Value::None => "None".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Int(_) => "int".to_string(),
        Value::Float(_) => "float".to_string(),
        Value::Str(_) => "str".to_string(),
        Value::Bytes(_) => "bytes".to_string(),
        Value::List(_) => "list".to_string(),
        Value::Tuple(_) => "tuple".to_string(),
        Value::Set(_) => "set".to_string(),
        Value::Dict(_) => "dict".to_string(),
        Value::Object(obj) => obj.class_name().to_string(),
    }
}
