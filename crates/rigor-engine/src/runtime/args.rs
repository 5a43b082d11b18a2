//! Call arguments and their binding to declared parameters
//!
//! Binding follows keyword-aware positional rules: positional arguments
//! fill regular parameters in order, the surplus goes to a `*` collector,
//! keywords fill remaining named parameters or a `**` collector. Parameters
//! declared after a `*` collector are keyword-only.

use rigor_types::Value;

use crate::contract::{ParamKind, ParamSpec};
use crate::error::RuntimeError;

/// Arguments of one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Args {
    /// No arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional arguments only
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keywords: Vec::new(),
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument
    pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.keywords.push((name.to_string(), value.into()));
        self
    }

    /// Check if there are no arguments
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }
}

/// One bound parameter
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    /// Parameter name
    pub name: String,
    /// Parameter kind
    pub kind: ParamKind,
    /// Bound value; a tuple for `*`, a dict for `**`
    pub value: Value,
}

/// Arguments bound to parameter names, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    params: Vec<BoundParam>,
}

impl BoundArgs {
    /// Value bound to `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// Bound parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &BoundParam> {
        self.params.iter()
    }
}

/// Bind `args` to `params`, applying defaults
pub fn bind(callable: &str, params: &[ParamSpec], args: Args) -> Result<BoundArgs, RuntimeError> {
    let fail = |message: String| RuntimeError::ArgumentBinding {
        callable: callable.to_string(),
        message,
    };

    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    let var_positional = params.iter().position(|p| p.kind == ParamKind::VarPositional);
    let var_keyword = params.iter().position(|p| p.kind == ParamKind::VarKeyword);

    // Regular parameters before a `*` collector accept positionals
    let positional_slots: Vec<usize> = params
        .iter()
        .enumerate()
        .take_while(|(_, p)| p.kind == ParamKind::Regular)
        .map(|(i, _)| i)
        .collect();

    let mut extra = Vec::new();
    for (index, value) in args.positional.into_iter().enumerate() {
        match positional_slots.get(index) {
            Some(&slot) => slots[slot] = Some(value),
            None if var_positional.is_some() => extra.push(value),
            None => {
                return Err(fail(format!(
                    "takes {} positional argument(s) but more were given",
                    positional_slots.len()
                )))
            }
        }
    }

    let mut extra_keywords = Vec::new();
    for (name, value) in args.keywords {
        let target = params
            .iter()
            .position(|p| p.kind == ParamKind::Regular && p.name == name);
        match target {
            Some(slot) if slots[slot].is_some() => {
                return Err(fail(format!("got multiple values for argument '{}'", name)))
            }
            Some(slot) => slots[slot] = Some(value),
            None if var_keyword.is_some() => {
                if extra_keywords.iter().any(|(n, _): &(String, Value)| *n == name) {
                    return Err(fail(format!("got multiple values for argument '{}'", name)));
                }
                extra_keywords.push((name, value));
            }
            None => {
                return Err(fail(format!("got an unexpected keyword argument '{}'", name)))
            }
        }
    }

    let mut bound = Vec::with_capacity(params.len());
    for (param, slot) in params.iter().zip(slots) {
        let value = match param.kind {
            ParamKind::VarPositional => Value::Tuple(std::mem::take(&mut extra)),
            ParamKind::VarKeyword => Value::Dict(
                std::mem::take(&mut extra_keywords)
                    .into_iter()
                    .map(|(k, v)| (Value::Str(k), v))
                    .collect(),
            ),
            ParamKind::Regular => match slot.or_else(|| param.default.clone()) {
                Some(value) => value,
                None => {
                    return Err(fail(format!(
                        "missing required argument '{}'",
                        param.name
                    )))
                }
            },
        };
        bound.push(BoundParam {
            name: param.name.clone(),
            kind: param.kind,
            value,
        });
    }

    Ok(BoundArgs { params: bound })
}
