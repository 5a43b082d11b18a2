//! Lowering declarations into drafts and freezing drafts into descriptors
//!
//! A draft is a declaration with every annotation resolved into a
//! [`TypeSpec`] and its bases linearized. Verifier rules run over drafts;
//! a draft that passes is frozen into a [`ClassDescriptor`].

use std::sync::Arc;

use rigor_types::{TypeSpec, Value};
use rustc_hash::{FxHashMap, FxHashSet};

use super::descriptor::{AttributeSpec, ClassDescriptor, MethodDescriptor, ParamSpec};
use super::friends::FriendRef;
use super::member::{
    Annotation, Body, CallableDecl, CallableKind, ClassDecl, FunctionDecl, MemberDecl,
    MethodFlags, ParamDecl, ParamKind, Visibility,
};
use crate::error::DeclarationError;
use crate::runtime::Discipline;

/// Parameter with its annotation resolved
#[derive(Debug, Clone, PartialEq)]
pub struct DraftParam {
    /// Parameter name
    pub name: String,
    /// Parameter kind
    pub kind: ParamKind,
    /// Resolved annotation
    pub spec: Option<TypeSpec>,
    /// Default value
    pub default: Option<Value>,
}

/// Callable with its annotations resolved
#[derive(Clone)]
pub struct DraftCallable {
    /// Bare name
    pub name: String,
    /// `Class.name` or `name`
    pub qualified: String,
    /// Callable kind
    pub kind: CallableKind,
    /// Annotation on the implicit receiver, if any
    pub receiver_spec: Option<TypeSpec>,
    /// Parameters excluding the receiver
    pub params: Vec<DraftParam>,
    /// Resolved return annotation
    pub returns: Option<TypeSpec>,
    /// Marker flags
    pub flags: MethodFlags,
    body: Option<Body>,
}

impl std::fmt::Debug for DraftCallable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftCallable")
            .field("qualified", &self.qualified)
            .field("kind", &self.kind)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("flags", &self.flags)
            .finish()
    }
}

impl DraftCallable {
    /// Check if the callable has a special name
    pub fn is_special(&self) -> bool {
        Visibility::of(&self.name) == Visibility::Special
    }

    /// Check if the callable has a body
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

/// Class with its annotations resolved and bases linearized
#[derive(Debug, Clone)]
pub struct DraftClass {
    /// Class name
    pub name: String,
    /// Direct bases
    pub bases: Vec<Arc<ClassDescriptor>>,
    /// Linearized ancestors, nearest first
    pub ancestors: Vec<Arc<ClassDescriptor>>,
    /// Callable members in declaration order
    pub callables: Vec<DraftCallable>,
    /// Plain values in declaration order
    pub values: Vec<(String, Value)>,
    /// Attribute annotations in declaration order
    pub annotations: Vec<(String, TypeSpec)>,
    /// Declared friends
    pub friends: Vec<FriendRef>,
}

impl DraftClass {
    /// Callable member by name
    pub fn callable(&self, name: &str) -> Option<&DraftCallable> {
        self.callables.iter().find(|c| c.name == name)
    }

    /// Check if this class declares `name` in any form
    pub fn declares(&self, name: &str) -> bool {
        self.callables.iter().any(|c| c.name == name)
            || self.values.iter().any(|(n, _)| n == name)
            || self.annotations.iter().any(|(n, _)| n == name)
    }

    /// Attribute annotation by name
    pub fn annotation(&self, name: &str) -> Option<&TypeSpec> {
        self.annotations
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }
}

/// Resolve every annotation of a class declaration
pub fn lower_class(
    decl: ClassDecl,
    bases: Vec<Arc<ClassDescriptor>>,
    ancestors: Vec<Arc<ClassDescriptor>>,
) -> Result<DraftClass, DeclarationError> {
    let ClassDecl {
        name,
        members,
        annotations,
        friends,
        raw_friends,
        ..
    } = decl;

    if let Some(friend) = raw_friends.into_iter().next() {
        return Err(DeclarationError::InvalidFriend {
            class: name,
            friend,
        });
    }

    let annotations = annotations
        .into_iter()
        .map(|(attr, ann)| {
            let spec = ann.resolve(&format!("{}.{}", name, attr))?;
            Ok((attr, spec))
        })
        .collect::<Result<Vec<_>, DeclarationError>>()?;

    let mut callables = Vec::new();
    let mut values = Vec::new();
    for (member, decl) in members {
        match decl {
            MemberDecl::Callable(callable) => {
                let qualified = format!("{}.{}", name, member);
                callables.push(lower_callable(member, qualified, callable)?);
            }
            MemberDecl::Value(value) => values.push((member, value)),
        }
    }

    Ok(DraftClass {
        name,
        bases,
        ancestors,
        callables,
        values,
        annotations,
        friends,
    })
}

/// Resolve the annotations of a free function
pub fn lower_function(decl: FunctionDecl) -> Result<DraftCallable, DeclarationError> {
    let FunctionDecl { name, callable } = decl;
    lower_callable(name.clone(), name, callable)
}

fn lower_callable(
    name: String,
    qualified: String,
    decl: CallableDecl,
) -> Result<DraftCallable, DeclarationError> {
    if decl.body.is_none() && !decl.flags.is_abstract() {
        return Err(DeclarationError::MissingBody {
            callable: qualified,
        });
    }

    check_signature(&qualified, &decl.params)?;

    let receiver_spec = decl
        .receiver_annotation
        .as_ref()
        .map(|ann| ann.resolve(&format!("{}.{}", qualified, decl.kind.receiver_name())))
        .transpose()?;

    let params = decl
        .params
        .into_iter()
        .map(|param| {
            let spec = resolve_optional(
                param.annotation.as_ref(),
                &format!("{}.{}", qualified, param.name),
            )?;
            Ok(DraftParam {
                name: param.name,
                kind: param.kind,
                spec,
                default: param.default,
            })
        })
        .collect::<Result<Vec<_>, DeclarationError>>()?;

    let returns = resolve_optional(decl.returns.as_ref(), &qualified)?;

    Ok(DraftCallable {
        name,
        qualified,
        kind: decl.kind,
        receiver_spec,
        params,
        returns,
        flags: decl.flags,
        body: decl.body,
    })
}

/// Reject parameter lists that binding could only resolve ambiguously
fn check_signature(qualified: &str, params: &[ParamDecl]) -> Result<(), DeclarationError> {
    let invalid = |message: String| DeclarationError::InvalidSignature {
        callable: qualified.to_string(),
        message,
    };

    let mut seen = FxHashSet::default();
    let mut var_positional = false;
    let mut var_keyword = false;
    for param in params {
        if !seen.insert(param.name.as_str()) {
            return Err(invalid(format!("duplicate parameter '{}'", param.name)));
        }
        if var_keyword {
            return Err(invalid(format!(
                "parameter '{}' follows the keyword collector",
                param.name
            )));
        }
        match param.kind {
            ParamKind::VarPositional if var_positional => {
                return Err(invalid("more than one positional collector".to_string()))
            }
            ParamKind::VarPositional => var_positional = true,
            ParamKind::VarKeyword => var_keyword = true,
            ParamKind::Regular => {}
        }
    }
    Ok(())
}

fn resolve_optional(
    annotation: Option<&Annotation>,
    member: &str,
) -> Result<Option<TypeSpec>, DeclarationError> {
    annotation.map(|ann| ann.resolve(member)).transpose()
}

/// Freeze a verified draft class
pub fn freeze_class(draft: DraftClass, discipline: &dyn Discipline) -> ClassDescriptor {
    let owner: Arc<str> = Arc::from(draft.name.as_str());

    let attributes: FxHashMap<String, AttributeSpec> = draft
        .annotations
        .into_iter()
        .map(|(name, spec)| {
            let attr = AttributeSpec {
                name: name.clone(),
                spec,
                owner: owner.clone(),
            };
            (name, attr)
        })
        .collect();

    let methods: FxHashMap<String, Arc<MethodDescriptor>> = draft
        .callables
        .into_iter()
        .map(|callable| {
            let name = callable.name.clone();
            let method = freeze_callable(callable, Some(owner.clone()), discipline);
            (name, Arc::new(method))
        })
        .collect();

    ClassDescriptor::new(
        owner,
        draft.bases,
        draft.ancestors,
        attributes,
        methods,
        draft.values.into_iter().collect(),
        draft.friends,
    )
}

/// Freeze a verified callable
pub fn freeze_callable(
    callable: DraftCallable,
    owner: Option<Arc<str>>,
    discipline: &dyn Discipline,
) -> MethodDescriptor {
    let boundary = discipline.boundary(&callable.name);
    let params = callable
        .params
        .into_iter()
        .map(|p| ParamSpec {
            name: p.name,
            kind: p.kind,
            spec: p.spec,
            default: p.default,
        })
        .collect();

    MethodDescriptor::new(
        callable.name,
        owner,
        callable.kind,
        params,
        callable.returns,
        callable.flags,
        boundary,
        callable.body,
    )
}
