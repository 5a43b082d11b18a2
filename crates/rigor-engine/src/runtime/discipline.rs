//! Enforced and passthrough disciplines
//!
//! A runtime holds one `&'static dyn Discipline` for its whole life. The
//! enforced discipline runs the declaration rules, marks callables as
//! boundary-checked and guards attribute reads and writes. The passthrough
//! discipline accepts everything and only computes storage keys.

use std::fmt;

use once_cell::sync::Lazy;
use rigor_types::{matches, type_name, Value};
use tracing::{debug, trace};

use crate::config::Mode;
use crate::contract::{AttributeSpec, Boundary, ClassDescriptor, DraftCallable, DraftClass, Visibility};
use crate::error::{DeclarationError, RuntimeError};
use crate::runtime::access::{resolve_access, MemberRef};
use crate::runtime::caller::{CallerIdentity, CallerOrigin};
use crate::runtime::object::{ObjectRef, SlotKey};
use crate::verifier::Verifier;

/// Callables invoked by the attribute machinery itself; never boundary-checked
pub const ATTRIBUTE_HOOKS: [&str; 4] = [
    "__getattr__",
    "__setattr__",
    "__delattr__",
    "__getattribute__",
];

static VERIFIER: Lazy<Verifier> = Lazy::new(Verifier::new);

/// An attribute write about to happen
pub struct WriteRequest<'a> {
    /// Target object
    pub object: &'a ObjectRef,
    /// Located member
    pub member: &'a MemberRef,
    /// Slot the value will be stored in
    pub key: &'a SlotKey,
    /// Declared attribute, if any
    pub attribute: Option<&'a AttributeSpec>,
    /// Writer
    pub caller: &'a CallerIdentity,
    /// New value
    pub value: &'a Value,
}

/// Policy applied by a runtime
pub trait Discipline: fmt::Debug + Send + Sync {
    /// Mode this discipline implements
    fn mode(&self) -> Mode;

    /// Run declaration rules over a class
    fn verify_class(&self, class: &DraftClass) -> Result<(), DeclarationError>;

    /// Run declaration rules over a free function
    fn verify_function(&self, function: &DraftCallable) -> Result<(), DeclarationError>;

    /// Boundary mode for a callable named `name`
    fn boundary(&self, name: &str) -> Boundary;

    /// Authorize a read and return the slot to read from
    fn authorize_read(
        &self,
        owner: &ClassDescriptor,
        member: &MemberRef,
        caller: &CallerIdentity,
    ) -> Result<SlotKey, RuntimeError>;

    /// Authorize a write; `Ok(true)` fixes the slot permanently
    fn authorize_write(&self, write: &WriteRequest<'_>) -> Result<bool, RuntimeError>;
}

/// Every rule and check applied
#[derive(Debug, Clone, Copy, Default)]
pub struct Enforced;

impl Discipline for Enforced {
    fn mode(&self) -> Mode {
        Mode::Enforced
    }

    fn verify_class(&self, class: &DraftClass) -> Result<(), DeclarationError> {
        VERIFIER.verify_class(class)
    }

    fn verify_function(&self, function: &DraftCallable) -> Result<(), DeclarationError> {
        VERIFIER.verify_function(function)
    }

    fn boundary(&self, name: &str) -> Boundary {
        if ATTRIBUTE_HOOKS.contains(&name) {
            Boundary::Unchecked
        } else {
            Boundary::Checked
        }
    }

    fn authorize_read(
        &self,
        owner: &ClassDescriptor,
        member: &MemberRef,
        caller: &CallerIdentity,
    ) -> Result<SlotKey, RuntimeError> {
        let fallback = owner.name_arc();
        if !member.visibility.is_restricted() || caller.origin() == CallerOrigin::Reflection {
            return Ok(member.slot_key(None, fallback));
        }

        if member.visibility == Visibility::Private && member.declaring_owner.is_none() {
            return Err(RuntimeError::UndefinedMember {
                class: owner.name().to_string(),
                member: member.name.clone(),
            });
        }

        match resolve_access(owner, member, caller) {
            Some(rule) => {
                trace!(class = %owner.name(), member = %member.name, caller = %caller, %rule, "access granted");
                Ok(member.slot_key(Some(rule), fallback))
            }
            None => {
                debug!(class = %owner.name(), member = %member.name, caller = %caller, "access denied");
                Err(RuntimeError::AccessModifierViolation {
                    class: owner.name().to_string(),
                    member: member.name.clone(),
                })
            }
        }
    }

    fn authorize_write(&self, write: &WriteRequest<'_>) -> Result<bool, RuntimeError> {
        let class = write.object.class_name();
        let attribute = write
            .attribute
            .ok_or_else(|| RuntimeError::MissingAttributeTypeAnnotation {
                class: class.to_string(),
                attribute: write.member.name.clone(),
            })?;

        if attribute.is_const()
            && (write.object.is_fixed(write.key) || !write.caller.is_constructor_of(class))
        {
            debug!(class = %class, attribute = %attribute.name, caller = %write.caller, "const write rejected");
            return Err(RuntimeError::ConstModifierViolation {
                class: class.to_string(),
                attribute: attribute.name.clone(),
            });
        }

        if !matches(write.value, &attribute.spec) {
            return Err(RuntimeError::TypeMismatch {
                context: format!("attribute '{}.{}'", class, attribute.name),
                expected: attribute.spec.unwrap_const().to_string(),
                actual: type_name(write.value),
            });
        }

        Ok(attribute.is_const())
    }
}

/// Nothing checked
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Discipline for Passthrough {
    fn mode(&self) -> Mode {
        Mode::Passthrough
    }

    fn verify_class(&self, _class: &DraftClass) -> Result<(), DeclarationError> {
        Ok(())
    }

    fn verify_function(&self, _function: &DraftCallable) -> Result<(), DeclarationError> {
        Ok(())
    }

    fn boundary(&self, _name: &str) -> Boundary {
        Boundary::Unchecked
    }

    fn authorize_read(
        &self,
        owner: &ClassDescriptor,
        member: &MemberRef,
        _caller: &CallerIdentity,
    ) -> Result<SlotKey, RuntimeError> {
        Ok(member.slot_key(None, owner.name_arc()))
    }

    fn authorize_write(&self, _write: &WriteRequest<'_>) -> Result<bool, RuntimeError> {
        Ok(false)
    }
}
