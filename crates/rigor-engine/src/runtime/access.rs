//! Access resolution for protected and private members
//!
//! A pure decision over the owner's metadata, the member being read and the
//! caller's identity. Grants are tried in a fixed order and the first match
//! wins; no match means the access is denied.

use std::fmt;
use std::sync::Arc;

use crate::contract::{ClassDescriptor, Visibility};
use crate::runtime::caller::CallerIdentity;
use crate::runtime::object::SlotKey;

/// Which rule granted an access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantRule {
    /// Caller is a befriended free function
    FriendFunction,
    /// Caller's receiver has the owner's exact type
    SameClass,
    /// Caller's receiver is an ancestor of the owner and the member is protected
    Inherited,
    /// Caller's receiver type is a befriended class
    FriendClass,
    /// Caller is a befriended qualified method
    FriendMethod,
}

impl fmt::Display for GrantRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GrantRule::FriendFunction => "friend-function",
            GrantRule::SameClass => "same-class",
            GrantRule::Inherited => "inherited",
            GrantRule::FriendClass => "friend-class",
            GrantRule::FriendMethod => "friend-method",
        };
        f.write_str(name)
    }
}

/// A member name located relative to an object's class and a caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    /// Member name
    pub name: String,
    /// Visibility derived from the name
    pub visibility: Visibility,
    /// Caller's declaring class, when it is in the owner's resolution order
    pub lexical_owner: Option<Arc<str>>,
    /// Whether the lexical owner itself declares the member
    pub lexical_declares: bool,
    /// Nearest class in the owner's resolution order declaring the member
    pub declaring_owner: Option<Arc<str>>,
}

impl MemberRef {
    /// Locate `name` on `class` as seen from `caller`
    pub fn locate(class: &ClassDescriptor, name: &str, caller: &CallerIdentity) -> Self {
        let lexical = caller
            .declaring_class()
            .and_then(|declaring| class.lineage_class(declaring));

        Self {
            name: name.to_string(),
            visibility: Visibility::of(name),
            lexical_owner: lexical.map(|c| c.name_arc().clone()),
            lexical_declares: lexical.map_or(false, |c| c.declares(name)),
            declaring_owner: class
                .declaring_class(name)
                .map(|c| c.name_arc().clone()),
        }
    }

    /// Storage key for this member
    ///
    /// Private members granted through a friend rule use their true
    /// declaring class; otherwise the caller's lexical class wins.
    /// `fallback` owns private members declared nowhere.
    pub fn slot_key(&self, rule: Option<GrantRule>, fallback: &Arc<str>) -> SlotKey {
        if self.visibility != Visibility::Private {
            return SlotKey::Shared(self.name.clone());
        }

        let owner = match rule {
            Some(GrantRule::FriendFunction | GrantRule::FriendClass | GrantRule::FriendMethod) => {
                self.declaring_owner.as_ref().or(self.lexical_owner.as_ref())
            }
            _ => self.lexical_owner.as_ref().or(self.declaring_owner.as_ref()),
        };

        SlotKey::Private {
            owner: owner.unwrap_or(fallback).clone(),
            name: self.name.clone(),
        }
    }
}

/// Decide whether `caller` may read `member` of an object of class `owner`
pub fn resolve_access(
    owner: &ClassDescriptor,
    member: &MemberRef,
    caller: &CallerIdentity,
) -> Option<GrantRule> {
    let friends = owner.friends();

    if caller.is_free_function() && friends.contains_function(caller.name()) {
        return Some(GrantRule::FriendFunction);
    }

    if let Some(receiver) = caller.receiver_class() {
        if receiver == owner.name() {
            // A private name resolves against the caller's declaring class
            if member.visibility != Visibility::Private || member.lexical_declares {
                return Some(GrantRule::SameClass);
            }
        }

        if member.visibility == Visibility::Protected && owner.is_subclass_of(receiver) {
            return Some(GrantRule::Inherited);
        }

        if friends.contains_class(receiver) {
            return Some(GrantRule::FriendClass);
        }
    }

    let type_name = caller.receiver_class().or(caller.declaring_class())?;
    if friends.contains_method(type_name, caller.name()) {
        return Some(GrantRule::FriendMethod);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{CallableDecl, ClassDecl, FriendSet, FriendSpecifier, MethodDescriptor};
    use crate::verifier::rules::testing::frozen;
    use rigor_types::Value;

    fn method_caller(class: &str, method: &str, receiver: &str) -> CallerIdentity {
        let descriptor = MethodDescriptor::new(
            method.to_string(),
            Some(Arc::from(class)),
            crate::contract::CallableKind::Method,
            Vec::new(),
            None,
            Default::default(),
            crate::contract::Boundary::Unchecked,
            None,
        );
        CallerIdentity::for_callable(&descriptor, Some(Arc::from(receiver)))
    }

    fn function_caller(name: &str) -> CallerIdentity {
        let descriptor = MethodDescriptor::new(
            name.to_string(),
            None,
            crate::contract::CallableKind::Function,
            Vec::new(),
            None,
            Default::default(),
            crate::contract::Boundary::Unchecked,
            None,
        );
        CallerIdentity::for_callable(&descriptor, None)
    }

    fn base_and_derived() -> (Arc<ClassDescriptor>, Arc<ClassDescriptor>) {
        let base = frozen(
            ClassDecl::new("Base")
                .field("_x", "int")
                .field("__y", "int")
                .method(
                    "read",
                    CallableDecl::method().returns("int").body(|_| Ok(Value::Int(0))),
                ),
            &[],
        );
        let derived = frozen(ClassDecl::new("Derived").extends("Base"), &[&base]);
        assert!(base.link_friends(FriendSet::new()));
        assert!(derived.link_friends(FriendSet::new()));
        (base, derived)
    }

    #[test]
    fn test_same_class_reads_everything() {
        let (_, derived) = base_and_derived();
        let caller = method_caller("Base", "read", "Derived");
        for name in ["_x", "__y"] {
            let member = MemberRef::locate(&derived, name, &caller);
            assert_eq!(
                resolve_access(&derived, &member, &caller),
                Some(GrantRule::SameClass)
            );
        }
        let member = MemberRef::locate(&derived, "__y", &caller);
        assert_eq!(
            member.slot_key(Some(GrantRule::SameClass), &Arc::from("Derived")),
            SlotKey::Private {
                owner: Arc::from("Base"),
                name: "__y".to_string()
            }
        );
    }

    #[test]
    fn test_subclass_method_cannot_read_base_private() {
        let (_, derived) = base_and_derived();
        let caller = method_caller("Derived", "peek", "Derived");
        let private = MemberRef::locate(&derived, "__y", &caller);
        assert_eq!(resolve_access(&derived, &private, &caller), None);

        let protected = MemberRef::locate(&derived, "_x", &caller);
        assert!(resolve_access(&derived, &protected, &caller).is_some());
    }

    #[test]
    fn test_subclass_receiver_cannot_read_base_instance_protected() {
        let (base, _) = base_and_derived();
        let caller = method_caller("Derived", "peek", "Derived");
        let protected = MemberRef::locate(&base, "_x", &caller);
        assert_eq!(
            resolve_access(&base, &protected, &caller),
            None,
            "Derived is not in Base's resolution order"
        );
    }

    #[test]
    fn test_ancestor_receiver_reads_subclass_protected() {
        let (_, derived) = base_and_derived();
        let caller = method_caller("Base", "read", "Base");

        let protected = MemberRef::locate(&derived, "_x", &caller);
        assert_eq!(
            resolve_access(&derived, &protected, &caller),
            Some(GrantRule::Inherited)
        );

        let private = MemberRef::locate(&derived, "__y", &caller);
        assert_eq!(resolve_access(&derived, &private, &caller), None);
    }

    #[test]
    fn test_friend_rules() {
        let owner = frozen(ClassDecl::new("Vault").field("__secret", "int"), &[]);
        let linked = owner.link_friends(
            [
                FriendSpecifier::FreeFunction("audit".to_string()),
                FriendSpecifier::Class("Auditor".to_string()),
                FriendSpecifier::QualifiedMethod {
                    class: "Clerk".to_string(),
                    method: "peek".to_string(),
                },
            ]
            .into_iter()
            .collect(),
        );
        assert!(linked);

        let audit = function_caller("audit");
        let member = MemberRef::locate(&owner, "__secret", &audit);
        assert_eq!(
            resolve_access(&owner, &member, &audit),
            Some(GrantRule::FriendFunction)
        );
        assert_eq!(
            member.slot_key(Some(GrantRule::FriendFunction), &Arc::from("Vault")),
            SlotKey::Private {
                owner: Arc::from("Vault"),
                name: "__secret".to_string()
            }
        );

        let auditor = method_caller("Auditor", "anything", "Auditor");
        assert_eq!(
            resolve_access(&owner, &member, &auditor),
            Some(GrantRule::FriendClass)
        );

        let clerk = method_caller("Clerk", "peek", "Clerk");
        assert_eq!(
            resolve_access(&owner, &member, &clerk),
            Some(GrantRule::FriendMethod)
        );

        let other_clerk_method = method_caller("Clerk", "poke", "Clerk");
        assert_eq!(resolve_access(&owner, &member, &other_clerk_method), None);

        assert_eq!(resolve_access(&owner, &member, &function_caller("other")), None);
        assert_eq!(
            resolve_access(&owner, &member, &CallerIdentity::top_level()),
            None
        );
    }

    #[test]
    fn test_public_key_is_shared() {
        let (_, derived) = base_and_derived();
        let member = MemberRef::locate(&derived, "_x", &CallerIdentity::top_level());
        assert_eq!(
            member.slot_key(None, &Arc::from("Derived")),
            SlotKey::Shared("_x".to_string())
        );
    }
}
