//! Friend specifiers
//!
//! A class grants access to its non-public members to its friends: free
//! functions, whole classes, or single qualified methods. Friends are
//! declared textually or through typed builders, resolved when the runtime
//! is linked, and inherited down the hierarchy.

use std::fmt;

use rustc_hash::FxHashSet;

/// A resolved friend
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FriendSpecifier {
    /// Unbound free function
    FreeFunction(String),
    /// Every method of a class
    Class(String),
    /// One method of one class
    QualifiedMethod {
        /// Receiver type name
        class: String,
        /// Method name
        method: String,
    },
}

impl fmt::Display for FriendSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FriendSpecifier::FreeFunction(name) | FriendSpecifier::Class(name) => {
                f.write_str(name)
            }
            FriendSpecifier::QualifiedMethod { class, method } => write!(f, "{}.{}", class, method),
        }
    }
}

/// A friend as declared, before link-time resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FriendRef {
    /// Bare name: a class or a free function
    Named(String),
    /// Already typed
    Specified(FriendSpecifier),
}

impl FriendRef {
    /// Parse `"name"` or `"Class.method"`
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.split_once('.') {
            None if is_identifier(text) => Some(FriendRef::Named(text.to_string())),
            Some((class, method)) if is_identifier(class) && is_identifier(method) => {
                Some(FriendRef::Specified(FriendSpecifier::QualifiedMethod {
                    class: class.to_string(),
                    method: method.to_string(),
                }))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FriendRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FriendRef::Named(name) => f.write_str(name),
            FriendRef::Specified(spec) => spec.fmt(f),
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Resolved friend set of one class, including inherited friends
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FriendSet {
    entries: FxHashSet<FriendSpecifier>,
}

impl FriendSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a friend
    pub fn insert(&mut self, friend: FriendSpecifier) {
        self.entries.insert(friend);
    }

    /// Merge another set into this one
    pub fn extend(&mut self, other: &FriendSet) {
        self.entries.extend(other.entries.iter().cloned());
    }

    /// Check for a befriended free function
    pub fn contains_function(&self, name: &str) -> bool {
        self.entries
            .contains(&FriendSpecifier::FreeFunction(name.to_string()))
    }

    /// Check for a befriended class
    pub fn contains_class(&self, name: &str) -> bool {
        self.entries.contains(&FriendSpecifier::Class(name.to_string()))
    }

    /// Check for a befriended qualified method
    pub fn contains_method(&self, class: &str, method: &str) -> bool {
        self.entries.contains(&FriendSpecifier::QualifiedMethod {
            class: class.to_string(),
            method: method.to_string(),
        })
    }

    /// Check for any friend
    pub fn contains(&self, friend: &FriendSpecifier) -> bool {
        self.entries.contains(friend)
    }

    /// Check if every friend of `other` is also a friend here
    pub fn is_superset(&self, other: &FriendSet) -> bool {
        self.entries.is_superset(&other.entries)
    }

    /// Iterate over friends (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &FriendSpecifier> {
        self.entries.iter()
    }

    /// Number of friends
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no friends
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<FriendSpecifier> for FriendSet {
    fn from_iter<I: IntoIterator<Item = FriendSpecifier>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
