//! Instances and their attribute storage
//!
//! Public and protected attributes are keyed by name. Private attributes are
//! keyed by their declaring class and name, so a base and a subclass may
//! each own a private member of the same name on one object.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rigor_types::{ObjectHandle, Value};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::contract::ClassDescriptor;

/// Global object ID counter
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a unique object ID
fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Storage key of one attribute slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKey {
    /// Public or protected attribute
    Shared(String),
    /// Private attribute of its declaring class
    Private {
        /// Declaring class
        owner: Arc<str>,
        /// Member name
        name: String,
    },
}

impl SlotKey {
    /// Member name without the owner
    pub fn name(&self) -> &str {
        match self {
            SlotKey::Shared(name) | SlotKey::Private { name, .. } => name,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Shared(name) => f.write_str(name),
            SlotKey::Private { owner, name } => write!(f, "{}::{}", owner, name),
        }
    }
}

#[derive(Debug, Default)]
struct InstanceState {
    slots: FxHashMap<SlotKey, Value>,
    fixed: FxHashSet<SlotKey>,
    cached: FxHashMap<String, Value>,
}

/// Object allocated by a runtime
pub struct Instance {
    id: u64,
    class: Arc<ClassDescriptor>,
    state: RwLock<InstanceState>,
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("class", &self.class.name())
            .finish()
    }
}

impl ObjectHandle for Instance {
    fn class_name(&self) -> &str {
        self.class.name()
    }

    fn is_instance_of(&self, class: &str) -> bool {
        self.class.is_subclass_of(class)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Shared reference to an [`Instance`]
///
/// Objects are reference counted and freed when the last reference drops.
/// There is no cycle collector: objects whose attributes reference each
/// other, directly or through themselves, are never freed. Break such
/// cycles by overwriting one of the attributes (for example with `None`)
/// before dropping the last outside reference.
#[derive(Debug, Clone)]
pub struct ObjectRef(Arc<Instance>);

impl ObjectRef {
    pub(crate) fn new(class: Arc<ClassDescriptor>) -> Self {
        ObjectRef(Arc::new(Instance {
            id: generate_object_id(),
            class,
            state: RwLock::new(InstanceState::default()),
        }))
    }

    /// Extract an object from a value created by this engine
    pub fn from_value(value: &Value) -> Option<Self> {
        let handle = value.as_object()?.clone();
        handle.into_any().downcast::<Instance>().ok().map(ObjectRef)
    }

    /// Wrap as a value
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Unique object ID
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Exact runtime class
    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.0.class
    }

    /// Exact runtime class name
    pub fn class_name(&self) -> &str {
        self.0.class.name()
    }

    /// Check if `class` is in this object's resolution order
    pub fn is_instance_of(&self, class: &str) -> bool {
        self.0.class.is_subclass_of(class)
    }

    /// Check if both references point to the same object
    pub fn same(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn slot(&self, key: &SlotKey) -> Option<Value> {
        self.0.state.read().slots.get(key).cloned()
    }

    pub(crate) fn store(&self, key: SlotKey, value: Value, fix: bool) {
        let mut state = self.0.state.write();
        if fix {
            state.fixed.insert(key.clone());
        }
        state.slots.insert(key, value);
    }

    pub(crate) fn is_fixed(&self, key: &SlotKey) -> bool {
        self.0.state.read().fixed.contains(key)
    }

    pub(crate) fn cached(&self, name: &str) -> Option<Value> {
        self.0.state.read().cached.get(name).cloned()
    }

    pub(crate) fn cache(&self, name: &str, value: Value) {
        self.0.state.write().cached.insert(name.to_string(), value);
    }

    /// Stored slots, sorted by key
    pub(crate) fn snapshot(&self) -> Vec<(SlotKey, Value)> {
        let state = self.0.state.read();
        let mut slots: Vec<_> = state
            .slots
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        slots.sort_by(|a, b| a.0.cmp(&b.0));
        slots
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object.0)
    }
}

impl From<&ObjectRef> for Value {
    fn from(object: &ObjectRef) -> Self {
        object.to_value()
    }
}
