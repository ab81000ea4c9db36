//! Reference edges of the heap graph

use super::{ObjectId, Tag};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a directed reference as reported by the host heap enumerator.
///
/// Kinds are observed and logged; the ownership check never branches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Reference from an object to its class.
    Class,
    /// Instance field.
    Field,
    /// Array element.
    ArrayElement,
    /// Class to its class loader.
    ClassLoader,
    /// Class to its signers array.
    Signers,
    /// Class to its protection domain.
    ProtectionDomain,
    /// Class to an implemented interface.
    Interface,
    /// Static field of a class.
    StaticField,
    /// Resolved entry in a constant pool.
    ConstantPool,
    /// Class to its superclass.
    Superclass,
    /// Global native reference.
    JniGlobal,
    /// System class root.
    SystemClass,
    /// Monitor held by a thread.
    Monitor,
    /// Local variable on a thread stack.
    StackLocal,
    /// Local native reference.
    JniLocal,
    /// Thread object.
    Thread,
    /// Any other kind of reference.
    Other,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::Class => "class",
            ReferenceKind::Field => "field",
            ReferenceKind::ArrayElement => "array_element",
            ReferenceKind::ClassLoader => "class_loader",
            ReferenceKind::Signers => "signers",
            ReferenceKind::ProtectionDomain => "protection_domain",
            ReferenceKind::Interface => "interface",
            ReferenceKind::StaticField => "static_field",
            ReferenceKind::ConstantPool => "constant_pool",
            ReferenceKind::Superclass => "superclass",
            ReferenceKind::JniGlobal => "jni_global",
            ReferenceKind::SystemClass => "system_class",
            ReferenceKind::Monitor => "monitor",
            ReferenceKind::StackLocal => "stack_local",
            ReferenceKind::JniLocal => "jni_local",
            ReferenceKind::Thread => "thread",
            ReferenceKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// One outgoing reference of a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Edge kind.
    pub kind: ReferenceKind,
    /// Object the edge points to.
    pub referent: ObjectId,
}

impl Reference {
    /// Create a reference of the given kind.
    pub fn new(kind: ReferenceKind, referent: ObjectId) -> Self {
        Self { kind, referent }
    }

    /// Create an instance field reference.
    pub fn field(referent: ObjectId) -> Self {
        Self::new(ReferenceKind::Field, referent)
    }
}

/// What a traversal visitor learns about the object it is visiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapVisit {
    /// Object being visited.
    pub object: ObjectId,
    /// Referrer through which the object was first discovered. `None` for the root.
    pub referrer: Option<ObjectId>,
    /// Tag the referrer carried when the edge was followed. `None` for the root.
    pub referrer_tag: Option<Tag>,
    /// Kind of the discovering edge. `None` for the root.
    pub kind: Option<ReferenceKind>,
    /// Number of edges between the root and this object along the discovery path.
    pub depth: usize,
}

impl HeapVisit {
    /// Visit record for a traversal root.
    pub fn root(object: ObjectId) -> Self {
        Self {
            object,
            referrer: None,
            referrer_tag: None,
            kind: None,
            depth: 0,
        }
    }

    /// Returns `true` if this is the root of the traversal.
    pub fn is_root(&self) -> bool {
        self.referrer.is_none()
    }
}
