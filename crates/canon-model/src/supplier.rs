use std::collections::HashMap;

use indexmap::IndexMap;

use crate::class::ClassDescriptor;
use crate::ids::{ClassId, MemberId};
use crate::member::RawMember;

/// Boundary to the external metadata supplier.
///
/// Implementations answer from a snapshot; the analysis queries each class at
/// most once per run and never expects answers to change mid-run.
pub trait MetadataSupplier {
    fn class(&self, id: ClassId) -> Option<ClassDescriptor>;

    fn member(&self, id: MemberId) -> Option<RawMember>;

    /// Types whose `enclosing` edge points at `id`, in declaration order.
    fn enclosed_classes(&self, id: ClassId) -> Vec<ClassId>;

    /// Look a class up by binary name. Used to resolve return types that are
    /// not part of the analysed class's own ancestry.
    fn class_by_name(&self, _binary_name: &str) -> Option<ClassId> {
        None
    }
}

/// In-memory supplier, for tests and for callers that already hold all
/// metadata.
#[derive(Debug, Clone, Default)]
pub struct MemorySupplier {
    classes: IndexMap<ClassId, ClassDescriptor>,
    members: IndexMap<MemberId, RawMember>,
    by_name: HashMap<String, ClassId>,
}

impl MemorySupplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. Re-adding an id replaces the previous descriptor but
    /// keeps its member list.
    pub fn add_class(&mut self, mut class: ClassDescriptor) -> ClassId {
        let id = class.id;
        if let Some(existing) = self.classes.get(&id) {
            if class.members.is_empty() {
                class.members = existing.members.clone();
            }
        }
        self.by_name.insert(class.binary_name.clone(), id);
        self.classes.insert(id, class);
        id
    }

    /// Register a member and append it to its owner's declaration list.
    pub fn add_member(&mut self, member: RawMember) -> MemberId {
        let id = member.id;
        if let Some(owner) = self.classes.get_mut(&member.owner) {
            if !owner.members.contains(&id) {
                owner.members.push(id);
            }
        }
        self.members.insert(id, member);
        id
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.keys().copied()
    }

    /// First member of `class` named `name` with `arity` parameters.
    pub fn find_member(&self, class: ClassId, name: &str, arity: usize) -> Option<MemberId> {
        let desc = self.classes.get(&class)?;
        desc.members.iter().copied().find(|id| {
            self.members
                .get(id)
                .is_some_and(|m| m.name == name && m.params.len() == arity)
        })
    }
}

impl MetadataSupplier for MemorySupplier {
    fn class(&self, id: ClassId) -> Option<ClassDescriptor> {
        self.classes.get(&id).cloned()
    }

    fn member(&self, id: MemberId) -> Option<RawMember> {
        self.members.get(&id).cloned()
    }

    fn enclosed_classes(&self, id: ClassId) -> Vec<ClassId> {
        self.classes
            .values()
            .filter(|class| class.enclosing == Some(id))
            .map(|class| class.id)
            .collect()
    }

    fn class_by_name(&self, binary_name: &str) -> Option<ClassId> {
        self.by_name.get(binary_name).copied()
    }
}
