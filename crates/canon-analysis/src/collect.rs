//! MemberCollector: load everything one class's analysis needs from the
//! supplier into an immutable [`Snapshot`].
//!
//! The supplier is queried once per class up front; the later passes only
//! ever read the snapshot.

use std::collections::{HashMap, HashSet, VecDeque};

use canon_model::{ClassDescriptor, ClassId, MemberId, MetadataSupplier, RawMember};
use canon_types::{Hierarchy, TypeScope};
use indexmap::IndexMap;

use crate::error::StructuralError;

const TARGET: &str = "canon.collect";

/// Read-only view of a class, its ancestors, enclosing types and nested types.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: ClassId,
    classes: IndexMap<ClassId, ClassDescriptor>,
    members: HashMap<MemberId, RawMember>,
    by_name: HashMap<String, ClassId>,
    /// Supertypes of the root, nearest first.
    ancestors: Vec<ClassId>,
    /// Enclosing types of the root, outermost first.
    enclosing_chain: Vec<ClassId>,
    enclosed: HashMap<ClassId, Vec<ClassId>>,
}

impl Snapshot {
    pub fn root(&self) -> ClassId {
        self.root
    }

    pub fn root_class(&self) -> &ClassDescriptor {
        &self.classes[&self.root]
    }

    pub fn class(&self, id: ClassId) -> Option<&ClassDescriptor> {
        self.classes.get(&id)
    }

    pub fn class_by_name(&self, binary_name: &str) -> Option<&ClassDescriptor> {
        self.by_name
            .get(binary_name)
            .and_then(|id| self.classes.get(id))
    }

    pub fn member(&self, id: MemberId) -> Option<&RawMember> {
        self.members.get(&id)
    }

    /// Members declared directly on `class`, in declaration order.
    pub fn members_of(&self, class: ClassId) -> impl Iterator<Item = &RawMember> + '_ {
        self.classes
            .get(&class)
            .into_iter()
            .flat_map(|desc| desc.members.iter())
            .filter_map(|id| self.members.get(id))
    }

    pub fn ancestors(&self) -> &[ClassId] {
        &self.ancestors
    }

    pub fn enclosing_chain(&self) -> &[ClassId] {
        &self.enclosing_chain
    }

    /// Types directly enclosed by `class`, in declaration order.
    pub fn enclosed(&self, class: ClassId) -> &[ClassId] {
        self.enclosed.get(&class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Type parameters visible inside `class`: those of enclosing types it
    /// holds an instance of, then its own.
    pub fn scope_for(&self, class: ClassId) -> TypeScope<'_> {
        let mut frames = Vec::new();
        let mut current = self.classes.get(&class);
        while let Some(desc) = current {
            frames.push(desc.type_params.as_slice());
            current = if desc.has_outer_instance {
                desc.enclosing.and_then(|id| self.classes.get(&id))
            } else {
                None
            };
        }

        let mut scope = TypeScope::new();
        for frame in frames.into_iter().rev() {
            scope.push(frame);
        }
        scope
    }

    /// [`Snapshot::scope_for`] the member's owner plus the member's own type
    /// parameters.
    pub fn member_scope<'a>(&'a self, member: &'a RawMember) -> TypeScope<'a> {
        self.scope_for(member.owner)
            .with_frame(&member.type_params)
    }
}

impl Hierarchy for Snapshot {
    fn direct_supertypes(&self, binary_name: &str) -> Vec<String> {
        let Some(class) = self.class_by_name(binary_name) else {
            return Vec::new();
        };
        class
            .superclass
            .iter()
            .chain(&class.interfaces)
            .filter_map(|id| self.classes.get(id))
            .map(|desc| desc.binary_name.clone())
            .collect()
    }
}

/// Collect the snapshot for `class`.
///
/// Ancestors or nested types the supplier does not know are skipped; a cycle
/// in either graph is a [`StructuralError`].
pub fn collect<S>(supplier: &S, class: ClassId) -> Result<Snapshot, StructuralError>
where
    S: MetadataSupplier + ?Sized,
{
    let mut collector = Collector {
        supplier,
        classes: IndexMap::new(),
        members: HashMap::new(),
        by_name: HashMap::new(),
    };

    if collector.load(class).is_none() {
        return Err(StructuralError::UnknownClass(class));
    }

    let enclosing_chain = collector.enclosing_chain(class)?;

    let mut done = HashSet::new();
    collector.check_ancestors(class, class, &mut Vec::new(), &mut done)?;
    let ancestors = collector.linearize_ancestors(class);

    let mut enclosed = HashMap::new();
    collector.load_enclosed(class, class, &mut vec![class], &mut enclosed)?;
    // Siblings of the root are needed to number anonymous classes.
    if let Some(&parent) = enclosing_chain.last() {
        let siblings = collector.known_children(parent);
        enclosed.insert(parent, siblings);
    }

    for id in std::iter::once(class).chain(ancestors.iter().copied()) {
        collector.load_members(id);
    }
    collector.load_declaring_members();
    collector.load_return_types(class);

    let snapshot = Snapshot {
        root: class,
        classes: collector.classes,
        members: collector.members,
        by_name: collector.by_name,
        ancestors,
        enclosing_chain,
        enclosed,
    };

    tracing::debug!(
        target: TARGET,
        class = %class,
        classes = snapshot.classes.len(),
        members = snapshot.members.len(),
        ancestors = snapshot.ancestors.len(),
        "collected snapshot"
    );

    Ok(snapshot)
}

struct Collector<'s, S: ?Sized> {
    supplier: &'s S,
    classes: IndexMap<ClassId, ClassDescriptor>,
    members: HashMap<MemberId, RawMember>,
    by_name: HashMap<String, ClassId>,
}

impl<S> Collector<'_, S>
where
    S: MetadataSupplier + ?Sized,
{
    fn load(&mut self, id: ClassId) -> Option<&ClassDescriptor> {
        if !self.classes.contains_key(&id) {
            let Some(desc) = self.supplier.class(id) else {
                tracing::debug!(target: TARGET, class = %id, "class unknown to the supplier");
                return None;
            };
            self.by_name.insert(desc.binary_name.clone(), id);
            self.classes.insert(id, desc);
        }
        self.classes.get(&id)
    }

    fn enclosing_chain(&mut self, class: ClassId) -> Result<Vec<ClassId>, StructuralError> {
        let mut seen = vec![class];
        let mut chain = Vec::new();
        let mut current = self.classes.get(&class).and_then(|desc| desc.enclosing);
        while let Some(id) = current {
            if seen.contains(&id) {
                seen.push(id);
                return Err(StructuralError::EnclosingCycle { class, path: seen });
            }
            seen.push(id);
            match self.load(id) {
                Some(desc) => {
                    current = desc.enclosing;
                    chain.push(id);
                }
                None => break,
            }
        }
        chain.reverse();
        Ok(chain)
    }

    /// Depth-first walk over supertype edges, failing on the first back edge.
    fn check_ancestors(
        &mut self,
        root: ClassId,
        id: ClassId,
        path: &mut Vec<ClassId>,
        done: &mut HashSet<ClassId>,
    ) -> Result<(), StructuralError> {
        let Some(desc) = self.load(id) else {
            return Ok(());
        };
        let supertypes: Vec<ClassId> = desc
            .superclass
            .iter()
            .chain(&desc.interfaces)
            .copied()
            .collect();

        path.push(id);
        for supertype in supertypes {
            if path.contains(&supertype) {
                let mut cycle = path.clone();
                cycle.push(supertype);
                return Err(StructuralError::InheritanceCycle {
                    class: root,
                    path: cycle,
                });
            }
            if !done.contains(&supertype) {
                self.check_ancestors(root, supertype, path, done)?;
            }
        }
        path.pop();
        done.insert(id);
        Ok(())
    }

    /// Breadth-first: superclass before interfaces, each ancestor once.
    fn linearize_ancestors(&self, class: ClassId) -> Vec<ClassId> {
        let mut order = Vec::new();
        let mut seen = HashSet::from([class]);
        let mut queue = VecDeque::from([class]);
        while let Some(id) = queue.pop_front() {
            let Some(desc) = self.classes.get(&id) else {
                continue;
            };
            for &supertype in desc.superclass.iter().chain(&desc.interfaces) {
                if self.classes.contains_key(&supertype) && seen.insert(supertype) {
                    order.push(supertype);
                    queue.push_back(supertype);
                }
            }
        }
        order
    }

    fn known_children(&mut self, id: ClassId) -> Vec<ClassId> {
        self.supplier
            .enclosed_classes(id)
            .into_iter()
            .filter(|child| self.load(*child).is_some())
            .collect()
    }

    fn load_enclosed(
        &mut self,
        root: ClassId,
        id: ClassId,
        path: &mut Vec<ClassId>,
        enclosed: &mut HashMap<ClassId, Vec<ClassId>>,
    ) -> Result<(), StructuralError> {
        let children = self.known_children(id);
        for &child in &children {
            if path.contains(&child) {
                let mut cycle = path.clone();
                cycle.push(child);
                return Err(StructuralError::EnclosingCycle {
                    class: root,
                    path: cycle,
                });
            }
            path.push(child);
            self.load_enclosed(root, child, path, enclosed)?;
            path.pop();
        }
        enclosed.insert(id, children);
        Ok(())
    }

    fn load_members(&mut self, class: ClassId) {
        let Some(ids) = self.classes.get(&class).map(|desc| desc.members.clone()) else {
            return;
        };
        for id in ids {
            if self.members.contains_key(&id) {
                continue;
            }
            match self.supplier.member(id) {
                Some(member) if member.owner == class => {
                    self.members.insert(id, member);
                }
                Some(member) => tracing::debug!(
                    target: TARGET,
                    member = %id,
                    listed_on = %class,
                    owner = %member.owner,
                    "skipping member listed on a class that does not own it"
                ),
                None => tracing::debug!(
                    target: TARGET,
                    member = %id,
                    class = %class,
                    "member unknown to the supplier"
                ),
            }
        }
    }

    /// Local and anonymous types are named after the member declaring them.
    fn load_declaring_members(&mut self) {
        let wanted: Vec<MemberId> = self
            .classes
            .values()
            .filter_map(|desc| desc.declaring_member)
            .filter(|id| !self.members.contains_key(id))
            .collect();
        for id in wanted {
            if let Some(member) = self.supplier.member(id) {
                self.members.insert(id, member);
            }
        }
    }

    /// Covariance checks compare the root's return types against ancestor
    /// return types, so the supertype chains of those classes are needed too.
    fn load_return_types(&mut self, class: ClassId) {
        let names: Vec<String> = self
            .classes
            .get(&class)
            .into_iter()
            .flat_map(|desc| desc.members.iter())
            .filter_map(|id| self.members.get(id))
            .filter(|member| member.is_method())
            .filter_map(|member| element_class_name(&member.ty))
            .collect();

        let mut queue: VecDeque<ClassId> = VecDeque::new();
        for name in names {
            if self.by_name.contains_key(&name) {
                continue;
            }
            if let Some(id) = self.supplier.class_by_name(&name) {
                queue.push_back(id);
            }
        }

        let mut seen = HashSet::new();
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            let Some(desc) = self.load(id) else {
                continue;
            };
            queue.extend(desc.superclass.iter().chain(&desc.interfaces).copied());
        }
    }
}

fn element_class_name(ty: &canon_types::TypeRef) -> Option<String> {
    match ty {
        canon_types::TypeRef::Array(element) => element_class_name(element),
        other => other.class_name().map(str::to_string),
    }
}
