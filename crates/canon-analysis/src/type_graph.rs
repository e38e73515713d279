//! TypeGraphWalker: the nesting tree below the analysed class, and which
//! ancestor methods it inherits or overrides.

use canon_config::AnalysisConfig;
use canon_model::{
    ClassDescriptor, ClassId, MemberId, RawMember, Signature, TypeNode, TypeNodeKind,
    CONSTRUCTOR_NAME,
};
use canon_types::{erase, is_subtype, TypeRef};
use indexmap::IndexMap;

use crate::collect::Snapshot;
use crate::overloads::signature_of;

/// An ancestor method visible on the analysed class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritedMethod {
    pub member: MemberId,
    pub declared_in: ClassId,
    pub signature: Signature,
    /// A farther ancestor's member with the same signature.
    pub overrides: Option<MemberId>,
}

/// A method of the analysed class that supersedes an ancestor member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub member: MemberId,
    pub overridden: MemberId,
    pub overridden_in: ClassId,
    pub signature: Signature,
    /// Static methods hide rather than override.
    pub hides: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeGraph {
    pub tree: TypeNode,
    pub inherited: Vec<InheritedMethod>,
    /// In declaration order of the overriding member.
    pub overrides: Vec<Override>,
}

pub fn walk(snapshot: &Snapshot, config: &AnalysisConfig) -> TypeGraph {
    let (inherited, overrides) = resolve_inheritance(snapshot, config);
    TypeGraph {
        tree: build_tree(snapshot),
        inherited,
        overrides,
    }
}

pub fn node_kind(class: &ClassDescriptor) -> TypeNodeKind {
    if class.is_anonymous() {
        TypeNodeKind::Anonymous
    } else if class.declaring_member.is_some() {
        TypeNodeKind::Local
    } else if !class.type_params.is_empty() {
        TypeNodeKind::GenericParameterized
    } else if class.enclosing.is_none() {
        TypeNodeKind::TopLevel
    } else if class.modifiers.is_static || !class.has_outer_instance {
        TypeNodeKind::StaticNested
    } else {
        TypeNodeKind::Inner
    }
}

/// Path segment of `class` under its enclosing type.
///
/// Local types read `<member>$<Name>`, anonymous ones `<member>$<n>` with `n`
/// counting the anonymous types declared by the same member from 1.
pub fn path_segment(snapshot: &Snapshot, class: &ClassDescriptor) -> String {
    let declaring_member = || {
        class
            .declaring_member
            .and_then(|id| snapshot.member(id))
            .map_or(CONSTRUCTOR_NAME, |member| member.name.as_str())
    };
    match &class.name {
        Some(name) if class.declaring_member.is_some() => {
            format!("{}${name}", declaring_member())
        }
        Some(name) => name.clone(),
        None => format!("{}${}", declaring_member(), anonymous_index(snapshot, class)),
    }
}

fn anonymous_index(snapshot: &Snapshot, class: &ClassDescriptor) -> usize {
    let Some(enclosing) = class.enclosing else {
        return 1;
    };
    snapshot
        .enclosed(enclosing)
        .iter()
        .filter_map(|id| snapshot.class(*id))
        .filter(|sibling| {
            sibling.is_anonymous() && sibling.declaring_member == class.declaring_member
        })
        .position(|sibling| sibling.id == class.id)
        .map_or(1, |idx| idx + 1)
}

fn build_tree(snapshot: &Snapshot) -> TypeNode {
    let parent_path: Vec<String> = snapshot
        .enclosing_chain()
        .iter()
        .filter_map(|id| snapshot.class(*id))
        .map(|class| path_segment(snapshot, class))
        .collect();
    build_node(snapshot, snapshot.root_class(), &parent_path)
}

fn build_node(snapshot: &Snapshot, class: &ClassDescriptor, parent_path: &[String]) -> TypeNode {
    let mut path = parent_path.to_vec();
    path.push(path_segment(snapshot, class));

    let children = snapshot
        .enclosed(class.id)
        .iter()
        .filter_map(|id| snapshot.class(*id))
        .map(|child| build_node(snapshot, child, &path))
        .collect();

    TypeNode {
        class: class.id,
        kind: node_kind(class),
        binary_name: class.binary_name.clone(),
        path,
        type_params: class.type_params.clone(),
        children,
    }
}

struct Declared<'a> {
    member: &'a RawMember,
    signature: Signature,
    return_type: TypeRef,
}

fn return_type_of(snapshot: &Snapshot, member: &RawMember) -> TypeRef {
    erase(&member.ty, &snapshot.member_scope(member))
}

/// Walk the ancestors nearest first. A root method claims every ancestor
/// method with its signature and a compatible return type; the first claim is
/// its override. Unclaimed ancestor methods are inherited, the nearest
/// declaration of each signature staying live. Static interface methods are
/// neither.
fn resolve_inheritance(
    snapshot: &Snapshot,
    config: &AnalysisConfig,
) -> (Vec<InheritedMethod>, Vec<Override>) {
    let skip_bridge = |member: &RawMember| config.fold_bridge_methods && member.modifiers.is_bridge;

    let declared: Vec<Declared<'_>> = snapshot
        .members_of(snapshot.root())
        .filter(|member| member.is_method() && !skip_bridge(member))
        .map(|member| Declared {
            member,
            signature: signature_of(snapshot, member),
            return_type: return_type_of(snapshot, member),
        })
        .collect();

    let mut claimed: Vec<Option<Override>> = vec![None; declared.len()];
    let mut inherited: IndexMap<Signature, InheritedMethod> = IndexMap::new();

    for &ancestor in snapshot.ancestors() {
        let interface = snapshot
            .class(ancestor)
            .is_some_and(|class| class.is_interface);
        for member in snapshot.members_of(ancestor) {
            if !member.is_method() || member.is_private() || skip_bridge(member) {
                continue;
            }
            // Static interface methods are not members of implementing types.
            if interface && member.modifiers.is_static {
                continue;
            }
            let signature = signature_of(snapshot, member);
            let return_type = return_type_of(snapshot, member);

            let mut shadowed = false;
            for (own, claim) in declared.iter().zip(claimed.iter_mut()) {
                if own.signature != signature
                    || !is_subtype(snapshot, &own.return_type, &return_type)
                {
                    continue;
                }
                shadowed = true;
                claim.get_or_insert_with(|| Override {
                    member: own.member.id,
                    overridden: member.id,
                    overridden_in: ancestor,
                    signature: signature.clone(),
                    hides: own.member.modifiers.is_static,
                });
            }
            if shadowed {
                continue;
            }

            match inherited.get_mut(&signature) {
                Some(live) => {
                    live.overrides.get_or_insert(member.id);
                }
                None => {
                    inherited.insert(
                        signature.clone(),
                        InheritedMethod {
                            member: member.id,
                            declared_in: ancestor,
                            signature,
                            overrides: None,
                        },
                    );
                }
            }
        }
    }

    (
        inherited.into_values().collect(),
        claimed.into_iter().flatten().collect(),
    )
}
