//! OverloadResolver: group same-named methods under canonical signatures.

use std::collections::HashSet;

use canon_config::AnalysisConfig;
use canon_model::{
    MemberId, MemberKind, OverloadEntry, OverloadGroup, PropertyModel, RawMember, Signature,
    CONSTRUCTOR_NAME,
};
use canon_types::{canonicalize, is_subtype};
use indexmap::IndexMap;

use crate::collect::Snapshot;

const TARGET: &str = "canon.analysis";

/// Declared methods and constructors of one class, grouped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overloads {
    /// One group per method name, in order of first declaration.
    pub groups: Vec<OverloadGroup>,
    pub constructors: OverloadGroup,
}

/// The canonical overload key of `member`: its name and canonicalized
/// parameter types.
pub fn signature_of(snapshot: &Snapshot, member: &RawMember) -> Signature {
    let scope = snapshot.member_scope(member);
    Signature::new(
        member.name.clone(),
        member
            .params
            .iter()
            .map(|param| canonicalize(param, &scope))
            .collect(),
    )
}

fn entry_for(snapshot: &Snapshot, member: &RawMember) -> OverloadEntry {
    OverloadEntry {
        signature: signature_of(snapshot, member),
        member: member.id,
        declared_in: member.owner,
        overrides: None,
        bridges: Vec::new(),
    }
}

/// Group the root class's declared methods and constructors.
///
/// With `fold_bridge_methods`, a bridge is attached to the non-bridge method
/// of the same name and arity instead of getting an entry of its own. When
/// several qualify, the one whose parameters are subtypes of the bridge's
/// wins. A bridge with nothing to attach to stays a normal entry at its
/// declaration position.
pub fn resolve_overloads(snapshot: &Snapshot, config: &AnalysisConfig) -> Overloads {
    let owner = snapshot.root();
    let mut groups: IndexMap<String, OverloadGroup> = IndexMap::new();
    let mut constructors = OverloadGroup::new(CONSTRUCTOR_NAME, owner);
    let mut bridges = HashSet::new();

    for member in snapshot.members_of(owner) {
        match member.kind {
            MemberKind::Field => {}
            MemberKind::Constructor => constructors.entries.push(entry_for(snapshot, member)),
            MemberKind::Method => {
                if config.fold_bridge_methods && member.modifiers.is_bridge {
                    bridges.insert(member.id);
                }
                groups
                    .entry(member.name.clone())
                    .or_insert_with(|| OverloadGroup::new(member.name.clone(), owner))
                    .entries
                    .push(entry_for(snapshot, member));
            }
        }
    }

    let mut groups: Vec<OverloadGroup> = groups.into_values().collect();
    for group in &mut groups {
        if !bridges.is_empty() {
            fold_bridges(snapshot, group, &bridges);
        }
        detect_ambiguity(group);
    }
    detect_ambiguity(&mut constructors);

    Overloads {
        groups,
        constructors,
    }
}

fn fold_bridges(snapshot: &Snapshot, group: &mut OverloadGroup, bridges: &HashSet<MemberId>) {
    let (bridge_entries, mut entries): (Vec<_>, Vec<_>) = std::mem::take(&mut group.entries)
        .into_iter()
        .enumerate()
        .partition(|(_, entry)| bridges.contains(&entry.member));

    let mut orphans = Vec::new();
    for (position, bridge) in bridge_entries {
        match bridge_target(snapshot, &entries, &bridge) {
            Some(index) => entries[index].1.bridges.push(bridge.member),
            None => {
                tracing::debug!(
                    target: TARGET,
                    member = %bridge.member,
                    name = %group.name,
                    "bridge method has no target; keeping it as an overload"
                );
                orphans.push((position, bridge));
            }
        }
    }

    entries.extend(orphans);
    entries.sort_by_key(|(position, _)| *position);
    group.entries = entries.into_iter().map(|(_, entry)| entry).collect();
}

fn bridge_target(
    snapshot: &Snapshot,
    candidates: &[(usize, OverloadEntry)],
    bridge: &OverloadEntry,
) -> Option<usize> {
    let arity = bridge.signature.params.len();
    let same_arity = move || {
        candidates
            .iter()
            .enumerate()
            .filter(move |(_, (_, entry))| entry.signature.params.len() == arity)
    };
    same_arity()
        .find(|(_, (_, entry))| {
            entry
                .signature
                .params
                .iter()
                .zip(&bridge.signature.params)
                .all(|(param, erased)| is_subtype(snapshot, param, erased))
        })
        .or_else(|| same_arity().next())
        .map(|(index, _)| index)
}

/// Set `group.ambiguous` and return every set of members that share a
/// signature.
pub fn detect_ambiguity(group: &mut OverloadGroup) -> Vec<Vec<MemberId>> {
    let mut by_signature: IndexMap<&Signature, Vec<MemberId>> = IndexMap::new();
    for entry in &group.entries {
        by_signature
            .entry(&entry.signature)
            .or_default()
            .push(entry.member);
    }
    let collisions: Vec<Vec<MemberId>> = by_signature
        .into_values()
        .filter(|members| members.len() > 1)
        .collect();
    group.ambiguous = !collisions.is_empty();
    collisions
}

/// Tag each group whose name is a property's getter or setter.
pub fn link_properties(
    snapshot: &Snapshot,
    groups: &mut [OverloadGroup],
    properties: &[PropertyModel],
) {
    for property in properties {
        for accessor in property.getter.iter().chain(&property.setter) {
            let Some(member) = snapshot.member(*accessor) else {
                continue;
            };
            if let Some(group) = groups.iter_mut().find(|group| group.name == member.name) {
                group.property.get_or_insert_with(|| property.name.clone());
            }
        }
    }
}
