//! ConflictResolver: merge the three member passes into one
//! [`CanonicalModel`] and report what does not fit together.
//!
//! Diagnostics are emitted in precedence order (accessor/field, shadowed
//! override, ambiguous overload, duplicate name), each class in declaration
//! order. Nothing is renamed or dropped to make a conflict go away.

use canon_model::{
    CanonicalModel, ClassId, ConflictDiagnostic, ConflictKind, MemberId, MemberKind,
    OverloadEntry, OverloadGroup, PropertyModel, RawMember, CONSTRUCTOR_NAME,
};
use indexmap::IndexMap;

use crate::collect::Snapshot;
use crate::overloads::{detect_ambiguity, link_properties, Overloads};
use crate::type_graph::{Override, TypeGraph};

/// Join point of the pipeline.
pub fn resolve_conflicts(
    snapshot: &Snapshot,
    properties: Vec<PropertyModel>,
    overloads: Overloads,
    graph: TypeGraph,
) -> CanonicalModel {
    let root = snapshot.root();
    let Overloads {
        mut groups,
        mut constructors,
    } = overloads;
    let TypeGraph {
        tree,
        inherited,
        overrides,
    } = graph;

    for found in &overrides {
        let entry = groups
            .iter_mut()
            .flat_map(|group| group.entries.iter_mut())
            .find(|entry| entry.member == found.member);
        if let Some(entry) = entry {
            entry.overrides = Some(found.overridden);
        }
    }

    for method in inherited {
        let entry = OverloadEntry {
            signature: method.signature,
            member: method.member,
            declared_in: method.declared_in,
            overrides: method.overrides,
            bridges: Vec::new(),
        };
        match groups.iter_mut().find(|group| group.name == entry.signature.name) {
            Some(group) => group.entries.push(entry),
            None => {
                let mut group = OverloadGroup::new(entry.signature.name.clone(), root);
                group.entries.push(entry);
                groups.push(group);
            }
        }
    }

    let mut ambiguous = Vec::new();
    for group in groups.iter_mut().chain(std::iter::once(&mut constructors)) {
        for members in detect_ambiguity(group) {
            ambiguous.push((group.name.clone(), members));
        }
    }

    link_properties(snapshot, &mut groups, &properties);

    let fields = snapshot
        .members_of(root)
        .filter(|member| member.is_field())
        .map(|member| member.id)
        .collect();

    let mut diagnostics = accessor_field_conflicts(snapshot, &properties);
    diagnostics.extend(shadowed_overrides(snapshot, &overrides));
    diagnostics.extend(ambiguous_overloads(snapshot, ambiguous));
    diagnostics.extend(duplicate_names(snapshot));

    CanonicalModel {
        class: root,
        properties,
        fields,
        constructors,
        overload_groups: groups,
        type_tree: tree,
        diagnostics,
    }
}

fn name_of(snapshot: &Snapshot, member: MemberId) -> String {
    snapshot
        .member(member)
        .map_or_else(|| member.to_string(), |m| m.name.clone())
}

fn class_name(snapshot: &Snapshot, class: ClassId) -> String {
    snapshot
        .class(class)
        .map_or_else(|| class.to_string(), |c| c.binary_name.clone())
}

fn accessor_field_conflicts(
    snapshot: &Snapshot,
    properties: &[PropertyModel],
) -> Vec<ConflictDiagnostic> {
    let root = snapshot.root();
    properties
        .iter()
        .filter(|property| property.explicit_field)
        .map(|property| {
            let field = snapshot
                .members_of(root)
                .find(|member| member.is_field() && member.name == property.name)
                .map(|member| member.id);
            let accessors: Vec<MemberId> =
                property.getter.into_iter().chain(property.setter).collect();
            let accessor_names: Vec<String> = accessors
                .iter()
                .map(|id| name_of(snapshot, *id))
                .collect();
            let flavor = if property.synthesized {
                "synthesized"
            } else {
                "non-synthesized"
            };
            ConflictDiagnostic::new(
                ConflictKind::ConflictingAccessorField,
                format!(
                    "field `{name}` coexists with {flavor} property `{name}` ({})",
                    accessor_names.join(", "),
                    name = property.name,
                ),
            )
            .with_members(field.into_iter().chain(accessors))
            .with_property(property.name.clone())
        })
        .collect()
}

fn shadowed_overrides(snapshot: &Snapshot, overrides: &[Override]) -> Vec<ConflictDiagnostic> {
    let owner = class_name(snapshot, snapshot.root());
    overrides
        .iter()
        .map(|found| {
            let verb = if found.hides { "hides" } else { "overrides" };
            ConflictDiagnostic::new(
                ConflictKind::ShadowedOverride,
                format!(
                    "`{}` on {owner} {verb} the member declared on {}",
                    found.signature,
                    class_name(snapshot, found.overridden_in),
                ),
            )
            .with_members([found.member, found.overridden])
            .with_group(found.signature.name.clone())
        })
        .collect()
}

fn ambiguous_overloads(
    snapshot: &Snapshot,
    ambiguous: Vec<(String, Vec<MemberId>)>,
) -> Vec<ConflictDiagnostic> {
    ambiguous
        .into_iter()
        .map(|(group, members)| {
            let descriptor = members
                .first()
                .and_then(|id| snapshot.member(*id))
                .map(|member| crate::overloads::signature_of(snapshot, member).descriptor())
                .unwrap_or_default();
            let label = if group == CONSTRUCTOR_NAME {
                "constructors"
            } else {
                "members"
            };
            ConflictDiagnostic::new(
                ConflictKind::AmbiguousOverload,
                format!(
                    "{} {label} of `{group}` share the signature {descriptor}",
                    members.len()
                ),
            )
            .with_members(members)
            .with_group(group)
        })
        .collect()
}

#[derive(Default)]
struct NameUse {
    types: Vec<ClassId>,
    fields: Vec<MemberId>,
    methods: Vec<MemberId>,
}

fn duplicate_names(snapshot: &Snapshot) -> Vec<ConflictDiagnostic> {
    let root = snapshot.root();
    let mut uses: IndexMap<&str, NameUse> = IndexMap::new();

    for member in snapshot.members_of(root) {
        let slot = uses.entry(member.name.as_str()).or_default();
        match member.kind {
            MemberKind::Field => slot.fields.push(member.id),
            MemberKind::Method if !is_bridge(member) => slot.methods.push(member.id),
            MemberKind::Method | MemberKind::Constructor => {}
        }
    }
    for class in snapshot.enclosed(root).iter().filter_map(|id| snapshot.class(*id)) {
        if class.is_anonymous() || class.is_local() {
            continue;
        }
        uses.entry(class.display_name())
            .or_default()
            .types
            .push(class.id);
    }

    uses.into_iter()
        .filter_map(|(name, used)| {
            let mut labels = Vec::new();
            if !used.types.is_empty() {
                labels.push("a nested type");
            }
            if !used.fields.is_empty() {
                labels.push("a field");
            }
            if !used.methods.is_empty() {
                labels.push("a method");
            }
            if labels.len() < 2 {
                return None;
            }
            Some(
                ConflictDiagnostic::new(
                    ConflictKind::DuplicateMemberName,
                    format!("`{name}` is declared as {}", labels.join(" and ")),
                )
                .with_members(used.fields.into_iter().chain(used.methods))
                .with_classes(used.types),
            )
        })
        .collect()
}

fn is_bridge(member: &RawMember) -> bool {
    member.modifiers.is_bridge
}
