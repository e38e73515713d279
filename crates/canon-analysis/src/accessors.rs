//! AccessorSynthesizer: pair `getX`/`isX`/`setX` methods into properties.

use canon_config::AnalysisConfig;
use canon_model::{ClassId, PropertyModel, RawMember};
use canon_types::{erase, TypeRef};
use indexmap::IndexMap;

use crate::collect::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetterPrefix {
    Get,
    Is,
}

/// How a member reads under the accessor/mutator naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorShape {
    Getter {
        property: String,
        prefix: GetterPrefix,
    },
    Setter {
        property: String,
    },
    Plain,
}

/// Classify one member. Total and side-effect free.
///
/// - `getX()` returning non-void is a getter of `x`.
/// - `isX()` returning `boolean` is a getter of `x` (`java.lang.Boolean`
///   too with `boxed_boolean_is_getter`).
/// - `setX(v)` returning void is a setter of `x`.
///
/// The character after the prefix must not be lower case, so `getterB()` is
/// plain. Fields, constructors, and bridges are always plain, and static
/// methods unless `static_accessors` is set.
pub fn classify(member: &RawMember, config: &AnalysisConfig) -> AccessorShape {
    if !member.is_method()
        || member.modifiers.is_bridge
        || (member.modifiers.is_static && !config.static_accessors)
    {
        return AccessorShape::Plain;
    }

    match member.params.len() {
        0 => {
            if let Some(property) = property_name(&member.name, "is") {
                let boolean = member.ty.is_primitive_boolean()
                    || (config.boxed_boolean_is_getter && member.ty.is_boxed_boolean());
                if boolean {
                    return AccessorShape::Getter {
                        property,
                        prefix: GetterPrefix::Is,
                    };
                }
            }
            match property_name(&member.name, "get") {
                Some(property) if !member.ty.is_void() => AccessorShape::Getter {
                    property,
                    prefix: GetterPrefix::Get,
                },
                _ => AccessorShape::Plain,
            }
        }
        1 => match property_name(&member.name, "set") {
            Some(property) if member.ty.is_void() => AccessorShape::Setter { property },
            _ => AccessorShape::Plain,
        },
        _ => AccessorShape::Plain,
    }
}

/// `getSyntheticB` -> `syntheticB`, `getURL` -> `uRL`.
fn property_name(method: &str, prefix: &str) -> Option<String> {
    let rest = method.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    if first.is_lowercase() {
        return None;
    }
    let mut name: String = first.to_lowercase().collect();
    name.push_str(chars.as_str());
    Some(name)
}

#[derive(Default)]
struct Candidates<'a> {
    getters: Vec<(&'a RawMember, GetterPrefix)>,
    setters: Vec<&'a RawMember>,
}

/// Properties of the snapshot's root class, ordered by the first accessor
/// that mentions each name.
pub fn synthesize_properties(snapshot: &Snapshot, config: &AnalysisConfig) -> Vec<PropertyModel> {
    let owner = snapshot.root();
    let mut candidates: IndexMap<String, Candidates<'_>> = IndexMap::new();
    for member in snapshot.members_of(owner) {
        match classify(member, config) {
            AccessorShape::Getter { property, prefix } => candidates
                .entry(property)
                .or_default()
                .getters
                .push((member, prefix)),
            AccessorShape::Setter { property } => {
                candidates.entry(property).or_default().setters.push(member)
            }
            AccessorShape::Plain => {}
        }
    }

    candidates
        .into_iter()
        .map(|(name, candidates)| build_property(snapshot, owner, name, candidates))
        .collect()
}

fn build_property(
    snapshot: &Snapshot,
    owner: ClassId,
    name: String,
    candidates: Candidates<'_>,
) -> PropertyModel {
    let getter = candidates
        .getters
        .iter()
        .find(|(_, prefix)| *prefix == GetterPrefix::Is)
        .or_else(|| candidates.getters.first())
        .map(|(member, _)| *member);

    // Erased, not unboxed: `int getX()` and `setX(Integer)` do not pair up.
    let getter_type = getter.map(|g| erase(&g.ty, &snapshot.member_scope(g)));
    let setter_type = |setter: &RawMember| {
        setter
            .params
            .first()
            .map(|param| erase(param, &snapshot.member_scope(setter)))
    };

    let matching_setter = getter_type.as_ref().and_then(|ty| {
        candidates
            .setters
            .iter()
            .copied()
            .find(|setter| setter_type(*setter).as_ref() == Some(ty))
    });
    let setter = matching_setter.or_else(|| candidates.setters.first().copied());

    let value_type = getter
        .map(|g| g.ty.clone())
        .or_else(|| setter.and_then(|s| s.params.first().cloned()))
        .unwrap_or(TypeRef::Void);

    let explicit_field = snapshot
        .members_of(owner)
        .any(|member| member.is_field() && member.name == name);

    PropertyModel {
        name,
        owner,
        getter: getter.map(|g| g.id),
        setter: setter.map(|s| s.id),
        value_type,
        synthesized: getter.is_some() && matching_setter.is_some(),
        explicit_field,
    }
}

#[cfg(test)]
mod tests {
    use canon_model::{ClassDescriptor, MemberId, MemorySupplier, Modifiers};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::collect::collect;

    fn method(name: &str, params: Vec<TypeRef>, ret: TypeRef) -> RawMember {
        RawMember::method(MemberId::new(1), ClassId::new(1), name, params, ret)
    }

    fn getter(property: &str, prefix: GetterPrefix) -> AccessorShape {
        AccessorShape::Getter {
            property: property.to_string(),
            prefix,
        }
    }

    #[test]
    fn classifies_accessor_shapes() {
        let config = AnalysisConfig::default();
        let b = TypeRef::named("b.pkg.B");

        assert_eq!(
            classify(&method("getSyntheticB", vec![], b.clone()), &config),
            getter("syntheticB", GetterPrefix::Get)
        );
        assert_eq!(
            classify(&method("isSyntheticBooleanB", vec![], TypeRef::boolean()), &config),
            getter("syntheticBooleanB", GetterPrefix::Is)
        );
        assert_eq!(
            classify(&method("setSyntheticB", vec![b.clone()], TypeRef::Void), &config),
            AccessorShape::Setter {
                property: "syntheticB".to_string()
            }
        );
        assert_eq!(
            classify(&method("getterB", vec![], b.clone()), &config),
            AccessorShape::Plain
        );
        assert_eq!(
            classify(&method("setterB", vec![b.clone()], TypeRef::Void), &config),
            AccessorShape::Plain
        );
        assert_eq!(classify(&method("get", vec![], b), &config), AccessorShape::Plain);
        assert_eq!(
            classify(&method("getNothing", vec![], TypeRef::Void), &config),
            AccessorShape::Plain
        );
        assert_eq!(
            classify(&method("isCount", vec![], TypeRef::int()), &config),
            AccessorShape::Plain
        );
    }

    #[test]
    fn is_prefix_with_a_non_boolean_falls_back_to_get_rules() {
        let config = AnalysisConfig::default();
        assert_eq!(
            classify(&method("issue", vec![], TypeRef::int()), &config),
            AccessorShape::Plain
        );
    }

    #[test]
    fn boxed_boolean_is_getters_are_opt_in() {
        let member = method("isReady", vec![], TypeRef::named("java.lang.Boolean"));
        assert_eq!(classify(&member, &AnalysisConfig::default()), AccessorShape::Plain);

        let config = AnalysisConfig {
            boxed_boolean_is_getter: true,
            ..AnalysisConfig::default()
        };
        assert_eq!(classify(&member, &config), getter("ready", GetterPrefix::Is));
    }

    #[test]
    fn static_methods_and_bridges_are_plain() {
        let config = AnalysisConfig::default();
        let static_getter = method("getInstance", vec![], TypeRef::named("p.A"))
            .with_modifiers(Modifiers::default().with_static());
        assert_eq!(classify(&static_getter, &config), AccessorShape::Plain);

        let with_statics = AnalysisConfig {
            static_accessors: true,
            ..AnalysisConfig::default()
        };
        assert_eq!(
            classify(&static_getter, &with_statics),
            getter("instance", GetterPrefix::Get)
        );

        let bridge = method("getB", vec![], TypeRef::named("p.A"))
            .with_modifiers(Modifiers::default().with_bridge());
        assert_eq!(classify(&bridge, &with_statics), AccessorShape::Plain);
    }

    fn snapshot_with(members: Vec<(&str, Vec<TypeRef>, TypeRef)>) -> Snapshot {
        let mut supplier = MemorySupplier::new();
        let class = supplier.add_class(ClassDescriptor::new(ClassId::new(1), "p.A"));
        for (idx, (name, params, ret)) in members.into_iter().enumerate() {
            let id = MemberId::new(idx as u32 + 1);
            let member = if name.starts_with("field:") {
                RawMember::field(id, class, &name["field:".len()..], ret)
            } else {
                RawMember::method(id, class, name, params, ret)
            };
            supplier.add_member(member);
        }
        collect(&supplier, class).unwrap()
    }

    #[test]
    fn is_getter_wins_over_get_getter() {
        let snapshot = snapshot_with(vec![
            ("getReady", vec![], TypeRef::boolean()),
            ("isReady", vec![], TypeRef::boolean()),
            ("setReady", vec![TypeRef::boolean()], TypeRef::Void),
        ]);
        let properties = synthesize_properties(&snapshot, &AnalysisConfig::default());

        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].getter, Some(MemberId::new(2)));
        assert_eq!(properties[0].setter, Some(MemberId::new(3)));
        assert!(properties[0].synthesized);
    }

    #[test]
    fn setter_matching_the_getter_type_wins() {
        let snapshot = snapshot_with(vec![
            ("setValue", vec![TypeRef::named("java.lang.String")], TypeRef::Void),
            ("getValue", vec![], TypeRef::int()),
            ("setValue", vec![TypeRef::named("java.lang.Integer")], TypeRef::Void),
            ("setValue", vec![TypeRef::int()], TypeRef::Void),
        ]);
        let properties = synthesize_properties(&snapshot, &AnalysisConfig::default());

        assert_eq!(properties.len(), 1);
        let value = &properties[0];
        assert_eq!(value.getter, Some(MemberId::new(2)));
        assert_eq!(value.setter, Some(MemberId::new(4)));
        assert!(value.synthesized);
        assert_eq!(value.value_type, TypeRef::int());
    }

    #[test]
    fn boxed_setter_does_not_pair_with_primitive_getter() {
        let snapshot = snapshot_with(vec![
            ("getCount", vec![], TypeRef::int()),
            ("setCount", vec![TypeRef::named("java.lang.Integer")], TypeRef::Void),
        ]);
        let properties = synthesize_properties(&snapshot, &AnalysisConfig::default());

        assert_eq!(properties.len(), 1);
        let count = &properties[0];
        assert_eq!(count.getter, Some(MemberId::new(1)));
        assert_eq!(count.setter, Some(MemberId::new(2)));
        assert!(!count.synthesized);
    }

    #[test]
    fn mismatched_halves_are_not_synthesized() {
        let snapshot = snapshot_with(vec![
            ("getName", vec![], TypeRef::named("java.lang.String")),
            ("setName", vec![TypeRef::int()], TypeRef::Void),
            ("setOnly", vec![TypeRef::int()], TypeRef::Void),
            ("field:name", vec![], TypeRef::named("java.lang.String")),
        ]);
        let properties = synthesize_properties(&snapshot, &AnalysisConfig::default());

        let names: Vec<_> = properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "only"]);

        let name = &properties[0];
        assert!(!name.synthesized);
        assert_eq!(name.setter, Some(MemberId::new(2)));
        assert!(name.explicit_field);

        let only = &properties[1];
        assert_eq!(only.getter, None);
        assert_eq!(only.value_type, TypeRef::int());
        assert!(!only.synthesized);
        assert!(!only.explicit_field);
    }
}
