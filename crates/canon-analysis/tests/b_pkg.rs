use std::collections::HashSet;

use canon_analysis::analyze_class;
use canon_config::AnalysisConfig;
use canon_model::{CanonicalModel, ClassId, ConflictKind, Signature, TypeNodeKind};
use canon_test_utils::{b_pkg, b_type, BPkg};
use canon_types::TypeRef;
use pretty_assertions::assert_eq;

fn analyze(fixture: &BPkg, class: ClassId) -> CanonicalModel {
    analyze_class(&fixture.supplier, class, &AnalysisConfig::default()).unwrap()
}

#[test]
fn every_method_name_has_exactly_one_group() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let mut names = HashSet::new();
    for group in &model.overload_groups {
        assert!(names.insert(group.name.clone()), "duplicate group {}", group.name);

        let signatures: HashSet<&Signature> = group.signatures().collect();
        if !group.ambiguous {
            assert_eq!(signatures.len(), group.entries.len(), "{}", group.name);
        }
    }

    for member in fixture.members_of(fixture.b) {
        if member.is_method() {
            assert!(names.contains(&member.name), "no group for {}", member.name);
        }
    }
}

#[test]
fn groups_are_in_declaration_order_then_inherited() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let names: Vec<&str> = model.overload_groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "create",
            "bMethod",
            "bMethodWithAnArrayArgument",
            "getB",
            "getSyntheticB",
            "setSyntheticB",
            "bGeneratedSynthetic",
            "isSyntheticBooleanB",
            "setSyntheticBooleanB",
            "getNonSyntheticB",
            "setNonSyntheticB",
            "isNonSyntheticBooleanB",
            "setNonSyntheticBooleanB",
            "getterB",
            "setterB",
            "getterBooleanB",
            "setterBooleanB",
            "getConflictingField",
            "getProtectedFieldWithoutConflict",
            "bOverloaded",
            "commonOverloaded",
            "unmappedOverloaded",
            "bInterfaceMethod",
            "bLambdaWithGeneric",
            "bArrayMethod",
            "bCallArrayMethod",
            "bAnon",
            "toString",
            "hashCode",
            "equals",
        ]
    );

    let to_string = model.group("toString").unwrap();
    assert_eq!(to_string.entries[0].declared_in, fixture.object);
}

#[test]
fn synthetic_b_is_one_synthesized_property() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let matching: Vec<_> = model
        .properties
        .iter()
        .filter(|p| p.name == "syntheticB")
        .collect();
    assert_eq!(matching.len(), 1);

    let property = matching[0];
    assert!(property.synthesized);
    assert_eq!(property.getter, Some(fixture.member(fixture.b, "getSyntheticB", 0)));
    assert_eq!(property.setter, Some(fixture.member(fixture.b, "setSyntheticB", 1)));
    assert_eq!(property.value_type, b_type());
    assert_eq!(
        model.group("getSyntheticB").unwrap().property.as_deref(),
        Some("syntheticB")
    );
}

#[test]
fn boolean_is_getter_pairs_with_its_setter() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let matching: Vec<_> = model
        .properties
        .iter()
        .filter(|p| p.name == "syntheticBooleanB")
        .collect();
    assert_eq!(matching.len(), 1);
    assert!(matching[0].synthesized);
    assert_eq!(matching[0].value_type, TypeRef::boolean());
    assert_eq!(
        matching[0].getter,
        Some(fixture.member(fixture.b, "isSyntheticBooleanB", 0))
    );
}

#[test]
fn property_list_skips_non_conventional_names() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let names: Vec<(&str, bool)> = model
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.synthesized))
        .collect();
    assert_eq!(
        names,
        vec![
            ("b", false),
            ("syntheticB", true),
            ("syntheticBooleanB", true),
            ("nonSyntheticB", true),
            ("nonSyntheticBooleanB", true),
            ("conflictingField", false),
            ("protectedFieldWithoutConflict", false),
        ]
    );
    assert_eq!(model.group("getterB").unwrap().property, None);
    assert_eq!(model.group("setterBooleanB").unwrap().property, None);
}

#[test]
fn conflicting_field_is_flagged_and_both_sides_kept() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let field = fixture.member(fixture.b, "conflictingField", 0);
    let getter = fixture.member(fixture.b, "getConflictingField", 0);

    let property = model.property("conflictingField").unwrap();
    assert!(!property.synthesized);
    assert!(property.explicit_field);
    assert_eq!(property.getter, Some(getter));
    assert_eq!(property.setter, None);
    assert!(model.fields.contains(&field));

    let diagnostic = model
        .diagnostics_of(ConflictKind::ConflictingAccessorField)
        .find(|d| d.property.as_deref() == Some("conflictingField"))
        .unwrap();
    assert_eq!(diagnostic.members, vec![field, getter]);
    assert_eq!(
        diagnostic.detail,
        "field `conflictingField` coexists with non-synthesized property `conflictingField` \
         (getConflictingField)"
    );

    let protected = model.property("protectedFieldWithoutConflict").unwrap();
    assert!(!protected.explicit_field);
}

#[test]
fn b_overloaded_has_three_distinct_signatures() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let group = model.group("bOverloaded").unwrap();
    assert!(!group.ambiguous);
    let signatures: Vec<Signature> = group.signatures().cloned().collect();
    assert_eq!(
        signatures,
        vec![
            Signature::new("bOverloaded", vec![]),
            Signature::new("bOverloaded", vec![TypeRef::int()]),
            Signature::new("bOverloaded", vec![TypeRef::boolean()]),
        ]
    );
}

#[test]
fn object_and_b_parameters_stay_distinct() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    for name in ["commonOverloaded", "unmappedOverloaded"] {
        let group = model.group(name).unwrap();
        assert!(!group.ambiguous, "{name}");
        let descriptors: Vec<String> = group.signatures().map(Signature::descriptor).collect();
        assert_eq!(
            descriptors,
            vec!["(Ljava/lang/Object;)", "(Lb/pkg/B;)"],
            "{name}"
        );
    }
}

#[test]
fn generic_parameters_erase() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let lambda = model.group("bLambdaWithGeneric").unwrap();
    assert_eq!(
        lambda.entries[0].signature.params,
        vec![TypeRef::named("java.util.function.Supplier")]
    );
    let array = model.group("bMethodWithAnArrayArgument").unwrap();
    assert_eq!(
        array.entries[0].signature.descriptor(),
        "([Lb/pkg/BInterface;)"
    );
}

#[test]
fn covariant_override_folds_its_bridge_and_is_flagged() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let own = fixture.member_with(fixture.b, "bGeneratedSynthetic", &[]);
    let parent = fixture.member(fixture.b_parent, "bGeneratedSynthetic", 0);
    let bridge = fixture.bridge(fixture.b, "bGeneratedSynthetic");

    let group = model.group("bGeneratedSynthetic").unwrap();
    assert_eq!(group.entries.len(), 1);
    assert_eq!(group.entries[0].member, own);
    assert_eq!(group.entries[0].overrides, Some(parent));
    assert_eq!(group.entries[0].bridges, vec![bridge]);

    let shadowed: Vec<_> = model.diagnostics_of(ConflictKind::ShadowedOverride).collect();
    assert_eq!(shadowed.len(), 2);
    assert_eq!(shadowed[0].members, vec![own, parent]);
    assert_eq!(shadowed[0].group.as_deref(), Some("bGeneratedSynthetic"));
    assert_eq!(
        shadowed[1].members,
        vec![
            fixture.member(fixture.b, "bInterfaceMethod", 0),
            fixture.member(fixture.b_interface, "bInterfaceMethod", 0),
        ]
    );
}

#[test]
fn b_diagnostics_in_precedence_order() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    let summary: Vec<(ConflictKind, Option<&str>, Option<&str>)> = model
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.property.as_deref(), d.group.as_deref()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (ConflictKind::ConflictingAccessorField, Some("b"), None),
            (ConflictKind::ConflictingAccessorField, Some("conflictingField"), None),
            (ConflictKind::ShadowedOverride, None, Some("bGeneratedSynthetic")),
            (ConflictKind::ShadowedOverride, None, Some("bInterfaceMethod")),
        ]
    );
}

#[test]
fn constructors_are_their_own_group() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);

    assert_eq!(model.constructors.name, "<init>");
    assert_eq!(model.constructors.entries.len(), 2);
    assert!(!model.constructors.ambiguous);
    assert!(model.group("<init>").is_none());
}

#[test]
fn nested_override_keeps_one_live_member() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.inner_d);

    let own = fixture.member_with(fixture.inner_d, "getB", &[]);
    let ancestor = fixture.member(fixture.inner_c, "getB", 0);

    let group = model.group("getB").unwrap();
    assert_eq!(group.entries.len(), 1);
    assert_eq!(group.entries[0].member, own);
    assert_eq!(group.entries[0].overrides, Some(ancestor));
    assert_eq!(
        group.entries[0].bridges,
        vec![fixture.bridge(fixture.inner_d, "getB")]
    );

    let shadowed: Vec<_> = model.diagnostics_of(ConflictKind::ShadowedOverride).collect();
    assert_eq!(shadowed.len(), 1);
    assert_eq!(shadowed[0].members, vec![own, ancestor]);
    assert_eq!(
        shadowed[0].detail,
        "`getB()` on b.pkg.B$InnerC$InnerD overrides the member declared on b.pkg.B$InnerC"
    );

    assert_eq!(model.type_tree.path, vec!["B", "InnerC", "InnerD"]);
    assert_eq!(model.type_tree.kind, TypeNodeKind::StaticNested);
}

#[test]
fn local_class_contributes_no_members_to_its_host() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.inner_e);

    let local_members: HashSet<_> = fixture
        .members_of(fixture.local_class)
        .into_iter()
        .map(|m| m.id)
        .collect();
    for group in &model.overload_groups {
        assert!(group.members().all(|m| !local_members.contains(&m)), "{}", group.name);
    }
    assert!(model.group("bMethod").is_none());
    assert!(model.properties.is_empty());

    let local = model.type_tree.find(fixture.local_class).unwrap();
    assert_eq!(local.kind, TypeNodeKind::Local);
    assert_eq!(
        local.qualified_path(),
        "B.InnerE.bLocalClassInAnInnerClass$BLocalClass"
    );
    assert_eq!(local.binary_name, "b.pkg.B$InnerE$1BLocalClass");
}

#[test]
fn type_tree_lists_every_nested_type() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.b);
    let tree = &model.type_tree;

    assert_eq!(tree.kind, TypeNodeKind::TopLevel);
    let children: Vec<(String, TypeNodeKind)> = tree
        .children
        .iter()
        .map(|node| (node.qualified_path(), node.kind))
        .collect();
    assert_eq!(
        children,
        vec![
            ("B.bInterfaceMethod$1".to_string(), TypeNodeKind::Anonymous),
            ("B.bAnon$1".to_string(), TypeNodeKind::Anonymous),
            ("B.Inner".to_string(), TypeNodeKind::Inner),
            ("B.InnerB".to_string(), TypeNodeKind::Inner),
            ("B.GenericB".to_string(), TypeNodeKind::GenericParameterized),
            ("B.InnerC".to_string(), TypeNodeKind::StaticNested),
            ("B.InnerE".to_string(), TypeNodeKind::StaticNested),
        ]
    );

    let inner_d = tree.find(fixture.inner_d).unwrap();
    assert_eq!(inner_d.qualified_path(), "B.InnerC.InnerD");
    let generic = tree.find(fixture.generic_b).unwrap();
    assert_eq!(generic.type_params.len(), 1);
    assert!(tree.find(fixture.local_class).is_some());
}

#[test]
fn anonymous_class_analysed_on_its_own_keeps_its_segment() {
    let fixture = b_pkg();
    let model = analyze(&fixture, fixture.anon_in_b_anon);

    assert_eq!(model.type_tree.path, vec!["B", "bAnon$1"]);
    assert_eq!(model.type_tree.kind, TypeNodeKind::Anonymous);
    assert!(model.group("bMethodAnon").is_some());
    // Everything else is inherited from B.
    let b_method = model.group("bMethod").unwrap();
    assert_eq!(b_method.entries[0].declared_in, fixture.b);
}

#[test]
fn disabling_bridge_folding_surfaces_the_bridge() {
    let fixture = b_pkg();
    let config = AnalysisConfig {
        fold_bridge_methods: false,
        ..AnalysisConfig::default()
    };
    let model = analyze_class(&fixture.supplier, fixture.inner_d, &config).unwrap();

    let group = model.group("getB").unwrap();
    let members: Vec<_> = group.members().collect();
    assert!(members.contains(&fixture.bridge(fixture.inner_d, "getB")));
    assert!(group.ambiguous);
    assert_eq!(
        model.diagnostics_of(ConflictKind::AmbiguousOverload).count(),
        1
    );
}
