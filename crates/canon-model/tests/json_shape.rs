use canon_model::{
    ClassId, ConflictDiagnostic, ConflictKind, MemberId, OverloadEntry, Signature,
};
use canon_types::TypeRef;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn diagnostics_serialize_compactly() {
    let diagnostic = ConflictDiagnostic::new(
        ConflictKind::ConflictingAccessorField,
        "field `b` coexists with non-synthesized property `b` (getB)",
    )
    .with_members([MemberId::new(1), MemberId::new(9)])
    .with_property("b");

    assert_eq!(
        serde_json::to_value(&diagnostic).unwrap(),
        json!({
            "kind": "conflicting_accessor_field",
            "members": [1, 9],
            "property": "b",
            "detail": "field `b` coexists with non-synthesized property `b` (getB)",
        })
    );
}

#[test]
fn overload_entries_omit_empty_links() {
    let entry = OverloadEntry {
        signature: Signature::new("bOverloaded", vec![TypeRef::int()]),
        member: MemberId::new(4),
        declared_in: ClassId::new(2),
        overrides: None,
        bridges: Vec::new(),
    };

    let value = serde_json::to_value(&entry).unwrap();
    assert_eq!(value["member"], json!(4));
    assert_eq!(value["declared_in"], json!(2));
    assert!(value.get("overrides").is_none());
    assert!(value.get("bridges").is_none());

    let restored: OverloadEntry = serde_json::from_value(value).unwrap();
    assert_eq!(restored, entry);
}
