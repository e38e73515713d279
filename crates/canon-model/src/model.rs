use std::fmt;

use canon_types::{params_descriptor, TypeParam, TypeRef};
use serde::{Deserialize, Serialize};

use crate::ids::{ClassId, MemberId};

/// JVM name shared by all constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Canonical overload key: name plus canonicalized parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub params: Vec<TypeRef>,
}

impl Signature {
    pub fn new(name: impl Into<String>, params: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Parameter descriptor, e.g. `(ZLb/pkg/B;)`.
    pub fn descriptor(&self) -> String {
        params_descriptor(&self.params)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyModel {
    pub name: String,
    pub owner: ClassId,
    pub getter: Option<MemberId>,
    pub setter: Option<MemberId>,
    pub value_type: TypeRef,
    /// Both halves exist, share the derived name, and agree on the type.
    pub synthesized: bool,
    /// A field with the property's name is declared on the same class.
    pub explicit_field: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverloadEntry {
    pub signature: Signature,
    pub member: MemberId,
    /// Declaring class of `member`; an ancestor for inherited entries.
    pub declared_in: ClassId,
    /// Nearest ancestor member this entry overrides or hides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<MemberId>,
    /// Compiler bridge methods folded into this entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bridges: Vec<MemberId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverloadGroup {
    pub name: String,
    pub owner: ClassId,
    pub entries: Vec<OverloadEntry>,
    /// Two entries share a [`Signature`].
    pub ambiguous: bool,
    /// Property this method name takes part in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl OverloadGroup {
    pub fn new(name: impl Into<String>, owner: ClassId) -> Self {
        Self {
            name: name.into(),
            owner,
            entries: Vec::new(),
            ambiguous: false,
            property: None,
        }
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.entries.iter().map(|entry| &entry.signature)
    }

    pub fn entry(&self, member: MemberId) -> Option<&OverloadEntry> {
        self.entries.iter().find(|entry| entry.member == member)
    }

    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.entries.iter().map(|entry| entry.member)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeNodeKind {
    TopLevel,
    StaticNested,
    Inner,
    Local,
    Anonymous,
    GenericParameterized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNode {
    pub class: ClassId,
    pub kind: TypeNodeKind,
    pub binary_name: String,
    /// Names from the outermost enclosing type down to this one. Local and
    /// anonymous types use generated `<member>$<name>` / `<member>$<n>` segments.
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TypeNode>,
}

impl TypeNode {
    pub fn qualified_path(&self) -> String {
        self.path.join(".")
    }

    /// Depth-first search of this subtree.
    pub fn find(&self, class: ClassId) -> Option<&TypeNode> {
        if self.class == class {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(class))
    }
}

/// Conflict classes, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    ConflictingAccessorField,
    ShadowedOverride,
    AmbiguousOverload,
    DuplicateMemberName,
}

impl ConflictKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::ConflictingAccessorField => "conflicting-accessor-field",
            ConflictKind::ShadowedOverride => "shadowed-override",
            ConflictKind::AmbiguousOverload => "ambiguous-overload",
            ConflictKind::DuplicateMemberName => "duplicate-member-name",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal finding. The model it is attached to is still valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictDiagnostic {
    pub kind: ConflictKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberId>,
    /// Nested types involved (duplicate names only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<ClassId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub detail: String,
}

impl ConflictDiagnostic {
    pub fn new(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            members: Vec::new(),
            classes: Vec::new(),
            property: None,
            group: None,
            detail: detail.into(),
        }
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = MemberId>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn with_classes(mut self, classes: impl IntoIterator<Item = ClassId>) -> Self {
        self.classes.extend(classes);
        self
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

impl fmt::Display for ConflictDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.detail)
    }
}

/// Canonical API model of one class. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalModel {
    pub class: ClassId,
    pub properties: Vec<PropertyModel>,
    /// Declared fields, kept as plain members.
    pub fields: Vec<MemberId>,
    pub constructors: OverloadGroup,
    pub overload_groups: Vec<OverloadGroup>,
    pub type_tree: TypeNode,
    pub diagnostics: Vec<ConflictDiagnostic>,
}

impl CanonicalModel {
    pub fn property(&self, name: &str) -> Option<&PropertyModel> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&OverloadGroup> {
        self.overload_groups.iter().find(|g| g.name == name)
    }

    pub fn diagnostics_of(&self, kind: ConflictKind) -> impl Iterator<Item = &ConflictDiagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn is_flagged(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
