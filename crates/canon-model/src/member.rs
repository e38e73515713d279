use canon_types::{parse_field_descriptor, parse_method_descriptor, TypeParam, TypeRef};
use serde::{Deserialize, Serialize};

use crate::ids::{ClassId, DeclarationId, MemberId};
use crate::model::CONSTRUCTOR_NAME;

/// JVM access flags (JVMS §4.5, §4.6).
pub mod access {
    pub const ACC_PUBLIC: u16 = 0x0001;
    pub const ACC_PRIVATE: u16 = 0x0002;
    pub const ACC_PROTECTED: u16 = 0x0004;
    pub const ACC_STATIC: u16 = 0x0008;
    pub const ACC_FINAL: u16 = 0x0010;
    /// Methods only; the same bit is `ACC_VOLATILE` on fields.
    pub const ACC_BRIDGE: u16 = 0x0040;
    /// Methods only; the same bit is `ACC_TRANSIENT` on fields.
    pub const ACC_VARARGS: u16 = 0x0080;
    pub const ACC_INTERFACE: u16 = 0x0200;
    pub const ACC_ABSTRACT: u16 = 0x0400;
    pub const ACC_SYNTHETIC: u16 = 0x1000;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Field,
    Method,
    Constructor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn from_access_flags(flags: u16) -> Self {
        if flags & access::ACC_PUBLIC != 0 {
            Visibility::Public
        } else if flags & access::ACC_PROTECTED != 0 {
            Visibility::Protected
        } else if flags & access::ACC_PRIVATE != 0 {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    /// Compiler generated (`ACC_SYNTHETIC`).
    pub is_synthetic: bool,
    /// Compiler generated bridge for a covariant return or generic erasure.
    pub is_bridge: bool,
    pub is_varargs: bool,
}

impl Modifiers {
    pub fn from_method_flags(flags: u16) -> Self {
        Self {
            is_bridge: flags & access::ACC_BRIDGE != 0,
            is_varargs: flags & access::ACC_VARARGS != 0,
            ..Self::from_common_flags(flags)
        }
    }

    pub fn from_field_flags(flags: u16) -> Self {
        Self::from_common_flags(flags)
    }

    pub fn from_class_flags(flags: u16) -> Self {
        Self::from_common_flags(flags)
    }

    fn from_common_flags(flags: u16) -> Self {
        Self {
            is_static: flags & access::ACC_STATIC != 0,
            is_final: flags & access::ACC_FINAL != 0,
            is_abstract: flags & access::ACC_ABSTRACT != 0,
            is_synthetic: flags & access::ACC_SYNTHETIC != 0,
            ..Self::default()
        }
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_bridge(mut self) -> Self {
        self.is_bridge = true;
        self.is_synthetic = true;
        self
    }
}

/// One field, method, or constructor exactly as the supplier reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMember {
    pub id: MemberId,
    /// The class that declares this member.
    pub owner: ClassId,
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Field type, or return type for methods ([`TypeRef::Void`] for constructors).
    pub ty: TypeRef,
    #[serde(default)]
    pub params: Vec<TypeRef>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaration: Option<DeclarationId>,
}

impl RawMember {
    pub fn field(id: MemberId, owner: ClassId, name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(id, owner, name.into(), MemberKind::Field, ty, Vec::new())
    }

    pub fn method(
        id: MemberId,
        owner: ClassId,
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self::new(id, owner, name.into(), MemberKind::Method, return_type, params)
    }

    pub fn constructor(id: MemberId, owner: ClassId, params: Vec<TypeRef>) -> Self {
        Self::new(
            id,
            owner,
            CONSTRUCTOR_NAME.to_string(),
            MemberKind::Constructor,
            TypeRef::Void,
            params,
        )
    }

    fn new(
        id: MemberId,
        owner: ClassId,
        name: String,
        kind: MemberKind,
        ty: TypeRef,
        params: Vec<TypeRef>,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            kind,
            visibility: Visibility::Public,
            modifiers: Modifiers::default(),
            ty,
            params,
            type_params: Vec::new(),
            declaration: None,
        }
    }

    /// Build a method or constructor from classfile data (`name`, descriptor,
    /// `access_flags`). `<init>` becomes a constructor.
    pub fn from_method_stub(
        id: MemberId,
        owner: ClassId,
        name: &str,
        descriptor: &str,
        access_flags: u16,
    ) -> canon_types::Result<Self> {
        let parsed = parse_method_descriptor(descriptor)?;
        let member = if name == CONSTRUCTOR_NAME {
            Self::constructor(id, owner, parsed.params)
        } else {
            Self::method(id, owner, name, parsed.params, parsed.return_type)
        };
        Ok(member
            .with_visibility(Visibility::from_access_flags(access_flags))
            .with_modifiers(Modifiers::from_method_flags(access_flags)))
    }

    pub fn from_field_stub(
        id: MemberId,
        owner: ClassId,
        name: &str,
        descriptor: &str,
        access_flags: u16,
    ) -> canon_types::Result<Self> {
        let ty = parse_field_descriptor(descriptor)?;
        Ok(Self::field(id, owner, name, ty)
            .with_visibility(Visibility::from_access_flags(access_flags))
            .with_modifiers(Modifiers::from_field_flags(access_flags)))
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParam>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_declaration(mut self, declaration: DeclarationId) -> Self {
        self.declaration = Some(declaration);
        self
    }

    pub fn is_field(&self) -> bool {
        self.kind == MemberKind::Field
    }

    pub fn is_method(&self) -> bool {
        self.kind == MemberKind::Method
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MemberKind::Constructor
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }
}
