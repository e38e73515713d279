//! Canon's data model.
//!
//! The input side ([`RawMember`], [`ClassDescriptor`], [`MetadataSupplier`]) is
//! what an external metadata supplier (reflection, bytecode, source) hands to
//! the analysis. The output side ([`CanonicalModel`] and its parts) is what the
//! analysis hands to emitters and diffing tools. Both sides are plain data and
//! serialize losslessly with `serde`.

#![forbid(unsafe_code)]

mod class;
mod ids;
mod member;
mod model;
mod supplier;

pub use crate::class::ClassDescriptor;
pub use crate::ids::{ClassId, DeclarationId, MemberId};
pub use crate::member::{access, MemberKind, Modifiers, RawMember, Visibility};
pub use crate::model::{
    CanonicalModel, ConflictDiagnostic, ConflictKind, OverloadEntry, OverloadGroup,
    PropertyModel, Signature, TypeNode, TypeNodeKind, CONSTRUCTOR_NAME,
};
pub use crate::supplier::{MemorySupplier, MetadataSupplier};
