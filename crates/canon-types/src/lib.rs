//! JVM-flavoured type references used across Canon.
//!
//! Types here are purely structural: a [`TypeRef`] names classes by binary name
//! (`b.pkg.B$InnerC`) and never resolves them. Hierarchy-aware questions go
//! through the [`Hierarchy`] trait so callers decide what the class graph is.

#![forbid(unsafe_code)]

mod descriptor;
mod erasure;
mod error;
mod subtype;
mod ty;

pub use crate::descriptor::{
    field_descriptor, params_descriptor, parse_field_descriptor, parse_method_descriptor,
    MethodDescriptor, MAX_ARRAY_DIMENSIONS,
};
pub use crate::erasure::{canonicalize, erase, TypeParam, TypeScope};
pub use crate::error::{Error, Result};
pub use crate::subtype::{is_subtype, Hierarchy};
pub use crate::ty::{ClassType, PrimitiveType, TypeRef, CLONEABLE, OBJECT, SERIALIZABLE};
