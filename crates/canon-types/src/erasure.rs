use serde::{Deserialize, Serialize};

use crate::ty::{PrimitiveType, TypeRef};

/// A declared type parameter, e.g. `T extends Comparable<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<TypeRef>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

/// Lexically nested type-parameter declarations.
///
/// Frames are pushed outermost first (enclosing class, class, method); lookups
/// search innermost first so a method's `T` shadows its class's `T`.
#[derive(Debug, Clone, Default)]
pub struct TypeScope<'a> {
    frames: Vec<&'a [TypeParam]>,
}

impl<'a> TypeScope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame(mut self, params: &'a [TypeParam]) -> Self {
        self.push(params);
        self
    }

    pub fn push(&mut self, params: &'a [TypeParam]) {
        if !params.is_empty() {
            self.frames.push(params);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a TypeParam> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.iter().find(|param| param.name == name))
    }
}

/// Structural erasure: type variables become the erasure of their first bound
/// (or `Object` when unbounded or unknown), type arguments are dropped, and
/// array components are erased recursively.
pub fn erase(ty: &TypeRef, scope: &TypeScope<'_>) -> TypeRef {
    fn inner<'s>(ty: &TypeRef, scope: &TypeScope<'s>, visiting: &mut Vec<&'s str>) -> TypeRef {
        match ty {
            TypeRef::Void => TypeRef::Void,
            TypeRef::Primitive(p) => TypeRef::Primitive(*p),
            TypeRef::Class(class) => TypeRef::named(class.name.clone()),
            TypeRef::Array(element) => TypeRef::array(inner(element, scope, visiting)),
            TypeRef::TypeVar(name) => {
                let Some(param) = scope.lookup(name) else {
                    return TypeRef::object();
                };
                // `<A extends B, B extends A>` is rejected by javac but can
                // still show up in recovered metadata.
                if visiting.contains(&param.name.as_str()) {
                    return TypeRef::object();
                }
                let Some(bound) = param.bounds.first() else {
                    return TypeRef::object();
                };
                visiting.push(param.name.as_str());
                let erased = inner(bound, scope, visiting);
                visiting.pop();
                erased
            }
        }
    }

    inner(ty, scope, &mut Vec::new())
}

/// Canonical form of a parameter or return type for signature comparison.
///
/// This is [`erase`] followed by mapping a top-level wrapper class onto its
/// primitive (`java.lang.Integer` -> `int`). Array components keep their
/// spelling: `int[]` and `Integer[]` are not boxing-convertible.
pub fn canonicalize(ty: &TypeRef, scope: &TypeScope<'_>) -> TypeRef {
    match erase(ty, scope) {
        TypeRef::Class(class) => match PrimitiveType::from_boxed_name(&class.name) {
            Some(p) => TypeRef::Primitive(p),
            None => TypeRef::Class(class),
        },
        other => other,
    }
}
