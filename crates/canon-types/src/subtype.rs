use std::collections::{HashSet, VecDeque};

use crate::ty::{TypeRef, CLONEABLE, OBJECT, SERIALIZABLE};

/// Read-only view of the class graph used for subtype queries.
pub trait Hierarchy {
    /// Binary names of the direct supertypes of `binary_name` (superclass
    /// first, then interfaces). Unknown classes have none.
    fn direct_supertypes(&self, binary_name: &str) -> Vec<String>;
}

/// Whether `sub` is `sup` or a subtype of it, for already-erased types.
///
/// Only edges visible through `hierarchy` are followed; a class the hierarchy
/// does not know is a subtype of nothing but itself and `Object`.
pub fn is_subtype(hierarchy: &dyn Hierarchy, sub: &TypeRef, sup: &TypeRef) -> bool {
    if sub == sup {
        return true;
    }
    match (sub, sup) {
        (TypeRef::Class(_) | TypeRef::Array(_) | TypeRef::TypeVar(_), TypeRef::Class(target))
            if target.name == OBJECT =>
        {
            true
        }
        (TypeRef::Array(_), TypeRef::Class(target)) => {
            target.name == CLONEABLE || target.name == SERIALIZABLE
        }
        (TypeRef::Array(sub_elem), TypeRef::Array(sup_elem)) => {
            sub_elem.is_reference()
                && sup_elem.is_reference()
                && is_subtype(hierarchy, sub_elem, sup_elem)
        }
        (TypeRef::Class(from), TypeRef::Class(target)) => {
            class_extends(hierarchy, &from.name, &target.name)
        }
        _ => false,
    }
}

fn class_extends(hierarchy: &dyn Hierarchy, from: &str, target: &str) -> bool {
    let mut queue = VecDeque::from([from.to_string()]);
    let mut seen = HashSet::new();
    while let Some(current) = queue.pop_front() {
        if current == target {
            return true;
        }
        if !seen.insert(current.clone()) {
            continue;
        }
        queue.extend(hierarchy.direct_supertypes(&current));
    }
    false
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct MapHierarchy(HashMap<&'static str, Vec<&'static str>>);

    impl Hierarchy for MapHierarchy {
        fn direct_supertypes(&self, binary_name: &str) -> Vec<String> {
            self.0
                .get(binary_name)
                .map(|supers| supers.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default()
        }
    }

    fn hierarchy() -> MapHierarchy {
        MapHierarchy(HashMap::from([
            ("b.pkg.B", vec!["b.pkg.BParent", "b.pkg.BInterface"]),
            ("b.pkg.BParent", vec![OBJECT]),
            ("b.pkg.B$InnerC$InnerD", vec!["b.pkg.B$InnerC"]),
            // Cycles must not hang the walk.
            ("x.A", vec!["x.B"]),
            ("x.B", vec!["x.A"]),
        ]))
    }

    #[test]
    fn walks_superclasses_and_interfaces() {
        let h = hierarchy();
        let b = TypeRef::named("b.pkg.B");
        assert!(is_subtype(&h, &b, &TypeRef::named("b.pkg.BParent")));
        assert!(is_subtype(&h, &b, &TypeRef::named("b.pkg.BInterface")));
        assert!(is_subtype(
            &h,
            &TypeRef::named("b.pkg.B$InnerC$InnerD"),
            &TypeRef::named("b.pkg.B$InnerC")
        ));
        assert!(!is_subtype(&h, &TypeRef::named("b.pkg.BParent"), &b));
        assert!(!is_subtype(&h, &TypeRef::named("x.A"), &TypeRef::named("x.C")));
    }

    #[test]
    fn arrays_and_primitives() {
        let h = hierarchy();
        let b_array = TypeRef::array(TypeRef::named("b.pkg.B"));
        assert!(is_subtype(
            &h,
            &b_array,
            &TypeRef::array(TypeRef::named("b.pkg.BParent"))
        ));
        assert!(is_subtype(&h, &b_array, &TypeRef::object()));
        assert!(is_subtype(&h, &b_array, &TypeRef::named(SERIALIZABLE)));
        assert!(!is_subtype(
            &h,
            &TypeRef::array(TypeRef::int()),
            &TypeRef::array(TypeRef::Primitive(crate::PrimitiveType::Long))
        ));
        assert!(!is_subtype(&h, &TypeRef::int(), &TypeRef::object()));
        assert!(is_subtype(&h, &TypeRef::Void, &TypeRef::Void));
    }
}
