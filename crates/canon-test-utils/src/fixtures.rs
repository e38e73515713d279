use canon_model::{
    ClassDescriptor, ClassId, MemberId, MemorySupplier, MetadataSupplier, Modifiers, RawMember,
    Visibility,
};
use canon_types::{TypeParam, TypeRef};

/// Hands out sequential ids while populating a [`MemorySupplier`].
#[derive(Debug, Default)]
pub struct FixtureBuilder {
    supplier: MemorySupplier,
    next_class: u32,
    next_member: u32,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(
        &mut self,
        binary_name: &str,
        configure: impl FnOnce(ClassDescriptor) -> ClassDescriptor,
    ) -> ClassId {
        self.next_class += 1;
        let id = ClassId::new(self.next_class);
        self.supplier
            .add_class(configure(ClassDescriptor::new(id, binary_name)))
    }

    pub fn interface(&mut self, binary_name: &str) -> ClassId {
        self.next_class += 1;
        let id = ClassId::new(self.next_class);
        self.supplier
            .add_class(ClassDescriptor::interface(id, binary_name))
    }

    /// Replace an already registered class, keeping its members.
    pub fn update_class(
        &mut self,
        id: ClassId,
        configure: impl FnOnce(ClassDescriptor) -> ClassDescriptor,
    ) {
        let desc = self
            .supplier
            .class(id)
            .unwrap_or_else(|| panic!("unknown fixture class {id}"));
        self.supplier.add_class(configure(desc));
    }

    pub fn member(&mut self, build: impl FnOnce(MemberId) -> RawMember) -> MemberId {
        self.next_member += 1;
        let id = MemberId::new(self.next_member);
        self.supplier.add_member(build(id))
    }

    pub fn field(&mut self, owner: ClassId, name: &str, ty: TypeRef) -> MemberId {
        self.member(|id| RawMember::field(id, owner, name, ty))
    }

    pub fn method(
        &mut self,
        owner: ClassId,
        name: &str,
        params: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> MemberId {
        self.member(|id| RawMember::method(id, owner, name, params, return_type))
    }

    pub fn constructor(&mut self, owner: ClassId, params: Vec<TypeRef>) -> MemberId {
        self.member(|id| RawMember::constructor(id, owner, params))
    }

    pub fn finish(self) -> MemorySupplier {
        self.supplier
    }
}

/// The `b.pkg.B` class family and the ids of its interesting types.
#[derive(Debug, Clone)]
pub struct BPkg {
    pub supplier: MemorySupplier,
    pub object: ClassId,
    pub b_parent: ClassId,
    pub b_interface: ClassId,
    pub b: ClassId,
    /// `new B() {}` in `bInterfaceMethod` (`b.pkg.B$1`).
    pub anon_in_interface_method: ClassId,
    /// `new B() { bMethodAnon() }` in `bAnon` (`b.pkg.B$2`).
    pub anon_in_b_anon: ClassId,
    pub inner: ClassId,
    pub inner_b: ClassId,
    pub generic_b: ClassId,
    pub inner_c: ClassId,
    pub inner_d: ClassId,
    pub inner_e: ClassId,
    /// `BLocalClass`, declared in the static `InnerE.bLocalClassInAnInnerClass()`.
    pub local_class: ClassId,
}

impl BPkg {
    /// First member of `class` named `name` with `arity` parameters.
    pub fn member(&self, class: ClassId, name: &str, arity: usize) -> MemberId {
        self.supplier
            .find_member(class, name, arity)
            .unwrap_or_else(|| panic!("no member {name}/{arity} on {class}"))
    }

    /// Member of `class` named `name` whose parameters are exactly `params`.
    pub fn member_with(&self, class: ClassId, name: &str, params: &[TypeRef]) -> MemberId {
        self.members_of(class)
            .into_iter()
            .find(|m| m.name == name && m.params == params && !m.modifiers.is_bridge)
            .map(|m| m.id)
            .unwrap_or_else(|| panic!("no member {name}{params:?} on {class}"))
    }

    /// The bridge method named `name` on `class`.
    pub fn bridge(&self, class: ClassId, name: &str) -> MemberId {
        self.members_of(class)
            .into_iter()
            .find(|m| m.name == name && m.modifiers.is_bridge)
            .map(|m| m.id)
            .unwrap_or_else(|| panic!("no bridge {name} on {class}"))
    }

    pub fn members_of(&self, class: ClassId) -> Vec<RawMember> {
        self.supplier
            .class(class)
            .map(|desc| {
                desc.members
                    .iter()
                    .filter_map(|id| self.supplier.member(*id))
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub fn b_type() -> TypeRef {
    TypeRef::named("b.pkg.B")
}

fn string_type() -> TypeRef {
    TypeRef::named("java.lang.String")
}

fn public_static() -> Modifiers {
    Modifiers::default().with_static()
}

/// Build the `b.pkg.B` fixture:
///
/// ```java
/// public class B extends BParent implements BInterface { ... }
/// ```
///
/// Members are registered in source order, followed by the bridges javac
/// emits for covariant overrides.
pub fn b_pkg() -> BPkg {
    let mut f = FixtureBuilder::new();

    let object = f.class("java.lang.Object", |c| c);
    f.constructor(object, vec![]);
    f.method(object, "toString", vec![], string_type());
    f.method(object, "hashCode", vec![], TypeRef::int());
    f.method(object, "equals", vec![TypeRef::object()], TypeRef::boolean());

    let b_parent = f.class("b.pkg.BParent", |c| c.extends(object));
    f.constructor(b_parent, vec![]);
    f.method(
        b_parent,
        "bGeneratedSynthetic",
        vec![],
        TypeRef::named("b.pkg.BParent"),
    );

    let b_interface = f.interface("b.pkg.BInterface");
    f.member(|id| {
        RawMember::method(id, b_interface, "bInterfaceMethod", vec![], TypeRef::Void)
            .with_modifiers(Modifiers::default().with_abstract())
    });

    let b = f.class("b.pkg.B", |c| c.extends(b_parent).implements(b_interface));
    f.member(|id| RawMember::field(id, b, "b", b_type()).with_visibility(Visibility::Private));
    f.member(|id| {
        RawMember::field(id, b, "bField", TypeRef::int()).with_visibility(Visibility::Private)
    });
    f.constructor(b, vec![]);
    f.constructor(b, vec![b_type()]);
    f.member(|id| {
        RawMember::method(id, b, "create", vec![], b_type()).with_modifiers(public_static())
    });
    f.method(b, "bMethod", vec![], TypeRef::Void);
    f.method(
        b,
        "bMethodWithAnArrayArgument",
        vec![TypeRef::array(TypeRef::named("b.pkg.BInterface"))],
        TypeRef::int(),
    );
    f.method(b, "getB", vec![], b_type());
    f.method(b, "getSyntheticB", vec![], b_type());
    f.method(b, "setSyntheticB", vec![b_type()], TypeRef::Void);
    f.method(b, "bGeneratedSynthetic", vec![], b_type());
    f.method(b, "isSyntheticBooleanB", vec![], TypeRef::boolean());
    f.method(b, "setSyntheticBooleanB", vec![TypeRef::boolean()], TypeRef::Void);
    f.method(b, "getNonSyntheticB", vec![], b_type());
    f.method(b, "setNonSyntheticB", vec![b_type()], TypeRef::Void);
    f.method(b, "isNonSyntheticBooleanB", vec![], TypeRef::boolean());
    f.method(b, "setNonSyntheticBooleanB", vec![TypeRef::boolean()], TypeRef::Void);
    f.method(b, "getterB", vec![], b_type());
    f.method(b, "setterB", vec![b_type()], TypeRef::Void);
    f.method(b, "getterBooleanB", vec![], TypeRef::boolean());
    f.method(b, "setterBooleanB", vec![TypeRef::boolean()], TypeRef::Void);
    f.field(b, "conflictingField", TypeRef::int());
    f.method(b, "getConflictingField", vec![], TypeRef::int());
    f.member(|id| {
        RawMember::field(id, b, "protectedField", TypeRef::int())
            .with_visibility(Visibility::Protected)
    });
    f.method(b, "getProtectedFieldWithoutConflict", vec![], TypeRef::int());
    f.method(b, "bOverloaded", vec![], TypeRef::Void);
    f.method(b, "bOverloaded", vec![TypeRef::int()], TypeRef::Void);
    f.method(b, "bOverloaded", vec![TypeRef::boolean()], TypeRef::Void);
    f.method(b, "commonOverloaded", vec![TypeRef::object()], TypeRef::Void);
    f.method(b, "commonOverloaded", vec![b_type()], TypeRef::Void);
    f.method(b, "unmappedOverloaded", vec![TypeRef::object()], TypeRef::Void);
    f.method(b, "unmappedOverloaded", vec![b_type()], TypeRef::Void);
    let b_interface_method = f.method(b, "bInterfaceMethod", vec![], TypeRef::Void);
    let anon_in_interface_method = f.class("b.pkg.B$1", |c| {
        c.declared_in(b, b_interface_method, false).extends(b)
    });
    f.method(
        b,
        "bLambdaWithGeneric",
        vec![TypeRef::class(
            "java.util.function.Supplier",
            vec![string_type()],
        )],
        TypeRef::Void,
    );
    f.method(b, "bArrayMethod", vec![], TypeRef::array(TypeRef::byte()));
    f.method(b, "bCallArrayMethod", vec![], TypeRef::Void);
    let b_anon = f.method(b, "bAnon", vec![], TypeRef::Void);
    let anon_in_b_anon = f.class("b.pkg.B$2", |c| c.declared_in(b, b_anon, false).extends(b));
    f.method(anon_in_b_anon, "bMethodAnon", vec![], TypeRef::Void);
    f.member(|id| {
        RawMember::method(id, b, "bGeneratedSynthetic", vec![], TypeRef::named("b.pkg.BParent"))
            .with_modifiers(Modifiers::default().with_bridge())
    });

    let inner = f.class("b.pkg.B$Inner", |c| c.inner_of(b).extends(object));
    f.member(|id| {
        RawMember::field(id, inner, "bField", TypeRef::int()).with_visibility(Visibility::Private)
    });
    let inner_b = f.class("b.pkg.B$InnerB", |c| c.inner_of(b).extends(object));
    let generic_b = f.class("b.pkg.B$GenericB", |c| {
        c.inner_of(b)
            .extends(object)
            .with_type_params(vec![TypeParam::new("T")])
    });

    let inner_c_type = TypeRef::named("b.pkg.B$InnerC");
    let inner_c = f.class("b.pkg.B$InnerC", |c| c.static_member_of(b).extends(object));
    f.method(inner_c, "getB", vec![], inner_c_type.clone());
    let inner_d = f.class("b.pkg.B$InnerC$InnerD", |c| {
        c.static_member_of(inner_c).extends(inner_c)
    });
    f.method(inner_d, "getB", vec![], TypeRef::named("b.pkg.B$InnerC$InnerD"));
    f.member(|id| {
        RawMember::method(id, inner_d, "getB", vec![], inner_c_type)
            .with_modifiers(Modifiers::default().with_bridge())
    });

    let inner_e = f.class("b.pkg.B$InnerE", |c| c.static_member_of(b).extends(object));
    let local_host = f.member(|id| {
        RawMember::method(id, inner_e, "bLocalClassInAnInnerClass", vec![], TypeRef::Void)
            .with_modifiers(public_static())
    });
    let local_class = f.class("b.pkg.B$InnerE$1BLocalClass", |c| {
        c.declared_in(inner_e, local_host, true).extends(object)
    });
    f.member(|id| {
        RawMember::method(id, local_class, "bMethod", vec![], TypeRef::Void)
            .with_visibility(Visibility::Package)
    });

    BPkg {
        supplier: f.finish(),
        object,
        b_parent,
        b_interface,
        b,
        anon_in_interface_method,
        anon_in_b_anon,
        inner,
        inner_b,
        generic_b,
        inner_c,
        inner_d,
        inner_e,
        local_class,
    }
}
