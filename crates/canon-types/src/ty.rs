use std::fmt;

use serde::{Deserialize, Serialize};

pub const OBJECT: &str = "java.lang.Object";
pub const CLONEABLE: &str = "java.lang.Cloneable";
pub const SERIALIZABLE: &str = "java.io.Serializable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn descriptor_char(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
        }
    }

    pub fn from_descriptor_char(c: char) -> Option<Self> {
        Some(match c {
            'Z' => PrimitiveType::Boolean,
            'B' => PrimitiveType::Byte,
            'C' => PrimitiveType::Char,
            'S' => PrimitiveType::Short,
            'I' => PrimitiveType::Int,
            'J' => PrimitiveType::Long,
            'F' => PrimitiveType::Float,
            'D' => PrimitiveType::Double,
            _ => return None,
        })
    }

    /// Binary name of the wrapper class (`int` -> `java.lang.Integer`).
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Some(match name {
            "java.lang.Boolean" => PrimitiveType::Boolean,
            "java.lang.Byte" => PrimitiveType::Byte,
            "java.lang.Character" => PrimitiveType::Char,
            "java.lang.Short" => PrimitiveType::Short,
            "java.lang.Integer" => PrimitiveType::Int,
            "java.lang.Long" => PrimitiveType::Long,
            "java.lang.Float" => PrimitiveType::Float,
            "java.lang.Double" => PrimitiveType::Double,
            _ => return None,
        })
    }
}

/// A (possibly parameterized) class or interface type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    /// Binary name, dot separated, with `$` between nesting levels.
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
}

/// A type as written on a member: field type, return type or parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Void,
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(Box<TypeRef>),
    /// Reference to a type parameter by name; resolved against a [`crate::TypeScope`].
    TypeVar(String),
}

impl TypeRef {
    pub fn class(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Class(ClassType {
            name: name.into(),
            args,
        })
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::class(name, Vec::new())
    }

    pub fn object() -> Self {
        TypeRef::named(OBJECT)
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn type_var(name: impl Into<String>) -> Self {
        TypeRef::TypeVar(name.into())
    }

    pub fn boolean() -> Self {
        TypeRef::Primitive(PrimitiveType::Boolean)
    }

    pub fn int() -> Self {
        TypeRef::Primitive(PrimitiveType::Int)
    }

    pub fn byte() -> Self {
        TypeRef::Primitive(PrimitiveType::Byte)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    pub fn is_primitive_boolean(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveType::Boolean))
    }

    pub fn is_boxed_boolean(&self) -> bool {
        matches!(self, TypeRef::Class(class) if class.name == PrimitiveType::Boolean.boxed_name())
    }

    /// Class, array and type-variable types; everything `null` can inhabit.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            TypeRef::Class(_) | TypeRef::Array(_) | TypeRef::TypeVar(_)
        )
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeRef::Class(class) => Some(&class.name),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Primitive(p) => f.write_str(p.keyword()),
            TypeRef::Class(class) => {
                f.write_str(&class.name)?;
                if !class.args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in class.args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Array(element) => write!(f, "{element}[]"),
            TypeRef::TypeVar(name) => f.write_str(name),
        }
    }
}
