use crate::error::{Error, Result};
use crate::ty::{PrimitiveType, TypeRef, OBJECT};

/// A parsed JVM method descriptor. `return_type` is [`TypeRef::Void`] for `V`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
}

pub fn parse_field_descriptor(desc: &str) -> Result<TypeRef> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let Some(mut rest) = desc.strip_prefix('(') else {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    };

    let mut params = Vec::new();
    loop {
        if let Some(after) = rest.strip_prefix(')') {
            rest = after;
            break;
        }
        if rest.is_empty() {
            return Err(Error::UnexpectedEof);
        }
        let (param, after) = parse_field_type(rest)?;
        params.push(param);
        rest = after;
    }

    if rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }

    let (return_type, rest) = match rest.strip_prefix('V') {
        Some(after) => (TypeRef::Void, after),
        None => parse_field_type(rest)?,
    };

    if !rest.is_empty() {
        return Err(Error::InvalidDescriptor(desc.to_string()));
    }

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

/// Array types may have at most this many dimensions (JVMS 4.3.2).
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

fn parse_field_type(input: &str) -> Result<(TypeRef, &str)> {
    let element = input.trim_start_matches('[');
    let dimensions = input.len() - element.len();
    if dimensions > MAX_ARRAY_DIMENSIONS {
        return Err(Error::InvalidDescriptor(input.to_string()));
    }

    let (mut ty, rest) = parse_element_type(element)?;
    for _ in 0..dimensions {
        ty = TypeRef::array(ty);
    }
    Ok((ty, rest))
}

fn parse_element_type(input: &str) -> Result<(TypeRef, &str)> {
    let Some(first) = input.chars().next() else {
        return Err(Error::UnexpectedEof);
    };
    if let Some(p) = PrimitiveType::from_descriptor_char(first) {
        return Ok((TypeRef::Primitive(p), &input[1..]));
    }
    match first {
        'L' => {
            let Some(end) = input.find(';') else {
                return Err(Error::InvalidDescriptor(input.to_string()));
            };
            let internal = &input[1..end];
            if internal.is_empty() {
                return Err(Error::InvalidDescriptor(input.to_string()));
            }
            Ok((TypeRef::named(internal.replace('/', ".")), &input[end + 1..]))
        }
        _ => Err(Error::InvalidDescriptor(input.to_string())),
    }
}

/// Render `ty` as a JVM field descriptor.
///
/// Type arguments are dropped and type variables render as `Object`; erase
/// with [`crate::erase`] first when the bound matters. `void` renders as `V`.
pub fn field_descriptor(ty: &TypeRef) -> String {
    let mut out = String::new();
    push_descriptor(&mut out, ty);
    out
}

/// Render a parameter list as `(...)`, the part of a method descriptor that
/// identifies an overload.
pub fn params_descriptor(params: &[TypeRef]) -> String {
    let mut out = String::from("(");
    for param in params {
        push_descriptor(&mut out, param);
    }
    out.push(')');
    out
}

fn push_descriptor(out: &mut String, ty: &TypeRef) {
    match ty {
        TypeRef::Void => out.push('V'),
        TypeRef::Primitive(p) => out.push(p.descriptor_char()),
        TypeRef::Class(class) => push_object(out, &class.name),
        TypeRef::Array(element) => {
            out.push('[');
            push_descriptor(out, element);
        }
        TypeRef::TypeVar(_) => push_object(out, OBJECT),
    }
}

fn push_object(out: &mut String, binary_name: &str) {
    out.push('L');
    out.extend(binary_name.chars().map(|c| if c == '.' { '/' } else { c }));
    out.push(';');
}
