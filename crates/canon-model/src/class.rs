use canon_types::TypeParam;
use serde::{Deserialize, Serialize};

use crate::ids::{ClassId, MemberId};
use crate::member::Modifiers;

/// A class, interface, or nested/local/anonymous type as reported by the
/// supplier. Only members declared directly on the type are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub id: ClassId,
    /// Simple name; `None` for anonymous classes.
    pub name: Option<String>,
    /// Binary name, e.g. `b.pkg.B$InnerC$InnerD` or `b.pkg.B$1`.
    pub binary_name: String,
    pub enclosing: Option<ClassId>,
    /// Method or initializer whose body declares a local or anonymous class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_member: Option<MemberId>,
    /// Instances carry a reference to an enclosing instance (inner classes).
    #[serde(default)]
    pub has_outer_instance: bool,
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default)]
    pub modifiers: Modifiers,
    pub superclass: Option<ClassId>,
    #[serde(default)]
    pub interfaces: Vec<ClassId>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub members: Vec<MemberId>,
}

impl ClassDescriptor {
    /// A descriptor whose simple name follows javac's binary naming:
    /// `Outer$Inner` -> `Inner`, `Outer$1Local` -> `Local`, `Outer$1` -> anonymous.
    pub fn new(id: ClassId, binary_name: impl Into<String>) -> Self {
        let binary_name = binary_name.into();
        let name = simple_name_of(&binary_name);
        Self {
            id,
            name,
            binary_name,
            enclosing: None,
            declaring_member: None,
            has_outer_instance: false,
            is_interface: false,
            modifiers: Modifiers::default(),
            superclass: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn interface(id: ClassId, binary_name: impl Into<String>) -> Self {
        let mut desc = Self::new(id, binary_name);
        desc.is_interface = true;
        desc.modifiers.is_abstract = true;
        desc
    }

    /// Static member type of `enclosing`.
    pub fn static_member_of(mut self, enclosing: ClassId) -> Self {
        self.enclosing = Some(enclosing);
        self.modifiers.is_static = true;
        self.has_outer_instance = false;
        self
    }

    /// Non-static member type of `enclosing`.
    pub fn inner_of(mut self, enclosing: ClassId) -> Self {
        self.enclosing = Some(enclosing);
        self.has_outer_instance = true;
        self
    }

    /// Local or anonymous type declared in the body of `member`.
    ///
    /// Types declared inside static members have no enclosing instance.
    pub fn declared_in(mut self, enclosing: ClassId, member: MemberId, in_static: bool) -> Self {
        self.enclosing = Some(enclosing);
        self.declaring_member = Some(member);
        self.has_outer_instance = !in_static;
        self
    }

    pub fn extends(mut self, superclass: ClassId) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: ClassId) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_type_params(mut self, type_params: Vec<TypeParam>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    pub fn is_local(&self) -> bool {
        self.name.is_some() && self.declaring_member.is_some()
    }

    /// Package part of the binary name (empty for the default package).
    pub fn package(&self) -> &str {
        match self.binary_name.rfind('.') {
            Some(dot) => &self.binary_name[..dot],
            None => "",
        }
    }

    /// `name` for named types, or `""` for anonymous ones.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

fn simple_name_of(binary_name: &str) -> Option<String> {
    let after_package = binary_name.rsplit('.').next().unwrap_or(binary_name);
    let last = after_package.rsplit('$').next().unwrap_or(after_package);
    if !after_package.contains('$') {
        return Some(last.to_string());
    }
    let trimmed = last.trim_start_matches(|c: char| c.is_ascii_digit());
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
