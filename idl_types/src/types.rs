use crate::name::ScopedName;
use serde_derive::{Deserialize, Serialize};

/// Identifier of the interface whose operations are attribute accessors.
pub const ATTRIBUTES_INTERFACE: &str = "Attributes";

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    Void,
    #[serde(alias = "int16")]
    Short,
    #[serde(alias = "uint16")]
    UnsignedShort,
    #[serde(alias = "int32")]
    Long,
    #[serde(alias = "uint32")]
    UnsignedLong,
    #[serde(alias = "int64")]
    LongLong,
    #[serde(alias = "uint64")]
    UnsignedLongLong,
    #[serde(alias = "f32")]
    Float,
    #[serde(alias = "f64")]
    Double,
    LongDouble,
    #[serde(alias = "bool")]
    Boolean,
    Char,
    #[serde(rename = "wchar")]
    WChar,
    #[serde(alias = "uint8", alias = "byte")]
    Octet,
    Any,
    TypeCode,
    Principal,
}

/// Underlying class of a declared name once typedef chains are unaliased.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum KindClass {
    Scalar,
    Enum,
    String,
    Struct,
    Sequence,
    Array,
}

impl KindClass {
    /// Base types travel by value; everything else by pointer.
    pub fn is_base(self) -> bool {
        matches!(self, KindClass::Scalar | KindClass::Enum | KindClass::String)
    }
}

/// A reference to a named declaration, written as the bare or qualified name.
///
/// `target` and `class` stay `None` until the linker resolves the name.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(from = "String", into = "String")]
pub struct DeclaredRef {
    pub name: String,
    pub target: Option<ScopedName>,
    pub class: Option<KindClass>,
}

impl DeclaredRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            target: None,
            class: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.target.is_some() && self.class.is_some()
    }
}

impl From<String> for DeclaredRef {
    fn from(name: String) -> Self {
        Self {
            name,
            target: None,
            class: None,
        }
    }
}

impl From<DeclaredRef> for String {
    fn from(reference: DeclaredRef) -> Self {
        match reference.target {
            Some(target) => target.to_string(),
            None => reference.name,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Declared(DeclaredRef),
    #[serde(rename = "string")]
    StringAlias,
    Sequence(Box<TypeRef>),
    Struct(Box<StructDef>),
    Enum(EnumDef),
}

impl TypeRef {
    pub fn void() -> Self {
        TypeRef::Primitive(PrimitiveKind::Void)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Primitive(PrimitiveKind::Void))
    }

    /// Class of the referenced type, `None` for an unlinked declared name.
    pub fn kind_class(&self) -> Option<KindClass> {
        match self {
            TypeRef::Primitive(_) => Some(KindClass::Scalar),
            TypeRef::Declared(reference) => reference.class,
            TypeRef::StringAlias => Some(KindClass::String),
            TypeRef::Sequence(_) => Some(KindClass::Sequence),
            TypeRef::Struct(_) => Some(KindClass::Struct),
            TypeRef::Enum(_) => Some(KindClass::Enum),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dims: Vec<u32>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct StructDef {
    pub name: String,
    #[serde(skip)]
    pub scoped_name: ScopedName,
    pub members: Vec<Member>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct EnumDef {
    pub name: String,
    #[serde(skip)]
    pub scoped_name: ScopedName,
    pub enumerators: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TypedefDef {
    pub name: String,
    #[serde(skip)]
    pub scoped_name: ScopedName,
    #[serde(rename = "type")]
    pub alias: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dims: Vec<u32>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum Definition {
    Struct(StructDef),
    Enum(EnumDef),
    Typedef(TypedefDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Struct(def) => &def.name,
            Definition::Enum(def) => &def.name,
            Definition::Typedef(def) => &def.name,
        }
    }

    pub fn scoped_name(&self) -> &ScopedName {
        match self {
            Definition::Struct(def) => &def.scoped_name,
            Definition::Enum(def) => &def.scoped_name,
            Definition::Typedef(def) => &def.scoped_name,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    In,
    Out,
    #[serde(rename = "inout", alias = "in-out")]
    InOut,
}

impl Direction {
    /// Carries a value from caller to callee.
    pub fn is_in(self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }

    /// Carries a value from callee back to caller.
    pub fn is_out(self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: TypeRef,
    pub direction: Direction,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Operation {
    pub name: String,
    #[serde(default = "TypeRef::void")]
    pub returns: TypeRef,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raises: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Interface {
    pub name: String,
    #[serde(skip)]
    pub scoped_name: ScopedName,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Interface {
    pub fn is_attribute_container(&self) -> bool {
        self.name == ATTRIBUTES_INTERFACE
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Module {
    pub name: String,
    #[serde(default, with = "serde_yml::with::singleton_map_recursive")]
    pub definitions: Vec<Definition>,
    #[serde(default, with = "serde_yml::with::singleton_map_recursive")]
    pub interfaces: Vec<Interface>,
}

impl Module {
    pub fn attribute_interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter().filter(|iface| iface.is_attribute_container())
    }

    pub fn service_interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter().filter(|iface| !iface.is_attribute_container())
    }
}
