use crate::error::GenError;
use idl_types::{
    Definition, EnumDef, Module, PrimitiveKind, ScopedName, StructDef, TypeRef, TypedefDef,
};
use serde_derive::Serialize;

/* C spelling of a resolved IDL type */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedType {
    pub target_name: String,
    pub is_base: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub array_suffix: String,
}

impl ResolvedType {
    fn new(target_name: impl Into<String>, is_base: bool) -> Self {
        Self {
            target_name: target_name.into(),
            is_base,
            array_suffix: String::new(),
        }
    }

    /* Prefix of the codec pair; placeholder names may contain spaces */
    pub fn codec_prefix(&self) -> String {
        self.target_name.replace(' ', "_")
    }

    pub fn marshal_fn(&self) -> String {
        format!("{}_marshal", self.codec_prefix())
    }

    pub fn unmarshal_fn(&self) -> String {
        format!("{}_unmarshal", self.codec_prefix())
    }

    /* `<type> <ident><suffix>` */
    pub fn declarator(&self, ident: &str) -> String {
        format!("{} {}{}", self.target_name, ident, self.array_suffix)
    }
}

/* A declaration that owns a C name and a codec pair */
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    Struct(&'a StructDef),
    Enum(&'a EnumDef),
    Typedef(&'a TypedefDef),
}

impl<'a> Declaration<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Declaration::Struct(def) => &def.name,
            Declaration::Enum(def) => &def.name,
            Declaration::Typedef(def) => &def.name,
        }
    }

    pub fn scoped_name(&self) -> &'a ScopedName {
        match self {
            Declaration::Struct(def) => &def.scoped_name,
            Declaration::Enum(def) => &def.scoped_name,
            Declaration::Typedef(def) => &def.scoped_name,
        }
    }

    /* Name used in diagnostics */
    pub fn context(&self) -> String {
        let scoped = self.scoped_name();
        if scoped.is_empty() { self.name().to_string() } else { scoped.to_string() }
    }
}

/* Every declaration of a module in emission order; inline types precede the
  * declaration that contains them */
pub fn module_declarations(module: &Module) -> Vec<Declaration<'_>> {
    let mut out = Vec::new();
    for definition in &module.definitions {
        match definition {
            Definition::Struct(def) => collect_struct(def, &mut out),
            Definition::Enum(def) => out.push(Declaration::Enum(def)),
            Definition::Typedef(def) => {
                collect_inline(&def.alias, &mut out);
                out.push(Declaration::Typedef(def));
            }
        }
    }
    out
}

fn collect_struct<'a>(def: &'a StructDef, out: &mut Vec<Declaration<'a>>) {
    for member in &def.members {
        collect_inline(&member.member_type, out);
    }
    out.push(Declaration::Struct(def));
}

fn collect_inline<'a>(ty: &'a TypeRef, out: &mut Vec<Declaration<'a>>) {
    match ty {
        TypeRef::Struct(def) => collect_struct(def, out),
        TypeRef::Enum(def) => out.push(Declaration::Enum(def)),
        TypeRef::Sequence(element) => collect_inline(element, out),
        TypeRef::Primitive(_) | TypeRef::Declared(_) | TypeRef::StringAlias => {}
    }
}

pub fn primitive_target_name(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Void => "void",
        PrimitiveKind::Short => "int16_t",
        PrimitiveKind::UnsignedShort => "uint16_t",
        PrimitiveKind::Long => "int32_t",
        PrimitiveKind::UnsignedLong => "uint32_t",
        PrimitiveKind::LongLong => "int64_t",
        PrimitiveKind::UnsignedLongLong => "uint64_t",
        PrimitiveKind::Float => "float",
        PrimitiveKind::Double => "double",
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::Char => "char",
        PrimitiveKind::WChar => "wchar_t",
        PrimitiveKind::Octet => "uint8_t",
        // Placeholders, not required to be encodable
        PrimitiveKind::Any => "any",
        PrimitiveKind::TypeCode => "TypeCode",
        PrimitiveKind::Principal => "Principal",
        PrimitiveKind::LongDouble => "long double",
    }
}

/* `A::B<C>` -> `A_B_C_` */
pub fn c_scoped_name(name: &ScopedName) -> String {
    name
        .segments()
        .iter()
        .map(|segment| segment.replace(['<', '>', ':'], "_"))
        .collect::<Vec<_>>()
        .join("_")
}

fn declaration_c_name(scoped: &ScopedName, name: &str) -> Result<String, GenError> {
    if scoped.is_empty() {
        return Err(GenError::UnscopedDeclaration {
            context: name.to_string(),
        });
    }
    Ok(c_scoped_name(scoped))
}

/* Resolve a type node to its C name and base-ness */
pub fn resolve_type(ty: &TypeRef, context: &str) -> Result<ResolvedType, GenError> {
    match ty {
        TypeRef::Primitive(kind) => Ok(ResolvedType::new(primitive_target_name(*kind), true)),
        TypeRef::Declared(reference) => match (&reference.target, reference.class) {
            (Some(target), Some(class)) => {
                Ok(ResolvedType::new(c_scoped_name(target), class.is_base()))
            }
            _ => Err(GenError::UnlinkedReference {
                name: reference.name.clone(),
                context: context.to_string(),
            }),
        },
        TypeRef::StringAlias => Ok(ResolvedType::new("string_t", true)),
        TypeRef::Sequence(element) => {
            let element = resolve_value_type(element, context)?;
            Ok(ResolvedType::new(format!("sequence_t_{}", element.codec_prefix()), false))
        }
        TypeRef::Struct(def) => Ok(ResolvedType::new(
            declaration_c_name(&def.scoped_name, &def.name)?,
            false,
        )),
        TypeRef::Enum(def) => Ok(ResolvedType::new(
            declaration_c_name(&def.scoped_name, &def.name)?,
            true,
        )),
    }
}

/* Like `resolve_type`, but `void` is an error */
pub fn resolve_value_type(ty: &TypeRef, context: &str) -> Result<ResolvedType, GenError> {
    if ty.is_void() {
        return Err(GenError::VoidValue {
            context: context.to_string(),
        });
    }
    resolve_type(ty, context)
}

pub fn array_suffix(dims: &[u32], context: &str) -> Result<String, GenError> {
    let mut suffix = String::new();
    for (index, size) in dims.iter().enumerate() {
        if *size == 0 {
            return Err(GenError::EmptyDimension {
                context: context.to_string(),
                index,
            });
        }
        suffix.push_str(&format!("[{}]", size));
    }
    Ok(suffix)
}

/* A member or typedef target: value type plus its dimension suffix */
pub fn resolve_declarator(
    ty: &TypeRef,
    dims: &[u32],
    context: &str,
) -> Result<ResolvedType, GenError> {
    let mut resolved = resolve_value_type(ty, context)?;
    resolved.array_suffix = array_suffix(dims, context)?;
    Ok(resolved)
}

/* The type a declaration introduces, as seen by users of its name */
pub fn resolve_declaration(declaration: Declaration<'_>) -> Result<ResolvedType, GenError> {
    let context = declaration.context();
    match declaration {
        Declaration::Struct(def) => {
            if def.members.is_empty() {
                return Err(GenError::EmptyDeclaration(context));
            }
            Ok(ResolvedType::new(declaration_c_name(&def.scoped_name, &def.name)?, false))
        }
        Declaration::Enum(def) => {
            if def.enumerators.is_empty() {
                return Err(GenError::EmptyDeclaration(context));
            }
            Ok(ResolvedType::new(declaration_c_name(&def.scoped_name, &def.name)?, true))
        }
        Declaration::Typedef(def) => {
            let alias = resolve_declarator(&def.alias, &def.dims, &context)?;
            let is_base = def.dims.is_empty() && alias.is_base;
            Ok(ResolvedType::new(declaration_c_name(&def.scoped_name, &def.name)?, is_base))
        }
    }
}

#[cfg(test)]
mod tests {
    use idl_types::{DeclaredRef, KindClass};
    use super::*;

    fn declared(name: &str, class: KindClass) -> TypeRef {
        TypeRef::Declared(DeclaredRef {
            name: name.to_string(),
            target: Some(ScopedName::parse(name)),
            class: Some(class),
        })
    }

    #[test]
    fn test_primitive_table() {
        let long = resolve_type(&TypeRef::Primitive(PrimitiveKind::Long), "t").unwrap();
        assert_eq!(long.target_name, "int32_t");
        assert!(long.is_base);
        assert_eq!(primitive_target_name(PrimitiveKind::Octet), "uint8_t");
        assert_eq!(primitive_target_name(PrimitiveKind::UnsignedLongLong), "uint64_t");
        assert_eq!(primitive_target_name(PrimitiveKind::WChar), "wchar_t");
    }

    #[test]
    fn test_declared_base_follows_class() {
        let point = resolve_type(&declared("Demo::Point", KindClass::Struct), "t").unwrap();
        assert_eq!(point.target_name, "Demo_Point");
        assert!(!point.is_base);

        let color = resolve_type(&declared("Demo::Color", KindClass::Enum), "t").unwrap();
        assert!(color.is_base);

        let label = resolve_type(&declared("Demo::Label", KindClass::String), "t").unwrap();
        assert!(label.is_base);

        let grid = resolve_type(&declared("Demo::Grid", KindClass::Array), "t").unwrap();
        assert!(!grid.is_base);
    }

    #[test]
    fn test_sequence_and_string() {
        let seq = TypeRef::Sequence(Box::new(declared("Demo::Point", KindClass::Struct)));
        let resolved = resolve_type(&seq, "t").unwrap();
        assert_eq!(resolved.target_name, "sequence_t_Demo_Point");
        assert!(!resolved.is_base);

        let string = resolve_type(&TypeRef::StringAlias, "t").unwrap();
        assert_eq!(string.target_name, "string_t");
        assert!(string.is_base);
    }

    #[test]
    fn test_array_suffix_and_declarator() {
        let short = TypeRef::Primitive(PrimitiveKind::Short);
        let resolved = resolve_declarator(&short, &[3, 2], "Demo::Grid").unwrap();
        assert_eq!(resolved.array_suffix, "[3][2]");
        assert_eq!(resolved.declarator("cells"), "int16_t cells[3][2]");
    }

    #[test]
    fn test_failures_name_the_declaration() {
        let unlinked = TypeRef::Declared(DeclaredRef::new("Point"));
        match resolve_type(&unlinked, "Demo::Line::start") {
            Err(GenError::UnlinkedReference { name, context }) => {
                assert_eq!(name, "Point");
                assert_eq!(context, "Demo::Line::start");
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            resolve_value_type(&TypeRef::void(), "Demo::f::p"),
            Err(GenError::VoidValue { .. })
        ));
        assert!(matches!(
            resolve_declarator(&TypeRef::Primitive(PrimitiveKind::Long), &[2, 0], "Demo::Grid"),
            Err(GenError::EmptyDimension { index: 1, .. })
        ));
        // void is fine where a return type is expected
        assert_eq!(resolve_type(&TypeRef::void(), "Demo::f").unwrap().target_name, "void");
    }

    #[test]
    fn test_scoped_name_normalisation() {
        assert_eq!(c_scoped_name(&ScopedName::parse("A::B")), "A_B");
        assert_eq!(c_scoped_name(&ScopedName::new(vec!["M".into(), "T<x>".into()])), "M_T_x_");
    }

    #[test]
    fn test_placeholder_codec_prefix() {
        let resolved = resolve_type(&TypeRef::Primitive(PrimitiveKind::LongDouble), "t").unwrap();
        assert_eq!(resolved.target_name, "long double");
        assert_eq!(resolved.marshal_fn(), "long_double_marshal");
    }

    #[test]
    fn test_typedef_declaration_base() {
        let scalar = TypedefDef {
            name: "Gain".to_string(),
            scoped_name: ScopedName::parse("Demo::Gain"),
            alias: TypeRef::Primitive(PrimitiveKind::Float),
            dims: Vec::new(),
        };
        assert!(resolve_declaration(Declaration::Typedef(&scalar)).unwrap().is_base);

        let array = TypedefDef {
            dims: vec![4],
            ..scalar.clone()
        };
        assert!(!resolve_declaration(Declaration::Typedef(&array)).unwrap().is_base);

        let unscoped = TypedefDef {
            scoped_name: ScopedName::root(),
            ..scalar
        };
        assert!(matches!(
            resolve_declaration(Declaration::Typedef(&unscoped)),
            Err(GenError::UnscopedDeclaration { .. })
        ));
    }
}
