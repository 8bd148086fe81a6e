use crate::codegen::writer::{CodeWriter, cw_writeln};
use crate::error::GenError;
use crate::idl::resolved::{
    Declaration, ResolvedType, array_suffix, module_declarations, resolve_declaration,
    resolve_value_type,
};
use super::helpers::{begin_header, begin_source, end_header, escape_c_keyword};
use super::{ModuleContext, Unit};
use tracing::debug;

/// Which half of a codec pair is being emitted.
///
/// Marshal takes base types by value and everything else by pointer;
/// unmarshal always takes a pointer to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecDirection {
    Marshal,
    Unmarshal,
}

impl CodecDirection {
    pub const BOTH: [CodecDirection; 2] = [CodecDirection::Marshal, CodecDirection::Unmarshal];

    pub fn function(self, ty: &ResolvedType) -> String {
        match self {
            CodecDirection::Marshal => ty.marshal_fn(),
            CodecDirection::Unmarshal => ty.unmarshal_fn(),
        }
    }

    /* The `value` parameter of a codec for `ty` */
    pub fn value_parameter(self, ty: &ResolvedType) -> String {
        match (self, ty.is_base) {
            (CodecDirection::Marshal, true) => format!("{} value", ty.target_name),
            _ => format!("{} *value", ty.target_name),
        }
    }

    /* Pass the lvalue `place` of type `ty` to its codec */
    pub fn argument(self, ty: &ResolvedType, place: &str) -> String {
        match (self, ty.is_base) {
            (CodecDirection::Marshal, true) => place.to_string(),
            _ => format!("&{}", place),
        }
    }

    /* `offset += T_marshal(buffer, offset + base, arg);` as a call expression */
    pub fn call(self, ty: &ResolvedType, buffer: &str, offset: &str, place: &str) -> String {
        format!("{}({}, {}, {})", self.function(ty), buffer, offset, self.argument(ty, place))
    }
}

pub fn codec_signature(ty: &ResolvedType, direction: CodecDirection) -> String {
    format!(
        "uint32_t {}(MessageBuffer_t buffer, uint32_t offset, {})",
        direction.function(ty),
        direction.value_parameter(ty)
    )
}

/* One `for` per dimension, outermost first, around `body(indexed_place)` */
fn emit_loop_nest<F>(w: &mut CodeWriter, dims: &[u32], place: &str, body: F)
where
    F: FnOnce(&mut CodeWriter, &str),
{
    let mut indexed = place.to_string();
    for (depth, size) in dims.iter().enumerate() {
        cw_writeln!(w, "for (uint32_t i{depth} = 0; i{depth} < {size}; i{depth}++)");
        w.open_brace();
        indexed.push_str(&format!("[i{}]", depth));
    }
    body(w, &indexed);
    for _ in dims {
        w.close_brace("");
    }
}

fn emit_struct_body(
    def: &idl_types::StructDef,
    context: &str,
    direction: CodecDirection,
    w: &mut CodeWriter,
) -> Result<(), GenError> {
    w.writeln("uint32_t structOffset = 4;");
    for member in &def.members {
        let member_context = format!("{}::{}", context, member.name);
        let element = resolve_value_type(&member.member_type, &member_context)?;
        array_suffix(&member.dims, &member_context)?;
        let place = format!("value->{}", escape_c_keyword(&member.name));
        emit_loop_nest(w, &member.dims, &place, |w, indexed| {
            cw_writeln!(
                w,
                "structOffset += {};",
                direction.call(&element, "buffer", "offset + structOffset", indexed)
            );
        });
    }
    if direction == CodecDirection::Marshal {
        w.writeln("(void)uint32_t_marshal(buffer, offset, structOffset); /* struct length */");
    }
    w.writeln("return structOffset;");
    Ok(())
}

fn emit_enum_body(ty: &ResolvedType, direction: CodecDirection, w: &mut CodeWriter) {
    match direction {
        CodecDirection::Marshal => {
            w.writeln("uint32_t valueInt = (uint32_t)value;");
            w.writeln("return uint32_t_marshal(buffer, offset, valueInt);");
        }
        CodecDirection::Unmarshal => {
            w.writeln("uint32_t valueInt = 0;");
            w.writeln("uint32_t length = uint32_t_unmarshal(buffer, offset, &valueInt);");
            cw_writeln!(w, "*value = ({})valueInt;", ty.target_name);
            w.writeln("return length;");
        }
    }
}

fn emit_typedef_body(
    def: &idl_types::TypedefDef,
    context: &str,
    direction: CodecDirection,
    w: &mut CodeWriter,
) -> Result<(), GenError> {
    let element = resolve_value_type(&def.alias, context)?;
    array_suffix(&def.dims, context)?;
    if def.dims.is_empty() {
        // `value` already has the aliased type
        cw_writeln!(w, "return {}(buffer, offset, value);", direction.function(&element));
        return Ok(());
    }
    w.writeln("uint32_t typeOffset = 0;");
    emit_loop_nest(w, &def.dims, "(*value)", |w, indexed| {
        cw_writeln!(
            w,
            "typeOffset += {};",
            direction.call(&element, "buffer", "offset + typeOffset", indexed)
        );
    });
    w.writeln("return typeOffset;");
    Ok(())
}

/* Both codec functions of one declaration */
pub fn emit_codec_pair(declaration: Declaration<'_>, w: &mut CodeWriter) -> Result<(), GenError> {
    let ty = resolve_declaration(declaration)?;
    let context = declaration.context();
    debug!("synthesizing codecs for {}", context);

    for direction in CodecDirection::BOTH {
        w.writeln(&codec_signature(&ty, direction));
        w.open_brace();
        let body = match declaration {
            Declaration::Struct(def) => emit_struct_body(def, &context, direction, w),
            Declaration::Enum(_) => {
                emit_enum_body(&ty, direction, w);
                Ok(())
            }
            Declaration::Typedef(def) => emit_typedef_body(def, &context, direction, w),
        };
        w.close_brace("");
        body?;
        w.blank_line();
    }
    Ok(())
}

pub fn emit_type_header(ctx: &ModuleContext<'_>) -> Result<String, GenError> {
    let unit = Unit::TypeHeader;
    let mut w = begin_header(ctx, unit, &[Unit::Declarations]);
    for declaration in module_declarations(ctx.module) {
        let ty = resolve_declaration(declaration)?;
        for direction in CodecDirection::BOTH {
            cw_writeln!(w, "extern {};", codec_signature(&ty, direction));
        }
    }
    w.blank_line();
    Ok(end_header(w, ctx, unit))
}

pub fn emit_type_source(ctx: &ModuleContext<'_>) -> Result<String, GenError> {
    let mut w = begin_source(ctx, Unit::TypeSource, &[Unit::TypeHeader]);
    for declaration in module_declarations(ctx.module) {
        emit_codec_pair(declaration, &mut w)?;
    }
    Ok(w.into_inner())
}

#[cfg(test)]
mod tests {
    use idl_types::{
        DeclaredRef, EnumDef, KindClass, Member, PrimitiveKind, ScopedName, StructDef, TypeRef,
        TypedefDef,
    };
    use super::*;

    fn render(declaration: Declaration<'_>) -> String {
        let mut w = CodeWriter::with_indent_spaces(2);
        emit_codec_pair(declaration, &mut w).unwrap();
        w.into_inner()
    }

    fn member(name: &str, member_type: TypeRef, dims: Vec<u32>) -> Member {
        Member {
            name: name.to_string(),
            member_type,
            dims,
        }
    }

    #[test]
    fn struct_codec_prefixes_and_backpatches_length() {
        let def = StructDef {
            name: "Point".to_string(),
            scoped_name: ScopedName::parse("Demo::Point"),
            members: vec![
                member("x", TypeRef::Primitive(PrimitiveKind::Long), vec![]),
                member("y", TypeRef::Primitive(PrimitiveKind::Long), vec![]),
            ],
        };
        let out = render(Declaration::Struct(&def));
        assert!(out.contains("uint32_t Demo_Point_marshal(MessageBuffer_t buffer, uint32_t offset, Demo_Point *value)\n{\n  uint32_t structOffset = 4;\n"));
        assert!(out.contains("structOffset += int32_t_marshal(buffer, offset + structOffset, value->x);"));
        assert!(out.contains("structOffset += int32_t_unmarshal(buffer, offset + structOffset, &value->y);"));
        assert_eq!(
            out.matches("(void)uint32_t_marshal(buffer, offset, structOffset);")
                .count(),
            1,
            "only marshal writes the prefix"
        );
        assert_eq!(out.matches("return structOffset;").count(), 2);
    }

    #[test]
    fn struct_member_dimensions_nest_loops() {
        let point = TypeRef::Declared(DeclaredRef {
            name: "Point".to_string(),
            target: Some(ScopedName::parse("Demo::Point")),
            class: Some(KindClass::Struct),
        });
        let def = StructDef {
            name: "Mesh".to_string(),
            scoped_name: ScopedName::parse("Demo::Mesh"),
            members: vec![member("vertices", point, vec![3, 2])],
        };
        let out = render(Declaration::Struct(&def));
        let expected = "  for (uint32_t i0 = 0; i0 < 3; i0++)\n  {\n    for (uint32_t i1 = 0; i1 < 2; i1++)\n    {\n      structOffset += Demo_Point_marshal(buffer, offset + structOffset, &value->vertices[i0][i1]);\n    }\n  }\n";
        assert!(out.contains(expected), "got:\n{}", out);
    }

    #[test]
    fn enum_codec_goes_through_uint32() {
        let def = EnumDef {
            name: "Color".to_string(),
            scoped_name: ScopedName::parse("Demo::Color"),
            enumerators: vec!["RED".to_string(), "GREEN".to_string()],
        };
        let out = render(Declaration::Enum(&def));
        assert!(out.contains("uint32_t Demo_Color_marshal(MessageBuffer_t buffer, uint32_t offset, Demo_Color value)"));
        assert!(out.contains("uint32_t Demo_Color_unmarshal(MessageBuffer_t buffer, uint32_t offset, Demo_Color *value)"));
        assert!(out.contains("return uint32_t_marshal(buffer, offset, valueInt);"));
        assert!(out.contains("*value = (Demo_Color)valueInt;"));
    }

    #[test]
    fn typedef_without_dims_delegates() {
        let def = TypedefDef {
            name: "Gain".to_string(),
            scoped_name: ScopedName::parse("Demo::Gain"),
            alias: TypeRef::Primitive(PrimitiveKind::Float),
            dims: vec![],
        };
        let out = render(Declaration::Typedef(&def));
        assert!(out.contains("uint32_t Demo_Gain_marshal(MessageBuffer_t buffer, uint32_t offset, Demo_Gain value)\n{\n  return float_marshal(buffer, offset, value);\n}"));
        assert!(out.contains("return float_unmarshal(buffer, offset, value);"));
    }

    #[test]
    fn typedef_with_dims_loops_over_elements() {
        let def = TypedefDef {
            name: "Grid".to_string(),
            scoped_name: ScopedName::parse("Demo::Grid"),
            alias: TypeRef::Primitive(PrimitiveKind::Short),
            dims: vec![3, 2],
        };
        let out = render(Declaration::Typedef(&def));
        assert!(out.contains("Demo_Grid *value)\n{\n  uint32_t typeOffset = 0;\n  for (uint32_t i0 = 0; i0 < 3; i0++)"));
        assert!(out.contains("typeOffset += int16_t_marshal(buffer, offset + typeOffset, (*value)[i0][i1]);"));
        assert!(out.contains("typeOffset += int16_t_unmarshal(buffer, offset + typeOffset, &(*value)[i0][i1]);"));
    }

    #[test]
    fn zero_dimension_fails_with_member_name() {
        let def = StructDef {
            name: "Bad".to_string(),
            scoped_name: ScopedName::parse("Demo::Bad"),
            members: vec![member("cells", TypeRef::Primitive(PrimitiveKind::Octet), vec![0])],
        };
        let mut w = CodeWriter::with_indent_spaces(2);
        match emit_codec_pair(Declaration::Struct(&def), &mut w) {
            Err(GenError::EmptyDimension { context, index }) => {
                assert_eq!(context, "Demo::Bad::cells");
                assert_eq!(index, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
