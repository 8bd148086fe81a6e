use crate::codegen::writer::{CodeWriter, cw_writeln};
use crate::error::GenError;
use crate::idl::resolved::{
    Declaration, module_declarations, resolve_declaration, resolve_declarator,
};
use super::helpers::{begin_header, end_header, escape_c_keyword};
use super::interface::{EmissionTarget, emit_prototypes};
use super::{ModuleContext, Unit};
use tracing::debug;

/* Emit the C declaration of a single struct, enum or typedef */
pub fn emit_declaration(declaration: Declaration<'_>, w: &mut CodeWriter) -> Result<(), GenError> {
    let resolved = resolve_declaration(declaration)?;
    let context = declaration.context();
    debug!("declaring {} as {}", context, resolved.target_name);

    match declaration {
        Declaration::Struct(def) => {
            let mut fields = Vec::with_capacity(def.members.len());
            for member in &def.members {
                let member_context = format!("{}::{}", context, member.name);
                let field = resolve_declarator(&member.member_type, &member.dims, &member_context)?;
                fields.push(field.declarator(&escape_c_keyword(&member.name)));
            }
            w.writeln("typedef struct");
            w.open_brace();
            for field in fields {
                cw_writeln!(w, "{};", field);
            }
            w.close_brace(&format!(" {};", resolved.target_name));
        }
        Declaration::Enum(def) => {
            w.writeln("typedef enum");
            w.open_brace();
            let enumerators: Vec<String> = def
                .enumerators
                .iter()
                .map(|enumerator| escape_c_keyword(enumerator))
                .collect();
            w.writeln(&enumerators.join(", "));
            w.close_brace(&format!(" {};", resolved.target_name));
        }
        Declaration::Typedef(def) => {
            let alias = resolve_declarator(&def.alias, &def.dims, &context)?;
            cw_writeln!(w, "typedef {};", alias.declarator(&resolved.target_name));
        }
    }
    w.blank_line();
    Ok(())
}

/* Type declarations followed by the server-side prototypes of every interface */
pub fn emit_declarations_header(ctx: &ModuleContext<'_>) -> Result<String, GenError> {
    let unit = Unit::Declarations;
    let mut w = begin_header(ctx, unit, &[]);

    for declaration in module_declarations(ctx.module) {
        emit_declaration(declaration, &mut w)?;
    }
    emit_prototypes(ctx, EmissionTarget::Declaration, &mut w)?;

    Ok(end_header(w, ctx, unit))
}
