use crate::codegen::writer::{CodeWriter, cw_writeln};
use crate::error::GenError;
use crate::idl::resolved::{ResolvedType, resolve_type, resolve_value_type};
use crate::idl::roles::{Role, expand_interface};
use idl_types::{Direction, Interface, Module, Operation};
use serde_derive::Serialize;
use std::collections::HashSet;
use super::codec::CodecDirection;
use super::helpers::{
    HANDLER_PARAMETERS, begin_header, begin_source, end_header, escape_c_keyword, operation_context,
};
use super::interface::{
    EmissionTarget, SignatureFormat, emit_prototypes, handler_name, render_signature,
};
use super::{ModuleContext, Unit};
use tracing::debug;

pub const GET_ATTRIBUTE_CODE: &str = "k_SC_getAttribute";
pub const SET_ATTRIBUTE_CODE: &str = "k_SC_setAttribute";
pub const GET_DISPATCHER: &str = "get_unmarshal";
pub const SET_DISPATCHER: &str = "set_unmarshal";

pub fn service_code(op: &Operation) -> String {
    format!("k_SC_{}", op.name)
}

pub fn attribute_code(op: &Operation) -> String {
    format!("k_AC_{}", op.name)
}

pub fn class_code(iface: &Interface) -> String {
    format!("k_CC_{}", iface.name)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchCase {
    pub code: String,
    pub handler: String,
}

impl DispatchCase {
    fn new(code: impl Into<String>, handler: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            handler: handler.into(),
        }
    }
}

/// Both dispatch levels of a module: service codes, then attribute codes
/// under the reserved get/set service codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchTable {
    pub services: Vec<DispatchCase>,
    pub getters: Vec<DispatchCase>,
    pub setters: Vec<DispatchCase>,
}

impl DispatchTable {
    pub fn build(module: &Module) -> Result<Self, GenError> {
        let mut table = Self {
            services: vec![
                DispatchCase::new(GET_ATTRIBUTE_CODE, GET_DISPATCHER),
                DispatchCase::new(SET_ATTRIBUTE_CODE, SET_DISPATCHER),
            ],
            getters: Vec::new(),
            setters: Vec::new(),
        };
        let mut handlers: HashSet<String> =
            [GET_DISPATCHER.to_string(), SET_DISPATCHER.to_string()].into_iter().collect();

        for iface in &module.interfaces {
            for (op, role) in expand_interface(iface) {
                let (cases, code) = match role {
                    Role::None => (&mut table.services, service_code(op)),
                    Role::Getter => (&mut table.getters, attribute_code(op)),
                    Role::Setter => (&mut table.setters, attribute_code(op)),
                };
                let handler = handler_name(op, role);
                if cases.iter().any(|case| case.code == code) || !handlers.insert(handler.clone()) {
                    return Err(GenError::DuplicateDispatchCase {
                        code,
                        context: operation_context(iface, op),
                    });
                }
                cases.push(DispatchCase::new(code, handler));
            }
        }
        Ok(table)
    }

    pub fn case_count(&self) -> usize {
        self.services.len() + self.getters.len() + self.setters.len()
    }
}

fn emit_switch(w: &mut CodeWriter, selector: &str, cases: &[DispatchCase], default: &str) {
    cw_writeln!(w, "switch ({})", selector);
    w.open_brace();
    for case in cases {
        cw_writeln!(w, "case {}:", case.code);
        w.indent();
        cw_writeln!(w, "return {}(request, response);", case.handler);
        w.dedent();
    }
    w.writeln("default:");
    w.indent();
    cw_writeln!(w, "return {};", default);
    w.dedent();
    w.close_brace("");
}

struct HandlerParameter {
    name: String,
    ty: ResolvedType,
    direction: Direction,
}

/* Read request parameters, call the server function, write the response */
fn emit_handler(
    ctx: &ModuleContext<'_>,
    iface: &Interface,
    op: &Operation,
    role: Role,
    format: &SignatureFormat<'_>,
    w: &mut CodeWriter,
) -> Result<(), GenError> {
    let context = operation_context(iface, op);
    let returns = resolve_type(&op.returns, &context)?;
    let mut params = Vec::with_capacity(op.parameters.len());
    for param in &op.parameters {
        params.push(HandlerParameter {
            name: escape_c_keyword(&param.name),
            ty: resolve_value_type(&param.param_type, &format!("{}::{}", context, param.name))?,
            direction: param.direction,
        });
    }
    debug!("handler {} for {}", handler_name(op, role), context);

    w.writeln(&render_signature(iface, op, role, format)?);
    w.open_brace();
    w.writeln("uint32_t offset = getPayloadOffset_req(request);");
    for param in &params {
        cw_writeln!(w, "{};", param.ty.declarator(&param.name));
    }
    for param in params.iter().filter(|param| role.in_request(param.direction)) {
        cw_writeln!(
            w,
            "offset += {};",
            CodecDirection::Unmarshal.call(&param.ty, "request", "offset", &param.name)
        );
    }

    let arguments: Vec<String> = params
        .iter()
        .map(|param| {
            if role.passes_by_pointer(param.direction, param.ty.is_base) {
                format!("&{}", param.name)
            } else {
                param.name.clone()
            }
        })
        .collect();
    let call = format!("{}({})", role.operation_name(op), arguments.join(", "));
    if op.returns.is_void() {
        cw_writeln!(w, "{};", call);
    } else {
        cw_writeln!(w, "{} retval = {};", returns.target_name, call);
    }

    w.writeln("offset = getPayloadOffset_resp(response);");
    for param in params.iter().filter(|param| role.in_response(param.direction)) {
        cw_writeln!(
            w,
            "offset += {};",
            CodecDirection::Marshal.call(&param.ty, "response", "offset", &param.name)
        );
    }
    w.writeln("setLength_resp(response, offset);");
    if op.returns.is_void() {
        cw_writeln!(w, "return {};", ctx.options.success_status);
    } else {
        cw_writeln!(w, "return ({})retval;", ctx.error_type);
    }
    w.close_brace("");
    w.blank_line();
    Ok(())
}

pub fn emit_unmarshal_header(ctx: &ModuleContext<'_>) -> Result<String, GenError> {
    let unit = Unit::UnmarshalHeader;
    let mut w = begin_header(ctx, unit, &[Unit::Declarations]);
    cw_writeln!(w, "extern {} unmarshal({});", ctx.error_type, HANDLER_PARAMETERS);
    w.blank_line();
    Ok(end_header(w, ctx, unit))
}

pub fn emit_unmarshal_source(ctx: &ModuleContext<'_>) -> Result<String, GenError> {
    let table = DispatchTable::build(ctx.module)?;
    let mut w = begin_source(
        ctx,
        Unit::UnmarshalSource,
        &[Unit::UnmarshalHeader, Unit::TypeHeader],
    );
    let error_type = &ctx.error_type;

    for dispatcher in [GET_DISPATCHER, SET_DISPATCHER] {
        cw_writeln!(w, "static {} {}({});", error_type, dispatcher, HANDLER_PARAMETERS);
    }
    w.blank_line();
    emit_prototypes(ctx, EmissionTarget::Unmarshal, &mut w)?;

    cw_writeln!(w, "{} unmarshal({})", error_type, HANDLER_PARAMETERS);
    w.open_brace();
    emit_switch(
        &mut w,
        "getServiceCode_req(request)",
        &table.services,
        &ctx.options.invalid_service_code,
    );
    w.close_brace("");
    w.blank_line();

    let attribute_dispatchers = [
        (GET_DISPATCHER, &table.getters),
        (SET_DISPATCHER, &table.setters),
    ];
    for (dispatcher, cases) in attribute_dispatchers {
        cw_writeln!(w, "static {} {}({})", error_type, dispatcher, HANDLER_PARAMETERS);
        w.open_brace();
        emit_switch(
            &mut w,
            "getAttributeCode_req(request)",
            cases,
            &ctx.options.invalid_attribute_code,
        );
        w.close_brace("");
        w.blank_line();
    }

    let mut format = EmissionTarget::Unmarshal.format(ctx);
    format.terminator = "";
    for iface in &ctx.module.interfaces {
        for (op, role) in expand_interface(iface) {
            emit_handler(ctx, iface, op, role, &format, &mut w)?;
        }
    }

    Ok(w.into_inner())
}

#[cfg(test)]
mod tests {
    use idl_types::{Parameter, PrimitiveKind, ScopedName, TypeRef};
    use super::*;

    fn op(name: &str, directions: &[Direction]) -> Operation {
        Operation {
            name: name.to_string(),
            returns: TypeRef::void(),
            parameters: directions
                .iter()
                .enumerate()
                .map(|(i, direction)| Parameter {
                    name: format!("v{}", i),
                    param_type: TypeRef::Primitive(PrimitiveKind::Long),
                    direction: *direction,
                })
                .collect(),
            raises: vec![],
        }
    }

    fn iface(name: &str, operations: Vec<Operation>) -> Interface {
        Interface {
            name: name.to_string(),
            scoped_name: ScopedName::parse(&format!("Demo::{}", name)),
            operations,
        }
    }

    #[test]
    fn table_has_one_case_per_role() {
        let module = Module {
            name: "Demo".to_string(),
            definitions: vec![],
            interfaces: vec![
                iface(
                    "Attributes",
                    vec![
                        op("position", &[Direction::Out]),
                        op("gain", &[Direction::InOut]),
                        op("mode", &[Direction::In]),
                    ],
                ),
                iface("Services", vec![op("restart", &[])]),
            ],
        };
        let table = DispatchTable::build(&module).unwrap();

        let codes = |cases: &[DispatchCase]| {
            cases.iter().map(|c| c.code.clone()).collect::<Vec<_>>()
        };
        assert_eq!(
            codes(&table.services),
            vec!["k_SC_getAttribute", "k_SC_setAttribute", "k_SC_restart"]
        );
        assert_eq!(codes(&table.getters), vec!["k_AC_position", "k_AC_gain"]);
        assert_eq!(codes(&table.setters), vec!["k_AC_gain", "k_AC_mode"]);
        assert_eq!(table.getters[0].handler, "get_position_unmarshal");
        assert_eq!(table.case_count(), 7);
    }

    #[test]
    fn duplicate_service_code_is_rejected() {
        let module = Module {
            name: "Demo".to_string(),
            definitions: vec![],
            interfaces: vec![
                iface("Services", vec![op("restart", &[])]),
                iface("More", vec![op("restart", &[Direction::In])]),
            ],
        };
        match DispatchTable::build(&module) {
            Err(GenError::DuplicateDispatchCase { code, context }) => {
                assert_eq!(code, "k_SC_restart");
                assert_eq!(context, "Demo::More::restart");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn switch_rendering() {
        let mut w = CodeWriter::with_indent_spaces(2);
        emit_switch(
            &mut w,
            "getAttributeCode_req(request)",
            &[DispatchCase::new("k_AC_position", "get_position_unmarshal")],
            "e_EC_INVALID_ATTRIBUTE_CODE",
        );
        assert_eq!(
            w.into_inner(),
            "switch (getAttributeCode_req(request))\n{\n  case k_AC_position:\n    return get_position_unmarshal(request, response);\n  default:\n    return e_EC_INVALID_ATTRIBUTE_CODE;\n}\n"
        );
    }
}
