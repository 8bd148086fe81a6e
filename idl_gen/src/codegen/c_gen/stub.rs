use crate::codegen::writer::{CodeWriter, cw_writeln};
use crate::error::GenError;
use crate::idl::resolved::{resolve_type, resolve_value_type};
use crate::idl::roles::{Role, expand_interface};
use idl_types::{Interface, Operation};
use super::codec::CodecDirection;
use super::dispatch::{
    GET_ATTRIBUTE_CODE, SET_ATTRIBUTE_CODE, attribute_code, class_code, service_code,
};
use super::helpers::{begin_header, begin_source, end_header, escape_c_keyword, operation_context};
use super::interface::{EmissionTarget, SignatureFormat, emit_prototypes, render_signature};
use super::{ModuleContext, Unit};
use tracing::debug;

/* Build the request, send it, decode the response into the caller's pointers */
fn emit_stub(
    ctx: &ModuleContext<'_>,
    iface: &Interface,
    op: &Operation,
    role: Role,
    format: &SignatureFormat<'_>,
    w: &mut CodeWriter,
) -> Result<(), GenError> {
    let context = operation_context(iface, op);
    let returns = resolve_type(&op.returns, &context)?;
    debug!("stub {}{} for {}", role.prefix(), op.name, context);

    w.writeln(&render_signature(iface, op, role, format)?);
    w.open_brace();
    w.writeln("RequestMessageBuffer_t request;");
    w.writeln("ResponseMessageBuffer_t response;");
    w.writeln("uint32_t offset;");
    cw_writeln!(w, "setClassCode_req(request, {});", class_code(iface));
    let instance = if ctx.options.stub_instance_argument { "instanceNum" } else { "0" };
    cw_writeln!(w, "setInstanceNumber_req(request, {});", instance);
    match role {
        Role::None => {
            cw_writeln!(w, "setServiceCode_req(request, {});", service_code(op));
            w.writeln("setAttributeCode_req(request, 0);");
        }
        Role::Getter | Role::Setter => {
            let reserved = if role == Role::Getter {
                GET_ATTRIBUTE_CODE
            } else {
                SET_ATTRIBUTE_CODE
            };
            cw_writeln!(w, "setServiceCode_req(request, {});", reserved);
            cw_writeln!(w, "setAttributeCode_req(request, {});", attribute_code(op));
        }
    }

    w.writeln("offset = getPayloadOffset_req(request);");
    let mut response = Vec::new();
    for param in &op.parameters {
        let ty = resolve_value_type(&param.param_type, &format!("{}::{}", context, param.name))?;
        let name = escape_c_keyword(&param.name);
        let pointer = role.passes_by_pointer(param.direction, ty.is_base);
        if role.in_request(param.direction) {
            let argument = match (pointer, ty.is_base) {
                (true, true) => format!("*{}", name),
                (false, false) => format!("&{}", name),
                _ => name.clone(),
            };
            cw_writeln!(
                w,
                "offset += {}(request, offset, {});",
                CodecDirection::Marshal.function(&ty),
                argument
            );
        }
        if role.in_response(param.direction) {
            let destination = if pointer { name } else { format!("&{}", name) };
            response.push(format!(
                "offset += {}(response, offset, {});",
                CodecDirection::Unmarshal.function(&ty),
                destination
            ));
        }
    }
    w.writeln("setLength_req(request, offset);");
    cw_writeln!(w, "{}(request, response);", ctx.options.transport_fn);

    if !response.is_empty() {
        w.writeln("offset = getPayloadOffset_resp(response);");
        for line in &response {
            w.writeln(line);
        }
    }
    if !op.returns.is_void() {
        cw_writeln!(w, "return ({})getStatusCode_resp(response);", returns.target_name);
    }
    w.close_brace("");
    w.blank_line();
    Ok(())
}

pub fn emit_stub_header(ctx: &ModuleContext<'_>) -> Result<String, GenError> {
    let unit = Unit::StubHeader;
    let mut w = begin_header(ctx, unit, &[Unit::Declarations]);
    for iface in &ctx.module.interfaces {
        cw_writeln!(w, "struct {}_stub", iface.name);
        w.open_brace();
        w.writeln("uint16_t instanceNum;");
        w.close_brace(";");
        w.blank_line();
    }
    emit_prototypes(ctx, EmissionTarget::StubHeader, &mut w)?;
    Ok(end_header(w, ctx, unit))
}

pub fn emit_stub_source(ctx: &ModuleContext<'_>) -> Result<String, GenError> {
    let mut w = begin_source(ctx, Unit::StubSource, &[Unit::StubHeader, Unit::TypeHeader]);
    let format = EmissionTarget::StubImpl.format(ctx);
    for iface in &ctx.module.interfaces {
        for (op, role) in expand_interface(iface) {
            emit_stub(ctx, iface, op, role, &format, &mut w)?;
        }
    }
    Ok(w.into_inner())
}
