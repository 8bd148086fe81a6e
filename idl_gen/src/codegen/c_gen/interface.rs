use crate::codegen::writer::{CodeWriter, cw_writeln};
use crate::error::GenError;
use crate::idl::resolved::{resolve_type, resolve_value_type};
use crate::idl::roles::{Role, expand_interface};
use idl_types::{Interface, Operation};
use super::ModuleContext;
use super::helpers::{HANDLER_PARAMETERS, escape_c_keyword, operation_context, sanitize_identifier};

/// Where an operation signature is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionTarget {
    /// Server function prototype in `M.h`.
    Declaration,
    /// Static request handler in `M_unmarshal.c`.
    Unmarshal,
    /// Client stub prototype in `M_stub.h`.
    StubHeader,
    /// Client stub definition in `M_stub.c`.
    StubImpl,
}

type ReturnFormatter<'a> = Box<dyn Fn(&Operation, &str) -> Result<String, GenError> + 'a>;
type NameFormatter<'a> = Box<dyn Fn(&Interface, &Operation, Role) -> String + 'a>;
type ParameterFormatter<'a> = Box<dyn Fn(&Operation, Role, &str) -> Result<String, GenError> + 'a>;

/// The parts of a signature that vary by emission target.
pub struct SignatureFormat<'a> {
    pub qualifier: &'static str,
    pub return_type: ReturnFormatter<'a>,
    pub name: NameFormatter<'a>,
    pub parameters: ParameterFormatter<'a>,
    pub annotate_raises: bool,
    pub terminator: &'static str,
}

impl EmissionTarget {
    pub fn format<'a>(self, ctx: &'a ModuleContext<'a>) -> SignatureFormat<'a> {
        match self {
            EmissionTarget::Declaration => SignatureFormat {
                qualifier: "",
                return_type: Box::new(declared_return),
                name: Box::new(|_: &Interface, op: &Operation, role: Role| role.operation_name(op)),
                parameters: Box::new(|op: &Operation, role: Role, context: &str| {
                    parameter_list(op, role, context)
                }),
                annotate_raises: true,
                terminator: ";",
            },
            EmissionTarget::Unmarshal => SignatureFormat {
                qualifier: "static ",
                return_type: Box::new(move |_: &Operation, _: &str| -> Result<String, GenError> {
                    Ok(ctx.error_type.clone())
                }),
                name: Box::new(|_: &Interface, op: &Operation, role: Role| handler_name(op, role)),
                parameters: Box::new(|_: &Operation, _: Role, _: &str| -> Result<String, GenError> {
                    Ok(HANDLER_PARAMETERS.to_string())
                }),
                annotate_raises: false,
                terminator: ";",
            },
            EmissionTarget::StubHeader | EmissionTarget::StubImpl => {
                let with_instance = ctx.options.stub_instance_argument;
                let parameters =
                    move |op: &Operation, role: Role, context: &str| -> Result<String, GenError> {
                        let list = parameter_list(op, role, context)?;
                        Ok(match (with_instance, list.as_str()) {
                            (false, _) => list,
                            (true, "void") => "uint16_t instanceNum".to_string(),
                            (true, _) => format!("uint16_t instanceNum, {}", list),
                        })
                    };
                SignatureFormat {
                    qualifier: "",
                    return_type: Box::new(declared_return),
                    name: Box::new(|iface: &Interface, op: &Operation, role: Role| {
                        stub_name(iface, op, role)
                    }),
                    parameters: Box::new(parameters),
                    annotate_raises: self == EmissionTarget::StubHeader,
                    terminator: if self == EmissionTarget::StubHeader { ";" } else { "" },
                }
            }
        }
    }
}

fn declared_return(op: &Operation, context: &str) -> Result<String, GenError> {
    Ok(resolve_type(&op.returns, context)?.target_name)
}

/* `get_position_unmarshal` */
pub fn handler_name(op: &Operation, role: Role) -> String {
    format!("{}_unmarshal", role.operation_name(op))
}

/* `Attributes_stubget_position` */
pub fn stub_name(iface: &Interface, op: &Operation, role: Role) -> String {
    format!("{}_stub{}", iface.name, role.operation_name(op))
}

/* Parameter list under `role`; `void` when empty */
pub fn parameter_list(op: &Operation, role: Role, context: &str) -> Result<String, GenError> {
    let mut rendered = Vec::with_capacity(op.parameters.len());
    for param in &op.parameters {
        let param_context = format!("{}::{}", context, param.name);
        let ty = resolve_value_type(&param.param_type, &param_context)?;
        let pointer = if role.passes_by_pointer(param.direction, ty.is_base) { "*" } else { "" };
        rendered.push(format!("{} {}{}", ty.target_name, pointer, escape_c_keyword(&param.name)));
    }
    if rendered.is_empty() {
        return Ok("void".to_string());
    }
    Ok(rendered.join(", "))
}

/// Render one operation signature; every emission target goes through here.
pub fn render_signature(
    iface: &Interface,
    op: &Operation,
    role: Role,
    format: &SignatureFormat<'_>,
) -> Result<String, GenError> {
    let context = operation_context(iface, op);
    let mut signature = format!(
        "{}{} {}({})",
        format.qualifier,
        (format.return_type)(op, &context)?,
        (format.name)(iface, op, role),
        (format.parameters)(op, role, &context)?
    );
    if format.annotate_raises && !op.raises.is_empty() {
        let raises: Vec<String> = op.raises.iter().map(|name| sanitize_identifier(name)).collect();
        signature.push_str(&format!(" /* raises ({}) */", raises.join(", ")));
    }
    signature.push_str(format.terminator);
    Ok(signature)
}

/* One prototype per operation and role, grouped by interface */
pub fn emit_prototypes(
    ctx: &ModuleContext<'_>,
    target: EmissionTarget,
    w: &mut CodeWriter,
) -> Result<(), GenError> {
    let format = target.format(ctx);
    for iface in &ctx.module.interfaces {
        cw_writeln!(w, "/* {} */", iface.name);
        for (op, role) in expand_interface(iface) {
            w.writeln(&render_signature(iface, op, role, &format)?);
        }
        w.blank_line();
    }
    Ok(())
}
