use crate::codegen::writer::{CodeWriter, cw_writeln};
use idl_types::{Definition, Interface, Module, Operation, TypeRef};
use super::{ModuleContext, Unit};

pub const GENERATED_BANNER: [&str; 4] = [
    "/////////////////////////////////////////////////////////////////",
    "// This file is generated by idl-gen from an interface schema. //",
    "// Any modifications to this file will be overwritten.         //",
    "/////////////////////////////////////////////////////////////////",
];

/* Header parameters shared by every request handler and the dispatcher */
pub const HANDLER_PARAMETERS: &str = "RequestMessageBuffer_t request, ResponseMessageBuffer_t response";

pub fn escape_c_keyword(name: &str) -> String {
    const C_KEYWORDS: &[&str] = &[
        // C keywords
        "auto",
        "break",
        "case",
        "char",
        "const",
        "continue",
        "default",
        "do",
        "double",
        "else",
        "enum",
        "extern",
        "float",
        "for",
        "goto",
        "if",
        "inline",
        "int",
        "long",
        "register",
        "restrict",
        "return",
        "short",
        "signed",
        "sizeof",
        "static",
        "struct",
        "switch",
        "typedef",
        "union",
        "unsigned",
        "void",
        "volatile",
        "while",
        // C99 keywords
        "_Bool",
        "_Complex",
        "_Imaginary",
        // Names the generated code itself declares
        "bool",
        "offset",
        "request",
        "response",
        "retval",
        "instanceNum",
    ];

    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if sanitized.is_empty() {
        sanitized.push('_');
    }

    if sanitized
        .chars()
        .next()
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
    {
        sanitized.insert(0, '_');
    }

    if C_KEYWORDS.contains(&sanitized.as_str()) {
        sanitized.push('_');
    }

    sanitized
}

pub fn sanitize_identifier(name: &str) -> String {
    escape_c_keyword(&name.replace("::", "_"))
}

/* Diagnostic name of an operation, e.g. `Demo::Attributes::position` */
pub fn operation_context(iface: &Interface, op: &Operation) -> String {
    if iface.scoped_name.is_empty() {
        format!("{}::{}", iface.name, op.name)
    } else {
        format!("{}::{}", iface.scoped_name, op.name)
    }
}

/* Modules other than `module` that its linked references point into, in first-use order */
pub fn imported_modules(module: &Module) -> Vec<String> {
    let mut found = Vec::new();
    for definition in &module.definitions {
        match definition {
            Definition::Struct(def) => {
                for member in &def.members {
                    collect_imports(&member.member_type, &module.name, &mut found);
                }
            }
            Definition::Enum(_) => {}
            Definition::Typedef(def) => collect_imports(&def.alias, &module.name, &mut found),
        }
    }
    for iface in &module.interfaces {
        for op in &iface.operations {
            collect_imports(&op.returns, &module.name, &mut found);
            for param in &op.parameters {
                collect_imports(&param.param_type, &module.name, &mut found);
            }
        }
    }
    found
}

fn collect_imports(type_ref: &TypeRef, home: &str, found: &mut Vec<String>) {
    match type_ref {
        TypeRef::Declared(reference) if reference.is_linked() => {
            let owner = reference
                .target
                .as_ref()
                .and_then(|target| target.segments().first());
            if let Some(owner) = owner {
                if owner != home && !found.contains(owner) {
                    found.push(owner.clone());
                }
            }
        }
        TypeRef::Sequence(element) => collect_imports(element, home, found),
        TypeRef::Struct(def) => {
            for member in &def.members {
                collect_imports(&member.member_type, home, found);
            }
        }
        TypeRef::Declared(_) | TypeRef::Primitive(_) | TypeRef::StringAlias | TypeRef::Enum(_) => {}
    }
}

fn emit_banner(w: &mut CodeWriter) {
    for line in GENERATED_BANNER {
        w.writeln(line);
    }
}

/* Banner, include guard, configured includes, `extra_includes`, then imported modules */
pub fn begin_header(ctx: &ModuleContext<'_>, unit: Unit, extra_includes: &[Unit]) -> CodeWriter {
    let mut w = ctx.writer();
    let guard = unit.header_guard(&ctx.module.name);
    emit_banner(&mut w);
    cw_writeln!(w, "#ifndef {}", guard);
    cw_writeln!(w, "#define {}", guard);
    w.blank_line();
    for include in &ctx.options.local_includes {
        cw_writeln!(w, "#include \"{}\"", include);
    }
    for include in &ctx.options.system_includes {
        cw_writeln!(w, "#include <{}>", include);
    }
    for include in extra_includes {
        cw_writeln!(w, "#include \"{}\"", ctx.file_name(*include));
    }
    for include in ctx.imported_file_names(unit) {
        cw_writeln!(w, "#include \"{}\"", include);
    }
    w.blank_line();
    w
}

pub fn end_header(mut w: CodeWriter, ctx: &ModuleContext<'_>, unit: Unit) -> String {
    cw_writeln!(w, "#endif // {}", unit.header_guard(&ctx.module.name));
    w.into_inner()
}

/* Banner and the module headers a source file depends on */
pub fn begin_source(ctx: &ModuleContext<'_>, unit: Unit, includes: &[Unit]) -> CodeWriter {
    let mut w = ctx.writer();
    emit_banner(&mut w);
    w.blank_line();
    for include in includes {
        cw_writeln!(w, "#include \"{}\"", ctx.file_name(*include));
    }
    for include in ctx.imported_file_names(unit) {
        cw_writeln!(w, "#include \"{}\"", include);
    }
    w.blank_line();
    w
}
