pub mod codec;
pub mod dispatch;
pub mod helpers;
pub mod interface;
pub mod stub;
pub mod types;

use crate::codegen::options::GeneratorOptions;
use crate::codegen::writer::CodeWriter;
use helpers::imported_modules;
use idl_types::Module;

// Re-export main public functions
pub use codec::{CodecDirection, emit_type_header, emit_type_source};
pub use dispatch::{DispatchTable, emit_unmarshal_header, emit_unmarshal_source};
pub use interface::{EmissionTarget, SignatureFormat, render_signature};
pub use stub::{emit_stub_header, emit_stub_source};
pub use types::emit_declarations_header;

/// One generated C file of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Declarations,
    UnmarshalHeader,
    UnmarshalSource,
    StubHeader,
    StubSource,
    TypeHeader,
    TypeSource,
}

impl Unit {
    /* Emission order */
    pub const ALL: [Unit; 7] = [
        Unit::Declarations,
        Unit::UnmarshalHeader,
        Unit::UnmarshalSource,
        Unit::StubHeader,
        Unit::StubSource,
        Unit::TypeHeader,
        Unit::TypeSource,
    ];

    fn suffix(self) -> &'static str {
        match self {
            Unit::Declarations => "",
            Unit::UnmarshalHeader | Unit::UnmarshalSource => "_unmarshal",
            Unit::StubHeader | Unit::StubSource => "_stub",
            Unit::TypeHeader | Unit::TypeSource => "_type",
        }
    }

    pub fn is_header(self) -> bool {
        matches!(
            self,
            Unit::Declarations | Unit::UnmarshalHeader | Unit::StubHeader | Unit::TypeHeader
        )
    }

    /* Unit of each imported module that this unit includes */
    fn imported_include(self) -> Option<Unit> {
        match self {
            Unit::Declarations => Some(Unit::Declarations),
            Unit::TypeHeader | Unit::UnmarshalSource | Unit::StubSource => Some(Unit::TypeHeader),
            Unit::UnmarshalHeader | Unit::StubHeader | Unit::TypeSource => None,
        }
    }

    pub fn file_name(self, module_name: &str) -> String {
        let extension = if self.is_header() { "h" } else { "c" };
        format!("{}{}.{}", module_name, self.suffix(), extension)
    }

    /* `__DEMO_STUB_H__` */
    pub fn header_guard(self, module_name: &str) -> String {
        format!(
            "__{}{}_H__",
            module_name.to_uppercase(),
            self.suffix().to_uppercase()
        )
    }
}

/// Per-module state shared by the emitters.
pub struct ModuleContext<'a> {
    pub module: &'a Module,
    pub options: &'a GeneratorOptions,
    /// C name of the handler status type, e.g. `Demo_ErrorCode`.
    pub error_type: String,
    /// Other modules whose declarations this module refers to.
    pub imports: Vec<String>,
}

impl<'a> ModuleContext<'a> {
    pub fn new(module: &'a Module, options: &'a GeneratorOptions) -> Self {
        Self {
            module,
            options,
            error_type: options.error_type_name(module),
            imports: imported_modules(module),
        }
    }

    pub fn writer(&self) -> CodeWriter {
        CodeWriter::with_indent_spaces(self.options.indent)
    }

    pub fn file_name(&self, unit: Unit) -> String {
        unit.file_name(&self.module.name)
    }

    /* `Common.h` style includes `unit` needs for imported declarations */
    pub fn imported_file_names(&self, unit: Unit) -> Vec<String> {
        match unit.imported_include() {
            Some(included) => self
                .imports
                .iter()
                .map(|module| included.file_name(module))
                .collect(),
            None => Vec::new(),
        }
    }
}
