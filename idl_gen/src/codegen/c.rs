use crate::codegen::c_gen::{
    ModuleContext, Unit, emit_declarations_header, emit_stub_header, emit_stub_source,
    emit_type_header, emit_type_source, emit_unmarshal_header, emit_unmarshal_source,
};
use crate::codegen::options::GeneratorOptions;
use crate::error::GenError;
use idl_loader::Schema;
use idl_types::Module;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One rendered C file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

pub struct CCodeGenerator<'a> {
    options: &'a GeneratorOptions,
}

impl<'a> CCodeGenerator<'a> {
    pub fn new(options: &'a GeneratorOptions) -> Self {
        Self { options }
    }

    /// Render all units of one module in emission order.
    pub fn generate_module(&self, module: &Module) -> Result<Vec<GeneratedFile>, GenError> {
        let ctx = ModuleContext::new(module, self.options);
        info!("generating C units for module {}", module.name);

        let mut files = Vec::with_capacity(Unit::ALL.len());
        for unit in Unit::ALL {
            let contents = match unit {
                Unit::Declarations => emit_declarations_header(&ctx)?,
                Unit::UnmarshalHeader => emit_unmarshal_header(&ctx)?,
                Unit::UnmarshalSource => emit_unmarshal_source(&ctx)?,
                Unit::StubHeader => emit_stub_header(&ctx)?,
                Unit::StubSource => emit_stub_source(&ctx)?,
                Unit::TypeHeader => emit_type_header(&ctx)?,
                Unit::TypeSource => emit_type_source(&ctx)?,
            };
            debug!("rendered {} ({} bytes)", ctx.file_name(unit), contents.len());
            files.push(GeneratedFile {
                name: ctx.file_name(unit),
                contents,
            });
        }
        Ok(files)
    }

    /// Render every main module, then write the files. Nothing is written
    /// unless all modules rendered.
    pub fn emit_schema(
        &self,
        schema: &Schema,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, GenError> {
        let mut rendered = Vec::new();
        for loaded in schema.main_modules() {
            rendered.extend(self.generate_module(&loaded.module)?);
        }
        write_files(&rendered, output_dir)
    }
}

pub fn write_files(files: &[GeneratedFile], output_dir: &Path) -> Result<Vec<PathBuf>, GenError> {
    fs::create_dir_all(output_dir).map_err(|source| GenError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = output_dir.join(&file.name);
        fs::write(&path, &file.contents).map_err(|source| GenError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
