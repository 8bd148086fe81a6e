//! IDL Schema Loading, Import Resolution and Linking
//!
//! This crate loads YAML schema files from disk, follows their imports and
//! links every declared type reference to the declaration it names, producing
//! a `Schema` ready for code generation.

pub mod error;
pub mod file;
pub mod link;
pub mod resolver;

use std::path::{Path, PathBuf};

// Re-export commonly used types at the crate root
pub use error::{LinkError, LoadError};
pub use file::IdlFile;
pub use link::Linker;
pub use resolver::{ImportResolver, LoadedModule};

// Re-export idl_types for convenience
pub use idl_types;

/// A fully loaded and linked set of modules, imports first.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub modules: Vec<LoadedModule>,
}

impl Schema {
    /// Modules declared in files named by the caller, in load order.
    pub fn main_modules(&self) -> impl Iterator<Item = &LoadedModule> {
        self.modules.iter().filter(|loaded| loaded.main_file)
    }

    pub fn find_module(&self, name: &str) -> Option<&LoadedModule> {
        self.modules.iter().find(|loaded| loaded.module.name == name)
    }
}

/// Loads every file with its imports and links the combined module list.
pub fn load_schema(files: &[PathBuf], include_dirs: &[PathBuf]) -> Result<Schema, LoadError> {
    let mut resolver = ImportResolver::new(include_dirs.to_vec());
    for file in files {
        resolver.load_main_file(file)?;
    }
    let mut modules = resolver.into_modules();
    Linker::new().link(&mut modules)?;
    Ok(Schema { modules })
}

/// Parses and links a single in-memory schema document without imports.
pub fn load_schema_str(contents: &str, origin: &Path) -> Result<Schema, LoadError> {
    let file = IdlFile::from_yaml(contents, origin)?;
    if let Some(import) = file.imports.first() {
        return Err(LoadError::ImportNotFound {
            import: import.clone(),
            base: origin.to_path_buf(),
        });
    }
    let mut modules: Vec<LoadedModule> = file
        .modules
        .into_iter()
        .map(|module| LoadedModule {
            module,
            path: origin.to_path_buf(),
            main_file: true,
        })
        .collect();
    Linker::new().link(&mut modules)?;
    Ok(Schema { modules })
}
