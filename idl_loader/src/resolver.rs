use idl_types::Module;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::LoadError;
use crate::file::IdlFile;

/// A module together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModule {
    pub module: Module,
    pub path: PathBuf,
    /* True when the file was named by the caller rather than reached by import */
    pub main_file: bool,
}

/* Import resolver for loading schema files and the files they import */
pub struct ImportResolver {
    /* Track loaded files so each canonical path is read once */
    loaded_files: HashSet<PathBuf>,

    /* Files whose imports are still being loaded, to detect cycles */
    in_progress: Vec<PathBuf>,

    /* Include directories for searching imports */
    include_dirs: Vec<PathBuf>,

    /* All collected modules, imports before importers */
    modules: Vec<LoadedModule>,

    /* Indices into `modules` per canonical file */
    file_modules: HashMap<PathBuf, Vec<usize>>,
}

impl ImportResolver {
    /* Create a new import resolver with the given include directories */
    pub fn new(include_dirs: Vec<PathBuf>) -> Self {
        Self {
            loaded_files: HashSet::new(),
            in_progress: Vec::new(),
            include_dirs,
            modules: Vec::new(),
            file_modules: HashMap::new(),
        }
    }

    /* Resolve an import path relative to a base file or include directories */
    fn resolve_import_path(
        &self,
        import_path: &str,
        base_file: &Path,
    ) -> Result<PathBuf, LoadError> {
        /* First try relative to the base file's directory */
        if let Some(parent) = base_file.parent() {
            let relative_path = parent.join(import_path);
            if relative_path.exists() {
                return canonicalize(&relative_path);
            }
        }

        /* Then try each include directory */
        for include_dir in &self.include_dirs {
            let include_path = include_dir.join(import_path);
            if include_path.exists() {
                return canonicalize(&include_path);
            }
        }

        Err(LoadError::ImportNotFound {
            import: import_path.to_string(),
            base: base_file.to_path_buf(),
        })
    }

    /* Load a file named by the caller; its modules generate output */
    pub fn load_main_file(&mut self, file_path: &Path) -> Result<(), LoadError> {
        let canonical_path = canonicalize(file_path)?;
        self.load_file_with_imports(&canonical_path)?;
        if let Some(indices) = self.file_modules.get(&canonical_path) {
            for &index in indices {
                self.modules[index].main_file = true;
            }
        }
        Ok(())
    }

    /* Load a schema file and recursively load its imports */
    fn load_file_with_imports(&mut self, canonical_path: &Path) -> Result<(), LoadError> {
        if self.in_progress.iter().any(|path| path == canonical_path) {
            return Err(LoadError::ImportCycle(canonical_path.to_path_buf()));
        }

        /* Skip if already loaded */
        if self.loaded_files.contains(canonical_path) {
            debug!("skipping already loaded file {}", canonical_path.display());
            return Ok(());
        }

        debug!("loading schema file {}", canonical_path.display());
        let file = IdlFile::load(canonical_path)?;

        self.in_progress.push(canonical_path.to_path_buf());
        for import in file.imports() {
            debug!("resolving import {} from {}", import, canonical_path.display());
            let import_path = self.resolve_import_path(import, canonical_path)?;
            self.load_file_with_imports(&import_path)?;
        }
        self.in_progress.pop();

        self.loaded_files.insert(canonical_path.to_path_buf());
        let mut indices = Vec::with_capacity(file.modules.len());
        for module in file.modules {
            debug!("collected module {} from {}", module.name, canonical_path.display());
            indices.push(self.modules.len());
            self.modules.push(LoadedModule {
                module,
                path: canonical_path.to_path_buf(),
                main_file: false,
            });
        }
        self.file_modules.insert(canonical_path.to_path_buf(), indices);

        Ok(())
    }

    /* Get the number of loaded files */
    pub fn loaded_file_count(&self) -> usize {
        self.loaded_files.len()
    }

    pub fn modules(&self) -> &[LoadedModule] {
        &self.modules
    }

    pub fn into_modules(self) -> Vec<LoadedModule> {
        self.modules
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, LoadError> {
    path.canonicalize().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
