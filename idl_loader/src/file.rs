use crate::error::LoadError;
use idl_types::Module;
use serde_derive::{Deserialize, Serialize};
use std::path::Path;

/// One schema document: the files it imports and the modules it declares.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct IdlFile {
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl IdlFile {
    /* Parse a schema document; `origin` only names the source in errors */
    pub fn from_yaml(contents: &str, origin: &Path) -> Result<Self, LoadError> {
        serde_yml::from_str(contents).map_err(|source| LoadError::Yaml {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents, path)
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }
}
