use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("import '{import}' not found relative to '{}' or in include directories", base.display())]
    ImportNotFound { import: String, base: PathBuf },

    #[error("circular import of '{}'", .0.display())]
    ImportCycle(PathBuf),

    #[error(transparent)]
    Link(#[from] LinkError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("unknown type '{name}' referenced from '{context}'")]
    UnknownType { name: String, context: String },

    #[error("duplicate declaration '{0}'")]
    DuplicateDeclaration(String),

    #[error("inline type '{name}' is not allowed in '{context}'")]
    InlineNotAllowed { name: String, context: String },

    #[error("empty name in declaration within '{0}'")]
    EmptyName(String),
}
