use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("'{context}': reference to '{name}' is not linked to a declaration")]
    UnlinkedReference { name: String, context: String },

    #[error("'{context}': void is not a value type")]
    VoidValue { context: String },

    #[error("'{context}': dimension {index} has size 0")]
    EmptyDimension { context: String, index: usize },

    #[error("'{context}': declaration has no scoped name")]
    UnscopedDeclaration { context: String },

    #[error("'{0}': constructed type has no members")]
    EmptyDeclaration(String),

    #[error("'{context}': dispatch code '{code}' or its handler is generated twice")]
    DuplicateDispatchCase { code: String, context: String },

    #[error("invalid generator configuration '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
