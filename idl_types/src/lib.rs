//! IDL Type Definitions
//!
//! This crate contains the schema tree for the IDL code generator: modules,
//! their type declarations and their interfaces. It provides pure data
//! structures without any file I/O, linking or code generation logic.

pub mod name;
pub mod types;

// Re-export commonly used types at the crate root
pub use name::*;
pub use types::*;
