//! IDL to C code generation
//!
//! Resolves linked schema types to C declarators and synthesizes, per
//! module, the type declarations, wire codecs, server-side dispatch and
//! client stubs.

pub mod codegen;
pub mod error;
pub mod idl;

pub use codegen::c::{CCodeGenerator, GeneratedFile};
pub use codegen::options::GeneratorOptions;
pub use error::GenError;
