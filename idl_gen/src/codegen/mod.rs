pub mod c;
pub mod c_gen;
pub mod options;
pub mod writer;

/* Default output directory of the codegen command */
pub const OUTPUT_DIR: &str = "generated";
