/* Common utilities shared between analyze and codegen commands */

use anyhow::Context;
use idl_gen::GeneratorOptions;
use idl_loader::{Schema, load_schema};
use std::path::{Path, PathBuf};

/* Load the main files with their imports and link every reference */
pub fn load_and_link(
    files: &[PathBuf],
    include_dirs: &[PathBuf],
    verbose: bool,
) -> anyhow::Result<Schema> {
    if verbose {
        println!("[~] Loading schema files and resolving imports...");
        for file in files {
            println!("    - {}", file.display());
        }
        if !include_dirs.is_empty() {
            println!("    Include directories:");
            for dir in include_dirs {
                println!("      - {}", dir.display());
            }
        }
    }

    let schema = load_schema(files, include_dirs)
        .with_context(|| format!("failed to load schema from {} file(s)", files.len()))?;

    if verbose {
        println!(
            "[✓] Loaded {} module(s), {} from main files",
            schema.modules.len(),
            schema.main_modules().count()
        );
    }
    Ok(schema)
}

/* Generator options from `--config`, defaults otherwise */
pub fn load_options(config: Option<&Path>) -> anyhow::Result<GeneratorOptions> {
    match config {
        Some(path) => GeneratorOptions::load(path)
            .with_context(|| format!("failed to load generator options from {}", path.display())),
        None => Ok(GeneratorOptions::default()),
    }
}
