/* Codegen command - generate C units from interface schemas */

use anyhow::Context;
use idl_gen::CCodeGenerator;
use std::path::PathBuf;
use super::common::{load_and_link, load_options};

/* Execute the codegen command */
pub fn run(
    files: Vec<PathBuf>,
    include_dirs: Vec<PathBuf>,
    output_dir: PathBuf,
    config: Option<PathBuf>,
    verbose: bool,
) -> anyhow::Result<()> {
    if verbose {
        println!("IDL Generator - C Code Generation Tool");
        println!("======================================\n");
        println!("[~] Configuration:");
        println!("  Output directory: {}", output_dir.display());
        println!("  Input files: {}", files.len());
        if let Some(config) = &config {
            println!("  Options file: {}", config.display());
        }
        println!();
    }

    let options = load_options(config.as_deref())?;
    let schema = load_and_link(&files, &include_dirs, verbose)?;

    if schema.main_modules().next().is_none() {
        println!("[!] No modules found in the input files, nothing to generate");
        return Ok(());
    }

    let generator = CCodeGenerator::new(&options);
    let written = generator
        .emit_schema(&schema, &output_dir)
        .with_context(|| format!("code generation into {} failed", output_dir.display()))?;

    println!(
        "[✓] Generated {} file(s) in {}",
        written.len(),
        output_dir.display()
    );
    if verbose {
        for path in &written {
            println!("    - {}", path.display());
        }
    }
    Ok(())
}
