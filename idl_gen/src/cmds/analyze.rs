/* Analyze command - resolved declarations and attribute roles per module */

use anyhow::Context;
use clap::ValueEnum;
use idl_gen::codegen::c_gen::DispatchTable;
use idl_gen::idl::resolved::{ResolvedType, module_declarations, resolve_declaration};
use idl_gen::idl::roles::{Role, roles_for};
use idl_loader::Schema;
use indexmap::IndexMap;
use serde_derive::Serialize;
use std::path::PathBuf;
use super::common::load_and_link;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ModuleReport {
    declarations: IndexMap<String, ResolvedType>,
    attributes: IndexMap<String, Vec<Role>>,
    dispatch_cases: usize,
}

fn build_report(schema: &Schema) -> anyhow::Result<IndexMap<String, ModuleReport>> {
    let mut report = IndexMap::new();
    for loaded in schema.main_modules() {
        let module = &loaded.module;
        let mut declarations = IndexMap::new();
        for declaration in module_declarations(module) {
            let resolved = resolve_declaration(declaration)
                .with_context(|| format!("failed to resolve {}", declaration.context()))?;
            declarations.insert(declaration.scoped_name().to_string(), resolved);
        }

        let mut attributes = IndexMap::new();
        for iface in module.attribute_interfaces() {
            for op in &iface.operations {
                attributes.insert(format!("{}::{}", iface.name, op.name), roles_for(iface, op));
            }
        }

        let table = DispatchTable::build(module)
            .with_context(|| format!("failed to build dispatch table for module {}", module.name))?;
        report.insert(
            module.name.clone(),
            ModuleReport {
                declarations,
                attributes,
                dispatch_cases: table.case_count(),
            },
        );
    }
    Ok(report)
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::None => "service",
        Role::Getter => "getter",
        Role::Setter => "setter",
    }
}

fn print_text(report: &IndexMap<String, ModuleReport>) {
    for (module, module_report) in report {
        println!("\n[*] Module: {}", module);
        println!("  Declarations:");
        for (name, resolved) in &module_report.declarations {
            println!(
                "    - {} -> {}{} ({})",
                name,
                resolved.target_name,
                resolved.array_suffix,
                if resolved.is_base { "base" } else { "by pointer" }
            );
        }
        if !module_report.attributes.is_empty() {
            println!("  Attributes:");
            for (name, roles) in &module_report.attributes {
                let labels: Vec<&str> = roles.iter().map(|role| role_label(*role)).collect();
                println!("    - {}: {}", name, labels.join(", "));
            }
        }
        println!("  Dispatch cases: {}", module_report.dispatch_cases);
    }
}

/* Execute the analyze command */
pub fn run(
    files: Vec<PathBuf>,
    include_dirs: Vec<PathBuf>,
    format: ReportFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let schema = load_and_link(&files, &include_dirs, verbose)?;
    let report = build_report(&schema)?;

    match format {
        ReportFormat::Text => {
            println!("IDL Generator - Schema Analysis");
            println!("===============================");
            print_text(&report);
            println!();
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
            println!("{}", json);
        }
    }
    Ok(())
}
