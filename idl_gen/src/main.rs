use clap::{Parser, Subcommand};
use cmds::analyze::ReportFormat;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cmds;

#[derive(Parser)]
#[command(name = "idl-gen")]
#[command(about = "C marshalling, dispatch and stub generator for IDL interface schemas", long_about = None)]
struct Cli {
    /* Enable verbose output */
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate C units from interface schema files */
    Codegen {
        /* Input YAML schema files */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Include directories for imported schema files */
        #[arg(short = 'i', long = "include-dir", value_name = "DIR")]
        include_dirs: Vec<PathBuf>,

        /* Output directory for generated code */
        #[arg(
            short = 'o',
            long = "output",
            value_name = "DIR",
            default_value = idl_gen::codegen::OUTPUT_DIR
        )]
        output_dir: PathBuf,

        /* Generator options file (YAML) */
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /* Show resolved declarations and attribute roles without writing files */
    Analyze {
        /* Input YAML schema files */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Include directories for imported schema files */
        #[arg(short = 'i', long = "include-dir", value_name = "DIR")]
        include_dirs: Vec<PathBuf>,

        /* Report format */
        #[arg(long = "format", value_enum, default_value = "text")]
        format: ReportFormat,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Codegen {
            files,
            include_dirs,
            output_dir,
            config,
        } => {
            cmds::codegen::run(files, include_dirs, output_dir, config, cli.verbose)?;
        }

        Commands::Analyze {
            files,
            include_dirs,
            format,
        } => {
            cmds::analyze::run(files, include_dirs, format, cli.verbose)?;
        }
    }

    Ok(())
}
