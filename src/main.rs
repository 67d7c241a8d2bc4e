use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use olap_schema::{input, render_files, Driver, RenderOptions, Schema};

#[derive(Parser)]
#[command(name = "olap-schema")]
#[command(author, version, about = "Canonicalize OLAP schema documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-render schema documents in canonical form
    Render {
        /// Schema files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Target database driver (oracle, luciddb, postgres, mysql, sqlserver, ...)
        #[arg(short, long)]
        driver: Option<Driver>,

        /// Force identifier upper-casing on or off regardless of driver
        #[arg(long)]
        upcase_data_dictionary: Option<bool>,

        /// Output file (single input only; defaults to stdout)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Write each rendered schema into this directory under its file name
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Pretty-print with this many spaces per level
        #[arg(long)]
        indent: Option<usize>,
    },

    /// Check that schema documents are valid without writing anything
    Check {
        /// Schema files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Render {
            inputs,
            driver,
            upcase_data_dictionary,
            output,
            output_dir,
            indent,
        } => {
            let files = input::expand_inputs(&inputs)?;
            if files.is_empty() {
                bail!("no schema files matched {:?}", inputs);
            }
            if output.is_some() && files.len() > 1 {
                bail!("--output accepts a single input, got {} files", files.len());
            }

            let options = RenderOptions {
                driver,
                upcase_data_dictionary,
                indent,
            };
            let rendered = render_files(&files, &options)?;

            if let Some(dir) = output_dir {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("creating output directory {}", dir.display()))?;
                for file in &rendered {
                    let name = file
                        .path
                        .file_name()
                        .with_context(|| format!("no file name in {}", file.path.display()))?;
                    let target = dir.join(name);
                    std::fs::write(&target, &file.xml)
                        .with_context(|| format!("writing {}", target.display()))?;
                    info!("Wrote {}", target.display());
                }
            } else if let Some(path) = output {
                for file in &rendered {
                    std::fs::write(&path, &file.xml)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("Wrote {}", path.display());
                }
            } else {
                for file in &rendered {
                    println!("{}", file.xml);
                }
            }
        }
        Commands::Check { inputs } => {
            let files = input::expand_inputs(&inputs)?;
            for path in &files {
                let content = input::read_schema_file(path)?;
                Schema::from_xml(&content)
                    .with_context(|| format!("invalid schema {}", path.display()))?;
                info!("{}: ok", path.display());
            }
            info!("Checked {} schema file(s)", files.len());
        }
    }

    Ok(())
}
