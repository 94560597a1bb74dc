//! jqdefs-gen - Generates the builtin definition table for the jq evaluator.

use std::path::PathBuf;

use clap::Parser;
use jqdefs_gen::{GeneratorConfig, generate_file};

#[derive(Parser)]
#[command(name = "jqdefs-gen")]
#[command(about = "Generate a Rust table of parsed jq builtin definitions")]
#[command(version)]
struct Cli {
    /// Path to the jq definition source
    #[arg(short, long)]
    input: PathBuf,

    /// Output path for the generated file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the generated static
    #[arg(long, default_value = jqdefs_gen::config::DEFAULT_VARIABLE)]
    variable: String,

    /// Namespace the generated file is compiled into
    #[arg(long, default_value = jqdefs_gen::config::DEFAULT_NAMESPACE)]
    namespace: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout may carry the generated file
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = GeneratorConfig {
        variable: cli.variable,
        namespace: cli.namespace,
        ..GeneratorConfig::default()
    };

    generate_file(&cli.input, cli.output.as_deref(), &config)?;
    Ok(())
}
