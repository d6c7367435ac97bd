//! Command-line interface for xsd2jsonschema

#[cfg(feature = "cli")]
use clap::{ArgAction, Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use xsd2jsonschema::{Converter, ConverterConfig, Limits};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsd2jsonschema")]
#[command(author, version, about = "XSD to JSON Schema converter", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an XSD schema into a JSON Schema document
    Convert {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: PathBuf,

        /// Output file (defaults to <stem>_schema.json next to the schema)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the result to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Write compact JSON instead of pretty-printed JSON
        #[arg(long)]
        compact: bool,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Prefix for attribute property names
        #[arg(long)]
        attr_prefix: Option<String>,

        /// Do not emit oneOf for choice groups
        #[arg(long)]
        no_one_of: bool,

        /// Maximum depth of nested complex types
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            schema,
            output,
            stdout,
            compact,
            config,
            attr_prefix,
            no_one_of,
            max_depth,
        } => load_config(config.as_deref())
            .map(|config| apply_overrides(config, attr_prefix, no_one_of, max_depth))
            .and_then(|config| cmd_convert(&schema, output, stdout, compact, config)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>) -> xsd2jsonschema::Result<ConverterConfig> {
    match path {
        Some(path) => ConverterConfig::from_json(&fs::read_to_string(path)?),
        None => Ok(ConverterConfig::default()),
    }
}

#[cfg(feature = "cli")]
fn apply_overrides(
    mut config: ConverterConfig,
    attr_prefix: Option<String>,
    no_one_of: bool,
    max_depth: Option<usize>,
) -> ConverterConfig {
    if let Some(prefix) = attr_prefix {
        config = config.with_attr_prefix(prefix);
    }
    if no_one_of {
        config = config.with_one_of(false);
    }
    if let Some(depth) = max_depth {
        let limits: Limits = config.limits().clone().with_max_type_depth(depth);
        config = config.with_limits(limits);
    }
    config
}

#[cfg(feature = "cli")]
fn cmd_convert(
    schema_path: &Path,
    output: Option<PathBuf>,
    stdout: bool,
    compact: bool,
    config: ConverterConfig,
) -> xsd2jsonschema::Result<()> {
    let content = fs::read(schema_path)?;
    tracing::info!(path = %schema_path.display(), bytes = content.len(), "converting schema");

    let schema = Converter::new(config).convert(&content)?;

    let json_str = if compact {
        serde_json::to_string(&schema)?
    } else {
        serde_json::to_string_pretty(&schema)?
    };

    if stdout {
        println!("{}", json_str);
        return Ok(());
    }

    let output_path = output.unwrap_or_else(|| default_output_path(schema_path));
    fs::write(&output_path, format!("{}\n", json_str))?;
    eprintln!("Wrote {}", output_path.display());
    Ok(())
}

/// `<stem>_schema.json` in the schema's directory
#[cfg(feature = "cli")]
fn default_output_path(schema_path: &Path) -> PathBuf {
    let stem = schema_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema".to_string());
    schema_path.with_file_name(format!("{}_schema.json", stem))
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
