use crate::extractor::Framework;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Go API Documentation Generator - Automatically generate route and OpenAPI
/// documentation from Go web projects
#[derive(Parser, Debug)]
#[command(name = "openapi-from-go")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the entry Go file (main.go or the router file)
    #[arg(value_name = "ENTRY_FILE")]
    pub entry_file: PathBuf,

    /// The web framework the project registers routes with
    #[arg(short = 'w', long = "framework", value_enum)]
    pub framework: Framework,

    /// Document shape to emit
    #[arg(short = 'e', long = "emit", value_enum, default_value = "routes")]
    pub emit: EmitKind,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// API title for the OpenAPI info section
    #[arg(long = "title", default_value = "API Documentation")]
    pub title: String,

    /// API description for the OpenAPI info section
    #[arg(long = "description")]
    pub description: Option<String>,

    /// API version for the OpenAPI info section
    #[arg(long = "api-version", default_value = "1.0.0")]
    pub api_version: String,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Emitted document shapes
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EmitKind {
    /// Flat route-record listing
    Routes,
    /// OpenAPI 3 document
    Openapi,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.entry_file.exists() {
        anyhow::bail!("Entry file does not exist: {}", args.entry_file.display());
    }

    if !args.entry_file.is_file() {
        anyhow::bail!("Entry path is not a file: {}", args.entry_file.display());
    }

    info!("Entry file: {}", args.entry_file.display());
    info!("Framework: {:?}", args.framework);
    info!("Emitting: {:?} as {:?}", args.emit, args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::analyze;
    use crate::emitter::openapi::{build_openapi, Info};
    use crate::emitter::routes::emit_routes;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};

    info!("Starting documentation generation...");

    // Step 1: Discover, extract and assemble the document
    let document = analyze(&args.entry_file, args.framework)?;
    info!("Assembled {} operations", document.operations.len());

    if document.is_empty() {
        log::warn!("No routes found in the project");
    }

    // Step 2: Emit the requested shape
    let content = match args.emit {
        EmitKind::Routes => {
            let records = emit_routes(&document);
            match args.output_format {
                OutputFormat::Json => serialize_json(&records)?,
                OutputFormat::Yaml => serialize_yaml(&records)?,
            }
        }
        EmitKind::Openapi => {
            let info = Info {
                title: args.title.clone(),
                description: args.description.clone(),
                version: args.api_version.clone(),
            };
            let api = build_openapi(&document, info);
            match args.output_format {
                OutputFormat::Json => serialize_json(&api)?,
                OutputFormat::Yaml => serialize_yaml(&api)?,
            }
        }
    };

    // Step 3: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote documentation to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Operations: {}", document.operations.len());
    info!("  - Framework: {:?}", args.framework);

    Ok(())
}
