//! Go API Documentation Generator - Command-line tool.
//!
//! This binary analyzes a Go web project statically and generates API
//! documentation from its route registrations: either a flat route listing
//! or an OpenAPI 3 document.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-go [OPTIONS] -w <FRAMEWORK> <ENTRY_FILE>
//! ```
//!
//! # Examples
//!
//! Generate the route listing for a Gin project:
//! ```bash
//! openapi-from-go -w gin ./main.go -o docs/routes.json
//! ```
//!
//! Generate an OpenAPI document for a Fiber project:
//! ```bash
//! openapi-from-go -w fiber ./main.go -e openapi -f yaml -o docs/openapi.yaml
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! openapi-from-go -w mux ./main.go -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_go::cli;

fn main() -> Result<()> {
    // We need to parse args twice: once to get verbose flag, then again after logger init
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Go API documentation generator starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Documentation generation completed successfully");

    Ok(())
}
