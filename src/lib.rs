//! Go API Documentation Generator - Automatic documentation from Go web projects.
//!
//! This library generates API documentation by statically analyzing Go source
//! code: it discovers the relevant files from an entry point, recognizes
//! framework-specific route registrations, resolves nested group prefixes,
//! infers request/response schemas from the handlers, and assembles
//! everything into a framework-agnostic [`document::Document`] ready for
//! emission as a flat route listing or an OpenAPI document.
//!
//! # Supported Frameworks
//!
//! - **Gin**: `r.GET("/users/:id", handler)` with `Group` nesting
//! - **Fiber**: `app.Get("/users/:id", handler)` with `Group` nesting
//! - **Gorilla Mux**: `r.HandleFunc("/users/{id}", handler).Methods("GET")`
//!   with `PathPrefix(...).Subrouter()` nesting
//!
//! # Architecture
//!
//! 1. [`discovery`] - Follows imports from the entry file and classifies
//!    discovered files as route or handler files
//! 2. [`parser`] - Parses Go source files into syntax trees (tree-sitter)
//! 3. [`extractor`] - Extracts raw route records through per-framework
//!    grammars sharing one traversal skeleton
//! 4. [`params`] - Infers path parameters from route templates
//! 5. [`schema`] - Expands struct declarations into schemas
//! 6. [`handler`] - Resolves handlers and infers summaries, request bodies
//!    and responses
//! 7. [`assembler`] - Deduplicates, sorts and builds the final document
//! 8. [`emitter`] - Shapes the document as a route listing or OpenAPI
//! 9. [`serializer`] - Serializes emitted documents to JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_from_go::{analyze, extractor::Framework};
//! use openapi_from_go::emitter::openapi::{build_openapi, Info};
//! use openapi_from_go::serializer::serialize_yaml;
//! use std::path::Path;
//!
//! let document = analyze(Path::new("./my-service/main.go"), Framework::Gin).unwrap();
//! let api = build_openapi(&document, Info::default());
//! let yaml = serialize_yaml(&api).unwrap();
//! println!("{}", yaml);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete
//! CLI application.

pub mod assembler;
pub mod cli;
pub mod discovery;
pub mod document;
pub mod emitter;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod params;
pub mod parser;
pub mod schema;
pub mod serializer;

use anyhow::Result;
use document::Document;
use extractor::Framework;
use log::{debug, info};
use std::path::Path;
use std::str::FromStr;

/// Runs the full analysis pipeline for one entry file.
///
/// Discovery, extraction and assembly are synchronous and own all of their
/// state, so independent runs can be parallelized by the caller.
///
/// # Errors
///
/// Fails only on structurally fatal input: a missing entry file. Per-file
/// parse failures and missing handlers degrade to warnings; zero extracted
/// routes still yields a well-formed empty document.
pub fn analyze(entry_file: &Path, framework: Framework) -> Result<Document> {
    if !entry_file.is_file() {
        return Err(error::Error::EntryFileNotFound(entry_file.to_path_buf()).into());
    }

    info!(
        "Analyzing {} as a {:?} project",
        entry_file.display(),
        framework
    );

    let discovered = discovery::FileDiscoverer::discover(entry_file)?;
    debug!(
        "Discovered {} route files and {} handler files",
        discovered.route_files.len(),
        discovered.handler_files.len()
    );

    let grammar = framework.grammar();
    let mut raw_routes = Vec::new();
    for file in &discovered.route_files {
        raw_routes.extend(extractor::walk_route_file(grammar, file));
    }
    info!("Extracted {} raw routes", raw_routes.len());

    let assembler = assembler::DocumentAssembler::new(&discovered.handler_files);
    Ok(assembler.assemble(raw_routes))
}

/// Like [`analyze`], but takes the framework as a string identifier.
///
/// The identifier is validated before any file I/O: an unrecognized value is
/// an immediate configuration error, never a per-file warning.
pub fn analyze_named(entry_file: &Path, framework: &str) -> Result<Document> {
    let framework = Framework::from_str(framework)?;
    analyze(entry_file, framework)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_framework_fails_before_io() {
        // The entry file does not exist; the framework error must win
        let err = analyze_named(Path::new("/nonexistent/main.go"), "unknown-framework")
            .unwrap_err();
        assert!(err.to_string().contains("unsupported framework"));
    }

    #[test]
    fn test_missing_entry_file_is_fatal() {
        let err = analyze_named(Path::new("/nonexistent/main.go"), "gin").unwrap_err();
        assert!(err.to_string().contains("entry file not found"));
    }
}
