//! Final document assembly.
//!
//! Merges raw routes with inferred parameters and handler documentation,
//! deduplicates by (path, method), and sorts deterministically. Extraction
//! order depends on tree traversal and must never leak into the output.

use crate::document::{Document, Operation, Response, Schema};
use crate::extractor::RawRoute;
use crate::handler::HandlerAnalyzer;
use crate::params::infer_path_parameters;
use crate::parser::ParsedFile;
use log::{debug, warn};
use std::collections::HashMap;

/// Assembles enriched operations into the final [`Document`].
pub struct DocumentAssembler<'a> {
    analyzer: HandlerAnalyzer<'a>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(handler_files: &'a [ParsedFile]) -> Self {
        Self {
            analyzer: HandlerAnalyzer::new(handler_files),
        }
    }

    /// Builds the document from raw routes.
    ///
    /// Routes whose handler cannot be located are kept with an empty summary
    /// and the default response. Duplicate (path, method) keys collapse to
    /// one operation: an entry is only replaced when it carries no handler
    /// reference and the newcomer does.
    pub fn assemble(&self, raw_routes: Vec<RawRoute>) -> Document {
        let mut operations: Vec<Operation> = Vec::new();
        let mut index: HashMap<(String, String), usize> = HashMap::new();

        for raw in raw_routes {
            let candidate = self.enrich(raw);
            let key = (candidate.path.clone(), candidate.method.clone());

            match index.get(&key) {
                Some(&at) => {
                    let existing = &operations[at];
                    if existing.handler_name.is_empty() && !candidate.handler_name.is_empty() {
                        debug!(
                            "Replacing handlerless duplicate for {} {}",
                            candidate.method, candidate.path
                        );
                        operations[at] = candidate;
                    } else {
                        debug!(
                            "Dropping duplicate registration for {} {}",
                            candidate.method, candidate.path
                        );
                    }
                }
                None => {
                    index.insert(key, operations.len());
                    operations.push(candidate);
                }
            }
        }

        operations.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));

        if operations.is_empty() {
            // Empty output is suspicious; say so once, loudly
            warn!("No routes were extracted; the document is empty");
        }

        Document { operations }
    }

    fn enrich(&self, raw: RawRoute) -> Operation {
        let mut operation = Operation::new(raw.path, raw.method, raw.handler);
        operation.parameters = infer_path_parameters(&operation.path);

        match self.analyzer.resolve(&operation.handler_name) {
            Some(doc) => {
                operation.summary = doc.summary;
                operation.request_body = doc.request_body;
                operation.responses = doc.responses;
            }
            None => {
                if !operation.handler_name.is_empty() {
                    warn!(
                        "Handler not found: {} ({} {})",
                        operation.handler_name, operation.method, operation.path
                    );
                }
                operation.responses.insert(
                    "200".to_string(),
                    Response {
                        description: "Successful response".to_string(),
                        schema: Some(Schema::object()),
                    },
                );
            }
        }

        operation
    }
}
