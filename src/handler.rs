//! Handler body analysis.
//!
//! Given a handler reference recorded at a registration site, locates the
//! function declaration across the discovered handler files and infers its
//! request/response documentation from the calls it makes: "parse incoming
//! payload" calls drive the request body, "set status / emit payload"
//! pairings drive the responses, and the leading comment block becomes the
//! summary.

use crate::document::{RequestBody, Response, Schema};
use crate::parser::{call_arguments, call_callee_name, for_each_node, ParsedFile};
use crate::schema::SchemaExpander;
use log::{debug, warn};
use std::collections::BTreeMap;
use tree_sitter::Node;

/// Calls that read the incoming request payload into a local destination.
const BODY_PARSE_CALLS: &[&str] =
    &["BodyParser", "ShouldBindJSON", "BindJSON", "ShouldBind", "Decode"];

/// Documentation extracted from a single handler function.
#[derive(Debug, Clone)]
pub struct HandlerDoc {
    /// Leading doc comment, trimmed; empty when the handler has none
    pub summary: String,
    /// Request body, absent when the handler never parses a payload
    pub request_body: Option<RequestBody>,
    /// Responses keyed by textual status code
    pub responses: BTreeMap<String, Response>,
}

/// Resolves handler references against the discovered handler files.
pub struct HandlerAnalyzer<'a> {
    handler_files: &'a [ParsedFile],
}

impl<'a> HandlerAnalyzer<'a> {
    pub fn new(handler_files: &'a [ParsedFile]) -> Self {
        Self { handler_files }
    }

    /// Locates the named handler and extracts its documentation.
    ///
    /// The reference may be qualified (`handlers.GetUser`); matching uses the
    /// trailing identifier. The first declaration found wins; duplicates are
    /// not an error. Returns `None` when no handler file declares it.
    pub fn resolve(&self, handler_ref: &str) -> Option<HandlerDoc> {
        let bare_name = handler_ref.rsplit('.').next().unwrap_or(handler_ref);
        if bare_name.is_empty() {
            return None;
        }

        for file in self.handler_files {
            if let Some(func) = file.find_function(bare_name) {
                debug!(
                    "Found handler {} in {}",
                    bare_name,
                    file.path.display()
                );
                return Some(self.analyze(file, func));
            }
        }

        None
    }

    fn analyze(&self, file: &ParsedFile, func: Node<'_>) -> HandlerDoc {
        let summary = file.leading_comment(func);

        let (request_body, mut responses) = match func.child_by_field_name("body") {
            Some(body) => (
                self.extract_request_body(file, body),
                self.extract_responses(file, body),
            ),
            None => (None, BTreeMap::new()),
        };

        // Lowest-common-denominator fallback: every handler answers something
        if responses.is_empty() {
            responses.insert("200".to_string(), default_response());
        }

        HandlerDoc {
            summary,
            request_body,
            responses,
        }
    }

    /// Finds the first "parse incoming payload" call and expands the schema
    /// of its destination's declared type.
    fn extract_request_body(&self, file: &ParsedFile, body: Node<'_>) -> Option<RequestBody> {
        let mut destination = None;
        for_each_node(body, &mut |node| {
            if destination.is_some() || node.kind() != "call_expression" {
                return;
            }
            let Some(callee) = call_callee_name(node, &file.source) else {
                return;
            };
            if !BODY_PARSE_CALLS.contains(&callee) {
                return;
            }
            if let Some(arg) = first_argument(node) {
                if let Some(ident) = reference_target(arg) {
                    destination = Some(file.node_text(ident).to_string());
                }
            }
        });

        let var_name = destination?;
        let type_node = resolve_local_type(file, body, &var_name)?;
        let schema = type_to_schema(file, type_node);

        Some(RequestBody {
            required: true,
            schema,
        })
    }

    /// Collects status/payload pairings into a response map.
    fn extract_responses(
        &self,
        file: &ParsedFile,
        body: Node<'_>,
    ) -> BTreeMap<String, Response> {
        let mut responses = BTreeMap::new();
        let mut write_header_status = None;

        for_each_node(body, &mut |node| {
            if node.kind() != "call_expression" {
                return;
            }
            let Some(callee) = call_callee_name(node, &file.source) else {
                return;
            };

            match callee {
                "JSON" | "IndentedJSON" => {
                    let args: Vec<Node> = call_arguments(node);
                    let (status, payload) = if args.len() >= 2 {
                        // gin style: c.JSON(http.StatusOK, payload)
                        (status_code(file, args[0]), Some(args[1]))
                    } else if let Some(payload) = args.first().copied() {
                        // fiber style: c.Status(...).JSON(payload) or c.JSON(payload)
                        let status = chained_status(file, node)
                            .unwrap_or_else(|| Some("200".to_string()));
                        (status, Some(payload))
                    } else {
                        (None, None)
                    };

                    if let (Some(code), Some(payload)) = (status, payload) {
                        let schema = self
                            .payload_schema(file, body, payload)
                            .unwrap_or_else(Schema::object);
                        responses.entry(code.clone()).or_insert(Response {
                            description: format!("{} Response", code),
                            schema: Some(schema),
                        });
                    }
                }
                "WriteHeader" => {
                    // net/http style: w.WriteHeader(status) ... Encode(payload)
                    if let Some(arg) = first_argument(node) {
                        write_header_status = status_code(file, arg);
                    }
                }
                "Encode" => {
                    if let Some(code) = write_header_status.take() {
                        let schema = first_argument(node)
                            .and_then(|payload| self.payload_schema(file, body, payload))
                            .unwrap_or_else(Schema::object);
                        responses.entry(code.clone()).or_insert(Response {
                            description: format!("{} Response", code),
                            schema: Some(schema),
                        });
                    }
                }
                _ => {}
            }
        });

        responses
    }

    /// Resolves a response payload expression to a schema.
    fn payload_schema(
        &self,
        file: &ParsedFile,
        body: Node<'_>,
        payload: Node<'_>,
    ) -> Option<Schema> {
        match payload.kind() {
            "identifier" => {
                let name = file.node_text(payload);
                let type_node = resolve_local_type(file, body, name)?;
                Some(type_to_schema(file, type_node))
            }
            "composite_literal" => {
                let type_node = payload.child_by_field_name("type")?;
                match type_node.kind() {
                    // gin.H / fiber.Map literals stay opaque
                    "type_identifier" => Some(type_to_schema(file, type_node)),
                    "struct_type" => {
                        Some(SchemaExpander::new(file).expand_struct(type_node))
                    }
                    _ => None,
                }
            }
            "unary_expression" => {
                let inner = payload.child_by_field_name("operand")?;
                self.payload_schema(file, body, inner)
            }
            _ => None,
        }
    }
}

/// The synthesized response used when a handler emits nothing recognizable.
fn default_response() -> Response {
    Response {
        description: "Successful response".to_string(),
        schema: Some(Schema::object()),
    }
}

fn first_argument(call: Node<'_>) -> Option<Node<'_>> {
    call_arguments(call).into_iter().next()
}

/// Unwraps `&x` to `x`; returns plain identifiers as-is.
fn reference_target(arg: Node<'_>) -> Option<Node<'_>> {
    match arg.kind() {
        "unary_expression" => {
            let operand = arg.child_by_field_name("operand")?;
            (operand.kind() == "identifier").then_some(operand)
        }
        "identifier" => Some(arg),
        _ => None,
    }
}

/// The status of a `c.Status(x).JSON(...)` chain, if the receiver is one.
/// Returns `None` when there is no `Status` call in the chain, and
/// `Some(None)` when there is one whose code cannot be resolved.
fn chained_status(file: &ParsedFile, json_call: Node<'_>) -> Option<Option<String>> {
    let function = json_call.child_by_field_name("function")?;
    if function.kind() != "selector_expression" {
        return None;
    }
    let operand = function.child_by_field_name("operand")?;
    if operand.kind() != "call_expression" {
        return None;
    }
    if call_callee_name(operand, &file.source) != Some("Status") {
        return None;
    }
    Some(first_argument(operand).and_then(|arg| status_code(file, arg)))
}

/// Resolves a status argument to its textual numeric code.
///
/// Integer literals pass through; `http.StatusX` / `fiber.StatusX` selector
/// names go through a fixed table. Unknown names are skipped with a warning
/// rather than guessed.
fn status_code(file: &ParsedFile, arg: Node<'_>) -> Option<String> {
    match arg.kind() {
        "int_literal" => Some(file.node_text(arg).to_string()),
        "selector_expression" => {
            let name = arg
                .child_by_field_name("field")
                .map(|f| file.node_text(f))
                .unwrap_or("");
            match status_constant(name) {
                Some(code) => Some(code.to_string()),
                None => {
                    warn!("Unknown status constant: {}", name);
                    None
                }
            }
        }
        _ => None,
    }
}

/// Numeric codes for the common `net/http` / fiber status constant names.
fn status_constant(name: &str) -> Option<&'static str> {
    let code = match name {
        "StatusOK" => "200",
        "StatusCreated" => "201",
        "StatusAccepted" => "202",
        "StatusNoContent" => "204",
        "StatusMovedPermanently" => "301",
        "StatusFound" => "302",
        "StatusNotModified" => "304",
        "StatusBadRequest" => "400",
        "StatusUnauthorized" => "401",
        "StatusForbidden" => "403",
        "StatusNotFound" => "404",
        "StatusMethodNotAllowed" => "405",
        "StatusConflict" => "409",
        "StatusUnprocessableEntity" => "422",
        "StatusTooManyRequests" => "429",
        "StatusInternalServerError" => "500",
        "StatusNotImplemented" => "501",
        "StatusBadGateway" => "502",
        "StatusServiceUnavailable" => "503",
        _ => return None,
    };
    Some(code)
}

/// Finds the declared type of a local variable inside a function body:
/// `var x T`, `var x struct{...}`, or `x := T{...}`.
fn resolve_local_type<'t>(
    file: &ParsedFile,
    body: Node<'t>,
    var_name: &str,
) -> Option<Node<'t>> {
    let mut found = None;
    for_each_node(body, &mut |node| {
        if found.is_some() {
            return;
        }
        match node.kind() {
            "var_spec" => {
                let mut cursor = node.walk();
                let declares = node
                    .children_by_field_name("name", &mut cursor)
                    .any(|n| file.node_text(n) == var_name);
                if declares {
                    found = node.child_by_field_name("type");
                }
            }
            "short_var_declaration" => {
                let (Some(left), Some(right)) = (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) else {
                    return;
                };
                let mut left_cursor = left.walk();
                let index = left
                    .named_children(&mut left_cursor)
                    .position(|n| file.node_text(n) == var_name);
                let Some(index) = index else {
                    return;
                };
                let mut right_cursor = right.walk();
                let value = right.named_children(&mut right_cursor).nth(index);
                if let Some(value) = value {
                    if value.kind() == "composite_literal" {
                        found = value.child_by_field_name("type");
                    }
                }
            }
            _ => {}
        }
    });
    found
}

/// Expands a resolved type node into a schema: inline structs expand
/// directly, named types resolve against the same file's declarations.
fn type_to_schema(file: &ParsedFile, type_node: Node<'_>) -> Schema {
    let expander = SchemaExpander::new(file);
    match type_node.kind() {
        "struct_type" => expander.expand_struct(type_node),
        "type_identifier" => {
            let name = file.node_text(type_node);
            expander
                .expand_named(name)
                .unwrap_or_else(|| expander.classify_type(type_node))
        }
        _ => expander.classify_type(type_node),
    }
}
