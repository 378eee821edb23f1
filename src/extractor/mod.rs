//! Route extraction from parsed route-definition files.
//!
//! One depth-first traversal skeleton ([`walk_route_file`]) is shared by all
//! frameworks; everything framework-specific sits behind the [`RouteGrammar`]
//! strategy trait. The traversal tracks nested group prefixes through a
//! binding table so that routes registered on a bound sub-router variable
//! (`api := r.Group("/api/v1")`) resolve against the accumulated prefix.
//!
//! # Supported frameworks
//!
//! - **gin**: see [`gin::GinGrammar`]
//! - **fiber**: see [`fiber::FiberGrammar`]
//! - **mux**: see [`mux::MuxGrammar`]

pub mod fiber;
pub mod gin;
pub mod mux;

use crate::error::Error;
use crate::parser::ParsedFile;
use clap::ValueEnum;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use tree_sitter::Node;

/// Supported web frameworks.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash)]
pub enum Framework {
    /// Gin (github.com/gin-gonic/gin)
    Gin,
    /// Fiber (github.com/gofiber/fiber)
    Fiber,
    /// Gorilla Mux (github.com/gorilla/mux)
    Mux,
}

impl FromStr for Framework {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gin" => Ok(Framework::Gin),
            "fiber" => Ok(Framework::Fiber),
            "mux" => Ok(Framework::Mux),
            other => Err(Error::UnsupportedFramework(other.to_string())),
        }
    }
}

impl Framework {
    /// The route grammar implementing this framework's registration shapes.
    pub fn grammar(&self) -> &'static dyn RouteGrammar {
        match self {
            Framework::Gin => &gin::GinGrammar,
            Framework::Fiber => &fiber::FiberGrammar,
            Framework::Mux => &mux::MuxGrammar,
        }
    }
}

/// A raw route record produced by extraction, before enrichment.
#[derive(Debug, Clone)]
pub struct RawRoute {
    /// HTTP method in upper case
    pub method: String,
    /// Prefix-expanded, normalized path
    pub path: String,
    /// Handler reference as written (identifier or qualified name);
    /// empty when the registration carries no resolvable handler
    pub handler: String,
    /// The route file the registration was found in
    pub source: PathBuf,
}

/// A recognized sub-group construct: the literal path segment it contributes
/// and the receiver expression the new group hangs off.
pub struct GroupCall<'t> {
    pub segment: String,
    pub receiver: Node<'t>,
}

/// Framework strategy: the call-site shapes that constitute registration and
/// scope nesting.
///
/// Implementations only classify nodes; all traversal state (the scope
/// binding table, prefix resolution, path normalization) lives in the shared
/// skeleton.
pub trait RouteGrammar: Sync {
    /// Framework name for diagnostics.
    fn name(&self) -> &'static str;

    /// Recognizes a call that creates a nested scope, returning the literal
    /// segment and the receiver. A group call whose segment is not a string
    /// literal is not recognized.
    fn group_call<'t>(&self, file: &ParsedFile, call: Node<'t>) -> Option<GroupCall<'t>>;

    /// Recognizes a route-registration call.
    fn is_registration_call(&self, file: &ParsedFile, call: Node<'_>) -> bool;

    /// The HTTP method of a registration call, when it can be determined
    /// from the call site itself.
    fn method_of(&self, file: &ParsedFile, call: Node<'_>) -> Option<String>;

    /// The path argument expression of a registration call.
    fn path_arg_of<'t>(&self, file: &ParsedFile, call: Node<'t>) -> Option<Node<'t>>;

    /// The handler argument expression of a registration call.
    fn handler_arg_of<'t>(&self, file: &ParsedFile, call: Node<'t>) -> Option<Node<'t>>;
}

/// Extracts all raw routes from a single route-definition file.
pub fn walk_route_file(grammar: &dyn RouteGrammar, file: &ParsedFile) -> Vec<RawRoute> {
    let mut walker = RouteWalker {
        grammar,
        file,
        bindings: HashMap::new(),
        routes: Vec::new(),
    };
    walker.walk(file.root());
    debug!(
        "Extracted {} {} routes from {}",
        walker.routes.len(),
        grammar.name(),
        file.path.display()
    );
    walker.routes
}

/// Per-file traversal state: the scope binding table and the routes found so
/// far. Confined to one walk, never shared across files or runs.
struct RouteWalker<'a> {
    grammar: &'a dyn RouteGrammar,
    file: &'a ParsedFile,
    /// Sub-router variable name -> accumulated path prefix
    bindings: HashMap<String, String>,
    routes: Vec<RawRoute>,
}

impl<'a> RouteWalker<'a> {
    fn walk(&mut self, node: Node<'_>) {
        match node.kind() {
            "short_var_declaration" | "assignment_statement" => {
                self.record_group_binding(node);
            }
            "call_expression" => {
                if self.grammar.is_registration_call(self.file, node) {
                    self.record_registration(node);
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.walk(child);
        }
    }

    /// Binds `v := recv.Group("/seg")` style declarations to their prefix.
    fn record_group_binding(&mut self, node: Node<'_>) {
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };

        let mut left_cursor = left.walk();
        let Some(name_node) = left.named_children(&mut left_cursor).next() else {
            return;
        };
        if name_node.kind() != "identifier" {
            return;
        }

        let mut right_cursor = right.walk();
        let Some(value) = right.named_children(&mut right_cursor).next() else {
            return;
        };
        if value.kind() != "call_expression" {
            return;
        }

        let Some(group) = self.grammar.group_call(self.file, value) else {
            return;
        };

        let parent_prefix = self.resolve_prefix(group.receiver);
        let prefix = join_paths(&parent_prefix, &group.segment);
        let name = self.file.node_text(name_node).to_string();
        debug!("Scope binding: {} -> {}", name, prefix);
        self.bindings.insert(name, prefix);
    }

    fn record_registration(&mut self, call: Node<'_>) {
        let path_arg = self.grammar.path_arg_of(self.file, call);
        let literal = path_arg.and_then(|arg| self.string_literal(arg));
        let Some(local_path) = literal else {
            // Statically unknown paths cannot be documented
            warn!(
                "Skipping route with non-literal path in {} (line {})",
                self.file.path.display(),
                call.start_position().row + 1
            );
            return;
        };

        let prefix = call
            .child_by_field_name("function")
            .and_then(|f| f.child_by_field_name("operand"))
            .map(|receiver| self.resolve_prefix(receiver))
            .unwrap_or_default();

        let path = join_paths(&prefix, &local_path);

        let handler = self
            .grammar
            .handler_arg_of(self.file, call)
            .map(|arg| self.handler_reference(arg))
            .unwrap_or_default();

        let method = match self.grammar.method_of(self.file, call) {
            Some(method) => method,
            None => match method_from_handler_name(&handler) {
                Some(guessed) => guessed.to_string(),
                None => {
                    warn!(
                        "Could not determine HTTP method for {} {}, defaulting to GET",
                        path,
                        self.file.path.display()
                    );
                    "GET".to_string()
                }
            },
        };

        self.routes.push(RawRoute {
            method,
            path,
            handler,
            source: self.file.path.clone(),
        });
    }

    /// Resolves the effective prefix of a receiver expression: a bound
    /// sub-router variable, a direct group-call chain, or the root router.
    fn resolve_prefix(&self, receiver: Node<'_>) -> String {
        match receiver.kind() {
            "identifier" => {
                let name = self.file.node_text(receiver);
                self.bindings.get(name).cloned().unwrap_or_default()
            }
            "call_expression" => match self.grammar.group_call(self.file, receiver) {
                Some(group) => {
                    let parent = self.resolve_prefix(group.receiver);
                    join_paths(&parent, &group.segment)
                }
                None => String::new(),
            },
            _ => String::new(),
        }
    }

    fn string_literal(&self, node: Node<'_>) -> Option<String> {
        matches!(
            node.kind(),
            "interpreted_string_literal" | "raw_string_literal"
        )
        .then(|| crate::parser::unquote(self.file.node_text(node)))
    }

    /// The handler reference as written: an identifier or a qualified
    /// selector such as `handlers.GetUser`.
    fn handler_reference(&self, arg: Node<'_>) -> String {
        match arg.kind() {
            "identifier" | "selector_expression" => self.file.node_text(arg).to_string(),
            _ => String::new(),
        }
    }
}

/// Joins a prefix and a local path, collapsing duplicate separators and
/// stripping the trailing separator. The empty prefix resolves to the root.
pub fn join_paths(prefix: &str, path: &str) -> String {
    let mut combined = String::from("/");
    for segment in prefix.split('/').chain(path.split('/')) {
        if segment.is_empty() {
            continue;
        }
        if !combined.ends_with('/') {
            combined.push('/');
        }
        combined.push_str(segment);
    }
    combined
}

/// Last-resort policy: guess the HTTP method from the handler's name.
///
/// This is only consulted when the registration site itself carries no
/// method (a mux `Handle`/`HandleFunc` without a `.Methods(...)` modifier).
/// It is never blended into the primary extraction path.
pub fn method_from_handler_name(handler: &str) -> Option<&'static str> {
    let bare = handler.rsplit('.').next().unwrap_or(handler);
    let guesses = [
        ("Create", "POST"),
        ("Add", "POST"),
        ("Update", "PUT"),
        ("Patch", "PATCH"),
        ("Delete", "DELETE"),
        ("Remove", "DELETE"),
        ("Get", "GET"),
        ("List", "GET"),
        ("Find", "GET"),
        ("Search", "GET"),
    ];
    guesses
        .iter()
        .find(|(prefix, _)| bare.starts_with(prefix))
        .map(|(_, method)| *method)
}
