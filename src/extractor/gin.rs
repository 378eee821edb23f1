use crate::extractor::{GroupCall, RouteGrammar};
use crate::parser::{call_arguments, call_callee_name, unquote, ParsedFile};
use tree_sitter::Node;

/// HTTP verb call names on a gin engine or router group.
const VERBS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Route grammar for gin: `r.GET("/users/:id", handler)`,
/// `g := r.Group("/api/v1")`, and the generic
/// `r.Handle("POST", "/users", handler)` form.
pub struct GinGrammar;

impl RouteGrammar for GinGrammar {
    fn name(&self) -> &'static str {
        "gin"
    }

    fn group_call<'t>(&self, file: &ParsedFile, call: Node<'t>) -> Option<GroupCall<'t>> {
        if call_callee_name(call, &file.source) != Some("Group") {
            return None;
        }
        let function = call.child_by_field_name("function")?;
        let receiver = function.child_by_field_name("operand")?;
        let segment = string_argument(file, call, 0)?;
        Some(GroupCall { segment, receiver })
    }

    fn is_registration_call(&self, file: &ParsedFile, call: Node<'_>) -> bool {
        let Some(callee) = call_callee_name(call, &file.source) else {
            return false;
        };
        if !VERBS.contains(&callee) && callee != "Handle" {
            return false;
        }
        // Verb calls need a receiver and at least (path, handler)
        let is_method_call = call
            .child_by_field_name("function")
            .map(|f| f.kind() == "selector_expression")
            .unwrap_or(false);
        is_method_call && call_arguments(call).len() >= 2
    }

    fn method_of(&self, file: &ParsedFile, call: Node<'_>) -> Option<String> {
        let callee = call_callee_name(call, &file.source)?;
        if VERBS.contains(&callee) {
            return Some(callee.to_string());
        }
        // Handle("POST", "/users", handler) carries the method as its
        // first argument
        string_argument(file, call, 0).map(|m| m.to_uppercase())
    }

    fn path_arg_of<'t>(&self, file: &ParsedFile, call: Node<'t>) -> Option<Node<'t>> {
        let index = if call_callee_name(call, &file.source) == Some("Handle") {
            1
        } else {
            0
        };
        call_arguments(call).into_iter().nth(index)
    }

    fn handler_arg_of<'t>(&self, file: &ParsedFile, call: Node<'t>) -> Option<Node<'t>> {
        // Middleware may sit between the path and the handler; the handler
        // is the final argument
        let args = call_arguments(call);
        let first_handler_index = if call_callee_name(call, &file.source) == Some("Handle") {
            2
        } else {
            1
        };
        if args.len() <= first_handler_index {
            return None;
        }
        args.into_iter().last()
    }
}

fn string_argument(file: &ParsedFile, call: Node<'_>, index: usize) -> Option<String> {
    let arg = call_arguments(call).into_iter().nth(index)?;
    matches!(
        arg.kind(),
        "interpreted_string_literal" | "raw_string_literal"
    )
    .then(|| unquote(file.node_text(arg)))
}
