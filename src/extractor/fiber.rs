use crate::extractor::{GroupCall, RouteGrammar};
use crate::parser::{call_arguments, call_callee_name, unquote, ParsedFile};
use tree_sitter::Node;

/// HTTP verb call names on a fiber app or group.
const VERBS: &[&str] = &["Get", "Post", "Put", "Delete", "Patch", "Head", "Options"];

/// Route grammar for fiber: `app.Get("/users/:id", handler)` and
/// `g := app.Group("/api/v1")`.
pub struct FiberGrammar;

impl RouteGrammar for FiberGrammar {
    fn name(&self) -> &'static str {
        "fiber"
    }

    fn group_call<'t>(&self, file: &ParsedFile, call: Node<'t>) -> Option<GroupCall<'t>> {
        if call_callee_name(call, &file.source) != Some("Group") {
            return None;
        }
        let function = call.child_by_field_name("function")?;
        let receiver = function.child_by_field_name("operand")?;
        let arg = call_arguments(call).into_iter().next()?;
        let segment = matches!(
            arg.kind(),
            "interpreted_string_literal" | "raw_string_literal"
        )
        .then(|| unquote(file.node_text(arg)))?;
        Some(GroupCall { segment, receiver })
    }

    fn is_registration_call(&self, file: &ParsedFile, call: Node<'_>) -> bool {
        let Some(callee) = call_callee_name(call, &file.source) else {
            return false;
        };
        if !VERBS.contains(&callee) {
            return false;
        }
        let is_method_call = call
            .child_by_field_name("function")
            .map(|f| f.kind() == "selector_expression")
            .unwrap_or(false);
        // Plain `x.Get(key)` lookups carry no handler argument
        is_method_call && call_arguments(call).len() >= 2
    }

    fn method_of(&self, file: &ParsedFile, call: Node<'_>) -> Option<String> {
        call_callee_name(call, &file.source).map(|verb| verb.to_uppercase())
    }

    fn path_arg_of<'t>(&self, _file: &ParsedFile, call: Node<'t>) -> Option<Node<'t>> {
        call_arguments(call).into_iter().next()
    }

    fn handler_arg_of<'t>(&self, _file: &ParsedFile, call: Node<'t>) -> Option<Node<'t>> {
        // Middleware may sit between the path and the handler
        call_arguments(call).into_iter().last()
    }
}
