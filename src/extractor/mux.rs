use crate::extractor::{GroupCall, RouteGrammar};
use crate::parser::{call_arguments, call_callee_name, unquote, ParsedFile};
use tree_sitter::Node;

/// Route grammar for gorilla/mux:
/// `r.HandleFunc("/users/{id}", handler).Methods("GET")` and
/// `s := r.PathPrefix("/api").Subrouter()`.
///
/// The method lives on a chained `.Methods(...)` modifier rather than the
/// registration call itself; when the modifier is absent the shared skeleton
/// falls back to the handler-name guess and then to GET.
pub struct MuxGrammar;

impl RouteGrammar for MuxGrammar {
    fn name(&self) -> &'static str {
        "mux"
    }

    fn group_call<'t>(&self, file: &ParsedFile, call: Node<'t>) -> Option<GroupCall<'t>> {
        // s := r.PathPrefix("/api").Subrouter()
        if call_callee_name(call, &file.source) != Some("Subrouter") {
            return None;
        }
        let function = call.child_by_field_name("function")?;
        let prefix_call = function.child_by_field_name("operand")?;
        if prefix_call.kind() != "call_expression" {
            return None;
        }
        if call_callee_name(prefix_call, &file.source) != Some("PathPrefix") {
            return None;
        }
        let arg = call_arguments(prefix_call).into_iter().next()?;
        let segment = matches!(
            arg.kind(),
            "interpreted_string_literal" | "raw_string_literal"
        )
        .then(|| unquote(file.node_text(arg)))?;
        let receiver = prefix_call
            .child_by_field_name("function")?
            .child_by_field_name("operand")?;
        Some(GroupCall { segment, receiver })
    }

    fn is_registration_call(&self, file: &ParsedFile, call: Node<'_>) -> bool {
        let Some(callee) = call_callee_name(call, &file.source) else {
            return false;
        };
        if !matches!(callee, "HandleFunc" | "Handle") {
            return false;
        }
        let is_method_call = call
            .child_by_field_name("function")
            .map(|f| f.kind() == "selector_expression")
            .unwrap_or(false);
        is_method_call && call_arguments(call).len() >= 2
    }

    fn method_of(&self, file: &ParsedFile, call: Node<'_>) -> Option<String> {
        // Climb the statement chain looking for .Methods("GET")
        let mut current = call;
        loop {
            let selector = current.parent()?;
            if selector.kind() != "selector_expression" {
                return None;
            }
            let outer = selector.parent()?;
            if outer.kind() != "call_expression" {
                return None;
            }
            if call_callee_name(outer, &file.source) == Some("Methods") {
                let arg = call_arguments(outer).into_iter().next()?;
                return matches!(
                    arg.kind(),
                    "interpreted_string_literal" | "raw_string_literal"
                )
                .then(|| unquote(file.node_text(arg)).to_uppercase());
            }
            current = outer;
        }
    }

    fn path_arg_of<'t>(&self, _file: &ParsedFile, call: Node<'t>) -> Option<Node<'t>> {
        call_arguments(call).into_iter().next()
    }

    fn handler_arg_of<'t>(&self, _file: &ParsedFile, call: Node<'t>) -> Option<Node<'t>> {
        call_arguments(call).into_iter().nth(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::walk_route_file;
    use crate::parser::GoParser;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn extract(code: &str) -> Vec<crate::extractor::RawRoute> {
        let parsed = GoParser::parse_source(Path::new("routes.go"), code.to_string()).unwrap();
        walk_route_file(&MuxGrammar, &parsed)
    }

    #[test]
    fn test_handle_func_with_methods() {
        let routes = extract(
            r#"
package routes

func SetupRouter() *mux.Router {
	r := mux.NewRouter()
	r.HandleFunc("/users", handlers.ListUsers).Methods("GET")
	r.HandleFunc("/users/{id}", handlers.GetUser).Methods("GET")
	r.HandleFunc("/users", handlers.CreateUser).Methods("POST")
	return r
}
"#,
        );

        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].method, "GET");
        assert_eq!(routes[0].path, "/users");
        assert_eq!(routes[1].path, "/users/{id}");
        assert_eq!(routes[2].method, "POST");
        assert_eq!(routes[2].handler, "handlers.CreateUser");
    }

    #[test]
    fn test_subrouter_prefix() {
        let routes = extract(
            r#"
package routes

func SetupRouter() *mux.Router {
	r := mux.NewRouter()
	api := r.PathPrefix("/api/v1").Subrouter()
	api.HandleFunc("/orders/{id}", handlers.GetOrder).Methods("GET")
	return r
}
"#,
        );

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/api/v1/orders/{id}");
    }

    #[test]
    fn test_nested_subrouters() {
        let routes = extract(
            r#"
package routes

func SetupRouter() *mux.Router {
	r := mux.NewRouter()
	api := r.PathPrefix("/api").Subrouter()
	v1 := api.PathPrefix("/v1").Subrouter()
	users := v1.PathPrefix("/users").Subrouter()
	users.HandleFunc("/{id}", handlers.GetUser).Methods("GET")
	return r
}
"#,
        );

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/api/v1/users/{id}");
    }

    #[test]
    fn test_missing_methods_falls_back_to_handler_name() {
        let routes = extract(
            r#"
package routes

func SetupRouter() *mux.Router {
	r := mux.NewRouter()
	r.HandleFunc("/users", handlers.CreateUser)
	r.HandleFunc("/misc", handlers.Frobnicate)
	return r
}
"#,
        );

        assert_eq!(routes.len(), 2);
        // Guessed from the handler name
        assert_eq!(routes[0].method, "POST");
        // No guess possible: hardcoded default
        assert_eq!(routes[1].method, "GET");
    }

    #[test]
    fn test_methods_behind_other_modifiers() {
        let routes = extract(
            r#"
package routes

func SetupRouter() *mux.Router {
	r := mux.NewRouter()
	r.HandleFunc("/search", handlers.SearchUsers).Queries("q", "{q}").Methods("GET")
	return r
}
"#,
        );

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].method, "GET");
    }

    #[test]
    fn test_lowercase_methods_argument_uppercased() {
        let routes = extract(
            r#"
package routes

func SetupRouter() *mux.Router {
	r := mux.NewRouter()
	r.HandleFunc("/users", handlers.ListUsers).Methods("get")
	return r
}
"#,
        );

        assert_eq!(routes[0].method, "GET");
    }
}
