//! Path-template parameter inference.
//!
//! Works on the already prefix-expanded path string and is independent of the
//! framework that produced it: gin and fiber write `:name` and `*wildcard`,
//! gorilla/mux writes `{name}`. All three yield the same parameter shape.

use crate::document::{Parameter, ParameterLocation, Schema};

/// Derives the path parameters declared by a route template.
///
/// Parameters are returned in left-to-right segment order, each required and
/// typed "string" until something refines them further. A segment yields at
/// most one parameter.
pub fn infer_path_parameters(path: &str) -> Vec<Parameter> {
    let mut params = Vec::new();

    for segment in path.split('/') {
        if let Some(name) = placeholder_name(segment) {
            params.push(path_parameter(name, false));
        } else if let Some(name) = segment.strip_prefix('*') {
            if !name.is_empty() {
                params.push(path_parameter(name, true));
            }
        }
    }

    params
}

/// The parameter name of a `{x}` or `:x` segment, if it is one.
fn placeholder_name(segment: &str) -> Option<&str> {
    if let Some(name) = segment.strip_prefix(':') {
        if !name.is_empty() {
            return Some(name);
        }
    }
    if let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        if !inner.is_empty() {
            return Some(inner);
        }
    }
    None
}

fn path_parameter(name: &str, wildcard: bool) -> Parameter {
    let description = if wildcard {
        format!("Wildcard parameter: {}", name)
    } else {
        format!("Path parameter: {}", name)
    };
    Parameter {
        name: name.to_string(),
        location: ParameterLocation::Path,
        required: true,
        description,
        schema: Schema::primitive("string"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_colon_placeholders() {
        let params = infer_path_parameters("/users/:id/posts/:postId");

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "id");
        assert_eq!(params[1].name, "postId");
        for p in &params {
            assert_eq!(p.location, ParameterLocation::Path);
            assert!(p.required);
            assert_eq!(p.schema.schema_type, "string");
        }
    }

    #[test]
    fn test_brace_placeholders() {
        let params = infer_path_parameters("/users/{id}/orders/{orderId}");

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "id");
        assert_eq!(params[1].name, "orderId");
    }

    #[test]
    fn test_wildcard_placeholder() {
        let params = infer_path_parameters("/files/*filepath");

        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "filepath");
        assert!(params[0].required);
        assert_eq!(params[0].description, "Wildcard parameter: filepath");
    }

    #[test]
    fn test_no_placeholders() {
        assert!(infer_path_parameters("/users/search").is_empty());
        assert!(infer_path_parameters("/").is_empty());
        assert!(infer_path_parameters("").is_empty());
    }

    #[test]
    fn test_segment_order_is_left_to_right() {
        let params = infer_path_parameters("/a/:zulu/b/:alpha/c/{mike}");

        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_empty_placeholder_segments_ignored() {
        assert!(infer_path_parameters("/users/:").is_empty());
        assert!(infer_path_parameters("/users/{}").is_empty());
        assert!(infer_path_parameters("/users/*").is_empty());
    }

    #[test]
    fn test_mixed_conventions_keep_count() {
        // One parameter per placeholder segment, regardless of convention
        let params = infer_path_parameters("/api/{tenant}/files/:name/*rest");
        assert_eq!(params.len(), 3);
    }
}
