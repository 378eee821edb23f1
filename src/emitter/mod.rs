//! Emitters consuming the assembled [`Document`](crate::document::Document).
//!
//! Emission is mechanical serialization: the core guarantees a complete,
//! deduplicated, deterministically ordered document, and these modules shape
//! it for persistence.
//!
//! - [`routes`] — flat route-record array with fixed default metadata
//! - [`openapi`] — OpenAPI 3 document

pub mod openapi;
pub mod routes;

/// The grouping tag of an operation: its first path segment that is not a
/// placeholder. Falls back to "general" for root-level routes.
pub fn primary_tag(path: &str) -> String {
    path.split('/')
        .find(|segment| {
            !segment.is_empty()
                && !segment.starts_with(':')
                && !segment.starts_with('{')
                && !segment.starts_with('*')
        })
        .unwrap_or("general")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_tag() {
        assert_eq!(primary_tag("/users/:id"), "users");
        assert_eq!(primary_tag("/api/v1/orders"), "api");
        assert_eq!(primary_tag("/{tenant}/users"), "users");
        assert_eq!(primary_tag("/"), "general");
        assert_eq!(primary_tag("/:id"), "general");
    }
}
