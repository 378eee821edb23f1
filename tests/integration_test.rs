use openapi_from_go::{
    analyze,
    emitter::openapi::{build_openapi, Info},
    emitter::routes::emit_routes,
    extractor::Framework,
    serializer::{serialize_json, serialize_yaml},
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn fixture(project: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(project)
        .join("main.go")
}

fn operation_keys(doc: &openapi_from_go::document::Document) -> Vec<(String, String)> {
    doc.operations
        .iter()
        .map(|op| (op.path.clone(), op.method.clone()))
        .collect()
}

#[test]
fn test_gin_end_to_end() {
    let document = analyze(&fixture("gin_project"), Framework::Gin).unwrap();

    assert_eq!(
        operation_keys(&document),
        vec![
            ("/api/v1/orders".to_string(), "POST".to_string()),
            ("/api/v1/orders/:id".to_string(), "GET".to_string()),
            ("/users".to_string(), "GET".to_string()),
            ("/users".to_string(), "POST".to_string()),
            ("/users/:id".to_string(), "GET".to_string()),
        ]
    );

    // Group prefixes resolved through bound sub-router variables
    let create_order = &document.operations[0];
    assert_eq!(create_order.handler_name, "handlers.CreateOrder");
    assert_eq!(create_order.summary, "CreateOrder creates a new order");

    let body = create_order.request_body.as_ref().unwrap();
    assert!(body.required);
    assert!(body.schema.properties["customer_id"].required);
    assert_eq!(body.schema.properties["items"].schema_type, "array");
    assert_eq!(body.schema.properties["total"].schema_type, "number");

    assert!(create_order.responses.contains_key("201"));
    assert!(create_order.responses.contains_key("400"));

    // Path parameters inferred from the template
    let get_user = &document.operations[4];
    assert_eq!(get_user.parameters.len(), 1);
    assert_eq!(get_user.parameters[0].name, "id");
    assert!(get_user.parameters[0].required);

    // Qualified foreign types stay opaque
    let get_order = &document.operations[1];
    let ok = get_order.responses["200"].schema.as_ref().unwrap();
    assert_eq!(ok.properties["created_at"].schema_type, "string");
    assert_eq!(ok.properties["created_at"].format.as_deref(), Some("Time"));
}

#[test]
fn test_gin_openapi_emission() {
    let document = analyze(&fixture("gin_project"), Framework::Gin).unwrap();
    let api = build_openapi(
        &document,
        Info {
            title: "Gin Shop".to_string(),
            description: Some("Demo API".to_string()),
            version: "2.0.0".to_string(),
        },
    );

    assert_eq!(api.openapi, "3.0.3");
    assert_eq!(api.info.title, "Gin Shop");
    assert_eq!(api.paths.len(), 4);
    assert!(api.paths.contains_key("/users/{id}"));
    assert!(api.paths.contains_key("/api/v1/orders/{id}"));

    let tag_names: Vec<&str> = api.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tag_names, vec!["api", "users"]);

    let yaml = serialize_yaml(&api).unwrap();
    assert!(yaml.contains("openapi: 3.0.3"));
    assert!(yaml.contains("/users/{id}"));
    assert!(yaml.contains("bearerAuth"));

    let json = serialize_json(&api).unwrap();
    assert!(json.contains("\"openapi\": \"3.0.3\""));
    assert!(json.contains("\"operationId\": \"CreateOrder\""));
}

#[test]
fn test_gin_routes_emission_defaults() {
    let document = analyze(&fixture("gin_project"), Framework::Gin).unwrap();
    let records = emit_routes(&document);

    assert_eq!(records.len(), 5);
    for record in &records {
        assert_eq!(record.headers[0].name, "Content-Type");
        assert_eq!(record.authentication.auth_type, "bearer");
        assert_eq!(record.rate_limit.requests_per_minute, 100);
        assert_eq!(record.api_version, "v1.0");
        assert!(!record.deprecated);
    }
    assert_eq!(records[2].tags, vec!["users"]);
}

#[test]
fn test_fiber_end_to_end() {
    let document = analyze(&fixture("fiber_project"), Framework::Fiber).unwrap();

    assert_eq!(
        operation_keys(&document),
        vec![
            ("/api/v1/orders".to_string(), "POST".to_string()),
            ("/api/v1/orders/:id".to_string(), "GET".to_string()),
            ("/health".to_string(), "GET".to_string()),
        ]
    );

    // Inline anonymous request struct expands directly
    let create_order = &document.operations[0];
    let body = create_order.request_body.as_ref().unwrap();
    assert!(body.schema.properties["customerId"].required);
    assert_eq!(body.schema.properties["items"].schema_type, "array");

    // Status chain resolves the created code
    assert!(create_order.responses.contains_key("201"));
    assert!(create_order.responses.contains_key("400"));

    // A bare c.JSON(...) documents a 200
    let get_order = &document.operations[1];
    let ok = get_order.responses["200"].schema.as_ref().unwrap();
    assert!(ok.properties.contains_key("customerId"));

    // fiber.Map payloads stay property-less
    let health = &document.operations[2];
    let schema = health.responses["200"].schema.as_ref().unwrap();
    assert_eq!(schema.schema_type, "object");
    assert!(schema.properties.is_empty());
}

#[test]
fn test_mux_end_to_end() {
    let document = analyze(&fixture("mux_project"), Framework::Mux).unwrap();

    assert_eq!(
        operation_keys(&document),
        vec![
            ("/api/v1/orders/{id}".to_string(), "GET".to_string()),
            ("/users".to_string(), "GET".to_string()),
            ("/users".to_string(), "POST".to_string()),
            ("/users/{id}".to_string(), "GET".to_string()),
        ]
    );

    // Brace placeholders yield parameters like the colon style does
    let get_order = &document.operations[0];
    assert_eq!(get_order.parameters.len(), 1);
    assert_eq!(get_order.parameters[0].name, "id");

    let create_user = &document.operations[2];
    assert_eq!(create_user.summary, "CreateUser registers a new user");
    let body = create_user.request_body.as_ref().unwrap();
    assert!(body.schema.properties["name"].required);
    assert!(create_user.responses.contains_key("201"));

    // Encode without WriteHeader falls back to the default 200
    let list_users = &document.operations[1];
    assert!(list_users.responses.contains_key("200"));
}

#[test]
fn test_document_is_sorted_for_every_framework() {
    for (project, framework) in [
        ("gin_project", Framework::Gin),
        ("fiber_project", Framework::Fiber),
        ("mux_project", Framework::Mux),
    ] {
        let document = analyze(&fixture(project), framework).unwrap();
        for pair in document.operations.windows(2) {
            let ordered = pair[0].path < pair[1].path
                || (pair[0].path == pair[1].path && pair[0].method <= pair[1].method);
            assert!(
                ordered,
                "{} document not sorted: {} {} before {} {}",
                project, pair[0].path, pair[0].method, pair[1].path, pair[1].method
            );
        }
    }
}

#[test]
fn test_route_listing_serializes_to_yaml() {
    let document = analyze(&fixture("fiber_project"), Framework::Fiber).unwrap();
    let records = emit_routes(&document);
    let yaml = serialize_yaml(&records).unwrap();

    assert!(yaml.contains("path: /health"));
    assert!(yaml.contains("requests_per_minute: 100"));
}
