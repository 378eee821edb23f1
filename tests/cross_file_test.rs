use openapi_from_go::{analyze, extractor::Framework};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

const GO_MOD: &str = "module example.com/demo\n\ngo 1.21\n";

const MAIN: &str = r#"
package main

import (
	"example.com/demo/routes"
)

func main() {
	r := routes.SetupRouter()
	routes.SetupOrderRoutes(r)
	r.Run(":8080")
}
"#;

const USER_ROUTES: &str = r#"
package routes

import (
	"github.com/gin-gonic/gin"

	"example.com/demo/handlers"
)

func SetupRouter() *gin.Engine {
	r := gin.Default()
	r.GET("/users", handlers.ListUsers)
	r.POST("/users", handlers.CreateUser)
	r.GET("/users/:id", handlers.GetUser)
	return r
}
"#;

const USER_ROUTES_WITHOUT_GET_USER: &str = r#"
package routes

import (
	"github.com/gin-gonic/gin"

	"example.com/demo/handlers"
)

func SetupRouter() *gin.Engine {
	r := gin.Default()
	r.GET("/users", handlers.ListUsers)
	r.POST("/users", handlers.CreateUser)
	return r
}
"#;

const ORDER_ROUTES: &str = r#"
package routes

import (
	"github.com/gin-gonic/gin"

	"example.com/demo/handlers"
)

func SetupOrderRoutes(r *gin.Engine) {
	api := r.Group("/api/v1")
	api.POST("/orders", handlers.CreateOrder)
	api.GET("/orders/:id", handlers.GetOrder)
}
"#;

const HANDLERS: &str = r#"
package handlers

import (
	"net/http"

	"github.com/gin-gonic/gin"
)

type UserResponse struct {
	ID string `json:"id"`
}

// ListUsers returns all users
func ListUsers(c *gin.Context) {
	users := []UserResponse{}
	c.JSON(http.StatusOK, users)
}

// GetUser returns one user
func GetUser(c *gin.Context) {
	resp := UserResponse{ID: c.Param("id")}
	c.JSON(http.StatusOK, resp)
}

// CreateUser registers a user
func CreateUser(c *gin.Context) {
	c.JSON(http.StatusCreated, gin.H{"id": "user-123"})
}

// CreateOrder creates an order
func CreateOrder(c *gin.Context) {
	c.JSON(http.StatusCreated, gin.H{"id": "order-123"})
}

// GetOrder returns one order
func GetOrder(c *gin.Context) {
	c.JSON(http.StatusOK, gin.H{"id": "order-123"})
}
"#;

fn operation_keys(doc: &openapi_from_go::document::Document) -> Vec<(String, String)> {
    doc.operations
        .iter()
        .map(|op| (op.path.clone(), op.method.clone()))
        .collect()
}

#[test]
fn test_five_registrations_across_two_route_files() {
    let project = create_test_project(vec![
        ("go.mod", GO_MOD),
        ("main.go", MAIN),
        ("routes/routes.go", USER_ROUTES),
        ("routes/order_routes.go", ORDER_ROUTES),
        ("handlers/handlers.go", HANDLERS),
    ]);

    let document = analyze(&project.path().join("main.go"), Framework::Gin).unwrap();

    assert_eq!(document.operations.len(), 5);
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

    // Cross-file handler resolution still finds summaries
    assert_eq!(document.operations[0].summary, "CreateOrder creates an order");
}

#[test]
fn test_removing_one_registration_decreases_count_by_one() {
    let project = create_test_project(vec![
        ("go.mod", GO_MOD),
        ("main.go", MAIN),
        ("routes/routes.go", USER_ROUTES),
        ("routes/order_routes.go", ORDER_ROUTES),
        ("handlers/handlers.go", HANDLERS),
    ]);

    let before = analyze(&project.path().join("main.go"), Framework::Gin).unwrap();
    assert_eq!(before.operations.len(), 5);

    fs::write(
        project.path().join("routes/routes.go"),
        USER_ROUTES_WITHOUT_GET_USER,
    )
    .unwrap();

    let after = analyze(&project.path().join("main.go"), Framework::Gin).unwrap();
    assert_eq!(after.operations.len(), 4);

    let removed = ("/users/:id".to_string(), "GET".to_string());
    let before_keys = operation_keys(&before);
    let after_keys = operation_keys(&after);
    assert!(!after_keys.contains(&removed));

    // Every other operation is unchanged
    let expected: Vec<(String, String)> = before_keys
        .into_iter()
        .filter(|key| *key != removed)
        .collect();
    assert_eq!(after_keys, expected);
}

#[test]
fn test_entry_file_can_be_the_route_file_itself() {
    let project = create_test_project(vec![
        ("go.mod", GO_MOD),
        ("routes/routes.go", USER_ROUTES),
        ("handlers/handlers.go", HANDLERS),
    ]);

    // Analyzing the route file directly still extracts its routes. Module
    // imports resolve against the entry file's directory, so the sibling
    // handlers package is out of reach here and enrichment degrades to the
    // default response.
    let document = analyze(
        &project.path().join("routes/routes.go"),
        Framework::Gin,
    )
    .unwrap();

    assert_eq!(document.operations.len(), 3);
    for op in &document.operations {
        assert_eq!(op.summary, "");
        assert!(op.responses.contains_key("200"));
    }
}

#[test]
fn test_unreadable_sibling_does_not_abort_the_run() {
    let project = create_test_project(vec![
        ("go.mod", GO_MOD),
        ("main.go", MAIN),
        ("routes/routes.go", USER_ROUTES),
        ("routes/broken.go", "package routes\n\nfunc broken( {\n"),
        ("handlers/handlers.go", HANDLERS),
    ]);

    let document = analyze(&project.path().join("main.go"), Framework::Gin).unwrap();
    assert_eq!(document.operations.len(), 3);
}

#[test]
fn test_zero_routes_returns_empty_document() {
    let project = create_test_project(vec![
        ("go.mod", GO_MOD),
        ("main.go", "package main\n\nfunc main() {}\n"),
    ]);

    let document = analyze(&project.path().join("main.go"), Framework::Gin).unwrap();
    assert!(document.is_empty());
}

#[test]
fn test_missing_entry_file_is_fatal() {
    let err = analyze(Path::new("/nonexistent/project/main.go"), Framework::Gin).unwrap_err();
    assert!(err.to_string().contains("entry file not found"));
}
