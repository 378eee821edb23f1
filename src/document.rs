//! Framework-agnostic documentation model.
//!
//! This is the sole artifact the analysis pipeline hands to emitters: a flat,
//! deduplicated, deterministically ordered collection of operations. Media
//! types, security schemes and other output-format concerns are deliberately
//! absent here; they belong to the emitters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The complete, assembled documentation for one analysis run.
///
/// Operations are sorted by path, then method. The document is built once by
/// the assembler and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// All discovered operations, ordered by (path, method)
    pub operations: Vec<Operation>,
}

impl Document {
    /// Returns true if the analysis found no routes at all.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// A single API operation, identified by its (path, method) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// The URL path with all group prefixes expanded (e.g. "/api/v1/users/:id")
    pub path: String,
    /// The HTTP method in upper case ("GET", "POST", ...)
    pub method: String,
    /// The handler's leading doc comment, trimmed; empty when absent
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub summary: String,
    /// The handler reference as written at the registration site
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub handler_name: String,
    /// Parameters in path-segment order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,
    /// Request body, absent when the handler never parses a payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by textual status code ("200", "404", ...)
    pub responses: BTreeMap<String, Response>,
}

impl Operation {
    /// Create an operation with the identity fields only.
    pub fn new(path: String, method: String, handler_name: String) -> Self {
        Self {
            path,
            method,
            summary: String::new(),
            handler_name,
            parameters: Vec::new(),
            request_body: None,
            responses: BTreeMap::new(),
        }
    }
}

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name
    pub name: String,
    /// Where the parameter is taken from in the request
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the parameter must be present
    pub required: bool,
    /// Human-readable description
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    /// Schema of the parameter value
    pub schema: Schema,
}

/// The location a parameter value is extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Path segment placeholder (e.g. `/users/:id`)
    Path,
    /// Query string parameter
    Query,
    /// HTTP header
    Header,
}

/// Request body documentation.
///
/// An absent request body round-trips as `None` on the operation, never as an
/// empty object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    /// Whether a body is required
    pub required: bool,
    /// Schema of the payload
    pub schema: Schema,
}

/// A single documented response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Human-readable description
    pub description: String,
    /// Payload schema, absent when the payload type could not be resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// A recursive structural description of a payload.
///
/// Invariant: an "object" schema carries `properties`, an "array" schema
/// carries `items`, primitive schemas carry neither.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// One of "string", "integer", "number", "boolean", "object", "array"
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Properties for object schemas, keyed by the externally visible name
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub properties: BTreeMap<String, Schema>,
    /// Element schema for array schemas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Whether this field is required in its enclosing object
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub required: bool,
    /// Extra format hint (e.g. the bare name of an opaque foreign type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values, from `oneof` validation rules
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty", default)]
    pub enum_values: Vec<String>,
    /// Lower bound for numeric values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Upper bound for numeric values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum length for string values
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum length for string values
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

impl Schema {
    /// A primitive schema of the given type.
    pub fn primitive(schema_type: &str) -> Self {
        Self {
            schema_type: schema_type.to_string(),
            ..Default::default()
        }
    }

    /// An object schema with no properties yet.
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            ..Default::default()
        }
    }

    /// An array schema wrapping the given element schema.
    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: "array".to_string(),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// An opaque schema for a type the analyzer cannot expand.
    ///
    /// The bare type name is kept in `format` so the information survives
    /// without breaking the object/array/primitive invariant.
    pub fn opaque(bare_name: &str) -> Self {
        Self {
            schema_type: "string".to_string(),
            format: Some(bare_name.to_string()),
            ..Default::default()
        }
    }
}
