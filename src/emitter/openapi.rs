//! OpenAPI 3 emitter.
//!
//! Groups the document's operations by path and method under `paths`, wraps
//! bodies and responses as `application/json`, attaches a bearer security
//! scheme, and derives the top-level `tags` block from each operation's
//! first non-placeholder path segment.

use crate::document::{Document, Parameter, Schema};
use crate::emitter::primary_tag;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// OpenAPI Info object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: "API Documentation".to_string(),
            description: None,
            version: "1.0.0".to_string(),
        }
    }
}

/// All operations of a single path, keyed by method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<OpenApiOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<OpenApiOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<OpenApiOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<OpenApiOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<OpenApiOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OpenApiOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<OpenApiOperation>,
}

/// A single OpenAPI operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiOperation {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<OpenApiRequestBody>,
    pub responses: BTreeMap<String, OpenApiResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub security: Vec<BTreeMap<String, Vec<String>>>,
}

/// OpenAPI RequestBody object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiRequestBody {
    pub required: bool,
    pub content: BTreeMap<String, MediaType>,
}

/// OpenAPI MediaType object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: Schema,
}

/// OpenAPI Response object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiResponse {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BTreeMap<String, MediaType>>,
}

/// OpenAPI Components object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Components {
    #[serde(rename = "securitySchemes")]
    pub security_schemes: BTreeMap<String, SecurityScheme>,
}

/// OpenAPI SecurityScheme object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,
}

/// OpenAPI Tag object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// Complete OpenAPI document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub tags: Vec<Tag>,
    pub paths: BTreeMap<String, PathItem>,
    pub components: Components,
}

/// Builds an OpenAPI document from the assembled operations.
pub fn build_openapi(document: &Document, info: Info) -> OpenApiDocument {
    debug!(
        "Building OpenAPI document for {} operations",
        document.operations.len()
    );

    let mut paths: BTreeMap<String, PathItem> = BTreeMap::new();
    let mut tag_names: BTreeSet<String> = BTreeSet::new();

    for op in &document.operations {
        let tag = primary_tag(&op.path);
        tag_names.insert(tag.clone());

        let converted = convert_path_format(&op.path);
        let operation = OpenApiOperation {
            tags: vec![tag],
            summary: (!op.summary.is_empty()).then(|| op.summary.clone()),
            operation_id: (!op.handler_name.is_empty())
                .then(|| bare_handler_name(&op.handler_name)),
            parameters: (!op.parameters.is_empty()).then(|| op.parameters.clone()),
            request_body: op.request_body.as_ref().map(|body| OpenApiRequestBody {
                required: body.required,
                content: json_content(body.schema.clone()),
            }),
            responses: op
                .responses
                .iter()
                .map(|(code, response)| {
                    (
                        code.clone(),
                        OpenApiResponse {
                            description: response.description.clone(),
                            content: response.schema.clone().map(json_content),
                        },
                    )
                })
                .collect(),
            security: vec![BTreeMap::from([("bearerAuth".to_string(), Vec::new())])],
        };

        let path_item = paths.entry(converted).or_default();
        match op.method.as_str() {
            "GET" => path_item.get = Some(operation),
            "POST" => path_item.post = Some(operation),
            "PUT" => path_item.put = Some(operation),
            "DELETE" => path_item.delete = Some(operation),
            "PATCH" => path_item.patch = Some(operation),
            "OPTIONS" => path_item.options = Some(operation),
            "HEAD" => path_item.head = Some(operation),
            other => debug!("Dropping operation with unmapped method: {}", other),
        }
    }

    OpenApiDocument {
        openapi: "3.0.3".to_string(),
        info,
        tags: tag_names.into_iter().map(|name| Tag { name }).collect(),
        paths,
        components: Components {
            security_schemes: BTreeMap::from([(
                "bearerAuth".to_string(),
                SecurityScheme {
                    scheme_type: "http".to_string(),
                    scheme: Some("bearer".to_string()),
                    bearer_format: Some("JWT".to_string()),
                },
            )]),
        },
    }
}

fn json_content(schema: Schema) -> BTreeMap<String, MediaType> {
    BTreeMap::from([("application/json".to_string(), MediaType { schema })])
}

fn bare_handler_name(handler: &str) -> String {
    handler.rsplit('.').next().unwrap_or(handler).to_string()
}

/// Converts `:param` and `*param` segments to the OpenAPI `{param}` form.
fn convert_path_format(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{}}}", name)
            } else if let Some(name) = segment.strip_prefix('*') {
                format!("{{{}}}", name)
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
