//! Flat route-listing emitter.
//!
//! Produces one self-contained record per operation, augmented with the
//! fixed default metadata downstream documentation consumers expect:
//! a default Content-Type header, bearer authentication, rate-limit
//! defaults, and an API version tag.

use crate::document::{Document, Parameter, RequestBody, Response};
use crate::emitter::primary_tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One exported route record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    /// HTTP method
    pub method: String,
    /// Route path
    pub path: String,
    /// Handler summary
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    /// Handler function reference
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub handler_name: String,
    /// Grouping tags
    pub tags: Vec<String>,
    /// Route parameters
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,
    /// Default request headers
    pub headers: Vec<HeaderDefault>,
    /// Request body, when documented
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code
    pub responses: BTreeMap<String, Response>,
    /// Authentication defaults
    pub authentication: Authentication,
    /// Rate-limit defaults
    pub rate_limit: RateLimit,
    /// API version tag
    pub api_version: String,
    /// Deprecation flag
    pub deprecated: bool,
}

/// A default header attached to every record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderDefault {
    pub name: String,
    pub value: String,
    pub required: bool,
}

/// Authentication requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(rename = "type")]
    pub auth_type: String,
    pub required: bool,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimit {
    pub requests_per_minute: u32,
    pub time_window_seconds: u32,
}

/// Converts a document into flat route records, preserving its order.
pub fn emit_routes(document: &Document) -> Vec<RouteRecord> {
    document
        .operations
        .iter()
        .map(|op| RouteRecord {
            method: op.method.clone(),
            path: op.path.clone(),
            description: op.summary.clone(),
            handler_name: op.handler_name.clone(),
            tags: vec![primary_tag(&op.path)],
            parameters: op.parameters.clone(),
            headers: vec![HeaderDefault {
                name: "Content-Type".to_string(),
                value: "application/json".to_string(),
                required: true,
            }],
            request_body: op.request_body.clone(),
            responses: op.responses.clone(),
            authentication: Authentication {
                auth_type: "bearer".to_string(),
                required: true,
            },
            rate_limit: RateLimit {
                requests_per_minute: 100,
                time_window_seconds: 60,
            },
            api_version: "v1.0".to_string(),
            deprecated: false,
        })
        .collect()
}
