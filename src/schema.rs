//! Struct-declaration to schema expansion.
//!
//! Expands a Go struct declaration into a [`Schema`] tree: field names run
//! through `json` tag renames, `validate`/`binding` tags drive the required
//! flag and simple constraints, and declared types map onto semantic
//! primitives. The expansion is deliberately shallow. It documents payloads,
//! it does not validate them: array elements are classified one level deep
//! and foreign-package types become opaque strings.

use crate::document::Schema;
use crate::parser::{unquote, ParsedFile};
use log::debug;
use tree_sitter::Node;

/// Expands struct declarations of a single parsed file into schemas.
///
/// Resolution is confined to the expander's own file: cross-file type
/// resolution outside the discovered handler file is out of scope, and
/// unresolvable names degrade to opaque schemas.
pub struct SchemaExpander<'a> {
    file: &'a ParsedFile,
}

impl<'a> SchemaExpander<'a> {
    /// Creates an expander over one parsed handler file.
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    /// Expands a named struct declaration into an object schema.
    ///
    /// Returns `None` when the file declares no struct of that name.
    pub fn expand_named(&self, type_name: &str) -> Option<Schema> {
        debug!("Expanding struct declaration: {}", type_name);
        let struct_node = self.file.find_struct(type_name)?;
        Some(self.expand_struct(struct_node))
    }

    /// Expands a `struct_type` node (named or anonymous) into an object
    /// schema, iterating its fields in declaration order.
    pub fn expand_struct(&self, struct_node: Node<'_>) -> Schema {
        let mut schema = Schema::object();

        let mut cursor = struct_node.walk();
        for child in struct_node.named_children(&mut cursor) {
            if child.kind() != "field_declaration_list" {
                continue;
            }
            let mut list_cursor = child.walk();
            for field in child.named_children(&mut list_cursor) {
                if field.kind() != "field_declaration" {
                    continue;
                }
                self.expand_field(field, &mut schema);
            }
        }

        schema
    }

    /// Classifies a type expression into a schema without deep recursion.
    pub fn classify_type(&self, ty: Node<'_>) -> Schema {
        match ty.kind() {
            "type_identifier" | "identifier" => {
                let name = self.file.node_text(ty);
                match primitive_type(name) {
                    Some(primitive) => Schema::primitive(primitive),
                    None => Schema::opaque(name),
                }
            }
            "pointer_type" => match ty.named_child(0) {
                Some(inner) => self.classify_type(inner),
                None => Schema::primitive("string"),
            },
            "slice_type" | "array_type" => {
                let items = ty
                    .child_by_field_name("element")
                    .map(|e| self.classify_type(e))
                    .unwrap_or_else(|| Schema::primitive("string"));
                Schema::array(items)
            }
            "qualified_type" => {
                let bare = ty
                    .child_by_field_name("name")
                    .map(|n| self.file.node_text(n))
                    .unwrap_or("");
                Schema::opaque(bare)
            }
            "struct_type" => self.expand_struct(ty),
            "map_type" => Schema::object(),
            _ => Schema::primitive("string"),
        }
    }

    fn expand_field(&self, field: Node<'_>, parent: &mut Schema) {
        let Some(type_node) = field.child_by_field_name("type") else {
            return;
        };

        let tags = field
            .child_by_field_name("tag")
            .map(|t| parse_tags(&unquote(self.file.node_text(t))))
            .unwrap_or_default();

        // Embedded fields carry no name node; the bare type name stands in
        let mut names = Vec::new();
        let mut cursor = field.walk();
        for child in field.named_children(&mut cursor) {
            if child.kind() == "field_identifier" {
                names.push(self.file.node_text(child).to_string());
            }
        }
        if names.is_empty() {
            if let Some(last) = self.file.node_text(type_node).rsplit('.').next() {
                names.push(last.trim_start_matches('*').to_string());
            }
        }

        for declared_name in names {
            let mut visible_name = declared_name.clone();
            if let Some(json_tag) = lookup_tag(&tags, "json") {
                let renamed = json_tag.split(',').next().unwrap_or("");
                if renamed == "-" {
                    continue;
                }
                if !renamed.is_empty() {
                    visible_name = renamed.to_string();
                }
            }

            let mut field_schema = self.classify_type(type_node);
            let rules = lookup_tag(&tags, "validate")
                .or_else(|| lookup_tag(&tags, "binding"))
                .unwrap_or("");
            apply_validation_rules(rules, &mut field_schema);

            parent.properties.insert(visible_name, field_schema);
        }
    }
}

/// Maps a Go primitive type name onto its semantic primitive.
fn primitive_type(name: &str) -> Option<&'static str> {
    match name {
        "string" => Some("string"),
        "bool" => Some("boolean"),
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" | "byte" | "rune" => Some("integer"),
        "float32" | "float64" => Some("number"),
        _ => None,
    }
}

/// Parses a struct tag string (`json:"id,omitempty" binding:"required"`)
/// into key/value pairs. Values may contain spaces (`oneof=a b c`).
fn parse_tags(tag: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut rest = tag;

    while let Some(colon) = rest.find(":\"") {
        let key = rest[..colon]
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or("")
            .to_string();
        let after = &rest[colon + 2..];
        let Some(end) = after.find('"') else { break };
        pairs.push((key, after[..end].to_string()));
        rest = &after[end + 1..];
    }

    pairs
}

fn lookup_tag<'t>(tags: &'t [(String, String)], key: &str) -> Option<&'t str> {
    tags.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Applies `validate`/`binding` rules to a field schema.
///
/// Only the rules the documentation model can express are picked up:
/// `required`, `min=`/`max=` and `oneof=`. Everything else is ignored.
fn apply_validation_rules(rules: &str, schema: &mut Schema) {
    for rule in rules.split(',') {
        let rule = rule.trim();
        if rule == "required" {
            schema.required = true;
        } else if let Some(value) = rule.strip_prefix("min=") {
            apply_bound(schema, value, true);
        } else if let Some(value) = rule.strip_prefix("max=") {
            apply_bound(schema, value, false);
        } else if let Some(values) = rule.strip_prefix("oneof=") {
            schema.enum_values = values.split_whitespace().map(str::to_string).collect();
        }
    }
}

fn apply_bound(schema: &mut Schema, value: &str, lower: bool) {
    match schema.schema_type.as_str() {
        "string" => {
            if let Ok(len) = value.parse::<u64>() {
                if lower {
                    schema.min_length = Some(len);
                } else {
                    schema.max_length = Some(len);
                }
            }
        }
        "integer" | "number" => {
            if let Ok(bound) = value.parse::<f64>() {
                if lower {
                    schema.minimum = Some(bound);
                } else {
                    schema.maximum = Some(bound);
                }
            }
        }
        _ => {}
    }
}
