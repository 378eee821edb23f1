use anyhow::{anyhow, Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Tree};

/// Syntax-tree parser for Go source files.
///
/// `GoParser` uses tree-sitter with the Go grammar to parse source code into
/// a concrete syntax tree, which the rest of the pipeline queries structurally
/// to find route registrations, type declarations and handler bodies.
///
/// # Example
///
/// ```no_run
/// use openapi_from_go::parser::GoParser;
/// use std::path::Path;
///
/// let parsed = GoParser::parse_file(Path::new("routes.go")).unwrap();
/// println!("Parsed {} top-level nodes", parsed.root().named_child_count());
/// ```
pub struct GoParser;

/// A successfully parsed Go file with its syntax tree and source text.
///
/// The source text is kept alongside the tree because tree-sitter nodes only
/// store byte ranges; every structural query resolves text through it.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The raw source text
    pub source: String,
    /// The parsed syntax tree
    pub tree: Tree,
}

impl GoParser {
    fn language() -> tree_sitter::Language {
        tree_sitter_go::LANGUAGE.into()
    }

    /// Parses a single Go source file into a syntax tree.
    ///
    /// A file whose tree contains syntax errors counts as a failed parse: the
    /// discoverer skips such files with a warning rather than feeding partial
    /// trees to the extractors.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid Go
    /// syntax.
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Self::parse_source(path, content)
    }

    /// Parses Go source text already held in memory.
    pub fn parse_source(path: &Path, source: String) -> Result<ParsedFile> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&Self::language())
            .context("Failed to load the Go grammar")?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| anyhow!("Parser returned no tree for {}", path.display()))?;

        if tree.root_node().has_error() {
            return Err(anyhow!(
                "Failed to parse Go syntax in file: {}",
                path.display()
            ));
        }

        debug!("Successfully parsed file: {}", path.display());

        Ok(ParsedFile {
            path: path.to_path_buf(),
            source,
            tree,
        })
    }

}

impl ParsedFile {
    /// The root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The source text covered by a node.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// All import path strings declared in the file, unquoted.
    pub fn import_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for_each_node(self.root(), &mut |node| {
            if node.kind() == "import_spec" {
                if let Some(path_node) = node.child_by_field_name("path") {
                    paths.push(unquote(self.node_text(path_node)));
                }
            }
        });
        paths
    }

    /// Finds a function or method declaration by name.
    pub fn find_function(&self, name: &str) -> Option<Node<'_>> {
        let mut found = None;
        for_each_node(self.root(), &mut |node| {
            if found.is_some() {
                return;
            }
            if matches!(node.kind(), "function_declaration" | "method_declaration") {
                if let Some(name_node) = node.child_by_field_name("name") {
                    if self.node_text(name_node) == name {
                        found = Some(node);
                    }
                }
            }
        });
        found
    }

    /// Finds a struct type declaration by name, returning its `struct_type`
    /// node.
    pub fn find_struct(&self, name: &str) -> Option<Node<'_>> {
        let mut found = None;
        for_each_node(self.root(), &mut |node| {
            if found.is_some() {
                return;
            }
            if node.kind() == "type_spec" {
                let matches_name = node
                    .child_by_field_name("name")
                    .map(|n| self.node_text(n) == name)
                    .unwrap_or(false);
                if matches_name {
                    if let Some(ty) = node.child_by_field_name("type") {
                        if ty.kind() == "struct_type" {
                            found = Some(ty);
                        }
                    }
                }
            }
        });
        found
    }

    /// Returns true if the file contains at least one call whose callee name
    /// is in the given vocabulary.
    pub fn has_call_named(&self, names: &[&str]) -> bool {
        let mut found = false;
        for_each_node(self.root(), &mut |node| {
            if found || node.kind() != "call_expression" {
                return;
            }
            if let Some(callee) = call_callee_name(node, &self.source) {
                if names.contains(&callee) {
                    found = true;
                }
            }
        });
        found
    }

    /// The contiguous `//` comment block immediately above a declaration,
    /// with comment markers stripped. Empty when there is none.
    pub fn leading_comment(&self, node: Node<'_>) -> String {
        let mut lines = Vec::new();
        let mut expected_row = node.start_position().row;
        let mut current = node;

        while let Some(prev) = current.prev_sibling() {
            if prev.kind() != "comment" || prev.end_position().row + 1 != expected_row {
                break;
            }
            let text = self.node_text(prev);
            let stripped = text
                .strip_prefix("//")
                .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
                .unwrap_or(text);
            lines.push(stripped.to_string());
            expected_row = prev.start_position().row;
            current = prev;
        }

        lines.reverse();
        lines.join("\n").trim().to_string()
    }
}

/// Visits every node of a subtree in preorder.
pub fn for_each_node<'tree>(root: Node<'tree>, f: &mut dyn FnMut(Node<'tree>)) {
    let mut cursor = root.walk();
    loop {
        f(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// The callee name of a call expression: the selector field for method-style
/// calls (`r.GET(...)` -> "GET"), the identifier for plain calls.
pub fn call_callee_name<'a>(call: Node<'a>, source: &'a str) -> Option<&'a str> {
    let function = call.child_by_field_name("function")?;
    let name_node = match function.kind() {
        "selector_expression" => function.child_by_field_name("field")?,
        "identifier" => function,
        _ => return None,
    };
    name_node.utf8_text(source.as_bytes()).ok()
}

/// The named argument expressions of a call, in order.
pub fn call_arguments(call: Node<'_>) -> Vec<Node<'_>> {
    let mut args = Vec::new();
    if let Some(list) = call.child_by_field_name("arguments") {
        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            args.push(child);
        }
    }
    args
}

/// Strips the delimiters from a Go string literal (interpreted or raw).
///
/// Only the enclosing delimiter is removed: a raw string's content may end
/// in a `"` (struct tags always do) and must keep it.
pub fn unquote(literal: &str) -> String {
    if let Some(inner) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        inner.to_string()
    } else {
        literal.trim_matches('"').to_string()
    }
}
