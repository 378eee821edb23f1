//! Import-driven file discovery.
//!
//! Starting from the entry file, follows local and module-relative imports
//! transitively, classifying every discovered file as a route-definition
//! file, a handler-implementation file, both, or neither. Third-party and
//! standard-library imports resolve to nothing and are ignored. A visited
//! set over canonical paths breaks import cycles.

use crate::parser::{for_each_node, GoParser, ParsedFile};
use anyhow::Result;
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Call names whose presence marks a file as route-defining.
const ROUTING_VOCABULARY: &[&str] = &[
    // gin
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "Group", "Handle", "Any",
    // fiber
    "Get", "Post", "Put", "Delete", "Patch", "Head", "Options", "All",
    // gorilla/mux
    "HandleFunc", "PathPrefix", "Subrouter", "Methods",
];

/// Result of the discovery walk.
///
/// Classification is permissive: a file can appear in both lists, or in
/// neither (in which case it was still scanned for imports).
pub struct DiscoveredFiles {
    /// Files exhibiting route registrations, fed to the route extractor
    pub route_files: Vec<ParsedFile>,
    /// Files exhibiting handler signatures, fed to the handler analyzer
    pub handler_files: Vec<ParsedFile>,
}

/// Walks imports outward from an entry file, collecting route and handler
/// files.
///
/// # Example
///
/// ```no_run
/// use openapi_from_go::discovery::FileDiscoverer;
/// use std::path::Path;
///
/// let discovered = FileDiscoverer::discover(Path::new("main.go")).unwrap();
/// println!(
///     "{} route files, {} handler files",
///     discovered.route_files.len(),
///     discovered.handler_files.len()
/// );
/// ```
pub struct FileDiscoverer {
    base_dir: PathBuf,
    module_name: Option<String>,
    visited: HashSet<PathBuf>,
    route_files: Vec<ParsedFile>,
    handler_files: Vec<ParsedFile>,
}

impl FileDiscoverer {
    /// Runs the discovery walk from the given entry file.
    ///
    /// Per-file failures (unreadable, unparsable) are logged and skipped;
    /// the walk itself never fails on them.
    pub fn discover(entry_file: &Path) -> Result<DiscoveredFiles> {
        let base_dir = entry_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let module_name = find_module_name(&base_dir);

        if let Some(ref module) = module_name {
            debug!("Resolved module name: {}", module);
        } else {
            debug!("No go.mod found above {}", base_dir.display());
        }

        let mut discoverer = Self {
            base_dir,
            module_name,
            visited: HashSet::new(),
            route_files: Vec::new(),
            handler_files: Vec::new(),
        };
        discoverer.process_path(entry_file);

        debug!(
            "Discovery complete: {} route files, {} handler files",
            discoverer.route_files.len(),
            discoverer.handler_files.len()
        );

        Ok(DiscoveredFiles {
            route_files: discoverer.route_files,
            handler_files: discoverer.handler_files,
        })
    }

    fn process_path(&mut self, path: &Path) {
        let Ok(canonical) = fs::canonicalize(path) else {
            debug!("Ignoring unresolvable path: {}", path.display());
            return;
        };

        // Never reprocess a path; this is what breaks import cycles
        if !self.visited.insert(canonical.clone()) {
            return;
        }

        if canonical.is_dir() {
            self.expand_directory(&canonical);
            return;
        }

        if canonical.extension().and_then(|e| e.to_str()) != Some("go") {
            return;
        }

        let parsed = match GoParser::parse_file(&canonical) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Skipping file: {}", e);
                return;
            }
        };

        self.classify(&parsed);

        let importing_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());
        for import in parsed.import_paths() {
            if let Some(resolved) = self.resolve_import(&importing_dir, &import) {
                self.process_path(&resolved);
            } else {
                debug!("Ignoring external import: {}", import);
            }
        }
    }

    /// Expands a directory to its immediate `.go` files.
    fn expand_directory(&mut self, dir: &Path) {
        let entries: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path().to_path_buf()),
                Err(e) => {
                    warn!("Failed to access path: {}", e);
                    None
                }
            })
            .filter(|path| {
                path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("go")
            })
            .collect();

        for file in entries {
            self.process_path(&file);
        }
    }

    /// Resolves an import path to a local file or directory.
    ///
    /// Relative imports resolve against the importing file's directory;
    /// module-qualified imports map their suffix onto the project base
    /// directory. Anything else is external and resolves to nothing.
    fn resolve_import(&self, importing_dir: &Path, import: &str) -> Option<PathBuf> {
        if import.starts_with('.') {
            return Some(importing_dir.join(import));
        }

        let module = self.module_name.as_deref()?;
        let suffix = import.strip_prefix(module)?.trim_start_matches('/');
        if suffix.is_empty() {
            return None;
        }
        Some(self.base_dir.join(suffix))
    }

    fn classify(&mut self, parsed: &ParsedFile) {
        let dir_name = parsed
            .path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("");

        if dir_name == "routes" || parsed.has_call_named(ROUTING_VOCABULARY) {
            debug!("Found route file: {}", parsed.path.display());
            self.route_files.push(parsed.clone());
        }
        if dir_name == "handlers" || has_handler_signature(parsed) {
            debug!("Found handler file: {}", parsed.path.display());
            self.handler_files.push(parsed.clone());
        }
    }
}

/// Reads the module identity from the nearest go.mod, walking up from the
/// given directory.
fn find_module_name(start_dir: &Path) -> Option<String> {
    let mut dir = fs::canonicalize(start_dir).ok()?;
    loop {
        let mod_file = dir.join("go.mod");
        if let Ok(content) = fs::read_to_string(&mod_file) {
            for line in content.lines() {
                if let Some(name) = line.strip_prefix("module ") {
                    return Some(name.trim().to_string());
                }
            }
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// True when the file declares at least one function shaped like a request
/// handler: a `*gin.Context` / `*fiber.Ctx` parameter or an
/// `http.ResponseWriter` parameter.
fn has_handler_signature(parsed: &ParsedFile) -> bool {
    let mut found = false;
    for_each_node(parsed.root(), &mut |node| {
        if found || node.kind() != "parameter_declaration" {
            return;
        }
        let Some(ty) = node.child_by_field_name("type") else {
            return;
        };
        let qualified = match ty.kind() {
            "pointer_type" => ty.named_child(0).filter(|n| n.kind() == "qualified_type"),
            "qualified_type" => Some(ty),
            _ => None,
        };
        let Some(qualified) = qualified else { return };
        let name = qualified
            .child_by_field_name("name")
            .map(|n| parsed.node_text(n))
            .unwrap_or("");
        if matches!(name, "Context" | "Ctx" | "ResponseWriter") {
            found = true;
        }
    });
    found
}
