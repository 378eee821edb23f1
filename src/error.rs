use std::path::PathBuf;

/// Fatal configuration errors.
///
/// Everything else in the pipeline degrades locally (a skipped file, a
/// missing handler); these two abort the run before any partial document is
/// produced.
#[derive(Debug)]
pub enum Error {
    /// The framework identifier is not one of the supported set.
    /// Raised before any file I/O happens.
    UnsupportedFramework(String),
    /// The entry file handed to the analyzer does not exist or is not a file.
    EntryFileNotFound(PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::UnsupportedFramework(name) => {
                write!(
                    f,
                    "unsupported framework: {} (expected one of: gin, fiber, mux)",
                    name
                )
            }
            Error::EntryFileNotFound(path) => {
                write!(f, "entry file not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for Error {}
