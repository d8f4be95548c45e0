//! Error types for schema discovery.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur while scanning content or emitting schemas.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The scan root is missing or not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not start with a `---` frontmatter block.
    #[error("No frontmatter block in {}", .0.display())]
    MissingFrontmatter(PathBuf),

    /// The opening `---` has no matching closing line.
    #[error("Unterminated frontmatter block in {}", .0.display())]
    UnterminatedFrontmatter(PathBuf),

    /// Frontmatter is not valid YAML.
    #[error("Invalid frontmatter YAML in {}: {message}", path.display())]
    Yaml { path: PathBuf, message: String },

    /// Frontmatter parsed but is not a key/value mapping.
    #[error("Frontmatter in {} is not a mapping", .0.display())]
    NotAMapping(PathBuf),
}
