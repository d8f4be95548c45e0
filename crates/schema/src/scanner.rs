//! Content directory scanner.
//!
//! Responsibilities:
//! - Walk a content root and select `.md` / `.mdx` files in sorted order.
//! - Extract and parse the YAML frontmatter block of each file.
//! - Derive the collection name and locale from the file's location.
//!
//! Does NOT handle:
//! - The document body below the frontmatter (ignored).
//!
//! Invariants:
//! - A file that cannot be read or parsed is recorded in
//!   [`ScanOutcome::errors`] and the walk continues.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, SchemaError};
use crate::value::FieldValue;

const FENCE: &str = "---";

/// One content file's frontmatter.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub collection: String,
    pub locale: Option<String>,
    /// Frontmatter fields in document order.
    pub fields: Vec<(String, FieldValue)>,
}

impl FileRecord {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// A file that could not be turned into a [`FileRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScanError {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of scanning a content root.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<FileRecord>,
    pub errors: Vec<ScanError>,
}

fn locale_pattern() -> &'static Regex {
    static LOCALE: OnceLock<Regex> = OnceLock::new();
    LOCALE.get_or_init(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").expect("valid locale regex"))
}

fn is_locale(segment: &str) -> bool {
    locale_pattern().is_match(segment)
}

fn is_content_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("mdx")
    )
}

/// Walk `root` and parse every content file below it.
pub fn scan_directory(root: &Path) -> Result<ScanOutcome> {
    if !root.is_dir() {
        return Err(SchemaError::NotADirectory(root.to_path_buf()));
    }

    let mut outcome = ScanOutcome::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                outcome.errors.push(ScanError {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_content_file(entry.path()) {
            continue;
        }

        let path = entry.path();
        let parsed = std::fs::read_to_string(path)
            .map_err(|source| SchemaError::Io {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|content| parse_file(root, path, &content));

        match parsed {
            Ok(record) => {
                debug!(
                    path = %path.display(),
                    collection = %record.collection,
                    fields = record.fields.len(),
                    "Parsed frontmatter"
                );
                outcome.records.push(record);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse content file");
                outcome.errors.push(ScanError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(outcome)
}

/// Return the text between the opening and closing `---` lines of `content`.
pub fn extract_frontmatter<'a>(path: &Path, content: &'a str) -> Result<&'a str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    match lines.next() {
        Some(first) if first.trim_end() == FENCE => {
            let start = first.len();
            let mut offset = start;
            for line in lines {
                if line.trim_end() == FENCE {
                    return Ok(&content[start..offset]);
                }
                offset += line.len();
            }
            Err(SchemaError::UnterminatedFrontmatter(path.to_path_buf()))
        }
        _ => Err(SchemaError::MissingFrontmatter(path.to_path_buf())),
    }
}

/// Parse one content file's text into a [`FileRecord`].
pub fn parse_file(root: &Path, path: &Path, content: &str) -> Result<FileRecord> {
    let block = extract_frontmatter(path, content)?;

    let yaml: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|e| SchemaError::Yaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let fields = match yaml {
        serde_yaml::Value::Null => Vec::new(),
        serde_yaml::Value::Mapping(map) => map
            .into_iter()
            .map(|(k, v)| (crate::value::yaml_key(k), FieldValue::from_yaml(v)))
            .collect(),
        _ => return Err(SchemaError::NotAMapping(path.to_path_buf())),
    };

    let (collection, locale) = derive_location(root, path);
    Ok(FileRecord {
        path: path.to_path_buf(),
        collection,
        locale,
        fields,
    })
}

/// Collection a file under `root` belongs to.
pub fn collection_of(root: &Path, path: &Path) -> String {
    derive_location(root, path).0
}

/// Derive `(collection, locale)` from a file's position under `root`.
fn derive_location(root: &Path, path: &Path) -> (String, Option<String>) {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let dirs: Vec<&str> = relative
        .parent()
        .map(|p| {
            p.components()
                .filter_map(|c| match c {
                    Component::Normal(s) => s.to_str(),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let collection = dirs
        .iter()
        .find(|d| !is_locale(d))
        .map(|d| d.to_string())
        .unwrap_or_else(|| root_name(root));

    let file_locale = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| stem.rsplit_once('.'))
        .map(|(_, suffix)| suffix)
        .filter(|suffix| is_locale(suffix));

    let locale = file_locale
        .or_else(|| dirs.iter().copied().find(|d| is_locale(d)))
        .map(str::to_string);

    (collection, locale)
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "content".to_string())
}
