//! Frontmatter schema discovery for Payload CMS collections.
//!
//! The pipeline runs in one direction: content files are scanned into
//! [`FileRecord`]s, folded into per-field [`FieldObservation`]s, mapped to
//! [`InferredField`]s by an ordered rule list, organized into groups, and
//! finally rendered as a `CollectionConfig` TypeScript module.

pub mod aggregate;
pub mod emit;
pub mod error;
pub mod group;
pub mod infer;
pub mod naming;
pub mod scanner;
pub mod value;

pub use aggregate::{
    Aggregation, DistinctValues, FieldObservation, aggregate, aggregate_by_collection,
};
pub use emit::{EmitOptions, output_path, render_collection, write_collection};
pub use error::{Result, SchemaError};
pub use group::{GroupedField, organize, organize_fields, split_group};
pub use infer::{FieldFormat, FieldKind, InferredField, infer_field, infer_fields};
pub use naming::{to_camel_case, to_pascal_case};
pub use scanner::{
    FileRecord, ScanError, ScanOutcome, collection_of, extract_frontmatter, parse_file,
    scan_directory,
};
pub use value::{FieldMap, FieldValue, PrimitiveType, resolve_path};
