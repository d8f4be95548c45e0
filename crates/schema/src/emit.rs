//! Payload `CollectionConfig` emitter.
//!
//! Renders one TypeScript module per collection: the organized field list
//! plus fixed access, versioning, timestamp and soft-delete boilerplate.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, SchemaError};
use crate::group::GroupedField;
use crate::infer::{FieldFormat, FieldKind, InferredField};
use crate::naming::to_pascal_case;

/// Field names Payload manages itself; never emitted from content.
const RESERVED_FIELDS: &[&str] = &["id", "createdAt", "updatedAt", "deletedAt"];

/// Emission settings.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Maximum stored versions per document.
    pub max_versions: u32,
    pub soft_delete_field: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            max_versions: 50,
            soft_delete_field: "deletedAt".to_string(),
        }
    }
}

/// Quote a string as a single-quoted TypeScript literal.
fn ts_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn write_field(out: &mut String, field: &InferredField, indent: usize) {
    let pad = " ".repeat(indent);
    if let Some(review) = &field.review {
        let _ = writeln!(out, "{pad}// REVIEW: {review}");
    }
    let _ = writeln!(out, "{pad}{{");
    let _ = writeln!(out, "{pad}  name: {},", ts_str(&field.name));
    let _ = writeln!(out, "{pad}  type: {},", ts_str(field.kind.payload_type()));
    if field.required {
        let _ = writeln!(out, "{pad}  required: true,");
    }
    if field.unique {
        let _ = writeln!(out, "{pad}  unique: true,");
    }
    if field.indexed {
        let _ = writeln!(out, "{pad}  index: true,");
    }
    if field.format == Some(FieldFormat::Url) {
        let _ = writeln!(
            out,
            "{pad}  validate: (value: string | null | undefined) =>\n{pad}    !value || /^https?:\\/\\//.test(value) || 'Must be an http(s) URL',"
        );
    }
    match field.kind {
        FieldKind::Selection => {
            let options = field
                .options
                .iter()
                .map(|o| ts_str(o))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "{pad}  options: [{options}],");
        }
        FieldKind::List => {
            let _ = writeln!(out, "{pad}  // Element schema pending refinement.");
            let _ = writeln!(out, "{pad}  fields: [],");
        }
        _ => {}
    }
    let _ = writeln!(out, "{pad}}},");
}

fn write_group(out: &mut String, name: &str, fields: &[InferredField], indent: usize) {
    let pad = " ".repeat(indent);
    let _ = writeln!(out, "{pad}{{");
    let _ = writeln!(out, "{pad}  name: {},", ts_str(name));
    let _ = writeln!(out, "{pad}  type: {},", ts_str(FieldKind::NestedGroup.payload_type()));
    let _ = writeln!(out, "{pad}  fields: [");
    for field in fields {
        write_field(out, field, indent + 4);
    }
    let _ = writeln!(out, "{pad}  ],");
    let _ = writeln!(out, "{pad}}},");
}

fn has_title(fields: &[GroupedField]) -> bool {
    fields
        .iter()
        .any(|f| matches!(f, GroupedField::Single(field) if field.name == "title"))
}

/// Render the TypeScript module for one collection.
pub fn render_collection(collection: &str, fields: &[GroupedField], options: &EmitOptions) -> String {
    let ident = to_pascal_case(collection);
    let mut out = String::new();

    let _ = writeln!(out, "import type {{ CollectionConfig }} from 'payload'");
    let _ = writeln!(out);
    let _ = writeln!(out, "export const {ident}: CollectionConfig = {{");
    let _ = writeln!(out, "  slug: {},", ts_str(collection));
    if has_title(fields) {
        let _ = writeln!(out, "  admin: {{");
        let _ = writeln!(out, "    useAsTitle: 'title',");
        let _ = writeln!(out, "  }},");
    }
    let _ = writeln!(out, "  access: {{");
    let _ = writeln!(out, "    read: () => true,");
    for op in ["create", "update", "delete"] {
        let _ = writeln!(out, "    {op}: ({{ req: {{ user }} }}) => Boolean(user),");
    }
    let _ = writeln!(out, "  }},");
    let _ = writeln!(out, "  versions: {{");
    let _ = writeln!(out, "    maxPerDoc: {},", options.max_versions);
    let _ = writeln!(out, "  }},");
    let _ = writeln!(out, "  timestamps: true,");
    let _ = writeln!(out, "  fields: [");

    for entry in fields {
        match entry {
            GroupedField::Single(field) => {
                if RESERVED_FIELDS.contains(&field.name.as_str())
                    || field.name == options.soft_delete_field
                {
                    continue;
                }
                write_field(&mut out, field, 4);
            }
            GroupedField::Group { name, fields } => write_group(&mut out, name, fields, 4),
        }
    }

    let _ = writeln!(out, "    {{");
    let _ = writeln!(out, "      name: {},", ts_str(&options.soft_delete_field));
    let _ = writeln!(out, "      type: 'date',");
    let _ = writeln!(out, "      index: true,");
    let _ = writeln!(out, "      admin: {{");
    let _ = writeln!(out, "        position: 'sidebar',");
    let _ = writeln!(out, "        readOnly: true,");
    let _ = writeln!(out, "      }},");
    let _ = writeln!(out, "    }},");
    let _ = writeln!(out, "  ],");
    let _ = writeln!(out, "}}");

    out
}

/// Path of the emitted module for `collection` under `out_dir`.
pub fn output_path(out_dir: &Path, collection: &str) -> PathBuf {
    out_dir.join(format!("{}.ts", to_pascal_case(collection)))
}

/// Render and write one collection module, creating `out_dir` if needed.
pub fn write_collection(
    out_dir: &Path,
    collection: &str,
    fields: &[GroupedField],
    options: &EmitOptions,
) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir).map_err(|source| SchemaError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let path = output_path(out_dir, collection);
    let rendered = render_collection(collection, fields, options);
    std::fs::write(&path, rendered).map_err(|source| SchemaError::Io {
        path: path.clone(),
        source,
    })?;

    info!(collection, path = %path.display(), "Wrote collection schema");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::FieldKind;

    fn field(name: &str, kind: FieldKind) -> InferredField {
        InferredField {
            name: name.to_string(),
            source_name: name.to_string(),
            kind,
            required: false,
            unique: false,
            indexed: false,
            format: None,
            options: Vec::new(),
            review: None,
        }
    }

    #[test]
    fn test_render_boilerplate() {
        let ts = render_collection(
            "electricity-providers",
            &[GroupedField::Single(field("title", FieldKind::Text))],
            &EmitOptions::default(),
        );

        assert!(ts.starts_with("import type { CollectionConfig } from 'payload'\n"));
        assert!(ts.contains("export const ElectricityProviders: CollectionConfig = {"));
        assert!(ts.contains("  slug: 'electricity-providers',"));
        assert!(ts.contains("useAsTitle: 'title'"));
        assert!(ts.contains("read: () => true,"));
        assert!(ts.contains("delete: ({ req: { user } }) => Boolean(user),"));
        assert!(ts.contains("maxPerDoc: 50,"));
        assert!(ts.contains("timestamps: true,"));
        assert!(ts.contains("name: 'deletedAt',"));
        assert!(ts.trim_end().ends_with('}'));
    }

    #[test]
    fn test_render_field_flags_and_group() {
        let mut slug = field("slug", FieldKind::Text);
        slug.required = true;
        slug.unique = true;
        slug.indexed = true;
        let mut site = field("website", FieldKind::Text);
        site.format = Some(FieldFormat::Url);
        let mut rank = field("rank", FieldKind::Number);
        rank.review = Some("mixed types [string, number]".to_string());

        let ts = render_collection(
            "posts",
            &[
                GroupedField::Single(slug),
                GroupedField::Single(site),
                GroupedField::Single(rank),
                GroupedField::Group {
                    name: "seo".to_string(),
                    fields: vec![field("title", FieldKind::Text)],
                },
            ],
            &EmitOptions::default(),
        );

        assert!(ts.contains("      required: true,\n      unique: true,\n      index: true,"));
        assert!(ts.contains("validate: (value: string | null | undefined)"));
        assert!(ts.contains("    // REVIEW: mixed types [string, number]"));
        assert!(ts.contains("      name: 'seo',\n      type: 'group',"));
        assert!(ts.contains("        name: 'title',"));
        assert!(!ts.contains("useAsTitle"));
    }

    #[test]
    fn test_reserved_fields_skipped() {
        let ts = render_collection(
            "posts",
            &[
                GroupedField::Single(field("deletedAt", FieldKind::Date)),
                GroupedField::Single(field("id", FieldKind::Number)),
            ],
            &EmitOptions::default(),
        );
        assert_eq!(ts.matches("name: 'deletedAt'").count(), 1);
        assert!(!ts.contains("name: 'id'"));
    }

    #[test]
    fn test_list_and_selection() {
        let mut select = field("plan", FieldKind::Selection);
        select.options = vec!["fixed".to_string(), "variable".to_string()];
        let ts = render_collection(
            "plans",
            &[
                GroupedField::Single(field("tags", FieldKind::List)),
                GroupedField::Single(select),
            ],
            &EmitOptions::default(),
        );
        assert!(ts.contains("type: 'array',"));
        assert!(ts.contains("fields: [],"));
        assert!(ts.contains("options: ['fixed', 'variable'],"));
    }

    #[test]
    fn test_ts_str_escapes() {
        assert_eq!(ts_str("it's"), r"'it\'s'");
        assert_eq!(ts_str("a\\b"), r"'a\\b'");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("out"), "provider-metadatas"),
            PathBuf::from("out/ProviderMetadatas.ts")
        );
    }
}
