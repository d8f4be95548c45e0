//! Field group organizer.
//!
//! Collapses prefixed fields (`seoTitle`, `hero_image`, `wpPostId`) into named
//! groups (`seo.title`, `hero.image`, `wordpress.postId`).
//!
//! Invariants:
//! - Ungrouped fields keep their original order and come first.
//! - Groups follow in first-encountered order; inner fields keep their
//!   relative order.
//! - Organizing is idempotent: existing groups pass through untouched.
//! - A scalar field whose name equals a group name keeps that group's prefixed
//!   fields flat, so no entry name appears twice.

use serde::Serialize;
use std::collections::HashSet;

use crate::infer::{FieldKind, InferredField};
use crate::naming::to_camel_case;

/// Recognized prefixes and the group each maps to, longest first.
const GROUP_PREFIXES: &[(&str, &str)] = &[
    ("wordpress", "wordpress"),
    ("hero", "hero"),
    ("meta", "meta"),
    ("seo", "seo"),
    ("wp", "wordpress"),
];

/// A top-level schema entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GroupedField {
    Single(InferredField),
    Group {
        name: String,
        fields: Vec<InferredField>,
    },
}

/// Split a field name into `(group, inner camelCase name)` if it carries a
/// recognized prefix followed by a token boundary.
pub fn split_group(name: &str) -> Option<(&'static str, String)> {
    for &(prefix, group) in GROUP_PREFIXES {
        let Some(head) = name.get(..prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        let rest = &name[prefix.len()..];
        let boundary = match rest.chars().next() {
            Some('_') | Some('-') => true,
            Some(c) => c.is_uppercase(),
            None => false,
        };
        if !boundary {
            continue;
        }
        let inner = to_camel_case(rest);
        if inner.is_empty() {
            continue;
        }
        return Some((group, inner));
    }
    None
}

/// Organize a flat or partially grouped field list.
///
/// A scalar field named like a group keeps that group's prefixed fields flat.
pub fn organize(fields: Vec<GroupedField>) -> Vec<GroupedField> {
    let claimed: HashSet<String> = fields
        .iter()
        .filter_map(|field| match field {
            GroupedField::Single(field)
                if field.kind != FieldKind::NestedGroup && split_group(&field.name).is_none() =>
            {
                Some(field.name.clone())
            }
            _ => None,
        })
        .collect();

    let mut singles: Vec<GroupedField> = Vec::new();
    let mut groups: Vec<(String, Vec<InferredField>)> = Vec::new();

    let mut push_group = |name: String, mut inner: Vec<InferredField>| {
        match groups.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, fields)) => fields.append(&mut inner),
            None => groups.push((name, inner)),
        }
    };

    for field in fields {
        match field {
            GroupedField::Single(mut field) => match split_group(&field.name) {
                Some((group, inner)) if !claimed.contains(group) => {
                    field.name = inner;
                    push_group(group.to_string(), vec![field]);
                }
                _ => singles.push(GroupedField::Single(field)),
            },
            GroupedField::Group { name, fields } => push_group(name, fields),
        }
    }

    singles.extend(
        groups
            .into_iter()
            .map(|(name, fields)| GroupedField::Group { name, fields }),
    );
    singles
}

/// Organize freshly inferred fields.
pub fn organize_fields(fields: Vec<InferredField>) -> Vec<GroupedField> {
    organize(fields.into_iter().map(GroupedField::Single).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> InferredField {
        InferredField {
            name: name.to_string(),
            source_name: name.to_string(),
            kind: FieldKind::Text,
            required: false,
            unique: false,
            indexed: false,
            format: None,
            options: Vec::new(),
            review: None,
        }
    }

    #[test]
    fn test_split_group() {
        assert_eq!(split_group("seoTitle"), Some(("seo", "title".to_string())));
        assert_eq!(split_group("seo_title"), Some(("seo", "title".to_string())));
        assert_eq!(split_group("hero-image-url"), Some(("hero", "imageUrl".to_string())));
        assert_eq!(split_group("wpPostId"), Some(("wordpress", "postId".to_string())));
        assert_eq!(
            split_group("wordpress_author"),
            Some(("wordpress", "author".to_string()))
        );
        assert_eq!(split_group("SEO_Title"), Some(("seo", "title".to_string())));
        assert_eq!(split_group("metaDescription"), Some(("meta", "description".to_string())));
    }

    #[test]
    fn test_split_group_requires_boundary() {
        assert_eq!(split_group("metadata"), None);
        assert_eq!(split_group("heroic"), None);
        assert_eq!(split_group("seo"), None);
        assert_eq!(split_group("seo_"), None);
        assert_eq!(split_group("wpengine"), None);
        assert_eq!(split_group("title"), None);
    }

    #[test]
    fn test_organize_order() {
        let out = organize_fields(vec![
            field("title"),
            field("heroImage"),
            field("seoTitle"),
            field("slug"),
            field("heroHeadline"),
            field("seoDescription"),
        ]);

        assert_eq!(out.len(), 4);
        assert_eq!(out[0], GroupedField::Single(field("title")));
        assert_eq!(out[1], GroupedField::Single(field("slug")));
        match &out[2] {
            GroupedField::Group { name, fields } => {
                assert_eq!(name, "hero");
                let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                assert_eq!(names, vec!["image", "headline"]);
                assert_eq!(fields[0].source_name, "heroImage");
            }
            other => panic!("expected hero group, got {other:?}"),
        }
        match &out[3] {
            GroupedField::Group { name, .. } => assert_eq!(name, "seo"),
            other => panic!("expected seo group, got {other:?}"),
        }
    }

    #[test]
    fn test_scalar_field_named_like_group_keeps_prefixed_flat() {
        let out = organize_fields(vec![field("seoTitle"), field("seo"), field("heroImage")]);

        let names: Vec<&str> = out
            .iter()
            .map(|f| match f {
                GroupedField::Single(field) => field.name.as_str(),
                GroupedField::Group { name, .. } => name.as_str(),
            })
            .collect();
        assert_eq!(names, vec!["seoTitle", "seo", "hero"]);
        assert_eq!(organize(out.clone()), out);
    }

    #[test]
    fn test_organize_is_idempotent() {
        let once = organize_fields(vec![
            field("seoMetaTitle"),
            field("wpPostId"),
            field("title"),
        ]);
        let twice = organize(once.clone());
        assert_eq!(once, twice);
    }
}
