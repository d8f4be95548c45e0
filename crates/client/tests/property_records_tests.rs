//! Property-based tests for record extraction and document building.
//!
//! This module uses proptest to verify:
//! - Every entry of a pricing response is either a record or a reject
//! - Record and reject keys keep the entry's position in the response
//! - A migrated document does not depend on frontmatter key order

use std::path::PathBuf;

use cms_client::extract_records;
use cms_client::migrate::build_document;
use cms_schema::{FieldMap, FieldValue, FileRecord};
use proptest::prelude::*;
use serde_json::{Value, json};

fn pricing_entry() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(|id| json!({"id": id, "name": "Provider"})),
        any::<i32>().prop_map(|rate| json!({"rate": rate})),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(Value::String),
        Just(Value::Null),
        Just(json!([1, 2])),
    ]
}

const FRONTMATTER_KEYS: &[&str] = &[
    "title",
    "slug",
    "seo",
    "seo_title",
    "seo_description",
    "meta",
    "meta_title",
    "hero_image",
    "wp_post_id",
];

fn frontmatter_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(FieldValue::from),
        any::<bool>().prop_map(FieldValue::Bool),
        ("[a-z]{1,6}", "[a-z]{1,6}").prop_map(|(title, keywords)| {
            let mut map = FieldMap::new();
            map.insert("title".to_string(), FieldValue::from(title));
            map.insert("keywords".to_string(), FieldValue::from(keywords));
            FieldValue::Map(map)
        }),
    ]
}

fn frontmatter() -> impl Strategy<Value = Vec<(String, FieldValue)>> {
    proptest::sample::subsequence(FRONTMATTER_KEYS, 0..=FRONTMATTER_KEYS.len()).prop_flat_map(
        |keys| {
            let values = proptest::collection::vec(frontmatter_value(), keys.len());
            (Just(keys), values).prop_map(|(keys, values)| {
                keys.into_iter()
                    .map(str::to_string)
                    .zip(values)
                    .collect::<Vec<_>>()
            })
        },
    )
}

fn record(fields: Vec<(String, FieldValue)>) -> FileRecord {
    FileRecord {
        path: PathBuf::from("content/posts/entry.md"),
        collection: "posts".to_string(),
        locale: None,
        fields,
    }
}

proptest! {
    /// # Invariants Tested
    /// - records + rejects == entries in the response
    /// - Object entries become records keyed by `id` or `#index`
    /// - Every other entry is rejected with key `#index`
    #[test]
    fn test_extract_partitions_entries(entries in proptest::collection::vec(pricing_entry(), 0..20)) {
        let extracted = extract_records(Value::Array(entries.clone())).unwrap();

        prop_assert_eq!(extracted.total(), entries.len());

        let mut positions: Vec<usize> = extracted.records.iter().map(|r| r.index).collect();
        for failure in &extracted.rejected {
            let index: usize = failure.key.trim_start_matches('#').parse().unwrap();
            prop_assert!(!entries[index].is_object());
            positions.push(index);
        }
        positions.sort_unstable();
        prop_assert_eq!(positions, (0..entries.len()).collect::<Vec<_>>());

        for record in &extracted.records {
            prop_assert!(entries[record.index].is_object());
            let expected = match entries[record.index].get("id") {
                Some(Value::String(id)) => id.clone(),
                _ => format!("#{}", record.index),
            };
            prop_assert_eq!(record.key(), expected);
        }
    }

    /// # Invariants Tested
    /// - Shuffling frontmatter keys never changes the built document
    #[test]
    fn test_build_document_ignores_key_order(
        (fields, shuffled) in frontmatter().prop_flat_map(|fields| {
            (Just(fields.clone()), Just(fields).prop_shuffle())
        })
    ) {
        prop_assert_eq!(build_document(&record(fields)), build_document(&record(shuffled)));
    }
}
