//! Individual validation layers.

use std::collections::HashMap;

use cms_schema::FieldValue;

use super::ValidationConfig;
use super::report::{Layer, ValidationResult};
use crate::endpoints::{Filter, FindQuery};
use crate::error::Result;
use crate::models::Document;
use crate::store::DocumentStore;

fn active_filter(config: &ValidationConfig) -> Filter {
    Filter::new().is_null(&config.soft_delete_field)
}

/// Records to inspect: the configured sample ids, or the first `size` active
/// records. Sample ids that do not resolve are returned as errors.
async fn sample<S>(
    store: &mut S,
    config: &ValidationConfig,
    size: usize,
) -> Result<(Vec<Document>, Vec<String>)>
where
    S: DocumentStore + ?Sized,
{
    if config.sample_ids.is_empty() {
        let query = FindQuery::new(active_filter(config))
            .limit(size as u64)
            .depth(0);
        let page = store.find(&config.collection, &query).await?;
        return Ok((page.docs, Vec::new()));
    }

    let mut docs = Vec::with_capacity(config.sample_ids.len());
    let mut missing = Vec::new();
    for id in &config.sample_ids {
        match store.find_by_id(&config.collection, id).await? {
            Some(doc) => docs.push(doc),
            None => missing.push(format!("sample record {id} not found")),
        }
    }
    Ok((docs, missing))
}

pub(super) async fn count<S>(store: &mut S, config: &ValidationConfig) -> ValidationResult
where
    S: DocumentStore + ?Sized,
{
    let live = match store.count(&config.collection, &active_filter(config)).await {
        Ok(n) => n,
        Err(e) => return ValidationResult::failed(Layer::Count, format!("count failed: {e}")),
    };

    match config.expected_count {
        Some(expected) if expected == live => ValidationResult::from_errors(
            Layer::Count,
            format!("expected {expected}, found {live}"),
            Vec::new(),
        ),
        Some(expected) => ValidationResult::from_errors(
            Layer::Count,
            format!("expected {expected}, found {live}"),
            vec![format!(
                "active record count mismatch: expected {expected}, found {live}"
            )],
        ),
        None => ValidationResult::from_errors(
            Layer::Count,
            format!("found {live} (no expected count)"),
            Vec::new(),
        )
        .with_warning("no expected count configured"),
    }
}

pub(super) async fn required_fields<S>(store: &mut S, config: &ValidationConfig) -> ValidationResult
where
    S: DocumentStore + ?Sized,
{
    if config.required_fields.is_empty() {
        return ValidationResult::from_errors(
            Layer::RequiredFields,
            "no required fields configured",
            Vec::new(),
        );
    }

    let (docs, mut errors) = match sample(store, config, config.required_sample_size).await {
        Ok(sampled) => sampled,
        Err(e) => {
            return ValidationResult::failed(Layer::RequiredFields, format!("sampling failed: {e}"));
        }
    };

    for doc in &docs {
        for path in &config.required_fields {
            if doc.resolve(path).is_none_or(FieldValue::is_empty) {
                errors.push(format!(
                    "record {}: required field '{path}' is missing or empty",
                    doc.display_id()
                ));
            }
        }
    }

    let message = format!(
        "{} record(s) x {} field(s), {} failure(s)",
        docs.len(),
        config.required_fields.len(),
        errors.len()
    );
    ValidationResult::from_errors(Layer::RequiredFields, message, errors)
}

pub(super) async fn soft_delete<S>(store: &mut S, config: &ValidationConfig) -> ValidationResult
where
    S: DocumentStore + ?Sized,
{
    let field = &config.soft_delete_field;
    let query = FindQuery::new(active_filter(config)).limit(1).depth(0);
    let page = match store.find(&config.collection, &query).await {
        Ok(page) => page,
        Err(e) => return ValidationResult::failed(Layer::SoftDelete, format!("query failed: {e}")),
    };

    let Some(doc) = page.docs.first() else {
        return ValidationResult::failed(Layer::SoftDelete, "no active record found");
    };

    match doc.get(field) {
        Some(FieldValue::Null) => ValidationResult::from_errors(
            Layer::SoftDelete,
            format!("record {} has {field} = null", doc.display_id()),
            Vec::new(),
        ),
        Some(other) => ValidationResult::failed(
            Layer::SoftDelete,
            format!(
                "record {}: expected {field} to be null, found {other}",
                doc.display_id()
            ),
        ),
        None => ValidationResult::failed(
            Layer::SoftDelete,
            format!("record {}: field '{field}' is missing", doc.display_id()),
        ),
    }
}

/// One entry of a relationship field.
#[derive(Debug, PartialEq)]
enum Reference {
    Id(String),
    Unresolvable(String),
}

fn reference(value: &FieldValue) -> Option<Reference> {
    match value {
        FieldValue::Null => None,
        FieldValue::String(s) if s.is_empty() => None,
        FieldValue::String(_) | FieldValue::Number(_) => Some(Reference::Id(value.to_string())),
        FieldValue::Map(map) => match map.get("id") {
            Some(id @ (FieldValue::String(_) | FieldValue::Number(_))) if !id.is_empty() => {
                Some(Reference::Id(id.to_string()))
            }
            _ => Some(Reference::Unresolvable(value.to_string())),
        },
        other => Some(Reference::Unresolvable(other.to_string())),
    }
}

/// Entries of a relationship value.
///
/// A has-many relationship holding a single reference is read as a
/// one-element list. A single-valued relationship holding a list is a shape
/// error.
fn references(value: &FieldValue, has_many: bool) -> std::result::Result<Vec<Reference>, &'static str> {
    match value {
        FieldValue::List(items) if has_many => Ok(items.iter().filter_map(reference).collect()),
        FieldValue::List(_) => Err("holds a list but the relationship is single-valued"),
        single => Ok(reference(single).into_iter().collect()),
    }
}

pub(super) async fn relationships<S>(store: &mut S, config: &ValidationConfig) -> ValidationResult
where
    S: DocumentStore + ?Sized,
{
    if config.relationships.is_empty() {
        return ValidationResult::from_errors(
            Layer::Relationships,
            "no relationships configured",
            Vec::new(),
        );
    }

    let (docs, mut errors) = match sample(store, config, config.relationship_sample_size).await {
        Ok(sampled) => sampled,
        Err(e) => {
            return ValidationResult::failed(Layer::Relationships, format!("sampling failed: {e}"));
        }
    };

    let mut resolved: HashMap<(String, String), bool> = HashMap::new();
    let mut checked = 0usize;

    for doc in &docs {
        for rule in &config.relationships {
            let Some(value) = doc.resolve(&rule.field) else {
                continue;
            };
            let entries = match references(value, rule.has_many) {
                Ok(entries) => entries,
                Err(shape) => {
                    errors.push(format!("record {}: {} {shape}", doc.display_id(), rule.field));
                    continue;
                }
            };
            for entry in entries {
                let id = match entry {
                    Reference::Id(id) => id,
                    Reference::Unresolvable(raw) => {
                        errors.push(format!(
                            "record {}: {} has unresolvable reference {raw}",
                            doc.display_id(),
                            rule.field
                        ));
                        continue;
                    }
                };
                checked += 1;

                let key = (rule.target.clone(), id.clone());
                let cached = resolved.get(&key).copied();
                let exists = match cached {
                    Some(exists) => exists,
                    None => match store.find_by_id(&rule.target, &id).await {
                        Ok(found) => {
                            resolved.insert(key, found.is_some());
                            found.is_some()
                        }
                        Err(e) => {
                            errors.push(format!(
                                "record {}: lookup of {} id {id} failed: {e}",
                                doc.display_id(),
                                rule.target
                            ));
                            continue;
                        }
                    },
                };

                if !exists {
                    errors.push(format!(
                        "record {}: {} references missing {} id {id}",
                        doc.display_id(),
                        rule.field,
                        rule.target
                    ));
                }
            }
        }
    }

    let message = format!(
        "{} record(s), {checked} reference(s) checked, {} error(s)",
        docs.len(),
        errors.len()
    );
    ValidationResult::from_errors(Layer::Relationships, message, errors)
}

pub(super) async fn field_types<S>(store: &mut S, config: &ValidationConfig) -> ValidationResult
where
    S: DocumentStore + ?Sized,
{
    if config.field_types.is_empty() {
        return ValidationResult::from_errors(
            Layer::FieldTypes,
            "no field types configured",
            Vec::new(),
        );
    }

    let (docs, mut errors) = match sample(store, config, config.field_type_sample_size).await {
        Ok(sampled) => sampled,
        Err(e) => {
            return ValidationResult::failed(Layer::FieldTypes, format!("sampling failed: {e}"));
        }
    };

    for doc in &docs {
        for (path, expected) in &config.field_types {
            let Some(actual) = doc.resolve(path).and_then(FieldValue::primitive_type) else {
                continue;
            };
            if actual != *expected {
                errors.push(format!(
                    "record {}: field '{path}' expected {expected}, found {actual}",
                    doc.display_id()
                ));
            }
        }
    }

    let message = format!(
        "{} record(s) x {} field(s), {} mismatch(es)",
        docs.len(),
        config.field_types.len(),
        errors.len()
    );
    ValidationResult::from_errors(Layer::FieldTypes, message, errors)
}

/// Admin UI checks need a browser and are not automated.
pub(super) fn ui() -> ValidationResult {
    ValidationResult::from_errors(Layer::Ui, "skipped", Vec::new())
        .with_warning("admin UI checks are not automated; verify the admin panel manually")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_forms() {
        assert_eq!(
            references(&FieldValue::from(json!("65f0c2a1")), false).unwrap(),
            vec![Reference::Id("65f0c2a1".to_string())]
        );
        assert_eq!(
            references(&FieldValue::from(json!(12)), false).unwrap(),
            vec![Reference::Id("12".to_string())]
        );
        assert_eq!(
            references(&FieldValue::from(json!({"id": "abc", "name": "Oncor"})), false).unwrap(),
            vec![Reference::Id("abc".to_string())]
        );
        assert!(references(&FieldValue::from(json!(null)), false).unwrap().is_empty());
        assert!(references(&FieldValue::from(json!("")), true).unwrap().is_empty());
    }

    #[test]
    fn test_reference_lists_and_garbage() {
        let refs = references(&FieldValue::from(json!(["a", null, {"id": 2}, true])), true).unwrap();
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0], Reference::Id("a".to_string()));
        assert_eq!(refs[1], Reference::Id("2".to_string()));
        assert!(matches!(refs[2], Reference::Unresolvable(_)));

        assert!(matches!(
            references(&FieldValue::from(json!({"name": "no id"})), false).unwrap()[0],
            Reference::Unresolvable(_)
        ));
    }

    #[test]
    fn test_reference_shape_follows_multiplicity() {
        let list = FieldValue::from(json!(["oncor", "aep"]));
        assert!(references(&list, false).is_err());
        assert_eq!(references(&list, true).unwrap().len(), 2);

        let single = FieldValue::from(json!("oncor"));
        assert_eq!(
            references(&single, true).unwrap(),
            vec![Reference::Id("oncor".to_string())]
        );
    }
}
