//! Field type inference.
//!
//! Maps one [`FieldObservation`] to exactly one [`InferredField`] by running
//! the ordered rule list in [`rules::RULES`].
//!
//! Invariants:
//! - Mixed observed types never fail inference; the dominant sample type is
//!   used and the field carries a review warning.
//! - An exact frequency tie falls back to the first-seen sample's type.

pub mod rules;

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::aggregate::{Aggregation, FieldObservation};
use crate::naming::to_camel_case;
use crate::value::PrimitiveType;
use rules::{RULES, RuleInput};

/// CMS field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    LongText,
    Boolean,
    Number,
    Date,
    Selection,
    Email,
    List,
    NestedGroup,
}

impl FieldKind {
    /// Payload field `type` for this kind.
    pub fn payload_type(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::LongText => "textarea",
            Self::Boolean => "checkbox",
            Self::Number => "number",
            Self::Date => "date",
            Self::Selection => "select",
            Self::Email => "email",
            Self::List => "array",
            Self::NestedGroup => "group",
        }
    }
}

/// Format constraint layered on a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFormat {
    Url,
}

/// A field definition ready for grouping and emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferredField {
    pub name: String,
    /// Frontmatter key the field was inferred from.
    pub source_name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    pub indexed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
}

/// Most frequent type among samples.
///
/// Returns the chosen type and whether the choice was a frequency tie.
fn dominant_type(observation: &FieldObservation) -> (Option<PrimitiveType>, bool) {
    let mut counts: HashMap<PrimitiveType, usize> = HashMap::new();
    let mut first_seen: Vec<PrimitiveType> = Vec::new();
    for tag in observation.samples.iter().filter_map(|s| s.primitive_type()) {
        let count = counts.entry(tag).or_insert(0);
        if *count == 0 {
            first_seen.push(tag);
        }
        *count += 1;
    }

    if first_seen.is_empty() {
        let mut types = observation.types.iter().copied();
        return (types.next(), types.next().is_some());
    }

    let best = first_seen.iter().map(|t| counts[t]).max().unwrap_or(0);
    let leaders: Vec<PrimitiveType> = first_seen
        .into_iter()
        .filter(|t| counts[t] == best)
        .collect();
    (leaders.first().copied(), leaders.len() > 1)
}

fn review_message(observation: &FieldObservation, chosen: Option<PrimitiveType>, tie: bool) -> String {
    let observed = observation
        .types
        .iter()
        .map(PrimitiveType::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let chosen = chosen.map(|t| t.as_str()).unwrap_or("text");
    if tie {
        format!(
            "mixed types [{observed}]; frequency tie not resolved, using first-seen type {chosen}"
        )
    } else {
        format!("mixed types [{observed}]; using dominant type {chosen}")
    }
}

/// Infer the definition of one field.
pub fn infer_field(name: &str, observation: &FieldObservation) -> InferredField {
    let camel = to_camel_case(name);
    let (dominant, tie) = dominant_type(observation);
    let input = RuleInput {
        name: &camel,
        observation,
        dominant,
    };

    let (rule_name, shape) = RULES
        .iter()
        .find(|rule| (rule.matches)(&input))
        .map(|rule| (rule.name, (rule.produce)(&input)))
        .unwrap_or_else(|| ("text", rules::Shape::of(FieldKind::Text, false)));

    let review =
        (observation.types.len() > 1).then(|| review_message(observation, dominant, tie));

    debug!(field = %name, rule = rule_name, kind = ?shape.kind, "Inferred field");

    InferredField {
        name: camel,
        source_name: name.to_string(),
        kind: shape.kind,
        required: shape.required,
        unique: shape.unique,
        indexed: shape.indexed,
        format: shape.format,
        options: shape.options,
        review,
    }
}

/// Infer every field of an aggregation, in first-seen order.
///
/// Keys that camelCase to the same name (`publish_date`, `publishDate`) are
/// merged into one field named after the first-seen key, with a review
/// warning listing every key.
pub fn infer_fields(aggregation: &Aggregation) -> Vec<InferredField> {
    let mut merged: Vec<(String, Vec<&str>, FieldObservation)> = Vec::new();
    for (name, observation) in aggregation.iter() {
        let camel = to_camel_case(name);
        match merged.iter_mut().find(|(existing, _, _)| *existing == camel) {
            Some((_, keys, combined)) => {
                keys.push(name);
                combined.merge(observation);
            }
            None => merged.push((camel, vec![name], observation.clone())),
        }
    }

    merged
        .into_iter()
        .map(|(camel, keys, observation)| {
            let mut field = infer_field(keys[0], &observation);
            if keys.len() > 1 {
                let collision = format!("keys [{}] all map to {camel}; merged", keys.join(", "));
                field.review = Some(match field.review.take() {
                    Some(review) => format!("{collision}; {review}"),
                    None => collision,
                });
            }
            field
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;
    use std::collections::BTreeSet;

    fn observation(total: usize, samples: Vec<FieldValue>) -> FieldObservation {
        let types: BTreeSet<PrimitiveType> =
            samples.iter().filter_map(FieldValue::primitive_type).collect();
        FieldObservation {
            types,
            total,
            non_empty: samples.len(),
            samples,
            ..FieldObservation::default()
        }
    }

    #[test]
    fn test_slug_is_unique_indexed() {
        let field = infer_field("slug", &observation(4, vec![FieldValue::from("a")]));
        assert_eq!(field.kind, FieldKind::Text);
        assert!(field.required && field.unique && field.indexed);
    }

    #[test]
    fn test_email_field() {
        let obs = observation(1, vec![FieldValue::from("help@acme.com")]);
        let field = infer_field("support_email", &obs);
        assert_eq!(field.kind, FieldKind::Email);
        assert_eq!(field.name, "supportEmail");
        assert!(field.required);
    }

    #[test]
    fn test_email_name_with_non_email_sample_is_text() {
        let obs = observation(1, vec![FieldValue::from("call us")]);
        assert_eq!(infer_field("email_note", &obs).kind, FieldKind::Text);
    }

    #[test]
    fn test_url_field() {
        let obs = observation(
            3,
            vec![
                FieldValue::from("https://acme.com"),
                FieldValue::from("http://volt.com"),
            ],
        );
        let field = infer_field("website", &obs);
        assert_eq!(field.kind, FieldKind::Text);
        assert_eq!(field.format, Some(FieldFormat::Url));
        assert!(!field.required);
    }

    #[test]
    fn test_boolean_and_number() {
        let obs = observation(2, vec![FieldValue::Bool(true), FieldValue::Bool(false)]);
        let field = infer_field("featured", &obs);
        assert_eq!(field.kind, FieldKind::Boolean);
        assert!(!field.required);

        let obs = observation(2, vec![FieldValue::from(4.5), FieldValue::from(3.0)]);
        let field = infer_field("rating", &obs);
        assert_eq!(field.kind, FieldKind::Number);
        assert!(field.required);
    }

    #[test]
    fn test_date_field() {
        let obs = observation(2, vec![FieldValue::from("2024-01-15")]);
        let field = infer_field("publish_date", &obs);
        assert_eq!(field.kind, FieldKind::Date);
        assert_eq!(field.name, "publishDate");
    }

    #[test]
    fn test_long_text() {
        let long = "x".repeat(250);
        let obs = observation(1, vec![FieldValue::from(long.as_str())]);
        assert_eq!(infer_field("body", &obs).kind, FieldKind::LongText);

        let obs = observation(1, vec![FieldValue::from("short")]);
        assert_eq!(infer_field("body", &obs).kind, FieldKind::Text);
    }

    #[test]
    fn test_list_field() {
        let obs = observation(
            1,
            vec![FieldValue::List(vec![FieldValue::from("solar")])],
        );
        let field = infer_field("tags", &obs);
        assert_eq!(field.kind, FieldKind::List);
        assert!(field.review.is_none());
    }

    #[test]
    fn test_required_threshold_boundary() {
        let mut obs = observation(10, vec![FieldValue::from("a")]);
        obs.non_empty = 9;
        assert!(!infer_field("title", &obs).required);

        obs.total = 9;
        assert!(infer_field("title", &obs).required);
    }

    #[test]
    fn test_mixed_types_use_dominant_with_review() {
        let obs = observation(
            3,
            vec![
                FieldValue::from("12"),
                FieldValue::from(7.0),
                FieldValue::from(8.0),
            ],
        );
        let field = infer_field("wp_post_id", &obs);
        assert_eq!(field.kind, FieldKind::Number);
        let review = field.review.unwrap();
        assert!(review.contains("dominant type number"));
        assert!(review.contains("number, string") || review.contains("string, number"));
    }

    #[test]
    fn test_tie_uses_first_seen_and_says_so() {
        let obs = observation(2, vec![FieldValue::from("x"), FieldValue::from(1.0)]);
        let field = infer_field("code", &obs);
        assert_eq!(field.kind, FieldKind::Text);
        assert!(field.review.unwrap().contains("tie not resolved"));
    }

    #[test]
    fn test_low_cardinality_strings_become_selection() {
        let mut obs = FieldObservation::default();
        for value in ["variable", "fixed", "fixed", "variable"] {
            obs.observe(&FieldValue::from(value));
        }
        let field = infer_field("rate_type", &obs);
        assert_eq!(field.kind, FieldKind::Selection);
        assert_eq!(field.options, vec!["fixed", "variable"]);
        assert!(field.required);

        let obs = observation(2, vec![FieldValue::from("a"), FieldValue::from("b")]);
        let field = infer_field("code", &obs);
        assert_eq!(field.kind, FieldKind::Text);
        assert!(field.options.is_empty());
    }

    #[test]
    fn test_camel_case_collisions_merge_into_one_field() {
        use crate::scanner::FileRecord;
        use std::path::PathBuf;

        let record = |key: &str, value: &str| FileRecord {
            path: PathBuf::from("posts/x.md"),
            collection: "posts".to_string(),
            locale: None,
            fields: vec![
                ("title".to_string(), FieldValue::from("T")),
                (key.to_string(), FieldValue::from(value)),
            ],
        };
        let agg = crate::aggregate::aggregate(&[
            record("publish_date", "2024-01-15"),
            record("publishDate", "2024-02-01"),
        ]);

        let fields = infer_fields(&agg);
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "publishDate"]);

        let publish = &fields[1];
        assert_eq!(publish.source_name, "publish_date");
        assert_eq!(publish.kind, FieldKind::Date);
        assert!(publish.required);
        assert_eq!(
            publish.review.as_deref(),
            Some("keys [publish_date, publishDate] all map to publishDate; merged")
        );
        assert!(fields[0].review.is_none());
    }

    #[test]
    fn test_all_null_field_defaults_to_text() {
        let obs = FieldObservation {
            total: 3,
            ..FieldObservation::default()
        };
        let field = infer_field("legacy", &obs);
        assert_eq!(field.kind, FieldKind::Text);
        assert!(!field.required);
        assert!(field.review.is_none());
    }
}
