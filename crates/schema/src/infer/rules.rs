//! Ordered type-mapping rules.
//!
//! Each rule pairs a predicate with a producer; [`RULES`] is evaluated top to
//! bottom and the first matching rule decides the field's shape. The last
//! rule always matches.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

use super::{FieldFormat, FieldKind};
use crate::aggregate::{FieldObservation, MAX_DISTINCT_VALUES};
use crate::value::{FieldValue, PrimitiveType};

/// Fields with a required ratio above this are marked required.
pub const REQUIRED_THRESHOLD: f64 = 0.9;

/// Mean sample length above which a string field is long text.
pub const LONG_TEXT_THRESHOLD: f64 = 200.0;

/// Most options a selection field may have.
pub const MAX_SELECTION_OPTIONS: usize = MAX_DISTINCT_VALUES;

/// Longest value accepted as a selection option.
pub const MAX_OPTION_LENGTH: usize = 40;

/// Each option must occur this many times on average.
pub const MIN_OCCURRENCES_PER_OPTION: usize = 2;

/// Everything a rule may look at.
pub struct RuleInput<'a> {
    pub name: &'a str,
    pub observation: &'a FieldObservation,
    pub dominant: Option<PrimitiveType>,
}

impl RuleInput<'_> {
    fn required(&self) -> bool {
        self.observation.required_ratio() > REQUIRED_THRESHOLD
    }

    fn string_samples(&self) -> impl Iterator<Item = &str> {
        self.observation.samples.iter().filter_map(FieldValue::as_str)
    }

    /// True if there is at least one sample and every sample satisfies `pred`.
    fn all_samples(&self, pred: impl Fn(&FieldValue) -> bool) -> bool {
        !self.observation.samples.is_empty() && self.observation.samples.iter().all(pred)
    }

    /// Options for a string field drawn from a small, repeated value set.
    fn selection_options(&self) -> Option<Vec<String>> {
        let observation = self.observation;
        if self.dominant != Some(PrimitiveType::String) || observation.types.len() != 1 {
            return None;
        }
        let values = observation.distinct.values()?;
        let fits = (2..=MAX_SELECTION_OPTIONS).contains(&values.len())
            && observation.non_empty >= values.len() * MIN_OCCURRENCES_PER_OPTION
            && values.iter().all(|v| v.chars().count() <= MAX_OPTION_LENGTH);
        fits.then(|| values.iter().cloned().collect())
    }
}

/// The shape a rule assigns to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    pub indexed: bool,
    pub format: Option<FieldFormat>,
    pub options: Vec<String>,
}

impl Shape {
    pub(crate) fn of(kind: FieldKind, required: bool) -> Self {
        Self {
            kind,
            required,
            unique: false,
            indexed: false,
            format: None,
            options: Vec::new(),
        }
    }
}

pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&RuleInput<'_>) -> bool,
    pub produce: fn(&RuleInput<'_>) -> Shape,
}

/// Type-mapping rules in priority order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "slug",
        matches: |input| input.name == "slug",
        produce: |_| Shape {
            kind: FieldKind::Text,
            required: true,
            unique: true,
            indexed: true,
            format: None,
            options: Vec::new(),
        },
    },
    Rule {
        name: "email",
        matches: |input| {
            input.name.to_ascii_lowercase().contains("email")
                && input.all_samples(|v| v.as_str().is_some_and(looks_like_email))
        },
        produce: |input| Shape::of(FieldKind::Email, input.required()),
    },
    Rule {
        name: "url",
        matches: |input| {
            input.all_samples(|v| v.as_str().is_some_and(|s| s.starts_with("http")))
        },
        produce: |input| Shape {
            format: Some(FieldFormat::Url),
            ..Shape::of(FieldKind::Text, input.required())
        },
    },
    Rule {
        name: "boolean",
        matches: |input| input.dominant == Some(PrimitiveType::Boolean),
        produce: |_| Shape::of(FieldKind::Boolean, false),
    },
    Rule {
        name: "number",
        matches: |input| input.dominant == Some(PrimitiveType::Number),
        produce: |input| Shape::of(FieldKind::Number, input.required()),
    },
    Rule {
        name: "date",
        matches: |input| {
            input.dominant == Some(PrimitiveType::String)
                && input.string_samples().next().is_some()
                && input.string_samples().all(looks_like_date)
        },
        produce: |input| Shape::of(FieldKind::Date, input.required()),
    },
    Rule {
        name: "selection",
        matches: |input| input.selection_options().is_some(),
        produce: |input| Shape {
            options: input.selection_options().unwrap_or_default(),
            ..Shape::of(FieldKind::Selection, input.required())
        },
    },
    Rule {
        name: "long-text",
        matches: |input| {
            input.dominant == Some(PrimitiveType::String)
                && mean_length(input.string_samples()) > LONG_TEXT_THRESHOLD
        },
        produce: |input| Shape::of(FieldKind::LongText, input.required()),
    },
    Rule {
        name: "list",
        matches: |input| match input.dominant {
            Some(PrimitiveType::Array) => true,
            Some(PrimitiveType::Object) => {
                matches!(input.observation.samples.first(), Some(FieldValue::List(_)))
            }
            _ => false,
        },
        produce: |_| Shape::of(FieldKind::List, false),
    },
    Rule {
        name: "text",
        matches: |_| true,
        produce: |input| Shape::of(FieldKind::Text, input.required()),
    },
];

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
    })
}

pub fn looks_like_email(s: &str) -> bool {
    email_pattern().is_match(s.trim())
}

/// ISO-8601 calendar date, local date-time, or RFC 3339 timestamp.
pub fn looks_like_date(s: &str) -> bool {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
}

fn mean_length<'a>(samples: impl Iterator<Item = &'a str>) -> f64 {
    let (count, total) = samples.fold((0usize, 0usize), |(n, len), s| {
        (n + 1, len + s.chars().count())
    });
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(looks_like_email("support@acme-energy.com"));
        assert!(looks_like_email(" first.last+tag@mail.example.org "));
        assert!(!looks_like_email("not an email"));
        assert!(!looks_like_email("missing@tld"));
    }

    #[test]
    fn test_date_shapes() {
        assert!(looks_like_date("2024-01-15"));
        assert!(looks_like_date("2024-01-15T08:30:00Z"));
        assert!(looks_like_date("2024-01-15T08:30:00"));
        assert!(looks_like_date("2024-01-15 08:30:00"));
        assert!(!looks_like_date("January 15, 2024"));
        assert!(!looks_like_date("2024-13-01"));
    }

    #[test]
    fn test_last_rule_always_matches() {
        let observation = FieldObservation::default();
        let input = RuleInput {
            name: "anything",
            observation: &observation,
            dominant: None,
        };
        let last = RULES.last().unwrap();
        assert_eq!(last.name, "text");
        assert!((last.matches)(&input));
    }

    #[test]
    fn test_selection_needs_repeated_short_values() {
        let mut observation = FieldObservation::default();
        for value in ["fixed", "variable", "fixed", "indexed", "variable", "fixed"] {
            observation.observe(&FieldValue::from(value));
        }
        let input = RuleInput {
            name: "rateType",
            observation: &observation,
            dominant: Some(PrimitiveType::String),
        };
        assert_eq!(
            input.selection_options(),
            Some(vec!["fixed".to_string(), "indexed".to_string(), "variable".to_string()])
        );

        // Every value distinct: a free-text field.
        let mut observation = FieldObservation::default();
        for value in ["Acme", "Volt", "Gexa", "Rhythm"] {
            observation.observe(&FieldValue::from(value));
        }
        let input = RuleInput {
            name: "name",
            observation: &observation,
            dominant: Some(PrimitiveType::String),
        };
        assert_eq!(input.selection_options(), None);

        // A single repeated value is not a choice.
        let mut observation = FieldObservation::default();
        for _ in 0..4 {
            observation.observe(&FieldValue::from("Jane"));
        }
        let input = RuleInput {
            name: "author",
            observation: &observation,
            dominant: Some(PrimitiveType::String),
        };
        assert_eq!(input.selection_options(), None);
    }

    #[test]
    fn test_mean_length() {
        assert_eq!(mean_length(["ab", "abcd"].into_iter()), 3.0);
        assert_eq!(mean_length(std::iter::empty()), 0.0);
    }
}
