//! Query-string construction for collection lookups.
//!
//! Payload accepts nested `where` clauses in bracket notation:
//! `where[slug][equals]=acme&where[deletedAt][equals]=null`.

use cms_schema::{FieldMap, FieldValue, resolve_path};

/// Literal used by the API for a null comparison value.
const NULL_LITERAL: &str = "null";

/// Comparison operator in a `where` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    Exists,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::In => "in",
            Self::Exists => "exists",
        }
    }
}

/// One `where[field][op]=value` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: String,
}

impl Condition {
    /// Evaluate the clause against a document the way the server does.
    pub fn matches(&self, doc: &FieldMap) -> bool {
        let value = resolve_path(doc, &self.field).filter(|v| !v.is_null());
        match self.op {
            Operator::Equals => equals(value, &self.value),
            Operator::NotEquals => !equals(value, &self.value),
            Operator::In => value.is_some_and(|v| {
                let rendered = v.to_string();
                self.value.split(',').any(|candidate| candidate.trim() == rendered)
            }),
            Operator::Exists => value.is_some() == (self.value == "true"),
        }
    }
}

fn equals(value: Option<&FieldValue>, expected: &str) -> bool {
    match value {
        None => expected == NULL_LITERAL,
        Some(v) => expected != NULL_LITERAL && v.to_string() == expected,
    }
}

/// A conjunction of `where` clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, field: &str, op: Operator, value: String) -> Self {
        self.conditions.push(Condition {
            field: field.to_string(),
            op,
            value,
        });
        self
    }

    pub fn equals(self, field: &str, value: impl Into<String>) -> Self {
        self.with(field, Operator::Equals, value.into())
    }

    pub fn not_equals(self, field: &str, value: impl Into<String>) -> Self {
        self.with(field, Operator::NotEquals, value.into())
    }

    pub fn is_in(self, field: &str, values: &[String]) -> Self {
        self.with(field, Operator::In, values.join(","))
    }

    pub fn exists(self, field: &str, exists: bool) -> Self {
        self.with(field, Operator::Exists, exists.to_string())
    }

    /// Match documents whose `field` is null or absent.
    pub fn is_null(self, field: &str) -> Self {
        self.with(field, Operator::Equals, NULL_LITERAL.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// True if every clause matches `doc`.
    pub fn matches(&self, doc: &FieldMap) -> bool {
        self.conditions.iter().all(|c| c.matches(doc))
    }

    /// Bracket-notation query pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.conditions
            .iter()
            .map(|c| {
                (
                    format!("where[{}][{}]", c.field, c.op.as_str()),
                    c.value.clone(),
                )
            })
            .collect()
    }
}

/// Parameters for `GET /api/{collection}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindQuery {
    pub filter: Filter,
    pub limit: Option<u64>,
    pub page: Option<u64>,
    pub depth: Option<u8>,
    pub locale: Option<String>,
    pub sort: Option<String>,
}

impl FindQuery {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn locale(mut self, locale: Option<&str>) -> Self {
        self.locale = locale.map(str::to_string);
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.filter.to_query_pairs();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(depth) = self.depth {
            pairs.push(("depth".to_string(), depth.to_string()));
        }
        if let Some(locale) = &self.locale {
            pairs.push(("locale".to_string(), locale.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs
    }
}
