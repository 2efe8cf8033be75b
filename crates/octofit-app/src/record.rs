// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

const SUMMARY_FIELD_LIMIT: usize = 4;
pub const NO_DETAILS_SUMMARY: &str = "No details available.";

/// One item returned by a collection endpoint. The payload is kept as
/// received; only a handful of well-known fields are read for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object().and_then(|fields| fields.get(name))
    }

    pub fn field_names(&self) -> Vec<String> {
        match &self.0 {
            Value::Object(fields) => fields.keys().cloned().collect(),
            Value::Array(items) => (0..items.len()).map(|index| index.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// First truthy candidate field, else `"{singular} {position + 1}"`.
    pub fn label(&self, fields: &[&str], singular: &str, position: usize) -> String {
        fields
            .iter()
            .find_map(|name| self.field(name).and_then(display_if_truthy))
            .unwrap_or_else(|| format!("{singular} {}", position + 1))
    }

    pub fn summary(&self) -> String {
        if !matches!(self.0, Value::Object(_) | Value::Array(_)) {
            return NO_DETAILS_SUMMARY.to_owned();
        }
        let names = self.field_names();
        if names.is_empty() {
            return NO_DETAILS_SUMMARY.to_owned();
        }

        let shown = names
            .iter()
            .take(SUMMARY_FIELD_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if names.len() > SUMMARY_FIELD_LIMIT {
            format!("Fields: {shown}...")
        } else {
            format!("Fields: {shown}")
        }
    }

    pub fn row_key(&self, position: usize) -> RowKey {
        match self.field("id").and_then(display_if_truthy) {
            Some(id) => RowKey::Id(id),
            None => RowKey::Position(position),
        }
    }

    /// Compact JSON text, the same text the filter matches against.
    pub fn search_text(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.search_text())
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Id(String),
    Position(usize),
}

fn display_if_truthy(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_owned()),
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => match number.as_f64() {
            Some(float) if float == 0.0 || float.is_nan() => None,
            _ => Some(number.to_string()),
        },
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Body was a bare JSON array.
    Array,
    /// Body was an object carrying a `results` array.
    Paginated,
    /// Anything else; treated as an empty collection.
    Unrecognized,
}

impl ResponseShape {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Paginated => "paginated",
            Self::Unrecognized => "unrecognized",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub records: Vec<Record>,
    pub shape: ResponseShape,
}

pub fn normalize_body(body: Value) -> Fetched {
    match body {
        Value::Array(items) => Fetched {
            records: items.into_iter().map(Record::new).collect(),
            shape: ResponseShape::Array,
        },
        Value::Object(mut fields) => match fields.remove("results") {
            Some(Value::Array(items)) => Fetched {
                records: items.into_iter().map(Record::new).collect(),
                shape: ResponseShape::Paginated,
            },
            _ => Fetched {
                records: Vec::new(),
                shape: ResponseShape::Unrecognized,
            },
        },
        _ => Fetched {
            records: Vec::new(),
            shape: ResponseShape::Unrecognized,
        },
    }
}
