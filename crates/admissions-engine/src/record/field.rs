use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single leaf value pulled out of an extractor payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Scalar {
    fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(flag) => Some(Scalar::Bool(flag)),
            Value::Number(number) => number.as_f64().map(Scalar::Number),
            Value::String(text) => Some(Scalar::Text(text)),
            Value::Array(items) => items.into_iter().find_map(Scalar::from_json),
            Value::Object(map) => representative_scalar(map),
        }
    }

    /// Trimmed textual form; `None` when the text is blank.
    pub fn text(&self) -> Option<String> {
        match self {
            Scalar::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Scalar::Number(number) => Some(format_number(*number)),
            Scalar::Bool(flag) => Some(flag.to_string()),
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self {
            Scalar::Number(number) if number.is_finite() => Some(*number),
            Scalar::Number(_) => None,
            Scalar::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Scalar::Bool(_) => None,
        }
    }

    pub fn flag(&self) -> Option<bool> {
        match self {
            Scalar::Bool(flag) => Some(*flag),
            Scalar::Number(number) if *number == 1.0 => Some(true),
            Scalar::Number(number) if *number == 0.0 => Some(false),
            Scalar::Number(_) => None,
            Scalar::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Some(true),
                "false" | "no" | "n" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

/// Objects are reduced to their first string leaf (depth-first), falling back
/// to the first non-null leaf of any kind.
fn representative_scalar(map: serde_json::Map<String, Value>) -> Option<Scalar> {
    fn first_string(value: &Value) -> Option<&str> {
        match value {
            Value::String(text) if !text.trim().is_empty() => Some(text),
            Value::Array(items) => items.iter().find_map(first_string),
            Value::Object(map) => map.values().find_map(first_string),
            _ => None,
        }
    }

    let as_object = Value::Object(map);
    if let Some(text) = first_string(&as_object) {
        return Some(Scalar::Text(text.to_string()));
    }

    match as_object {
        Value::Object(map) => map.into_iter().find_map(|(_, value)| Scalar::from_json(value)),
        _ => None,
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Loosely typed attribute as emitted by the extractor: missing, a single value,
/// or a list. Every raw field goes through this type so classifiers only ever
/// see one shape contract.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Absent,
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl FieldValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Absent,
            Value::Array(items) => {
                let mut flattened = Vec::with_capacity(items.len());
                for item in items {
                    flatten_into(item, &mut flattened);
                }
                FieldValue::List(flattened)
            }
            other => Scalar::from_json(other)
                .map(FieldValue::Scalar)
                .unwrap_or(FieldValue::Absent),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Scalar(Scalar::Text(value.into()))
    }

    pub fn number(value: f64) -> Self {
        FieldValue::Scalar(Scalar::Number(value))
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(
            values
                .into_iter()
                .map(|value| Scalar::Text(value.into()))
                .collect(),
        )
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldValue::List(_))
    }

    /// A non-empty list or a non-blank scalar.
    pub fn has_content(&self) -> bool {
        match self {
            FieldValue::Absent => false,
            FieldValue::Scalar(scalar) => scalar.text().is_some(),
            FieldValue::List(items) => !items.is_empty(),
        }
    }

    /// Best single-string reading of the field. Lists yield their first
    /// non-blank entry.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Scalar(scalar) => scalar.text(),
            FieldValue::List(items) => items.iter().find_map(Scalar::text),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Scalar(scalar) => scalar.number(),
            FieldValue::List(items) => items.iter().find_map(Scalar::number),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Scalar(scalar) => scalar.flag(),
            FieldValue::List(items) => items.iter().find_map(Scalar::flag),
        }
    }

    /// Canonical list reading: scalars become singleton lists, blanks are dropped.
    pub fn entries(&self) -> Vec<String> {
        match self {
            FieldValue::Absent => Vec::new(),
            FieldValue::Scalar(scalar) => scalar.text().into_iter().collect(),
            FieldValue::List(items) => items.iter().filter_map(Scalar::text).collect(),
        }
    }

    /// Lowercased, space-joined text used by the keyword classifiers.
    pub fn joined_lowercase(&self) -> Option<String> {
        let entries = self.entries();
        if entries.is_empty() {
            return None;
        }
        Some(entries.join(" ").to_lowercase())
    }
}

fn flatten_into(value: Value, out: &mut Vec<Scalar>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        other => {
            if let Some(scalar) = Scalar::from_json(other) {
                out.push(scalar);
            }
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(FieldValue::from_json(value))
    }
}
