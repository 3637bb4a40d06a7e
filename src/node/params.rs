//! Per-item parameter values as the host resolved them.

use serde_json::{Map, Value};

/// Parameter name to value for one input item.
///
/// Names may address members of a collection parameter with a dot path,
/// e.g. `filters.locations`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParameters {
    values: Map<String, Value>,
}

impl RawParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Parameters from a JSON object; any other value yields an empty set.
    pub fn from_value(value: &Value) -> Self {
        Self {
            values: value.as_object().cloned().unwrap_or_default(),
        }
    }

    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a top-level parameter, or a collection member when `name` is a
    /// dot path.
    pub fn set(&mut self, name: &str, value: Value) {
        let mut segments = name.split('.').filter(|s| !s.is_empty()).peekable();
        let mut current = &mut self.values;
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.insert(segment.to_string(), value);
                return;
            }
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(next) = entry else {
                return;
            };
            current = next;
        }
    }

    /// Value at `name`; JSON `null` counts as absent.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut segments = name.split('.').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut current = self.values.get(first)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn str_or<'a>(&'a self, name: &str, fallback: &'a str) -> &'a str {
        self.get(name).and_then(Value::as_str).unwrap_or(fallback)
    }

    /// Boolean value, accepting the string forms hosts use for checkboxes.
    pub fn bool_or(&self, name: &str, fallback: bool) -> bool {
        match self.get(name) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => match text.trim().to_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" | "" => false,
                _ => fallback,
            },
            Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(fallback),
            _ => fallback,
        }
    }

    /// Value as-is, or `fallback` when absent.
    pub fn value_or(&self, name: &str, fallback: Value) -> Value {
        self.get(name).cloned().unwrap_or(fallback)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl From<Map<String, Value>> for RawParameters {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_map(values)
    }
}
