use serde_json::{Map, Value};

/// The JSON object sent as a request body.
///
/// Anything that is not a JSON object (including an empty or unparseable
/// body) is treated as an object with no fields, so the per-operation input
/// parsing decides how to reject it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody(Map<String, Value>);

impl RequestBody {
    pub fn from_slice(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::default();
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Self::from_value(value),
            Err(err) => {
                tracing::debug!("Ignoring unparseable request body: {}", err);
                Self::default()
            }
        }
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// A non-empty string field.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// A field holding a JSON boolean. `"true"` or `1` do not count.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// A list of strings. Numbers and booleans are cast to their text form
    /// and empty strings are kept, as a `[String]` document path stores them.
    pub fn tags(&self, key: &str) -> Tags {
        let items = match self.0.get(key) {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Tags::Missing,
        };

        let mut tags = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(s) => tags.push(s.clone()),
                Value::Number(n) => tags.push(n.to_string()),
                Value::Bool(b) => tags.push(b.to_string()),
                Value::Null | Value::Array(_) | Value::Object(_) => return Tags::Malformed,
            }
        }
        Tags::Valid(tags)
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Outcome of reading a list-of-strings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tags {
    /// Absent, not an array, or an empty array.
    Missing,
    /// A non-empty array holding a null, an array or an object.
    Malformed,
    Valid(Vec<String>),
}

/// The fields of a request body that were missing or had the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("missing or invalid fields: {}", .0.join(", "))]
pub struct InvalidFields(Vec<&'static str>);

impl InvalidFields {
    /// Records `name` as invalid when `value` is `None`, passing it through.
    pub fn check<T>(&mut self, name: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.mark(name);
        }
        value
    }

    pub fn mark(&mut self, name: &'static str) {
        self.0.push(name);
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Input for the delete operations, which only need an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteInput {
    pub id: String,
}

impl DeleteInput {
    pub fn parse(body: &RequestBody) -> Result<Self, InvalidFields> {
        let mut invalid = InvalidFields::default();
        match invalid.check("id", body.text("id")) {
            Some(id) => Ok(Self { id }),
            None => Err(invalid),
        }
    }
}
