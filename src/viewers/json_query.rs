//! Filtering a JSON document in the viewer
//!
//! Two modes: a case-insensitive text filter that keeps matching keys and
//! values, and JSONPath queries. In JSONPath mode a term that does not look
//! like a path expression falls back to the text filter.

use serde_json::{Map, Value};
use serde_json_path::JsonPath;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("{0}")]
    InvalidPath(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    Text,
    #[default]
    JsonPath,
}

impl QueryMode {
    pub fn label(&self) -> &'static str {
        match self {
            QueryMode::Text => "Text",
            QueryMode::JsonPath => "JSONPath",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            QueryMode::JsonPath => "JSONPath query (e.g., $.users[*].name, $..email, or simple text)",
            QueryMode::Text => "Search keys or values...",
        }
    }
}

/// What the viewer shows for the current term
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub value: Value,
    /// JSONPath parse failure; `value` is then the unfiltered document
    pub error: Option<QueryError>,
    /// The JSONPath term was run as a text search
    pub text_fallback: bool,
}

/// Search box state for one JSON viewer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonQuery {
    mode: QueryMode,
    term: String,
}

impl JsonQuery {
    pub fn new(mode: QueryMode, term: impl Into<String>) -> Self {
        Self { mode, term: term.into() }
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Switching mode clears the term
    pub fn set_mode(&mut self, mode: QueryMode) {
        if self.mode != mode {
            self.mode = mode;
            self.term.clear();
        }
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    pub fn clear(&mut self) {
        self.term.clear();
    }

    pub fn apply(&self, data: &Value) -> QueryOutcome {
        let mut outcome = QueryOutcome {
            value: data.clone(),
            error: None,
            text_fallback: false,
        };
        if self.term.is_empty() {
            return outcome;
        }

        match self.mode {
            QueryMode::Text => outcome.value = filter_text(data, &self.term),
            QueryMode::JsonPath if !looks_like_path(&self.term) => {
                outcome.value = filter_text(data, &self.term);
                outcome.text_fallback = true;
            }
            QueryMode::JsonPath => match run_path(data, &self.term) {
                Ok(value) => outcome.value = value,
                Err(err) => {
                    tracing::debug!("JSONPath query failed: {}", err);
                    outcome.error = Some(err);
                }
            },
        }
        outcome
    }
}

/// Whether a term reads as a JSONPath expression rather than plain text
pub fn looks_like_path(term: &str) -> bool {
    term.starts_with('$') || term.contains('[') || term.contains('*') || term.contains("..") || term.contains('?')
}

/// Parse a path, accepting the root-less forms users tend to type
pub fn compile_path(term: &str) -> Result<JsonPath, QueryError> {
    let normalized = if term.starts_with('$') {
        term.to_string()
    } else if term.starts_with('[') || term.starts_with("..") {
        format!("${}", term)
    } else {
        format!("$.{}", term)
    };
    JsonPath::parse(&normalized).map_err(|e| QueryError::InvalidPath(e.to_string()))
}

/// Run a JSONPath query and shape the matches for display
pub fn run_path(data: &Value, term: &str) -> Result<Value, QueryError> {
    let path = compile_path(term)?;
    if data.is_null() {
        return Ok(Value::Object(Map::new()));
    }

    let mut matches: Vec<Value> = path.query(data).all().into_iter().cloned().collect();
    Ok(match matches.len() {
        0 => Value::Object(Map::new()),
        1 => {
            let single = matches.remove(0);
            if single.is_object() || single.is_array() {
                single
            } else {
                let mut wrapped = Map::new();
                wrapped.insert("result".to_string(), single);
                Value::Object(wrapped)
            }
        }
        _ => Value::Array(matches),
    })
}

/// Keep the parts of `data` whose keys or values contain `term`, ignoring case
pub fn filter_text(data: &Value, term: &str) -> Value {
    if term.is_empty() {
        return data.clone();
    }
    let needle = term.to_lowercase();
    match data {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) | Value::Array(_) => filter_value(data, &needle).unwrap_or_else(|| empty_like(data)),
        other => other.clone(),
    }
}

fn empty_like(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::Array(Vec::new()),
        _ => Value::Object(Map::new()),
    }
}

fn primitive_matches(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Number(n) => n.to_string().contains(needle),
        _ => false,
    }
}

/// Filtered copy, or `None` when nothing inside matches
fn filter_value(value: &Value, needle: &str) -> Option<Value> {
    match value {
        Value::Object(obj) => {
            let mut kept = Map::new();
            for (key, child) in obj {
                if key.to_lowercase().contains(needle) {
                    kept.insert(key.clone(), filter_value(child, needle).unwrap_or_else(|| child.clone()));
                } else if let Some(filtered) = filter_value(child, needle) {
                    kept.insert(key.clone(), filtered);
                }
            }
            (!kept.is_empty()).then_some(Value::Object(kept))
        }
        Value::Array(items) => {
            let kept: Vec<Value> = items.iter().filter_map(|item| filter_value(item, needle)).collect();
            (!kept.is_empty()).then_some(Value::Array(kept))
        }
        primitive => primitive_matches(primitive, needle).then(|| primitive.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "users": [
                {"name": "Ada", "email": "ada@example.com", "age": 36},
                {"name": "Linus", "email": "linus@example.org", "age": 54}
            ],
            "status": "active"
        })
    }

    #[test]
    fn test_default_mode_is_jsonpath() {
        let query = JsonQuery::default();
        assert_eq!(query.mode(), QueryMode::JsonPath);
        assert_eq!(query.apply(&sample()).value, sample());
    }

    #[test]
    fn test_path_multiple_matches_become_array() {
        let out = JsonQuery::new(QueryMode::JsonPath, "$.users[*].name").apply(&sample());
        assert_eq!(out.value, json!(["Ada", "Linus"]));
        assert!(out.error.is_none());
        assert!(!out.text_fallback);
    }

    #[test]
    fn test_path_single_primitive_is_wrapped() {
        let out = JsonQuery::new(QueryMode::JsonPath, "$.status").apply(&sample());
        assert_eq!(out.value, json!({"result": "active"}));
    }

    #[test]
    fn test_path_single_composite_is_returned() {
        let out = JsonQuery::new(QueryMode::JsonPath, "$.users[0]").apply(&sample());
        assert_eq!(out.value["name"], "Ada");
    }

    #[test]
    fn test_path_no_match_is_empty_object() {
        let out = JsonQuery::new(QueryMode::JsonPath, "$.missing").apply(&sample());
        assert_eq!(out.value, json!({}));
    }

    #[test]
    fn test_recursive_descent() {
        let out = JsonQuery::new(QueryMode::JsonPath, "$..email").apply(&sample());
        assert_eq!(out.value, json!(["ada@example.com", "linus@example.org"]));
    }

    #[test]
    fn test_rootless_path() {
        let out = JsonQuery::new(QueryMode::JsonPath, "users[1].age").apply(&sample());
        assert_eq!(out.value, json!({"result": 54}));
    }

    #[test]
    fn test_invalid_path_keeps_data_and_reports() {
        let out = JsonQuery::new(QueryMode::JsonPath, "$.users[").apply(&sample());
        assert_eq!(out.value, sample());
        assert!(matches!(out.error, Some(QueryError::InvalidPath(_))));
    }

    #[test]
    fn test_plain_term_falls_back_to_text() {
        let out = JsonQuery::new(QueryMode::JsonPath, "linus").apply(&sample());
        assert!(out.text_fallback);
        assert_eq!(out.value, json!({"users": [{"name": "Linus", "email": "linus@example.org"}]}));
    }

    #[test]
    fn test_text_key_match_keeps_whole_value() {
        let out = JsonQuery::new(QueryMode::Text, "USERS").apply(&sample());
        assert_eq!(out.value["users"], sample()["users"]);
        assert!(out.value.get("status").is_none());
    }

    #[test]
    fn test_text_number_match() {
        let out = filter_text(&sample(), "54");
        assert_eq!(out, json!({"users": [{"age": 54}]}));
    }

    #[test]
    fn test_text_no_match() {
        assert_eq!(filter_text(&sample(), "zzz"), json!({}));
        assert_eq!(filter_text(&json!([1, 2]), "zzz"), json!([]));
        assert_eq!(filter_text(&Value::Null, "x"), json!({}));
    }

    #[test]
    fn test_mode_switch_clears_term() {
        let mut query = JsonQuery::new(QueryMode::JsonPath, "$.a");
        query.set_mode(QueryMode::Text);
        assert_eq!(query.term(), "");
        assert_eq!(query.mode(), QueryMode::Text);

        query.set_term("abc");
        query.set_mode(QueryMode::Text);
        assert_eq!(query.term(), "abc");
    }

    #[test]
    fn test_looks_like_path() {
        assert!(looks_like_path("$.a"));
        assert!(looks_like_path("a[0]"));
        assert!(looks_like_path("..x"));
        assert!(looks_like_path("*"));
        assert!(!looks_like_path("plain words"));
    }
}
