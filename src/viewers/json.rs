//! JSON viewer tree model
//!
//! Flattens a parsed document into the visible rows of a collapsible tree.
//! Node ids are JSON Pointers (RFC 6901, the root is `""`), so expansion
//! state survives a rebuild as a plain set of ids.

use serde_json::Value;
use std::collections::HashSet;

use super::json_query::{JsonQuery, QueryMode, QueryOutcome};

const ROOT_KEY: &str = "(root)";
const MAX_STRING_PREVIEW: usize = 100;

/// One visible row of the tree
#[derive(Debug, Clone, PartialEq)]
pub struct JsonNode {
    /// JSON Pointer to the node, e.g. `/users/0/name`
    pub id: String,
    /// Property name or `[index]`
    pub key: String,
    /// Primitive value, or a summary for objects and arrays
    pub value: String,
    pub value_type: JsonValueType,
    pub depth: usize,
    pub expandable: bool,
    pub expanded: bool,
    pub child_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonValueType {
    Null,
    Boolean,
    Number,
    String,
    Object,
    Array,
}

impl JsonValueType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonValueType::Null,
            Value::Bool(_) => JsonValueType::Boolean,
            Value::Number(_) => JsonValueType::Number,
            Value::String(_) => JsonValueType::String,
            Value::Array(_) => JsonValueType::Array,
            Value::Object(_) => JsonValueType::Object,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            JsonValueType::Null => "null",
            JsonValueType::Boolean => "boolean",
            JsonValueType::Number => "number",
            JsonValueType::String => "string",
            JsonValueType::Object => "object",
            JsonValueType::Array => "array",
        }
    }
}

/// Visible rows plus bookkeeping
#[derive(Debug, Clone, Default)]
pub struct JsonTree {
    pub nodes: Vec<JsonNode>,
    /// Rows produced before the node cap stopped the walk
    pub total_nodes: usize,
    pub truncated: bool,
}

impl JsonTree {
    /// Ids of the currently expanded nodes
    pub fn expanded_paths(&self) -> HashSet<String> {
        self.nodes.iter().filter(|n| n.expanded).map(|n| n.id.clone()).collect()
    }
}

enum Expansion<'a> {
    ToDepth(usize),
    Paths(&'a HashSet<String>),
}

impl Expansion<'_> {
    fn is_expanded(&self, path: &str, depth: usize) -> bool {
        match self {
            Expansion::ToDepth(max) => depth < *max,
            Expansion::Paths(paths) => paths.contains(path),
        }
    }
}

/// Builds tree rows for a JSON value
pub struct JsonViewer {
    max_initial_depth: usize,
    /// Guard against huge documents
    max_nodes: usize,
}

impl JsonViewer {
    pub fn new() -> Self {
        Self {
            max_initial_depth: 2,
            max_nodes: 100_000,
        }
    }

    pub fn with_settings(max_initial_depth: usize, max_nodes: usize) -> Self {
        Self {
            max_initial_depth,
            max_nodes,
        }
    }

    /// Tree as first shown: root and first level open
    pub fn tree(&self, value: &Value) -> JsonTree {
        self.build(value, Expansion::ToDepth(self.max_initial_depth))
    }

    /// Tree with exactly `expanded` open
    pub fn tree_with_expanded(&self, value: &Value, expanded: &HashSet<String>) -> JsonTree {
        self.build(value, Expansion::Paths(expanded))
    }

    /// Flip one node, keeping every other node's state
    pub fn toggle(&self, value: &Value, current: &JsonTree, path: &str) -> JsonTree {
        let mut expanded = current.expanded_paths();
        if !expanded.remove(path) {
            expanded.insert(path.to_string());
        }
        self.tree_with_expanded(value, &expanded)
    }

    pub fn collapse_all(&self, value: &Value) -> JsonTree {
        self.build(value, Expansion::ToDepth(0))
    }

    pub fn expand_to_depth(&self, value: &Value, depth: usize) -> JsonTree {
        self.build(value, Expansion::ToDepth(depth))
    }

    fn build(&self, value: &Value, expansion: Expansion<'_>) -> JsonTree {
        let mut tree = JsonTree::default();
        self.walk(value, String::new(), ROOT_KEY, 0, &expansion, &mut tree);
        tree
    }

    fn walk(&self, value: &Value, path: String, key: &str, depth: usize, expansion: &Expansion<'_>, tree: &mut JsonTree) {
        if tree.total_nodes >= self.max_nodes {
            tree.truncated = true;
            return;
        }
        tree.total_nodes += 1;

        let (display, child_count) = match value {
            Value::Null => ("null".to_string(), 0),
            Value::Bool(b) => (b.to_string(), 0),
            Value::Number(n) => (n.to_string(), 0),
            Value::String(s) => (preview_string(s), 0),
            Value::Array(arr) => (format!("[{} items]", arr.len()), arr.len()),
            Value::Object(obj) => (format!("{{{} properties}}", obj.len()), obj.len()),
        };
        let expandable = child_count > 0;
        let expanded = expandable && expansion.is_expanded(&path, depth);

        tree.nodes.push(JsonNode {
            id: path.clone(),
            key: key.to_string(),
            value: display,
            value_type: JsonValueType::of(value),
            depth,
            expandable,
            expanded,
            child_count,
        });

        if !expanded {
            return;
        }
        match value {
            Value::Array(arr) => {
                for (idx, item) in arr.iter().enumerate() {
                    let child = format!("{}/{}", path, idx);
                    self.walk(item, child, &format!("[{}]", idx), depth + 1, expansion, tree);
                }
            }
            Value::Object(obj) => {
                for (k, v) in obj {
                    let child = format!("{}/{}", path, pointer_token(k));
                    self.walk(v, child, k, depth + 1, expansion, tree);
                }
            }
            _ => {}
        }
    }
}

impl Default for JsonViewer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes one property name for use in a pointer: `~` as `~0`, `/` as `~1`
fn pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn preview_string(s: &str) -> String {
    if s.chars().count() > MAX_STRING_PREVIEW {
        let head: String = s.chars().take(MAX_STRING_PREVIEW - 3).collect();
        format!("\"{}...\"", head)
    } else {
        format!("\"{}\"", s)
    }
}

/// Indented text form of the document
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// A parsed document with its search box and the tree for the filtered view.
///
/// The fetched data is never modified; queries only change what is shown.
#[derive(Debug, Clone)]
pub struct JsonView {
    data: Value,
    query: JsonQuery,
    outcome: QueryOutcome,
    tree: JsonTree,
}

impl JsonView {
    pub fn new(data: Value) -> Self {
        let query = JsonQuery::default();
        let outcome = query.apply(&data);
        let tree = JsonViewer::new().tree(&outcome.value);
        Self {
            data,
            query,
            outcome,
            tree,
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn query(&self) -> &JsonQuery {
        &self.query
    }

    /// Currently displayed value plus any query error or fallback note
    pub fn outcome(&self) -> &QueryOutcome {
        &self.outcome
    }

    pub fn tree(&self) -> &JsonTree {
        &self.tree
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.query.set_term(term);
        self.refresh();
    }

    pub fn set_mode(&mut self, mode: QueryMode) {
        self.query.set_mode(mode);
        self.refresh();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.refresh();
    }

    pub fn toggle(&mut self, path: &str) {
        self.tree = JsonViewer::new().toggle(&self.outcome.value, &self.tree, path);
    }

    pub fn collapse_all(&mut self) {
        self.tree = JsonViewer::new().collapse_all(&self.outcome.value);
    }

    pub fn expand_to_depth(&mut self, depth: usize) {
        self.tree = JsonViewer::new().expand_to_depth(&self.outcome.value, depth);
    }

    fn refresh(&mut self) {
        self.outcome = self.query.apply(&self.data);
        self.tree = JsonViewer::new().tree(&self.outcome.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_viewer_default() {
        let viewer = JsonViewer::default();
        assert_eq!(viewer.max_initial_depth, 2);
        assert_eq!(viewer.max_nodes, 100_000);
    }

    #[test]
    fn test_primitive_root() {
        let viewer = JsonViewer::new();
        for (value, expected, kind) in [
            (json!(null), "null", JsonValueType::Null),
            (json!(true), "true", JsonValueType::Boolean),
            (json!(42), "42", JsonValueType::Number),
            (json!("hi"), "\"hi\"", JsonValueType::String),
        ] {
            let tree = viewer.tree(&value);
            assert_eq!(tree.nodes.len(), 1);
            assert_eq!(tree.nodes[0].value, expected);
            assert_eq!(tree.nodes[0].value_type, kind);
            assert_eq!(tree.nodes[0].key, "(root)");
        }
    }

    #[test]
    fn test_string_truncation_respects_chars() {
        let long = "é".repeat(150);
        let tree = JsonViewer::new().tree(&json!(long));
        let shown = &tree.nodes[0].value;
        assert!(shown.ends_with("...\""));
        assert_eq!(shown.chars().count(), 97 + 5);
    }

    #[test]
    fn test_summaries() {
        let tree = JsonViewer::new().tree(&json!({"a": [1, 2, 3], "b": {}}));
        assert_eq!(tree.nodes[0].value, "{2 properties}");
        assert_eq!(tree.nodes[1].value, "[3 items]");
        assert_eq!(tree.nodes[1].child_count, 3);

        let empty = tree.nodes.iter().find(|n| n.key == "b").unwrap();
        assert!(!empty.expandable);
        assert!(!empty.expanded);
    }

    #[test]
    fn test_initial_depth() {
        let value = json!({"level1": {"level2": {"level3": 1}}});
        let tree = JsonViewer::new().tree(&value);

        let keys: Vec<&str> = tree.nodes.iter().map(|n| n.key.as_str()).collect();
        assert_eq!(keys, vec!["(root)", "level1", "level2"]);
        assert!(!tree.nodes[2].expanded);
        assert_eq!(tree.nodes[2].depth, 2);
    }

    #[test]
    fn test_array_index_keys_and_ids() {
        let tree = JsonViewer::new().tree(&json!({"users": [{"name": "a"}]}));
        let user = tree.nodes.iter().find(|n| n.key == "[0]").unwrap();
        assert_eq!(user.id, "/users/0");
        assert_eq!(tree.nodes[0].id, "");
    }

    #[test]
    fn test_dotted_and_slashed_keys_get_distinct_ids() {
        let value = json!({"a.b": {"c": 1}, "a": {"b": {"c": 2}}, "x/y~z": {"k": 3}});
        let viewer = JsonViewer::new();
        let tree = viewer.tree(&value);

        let ids: Vec<&str> = tree.nodes.iter().map(|n| n.id.as_str()).collect();
        assert!(ids.contains(&"/a.b"));
        assert!(ids.contains(&"/a/b"));
        assert!(ids.contains(&"/x~1y~0z"));

        let opened = viewer.toggle(&value, &tree, "/a/b");
        let leaves: Vec<&str> = opened.nodes.iter().filter(|n| n.key == "c").map(|n| n.id.as_str()).collect();
        assert_eq!(leaves, vec!["/a/b/c", "/a.b/c"]);

        let closed = viewer.toggle(&value, &opened, "/a.b");
        let leaves: Vec<&str> = closed.nodes.iter().filter(|n| n.key == "c").map(|n| n.value.as_str()).collect();
        assert_eq!(leaves, vec!["2"]);
    }

    #[test]
    fn test_toggle_keeps_other_state() {
        let value = json!({"a": {"x": {"deep": 1}}, "b": {"y": 2}});
        let viewer = JsonViewer::new();
        let tree = viewer.tree(&value);

        let opened = viewer.toggle(&value, &tree, "/a/x");
        assert!(opened.nodes.iter().any(|n| n.key == "deep"));
        assert!(opened.nodes.iter().any(|n| n.key == "y"));

        let closed = viewer.toggle(&value, &opened, "/a");
        assert!(!closed.nodes.iter().any(|n| n.key == "x"));
        assert!(closed.nodes.iter().any(|n| n.key == "y"));
    }

    #[test]
    fn test_collapse_all_and_expand_to_depth() {
        let value = json!({"a": {"b": {"c": {"d": 1}}}});
        let viewer = JsonViewer::new();

        assert_eq!(viewer.collapse_all(&value).nodes.len(), 1);
        assert_eq!(viewer.expand_to_depth(&value, 10).nodes.len(), 5);
    }

    #[test]
    fn test_node_cap() {
        let value = json!((0..50).collect::<Vec<i32>>());
        let tree = JsonViewer::with_settings(2, 10).tree(&value);
        assert_eq!(tree.nodes.len(), 10);
        assert!(tree.truncated);
    }

    #[test]
    fn test_view_query_rebuilds_tree_without_touching_data() {
        let data = json!({"users": [{"name": "Ada"}, {"name": "Linus"}], "count": 2});
        let mut view = JsonView::new(data.clone());
        assert_eq!(view.tree().nodes[0].value, "{2 properties}");

        view.set_term("$.users[*].name");
        assert_eq!(view.outcome().value, json!(["Ada", "Linus"]));
        assert_eq!(view.tree().nodes[0].value, "[2 items]");
        assert_eq!(view.data(), &data);

        view.set_mode(QueryMode::Text);
        assert_eq!(view.query().term(), "");
        assert_eq!(view.outcome().value, data);
    }

    #[test]
    fn test_view_invalid_query_shows_everything() {
        let data = json!({"a": 1});
        let mut view = JsonView::new(data.clone());
        view.set_term("$[");
        assert!(view.outcome().error.is_some());
        assert_eq!(view.outcome().value, data);

        view.clear_query();
        assert!(view.outcome().error.is_none());
    }

    #[test]
    fn test_view_toggle() {
        let mut view = JsonView::new(json!({"a": {"b": {"c": 1}}}));
        assert!(!view.tree().nodes.iter().any(|n| n.key == "c"));
        view.toggle("/a/b");
        assert!(view.tree().nodes.iter().any(|n| n.key == "c"));
    }

    #[test]
    fn test_view_collapse_and_expand_all() {
        let mut view = JsonView::new(json!({"a": {"b": {"c": {"d": 1}}}}));
        view.collapse_all();
        assert_eq!(view.tree().nodes.len(), 1);
        assert!(!view.tree().nodes[0].expanded);

        view.expand_to_depth(usize::MAX);
        assert_eq!(view.tree().nodes.len(), 5);
        assert!(view.tree().nodes.iter().any(|n| n.id == "/a/b/c/d"));
    }

    #[test]
    fn test_pretty() {
        let text = pretty(&json!({"k": [1]}));
        assert!(text.contains('\n'));
        assert!(text.contains("\"k\""));
    }
}
