//! Plain-text fallback viewer
//!
//! Shows any non-specialised object as read-only text, with a syntax label
//! from the extension and, for documents that failed to parse, the parse
//! error above the raw content.

/// Syntax label for a text file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxType {
    PlainText,
    Json,
    Yaml,
    Markdown,
    Config,
    Xml,
    Shell,
    Python,
    Rust,
    JavaScript,
    Sql,
    Csv,
}

impl SyntaxType {
    pub fn from_file_name(file_name: &str) -> Self {
        let Some(ext) = crate::classify::extension(file_name) else {
            return SyntaxType::PlainText;
        };

        match ext.as_str() {
            "json" | "jsonl" | "ndjson" | "geojson" => SyntaxType::Json,
            "yaml" | "yml" => SyntaxType::Yaml,
            "md" | "markdown" | "mdown" | "mkd" => SyntaxType::Markdown,
            "ini" | "toml" | "conf" | "cfg" | "properties" | "env" => SyntaxType::Config,
            "xml" | "html" | "htm" | "xhtml" | "svg" | "plist" => SyntaxType::Xml,
            "sh" | "bash" | "zsh" | "fish" | "ksh" => SyntaxType::Shell,
            "py" | "pyw" | "pyi" => SyntaxType::Python,
            "rs" => SyntaxType::Rust,
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" => SyntaxType::JavaScript,
            "sql" | "pgsql" | "mysql" => SyntaxType::Sql,
            "csv" | "tsv" => SyntaxType::Csv,
            _ => SyntaxType::PlainText,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SyntaxType::PlainText => "Plain Text",
            SyntaxType::Json => "JSON",
            SyntaxType::Yaml => "YAML",
            SyntaxType::Markdown => "Markdown",
            SyntaxType::Config => "Config",
            SyntaxType::Xml => "XML",
            SyntaxType::Shell => "Shell",
            SyntaxType::Python => "Python",
            SyntaxType::Rust => "Rust",
            SyntaxType::JavaScript => "JavaScript",
            SyntaxType::Sql => "SQL",
            SyntaxType::Csv => "CSV",
        }
    }
}

/// Largest text shown in full (10 MB); longer content is cut
const MAX_VIEWABLE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextViewer {
    pub content: String,
    pub syntax: SyntaxType,
    pub line_count: usize,
    /// Error note shown above the content
    pub parse_error: Option<String>,
    pub truncated: bool,
}

impl TextViewer {
    pub fn new(file_name: &str, content: &str, parse_error: Option<String>) -> Self {
        Self::with_limit(file_name, content, parse_error, MAX_VIEWABLE_SIZE)
    }

    pub fn with_limit(file_name: &str, content: &str, parse_error: Option<String>, max_bytes: usize) -> Self {
        let truncated = content.len() > max_bytes;
        let content = if truncated {
            let mut end = max_bytes;
            while !content.is_char_boundary(end) {
                end -= 1;
            }
            content[..end].to_string()
        } else {
            content.to_string()
        };

        Self {
            line_count: content.lines().count().max(1),
            syntax: SyntaxType::from_file_name(file_name),
            content,
            parse_error,
            truncated,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
