//! HTML viewer: sandboxed rendered preview or escaped source

/// Sandbox flags for the preview frame. Without `allow-same-origin` the
/// document cannot reach the host window or its storage.
pub const SANDBOX_FLAGS: &str = "allow-scripts allow-forms allow-popups allow-modals";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlViewMode {
    #[default]
    Rendered,
    Source,
}

impl HtmlViewMode {
    pub fn toggled(self) -> Self {
        match self {
            HtmlViewMode::Rendered => HtmlViewMode::Source,
            HtmlViewMode::Source => HtmlViewMode::Rendered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlViewer {
    pub mode: HtmlViewMode,
    pub file_name: String,
    content: String,
}

impl HtmlViewer {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            mode: HtmlViewMode::default(),
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Markup for the current mode
    pub fn render(&self) -> String {
        match self.mode {
            HtmlViewMode::Rendered => self.sandboxed_frame(),
            HtmlViewMode::Source => self.source_block(),
        }
    }

    /// Isolated frame carrying the document in `srcdoc`
    pub fn sandboxed_frame(&self) -> String {
        let title = if self.file_name.is_empty() {
            "HTML Document"
        } else {
            &self.file_name
        };
        format!(
            "<iframe sandbox=\"{}\" title=\"Rendered HTML: {}\" srcdoc=\"{}\"></iframe>",
            SANDBOX_FLAGS,
            html_escape::encode_double_quoted_attribute(title),
            html_escape::encode_double_quoted_attribute(&self.content)
        )
    }

    /// Source listing safe to drop into a page
    pub fn source_block(&self) -> String {
        format!(
            "<pre><code class=\"language-html\">{}</code></pre>",
            html_escape::encode_text(&self.content)
        )
    }

    /// Suggested name when saving the document
    pub fn download_name(&self) -> &str {
        if self.file_name.is_empty() {
            "document.html"
        } else {
            &self.file_name
        }
    }
}
