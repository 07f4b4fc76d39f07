//! Line-oriented front end
//!
//! Reads one command per line, turns it into an [`App`] command or a viewer
//! action, and renders the active pane as text.

use std::fmt::Write as _;

use thiserror::Error;

use crate::app::{App, Command, Outcome};
use crate::gateway::ObjectStore;
use crate::navigation::{BreadcrumbTarget, FolderTable, Sidebar};
use crate::s3::types::S3Url;
use crate::viewers::{QueryMode, ViewerContent};
use crate::workspace::{PaneId, PaneKind, Tab, TabId};

pub const HELP: &str = "\
open <s3://bucket/key | bucket[/key]>  open a location
ls                                     show the active pane
cd <folder | .. | />                   browse a folder, parent or bucket root
crumb <n>                              jump along the path (0 home, 1 bucket root)
cat [-t] <file>                        view a file (-t: in a new tab)
back                                   return to the file's folder
home                                   back to the location selector
search <term>                          find keys below the current folder
filter <term>                          filter the folder table
jump <chars>                           first row starting with <chars>
tabs | tab <id> | close [<id>|all] | pin <id>
split | pane <id> | unsplit <id>       manage panes
compare <file> <file> [<file>]         open files side by side (quote names with spaces)
bookmark | bookmarks | go <n>          toggle, list, open bookmarks
jq <term> | mode <text|path>           filter the JSON tree
expand [<node>] | collapse | expand-all [<depth>]
source | zoom <in|out|reset|fit>       HTML and image viewer controls
window                                 print the deep link for the open file
set tabs <n> | set sidebar <px>        preferences
quit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0} (type 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid location: {0}")]
    Location(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAction {
    In,
    Out,
    Reset,
    Fit,
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Help,
    Quit,
    Show,
    Open(S3Url),
    Cd(String),
    Up,
    Root,
    Crumb(usize),
    Cat { name: String, new_tab: bool },
    Tabs,
    CloseActiveTab,
    Filter(String),
    Jump(String),
    Compare(Vec<String>),
    Bookmark,
    ListBookmarks,
    GoBookmark(usize),
    Jq(String),
    Mode(QueryMode),
    Expand(String),
    Collapse,
    ExpandAll(usize),
    ToggleSource,
    Zoom(ZoomAction),
    Run(Command),
}

fn number<T: std::str::FromStr>(arg: Option<&str>, usage: &'static str) -> Result<T, ParseError> {
    arg.and_then(|a| a.parse().ok()).ok_or(ParseError::Usage(usage))
}

fn location(arg: &str) -> Result<S3Url, ParseError> {
    let url = if arg.contains("://") {
        S3Url::parse(arg)
    } else {
        S3Url::parse(&format!("s3://{}", arg))
    };
    url.ok_or_else(|| ParseError::Location(arg.to_string()))
}

pub fn parse(line: &str) -> Result<Input, ParseError> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let mut args = rest.split_whitespace();

    let input = match word {
        "" => Input::Empty,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        "ls" | "show" => Input::Show,
        "open" if !rest.is_empty() => Input::Open(location(rest)?),
        "open" => return Err(ParseError::Usage("open <s3://bucket/key>")),
        "cd" => match rest {
            "" => return Err(ParseError::Usage("cd <folder | .. | />")),
            ".." => Input::Up,
            "/" => Input::Root,
            folder => Input::Cd(folder.to_string()),
        },
        "crumb" => Input::Crumb(number(args.next(), "crumb <n>")?),
        "cat" => {
            let (new_tab, name) = match rest.strip_prefix("-t") {
                Some(name) if name.is_empty() || name.starts_with(char::is_whitespace) => (true, name.trim_start()),
                _ => (false, rest),
            };
            if name.is_empty() {
                return Err(ParseError::Usage("cat [-t] <file>"));
            }
            Input::Cat {
                name: name.to_string(),
                new_tab,
            }
        }
        "back" => Input::Run(Command::BackToFolder),
        "home" => Input::Run(Command::BackToSelector),
        "search" if !rest.is_empty() => Input::Run(Command::Search { term: rest.to_string() }),
        "search" => return Err(ParseError::Usage("search <term>")),
        "filter" => Input::Filter(rest.to_string()),
        "jump" => Input::Jump(rest.to_string()),
        "tabs" => Input::Tabs,
        "tab" => Input::Run(Command::SwitchTab(number(args.next(), "tab <id>")?)),
        "close" => match args.next() {
            None => Input::CloseActiveTab,
            Some("all") => Input::Run(Command::CloseAllTabs),
            id => Input::Run(Command::CloseTab(number(id, "close [<id>|all]")?)),
        },
        "pin" => Input::Run(Command::TogglePin(number(args.next(), "pin <id>")?)),
        "split" => Input::Run(Command::SplitPane),
        "pane" => Input::Run(Command::SetActivePane(number(args.next(), "pane <id>")?)),
        "unsplit" => Input::Run(Command::ClosePane(number(args.next(), "unsplit <id>")?)),
        "compare" => match shlex::split(rest) {
            Some(names) => Input::Compare(names),
            None => return Err(ParseError::Usage("compare <file> <file> [<file>]")),
        },
        "bookmark" => Input::Bookmark,
        "bookmarks" => Input::ListBookmarks,
        "go" => Input::GoBookmark(number(args.next(), "go <n>")?),
        "jq" => Input::Jq(rest.to_string()),
        "mode" => match rest {
            "text" => Input::Mode(QueryMode::Text),
            "path" | "jsonpath" => Input::Mode(QueryMode::JsonPath),
            _ => return Err(ParseError::Usage("mode <text|path>")),
        },
        // Bare `expand` flips the root, whose id is empty
        "expand" => Input::Expand(rest.to_string()),
        "collapse" => Input::Collapse,
        "expand-all" if rest.is_empty() => Input::ExpandAll(usize::MAX),
        "expand-all" => Input::ExpandAll(number(Some(rest), "expand-all [<depth>]")?),
        "source" => Input::ToggleSource,
        "zoom" => Input::Zoom(match rest {
            "in" | "+" => ZoomAction::In,
            "out" | "-" => ZoomAction::Out,
            "reset" => ZoomAction::Reset,
            "fit" => ZoomAction::Fit,
            _ => return Err(ParseError::Usage("zoom <in|out|reset|fit>")),
        }),
        "window" => Input::Run(Command::OpenInNewWindow),
        "set" => match args.next() {
            Some("tabs") => Input::Run(Command::SetMaxTabs(number(args.next(), "set tabs <n>")?)),
            Some("sidebar") => Input::Run(Command::SetSidebarWidth(number(args.next(), "set sidebar <px>")?)),
            _ => return Err(ParseError::Usage("set tabs <n> | set sidebar <px>")),
        },
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(input)
}

/// What the caller should do after a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Shell state around an [`App`]: the viewer for the active tab and the
/// folder filter, neither of which is persisted
pub struct Shell<S> {
    app: App<S>,
    viewer: Option<((PaneId, TabId), ViewerContent)>,
    filter: String,
}

impl<S: ObjectStore> Shell<S> {
    pub fn new(app: App<S>) -> Self {
        Self {
            app,
            viewer: None,
            filter: String::new(),
        }
    }

    pub fn app(&self) -> &App<S> {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App<S> {
        &mut self.app
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        match parse(line) {
            Ok(Input::Quit) => Flow::Quit,
            Ok(input) => Flow::Continue(self.execute(input).await),
            Err(e) => Flow::Continue(e.to_string()),
        }
    }

    async fn execute(&mut self, input: Input) -> String {
        let pane = self.app.workspace().active_pane();
        let (bucket, prefix) = (pane.bucket.clone(), pane.prefix.clone());

        let command = match input {
            Input::Empty => return String::new(),
            Input::Help => return HELP.to_string(),
            Input::Quit | Input::Show => return self.render(),
            Input::Open(url) => Command::SelectLocation {
                bucket: url.bucket,
                key: url.key,
            },
            Input::Cd(folder) => Command::Navigate {
                prefix: resolve_folder(&prefix, &folder),
            },
            Input::Up => match self.app.breadcrumb().and_then(|c| c.parent()) {
                Some(parent) => Command::Navigate { prefix: parent },
                None => return "Already at the bucket root".to_string(),
            },
            Input::Root => Command::Navigate { prefix: String::new() },
            Input::Crumb(position) => match self.app.breadcrumb().and_then(|c| c.target(position)) {
                Some(BreadcrumbTarget::Selector) => Command::BackToSelector,
                Some(BreadcrumbTarget::Prefix(prefix)) => Command::Navigate { prefix },
                None => return format!("No breadcrumb position {}", position),
            },
            Input::Cat { name, new_tab } => Command::OpenFile {
                key: resolve_key(&prefix, &name),
                new_tab,
            },
            Input::Tabs => return self.render_tabs(),
            Input::CloseActiveTab => match self.app.workspace().active_pane().active_tab_id {
                Some(tab) => Command::CloseTab(tab),
                None => return "No open tab".to_string(),
            },
            Input::Filter(term) => {
                self.filter = term;
                return self.render();
            }
            Input::Jump(typed) => {
                let table = self.app.folder_table().unwrap_or_default();
                return match table.jump_to(&typed) {
                    Some(idx) => format!("{}: {}", idx, table.rows[idx].name),
                    None => format!("Nothing starts with '{}'", typed),
                };
            }
            Input::Compare(names) => {
                Command::OpenInSplit(names.iter().map(|n| resolve_key(&prefix, n)).collect())
            }
            Input::Bookmark => {
                if bucket.is_empty() {
                    return "Open a bucket first".to_string();
                }
                Command::ToggleBookmark { bucket, prefix }
            }
            Input::ListBookmarks => return render_sidebar(&self.app.sidebar()),
            Input::GoBookmark(n) => {
                let item = n
                    .checked_sub(1)
                    .and_then(|idx| self.app.bookmarks().items().get(idx).cloned());
                match item {
                    Some(item) => Command::OpenBookmark {
                        bucket: item.bucket,
                        prefix: item.prefix,
                    },
                    None => return format!("No bookmark {}", n),
                }
            }
            Input::Jq(_)
            | Input::Mode(_)
            | Input::Expand(_)
            | Input::Collapse
            | Input::ExpandAll(_)
            | Input::ToggleSource
            | Input::Zoom(_) => return self.viewer_action(input),
            Input::Run(command) => command,
        };

        let outcome = self.app.dispatch(command).await;
        self.filter.clear();
        match outcome {
            Outcome::Done => self.render(),
            Outcome::Search(found) => {
                let table = FolderTable::from_search(&found);
                let mut out = format!("{} match(es)\n", found.total_found);
                out.push_str(&render_table(&table, ""));
                out
            }
            Outcome::NewWindow(params) => format!("{}\n{}", params.to_s3_url(), params.to_args().join(" ")),
            Outcome::Ignored(reason) => reason,
        }
    }

    fn sync_viewer(&mut self) -> Option<&mut ViewerContent> {
        let pane = self.app.workspace().active_pane();
        let current = pane.active_tab_id.map(|tab| (pane.id, tab));
        let Some(identity) = current.filter(|_| pane.kind == PaneKind::Viewer) else {
            self.viewer = None;
            return None;
        };

        let stale = self.viewer.as_ref().map(|(id, _)| *id) != Some(identity);
        if stale {
            self.viewer = self.app.viewer().map(|content| (identity, content));
        }
        self.viewer.as_mut().map(|(_, content)| content)
    }

    fn viewer_action(&mut self, input: Input) -> String {
        let Some(viewer) = self.sync_viewer() else {
            return "No file open".to_string();
        };
        match (input, viewer) {
            (Input::Jq(term), ViewerContent::Json(view)) => view.set_term(term),
            (Input::Mode(mode), ViewerContent::Json(view)) => view.set_mode(mode),
            (Input::Expand(node), ViewerContent::Json(view)) => view.toggle(&node),
            (Input::Collapse, ViewerContent::Json(view)) => view.collapse_all(),
            (Input::ExpandAll(depth), ViewerContent::Json(view)) => view.expand_to_depth(depth),
            (Input::ToggleSource, ViewerContent::Html(view)) => view.toggle_mode(),
            (Input::Zoom(action), ViewerContent::Image(view)) => match action {
                ZoomAction::In => view.zoom_in(),
                ZoomAction::Out => view.zoom_out(),
                ZoomAction::Reset => view.reset_zoom(),
                ZoomAction::Fit => view.toggle_fit(),
            },
            (_, other) => return format!("Not available in the {} viewer", other.kind()),
        }
        self.render()
    }

    /// Text rendering of the active pane
    pub fn render(&mut self) -> String {
        let mut out = self.render_header();
        let pane = self.app.workspace().active_pane();

        if pane.loading {
            out.push_str("Loading...\n");
        }
        if let Some(error) = &pane.error {
            let _ = writeln!(out, "Error: {}", error);
        }

        let kind = pane.kind;
        match kind {
            PaneKind::Selector => out.push_str("Enter a location: open s3://bucket/key\n"),
            PaneKind::Browser => {
                let table = self.app.folder_table().unwrap_or_default();
                out.push_str(&render_table(&table, &self.filter));
            }
            PaneKind::Viewer => {
                if let Some(viewer) = self.sync_viewer() {
                    out.push_str(&render_viewer(viewer));
                }
            }
        }
        out
    }

    fn render_header(&self) -> String {
        let ws = self.app.workspace();
        let mut out = String::new();
        if ws.panes.len() > 1 {
            let panes: Vec<String> = ws
                .panes
                .iter()
                .map(|p| {
                    let marker = if p.id == ws.active_pane_id { "*" } else { "" };
                    format!("{}[{}] {:?}", marker, p.id, p.kind)
                })
                .collect();
            let _ = writeln!(out, "Panes: {}", panes.join("  "));
        }
        if let Some(crumb) = self.app.breadcrumb() {
            let _ = writeln!(out, "{}", crumb.render());
        }
        if !ws.active_pane().tabs.is_empty() {
            out.push_str(&self.render_tabs());
        }
        out
    }

    fn render_tabs(&self) -> String {
        let pane = self.app.workspace().active_pane();
        if pane.tabs.is_empty() {
            return "No open tabs\n".to_string();
        }
        let tabs: Vec<String> = pane
            .tabs
            .iter()
            .map(|tab| {
                let active = if Some(tab.id()) == pane.active_tab_id { "*" } else { "" };
                let pin = if tab.is_pinned() { " (pinned)" } else { "" };
                let icon = match tab {
                    Tab::File(_) => "",
                    Tab::Folder(_) => "/",
                };
                format!("{}[{}] {}{}{}", active, tab.id(), tab.title(), icon, pin)
            })
            .collect();
        format!("Tabs: {}\n", tabs.join("  "))
    }
}

/// Folder prefix for a `cd` argument; a leading "/" is bucket-absolute
fn resolve_folder(current: &str, folder: &str) -> String {
    let path = match folder.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("{}{}", current, folder),
    };
    if path.is_empty() || path.ends_with('/') {
        path
    } else {
        format!("{}/", path)
    }
}

fn resolve_key(current: &str, name: &str) -> String {
    match name.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("{}{}", current, name),
    }
}

fn render_table(table: &FolderTable, filter: &str) -> String {
    if let Some(message) = table.empty_message() {
        return format!("{}\n", message);
    }
    let rows = table.filter(filter);
    if rows.is_empty() {
        return format!("No items match '{}'\n", filter);
    }

    let width = rows.iter().map(|r| r.name.len()).max().unwrap_or(4).max(4);
    let mut out = format!("{:<width$}  {:<10}  {:>10}  {}\n", "Name", "Type", "Size", "Modified", width = width);
    for row in rows {
        let name = if row.is_folder() {
            format!("{}/", row.name)
        } else {
            row.name.clone()
        };
        let _ = writeln!(
            out,
            "{:<width$}  {:<10}  {:>10}  {}",
            name,
            row.type_label,
            row.size,
            row.modified,
            width = width + 1
        );
    }
    if let Some(note) = &table.note {
        let _ = writeln!(out, "{}", note);
    }
    out
}

fn render_sidebar(sidebar: &Sidebar) -> String {
    if let Some(message) = sidebar.empty_message() {
        return format!("{}\n", message);
    }
    let mut out = String::new();
    for (idx, entry) in sidebar.entries.iter().enumerate() {
        let marker = if entry.active { "*" } else { " " };
        let _ = writeln!(out, "{}{:>2}. {}  ({}/{})", marker, idx + 1, entry.label, entry.bucket, entry.prefix);
    }
    out
}

pub fn render_viewer(viewer: &ViewerContent) -> String {
    let mut out = String::new();
    match viewer {
        ViewerContent::Json(view) => {
            let query = view.query();
            let term = match query.term() {
                "" => query.mode().placeholder(),
                term => term,
            };
            let _ = writeln!(out, "[{}] {}", query.mode().label(), term);
            let outcome = view.outcome();
            if let Some(error) = &outcome.error {
                let _ = writeln!(out, "Invalid JSONPath: {}", error);
            }
            if outcome.text_fallback {
                out.push_str("Not a JSONPath expression, searched as text\n");
            }
            for node in &view.tree().nodes {
                let marker = match (node.expandable, node.expanded) {
                    (false, _) => " ",
                    (true, true) => "-",
                    (true, false) => "+",
                };
                let indent = "  ".repeat(node.depth);
                if node.expandable {
                    let _ = writeln!(out, "{}{} {}: {}  <{}>", indent, marker, node.key, node.value, node.id);
                } else {
                    let _ = writeln!(out, "{}{} {}: {}", indent, marker, node.key, node.value);
                }
            }
            if view.tree().truncated {
                out.push_str("(tree truncated)\n");
            }
        }
        ViewerContent::Markdown(doc) => {
            for heading in &doc.outline {
                let _ = writeln!(out, "{} {}", "#".repeat(heading.level as usize), heading.text);
            }
            out.push_str(&doc.html);
        }
        ViewerContent::Html(view) => {
            out.push_str(&view.render());
            out.push('\n');
        }
        ViewerContent::Image(view) => {
            let dims = view
                .dimensions()
                .map(|(w, h)| format!("{}x{}", w, h))
                .unwrap_or_else(|| "unknown size".to_string());
            let _ = writeln!(
                out,
                "{} ({}, {}, {} bytes) zoom {}%{}",
                view.file_name,
                view.mime(),
                dims,
                view.file_size(),
                view.zoom_percent(),
                if view.fit { " fit" } else { "" }
            );
        }
        ViewerContent::Text(view) => {
            if let Some(error) = &view.parse_error {
                let _ = writeln!(out, "{}", error);
            }
            let _ = writeln!(out, "{} | {} lines", view.syntax.display_name(), view.line_count);
            out.push_str(&view.content);
            if view.truncated {
                out.push_str("\n(content truncated)");
            }
            out.push('\n');
        }
    }
    out
}
