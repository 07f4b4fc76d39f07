//! Navigation chrome view models: address bar, folder table, bookmarks sidebar

pub mod breadcrumb;
pub mod folder_table;
pub mod sidebar;

pub use breadcrumb::{Breadcrumb, BreadcrumbTarget, Segment};
pub use folder_table::{format_date, format_size, FolderRow, FolderTable};
pub use sidebar::{Sidebar, SidebarEntry};
