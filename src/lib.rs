//! S3 Navigator library
//!
//! Everything except terminal I/O lives here: the object store gateway,
//! the workspace state machine, viewers and the command dispatcher.

pub mod app;
pub mod bookmarks;
pub mod classify;
pub mod gateway;
pub mod navigation;
pub mod s3;
pub mod settings;
pub mod shell;
pub mod viewers;
pub mod workspace;
