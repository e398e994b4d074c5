//! Google Drive integration module
//!
//! Provides a thin client over the Drive v3 REST API (folder lookup and
//! creation, multipart uploads, permission grants) plus the `DriveApi`
//! trait that services depend on so provider calls can be mocked in tests.

mod client;
mod model;

pub use client::{DriveApi, DriveClient};
pub use model::DriveFile;
