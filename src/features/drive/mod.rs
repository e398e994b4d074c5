//! Drive asset feature.
//!
//! Resolves a destination folder for a form (find-or-create by form title,
//! then a "Form Assets" subfolder), uploads logo/cover assets into it,
//! makes them world-readable, and hands back a public view URL. Also
//! exposes the user's folder list and short-lived access token for the
//! client-side picker.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/drive/folders` | Yes | List folders visible to the user |
//! | GET | `/api/drive/token` | Yes | Access token for the file picker |
//! | POST | `/api/drive/upload-asset` | Yes | Upload an asset via the folder pipeline |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::AssetService;
