pub mod drive_handler;

pub use drive_handler::{get_drive_token, list_drive_folders, upload_asset};
