pub mod form_handler;

pub use form_handler::{create_form, get_form, list_forms, update_form};
