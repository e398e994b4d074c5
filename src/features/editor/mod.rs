//! Form editor state machine.
//!
//! Backs the five-step admin editor (General, Uploads, Organization,
//! Access, Design) over one owned [`FormConfig`] value. All mutation goes
//! through the [`FormPatch`] sum type so replacing one named field can
//! never disturb another, and every change while a form id is assigned
//! schedules a trailing-debounce auto-save through a [`SaveSink`].
//!
//! The wizard UI itself lives in the SPA; this module is the decision
//! logic it drives.
//!
//! [`FormConfig`]: crate::features::forms::models::FormConfig

mod autosave;
mod controller;
mod patch;
mod step;

pub use autosave::{AutoSaver, SaveSink};
pub use controller::{CustomQuestionPatch, FormEditor, UploadFieldPatch};
pub use patch::FormPatch;
pub use step::EditorStep;
