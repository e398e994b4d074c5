use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::editor::autosave::{AutoSaver, SaveSink};
use crate::features::editor::patch::FormPatch;
use crate::features::editor::step::EditorStep;
use crate::features::forms::models::{CustomQuestion, FormConfig, QuestionType, UploadField};
use crate::shared::constants::{AUTOSAVE_DEBOUNCE_MS, MAX_UPLOAD_FIELDS};

/// In-place update of one upload-field entry, addressed by id.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum UploadFieldPatch {
    Label(String),
    AllowedTypes(String),
    MaxSizeMb(i32),
    Required(bool),
}

/// In-place update of one custom-question entry, addressed by id.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum CustomQuestionPatch {
    Label(String),
    Required(bool),
    Type(QuestionType),
    Options(Vec<String>),
}

/// The editor controller: sole owner of the in-memory configuration.
///
/// All mutation funnels through [`apply`], which routes a [`FormPatch`]
/// into the configuration and, once a form id is assigned, schedules a
/// debounced auto-save of the full snapshot. Step navigation is free-form;
/// Save Draft and Publish work from any step.
///
/// [`apply`]: FormEditor::apply
#[allow(dead_code)]
pub struct FormEditor {
    form_id: Option<Uuid>,
    config: FormConfig,
    step: EditorStep,
    sink: Arc<dyn SaveSink>,
    autosaver: AutoSaver,
}

#[allow(dead_code)]
impl FormEditor {
    /// Editor over a blank default configuration ("new form").
    pub fn new(sink: Arc<dyn SaveSink>) -> Self {
        Self::with_debounce(sink, Duration::from_millis(AUTOSAVE_DEBOUNCE_MS))
    }

    pub fn with_debounce(sink: Arc<dyn SaveSink>, debounce: Duration) -> Self {
        Self {
            form_id: None,
            config: FormConfig::default(),
            step: EditorStep::General,
            sink: Arc::clone(&sink),
            autosaver: AutoSaver::new(sink, debounce),
        }
    }

    /// Editor over a configuration fetched by id.
    pub fn load(form_id: Uuid, config: FormConfig, sink: Arc<dyn SaveSink>) -> Self {
        let mut editor = Self::new(sink);
        editor.form_id = Some(form_id);
        editor.config = config;
        editor
    }

    /// Assign the id of a freshly created form; subsequent edits auto-save.
    pub fn attach_form(&mut self, form_id: Uuid) {
        self.form_id = Some(form_id);
    }

    pub fn form_id(&self) -> Option<Uuid> {
        self.form_id
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn current_step(&self) -> EditorStep {
        self.step
    }

    // ---- step navigation -------------------------------------------------

    pub fn select_step(&mut self, step: EditorStep) {
        self.step = step;
    }

    pub fn next_step(&mut self) {
        self.step = self.step.next();
    }

    pub fn back_step(&mut self) {
        self.step = self.step.back();
    }

    // ---- mutation --------------------------------------------------------

    /// The single mutation path: replace one named field, then schedule an
    /// auto-save if this editor is bound to a stored form.
    pub fn apply(&mut self, patch: FormPatch) {
        patch.apply(&mut self.config);
        if let Some(form_id) = self.form_id {
            self.autosaver.schedule(form_id, self.config.clone());
        }
    }

    /// Add an upload field, inheriting the form-level constraints.
    /// Silently refuses once the cap is reached; the UI disables the
    /// control rather than surfacing an error.
    pub fn add_upload_field(&mut self) -> Option<Uuid> {
        if self.config.upload_fields.len() >= MAX_UPLOAD_FIELDS {
            return None;
        }

        let field = UploadField {
            id: Uuid::new_v4(),
            label: String::new(),
            allowed_types: self.config.allowed_types.clone(),
            max_size_mb: self.config.max_size_mb,
            required: false,
        };
        let id = field.id;

        let mut fields = self.config.upload_fields.clone();
        fields.push(field);
        self.apply(FormPatch::UploadFields(fields));

        Some(id)
    }

    /// Update one upload field in place; unknown ids are a no-op.
    pub fn update_upload_field(&mut self, id: Uuid, patch: UploadFieldPatch) {
        let mut fields = self.config.upload_fields.clone();
        let Some(field) = fields.iter_mut().find(|f| f.id == id) else {
            return;
        };
        match patch {
            UploadFieldPatch::Label(v) => field.label = v,
            UploadFieldPatch::AllowedTypes(v) => field.allowed_types = v,
            UploadFieldPatch::MaxSizeMb(v) => field.max_size_mb = v,
            UploadFieldPatch::Required(v) => field.required = v,
        }
        self.apply(FormPatch::UploadFields(fields));
    }

    /// Remove an upload field by id; unknown ids are a no-op.
    pub fn remove_upload_field(&mut self, id: Uuid) {
        let fields: Vec<UploadField> = self
            .config
            .upload_fields
            .iter()
            .filter(|f| f.id != id)
            .cloned()
            .collect();
        if fields.len() != self.config.upload_fields.len() {
            self.apply(FormPatch::UploadFields(fields));
        }
    }

    /// Add a custom question. Unlike upload fields, questions are unbounded.
    pub fn add_custom_question(&mut self, question_type: QuestionType) -> Uuid {
        let question = CustomQuestion {
            id: Uuid::new_v4(),
            question_type,
            label: String::new(),
            required: false,
            options: Vec::new(),
        };
        let id = question.id;

        let mut questions = self.config.custom_questions.clone();
        questions.push(question);
        self.apply(FormPatch::CustomQuestions(questions));

        id
    }

    /// Update one custom question in place; unknown ids are a no-op.
    pub fn update_custom_question(&mut self, id: Uuid, patch: CustomQuestionPatch) {
        let mut questions = self.config.custom_questions.clone();
        let Some(question) = questions.iter_mut().find(|q| q.id == id) else {
            return;
        };
        match patch {
            CustomQuestionPatch::Label(v) => question.label = v,
            CustomQuestionPatch::Required(v) => question.required = v,
            CustomQuestionPatch::Type(v) => {
                question.question_type = v;
                if !v.has_options() {
                    question.options.clear();
                }
            }
            CustomQuestionPatch::Options(v) => question.options = v,
        }
        self.apply(FormPatch::CustomQuestions(questions));
    }

    /// Remove a custom question by id; unknown ids are a no-op.
    pub fn remove_custom_question(&mut self, id: Uuid) {
        let questions: Vec<CustomQuestion> = self
            .config
            .custom_questions
            .iter()
            .filter(|q| q.id != id)
            .cloned()
            .collect();
        if questions.len() != self.config.custom_questions.len() {
            self.apply(FormPatch::CustomQuestions(questions));
        }
    }

    // ---- saving ----------------------------------------------------------

    /// Explicit Save Draft: cancel any pending debounce and write now.
    pub async fn save_draft(&mut self) -> Result<()> {
        let form_id = self
            .form_id
            .ok_or_else(|| AppError::BadRequest("Form has not been created yet".to_string()))?;
        self.autosaver.cancel();
        self.sink.save(form_id, &self.config).await
    }

    /// Publish: flip the published flag and save immediately.
    pub async fn publish(&mut self) -> Result<()> {
        self.config.is_published = true;
        self.save_draft().await
    }

    /// Wait out the pending auto-save, if any. Test seam.
    #[cfg(test)]
    pub async fn flush_pending_save(&mut self) {
        self.autosaver.flush().await;
    }
}
