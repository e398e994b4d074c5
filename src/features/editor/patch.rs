use chrono::{DateTime, Utc};

use crate::features::forms::models::{
    AccessLevel, BorderRadius, CardStyle, CustomQuestion, EmailFieldControl, FormConfig,
    SubfolderOrganization, UploadField,
};

/// One named-field replacement on a [`FormConfig`].
///
/// This is the only mutation path into the configuration: applying a patch
/// replaces exactly the addressed field and leaves every other field
/// untouched. The dynamic lists are fields like any other; list edits are
/// expressed as whole-list replacements built by the controller.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum FormPatch {
    Title(String),
    Description(String),
    AllowedTypes(String),
    MaxSizeMb(i32),
    DriveEnabled(bool),
    DriveFolderId(Option<String>),
    DriveFolderName(Option<String>),
    DriveFolderUrl(Option<String>),
    IsAcceptingResponses(bool),
    ExpiryDate(Option<DateTime<Utc>>),
    IsPublished(bool),
    AccessLevel(AccessLevel),
    AllowedEmails(String),
    EmailFieldControl(EmailFieldControl),
    EnableMetadataSpreadsheet(bool),
    SubfolderOrganization(SubfolderOrganization),
    CustomSubfolderField(String),
    EnableSmartGrouping(bool),
    LogoUrl(String),
    PrimaryColor(String),
    SecondaryColor(String),
    BackgroundColor(String),
    FontFamily(String),
    ButtonTextColor(String),
    CardStyle(CardStyle),
    BorderRadius(BorderRadius),
    CoverImageUrl(String),
    UploadFields(Vec<UploadField>),
    CustomQuestions(Vec<CustomQuestion>),
}

impl FormPatch {
    pub fn apply(self, config: &mut FormConfig) {
        match self {
            FormPatch::Title(v) => config.title = v,
            FormPatch::Description(v) => config.description = v,
            FormPatch::AllowedTypes(v) => config.allowed_types = v,
            FormPatch::MaxSizeMb(v) => config.max_size_mb = v,
            FormPatch::DriveEnabled(v) => config.drive_enabled = v,
            FormPatch::DriveFolderId(v) => config.drive_folder_id = v,
            FormPatch::DriveFolderName(v) => config.drive_folder_name = v,
            FormPatch::DriveFolderUrl(v) => config.drive_folder_url = v,
            FormPatch::IsAcceptingResponses(v) => config.is_accepting_responses = v,
            FormPatch::ExpiryDate(v) => config.expiry_date = v,
            FormPatch::IsPublished(v) => config.is_published = v,
            FormPatch::AccessLevel(v) => config.access_level = v,
            FormPatch::AllowedEmails(v) => config.allowed_emails = v,
            FormPatch::EmailFieldControl(v) => config.email_field_control = v,
            FormPatch::EnableMetadataSpreadsheet(v) => config.enable_metadata_spreadsheet = v,
            FormPatch::SubfolderOrganization(v) => config.subfolder_organization = v,
            FormPatch::CustomSubfolderField(v) => config.custom_subfolder_field = v,
            FormPatch::EnableSmartGrouping(v) => config.enable_smart_grouping = v,
            FormPatch::LogoUrl(v) => config.logo_url = v,
            FormPatch::PrimaryColor(v) => config.primary_color = v,
            FormPatch::SecondaryColor(v) => config.secondary_color = v,
            FormPatch::BackgroundColor(v) => config.background_color = v,
            FormPatch::FontFamily(v) => config.font_family = v,
            FormPatch::ButtonTextColor(v) => config.button_text_color = v,
            FormPatch::CardStyle(v) => config.card_style = v,
            FormPatch::BorderRadius(v) => config.border_radius = v,
            FormPatch::CoverImageUrl(v) => config.cover_image_url = v,
            FormPatch::UploadFields(v) => config.upload_fields = v,
            FormPatch::CustomQuestions(v) => config.custom_questions = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_apply_replaces_only_the_named_field() {
        let original = FormConfig::default();
        let mut config = original.clone();

        FormPatch::Title("Acme Intake".to_string()).apply(&mut config);
        assert_eq!(config.title, "Acme Intake");

        // Reverting the one patched field must make the value identical to
        // the original, proving nothing else moved.
        config.title = original.title.clone();
        assert_eq!(config, original);
    }

    #[test]
    fn test_apply_preserves_siblings_across_field_kinds() {
        let original = FormConfig::default();

        let patches = vec![
            FormPatch::Description("Project files".to_string()),
            FormPatch::MaxSizeMb(50),
            FormPatch::DriveEnabled(false),
            FormPatch::AccessLevel(AccessLevel::Invited),
            FormPatch::ExpiryDate(Some(Utc::now())),
            FormPatch::CardStyle(CardStyle::Flat),
            FormPatch::UploadFields(vec![UploadField {
                id: Uuid::new_v4(),
                label: "Resume".to_string(),
                allowed_types: ".pdf".to_string(),
                max_size_mb: 5,
                required: true,
            }]),
        ];

        for patch in patches {
            let mut config = original.clone();
            patch.apply(&mut config);

            // Unrelated representative fields must be untouched.
            assert_eq!(config.font_family, original.font_family);
            assert_eq!(config.allowed_emails, original.allowed_emails);
            assert_eq!(config.custom_questions, original.custom_questions);
            assert_eq!(config.primary_color, original.primary_color);
        }
    }

    #[test]
    fn test_whole_list_replacement_is_a_single_field_write() {
        let mut config = FormConfig::default();
        let field = UploadField {
            id: Uuid::new_v4(),
            label: "Cover letter".to_string(),
            allowed_types: ".pdf".to_string(),
            max_size_mb: 2,
            required: false,
        };

        FormPatch::UploadFields(vec![field.clone()]).apply(&mut config);
        assert_eq!(config.upload_fields, vec![field]);
        assert!(config.custom_questions.is_empty());
    }
}
