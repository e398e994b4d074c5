use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::shared::constants::DEFAULT_FORM_TITLE;
use crate::shared::validation::HEX_COLOR_REGEX;

/// Who may submit against a published form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "access_level", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessLevel {
    Anyone,
    Invited,
}

/// Whether the submitter email input is shown and required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "email_field_control", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailFieldControl {
    Required,
    Optional,
    NotIncluded,
}

/// How submissions are grouped into Drive subfolders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "subfolder_organization", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubfolderOrganization {
    None,
    Date,
    Submitter,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "card_style", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CardStyle {
    Shadow,
    Flat,
    Border,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "border_radius", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BorderRadius {
    None,
    Sm,
    Md,
    Lg,
    Full,
}

/// One configured file-input slot a submitter fills in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadField {
    pub id: Uuid,
    pub label: String,
    pub allowed_types: String,
    #[serde(rename = "maxSizeMB")]
    pub max_size_mb: i32,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    ShortText,
    LongText,
    Dropdown,
    Checkbox,
    Radio,
}

impl QuestionType {
    /// Dropdown and radio questions carry a choice list; the rest ignore it.
    pub fn has_options(self) -> bool {
        matches!(self, QuestionType::Dropdown | QuestionType::Radio)
    }
}

/// A non-file input collecting auxiliary submitter data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomQuestion {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub label: String,
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

/// The full editable configuration of a form - the single source of truth
/// the editor mutates and the persistence layer stores.
///
/// Wire format is camelCase to match what the editor sends. The dynamic
/// field lists accept either literal JSON arrays or a JSON-encoded string
/// (legacy double-encoded rows round-trip through clients that never
/// parsed them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FormConfig {
    #[validate(length(max = 200, message = "title must be at most 200 characters"))]
    pub title: String,
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: String,

    // Upload constraints
    pub allowed_types: String,
    #[serde(rename = "maxSizeMB")]
    #[validate(range(min = 1, max = 1024, message = "maxSizeMB must be between 1 and 1024"))]
    pub max_size_mb: i32,

    // Drive linkage
    pub drive_enabled: bool,
    pub drive_folder_id: Option<String>,
    pub drive_folder_name: Option<String>,
    pub drive_folder_url: Option<String>,

    // Access control
    pub is_accepting_responses: bool,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub access_level: AccessLevel,
    pub allowed_emails: String,
    pub email_field_control: EmailFieldControl,

    // Organization
    pub enable_metadata_spreadsheet: bool,
    pub subfolder_organization: SubfolderOrganization,
    pub custom_subfolder_field: String,
    pub enable_smart_grouping: bool,

    // Design
    pub logo_url: String,
    #[validate(regex(path = *HEX_COLOR_REGEX, message = "primaryColor must be a #rrggbb color"))]
    pub primary_color: String,
    #[validate(regex(path = *HEX_COLOR_REGEX, message = "secondaryColor must be a #rrggbb color"))]
    pub secondary_color: String,
    #[validate(regex(path = *HEX_COLOR_REGEX, message = "backgroundColor must be a #rrggbb color"))]
    pub background_color: String,
    pub font_family: String,
    #[validate(regex(path = *HEX_COLOR_REGEX, message = "buttonTextColor must be a #rrggbb color"))]
    pub button_text_color: String,
    pub card_style: CardStyle,
    pub border_radius: BorderRadius,
    pub cover_image_url: String,

    // Dynamic field lists
    #[serde(deserialize_with = "string_or_list")]
    pub upload_fields: Vec<UploadField>,
    #[serde(deserialize_with = "string_or_list")]
    pub custom_questions: Vec<CustomQuestion>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_FORM_TITLE.to_string(),
            description: String::new(),
            allowed_types: ".pdf,.png,.jpg".to_string(),
            max_size_mb: 10,
            drive_enabled: true,
            drive_folder_id: None,
            drive_folder_name: None,
            drive_folder_url: None,
            is_accepting_responses: true,
            expiry_date: None,
            is_published: false,
            access_level: AccessLevel::Anyone,
            allowed_emails: String::new(),
            email_field_control: EmailFieldControl::Optional,
            enable_metadata_spreadsheet: false,
            subfolder_organization: SubfolderOrganization::Date,
            custom_subfolder_field: String::new(),
            enable_smart_grouping: true,
            logo_url: String::new(),
            primary_color: "#4f46e5".to_string(),
            secondary_color: "#818cf8".to_string(),
            background_color: "#ffffff".to_string(),
            font_family: "Inter".to_string(),
            button_text_color: "#ffffff".to_string(),
            card_style: CardStyle::Shadow,
            border_radius: BorderRadius::Md,
            cover_image_url: String::new(),
            upload_fields: Vec::new(),
            custom_questions: Vec::new(),
        }
    }
}

/// Accept a dynamic list as either a literal array or a JSON-encoded string.
fn string_or_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListRepr<T> {
        List(Vec<T>),
        Serialized(String),
    }

    match ListRepr::<T>::deserialize(deserializer)? {
        ListRepr::List(items) => Ok(items),
        ListRepr::Serialized(raw) => serde_json::from_str(&raw).map_err(serde::de::Error::custom),
    }
}

/// Parse a dynamic-list column. Stored values are serialized JSON arrays,
/// but legacy rows double-encode the array as a JSON string.
pub fn parse_dynamic_list<T: serde::de::DeserializeOwned>(
    raw: &str,
) -> Result<Vec<T>, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<T>>(raw).or_else(|outer| {
        match serde_json::from_str::<String>(raw) {
            Ok(inner) => serde_json::from_str::<Vec<T>>(&inner),
            Err(_) => Err(outer),
        }
    })
}

/// Database row for a form. Dynamic field lists stay serialized here and
/// are parsed when converting to the API shape.
#[derive(Debug, Clone, FromRow)]
pub struct Form {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub allowed_types: String,
    pub max_size_mb: i32,
    pub drive_enabled: bool,
    pub drive_folder_id: Option<String>,
    pub drive_folder_name: Option<String>,
    pub drive_folder_url: Option<String>,
    pub is_accepting_responses: bool,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub access_level: AccessLevel,
    pub allowed_emails: String,
    pub email_field_control: EmailFieldControl,
    pub enable_metadata_spreadsheet: bool,
    pub subfolder_organization: SubfolderOrganization,
    pub custom_subfolder_field: String,
    pub enable_smart_grouping: bool,
    pub logo_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub font_family: String,
    pub button_text_color: String,
    pub card_style: CardStyle,
    pub border_radius: BorderRadius,
    pub cover_image_url: String,
    pub upload_fields: String,
    pub custom_questions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    /// Rebuild the editable configuration from stored columns.
    pub fn into_config(self) -> Result<FormConfig, serde_json::Error> {
        let upload_fields = parse_dynamic_list(&self.upload_fields)?;
        let custom_questions = parse_dynamic_list(&self.custom_questions)?;

        Ok(FormConfig {
            title: self.title,
            description: self.description,
            allowed_types: self.allowed_types,
            max_size_mb: self.max_size_mb,
            drive_enabled: self.drive_enabled,
            drive_folder_id: self.drive_folder_id,
            drive_folder_name: self.drive_folder_name,
            drive_folder_url: self.drive_folder_url,
            is_accepting_responses: self.is_accepting_responses,
            expiry_date: self.expiry_date,
            is_published: self.is_published,
            access_level: self.access_level,
            allowed_emails: self.allowed_emails,
            email_field_control: self.email_field_control,
            enable_metadata_spreadsheet: self.enable_metadata_spreadsheet,
            subfolder_organization: self.subfolder_organization,
            custom_subfolder_field: self.custom_subfolder_field,
            enable_smart_grouping: self.enable_smart_grouping,
            logo_url: self.logo_url,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
            background_color: self.background_color,
            font_family: self.font_family,
            button_text_color: self.button_text_color,
            card_style: self.card_style,
            border_radius: self.border_radius,
            cover_image_url: self.cover_image_url,
            upload_fields,
            custom_questions,
        })
    }
}
