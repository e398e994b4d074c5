use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::editor::SaveSink;
use crate::features::forms::dtos::FormResponseDto;
use crate::features::forms::models::{Form, FormConfig};
use crate::shared::constants::{DEFAULT_FORM_TITLE, MAX_UPLOAD_FIELDS};

const FORM_COLUMNS: &str = "title, description, allowed_types, max_size_mb, drive_enabled, \
     drive_folder_id, drive_folder_name, drive_folder_url, is_accepting_responses, expiry_date, \
     is_published, access_level, allowed_emails, email_field_control, enable_metadata_spreadsheet, \
     subfolder_organization, custom_subfolder_field, enable_smart_grouping, logo_url, \
     primary_color, secondary_color, background_color, font_family, button_text_color, \
     card_style, border_radius, cover_image_url, upload_fields, custom_questions";

/// Service for form persistence
pub struct FormService {
    pool: PgPool,
    frontend_url: String,
}

impl FormService {
    pub fn new(pool: PgPool, frontend_url: String) -> Self {
        Self {
            pool,
            frontend_url,
        }
    }

    /// Public submission link for a stored form.
    fn share_url(&self, id: Uuid) -> String {
        format!("{}/upload/{}", self.frontend_url.trim_end_matches('/'), id)
    }

    fn validate_config(config: &FormConfig) -> Result<()> {
        config
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if config.upload_fields.len() > MAX_UPLOAD_FIELDS {
            return Err(AppError::Validation(format!(
                "A form may have at most {} upload fields",
                MAX_UPLOAD_FIELDS
            )));
        }

        if let Some(expiry) = config.expiry_date {
            if expiry < Utc::now() {
                return Err(AppError::Validation(
                    "expiryDate must not be in the past".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn to_response(&self, form: Form) -> Result<FormResponseDto> {
        let id = form.id;
        let created_at = form.created_at;
        let updated_at = form.updated_at;
        let config = form.into_config().map_err(|e| {
            AppError::Internal(format!("Corrupt dynamic field list on form {}: {}", id, e))
        })?;

        Ok(FormResponseDto {
            id,
            share_url: self.share_url(id),
            config,
            created_at,
            updated_at,
        })
    }

    /// List all forms owned by the user, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<FormResponseDto>> {
        let rows = sqlx::query_as::<_, Form>(
            "SELECT * FROM forms WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|f| self.to_response(f)).collect()
    }

    /// Create a form from an editor configuration.
    pub async fn create(&self, user_id: &str, mut config: FormConfig) -> Result<FormResponseDto> {
        if config.title.is_empty() {
            config.title = DEFAULT_FORM_TITLE.to_string();
        }
        Self::validate_config(&config)?;

        let upload_fields = serde_json::to_string(&config.upload_fields)
            .map_err(|e| AppError::Internal(format!("Failed to serialize upload fields: {}", e)))?;
        let custom_questions = serde_json::to_string(&config.custom_questions).map_err(|e| {
            AppError::Internal(format!("Failed to serialize custom questions: {}", e))
        })?;

        let sql = format!(
            "INSERT INTO forms (user_id, {FORM_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30) \
             RETURNING *"
        );

        let form = sqlx::query_as::<_, Form>(&sql)
            .bind(user_id)
            .bind(&config.title)
            .bind(&config.description)
            .bind(&config.allowed_types)
            .bind(config.max_size_mb)
            .bind(config.drive_enabled)
            .bind(&config.drive_folder_id)
            .bind(&config.drive_folder_name)
            .bind(&config.drive_folder_url)
            .bind(config.is_accepting_responses)
            .bind(config.expiry_date)
            .bind(config.is_published)
            .bind(config.access_level)
            .bind(&config.allowed_emails)
            .bind(config.email_field_control)
            .bind(config.enable_metadata_spreadsheet)
            .bind(config.subfolder_organization)
            .bind(&config.custom_subfolder_field)
            .bind(config.enable_smart_grouping)
            .bind(&config.logo_url)
            .bind(&config.primary_color)
            .bind(&config.secondary_color)
            .bind(&config.background_color)
            .bind(&config.font_family)
            .bind(&config.button_text_color)
            .bind(config.card_style)
            .bind(config.border_radius)
            .bind(&config.cover_image_url)
            .bind(&upload_fields)
            .bind(&custom_questions)
            .fetch_one(&self.pool)
            .await?;

        info!("Form created: id={}, user={}", form.id, user_id);

        self.to_response(form)
    }

    /// Fetch one form. Rows owned by other users are reported as absent.
    pub async fn get(&self, user_id: &str, id: Uuid) -> Result<FormResponseDto> {
        let form = sqlx::query_as::<_, Form>("SELECT * FROM forms WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let form = form.ok_or_else(|| AppError::NotFound("Form not found".to_string()))?;
        self.to_response(form)
    }

    /// Full replace of a form's configuration. Used by both the explicit
    /// Save action and the editor's debounced auto-save.
    pub async fn update(&self, user_id: &str, id: Uuid, config: FormConfig) -> Result<FormResponseDto> {
        Self::validate_config(&config)?;

        let upload_fields = serde_json::to_string(&config.upload_fields)
            .map_err(|e| AppError::Internal(format!("Failed to serialize upload fields: {}", e)))?;
        let custom_questions = serde_json::to_string(&config.custom_questions).map_err(|e| {
            AppError::Internal(format!("Failed to serialize custom questions: {}", e))
        })?;

        let form = sqlx::query_as::<_, Form>(
            "UPDATE forms SET \
             title = $1, description = $2, allowed_types = $3, max_size_mb = $4, \
             drive_enabled = $5, drive_folder_id = $6, drive_folder_name = $7, \
             drive_folder_url = $8, is_accepting_responses = $9, expiry_date = $10, \
             is_published = $11, access_level = $12, allowed_emails = $13, \
             email_field_control = $14, enable_metadata_spreadsheet = $15, \
             subfolder_organization = $16, custom_subfolder_field = $17, \
             enable_smart_grouping = $18, logo_url = $19, primary_color = $20, \
             secondary_color = $21, background_color = $22, font_family = $23, \
             button_text_color = $24, card_style = $25, border_radius = $26, \
             cover_image_url = $27, upload_fields = $28, custom_questions = $29, \
             updated_at = NOW() \
             WHERE id = $30 AND user_id = $31 \
             RETURNING *",
        )
        .bind(&config.title)
        .bind(&config.description)
        .bind(&config.allowed_types)
        .bind(config.max_size_mb)
        .bind(config.drive_enabled)
        .bind(&config.drive_folder_id)
        .bind(&config.drive_folder_name)
        .bind(&config.drive_folder_url)
        .bind(config.is_accepting_responses)
        .bind(config.expiry_date)
        .bind(config.is_published)
        .bind(config.access_level)
        .bind(&config.allowed_emails)
        .bind(config.email_field_control)
        .bind(config.enable_metadata_spreadsheet)
        .bind(config.subfolder_organization)
        .bind(&config.custom_subfolder_field)
        .bind(config.enable_smart_grouping)
        .bind(&config.logo_url)
        .bind(&config.primary_color)
        .bind(&config.secondary_color)
        .bind(&config.background_color)
        .bind(&config.font_family)
        .bind(&config.button_text_color)
        .bind(config.card_style)
        .bind(config.border_radius)
        .bind(&config.cover_image_url)
        .bind(&upload_fields)
        .bind(&custom_questions)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let form = form.ok_or_else(|| AppError::NotFound("Form not found".to_string()))?;
        self.to_response(form)
    }
}

/// Bridges the editor's auto-save sink to the persistence service on behalf
/// of a specific owner.
#[allow(dead_code)]
pub struct OwnedFormSink {
    service: Arc<FormService>,
    user_id: String,
}

#[allow(dead_code)]
impl OwnedFormSink {
    pub fn new(service: Arc<FormService>, user_id: String) -> Self {
        Self { service, user_id }
    }
}

#[async_trait]
impl SaveSink for OwnedFormSink {
    async fn save(&self, form_id: Uuid, config: &FormConfig) -> Result<()> {
        self.service
            .update(&self.user_id, form_id, config.clone())
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::forms::models::UploadField;

    fn field() -> UploadField {
        UploadField {
            id: Uuid::new_v4(),
            label: "File".to_string(),
            allowed_types: ".pdf".to_string(),
            max_size_mb: 10,
            required: false,
        }
    }

    #[test]
    fn test_validate_config_rejects_fourth_upload_field() {
        let config = FormConfig {
            upload_fields: vec![field(), field(), field(), field()],
            ..FormConfig::default()
        };
        assert!(matches!(
            FormService::validate_config(&config),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_config_rejects_past_expiry() {
        let config = FormConfig {
            expiry_date: Some(Utc::now() - chrono::Duration::days(1)),
            ..FormConfig::default()
        };
        assert!(matches!(
            FormService::validate_config(&config),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_config_accepts_future_expiry() {
        let config = FormConfig {
            expiry_date: Some(Utc::now() + chrono::Duration::days(7)),
            ..FormConfig::default()
        };
        assert!(FormService::validate_config(&config).is_ok());
    }
}
