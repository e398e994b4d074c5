use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::drive::{dtos as drive_dtos, handlers as drive_handlers};
use crate::features::forms::{
    dtos as forms_dtos, handlers as forms_handlers, models as forms_models,
};
use crate::features::images::handlers as images_handlers;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Forms
        forms_handlers::form_handler::list_forms,
        forms_handlers::form_handler::create_form,
        forms_handlers::form_handler::get_form,
        forms_handlers::form_handler::update_form,
        // Drive
        drive_handlers::drive_handler::list_drive_folders,
        drive_handlers::drive_handler::get_drive_token,
        drive_handlers::drive_handler::upload_asset,
        // Images (public)
        images_handlers::image_handler::get_image,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Forms
            forms_models::AccessLevel,
            forms_models::EmailFieldControl,
            forms_models::SubfolderOrganization,
            forms_models::CardStyle,
            forms_models::BorderRadius,
            forms_models::QuestionType,
            forms_models::UploadField,
            forms_models::CustomQuestion,
            forms_models::FormConfig,
            forms_dtos::FormResponseDto,
            ApiResponse<forms_dtos::FormResponseDto>,
            ApiResponse<Vec<forms_dtos::FormResponseDto>>,
            // Drive
            drive_dtos::DriveFolderDto,
            drive_dtos::DriveTokenResponseDto,
            drive_dtos::UploadAssetDto,
            drive_dtos::AssetUploadResponseDto,
            ApiResponse<Vec<drive_dtos::DriveFolderDto>>,
            ApiResponse<drive_dtos::DriveTokenResponseDto>,
            ApiResponse<drive_dtos::AssetUploadResponseDto>,
        )
    ),
    tags(
        (name = "forms", description = "Upload form configuration"),
        (name = "drive", description = "Drive destination folders and asset uploads"),
        (name = "images", description = "Public image proxy for uploaded assets"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "FormDrop API",
        version = "0.1.0",
        description = "API documentation for FormDrop",
    )
)]
pub struct ApiDoc;

/// Adds Bearer session-token security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
