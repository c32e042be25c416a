//! Profile setup wizard.
//!
//! ```text
//! 1. Welcome            -> Okay
//! 2. Profile image      -> upload or skip
//! 3. Shipping address   -> six required fields
//! 4. Done               -> back to the dashboard
//! ```
//!
//! The step travels in `?step=N`; failures keep the user on the same step.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use pusatoleh_core::media::{self, MAX_IMAGE_BYTES};
use pusatoleh_core::{AddressField, AddressForm};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{ApiError, ImageUpload};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{FlashKind, Layout, RequireAuth, flash};
use crate::state::AppState;

/// Number of wizard steps.
pub const LAST_STEP: u8 = 4;

/// Request body limit for the image step. Larger than [`MAX_IMAGE_BYTES`] so
/// oversized files reach the handler and get a friendly message.
pub const UPLOAD_BODY_LIMIT: usize = 2 * MAX_IMAGE_BYTES;

/// Query parameters for the wizard.
#[derive(Debug, Deserialize)]
pub struct SetupQuery {
    pub step: Option<String>,
}

/// Parse `?step=`, defaulting to 1 and clamping to the valid range.
#[must_use]
pub fn clamp_step(raw: Option<&str>) -> u8 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map_or(1, |step| step.clamp(1, i64::from(LAST_STEP)))
        .try_into()
        .unwrap_or(1)
}

fn step_url(step: u8) -> String {
    format!("/dashboard/buyer/setup?step={step}")
}

/// A labelled address input for the step 3 form.
pub struct AddressInput {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Wizard page template.
#[derive(Template, WebTemplate)]
#[template(path = "buyer/setup.html")]
pub struct SetupTemplate {
    pub layout: Layout,
    pub step: u8,
    pub inputs: Vec<AddressInput>,
    pub error: Option<String>,
    pub max_image_mb: usize,
}

impl SetupTemplate {
    fn new(layout: Layout, step: u8, address: &AddressForm, error: Option<String>) -> Self {
        Self {
            layout,
            step,
            inputs: AddressField::ALL
                .iter()
                .map(|field| AddressInput {
                    key: field.key(),
                    label: field.label(),
                    value: address.get(*field).to_string(),
                })
                .collect(),
            error,
            max_image_mb: MAX_IMAGE_BYTES / (1024 * 1024),
        }
    }
}

/// Display a wizard step.
pub async fn setup_page(
    RequireAuth(_user): RequireAuth,
    layout: Layout,
    Query(query): Query<SetupQuery>,
) -> impl IntoResponse {
    let step = clamp_step(query.step.as_deref());
    SetupTemplate::new(layout, step, &AddressForm::default(), None)
}

/// Step 2: forward the profile image to the API.
///
/// Submitting without a file skips ahead to the address step.
#[instrument(skip_all, fields(user = %user.name))]
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let upload = match read_image_field(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            tracing::debug!("No image submitted, skipping");
            return Ok(Redirect::to(&step_url(3)));
        }
        Err(message) => {
            flash(&session, FlashKind::Error, message).await;
            return Ok(Redirect::to(&step_url(2)));
        }
    };

    match state.api().upload_profile_image(&user.token, upload).await {
        Ok(()) => {
            flash(&session, FlashKind::Success, "Foto profil berhasil diunggah").await;
            Ok(Redirect::to(&step_url(3)))
        }
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to upload profile image");
            flash(
                &session,
                FlashKind::Error,
                format!("Gagal mengunggah foto: {}", e.user_message()),
            )
            .await;
            Ok(Redirect::to(&step_url(2)))
        }
    }
}

/// Find the `image` field and check it, returning `None` if no file was chosen.
async fn read_image_field(
    multipart: &mut Multipart,
) -> std::result::Result<Option<ImageUpload>, String> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart body");
                return Err(format!(
                    "Ukuran gambar maksimal {}MB",
                    MAX_IMAGE_BYTES / (1024 * 1024)
                ));
            }
        };

        if field.name() != Some("image") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty());
        let content_type = field.content_type().map(str::to_string);

        let bytes = field.bytes().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read image field");
            format!("Ukuran gambar maksimal {}MB", MAX_IMAGE_BYTES / (1024 * 1024))
        })?;

        let Some(file_name) = file_name else {
            return Ok(None);
        };
        if bytes.is_empty() {
            return Ok(None);
        }

        media::check_image(bytes.len(), content_type.as_deref()).map_err(|e| match e {
            media::MediaError::TooLarge { .. } => format!(
                "Ukuran gambar maksimal {}MB",
                MAX_IMAGE_BYTES / (1024 * 1024)
            ),
            media::MediaError::NotAnImage => "File harus berupa gambar".to_string(),
        })?;

        return Ok(Some(ImageUpload {
            bytes: bytes.to_vec(),
            file_name,
            content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        }));
    }
}

/// Step 3: validate and save the shipping address.
#[instrument(skip_all, fields(user = %user.name))]
pub async fn save_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    mut layout: Layout,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let address = form.trimmed();
    if let Err(e) = address.validate() {
        return Ok(SetupTemplate::new(layout, 3, &address, Some(e.to_string())).into_response());
    }

    match state.api().save_address(&user.token, &address).await {
        Ok(()) => {
            flash(&session, FlashKind::Success, "Alamat berhasil disimpan").await;
            Ok(Redirect::to(&step_url(LAST_STEP)).into_response())
        }
        Err(ApiError::Unauthorized) => Err(AppError::Api(ApiError::Unauthorized)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to save address");
            layout.push(
                FlashKind::Error,
                format!("Gagal menyimpan alamat: {}", e.user_message()),
            );
            Ok(SetupTemplate::new(layout, 3, &address, None).into_response())
        }
    }
}
